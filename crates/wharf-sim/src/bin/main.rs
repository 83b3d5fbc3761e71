// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.


//! Wharf Simulator CLI
//!
//! Runs the port scheduler against a simulated clock, generated traffic and
//! in-process verification workers, checking every reported event.
//!
//! # Example
//!
//! ```bash
//! # Simulate the sample port for 200 timesteps
//! wharf-sim --topology data/port.txt --timesteps 200
//!
//! # Busier traffic, eight workers, a two second budget per search
//! wharf-sim -t data/port.txt --arrival-rate 0.8 --workers 8 --search-time-limit-ms 2000
//! ```

use clap::Parser;
use std::{path::PathBuf, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wharf_model::{loading::TopologyLoader, topology::PortTopologyBuilder};
use wharf_scheduler::config::SchedulerConfig;
use wharf_sim::{SimOptions, error::SimError, scenario::ScenarioConfig};

/// Wharf port scheduler simulator
#[derive(Parser, Debug)]
#[command(name = "wharf-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Port topology file. Uses a built-in five dock port when omitted.
    #[arg(short = 't', long)]
    topology: Option<PathBuf>,

    /// Number of timesteps to simulate
    #[arg(short = 'n', long, default_value = "50")]
    timesteps: u64,

    /// Random seed for traffic and hidden strings
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Probability of each potential arrival per timestep (0.0-1.0)
    #[arg(long, default_value = "0.4")]
    arrival_rate: f64,

    /// Potential arrivals per timestep
    #[arg(long, default_value = "3")]
    max_arrivals: usize,

    /// Share of arrivals flagged as emergencies (0.0-1.0)
    #[arg(long, default_value = "0.1")]
    emergency_ratio: f64,

    /// Overrides the worker count of the topology
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Maximum number of waiting or docked ships
    #[arg(long, default_value_t = SchedulerConfig::DEFAULT_MAX_LIVE_SHIPS)]
    max_live_ships: usize,

    /// Verdict timeout in milliseconds (0 waits forever)
    #[arg(long, default_value = "5000")]
    verdict_timeout_ms: u64,

    /// Wall-clock budget of one authentication search in milliseconds
    #[arg(long)]
    search_time_limit_ms: Option<u64>,

    /// Candidates between search progress lines (0 disables them)
    #[arg(long, default_value_t = SchedulerConfig::DEFAULT_PROGRESS_LOG_INTERVAL)]
    progress_interval: u64,
}

fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("warn,wharf_sim=info,wharf_scheduler=info")
        }))
        .init();

    let args = Args::parse();

    let topology = match &args.topology {
        Some(path) => {
            let mut loader = TopologyLoader::new();
            if let Some(workers) = args.workers {
                loader = loader.with_worker_override(workers);
            }
            loader.from_path(path)?
        }
        None => {
            let mut builder = PortTopologyBuilder::new(args.workers.unwrap_or(4));
            builder.add_dock(1, [8]);
            builder.add_dock(2, [6, 12]);
            builder.add_dock(2, [10, 10]);
            builder.add_dock(3, [4, 9, 15]);
            builder.add_dock(3, [7, 7, 20]);
            builder.build()?
        }
    };

    let scheduler = SchedulerConfig::builder()
        .max_live_ships(args.max_live_ships)
        .verdict_timeout((args.verdict_timeout_ms > 0).then(|| Duration::from_millis(args.verdict_timeout_ms)))
        .search_time_limit(args.search_time_limit_ms.map(Duration::from_millis))
        .progress_log_interval(args.progress_interval)
        .build()?;

    let options = SimOptions {
        seed: args.seed,
        timesteps: args.timesteps,
        scenario: ScenarioConfig {
            arrival_rate: args.arrival_rate.clamp(0.0, 1.0),
            max_arrivals: args.max_arrivals,
            emergency_ratio: args.emergency_ratio.clamp(0.0, 1.0),
            ..ScenarioConfig::default()
        },
        scheduler,
        completion_timeout: None,
    };

    let report = wharf_sim::run(&topology, &options)?;
    info!(
        releases_verified = report.clock.releases_verified,
        notifications = report.clock.notifications,
        "simulation finished without violations"
    );
    println!("{}", report.statistics);
    Ok(())
}
