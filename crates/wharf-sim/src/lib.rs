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


//! # Wharf Sim
//!
//! A harness playing every external party of the port: the clock that
//! drives timesteps, the shared staging record, and the workers that know
//! the hidden strings. Traffic and secrets are derived from one seed, and
//! every notification is checked against an independent model of the port.
//!
//! The coordinator runs on the calling thread; the clock runs on its own
//! thread and talks to it through a channel transport.

pub mod checker;
pub mod clock;
pub mod error;
pub mod scenario;
pub mod secrets;

use crate::{
    checker::InvariantChecker,
    clock::{Clock, ClockSummary},
    error::SimError,
    scenario::{ArrivalGenerator, ScenarioConfig},
    secrets::SecretBook,
};
use std::time::Duration;
use wharf_auth::pool::WorkerPool;
use wharf_model::topology::PortTopology;
use wharf_scheduler::{
    config::SchedulerConfig,
    context::PortContext,
    coordinator::Coordinator,
    staging::SharedStaging,
    stats::SchedulerStatistics,
    transport::channel_pair,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SimOptions {
    pub seed: u64,
    pub timesteps: u64,
    pub scenario: ScenarioConfig,
    pub scheduler: SchedulerConfig,
    /// Bounds the clock's wait for each notification. `None` waits forever.
    pub completion_timeout: Option<Duration>,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            timesteps: 50,
            scenario: ScenarioConfig::default(),
            scheduler: SchedulerConfig::default(),
            completion_timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimReport {
    pub statistics: SchedulerStatistics,
    pub clock: ClockSummary,
}

/// Runs one simulation of `topology`.
pub fn run(topology: &PortTopology, options: &SimOptions) -> Result<SimReport, SimError> {
    let staging = SharedStaging::<i64>::new(topology.num_docks());
    let secrets = SecretBook::new(options.seed ^ 0x5ec7e7);
    let (transport, link) = channel_pair();

    let book = secrets.clone();
    let pool = WorkerPool::spawn(
        topology.num_workers(),
        options.scheduler.verdict_timeout(),
        move |worker| book.verifier(worker),
    )?;

    let clock = Clock::new(
        link,
        staging.clone(),
        secrets,
        ArrivalGenerator::new(options.seed, options.scenario),
        InvariantChecker::new(topology),
    )
    .with_completion_timeout(options.completion_timeout);
    let timesteps = options.timesteps;
    let clock = std::thread::Builder::new()
        .name("wharf-clock".to_string())
        .spawn(move || clock.run(timesteps))?;

    tracing::info!(
        seed = options.seed,
        timesteps,
        docks = topology.num_docks(),
        workers = topology.num_workers(),
        "simulation started"
    );

    let mut coordinator = Coordinator::new(
        topology,
        PortContext::new(transport, staging, pool),
        options.scheduler,
    );
    let outcome = coordinator.run();
    // Hanging up lets a waiting clock observe the end of the run.
    drop(coordinator);

    // A clock failure explains a coordinator that lost its transport, so it
    // is reported first.
    let summary = clock.join().map_err(|_| SimError::ClockPanicked)??;
    let statistics = outcome?;

    Ok(SimReport {
        statistics,
        clock: summary,
    })
}
