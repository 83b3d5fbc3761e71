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


use crate::{
    monitor::search_monitor::{SearchCommand, SearchMonitor, SearchTarget},
    stats::AuthStatistics,
};
use std::time::Instant;
use wharf_model::index::{DockIndex, WorkerIndex};

/// Reports search progress through `tracing` every `interval` candidates.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    interval: u64,
    candidates: u64,
    start_time: Instant,
    target: Option<SearchTarget>,
}

impl LogMonitor {
    /// `interval == 0` disables progress lines; start and end are still logged.
    #[inline]
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            candidates: 0,
            start_time: Instant::now(),
            target: None,
        }
    }

    #[inline]
    fn dock(&self) -> Option<DockIndex> {
        self.target.map(|t| t.dock)
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogMonitor(interval: {})", self.interval)
    }
}

impl SearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, target: &SearchTarget) {
        self.start_time = Instant::now();
        self.candidates = 0;
        self.target = Some(*target);
        tracing::debug!(
            dock = %target.dock,
            length = target.length,
            total = target.total,
            "authentication search started"
        );
    }

    fn on_candidate(&mut self, _index: u64, _worker: WorkerIndex) {
        self.candidates += 1;
        if self.interval != 0 && self.candidates % self.interval == 0 {
            let total = self.target.map_or(0, |t| t.total);
            tracing::debug!(
                dock = ?self.dock(),
                tried = self.candidates,
                total,
                elapsed_ms = self.start_time.elapsed().as_millis() as u64,
                "authentication search progress"
            );
        }
    }

    fn on_match(&mut self, candidate: &str) {
        tracing::debug!(dock = ?self.dock(), candidate, tried = self.candidates, "candidate accepted");
    }

    fn on_exit_search(&mut self, statistics: &AuthStatistics) {
        tracing::debug!(
            dock = ?self.dock(),
            tried = statistics.candidates_tried,
            total = statistics.search_space,
            workers = statistics.workers_used,
            elapsed_ms = statistics.duration.as_millis() as u64,
            "authentication search finished"
        );
    }

    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}
