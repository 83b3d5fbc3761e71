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


//! # Time Limit Monitor
//!
//! Caps the wall-clock time a single authentication search may take. Reading
//! the clock for every candidate is wasteful when a verdict arrives in
//! microseconds, so the elapsed time is only checked when
//! `(candidates & clock_check_mask) == 0`. The default mask (`0xFF`) checks
//! every 256 candidates; the first candidate is always checked.
//!
//! A terminated search is not a failure of the port: the ship stays docked
//! and the search starts over from the first candidate on a later timestep.

use crate::{
    monitor::search_monitor::{SearchCommand, SearchMonitor, SearchTarget},
    stats::AuthStatistics,
};
use std::time::{Duration, Instant};
use wharf_model::index::WorkerIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor {
    clock_check_mask: u64,
    candidates: u64,
    time_limit: Duration,
    start_time: Instant,
}

impl TimeLimitMonitor {
    const DEFAULT_CLOCK_CHECK_MASK: u64 = 0xFF;

    #[inline]
    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_CLOCK_CHECK_MASK)
    }

    #[inline]
    pub fn with_clock_check_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            clock_check_mask,
            candidates: 0,
            time_limit,
            start_time: Instant::now(),
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl SearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _target: &SearchTarget) {
        self.start_time = Instant::now();
        self.candidates = 0;
    }

    #[inline(always)]
    fn on_candidate(&mut self, _index: u64, _worker: WorkerIndex) {
        self.candidates = self.candidates.wrapping_add(1);
    }

    fn on_match(&mut self, _candidate: &str) {}
    fn on_exit_search(&mut self, _statistics: &AuthStatistics) {}

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if (self.candidates & self.clock_check_mask) == 0
            && self.start_time.elapsed() >= self.time_limit
        {
            return SearchCommand::Terminate("time limit reached".to_string());
        }
        SearchCommand::Continue
    }
}
