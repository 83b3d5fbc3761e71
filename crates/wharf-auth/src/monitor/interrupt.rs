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
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use wharf_model::index::WorkerIndex;

/// A search monitor that checks a shared flag to determine whether the
/// search should be interrupted.
#[derive(Debug, Clone)]
pub struct InterruptMonitor {
    stop_flag: Arc<AtomicBool>,
}

impl InterruptMonitor {
    /// The search is terminated once `stop_flag` is set to `true`.
    #[inline]
    pub fn new(stop_flag: Arc<AtomicBool>) -> Self {
        Self { stop_flag }
    }
}

impl SearchMonitor for InterruptMonitor {
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn on_enter_search(&mut self, _target: &SearchTarget) {}
    fn on_candidate(&mut self, _index: u64, _worker: WorkerIndex) {}
    fn on_match(&mut self, _candidate: &str) {}
    fn on_exit_search(&mut self, _statistics: &AuthStatistics) {}

    fn search_command(&self) -> SearchCommand {
        if self.stop_flag.load(Ordering::Relaxed) {
            SearchCommand::Terminate("interrupt signal received".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continues_while_flag_is_clear() {
        let flag = Arc::new(AtomicBool::new(false));
        let monitor = InterruptMonitor::new(Arc::clone(&flag));
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_terminates_once_flag_is_set() {
        let flag = Arc::new(AtomicBool::new(false));
        let monitor = InterruptMonitor::new(Arc::clone(&flag));
        flag.store(true, Ordering::Relaxed);
        assert_eq!(
            monitor.search_command(),
            SearchCommand::Terminate("interrupt signal received".to_string())
        );
    }
}
