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
use wharf_model::index::WorkerIndex;

/// A composite monitor that forwards events to all of its monitors.
/// The first monitor asking to terminate decides the reason.
pub struct CompositeMonitor<'a> {
    monitors: Vec<Box<dyn SearchMonitor + 'a>>,
}

impl std::fmt::Debug for CompositeMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self
            .monitors
            .iter()
            .map(|m| m.name())
            .collect::<Vec<&str>>()
            .join(", ");

        f.debug_struct("CompositeMonitor")
            .field("monitors", &names)
            .finish()
    }
}

impl Default for CompositeMonitor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CompositeMonitor<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SearchMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl SearchMonitor for CompositeMonitor<'_> {
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_search(&mut self, target: &SearchTarget) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(target);
        }
    }

    fn on_candidate(&mut self, index: u64, worker: WorkerIndex) {
        for monitor in &mut self.monitors {
            monitor.on_candidate(index, worker);
        }
    }

    fn on_match(&mut self, candidate: &str) {
        for monitor in &mut self.monitors {
            monitor.on_match(candidate);
        }
    }

    fn on_exit_search(&mut self, statistics: &AuthStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    fn search_command(&self) -> SearchCommand {
        self.monitors
            .iter()
            .map(|m| m.search_command())
            .find(|c| matches!(c, SearchCommand::Terminate(_)))
            .unwrap_or(SearchCommand::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{interrupt::InterruptMonitor, no_op::NoOpMonitor};
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };
    use wharf_model::index::DockIndex;

    struct Counting<'c> {
        candidates: &'c mut u64,
    }

    impl SearchMonitor for Counting<'_> {
        fn name(&self) -> &str {
            "Counting"
        }
        fn on_enter_search(&mut self, _target: &SearchTarget) {}
        fn on_candidate(&mut self, _index: u64, _worker: WorkerIndex) {
            *self.candidates += 1;
        }
        fn on_match(&mut self, _candidate: &str) {}
        fn on_exit_search(&mut self, _statistics: &AuthStatistics) {}
        fn search_command(&self) -> SearchCommand {
            SearchCommand::Continue
        }
    }

    #[test]
    fn test_forwards_events_to_every_monitor() {
        let mut first = 0;
        let mut second = 0;
        {
            let mut composite = CompositeMonitor::with_capacity(2);
            composite.add_monitor(Counting {
                candidates: &mut first,
            });
            composite.add_monitor(Counting {
                candidates: &mut second,
            });
            assert_eq!(composite.len(), 2);

            composite.on_enter_search(&SearchTarget {
                dock: DockIndex::new(0),
                length: 1,
                total: 5,
            });
            composite.on_candidate(0, WorkerIndex::new(0));
            composite.on_candidate(1, WorkerIndex::new(1));
        }
        assert_eq!((first, second), (2, 2));
    }

    #[test]
    fn test_any_terminate_wins() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut composite = CompositeMonitor::new();
        composite.add_monitor(NoOpMonitor::new());
        composite.add_monitor(InterruptMonitor::new(Arc::clone(&flag)));
        assert_eq!(composite.search_command(), SearchCommand::Continue);

        flag.store(true, Ordering::Relaxed);
        assert_eq!(
            composite.search_command(),
            SearchCommand::Terminate("interrupt signal received".to_string())
        );
    }

    #[test]
    fn test_debug_lists_monitor_names() {
        let mut composite = CompositeMonitor::new();
        composite.add_monitor(NoOpMonitor::new());
        assert!(format!("{:?}", composite).contains("NoOpMonitor"));
    }
}
