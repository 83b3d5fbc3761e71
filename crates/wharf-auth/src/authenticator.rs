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


//! # Authenticator
//!
//! Drives one brute-force search for the hidden string of a dock. Candidates
//! are visited in enumeration order and candidate `i` is always sent to
//! worker `i mod n`, so a search is fully determined by the hidden string,
//! its length and the number of workers. The search is sequential: exactly
//! one guess is outstanding at any time and the first accepted candidate
//! ends the search.
//!
//! Monitors are consulted before every candidate. A monitor asking to
//! terminate ends the search with `AuthResult::Aborted`; the caller decides
//! whether to try again later.

use crate::{
    enumerator::CandidateSpace,
    error::AuthError,
    monitor::search_monitor::{SearchCommand, SearchMonitor, SearchTarget},
    pool::WorkerPool,
    stats::{AuthStatistics, AuthStatisticsBuilder},
};
use std::time::Instant;
use wharf_model::index::{DockIndex, WorkerIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    /// A worker accepted `candidate`, the `index`-th member of the space.
    Found {
        candidate: String,
        index: u64,
        worker: WorkerIndex,
    },
    /// Every candidate was rejected.
    Exhausted,
    /// A monitor stopped the search. The string names the reason.
    Aborted(String),
}

impl std::fmt::Display for AuthResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthResult::Found {
                candidate, worker, ..
            } => write!(f, "Found({} by {})", candidate, worker),
            AuthResult::Exhausted => write!(f, "Exhausted"),
            AuthResult::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub result: AuthResult,
    pub statistics: AuthStatistics,
}

impl AuthOutcome {
    #[inline]
    pub fn new(result: AuthResult, statistics: AuthStatistics) -> Self {
        Self { result, statistics }
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self.result, AuthResult::Found { .. })
    }

    /// The accepted candidate, if any.
    #[inline]
    pub fn candidate(&self) -> Option<&str> {
        match &self.result {
            AuthResult::Found { candidate, .. } => Some(candidate),
            _ => None,
        }
    }
}

/// Reusable search driver. Keeps a scratch buffer so that candidates are not
/// allocated one by one.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    buffer: String,
}

impl Authenticator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches the hidden string of `dock`, which is `length` symbols long.
    pub fn search(
        &mut self,
        pool: &mut WorkerPool,
        dock: DockIndex,
        length: usize,
        monitor: &mut dyn SearchMonitor,
    ) -> Result<AuthOutcome, AuthError> {
        if pool.is_empty() {
            return Err(AuthError::NoWorkers);
        }
        let space = CandidateSpace::new(length)?;
        let num_workers = pool.num_workers();
        let start = Instant::now();

        monitor.on_enter_search(&SearchTarget {
            dock,
            length,
            total: space.total(),
        });
        pool.announce(dock);

        let mut tried: u64 = 0;
        let mut result = AuthResult::Exhausted;
        let mut failure = None;

        for index in 0..space.total() {
            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                result = AuthResult::Aborted(reason);
                break;
            }

            let worker = WorkerIndex::new((index % num_workers as u64) as usize);
            space.write_candidate(index, &mut self.buffer);
            monitor.on_candidate(index, worker);
            tried += 1;

            match pool.try_guess(worker, dock, &self.buffer) {
                Ok(true) => {
                    monitor.on_match(&self.buffer);
                    result = AuthResult::Found {
                        candidate: self.buffer.clone(),
                        index,
                        worker,
                    };
                    break;
                }
                Ok(false) => {}
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        let statistics = AuthStatisticsBuilder::new()
            .candidates_tried(tried)
            .search_space(space.total())
            .workers_used(tried.min(num_workers as u64) as usize)
            .duration(start.elapsed())
            .build();
        monitor.on_exit_search(&statistics);

        match failure {
            Some(err) => Err(err),
            None => Ok(AuthOutcome::new(result, statistics)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{
        interrupt::InterruptMonitor, no_op::NoOpMonitor, time_limit::TimeLimitMonitor,
    };
    use std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    };

    fn pool_accepting(num_workers: usize, secret: &'static str) -> WorkerPool {
        WorkerPool::spawn(num_workers, Some(Duration::from_secs(5)), move |_| {
            move |_: DockIndex, candidate: &str| candidate == secret
        })
        .unwrap()
    }

    #[test]
    fn test_finds_hidden_string_at_its_enumeration_index() {
        let space = CandidateSpace::new(3).unwrap();
        let secret = "9.7";
        let expected_index = space.index_of(secret).unwrap();

        let mut pool = pool_accepting(4, secret);
        let outcome = Authenticator::new()
            .search(&mut pool, DockIndex::new(2), 3, &mut NoOpMonitor::new())
            .unwrap();

        assert_eq!(
            outcome.result,
            AuthResult::Found {
                candidate: secret.to_string(),
                index: expected_index,
                worker: WorkerIndex::new((expected_index % 4) as usize),
            }
        );
        assert_eq!(outcome.statistics.candidates_tried, expected_index + 1);
        assert_eq!(outcome.statistics.search_space, 150);
        assert_eq!(outcome.candidate(), Some(secret));
    }

    #[test]
    fn test_every_candidate_is_tried_once_round_robin() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut pool = WorkerPool::spawn(3, Some(Duration::from_secs(5)), |index| {
            let seen = Arc::clone(&seen);
            move |_: DockIndex, candidate: &str| {
                seen.lock().unwrap().push((index, candidate.to_string()));
                false
            }
        })
        .unwrap();

        let outcome = Authenticator::new()
            .search(&mut pool, DockIndex::new(0), 2, &mut NoOpMonitor::new())
            .unwrap();
        assert_eq!(outcome.result, AuthResult::Exhausted);
        assert_eq!(outcome.statistics.candidates_tried, 25);
        assert_eq!(outcome.statistics.workers_used, 3);

        let space = CandidateSpace::new(2).unwrap();
        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 25);
        for (i, (worker, candidate)) in seen.iter().enumerate() {
            assert_eq!(worker.get(), i % 3);
            assert_eq!(*candidate, space.candidate(i as u64));
        }
    }

    #[test]
    fn test_single_worker_receives_everything() {
        let mut pool = pool_accepting(1, "8");
        let outcome = Authenticator::new()
            .search(&mut pool, DockIndex::new(0), 1, &mut NoOpMonitor::new())
            .unwrap();
        assert!(outcome.is_found());
        assert_eq!(outcome.statistics.workers_used, 1);
    }

    #[test]
    fn test_interrupt_aborts_before_first_candidate() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut monitor = InterruptMonitor::new(Arc::clone(&flag));
        let mut pool = pool_accepting(2, "55");

        let outcome = Authenticator::new()
            .search(&mut pool, DockIndex::new(0), 2, &mut monitor)
            .unwrap();
        assert_eq!(
            outcome.result,
            AuthResult::Aborted("interrupt signal received".to_string())
        );
        assert_eq!(outcome.statistics.candidates_tried, 0);
        flag.store(false, Ordering::Relaxed);
    }

    #[test]
    fn test_exhausted_time_budget_aborts() {
        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0);
        let mut pool = pool_accepting(2, "99");
        let outcome = Authenticator::new()
            .search(&mut pool, DockIndex::new(0), 2, &mut monitor)
            .unwrap();
        assert!(matches!(outcome.result, AuthResult::Aborted(_)));
        assert!(!outcome.is_found());
    }

    #[test]
    fn test_empty_pool_and_bad_lengths_are_errors() {
        let mut empty = WorkerPool::from_endpoints(Vec::new(), None);
        assert_eq!(
            Authenticator::new().search(&mut empty, DockIndex::new(0), 2, &mut NoOpMonitor::new()),
            Err(AuthError::NoWorkers)
        );

        let mut pool = pool_accepting(1, "5");
        assert_eq!(
            Authenticator::new().search(&mut pool, DockIndex::new(0), 0, &mut NoOpMonitor::new()),
            Err(AuthError::Space(crate::error::SpaceError::EmptyLength))
        );
    }

    #[test]
    fn test_unresponsive_worker_fails_the_search() {
        let mut pool = WorkerPool::spawn(1, Some(Duration::from_millis(20)), |_| {
            |_: DockIndex, _: &str| {
                std::thread::sleep(Duration::from_millis(200));
                false
            }
        })
        .unwrap();
        let err = Authenticator::new()
            .search(&mut pool, DockIndex::new(1), 1, &mut NoOpMonitor::new())
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
