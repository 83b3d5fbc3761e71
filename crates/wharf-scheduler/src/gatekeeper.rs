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


//! # Gatekeeper
//!
//! Decides whether a docked ship whose cargo is done may leave. A ship is
//! released only once the hidden string guarding its dock is recovered. The
//! string is `L = last cargo timestep - docked timestep` symbols long, so a
//! ship that never had a cargo event (or had one in its docking timestep)
//! is never ready.
//!
//! Each attempt runs a full search from the first candidate. Nothing is
//! remembered between attempts; an unsolved ship simply tries again on the
//! next timestep.
//!
//! The search is controlled by a monitor stack of an interrupt flag, an
//! optional wall-clock budget and a progress logger. Retryable failures
//! (an unresponsive worker, a search space too large to enumerate) deny
//! the release; fatal failures are propagated.

use crate::{config::SchedulerConfig, error::SchedulerError, staging::StagingArea};
use std::{
    sync::{Arc, atomic::AtomicBool},
    time::Duration,
};
use wharf_auth::{
    authenticator::{AuthResult, Authenticator},
    error::AuthError,
    monitor::{
        composite::CompositeMonitor, interrupt::InterruptMonitor, log::LogMonitor,
        time_limit::TimeLimitMonitor,
    },
    pool::WorkerPool,
    stats::AuthStatistics,
};
use wharf_core::num::PortNumeric;
use wharf_model::ship::Ship;

/// Why a release was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The ship already authenticated.
    AlreadyAuthenticated,
    /// The ship is not docked or its string would be empty.
    NotReady,
    /// Every candidate was rejected.
    Unsolved(AuthStatistics),
    /// A monitor stopped the search.
    Aborted {
        reason: String,
        statistics: AuthStatistics,
    },
    /// The search failed in a way that may clear up later.
    Retry(AuthError),
}

impl Denial {
    /// Returns `true` if a search was started.
    #[inline]
    pub fn searched(&self) -> bool {
        matches!(
            self,
            Denial::Unsolved(_) | Denial::Aborted { .. } | Denial::Retry(_)
        )
    }

    #[inline]
    pub fn statistics(&self) -> Option<&AuthStatistics> {
        match self {
            Denial::Unsolved(statistics) | Denial::Aborted { statistics, .. } => Some(statistics),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clearance {
    Granted {
        auth_string: String,
        statistics: AuthStatistics,
    },
    Denied(Denial),
}

impl Clearance {
    #[inline]
    pub fn is_granted(&self) -> bool {
        matches!(self, Clearance::Granted { .. })
    }
}

#[derive(Debug)]
pub struct Gatekeeper {
    authenticator: Authenticator,
    interrupt: Arc<AtomicBool>,
    search_time_limit: Option<Duration>,
    progress_log_interval: u64,
}

impl Gatekeeper {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            authenticator: Authenticator::new(),
            interrupt: Arc::new(AtomicBool::new(false)),
            search_time_limit: config.search_time_limit(),
            progress_log_interval: config.progress_log_interval(),
        }
    }

    /// The flag that cancels a running search when set.
    #[inline]
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Runs the authentication search for `ship`. On success the recovered
    /// string is published under the ship's dock and the ship is marked
    /// authenticated; releasing it is left to the caller.
    pub fn authenticate<T, S>(
        &mut self,
        pool: &mut WorkerPool,
        staging: &mut S,
        ship: &mut Ship<T>,
    ) -> Result<Clearance, SchedulerError>
    where
        T: PortNumeric,
        S: StagingArea<T> + ?Sized,
    {
        if ship.is_authenticated() {
            return Ok(Clearance::Denied(Denial::AlreadyAuthenticated));
        }
        let Some(dock) = ship.dock().filter(|_| ship.is_docked()) else {
            return Ok(Clearance::Denied(Denial::NotReady));
        };

        let length = ship.auth_length();
        if length <= T::zero() {
            tracing::trace!(ship = %ship.id(), %length, "no authentication window yet");
            return Ok(Clearance::Denied(Denial::NotReady));
        }
        let length = length.to_usize().unwrap_or(usize::MAX);

        let mut monitor = CompositeMonitor::with_capacity(3);
        monitor.add_monitor(InterruptMonitor::new(Arc::clone(&self.interrupt)));
        if let Some(limit) = self.search_time_limit {
            monitor.add_monitor(TimeLimitMonitor::new(limit));
        }
        monitor.add_monitor(LogMonitor::new(self.progress_log_interval));

        let outcome = match self.authenticator.search(pool, dock, length, &mut monitor) {
            Ok(outcome) => outcome,
            Err(err) if err.is_retryable() => {
                tracing::warn!(ship = %ship.id(), %dock, length, error = %err, "authentication will be retried");
                return Ok(Clearance::Denied(Denial::Retry(err)));
            }
            Err(err) => return Err(err.into()),
        };

        match outcome.result {
            AuthResult::Found { candidate, .. } => {
                staging.publish_auth_string(dock, &candidate)?;
                ship.mark_authenticated();
                tracing::debug!(
                    ship = %ship.id(),
                    %dock,
                    tried = outcome.statistics.candidates_tried,
                    "authentication string recovered"
                );
                Ok(Clearance::Granted {
                    auth_string: candidate,
                    statistics: outcome.statistics,
                })
            }
            AuthResult::Exhausted => {
                tracing::debug!(ship = %ship.id(), %dock, length, "candidate space exhausted");
                Ok(Clearance::Denied(Denial::Unsolved(outcome.statistics)))
            }
            AuthResult::Aborted(reason) => {
                tracing::debug!(ship = %ship.id(), %dock, %reason, "authentication aborted");
                Ok(Clearance::Denied(Denial::Aborted {
                    reason,
                    statistics: outcome.statistics,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::StagingRecord;
    use std::sync::atomic::Ordering;
    use wharf_auth::enumerator::CandidateSpace;
    use wharf_model::{
        index::DockIndex,
        ship::{Direction, ShipId, ShipRequest},
    };

    type IntegerType = i64;

    fn ship_with_window(cargo: Vec<u32>, docked: IntegerType, last: IntegerType) -> Ship<IntegerType> {
        let mut ship = Ship::from_request(ShipRequest {
            ship_id: ShipId(3),
            direction: Direction::Arriving,
            category: 1,
            emergency: false,
            arrival: 0,
            waiting_budget: 10,
            cargo,
        });
        ship.moor(DockIndex::new(1), docked);
        for _ in 0..ship.cargo().len() {
            ship.record_cargo(last);
        }
        ship
    }

    fn pool(secret: &'static str) -> WorkerPool {
        WorkerPool::spawn(2, Some(Duration::from_secs(5)), move |_| {
            move |_: DockIndex, candidate: &str| candidate == secret
        })
        .unwrap()
    }

    #[test]
    fn test_recovers_and_publishes_the_string() {
        let mut gatekeeper = Gatekeeper::new(&SchedulerConfig::default());
        let mut staging = StagingRecord::<IntegerType>::new(2);
        let mut pool = pool("8.6");
        let mut ship = ship_with_window(vec![1], 2, 5);

        let clearance = gatekeeper
            .authenticate(&mut pool, &mut staging, &mut ship)
            .unwrap();

        let space = CandidateSpace::new(3).unwrap();
        match clearance {
            Clearance::Granted {
                auth_string,
                statistics,
            } => {
                assert_eq!(auth_string, "8.6");
                assert_eq!(
                    statistics.candidates_tried,
                    space.index_of("8.6").unwrap() + 1
                );
            }
            other => panic!("expected a granted release, got {:?}", other),
        }
        assert!(ship.is_authenticated());
        assert_eq!(staging.auth_string(DockIndex::new(1)), Some("8.6"));

        assert_eq!(
            gatekeeper.authenticate(&mut pool, &mut staging, &mut ship),
            Ok(Clearance::Denied(Denial::AlreadyAuthenticated))
        );
    }

    #[test]
    fn test_empty_window_is_not_ready() {
        let mut gatekeeper = Gatekeeper::new(&SchedulerConfig::default());
        let mut staging = StagingRecord::<IntegerType>::new(2);
        let mut pool = pool("5");

        let mut no_cargo = ship_with_window(Vec::new(), 4, 0);
        assert_eq!(
            gatekeeper.authenticate(&mut pool, &mut staging, &mut no_cargo),
            Ok(Clearance::Denied(Denial::NotReady))
        );
        assert!(!no_cargo.is_authenticated());
    }

    #[test]
    fn test_unknown_string_leaves_the_ship_unsolved() {
        let mut gatekeeper = Gatekeeper::new(&SchedulerConfig::default());
        let mut staging = StagingRecord::<IntegerType>::new(2);
        let mut pool = pool("not a candidate");
        let mut ship = ship_with_window(vec![1], 0, 1);

        match gatekeeper
            .authenticate(&mut pool, &mut staging, &mut ship)
            .unwrap()
        {
            Clearance::Denied(denial @ Denial::Unsolved(_)) => {
                assert!(denial.searched());
                assert_eq!(denial.statistics().map(|s| s.candidates_tried), Some(5));
            }
            other => panic!("expected an unsolved search, got {:?}", other),
        }
        assert_eq!(staging.auth_string(DockIndex::new(1)), None);
    }

    #[test]
    fn test_interrupt_aborts_the_search() {
        let mut gatekeeper = Gatekeeper::new(&SchedulerConfig::default());
        gatekeeper.interrupt_handle().store(true, Ordering::Relaxed);
        let mut staging = StagingRecord::<IntegerType>::new(2);
        let mut pool = pool("5");
        let mut ship = ship_with_window(vec![1], 0, 1);

        let clearance = gatekeeper
            .authenticate(&mut pool, &mut staging, &mut ship)
            .unwrap();
        assert!(matches!(
            clearance,
            Clearance::Denied(Denial::Aborted { .. })
        ));
        assert!(!clearance.is_granted());
    }

    #[test]
    fn test_unresponsive_worker_is_retryable() {
        let config = SchedulerConfig::builder()
            .verdict_timeout(Some(Duration::from_millis(20)))
            .build()
            .unwrap();
        let mut gatekeeper = Gatekeeper::new(&config);
        let mut staging = StagingRecord::<IntegerType>::new(2);
        let mut pool = WorkerPool::spawn(1, config.verdict_timeout(), |_| {
            |_: DockIndex, _: &str| {
                std::thread::sleep(Duration::from_millis(200));
                true
            }
        })
        .unwrap();
        let mut ship = ship_with_window(vec![1], 0, 1);

        match gatekeeper
            .authenticate(&mut pool, &mut staging, &mut ship)
            .unwrap()
        {
            Clearance::Denied(Denial::Retry(AuthError::WorkerUnreachable { .. })) => {}
            other => panic!("expected a retry, got {:?}", other),
        }
        assert!(!ship.is_authenticated());
    }

    #[test]
    fn test_hung_up_worker_is_fatal() {
        let mut gatekeeper = Gatekeeper::new(&SchedulerConfig::default());
        let mut staging = StagingRecord::<IntegerType>::new(2);
        let (endpoint, link) = wharf_auth::worker::link();
        drop(link);
        let mut pool = WorkerPool::from_endpoints([endpoint], None);
        let mut ship = ship_with_window(vec![1], 0, 1);

        let err = gatekeeper
            .authenticate(&mut pool, &mut staging, &mut ship)
            .unwrap_err();
        assert!(!err.is_retryable());
    }
}
