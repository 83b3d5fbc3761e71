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


//! # Worker Pool
//!
//! Owns the connections to the verification workers and implements the
//! coordinator's side of the protocol.
//!
//! ## Highlights
//!
//! - `spawn` starts one OS thread per worker with a verifier built by a
//!   factory; `from_endpoints` wraps workers driven elsewhere.
//! - `announce` delivers `BeginSearch` with `try_send` and silently drops the
//!   notice when a worker's queue is full or closed.
//! - `try_guess` sends one candidate and waits for the matching verdict,
//!   bounded by the verdict timeout. Verdicts with an older sequence number
//!   are discarded; a verdict for another dock is a protocol violation.
//! - Dropping the pool hangs up on every worker and joins the threads it
//!   spawned.

use crate::{
    error::AuthError,
    protocol::WorkerRequest,
    worker::{self, Verifier, WorkerEndpoint},
};
use std::{
    sync::mpsc::{RecvTimeoutError, TrySendError},
    thread::JoinHandle,
    time::{Duration, Instant},
};
use wharf_model::index::{DockIndex, WorkerIndex};

#[derive(Debug)]
struct WorkerHandle {
    endpoint: WorkerEndpoint,
    thread: Option<JoinHandle<()>>,
}

#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
    verdict_timeout: Option<Duration>,
    next_sequence: u64,
}

impl WorkerPool {
    /// Spawns `num_workers` worker threads. `factory` builds the verifier of
    /// each worker.
    pub fn spawn<F, V>(
        num_workers: usize,
        verdict_timeout: Option<Duration>,
        mut factory: F,
    ) -> std::io::Result<Self>
    where
        F: FnMut(WorkerIndex) -> V,
        V: Verifier,
    {
        let mut workers = Vec::with_capacity(num_workers);
        for index in WorkerIndex::range(num_workers) {
            let (endpoint, link) = worker::link();
            let verifier = factory(index);
            let thread = std::thread::Builder::new()
                .name(format!("wharf-worker-{}", index.get()))
                .spawn(move || link.serve(index, verifier))?;
            workers.push(WorkerHandle {
                endpoint,
                thread: Some(thread),
            });
        }

        Ok(Self {
            workers,
            verdict_timeout,
            next_sequence: 0,
        })
    }

    /// Wraps already connected workers.
    pub fn from_endpoints<I>(endpoints: I, verdict_timeout: Option<Duration>) -> Self
    where
        I: IntoIterator<Item = WorkerEndpoint>,
    {
        Self {
            workers: endpoints
                .into_iter()
                .map(|endpoint| WorkerHandle {
                    endpoint,
                    thread: None,
                })
                .collect(),
            verdict_timeout,
            next_sequence: 0,
        }
    }

    #[inline]
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    #[inline]
    pub fn verdict_timeout(&self) -> Option<Duration> {
        self.verdict_timeout
    }

    #[inline]
    pub fn set_verdict_timeout(&mut self, verdict_timeout: Option<Duration>) {
        self.verdict_timeout = verdict_timeout;
    }

    /// Tells every worker that a search for `dock` begins. Never blocks.
    /// Returns how many notices were delivered.
    pub fn announce(&self, dock: DockIndex) -> usize {
        let mut delivered = 0;
        for (i, handle) in self.workers.iter().enumerate() {
            match handle
                .endpoint
                .requests
                .try_send(WorkerRequest::BeginSearch { dock })
            {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                    tracing::trace!(worker = %WorkerIndex::new(i), %dock, "search notice dropped");
                }
            }
        }
        delivered
    }

    /// Asks `worker` whether `candidate` is the hidden string of `dock` and
    /// waits for its verdict.
    ///
    /// # Panics
    ///
    /// Panics if `worker` is not in `0..num_workers()`.
    pub fn try_guess(
        &mut self,
        worker: WorkerIndex,
        dock: DockIndex,
        candidate: &str,
    ) -> Result<bool, AuthError> {
        assert!(
            worker.get() < self.workers.len(),
            "called `WorkerPool::try_guess` with worker index out of bounds: the len is {} but the index is {}",
            self.workers.len(),
            worker.get()
        );

        self.next_sequence += 1;
        let sequence = self.next_sequence;
        let timeout = self.verdict_timeout;
        let endpoint = &self.workers[worker.get()].endpoint;

        let request = WorkerRequest::TryGuess {
            sequence,
            dock,
            candidate: candidate.to_owned(),
        };
        match endpoint.requests.try_send(request) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                return Err(AuthError::WorkerUnreachable {
                    worker,
                    dock,
                    timeout: timeout.unwrap_or_default(),
                });
            }
            Err(TrySendError::Disconnected(_)) => {
                return Err(AuthError::WorkerDisconnected { worker });
            }
        }

        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            let received = match deadline {
                Some(deadline) => endpoint
                    .verdicts
                    .recv_timeout(deadline.saturating_duration_since(Instant::now())),
                None => endpoint
                    .verdicts
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(verdict) if verdict.sequence != sequence => {
                    tracing::trace!(%worker, stale = verdict.sequence, current = sequence, "discarding stale verdict");
                }
                Ok(verdict) if verdict.dock != dock => {
                    return Err(AuthError::UnexpectedVerdict {
                        worker,
                        expected: dock,
                        received: verdict.dock,
                    });
                }
                Ok(verdict) => return Ok(verdict.correct),
                Err(RecvTimeoutError::Timeout) => {
                    return Err(AuthError::WorkerUnreachable {
                        worker,
                        dock,
                        timeout: timeout.unwrap_or_default(),
                    });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(AuthError::WorkerDisconnected { worker });
                }
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for handle in self.workers.drain(..) {
            let WorkerHandle { endpoint, thread } = handle;
            drop(endpoint);
            if let Some(thread) = thread {
                if thread.join().is_err() {
                    tracing::warn!("worker thread panicked");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Verdict;
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    };

    #[test]
    fn test_guesses_are_routed_to_the_requested_worker() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut pool = WorkerPool::spawn(3, Some(Duration::from_secs(5)), |index| {
            let seen = Arc::clone(&seen);
            move |dock: DockIndex, candidate: &str| {
                seen.lock().unwrap().push((index, dock, candidate.to_string()));
                candidate == "77"
            }
        })
        .unwrap();

        assert_eq!(pool.num_workers(), 3);
        assert!(!pool.try_guess(WorkerIndex::new(2), DockIndex::new(1), "55").unwrap());
        assert!(pool.try_guess(WorkerIndex::new(0), DockIndex::new(1), "77").unwrap());

        let seen = seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                (WorkerIndex::new(2), DockIndex::new(1), "55".to_string()),
                (WorkerIndex::new(0), DockIndex::new(1), "77".to_string()),
            ]
        );
    }

    #[test]
    fn test_announce_reaches_every_worker() {
        let pool = WorkerPool::spawn(4, None, |_| |_: DockIndex, _: &str| false).unwrap();
        assert_eq!(pool.announce(DockIndex::new(0)), 4);
    }

    #[test]
    fn test_slow_worker_times_out_and_late_verdict_is_discarded() {
        let first_call = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&first_call);
        let mut pool = WorkerPool::spawn(1, Some(Duration::from_millis(30)), move |_| {
            let flag = Arc::clone(&flag);
            move |_: DockIndex, candidate: &str| {
                if flag.swap(false, Ordering::SeqCst) {
                    std::thread::sleep(Duration::from_millis(150));
                }
                candidate == "9"
            }
        })
        .unwrap();

        match pool.try_guess(WorkerIndex::new(0), DockIndex::new(0), "9") {
            Err(AuthError::WorkerUnreachable { worker, dock, .. }) => {
                assert_eq!(worker, WorkerIndex::new(0));
                assert_eq!(dock, DockIndex::new(0));
            }
            other => panic!("expected timeout, got {:?}", other),
        }

        // The late `true` for the first guess must not be taken as the answer
        // to this one.
        pool.set_verdict_timeout(Some(Duration::from_secs(5)));
        assert!(!pool.try_guess(WorkerIndex::new(0), DockIndex::new(0), "5").unwrap());
    }

    #[test]
    fn test_verdict_for_another_dock_is_rejected() {
        let (endpoint, link) = worker::link();
        let responder = std::thread::spawn(move || {
            while let Some(request) = link.recv() {
                if let WorkerRequest::TryGuess { sequence, .. } = request {
                    link.send(Verdict {
                        sequence,
                        dock: DockIndex::new(9),
                        correct: true,
                    });
                }
            }
        });

        let mut pool = WorkerPool::from_endpoints([endpoint], Some(Duration::from_secs(5)));
        assert_eq!(
            pool.try_guess(WorkerIndex::new(0), DockIndex::new(1), "5"),
            Err(AuthError::UnexpectedVerdict {
                worker: WorkerIndex::new(0),
                expected: DockIndex::new(1),
                received: DockIndex::new(9),
            })
        );

        drop(pool);
        responder.join().unwrap();
    }

    #[test]
    fn test_hung_up_worker_is_reported() {
        let (endpoint, link) = worker::link();
        drop(link);
        let mut pool = WorkerPool::from_endpoints([endpoint], None);
        assert_eq!(
            pool.try_guess(WorkerIndex::new(0), DockIndex::new(0), "5"),
            Err(AuthError::WorkerDisconnected {
                worker: WorkerIndex::new(0)
            })
        );
        assert_eq!(pool.announce(DockIndex::new(0)), 0);
    }
}
