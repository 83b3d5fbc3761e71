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


//! Worker side of the verification protocol.
//!
//! A worker owns a `Verifier`, the only thing that knows the hidden strings,
//! and answers `TryGuess` requests with a `Verdict`. Workers keep no state
//! the search depends on; `begin_search` is merely a hint.
//!
//! `link` creates the two ends of the channels connecting the pool to one
//! worker. The pool keeps the `WorkerEndpoint`; the `WorkerLink` is served
//! either by a thread spawned by the pool or by any other driver.

use crate::protocol::{Verdict, WorkerRequest};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use wharf_model::index::{DockIndex, WorkerIndex};

/// Capacity of a worker's request queue. The search keeps at most one guess
/// outstanding, so the slack only absorbs `BeginSearch` notices.
pub const REQUEST_QUEUE_CAPACITY: usize = 16;

/// Knows whether a candidate is the hidden string of a dock.
pub trait Verifier: Send + 'static {
    /// A search for `dock` is starting.
    fn begin_search(&mut self, _dock: DockIndex) {}

    /// Returns `true` if `candidate` is the hidden string of `dock`.
    fn verify(&mut self, dock: DockIndex, candidate: &str) -> bool;
}

impl<F> Verifier for F
where
    F: FnMut(DockIndex, &str) -> bool + Send + 'static,
{
    #[inline]
    fn verify(&mut self, dock: DockIndex, candidate: &str) -> bool {
        self(dock, candidate)
    }
}

/// The pool's end of a worker connection.
#[derive(Debug)]
pub struct WorkerEndpoint {
    pub(crate) requests: SyncSender<WorkerRequest>,
    pub(crate) verdicts: Receiver<Verdict>,
}

/// The worker's end of a connection.
#[derive(Debug)]
pub struct WorkerLink {
    requests: Receiver<WorkerRequest>,
    verdicts: Sender<Verdict>,
}

/// Creates a connected endpoint/link pair.
pub fn link() -> (WorkerEndpoint, WorkerLink) {
    let (request_tx, request_rx) = mpsc::sync_channel(REQUEST_QUEUE_CAPACITY);
    let (verdict_tx, verdict_rx) = mpsc::channel();
    (
        WorkerEndpoint {
            requests: request_tx,
            verdicts: verdict_rx,
        },
        WorkerLink {
            requests: request_rx,
            verdicts: verdict_tx,
        },
    )
}

impl WorkerLink {
    /// Receives the next request, blocking. `None` once the pool hung up.
    #[inline]
    pub fn recv(&self) -> Option<WorkerRequest> {
        self.requests.recv().ok()
    }

    /// Sends a verdict. Returns `false` once the pool hung up.
    #[inline]
    pub fn send(&self, verdict: Verdict) -> bool {
        self.verdicts.send(verdict).is_ok()
    }

    /// Answers requests with `verifier` until the pool hangs up.
    pub fn serve<V: Verifier>(self, worker: WorkerIndex, mut verifier: V) {
        tracing::trace!(%worker, "worker started");
        while let Some(request) = self.recv() {
            match request {
                WorkerRequest::BeginSearch { dock } => {
                    tracing::trace!(%worker, %dock, "search announced");
                    verifier.begin_search(dock);
                }
                WorkerRequest::TryGuess {
                    sequence,
                    dock,
                    candidate,
                } => {
                    let correct = verifier.verify(dock, &candidate);
                    if !self.send(Verdict {
                        sequence,
                        dock,
                        correct,
                    }) {
                        break;
                    }
                }
            }
        }
        tracing::trace!(%worker, "worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_answers_guesses_and_stops_on_hang_up() {
        let (endpoint, link) = link();
        let handle = std::thread::spawn(move || {
            link.serve(WorkerIndex::new(0), |_dock: DockIndex, candidate: &str| {
                candidate == "575"
            })
        });

        endpoint
            .requests
            .send(WorkerRequest::BeginSearch {
                dock: DockIndex::new(2),
            })
            .unwrap();
        for (sequence, candidate) in [(1, "555"), (2, "575")] {
            endpoint
                .requests
                .send(WorkerRequest::TryGuess {
                    sequence,
                    dock: DockIndex::new(2),
                    candidate: candidate.to_string(),
                })
                .unwrap();
        }

        let first = endpoint.verdicts.recv().unwrap();
        let second = endpoint.verdicts.recv().unwrap();
        assert_eq!((first.sequence, first.correct), (1, false));
        assert_eq!((second.sequence, second.correct), (2, true));
        assert_eq!(second.dock, DockIndex::new(2));

        drop(endpoint);
        handle.join().unwrap();
    }
}
