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


//! # Wharf Auth
//!
//! Brute-force authentication search against a pool of verifying workers.
//!
//! Before a ship may leave its dock the port has to recover a hidden string
//! of known length. Candidates come from a fixed, deterministic enumeration
//! (`enumerator`) and are handed one at a time, round-robin, to worker
//! threads that can tell whether a guess is right (`worker`, `pool`). The
//! search loop (`authenticator`) is observed and controlled by monitors
//! (`monitor`), which is how time budgets, cancellation and progress logging
//! attach without touching the loop itself.
//!
//! ## Module map
//!
//! - `enumerator`: `CandidateSpace` and the mixed-radix `generate` function.
//! - `protocol`: the messages exchanged with workers.
//! - `worker`: the `Verifier` trait and the worker thread loop.
//! - `pool`: `WorkerPool`, owning worker threads and enforcing verdict timeouts.
//! - `monitor`: search monitors (composite, interrupt, time limit, log, no-op).
//! - `authenticator`: the sequential first-match-wins search driver.
//! - `error`: `AuthError` and `SpaceError`.
//! - `stats`: per-search counters.

pub mod authenticator;
pub mod enumerator;
pub mod error;
pub mod monitor;
pub mod pool;
pub mod protocol;
pub mod stats;
pub mod worker;
