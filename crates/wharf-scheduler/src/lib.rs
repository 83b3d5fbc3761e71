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


//! # Wharf Scheduler
//!
//! The timestep coordinator of the port. Once per `Advance` it ingests new
//! ships, allocates docks (emergencies first), dispatches cargo to cranes
//! and releases ships whose authentication string was recovered by the
//! worker pool.
//!
//! ## Module map
//!
//! - `event`: `Advance` and `Notification`, the clock protocol.
//! - `transport`: the `EventSource` and `NotificationSink` seams with channel
//!   and in-memory implementations.
//! - `staging`: the shared record of new arrivals and recovered strings.
//! - `allocator`: first-fit dock assignment.
//! - `dispatcher`: per-timestep cargo to crane matching.
//! - `gatekeeper`: the authentication step in front of every undock.
//! - `coordinator`: the timestep loop tying the above together.
//! - `context`, `config`, `error`, `stats`: what the coordinator is built
//!   from and what it reports.
//!
//! ## Highlights
//!
//! - Single-threaded and sequential: all state is owned by the
//!   `Coordinator`, no locks are taken outside the staging record.
//! - Every wait is bounded except the one for the next event.
//! - Ships are never removed; serviced and forfeited ships remain
//!   addressable by their `ShipIndex`.

pub mod allocator;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod gatekeeper;
pub mod staging;
pub mod stats;
pub mod transport;
