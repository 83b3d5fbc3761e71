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


//! # Wharf Model
//!
//! **The domain model of the wharf port scheduler.**
//!
//! This crate describes what the scheduler reasons about: docks and their
//! cranes, ships with their cargo, and the static port topology read at
//! startup. It carries no scheduling policy; the allocation, dispatch and
//! release rules live in `wharf_scheduler`.
//!
//! ## Architecture
//!
//! * **`index`**: typed indices (`DockIndex`, `CraneIndex`, `ShipIndex`, `WorkerIndex`).
//! * **`time`**: `MaybeTimestep<T>`, a sentinel-encoded optional timestep.
//! * **`dock`**: the runtime state of a berth and its crane capacities.
//! * **`ship`**: arrival requests and the per-ship lifecycle record.
//! * **`topology`**: the immutable port layout and its validating builder.
//! * **`loading`**: a whitespace/comment tolerant text loader for topologies.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: a `CraneIndex` cannot be used where a `DockIndex` is expected.
//! 2.  **Fail-Fast**: the topology builder validates eagerly so the scheduler never
//!     sees a dock without cranes or a port without workers.
//! 3.  **Inert, not deleted**: ships are never removed; a serviced or forfeited ship
//!     stays addressable by its `ShipIndex`.

pub mod dock;
pub mod index;
pub mod loading;
pub mod ship;
pub mod time;
pub mod topology;
