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


//! # Search Monitors
//!
//! Observers and controllers for the authentication search loop. A monitor
//! sees the search start, every candidate handed to a worker, the match (if
//! any) and the end of the search, and it may ask the loop to stop.
//!
//! ## Submodules
//!
//! - `search_monitor`: the `SearchMonitor` trait, `SearchCommand` and `SearchTarget`.
//! - `composite`: fans events out to several monitors; the first `Terminate` wins.
//! - `interrupt`: stops the search when a shared flag is raised.
//! - `time_limit`: stops the search once a wall-clock budget is spent.
//! - `log`: periodic progress through `tracing`.
//! - `no_op`: does nothing.

pub mod composite;
pub mod interrupt;
pub mod log;
pub mod no_op;
pub mod search_monitor;
pub mod time_limit;
