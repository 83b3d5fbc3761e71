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


//! Messages exchanged between the authentication search and its workers.
//!
//! `BeginSearch` is a best-effort notice and may be dropped. Every `TryGuess`
//! carries a sequence number that the worker echoes in its `Verdict`, so a
//! verdict arriving after its request timed out can be told apart from the
//! answer to the current request.

use wharf_model::index::DockIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerRequest {
    /// A search for `dock` is about to start.
    BeginSearch { dock: DockIndex },
    /// Check `candidate` against the hidden string of `dock`.
    TryGuess {
        sequence: u64,
        dock: DockIndex,
        candidate: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub sequence: u64,
    pub dock: DockIndex,
    pub correct: bool,
}
