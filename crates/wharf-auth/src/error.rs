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


use std::time::Duration;
use wharf_model::index::{DockIndex, WorkerIndex};

/// Why a candidate space cannot be described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpaceError {
    #[error("authentication strings must have at least one symbol")]
    EmptyLength,
    #[error("the candidate space for length {length} does not fit into 64 bits")]
    TooLarge { length: usize },
}

/// Failures of an authentication search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Space(#[from] SpaceError),
    #[error("the worker pool is empty")]
    NoWorkers,
    #[error("{worker} did not answer within {timeout:?} while searching for {dock}")]
    WorkerUnreachable {
        worker: WorkerIndex,
        dock: DockIndex,
        timeout: Duration,
    },
    #[error("{worker} has hung up")]
    WorkerDisconnected { worker: WorkerIndex },
    #[error("{worker} answered for {received} while searching for {expected}")]
    UnexpectedVerdict {
        worker: WorkerIndex,
        expected: DockIndex,
        received: DockIndex,
    },
}

impl AuthError {
    /// Returns `true` if repeating the search later may succeed.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AuthError::WorkerUnreachable { .. } | AuthError::Space(SpaceError::TooLarge { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let unreachable = AuthError::WorkerUnreachable {
            worker: WorkerIndex::new(1),
            dock: DockIndex::new(2),
            timeout: Duration::from_millis(10),
        };
        assert!(unreachable.is_retryable());
        assert!(AuthError::from(SpaceError::TooLarge { length: 40 }).is_retryable());
        assert!(!AuthError::WorkerDisconnected { worker: WorkerIndex::new(0) }.is_retryable());
        assert!(!AuthError::NoWorkers.is_retryable());
    }

    #[test]
    fn test_messages_name_worker_and_dock() {
        let err = AuthError::UnexpectedVerdict {
            worker: WorkerIndex::new(3),
            expected: DockIndex::new(0),
            received: DockIndex::new(4),
        };
        assert_eq!(
            err.to_string(),
            "WorkerIndex(3) answered for DockIndex(4) while searching for DockIndex(0)"
        );
    }
}
