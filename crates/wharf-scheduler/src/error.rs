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


use crate::{staging::StagingError, transport::TransportError};
use wharf_auth::error::AuthError;

/// Errors that end a coordinator run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    #[error("staging failure: {0}")]
    Staging(#[from] StagingError),
    #[error("authentication failure: {0}")]
    Auth(#[from] AuthError),
    #[error("timestep {received} received after timestep {previous}")]
    NonMonotonicTimestep { previous: i64, received: i64 },
    #[error("timestep {received} is negative")]
    NegativeTimestep { received: i64 },
    #[error("an event arrived after the run finished")]
    AlreadyFinished,
}

impl SchedulerError {
    /// Returns `true` if the condition may clear up on a later timestep.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        match self {
            SchedulerError::Auth(err) => err.is_retryable(),
            SchedulerError::Transport(TransportError::Timeout(_)) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wharf_model::index::{DockIndex, WorkerIndex};

    #[test]
    fn test_retryable_follows_the_cause() {
        let unreachable = SchedulerError::from(AuthError::WorkerUnreachable {
            worker: WorkerIndex::new(0),
            dock: DockIndex::new(0),
            timeout: Duration::from_secs(1),
        });
        assert!(unreachable.is_retryable());
        assert!(!SchedulerError::from(AuthError::NoWorkers).is_retryable());
        assert!(!SchedulerError::from(TransportError::Closed).is_retryable());
        assert!(
            !SchedulerError::NonMonotonicTimestep {
                previous: 4,
                received: 3
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_protocol_messages() {
        let err = SchedulerError::NonMonotonicTimestep {
            previous: 4,
            received: 3,
        };
        assert_eq!(err.to_string(), "timestep 3 received after timestep 4");
    }
}
