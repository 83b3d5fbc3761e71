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


use crate::checker::Violation;
use wharf_model::{loading::TopologyLoaderError, topology::TopologyError};
use wharf_scheduler::{
    config::ConfigError, error::SchedulerError, staging::StagingError, transport::TransportError,
};

/// Everything that can end a simulation early.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("could not load the port topology: {0}")]
    Loader(#[from] TopologyLoaderError),
    #[error("invalid port topology: {0}")]
    Topology(#[from] TopologyError),
    #[error("invalid scheduler configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not start a thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error("clock transport failure: {0}")]
    Transport(#[from] TransportError),
    #[error("clock staging failure: {0}")]
    Staging(#[from] StagingError),
    #[error("invariant violated: {0}")]
    Invariant(#[from] Violation),
    #[error("the clock thread panicked")]
    ClockPanicked,
}
