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


//! # Staging
//!
//! The record shared between the harness and the coordinator. The harness
//! stages new-arrival requests before it sends an `Advance`; the coordinator
//! reads slots `0..new_arrivals` and, after each successful authentication,
//! publishes the recovered string under the dock it guarded.
//!
//! `StagingRecord` is the plain in-memory record. `SharedStaging` wraps one
//! in an `Arc<Mutex<..>>` so the harness thread can keep a handle while the
//! coordinator owns another.

use std::sync::{Arc, Mutex, MutexGuard};
use wharf_model::{index::DockIndex, ship::ShipRequest};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StagingError {
    #[error("no arrival staged in slot {slot} ({staged} staged)")]
    MissingArrival { slot: usize, staged: usize },
    #[error("{dock} is not part of the staging record ({num_docks} docks)")]
    UnknownDock { dock: DockIndex, num_docks: usize },
    #[error("the staging record lock is poisoned")]
    Poisoned,
}

pub trait StagingArea<T> {
    /// Reads the new-arrival request in `slot`.
    fn new_arrival(&mut self, slot: usize) -> Result<ShipRequest<T>, StagingError>;

    /// Publishes the authentication string recovered for `dock`.
    fn publish_auth_string(&mut self, dock: DockIndex, auth: &str) -> Result<(), StagingError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingRecord<T> {
    arrivals: Vec<ShipRequest<T>>,
    auth_strings: Vec<Option<String>>,
}

impl<T> StagingRecord<T> {
    #[inline]
    pub fn new(num_docks: usize) -> Self {
        Self {
            arrivals: Vec::new(),
            auth_strings: vec![None; num_docks],
        }
    }

    /// Replaces the staged arrivals.
    #[inline]
    pub fn stage_arrivals<I>(&mut self, arrivals: I)
    where
        I: IntoIterator<Item = ShipRequest<T>>,
    {
        self.arrivals.clear();
        self.arrivals.extend(arrivals);
    }

    #[inline]
    pub fn num_staged(&self) -> usize {
        self.arrivals.len()
    }

    #[inline]
    pub fn num_docks(&self) -> usize {
        self.auth_strings.len()
    }

    /// The last string published for `dock`.
    #[inline]
    pub fn auth_string(&self, dock: DockIndex) -> Option<&str> {
        self.auth_strings.get(dock.get())?.as_deref()
    }
}

impl<T> StagingArea<T> for StagingRecord<T>
where
    T: Clone,
{
    fn new_arrival(&mut self, slot: usize) -> Result<ShipRequest<T>, StagingError> {
        self.arrivals
            .get(slot)
            .cloned()
            .ok_or(StagingError::MissingArrival {
                slot,
                staged: self.arrivals.len(),
            })
    }

    fn publish_auth_string(&mut self, dock: DockIndex, auth: &str) -> Result<(), StagingError> {
        let num_docks = self.auth_strings.len();
        let entry = self
            .auth_strings
            .get_mut(dock.get())
            .ok_or(StagingError::UnknownDock { dock, num_docks })?;
        *entry = Some(auth.to_owned());
        Ok(())
    }
}

/// A `StagingRecord` shared between threads.
#[derive(Debug)]
pub struct SharedStaging<T> {
    inner: Arc<Mutex<StagingRecord<T>>>,
}

impl<T> Clone for SharedStaging<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedStaging<T> {
    #[inline]
    pub fn new(num_docks: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StagingRecord::new(num_docks))),
        }
    }

    #[inline]
    fn lock(&self) -> Result<MutexGuard<'_, StagingRecord<T>>, StagingError> {
        self.inner.lock().map_err(|_| StagingError::Poisoned)
    }

    pub fn stage_arrivals<I>(&self, arrivals: I) -> Result<(), StagingError>
    where
        I: IntoIterator<Item = ShipRequest<T>>,
    {
        self.lock()?.stage_arrivals(arrivals);
        Ok(())
    }

    pub fn auth_string(&self, dock: DockIndex) -> Result<Option<String>, StagingError> {
        Ok(self.lock()?.auth_string(dock).map(str::to_owned))
    }

    pub fn num_staged(&self) -> Result<usize, StagingError> {
        Ok(self.lock()?.num_staged())
    }
}

impl<T> StagingArea<T> for SharedStaging<T>
where
    T: Clone,
{
    #[inline]
    fn new_arrival(&mut self, slot: usize) -> Result<ShipRequest<T>, StagingError> {
        self.lock()?.new_arrival(slot)
    }

    #[inline]
    fn publish_auth_string(&mut self, dock: DockIndex, auth: &str) -> Result<(), StagingError> {
        self.lock()?.publish_auth_string(dock, auth)
    }
}
