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


//! Static port layout.
//!
//! A `PortTopology` lists the docks of the port (category plus ordered crane
//! capacities) and the size of the authentication worker pool. It is read
//! once at startup and never changes; the scheduler instantiates its mutable
//! `Dock` records from it.
//!
//! Construction goes through `PortTopologyBuilder`, which validates eagerly:
//!
//! ```rust
//! use wharf_model::topology::PortTopologyBuilder;
//!
//! let mut builder = PortTopologyBuilder::new(2);
//! builder.add_dock(2, [5, 10]);
//! builder.add_dock(1, [7]);
//! let topology = builder.build().unwrap();
//! assert_eq!(topology.num_docks(), 2);
//! assert_eq!(topology.num_workers(), 2);
//! ```

use crate::{
    dock::{CraneCapacities, Dock},
    index::DockIndex,
};
use num_traits::{PrimInt, Signed};

/// Reasons a topology is rejected by `PortTopologyBuilder::build`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// The port has no docks at all.
    #[error("the port must have at least one dock")]
    NoDocks,
    /// The authentication pool has no workers.
    #[error("the port must have at least one authentication worker")]
    NoWorkers,
    /// A dock was declared with category zero, which no ship can use.
    #[error("{0} has category 0")]
    ZeroCategory(DockIndex),
    /// A dock was declared without cranes.
    #[error("{0} has no cranes")]
    NoCranes(DockIndex),
}

/// The declaration of one dock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockSpec {
    category: u32,
    cranes: CraneCapacities,
}

impl DockSpec {
    /// The highest ship category this dock can host.
    #[inline]
    pub fn category(&self) -> u32 {
        self.category
    }

    /// Crane capacities in their fixed scan order.
    #[inline]
    pub fn cranes(&self) -> &[u32] {
        &self.cranes
    }
}

/// The immutable, validated layout of a port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortTopology {
    docks: Vec<DockSpec>,
    num_workers: usize,
}

impl PortTopology {
    /// Number of docks.
    #[inline]
    pub fn num_docks(&self) -> usize {
        self.docks.len()
    }

    /// Number of authentication workers.
    #[inline]
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// All dock declarations in topology order.
    #[inline]
    pub fn docks(&self) -> &[DockSpec] {
        &self.docks
    }

    /// The declaration of a single dock.
    ///
    /// # Panics
    ///
    /// Panics if `dock_index` is not in `0..num_docks()`.
    #[inline]
    pub fn dock(&self, dock_index: DockIndex) -> &DockSpec {
        let index = dock_index.get();
        assert!(
            index < self.docks.len(),
            "called `PortTopology::dock` with dock index out of bounds: the len is {} but the index is {}",
            self.docks.len(),
            index
        );
        &self.docks[index]
    }

    /// The highest category any dock of this port accepts.
    #[inline]
    pub fn max_category(&self) -> u32 {
        self.docks.iter().map(DockSpec::category).max().unwrap_or(0)
    }

    /// Creates fresh runtime dock records: unoccupied and last vacated at
    /// timestep `0`.
    pub fn instantiate<T>(&self) -> Vec<Dock<T>>
    where
        T: PrimInt + Signed,
    {
        self.docks
            .iter()
            .map(|spec| Dock::new(spec.category, spec.cranes.clone()))
            .collect()
    }
}

/// A mutable builder for `PortTopology`.
#[derive(Debug, Clone, Default)]
pub struct PortTopologyBuilder {
    docks: Vec<DockSpec>,
    num_workers: usize,
}

impl PortTopologyBuilder {
    /// Creates an empty builder for a port served by `num_workers` workers.
    #[inline]
    pub fn new(num_workers: usize) -> Self {
        Self {
            docks: Vec::new(),
            num_workers,
        }
    }

    /// Overrides the worker count.
    #[inline]
    pub fn set_num_workers(&mut self, num_workers: usize) -> &mut Self {
        self.num_workers = num_workers;
        self
    }

    /// Appends a dock and returns its index.
    pub fn add_dock<I>(&mut self, category: u32, cranes: I) -> DockIndex
    where
        I: IntoIterator<Item = u32>,
    {
        let index = DockIndex::new(self.docks.len());
        self.docks.push(DockSpec {
            category,
            cranes: cranes.into_iter().collect(),
        });
        index
    }

    /// Validates the declarations and freezes them into a `PortTopology`.
    pub fn build(self) -> Result<PortTopology, TopologyError> {
        if self.docks.is_empty() {
            return Err(TopologyError::NoDocks);
        }
        if self.num_workers == 0 {
            return Err(TopologyError::NoWorkers);
        }
        for (i, spec) in self.docks.iter().enumerate() {
            if spec.category == 0 {
                return Err(TopologyError::ZeroCategory(DockIndex::new(i)));
            }
            if spec.cranes.is_empty() {
                return Err(TopologyError::NoCranes(DockIndex::new(i)));
            }
        }

        Ok(PortTopology {
            docks: self.docks,
            num_workers: self.num_workers,
        })
    }
}
