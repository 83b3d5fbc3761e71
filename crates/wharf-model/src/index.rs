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


use wharf_core::index::{TypedIndex, TypedIndexTag};

/// A tag type for dock indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DockIndexTag;

impl TypedIndexTag for DockIndexTag {
    const NAME: &'static str = "DockIndex";
}

/// A typed index for docks, in topology order.
pub type DockIndex = TypedIndex<DockIndexTag>;

/// A tag type for crane indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CraneIndexTag;

impl TypedIndexTag for CraneIndexTag {
    const NAME: &'static str = "CraneIndex";
}

/// A typed index for the cranes of a single dock.
pub type CraneIndex = TypedIndex<CraneIndexTag>;

/// A tag type for ship indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ShipIndexTag;

impl TypedIndexTag for ShipIndexTag {
    const NAME: &'static str = "ShipIndex";
}

/// A typed index for ships, in creation order.
pub type ShipIndex = TypedIndex<ShipIndexTag>;

/// A tag type for worker indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct WorkerIndexTag;

impl TypedIndexTag for WorkerIndexTag {
    const NAME: &'static str = "WorkerIndex";
}

/// A typed index for workers of the authentication pool.
pub type WorkerIndex = TypedIndex<WorkerIndexTag>;
