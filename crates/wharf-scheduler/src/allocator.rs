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


//! # Dock Allocator
//!
//! First-fit assignment of waiting ships to docks. Docks are scanned in
//! ascending order and the first one that can host the ship at the current
//! timestep wins. A dock vacated during this timestep is skipped, so a berth
//! always stays empty for at least the rest of the timestep in which its
//! previous ship left.
//!
//! A failed attempt leaves no trace; the same ship is simply offered again
//! on the next timestep.

use crate::{
    event::Notification,
    transport::{NotificationSink, TransportError},
};
use wharf_core::num::PortNumeric;
use wharf_model::{
    dock::Dock,
    index::{DockIndex, ShipIndex},
    ship::Ship,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstFitAllocator;

impl FirstFitAllocator {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Returns the first dock that can host a ship of `category` at `now`.
    #[inline]
    pub fn find_dock<T>(&self, docks: &[Dock<T>], category: u32, now: T) -> Option<DockIndex>
    where
        T: PortNumeric,
    {
        docks
            .iter()
            .position(|dock| dock.can_host(category, now))
            .map(DockIndex::new)
    }

    /// Tries to moor `ship` at the first suitable dock. On success the dock
    /// is occupied, the ship is docked at `now` and `Docked` is reported.
    pub fn try_assign<T, N>(
        &self,
        docks: &mut [Dock<T>],
        ship_index: ShipIndex,
        ship: &mut Ship<T>,
        now: T,
        sink: &mut N,
    ) -> Result<Option<DockIndex>, TransportError>
    where
        T: PortNumeric,
        N: NotificationSink<T> + ?Sized,
    {
        let Some(dock_index) = self.find_dock(docks, ship.category(), now) else {
            tracing::trace!(ship = %ship.id(), category = ship.category(), "no dock available");
            return Ok(None);
        };

        docks[dock_index.get()].occupy(ship_index);
        ship.moor(dock_index, now);
        sink.send(Notification::Docked {
            dock: dock_index,
            ship: ship.id(),
            direction: ship.direction(),
        })?;
        Ok(Some(dock_index))
    }
}
