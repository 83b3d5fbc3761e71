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


//! # Cargo Dispatcher
//!
//! Hands the cargo of a docked ship to the cranes of its dock, one pass per
//! timestep. Cargo is handled strictly in order: the dispatcher starts at
//! the first unprocessed item, gives it to the first crane that is still
//! free in this pass and large enough, and stops at the first item no free
//! crane can take. Each crane handles at most one item per pass.
//!
//! Crane usage lives in a `FixedBitSet` owned by the dispatcher and cleared
//! at the start of every call. Scoping it to the call is sound because a
//! dock hosts at most one ship, so no two calls in the same timestep touch
//! the same cranes.
//!
//! Nothing is dispatched in the timestep a ship docked.

use crate::{
    event::Notification,
    transport::{NotificationSink, TransportError},
};
use fixedbitset::FixedBitSet;
use wharf_core::num::PortNumeric;
use wharf_model::{
    dock::Dock,
    index::{CraneIndex, DockIndex},
    ship::Ship,
};

#[derive(Debug, Clone, Default)]
pub struct CargoDispatcher {
    used: FixedBitSet,
}

impl CargoDispatcher {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher sized for docks with up to `max_cranes` cranes.
    #[inline]
    pub fn preallocated(max_cranes: usize) -> Self {
        Self {
            used: FixedBitSet::with_capacity(max_cranes),
        }
    }

    /// Runs one dispatch pass for `ship` moored at `dock_index`. Returns how
    /// many cargo items were assigned.
    pub fn dispatch<T, N>(
        &mut self,
        dock_index: DockIndex,
        dock: &Dock<T>,
        ship: &mut Ship<T>,
        now: T,
        sink: &mut N,
    ) -> Result<usize, TransportError>
    where
        T: PortNumeric,
        N: NotificationSink<T> + ?Sized,
    {
        if !ship.is_docked() || ship.docked_at().is(now) {
            return Ok(0);
        }

        self.used.clear();
        self.used.grow(dock.num_cranes());

        let mut assigned = 0;
        while let Some((cargo_index, size)) = ship.next_cargo() {
            let Some(crane) = self.free_crane(dock, size) else {
                tracing::trace!(ship = %ship.id(), cargo_index, size, "no free crane");
                break;
            };

            self.used.insert(crane.get());
            sink.send(Notification::CargoAssigned {
                dock: dock_index,
                ship: ship.id(),
                cargo_index,
                crane,
            })?;
            ship.record_cargo(now);
            assigned += 1;
        }
        Ok(assigned)
    }

    #[inline]
    fn free_crane<T>(&self, dock: &Dock<T>, size: u32) -> Option<CraneIndex>
    where
        T: PortNumeric,
    {
        dock.cranes()
            .iter()
            .enumerate()
            .find(|&(i, &capacity)| !self.used.contains(i) && capacity >= size)
            .map(|(i, _)| CraneIndex::new(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;
    use wharf_model::ship::{Direction, ShipId, ShipRequest};

    type IntegerType = i64;

    fn docked_ship(cargo: Vec<u32>, docked_at: IntegerType) -> Ship<IntegerType> {
        let mut ship = Ship::from_request(ShipRequest {
            ship_id: ShipId(1),
            direction: Direction::Arriving,
            category: 1,
            emergency: false,
            arrival: 0,
            waiting_budget: 10,
            cargo,
        });
        ship.moor(DockIndex::new(0), docked_at);
        ship
    }

    fn assigned(sink: &[Notification<IntegerType>]) -> Vec<(usize, usize)> {
        sink.iter()
            .filter_map(|n| match n {
                Notification::CargoAssigned {
                    cargo_index, crane, ..
                } => Some((*cargo_index, crane.get())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_stops_at_first_item_without_a_crane() {
        let dock = Dock::<IntegerType>::new(2, smallvec![5, 10]);
        let mut ship = docked_ship(vec![3, 12], 0);
        let mut sink = Vec::new();
        let mut dispatcher = CargoDispatcher::new();

        assert_eq!(
            dispatcher
                .dispatch(DockIndex::new(0), &dock, &mut ship, 1, &mut sink)
                .unwrap(),
            1
        );
        assert_eq!(assigned(&sink), vec![(0, 0)]);
        assert_eq!(ship.cargo_processed(), 1);

        // The oversized item blocks the ship for good.
        for now in 2..5 {
            dispatcher
                .dispatch(DockIndex::new(0), &dock, &mut ship, now, &mut sink)
                .unwrap();
        }
        assert_eq!(ship.cargo_processed(), 1);
        assert!(ship.last_cargo_at().is(1));
    }

    #[test]
    fn test_each_crane_is_used_once_per_pass() {
        let dock = Dock::<IntegerType>::new(1, smallvec![10]);
        let mut ship = docked_ship(vec![4, 6], 5);
        let mut sink = Vec::new();
        let mut dispatcher = CargoDispatcher::preallocated(1);

        dispatcher
            .dispatch(DockIndex::new(0), &dock, &mut ship, 6, &mut sink)
            .unwrap();
        assert_eq!(ship.cargo_processed(), 1);
        dispatcher
            .dispatch(DockIndex::new(0), &dock, &mut ship, 7, &mut sink)
            .unwrap();
        assert_eq!(ship.cargo_processed(), 2);
        assert!(ship.is_cargo_complete());
        assert!(ship.last_cargo_at().is(7));
        assert_eq!(ship.auth_length(), 2);
        assert_eq!(assigned(&sink), vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn test_in_order_assignment_uses_first_fitting_crane() {
        let dock = Dock::<IntegerType>::new(3, smallvec![2, 8, 8]);
        let mut ship = docked_ship(vec![7, 1, 7, 1], 0);
        let mut sink = Vec::new();

        let count = CargoDispatcher::new()
            .dispatch(DockIndex::new(0), &dock, &mut ship, 1, &mut sink)
            .unwrap();

        assert_eq!(count, 3);
        assert_eq!(assigned(&sink), vec![(0, 1), (1, 0), (2, 2)]);
    }

    #[test]
    fn test_nothing_happens_in_the_docking_timestep() {
        let dock = Dock::<IntegerType>::new(1, smallvec![10]);
        let mut ship = docked_ship(vec![1], 3);
        let mut sink = Vec::new();
        assert_eq!(
            CargoDispatcher::new()
                .dispatch(DockIndex::new(0), &dock, &mut ship, 3, &mut sink)
                .unwrap(),
            0
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_waiting_ships_are_ignored() {
        let dock = Dock::<IntegerType>::new(1, smallvec![10]);
        let mut ship = Ship::from_request(ShipRequest {
            ship_id: ShipId(2),
            direction: Direction::Departing,
            category: 1,
            emergency: false,
            arrival: 0,
            waiting_budget: 0,
            cargo: vec![1],
        });
        let mut sink = Vec::new();
        assert_eq!(
            CargoDispatcher::new()
                .dispatch(DockIndex::new(0), &dock, &mut ship, 1, &mut sink)
                .unwrap(),
            0
        );
    }
}
