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


//! Runtime state of a berth.
//!
//! A `Dock` knows its category, its crane capacities in fixed scan order,
//! which ship (if any) currently occupies it and when it was last vacated.
//! The last-vacated timestep arms a one-timestep cooldown: a dock freed at
//! timestep `T` cannot host a new ship before `T + 1`. A fresh dock counts as
//! vacated at timestep `0`, so nothing moors before timestep `1`.

use crate::{
    index::{CraneIndex, ShipIndex},
    time::MaybeTimestep,
};
use num_traits::{PrimInt, Signed};
use smallvec::SmallVec;

/// Crane capacities of one dock. Ports rarely have more than a handful of
/// cranes per berth, so they are kept inline.
pub type CraneCapacities = SmallVec<[u32; 8]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dock<T>
where
    T: PrimInt + Signed,
{
    category: u32,
    cranes: CraneCapacities,
    occupant: Option<ShipIndex>,
    last_vacated: MaybeTimestep<T>,
}

impl<T> Dock<T>
where
    T: PrimInt + Signed,
{
    /// Creates an unoccupied dock, last vacated at timestep `0`.
    #[inline]
    pub fn new(category: u32, cranes: CraneCapacities) -> Self {
        Self {
            category,
            cranes,
            occupant: None,
            last_vacated: MaybeTimestep::zero(),
        }
    }

    #[inline]
    pub fn category(&self) -> u32 {
        self.category
    }

    #[inline]
    pub fn cranes(&self) -> &[u32] {
        &self.cranes
    }

    #[inline]
    pub fn num_cranes(&self) -> usize {
        self.cranes.len()
    }

    /// Returns the capacity of a crane.
    ///
    /// # Panics
    ///
    /// Panics if `crane_index` is not in `0..num_cranes()`.
    #[inline]
    pub fn crane_capacity(&self, crane_index: CraneIndex) -> u32 {
        let index = crane_index.get();
        assert!(
            index < self.cranes.len(),
            "called `Dock::crane_capacity` with crane index out of bounds: the len is {} but the index is {}",
            self.cranes.len(),
            index
        );
        self.cranes[index]
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// The ship currently moored here.
    #[inline]
    pub fn occupant(&self) -> Option<ShipIndex> {
        self.occupant
    }

    #[inline]
    pub fn last_vacated(&self) -> MaybeTimestep<T> {
        self.last_vacated
    }

    /// Returns `true` if the dock was vacated exactly at `now`.
    #[inline]
    pub fn vacated_at(&self, now: T) -> bool {
        self.last_vacated.is(now)
    }

    /// Returns `true` if a ship of `category` may be moored here at `now`:
    /// the dock is free, its category is high enough and it was not vacated
    /// during this very timestep.
    #[inline]
    pub fn can_host(&self, category: u32, now: T) -> bool {
        !self.is_occupied() && self.category >= category && !self.vacated_at(now)
    }

    /// Marks the dock as occupied by `ship`.
    ///
    /// # Panics
    ///
    /// Panics if the dock is already occupied.
    #[inline]
    pub fn occupy(&mut self, ship: ShipIndex) {
        assert!(
            self.occupant.is_none(),
            "called `Dock::occupy` on a dock already occupied by {:?}",
            self.occupant
        );
        self.occupant = Some(ship);
    }

    /// Frees the dock at `now` and returns the ship that was moored here.
    #[inline]
    pub fn vacate(&mut self, now: T) -> Option<ShipIndex>
    where
        T: std::fmt::Display,
    {
        self.last_vacated = MaybeTimestep::some(now);
        self.occupant.take()
    }
}
