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


//! Ships and their lifecycle.
//!
//! A ship enters the port as a `ShipRequest` staged by the harness, is turned
//! into a `Ship` record by the coordinator and then moves through
//! `ShipPhase::Waiting → Docked → Serviced`. A regular arriving ship that waits
//! longer than its budget moves to `ShipPhase::Forfeited` instead. Serviced and
//! forfeited ships are inert for the rest of the run but stay addressable.
//!
//! Mutators on `Ship` perform the bookkeeping of a single transition; the
//! rules deciding *when* a transition happens live in `wharf_scheduler`.

use crate::{index::DockIndex, time::MaybeTimestep};
use num_traits::{CheckedAdd, PrimInt, Signed};

/// Whether a ship is entering or leaving the port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Arriving,
    Departing,
}

impl Direction {
    /// The integer used on the wire: `1` for arrivals, `-1` for departures.
    #[inline]
    pub fn to_wire(self) -> i32 {
        match self {
            Direction::Arriving => 1,
            Direction::Departing => -1,
        }
    }

    /// Parses the wire encoding.
    #[inline]
    pub fn from_wire(value: i32) -> Option<Self> {
        match value {
            1 => Some(Direction::Arriving),
            -1 => Some(Direction::Departing),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Arriving => write!(f, "arriving"),
            Direction::Departing => write!(f, "departing"),
        }
    }
}

/// The external identity of a ship as assigned by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShipId(pub u32);

impl std::fmt::Display for ShipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ship#{}", self.0)
    }
}

/// A new-arrival record as staged by the harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipRequest<T> {
    pub ship_id: ShipId,
    pub direction: Direction,
    pub category: u32,
    pub emergency: bool,
    pub arrival: T,
    pub waiting_budget: T,
    pub cargo: Vec<u32>,
}

/// Where a ship is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipPhase {
    /// Admitted, not yet moored.
    Waiting,
    /// Moored at a dock, handling cargo or waiting for release.
    Docked,
    /// Released from its dock. Terminal.
    Serviced,
    /// Gave up waiting for a dock. Terminal.
    Forfeited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship<T>
where
    T: PrimInt + Signed,
{
    id: ShipId,
    direction: Direction,
    category: u32,
    emergency: bool,
    arrival: T,
    waiting_budget: T,
    cargo: Vec<u32>,
    phase: ShipPhase,
    dock: Option<DockIndex>,
    docked_at: MaybeTimestep<T>,
    cargo_processed: usize,
    last_cargo_at: MaybeTimestep<T>,
    authenticated: bool,
}

impl<T> Ship<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    /// Creates a waiting ship from a staged request.
    pub fn from_request(request: ShipRequest<T>) -> Self {
        Self {
            id: request.ship_id,
            direction: request.direction,
            category: request.category,
            emergency: request.emergency,
            arrival: request.arrival,
            waiting_budget: request.waiting_budget,
            cargo: request.cargo,
            phase: ShipPhase::Waiting,
            dock: None,
            docked_at: MaybeTimestep::none(),
            cargo_processed: 0,
            last_cargo_at: MaybeTimestep::none(),
            authenticated: false,
        }
    }

    #[inline]
    pub fn id(&self) -> ShipId {
        self.id
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn category(&self) -> u32 {
        self.category
    }

    #[inline]
    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    /// Only arriving ships can claim emergency priority.
    #[inline]
    pub fn is_emergency_arrival(&self) -> bool {
        self.emergency && self.direction == Direction::Arriving
    }

    #[inline]
    pub fn arrival(&self) -> T {
        self.arrival
    }

    #[inline]
    pub fn waiting_budget(&self) -> T {
        self.waiting_budget
    }

    /// The last timestep at which a regular arrival still accepts a dock.
    #[inline]
    pub fn deadline(&self) -> T {
        CheckedAdd::checked_add(&self.arrival, &self.waiting_budget).unwrap_or_else(T::max_value)
    }

    /// Returns `true` if this is a regular arrival whose deadline has passed at `now`.
    /// Departures and emergency arrivals never run out of patience.
    #[inline]
    pub fn is_overdue(&self, now: T) -> bool {
        self.direction == Direction::Arriving && !self.emergency && now > self.deadline()
    }

    #[inline]
    pub fn cargo(&self) -> &[u32] {
        &self.cargo
    }

    #[inline]
    pub fn phase(&self) -> ShipPhase {
        self.phase
    }

    #[inline]
    pub fn dock(&self) -> Option<DockIndex> {
        self.dock
    }

    #[inline]
    pub fn docked_at(&self) -> MaybeTimestep<T> {
        self.docked_at
    }

    #[inline]
    pub fn cargo_processed(&self) -> usize {
        self.cargo_processed
    }

    #[inline]
    pub fn last_cargo_at(&self) -> MaybeTimestep<T> {
        self.last_cargo_at
    }

    #[inline]
    pub fn is_docked(&self) -> bool {
        self.phase == ShipPhase::Docked
    }

    #[inline]
    pub fn is_serviced(&self) -> bool {
        self.phase == ShipPhase::Serviced
    }

    /// Forfeited ships are the only inactive ones.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase != ShipPhase::Forfeited
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Counts towards the live-ship capacity: neither serviced nor forfeited.
    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self.phase, ShipPhase::Waiting | ShipPhase::Docked)
    }

    /// Waiting for a dock.
    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.phase == ShipPhase::Waiting
    }

    /// Every cargo item has been handed to a crane.
    #[inline]
    pub fn is_cargo_complete(&self) -> bool {
        self.cargo_processed == self.cargo.len()
    }

    /// The next cargo item to be handled, with its position.
    #[inline]
    pub fn next_cargo(&self) -> Option<(usize, u32)> {
        self.cargo
            .get(self.cargo_processed)
            .map(|&size| (self.cargo_processed, size))
    }

    /// Length of the authentication string guarding this ship's release:
    /// the raw last cargo timestep minus the raw docked timestep.
    ///
    /// Absent timesteps take part with their sentinel value, so a ship that
    /// never had a cargo event yields a non-positive length.
    #[inline]
    pub fn auth_length(&self) -> T {
        self.last_cargo_at.raw() - self.docked_at.raw()
    }

    /// Records that the ship moored at `dock` at `now`.
    ///
    /// # Panics
    ///
    /// Panics if the ship is not waiting.
    pub fn moor(&mut self, dock: DockIndex, now: T) {
        assert!(
            self.phase == ShipPhase::Waiting,
            "called `Ship::moor` on {} in phase {:?}",
            self.id,
            self.phase
        );
        self.phase = ShipPhase::Docked;
        self.dock = Some(dock);
        self.docked_at = MaybeTimestep::some(now);
        self.cargo_processed = 0;
    }

    /// Records that the next cargo item was handed to a crane at `now`.
    ///
    /// # Panics
    ///
    /// Panics if all cargo was already processed.
    pub fn record_cargo(&mut self, now: T) {
        assert!(
            self.cargo_processed < self.cargo.len(),
            "called `Ship::record_cargo` on {} with no cargo left",
            self.id
        );
        self.cargo_processed += 1;
        self.last_cargo_at = MaybeTimestep::some(now);
    }

    /// Marks a successful authentication.
    #[inline]
    pub fn mark_authenticated(&mut self) {
        self.authenticated = true;
    }

    /// Leaves the dock for good. The dock reference is kept for reporting.
    ///
    /// # Panics
    ///
    /// Panics if the ship is not docked.
    pub fn release(&mut self) {
        assert!(
            self.phase == ShipPhase::Docked,
            "called `Ship::release` on {} in phase {:?}",
            self.id,
            self.phase
        );
        self.phase = ShipPhase::Serviced;
    }

    /// Gives up waiting for a dock.
    ///
    /// # Panics
    ///
    /// Panics if the ship is not waiting.
    pub fn forfeit(&mut self) {
        assert!(
            self.phase == ShipPhase::Waiting,
            "called `Ship::forfeit` on {} in phase {:?}",
            self.id,
            self.phase
        );
        self.phase = ShipPhase::Forfeited;
    }
}

impl<T> std::fmt::Display for Ship<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, category {}{}, cargo {}/{})",
            self.id,
            self.direction,
            self.category,
            if self.is_emergency_arrival() { ", emergency" } else { "" },
            self.cargo_processed,
            self.cargo.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn request(direction: Direction, emergency: bool, cargo: Vec<u32>) -> ShipRequest<IntegerType> {
        ShipRequest {
            ship_id: ShipId(7),
            direction,
            category: 2,
            emergency,
            arrival: 0,
            waiting_budget: 3,
            cargo,
        }
    }

    #[test]
    fn test_new_ship_is_waiting_and_active() {
        let ship = Ship::from_request(request(Direction::Arriving, false, vec![3, 12]));
        assert!(ship.is_waiting());
        assert!(ship.is_active());
        assert!(ship.is_live());
        assert!(!ship.is_docked());
        assert!(!ship.is_serviced());
        assert!(!ship.is_authenticated());
        assert_eq!(ship.next_cargo(), Some((0, 3)));
        assert!(ship.docked_at().is_none());
    }

    #[test]
    fn test_only_regular_arrivals_become_overdue() {
        let regular = Ship::from_request(request(Direction::Arriving, false, vec![]));
        assert_eq!(regular.deadline(), 3);
        assert!(!regular.is_overdue(3));
        assert!(regular.is_overdue(4));

        let emergency = Ship::from_request(request(Direction::Arriving, true, vec![]));
        assert!(!emergency.is_overdue(100));

        let departing = Ship::from_request(request(Direction::Departing, false, vec![]));
        assert!(!departing.is_overdue(100));
        assert!(!departing.is_emergency_arrival());
    }

    #[test]
    fn test_auth_length_follows_cargo_events() {
        let mut ship = Ship::from_request(request(Direction::Arriving, false, vec![4, 6]));
        ship.moor(DockIndex::new(0), 5);
        ship.record_cargo(6);
        ship.record_cargo(7);
        assert!(ship.is_cargo_complete());
        assert_eq!(ship.auth_length(), 2);
    }

    #[test]
    fn test_ship_without_cargo_never_gets_positive_auth_length() {
        let mut ship = Ship::from_request(request(Direction::Departing, false, vec![]));
        ship.moor(DockIndex::new(0), 0);
        assert!(ship.is_cargo_complete());
        assert!(ship.auth_length() <= 0);
    }

    #[test]
    fn test_release_and_forfeit_are_terminal() {
        let mut ship = Ship::from_request(request(Direction::Arriving, false, vec![]));
        ship.moor(DockIndex::new(1), 2);
        ship.release();
        assert!(ship.is_serviced());
        assert!(!ship.is_live());
        assert_eq!(ship.dock(), Some(DockIndex::new(1)));

        let mut other = Ship::from_request(request(Direction::Arriving, false, vec![]));
        other.forfeit();
        assert!(!other.is_active());
        assert!(!other.is_live());
    }

    #[test]
    #[should_panic(expected = "Ship::moor")]
    fn test_forfeited_ship_cannot_moor() {
        let mut ship = Ship::from_request(request(Direction::Arriving, false, vec![]));
        ship.forfeit();
        ship.moor(DockIndex::new(0), 5);
    }

    #[test]
    fn test_direction_wire_encoding() {
        assert_eq!(Direction::from_wire(1), Some(Direction::Arriving));
        assert_eq!(Direction::from_wire(-1), Some(Direction::Departing));
        assert_eq!(Direction::from_wire(0), None);
        assert_eq!(Direction::Departing.to_wire(), -1);
    }
}
