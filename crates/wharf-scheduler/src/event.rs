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


//! Messages exchanged between the coordinator and the clock that drives it.

use wharf_model::{
    index::{CraneIndex, DockIndex},
    ship::{Direction, ShipId},
};

/// Opens a timestep. `new_arrivals` records were staged for ingestion
/// before the event was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance<T> {
    pub timestep: T,
    pub new_arrivals: usize,
    pub finished: bool,
}

impl<T> Advance<T> {
    #[inline]
    pub fn new(timestep: T, new_arrivals: usize) -> Self {
        Self {
            timestep,
            new_arrivals,
            finished: false,
        }
    }

    /// The event that ends a run.
    #[inline]
    pub fn finish(timestep: T) -> Self {
        Self {
            timestep,
            new_arrivals: 0,
            finished: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<T> {
    Docked {
        dock: DockIndex,
        ship: ShipId,
        direction: Direction,
    },
    Undocked {
        dock: DockIndex,
        ship: ShipId,
        direction: Direction,
    },
    CargoAssigned {
        dock: DockIndex,
        ship: ShipId,
        cargo_index: usize,
        crane: CraneIndex,
    },
    /// All work for `timestep` is done.
    TimestepComplete { timestep: T },
}

impl<T> Notification<T> {
    #[inline]
    pub fn is_timestep_complete(&self) -> bool {
        matches!(self, Notification::TimestepComplete { .. })
    }
}

impl<T> std::fmt::Display for Notification<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::Docked {
                dock,
                ship,
                direction,
            } => write!(f, "Docked({}, {}, {})", dock, ship, direction),
            Notification::Undocked {
                dock,
                ship,
                direction,
            } => write!(f, "Undocked({}, {}, {})", dock, ship, direction),
            Notification::CargoAssigned {
                dock,
                ship,
                cargo_index,
                crane,
            } => write!(
                f,
                "CargoAssigned({}, {}, cargo {}, {})",
                dock, ship, cargo_index, crane
            ),
            Notification::TimestepComplete { timestep } => {
                write!(f, "TimestepComplete({})", timestep)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    #[test]
    fn test_finish_event_carries_no_arrivals() {
        let advance = Advance::<IntegerType>::finish(12);
        assert!(advance.finished);
        assert_eq!(advance.new_arrivals, 0);
        assert!(!Advance::<IntegerType>::new(3, 2).finished);
    }

    #[test]
    fn test_display() {
        let docked = Notification::<IntegerType>::Docked {
            dock: DockIndex::new(1),
            ship: ShipId(7),
            direction: Direction::Arriving,
        };
        assert_eq!(docked.to_string(), "Docked(DockIndex(1), ship#7, arriving)");
        assert!(Notification::<IntegerType>::TimestepComplete { timestep: 4 }.is_timestep_complete());
    }
}
