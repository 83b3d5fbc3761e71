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


//! # Invariant Checker
//!
//! Replays the coordinator's notifications against an independent model of
//! the port and fails on the first rule that is broken:
//!
//! - a dock hosts at most one ship, of a category no higher than its own;
//! - a dock vacated at `t` is not reassigned at `t`;
//! - within a timestep, emergency arrivals dock before any other ship;
//! - a regular arrival never docks after its deadline;
//! - cargo is handled in order, never in the docking timestep, by a crane
//!   large enough and used at most once per timestep;
//! - a ship leaves only after all its cargo was handled in earlier timesteps.

use rustc_hash::{FxHashMap, FxHashSet};
use wharf_model::{
    index::{CraneIndex, DockIndex},
    ship::{Direction, ShipId, ShipRequest},
    topology::PortTopology,
};
use wharf_scheduler::event::Notification;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("t={now}: {ship} docked at {dock} which hosts {occupant}")]
    DockShared {
        now: i64,
        dock: DockIndex,
        ship: ShipId,
        occupant: ShipId,
    },
    #[error("t={now}: {ship} of category {ship_category} docked at {dock} of category {dock_category}")]
    CategoryTooLow {
        now: i64,
        dock: DockIndex,
        ship: ShipId,
        ship_category: u32,
        dock_category: u32,
    },
    #[error("t={now}: {dock} reassigned in the timestep it was vacated")]
    ReassignedWhileVacated { now: i64, dock: DockIndex },
    #[error("t={now}: emergency {ship} docked after a regular ship")]
    EmergencyAfterRegular { now: i64, ship: ShipId },
    #[error("t={now}: {ship} docked after its deadline {deadline}")]
    DockedAfterDeadline {
        now: i64,
        ship: ShipId,
        deadline: i64,
    },
    #[error("t={now}: {ship} is not moored at {dock}")]
    NotMoored {
        now: i64,
        dock: DockIndex,
        ship: ShipId,
    },
    #[error("t={now}: cargo of {ship} handled in its docking timestep")]
    CargoWhileDocking { now: i64, ship: ShipId },
    #[error("t={now}: {ship} handled cargo {received}, expected {expected}")]
    CargoOutOfOrder {
        now: i64,
        ship: ShipId,
        expected: usize,
        received: usize,
    },
    #[error("t={now}: {crane} of {dock} used twice")]
    CraneReused {
        now: i64,
        dock: DockIndex,
        crane: CraneIndex,
    },
    #[error("t={now}: {crane} of {dock} cannot lift {size}")]
    CraneTooSmall {
        now: i64,
        dock: DockIndex,
        crane: CraneIndex,
        size: u32,
    },
    #[error("t={now}: {ship} left before its cargo was done")]
    PrematureRelease { now: i64, ship: ShipId },
    #[error("t={now}: {ship} was never staged")]
    UnknownShip { now: i64, ship: ShipId },
    #[error("{dock} published {published:?}, expected {expected:?}")]
    WrongAuthString {
        dock: DockIndex,
        published: Option<String>,
        expected: Option<String>,
    },
}

/// A ship that just left, with the length of the string it had to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    pub dock: DockIndex,
    pub ship: ShipId,
    pub auth_length: usize,
}

#[derive(Debug, Clone)]
struct DockWatch {
    category: u32,
    cranes: Vec<u32>,
    occupant: Option<ShipId>,
    vacated_at: Option<i64>,
}

#[derive(Debug, Clone)]
struct ShipWatch {
    request: ShipRequest<i64>,
    dock: Option<DockIndex>,
    docked_at: Option<i64>,
    last_cargo_at: Option<i64>,
    next_cargo: usize,
}

#[derive(Debug, Clone)]
pub struct InvariantChecker {
    docks: Vec<DockWatch>,
    ships: FxHashMap<ShipId, ShipWatch>,
    cranes_used: FxHashSet<(DockIndex, CraneIndex)>,
    regular_docked: bool,
    now: i64,
    observed: u64,
}

impl InvariantChecker {
    pub fn new(topology: &PortTopology) -> Self {
        Self {
            docks: topology
                .docks()
                .iter()
                .map(|spec| DockWatch {
                    category: spec.category(),
                    cranes: spec.cranes().to_vec(),
                    occupant: None,
                    vacated_at: Some(0),
                })
                .collect(),
            ships: FxHashMap::default(),
            cranes_used: FxHashSet::default(),
            regular_docked: false,
            now: 0,
            observed: 0,
        }
    }

    /// Remembers staged requests so later notifications can be checked.
    pub fn register(&mut self, requests: &[ShipRequest<i64>]) {
        for request in requests {
            self.ships.insert(
                request.ship_id,
                ShipWatch {
                    request: request.clone(),
                    dock: None,
                    docked_at: None,
                    last_cargo_at: None,
                    next_cargo: 0,
                },
            );
        }
    }

    pub fn begin_timestep(&mut self, now: i64) {
        self.now = now;
        self.cranes_used.clear();
        self.regular_docked = false;
    }

    /// Notifications checked so far.
    #[inline]
    pub fn observed(&self) -> u64 {
        self.observed
    }

    pub fn observe(&mut self, notification: &Notification<i64>) -> Result<Option<Release>, Violation> {
        self.observed += 1;
        let now = self.now;
        match *notification {
            Notification::Docked { dock, ship, .. } => {
                self.on_docked(dock, ship)?;
                Ok(None)
            }
            Notification::CargoAssigned {
                dock,
                ship,
                cargo_index,
                crane,
            } => {
                self.on_cargo(dock, ship, cargo_index, crane)?;
                Ok(None)
            }
            Notification::Undocked { dock, ship, .. } => self.on_undocked(dock, ship).map(Some),
            Notification::TimestepComplete { timestep } => {
                debug_assert_eq!(timestep, now);
                Ok(None)
            }
        }
    }

    fn watch(&mut self, ship: ShipId) -> Result<&mut ShipWatch, Violation> {
        let now = self.now;
        self.ships
            .get_mut(&ship)
            .ok_or(Violation::UnknownShip { now, ship })
    }

    fn on_docked(&mut self, dock: DockIndex, ship: ShipId) -> Result<(), Violation> {
        let now = self.now;
        let state = &self.docks[dock.get()];
        if let Some(occupant) = state.occupant {
            return Err(Violation::DockShared {
                now,
                dock,
                ship,
                occupant,
            });
        }
        if state.vacated_at == Some(now) {
            return Err(Violation::ReassignedWhileVacated { now, dock });
        }
        let dock_category = state.category;
        let regular_docked = self.regular_docked;

        let watch = self.watch(ship)?;
        let request = &watch.request;
        if request.category > dock_category {
            return Err(Violation::CategoryTooLow {
                now,
                dock,
                ship,
                ship_category: request.category,
                dock_category,
            });
        }
        let emergency = request.emergency && request.direction == Direction::Arriving;
        if emergency && regular_docked {
            return Err(Violation::EmergencyAfterRegular { now, ship });
        }
        if !emergency && request.direction == Direction::Arriving {
            let deadline = request.arrival.saturating_add(request.waiting_budget);
            if now > deadline {
                return Err(Violation::DockedAfterDeadline {
                    now,
                    ship,
                    deadline,
                });
            }
        }
        watch.dock = Some(dock);
        watch.docked_at = Some(now);

        if !emergency {
            self.regular_docked = true;
        }
        self.docks[dock.get()].occupant = Some(ship);
        Ok(())
    }

    fn on_cargo(
        &mut self,
        dock: DockIndex,
        ship: ShipId,
        cargo_index: usize,
        crane: CraneIndex,
    ) -> Result<(), Violation> {
        let now = self.now;
        if self.docks[dock.get()].occupant != Some(ship) {
            return Err(Violation::NotMoored { now, dock, ship });
        }
        if !self.cranes_used.insert((dock, crane)) {
            return Err(Violation::CraneReused { now, dock, crane });
        }
        let capacity = self.docks[dock.get()].cranes[crane.get()];

        let watch = self.watch(ship)?;
        if watch.docked_at == Some(now) {
            return Err(Violation::CargoWhileDocking { now, ship });
        }
        if cargo_index != watch.next_cargo {
            return Err(Violation::CargoOutOfOrder {
                now,
                ship,
                expected: watch.next_cargo,
                received: cargo_index,
            });
        }
        let size = watch.request.cargo[cargo_index];
        if size > capacity {
            return Err(Violation::CraneTooSmall {
                now,
                dock,
                crane,
                size,
            });
        }
        watch.next_cargo += 1;
        watch.last_cargo_at = Some(now);
        Ok(())
    }

    fn on_undocked(&mut self, dock: DockIndex, ship: ShipId) -> Result<Release, Violation> {
        let now = self.now;
        if self.docks[dock.get()].occupant != Some(ship) {
            return Err(Violation::NotMoored { now, dock, ship });
        }

        let watch = self.watch(ship)?;
        let done = watch.next_cargo == watch.request.cargo.len();
        let (Some(docked_at), Some(last_cargo_at)) = (watch.docked_at, watch.last_cargo_at) else {
            return Err(Violation::PrematureRelease { now, ship });
        };
        if !done || last_cargo_at >= now || last_cargo_at <= docked_at {
            return Err(Violation::PrematureRelease { now, ship });
        }
        watch.dock = None;

        let state = &mut self.docks[dock.get()];
        state.occupant = None;
        state.vacated_at = Some(now);
        Ok(Release {
            dock,
            ship,
            auth_length: (last_cargo_at - docked_at) as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wharf_model::topology::PortTopologyBuilder;

    fn topology() -> PortTopology {
        let mut builder = PortTopologyBuilder::new(1);
        builder.add_dock(1, [10]);
        builder.add_dock(2, [4, 8]);
        builder.build().unwrap()
    }

    fn request(id: u32, category: u32, emergency: bool, cargo: Vec<u32>) -> ShipRequest<i64> {
        ShipRequest {
            ship_id: ShipId(id),
            direction: Direction::Arriving,
            category,
            emergency,
            arrival: 0,
            waiting_budget: 2,
            cargo,
        }
    }

    fn docked(dock: usize, ship: u32) -> Notification<i64> {
        Notification::Docked {
            dock: DockIndex::new(dock),
            ship: ShipId(ship),
            direction: Direction::Arriving,
        }
    }

    fn cargo(dock: usize, ship: u32, cargo_index: usize, crane: usize) -> Notification<i64> {
        Notification::CargoAssigned {
            dock: DockIndex::new(dock),
            ship: ShipId(ship),
            cargo_index,
            crane: CraneIndex::new(crane),
        }
    }

    fn undocked(dock: usize, ship: u32) -> Notification<i64> {
        Notification::Undocked {
            dock: DockIndex::new(dock),
            ship: ShipId(ship),
            direction: Direction::Arriving,
        }
    }

    #[test]
    fn test_accepts_a_well_formed_lifecycle() {
        let mut checker = InvariantChecker::new(&topology());
        checker.register(&[request(1, 2, false, vec![3, 7])]);

        checker.begin_timestep(1);
        checker.observe(&docked(1, 1)).unwrap();
        checker.begin_timestep(2);
        checker.observe(&cargo(1, 1, 0, 0)).unwrap();
        checker.observe(&cargo(1, 1, 1, 1)).unwrap();
        checker.begin_timestep(3);
        let release = checker.observe(&undocked(1, 1)).unwrap();
        assert_eq!(
            release,
            Some(Release {
                dock: DockIndex::new(1),
                ship: ShipId(1),
                auth_length: 1,
            })
        );
        assert_eq!(checker.observed(), 4);
    }

    #[test]
    fn test_detects_shared_dock_and_low_category() {
        let mut checker = InvariantChecker::new(&topology());
        checker.register(&[request(1, 1, false, vec![1]), request(2, 1, false, vec![1]), request(3, 2, false, vec![1])]);
        checker.begin_timestep(1);
        checker.observe(&docked(0, 1)).unwrap();
        assert!(matches!(
            checker.observe(&docked(0, 2)),
            Err(Violation::DockShared { .. })
        ));
        assert!(matches!(
            checker.observe(&docked(0, 3)),
            Err(Violation::DockShared { .. }) | Err(Violation::CategoryTooLow { .. })
        ));
    }

    #[test]
    fn test_detects_reuse_of_a_vacated_dock() {
        let mut checker = InvariantChecker::new(&topology());
        checker.register(&[request(1, 1, false, vec![1]), request(2, 1, true, vec![1])]);
        checker.begin_timestep(1);
        checker.observe(&docked(0, 1)).unwrap();
        checker.begin_timestep(2);
        checker.observe(&cargo(0, 1, 0, 0)).unwrap();
        checker.begin_timestep(3);
        checker.observe(&undocked(0, 1)).unwrap();
        assert_eq!(
            checker.observe(&docked(0, 2)),
            Err(Violation::ReassignedWhileVacated {
                now: 3,
                dock: DockIndex::new(0)
            })
        );
    }

    #[test]
    fn test_docks_start_out_vacated_at_timestep_zero() {
        let mut checker = InvariantChecker::new(&topology());
        checker.register(&[request(1, 1, false, vec![1])]);
        checker.begin_timestep(0);
        assert_eq!(
            checker.observe(&docked(0, 1)),
            Err(Violation::ReassignedWhileVacated {
                now: 0,
                dock: DockIndex::new(0)
            })
        );
    }

    #[test]
    fn test_detects_emergency_after_regular() {
        let mut checker = InvariantChecker::new(&topology());
        checker.register(&[request(1, 1, false, vec![1]), request(2, 1, true, vec![1])]);
        checker.begin_timestep(1);
        checker.observe(&docked(0, 1)).unwrap();
        assert_eq!(
            checker.observe(&docked(1, 2)),
            Err(Violation::EmergencyAfterRegular {
                now: 1,
                ship: ShipId(2)
            })
        );
    }

    #[test]
    fn test_detects_late_docking() {
        let mut checker = InvariantChecker::new(&topology());
        checker.register(&[request(1, 1, false, vec![1])]);
        checker.begin_timestep(3);
        assert_eq!(
            checker.observe(&docked(0, 1)),
            Err(Violation::DockedAfterDeadline {
                now: 3,
                ship: ShipId(1),
                deadline: 2
            })
        );
    }

    #[test]
    fn test_detects_cargo_rule_breaches() {
        let mut checker = InvariantChecker::new(&topology());
        checker.register(&[request(1, 2, false, vec![5, 5, 1])]);
        checker.begin_timestep(1);
        checker.observe(&docked(1, 1)).unwrap();
        assert!(matches!(
            checker.observe(&cargo(1, 1, 0, 1)),
            Err(Violation::CargoWhileDocking { .. })
        ));

        checker.begin_timestep(2);
        assert!(matches!(
            checker.observe(&cargo(1, 1, 0, 0)),
            Err(Violation::CraneTooSmall { .. })
        ));
        checker.begin_timestep(3);
        checker.observe(&cargo(1, 1, 0, 1)).unwrap();
        assert!(matches!(
            checker.observe(&cargo(1, 1, 2, 0)),
            Err(Violation::CargoOutOfOrder { .. })
        ));
        assert!(matches!(
            checker.observe(&cargo(1, 1, 1, 1)),
            Err(Violation::CraneReused { .. })
        ));
        assert!(matches!(
            checker.observe(&undocked(1, 1)),
            Err(Violation::PrematureRelease { .. })
        ));
    }
}
