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


//! # Coordinator
//!
//! Owns every dock and ship of the port and advances them one timestep at a
//! time. Each `Advance` is handled to completion before the next one is
//! read, in five passes:
//!
//! 1. **Ingest**: up to `new_arrivals` staged requests become waiting
//!    ships. Requests beyond the live-ship capacity are dropped and
//!    reported.
//! 2. **Emergency pass**: waiting emergency arrivals are offered a dock,
//!    in creation order.
//! 3. **Regular pass**: every other waiting ship, in creation order. A
//!    regular arrival past its deadline forfeits instead.
//! 4. **Dispatch pass**: every docked ship hands cargo to its cranes.
//! 5. **Release pass**: ships whose cargo finished in an earlier timestep
//!    run the authentication search and leave on success.
//!
//! `TimestepComplete` is reported afterwards.
//!
//! Emergency arrivals are never overdue and nothing frees a dock between
//! the two allocation passes, so the regular pass does not offer them a
//! second time.
//!
//! ## Usage
//!
//! `run` blocks on the transport until a finishing `Advance` arrives and
//! returns the run statistics. `step` handles a single event without
//! reading the transport, for callers that drive the clock themselves.

use crate::{
    allocator::FirstFitAllocator,
    config::SchedulerConfig,
    context::PortContext,
    dispatcher::CargoDispatcher,
    error::SchedulerError,
    event::{Advance, Notification},
    gatekeeper::{Clearance, Denial, Gatekeeper},
    staging::StagingArea,
    stats::{SchedulerStatistics, TimestepReport},
    transport::{EventSource, NotificationSink},
};
use std::{
    sync::{Arc, atomic::AtomicBool},
    time::Instant,
};
use wharf_auth::error::AuthError;
use wharf_core::num::PortNumeric;
use wharf_model::{
    dock::Dock,
    index::{DockIndex, ShipIndex},
    ship::{Ship, ShipId},
    time::MaybeTimestep,
    topology::PortTopology,
};

/// The result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    Processed(TimestepReport<T>),
    Finished,
}

#[derive(Debug)]
pub struct Coordinator<T, X, S>
where
    T: PortNumeric,
{
    context: PortContext<X, S>,
    config: SchedulerConfig,
    docks: Vec<Dock<T>>,
    ships: Vec<Ship<T>>,
    live_ships: usize,
    allocator: FirstFitAllocator,
    dispatcher: CargoDispatcher,
    gatekeeper: Gatekeeper,
    statistics: SchedulerStatistics,
    current: MaybeTimestep<T>,
    finished: bool,
}

#[inline]
fn wide<T: PortNumeric>(t: T) -> i64 {
    t.to_i64().unwrap_or(i64::MAX)
}

impl<T, X, S> Coordinator<T, X, S>
where
    T: PortNumeric,
    X: EventSource<T> + NotificationSink<T>,
    S: StagingArea<T>,
{
    /// Creates a coordinator for `topology`. The verdict timeout of
    /// `config` replaces the one the pool was built with.
    pub fn new(topology: &PortTopology, mut context: PortContext<X, S>, config: SchedulerConfig) -> Self {
        context.pool.set_verdict_timeout(config.verdict_timeout());
        let max_cranes = topology
            .docks()
            .iter()
            .map(|d| d.cranes().len())
            .max()
            .unwrap_or(0);

        Self {
            context,
            config,
            docks: topology.instantiate(),
            ships: Vec::new(),
            live_ships: 0,
            allocator: FirstFitAllocator::new(),
            dispatcher: CargoDispatcher::preallocated(max_cranes),
            gatekeeper: Gatekeeper::new(&config),
            statistics: SchedulerStatistics::default(),
            current: MaybeTimestep::none(),
            finished: false,
        }
    }

    /// Processes events from the transport until the run is finished.
    pub fn run(&mut self) -> Result<SchedulerStatistics, SchedulerError> {
        let start = Instant::now();
        tracing::info!(
            docks = self.docks.len(),
            workers = self.context.pool.num_workers(),
            capacity = self.config.max_live_ships(),
            "coordinator started"
        );

        loop {
            let advance = self.context.transport.recv()?;
            if let Step::Finished = self.step(advance)? {
                break;
            }
        }

        self.statistics.run_duration = start.elapsed();
        tracing::info!(
            timesteps = self.statistics.timesteps,
            undocked = self.statistics.ships_undocked,
            forfeited = self.statistics.ships_forfeited,
            dropped = self.statistics.ships_dropped,
            "coordinator finished"
        );
        Ok(self.statistics.clone())
    }

    /// Handles one event.
    pub fn step(&mut self, advance: Advance<T>) -> Result<Step<T>, SchedulerError> {
        if self.finished {
            return Err(SchedulerError::AlreadyFinished);
        }
        let now = advance.timestep;
        if now < T::zero() {
            return Err(SchedulerError::NegativeTimestep {
                received: wide(now),
            });
        }
        if let Some(previous) = self.current.into_option() {
            if now < previous {
                return Err(SchedulerError::NonMonotonicTimestep {
                    previous: wide(previous),
                    received: wide(now),
                });
            }
        }
        if advance.finished {
            self.finished = true;
            return Ok(Step::Finished);
        }
        self.current = MaybeTimestep::some(now);

        let mut report = TimestepReport::new(now);
        self.ingest(advance.new_arrivals, &mut report)?;
        self.emergency_pass(now, &mut report)?;
        self.regular_pass(now, &mut report)?;
        self.dispatch_pass(now, &mut report)?;
        self.release_pass(now, &mut report)?;
        self.context
            .transport
            .send(Notification::TimestepComplete { timestep: now })?;

        self.statistics.record_timestep(&report);
        tracing::debug!(%report, live = self.live_ships, "timestep complete");
        Ok(Step::Processed(report))
    }

    fn ingest(&mut self, count: usize, report: &mut TimestepReport<T>) -> Result<(), SchedulerError> {
        let capacity = self.config.max_live_ships();
        let mut dropped: Vec<ShipId> = Vec::new();

        for slot in 0..count {
            let request = self.context.staging.new_arrival(slot)?;
            if self.live_ships >= capacity {
                dropped.push(request.ship_id);
                continue;
            }
            tracing::trace!(ship = %request.ship_id, direction = %request.direction, "ship ingested");
            self.ships.push(Ship::from_request(request));
            self.live_ships += 1;
            report.ingested += 1;
        }

        if !dropped.is_empty() {
            tracing::warn!(
                timestep = %report.timestep,
                capacity,
                dropped = ?dropped,
                "port at capacity, arrivals dropped"
            );
            report.dropped = dropped.len();
        }
        Ok(())
    }

    fn emergency_pass(&mut self, now: T, report: &mut TimestepReport<T>) -> Result<(), SchedulerError> {
        for (i, ship) in self.ships.iter_mut().enumerate() {
            if !ship.is_waiting() || !ship.is_emergency_arrival() {
                continue;
            }
            let assigned = self.allocator.try_assign(
                &mut self.docks,
                ShipIndex::new(i),
                ship,
                now,
                &mut self.context.transport,
            )?;
            if let Some(dock) = assigned {
                log_docked(ship, dock, now);
                report.emergency_docked += 1;
            }
        }
        Ok(())
    }

    fn regular_pass(&mut self, now: T, report: &mut TimestepReport<T>) -> Result<(), SchedulerError> {
        for (i, ship) in self.ships.iter_mut().enumerate() {
            if !ship.is_waiting() || ship.is_emergency_arrival() {
                continue;
            }
            if ship.is_overdue(now) {
                ship.forfeit();
                self.live_ships -= 1;
                report.forfeited += 1;
                tracing::info!(
                    ship = %ship.id(),
                    %now,
                    deadline = %ship.deadline(),
                    "ship gave up waiting"
                );
                continue;
            }
            let assigned = self.allocator.try_assign(
                &mut self.docks,
                ShipIndex::new(i),
                ship,
                now,
                &mut self.context.transport,
            )?;
            if let Some(dock) = assigned {
                log_docked(ship, dock, now);
                report.regular_docked += 1;
            }
        }
        Ok(())
    }

    fn dispatch_pass(&mut self, now: T, report: &mut TimestepReport<T>) -> Result<(), SchedulerError> {
        for ship in self.ships.iter_mut() {
            let Some(dock) = ship.dock().filter(|_| ship.is_docked()) else {
                continue;
            };
            report.cargo_assigned += self.dispatcher.dispatch(
                dock,
                &self.docks[dock.get()],
                ship,
                now,
                &mut self.context.transport,
            )?;
        }
        Ok(())
    }

    fn release_pass(&mut self, now: T, report: &mut TimestepReport<T>) -> Result<(), SchedulerError> {
        for i in 0..self.ships.len() {
            let ship = &mut self.ships[i];
            if !ship.is_docked() || !ship.is_cargo_complete() {
                continue;
            }
            if ship.last_cargo_at().into_option().is_some_and(|last| last >= now) {
                continue;
            }

            let clearance = self.gatekeeper.authenticate(
                &mut self.context.pool,
                &mut self.context.staging,
                ship,
            )?;
            match clearance {
                Clearance::Granted { statistics, .. } => {
                    report.auth_searches += 1;
                    report.candidates_tried += statistics.candidates_tried;
                    self.undock(ShipIndex::new(i), now)?;
                    report.undocked += 1;
                }
                Clearance::Denied(denial) => {
                    if denial.searched() {
                        report.auth_searches += 1;
                        report.auth_retries += 1;
                    }
                    if let Some(statistics) = denial.statistics() {
                        report.candidates_tried += statistics.candidates_tried;
                    }
                    if let Denial::Retry(AuthError::WorkerUnreachable { .. }) = denial {
                        report.worker_timeouts += 1;
                    }
                }
            }
        }
        Ok(())
    }

    /// Releases a docked ship: reports `Undocked`, frees the dock and marks
    /// the ship serviced. The dock cannot be reassigned before the next
    /// timestep.
    fn undock(&mut self, ship_index: ShipIndex, now: T) -> Result<(), SchedulerError> {
        let ship = &mut self.ships[ship_index.get()];
        let Some(dock) = ship.dock().filter(|_| ship.is_docked()) else {
            return Ok(());
        };

        self.context.transport.send(Notification::Undocked {
            dock,
            ship: ship.id(),
            direction: ship.direction(),
        })?;
        self.docks[dock.get()].vacate(now);
        ship.release();
        self.live_ships -= 1;
        tracing::info!(ship = %ship.id(), %dock, %now, "ship undocked");
        Ok(())
    }
}

fn log_docked<T>(ship: &Ship<T>, dock: DockIndex, now: T)
where
    T: PortNumeric,
{
    tracing::info!(
        ship = %ship.id(),
        %dock,
        %now,
        direction = %ship.direction(),
        emergency = ship.is_emergency(),
        "ship docked"
    );
    if ship.cargo().is_empty() {
        tracing::warn!(ship = %ship.id(), %dock, "ship without cargo docked; it can never authenticate");
    }
}

impl<T, X, S> Coordinator<T, X, S>
where
    T: PortNumeric,
{
    /// Returns a ship by its creation index.
    ///
    /// # Panics
    ///
    /// Panics if `ship_index` is not in `0..ships().len()`.
    #[inline]
    pub fn ship(&self, ship_index: ShipIndex) -> &Ship<T> {
        let index = ship_index.get();
        assert!(
            index < self.ships.len(),
            "called `Coordinator::ship` with ship index out of bounds: the len is {} but the index is {}",
            self.ships.len(),
            index
        );
        &self.ships[index]
    }

    /// Every ship ever ingested, in creation order.
    #[inline]
    pub fn ships(&self) -> &[Ship<T>] {
        &self.ships
    }

    /// # Panics
    ///
    /// Panics if `dock_index` is not in `0..docks().len()`.
    #[inline]
    pub fn dock(&self, dock_index: DockIndex) -> &Dock<T> {
        let index = dock_index.get();
        assert!(
            index < self.docks.len(),
            "called `Coordinator::dock` with dock index out of bounds: the len is {} but the index is {}",
            self.docks.len(),
            index
        );
        &self.docks[index]
    }

    #[inline]
    pub fn docks(&self) -> &[Dock<T>] {
        &self.docks
    }

    /// Ships that are waiting or docked.
    #[inline]
    pub fn live_ships(&self) -> usize {
        self.live_ships
    }

    /// The timestep of the last processed event.
    #[inline]
    pub fn current_timestep(&self) -> Option<T> {
        self.current.into_option()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn statistics(&self) -> &SchedulerStatistics {
        &self.statistics
    }

    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    #[inline]
    pub fn context(&self) -> &PortContext<X, S> {
        &self.context
    }

    #[inline]
    pub fn context_mut(&mut self) -> &mut PortContext<X, S> {
        &mut self.context
    }

    #[inline]
    pub fn into_context(self) -> PortContext<X, S> {
        self.context
    }

    /// Setting the returned flag aborts the running authentication search.
    #[inline]
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        self.gatekeeper.interrupt_handle()
    }
}
