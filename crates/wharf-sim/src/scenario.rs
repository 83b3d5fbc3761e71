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


//! Deterministic traffic for the simulated port.
//!
//! Every timestep the generator makes `max_arrivals` independent draws,
//! each producing a ship with probability `arrival_rate`. All randomness
//! comes from one `ChaCha8Rng` seeded by the caller, so a seed reproduces a
//! run exactly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wharf_model::ship::{Direction, ShipId, ShipRequest};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioConfig {
    pub arrival_rate: f64,
    pub max_arrivals: usize,
    pub emergency_ratio: f64,
    pub departure_ratio: f64,
    pub max_category: u32,
    pub max_cargo_items: usize,
    pub max_cargo_size: u32,
    pub max_waiting_budget: i64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            arrival_rate: 0.4,
            max_arrivals: 3,
            emergency_ratio: 0.1,
            departure_ratio: 0.3,
            max_category: 3,
            max_cargo_items: 4,
            max_cargo_size: 16,
            max_waiting_budget: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArrivalGenerator {
    rng: ChaCha8Rng,
    config: ScenarioConfig,
    next_id: u32,
}

impl ArrivalGenerator {
    pub fn new(seed: u64, config: ScenarioConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
            next_id: 1,
        }
    }

    #[inline]
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Ships arriving at `now`.
    pub fn generate(&mut self, now: i64) -> Vec<ShipRequest<i64>> {
        let mut arrivals = Vec::new();
        for _ in 0..self.config.max_arrivals {
            if self.rng.random_bool(self.config.arrival_rate) {
                arrivals.push(self.ship(now));
            }
        }
        arrivals
    }

    fn ship(&mut self, now: i64) -> ShipRequest<i64> {
        let ship_id = ShipId(self.next_id);
        self.next_id += 1;

        let direction = if self.rng.random_bool(self.config.departure_ratio) {
            Direction::Departing
        } else {
            Direction::Arriving
        };
        let items = self.rng.random_range(1..=self.config.max_cargo_items.max(1));
        let cargo = (0..items)
            .map(|_| self.rng.random_range(1..=self.config.max_cargo_size.max(1)))
            .collect();

        ShipRequest {
            ship_id,
            direction,
            category: self.rng.random_range(1..=self.config.max_category.max(1)),
            emergency: self.rng.random_bool(self.config.emergency_ratio),
            arrival: now,
            waiting_budget: self.rng.random_range(0..=self.config.max_waiting_budget.max(0)),
            cargo,
        }
    }
}
