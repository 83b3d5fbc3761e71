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


use std::time::Duration;

/// What happened during one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimestepReport<T> {
    pub timestep: T,
    /// Arrival records turned into ships.
    pub ingested: usize,
    /// Arrival records rejected because the port was full.
    pub dropped: usize,
    /// Ships docked by the emergency pass.
    pub emergency_docked: usize,
    /// Ships docked by the regular pass.
    pub regular_docked: usize,
    pub forfeited: usize,
    pub cargo_assigned: usize,
    /// Authentication searches run by the release pass.
    pub auth_searches: usize,
    /// Searches that ended without releasing their ship.
    pub auth_retries: usize,
    pub worker_timeouts: usize,
    pub undocked: usize,
    pub candidates_tried: u64,
}

impl<T> TimestepReport<T> {
    #[inline]
    pub fn new(timestep: T) -> Self {
        Self {
            timestep,
            ingested: 0,
            dropped: 0,
            emergency_docked: 0,
            regular_docked: 0,
            forfeited: 0,
            cargo_assigned: 0,
            auth_searches: 0,
            auth_retries: 0,
            worker_timeouts: 0,
            undocked: 0,
            candidates_tried: 0,
        }
    }

    #[inline]
    pub fn docked(&self) -> usize {
        self.emergency_docked + self.regular_docked
    }
}

impl<T> std::fmt::Display for TimestepReport<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "t={} ingested={} dropped={} docked={}+{} forfeited={} cargo={} searches={} undocked={} candidates={}",
            self.timestep,
            self.ingested,
            self.dropped,
            self.emergency_docked,
            self.regular_docked,
            self.forfeited,
            self.cargo_assigned,
            self.auth_searches,
            self.undocked,
            self.candidates_tried
        )
    }
}

/// Statistics collected over a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchedulerStatistics {
    pub timesteps: u64,
    pub ships_ingested: u64,
    pub ships_dropped: u64,
    pub ships_docked: u64,
    pub ships_undocked: u64,
    pub ships_forfeited: u64,
    pub cargo_assigned: u64,
    /// Authentication searches started.
    pub auth_searches: u64,
    /// Searches that ended without releasing the ship.
    pub auth_retries: u64,
    pub candidates_tried: u64,
    pub worker_timeouts: u64,
    pub run_duration: Duration,
}

impl SchedulerStatistics {
    /// Folds the counters of one timestep into the run totals.
    pub fn record_timestep<T>(&mut self, report: &TimestepReport<T>) {
        self.timesteps += 1;
        self.ships_ingested += report.ingested as u64;
        self.ships_dropped += report.dropped as u64;
        self.ships_docked += report.docked() as u64;
        self.ships_undocked += report.undocked as u64;
        self.ships_forfeited += report.forfeited as u64;
        self.cargo_assigned += report.cargo_assigned as u64;
        self.auth_searches += report.auth_searches as u64;
        self.auth_retries += report.auth_retries as u64;
        self.worker_timeouts += report.worker_timeouts as u64;
        self.candidates_tried += report.candidates_tried;
    }
}

impl std::fmt::Display for SchedulerStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Scheduler Statistics:")?;
        writeln!(f, "  Timesteps: {}", self.timesteps)?;
        writeln!(
            f,
            "  Ships: {} ingested, {} dropped, {} docked, {} undocked, {} forfeited",
            self.ships_ingested,
            self.ships_dropped,
            self.ships_docked,
            self.ships_undocked,
            self.ships_forfeited
        )?;
        writeln!(f, "  Cargo Assigned: {}", self.cargo_assigned)?;
        writeln!(
            f,
            "  Authentication: {} searches, {} retries, {} candidates, {} worker timeouts",
            self.auth_searches, self.auth_retries, self.candidates_tried, self.worker_timeouts
        )?;
        writeln!(
            f,
            "  Run Duration (secs): {:.3}",
            self.run_duration.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    #[test]
    fn test_run_totals_accumulate_reports() {
        let mut first = TimestepReport::<IntegerType>::new(0);
        first.ingested = 3;
        first.emergency_docked = 1;
        first.regular_docked = 1;
        first.dropped = 1;

        let mut second = TimestepReport::<IntegerType>::new(1);
        second.cargo_assigned = 2;
        second.auth_searches = 2;
        second.auth_retries = 1;
        second.worker_timeouts = 1;
        second.undocked = 1;
        second.candidates_tried = 40;

        let mut stats = SchedulerStatistics::default();
        stats.record_timestep(&first);
        stats.record_timestep(&second);

        assert_eq!(stats.timesteps, 2);
        assert_eq!(stats.ships_ingested, 3);
        assert_eq!(stats.ships_dropped, 1);
        assert_eq!(stats.ships_docked, 2);
        assert_eq!(stats.ships_undocked, 1);
        assert_eq!(stats.cargo_assigned, 2);
        assert_eq!(stats.auth_searches, 2);
        assert_eq!(stats.auth_retries, 1);
        assert_eq!(stats.worker_timeouts, 1);
        assert_eq!(stats.candidates_tried, 40);
    }

    #[test]
    fn test_report_display() {
        let mut report = TimestepReport::<IntegerType>::new(7);
        report.emergency_docked = 1;
        report.regular_docked = 2;
        let line = report.to_string();
        assert!(line.starts_with("t=7 "));
        assert!(line.contains("docked=1+2"));
        assert_eq!(report.docked(), 3);
    }

    #[test]
    fn test_statistics_display() {
        let stats = SchedulerStatistics {
            timesteps: 10,
            ships_forfeited: 2,
            ..Default::default()
        };
        let rendered = stats.to_string();
        assert!(rendered.contains("Scheduler Statistics:"));
        assert!(rendered.contains("Timesteps: 10"));
        assert!(rendered.contains("2 forfeited"));
    }
}
