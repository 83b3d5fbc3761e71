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


//! The driving side of a simulation: stages arrivals, advances the clock,
//! waits for `TimestepComplete` and checks everything the coordinator
//! reported in between.

use crate::{
    checker::{InvariantChecker, Violation},
    error::SimError,
    scenario::ArrivalGenerator,
    secrets::SecretBook,
};
use std::time::Duration;
use wharf_scheduler::{
    event::{Advance, Notification},
    staging::SharedStaging,
    transport::ClockLink,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockSummary {
    pub timesteps: u64,
    pub arrivals_staged: u64,
    pub notifications: u64,
    pub releases_verified: u64,
}

#[derive(Debug)]
pub struct Clock {
    link: ClockLink<i64>,
    staging: SharedStaging<i64>,
    secrets: SecretBook,
    generator: ArrivalGenerator,
    checker: InvariantChecker,
    completion_timeout: Option<Duration>,
}

impl Clock {
    pub fn new(
        link: ClockLink<i64>,
        staging: SharedStaging<i64>,
        secrets: SecretBook,
        generator: ArrivalGenerator,
        checker: InvariantChecker,
    ) -> Self {
        Self {
            link,
            staging,
            secrets,
            generator,
            checker,
            completion_timeout: None,
        }
    }

    /// Bounds the wait for each notification of a timestep.
    #[inline]
    pub fn with_completion_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.completion_timeout = timeout;
        self
    }

    /// Drives `timesteps` timesteps and then ends the run.
    pub fn run(mut self, timesteps: u64) -> Result<ClockSummary, SimError> {
        let mut summary = ClockSummary::default();

        for now in 0..timesteps as i64 {
            let arrivals = self.generator.generate(now);
            self.checker.register(&arrivals);
            let count = arrivals.len();
            self.staging.stage_arrivals(arrivals)?;
            summary.arrivals_staged += count as u64;

            self.checker.begin_timestep(now);
            self.link.advance(Advance::new(now, count))?;
            for notification in self.link.await_completion(self.completion_timeout)? {
                summary.notifications += 1;
                if self.check(&notification)? {
                    summary.releases_verified += 1;
                }
            }
            summary.timesteps += 1;
            tracing::trace!(now, staged = count, "timestep acknowledged");
        }

        self.link.advance(Advance::finish(timesteps as i64))?;
        tracing::debug!(
            timesteps = summary.timesteps,
            checked = self.checker.observed(),
            "clock finished"
        );
        Ok(summary)
    }

    /// Returns `true` if the notification released a ship whose published
    /// string was verified.
    fn check(&mut self, notification: &Notification<i64>) -> Result<bool, SimError> {
        let Some(release) = self.checker.observe(notification)? else {
            return Ok(false);
        };

        let published = self.staging.auth_string(release.dock)?;
        let expected = self.secrets.peek(release.dock, release.auth_length);
        if published.is_none() || published != expected {
            return Err(Violation::WrongAuthString {
                dock: release.dock,
                published,
                expected,
            }
            .into());
        }
        Ok(true)
    }
}
