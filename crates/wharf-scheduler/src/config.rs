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


//! Coordinator configuration.
//!
//! ```rust
//! # use wharf_scheduler::config::SchedulerConfig;
//! # use std::time::Duration;
//! let config = SchedulerConfig::builder()
//!     .max_live_ships(64)
//!     .search_time_limit(Some(Duration::from_secs(2)))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_live_ships(), 64);
//! ```

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("the live-ship capacity must be at least 1")]
    ZeroCapacity,
    #[error("the verdict timeout must be longer than zero")]
    ZeroVerdictTimeout,
    #[error("the search time limit must be longer than zero")]
    ZeroSearchTimeLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    max_live_ships: usize,
    verdict_timeout: Option<Duration>,
    search_time_limit: Option<Duration>,
    progress_log_interval: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_live_ships: Self::DEFAULT_MAX_LIVE_SHIPS,
            verdict_timeout: Some(Self::DEFAULT_VERDICT_TIMEOUT),
            search_time_limit: None,
            progress_log_interval: Self::DEFAULT_PROGRESS_LOG_INTERVAL,
        }
    }
}

impl SchedulerConfig {
    pub const DEFAULT_MAX_LIVE_SHIPS: usize = 2000;
    pub const DEFAULT_VERDICT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_PROGRESS_LOG_INTERVAL: u64 = 10_000;

    #[inline]
    pub fn builder() -> SchedulerConfigBuilder {
        SchedulerConfigBuilder::new()
    }

    /// Ships that are waiting or docked at the same time.
    #[inline]
    pub fn max_live_ships(&self) -> usize {
        self.max_live_ships
    }

    /// How long to wait for a single verdict. `None` waits forever.
    #[inline]
    pub fn verdict_timeout(&self) -> Option<Duration> {
        self.verdict_timeout
    }

    /// Wall-clock budget of one authentication search.
    #[inline]
    pub fn search_time_limit(&self) -> Option<Duration> {
        self.search_time_limit
    }

    #[inline]
    pub fn progress_log_interval(&self) -> u64 {
        self.progress_log_interval
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfigBuilder {
    config: SchedulerConfig,
}

impl Default for SchedulerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    #[inline]
    pub fn max_live_ships(mut self, max_live_ships: usize) -> Self {
        self.config.max_live_ships = max_live_ships;
        self
    }

    #[inline]
    pub fn verdict_timeout(mut self, verdict_timeout: Option<Duration>) -> Self {
        self.config.verdict_timeout = verdict_timeout;
        self
    }

    #[inline]
    pub fn search_time_limit(mut self, search_time_limit: Option<Duration>) -> Self {
        self.config.search_time_limit = search_time_limit;
        self
    }

    /// `0` disables progress lines.
    #[inline]
    pub fn progress_log_interval(mut self, progress_log_interval: u64) -> Self {
        self.config.progress_log_interval = progress_log_interval;
        self
    }

    pub fn build(self) -> Result<SchedulerConfig, ConfigError> {
        let config = self.config;
        if config.max_live_ships == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if config.verdict_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroVerdictTimeout);
        }
        if config.search_time_limit == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroSearchTimeLimit);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::builder().build().unwrap();
        assert_eq!(config, SchedulerConfig::default());
        assert_eq!(config.max_live_ships(), 2000);
        assert_eq!(config.verdict_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.search_time_limit(), None);
    }

    #[test]
    fn test_rejects_degenerate_values() {
        assert_eq!(
            SchedulerConfig::builder().max_live_ships(0).build(),
            Err(ConfigError::ZeroCapacity)
        );
        assert_eq!(
            SchedulerConfig::builder()
                .verdict_timeout(Some(Duration::ZERO))
                .build(),
            Err(ConfigError::ZeroVerdictTimeout)
        );
        assert_eq!(
            SchedulerConfig::builder()
                .search_time_limit(Some(Duration::ZERO))
                .build(),
            Err(ConfigError::ZeroSearchTimeLimit)
        );
    }

    #[test]
    fn test_unbounded_verdict_wait_is_allowed() {
        let config = SchedulerConfig::builder()
            .verdict_timeout(None)
            .build()
            .unwrap();
        assert_eq!(config.verdict_timeout(), None);
    }
}
