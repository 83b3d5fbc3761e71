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

/// Counters collected during one authentication search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthStatistics {
    /// Candidates sent to workers.
    pub candidates_tried: u64,
    /// Size of the candidate space that was searched.
    pub search_space: u64,
    /// Distinct workers that received at least one candidate.
    pub workers_used: usize,
    /// Wall-clock duration of the search.
    pub duration: Duration,
}

impl AuthStatistics {
    /// Share of the candidate space that was tried, in percent.
    #[inline]
    pub fn coverage(&self) -> f64 {
        if self.search_space == 0 {
            return 0.0;
        }
        self.candidates_tried as f64 / self.search_space as f64 * 100.0
    }
}

impl std::fmt::Display for AuthStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Authentication Statistics:")?;
        writeln!(
            f,
            "  Candidates Tried: {} of {} ({:.1}%)",
            self.candidates_tried,
            self.search_space,
            self.coverage()
        )?;
        writeln!(f, "  Workers Used: {}", self.workers_used)?;
        writeln!(f, "  Duration (secs): {:.3}", self.duration.as_secs_f64())
    }
}

/// Builder for `AuthStatistics`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthStatisticsBuilder {
    candidates_tried: u64,
    search_space: u64,
    workers_used: usize,
    duration: Duration,
}

impl AuthStatisticsBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn candidates_tried(mut self, candidates_tried: u64) -> Self {
        self.candidates_tried = candidates_tried;
        self
    }

    #[inline]
    pub fn search_space(mut self, search_space: u64) -> Self {
        self.search_space = search_space;
        self
    }

    #[inline]
    pub fn workers_used(mut self, workers_used: usize) -> Self {
        self.workers_used = workers_used;
        self
    }

    #[inline]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[inline]
    pub fn build(self) -> AuthStatistics {
        AuthStatistics {
            candidates_tried: self.candidates_tried,
            search_space: self.search_space,
            workers_used: self.workers_used,
            duration: self.duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_constructs_expected_struct() {
        let stats = AuthStatisticsBuilder::new()
            .candidates_tried(12)
            .search_space(25)
            .workers_used(3)
            .duration(Duration::from_millis(1500))
            .build();

        assert_eq!(stats.candidates_tried, 12);
        assert_eq!(stats.search_space, 25);
        assert_eq!(stats.workers_used, 3);
        assert_eq!(stats.duration, Duration::from_millis(1500));
        assert!((stats.coverage() - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_formats_all_fields() {
        let stats = AuthStatistics {
            candidates_tried: 5,
            search_space: 5,
            workers_used: 2,
            duration: Duration::from_millis(1234),
        };
        let rendered = stats.to_string();

        assert!(rendered.contains("Authentication Statistics:"));
        assert!(rendered.contains("Candidates Tried: 5 of 5 (100.0%)"));
        assert!(rendered.contains("Workers Used: 2"));
        assert!(rendered.contains("Duration (secs): 1.234"));
    }

    #[test]
    fn test_empty_space_has_zero_coverage() {
        assert_eq!(AuthStatistics::default().coverage(), 0.0);
    }
}
