//! Historical data tracking for sparklines and rate calculations.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::api::HourlyCount;

/// Maximum number of historical snapshots to keep.
const MAX_HISTORY_SIZE: usize = 60;

/// Number of sparkline bar levels.
pub const SPARKLINE_LEVELS: u8 = 8;

/// A reading of the trailing-window totals at one applied cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Reading {
    cycle: u64,
    at: DateTime<Utc>,
    total_requests: u64,
    blocked_requests: u64,
}

/// Tracks window totals across refresh cycles.
///
/// Each applied cycle is recorded once, which lets the UI show how fast
/// the trailing-window totals are moving between refreshes.
#[derive(Debug, Clone, Default)]
pub struct History {
    readings: VecDeque<Reading>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the totals of an applied cycle.
    ///
    /// Re-recording the same or an older cycle is ignored.
    pub fn record(&mut self, cycle: u64, at: DateTime<Utc>, total: u64, blocked: u64) {
        if self.readings.back().is_some_and(|last| last.cycle >= cycle) {
            return;
        }

        self.readings.push_back(Reading {
            cycle,
            at,
            total_requests: total,
            blocked_requests: blocked,
        });
        if self.readings.len() > MAX_HISTORY_SIZE {
            self.readings.pop_front();
        }
    }

    /// Number of recorded cycles.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Change of the request total per minute over the last two cycles.
    ///
    /// Returns None if there's not enough history to calculate a rate.
    pub fn request_rate_per_min(&self) -> Option<f64> {
        self.rate_per_min(|r| r.total_requests)
    }

    /// Change of the blocked total per minute over the last two cycles.
    pub fn blocked_rate_per_min(&self) -> Option<f64> {
        self.rate_per_min(|r| r.blocked_requests)
    }

    fn rate_per_min(&self, value: impl Fn(&Reading) -> u64) -> Option<f64> {
        if self.readings.len() < 2 {
            return None;
        }

        let current = self.readings.back()?;
        let previous = self.readings.get(self.readings.len() - 2)?;
        let delta = value(current) as i64 - value(previous) as i64;

        let elapsed = (current.at - previous.at).num_milliseconds() as f64 / 60_000.0;
        if elapsed > 0.0 {
            Some(delta as f64 / elapsed)
        } else {
            None
        }
    }
}

/// Normalize values to 0-7 range for sparkline display.
pub fn normalize_levels(values: &[u64]) -> Vec<u8> {
    let max = values.iter().copied().max().unwrap_or(0).max(1) as f64;
    let top = (SPARKLINE_LEVELS - 1) as f64;

    values
        .iter()
        .map(|&v| ((v as f64 / max * top).round() as u8).min(SPARKLINE_LEVELS - 1))
        .collect()
}

/// Sparkline levels of the hourly request totals, oldest first.
pub fn hourly_levels(hours: &[HourlyCount]) -> Vec<u8> {
    let totals: Vec<u64> = hours.iter().map(|h| h.total).collect();
    normalize_levels(&totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn at(minutes: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::minutes(minutes)
    }

    #[test]
    fn test_rate_needs_two_readings() {
        let mut history = History::new();
        assert!(history.request_rate_per_min().is_none());
        history.record(1, at(0), 100, 10);
        assert!(history.request_rate_per_min().is_none());
    }

    #[test]
    fn test_rate_per_minute() {
        let mut history = History::new();
        history.record(1, at(0), 100, 10);
        history.record(2, at(2), 160, 30);
        assert_eq!(history.request_rate_per_min(), Some(30.0));
        assert_eq!(history.blocked_rate_per_min(), Some(10.0));
    }

    #[test]
    fn test_duplicate_cycle_ignored() {
        let mut history = History::new();
        history.record(1, at(0), 100, 10);
        history.record(1, at(1), 500, 10);
        history.record(0, at(2), 900, 10);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::new();
        for cycle in 1..=(MAX_HISTORY_SIZE as u64 + 5) {
            history.record(cycle, at(cycle as i64), cycle, 0);
        }
        assert_eq!(history.len(), MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_normalize_levels() {
        assert_eq!(normalize_levels(&[0, 50, 100]), vec![0, 4, 7]);
        assert_eq!(normalize_levels(&[0, 0]), vec![0, 0]);
        assert!(normalize_levels(&[]).is_empty());
    }

    #[test]
    fn test_hourly_levels() {
        let hours = vec![
            HourlyCount { hour: "10:00".to_string(), total: 7, blocked: 0 },
            HourlyCount { hour: "11:00".to_string(), total: 14, blocked: 3 },
        ];
        assert_eq!(hourly_levels(&hours), vec![4, 7]);
    }
}
