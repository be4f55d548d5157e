//! Weekly business-hours schedules in store-local time.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Seconds in one day.
pub const DAY_SECS: u32 = 86_400;

/// A half-open `[open, close)` interval within a single local day, in seconds
/// from local midnight.
///
/// `close` may be `86_400` to denote end of day, so a full day is
/// `[0, 86_400)` and consecutive fully-open days form one continuous span.
/// An interval with `open == close` contributes zero duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursInterval {
    pub open: u32,
    pub close: u32,
}

impl HoursInterval {
    /// Open for the entire local day.
    pub const FULL_DAY: Self = Self {
        open: 0,
        close: DAY_SECS,
    };

    /// Build from local wall-clock times. Returns `None` when `close < open`
    /// (per-day intervals never wrap midnight).
    pub fn from_times(open: NaiveTime, close: NaiveTime) -> Option<Self> {
        use chrono::Timelike;
        let open = open.num_seconds_from_midnight();
        let close = close.num_seconds_from_midnight();
        if close < open {
            return None;
        }
        Some(Self { open, close })
    }

    pub fn is_empty(&self) -> bool {
        self.open >= self.close
    }
}

/// Per-store weekly schedule: weekday (0 = Monday .. 6 = Sunday) to a set of
/// disjoint local-time intervals.
///
/// A store absent from the business-hours table gets [`WeeklySchedule::open_24_7`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    days: [Vec<HoursInterval>; 7],
}

impl WeeklySchedule {
    /// Empty schedule: closed every day until intervals are added.
    pub fn new() -> Self {
        Self {
            days: Default::default(),
        }
    }

    /// Default policy for stores with no business-hours rows: open 24/7.
    pub fn open_24_7() -> Self {
        Self {
            days: std::array::from_fn(|_| vec![HoursInterval::FULL_DAY]),
        }
    }

    /// Add an interval to a weekday (0 = Monday .. 6 = Sunday). Intervals on
    /// the same day are kept sorted by opening time. Out-of-range weekdays
    /// and empty intervals are ignored.
    pub fn add_interval(&mut self, weekday: u8, interval: HoursInterval) {
        if weekday > 6 || interval.is_empty() {
            return;
        }
        let day = &mut self.days[weekday as usize];
        day.push(interval);
        day.sort_by_key(|iv| iv.open);
    }

    /// Intervals for a weekday, sorted by opening time.
    pub fn intervals_for(&self, weekday: u8) -> &[HoursInterval] {
        self.days.get(weekday as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when no weekday has any open interval.
    pub fn is_always_closed(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_interval_from_times() {
        let iv = HoursInterval::from_times(t(9, 0, 0), t(17, 0, 0)).unwrap();
        assert_eq!(iv.open, 9 * 3600);
        assert_eq!(iv.close, 17 * 3600);
        assert!(!iv.is_empty());
    }

    #[test]
    fn test_interval_rejects_wrap() {
        assert!(HoursInterval::from_times(t(22, 0, 0), t(2, 0, 0)).is_none());
    }

    #[test]
    fn test_zero_length_interval_is_empty() {
        let iv = HoursInterval::from_times(t(9, 0, 0), t(9, 0, 0)).unwrap();
        assert!(iv.is_empty());
    }

    #[test]
    fn test_open_24_7() {
        let schedule = WeeklySchedule::open_24_7();
        for day in 0..7 {
            assert_eq!(schedule.intervals_for(day), &[HoursInterval::FULL_DAY]);
        }
    }

    #[test]
    fn test_add_interval_sorted() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_interval(0, HoursInterval::from_times(t(13, 0, 0), t(17, 0, 0)).unwrap());
        schedule.add_interval(0, HoursInterval::from_times(t(9, 0, 0), t(12, 0, 0)).unwrap());
        let day = schedule.intervals_for(0);
        assert_eq!(day.len(), 2);
        assert!(day[0].open < day[1].open);
        assert!(schedule.intervals_for(1).is_empty());
    }

    #[test]
    fn test_empty_intervals_ignored() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_interval(3, HoursInterval { open: 3600, close: 3600 });
        schedule.add_interval(9, HoursInterval::FULL_DAY);
        assert!(schedule.is_always_closed());
    }
}
