//! Time-of-day sources.
//!
//! The display only needs hour, minute and second of the local time. How
//! the host keeps its wall clock in sync (NTP, RTC, ...) is its own business.

use crate::split_pair;
use chrono::{FixedOffset, Local, Timelike, Utc};

/// Local wall-clock time, 24-hour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    /// Build a time, rejecting out-of-range fields.
    pub fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        (hour < 24 && minute < 60 && second < 60).then_some(Self {
            hour,
            minute,
            second,
        })
    }

    pub fn from_timelike<T: Timelike>(t: &T) -> Self {
        Self {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
            second: t.second() as u8,
        }
    }

    /// `[H, H, M, M]`
    pub fn hours_minutes(&self) -> [u8; 4] {
        let [h1, h2] = split_pair(self.hour);
        let [m1, m2] = split_pair(self.minute);
        [h1, h2, m1, m2]
    }

    /// `[M, M, S, S]`
    pub fn minutes_seconds(&self) -> [u8; 4] {
        let [m1, m2] = split_pair(self.minute);
        let [s1, s2] = split_pair(self.second);
        [m1, m2, s1, s2]
    }
}

/// Resolves the current local time of day.
pub trait TimeSource {
    fn now(&mut self) -> TimeOfDay;
}

/// System clock in the system time zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&mut self) -> TimeOfDay {
        TimeOfDay::from_timelike(&Local::now())
    }
}

/// System clock shifted by a fixed UTC offset.
#[derive(Clone, Copy, Debug)]
pub struct OffsetClock {
    offset: FixedOffset,
}

impl OffsetClock {
    /// `None` if the offset is a day or more.
    pub fn new(utc_offset_minutes: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
        Some(Self { offset })
    }
}

impl TimeSource for OffsetClock {
    fn now(&mut self) -> TimeOfDay {
        TimeOfDay::from_timelike(&Utc::now().with_timezone(&self.offset))
    }
}

/// Clock that always reports the same time.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedClock(pub TimeOfDay);

impl TimeSource for FixedClock {
    fn now(&mut self) -> TimeOfDay {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn splits_time_into_display_digits() {
        let t = TimeOfDay::new(14, 7, 33).unwrap();
        assert_eq!(t.hours_minutes(), [1, 4, 0, 7]);
        assert_eq!(t.minutes_seconds(), [0, 7, 3, 3]);
    }

    #[test]
    fn rejects_impossible_times() {
        assert!(TimeOfDay::new(24, 0, 0).is_none());
        assert!(TimeOfDay::new(0, 60, 0).is_none());
        assert!(TimeOfDay::new(23, 59, 59).is_some());
    }

    #[test]
    fn reads_chrono_times() {
        let naive = NaiveTime::from_hms_opt(9, 5, 1).unwrap();
        assert_eq!(
            TimeOfDay::from_timelike(&naive),
            TimeOfDay::new(9, 5, 1).unwrap()
        );
    }

    #[test]
    fn offset_clock_rejects_a_full_day() {
        assert!(OffsetClock::new(24 * 60).is_none());
        assert!(OffsetClock::new(-5 * 60).is_some());
    }

    #[test]
    fn offset_clock_reports_a_valid_time() {
        let mut clock = OffsetClock::new(90).unwrap();
        let t = clock.now();
        assert!(TimeOfDay::new(t.hour, t.minute, t.second).is_some());
    }
}
