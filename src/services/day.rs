//! Calendar-day policy for bucketing logs.
//!
//! Every day-level computation (streaks, date-only `log_date` values) goes
//! through one fixed UTC offset taken from configuration, so results never
//! depend on the host's local timezone.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

const MAX_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc()
    }
}

impl DayBoundary {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return None;
        }
        FixedOffset::east_opt(minutes * 60).map(|offset| Self { offset })
    }

    /// Calendar day a timestamp falls on.
    pub fn day_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// Interprets a wall-clock time as local to this boundary.
    pub fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn start_of(&self, day: NaiveDate) -> Option<DateTime<Utc>> {
        self.localize(day.and_hms_opt(0, 0, 0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_day_matches_timestamp_date() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).unwrap();
        assert_eq!(
            DayBoundary::utc().day_of(ts),
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
        );
    }

    #[test]
    fn positive_offset_rolls_late_evening_into_next_day() {
        let ist = DayBoundary::from_offset_minutes(330).unwrap();
        let ts = Utc.with_ymd_and_hms(2026, 3, 10, 20, 0, 0).unwrap();
        assert_eq!(ist.day_of(ts), NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
    }

    #[test]
    fn start_of_day_is_offset_midnight() {
        let ist = DayBoundary::from_offset_minutes(330).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
        assert_eq!(
            ist.start_of(day).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 10, 18, 30, 0).unwrap()
        );
    }

    #[test]
    fn rejects_out_of_range_offsets() {
        assert!(DayBoundary::from_offset_minutes(15 * 60).is_none());
        assert!(DayBoundary::from_offset_minutes(-14 * 60).is_some());
    }
}
