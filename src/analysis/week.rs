//! Week-based year numbering.
//!
//! A [`WeekFields`] value defines where weeks start and how many days of a
//! new year the first week must hold. With [`WeekFields::ISO`] (Monday, 4
//! days) week 1 is the week containing the year's first Thursday, so the
//! last days of December can fall in week 1 of the next year and the first
//! days of January in the last week of the previous one.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::fmt;

/// Bucket key: a week of a week-based year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

/// Week numbering rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekFields {
    pub first_day: Weekday,
    /// Minimum number of days of the new year in week 1 (1-7).
    pub min_days_in_first_week: u8,
}

impl Default for WeekFields {
    fn default() -> Self {
        Self::ISO
    }
}

impl WeekFields {
    /// ISO-8601 weeks.
    pub const ISO: WeekFields = WeekFields {
        first_day: Weekday::Mon,
        min_days_in_first_week: 4,
    };

    /// Week-based year and week for a calendar date.
    ///
    /// `None` only at the edges of chrono's supported date range, where a
    /// neighbouring year's 1 January does not exist.
    pub fn week_of(&self, date: NaiveDate) -> Option<WeekKey> {
        let year = date.year();
        let start = self.week_one_start(date.with_ordinal(1)?)?;

        if date < start {
            let prev_start = self.week_one_start(NaiveDate::from_ymd_opt(year - 1, 1, 1)?)?;
            return Some(WeekKey {
                year: year - 1,
                week: week_number(prev_start, date),
            });
        }

        let next_start = self.week_one_start(NaiveDate::from_ymd_opt(year + 1, 1, 1)?)?;
        if date >= next_start {
            return Some(WeekKey {
                year: year + 1,
                week: 1,
            });
        }

        Some(WeekKey {
            year,
            week: week_number(start, date),
        })
    }

    /// Days from the start of the week to `date` (0-6).
    fn day_of_week(&self, date: NaiveDate) -> i64 {
        let day = i64::from(date.weekday().num_days_from_monday());
        let first = i64::from(self.first_day.num_days_from_monday());
        (day - first).rem_euclid(7)
    }

    /// First day of week 1 of the year starting on `jan1`.
    fn week_one_start(&self, jan1: NaiveDate) -> Option<NaiveDate> {
        let offset = self.day_of_week(jan1);
        let start = jan1.checked_sub_signed(Duration::days(offset))?;
        if 7 - offset >= i64::from(self.min_days_in_first_week) {
            Some(start)
        } else {
            start.checked_add_signed(Duration::days(7))
        }
    }
}

fn week_number(week_one_start: NaiveDate, date: NaiveDate) -> u32 {
    ((date - week_one_start).num_days() / 7 + 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn iso(y: i32, m: u32, d: u32) -> (i32, u32) {
        let key = WeekFields::ISO.week_of(date(y, m, d)).unwrap();
        (key.year, key.week)
    }

    #[test]
    fn test_iso_year_boundary() {
        assert_eq!(iso(2024, 12, 30), (2025, 1));
        assert_eq!(iso(2025, 1, 1), (2025, 1));
        assert_eq!(iso(2024, 12, 23), (2024, 52));
        assert_eq!(iso(2025, 1, 6), (2025, 2));
        assert_eq!(iso(2025, 1, 7), (2025, 2));
    }

    #[test]
    fn test_iso_week_53() {
        // 2020 started on a Wednesday and was a leap year.
        assert_eq!(iso(2020, 12, 31), (2020, 53));
        assert_eq!(iso(2021, 1, 3), (2020, 53));
        assert_eq!(iso(2021, 1, 4), (2021, 1));
        assert_eq!(iso(2015, 12, 31), (2015, 53));
        assert_eq!(iso(2016, 1, 1), (2015, 53));
    }

    #[test]
    fn test_iso_matches_chrono_over_a_decade() {
        let mut day = date(2015, 1, 1);
        let end = date(2030, 12, 31);
        while day <= end {
            let expected = day.iso_week();
            let key = WeekFields::ISO.week_of(day).unwrap();
            assert_eq!(
                (key.year, key.week),
                (expected.year(), expected.week()),
                "mismatch on {}",
                day
            );
            day = day + Duration::days(1);
        }
    }

    #[test]
    fn test_sunday_start_minimal_days() {
        // Sunday start, 1 day minimum: week 1 is the week containing Jan 1.
        let us = WeekFields {
            first_day: Weekday::Sun,
            min_days_in_first_week: 1,
        };
        assert_eq!(us.week_of(date(2025, 1, 1)), Some(WeekKey { year: 2025, week: 1 }));
        assert_eq!(us.week_of(date(2024, 12, 29)), Some(WeekKey { year: 2025, week: 1 }));
        assert_eq!(us.week_of(date(2024, 12, 28)), Some(WeekKey { year: 2024, week: 52 }));
        assert_eq!(us.week_of(date(2025, 1, 5)), Some(WeekKey { year: 2025, week: 2 }));
    }

    #[test]
    fn test_leap_years_around_boundary() {
        // 2024 was a leap year starting on a Monday.
        assert_eq!(iso(2024, 1, 1), (2024, 1));
        assert_eq!(iso(2024, 2, 29), (2024, 9));
        assert_eq!(iso(2024, 12, 29), (2024, 52));
        // 2000 is a leap year, 1900 is not.
        assert_eq!(iso(2000, 1, 2), (1999, 52));
        assert_eq!(iso(1900, 12, 31), (1901, 1));
    }

    #[test]
    fn test_edge_of_date_range() {
        assert!(WeekFields::ISO.week_of(NaiveDate::MAX).is_none());
    }

    #[test]
    fn test_default_is_iso() {
        assert_eq!(WeekFields::default(), WeekFields::ISO);
    }

    #[test]
    fn test_week_key_order_and_display() {
        let a = WeekKey { year: 2024, week: 52 };
        let b = WeekKey { year: 2025, week: 1 };
        assert!(a < b);
        assert_eq!(b.to_string(), "2025-W01");
    }
}
