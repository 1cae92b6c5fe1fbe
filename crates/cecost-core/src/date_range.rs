//! Date ranges for the standard reporting windows
//!
//! Every window is derived from a single anchor date ("today" in the
//! caller's local calendar). Dates go over the wire as `YYYY-MM-DD`.
//!
//! The end date follows the service's exclusive-end convention only where
//! the reporting window needs it: single-day and month-to-date windows end
//! on the day after the anchor, while last-month and year-to-date windows
//! end on the last calendar day of their final month.
//!
//! # Examples
//!
//! ```
//! use cecost_core::date_range::{self, ReportPeriod};
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//!
//! let last_month = date_range::for_last_month(today).unwrap();
//! assert_eq!(last_month.start.to_string(), "2023-12-01");
//! assert_eq!(last_month.end.to_string(), "2023-12-31");
//!
//! let period = ReportPeriod::MonthToDate.resolve(today).unwrap();
//! assert_eq!(period.to_string(), "2024-01-01..2024-01-16");
//! ```

use crate::error::{CecostError, Result};
use crate::types::Granularity;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A `{Start, End}` pair of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimePeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Start date formatted as `YYYY-MM-DD`
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// End date formatted as `YYYY-MM-DD`
    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_str(), self.end_str())
    }
}

fn out_of_range(date: NaiveDate) -> CecostError {
    CecostError::InvalidDate(format!(
        "{date} is outside the supported calendar range"
    ))
}

fn next_day(date: NaiveDate) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(1))
        .ok_or_else(|| out_of_range(date))
}

/// First calendar day of `date`'s month
pub fn first_day_of_month(date: NaiveDate) -> Result<NaiveDate> {
    date.with_day(1).ok_or_else(|| out_of_range(date))
}

/// Last calendar day of `date`'s month
pub fn last_day_of_month(date: NaiveDate) -> Result<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

/// January 1 of `date`'s year
pub fn first_day_of_year(date: NaiveDate) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).ok_or_else(|| out_of_range(date))
}

/// A single calendar day: `date .. date + 1`
pub fn for_day(date: NaiveDate) -> Result<TimePeriod> {
    Ok(TimePeriod::new(date, next_day(date)?))
}

/// First of the anchor's month through the day after the anchor
pub fn for_month_to_date(today: NaiveDate) -> Result<TimePeriod> {
    Ok(TimePeriod::new(first_day_of_month(today)?, next_day(today)?))
}

/// First through last day of the month before the anchor's month
pub fn for_last_month(today: NaiveDate) -> Result<TimePeriod> {
    let last_of_previous = first_day_of_month(today)?
        .pred_opt()
        .ok_or_else(|| out_of_range(today))?;
    Ok(TimePeriod::new(
        first_day_of_month(last_of_previous)?,
        last_of_previous,
    ))
}

/// January 1 through the last day of the anchor's month
pub fn for_year_to_date(today: NaiveDate) -> Result<TimePeriod> {
    Ok(TimePeriod::new(
        first_day_of_year(today)?,
        last_day_of_month(today)?,
    ))
}

/// Named reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Today,
    Day(NaiveDate),
    MonthToDate,
    LastMonth,
    YearToDate,
}

impl ReportPeriod {
    /// Resolve the window against the given anchor date
    pub fn resolve(&self, today: NaiveDate) -> Result<TimePeriod> {
        match self {
            Self::Today => for_day(today),
            Self::Day(date) => for_day(*date),
            Self::MonthToDate => for_month_to_date(today),
            Self::LastMonth => for_last_month(today),
            Self::YearToDate => for_year_to_date(today),
        }
    }

    /// Granularity used when the caller does not pick one
    pub fn default_granularity(&self) -> Granularity {
        match self {
            Self::Today | Self::Day(_) => Granularity::Daily,
            Self::MonthToDate | Self::LastMonth | Self::YearToDate => Granularity::Monthly,
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => write!(f, "today"),
            Self::Day(date) => write!(f, "day {}", date.format(DATE_FORMAT)),
            Self::MonthToDate => write!(f, "month-to-date"),
            Self::LastMonth => write!(f, "last-month"),
            Self::YearToDate => write!(f, "year-to-date"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_for_day() {
        let period = for_day(date(2024, 3, 10)).unwrap();
        assert_eq!(period.start_str(), "2024-03-10");
        assert_eq!(period.end_str(), "2024-03-11");
    }

    #[test]
    fn test_for_day_rolls_over_year() {
        let period = for_day(date(2023, 12, 31)).unwrap();
        assert_eq!(period.end, date(2024, 1, 1));
    }

    #[test]
    fn test_month_to_date_end_is_tomorrow() {
        let period = for_month_to_date(date(2024, 2, 29)).unwrap();
        assert_eq!(period.start, date(2024, 2, 1));
        assert_eq!(period.end, date(2024, 3, 1));

        // First of the month still spans a full day
        let period = for_month_to_date(date(2024, 5, 1)).unwrap();
        assert_eq!(period.start, date(2024, 5, 1));
        assert_eq!(period.end, date(2024, 5, 2));
    }

    #[test]
    fn test_last_month_on_january_first() {
        let period = for_last_month(date(2024, 1, 1)).unwrap();
        assert_eq!(period.start, date(2023, 12, 1));
        assert_eq!(period.end, date(2023, 12, 31));
    }

    #[test]
    fn test_last_month_february_leap_year() {
        let period = for_last_month(date(2024, 3, 31)).unwrap();
        assert_eq!(period.start, date(2024, 2, 1));
        assert_eq!(period.end, date(2024, 2, 29));

        let period = for_last_month(date(2023, 3, 15)).unwrap();
        assert_eq!(period.end, date(2023, 2, 28));
    }

    #[test]
    fn test_year_to_date() {
        let period = for_year_to_date(date(2024, 12, 5)).unwrap();
        assert_eq!(period.start, date(2024, 1, 1));
        assert_eq!(period.end, date(2024, 12, 31));

        let period = for_year_to_date(date(2025, 4, 30)).unwrap();
        assert_eq!(period.end, date(2025, 4, 30));
    }

    #[test]
    fn test_out_of_range_anchor() {
        let result = for_day(NaiveDate::MAX);
        assert!(matches!(result, Err(CecostError::InvalidDate(_))));
    }

    #[test]
    fn test_report_period_defaults() {
        assert_eq!(ReportPeriod::Today.default_granularity(), Granularity::Daily);
        assert_eq!(
            ReportPeriod::Day(date(2024, 1, 1)).default_granularity(),
            Granularity::Daily
        );
        assert_eq!(ReportPeriod::LastMonth.default_granularity(), Granularity::Monthly);
        assert_eq!(ReportPeriod::Day(date(2024, 1, 9)).to_string(), "day 2024-01-09");
    }

    #[test]
    fn test_time_period_serializes_as_wire_dates() {
        let period = for_day(date(2024, 7, 4)).unwrap();
        let value = serde_json::to_value(period).unwrap();
        assert_eq!(value["Start"], "2024-07-04");
        assert_eq!(value["End"], "2024-07-05");
    }

    prop_compose! {
        fn arb_date()(days in 0i64..36_500) -> NaiveDate {
            date(1990, 1, 1) + chrono::Duration::days(days)
        }
    }

    proptest! {
        #[test]
        fn prop_last_month_ends_before_anchor_month(today in arb_date()) {
            let period = for_last_month(today).unwrap();
            prop_assert_eq!(period.end.succ_opt().unwrap(), first_day_of_month(today).unwrap());
            prop_assert_eq!(period.start.day(), 1);
            prop_assert_eq!(period.start.month(), period.end.month());
            prop_assert_eq!(period.start.year(), period.end.year());
        }

        #[test]
        fn prop_month_to_date_spans_first_to_tomorrow(today in arb_date()) {
            let period = for_month_to_date(today).unwrap();
            prop_assert_eq!(period.start, date(today.year(), today.month(), 1));
            prop_assert_eq!(period.end, today.succ_opt().unwrap());
        }

        #[test]
        fn prop_year_to_date_spans_january_to_month_end(today in arb_date()) {
            let period = for_year_to_date(today).unwrap();
            prop_assert_eq!(period.start, date(today.year(), 1, 1));
            prop_assert_eq!(period.end.month(), today.month());
            prop_assert_eq!(period.end.succ_opt().unwrap().day(), 1);
        }
    }
}
