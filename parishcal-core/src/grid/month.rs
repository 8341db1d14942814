//! Year-month arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::CalError;

/// A calendar month, e.g. March 2025.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// `None` unless `month` is 1..=12 and the year is representable.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| YearMonth { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|&day| NaiveDate::from_ymd_opt(self.year, self.month, day).is_some())
            .unwrap_or(28)
    }

    /// Every date of the month, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let month = self.month;
        std::iter::successors(Some(self.first_day()), |day| day.succ_opt())
            .take_while(move |day| day.month() == month)
    }

    /// `None` past the last representable month.
    pub fn next(&self) -> Option<Self> {
        if self.month == 12 {
            YearMonth::new(self.year.checked_add(1)?, 1)
        } else {
            YearMonth::new(self.year, self.month + 1)
        }
    }

    /// `None` before the first representable month.
    pub fn prev(&self) -> Option<Self> {
        if self.month == 1 {
            YearMonth::new(self.year.checked_sub(1)?, 12)
        } else {
            YearMonth::new(self.year, self.month - 1)
        }
    }

    /// e.g. "March 2025"
    pub fn title(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = CalError;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalError::validation("month", format!("'{}' is not YYYY-MM", s));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(YearMonth::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2025, 3).unwrap().days_in_month(), 31);
        assert_eq!(YearMonth::new(2025, 12).unwrap().days_in_month(), 31);
        assert_eq!(YearMonth::new(2025, 4).unwrap().days_in_month(), 30);
    }

    #[test]
    fn test_navigation_wraps_years() {
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next(), YearMonth::new(2025, 1));
        assert_eq!(dec.next().and_then(|m| m.prev()), Some(dec));
    }

    #[test]
    fn test_last_representable_month() {
        let last = YearMonth::of(NaiveDate::MAX);

        assert_eq!(last.days_in_month(), 31);
        assert_eq!(last.days().count(), 31);
        assert_eq!(last.days().last(), Some(NaiveDate::MAX));
        assert_eq!(last.next(), None);
        assert_eq!(YearMonth::of(NaiveDate::MIN).prev(), None);
    }

    #[test]
    fn test_parse_and_display() {
        let month: YearMonth = "2025-03".parse().unwrap();
        assert_eq!(month, YearMonth::new(2025, 3).unwrap());
        assert_eq!(month.to_string(), "2025-03");
        assert_eq!(month.title(), "March 2025");

        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("March".parse::<YearMonth>().is_err());
    }
}
