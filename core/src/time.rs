use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use anyhow::{anyhow, bail, Context, Result};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Earliest month the month filter offers by default.
pub const DEFAULT_FIRST_MONTH: YearMonth = YearMonth { year: 2025, month: 6 };

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            bail!("Month must be between 1 and 12, got {}", month);
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
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

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// "June 2025"
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }

    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow!("Expected YYYY-MM, got '{}'", s))?;
        let year: i32 = year.parse().with_context(|| format!("Invalid year in '{}'", s))?;
        let month: u32 = month.parse().with_context(|| format!("Invalid month in '{}'", s))?;
        Self::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("Could not parse date '{}', expected YYYY-MM-DD", input))
}

/// Months offered by the month filter, oldest first.
///
/// Starts at `first` while `today` is still in the first year, otherwise at
/// January of the current year. Ends with December of `last_year`.
pub fn month_options(today: NaiveDate, first: YearMonth, last_year: i32) -> Vec<YearMonth> {
    let start_year = first.year.max(today.year());
    let mut current = if start_year == first.year {
        first
    } else {
        YearMonth { year: start_year, month: 1 }
    };

    let mut options = Vec::new();
    while current.year <= last_year {
        options.push(current);
        current = current.succ();
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2025-06", 2025, 6)]
    #[case("2030-12", 2030, 12)]
    #[case(" 2026-1 ", 2026, 1)]
    fn test_parse_year_month(#[case] input: &str, #[case] year: i32, #[case] month: u32) {
        let ym: YearMonth = input.parse().unwrap();
        assert_eq!((ym.year(), ym.month()), (year, month));
    }

    #[rstest]
    #[case("2025")]
    #[case("2025-13")]
    #[case("2025-00")]
    #[case("June 2025")]
    fn test_parse_year_month_rejects(#[case] input: &str) {
        assert!(input.parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_contains_and_label() {
        let june = YearMonth::new(2025, 6).unwrap();
        assert!(june.contains(day(2025, 6, 1)));
        assert!(june.contains(day(2025, 6, 30)));
        assert!(!june.contains(day(2025, 7, 1)));
        assert!(!june.contains(day(2024, 6, 15)));
        assert_eq!(june.label(), "June 2025");
        assert_eq!(june.to_string(), "2025-06");
    }

    #[test]
    fn test_month_options_first_year() {
        let first = YearMonth::new(2025, 6).unwrap();
        let options = month_options(day(2025, 6, 26), first, 2030);
        assert_eq!(options.first().copied(), Some(first));
        assert_eq!(options.last().map(|m| m.to_string()), Some("2030-12".to_string()));
        assert_eq!(options.len(), 7 + 5 * 12);
    }

    #[test]
    fn test_month_options_later_year_starts_in_january() {
        let first = YearMonth::new(2025, 6).unwrap();
        let options = month_options(day(2026, 10, 19), first, 2030);
        assert_eq!(options[0].to_string(), "2026-01");
        assert_eq!(options.len(), 5 * 12);
    }

    #[test]
    fn test_month_options_past_window_is_empty() {
        let first = YearMonth::new(2025, 6).unwrap();
        assert!(month_options(day(2031, 1, 1), first, 2030).is_empty());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-06-25").unwrap(), day(2025, 6, 25));
        assert!(parse_date("25/06/2025").is_err());
    }
}
