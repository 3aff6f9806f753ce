use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use anyhow::{bail, Result};

/// One recorded charging session.
///
/// Only `user` ever changes after creation, and only through a registry rename.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChargingLogEntry {
    pub id: u64,
    pub user: String,
    pub date: NaiveDate,
    /// Hours, always > 0.
    pub duration: f64,
    pub created_at: DateTime<Utc>,
}

/// A session as submitted, before the store assigns id and timestamp.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub user: String,
    pub date: NaiveDate,
    pub duration: f64,
}

impl NewEntry {
    pub fn new(user: impl Into<String>, date: NaiveDate, duration: f64) -> Self {
        Self {
            user: user.into(),
            date,
            duration,
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.user.trim().is_empty() {
            bail!("A user must be selected");
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            bail!("Duration must be a positive number of hours, got {}", self.duration);
        }
        if self.date > today {
            bail!("Date {} is in the future", self.date);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_accepts_today() {
        let entry = NewEntry::new("Gal", day(2025, 6, 26), 1.0);
        assert!(entry.validate(day(2025, 6, 26)).is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed() {
        let today = day(2025, 6, 26);
        assert!(NewEntry::new("", today, 1.0).validate(today).is_err());
        assert!(NewEntry::new("Gal", today, 0.0).validate(today).is_err());
        assert!(NewEntry::new("Gal", today, -2.0).validate(today).is_err());
        assert!(NewEntry::new("Gal", today, f64::NAN).validate(today).is_err());

        let err = NewEntry::new("Gal", day(2025, 6, 27), 1.0).validate(today).unwrap_err();
        assert!(err.to_string().contains("future"));
    }
}
