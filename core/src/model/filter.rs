use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::YearMonth;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub enum UserFilter {
    #[default]
    All,
    User(String),
}

impl UserFilter {
    pub fn matches(&self, user: &str) -> bool {
        match self {
            UserFilter::All => true,
            UserFilter::User(name) => name == user,
        }
    }
}

/// Report filter state. Month and date range exclude each other: the setters
/// clear the other half. The engine still tolerates both being set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ReportFilter {
    pub user: UserFilter,
    pub month: Option<YearMonth>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: UserFilter) -> Self {
        self.user = user;
        self
    }

    pub fn with_month(mut self, month: YearMonth) -> Self {
        self.set_month(Some(month));
        self
    }

    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.set_start_date(Some(start));
        self.set_end_date(Some(end));
        self
    }

    pub fn set_month(&mut self, month: Option<YearMonth>) {
        self.month = month;
        if month.is_some() {
            self.start_date = None;
            self.end_date = None;
        }
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.start_date = date;
        if date.is_some() {
            self.month = None;
        }
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        self.end_date = date;
        if date.is_some() {
            self.month = None;
        }
    }

    /// Both ends present.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// No user, month or date set at all.
    pub fn is_default(&self) -> bool {
        self.user == UserFilter::All
            && self.month.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
