use serde::{Deserialize, Serialize};

use crate::model::entry::ChargingLogEntry;
use crate::time::YearMonth;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub name: String,
    pub total_hours: f64,
    /// 0..=100, exactly 0 when nothing was logged in the window.
    pub percentage: f64,
    pub session_count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct UsageSummary {
    pub per_user: Vec<UserSummary>,
    pub grand_total: f64,
}

impl UsageSummary {
    pub fn user(&self, name: &str) -> Option<&UserSummary> {
        self.per_user.iter().find(|u| u.name == name)
    }
}

/// What the report covers, which also drives the export filename.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum ReportPeriod {
    /// No explicit filter: the implicit current-month view.
    CurrentMonth(YearMonth),
    Month(YearMonth),
    Custom,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportView {
    pub period: ReportPeriod,
    pub entries: Vec<ChargingLogEntry>,
    pub summary: UsageSummary,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LogbookOverview {
    pub user_count: usize,
    pub session_count: usize,
    pub total_hours: f64,
}
