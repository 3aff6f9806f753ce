use chrono::NaiveDate;
use anyhow::{anyhow, bail, Result};

use crate::model::entry::NewEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct DurationOption {
    pub hours: f64,
    pub label: String,
}

fn plural_hours(hours: u32) -> String {
    if hours > 1 {
        format!("{} hours", hours)
    } else {
        format!("{} hour", hours)
    }
}

pub fn duration_label(hours: f64) -> String {
    let whole = hours.floor() as u32;
    let minutes = ((hours - hours.floor()) * 60.0).round() as u32;
    match (whole, minutes) {
        (0, m) => format!("{} min", m),
        (h, 0) => plural_hours(h),
        (h, m) => format!("{} {} min", plural_hours(h), m),
    }
}

/// Preset durations: 0.5h to 24h in half-hour steps.
pub fn duration_options() -> Vec<DurationOption> {
    (1..=48)
        .map(|half_hours| {
            let hours = half_hours as f64 * 0.5;
            DurationOption {
                hours,
                label: duration_label(hours),
            }
        })
        .collect()
}

/// Keeps at most one digit after the decimal point, without rounding.
pub fn truncate_one_decimal(input: &str) -> String {
    match input.split_once('.') {
        Some((whole, frac)) if frac.chars().count() > 1 => {
            let first: String = frac.chars().take(1).collect();
            format!("{}.{}", whole, first)
        }
        _ => input.to_string(),
    }
}

pub fn parse_manual_hours(input: &str) -> Result<f64> {
    let text = truncate_one_decimal(input.trim());
    if text.is_empty() {
        bail!("Duration is required");
    }
    let hours: f64 = text
        .parse()
        .map_err(|_| anyhow!("Invalid duration: '{}'", input))?;
    if !hours.is_finite() || hours <= 0.0 {
        bail!("Duration must be greater than zero");
    }
    Ok(hours)
}

/// Either a preset or typed hours, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum DurationInput {
    Preset(usize),
    Manual(String),
}

/// State of the log-a-session form.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    pub user: String,
    pub date: NaiveDate,
    duration: Option<DurationInput>,
}

impl PendingEntry {
    pub fn new(user: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            user: user.into(),
            date: today,
            duration: None,
        }
    }

    pub fn duration(&self) -> Option<&DurationInput> {
        self.duration.as_ref()
    }

    /// Picks a preset, dropping any typed hours. `None` clears the selection.
    pub fn select_preset(&mut self, index: Option<usize>) {
        self.duration = index.map(DurationInput::Preset);
    }

    pub fn preset_index(&self) -> Option<usize> {
        match self.duration {
            Some(DurationInput::Preset(i)) => Some(i),
            _ => None,
        }
    }

    /// Sets typed hours, dropping any preset. Input is truncated to one decimal.
    pub fn set_manual(&mut self, text: &str) {
        let text = truncate_one_decimal(text);
        self.duration = if text.is_empty() {
            None
        } else {
            Some(DurationInput::Manual(text))
        };
    }

    pub fn manual_text(&self) -> &str {
        match &self.duration {
            Some(DurationInput::Manual(text)) => text,
            _ => "",
        }
    }

    /// Moves the date, never past `today`.
    pub fn shift_date(&mut self, days: i64, today: NaiveDate) {
        if let Some(date) = self.date.checked_add_signed(chrono::Duration::days(days)) {
            self.date = date.min(today);
        }
    }

    pub fn hours(&self) -> Result<f64> {
        match &self.duration {
            None => bail!("Duration is required"),
            Some(DurationInput::Preset(i)) => duration_options()
                .get(*i)
                .map(|o| o.hours)
                .ok_or_else(|| anyhow!("Unknown duration option {}", i)),
            Some(DurationInput::Manual(text)) => parse_manual_hours(text),
        }
    }

    pub fn can_submit(&self, today: NaiveDate) -> bool {
        self.to_new_entry(today).is_ok()
    }

    pub fn to_new_entry(&self, today: NaiveDate) -> Result<NewEntry> {
        let entry = NewEntry::new(self.user.clone(), self.date, self.hours()?);
        entry.validate(today)?;
        Ok(entry)
    }
}
