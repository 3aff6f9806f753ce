use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use evmeter_core::{ReportView, UsageSummary};
use log::info;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "User")]
    name: String,
    #[tabled(rename = "Sessions")]
    sessions: usize,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Share")]
    share: String,
}

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "Username")]
    user: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Duration (hours)")]
    duration: String,
}

fn styled(mut table: Table) -> Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table
}

pub fn summary_table(summary: &UsageSummary) -> String {
    let rows: Vec<SummaryRow> = summary
        .per_user
        .iter()
        .map(|u| SummaryRow {
            name: u.name.clone(),
            sessions: u.session_count,
            hours: format!("{:.1}", u.total_hours),
            share: format!("{:.1}%", u.percentage),
        })
        .collect();
    styled(Table::new(rows)).to_string()
}

pub fn sessions_table(view: &ReportView) -> String {
    let rows: Vec<SessionRow> = view
        .entries
        .iter()
        .map(|e| SessionRow {
            user: e.user.clone(),
            date: e.date.format("%Y-%m-%d").to_string(),
            duration: e.duration.to_string(),
        })
        .collect();
    styled(Table::new(rows)).to_string()
}

pub fn show_summary(title: &str, summary: &UsageSummary) {
    println!("\x1b[1;36m{}\x1b[0m (Total: {:.1}h)", title, summary.grand_total);
    println!("{}", summary_table(summary));
}

pub fn show_report(view: &ReportView) {
    show_summary(&view.period.title(), &view.summary);
    if view.entries.is_empty() {
        println!("No charging sessions match the current filters.");
    } else {
        println!("{}", sessions_table(view));
    }
}

/// Writes the report CSV into `dir` under the period-derived file name.
pub fn write_export(view: &ReportView, dir: &Path, today: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(view.filename(today));
    fs::write(&path, view.csv()).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("exported {} rows to {}", view.entries.len(), path.display());
    Ok(path)
}
