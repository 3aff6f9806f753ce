pub mod admin;
pub mod config;
pub mod input;
pub mod model;
pub mod palette;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use admin::{AdminGate, AdminSession};
pub use config::Config;
pub use input::{duration_options, parse_manual_hours, DurationOption, PendingEntry};
pub use model::entry::{ChargingLogEntry, NewEntry};
pub use model::filter::{ReportFilter, UserFilter};
pub use model::registry::UserRegistry;
pub use model::sort::{SortColumn, SortDirection, SortSpec};
pub use repository::{InMemoryLogRepository, LogRepository};
pub use service::aggregate::aggregate;
pub use service::dto::{LogbookOverview, ReportPeriod, ReportView, UsageSummary, UserSummary};
pub use service::export::export_csv;
pub use service::filter::filter_entries;
pub use service::logbook_service::{LogbookService, ResetConfirmation};
pub use service::sort::sort_entries;
pub use time::{month_options, parse_date, YearMonth};
pub use usecase::report::{build_report, month_summary, ReportUseCase};

/// Builds the session logbook described by `config`.
pub fn open_logbook(config: &Config) -> anyhow::Result<LogbookService<InMemoryLogRepository>> {
    let repo = InMemoryLogRepository::with_entries(config.seed_entries()?)?;
    Ok(LogbookService::new(repo, config.registry()?))
}
