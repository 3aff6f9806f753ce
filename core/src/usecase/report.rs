use crate::model::filter::ReportFilter;
use crate::model::sort::{SortColumn, SortDirection, SortSpec};
use crate::model::entry::ChargingLogEntry;
use crate::repository::LogRepository;
use crate::service::aggregate::aggregate;
use crate::service::dto::{ReportPeriod, ReportView, UsageSummary};
use crate::service::export::export_csv;
use crate::service::filter::filter_entries;
use crate::service::logbook_service::LogbookService;
use crate::service::sort::sort_entries;
use crate::time::YearMonth;
use chrono::NaiveDate;
use anyhow::Result;

const FILE_PREFIX: &str = "ev-charging-report";

/// Report derivation on a snapshot. Never mutates the logbook.
pub struct ReportUseCase<'a, R: LogRepository> {
    logbook: &'a LogbookService<R>,
}

impl<'a, R: LogRepository> ReportUseCase<'a, R> {
    pub fn new(logbook: &'a LogbookService<R>) -> Self {
        Self { logbook }
    }

    pub fn report(&self, filter: &ReportFilter, sort: &SortSpec, today: NaiveDate) -> Result<ReportView> {
        let entries = self.logbook.entries()?;
        Ok(build_report(&entries, self.logbook.users(), filter, sort, today))
    }

    /// Home-screen totals: the calendar month containing `today`.
    pub fn monthly_summary(&self, today: NaiveDate) -> Result<UsageSummary> {
        let entries = self.logbook.entries()?;
        Ok(month_summary(&entries, self.logbook.users(), YearMonth::of(today)))
    }
}

pub fn month_summary(entries: &[ChargingLogEntry], users: &[String], month: YearMonth) -> UsageSummary {
    let filter = ReportFilter::new().with_month(month);
    aggregate(&filter_entries(entries, &filter), users)
}

/// Filter, order, aggregate.
///
/// A filter in its default state means "this month". Rows come out newest
/// first, then re-ordered by `sort` if a column is active.
pub fn build_report(
    entries: &[ChargingLogEntry],
    users: &[String],
    filter: &ReportFilter,
    sort: &SortSpec,
    today: NaiveDate,
) -> ReportView {
    let (period, effective) = if filter.is_default() {
        let month = YearMonth::of(today);
        (ReportPeriod::CurrentMonth(month), ReportFilter::new().with_month(month))
    } else {
        let period = match filter.month {
            Some(month) => ReportPeriod::Month(month),
            None => ReportPeriod::Custom,
        };
        (period, filter.clone())
    };

    let selected = filter_entries(entries, &effective);
    let newest_first = sort_entries(&selected, &SortSpec::by(SortColumn::Date, SortDirection::Descending));
    let rows = sort_entries(&newest_first, sort);
    let summary = aggregate(&rows, users);

    ReportView {
        period,
        entries: rows,
        summary,
    }
}

impl ReportPeriod {
    pub fn title(&self) -> String {
        match self {
            ReportPeriod::CurrentMonth(month) => format!("Current Month Report ({})", month.label()),
            ReportPeriod::Month(month) => format!("{} Report", month.label()),
            ReportPeriod::Custom => "Filtered Historical Data".to_string(),
        }
    }
}

impl ReportView {
    pub fn filename(&self, today: NaiveDate) -> String {
        match self.period {
            ReportPeriod::CurrentMonth(month) | ReportPeriod::Month(month) => {
                format!("{}-{}-{}.csv", FILE_PREFIX, month.month_name(), month.year())
            }
            ReportPeriod::Custom => format!("{}-{}.csv", FILE_PREFIX, today.format("%Y-%m-%d")),
        }
    }

    pub fn csv(&self) -> String {
        export_csv(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::NewEntry;
    use crate::model::filter::UserFilter;
    use crate::model::registry::UserRegistry;
    use crate::repository::InMemoryLogRepository;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn logbook() -> LogbookService<InMemoryLogRepository> {
        let repo = InMemoryLogRepository::with_entries(vec![
            NewEntry::new("Gal", day("2025-06-25"), 2.5),
            NewEntry::new("Guy", day("2025-06-24"), 1.5),
            NewEntry::new("Other", day("2025-06-23"), 3.0),
            NewEntry::new("Guy", day("2025-05-28"), 1.8),
            NewEntry::new("Other", day("2025-05-25"), 2.2),
        ])
        .unwrap();
        LogbookService::new(repo, UserRegistry::new(["Gal", "Guy", "Other"]).unwrap())
    }

    fn users_of(view: &ReportView) -> Vec<&str> {
        view.entries.iter().map(|e| e.user.as_str()).collect()
    }

    #[test]
    fn test_default_filter_is_current_month() {
        let logbook = logbook();
        let today = day("2025-06-26");
        let view = ReportUseCase::new(&logbook)
            .report(&ReportFilter::new(), &SortSpec::default(), today)
            .unwrap();

        assert_eq!(view.period, ReportPeriod::CurrentMonth(YearMonth::of(today)));
        assert_eq!(users_of(&view), vec!["Gal", "Guy", "Other"]);
        assert!((view.summary.grand_total - 7.0).abs() < 1e-9);
        assert_eq!(view.filename(today), "ev-charging-report-June-2025.csv");
    }

    #[test]
    fn test_default_sort_then_column_sort() {
        let logbook = logbook();
        let today = day("2025-06-26");
        let filter = ReportFilter::new().with_month(YearMonth::new(2025, 6).unwrap());
        let sort = SortSpec::by(SortColumn::Date, SortDirection::Ascending);
        let view = ReportUseCase::new(&logbook).report(&filter, &sort, today).unwrap();

        assert_eq!(
            view.csv(),
            "\"Username\",\"Date\",\"Duration (hours)\"\n\
             \"Other\",\"2025-06-23\",\"3\"\n\
             \"Guy\",\"2025-06-24\",\"1.5\"\n\
             \"Gal\",\"2025-06-25\",\"2.5\""
        );
    }

    #[test]
    fn test_selected_month_filename() {
        let logbook = logbook();
        let filter = ReportFilter::new().with_month(YearMonth::new(2025, 5).unwrap());
        let view = ReportUseCase::new(&logbook)
            .report(&filter, &SortSpec::default(), day("2026-10-19"))
            .unwrap();
        assert_eq!(view.period, ReportPeriod::Month(YearMonth::new(2025, 5).unwrap()));
        assert_eq!(users_of(&view), vec!["Guy", "Other"]);
        assert_eq!(view.filename(day("2026-10-19")), "ev-charging-report-May-2025.csv");
    }

    #[test]
    fn test_user_only_filter_spans_all_time() {
        let logbook = logbook();
        let filter = ReportFilter::new().with_user(UserFilter::User("Guy".into()));
        let today = day("2025-06-26");
        let view = ReportUseCase::new(&logbook).report(&filter, &SortSpec::default(), today).unwrap();

        assert_eq!(view.period, ReportPeriod::Custom);
        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.entries[0].date, day("2025-06-24"));
        assert_eq!(view.filename(today), "ev-charging-report-2025-06-26.csv");
        let guy = view.summary.user("Guy").unwrap();
        assert_eq!(guy.percentage, 100.0);
        assert_eq!(view.summary.user("Gal").unwrap().session_count, 0);
    }

    #[test]
    fn test_monthly_summary_after_append() {
        let mut logbook = logbook();
        let today = day("2025-06-26");
        logbook.log_session(NewEntry::new("Gal", today, 1.0), today).unwrap();

        let summary = ReportUseCase::new(&logbook).monthly_summary(today).unwrap();
        let gal = summary.user("Gal").unwrap();
        assert!((gal.total_hours - 3.5).abs() < 1e-9);
        assert_eq!(gal.session_count, 2);
    }

    #[test]
    fn test_removed_user_history_still_counts_in_total() {
        let mut logbook = logbook();
        logbook.remove_user("Other").unwrap();
        let summary = ReportUseCase::new(&logbook).monthly_summary(day("2025-06-26")).unwrap();
        assert_eq!(summary.per_user.len(), 2);
        assert!((summary.grand_total - 7.0).abs() < 1e-9);
    }
}
