mod logging;
mod report;
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use evmeter_core::{
    duration_options, month_options, month_summary, open_logbook, Config, ReportFilter, ReportUseCase, SortColumn,
    SortDirection, SortSpec, UserFilter, YearMonth,
};
use log::LevelFilter;

const LOG_FILE_NAME: &str = "evmeter.log";

#[derive(Parser)]
#[command(name = "evmeter")]
#[command(about = "Track EV charging sessions and who used how much", long_about = None)]
struct Cli {
    /// Config file (default: ~/.evmeter/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Explicit log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the interactive session
    Tui,
    /// Per-user totals for a month (default: current month)
    Summary {
        #[arg(short, long, value_parser = parse_month)]
        month: Option<YearMonth>,
    },
    /// Filtered and sorted session report
    Report(ReportArgs),
    /// List the preset charging durations
    Durations,
    /// List the months offered by the month filter
    Months,
}

#[derive(clap::Args)]
struct ReportArgs {
    /// Only this user's sessions
    #[arg(short, long)]
    user: Option<String>,

    /// Only this month (YYYY-MM)
    #[arg(short, long, value_parser = parse_month, conflicts_with_all = ["from", "to"])]
    month: Option<YearMonth>,

    /// Range start, inclusive (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Range end, inclusive (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Sort column
    #[arg(short, long, value_enum)]
    sort: Option<SortArg>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Write the report as CSV into the export directory
    #[arg(short, long)]
    export: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    User,
    Date,
    Duration,
}

impl From<SortArg> for SortColumn {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::User => SortColumn::User,
            SortArg::Date => SortColumn::Date,
            SortArg::Duration => SortColumn::Duration,
        }
    }
}

fn parse_month(s: &str) -> Result<YearMonth, String> {
    s.parse::<YearMonth>().map_err(|e| e.to_string())
}

impl ReportArgs {
    fn filter(&self) -> ReportFilter {
        let mut filter = ReportFilter::new();
        if let Some(user) = &self.user {
            filter = filter.with_user(UserFilter::User(user.clone()));
        }
        if let Some(month) = self.month {
            filter = filter.with_month(month);
        }
        if let (Some(from), Some(to)) = (self.from, self.to) {
            filter = filter.with_range(from, to);
        }
        filter
    }

    fn sort(&self) -> SortSpec {
        match self.sort {
            Some(column) => {
                let direction = if self.desc { SortDirection::Descending } else { SortDirection::Ascending };
                SortSpec::by(column.into(), direction)
            }
            None => SortSpec::default(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .unwrap_or(if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info });
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    if interactive {
        logging::init_file(level, &Config::data_dir()?.join(LOG_FILE_NAME))?;
    } else {
        logging::init_stderr(level)?;
    }

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Summary { month }) => {
            let logbook = open_logbook(&config)?;
            let month = month.unwrap_or_else(|| YearMonth::of(today));
            let entries = logbook.entries()?;
            let summary = month_summary(&entries, logbook.users(), month);
            report::show_summary(&month.label(), &summary);
        }
        Some(Commands::Report(args)) => {
            let logbook = open_logbook(&config)?;
            let view = ReportUseCase::new(&logbook).report(&args.filter(), &args.sort(), today)?;
            report::show_report(&view);
            if args.export {
                let path = report::write_export(&view, &config.export_dir(), today)?;
                println!("Exported {} rows to {}", view.entries.len(), path.display());
            }
        }
        Some(Commands::Durations) => {
            for option in duration_options() {
                println!("{:>5}  {}", option.hours, option.label);
            }
        }
        Some(Commands::Months) => {
            let options = month_options(today, config.first_month, config.last_year);
            if options.is_empty() {
                println!("No selectable months.");
            }
            for month in options {
                println!("{}  {}", month, month.label());
            }
        }
        Some(Commands::Tui) | None => {
            tui::run(config)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_args() {
        let cli = Cli::try_parse_from(["evmeter", "report", "--user", "Gal", "--month", "2025-06", "--sort", "duration", "--desc"]).unwrap();
        let Some(Commands::Report(args)) = cli.command else {
            panic!("expected report");
        };
        let filter = args.filter();
        assert_eq!(filter.user, UserFilter::User("Gal".into()));
        assert_eq!(filter.month.map(|m| m.to_string()), Some("2025-06".to_string()));
        assert_eq!(args.sort(), SortSpec::by(SortColumn::Duration, SortDirection::Descending));
    }

    #[test]
    fn test_month_conflicts_with_range() {
        assert!(Cli::try_parse_from(["evmeter", "report", "--month", "2025-06", "--from", "2025-06-01", "--to", "2025-06-30"]).is_err());
        assert!(Cli::try_parse_from(["evmeter", "report", "--from", "2025-06-01"]).is_err());
        assert!(Cli::try_parse_from(["evmeter", "summary", "--month", "2025-13"]).is_err());
    }
}
