use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use evmeter_core::input::duration_options;
use evmeter_core::{
    month_options, open_logbook, parse_date, AdminGate, AdminSession, Config, InMemoryLogRepository,
    LogbookOverview, LogbookService, PendingEntry, ReportFilter, ReportUseCase, ReportView,
    ResetConfirmation, SortColumn, SortSpec, UsageSummary, UserFilter, YearMonth,
};
use log::error;

use crate::report::write_export;
use crate::tui::timer::ReturnTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Log,
    Reports,
    Users,
    AdminPrompt,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    AddUser,
    RenameUser(String),
    StartDate,
    EndDate,
    AdminSecret,
}

pub enum InputMode {
    Normal,
    Editing(EditTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogField {
    Date,
    Preset,
    Manual,
}

impl LogField {
    fn next(self) -> Self {
        match self {
            LogField::Date => LogField::Preset,
            LogField::Preset => LogField::Manual,
            LogField::Manual => LogField::Date,
        }
    }
}

pub struct App {
    pub logbook: LogbookService<InMemoryLogRepository>,
    pub config: Config,
    gate: AdminGate,
    admin: Option<AdminSession>,
    pub pending_reset: Option<ResetConfirmation>,
    pub pending_delete: Option<String>,
    pub screen: Screen,
    pub today: NaiveDate,
    pub selected: usize,
    pub pending: Option<PendingEntry>,
    pub log_field: LogField,
    pub filter: ReportFilter,
    pub sort: SortSpec,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub message: Option<String>,
    pub return_timer: ReturnTimer,
}

impl App {
    pub fn new(config: Config) -> Result<App> {
        let logbook = open_logbook(&config)?;
        let gate = AdminGate::new(config.admin_secret.clone());
        Ok(App {
            logbook,
            config,
            gate,
            admin: None,
            pending_reset: None,
            pending_delete: None,
            screen: Screen::Home,
            today: Local::now().date_naive(),
            selected: 0,
            pending: None,
            log_field: LogField::Preset,
            filter: ReportFilter::new(),
            sort: SortSpec::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            message: None,
            return_timer: ReturnTimer::default(),
        })
    }

    /// Every screen change goes through here so the return timer never outlives its screen.
    pub fn navigate(&mut self, screen: Screen) {
        self.return_timer.cancel();
        self.message = None;
        self.pending_delete = None;
        self.pending_reset = None;
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
        if screen != Screen::Admin {
            self.admin = None;
        }
        if screen != Screen::Log {
            self.pending = None;
        }
        self.screen = screen;
    }

    pub fn tick(&mut self, now: Instant) {
        self.today = Local::now().date_naive();
        if self.return_timer.fire(now) && self.screen == Screen::Log {
            self.navigate(Screen::Home);
        }
    }

    // --- views ---

    pub fn monthly_summary(&self) -> UsageSummary {
        ReportUseCase::new(&self.logbook)
            .monthly_summary(self.today)
            .unwrap_or_default()
    }

    pub fn report(&self) -> Option<ReportView> {
        ReportUseCase::new(&self.logbook)
            .report(&self.filter, &self.sort, self.today)
            .inspect_err(|e| error!("report failed: {:#}", e))
            .ok()
    }

    pub fn overview(&self) -> LogbookOverview {
        self.logbook.overview().unwrap_or_default()
    }

    pub fn selected_user(&self) -> Option<&String> {
        self.logbook.users().get(self.selected)
    }

    pub fn is_admin(&self) -> bool {
        self.admin.is_some()
    }

    // --- user selection ---

    pub fn next(&mut self) {
        let len = self.logbook.users().len();
        if len == 0 {
            return;
        }
        self.selected = if self.selected >= len - 1 { 0 } else { self.selected + 1 };
    }

    pub fn previous(&mut self) {
        let len = self.logbook.users().len();
        if len == 0 {
            return;
        }
        self.selected = if self.selected == 0 { len - 1 } else { self.selected - 1 };
    }

    fn clamp_selection(&mut self) {
        let len = self.logbook.users().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    // --- logging a session ---

    pub fn open_log(&mut self) {
        if let Some(user) = self.selected_user().cloned() {
            self.navigate(Screen::Log);
            self.pending = Some(PendingEntry::new(user, self.today));
            self.log_field = LogField::Preset;
        }
    }

    pub fn next_log_field(&mut self) {
        self.log_field = self.log_field.next();
    }

    pub fn shift_date(&mut self, days: i64) {
        let today = self.today;
        if let Some(pending) = self.pending.as_mut() {
            pending.shift_date(days, today);
        }
    }

    pub fn cycle_preset(&mut self, forward: bool) {
        let count = duration_options().len();
        if let Some(pending) = self.pending.as_mut() {
            let next = match (pending.preset_index(), forward) {
                (None, true) => 0,
                (None, false) => count - 1,
                (Some(i), true) => (i + 1) % count,
                (Some(i), false) => (i + count - 1) % count,
            };
            pending.select_preset(Some(next));
        }
    }

    pub fn manual_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || c == '.') {
            return;
        }
        if let Some(pending) = self.pending.as_mut() {
            let mut text = pending.manual_text().to_string();
            text.push(c);
            pending.set_manual(&text);
        }
    }

    pub fn manual_backspace(&mut self) {
        if let Some(pending) = self.pending.as_mut() {
            let mut text = pending.manual_text().to_string();
            text.pop();
            pending.set_manual(&text);
        }
    }

    pub fn can_submit_log(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.can_submit(self.today))
    }

    pub fn submit_log(&mut self, now: Instant) {
        let Some(pending) = self.pending.as_ref() else {
            return;
        };
        let result = pending
            .to_new_entry(self.today)
            .and_then(|entry| self.logbook.log_session(entry, self.today));
        match result {
            Ok(stored) => {
                self.message = Some(format!(
                    "Charging session logged: {}h on {}. Returning home...",
                    stored.duration, stored.date
                ));
                self.pending = Some(PendingEntry::new(stored.user, self.today));
                self.return_timer
                    .arm(now, Duration::from_millis(self.config.return_delay_ms));
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    // --- reports ---

    pub fn cycle_user_filter(&mut self) {
        let users = self.logbook.users();
        self.filter.user = match &self.filter.user {
            UserFilter::All => users
                .first()
                .map(|u| UserFilter::User(u.clone()))
                .unwrap_or(UserFilter::All),
            UserFilter::User(current) => users
                .iter()
                .position(|u| u == current)
                .and_then(|i| users.get(i + 1))
                .map(|u| UserFilter::User(u.clone()))
                .unwrap_or(UserFilter::All),
        };
    }

    pub fn month_options(&self) -> Vec<YearMonth> {
        month_options(self.today, self.config.first_month, self.config.last_year)
    }

    pub fn cycle_month(&mut self) {
        let options = self.month_options();
        let next = match self.filter.month {
            None => options.first().copied(),
            Some(current) => options
                .iter()
                .position(|m| *m == current)
                .and_then(|i| options.get(i + 1))
                .copied(),
        };
        self.filter.set_month(next);
    }

    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort.toggle(column);
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.message = None;
    }

    pub fn export_report(&mut self) {
        let Some(view) = self.report() else {
            return;
        };
        self.message = Some(match write_export(&view, &self.config.export_dir(), self.today) {
            Ok(path) => format!("Exported {} rows to {}", view.entries.len(), path.display()),
            Err(e) => format!("Export failed: {:#}", e),
        });
    }

    // --- users ---

    pub fn request_delete_user(&mut self) {
        if let Some(user) = self.selected_user().cloned() {
            if self.logbook.can_remove_user(&user) {
                self.message = Some(format!("Delete user '{}'? Their sessions are kept. (y/n)", user));
                self.pending_delete = Some(user);
            } else {
                self.message = Some("Cannot delete the last remaining user".to_string());
            }
        }
    }

    pub fn confirm_delete_user(&mut self) {
        if let Some(user) = self.pending_delete.take() {
            self.message = Some(match self.logbook.remove_user(&user) {
                Ok(()) => format!("User '{}' deleted", user),
                Err(e) => e.to_string(),
            });
            if self.filter.user == UserFilter::User(user) {
                self.filter.user = UserFilter::All;
            }
            self.clamp_selection();
        }
    }

    pub fn cancel_pending(&mut self) {
        self.pending_delete = None;
        self.pending_reset = None;
        self.message = None;
    }

    // --- admin ---

    pub fn request_reset(&mut self) {
        let Some(session) = self.admin.as_ref() else {
            return;
        };
        match self.logbook.prepare_reset(session) {
            Ok(confirmation) => {
                self.message = Some(format!(
                    "Delete all {} charging logs permanently? This cannot be undone. (y/n)",
                    confirmation.count
                ));
                self.pending_reset = Some(confirmation);
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    pub fn confirm_reset(&mut self) {
        let (Some(session), Some(confirmation)) = (self.admin.as_ref(), self.pending_reset.take()) else {
            return;
        };
        self.message = Some(match self.logbook.reset_all(session, confirmation) {
            Ok(removed) => format!("Database restarted: {} charging logs permanently deleted", removed),
            Err(e) => e.to_string(),
        });
    }

    // --- text input ---

    pub fn begin_edit(&mut self, target: EditTarget) {
        self.input.clear();
        self.cursor_position = 0;
        if let EditTarget::RenameUser(old) = &target {
            self.input = old.clone();
            self.cursor_position = old.chars().count();
        }
        self.input_mode = InputMode::Editing(target);
        self.message = None;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_input(&mut self) {
        let target = match &self.input_mode {
            InputMode::Editing(target) => target.clone(),
            InputMode::Normal => return,
        };
        let text = self.input.clone();
        self.exit_input_mode();

        match target {
            EditTarget::AddUser => {
                self.message = Some(match self.logbook.add_user(&text) {
                    Ok(name) => format!("User '{}' added", name),
                    Err(e) => e.to_string(),
                });
            }
            EditTarget::RenameUser(old) => {
                let new = text.trim().to_string();
                self.message = Some(match self.logbook.rename_user(&old, &new) {
                    Ok(changed) => {
                        let message = format!("Renamed '{}' to '{}' ({} sessions updated)", old, new, changed);
                        if self.filter.user == UserFilter::User(old) {
                            self.filter.user = UserFilter::User(new);
                        }
                        message
                    }
                    Err(e) => e.to_string(),
                });
            }
            EditTarget::StartDate | EditTarget::EndDate => {
                let date = if text.trim().is_empty() {
                    Ok(None)
                } else {
                    parse_date(&text).map(Some)
                };
                match (date, target) {
                    (Ok(d), EditTarget::StartDate) => self.filter.set_start_date(d),
                    (Ok(d), _) => self.filter.set_end_date(d),
                    (Err(e), _) => self.message = Some(e.to_string()),
                }
            }
            EditTarget::AdminSecret => match self.gate.unlock(&text) {
                Ok(session) => {
                    self.navigate(Screen::Admin);
                    self.admin = Some(session);
                }
                Err(e) => self.message = Some(e.to_string()),
            },
        }
    }
}
