pub mod app;
pub mod timer;
pub mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use evmeter_core::{Config, SortColumn};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::tui::app::{App, EditTarget, InputMode, LogField, Screen};

pub fn run(config: Config) -> Result<()> {
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("interactive session started");
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }
    info!("interactive session ended");

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    return Ok(());
                }
            }
        }
        app.tick(Instant::now());
    }
}

/// Returns true when the session should end.
fn handle_key(app: &mut App, code: KeyCode) -> bool {
    if let InputMode::Editing(_) = app.input_mode {
        match code {
            KeyCode::Enter => app.submit_input(),
            KeyCode::Esc => app.exit_input_mode(),
            KeyCode::Char(c) => app.input_char(c),
            KeyCode::Backspace => app.delete_char(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            _ => {}
        }
        return false;
    }

    if app.pending_delete.is_some() || app.pending_reset.is_some() {
        match code {
            KeyCode::Char('y') if app.pending_delete.is_some() => app.confirm_delete_user(),
            KeyCode::Char('y') => app.confirm_reset(),
            _ => app.cancel_pending(),
        }
        return false;
    }

    match app.screen {
        Screen::Home => match code {
            KeyCode::Char('q') => return true,
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Enter => app.open_log(),
            KeyCode::Char('r') => app.navigate(Screen::Reports),
            KeyCode::Char('u') => app.navigate(Screen::Users),
            KeyCode::Char('a') => {
                app.navigate(Screen::AdminPrompt);
                app.begin_edit(EditTarget::AdminSecret);
            }
            _ => {}
        },
        Screen::Log => match (code, app.log_field) {
            (KeyCode::Esc, _) => app.navigate(Screen::Home),
            (KeyCode::Tab, _) => app.next_log_field(),
            (KeyCode::Enter, _) => app.submit_log(Instant::now()),
            (KeyCode::Left, LogField::Date) => app.shift_date(-1),
            (KeyCode::Right, LogField::Date) => app.shift_date(1),
            (KeyCode::Down, LogField::Preset) | (KeyCode::Char('j'), LogField::Preset) => app.cycle_preset(true),
            (KeyCode::Up, LogField::Preset) | (KeyCode::Char('k'), LogField::Preset) => app.cycle_preset(false),
            (KeyCode::Char(c), LogField::Manual) => app.manual_char(c),
            (KeyCode::Backspace, LogField::Manual) => app.manual_backspace(),
            _ => {}
        },
        Screen::Reports => match code {
            KeyCode::Esc | KeyCode::Char('q') => app.navigate(Screen::Home),
            KeyCode::Char('u') => app.cycle_user_filter(),
            KeyCode::Char('m') => app.cycle_month(),
            KeyCode::Char('s') => app.begin_edit(EditTarget::StartDate),
            KeyCode::Char('e') => app.begin_edit(EditTarget::EndDate),
            KeyCode::Char('c') => app.clear_filters(),
            KeyCode::Char('1') => app.toggle_sort(SortColumn::User),
            KeyCode::Char('2') => app.toggle_sort(SortColumn::Date),
            KeyCode::Char('3') => app.toggle_sort(SortColumn::Duration),
            KeyCode::Char('x') => app.export_report(),
            _ => {}
        },
        Screen::Users => match code {
            KeyCode::Esc | KeyCode::Char('q') => app.navigate(Screen::Home),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Char('a') => app.begin_edit(EditTarget::AddUser),
            KeyCode::Char('e') => {
                if let Some(user) = app.selected_user().cloned() {
                    app.begin_edit(EditTarget::RenameUser(user));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => app.request_delete_user(),
            _ => {}
        },
        Screen::AdminPrompt => match code {
            KeyCode::Esc => app.navigate(Screen::Home),
            KeyCode::Enter => app.begin_edit(EditTarget::AdminSecret),
            _ => {}
        },
        Screen::Admin => match code {
            KeyCode::Esc | KeyCode::Char('q') => app.navigate(Screen::Home),
            KeyCode::Char('R') => app.request_reset(),
            _ => {}
        },
    }
    false
}
