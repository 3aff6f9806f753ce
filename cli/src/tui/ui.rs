use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use evmeter_core::input::duration_options;
use evmeter_core::palette::color_for;
use evmeter_core::{ReportPeriod, SortColumn, SortDirection, UsageSummary, UserFilter};

use crate::tui::app::{App, EditTarget, InputMode, LogField, Screen};

const NAME_WIDTH: usize = 16;

fn user_color(name: &str) -> Color {
    let (r, g, b) = color_for(name).rgb();
    Color::Rgb(r, g, b)
}

/// Truncates to a display width, marking the cut with an ellipsis.
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Input / message
            Constraint::Length(1), // Footer
        ])
        .split(size);

    let header = Paragraph::new("EV CHARGING METER")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    match app.screen {
        Screen::Home => draw_home(f, app, main_chunks[1]),
        Screen::Log => draw_log(f, app, main_chunks[1]),
        Screen::Reports => draw_reports(f, app, main_chunks[1]),
        Screen::Users => draw_users(f, app, main_chunks[1]),
        Screen::AdminPrompt => draw_admin_prompt(f, main_chunks[1]),
        Screen::Admin => draw_admin(f, app, main_chunks[1]),
    }

    draw_status(f, app, main_chunks[2]);

    let help = match app.screen {
        Screen::Home => "j/k: Select | Enter: Log session | r: Reports | u: Users | a: Admin | q: Quit",
        Screen::Log => "Tab: Field | ←/→: Date | ↑/↓: Preset | 0-9 .: Hours | Enter: Submit | Esc: Back",
        Screen::Reports => "u: User | m: Month | s/e: Start/End | 1/2/3: Sort | c: Clear | x: Export CSV | Esc: Back",
        Screen::Users => "j/k: Select | a: Add | e: Rename | d: Delete | Esc: Back",
        Screen::AdminPrompt => "Enter: Password | Esc: Back",
        Screen::Admin => "R: Restart database | Esc: Back",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let (title, text) = match &app.input_mode {
        InputMode::Editing(target) => {
            let title = match target {
                EditTarget::AddUser => " New user ".to_string(),
                EditTarget::RenameUser(old) => format!(" Rename '{}' ", old),
                EditTarget::StartDate => " Start date (YYYY-MM-DD, empty clears) ".to_string(),
                EditTarget::EndDate => " End date (YYYY-MM-DD, empty clears) ".to_string(),
                EditTarget::AdminSecret => " Admin password ".to_string(),
            };
            let shown = if *target == EditTarget::AdminSecret {
                "*".repeat(app.input.chars().count())
            } else {
                app.input.clone()
            };
            (title, format!("{}_", shown))
        }
        InputMode::Normal => (" Status ".to_string(), app.message.clone().unwrap_or_default()),
    };
    let status = Paragraph::new(text).block(panel(&title));
    f.render_widget(status, area);
}

fn summary_rows(summary: &UsageSummary) -> Vec<Row<'static>> {
    summary
        .per_user
        .iter()
        .map(|u| {
            Row::new(vec![
                Span::styled(
                    fit(&u.name, NAME_WIDTH),
                    Style::default().fg(user_color(&u.name)).add_modifier(Modifier::BOLD),
                ),
                Span::raw(u.session_count.to_string()),
                Span::raw(format!("{:.1}h", u.total_hours)),
                Span::raw(format!("{:.1}%", u.percentage)),
            ])
        })
        .collect()
}

fn draw_home(f: &mut Frame, app: &App, area: Rect) {
    let summary = app.monthly_summary();
    let title = format!(" This month - total {:.1}h ", summary.grand_total);
    let table = Table::new(
        summary_rows(&summary),
        [
            Constraint::Length(NAME_WIDTH as u16 + 2),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(vec!["User", "Sessions", "Hours", "Share"]).style(Style::default().fg(Color::Yellow)))
    .block(panel(&title))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    let mut state = TableState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_log(f: &mut Frame, app: &App, area: Rect) {
    let Some(pending) = app.pending.as_ref() else {
        f.render_widget(panel(" Log Charging Session "), area);
        return;
    };

    let focus = |field: LogField| {
        if app.log_field == field {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Blue)
        }
    };
    let disabled = Style::default().fg(Color::DarkGray);

    let options = duration_options();
    let preset = pending
        .preset_index()
        .and_then(|i| options.get(i))
        .map(|o| o.label.clone());
    let manual = pending.manual_text();

    let text = vec![
        Line::from(vec![
            Span::styled("User: ", Style::default().fg(Color::Blue)),
            Span::styled(pending.user.clone(), Style::default().fg(user_color(&pending.user)).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Date: ", focus(LogField::Date)),
            Span::raw(pending.date.format("%Y-%m-%d").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Duration: ", focus(LogField::Preset)),
            Span::styled(
                preset.unwrap_or_else(|| "Select duration".to_string()),
                if manual.is_empty() { Style::default() } else { disabled },
            ),
        ]),
        Line::from(vec![
            Span::styled("  or hours: ", focus(LogField::Manual)),
            Span::styled(
                if manual.is_empty() { "-".to_string() } else { format!("{}h", manual) },
                if pending.preset_index().is_some() { disabled } else { Style::default() },
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "[ Submit Log ]",
            if app.can_submit_log() {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                disabled
            },
        )),
    ];

    let body = Paragraph::new(text)
        .block(panel(" Log Charging Session "))
        .wrap(Wrap { trim: true });
    f.render_widget(body, area);
}

fn sort_marker(app: &App, column: SortColumn) -> &'static str {
    match (app.sort.column == Some(column), app.sort.direction) {
        (false, _) => "",
        (true, SortDirection::Ascending) => " ▲",
        (true, SortDirection::Descending) => " ▼",
    }
}

fn draw_reports(f: &mut Frame, app: &App, area: Rect) {
    let Some(view) = app.report() else {
        f.render_widget(panel(" Charging Reports "), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(view.summary.per_user.len() as u16 + 4),
            Constraint::Min(3),
        ])
        .split(area);

    let user = match &app.filter.user {
        UserFilter::All => "All users".to_string(),
        UserFilter::User(name) => name.clone(),
    };
    let month = app.filter.month.map(|m| m.label()).unwrap_or_else(|| "-".to_string());
    let range = format!(
        "{} .. {}",
        app.filter.start_date.map(|d| d.to_string()).unwrap_or_default(),
        app.filter.end_date.map(|d| d.to_string()).unwrap_or_default(),
    );
    let period_style = match view.period {
        ReportPeriod::CurrentMonth(_) => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD),
    };
    let filters = Paragraph::new(vec![
        Line::from(Span::styled(view.period.title(), period_style)),
        Line::from(vec![
            Span::styled("User: ", Style::default().fg(Color::Blue)),
            Span::raw(user),
            Span::styled("  Month: ", Style::default().fg(Color::Blue)),
            Span::raw(month),
            Span::styled("  Range: ", Style::default().fg(Color::Blue)),
            Span::raw(range),
        ]),
    ])
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(filters, chunks[0]);

    let summary = Table::new(
        summary_rows(&view.summary),
        [
            Constraint::Length(NAME_WIDTH as u16 + 2),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(vec!["User", "Sessions", "Hours", "Share"]).style(Style::default().fg(Color::Yellow)))
    .block(panel(" Summary ").title_bottom(format!(" Total {:.1}h ", view.summary.grand_total)));
    f.render_widget(summary, chunks[1]);

    let rows: Vec<Row> = view
        .entries
        .iter()
        .map(|e| {
            Row::new(vec![
                Span::styled(fit(&e.user, NAME_WIDTH), Style::default().fg(user_color(&e.user))),
                Span::raw(e.date.format("%Y-%m-%d").to_string()),
                Span::raw(format!("{}", e.duration)),
            ])
        })
        .collect();
    let header = Row::new(vec![
        format!("Username{}", sort_marker(app, SortColumn::User)),
        format!("Date{}", sort_marker(app, SortColumn::Date)),
        format!("Duration (h){}", sort_marker(app, SortColumn::Duration)),
    ])
    .style(Style::default().fg(Color::Yellow));
    let sessions = Table::new(
        rows,
        [
            Constraint::Length(NAME_WIDTH as u16 + 2),
            Constraint::Length(14),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(panel(" Sessions "));
    f.render_widget(sessions, chunks[2]);
}

fn draw_users(f: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Row> = app
        .logbook
        .users()
        .iter()
        .map(|name| {
            Row::new(vec![Span::styled(
                fit(name, NAME_WIDTH * 2),
                Style::default().fg(user_color(name)).add_modifier(Modifier::BOLD),
            )])
        })
        .collect();

    let title = format!(" Users ({}) ", app.logbook.users().len());
    let table = Table::new(rows, [Constraint::Min(10)])
        .block(panel(&title))
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    let mut state = TableState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_admin_prompt(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled("Admin Access", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("Enter the admin password to continue."),
    ];
    f.render_widget(Paragraph::new(text).block(panel(" Admin ")), area);
}

fn draw_admin(f: &mut Frame, app: &App, area: Rect) {
    let overview = app.overview();
    let text = vec![
        Line::from(vec![
            Span::styled("Total Users: ", Style::default().fg(Color::Blue)),
            Span::raw(overview.user_count.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Total Charging Sessions: ", Style::default().fg(Color::Blue)),
            Span::raw(overview.session_count.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Total Hours: ", Style::default().fg(Color::Blue)),
            Span::raw(format!("{:.1}h", overview.total_hours)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            if overview.session_count == 0 { "Database Already Empty" } else { "Press R to restart the database" },
            Style::default().fg(Color::Red),
        )),
    ];
    f.render_widget(Paragraph::new(text).block(panel(" Admin Panel ")), area);
}
