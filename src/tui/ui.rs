use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::models::{format_due, format_percentage, Task};
use crate::status::CompletionStatus;
use crate::storage::KeyValueStore;
use super::app::{App, Form, InputMode, Screen};

pub fn ui<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Body
            Constraint::Length(3)  // Help / messages
        ].as_ref())
        .split(f.area());

    match app.screen {
        Screen::Home => render_home(f, app, chunks[0]),
        Screen::Dashboard => render_dashboard(f, app, chunks[0]),
        Screen::Create => render_create(f, app, chunks[0]),
    }

    let help_text = match (app.screen, app.input_mode) {
        (_, InputMode::Editing) => "Tab: Next Field | Enter: Save | Esc: Cancel",
        (Screen::Home, _) => "q: Quit | Enter: Create/View To-Do List | r: Refresh",
        _ => "q: Quit | n: New Task | e: Edit | d: Del | r: Refresh | Esc: Home",
    };
    let footer = match &app.message {
        Some(msg) => Paragraph::new(msg.as_str()).style(Style::default().fg(Color::Yellow)),
        None => Paragraph::new(help_text).style(Style::default().fg(Color::Gray)),
    };
    f.render_widget(footer.block(Block::default().borders(Borders::ALL)), chunks[1]);

    if let Some(edit) = &app.edit {
        let area = centered_rect(60, 11, f.area());
        f.render_widget(Clear, area);
        render_form(f, &edit.form, ["Edit Title", "Edit Content", "Completion Percentage"], area, "Edit Task");
    }
}

fn status_color(t: &Task) -> Color {
    match CompletionStatus::from_percentage(t.completion_percentage) {
        CompletionStatus::Completed => Color::Green,
        CompletionStatus::InProgress => Color::Yellow,
        CompletionStatus::NotStarted => Color::Red,
    }
}

fn header(cells: Vec<&'static str>) -> Row<'static> {
    Row::new(cells)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .bottom_margin(1)
}

fn render_home<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    if app.list.tasks().is_empty() {
        let empty = Paragraph::new("No tasks are added or due")
            .block(Block::default().borders(Borders::ALL).title("Home"));
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app
        .list
        .upcoming()
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.title.clone()),
                Cell::from(t.content.clone()),
                Cell::from(format_due(t.due_date)),
                Cell::from(format_percentage(t.completion_percentage)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Min(20),
        Constraint::Length(18),
        Constraint::Length(10),
    ];

    let (_, due) = app.counts.get();
    let table = Table::new(rows, widths)
        .header(header(vec!["Title", "Description", "Due", "Completion"]))
        .block(Block::default().borders(Borders::ALL).title(format!("Due Tasks ({})", due)))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.home_state);
}

fn render_dashboard<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let rows: Vec<Row> = app
        .list
        .tasks()
        .iter()
        .map(|t| {
            let status = CompletionStatus::from_percentage(t.completion_percentage);
            Row::new(vec![
                Cell::from(t.title.clone()),
                Cell::from(t.content.clone()),
                Cell::from(t.timestamp.clone()),
                Cell::from(format_due(t.due_date)),
                Cell::from(format_percentage(t.completion_percentage)),
                Cell::from(status.label()),
            ]).style(Style::default().fg(status_color(t)))
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Length(18),
        Constraint::Length(10),
        Constraint::Length(12),
    ];

    let (all, _) = app.counts.get();
    let table = Table::new(rows, widths)
        .header(header(vec!["Title", "Description", "Created", "Due", "Completion", "Status"]))
        .block(Block::default().borders(Borders::ALL).title(format!("Dashboard - Tasks List ({})", all)))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.dashboard_state);
}

fn render_create<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let area = centered_rect(70, 11, area);
    render_form(
        f,
        &app.create_form,
        ["Title", "Description", "Due Date (YYYY-MM-DD [HH:MM])"],
        area,
        "New Task",
    );
}

fn render_form(f: &mut Frame, form: &Form, labels: [&str; 3], area: Rect, title: &str) {
    let outer = Block::default().borders(Borders::ALL).title(title.to_string());
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Length(3)].as_ref())
        .split(inner);

    for (i, label) in labels.iter().enumerate() {
        let style = if i == form.focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let input = Paragraph::new(form.fields[i].as_str())
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(label.to_string()));
        f.render_widget(input, rows[i]);
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height - height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
