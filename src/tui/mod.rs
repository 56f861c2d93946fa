pub mod app;
pub mod ui;

use std::{error::Error, io};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use crate::state::TaskList;
use crate::storage::KeyValueStore;
use app::{App, InputMode, Screen};
use ui::ui;

pub fn run_tui<S: KeyValueStore>(list: TaskList<S>) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(list);
    info!("tui started with {} tasks", app.list.tasks().len());

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: Backend, S: KeyValueStore>(terminal: &mut Terminal<B>, app: &mut App<S>) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(());
        }

        match app.input_mode {
            InputMode::Normal => match (app.screen, key.code) {
                (_, KeyCode::Char('q')) => return Ok(()),
                (_, KeyCode::Char('r')) => app.refresh(),
                (_, KeyCode::Down | KeyCode::Char('j')) => app.next(),
                (_, KeyCode::Up | KeyCode::Char('k')) => app.previous(),
                (Screen::Home, KeyCode::Enter | KeyCode::Char('v')) => app.open_dashboard(),
                (Screen::Dashboard, KeyCode::Char('n')) => app.start_create(),
                (Screen::Dashboard, KeyCode::Char('e') | KeyCode::Enter) => app.start_edit(),
                (Screen::Dashboard, KeyCode::Char('d') | KeyCode::Delete) => app.delete_selected(),
                (Screen::Dashboard | Screen::Create, KeyCode::Esc | KeyCode::Char('h')) => app.go_home(),
                _ => {}
            },
            InputMode::Editing => match key.code {
                KeyCode::Enter => app.submit(),
                KeyCode::Esc => app.cancel(),
                KeyCode::Tab | KeyCode::Down => {
                    if let Some(form) = app.active_form() {
                        form.next_field();
                    }
                }
                KeyCode::BackTab | KeyCode::Up => {
                    if let Some(form) = app.active_form() {
                        form.previous_field();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(form) = app.active_form() {
                        form.push(c);
                    }
                }
                KeyCode::Backspace => {
                    if let Some(form) = app.active_form() {
                        form.pop();
                    }
                }
                _ => {}
            }
        }
    }
}
