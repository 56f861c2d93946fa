use std::cell::Cell;
use std::rc::Rc;

use log::error;
use ratatui::widgets::TableState;

use crate::error::TodoError;
use crate::models::{parse_due, TaskId};
use crate::state::TaskList;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Home,
    Dashboard,
    Create,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Three text fields with one of them focused.
///
/// Used for both the creation form (title, description, due date) and the
/// edit modal (title, content, completion percentage).
#[derive(Debug, Default, Clone)]
pub struct Form {
    pub fields: [String; 3],
    pub focus: usize,
}

impl Form {
    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn previous_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn push(&mut self, c: char) {
        self.fields[self.focus].push(c);
    }

    pub fn pop(&mut self) {
        self.fields[self.focus].pop();
    }

    pub fn clear(&mut self) {
        *self = Form::default();
    }
}

/// The task being edited in the modal.
pub struct EditState {
    pub target: TaskId,
    pub form: Form,
}

pub struct App<S> {
    pub list: TaskList<S>,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub home_state: TableState,
    pub dashboard_state: TableState,
    pub create_form: Form,
    pub edit: Option<EditState>,
    /// Last notification shown in the status line.
    pub message: Option<String>,
    /// `(all, upcoming)` counts, kept current by a list subscription.
    pub counts: Rc<Cell<(usize, usize)>>,
}

impl<S: KeyValueStore> App<S> {
    /// Creates the app state and loads the initial data.
    pub fn new(mut list: TaskList<S>) -> App<S> {
        let counts = Rc::new(Cell::new((0, 0)));
        let observed = Rc::clone(&counts);
        list.subscribe(move |all, due| observed.set((all.len(), due.len())));

        let mut app = App {
            list,
            screen: Screen::Home,
            input_mode: InputMode::Normal,
            home_state: TableState::default(),
            dashboard_state: TableState::default(),
            create_form: Form::default(),
            edit: None,
            message: None,
            counts,
        };
        app.refresh();
        app
    }

    /// Reloads tasks from storage and fixes up the selections.
    pub fn refresh(&mut self) {
        let result = self.list.refresh().map(|_| ());
        if self.report(result) {
            self.message = None;
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        clamp(&mut self.home_state, self.list.upcoming().len());
        clamp(&mut self.dashboard_state, self.list.tasks().len());
    }

    /// Logs and displays an error. Returns whether `result` was `Ok`.
    fn report(&mut self, result: Result<(), TodoError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                match &e {
                    TodoError::Validation(_) => {}
                    _ => error!("task operation failed: {}", e),
                }
                self.message = Some(e.to_string());
                false
            }
        }
    }

    pub fn open_dashboard(&mut self) {
        self.screen = Screen::Dashboard;
        self.message = None;
    }

    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
        self.message = None;
    }

    pub fn start_create(&mut self) {
        self.screen = Screen::Create;
        self.input_mode = InputMode::Editing;
        self.create_form.clear();
        self.message = None;
    }

    /// Leaves the current form without saving.
    pub fn cancel(&mut self) {
        self.input_mode = InputMode::Normal;
        self.edit = None;
        if self.screen == Screen::Create {
            self.screen = Screen::Dashboard;
        }
    }

    fn selection(&self) -> (&TableState, usize) {
        match self.screen {
            Screen::Home => (&self.home_state, self.list.upcoming().len()),
            _ => (&self.dashboard_state, self.list.tasks().len()),
        }
    }

    /// Selects the next row of the current screen, wrapping around.
    pub fn next(&mut self) {
        let (state, len) = self.selection();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.select(Some(i));
    }

    /// Selects the previous row of the current screen, wrapping around.
    pub fn previous(&mut self) {
        let (state, len) = self.selection();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.select(Some(i));
    }

    fn select(&mut self, i: Option<usize>) {
        match self.screen {
            Screen::Home => self.home_state.select(i),
            _ => self.dashboard_state.select(i),
        }
    }

    fn selected_task(&self) -> Option<TaskId> {
        if self.screen != Screen::Dashboard {
            return None;
        }
        let i = self.dashboard_state.selected()?;
        self.list.tasks().get(i).map(|t| t.id)
    }

    /// Deletes the task under the cursor on the dashboard.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_task() else { return };
        let result = self.list.delete(id).map(|_| ());
        self.report(result);
        self.clamp_selection();
    }

    /// Opens the edit modal pre-filled with the selected task.
    pub fn start_edit(&mut self) {
        let Some(id) = self.selected_task() else { return };
        let Some(task) = self.list.get(id) else { return };
        let form = Form {
            fields: [
                task.title.clone(),
                task.content.clone(),
                task.completion_percentage.map(|p| p.to_string()).unwrap_or_default(),
            ],
            focus: 0,
        };
        self.edit = Some(EditState { target: id, form });
        self.input_mode = InputMode::Editing;
        self.message = None;
    }

    /// The form receiving keystrokes, if any.
    pub fn active_form(&mut self) -> Option<&mut Form> {
        if self.input_mode != InputMode::Editing {
            return None;
        }
        match &mut self.edit {
            Some(edit) => Some(&mut edit.form),
            None if self.screen == Screen::Create => Some(&mut self.create_form),
            None => None,
        }
    }

    /// Submits whichever form is open.
    pub fn submit(&mut self) {
        if self.edit.is_some() {
            self.submit_edit();
        } else if self.screen == Screen::Create {
            self.submit_create();
        }
    }

    fn submit_create(&mut self) {
        let [title, content, due] = self.create_form.fields.clone();
        let due = match due.trim() {
            "" => Ok(None),
            s => parse_due(s).map(Some),
        };
        let result = due.and_then(|due| self.list.create(title, content, due).map(|_| ()));
        if self.report(result) {
            self.create_form.clear();
            self.message = Some("TASK CREATED".to_string());
            self.clamp_selection();
        }
    }

    fn submit_edit(&mut self) {
        let Some(edit) = &self.edit else { return };
        let target = edit.target;
        let [title, content, pct] = edit.form.fields.clone();
        let result = self.list.edit(target, title, content, &pct).map(|_| ());
        if self.report(result) {
            self.edit = None;
            self.input_mode = InputMode::Normal;
        }
    }
}

fn clamp(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
    } else {
        match state.selected() {
            Some(i) if i >= len => state.select(Some(len - 1)),
            None => state.select(Some(0)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn app() -> App<MemoryStore> {
        App::new(TaskList::new(MemoryStore::new()))
    }

    fn type_into(app: &mut App<MemoryStore>, text: &str) {
        for c in text.chars() {
            app.active_form().unwrap().push(c);
        }
    }

    fn create(app: &mut App<MemoryStore>, title: &str, due: &str) {
        app.start_create();
        type_into(app, title);
        app.active_form().unwrap().next_field();
        app.active_form().unwrap().next_field();
        type_into(app, due);
        app.submit();
    }

    #[test]
    fn create_without_due_date_keeps_form_and_reports() {
        let mut app = app();
        app.start_create();
        type_into(&mut app, "Buy milk");
        app.submit();

        assert!(app.list.tasks().is_empty());
        assert_eq!(app.create_form.fields[0], "Buy milk");
        assert_eq!(app.message.as_deref(), Some("Please select a due date to add a task."));
    }

    #[test]
    fn create_clears_form_and_updates_counts() {
        let mut app = app();
        create(&mut app, "Buy milk", "2999-01-10");

        assert_eq!(app.list.tasks().len(), 1);
        assert_eq!(app.create_form.fields[0], "");
        assert_eq!(app.message.as_deref(), Some("TASK CREATED"));
        assert_eq!(app.counts.get(), (1, 1));
        assert_eq!(app.screen, Screen::Create);
    }

    #[test]
    fn edit_modal_is_prefilled_and_saves() {
        let mut app = app();
        create(&mut app, "Buy milk", "2999-01-10");
        app.cancel();
        assert_eq!(app.screen, Screen::Dashboard);

        app.start_edit();
        let form = &app.edit.as_ref().unwrap().form;
        assert_eq!(form.fields[0], "Buy milk");
        assert_eq!(form.fields[2], "");

        app.active_form().unwrap().previous_field();
        type_into(&mut app, "150");
        app.submit();

        assert!(app.edit.is_none());
        assert_eq!(app.list.tasks()[0].completion_percentage, Some(150));
    }

    #[test]
    fn bad_percentage_keeps_modal_open() {
        let mut app = app();
        create(&mut app, "Buy milk", "2999-01-10");
        app.cancel();
        app.start_edit();
        app.active_form().unwrap().previous_field();
        type_into(&mut app, "lots");
        app.submit();

        assert!(app.edit.is_some());
        assert!(app.message.is_some());
        assert_eq!(app.list.tasks()[0].completion_percentage, None);
    }

    #[test]
    fn delete_selected_moves_cursor_back() {
        let mut app = app();
        create(&mut app, "a", "2999-01-10");
        create(&mut app, "b", "2999-01-11");
        app.cancel();
        app.next();
        assert_eq!(app.dashboard_state.selected(), Some(1));

        app.delete_selected();
        assert_eq!(app.list.tasks().len(), 1);
        assert_eq!(app.list.tasks()[0].title, "a");
        assert_eq!(app.dashboard_state.selected(), Some(0));
    }
}
