use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

use crate::error::{Result, TodoError};
use crate::models::{Task, TaskId};
use crate::storage::{KeyValueStore, TaskStore};

/// Observer invoked with `(all tasks, upcoming tasks)` after every change.
pub type Listener = Box<dyn FnMut(&[Task], &[Task])>;

/// Tasks due on `today` or later, earliest first.
///
/// Tasks without a due date never appear. The sort is stable, so tasks due at
/// the same moment keep their creation order.
pub fn upcoming(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    let mut due: Vec<Task> = tasks
        .iter()
        .filter(|t| t.due_day().is_some_and(|d| d >= today))
        .cloned()
        .collect();
    due.sort_by_key(|t| t.due_date);
    due
}

/// In-memory task collection backed by a [`TaskStore`].
///
/// All changes go through `&mut self`, so within one process mutations are
/// applied one at a time against the current snapshot.
pub struct TaskList<S> {
    store: TaskStore<S>,
    pub(crate) tasks: Vec<Task>,
    upcoming: Vec<Task>,
    today: NaiveDate,
    listeners: Vec<Listener>,
}

impl<S: KeyValueStore> TaskList<S> {
    /// Creates an empty list. Call [`TaskList::refresh`] to load stored tasks.
    pub fn new(backend: S) -> TaskList<S> {
        TaskList {
            store: TaskStore::new(backend),
            tasks: Vec::new(),
            upcoming: Vec::new(),
            today: Local::now().date_naive(),
            listeners: Vec::new(),
        }
    }

    /// Creates a list and loads it immediately.
    pub fn open(backend: S) -> Result<TaskList<S>> {
        let mut list = TaskList::new(backend);
        list.refresh()?;
        Ok(list)
    }

    /// Reloads from the store and recomputes the upcoming view for the
    /// current local date.
    pub fn refresh(&mut self) -> Result<(&[Task], &[Task])> {
        self.refresh_on(Local::now().date_naive())
    }

    /// Like [`TaskList::refresh`], with an explicit "today".
    ///
    /// Records stored without an id are given one, and the collection is
    /// written back once so those ids survive the next load. On failure the
    /// previous state is kept.
    pub fn refresh_on(&mut self, today: NaiveDate) -> Result<(&[Task], &[Task])> {
        let (tasks, missing) = self.store.load_counting_new_ids()?;
        if missing > 0 {
            info!("assigning ids to {} stored tasks", missing);
            self.store.save(&tasks)?;
        }
        self.today = today;
        self.tasks = tasks;
        self.publish();
        Ok((self.tasks.as_slice(), self.upcoming.as_slice()))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn upcoming(&self) -> &[Task] {
        &self.upcoming
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TaskStore<S> {
        &mut self.store
    }

    /// Resolves a full id or a unique id prefix to a task id.
    pub fn resolve(&self, query: &str) -> Result<Option<TaskId>> {
        if let Ok(id) = query.trim().parse::<TaskId>() {
            return Ok(self.get(id).map(|t| t.id));
        }
        let matches: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|t| t.id.matches_prefix(query.trim()))
            .map(|t| t.id)
            .collect();
        match matches.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            _ => Err(TodoError::Validation(format!(
                "id prefix '{}' is ambiguous ({} tasks match)",
                query.trim(),
                matches.len()
            ))),
        }
    }

    /// Registers an observer, called after every successful refresh or mutation.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&[Task], &[Task]) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Persists `next` and only then makes it the in-memory state.
    pub(crate) fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        if let Err(e) = self.store.save(&next) {
            warn!("save failed, keeping previous {} tasks: {}", self.tasks.len(), e);
            return Err(e);
        }
        self.tasks = next;
        self.publish();
        Ok(())
    }

    fn publish(&mut self) {
        self.upcoming = upcoming(&self.tasks, self.today);
        debug!(
            "publishing {} tasks ({} upcoming from {})",
            self.tasks.len(),
            self.upcoming.len(),
            self.today
        );
        for listener in self.listeners.iter_mut() {
            listener(&self.tasks, &self.upcoming);
        }
    }
}
