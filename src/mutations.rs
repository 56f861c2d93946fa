use chrono::NaiveDateTime;
use log::info;

use crate::error::{Result, TodoError};
use crate::models::{Task, TaskId};
use crate::state::TaskList;
use crate::storage::KeyValueStore;

/// Parses a completion percentage typed by the user.
///
/// Any integer is accepted; the range is not checked.
pub fn parse_percentage(input: &str) -> Result<i64> {
    let s = input.trim().trim_end_matches('%').trim_end();
    s.parse::<i64>().map_err(|_| {
        TodoError::Validation(format!("completion percentage '{}' is not a whole number", input.trim()))
    })
}

impl<S: KeyValueStore> TaskList<S> {
    /// Appends a new task. A due date is required.
    pub fn create(
        &mut self,
        title: String,
        content: String,
        due_date: Option<NaiveDateTime>,
    ) -> Result<TaskId> {
        let due = due_date.ok_or_else(|| {
            TodoError::Validation("Please select a due date to add a task.".to_string())
        })?;
        let task = Task::new(title, content, due);
        let id = task.id;

        let mut next = self.tasks.clone();
        next.push(task);
        self.commit(next)?;
        info!("created task {} due {}", id, due);
        Ok(id)
    }

    /// Replaces title, content and completion of the task with `id`.
    ///
    /// `percentage` is parsed before anything else. Returns `Ok(false)`
    /// without touching the store when no task has that id.
    pub fn edit(&mut self, id: TaskId, title: String, content: String, percentage: &str) -> Result<bool> {
        let pct = parse_percentage(percentage)?;
        self.update(id, title, content, Some(pct))
    }

    /// [`TaskList::edit`] with an already parsed (or unset) percentage.
    pub fn update(
        &mut self,
        id: TaskId,
        title: String,
        content: String,
        percentage: Option<i64>,
    ) -> Result<bool> {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            info!("edit of unknown task {} ignored", id);
            return Ok(false);
        };

        let mut next = self.tasks.clone();
        let t = &mut next[pos];
        t.title = title;
        t.content = content;
        t.completion_percentage = percentage;
        self.commit(next)?;
        info!("edited task {}", id);
        Ok(true)
    }

    /// Removes the task with `id`. Returns how many tasks were removed.
    pub fn delete(&mut self, id: TaskId) -> Result<usize> {
        let next: Vec<Task> = self.tasks.iter().filter(|t| t.id != id).cloned().collect();
        let removed = self.tasks.len() - next.len();
        if removed == 0 {
            info!("delete of unknown task {} ignored", id);
            return Ok(0);
        }
        self.commit(next)?;
        info!("deleted task {}", id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::parse_percentage;

    #[test]
    fn percentage_accepts_integers_and_trailing_percent() {
        assert_eq!(parse_percentage("40").unwrap(), 40);
        assert_eq!(parse_percentage(" 150 ").unwrap(), 150);
        assert_eq!(parse_percentage("75%").unwrap(), 75);
        assert_eq!(parse_percentage("-5").unwrap(), -5);
    }

    #[test]
    fn percentage_rejects_non_numbers() {
        assert!(parse_percentage("").is_err());
        assert!(parse_percentage("half").is_err());
        assert!(parse_percentage("12.5").is_err());
    }
}
