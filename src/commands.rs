use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::error::{Result, TodoError};
use crate::models::{format_due, format_percentage, parse_due, Task, TaskId};
use crate::mutations::parse_percentage;
use crate::state::TaskList;
use crate::status::CompletionStatus;
use crate::storage::KeyValueStore;

/// Adds a new task. `due` is required; an absent or malformed date is rejected.
pub fn cmd_add<S: KeyValueStore>(
    list: &mut TaskList<S>,
    title: String,
    content: Option<String>,
    due: Option<String>,
    silent: bool,
) -> Result<TaskId> {
    let due_date = due.as_deref().map(parse_due).transpose()?;
    let id = list.create(title, content.unwrap_or_default(), due_date)?;
    if !silent { println!("Task added (id = {})", id.short()); }
    Ok(id)
}

/// Prints every task in insertion order.
pub fn cmd_list<S: KeyValueStore>(list: &TaskList<S>) {
    if list.tasks().is_empty() {
        println!("No tasks found.");
        return;
    }
    println!("{}", tasks_table(list.tasks()));
}

/// Prints tasks due today or later, earliest first.
pub fn cmd_due<S: KeyValueStore>(list: &TaskList<S>) {
    if list.tasks().is_empty() {
        println!("No tasks are added or due");
        return;
    }
    if list.upcoming().is_empty() {
        println!("No tasks due from {} on.", list.today());
        return;
    }
    println!("{}", tasks_table(list.upcoming()));
}

/// Edits title, content and completion of a task.
///
/// Fields left as `None` keep their current value. An id that matches no
/// task is an error here, unlike [`TaskList::edit`].
pub fn cmd_edit<S: KeyValueStore>(
    list: &mut TaskList<S>,
    id: &str,
    title: Option<String>,
    content: Option<String>,
    percent: Option<String>,
    silent: bool,
) -> Result<()> {
    let percentage = percent.as_deref().map(parse_percentage).transpose()?;
    let Some(task) = list.resolve(id)?.and_then(|id| list.get(id)).cloned() else {
        return Err(not_found(id));
    };

    let changed = list.update(
        task.id,
        title.unwrap_or(task.title),
        content.unwrap_or(task.content),
        percentage.or(task.completion_percentage),
    )?;
    if changed && !silent {
        println!("Task {} updated.", task.id.short());
    }
    Ok(())
}

/// Removes a task by id or unique id prefix. Unknown ids are an error.
pub fn cmd_remove<S: KeyValueStore>(list: &mut TaskList<S>, id: &str, silent: bool) -> Result<()> {
    let Some(task_id) = list.resolve(id)? else {
        return Err(not_found(id));
    };
    if list.delete(task_id)? == 0 {
        return Err(not_found(id));
    }
    if !silent { println!("Task {} removed.", task_id.short()); }
    Ok(())
}

fn not_found(id: &str) -> TodoError {
    TodoError::Validation(format!("Task {} not found.", id))
}

/// Builds the table used by `list` and `due`.
pub fn tasks_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
            Cell::new("Created").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Done").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let status = CompletionStatus::from_percentage(t.completion_percentage);
        let color = status_color(status);
        table.add_row(vec![
            Cell::new(t.id.short()),
            Cell::new(&t.title),
            Cell::new(&t.content),
            Cell::new(&t.timestamp),
            Cell::new(format_due(t.due_date)),
            Cell::new(format_percentage(t.completion_percentage)).fg(color),
            Cell::new(status).fg(color),
        ]);
    }
    table
}

fn status_color(status: CompletionStatus) -> Color {
    match status {
        CompletionStatus::Completed => Color::Green,
        CompletionStatus::InProgress => Color::Yellow,
        CompletionStatus::NotStarted => Color::Red,
    }
}

