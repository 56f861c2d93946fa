use todue::commands::*;
use todue::{FileStore, TaskList, TodoError};
use std::fs;
use tempfile::TempDir;

fn with_test_db<F>(f: F)
where
    F: FnOnce(&TempDir, TaskList<FileStore>),
{
    let dir = tempfile::tempdir().unwrap();
    let list = TaskList::open(FileStore::new(dir.path())).unwrap();
    f(&dir, list);
}

fn reopen(dir: &TempDir) -> TaskList<FileStore> {
    TaskList::open(FileStore::new(dir.path())).unwrap()
}

#[test]
fn test_add_and_list() {
    with_test_db(|dir, mut list| {
        cmd_add(&mut list, "Buy milk".into(), Some("2 litres".into()), Some("2024-01-10".into()), true).unwrap();

        let tasks = reopen(dir).tasks().to_vec();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy milk");
        assert_eq!(tasks[0].content, "2 litres");
        assert_eq!(tasks[0].due_date.unwrap().to_string(), "2024-01-10 00:00:00");
    });
}

#[test]
fn test_add_requires_due_date() {
    with_test_db(|dir, mut list| {
        let err = cmd_add(&mut list, "No date".into(), None, None, true).unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));

        let err = cmd_add(&mut list, "Bad date".into(), None, Some("soon".into()), true).unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));

        assert!(!dir.path().join("task.json").exists());
    });
}

#[test]
fn test_edit_by_prefix_keeps_omitted_fields() {
    with_test_db(|dir, mut list| {
        let id = cmd_add(&mut list, "Report".into(), Some("draft".into()), Some("2024-01-10".into()), true).unwrap();

        cmd_edit(&mut list, &id.short(), None, None, Some("60".into()), true).unwrap();
        cmd_edit(&mut list, &id.short(), Some("Final report".into()), None, None, true).unwrap();

        let tasks = reopen(dir).tasks().to_vec();
        assert_eq!(tasks[0].title, "Final report");
        assert_eq!(tasks[0].content, "draft");
        assert_eq!(tasks[0].completion_percentage, Some(60));
    });
}

#[test]
fn test_unknown_task_is_reported_as_error() {
    with_test_db(|_dir, mut list| {
        cmd_add(&mut list, "Report".into(), None, Some("2024-01-10".into()), true).unwrap();

        let err = cmd_edit(&mut list, "zzzz", Some("x".into()), None, None, true).unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
        let err = cmd_remove(&mut list, "zzzz", true).unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));

        assert_eq!(list.tasks().len(), 1);
        assert_eq!(list.tasks()[0].title, "Report");
    });
}

#[test]
fn test_remove() {
    with_test_db(|dir, mut list| {
        let keep = cmd_add(&mut list, "keep".into(), None, Some("2024-01-10".into()), true).unwrap();
        let gone = cmd_add(&mut list, "gone".into(), None, Some("2024-01-11".into()), true).unwrap();

        cmd_remove(&mut list, &gone.to_string(), true).unwrap();

        let tasks = reopen(dir).tasks().to_vec();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, keep);
    });
}

const EARLIER_APP_BLOB: &str = r#"[
    {"task":"Old","content":"from before","timestamp":"1/5/2024, 9:00:00 AM","dueDate":"Wed Jan 10 2024 09:00:00 GMT+0530 (India Standard Time)","completionPercentage":20},
    {"task":"Older","content":"","timestamp":"1/6/2024, 8:00:00 AM","dueDate":"Fri Feb 02 2024 18:30:00 GMT+0530 (India Standard Time)"}
]"#;

#[test]
fn test_reads_blob_written_by_earlier_app() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("task.json"), EARLIER_APP_BLOB).unwrap();

    let list = reopen(&dir);
    assert_eq!(list.tasks().len(), 2);
    assert_eq!(list.tasks()[0].title, "Old");
    assert_eq!(list.tasks()[0].completion_percentage, Some(20));
    assert_eq!(list.tasks()[0].due_date.unwrap().to_string(), "2024-01-10 09:00:00");
    assert_eq!(list.tasks()[1].due_date.unwrap().to_string(), "2024-02-02 18:30:00");
}

#[test]
fn test_ids_shown_for_old_tasks_work_in_the_next_command() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("task.json"), EARLIER_APP_BLOB).unwrap();

    let shown = reopen(&dir).tasks()[0].id.short();

    let mut list = reopen(&dir);
    cmd_remove(&mut list, &shown, true).unwrap();

    let left = reopen(&dir).tasks().to_vec();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].title, "Older");
}

#[test]
fn test_table_shows_status() {
    with_test_db(|_dir, mut list| {
        let id = cmd_add(&mut list, "Ship it".into(), None, Some("2024-01-10".into()), true).unwrap();
        cmd_edit(&mut list, &id.to_string(), None, None, Some("100".into()), true).unwrap();

        let rendered = tasks_table(list.tasks()).to_string();
        assert!(rendered.contains("Ship it"));
        assert!(rendered.contains("Completed"));
        assert!(rendered.contains("100%"));
    });
}
