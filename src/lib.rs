//! # todue
//!
//! A small to-do list kept as a single JSON document in a key-value store.
//!
//! Tasks have a title, a description, a creation timestamp, a due date and a
//! completion percentage. [`state::TaskList`] holds the loaded collection and
//! the derived list of upcoming tasks; [`mutations`] adds create, edit and
//! delete on top of it. Every change rewrites the whole collection under the
//! `"task"` key before it becomes visible in memory.
//!
//! ```no_run
//! use todue::{parse_due, FileStore, TaskList};
//!
//! let mut list = TaskList::open(FileStore::new("/tmp/todue"))?;
//! let id = list.create("Buy milk".into(), String::new(), Some(parse_due("2024-01-10")?))?;
//! list.edit(id, "Buy milk".into(), "2 litres".into(), "50")?;
//! for task in list.upcoming() {
//!     println!("{} due {:?}", task.title, task.due_date);
//! }
//! # Ok::<(), todue::TodoError>(())
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod mutations;
pub mod state;
pub mod status;
pub mod storage;
pub mod tui;

pub use error::{StoreError, TodoError};
pub use models::{parse_due, Task, TaskId};
pub use state::TaskList;
pub use status::CompletionStatus;
pub use storage::{FileStore, KeyValueStore, MemoryStore, TaskStore};
