use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{Result, StoreError};
use crate::models::Task;

/// Key under which the whole task collection is stored.
pub const TASK_KEY: &str = "task";

/// String-keyed, string-valued persistent store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> FileStore {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        let mut f = match OpenOptions::new().read(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { key: key.to_string(), source }),
        };
        let mut s = String::new();
        f.read_to_string(&mut s)
            .map_err(|source| StoreError::Io { key: key.to_string(), source })?;
        Ok(Some(s))
    }

    /// Writes to a sibling temp file and renames it over the target, so
    /// readers only ever see the old or the new value.
    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        let io_err = |source| StoreError::Io { key: key.to_string(), source };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)
            .map_err(io_err)?;
        f.write_all(value.as_bytes()).map_err(io_err)?;
        f.sync_all().map_err(io_err)?;
        drop(f);
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        Ok(())
    }
}

/// In-process store, mainly for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Makes every subsequent `set` fail until switched back.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable(format!("write to `{}` rejected", key)));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the task collection as one JSON blob under [`TASK_KEY`].
#[derive(Debug)]
pub struct TaskStore<S> {
    backend: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(backend: S) -> TaskStore<S> {
        TaskStore { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Loads all tasks. A missing key yields an empty collection.
    pub fn load(&self) -> Result<Vec<Task>> {
        self.load_counting_new_ids().map(|(tasks, _)| tasks)
    }

    /// Loads all tasks and reports how many records were stored without an
    /// `id` and were given a fresh one.
    pub fn load_counting_new_ids(&self) -> Result<(Vec<Task>, usize)> {
        let Some(blob) = self.backend.get(TASK_KEY)? else {
            debug!("no stored tasks under `{}`", TASK_KEY);
            return Ok((Vec::new(), 0));
        };
        let parsed = serde_json::from_str::<Vec<serde_json::Value>>(&blob).and_then(|records| {
            let missing = records.iter().filter(|r| r.get("id").is_none()).count();
            let tasks: Vec<Task> = serde_json::from_value(serde_json::Value::Array(records))?;
            Ok((tasks, missing))
        });
        let (tasks, missing) = parsed.map_err(|e| {
            warn!("stored tasks under `{}` are unreadable: {}", TASK_KEY, e);
            e
        })?;
        debug!("loaded {} tasks ({} without id)", tasks.len(), missing);
        Ok((tasks, missing))
    }

    /// Saves the given collection, replacing whatever was stored before.
    pub fn save(&mut self, tasks: &[Task]) -> Result<()> {
        let s = serde_json::to_string_pretty(tasks).map_err(|source| StoreError::Encode {
            key: TASK_KEY.to_string(),
            source,
        })?;
        self.backend.set(TASK_KEY, &s)?;
        debug!("saved {} tasks", tasks.len());
        Ok(())
    }
}
