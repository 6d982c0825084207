use crate::error::AppError;
use crate::model::Todo;
use std::sync::{Arc, Mutex};

pub mod json_store;

pub use json_store::JsonFileStore;

/// Persistence collaborator for the full-snapshot write-through model.
///
/// `load` yields an empty list when no prior data exists; malformed data is
/// an `invalid_data` error so callers can tell the two apart.
pub trait SnapshotStore: Send {
    fn load(&self) -> Result<Vec<Todo>, AppError>;
    fn save(&self, todos: &[Todo]) -> Result<(), AppError>;
}

impl<S> SnapshotStore for Arc<S>
where
    S: SnapshotStore + Sync,
{
    fn load(&self) -> Result<Vec<Todo>, AppError> {
        (**self).load()
    }

    fn save(&self, todos: &[Todo]) -> Result<(), AppError> {
        (**self).save(todos)
    }
}

/// In-process snapshot holder for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: Mutex<Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: Mutex::new(todos),
        }
    }

    pub fn snapshot(&self) -> Vec<Todo> {
        self.todos.lock().map(|todos| todos.clone()).unwrap_or_default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Vec<Todo>, AppError> {
        Ok(self.snapshot())
    }

    fn save(&self, todos: &[Todo]) -> Result<(), AppError> {
        let mut guard = self
            .todos
            .lock()
            .map_err(|_| AppError::io("memory store lock poisoned"))?;
        *guard = todos.to_vec();
        Ok(())
    }
}
