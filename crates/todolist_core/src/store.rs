use crate::error::AppError;
use crate::model::Todo;
use crate::storage::SnapshotStore;
use crate::validate::{validate_name, validate_priority};
use time::OffsetDateTime;

pub type Subscriber = Box<dyn FnMut(&[Todo]) + Send>;

/// Authoritative ordered task collection. Every committed mutation performs
/// exactly one full-snapshot write-through, then notifies subscribers with
/// the new state. Derived due flags live only in memory.
pub struct TodoStore {
    todos: Vec<Todo>,
    persistence: Box<dyn SnapshotStore>,
    subscribers: Vec<Subscriber>,
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("todos", &self.todos)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl TodoStore {
    pub fn new(todos: Vec<Todo>, persistence: Box<dyn SnapshotStore>) -> Self {
        Self {
            todos,
            persistence,
            subscribers: Vec::new(),
        }
    }

    /// Hydrating factory: loads the persisted snapshot, falls back to an
    /// empty list when the snapshot is corrupt, and derives the due flags
    /// once so the first render is current.
    pub fn open(persistence: Box<dyn SnapshotStore>) -> Result<Self, AppError> {
        let todos = match persistence.load() {
            Ok(todos) => todos,
            Err(AppError::InvalidData(message)) => {
                tracing::warn!(error = %message, "stored snapshot is corrupt, starting empty");
                Vec::new()
            }
            Err(other) => return Err(other),
        };

        let mut store = Self::new(todos, persistence);
        store.recompute_due_flags(OffsetDateTime::now_utc());
        Ok(store)
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn remaining_count(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.is_done).count()
    }

    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    pub fn create(
        &mut self,
        name: &str,
        priority: u8,
        deadline: Option<OffsetDateTime>,
    ) -> Result<Todo, AppError> {
        validate_name(name)?;
        validate_priority(priority)?;

        let todo = Todo {
            id: self.fresh_id(),
            name: name.to_string(),
            is_done: false,
            priority,
            deadline,
            is_overdue: false,
            is_due_soon: false,
        };

        self.todos.push(todo.clone());
        self.commit()?;

        Ok(todo)
    }

    pub fn edit(
        &mut self,
        id: &str,
        name: &str,
        priority: u8,
        deadline: Option<OffsetDateTime>,
    ) -> Result<Todo, AppError> {
        validate_name(name)?;
        validate_priority(priority)?;

        let todo = self
            .todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or_else(|| AppError::not_found(format!("no task with id {id}")))?;

        todo.name = name.to_string();
        todo.priority = priority;
        todo.deadline = deadline;
        let updated = todo.clone();

        self.commit()?;
        Ok(updated)
    }

    pub fn set_done(&mut self, id: &str, value: bool) -> Result<Todo, AppError> {
        let todo = self
            .todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or_else(|| AppError::not_found(format!("no task with id {id}")))?;

        todo.is_done = value;
        let updated = todo.clone();

        self.commit()?;
        Ok(updated)
    }

    /// Deleting an absent id is a silent no-op; returns whether a task was
    /// actually removed.
    pub fn remove(&mut self, id: &str) -> Result<bool, AppError> {
        let Some(index) = self.todos.iter().position(|todo| todo.id == id) else {
            return Ok(false);
        };

        self.todos.remove(index);
        self.commit()?;
        Ok(true)
    }

    pub fn remove_completed(&mut self) -> Result<usize, AppError> {
        let before = self.todos.len();
        self.todos.retain(|todo| !todo.is_done);
        let removed = before - self.todos.len();

        if removed > 0 {
            self.commit()?;
        }
        Ok(removed)
    }

    /// Re-derives `is_overdue` and `is_due_soon` from each deadline and the
    /// given instant, then notifies subscribers. The flags are not part of
    /// the persisted record, so no write-through happens here.
    pub fn recompute_due_flags(&mut self, now: OffsetDateTime) {
        for todo in &mut self.todos {
            todo.is_overdue = todo.overdue_at(now);
            todo.is_due_soon = todo.due_soon_at(now);
        }
        self.notify();
    }

    fn commit(&mut self) -> Result<(), AppError> {
        self.persistence.save(&self.todos)?;
        self.notify();
        Ok(())
    }

    fn notify(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.todos.clone();
        for subscriber in &mut self.subscribers {
            subscriber(&snapshot);
        }
    }

    fn fresh_id(&self) -> String {
        let base = format!(
            "todo-{}",
            OffsetDateTime::now_utc().unix_timestamp_nanos()
        );
        if self.get(&base).is_none() {
            return base;
        }

        let mut suffix = 1;
        loop {
            let candidate = format!("{base}-{suffix}");
            if self.get(&candidate).is_none() {
                return candidate;
            }
            suffix += 1;
        }
    }
}
