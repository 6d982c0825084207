pub mod error;
pub mod model;
pub mod refresh;
pub mod sort;
pub mod storage;
pub mod store;
pub mod validate;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::Todo;

    #[test]
    fn todo_has_required_fields() {
        let todo = Todo {
            id: "todo-1".to_string(),
            name: "demo".to_string(),
            is_done: false,
            priority: 3,
            deadline: None,
            is_overdue: false,
            is_due_soon: false,
        };

        assert_eq!(todo.id, "todo-1");
        assert_eq!(todo.name, "demo");
        assert!(!todo.is_done);
        assert_eq!(todo.priority, 3);
        assert_eq!(todo.deadline, None);
        assert!(!todo.is_overdue);
        assert!(!todo.is_due_soon);
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::invalid_name("name must be 2 to 32 characters");
        assert_eq!(err.code(), "invalid_name_length");
    }
}
