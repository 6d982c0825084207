mod todo;

pub use todo::{DUE_SOON_WINDOW, PRIORITY_HIGHEST, PRIORITY_LOWEST, Todo};
