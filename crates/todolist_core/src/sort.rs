use crate::model::Todo;
use std::cmp::Ordering;

/// Display projection: earliest deadline first, missing deadlines last.
/// Stable, so ties keep their stored relative order.
pub fn by_deadline_ascending(todos: &[Todo]) -> Vec<Todo> {
    let mut sorted = todos.to_vec();
    sorted.sort_by(|a, b| match (a.deadline, b.deadline) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted
}
