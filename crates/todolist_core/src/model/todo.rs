use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Priorities run from 1 (most important) to 3 (least important).
pub const PRIORITY_HIGHEST: u8 = 1;
pub const PRIORITY_LOWEST: u8 = 3;

/// A deadline within this window of "now" counts as due soon.
pub const DUE_SOON_WINDOW: Duration = Duration::days(7);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub name: String,
    pub is_done: bool,
    pub priority: u8,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deadline: Option<OffsetDateTime>,
    #[serde(skip)]
    pub is_overdue: bool,
    #[serde(skip)]
    pub is_due_soon: bool,
}

impl Todo {
    pub fn overdue_at(&self, now: OffsetDateTime) -> bool {
        matches!(self.deadline, Some(deadline) if deadline < now)
    }

    pub fn due_soon_at(&self, now: OffsetDateTime) -> bool {
        match self.deadline {
            Some(deadline) => deadline >= now && deadline - now <= DUE_SOON_WINDOW,
            None => false,
        }
    }
}
