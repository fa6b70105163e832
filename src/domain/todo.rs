use chrono::{DateTime, Utc};
use serde::Serialize;

/// Database-assigned identifier. `0` never names a stored row.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl TodoId {
    pub fn is_unassigned(self) -> bool { self.0 == 0 }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub content: String,
    pub done: bool,
    pub until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub content: String,
    pub until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Flips the completion flag and stamps `updated_at`.
    pub fn mark(&mut self, done: bool, now: DateTime<Utc>) {
        self.done = done;
        self.updated_at = Some(now.max(self.created_at));
    }

    pub fn is_deleted(&self) -> bool { self.deleted_at.is_some() }
}
