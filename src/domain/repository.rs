use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::todo::{NewTodo, Todo, TodoId};

/// Storage contract for to-do records.
///
/// Soft-deleted rows are invisible to every method here: `list_active` and
/// `find_by_id` never return them, and `update`/`soft_delete` do not match them.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Creates the table if it is missing.
    async fn init(&self) -> anyhow::Result<()>;
    /// Active records ordered by creation time, oldest first.
    async fn list_active(&self) -> anyhow::Result<Vec<Todo>>;
    async fn insert(&self, input: NewTodo) -> anyhow::Result<Todo>;
    async fn find_by_id(&self, id: TodoId) -> anyhow::Result<Option<Todo>>;
    /// Persists `done` and `updated_at`. Returns `false` when no active row matched.
    async fn update(&self, todo: &Todo) -> anyhow::Result<bool>;
    /// Returns `false` when no active row matched.
    async fn soft_delete(&self, id: TodoId, at: DateTime<Utc>) -> anyhow::Result<bool>;
}
