use crate::application::error::TodoError;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{NewTodo, Todo, TodoId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, TodoError>;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Todo>>;
    async fn get(&self, id: TodoId) -> Result<Todo>;
    async fn create(&self, content: String, until: Option<DateTime<Utc>>) -> Result<Todo>;
    async fn set_done(&self, id: TodoId, done: bool) -> Result<Todo>;
    async fn delete(&self, id: TodoId) -> Result<()>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn list(&self) -> Result<Vec<Todo>> { Ok(self.repo.list_active().await?) }

    async fn get(&self, id: TodoId) -> Result<Todo> {
        self.repo.find_by_id(id).await?.ok_or(TodoError::NotFound(id))
    }

    async fn create(&self, content: String, until: Option<DateTime<Utc>>) -> Result<Todo> {
        if content.is_empty() {
            return Err(TodoError::ContentRequired);
        }
        let todo = self.repo.insert(NewTodo { content, until, created_at: Utc::now() }).await?;
        tracing::debug!(id = %todo.id, "todo created");
        Ok(todo)
    }

    async fn set_done(&self, id: TodoId, done: bool) -> Result<Todo> {
        let mut todo = self.get(id).await?;
        todo.mark(done, Utc::now());
        // A concurrent delete can land between the read and the write.
        if !self.repo.update(&todo).await? {
            return Err(TodoError::NotFound(id));
        }
        Ok(todo)
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        if !self.repo.soft_delete(id, Utc::now()).await? {
            return Err(TodoError::NotFound(id));
        }
        tracing::debug!(%id, "todo soft-deleted");
        Ok(())
    }
}
