#[cfg(test)]
mod tests {
    use super::super::error::TodoError;
    use super::super::todo_service::{TodoService, TodoServiceImpl};
    use crate::domain::{repository::TodoRepository, todo::{NewTodo, Todo, TodoId}};
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct InMemoryRepo {
        items: Arc<Mutex<BTreeMap<i64, Todo>>>,
        next_id: Arc<Mutex<i64>>,
    }

    #[async_trait]
    impl TodoRepository for InMemoryRepo {
        async fn init(&self) -> Result<()> { Ok(()) }
        async fn list_active(&self) -> Result<Vec<Todo>> {
            let mut todos: Vec<_> = self.items.lock().unwrap().values().filter(|t| !t.is_deleted()).cloned().collect();
            todos.sort_by_key(|t| (t.created_at, t.id.0));
            Ok(todos)
        }
        async fn insert(&self, input: NewTodo) -> Result<Todo> {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let todo = Todo { id: TodoId(*next), content: input.content, done: false, until: input.until, created_at: input.created_at, updated_at: None, deleted_at: None };
            self.items.lock().unwrap().insert(*next, todo.clone());
            Ok(todo)
        }
        async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
            Ok(self.items.lock().unwrap().get(&id.0).filter(|t| !t.is_deleted()).cloned())
        }
        async fn update(&self, todo: &Todo) -> Result<bool> {
            let mut map = self.items.lock().unwrap();
            match map.get_mut(&todo.id.0) {
                Some(stored) if !stored.is_deleted() => {
                    stored.done = todo.done;
                    stored.updated_at = todo.updated_at;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
        async fn soft_delete(&self, id: TodoId, at: DateTime<Utc>) -> Result<bool> {
            let mut map = self.items.lock().unwrap();
            match map.get_mut(&id.0) {
                Some(stored) if !stored.is_deleted() => {
                    stored.deleted_at = Some(at);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    fn service() -> TodoServiceImpl<InMemoryRepo> { TodoServiceImpl::new(InMemoryRepo::default()) }

    #[tokio::test]
    async fn unit_create_and_get() {
        let service = service();
        let before = Utc::now();
        let created = service.create("X".into(), None).await.unwrap();
        assert_eq!(created.content, "X");
        assert!(!created.done);
        assert!(created.created_at >= before);
        let got = service.get(created.id).await.unwrap();
        assert_eq!(got.id, created.id);
    }

    #[tokio::test]
    async fn unit_create_rejects_empty_content() {
        let service = service();
        let err = service.create(String::new(), None).await.unwrap_err();
        assert!(matches!(err, TodoError::ContentRequired));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unit_set_done_refreshes_updated_at_only() {
        let service = service();
        let created = service.create("X".into(), None).await.unwrap();
        let updated = service.set_done(created.id, true).await.unwrap();
        assert!(updated.done);
        assert!(updated.updated_at.unwrap() >= created.created_at);
        assert_eq!(updated.content, created.content);
        assert_eq!(updated.created_at, created.created_at);

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].done);
    }

    #[tokio::test]
    async fn unit_set_done_on_missing_id_is_not_found() {
        let err = service().set_done(TodoId(42), true).await.unwrap_err();
        assert!(matches!(err, TodoError::NotFound(TodoId(42))));
    }

    #[tokio::test]
    async fn unit_delete_hides_record() {
        let service = service();
        let created = service.create("X".into(), None).await.unwrap();
        service.delete(created.id).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
        assert!(matches!(service.get(created.id).await, Err(TodoError::NotFound(_))));
        assert!(matches!(service.delete(created.id).await, Err(TodoError::NotFound(_))));
    }
}
