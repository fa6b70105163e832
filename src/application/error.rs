use thiserror::Error;

use crate::domain::todo::TodoId;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("content is required")]
    ContentRequired,
    #[error("todo {0} not found")]
    NotFound(TodoId),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
