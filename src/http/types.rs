use thiserror::Error;

use crate::application::error::TodoError;

/// Messages shown to the user. Storage details stay in the logs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("cannot get todos")]
    CannotList,
    #[error("content is required")]
    ContentRequired,
    #[error("cannot create todo")]
    CannotCreate,
    #[error("cannot update todo")]
    CannotUpdate,
    #[error("cannot delete todo")]
    CannotDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation { Create, Update, Delete }

impl UserError {
    pub fn from_todo_error(op: Operation, err: &TodoError) -> Self {
        match (op, err) {
            (_, TodoError::ContentRequired) => Self::ContentRequired,
            (Operation::Create, _) => Self::CannotCreate,
            (Operation::Update, _) => Self::CannotUpdate,
            (Operation::Delete, _) => Self::CannotDelete,
        }
    }
}
