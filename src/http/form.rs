use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::domain::todo::TodoId;

/// Value of the `delete` field that requests deletion when no `action` is sent.
pub const DELETE_MARKER: &str = "delete";
pub const UNTIL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// The form exactly as the browser sent it. Every field is optional text so
/// that malformed values surface as [`BindError`]s instead of a rejection.
#[derive(Debug, Default, Clone)]
pub struct TodoForm {
    pub id: Option<String>,
    pub content: Option<String>,
    pub done: Option<String>,
    pub until: Option<String>,
    pub delete: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message} ({value:?})")]
pub struct BindError {
    pub field: &'static str,
    pub value: String,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoAction {
    Create,
    Update,
    Delete,
}

impl FromStr for TodoAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoCommand {
    Create { content: String, until: Option<DateTime<Utc>> },
    SetDone { id: TodoId, done: bool },
    Delete { id: TodoId },
    Noop,
}

impl TodoForm {
    /// Decodes an `application/x-www-form-urlencoded` body. A repeated field
    /// keeps its first value; unknown fields are ignored.
    pub fn from_urlencoded(body: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
        let mut form = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_str() {
                "id" => &mut form.id,
                "content" => &mut form.content,
                "done" => &mut form.done,
                "until" => &mut form.until,
                "delete" => &mut form.delete,
                "action" => &mut form.action,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        Ok(form)
    }

    /// Binds every field, collecting all failures, then resolves the command.
    pub fn bind(&self, deadline_offset: FixedOffset) -> Result<TodoCommand, Vec<BindError>> {
        let mut errors = Vec::new();

        let id = match non_empty(&self.id) {
            None => TodoId(0),
            Some(raw) => raw.parse().map(TodoId).unwrap_or_else(|_| {
                errors.push(bind_error("id", raw, "must be an integer"));
                TodoId(0)
            }),
        };
        let done = match non_empty(&self.done) {
            None => false,
            Some(raw) => parse_bool(raw).unwrap_or_else(|| {
                errors.push(bind_error("done", raw, "must be a boolean"));
                false
            }),
        };
        let until = match non_empty(&self.until) {
            None => None,
            Some(raw) => parse_until(raw, deadline_offset).or_else(|| {
                errors.push(bind_error("until", raw, "failed to decode time"));
                None
            }),
        };
        let action = match non_empty(&self.action) {
            None => None,
            Some(raw) => raw.parse::<TodoAction>().map(Some).unwrap_or_else(|_| {
                errors.push(bind_error("action", raw, "unknown action"));
                None
            }),
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let action = action.or_else(|| self.legacy_action(id));
        Ok(match action {
            Some(TodoAction::Create) => TodoCommand::Create {
                content: self.content.clone().unwrap_or_default(),
                until,
            },
            Some(TodoAction::Delete) => TodoCommand::Delete { id },
            Some(TodoAction::Update) => TodoCommand::SetDone { id, done },
            None => TodoCommand::Noop,
        })
    }

    /// Infers the action for clients that do not send `action`.
    fn legacy_action(&self, id: TodoId) -> Option<TodoAction> {
        if id.is_unassigned() {
            Some(TodoAction::Create)
        } else if self.delete.as_deref() == Some(DELETE_MARKER) {
            Some(TodoAction::Delete)
        } else if non_empty(&self.done).is_some() {
            Some(TodoAction::Update)
        } else {
            None
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

fn bind_error(field: &'static str, value: &str, message: &'static str) -> BindError {
    BindError { field, value: value.to_string(), message }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" | "on" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" | "off" => Some(false),
        _ => None,
    }
}

/// Parses a `datetime-local` value as wall-clock time in `offset`.
pub fn parse_until(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, UNTIL_FORMAT).ok()?;
    offset.from_local_datetime(&naive).single().map(|t| t.with_timezone(&Utc))
}
