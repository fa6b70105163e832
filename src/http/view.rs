use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tera::{Context, Tera, Value};

use crate::domain::todo::Todo;

pub const INDEX_TEMPLATE: &str = "index.html";
const INDEX_SOURCE: &str = include_str!("../../templates/index.html");
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// What the page is rendered from.
#[derive(Debug, Default, Serialize)]
pub struct PageData {
    pub todos: Vec<Todo>,
    pub errors: Vec<String>,
}

impl PageData {
    pub fn list(todos: Vec<Todo>) -> Self { Self { todos, errors: Vec::new() } }

    pub fn errors<I, E>(errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: ToString,
    {
        Self { todos: Vec::new(), errors: errors.into_iter().map(|e| e.to_string()).collect() }
    }
}

/// Parsed templates. Built once at startup and shared by all requests.
pub struct View {
    tera: Tera,
}

impl View {
    pub fn new(offset: FixedOffset) -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX_TEMPLATE, INDEX_SOURCE)?;
        tera.register_filter("format_datetime", move |value: &Value, _: &HashMap<String, Value>| {
            format_datetime_value(value, offset)
        });
        Ok(Self { tera })
    }

    pub fn render_index(&self, data: &PageData) -> tera::Result<String> {
        let context = Context::from_serialize(data)?;
        self.tera.render(INDEX_TEMPLATE, &context)
    }
}

/// `YYYY-MM-DD HH:MM` in `offset`, or an empty string when unset.
pub fn format_datetime(value: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    value
        .map(|t| t.with_timezone(&offset).format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

fn format_datetime_value(value: &Value, offset: FixedOffset) -> tera::Result<Value> {
    let parsed = match value {
        Value::Null => None,
        Value::String(s) => Some(
            DateTime::parse_from_rfc3339(s)
                .map_err(|e| tera::Error::msg(format!("format_datetime: {e}")))?
                .with_timezone(&Utc),
        ),
        other => return Err(tera::Error::msg(format!("format_datetime expects a timestamp, got {other}"))),
    };
    Ok(Value::String(format_datetime(parsed, offset)))
}
