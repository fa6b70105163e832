use std::{str::FromStr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::LevelFilter;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    ConnectOptions, Pool, Row, Sqlite,
};

use crate::domain::{
    repository::TodoRepository,
    todo::{NewTodo, Todo, TodoId},
};

/// Every read starts from here so soft-deleted rows never leak out.
const SELECT_ACTIVE: &str =
    "SELECT id, content, done, until, created_at, updated_at, deleted_at FROM todos WHERE deleted_at IS NULL";

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with_logging(database_url, false).await
    }

    /// Opens the pool. With `log_statements` every SQL statement is logged at INFO.
    pub async fn connect_with_logging(database_url: &str, log_statements: bool) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url {database_url}"))?
            .create_if_missing(true);
        let options = if log_statements {
            options.log_statements(LevelFilter::Info)
        } else {
            options.disable_statement_logging()
        };

        // An in-memory database lives and dies with its connection.
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .idle_timeout(if in_memory { None } else { Some(Duration::from_secs(600)) })
            .max_lifetime(if in_memory { None } else { Some(Duration::from_secs(1800)) })
            .connect_with(options)
            .await
            .context("cannot connect to database")?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL CHECK (content <> ''),
                done INTEGER NOT NULL DEFAULT 0,
                until TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT,
                deleted_at TEXT
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query(&format!("{SELECT_ACTIVE} ORDER BY created_at, id"))
            .fetch_all(&*self.pool)
            .await?;
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn insert(&self, input: NewTodo) -> Result<Todo> {
        anyhow::ensure!(!input.content.is_empty(), "todo content must not be empty");
        let result = sqlx::query(
            "INSERT INTO todos (content, done, until, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&input.content)
        .bind(false)
        .bind(input.until.map(encode_time))
        .bind(encode_time(input.created_at))
        .execute(&*self.pool)
        .await?;
        Ok(Todo {
            id: TodoId(result.last_insert_rowid()),
            content: input.content,
            done: false,
            until: input.until,
            created_at: input.created_at,
            updated_at: None,
            deleted_at: None,
        })
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query(&format!("{SELECT_ACTIVE} AND id = ?1"))
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        row.map(row_to_todo).transpose()
    }

    async fn update(&self, todo: &Todo) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE todos SET done = ?2, updated_at = ?3 WHERE id = ?1 AND deleted_at IS NULL",
        )
        .bind(todo.id.0)
        .bind(todo.done)
        .bind(todo.updated_at.map(encode_time))
        .execute(&*self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: TodoId, at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query("UPDATE todos SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL")
            .bind(id.0)
            .bind(encode_time(at))
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// Fixed precision keeps lexical order equal to chronological order.
fn encode_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_time(column: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("malformed timestamp in column {column}: {raw}"))
}

fn decode_optional_time(row: &SqliteRow, column: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|s| decode_time(column, &s)).transpose()
}

fn row_to_todo(row: SqliteRow) -> Result<Todo> {
    let created_at: String = row.try_get("created_at")?;
    Ok(Todo {
        id: TodoId(row.try_get("id")?),
        content: row.try_get("content")?,
        done: row.try_get("done")?,
        until: decode_optional_time(&row, "until")?,
        created_at: decode_time("created_at", &created_at)?,
        updated_at: decode_optional_time(&row, "updated_at")?,
        deleted_at: decode_optional_time(&row, "deleted_at")?,
    })
}
