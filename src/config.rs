use std::net::SocketAddr;

use chrono::FixedOffset;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8989";
/// Deadlines are entered and shown in JST unless overridden.
pub const DEFAULT_DEADLINE_OFFSET: &str = "+09:00";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Log every SQL statement.
    pub sql_debug: bool,
    pub bind_addr: SocketAddr,
    /// Offset deadlines are parsed and displayed in.
    pub deadline_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let sql_debug = match lookup("SQL_DEBUG") {
            Some(v) => parse_flag(&v).ok_or(ConfigError::Invalid { name: "SQL_DEBUG", value: v })?,
            None => false,
        };
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name: "BIND_ADDR", value: bind_raw.clone() })?;
        let offset_raw = lookup("DEADLINE_UTC_OFFSET").unwrap_or_else(|| DEFAULT_DEADLINE_OFFSET.to_string());
        let deadline_offset = parse_offset(&offset_raw)
            .ok_or(ConfigError::Invalid { name: "DEADLINE_UTC_OFFSET", value: offset_raw })?;
        Ok(Self { database_url, sql_debug, bind_addr, deadline_offset })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Some(false),
        "1" | "true" | "yes" | "on" => Some(true),
        _ => None,
    }
}

/// Parses `+HH:MM` / `-HH:MM`.
pub fn parse_offset(value: &str) -> Option<FixedOffset> {
    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert!(!cfg.sql_debug);
        assert_eq!(cfg.bind_addr.port(), 8989);
        assert_eq!(cfg.deadline_offset.local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SQL_DEBUG", "true"),
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("DEADLINE_UTC_OFFSET", "-05:30"),
        ])
        .unwrap();
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert!(cfg.sql_debug);
        assert_eq!(cfg.bind_addr.port(), 3000);
        assert_eq!(cfg.deadline_offset.local_minus_utc(), -(5 * 3600 + 30 * 60));
    }

    #[test]
    fn rejects_garbage() {
        assert!(config(&[("SQL_DEBUG", "maybe")]).is_err());
        assert!(config(&[("BIND_ADDR", "nowhere")]).is_err());
        assert!(config(&[("DEADLINE_UTC_OFFSET", "JST")]).is_err());
        assert!(parse_offset("+9:00").is_none());
        assert!(parse_offset("+09:75").is_none());
    }
}
