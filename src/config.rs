//! Server configuration from environment variables.

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/itermob";
pub const DEFAULT_SCHEMA: &str = "itermob";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub database_url: String,
    /// Schema holding `tbl_usuario` and `tbl_endereco`.
    pub schema: String,
    pub max_connections: u32,
    pub body_limit: usize,
}

impl ServerConfig {
    /// Reads `ITERMOB_BIND`, `ITERMOB_STORE`, `DATABASE_URL`, `ITERMOB_SCHEMA`,
    /// `ITERMOB_DB_MAX_CONNECTIONS` and `ITERMOB_BODY_LIMIT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse_var(&lookup, "ITERMOB_BIND", DEFAULT_BIND.parse().ok())?;
        let store = match lookup("ITERMOB_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let schema = lookup("ITERMOB_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        if !is_identifier(&schema) {
            return Err(ConfigError::InvalidSchema(schema));
        }
        let max_connections = parse_var(
            &lookup,
            "ITERMOB_DB_MAX_CONNECTIONS",
            Some(DEFAULT_MAX_CONNECTIONS),
        )?;
        let body_limit = parse_var(&lookup, "ITERMOB_BODY_LIMIT", Some(DEFAULT_BODY_LIMIT))?;
        Ok(ServerConfig {
            bind_addr,
            store,
            database_url,
            schema,
            max_connections,
            body_limit,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: Option<T>,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        None => default.ok_or(ConfigError::InvalidValue {
            var,
            value: String::new(),
        }),
    }
}

/// Plain PostgreSQL identifier: letter or underscore, then letters, digits, underscores.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    s.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
