/*
 * Responsibility
 * - 環境変数からの設定読み込み (DATABASE_URL, identity table, timeouts, public paths)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::services::auth::public_routes::DEFAULT_PUBLIC_PATHS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Where the gate looks tokens up: `<schema>.<table>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityTable {
    pub schema: String,
    pub table: String,
}

impl IdentityTable {
    /// Quoted, schema-qualified name safe to splice into SQL.
    ///
    /// Both parts are validated as plain identifiers when the config is loaded.
    pub fn qualified(&self) -> String {
        format!("\"{}\".\"{}\"", self.schema, self.table)
    }
}

#[derive(Debug, Clone)]
pub struct DbTimeouts {
    pub connect: Duration,
    pub ping: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: Url,
    pub db_max_connections: u32,
    pub db_timeouts: DbTimeouts,
    pub identity_table: IdentityTable,

    pub auth_lookup_timeout: Duration,
    pub http_request_timeout: Duration,

    pub public_paths: Vec<String>,
    pub public_paths_lenient: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the process env in production).
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(get("APP_ENV"));

        let database_url = get("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_url =
            Url::parse(database_url.trim()).map_err(|_| ConfigError::Invalid("DATABASE_URL"))?;
        if !matches!(database_url.scheme(), "postgres" | "postgresql") {
            return Err(ConfigError::Invalid("DATABASE_URL"));
        }

        let db_max_connections = parse_or(&get, "DB_MAX_CONNECTIONS", 10u32)?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid("DB_MAX_CONNECTIONS"));
        }

        let db_timeouts = DbTimeouts {
            connect: seconds_or(&get, "DB_CONNECT_TIMEOUT_SECS", 30)?,
            ping: seconds_or(&get, "DB_PING_TIMEOUT_SECS", 30)?,
        };

        let schema = get("IDENTITY_SCHEMA").unwrap_or_else(|| "public".to_string());
        if !is_sql_identifier(&schema) {
            return Err(ConfigError::Invalid("IDENTITY_SCHEMA"));
        }
        let table = get("IDENTITY_TABLE").unwrap_or_else(|| "users".to_string());
        if !is_sql_identifier(&table) {
            return Err(ConfigError::Invalid("IDENTITY_TABLE"));
        }

        let auth_lookup_timeout = seconds_or(&get, "AUTH_LOOKUP_TIMEOUT_SECS", 30)?;
        let http_request_timeout = seconds_or(&get, "HTTP_REQUEST_TIMEOUT_SECS", 60)?;
        // lookup は request timeout より先に切れること (でないと store 停止が 500 でなく 408 になる)
        if http_request_timeout <= auth_lookup_timeout {
            return Err(ConfigError::Invalid("HTTP_REQUEST_TIMEOUT_SECS"));
        }

        let public_paths = match get("PUBLIC_PATHS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>(),
            None => DEFAULT_PUBLIC_PATHS.iter().map(|s| s.to_string()).collect(),
        };

        let public_paths_lenient = match get("PUBLIC_PATHS_LENIENT") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid("PUBLIC_PATHS_LENIENT"))?,
            None => false,
        };

        Ok(Self {
            addr,
            app_env,
            database_url,
            db_max_connections,
            db_timeouts,
            identity_table: IdentityTable { schema, table },
            auth_lookup_timeout,
            http_request_timeout,
            public_paths,
            public_paths_lenient,
        })
    }

    /// Database URL with the password masked, for logs.
    pub fn redacted_database_url(&self) -> String {
        let mut url = self.database_url.clone();
        if url.password().is_some() {
            let _ = url.set_password(Some("***"));
        }
        url.to_string()
    }
}

fn parse_or<F, T>(get: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn seconds_or<F>(get: &F, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs: u64 = parse_or(get, key, default)?;
    if secs == 0 {
        return Err(ConfigError::Invalid(key));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn is_sql_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    s.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
