use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Largest multipart form accepted by `/video-upload` (2 GiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 64 << 25;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No {0} environment variable")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Postgres connection settings.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// Immutable service configuration, built once at startup and shared with
/// every handler through `AppState`.
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    /// Topic a transcoding trigger would publish to. Nothing publishes yet.
    pub queue_topic: String,
    pub upload_dir: PathBuf,
    pub max_upload_size: u64,
}

impl Config {
    /// Load `.env` (if any) and read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is normal in production.
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Required: `PGDB`, `PGUSER`, `PGPASSWORD`, `PGHOST`, `QUEUE_TOPIC`,
    /// `UPLOAD_FOLDER_PATH`. An empty value counts as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let database = DatabaseConfig {
            name: required("PGDB")?,
            user: required("PGUSER")?,
            password: required("PGPASSWORD")?,
            host: required("PGHOST")?,
            port: parse_or(&lookup, "PGPORT", 5432)?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
        };
        let queue_topic = required("QUEUE_TOPIC")?;
        let upload_dir = PathBuf::from(required("UPLOAD_FOLDER_PATH")?);

        let host = lookup("HOST")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8080)?;
        let max_upload_size = parse_or(&lookup, "MAX_UPLOAD_SIZE", DEFAULT_MAX_UPLOAD_SIZE)?;

        Ok(Self {
            host,
            port,
            database,
            queue_topic,
            upload_dir,
            max_upload_size,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name).filter(|v| !v.is_empty()) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
