//! Database configuration.
//!
//! [`DbConfig`] is built either in code (builder methods) or from environment
//! variables with fallback to defaults.
//!
//! | Variable                          | Default              |
//! |-----------------------------------|----------------------|
//! | `CATALOG_DATABASE_PATH`           | `./catalog.db`       |
//! | `CATALOG_DB_MAX_CONNECTIONS`      | `5`                  |
//! | `CATALOG_DB_CONNECT_TIMEOUT_SECS` | `30`                 |
//! | `CATALOG_DB_RUN_MIGRATIONS`       | `true`               |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/catalog.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Loads the configuration from `CATALOG_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = env::var("CATALOG_DATABASE_PATH").unwrap_or_else(|_| "./catalog.db".to_string());
        let mut config = DbConfig::new(path);

        if let Ok(raw) = env::var("CATALOG_DB_MAX_CONNECTIONS") {
            config.max_connections = parse_var("CATALOG_DB_MAX_CONNECTIONS", &raw)?;
        }

        if let Ok(raw) = env::var("CATALOG_DB_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout =
                Duration::from_secs(parse_var("CATALOG_DB_CONNECT_TIMEOUT_SECS", &raw)?);
        }

        if let Ok(raw) = env::var("CATALOG_DB_RUN_MIGRATIONS") {
            config.run_migrations = parse_var("CATALOG_DB_RUN_MIGRATIONS", &raw)?;
        }

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("CATALOG_DB_MAX_CONNECTIONS".to_string()));
        }
        config.min_connections = config.min_connections.min(config.max_connections);

        Ok(config)
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_in_memory_uses_single_connection() {
        let config = DbConfig::in_memory();
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.database_path, PathBuf::from(":memory:"));
    }

    #[test]
    fn test_parse_var() {
        assert_eq!(parse_var::<u32>("X", " 8 ").unwrap(), 8);
        assert!(parse_var::<bool>("X", "true").unwrap());
        assert!(matches!(
            parse_var::<u32>("X", "many"),
            Err(ConfigError::InvalidValue(name)) if name == "X"
        ));
    }
}
