//! Server configuration.

use std::{env, fmt, str::FromStr};

use task_store::{DEFAULT_DYNAMODB_TABLE, PostgresConfig};

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Process-local map, lost on restart.
    #[default]
    Memory,
    /// DynamoDB document store.
    DynamoDb,
    /// PostgreSQL relational store.
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "dynamodb" | "dynamo" => Ok(Self::DynamoDb),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => anyhow::bail!("unknown storage backend: {other}"),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::DynamoDb => "dynamodb",
            Self::Postgres => "postgres",
        };
        f.write_str(name)
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Storage backend.
    pub storage_backend: StorageBackend,
    /// DynamoDB table name.
    pub dynamodb_table: String,
    /// PostgreSQL connection settings (set when the backend is Postgres).
    pub postgres: Option<PostgresConfig>,
    /// JWT secret. Authentication is enabled when set.
    pub jwt_secret: Option<String>,
    /// Expected JWT issuer.
    pub jwt_issuer: String,
    /// Lifetime of issued tokens in hours.
    pub jwt_expiration_hours: u64,
    /// Log level.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            storage_backend: StorageBackend::Memory,
            dynamodb_table: DEFAULT_DYNAMODB_TABLE.to_string(),
            postgres: None,
            jwt_secret: None,
            jwt_issuer: auth::DEFAULT_JWT_ISSUER.to_string(),
            jwt_expiration_hours: auth::DEFAULT_JWT_EXPIRATION_HOURS,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through a variable lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let storage_backend = match lookup("TASKS_STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.storage_backend,
        };

        let postgres = if storage_backend == StorageBackend::Postgres {
            let required = |key: &str| {
                lookup(key).ok_or_else(|| {
                    anyhow::anyhow!("{key} is required for the postgres storage backend")
                })
            };

            let mut postgres = PostgresConfig::new(
                required("TASKS_DB_HOST")?,
                required("TASKS_DB_USER")?,
                required("TASKS_DB_PASSWORD")?,
                required("TASKS_DB_NAME")?,
            );
            if let Some(port) = lookup("TASKS_DB_PORT") {
                postgres = postgres.with_port(port.parse()?);
            }
            Some(postgres)
        } else {
            None
        };

        Ok(Self {
            host: lookup("TASKS_SERVER_HOST").unwrap_or(defaults.host),
            port: lookup("TASKS_SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            storage_backend,
            dynamodb_table: lookup("TASKS_DYNAMODB_TABLE").unwrap_or(defaults.dynamodb_table),
            postgres,
            jwt_secret: lookup("TASKS_JWT_SECRET").filter(|s| !s.is_empty()),
            jwt_issuer: lookup("TASKS_JWT_ISSUER").unwrap_or(defaults.jwt_issuer),
            jwt_expiration_hours: lookup("TASKS_JWT_EXPIRATION_HOURS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.jwt_expiration_hours),
            log_level: lookup("TASKS_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true if authentication should be enabled.
    pub fn auth_enabled(&self) -> bool {
        self.jwt_secret.is_some()
    }
}
