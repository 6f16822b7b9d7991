//! Layered configuration resolution.
//!
//! Sources are checked in priority order: the local cache, environment
//! variables, the configuration file, and (opt-in) built-in defaults. The first
//! source that yields both a connection string and a database wins. Every
//! source tried is recorded in the returned [`Resolution`] together with the
//! reason it was skipped.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{AppError, AppResult};
use crate::models::{ConnectionParams, QueryParams, DEFAULT_COLLECTION, DEFAULT_LIMIT};
use crate::utils::redact;

pub const CONNECTION_STRING_VAR: &str = "MONGODB_CONNECTION_STRING";
/// Accepted in place of [`CONNECTION_STRING_VAR`]; the canonical name wins.
pub const CONNECTION_STRING_ALIAS_VAR: &str = "MONGODB_URI";
pub const DATABASE_VAR: &str = "MONGODB_DATABASE";
pub const COLLECTION_VAR: &str = "MONGODB_COLLECTION";
pub const QUERY_VAR: &str = "MONGODB_QUERY";
pub const LIMIT_VAR: &str = "MONGODB_LIMIT";

pub const DEFAULT_CONNECTION_STRING: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "mydatabase";

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "mongo-mcp.json";

const CACHE_DIR_NAME: &str = "mongo-mcp";
const CACHE_FILE_NAME: &str = "mongo-mcp.json";
const CACHE_NAME: &str = "mongo-mcp";
const CACHE_VERSION: &str = "1.0.0";

/// Per-user cache location, if the platform has a config directory.
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CACHE_DIR_NAME).join(CACHE_FILE_NAME))
}

/// The effective configuration of a run. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub connection_string: String,
    pub database: String,
    pub collection: String,
    pub query: Map<String, Value>,
    pub limit: i64,
}

impl ResolvedConfig {
    /// Connection parameters for this configuration.
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams::new(self.connection_string.clone(), self.database.clone())
    }

    /// Query parameters for this configuration.
    pub fn query_params(&self) -> QueryParams {
        QueryParams {
            connection_string: self.connection_string.clone(),
            database: self.database.clone(),
            collection: self.collection.clone(),
            query: self.query.clone(),
            limit: self.limit,
        }
    }

    /// JSON view with the connection string password masked.
    pub fn redacted(&self) -> Value {
        serde_json::json!({
            "connectionString": redact(&self.connection_string),
            "database": self.database,
            "collection": self.collection,
            "query": self.query,
            "limit": self.limit,
        })
    }
}

/// Where a configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Cache,
    Environment,
    File,
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Cache => write!(f, "cache"),
            ConfigSource::Environment => write!(f, "environment"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Defaults => write!(f, "defaults"),
        }
    }
}

/// Outcome of trying one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum AttemptOutcome {
    Used,
    Skipped { reason: String },
}

/// One entry of the resolution trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceAttempt {
    pub source: ConfigSource,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// Result of a successful resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub config: ResolvedConfig,
    pub source: ConfigSource,
    pub attempts: Vec<SourceAttempt>,
}

impl Resolution {
    /// Whether the configuration should be written back to the cache once a
    /// connection with it succeeds.
    pub fn should_persist(&self) -> bool {
        matches!(self.source, ConfigSource::Cache | ConfigSource::Environment)
    }
}

/// Why a source could not be used.
enum Skip {
    /// Nothing there to read.
    Absent(String),
    /// Present but unreadable or incomplete.
    Invalid(String),
}

impl Skip {
    fn into_reason(self) -> String {
        match self {
            Skip::Absent(reason) | Skip::Invalid(reason) => reason,
        }
    }
}

/// Config fields as stored in the configuration file and the cache.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    connection_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<i64>,
}

impl PartialConfig {
    /// Applies field defaults; fails unless both connection fields are non-empty
    /// and the limit is not negative.
    fn complete(self) -> Result<ResolvedConfig, String> {
        let connection_string = non_empty(self.connection_string);
        let database = non_empty(self.database);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit < 0 {
            return Err(format!("limit must be zero or greater, got {}", limit));
        }
        match (connection_string, database) {
            (Some(connection_string), Some(database)) => Ok(ResolvedConfig {
                connection_string,
                database,
                collection: non_empty(self.collection)
                    .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
                query: self.query.unwrap_or_default(),
                limit,
            }),
            (None, Some(_)) => Err("connectionString is missing or empty".to_string()),
            (Some(_), None) => Err("database is missing or empty".to_string()),
            (None, None) => Err("connectionString and database are missing or empty".to_string()),
        }
    }
}

impl From<&ResolvedConfig> for PartialConfig {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            connection_string: Some(config.connection_string.clone()),
            database: Some(config.database.clone()),
            collection: Some(config.collection.clone()),
            query: Some(config.query.clone()),
            limit: Some(config.limit),
        }
    }
}

/// On-disk cache layout.
#[derive(Debug, Serialize, Deserialize)]
struct CacheDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    config: PartialConfig,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolves the effective configuration from cache, environment, file and
/// defaults.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    cache_path: Option<PathBuf>,
    file_path: PathBuf,
    env: HashMap<String, String>,
    use_defaults: bool,
}

impl ConfigResolver {
    /// Resolver with no cache, an empty environment and defaults disabled.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: None,
            file_path: file_path.into(),
            env: HashMap::new(),
            use_defaults: false,
        }
    }

    /// Resolver over the current process environment and the per-user cache.
    pub fn from_process(file_path: impl Into<PathBuf>) -> Self {
        Self::new(file_path)
            .with_env(std::env::vars().collect())
            .with_cache_path(default_cache_path())
    }

    /// Sets the cache location; `None` disables the cache.
    pub fn with_cache_path(mut self, cache_path: Option<PathBuf>) -> Self {
        self.cache_path = cache_path;
        self
    }

    /// Replaces the environment snapshot.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Enables the built-in defaults as the last source.
    pub fn with_defaults(mut self, use_defaults: bool) -> Self {
        self.use_defaults = use_defaults;
        self
    }

    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Walks the sources in priority order.
    ///
    /// # Errors
    /// Returns `AppError::Configuration` when no source is usable.
    pub fn resolve(&self) -> AppResult<Resolution> {
        let mut attempts = Vec::new();

        for source in [
            ConfigSource::Cache,
            ConfigSource::Environment,
            ConfigSource::File,
            ConfigSource::Defaults,
        ] {
            let loaded = match source {
                ConfigSource::Cache => self.load_cache(),
                ConfigSource::Environment => self.load_env(),
                ConfigSource::File => self.load_file(),
                ConfigSource::Defaults => self.load_defaults(),
            };
            match loaded {
                Ok(config) => {
                    tracing::info!(source = %source, database = %config.database, "Configuration resolved");
                    attempts.push(SourceAttempt {
                        source,
                        outcome: AttemptOutcome::Used,
                    });
                    return Ok(Resolution {
                        config,
                        source,
                        attempts,
                    });
                }
                Err(skip) => {
                    match &skip {
                        Skip::Absent(reason) => {
                            tracing::debug!(source = %source, reason = %reason, "Configuration source skipped")
                        }
                        Skip::Invalid(reason) => {
                            tracing::warn!(source = %source, reason = %reason, "Configuration source unusable")
                        }
                    }
                    attempts.push(SourceAttempt {
                        source,
                        outcome: AttemptOutcome::Skipped {
                            reason: skip.into_reason(),
                        },
                    });
                }
            }
        }

        let summary = attempts
            .iter()
            .filter_map(|a| match &a.outcome {
                AttemptOutcome::Skipped { reason } => Some(format!("{}: {}", a.source, reason)),
                AttemptOutcome::Used => None,
            })
            .collect::<Vec<_>>()
            .join("; ");
        Err(AppError::Configuration(format!(
            "no usable connection string and database ({})",
            summary
        )))
    }

    /// Writes the configuration to the cache, creating its directory.
    ///
    /// Does nothing when the cache is disabled.
    pub fn persist(&self, config: &ResolvedConfig) -> AppResult<()> {
        let Some(path) = self.cache_path.as_deref() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let document = CacheDocument {
            name: CACHE_NAME.to_string(),
            version: CACHE_VERSION.to_string(),
            config: PartialConfig::from(config),
        };
        fs::write(path, serde_json::to_string_pretty(&document)?)?;
        tracing::info!(path = %path.display(), "Configuration cached");
        Ok(())
    }

    fn load_cache(&self) -> Result<ResolvedConfig, Skip> {
        let path = self
            .cache_path
            .as_deref()
            .ok_or_else(|| Skip::Absent("cache disabled".to_string()))?;
        let content = read_optional(path)?;
        let document: CacheDocument = serde_json::from_str(&content)
            .map_err(|e| Skip::Invalid(format!("{}: {}", path.display(), e)))?;
        document.config.complete().map_err(Skip::Invalid)
    }

    fn load_env(&self) -> Result<ResolvedConfig, Skip> {
        let connection_string = self
            .var(CONNECTION_STRING_VAR)
            .or_else(|| self.var(CONNECTION_STRING_ALIAS_VAR));
        let database = self.var(DATABASE_VAR);

        let (connection_string, database) = match (connection_string, database) {
            (Some(c), Some(d)) => (c, d),
            (None, None) => {
                return Err(Skip::Absent(format!(
                    "{} and {} are not set",
                    CONNECTION_STRING_VAR, DATABASE_VAR
                )))
            }
            (None, Some(_)) => {
                return Err(Skip::Invalid(format!(
                    "{} is set but {} is not",
                    DATABASE_VAR, CONNECTION_STRING_VAR
                )))
            }
            (Some(_), None) => {
                return Err(Skip::Invalid(format!(
                    "{} is set but {} is not",
                    CONNECTION_STRING_VAR, DATABASE_VAR
                )))
            }
        };

        let query = match self.var(QUERY_VAR) {
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => Some(map),
                Ok(_) => {
                    return Err(Skip::Invalid(format!("{} must be a JSON object", QUERY_VAR)))
                }
                Err(e) => return Err(Skip::Invalid(format!("{} is not valid JSON: {}", QUERY_VAR, e))),
            },
            None => None,
        };

        let limit = match self.var(LIMIT_VAR) {
            Some(raw) => Some(raw.trim().parse::<i64>().map_err(|e| {
                Skip::Invalid(format!("{} is not an integer: {}", LIMIT_VAR, e))
            })?),
            None => None,
        };

        PartialConfig {
            connection_string: Some(connection_string),
            database: Some(database),
            collection: self.var(COLLECTION_VAR),
            query,
            limit,
        }
        .complete()
        .map_err(Skip::Invalid)
    }

    fn load_file(&self) -> Result<ResolvedConfig, Skip> {
        let content = read_optional(&self.file_path)?;
        let partial: PartialConfig = serde_json::from_str(&content)
            .map_err(|e| Skip::Invalid(format!("{}: {}", self.file_path.display(), e)))?;
        partial.complete().map_err(Skip::Invalid)
    }

    fn load_defaults(&self) -> Result<ResolvedConfig, Skip> {
        if !self.use_defaults {
            return Err(Skip::Absent("built-in defaults not enabled".to_string()));
        }
        PartialConfig {
            connection_string: Some(DEFAULT_CONNECTION_STRING.to_string()),
            database: Some(DEFAULT_DATABASE.to_string()),
            ..Default::default()
        }
        .complete()
        .map_err(Skip::Invalid)
    }

    /// Non-empty environment value.
    fn var(&self, key: &str) -> Option<String> {
        non_empty(self.env.get(key).cloned())
    }
}

fn read_optional(path: &Path) -> Result<String, Skip> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Skip::Absent(format!("{} not found", path.display())),
        _ => Skip::Invalid(format!("{}: {}", path.display(), e)),
    })
}
