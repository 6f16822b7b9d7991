//! Run orchestration.
//!
//! A session owns the connection service for one invocation, validates
//! parameters before any I/O, connects lazily for `find`, writes the cache back
//! after a successful connect, and closes the connection on shutdown.

use validator::Validate;

use common::config::{ConfigResolver, Resolution};
use common::errors::AppResult;
use common::models::ConnectionParams;
use common::response::ResponseEnvelope;
use connection_service::ConnectionService;
use query_service::QueryService;

pub struct Session {
    connections: ConnectionService,
    resolver: ConfigResolver,
    resolution: Resolution,
    echo_config: bool,
}

impl Session {
    pub fn new(resolver: ConfigResolver, resolution: Resolution) -> Self {
        Self {
            connections: ConnectionService::new(),
            resolver,
            resolution,
            echo_config: false,
        }
    }

    pub fn with_echo_config(mut self, echo_config: bool) -> Self {
        self.echo_config = echo_config;
        self
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Connects with the resolved connection fields.
    ///
    /// # Errors
    /// `AppError::Validation` when a required field is empty; nothing is
    /// attempted in that case.
    pub async fn connect(&mut self) -> AppResult<ResponseEnvelope> {
        let params = self.resolution.config.connection_params();
        params.validate()?;
        Ok(self.connect_with(&params).await)
    }

    /// Runs the resolved find, connecting first if no handle is open.
    ///
    /// When that implicit connect fails its envelope is returned and the query
    /// is skipped.
    pub async fn find(&mut self) -> AppResult<ResponseEnvelope> {
        let params = self.resolution.config.query_params();
        params.validate()?;

        if self.connections.handle().is_none() {
            let connected = self.connect_with(&params.connection()).await;
            if connected.is_error {
                return Ok(connected);
            }
        }

        let envelope = match self.connections.handle() {
            Some(handle) => QueryService::find(handle, &params).await,
            None => ResponseEnvelope::err("Failed to find documents: not connected"),
        };
        Ok(self.decorate(envelope))
    }

    /// Connect, then find. The find is skipped if the connect failed.
    pub async fn run(&mut self) -> AppResult<Vec<ResponseEnvelope>> {
        let query = self.resolution.config.query_params();
        query.validate()?;

        let connected = self.connect().await?;
        if connected.is_error {
            tracing::warn!("Skipping query after failed connect");
            return Ok(vec![connected]);
        }
        let found = self.find().await?;
        Ok(vec![connected, found])
    }

    /// Closes the connection, if any.
    pub async fn shutdown(&mut self) {
        self.connections.close().await;
    }

    async fn connect_with(&mut self, params: &ConnectionParams) -> ResponseEnvelope {
        let envelope = self.connections.connect(params).await;
        if !envelope.is_error {
            self.remember();
        }
        self.decorate(envelope)
    }

    /// Writes the configuration back to the cache when it came from the cache
    /// or the environment. Failures are logged only.
    fn remember(&self) {
        if !self.resolution.should_persist() {
            return;
        }
        if let Err(e) = self.resolver.persist(&self.resolution.config) {
            tracing::warn!(error = %e, "Error saving config");
        }
    }

    fn decorate(&self, envelope: ResponseEnvelope) -> ResponseEnvelope {
        if self.echo_config {
            envelope.with_config(self.resolution.config.redacted())
        } else {
            envelope
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::{ConfigSource, ResolvedConfig, CONFIG_FILE_NAME};
    use common::errors::AppError;
    use serde_json::Map;
    use tempfile::TempDir;

    fn session(dir: &TempDir, connection_string: &str, limit: i64, source: ConfigSource) -> Session {
        let resolver = ConfigResolver::new(dir.path().join(CONFIG_FILE_NAME))
            .with_cache_path(Some(dir.path().join("cache.json")));
        let resolution = Resolution {
            config: ResolvedConfig {
                connection_string: connection_string.to_string(),
                database: "x".to_string(),
                collection: "mycollection".to_string(),
                query: Map::new(),
                limit,
            },
            source,
            attempts: vec![],
        };
        Session::new(resolver, resolution)
    }

    #[tokio::test]
    async fn test_failed_connect_is_envelope_and_not_cached() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, "not-a-url", 10, ConfigSource::Environment);

        let envelope = session.connect().await.unwrap();
        assert!(envelope.is_error);
        assert!(envelope.text().contains("Failed to connect"));
        assert!(!dir.path().join("cache.json").exists());

        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_run_skips_query_after_failed_connect() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, "not-a-url", 10, ConfigSource::File);

        let envelopes = session.run().await.unwrap();
        assert_eq!(envelopes.len(), 1);
        assert!(envelopes[0].is_error);
    }

    #[tokio::test]
    async fn test_find_returns_connect_failure() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, "not-a-url", 5, ConfigSource::File);

        let envelope = session.find().await.unwrap();
        assert!(envelope.is_error);
        assert!(envelope.text().starts_with("Failed to connect to MongoDB"));
    }

    #[tokio::test]
    async fn test_negative_limit_aborts_before_io() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, "mongodb://localhost:27017", -1, ConfigSource::File);

        let err = session.find().await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(session.run().await.is_err());
    }

    #[tokio::test]
    async fn test_echo_config_masks_password() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, "mongodb://u:secret@/", 10, ConfigSource::File)
            .with_echo_config(true);

        let envelope = session.connect().await.unwrap();
        let config = envelope.config.expect("config echoed");
        assert!(!config["connectionString"].as_str().unwrap().contains("secret"));
    }
}
