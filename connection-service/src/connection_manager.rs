//! Connection handle lifecycle.
//!
//! Holds at most one live client. The manager is owned by the caller and
//! passed where it is needed; `&mut self` on every mutating method keeps the
//! flow sequential.

use bson::doc;
use chrono::{DateTime, Utc};
use mongodb::{options::ClientOptions, Client, Database};

use common::errors::{AppError, AppResult};
use common::models::ConnectionParams;
use common::utils::host_from_uri;

/// A live, health-checked connection to one database.
#[derive(Debug)]
pub struct ConnectionHandle {
    client: Client,
    database: Database,
    host: String,
    connected_at: DateTime<Utc>,
}

impl ConnectionHandle {
    /// The selected database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Host the connection string points at.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    async fn close(self) {
        tracing::debug!(host = %self.host, database = %self.database.name(), "Closing MongoDB client");
        self.client.shutdown().await;
    }
}

/// Owns the single connection handle of a run.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    handle: Option<ConnectionHandle>,
}

impl ConnectionManager {
    /// Creates a manager with no open connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current handle, if connected.
    pub fn handle(&self) -> Option<&ConnectionHandle> {
        self.handle.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// Opens a client, selects the database and pings it.
    ///
    /// On success the previous handle (if any) is closed and replaced. On
    /// failure the previous handle is left untouched.
    ///
    /// # Errors
    /// Returns `AppError::Connection` for malformed URIs, unreachable hosts,
    /// authentication failures and ping rejections.
    #[tracing::instrument(skip(self, params), fields(database = %params.database))]
    pub async fn open(&mut self, params: &ConnectionParams) -> AppResult<&ConnectionHandle> {
        let handle = establish(params).await?;

        if let Some(previous) = self.handle.take() {
            tracing::info!(host = %previous.host, "Replacing existing connection");
            previous.close().await;
        }

        tracing::info!(
            host = %handle.host,
            database = %handle.database_name(),
            connected_at = %handle.connected_at.to_rfc3339(),
            "Connected to MongoDB"
        );
        let handle = self.handle.insert(handle);
        Ok(&*handle)
    }

    /// Closes the current handle. No-op when not connected.
    pub async fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.close().await;
            tracing::info!("MongoDB connection closed");
        }
    }
}

async fn establish(params: &ConnectionParams) -> AppResult<ConnectionHandle> {
    let options = ClientOptions::parse(params.connection_string.as_str())
        .await
        .map_err(|e| AppError::Connection(format!("invalid connection string: {}", e)))?;

    // Seed lists are not single URIs; report the first seed the driver parsed.
    let host = host_from_uri(&params.connection_string)
        .or_else(|| options.hosts.first().map(ToString::to_string))
        .ok_or_else(|| AppError::Connection("connection string has no host".to_string()))?;

    let client = Client::with_options(options)
        .map_err(|e| AppError::Connection(format!("failed to create client: {}", e)))?;
    let database = client.database(&params.database);

    if let Err(e) = database.run_command(doc! { "ping": 1 }).await {
        client.shutdown().await;
        return Err(AppError::Connection(format!("ping failed: {}", e)));
    }

    Ok(ConnectionHandle {
        client,
        database,
        host,
        connected_at: Utc::now(),
    })
}
