//! Document source seam.

use async_trait::async_trait;
use bson::Document;
use futures::stream::TryStreamExt;

use common::errors::{AppError, AppResult};
use connection_service::ConnectionHandle;

/// Something documents can be read from.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns documents of `collection` matching `filter`, at most `limit`
    /// of them as the backing store interprets it.
    async fn find(&self, collection: &str, filter: Document, limit: i64)
        -> AppResult<Vec<Document>>;
}

#[async_trait]
impl DocumentStore for ConnectionHandle {
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> AppResult<Vec<Document>> {
        tracing::debug!(collection = %collection, limit, "Running find");
        let cursor = self
            .database()
            .collection::<Document>(collection)
            .find(filter)
            .limit(limit)
            .await
            .map_err(|e| AppError::Query(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::Query(e.to_string()))
    }
}
