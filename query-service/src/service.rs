//! 查询执行服务模块

use bson::Document;

use common::errors::{AppError, AppResult};
use common::models::QueryParams;
use common::response::ResponseEnvelope;

use crate::format::render_listing;
use crate::store::DocumentStore;

/// Bounded find against a live store.
pub struct QueryService;

impl QueryService {
    /// Runs `params` against `store` and renders the outcome.
    ///
    /// Never fails: execution errors come back as error envelopes.
    pub async fn find<S>(store: &S, params: &QueryParams) -> ResponseEnvelope
    where
        S: DocumentStore + ?Sized,
    {
        match Self::execute(store, params).await {
            Ok(text) => ResponseEnvelope::ok(text),
            Err(e) => {
                tracing::error!(collection = %params.collection, error = %e, "Error finding documents");
                ResponseEnvelope::err(format!("Failed to find documents: {}", e))
            }
        }
    }

    async fn execute<S>(store: &S, params: &QueryParams) -> AppResult<String>
    where
        S: DocumentStore + ?Sized,
    {
        let filter = to_filter(params)?;
        let documents = store
            .find(&params.collection, filter, params.limit)
            .await?;
        tracing::info!(collection = %params.collection, count = documents.len(), "Find completed");
        render_listing(&params.collection, &documents)
    }
}

fn to_filter(params: &QueryParams) -> AppResult<Document> {
    bson::to_document(&params.query).map_err(|e| AppError::Query(format!("invalid filter: {}", e)))
}
