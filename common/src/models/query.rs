//! Find query parameter model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::connection::ConnectionParams;

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "mycollection";

/// Maximum number of documents returned when no limit is configured.
pub const DEFAULT_LIMIT: i64 = 10;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Parameters for a bounded find.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[validate(length(min = 1, message = "Connection string is required"))]
    pub connection_string: String,

    #[validate(length(min = 1, message = "Database name is required"))]
    pub database: String,

    #[validate(length(min = 1, message = "Collection name is required"))]
    pub collection: String,

    /// Filter document; empty matches everything.
    #[serde(default)]
    pub query: Map<String, Value>,

    /// Passed to the driver as-is. MongoDB reads 0 as "no limit".
    #[serde(default = "default_limit")]
    #[validate(range(min = 0, message = "Limit must be zero or greater"))]
    pub limit: i64,
}

impl QueryParams {
    /// The connection fields of this query.
    pub fn connection(&self) -> ConnectionParams {
        ConnectionParams::new(self.connection_string.clone(), self.database.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_when_deserializing() {
        let params: QueryParams = serde_json::from_value(json!({
            "connectionString": "mongodb://localhost:27017",
            "database": "mydatabase",
            "collection": "mycollection"
        }))
        .unwrap();

        assert!(params.query.is_empty());
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_negative_limit_is_rejected() {
        let params: QueryParams = serde_json::from_value(json!({
            "connectionString": "mongodb://localhost:27017",
            "database": "mydatabase",
            "collection": "mycollection",
            "limit": -1
        }))
        .unwrap();

        let errors = params.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("limit"));
    }

    #[test]
    fn test_zero_limit_is_valid() {
        let params: QueryParams = serde_json::from_value(json!({
            "connectionString": "mongodb://localhost:27017",
            "database": "mydatabase",
            "collection": "mycollection",
            "limit": 0
        }))
        .unwrap();
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_missing_collection_is_rejected() {
        let params: QueryParams = serde_json::from_value(json!({
            "connectionString": "mongodb://localhost:27017",
            "database": "mydatabase",
            "collection": ""
        }))
        .unwrap();
        let errors = params.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("collection"));
    }

    #[test]
    fn test_connection_fields() {
        let params: QueryParams = serde_json::from_value(json!({
            "connectionString": "mongodb://db.example:27017",
            "database": "shop",
            "collection": "orders"
        }))
        .unwrap();
        let conn = params.connection();
        assert_eq!(conn.connection_string, "mongodb://db.example:27017");
        assert_eq!(conn.database, "shop");
    }
}
