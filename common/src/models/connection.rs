//! Connection parameter model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Parameters for opening a connection.
///
/// Field presence is checked by [`Validate`]; whether the connection string is
/// a usable URI is decided by `connect`, which reports it as an error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParams {
    /// MongoDB connection string.
    #[validate(length(min = 1, message = "Connection string is required"))]
    pub connection_string: String,

    /// Database to select after connecting.
    #[validate(length(min = 1, message = "Database name is required"))]
    pub database: String,
}

impl ConnectionParams {
    /// Creates connection parameters.
    pub fn new(connection_string: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            database: database.into(),
        }
    }
}
