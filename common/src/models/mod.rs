//! Parameter models shared by the connection and query services.

pub mod connection;
pub mod query;

// Re-export commonly used types
pub use connection::ConnectionParams;
pub use query::{QueryParams, DEFAULT_COLLECTION, DEFAULT_LIMIT};
