//! Utility functions and helpers.

pub mod connection_string;
pub mod id_generator;

// Re-export commonly used types
pub use connection_string::{host_from_uri, redact};
pub use id_generator::IdGenerator;
