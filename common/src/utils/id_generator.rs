//! Run identifier generator.

use uuid::Uuid;

/// Generates identifiers used to correlate log lines.
pub struct IdGenerator;

impl IdGenerator {
    /// Generates a short run ID (first 8 characters of a UUID).
    pub fn run_id() -> String {
        Uuid::new_v4().to_string()[..8].to_string()
    }
}
