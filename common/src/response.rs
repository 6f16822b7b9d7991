//! Response envelope types.
//!
//! Every user-facing operation returns a [`ResponseEnvelope`], success or not.
//! Callers tell the two apart by the `isError` flag only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Content type used for plain text items.
pub const TEXT_CONTENT: &str = "text";

/// One item of envelope content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Content type (always `"text"` for now).
    #[serde(rename = "type")]
    pub kind: String,

    /// Human-readable text.
    pub text: String,
}

impl ContentItem {
    /// Creates a text content item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: TEXT_CONTENT.to_string(),
            text: text.into(),
        }
    }
}

/// Uniform success/error response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    /// Ordered content items.
    pub content: Vec<ContentItem>,

    /// Set on failure; omitted from output on success.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,

    /// Echoed (redacted) configuration, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl ResponseEnvelope {
    /// Builds an envelope holding a single text item.
    pub fn new(text: impl Into<String>, is_error: bool) -> Self {
        Self {
            content: vec![ContentItem::text(text)],
            is_error,
            config: None,
        }
    }

    /// Creates a success envelope.
    pub fn ok(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    /// Creates an error envelope.
    pub fn err(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// Attaches an echoed configuration.
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    /// All text items joined by newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
