//! Common types used throughout flowlink
//!
//! This module contains shared type definitions and type aliases
//! used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// GraphQL variables, keyed by variable name
pub type Variables = JsonObject;

// ============================================================================
// Picker Options
// ============================================================================

/// A single entry of a dropdown option list shown to the workflow author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropOption {
    /// Human-readable label
    pub label: String,
    /// Value submitted when the option is chosen
    pub value: String,
}

impl PropOption {
    /// Create a new option
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// Output Format
// ============================================================================

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Compact JSON
    #[default]
    Json,
    /// Indented JSON
    Pretty,
}

impl OutputFormat {
    /// Render a serializable value in this format
    pub fn render<T: Serialize>(self, value: &T) -> serde_json::Result<String> {
        match self {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
        }
    }
}
