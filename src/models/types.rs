//! Core data types and type aliases
//!
//! These are the values threaded through the request pipeline:
//! overrides and defaults merge into [`EffectiveParameters`], which the
//! builder turns into a request descriptor, and the dispatched response ends
//! up in a [`ResponseEnvelope`] together with everything that produced it.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::fmt;
use std::path::PathBuf;

use crate::request::RequestDescriptor;

// =============================================================================
// TYPE ALIASES
// =============================================================================

/// Headers dictionary - lowercase header name to value, in insertion order
/// so signed requests go out exactly as they were signed.
pub type HeadersDict = IndexMap<String, String>;

// =============================================================================
// OUTPUT MODE
// =============================================================================

/// How the response is rendered on the terminal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputMode {
    /// Summary line, then each hit's identity and source
    #[default]
    Default,
    /// The whole response, pretty-printed
    Raw,
    /// Summary line, then a grid of the selected fields
    Table,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Default => "default",
            OutputMode::Raw => "raw",
            OutputMode::Table => "table",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Anything unrecognised in a hand-edited config renders with the default mode.
impl From<String> for OutputMode {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "raw" => OutputMode::Raw,
            "table" => OutputMode::Table,
            _ => OutputMode::Default,
        }
    }
}

impl From<OutputMode> for String {
    fn from(mode: OutputMode) -> Self {
        mode.as_str().to_string()
    }
}

// =============================================================================
// PARAMETERS
// =============================================================================

/// Per-invocation values supplied on the command line.
///
/// `None` (and `sign == false`) means "not supplied": the persisted default
/// is kept for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOverrides {
    pub method: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
    pub scheme: Option<String>,
    pub body: Option<String>,
    pub file: Option<PathBuf>,
    pub output: Option<OutputMode>,
    pub fields: Option<Vec<String>>,
    pub sign: bool,
}

/// Fully resolved request parameters after merging defaults with overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveParameters {
    pub method: String,
    pub host: String,
    pub scheme: String,
    pub path: String,
    pub body: Option<String>,
    pub file: Option<PathBuf>,
    pub output: OutputMode,
    pub fields: Option<Vec<String>>,
    pub sign: bool,
}

/// Split a comma-separated field list, dropping blanks.
///
/// Returns `None` when nothing usable remains, so an empty `--fields ""`
/// behaves like the flag was never given.
pub fn parse_field_list(raw: &str) -> Option<Vec<String>> {
    let fields: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(String::from)
        .collect();

    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Body of a dispatched response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Parsed JSON (the server declared a JSON content type)
    Json(JsonValue),
    /// Anything else, verbatim
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }
}

/// Everything the renderer needs: the parameters, the request that was sent,
/// and the response it produced.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub merged_args: EffectiveParameters,
    pub request_opts: RequestDescriptor,
    pub response: ResponseBody,
}
