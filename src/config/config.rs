//! Persisted defaults
//!
//! The defaults live in a single JSON document (`~/.lastic.json` unless
//! `LASTIC_CONFIG` points elsewhere):
//!
//! ```json
//! {
//!     "defaults": {
//!         "method": "GET",
//!         "host": "localhost",
//!         "path": "",
//!         "scheme": "http",
//!         "body": null,
//!         "file": null,
//!         "output": "default",
//!         "fields": null,
//!         "aws4": false
//!     }
//! }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Deserializer, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::{LasticError, Result};
use crate::models::{parse_field_list, EffectiveParameters, InvocationOverrides, OutputMode};
use crate::request::merge;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV_VAR: &str = "LASTIC_CONFIG";

/// File name used in the home directory
pub const CONFIG_FILE_NAME: &str = ".lastic.json";

/// The persisted defaults record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredDefaults")]
pub struct DefaultsRecord {
    pub method: String,
    pub host: String,
    pub path: String,
    pub scheme: String,
    pub body: Option<String>,
    pub file: Option<PathBuf>,
    pub output: OutputMode,
    pub fields: Option<Vec<String>>,
    #[serde(rename = "aws4")]
    pub sign: bool,
}

/// On-disk shape of [`DefaultsRecord`]. Older files used `sign` for the
/// signing flag; when both keys are present `aws4` wins.
#[derive(Deserialize)]
#[serde(default)]
struct StoredDefaults {
    method: String,
    host: String,
    path: String,
    scheme: String,
    body: Option<String>,
    file: Option<PathBuf>,
    output: OutputMode,
    #[serde(deserialize_with = "deserialize_fields")]
    fields: Option<Vec<String>>,
    aws4: Option<bool>,
    sign: Option<bool>,
}

impl Default for StoredDefaults {
    fn default() -> Self {
        let builtins = DefaultsRecord::default();
        Self {
            method: builtins.method,
            host: builtins.host,
            path: builtins.path,
            scheme: builtins.scheme,
            body: builtins.body,
            file: builtins.file,
            output: builtins.output,
            fields: builtins.fields,
            aws4: None,
            sign: None,
        }
    }
}

impl From<StoredDefaults> for DefaultsRecord {
    fn from(stored: StoredDefaults) -> Self {
        Self {
            method: stored.method,
            host: stored.host,
            path: stored.path,
            scheme: stored.scheme,
            body: stored.body,
            file: stored.file,
            output: stored.output,
            fields: stored.fields,
            sign: stored.aws4.or(stored.sign).unwrap_or(false),
        }
    }
}

impl Default for DefaultsRecord {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            host: "localhost".to_string(),
            path: String::new(),
            scheme: "http".to_string(),
            body: None,
            file: None,
            output: OutputMode::Default,
            fields: None,
            sign: false,
        }
    }
}

impl From<EffectiveParameters> for DefaultsRecord {
    fn from(params: EffectiveParameters) -> Self {
        Self {
            method: params.method,
            host: params.host,
            path: params.path,
            scheme: params.scheme,
            body: params.body,
            file: params.file,
            output: params.output,
            fields: params.fields,
            sign: params.sign,
        }
    }
}

/// `fields` is accepted either as a list or as a comma-separated string
fn deserialize_fields<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFields {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match Option::<RawFields>::deserialize(deserializer)? {
        Some(RawFields::List(list)) => parse_field_list(&list.join(",")),
        Some(RawFields::Csv(csv)) => parse_field_list(&csv),
        None => None,
    })
}

/// Top-level shape of the config document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub defaults: DefaultsRecord,
}

// =============================================================================
// STORES
// =============================================================================

/// Key-value persistence for the defaults record
pub trait ConfigStore {
    /// Read the current defaults, creating them if the store is empty
    fn load(&self) -> Result<DefaultsRecord>;

    /// Replace the whole record
    fn save(&self, defaults: &DefaultsRecord) -> Result<()>;

    /// Human-readable location, for messages
    fn location(&self) -> String;
}

/// Defaults stored as a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$LASTIC_CONFIG`, else `~/.lastic.json`
    pub fn from_env() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return Ok(Self::new(PathBuf::from(path)));
        }

        dirs::home_dir()
            .map(|home| Self::new(home.join(CONFIG_FILE_NAME)))
            .ok_or_else(|| LasticError::Config("Could not determine home directory".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomically(&self, content: &[u8]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        std::fs::create_dir_all(&dir).map_err(|e| {
            LasticError::Config(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let mut temp = NamedTempFile::new_in(&dir)
            .map_err(|e| LasticError::Config(format!("Failed to create temp file: {}", e)))?;
        temp.write_all(content)
            .and_then(|_| temp.flush())
            .map_err(|e| LasticError::Config(format!("Failed to write config: {}", e)))?;
        temp.persist(&self.path)
            .map_err(|e| LasticError::Config(format!("Failed to replace {}: {}", self.path.display(), e)))?;

        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<DefaultsRecord> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "Config file missing, writing built-in defaults");
            let defaults = DefaultsRecord::default();
            self.save(&defaults)?;
            return Ok(defaults);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| LasticError::Config(format!("Failed to read {}: {}", self.path.display(), e)))?;

        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| LasticError::Config(format!("Invalid config JSON in {}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), "Loaded defaults");
        Ok(file.defaults)
    }

    fn save(&self, defaults: &DefaultsRecord) -> Result<()> {
        let document = ConfigFile { defaults: defaults.clone() };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document.serialize(&mut serializer)?;
        buf.push(b'\n');

        self.write_atomically(&buf)?;
        debug!(path = %self.path.display(), "Saved defaults");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store, used by tests and embedders
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    record: Mutex<DefaultsRecord>,
}

impl MemoryConfigStore {
    pub fn new(defaults: DefaultsRecord) -> Self {
        Self { record: Mutex::new(defaults) }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<DefaultsRecord> {
        Ok(self.record.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, defaults: &DefaultsRecord) -> Result<()> {
        *self.record.lock().unwrap_or_else(|e| e.into_inner()) = defaults.clone();
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Merge `overrides` onto the persisted defaults and write the result back
pub fn save_defaults(store: &dyn ConfigStore, overrides: &InvocationOverrides) -> Result<DefaultsRecord> {
    let current = store.load()?;
    let updated = DefaultsRecord::from(merge(&current, overrides)?);
    store.save(&updated)?;
    Ok(updated)
}

/// The persisted defaults, unmodified
pub fn show_defaults(store: &dyn ConfigStore) -> Result<DefaultsRecord> {
    store.load()
}
