//! AWS shared configuration file parser
//!
//! Reads `~/.aws/credentials` and `~/.aws/config` (or the files named by
//! `AWS_SHARED_CREDENTIALS_FILE` / `AWS_CONFIG_FILE`) to find a profile's
//! static keys, region, or `credential_process` command.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{LasticError, Result};

/// AWS profile configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AwsProfile {
    /// Profile name
    pub name: String,

    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,

    pub region: Option<String>,

    /// External command printing credentials as JSON
    pub credential_process: Option<String>,
}

impl std::fmt::Debug for AwsProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsProfile")
            .field("name", &self.name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "[REDACTED]"))
            .field("session_token", &self.session_token.as_ref().map(|_| "[REDACTED]"))
            .field("region", &self.region)
            .field("credential_process", &self.credential_process)
            .finish()
    }
}

impl AwsProfile {
    fn fill_from(&mut self, other: &AwsProfile) {
        if self.access_key_id.is_none() {
            self.access_key_id = other.access_key_id.clone();
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = other.secret_access_key.clone();
        }
        if self.session_token.is_none() {
            self.session_token = other.session_token.clone();
        }
        if other.region.is_some() {
            self.region = other.region.clone();
        }
        if other.credential_process.is_some() {
            self.credential_process = other.credential_process.clone();
        }
    }
}

/// Locations of the two shared files
#[derive(Debug, Clone, Default)]
pub struct SharedFiles {
    pub credentials: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Load a profile by name.
///
/// The credentials file is read first; the config file can add a region or
/// a `credential_process`, and fills in keys the credentials file lacks.
/// Returns `Ok(None)` when neither file mentions the profile.
pub fn load_profile(name: &str, files: &SharedFiles) -> Result<Option<AwsProfile>> {
    let credentials = match files.credentials.as_deref() {
        Some(path) => parse_file(path, false)?,
        None => HashMap::new(),
    };
    let config = match files.config.as_deref() {
        Some(path) => parse_file(path, true)?,
        None => HashMap::new(),
    };

    let mut profile = match credentials.get(name) {
        Some(profile) => profile.clone(),
        None if config.contains_key(name) => AwsProfile {
            name: name.to_string(),
            ..Default::default()
        },
        None => return Ok(None),
    };

    if let Some(cfg) = config.get(name) {
        profile.fill_from(cfg);
    }

    Ok(Some(profile))
}

fn parse_file(path: &Path, is_config_file: bool) -> Result<HashMap<String, AwsProfile>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        LasticError::CredentialResolution(format!("Failed to read {}: {}", path.display(), e))
    })?;

    Ok(parse_ini_file(&content, is_config_file))
}

/// Parse an INI-format AWS configuration file
///
/// In the config file, profile sections are prefixed with "profile " (except default).
/// In the credentials file, sections are just the profile name.
fn parse_ini_file(content: &str, is_config_file: bool) -> HashMap<String, AwsProfile> {
    let mut profiles: HashMap<String, AwsProfile> = HashMap::new();
    let mut current_profile: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let section = section.trim();

            let profile_name = if !is_config_file || section == "default" {
                Some(section.to_string())
            } else {
                section.strip_prefix("profile ").map(|name| name.trim().to_string())
            };

            current_profile = profile_name.clone();
            if let Some(name) = profile_name {
                profiles.entry(name.clone()).or_insert_with(|| AwsProfile {
                    name,
                    ..Default::default()
                });
            }
            continue;
        }

        let Some(profile) = current_profile.as_ref().and_then(|name| profiles.get_mut(name)) else {
            continue;
        };

        if let Some((key, value)) = line.split_once('=') {
            set_profile_field(profile, &key.trim().to_lowercase(), value.trim());
        }
    }

    profiles
}

/// Set a profile field based on key name
fn set_profile_field(profile: &mut AwsProfile, key: &str, value: &str) {
    let value = Some(value.to_string());
    match key {
        "aws_access_key_id" => profile.access_key_id = value,
        "aws_secret_access_key" => profile.secret_access_key = value,
        "aws_session_token" | "aws_security_token" => profile.session_token = value,
        "region" => profile.region = value,
        "credential_process" => profile.credential_process = value,
        _ => {}
    }
}
