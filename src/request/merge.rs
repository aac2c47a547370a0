//! Argument merger
//!
//! Shallow-merges per-invocation overrides onto the persisted defaults. A
//! supplied override wins; an absent, empty, or `false` one keeps the default.

use std::path::PathBuf;

use tracing::debug;

use crate::config::DefaultsRecord;
use crate::errors::{LasticError, Result};
use crate::models::{EffectiveParameters, InvocationOverrides};

/// Combine `defaults` and `overrides` into the effective parameter set.
///
/// Fails with [`LasticError::InvalidInput`] when the result has no method,
/// host or scheme to send to (only possible with a hand-edited config).
pub fn merge(defaults: &DefaultsRecord, overrides: &InvocationOverrides) -> Result<EffectiveParameters> {
    let mut merged = EffectiveParameters {
        method: defaults.method.clone(),
        host: defaults.host.clone(),
        scheme: defaults.scheme.clone(),
        path: defaults.path.clone(),
        body: defaults.body.clone(),
        file: defaults.file.clone(),
        output: defaults.output,
        fields: defaults.fields.clone(),
        sign: defaults.sign,
    };

    if let Some(method) = supplied(&overrides.method) {
        merged.method = method.to_string();
    }
    if let Some(host) = supplied(&overrides.host) {
        merged.host = host.to_string();
    }
    if let Some(scheme) = supplied(&overrides.scheme) {
        merged.scheme = scheme.to_string();
    }
    if let Some(path) = supplied(&overrides.path) {
        merged.path = path.to_string();
    }
    if let Some(body) = supplied(&overrides.body) {
        merged.body = Some(body.to_string());
    }
    if let Some(file) = supplied_path(&overrides.file) {
        merged.file = Some(file.clone());
    }
    if let Some(output) = overrides.output {
        merged.output = output;
    }
    if let Some(fields) = overrides.fields.as_ref().filter(|f| !f.is_empty()) {
        merged.fields = Some(fields.clone());
    }
    if overrides.sign {
        merged.sign = true;
    }

    validate(&merged)?;

    debug!(
        method = %merged.method,
        host = %merged.host,
        scheme = %merged.scheme,
        path = %merged.path,
        has_body = merged.body.is_some(),
        file = ?merged.file,
        output = %merged.output,
        sign = merged.sign,
        "Merged parameters"
    );

    Ok(merged)
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn supplied_path(value: &Option<PathBuf>) -> Option<&PathBuf> {
    value.as_ref().filter(|p| !p.as_os_str().is_empty())
}

fn validate(params: &EffectiveParameters) -> Result<()> {
    for (name, value) in [
        ("method", &params.method),
        ("host", &params.host),
        ("scheme", &params.scheme),
    ] {
        if value.trim().is_empty() {
            return Err(LasticError::InvalidInput(format!(
                "no {} configured; pass one on the command line or fix the saved defaults",
                name
            )));
        }
    }
    Ok(())
}
