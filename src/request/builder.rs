//! Request descriptor builder
//!
//! Builds the transport-ready description of the one HTTP request an
//! invocation sends. No network I/O happens here; the only side effect is
//! reading the body file when no inline body was given.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{LasticError, Result};
use crate::models::{EffectiveParameters, HeadersDict};

pub const USER_AGENT_STRING: &str = concat!("lastic/", env!("CARGO_PKG_VERSION"));

const JSON_MIME: &str = "application/json";

/// A fully formed request, ready to sign and send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: String,
    pub scheme: String,
    pub host: String,
    pub path: String,
    /// `scheme://host/path`, unescaped and unvalidated
    pub uri: String,
    /// Lowercase header names
    pub headers: HeadersDict,
    pub body: Option<String>,
}

/// Build the request descriptor for `params`.
///
/// Body precedence: a non-empty inline body, else the contents of `file`,
/// else no body. The file is never touched when an inline body is present.
pub fn build(params: &EffectiveParameters) -> Result<RequestDescriptor> {
    let method = params.method.trim().to_ascii_uppercase();
    let uri = format!("{}://{}{}", params.scheme, params.host, params.path);
    let body = resolve_body(params)?;

    let mut headers = HeadersDict::new();
    headers.insert("user-agent".to_string(), USER_AGENT_STRING.to_string());
    headers.insert("accept".to_string(), JSON_MIME.to_string());
    if body.is_some() {
        headers.insert("content-type".to_string(), JSON_MIME.to_string());
    }

    Ok(RequestDescriptor {
        method,
        scheme: params.scheme.clone(),
        host: params.host.clone(),
        path: params.path.clone(),
        uri,
        headers,
        body,
    })
}

fn resolve_body(params: &EffectiveParameters) -> Result<Option<String>> {
    if let Some(body) = params.body.as_ref().filter(|b| !b.is_empty()) {
        return Ok(Some(body.clone()));
    }

    let Some(file) = params.file.as_ref() else {
        return Ok(None);
    };

    let path = expand_home(file);
    let content = fs::read_to_string(&path).map_err(|source| LasticError::FileRead {
        path: path.clone(),
        source,
    })?;

    // An empty file means no body, same as not passing one
    Ok(Some(content).filter(|c| !c.is_empty()))
}

/// Expand a leading `~/` (saved defaults are not shell-expanded)
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
