//! AWS Signature Version 4 primitives
//!
//! Signs a request descriptor's method, URI, headers and body with SigV4 and
//! works out the signing scope (region and service) for a host.

use std::fmt;
use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;

use crate::errors::{LasticError, Result};
use crate::models::HeadersDict;

pub const DEFAULT_REGION: &str = "us-east-1";

/// Elasticsearch domains are what this tool talks to
pub const DEFAULT_SERVICE: &str = "es";

/// Resolved AWS credentials
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Session token for temporary credentials
    pub session_token: Option<String>,
}

impl AwsCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.filter(|t| !t.is_empty()),
        }
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("session_token", &self.session_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Region and service the signature is scoped to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningScope {
    pub region: String,
    pub service: String,
}

/// Infer `(service, region)` from an `*.amazonaws.com` host name.
///
/// `lambda.us-east-1.amazonaws.com` gives `(lambda, us-east-1)`. Elasticsearch
/// and OpenSearch Serverless endpoints put the region first
/// (`search-logs-abc123.us-east-1.es.amazonaws.com`), so those are swapped.
/// A trailing `:port` is ignored.
pub fn infer_scope_from_host(host: &str) -> (Option<String>, Option<String>) {
    let host = match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    };
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let Some(rest) = host
        .strip_suffix(".amazonaws.com.cn")
        .or_else(|| host.strip_suffix(".amazonaws.com"))
    else {
        return (None, None);
    };

    let labels: Vec<&str> = rest.split('.').collect();
    let (mut first, mut second) = match labels.as_slice() {
        [.., a, b] => (*a, *b),
        [only] => (*only, ""),
        [] => return (None, None),
    };

    if second == "es" || second == "aoss" {
        std::mem::swap(&mut first, &mut second);
    }

    let non_empty = |s: &str| Some(s.to_string()).filter(|s| !s.is_empty());
    (non_empty(first), non_empty(second))
}

/// Pick the signing scope.
///
/// Region: explicit, else inferred from the host, else the environment
/// region, else `us-east-1`. Service: explicit, else inferred, else `es`.
pub fn resolve_scope(
    host: &str,
    region: Option<&str>,
    service: Option<&str>,
    env_region: Option<&str>,
) -> SigningScope {
    let (inferred_service, inferred_region) = infer_scope_from_host(host);

    let region = region
        .map(String::from)
        .or(inferred_region)
        .or_else(|| env_region.map(String::from))
        .unwrap_or_else(|| DEFAULT_REGION.to_string());

    let service = service
        .map(String::from)
        .or(inferred_service)
        .unwrap_or_else(|| DEFAULT_SERVICE.to_string());

    SigningScope { region, service }
}

/// Sign a request with AWS SigV4.
///
/// Returns the headers to add to the request: `authorization`, `x-amz-date`,
/// `x-amz-security-token` for temporary credentials, and the `host` value
/// that was signed so the transport sends exactly that.
pub fn sign_request(
    credentials: &AwsCredentials,
    scope: &SigningScope,
    method: &str,
    url: &str,
    headers: &HeadersDict,
    body: Option<&[u8]>,
) -> Result<Vec<(String, String)>> {
    let parsed_url = url::Url::parse(url)
        .map_err(|e| LasticError::Signing(format!("Invalid URL '{}': {}", url, e)))?;

    let uri = format!(
        "{}{}",
        parsed_url.path(),
        parsed_url.query().map(|q| format!("?{}", q)).unwrap_or_default()
    );

    let identity = Credentials::new(
        &credentials.access_key_id,
        &credentials.secret_access_key,
        credentials.session_token.clone(),
        None,
        "lastic",
    )
    .into();

    let signing_params = v4::SigningParams::builder()
        .identity(&identity)
        .region(&scope.region)
        .name(&scope.service)
        .time(SystemTime::now())
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| LasticError::Signing(format!("Failed to build signing params: {}", e)))?;

    let signable_body = match body {
        Some(bytes) if !bytes.is_empty() => SignableBody::Bytes(bytes),
        _ => SignableBody::empty(),
    };

    let mut header_map = http::HeaderMap::new();
    for (name, value) in headers {
        let name = http::header::HeaderName::try_from(name.as_str())
            .map_err(|e| LasticError::Signing(format!("Invalid header name '{}': {}", name, e)))?;
        let value = http::header::HeaderValue::from_str(value)
            .map_err(|e| LasticError::Signing(format!("Invalid value for header '{}': {}", name, e)))?;
        header_map.insert(name, value);
    }

    // The Host header must match what the transport will send
    let computed_host = match (parsed_url.host_str(), parsed_url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    if !computed_host.is_empty() {
        let value = http::header::HeaderValue::from_str(&computed_host)
            .map_err(|e| LasticError::Signing(format!("Invalid host '{}': {}", computed_host, e)))?;
        header_map.insert(http::header::HOST, value);
    }

    let signable_request = SignableRequest::new(
        method,
        &uri,
        header_map.iter().map(|(k, v)| (k.as_str(), v.to_str().unwrap_or(""))),
        signable_body,
    )
    .map_err(|e| LasticError::Signing(format!("Failed to create signable request: {}", e)))?;

    let signing_output = sign(signable_request, &signing_params.into())
        .map_err(|e| LasticError::Signing(format!("Failed to sign request: {}", e)))?;

    let (signing_instructions, _signature) = signing_output.into_parts();
    let mut auth_headers: Vec<(String, String)> = signing_instructions
        .headers()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    if !computed_host.is_empty() && !auth_headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("host")) {
        auth_headers.push(("host".to_string(), computed_host));
    }

    Ok(auth_headers)
}

/// Compute SHA256 hash of data (for x-amz-content-sha256 header)
pub fn sha256_hex(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
