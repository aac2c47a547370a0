//! HTTP dispatch
//!
//! Sends one request descriptor with reqwest and captures the response body.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::errors::{LasticError, Result};
use crate::models::ResponseBody;
use crate::request::{RequestDescriptor, USER_AGENT_STRING};

/// Sends request descriptors over HTTP(S)
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
}

impl Dispatcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }

    /// Issue exactly one request and wait for the full response.
    ///
    /// Any HTTP status counts as a successful dispatch; error payloads are
    /// rendered like any other body.
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<ResponseBody> {
        let method = Method::from_bytes(descriptor.method.as_bytes())
            .map_err(|_| LasticError::Transport(format!("Invalid HTTP method: {}", descriptor.method)))?;

        let url = Url::parse(&descriptor.uri)
            .map_err(|e| LasticError::Transport(format!("Invalid URL '{}': {}", descriptor.uri, e)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &descriptor.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| LasticError::Transport(format!("Invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| LasticError::Transport(format!("Invalid value for header '{}': {}", name, e)))?;
            headers.insert(name, value);
        }

        info!(method = %method, url = %url, "Sending request");

        let mut request = self.client.request(method, url).headers(headers);
        if let Some(body) = &descriptor.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            warn!(status = status.as_u16(), "Server returned an error status");
        } else {
            debug!(status = status.as_u16(), "Received response");
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);

        let text = response.text().await?;
        Ok(parse_body(text, is_json))
    }
}

fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT_STRING);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| LasticError::Transport(format!("Failed to build HTTP client: {}", e)))
}

/// `application/json` and any `+json` structured suffix
pub fn is_json_content_type(content_type: &str) -> bool {
    match content_type.parse::<mime::Mime>() {
        Ok(mime) => mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON),
        Err(_) => false,
    }
}

fn parse_body(text: String, is_json: bool) -> ResponseBody {
    if !is_json {
        return ResponseBody::Text(text);
    }

    match serde_json::from_str::<JsonValue>(&text) {
        Ok(value) => ResponseBody::Json(value),
        Err(e) => {
            debug!(error = %e, "Response declared JSON but did not parse, keeping text");
            ResponseBody::Text(text)
        }
    }
}
