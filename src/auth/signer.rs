//! Optional SigV4 signing of a request descriptor

use tracing::debug;

use super::aws::{resolve_scope, sha256_hex, sign_request};
use super::credentials::CredentialsChain;
use crate::errors::Result;
use crate::models::EffectiveParameters;
use crate::request::RequestDescriptor;

/// Signs descriptors when the effective parameters ask for it
#[derive(Debug, Clone)]
pub struct Signer {
    chain: CredentialsChain,
    region: Option<String>,
    service: Option<String>,
}

impl Signer {
    pub fn new(chain: CredentialsChain, region: Option<String>, service: Option<String>) -> Self {
        Self {
            chain,
            region: region.filter(|r| !r.is_empty()),
            service: service.filter(|s| !s.is_empty()),
        }
    }

    /// Identity when `params.sign` is false. Otherwise resolves credentials
    /// and returns a copy of `descriptor` carrying the signature headers.
    /// Nothing is returned until signing has fully succeeded or failed.
    pub async fn maybe_sign(
        &self,
        descriptor: RequestDescriptor,
        params: &EffectiveParameters,
    ) -> Result<RequestDescriptor> {
        if !params.sign {
            return Ok(descriptor);
        }

        let credentials = self.chain.resolve().await?;

        let vars = self.chain.vars();
        let env_region = vars
            .get("AWS_REGION")
            .or_else(|| vars.get("AWS_DEFAULT_REGION"))
            .map(String::from)
            .or_else(|| self.chain.profile_region());
        let scope = resolve_scope(
            &descriptor.host,
            self.region.as_deref(),
            self.service.as_deref(),
            env_region.as_deref(),
        );
        debug!(region = %scope.region, service = %scope.service, "Signing request");

        let body = descriptor.body.as_deref().map(str::as_bytes);
        let content_sha = sha256_hex(body.unwrap_or_default());
        let signed = sign_request(
            &credentials,
            &scope,
            &descriptor.method,
            &descriptor.uri,
            &descriptor.headers,
            body,
        )?;

        let mut descriptor = descriptor;
        for (name, value) in signed {
            descriptor.headers.insert(name.to_ascii_lowercase(), value);
        }
        descriptor
            .headers
            .insert("x-amz-content-sha256".to_string(), content_sha);

        Ok(descriptor)
    }
}
