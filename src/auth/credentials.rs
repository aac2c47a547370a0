//! AWS credential provider chain
//!
//! Providers are tried in a fixed order and the first one that yields
//! credentials wins:
//!
//! 1. Environment variables (`AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`, the
//!    `AMAZON_` prefixed pair, and the legacy `AWS_ACCESS_KEY`/`AWS_SECRET_KEY`)
//! 2. Shared files (`~/.aws/credentials`, `~/.aws/config`), static keys or
//!    `credential_process`
//! 3. Container credentials endpoint (ECS / EKS pod identity)
//! 4. EC2 instance metadata (IMDSv2)

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use super::aws::AwsCredentials;
use super::aws_config::{load_profile, SharedFiles};
use crate::errors::{LasticError, Result};

const CONTAINER_HOST: &str = "http://169.254.170.2";
const IMDS_ENDPOINT: &str = "http://169.254.169.254";
const IMDS_TOKEN_TTL_SECONDS: &str = "21600";
const METADATA_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Snapshot of the environment variables the chain looks at.
///
/// Captured once so resolution is deterministic and tests never have to
/// mutate the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Value of `key`, treating empty values as unset
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.get("HOME").map(PathBuf::from).or_else(dirs::home_dir)
    }
}

/// One source of credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialProvider {
    Environment,
    SharedFiles,
    Container,
    InstanceMetadata,
}

impl CredentialProvider {
    pub fn name(&self) -> &'static str {
        match self {
            CredentialProvider::Environment => "environment",
            CredentialProvider::SharedFiles => "shared config files",
            CredentialProvider::Container => "container endpoint",
            CredentialProvider::InstanceMetadata => "instance metadata",
        }
    }

    /// `Ok(None)` means the provider is not configured here; `Err` means it
    /// is configured but failed.
    async fn load(&self, chain: &CredentialsChain) -> Result<Option<AwsCredentials>> {
        match self {
            CredentialProvider::Environment => Ok(from_env_vars(&chain.vars)),
            CredentialProvider::SharedFiles => from_shared_files(chain).await,
            CredentialProvider::Container => from_container(chain).await,
            CredentialProvider::InstanceMetadata => from_instance_metadata(chain).await,
        }
    }
}

/// Ordered list of providers plus what they need to run
#[derive(Debug, Clone)]
pub struct CredentialsChain {
    providers: Vec<CredentialProvider>,
    vars: EnvVars,
    profile: Option<String>,
    client: reqwest::Client,
}

impl CredentialsChain {
    pub const DEFAULT_ORDER: [CredentialProvider; 4] = [
        CredentialProvider::Environment,
        CredentialProvider::SharedFiles,
        CredentialProvider::Container,
        CredentialProvider::InstanceMetadata,
    ];

    /// The standard chain over the given environment
    pub fn new(vars: EnvVars, profile: Option<String>) -> Result<Self> {
        Self::with_providers(Self::DEFAULT_ORDER.to_vec(), vars, profile)
    }

    pub fn with_providers(
        providers: Vec<CredentialProvider>,
        vars: EnvVars,
        profile: Option<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(METADATA_CONNECT_TIMEOUT)
            .timeout(METADATA_TIMEOUT)
            .no_proxy()
            .build()
            .map_err(|e| LasticError::Transport(format!("Failed to build metadata client: {}", e)))?;

        Ok(Self {
            providers,
            vars,
            profile: profile.filter(|p| !p.is_empty()),
            client,
        })
    }

    pub fn vars(&self) -> &EnvVars {
        &self.vars
    }

    /// Profile for the shared-files provider: explicit, `AWS_PROFILE`,
    /// `AWS_DEFAULT_PROFILE`, then `default`
    pub fn profile_name(&self) -> String {
        self.selected_profile().unwrap_or_else(|| "default".to_string())
    }

    /// A profile named by `--profile` or the environment, as opposed to the
    /// implicit `default`
    fn selected_profile(&self) -> Option<String> {
        self.profile
            .clone()
            .or_else(|| self.vars.get("AWS_PROFILE").map(String::from))
            .or_else(|| self.vars.get("AWS_DEFAULT_PROFILE").map(String::from))
    }

    fn shared_files(&self) -> SharedFiles {
        let aws_dir = self.vars.home_dir().map(|home| home.join(".aws"));
        SharedFiles {
            credentials: self
                .vars
                .get("AWS_SHARED_CREDENTIALS_FILE")
                .map(PathBuf::from)
                .or_else(|| aws_dir.as_ref().map(|d| d.join("credentials"))),
            config: self
                .vars
                .get("AWS_CONFIG_FILE")
                .map(PathBuf::from)
                .or_else(|| aws_dir.as_ref().map(|d| d.join("config"))),
        }
    }

    /// Region configured for the active profile, if any
    pub fn profile_region(&self) -> Option<String> {
        load_profile(&self.profile_name(), &self.shared_files())
            .ok()
            .flatten()
            .and_then(|p| p.region)
    }

    /// Walk the providers in order and return the first credentials found
    pub async fn resolve(&self) -> Result<AwsCredentials> {
        let mut declined = Vec::new();

        for provider in &self.providers {
            match provider.load(self).await {
                Ok(Some(credentials)) => {
                    info!(provider = provider.name(), access_key_id = %credentials.access_key_id, "Resolved AWS credentials");
                    return Ok(credentials);
                }
                Ok(None) => {
                    debug!(provider = provider.name(), "Credential provider not configured");
                    declined.push(format!("{}: not configured", provider.name()));
                }
                // A named profile that cannot be used stops the chain
                Err(e) if *provider == CredentialProvider::SharedFiles && self.selected_profile().is_some() => {
                    return Err(e);
                }
                Err(e) => {
                    debug!(provider = provider.name(), error = %e, "Credential provider failed");
                    declined.push(format!("{}: {}", provider.name(), e));
                }
            }
        }

        Err(LasticError::CredentialResolution(format!(
            "no provider returned credentials ({})",
            declined.join("; ")
        )))
    }
}

// =============================================================================
// PROVIDERS
// =============================================================================

fn from_env_vars(vars: &EnvVars) -> Option<AwsCredentials> {
    const KEY_SETS: [(&str, &str, &str); 3] = [
        ("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_SESSION_TOKEN"),
        ("AMAZON_ACCESS_KEY_ID", "AMAZON_SECRET_ACCESS_KEY", "AMAZON_SESSION_TOKEN"),
        ("AWS_ACCESS_KEY", "AWS_SECRET_KEY", "AWS_SESSION_TOKEN"),
    ];

    KEY_SETS.iter().find_map(|(id, secret, token)| {
        Some(AwsCredentials::new(
            vars.get(id)?,
            vars.get(secret)?,
            vars.get(token).map(String::from),
        ))
    })
}

async fn from_shared_files(chain: &CredentialsChain) -> Result<Option<AwsCredentials>> {
    let name = chain.profile_name();
    let Some(profile) = load_profile(&name, &chain.shared_files())? else {
        if chain.selected_profile().is_some() {
            return Err(LasticError::CredentialResolution(format!(
                "profile '{}' not found in shared config files",
                name
            )));
        }
        return Ok(None);
    };

    if let (Some(id), Some(secret)) = (&profile.access_key_id, &profile.secret_access_key) {
        return Ok(Some(AwsCredentials::new(id, secret, profile.session_token.clone())));
    }

    match profile.credential_process.as_deref() {
        Some(command) => run_credential_process(command).await.map(Some),
        None => Err(LasticError::CredentialResolution(format!(
            "profile '{}' has no keys or credential_process",
            name
        ))),
    }
}

async fn run_credential_process(command: &str) -> Result<AwsCredentials> {
    let output = if cfg!(target_os = "windows") {
        tokio::process::Command::new("cmd").args(["/C", command]).output().await
    } else {
        tokio::process::Command::new("sh").args(["-c", command]).output().await
    }
    .map_err(|e| LasticError::CredentialResolution(format!("Failed to run credential_process: {}", e)))?;

    if !output.status.success() {
        return Err(LasticError::CredentialResolution(format!(
            "credential_process failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let json: JsonValue = serde_json::from_slice(&output.stdout).map_err(|e| {
        LasticError::CredentialResolution(format!("Failed to parse credential_process output: {}", e))
    })?;

    credentials_from_json(&json).ok_or_else(|| {
        LasticError::CredentialResolution("credential_process output missing AccessKeyId/SecretAccessKey".to_string())
    })
}

async fn from_container(chain: &CredentialsChain) -> Result<Option<AwsCredentials>> {
    let vars = &chain.vars;
    let url = match (
        vars.get("AWS_CONTAINER_CREDENTIALS_RELATIVE_URI"),
        vars.get("AWS_CONTAINER_CREDENTIALS_FULL_URI"),
    ) {
        (Some(relative), _) => format!("{}{}", CONTAINER_HOST, relative),
        (None, Some(full)) => full.to_string(),
        (None, None) => return Ok(None),
    };

    let mut request = chain.client.get(&url);
    if let Some(token) = vars.get("AWS_CONTAINER_AUTHORIZATION_TOKEN") {
        request = request.header(reqwest::header::AUTHORIZATION, token);
    }

    let json = fetch_json(request, "container endpoint").await?;
    credentials_from_json(&json).map(Some).ok_or_else(|| {
        LasticError::CredentialResolution("container endpoint response missing credentials".to_string())
    })
}

async fn from_instance_metadata(chain: &CredentialsChain) -> Result<Option<AwsCredentials>> {
    let vars = &chain.vars;
    if vars
        .get("AWS_EC2_METADATA_DISABLED")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    {
        return Ok(None);
    }

    let endpoint = vars
        .get("AWS_EC2_METADATA_SERVICE_ENDPOINT")
        .unwrap_or(IMDS_ENDPOINT)
        .trim_end_matches('/')
        .to_string();

    let token = chain
        .client
        .put(format!("{}/latest/api/token", endpoint))
        .header("x-aws-ec2-metadata-token-ttl-seconds", IMDS_TOKEN_TTL_SECONDS)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| LasticError::CredentialResolution(format!("metadata token request failed: {}", e)))?
        .text()
        .await
        .map_err(|e| LasticError::CredentialResolution(format!("metadata token unreadable: {}", e)))?;

    let roles_url = format!("{}/latest/meta-data/iam/security-credentials/", endpoint);
    let roles = chain
        .client
        .get(&roles_url)
        .header("x-aws-ec2-metadata-token", token.trim())
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| LasticError::CredentialResolution(format!("no instance role: {}", e)))?
        .text()
        .await
        .map_err(|e| LasticError::CredentialResolution(format!("instance role unreadable: {}", e)))?;

    let Some(role) = roles.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return Err(LasticError::CredentialResolution("instance has no IAM role attached".to_string()));
    };

    let request = chain
        .client
        .get(format!("{}{}", roles_url, role))
        .header("x-aws-ec2-metadata-token", token.trim());
    let json = fetch_json(request, "instance metadata").await?;

    credentials_from_json(&json).map(Some).ok_or_else(|| {
        LasticError::CredentialResolution("instance metadata response missing credentials".to_string())
    })
}

async fn fetch_json(request: reqwest::RequestBuilder, source: &str) -> Result<JsonValue> {
    request
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| LasticError::CredentialResolution(format!("{} request failed: {}", source, e)))?
        .json::<JsonValue>()
        .await
        .map_err(|e| LasticError::CredentialResolution(format!("{} returned invalid JSON: {}", source, e)))
}

/// Credentials in the shape shared by credential_process, container and
/// instance metadata responses
fn credentials_from_json(json: &JsonValue) -> Option<AwsCredentials> {
    let id = json.get("AccessKeyId")?.as_str()?;
    let secret = json.get("SecretAccessKey")?.as_str()?;
    let token = json
        .get("Token")
        .or_else(|| json.get("SessionToken"))
        .and_then(JsonValue::as_str)
        .map(String::from);

    Some(AwsCredentials::new(id, secret, token))
}
