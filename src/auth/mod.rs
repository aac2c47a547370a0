//! Request signing
//!
//! AWS Signature Version 4 over credentials found by the standard provider
//! chain (environment, shared files, container endpoint, instance metadata).

pub mod aws;
pub mod aws_config;
pub mod credentials;
pub mod signer;

pub use aws::{sha256_hex, sign_request, AwsCredentials, SigningScope};
pub use credentials::{CredentialProvider, CredentialsChain, EnvVars};
pub use signer::Signer;
