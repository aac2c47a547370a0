//! lastic library interface
//!
//! A command-line client for Elasticsearch-style HTTP APIs: persisted
//! defaults, optional AWS SigV4 signing, and three response renderers.
//!
//! # Module Organization
//!
//! - [`config`] - Persisted defaults (ConfigStore, FileConfigStore)
//! - [`request`] - Argument merger and request builder
//! - [`auth`] - Credential provider chain and SigV4 signer
//! - [`client`] - HTTP dispatcher
//! - [`output`] - Result renderer and styling
//! - [`pipeline`] - merge, build, sign, dispatch in sequence
//! - [`errors`] - Error types (LasticError, Result)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - Main execution logic

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod logging;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod request;
pub mod status;
pub mod table;
