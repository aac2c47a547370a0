//! Request pipeline
//!
//! merge -> build -> sign -> dispatch, strictly in sequence. Each stage
//! either hands its output to the next or aborts the whole invocation.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::auth::Signer;
use crate::client::Dispatcher;
use crate::config::ConfigStore;
use crate::errors::{LasticError, Result};
use crate::models::{InvocationOverrides, ResponseEnvelope};
use crate::request::{build, merge};

/// Run one request from persisted defaults plus `overrides`
pub async fn execute(
    store: &dyn ConfigStore,
    overrides: &InvocationOverrides,
    signer: &Signer,
    dispatcher: &Dispatcher,
) -> Result<ResponseEnvelope> {
    let defaults = store.load()?;
    debug!(location = %store.location(), "Loaded defaults");

    let params = merge(&defaults, overrides)?;
    let descriptor = build(&params)?;
    let descriptor = signer.maybe_sign(descriptor, &params).await?;
    let response = dispatcher.send(&descriptor).await?;

    Ok(ResponseEnvelope {
        merged_args: params,
        request_opts: descriptor,
        response,
    })
}

/// Bound `future` by an overall deadline
pub async fn with_deadline<T>(
    timeout: Option<Duration>,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, future)
            .await
            .map_err(|_| LasticError::Timeout(limit.as_secs_f64()))?,
        None => future.await,
    }
}
