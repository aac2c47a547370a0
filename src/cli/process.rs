//! Post-processing of parsed arguments
//!
//! Turns the parsed flags into [`InvocationOverrides`] for the merger.

use std::time::Duration;

use crate::cli::args::Cli;
use crate::models::{parse_field_list, InvocationOverrides};

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|v| v.trim()).filter(|v| !v.is_empty()).map(String::from)
}

/// Overrides supplied on this command line.
///
/// `get` and `post` set the method, taking precedence over `-X`.
pub fn process_args(cli: &Cli) -> InvocationOverrides {
    let request = &cli.request;

    let method = cli
        .command
        .and_then(|c| c.method())
        .map(String::from)
        .or_else(|| non_empty(&request.method));

    InvocationOverrides {
        method,
        host: non_empty(&request.host),
        path: request.path.clone().filter(|p| !p.is_empty()),
        scheme: non_empty(&request.scheme),
        body: request.body.clone().filter(|b| !b.is_empty()),
        file: request.file.clone().filter(|f| !f.as_os_str().is_empty()),
        output: request.output,
        fields: request.fields.as_deref().and_then(parse_field_list),
        sign: request.aws4,
    }
}

/// The overall deadline, or `None` when disabled with a non-positive value
pub fn deadline(cli: &Cli) -> Option<Duration> {
    let secs = cli.request.timeout;
    if secs.is_finite() && secs > 0.0 {
        Some(Duration::from_secs_f64(secs))
    } else {
        None
    }
}
