//! Exit status codes for the CLI
//!
//! - 0: the request was dispatched and its response rendered (whatever the HTTP status)
//! - 1: any failure in the pipeline, after the error block has been printed

use std::process::{ExitCode, Termination};

/// Exit status codes following standard Unix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// Successful execution
    Success = 0,
    /// Any error (file read, credentials, transport, timeout, config)
    Error = 1,
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}
