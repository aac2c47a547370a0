//! CLI argument parsing and processing

pub mod args;
pub mod process;

// Re-exports
pub use args::{Cli, Command, LogFormat, RequestArgs, Shell};
pub use process::{deadline, process_args};
