//! CLI argument definitions using clap
//!
//! `-h` is the host, so clap's automatic help flag is disabled everywhere
//! and replaced with a long-only `--help`.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::OutputMode;

/// Default overall deadline for one invocation, in seconds
pub const DEFAULT_TIMEOUT_SECS: f64 = 60.0;

const AFTER_HELP: &str = "\
Examples:
  lastic get -p /users/user/1
  lastic post -p /users/user/_search -f ~/query.json
  lastic save-defaults -h search-logs.us-east-1.es.amazonaws.com -s https --aws4
  lastic get -p /users/_search -o table -c name,age";

/// lastic - query Elasticsearch-style HTTP APIs from the command line
#[derive(Parser, Debug, Clone)]
#[command(name = "lastic", version, about, long_about = None, after_help = AFTER_HELP)]
#[command(disable_help_flag = true, disable_help_subcommand = true)] // -h is --host
pub struct Cli {
    /// Print help information
    #[arg(long = "help", action = ArgAction::Help, global = true)]
    pub help: Option<bool>,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub request: RequestArgs,

    /// Verbose diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Diagnostic log format
    #[arg(long = "log-format", value_name = "FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Generate shell completions for the specified shell
    #[arg(long = "generate-completions", value_name = "SHELL", value_enum, hide = true)]
    pub generate_completions: Option<Shell>,
}

/// Request flags, accepted before or after the command.
///
/// Empty values count as not supplied, so the saved default is kept.
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, DELETE, ...)
    #[arg(short = 'X', long = "method", value_name = "METHOD", global = true)]
    pub method: Option<String>,

    /// The host, with optional port - ex: -h search-es-mcy2xwa.us-east-1.es.amazonaws.com
    #[arg(short = 'h', long = "host", value_name = "HOST", global = true)]
    pub host: Option<String>,

    /// The path - ex: -p /users/user/_search
    #[arg(short = 'p', long = "path", value_name = "PATH", global = true)]
    pub path: Option<String>,

    /// The scheme - ex: -s https
    #[arg(short = 's', long = "scheme", value_name = "SCHEME", global = true)]
    pub scheme: Option<String>,

    /// Inline JSON body - ex: -b '{"query": {"match": {"body": "coffee"}}}'
    #[arg(short = 'b', long = "body", value_name = "BODY", global = true)]
    pub body: Option<String>,

    /// File containing the JSON body - ex: -f ~/my-query.json
    #[arg(short = 'f', long = "file", value_name = "FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_name = "OUTPUT", value_enum, global = true)]
    pub output: Option<OutputMode>,

    /// Comma separated field names for the default and table outputs
    #[arg(short = 'c', long = "fields", visible_alias = "columns", value_name = "FIELDS", global = true)]
    pub fields: Option<String>,

    /// Sign the request with AWS Signature Version 4
    #[arg(short = 'a', long = "aws4", visible_alias = "sign", action = ArgAction::SetTrue, global = true)]
    pub aws4: bool,

    /// Signing region (default: from the host, then AWS_REGION, then us-east-1)
    #[arg(long = "region", value_name = "REGION", global = true)]
    pub region: Option<String>,

    /// Signing service name (default: from the host, then "es")
    #[arg(long = "service", value_name = "SERVICE", global = true)]
    pub service: Option<String>,

    /// Shared credentials profile (default: AWS_PROFILE, then "default")
    #[arg(long = "profile", value_name = "PROFILE", global = true)]
    pub profile: Option<String>,

    /// Overall deadline in seconds; 0 disables it
    #[arg(long = "timeout", value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: f64,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// GET request - ex: lastic get -p /users/user/1
    #[command(disable_help_flag = true)]
    Get,
    /// POST request - ex: lastic post -p /users/user/_search -f ~/query.json
    #[command(disable_help_flag = true)]
    Post,
    /// Save the given flags as defaults - ex: lastic save-defaults -h localhost -s http --aws4
    #[command(disable_help_flag = true)]
    SaveDefaults,
    /// Print the saved defaults
    #[command(disable_help_flag = true)]
    ShowDefaults,
}

impl Command {
    /// Method implied by the command, if any
    pub fn method(&self) -> Option<&'static str> {
        match self {
            Command::Get => Some("GET"),
            Command::Post => Some("POST"),
            Command::SaveDefaults | Command::ShowDefaults => None,
        }
    }
}

/// Shell types for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Log format for diagnostics on stderr
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}
