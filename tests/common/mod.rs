//! Common test utilities for lastic integration tests
//!
//! Every invocation runs the compiled binary with its own HOME and config
//! file, with AWS variables cleared and instance metadata disabled, so tests
//! never see the developer's real defaults or credentials.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// ANSI color escape sequence prefix
pub const COLOR: &str = "\x1b[";

/// Variables that would leak the host's AWS setup into a test
const AWS_VARS: &[&str] = &[
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_SESSION_TOKEN",
    "AMAZON_ACCESS_KEY_ID",
    "AMAZON_SECRET_ACCESS_KEY",
    "AMAZON_SESSION_TOKEN",
    "AWS_ACCESS_KEY",
    "AWS_SECRET_KEY",
    "AWS_PROFILE",
    "AWS_DEFAULT_PROFILE",
    "AWS_REGION",
    "AWS_DEFAULT_REGION",
    "AWS_SHARED_CREDENTIALS_FILE",
    "AWS_CONFIG_FILE",
    "AWS_CONTAINER_CREDENTIALS_RELATIVE_URI",
    "AWS_CONTAINER_CREDENTIALS_FULL_URI",
    "AWS_CONTAINER_AUTHORIZATION_TOKEN",
    "AWS_EC2_METADATA_SERVICE_ENDPOINT",
    "RUST_LOG",
];

/// Result of running the CLI
#[derive(Debug)]
pub struct CliResponse {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CliResponse {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Non-empty stdout lines
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().filter(|l| !l.trim().is_empty()).collect()
    }

    /// Table rows (lines drawn with `|` borders), cells trimmed.
    /// Row dividers such as `|----+----|` are skipped.
    pub fn table_rows(&self) -> Vec<Vec<String>> {
        self.stdout
            .lines()
            .filter(|l| l.starts_with('|'))
            .filter(|l| !l.chars().all(|c| matches!(c, '|' | '-' | '+' | '=')))
            .map(|l| l.trim_matches('|').split('|').map(|c| c.trim().to_string()).collect())
            .collect()
    }
}

/// Isolated home directory and environment for one invocation
pub struct MockEnvironment {
    pub home: TempDir,
    pub env_vars: HashMap<String, String>,
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().expect("Failed to create temp home"),
            env_vars: HashMap::new(),
        }
    }

    pub fn set_env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env_vars.insert(key.to_string(), value.to_string());
        self
    }

    /// The defaults file used by this environment
    pub fn config_path(&self) -> PathBuf {
        self.home.path().join(".lastic.json")
    }

    /// Write a defaults document verbatim
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).expect("Failed to write config");
    }

    /// Point the saved host at a mock server
    pub fn with_host(self, host: &str) -> Self {
        self.write_config(&format!(r#"{{"defaults": {{"host": "{}"}}}}"#, host));
        self
    }

    pub fn read_config(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.config_path()).expect("Failed to read config");
        serde_json::from_str(&content).expect("Config is not JSON")
    }
}

/// Run the CLI with a fresh environment
pub fn lastic(args: &[&str]) -> CliResponse {
    lastic_with_env(args, &MockEnvironment::new())
}

/// Run the CLI with the given environment
pub fn lastic_with_env(args: &[&str], env: &MockEnvironment) -> CliResponse {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lastic"));

    // Keep hung tests short
    if !args.contains(&"--timeout") {
        cmd.args(["--timeout", "5"]);
    }
    cmd.args(args);

    for var in AWS_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", env.home.path());
    cmd.env("LASTIC_CONFIG", env.config_path());
    cmd.env("AWS_EC2_METADATA_DISABLED", "true");
    cmd.env("NO_COLOR", "1");
    for (key, value) in &env.env_vars {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    parse_output(cmd.output().expect("Failed to execute command"))
}

fn parse_output(output: Output) -> CliResponse {
    CliResponse {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(1),
    }
}

/// The search response used by the end-to-end scenarios
pub fn search_response() -> serde_json::Value {
    serde_json::json!({
        "took": 5,
        "hits": {
            "total": 2,
            "max_score": 1.0,
            "hits": [
                {"_id": "1", "_score": 1.0, "_source": {"name": "a"}}
            ]
        }
    })
}
