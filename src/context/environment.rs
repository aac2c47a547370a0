//! Environment struct (terminal capabilities of the process)

/// Execution environment
#[derive(Debug, Clone)]
pub struct Environment {
    pub stderr_isatty: bool,
    pub colors: bool,
}

impl Environment {
    /// Detect the environment of the running process
    pub fn init() -> Self {
        Self::default()
    }

    /// An environment with no terminal attached (used by tests and pipes)
    pub fn plain() -> Self {
        Self {
            stderr_isatty: false,
            colors: false,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            stderr_isatty: atty::is(atty::Stream::Stderr),
            colors: detect_color_support(),
        }
    }
}

/// Colors are used only on an interactive stdout that has not opted out
fn detect_color_support() -> bool {
    if !atty::is(atty::Stream::Stdout) {
        return false;
    }

    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    !matches!(std::env::var("TERM").as_deref(), Ok("dumb"))
}
