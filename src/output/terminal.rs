//! Terminal styling
//!
//! A small 256-color palette and a [`Style`] that applies it by role. Styling
//! only wraps text in escape codes; the literal text is never changed.

pub mod colors {
    pub const GREY: u8 = 102;      // #7D7D7D - Muted, secondary
    pub const AQUA: u8 = 109;      // #7A9EB5 - Info
    pub const RED: u8 = 167;       // #E34F45 - Errors
    pub const BLUE: u8 = 68;       // #426BD1 - Request lines
    pub const GREEN: u8 = 71;      // #63C27A - Success
    pub const WHITE: u8 = 255;     // Error banner text
    pub const BG_RED: u8 = 160;    // Error banner background
}

/// ANSI escape code constants
pub const RESET: &str = "\x1b[0m";

/// Generate foreground color escape code
#[inline]
pub fn fg(color: u8) -> String {
    format!("\x1b[38;5;{}m", color)
}

/// Generate bold foreground color escape code
#[inline]
pub fn bold_fg(color: u8) -> String {
    format!("\x1b[1;38;5;{}m", color)
}

/// Colorize text with a foreground color
#[inline]
pub fn colorize(text: &str, color: u8) -> String {
    format!("{}{}{}", fg(color), text, RESET)
}

/// Colorize text with bold foreground color
#[inline]
pub fn bold(text: &str, color: u8) -> String {
    format!("{}{}{}", bold_fg(color), text, RESET)
}

/// Role-based styling, disabled for pipes and `NO_COLOR`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    enabled: bool,
}

impl Style {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn apply(&self, text: &str, paint: impl FnOnce(&str) -> String) -> String {
        if self.enabled {
            paint(text)
        } else {
            text.to_string()
        }
    }

    /// Hit identity lines
    pub fn info(&self, text: &str) -> String {
        self.apply(text, |t| colorize(t, colors::AQUA))
    }

    /// Summary lines
    pub fn success(&self, text: &str) -> String {
        self.apply(text, |t| bold(t, colors::GREEN))
    }

    pub fn error(&self, text: &str) -> String {
        self.apply(text, |t| bold(t, colors::RED))
    }

    /// Bold white on red, for the error banner
    pub fn error_loud(&self, text: &str) -> String {
        self.apply(text, |t| {
            format!("\x1b[1;38;5;{};48;5;{}m{}{}", colors::WHITE, colors::BG_RED, t, RESET)
        })
    }

    /// Request lines (`GET http://...`)
    pub fn request(&self, text: &str) -> String {
        self.apply(text, |t| bold(t, colors::BLUE))
    }

    pub fn muted(&self, text: &str) -> String {
        self.apply(text, |t| colorize(t, colors::GREY))
    }
}
