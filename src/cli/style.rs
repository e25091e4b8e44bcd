//! Terminal styling helpers
//!
//! Colors are applied only when stdout supports them; `anstream` strips
//! anything left over when output is redirected.

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;

/// Success mark
pub const CHECK: &str = "✓";

/// Failure mark
pub const CROSS: &str = "✗";

/// Semantic styles for CLI output
pub trait Stylize {
    /// Secondary information
    fn muted(&self) -> String;
    /// Names the user should notice
    fn emphasis(&self) -> String;
    /// Counts and identifiers
    fn accent(&self) -> String;
    /// Completed actions
    fn success(&self) -> String;
    /// Recoverable problems
    fn warn(&self) -> String;
    /// Fatal problems
    fn error(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string()
    }

    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.bold())
            .to_string()
    }

    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.cyan())
            .to_string()
    }

    fn success(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.green())
            .to_string()
    }

    fn warn(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string()
    }

    fn error(&self) -> String {
        self.if_supports_color(Stream::Stderr, |t| t.red())
            .to_string()
    }
}

/// Styled success mark
pub fn check() -> String {
    CHECK.success()
}

/// Styled failure mark
pub fn cross() -> String {
    CROSS.error()
}

/// Styled arrow for step lines
pub fn arrow() -> String {
    "→".muted()
}

/// Spinner style shared by network operations
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
