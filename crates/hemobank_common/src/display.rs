//! Terminal output primitives
//!
//! Consistent status lines, headers and key-value output for the CLI.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::ColorMode;

/// ANSI color codes
pub struct Colors;

impl Colors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const RED: &'static str = "\x1b[38;5;210m";
    pub const GREEN: &'static str = "\x1b[38;5;120m";
    pub const YELLOW: &'static str = "\x1b[38;5;228m";
    pub const CYAN: &'static str = "\x1b[38;5;159m";
    pub const GRAY: &'static str = "\x1b[38;5;250m";
}

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);

/// Apply the configured color mode; Auto disables colors off-terminal
pub fn init(mode: ColorMode) {
    let enabled = match mode {
        ColorMode::Auto => atty::is(atty::Stream::Stdout),
        ColorMode::Basic => true,
        ColorMode::None => false,
    };
    COLOR_ENABLED.store(enabled, Ordering::Relaxed);
}

fn paint(code: &str, text: &str) -> String {
    if COLOR_ENABLED.load(Ordering::Relaxed) {
        format!("{code}{text}{}", Colors::RESET)
    } else {
        text.to_string()
    }
}

/// Status level for messages
#[derive(Debug, Clone, Copy)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn symbol(&self) -> &'static str {
        match self {
            Level::Info => "ℹ",
            Level::Success => "✓",
            Level::Warning => "⚠",
            Level::Error => "✗",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            Level::Info => Colors::CYAN,
            Level::Success => Colors::GREEN,
            Level::Warning => Colors::YELLOW,
            Level::Error => Colors::RED,
        }
    }
}

/// Format a status message
pub fn status(level: Level, message: &str) -> String {
    paint(level.color(), &format!("{} {}", level.symbol(), message))
}

/// Format a section header
pub fn header(text: &str) -> String {
    paint(Colors::BOLD, &format!("── {text} ──"))
}

/// Format a key-value pair
pub fn kv(key: &str, value: &str) -> String {
    format!("{} {}", paint(Colors::GRAY, &format!("{key}:")), value)
}
