/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Sentiment color: 0-1 red, 2 neutral, 3-4 green.
pub fn color_for_sentiment(value: u8) -> &'static str {
    match value {
        0 | 1 => RED,
        2 => RESET,
        _ => GREEN,
    }
}

/// Grey for absent markers, reset otherwise.
pub fn colorize_presence(present: bool, yes: &str, no: &str) -> String {
    if present {
        yes.to_string()
    } else {
        format!("{GREY}{no}{RESET}")
    }
}
