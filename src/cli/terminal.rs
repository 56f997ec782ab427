//! Styling for packing list output.
//!
//! Styles fall back to plain text when stdout is not a colour terminal, so
//! piped output (and `--output json`) stays free of escape codes.

use std::sync::OnceLock;

use owo_colors::{OwoColorize, colors::css};

/// Whether stdout accepts colour. Checked once per process.
fn colour_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| supports_color::on(supports_color::Stream::Stdout).is_some())
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if colour_enabled() {
        style(text)
    } else {
        text.to_string()
    }
}

/// Semantic styles used when printing trips and lists.
pub trait Colorize {
    /// Completed actions and packed items.
    fn success(&self) -> String;
    /// Lists out of sync with the catalog and destructive prompts.
    fn warning(&self) -> String;
    /// Category headings and suggestion priorities.
    fn info(&self) -> String;
    /// Secondary details such as ids and reasons.
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::Orange>().to_string())
    }

    fn info(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::LightBlue>().bold().to_string())
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), |s| s.dimmed().to_string())
    }
}

/// The checkbox shown in front of a list item.
pub fn checkbox(packed: bool) -> String {
    if packed {
        "[x]".success()
    } else {
        "[ ]".to_string()
    }
}
