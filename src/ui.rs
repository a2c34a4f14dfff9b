//! Terminal output utilities for the findash CLI

use console::Term;
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

/// Notification channel collaborator
///
/// The request client and session controller surface user-facing messages
/// through this trait when a caller opts in; the CLI backs it with the
/// terminal, tests with a recorder.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);
}

/// Enhanced UI utilities
pub struct UI {
    term: Term,
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

impl UI {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }

    /// Helper method to conditionally apply color based on terminal support
    fn colorize<F>(&self, text: &str, color_fn: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        if self.supports_color() {
            color_fn(text)
        } else {
            text.to_string()
        }
    }

    /// Print a success message (color only if supported)
    pub fn success(&self, message: &str) {
        let output = self.colorize(message, |m| m.green().bold().to_string());
        println!("{}", output);
    }

    /// Print an error message (color only if supported)
    pub fn error(&self, message: &str) {
        let output = self.colorize(message, |m| m.red().bold().to_string());
        eprintln!("{}", output);
    }

    /// Print a warning message (color only if supported)
    pub fn warning(&self, message: &str) {
        let output = self.colorize(message, |m| m.yellow().bold().to_string());
        println!("{}", output);
    }

    /// Print an info message (color only if supported)
    pub fn info(&self, message: &str) {
        let output = self.colorize(message, |m| m.blue().bold().to_string());
        println!("{}", output);
    }

    /// Format authentication status with appropriate color (if supported)
    pub fn format_auth_status(&self, authenticated: bool) -> String {
        let text = if authenticated {
            "Authenticated"
        } else {
            "Not authenticated"
        };

        if self.supports_color() {
            if authenticated {
                text.green().to_string()
            } else {
                text.red().to_string()
            }
        } else {
            text.to_string()
        }
    }

    /// Format server connection status with appropriate color (if supported)
    pub fn format_server_status(&self, connected: bool) -> String {
        let text = if connected { "Connected" } else { "Unreachable" };

        if self.supports_color() {
            if connected {
                text.green().to_string()
            } else {
                text.red().to_string()
            }
        } else {
            text.to_string()
        }
    }

    /// Format an optional user field, dash for absent
    pub fn format_user_field(&self, value: Option<String>) -> String {
        value.unwrap_or_else(|| "-".to_string())
    }

    /// Render a titled key/value card
    pub fn card(&self, title: &str, rows: Vec<(&str, String)>) {
        let key_width = rows
            .iter()
            .map(|(key, _)| UnicodeWidthStr::width(*key))
            .max()
            .unwrap_or(0);

        println!();
        println!("{}", self.colorize(title, |t| t.bold().to_string()));
        for (key, value) in rows {
            let pad = key_width - UnicodeWidthStr::width(key);
            println!("  {}{}  {}", key, " ".repeat(pad), value);
        }
        println!();
    }

    /// Render a heading followed by pre-formatted lines
    pub fn list(&self, title: &str, lines: Vec<String>) {
        println!();
        println!("{}", self.colorize(title, |t| t.bold().to_string()));
        for line in lines {
            println!("  {}", line);
        }
        println!();
    }
}

impl Notifier for UI {
    fn success(&self, message: &str) {
        UI::success(self, message);
    }

    fn error(&self, message: &str) {
        UI::error(self, message);
    }

    fn warning(&self, message: &str) {
        UI::warning(self, message);
    }

    fn info(&self, message: &str) {
        UI::info(self, message);
    }
}
