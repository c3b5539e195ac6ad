//! Terminal output formatting for the anigen CLI.
//!
//! Cargo-style status lines with right-aligned coloured verbs.
//! All status output goes to stderr; stdout is reserved for machine-readable output.

use std::io::{self, IsTerminal, Write};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Terminal-aware status printer.
///
/// Colour is enabled when stderr is a terminal.
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// A printer that never emits escape codes.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// e.g. "     Loading base from assets"
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    /// e.g. "    Exported anigen.png (420x420)"
    pub fn success(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    /// Format a string as dim/grey.
    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    /// Format a string as cyan (for paths).
    pub fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(
                stderr,
                "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}"
            );
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// Pluralize a count: `plural(1, "variant", "variants")` → "1 variant".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Format a pixel size as `WxH`.
pub fn size(width: u32, height: u32) -> String {
    format!("{}x{}", width, height)
}

/// Return a relative display path when possible, absolute otherwise.
pub fn display_path(path: &std::path::Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}
