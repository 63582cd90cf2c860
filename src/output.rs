//! Terminal output for the pixel-transfer CLI.
//!
//! Status lines follow the Cargo layout: a right-aligned coloured verb
//! followed by a message, all on stderr. Stdout only carries data that
//! other tools may consume (`colours` listings, shell completions).

use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// ANSI escape codes.
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Status printer shared by every stage of a run.
///
/// Colour is enabled when stderr is a terminal. Lines are written under the
/// stderr lock, so worker threads can share one printer.
#[derive(Debug, Clone, Copy)]
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

    /// Green verb, e.g. "      Saving out/hero/goal_16x16.png".
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    /// Cyan verb for matched inputs and settings.
    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    /// Red verb for failed pairs.
    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(stderr, "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}");
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// Pluralize a count: `plural(1, "image", "images")` → "1 image".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Return a relative display path when possible, absolute otherwise.
pub fn display_path(path: &Path) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "image", "images"), "1 image");
        assert_eq!(plural(0, "image", "images"), "0 images");
        assert_eq!(plural(3, "pair", "pairs"), "3 pairs");
    }

    #[test]
    fn test_display_path_outside_cwd() {
        let p = Path::new("/nonexistent/path/to/goal.png");
        assert_eq!(display_path(p), "/nonexistent/path/to/goal.png");
    }

    #[test]
    fn test_display_path_relative_stays_relative() {
        assert_eq!(display_path(Path::new("out/goal.png")), "out/goal.png");
    }
}
