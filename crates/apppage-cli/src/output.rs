//! Human-readable status lines

use console::{style, Term};

/// Writes step results to stderr, silent in quiet mode
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    quiet: bool,
}

impl Reporter {
    /// Create a reporter
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            quiet,
        }
    }

    /// A step that succeeded
    pub fn success(&self, message: &str) {
        self.line(&format!("{} {message}", style("✓").green()));
    }

    /// Informational line
    pub fn info(&self, message: &str) {
        self.line(&format!("{} {message}", style("•").cyan()));
    }

    fn line(&self, text: &str) {
        if self.quiet {
            return;
        }
        let _ = self.term.write_line(text);
    }
}
