//! Diagnostic sinks.
//!
//! The core never prints or exits on its own; it hands messages to a
//! [`Reporter`] chosen by the caller.

use std::cell::RefCell;

use tracing::{debug, warn};

/// Receives diagnostics produced during a run.
pub trait Reporter {
    /// Fatal problems, already accumulated.
    fn report(&self, errors: &[String]);

    /// Non-fatal problems.
    fn warn(&self, message: &str);

    /// Progress and success messages.
    fn info(&self, message: &str);
}

/// Prints to the terminal and mirrors every message to `tracing`.
#[derive(Debug, Default, Clone)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, errors: &[String]) {
        for message in errors {
            debug!(target: "taxa::report", "error: {}", message);
            eprintln!("❌ {}", message);
        }
    }

    fn warn(&self, message: &str) {
        warn!(target: "taxa::report", "{}", message);
        eprintln!("⚠️  {}", message);
    }

    fn info(&self, message: &str) {
        debug!(target: "taxa::report", "{}", message);
        if !self.quiet {
            println!("{}", message);
        }
    }
}

/// Records everything it receives.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    errors: RefCell<Vec<String>>,
    warnings: RefCell<Vec<String>>,
    infos: RefCell<Vec<String>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.borrow().clone()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, errors: &[String]) {
        self.errors.borrow_mut().extend_from_slice(errors);
    }

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }

    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }
}
