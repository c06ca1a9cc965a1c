// src/check/errors.rs

//! Multi-error aggregation
//!
//! The checker diffs every package to completion before reporting, so one
//! broken package cannot hide findings in its siblings. Failures accumulate
//! in a [`FailureSet`] and are wrapped into a single error at the end.

use crate::error::{Error, Result};

/// Ordered collection of per-package check failures
#[derive(Debug, Default)]
pub struct FailureSet {
    failures: Vec<Error>,
}

impl FailureSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure; insertion order is preserved in the report
    pub fn push(&mut self, failure: Error) {
        self.failures.push(failure);
    }

    /// Whether any failure has been recorded
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of recorded failures
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Iterate the recorded failures in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.failures.iter()
    }

    /// Collapse the set into a single result
    ///
    /// `Ok(())` when empty; otherwise one [`Error::CheckFailures`] whose
    /// message lists every failure on its own line, verbatim.
    pub fn wrap(self) -> Result<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(Error::CheckFailures(self))
        }
    }
}

impl std::fmt::Display for FailureSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}
