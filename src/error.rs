// src/error.rs

//! Crate-wide error type
//!
//! All fallible operations return [`Result`]. Variants carry the context a
//! CI log needs to be actionable: file paths, URLs, HTTP statuses, and the
//! offending manifest line.

use thiserror::Error;

use crate::check::FailureSet;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// apkguard errors
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem read/write failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed input (manifest line, index stanza, recipe file)
    #[error("parse error: {0}")]
    Parse(String),

    /// HTTP download failure, carries status and URL
    #[error("download failed: {0}")]
    Download(String),

    /// Archive could not be unpacked
    #[error("archive extraction failed: {0}")]
    Extraction(String),

    /// Client construction or other startup failure
    #[error("initialization failed: {0}")]
    Init(String),

    /// A shared library changed its versioned soname between releases
    #[error(
        "soname version check failed, {library} has an existing version {existing} \
         while the new package contains a different version {new}. This can cause ABI failures"
    )]
    SonameMismatch {
        library: String,
        existing: String,
        new: String,
    },

    /// A per-package failure tagged with the package it belongs to
    #[error("{package}: {source}")]
    PackageCheck {
        package: String,
        #[source]
        source: Box<Error>,
    },

    /// One or more packages failed the check; `Display` prints one failure
    /// per line, verbatim, in the order the packages were processed
    #[error("{0}")]
    CheckFailures(FailureSet),
}

impl Error {
    /// Tag an error with the package whose check produced it
    pub fn for_package(self, package: &str) -> Self {
        Error::PackageCheck {
            package: package.to_string(),
            source: Box::new(self),
        }
    }
}
