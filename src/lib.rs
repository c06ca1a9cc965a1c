// src/lib.rs

//! apkguard
//!
//! ABI compatibility checker for APK package repositories. Given the set of
//! packages a CI run just built, apkguard compares the versioned shared
//! libraries each archive ships against the previously published release
//! and fails when a soname changed, which would break every downstream
//! consumer linked against the old version.
//!
//! # Architecture
//!
//! - Read-only analysis: nothing in the repository is mutated
//! - One physical archive per check: the build manifest is expanded with
//!   each recipe's declared subpackages before diffing
//! - Scoped extraction: every archive unpacks into its own temp directory
//! - Aggregated verdict: all packages are diffed before any failure is
//!   reported, one finding per line

pub mod archive;
pub mod check;
pub mod compression;
mod error;
pub mod manifest;
pub mod recipe;
pub mod repository;
pub mod soname;

pub use check::{FailureSet, SoNameCheck, SoNameOptions};
pub use error::{Error, Result};
pub use manifest::BuiltPackage;
pub use repository::IndexPackage;
pub use soname::Soname;
