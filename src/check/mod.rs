// src/check/mod.rs

//! The so-name ABI check
//!
//! Given the CI build manifest and a published package index, verifies that
//! no freshly built package changed the versioned soname of a shared
//! library it ships. Every package is diffed to completion; failures
//! accumulate and surface together.

mod diff;
mod errors;

pub use errors::FailureSet;

use crate::error::Result;
use crate::manifest;
use crate::repository::{self, RepositoryClient};
use std::path::PathBuf;
use tracing::info;

/// Inputs for one so-name check run
#[derive(Debug, Clone)]
pub struct SoNameOptions {
    /// CI build manifest listing newly built packages
    pub package_list_file: PathBuf,
    /// Directory holding the build recipes, `{name}.yaml` per package
    pub recipe_dir: PathBuf,
    /// Directory holding the newly built archives, `{arch}/{name}-{version}-r{epoch}.apk`
    pub packages_dir: PathBuf,
    /// Published index URL; its final path segment is swapped out to fetch
    /// individual archives
    pub index_url: String,
}

/// The so-name ABI checker
pub struct SoNameCheck {
    options: SoNameOptions,
    client: RepositoryClient,
}

impl SoNameCheck {
    /// Create a checker for the given options
    pub fn new(options: SoNameOptions) -> Result<Self> {
        Ok(Self {
            client: RepositoryClient::new()?,
            options,
        })
    }

    /// Run the check over every newly built package
    ///
    /// Read-only: fetches the published index, expands the build manifest
    /// with declared subpackages, and diffs each package's sonames against
    /// its published predecessor. Returns a single aggregate error naming
    /// every incompatible package, or `Ok(())` when the set is clean.
    pub fn run(&self) -> Result<()> {
        let existing_packages = repository::fetch_index(&self.client, &self.options.index_url)?;

        let new_packages = manifest::read_package_list(&self.options.package_list_file)?;
        let new_packages = manifest::add_subpackages(new_packages, &self.options.recipe_dir);

        let mut failures = FailureSet::new();
        for (name, package) in &new_packages {
            info!("checking {}", name);

            let result = diff::diff_package(
                &self.client,
                &self.options.packages_dir,
                &self.options.index_url,
                package,
                &existing_packages,
            );

            if let Err(e) = result {
                failures.push(e.for_package(name));
            }
        }

        failures.wrap()
    }
}
