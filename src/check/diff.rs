// src/check/diff.rs

//! Per-package soname diff
//!
//! Compares the versioned sonames shipped by a freshly built archive with
//! those in the previously published release of the same package. A changed
//! version suffix for a shared base name is the ABI break this tool exists
//! to catch.

use crate::archive;
use crate::error::{Error, Result};
use crate::manifest::BuiltPackage;
use crate::repository::{self, IndexPackage, RepositoryClient};
use crate::soname::{self, Soname};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tempfile::TempDir;
use tracing::info;

/// Diff one newly built package against the published index
///
/// Returns `Ok(())` when the package is ABI-compatible with its published
/// predecessor, and also for the two non-error skip conditions: a package
/// with no published predecessor, and a package shipping no versioned
/// sonames. Extraction and download failures are errors for this package
/// but must not stop sibling packages; the caller aggregates.
pub fn diff_package(
    client: &RepositoryClient,
    packages_dir: &Path,
    index_url: &str,
    package: &BuiltPackage,
    existing_packages: &BTreeMap<String, IndexPackage>,
) -> Result<()> {
    let Some(existing) = existing_packages.get(&package.name) else {
        info!(
            "no existing package found for {}, skipping so name check",
            package.name
        );
        return Ok(());
    };

    let new_sonames = scan_new_archive(packages_dir, package)?;
    if new_sonames.is_empty() {
        return Ok(());
    }

    let existing_sonames = scan_existing_archive(client, index_url, existing)?;

    check_sonames_match(&existing_sonames, &new_sonames)
}

/// Extract the newly built local archive and scan it for sonames
fn scan_new_archive(packages_dir: &Path, package: &BuiltPackage) -> Result<Vec<Soname>> {
    let archive_path = packages_dir
        .join(&package.arch)
        .join(package.archive_file_name());

    let extract_dir = scratch_dir()?;
    archive::unpack_file(&archive_path, extract_dir.path())?;
    soname::scan(extract_dir.path())
}

/// Download the published archive and scan it for sonames
fn scan_existing_archive(
    client: &RepositoryClient,
    index_url: &str,
    existing: &IndexPackage,
) -> Result<Vec<Soname>> {
    let download_dir = scratch_dir()?;
    let archive_path = repository::download_archive(
        client,
        index_url,
        &existing.archive_file_name(),
        download_dir.path(),
    )?;

    let extract_dir = scratch_dir()?;
    archive::unpack_file(&archive_path, extract_dir.path())?;
    soname::scan(extract_dir.path())
}

/// Each extraction gets its own scoped directory, removed when dropped,
/// so concurrent checks can never collide in the system temp root.
fn scratch_dir() -> Result<TempDir> {
    tempfile::tempdir()
        .map_err(|e| Error::Io(format!("failed to create scratch directory: {e}")))
}

/// Compare new sonames against the published set
///
/// A base name absent from the published set is a new library with no prior
/// ABI to break; a shared base name must carry an identical version suffix.
/// The first mismatch fails the package.
fn check_sonames_match(existing: &[Soname], new: &[Soname]) -> Result<()> {
    // Last write wins on duplicate base names; within one package a base
    // name should only occur once.
    let existing_versions: HashMap<&str, &str> = existing
        .iter()
        .map(|soname| (soname.base.as_str(), soname.suffix.as_str()))
        .collect();

    for soname in new {
        let Some(existing_suffix) = existing_versions.get(soname.base.as_str()) else {
            continue;
        };

        if *existing_suffix != soname.suffix {
            return Err(Error::SonameMismatch {
                library: soname.base.clone(),
                existing: existing_suffix.to_string(),
                new: soname.suffix.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soname(base: &str, suffix: &str) -> Soname {
        Soname {
            base: base.to_string(),
            suffix: suffix.to_string(),
        }
    }

    #[test]
    fn test_changed_suffix_is_a_mismatch() {
        let err = check_sonames_match(
            &[soname("libfoo", ".so.1")],
            &[soname("libfoo", ".so.2")],
        )
        .unwrap_err();

        let Error::SonameMismatch {
            library,
            existing,
            new,
        } = &err
        else {
            panic!("expected SonameMismatch, got {err:?}");
        };
        assert_eq!(library, "libfoo");
        assert_eq!(existing, ".so.1");
        assert_eq!(new, ".so.2");
    }

    #[test]
    fn test_identical_suffixes_are_compatible() {
        check_sonames_match(
            &[soname("libfoo", ".so.1.2"), soname("libbar", ".so.3")],
            &[soname("libfoo", ".so.1.2"), soname("libbar", ".so.3")],
        )
        .unwrap();
    }

    #[test]
    fn test_new_library_is_compatible() {
        check_sonames_match(&[], &[soname("libnew", ".so.1")]).unwrap();
    }

    #[test]
    fn test_removed_library_is_compatible() {
        // Removed libraries are not this check's concern
        check_sonames_match(&[soname("libold", ".so.1")], &[]).unwrap();
    }

    #[test]
    fn test_first_mismatch_wins() {
        let err = check_sonames_match(
            &[soname("liba", ".so.1"), soname("libb", ".so.1")],
            &[soname("liba", ".so.2"), soname("libb", ".so.9")],
        )
        .unwrap_err();

        let Error::SonameMismatch { library, .. } = &err else {
            panic!("expected SonameMismatch, got {err:?}");
        };
        assert_eq!(library, "liba");
    }
}
