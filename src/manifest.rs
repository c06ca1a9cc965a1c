// src/manifest.rs

//! Build manifest parsing and subpackage expansion
//!
//! Repository CI writes one line per newly built package in the form
//! `ARCH|NAME|VERSION-rEPOCH`, with an optional trailing `.apk`. The ABI
//! check runs once per physical archive, and subpackages ship as separate
//! archives sharing the parent's release metadata, so the parsed set is
//! expanded with every subpackage declared in each package's build recipe.

use crate::error::{Error, Result};
use crate::recipe::BuildRecipe;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// A newly built package as recorded in the CI build manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPackage {
    /// Package (or subpackage) name
    pub name: String,
    /// Target architecture, e.g. `x86_64`
    pub arch: String,
    /// Upstream version
    pub version: String,
    /// Release counter distinguishing rebuilds of the same version
    pub epoch: String,
}

impl BuiltPackage {
    /// Local archive filename, `{name}-{version}-r{epoch}.apk`
    pub fn archive_file_name(&self) -> String {
        format!("{}-{}-r{}.apk", self.name, self.version, self.epoch)
    }
}

/// Parse one manifest line, `ARCH|NAME|VERSION-rEPOCH[.apk]`
fn parse_line(line: &str) -> Result<BuiltPackage> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() != 3 {
        return Err(Error::Parse(format!(
            "expected 3 parts but found {} when scanning {line:?}",
            parts.len()
        )));
    }

    let version_parts: Vec<&str> = parts[2].split('-').collect();
    if version_parts.len() != 2 {
        return Err(Error::Parse(format!(
            "expected 2 version parts but found {} when scanning {line:?}",
            version_parts.len()
        )));
    }

    let epoch = version_parts[1]
        .trim_end_matches(".apk")
        .trim_start_matches('r');

    Ok(BuiltPackage {
        name: parts[1].to_string(),
        arch: parts[0].to_string(),
        version: version_parts[0].to_string(),
        epoch: epoch.to_string(),
    })
}

/// Read the CI build manifest into a name-keyed package map
///
/// Lines are trimmed and blank lines skipped. Any malformed line fails the
/// whole read: a bad manifest means the CI contract upstream is broken, and
/// silently dropping lines would skip ABI checks.
pub fn read_package_list(path: &Path) -> Result<BTreeMap<String, BuiltPackage>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::Io(format!("failed to read {}: {e}", path.display())))?;

    let mut packages = BTreeMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let package = parse_line(line)?;
        packages.insert(package.name.clone(), package);
    }

    Ok(packages)
}

/// Expand a package map with the subpackages each build recipe declares
///
/// For every top-level package, `{recipe_dir}/{name}.yaml` is read and each
/// declared subpackage is inserted under its own name, carrying the parent's
/// architecture, version, and epoch. A recipe that cannot be read or parsed
/// is logged and skipped; a package without discoverable subpackages is not
/// an error.
pub fn add_subpackages(
    packages: BTreeMap<String, BuiltPackage>,
    recipe_dir: &Path,
) -> BTreeMap<String, BuiltPackage> {
    let mut expanded = packages.clone();

    for (name, package) in &packages {
        let recipe_path = recipe_dir.join(format!("{name}.yaml"));
        let recipe = match BuildRecipe::load(&recipe_path) {
            Ok(recipe) => recipe,
            Err(e) => {
                warn!("failed to read build recipe {}: {e}", recipe_path.display());
                continue;
            }
        };

        for subpackage in &recipe.subpackages {
            expanded.insert(
                subpackage.name.clone(),
                BuiltPackage {
                    name: subpackage.name.clone(),
                    ..package.clone()
                },
            );
        }
    }

    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_manifest(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_line_with_apk_suffix() {
        let package = parse_line("x86_64|hello-world|0.0.2-r0.apk").unwrap();
        assert_eq!(package.arch, "x86_64");
        assert_eq!(package.name, "hello-world");
        assert_eq!(package.version, "0.0.2");
        assert_eq!(package.epoch, "0");
    }

    #[test]
    fn test_parse_line_without_apk_suffix() {
        let package = parse_line("aarch64|zlib|1.3.1-r4").unwrap();
        assert_eq!(package.arch, "aarch64");
        assert_eq!(package.version, "1.3.1");
        assert_eq!(package.epoch, "4");
    }

    #[test]
    fn test_parse_line_wrong_field_count() {
        let err = parse_line("x86_64|hello-world").unwrap_err();
        assert!(err.to_string().contains("expected 3 parts"));
        assert!(err.to_string().contains("hello-world"));
    }

    #[test]
    fn test_parse_line_wrong_version_field_count() {
        let err = parse_line("x86_64|hello-world|0.0.2").unwrap_err();
        assert!(err.to_string().contains("expected 2 version parts"));
    }

    #[test]
    fn test_archive_file_name() {
        let package = parse_line("x86_64|zlib|1.3.1-r4.apk").unwrap();
        assert_eq!(package.archive_file_name(), "zlib-1.3.1-r4.apk");
    }

    #[test]
    fn test_read_package_list_skips_blank_lines() {
        let file = write_manifest("x86_64|zlib|1.3.1-r4.apk\n\n  \nx86_64|curl|8.9.0-r1.apk\n");
        let packages = read_package_list(file.path()).unwrap();
        assert_eq!(packages.len(), 2);
        assert!(packages.contains_key("zlib"));
        assert!(packages.contains_key("curl"));
    }

    #[test]
    fn test_read_package_list_fails_on_malformed_line() {
        let file = write_manifest("x86_64|zlib|1.3.1-r4.apk\nbogus line\n");
        let err = read_package_list(file.path()).unwrap_err();
        assert!(err.to_string().contains("bogus line"));
    }

    #[test]
    fn test_read_package_list_missing_file() {
        let err = read_package_list(Path::new("/nonexistent/packages.log")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/packages.log"));
    }

    #[test]
    fn test_add_subpackages_inherits_parent_metadata() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("openssl.yaml"),
            "package:\n  name: openssl\n  version: 3.3.1\nsubpackages:\n  - name: openssl-dev\n  - name: libcrypto3\n",
        )
        .unwrap();

        let file = write_manifest("x86_64|openssl|3.3.1-r2.apk\n");
        let packages = read_package_list(file.path()).unwrap();
        let expanded = add_subpackages(packages, dir.path());

        assert_eq!(expanded.len(), 3);
        for name in ["openssl", "openssl-dev", "libcrypto3"] {
            let package = &expanded[name];
            assert_eq!(package.name, name);
            assert_eq!(package.arch, "x86_64");
            assert_eq!(package.version, "3.3.1");
            assert_eq!(package.epoch, "2");
        }
    }

    #[test]
    fn test_add_subpackages_missing_recipe_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_manifest("x86_64|zlib|1.3.1-r4.apk\n");
        let packages = read_package_list(file.path()).unwrap();
        let expanded = add_subpackages(packages, dir.path());
        assert_eq!(expanded.len(), 1);
        assert!(expanded.contains_key("zlib"));
    }
}
