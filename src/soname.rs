// src/soname.rs

//! Versioned shared-object discovery
//!
//! A soname in the standard naming convention is `<base>.so.<N>[.<N>...]`,
//! e.g. `libfoo.so.1` or `libglib-2.0.so.0.7800.4`. The version suffix is
//! everything from `.so` onward; two files are the same library when their
//! base names match, and ABI-compatible when their suffixes match too.
//!
//! Unversioned `libfoo.so` linker symlinks carry no ABI version to compare
//! and are ignored. The suffix must terminate the filename, so a digit in
//! the base name (`libglib-2.0.so.0`) cannot move the split point and
//! trailing non-version text (`libfoo.so.1.debug`) does not match.

use crate::error::{Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;
use walkdir::WalkDir;

/// Grammar: base name, literal `.so`, then one or more dotted numeric
/// segments running to the end of the filename.
static SONAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<base>.+)(?P<suffix>\.so(?:\.\d+)+)$").unwrap());

/// A versioned shared-object filename split into library name and version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Soname {
    /// Library base name (`libfoo` for `libfoo.so.1.2`)
    pub base: String,
    /// Version suffix from `.so` onward (`.so.1.2` for `libfoo.so.1.2`)
    pub suffix: String,
}

impl Soname {
    /// Parse a filename in the versioned shared-object convention
    ///
    /// Returns `None` for filenames that are not versioned sonames.
    pub fn parse(file_name: &str) -> Option<Soname> {
        let captures = SONAME_RE.captures(file_name)?;
        Some(Soname {
            base: captures["base"].to_string(),
            suffix: captures["suffix"].to_string(),
        })
    }
}

impl std::fmt::Display for Soname {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.base, self.suffix)
    }
}

/// Collect every versioned soname under `dir`
///
/// Traversal is filesystem walk order; callers compare through a lookup
/// keyed by base name, so no ordering is imposed here.
pub fn scan(dir: &Path) -> Result<Vec<Soname>> {
    let mut sonames = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            Error::Io(format!("failed to walk {}: {e}", dir.display()))
        })?;

        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };

        if let Some(soname) = Soname::parse(file_name) {
            debug!("found soname {} at {}", soname, entry.path().display());
            sonames.push(soname);
        }
    }

    Ok(sonames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_version_segment() {
        let soname = Soname::parse("libfoo.so.1").unwrap();
        assert_eq!(soname.base, "libfoo");
        assert_eq!(soname.suffix, ".so.1");
    }

    #[test]
    fn test_parse_multi_version_segments() {
        let soname = Soname::parse("libfoo.so.1.2.3").unwrap();
        assert_eq!(soname.base, "libfoo");
        assert_eq!(soname.suffix, ".so.1.2.3");
    }

    #[test]
    fn test_unversioned_library_is_not_a_soname() {
        assert_eq!(Soname::parse("libfoo.so"), None);
    }

    #[test]
    fn test_digits_in_base_name_do_not_move_the_split() {
        let soname = Soname::parse("libglib-2.0.so.0").unwrap();
        assert_eq!(soname.base, "libglib-2.0");
        assert_eq!(soname.suffix, ".so.0");
    }

    #[test]
    fn test_trailing_non_version_text_is_rejected() {
        assert_eq!(Soname::parse("libfoo.so.1.debug"), None);
        assert_eq!(Soname::parse("libfoo.so.conf"), None);
        assert_eq!(Soname::parse("notes.solution2"), None);
    }

    #[test]
    fn test_plain_files_are_rejected() {
        assert_eq!(Soname::parse("README.md"), None);
        assert_eq!(Soname::parse("libfoo.a"), None);
        assert_eq!(Soname::parse(".so.1"), None);
    }

    #[test]
    fn test_display_round_trip() {
        let soname = Soname::parse("libcrypto.so.3").unwrap();
        assert_eq!(soname.to_string(), "libcrypto.so.3");
    }

    #[test]
    fn test_scan_finds_nested_sonames() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join("usr/lib");
        std::fs::create_dir_all(&lib).unwrap();
        std::fs::write(lib.join("libfoo.so.1.2"), b"elf").unwrap();
        std::fs::write(lib.join("libfoo.so"), b"elf").unwrap();
        std::fs::write(lib.join("foo.conf"), b"cfg").unwrap();

        let sonames = scan(dir.path()).unwrap();
        assert_eq!(
            sonames,
            vec![Soname {
                base: "libfoo".to_string(),
                suffix: ".so.1.2".to_string(),
            }]
        );
    }

    #[test]
    fn test_scan_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan(dir.path()).unwrap().is_empty());
    }
}
