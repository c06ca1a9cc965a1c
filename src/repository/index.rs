// src/repository/index.rs

//! APKINDEX fetching and parsing
//!
//! The published index is a gzip tar archive containing an `APKINDEX` text
//! file: blank-line separated stanzas of single-letter `K:value` lines, one
//! stanza per package. Only the `P:` (name) and `V:` (version) fields matter
//! here.
//!
//! Individual archive URLs are derived from the index URL by swapping its
//! final path segment (the well-known `APKINDEX.tar.gz` filename) for the
//! target archive filename, so callers must supply an index URL whose last
//! segment is replaceable this way.

use crate::compression::decompress_auto;
use crate::error::{Error, Result};
use crate::repository::client::RepositoryClient;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::Archive;
use tracing::{debug, info};

/// Name of the index member inside the index archive
const INDEX_MEMBER: &str = "APKINDEX";

/// A package as advertised by the published index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPackage {
    pub name: String,
    pub version: String,
}

impl IndexPackage {
    /// Published archive filename, `{name}-{version}.apk`
    pub fn archive_file_name(&self) -> String {
        format!("{}-{}.apk", self.name, self.version)
    }
}

/// Fetch and parse the published package index
///
/// Returns a map from package name to [`IndexPackage`]. Later stanzas for a
/// repeated name overwrite earlier ones, matching the index's own
/// latest-entry-wins convention.
pub fn fetch_index(
    client: &RepositoryClient,
    index_url: &str,
) -> Result<BTreeMap<String, IndexPackage>> {
    info!("fetching package index from {}", index_url);

    let compressed = client.get_bytes(index_url)?;
    let raw = decompress_auto(&compressed)
        .map_err(|e| Error::Parse(format!("failed to decompress index from {index_url}: {e}")))?;

    let contents = read_index_member(&raw)
        .map_err(|e| Error::Parse(format!("failed to read index from {index_url}: {e}")))?;

    let packages = parse_index(&contents);
    info!("index lists {} packages", packages.len());
    Ok(packages)
}

/// Pull the `APKINDEX` member out of the decompressed index tar
fn read_index_member(raw: &[u8]) -> std::result::Result<String, String> {
    let mut archive = Archive::new(raw);
    archive.set_ignore_zeros(true);

    let entries = archive.entries().map_err(|e| e.to_string())?;
    for entry in entries {
        let mut entry = entry.map_err(|e| e.to_string())?;
        let path = entry.path().map_err(|e| e.to_string())?;
        if path.as_ref() != Path::new(INDEX_MEMBER) {
            continue;
        }

        let mut contents = String::new();
        entry
            .read_to_string(&mut contents)
            .map_err(|e| e.to_string())?;
        return Ok(contents);
    }

    Err(format!("no {INDEX_MEMBER} member in index archive"))
}

/// Parse APKINDEX stanzas into a name-keyed package map
///
/// A stanza missing its name or version is skipped; the index also carries
/// stanzas for fields this check does not consume.
fn parse_index(contents: &str) -> BTreeMap<String, IndexPackage> {
    let mut packages = BTreeMap::new();

    for stanza in contents.split("\n\n") {
        let mut name = None;
        let mut version = None;

        for line in stanza.lines() {
            if let Some(value) = line.strip_prefix("P:") {
                name = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("V:") {
                version = Some(value.to_string());
            }
        }

        let (Some(name), Some(version)) = (name, version) else {
            continue;
        };

        debug!("index entry {} {}", name, version);
        packages.insert(name.clone(), IndexPackage { name, version });
    }

    packages
}

/// Derive a published archive URL from the index URL
///
/// Replaces the final path segment of `index_url` with `archive_filename`.
pub fn archive_url(index_url: &str, archive_filename: &str) -> Result<String> {
    let (base, _) = index_url.rsplit_once('/').ok_or_else(|| {
        Error::Parse(format!(
            "index URL {index_url} has no path segment to replace with an archive filename"
        ))
    })?;
    Ok(format!("{base}/{archive_filename}"))
}

/// Download a published archive into `dest_dir`
///
/// The archive URL is derived from the index URL; see [`archive_url`].
pub fn download_archive(
    client: &RepositoryClient,
    index_url: &str,
    archive_filename: &str,
    dest_dir: &Path,
) -> Result<PathBuf> {
    let url = archive_url(index_url, archive_filename)?;
    let dest_path = dest_dir.join(archive_filename);
    client.download_file(&url, &dest_path)?;
    Ok(dest_path)
}
