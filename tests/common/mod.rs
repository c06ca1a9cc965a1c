// tests/common/mod.rs

//! Shared fixture builders for integration tests.
//!
//! Builds APK-shaped archives (concatenated gzip tar segments) and
//! APKINDEX archives in memory, and lays out the local packages directory
//! the checker reads newly built archives from.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::path::Path;

/// Gzip tar segment holding the given (path, contents) entries
fn tar_segment(files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, *contents).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Build an APK: a control segment with `.PKGINFO` followed by a data
/// segment with the package's files, each its own gzip member
pub fn make_apk(name: &str, files: &[(&str, &[u8])]) -> Vec<u8> {
    let pkginfo = format!("pkgname = {name}\n");
    let mut apk = tar_segment(&[(".PKGINFO", pkginfo.as_bytes())]);
    apk.extend(tar_segment(files));
    apk
}

/// Build an APKINDEX.tar.gz advertising the given (name, version) pairs
pub fn make_index(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut index = String::new();
    for (name, version) in entries {
        index.push_str(&format!("P:{name}\nV:{version}\nA:x86_64\n\n"));
    }
    tar_segment(&[("APKINDEX", index.as_bytes())])
}

/// Write a newly built archive into `{packages_dir}/{arch}/{file_name}`
pub fn write_local_apk(packages_dir: &Path, arch: &str, file_name: &str, apk: &[u8]) {
    let arch_dir = packages_dir.join(arch);
    std::fs::create_dir_all(&arch_dir).unwrap();
    std::fs::write(arch_dir.join(file_name), apk).unwrap();
}
