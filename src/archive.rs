// src/archive.rs

//! APK archive extraction
//!
//! Streams a (possibly compressed) tar archive into a destination directory,
//! preserving the relative hierarchy so soname discovery can walk the
//! extracted tree. The caller owns the destination directory lifecycle;
//! nothing is cleaned up here on failure.

use crate::compression::{create_decoder, CompressionFormat};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tar::Archive;
use tracing::debug;

/// Unpack a tar archive from `reader` into `dest`
///
/// The compression format is detected from the stream's magic bytes, so
/// gzip (the APK default), xz, zstd, and raw tar all work. Zero-filled
/// blocks between tar segments are tolerated because an APK is three
/// concatenated tar segments (signature, control, data), not one archive
/// with a single end marker.
///
/// Entries that would escape `dest` are skipped rather than written.
pub fn unpack<R: Read>(reader: R, dest: &Path) -> Result<()> {
    let mut buffered = BufReader::new(reader);
    let magic = buffered
        .fill_buf()
        .map_err(|e| Error::Extraction(format!("failed to read archive header: {e}")))?;
    let format = CompressionFormat::from_magic_bytes(magic);

    let decoder = create_decoder(buffered, format)
        .map_err(|e| Error::Extraction(e.to_string()))?;

    let mut archive = Archive::new(decoder);
    archive.set_ignore_zeros(true);

    let entries = archive
        .entries()
        .map_err(|e| Error::Extraction(format!("failed to read archive entries: {e}")))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| Error::Extraction(format!("failed to read archive entry: {e}")))?;

        // unpack_in refuses paths that traverse outside dest
        let unpacked = entry
            .unpack_in(dest)
            .map_err(|e| Error::Extraction(format!("failed to unpack archive entry: {e}")))?;

        if !unpacked {
            let path = entry.path().map(|p| p.display().to_string());
            debug!("skipped archive entry outside destination: {:?}", path);
        }
    }

    Ok(())
}

/// Open `path` and unpack it into `dest`
pub fn unpack_file(path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(path)
        .map_err(|e| Error::Io(format!("failed to read {}: {e}", path.display())))?;
    unpack(file, dest)
}
