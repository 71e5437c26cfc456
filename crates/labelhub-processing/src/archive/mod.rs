//! Archive readers
//!
//! Entries come out in the order the archive stores them (zip central directory,
//! rar header order). Directory entries are skipped and every member is reduced
//! to its base file name. Readers are synchronous; callers run them on a
//! blocking thread.

#[cfg(feature = "rar")]
mod rar_reader;
mod zip_reader;

use bytes::Bytes;
use labelhub_core::AppError;

use crate::upload::classify;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Failed to read archive: {0}")]
    Corrupt(String),

    #[error("Archive entry has an invalid name: {0:?}")]
    InvalidEntryName(String),

    #[error("Archive entry {name:?} is larger than {limit} bytes when decompressed")]
    EntryTooLarge { name: String, limit: u64 },

    #[error("Unsupported archive format: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ArchiveError> for AppError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::Io(e) => AppError::Internal(format!("Archive IO error: {}", e)),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Rar,
}

impl ArchiveFormat {
    /// Format for a lowercased extension without the dot
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "zip" => Some(ArchiveFormat::Zip),
            "rar" => Some(ArchiveFormat::Rar),
            _ => None,
        }
    }
}

/// One decompressed archive member
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Base file name of the member
    pub name: String,
    pub data: Bytes,
}

fn entry_name(raw: &str) -> Result<String, ArchiveError> {
    let name = classify::base_name(raw);
    if name.is_empty() || name == "." || name == ".." {
        return Err(ArchiveError::InvalidEntryName(raw.to_string()));
    }
    Ok(name.to_string())
}

/// Names of all file entries, without decompressing them.
///
/// Entries whose declared size exceeds `max_entry_bytes` are rejected here, before
/// anything is uploaded.
pub fn list_entries(
    format: ArchiveFormat,
    data: &[u8],
    max_entry_bytes: u64,
) -> Result<Vec<String>, ArchiveError> {
    match format {
        ArchiveFormat::Zip => zip_reader::list(data, max_entry_bytes),
        #[cfg(feature = "rar")]
        ArchiveFormat::Rar => rar_reader::list(data, max_entry_bytes),
        #[cfg(not(feature = "rar"))]
        ArchiveFormat::Rar => {
            let _ = max_entry_bytes;
            Err(ArchiveError::Unsupported(
                "rar support is not enabled".to_string(),
            ))
        }
    }
}

/// Decompress file entries one at a time and hand them to `sink`.
///
/// No entry is ever buffered beyond `max_entry_bytes`, whatever its header claims.
/// Stops early, without error, as soon as `sink` returns `false`.
pub fn read_entries<F>(
    format: ArchiveFormat,
    data: &[u8],
    max_entry_bytes: u64,
    sink: F,
) -> Result<(), ArchiveError>
where
    F: FnMut(ArchiveEntry) -> bool,
{
    match format {
        ArchiveFormat::Zip => zip_reader::read(data, max_entry_bytes, sink),
        #[cfg(feature = "rar")]
        ArchiveFormat::Rar => rar_reader::read(data, max_entry_bytes, sink),
        #[cfg(not(feature = "rar"))]
        ArchiveFormat::Rar => {
            let _ = (max_entry_bytes, sink);
            Err(ArchiveError::Unsupported(
                "rar support is not enabled".to_string(),
            ))
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    /// In-memory zip. Names ending in `/` become directory entries.
    pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }
}
