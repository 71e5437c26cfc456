//! RAR support through the system unrar library. unrar only opens archives from
//! disk, so the upload is spilled to a temporary file first.

use bytes::Bytes;
use std::io::Write;
use tempfile::NamedTempFile;
use unrar::Archive;

use super::{entry_name, ArchiveEntry, ArchiveError};

fn corrupt(err: impl std::fmt::Display) -> ArchiveError {
    ArchiveError::Corrupt(err.to_string())
}

fn spill(data: &[u8]) -> Result<NamedTempFile, ArchiveError> {
    let mut file = tempfile::Builder::new()
        .prefix("labelhub-import-")
        .suffix(".rar")
        .tempfile()?;
    file.write_all(data)?;
    file.flush()?;
    Ok(file)
}

fn check_size(name: &str, size: u64, max_entry_bytes: u64) -> Result<(), ArchiveError> {
    if size > max_entry_bytes {
        return Err(ArchiveError::EntryTooLarge {
            name: name.to_string(),
            limit: max_entry_bytes,
        });
    }
    Ok(())
}

pub(super) fn list(data: &[u8], max_entry_bytes: u64) -> Result<Vec<String>, ArchiveError> {
    let file = spill(data)?;
    let archive = Archive::new(file.path())
        .open_for_listing()
        .map_err(corrupt)?;

    let mut names = Vec::new();
    for header in archive {
        let header = header.map_err(corrupt)?;
        if header.is_directory() {
            continue;
        }
        let name = entry_name(&header.filename.to_string_lossy())?;
        check_size(&name, header.unpacked_size, max_entry_bytes)?;
        names.push(name);
    }

    Ok(names)
}

pub(super) fn read<F>(data: &[u8], max_entry_bytes: u64, mut sink: F) -> Result<(), ArchiveError>
where
    F: FnMut(ArchiveEntry) -> bool,
{
    let file = spill(data)?;
    let mut archive = Archive::new(file.path())
        .open_for_processing()
        .map_err(corrupt)?;

    while let Some(header) = archive.read_header().map_err(corrupt)? {
        archive = if header.entry().is_file() {
            let name = entry_name(&header.entry().filename.to_string_lossy())?;
            // unrar extracts a whole entry at once, sized by its header.
            check_size(&name, header.entry().unpacked_size, max_entry_bytes)?;
            let (content, next) = header.read().map_err(corrupt)?;
            check_size(&name, content.len() as u64, max_entry_bytes)?;
            if !sink(ArchiveEntry {
                name,
                data: Bytes::from(content),
            }) {
                return Ok(());
            }
            next
        } else {
            header.skip().map_err(corrupt)?
        };
    }

    Ok(())
}
