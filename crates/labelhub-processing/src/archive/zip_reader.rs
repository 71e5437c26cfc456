use bytes::Bytes;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use super::{entry_name, ArchiveEntry, ArchiveError};

/// Upper bound for pre-allocating an entry buffer from its declared size.
const MAX_PREALLOC_BYTES: u64 = 16 * 1024 * 1024;

fn corrupt(err: impl std::fmt::Display) -> ArchiveError {
    ArchiveError::Corrupt(err.to_string())
}

pub(super) fn list(data: &[u8], max_entry_bytes: u64) -> Result<Vec<String>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(corrupt)?;
    let mut names = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index).map_err(corrupt)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry_name(entry.name())?;
        if entry.size() > max_entry_bytes {
            return Err(ArchiveError::EntryTooLarge {
                name,
                limit: max_entry_bytes,
            });
        }
        names.push(name);
    }

    Ok(names)
}

pub(super) fn read<F>(data: &[u8], max_entry_bytes: u64, mut sink: F) -> Result<(), ArchiveError>
where
    F: FnMut(ArchiveEntry) -> bool,
{
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(corrupt)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(corrupt)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry_name(entry.name())?;

        // The declared size is untrusted; the read itself is capped.
        let capacity = entry.size().min(MAX_PREALLOC_BYTES).min(max_entry_bytes);
        let mut buffer = Vec::with_capacity(capacity as usize);
        (&mut entry)
            .take(max_entry_bytes.saturating_add(1))
            .read_to_end(&mut buffer)
            .map_err(corrupt)?;
        if buffer.len() as u64 > max_entry_bytes {
            return Err(ArchiveError::EntryTooLarge {
                name,
                limit: max_entry_bytes,
            });
        }

        if !sink(ArchiveEntry {
            name,
            data: Bytes::from(buffer),
        }) {
            break;
        }
    }

    Ok(())
}
