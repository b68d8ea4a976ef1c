//! Persistence of the menu order: one identifier per line, UTF-8.

use crate::entry::EntryId;
use fs_err as fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Menu file has no parent directory: {0}")]
    NoParent(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub fn parse_menu(content: &str) -> Vec<EntryId> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(EntryId::new)
        .collect()
}

pub fn format_menu(ids: &[EntryId]) -> String {
    ids.iter().fold(String::new(), |mut out, id| {
        out.push_str(id.as_str());
        out.push('\n');
        out
    })
}

/// Reads the stored order. A missing file is an empty menu; undecodable
/// bytes are replaced rather than failing the whole read.
pub fn read_menu(path: &Path) -> Result<Vec<EntryId>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(parse_menu(&String::from_utf8_lossy(&bytes))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Writes to a sibling temp file and renames it over `path`, so a reader
/// sees either the old or the new order.
pub fn write_menu(path: &Path, ids: &[EntryId]) -> Result<(), StoreError> {
    let parent = path
        .parent()
        .ok_or_else(|| StoreError::NoParent(path.to_path_buf()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let mut file = fs::File::create(&tmp)?;
    file.write_all(format_menu(ids).as_bytes())?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp, path)?;
    log::debug!("Stored {} menu entries to {}", ids.len(), path.display());
    Ok(())
}
