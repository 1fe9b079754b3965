// File: src/persistence.rs
use crate::core::session::DecodeSession;
use crate::errors::SnapshotError;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Replaces `path` with `contents` in one step: the bytes go to a temporary
/// file next to the target, which is then renamed over it. A failed write
/// leaves the previous file untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent_dir = parent_of(path);
    fs::create_dir_all(parent_dir)?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    temp_file.write_all(contents)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path)?;
    Ok(())
}

/// `<dir of destination>/<base name up to the first dot>.json`, falling back
/// to `fallback_stem` when the destination has no usable base name.
pub fn json_destination(destination: &Path, fallback_stem: &str) -> PathBuf {
    let stem = destination
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(fallback_stem);
    parent_of(destination).join(format!("{stem}.json"))
}

fn parent_of(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Writes the whole session, fingerprints included, as a bincode snapshot.
pub fn save_snapshot(session: &DecodeSession, path: &Path) -> Result<(), SnapshotError> {
    let parent_dir = parent_of(path);
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, session)?;
        writer.flush()?;
    }

    temp_file.persist(path)?;
    tracing::info!(path = %path.display(), words = session.len(), "saved session snapshot");
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<DecodeSession, SnapshotError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let session: DecodeSession = bincode::deserialize_from(reader)?;
    tracing::info!(path = %path.display(), words = session.len(), "loaded session snapshot");
    Ok(session)
}
