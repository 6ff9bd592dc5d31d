//! Atomic file replacement
//!
//! Every collection file is rewritten whole. Writing to a sibling temp file
//! and renaming it over the target means a crash mid-write leaves either the
//! old or the new contents, never a truncated file.
//!
//! There is no locking here: two concurrent `tm` processes can still lose
//! each other's updates (last writer wins).

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Atomically write data to a file
///
/// This writes to a temporary file in the same directory, then renames
/// it to the target path. Missing parent directories are created.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Same directory as the target, so the rename stays on one filesystem
    let temp_path = temp_path_for(path);

    let written = write_temp(&temp_path, data).and_then(|()| fs::rename(&temp_path, path));
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    Ok(())
}

fn write_temp(temp_path: &Path, data: &[u8]) -> io::Result<()> {
    let mut temp_file = File::create(temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    path.with_extension(format!(
        "{}.tmp.{}",
        path.extension().and_then(|e| e.to_str()).unwrap_or(""),
        std::process::id()
    ))
}
