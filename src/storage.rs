//! Storage layer for tm
//!
//! Manages persistent state in two locations:
//! - `<workspace>/.tm/` - Workspace-local task collection
//! - `<home>/` - Global workspace registry and config (`~/.tm` by default)
//!
//! # Directory Structure
//!
//! ```text
//! <workspace>/.tm/              # One per workspace directory
//!   tasks.json                  # Ordered task collection
//!
//! ~/.tm/                        # Global home (override with --home / TM_HOME)
//!   workspaces.json             # Registry of all workspaces
//!   config.toml                 # Optional settings
//! ```
//!
//! Both collections are read whole, mutated in memory and written back whole.
//! [`with_collection`] is the only place that pattern is spelled out.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::atomic;
use crate::error::{Error, Result};

/// Name of the workspace-local directory
pub const LOCAL_DIR: &str = ".tm";

/// Task collection file inside [`LOCAL_DIR`]
pub const TASKS_FILE: &str = "tasks.json";

/// Registry file inside the home directory
pub const WORKSPACES_FILE: &str = "workspaces.json";

/// Config file inside the home directory
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the home directory
pub const HOME_ENV: &str = "TM_HOME";

/// Write JSON data atomically (pretty, stable, diffable)
pub fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(data)?;
    json.push('\n');
    atomic::write_atomic(path, json.as_bytes())
}

/// Read a JSON array, treating a missing or blank file as empty
pub fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

/// Load a collection, apply `f`, and write it back.
///
/// Nothing is written when `f` returns an error, so a failed operation never
/// leaves a partially mutated collection on disk.
pub fn with_collection<T, R, F>(path: &Path, f: F) -> Result<R>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(&mut Vec<T>) -> Result<R>,
{
    let mut records: Vec<T> = read_collection(path)?;
    let result = f(&mut records)?;
    write_json(path, &records)?;
    tracing::debug!(path = %path.display(), records = records.len(), "collection saved");
    Ok(result)
}

/// Resolve the global home directory.
///
/// An explicit path wins, then [`HOME_ENV`], then `~/.tm`.
pub fn resolve_home(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(normalize_path(&path));
    }

    if let Some(value) = std::env::var_os(HOME_ENV) {
        if !value.is_empty() {
            return Ok(normalize_path(Path::new(&value)));
        }
    }

    let dirs = directories::BaseDirs::new().ok_or_else(|| {
        Error::OperationFailed("cannot determine the user home directory".to_string())
    })?;
    Ok(dirs.home_dir().join(LOCAL_DIR))
}

/// Absolute, lexically normalised form of `path` (`.` and `..` resolved
/// without touching the filesystem, symlinks are kept as-is).
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Serialize, serde::Deserialize, PartialEq, Debug)]
    struct Record {
        id: u32,
        message: String,
    }

    fn record(id: u32, message: &str) -> Record {
        Record {
            id,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.json");

        let data = vec![record(1, "first"), record(2, "second")];
        write_json(&path, &data).unwrap();
        let read_back: Vec<Record> = read_collection(&path).unwrap();

        assert_eq!(data, read_back);
    }

    #[test]
    fn written_json_is_indented() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.json");

        write_json(&path, &vec![record(1, "first")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  {\n    \"id\": 1,"));
        assert!(content.ends_with("]\n"));
    }

    #[test]
    fn missing_or_blank_collection_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.json");
        let records: Vec<Record> = read_collection(&path).unwrap();
        assert!(records.is_empty());

        fs::write(&path, "  \n").unwrap();
        let records: Vec<Record> = read_collection(&path).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn with_collection_saves_mutation() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.json");

        let count = with_collection(&path, |records: &mut Vec<Record>| {
            records.push(record(1, "first"));
            records.push(record(2, "second"));
            Ok(records.len())
        })
        .unwrap();

        assert_eq!(count, 2);
        let stored: Vec<Record> = read_collection(&path).unwrap();
        assert_eq!(stored, vec![record(1, "first"), record(2, "second")]);
    }

    #[test]
    fn with_collection_skips_write_on_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.json");
        write_json(&path, &vec![record(1, "keep")]).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let result: Result<()> = with_collection(&path, |records: &mut Vec<Record>| {
            records.clear();
            Err(Error::InvalidArgument("nope".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn malformed_collection_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.json");
        fs::write(&path, "{not json").unwrap();

        let result: Result<Vec<Record>> = read_collection(&path);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn normalize_resolves_dots() {
        let normalized = normalize_path(Path::new("/srv/projects/./a/../b"));
        assert_eq!(normalized, PathBuf::from("/srv/projects/b"));
    }

    #[test]
    fn normalize_makes_relative_paths_absolute() {
        let normalized = normalize_path(Path::new("notes"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("notes"));
    }

    #[test]
    fn explicit_home_wins() {
        let temp = TempDir::new().unwrap();
        let home = resolve_home(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(home, normalize_path(temp.path()));
    }
}
