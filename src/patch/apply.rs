//! The filesystem shell around the merge
//!
//! One invocation is a single linear sequence: read, back up, merge, write.
//! The backup is written before the primary. The primary write goes through
//! a sibling temp file and a rename so a crash never leaves a truncated
//! config behind.

use chrono::Utc;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PatchError;

use super::merge::apply_overrides;
use super::overrides::OverrideSet;
use super::result::{BackupArtifact, PatchOutcome, PatchResult};

/// Applies an override set to a JSON configuration file.
pub struct ConfigPatcher;

impl ConfigPatcher {
    pub fn new() -> Self {
        Self
    }

    /// Apply `overrides` to the document at `path`.
    ///
    /// A missing or malformed file is treated as an empty document; the raw
    /// bytes of any existing file are copied to the backup path before the
    /// merged document is written. The parent directory must already exist.
    pub fn apply(&self, path: &Path, overrides: &OverrideSet) -> Result<PatchResult, PatchError> {
        if overrides.is_empty() {
            return Err(PatchError::EmptyOverrides);
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(PatchError::Filesystem {
                    path: path.to_path_buf(),
                    detail: format!("parent directory {} does not exist", parent.display()),
                });
            }
        }

        let existing = read_existing(path)?;

        // The raw pre-parse bytes are what get backed up, even when they
        // are not valid JSON.
        let backup = match &existing {
            Some(bytes) => Some(write_backup(path, bytes)?),
            None => None,
        };

        let base = existing
            .as_deref()
            .and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok())
            .unwrap_or_else(|| Value::Object(Map::new()));

        let merged = apply_overrides(base, overrides);

        let mut rendered =
            serde_json::to_string_pretty(&merged).map_err(|e| PatchError::Filesystem {
                path: path.to_path_buf(),
                detail: format!("failed to serialize merged config: {}", e),
            })?;
        rendered.push('\n');

        write_atomic(path, rendered.as_bytes())?;

        Ok(PatchResult {
            outcome: if existing.is_some() {
                PatchOutcome::Updated
            } else {
                PatchOutcome::Created
            },
            path: path.display().to_string(),
            backup,
            applied_keys: overrides.keys().map(str::to_string).collect(),
            config: merged,
            created_at: Utc::now(),
        })
    }

    /// Compute the merged document without touching the filesystem.
    pub fn preview(&self, path: &Path, overrides: &OverrideSet) -> Result<Value, PatchError> {
        Ok(apply_overrides(load_document(path)?, overrides))
    }
}

impl Default for ConfigPatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the document at `path` leniently: a missing file or malformed JSON
/// yields an empty document. Only hard I/O failures (e.g. permission
/// denied) are errors.
pub fn load_document(path: &Path) -> Result<Value, PatchError> {
    let value = read_existing(path)?
        .as_deref()
        .and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok())
        .unwrap_or_else(|| Value::Object(Map::new()));
    Ok(value)
}

/// Backup location for a config path: the sibling `<path>.backup`.
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".backup");
    PathBuf::from(name)
}

fn read_existing(path: &Path) -> Result<Option<Vec<u8>>, PatchError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PatchError::from_io(path, e)),
    }
}

fn write_backup(path: &Path, bytes: &[u8]) -> Result<BackupArtifact, PatchError> {
    let backup_path = backup_path_for(path);
    fs::write(&backup_path, bytes).map_err(|e| PatchError::from_io(&backup_path, e))?;

    let mut hasher = Sha256::new();
    hasher.update(bytes);

    Ok(BackupArtifact {
        path: backup_path.display().to_string(),
        bytes: bytes.len() as u64,
        sha256: hex::encode(hasher.finalize()),
    })
}

/// Write via sibling temp file + rename so the destination is never left
/// truncated.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PatchError> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(&format!(".tmp.{}", std::process::id()));
    let tmp = PathBuf::from(tmp_name);

    fs::write(&tmp, contents).map_err(|e| PatchError::from_io(&tmp, e))?;

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        PatchError::from_io(path, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path_is_sibling_suffix() {
        let path = Path::new("/home/op/.docker/daemon.json");
        assert_eq!(
            backup_path_for(path),
            PathBuf::from("/home/op/.docker/daemon.json.backup")
        );
    }

    #[test]
    fn test_empty_overrides_rejected() {
        let patcher = ConfigPatcher::new();
        let err = patcher
            .apply(Path::new("/tmp/whatever.json"), &OverrideSet::new())
            .unwrap_err();
        assert!(matches!(err, PatchError::EmptyOverrides));
    }
}
