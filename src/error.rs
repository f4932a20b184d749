//! Error types for patch operations.
//!
//! Malformed JSON in the target file is deliberately NOT an error kind:
//! a hand-corrupted config degrades to an empty document so the patch can
//! still be applied (the raw bytes are preserved in the backup).

use std::io;
use std::path::{Path, PathBuf};

/// Errors from configuration patching.
///
/// Every kind is terminal for the invocation; there is no retry. Each kind
/// carries a stable exit code so the CLI can be used inside automation.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// Path unreachable, parent directory missing, or backup write failure.
    #[error("filesystem error at {path}: {detail}")]
    Filesystem { path: PathBuf, detail: String },

    /// Insufficient rights to read or write the path or its backup.
    #[error("permission denied for {path}: {detail}")]
    Permission { path: PathBuf, detail: String },

    /// The collaborating daemon is not in the required running state.
    #[error("precondition failed: {detail}")]
    Precondition { detail: String },

    /// The caller supplied an empty override set.
    #[error("override set is empty; nothing to apply")]
    EmptyOverrides,
}

impl PatchError {
    /// Stable exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Filesystem { .. } => 1,
            Self::Permission { .. } => 2,
            Self::Precondition { .. } => 3,
            Self::EmptyOverrides => 4,
        }
    }

    /// Classify an I/O failure against a path.
    ///
    /// `PermissionDenied` becomes [`PatchError::Permission`]; everything
    /// else (missing parent directory included) is [`PatchError::Filesystem`].
    pub(crate) fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        let detail = err.to_string();
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::Permission { path, detail },
            _ => Self::Filesystem { path, detail },
        }
    }
}
