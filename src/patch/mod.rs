//! Configuration patching
//!
//! The patcher is split the usual way: a pure merge function with no I/O,
//! a typed override set, and a thin filesystem shell that reads, backs up,
//! merges, and writes.

mod apply;
mod merge;
mod overrides;
mod result;

pub use apply::{backup_path_for, load_document, ConfigPatcher};
pub use merge::apply_overrides;
pub use overrides::{docker_network_defaults, OverrideSet};
pub use result::{BackupArtifact, PatchOutcome, PatchResult};
