//! confpatch - idempotent JSON configuration patcher
//!
//! Safely merges a set of top-level key/value overrides into an external
//! JSON configuration file: unrelated keys are preserved, a missing or
//! corrupt file degrades to an empty document, and the raw prior bytes are
//! backed up to a sibling path before anything is written. The motivating
//! use case is repairing the per-user Docker daemon config (DNS resolvers,
//! the `ipv6` flag, `fixed-cidr-v6`).

pub mod error;
pub mod patch;
pub mod probe;

pub use error::PatchError;
pub use patch::{
    apply_overrides, docker_network_defaults, ConfigPatcher, OverrideSet, PatchOutcome,
    PatchResult,
};
pub use probe::{ensure_daemon_running, DaemonProbe, DockerCliProbe, ProbeStatus};
