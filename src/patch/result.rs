//! Patch outcome reporting
//!
//! A [`PatchResult`] records what a single `apply` invocation did: whether
//! the file was created or updated, the backup provenance (path, size,
//! digest of the raw pre-patch bytes), and the merged document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether the target file existed before the patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOutcome {
    /// No file existed at the path; a new one was created (no backup).
    Created,
    /// An existing file was updated (backup taken first).
    Updated,
}

/// Provenance of the backup taken before the patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupArtifact {
    /// Sibling path the pre-patch bytes were copied to.
    pub path: String,
    /// Size of the backed-up content in bytes.
    pub bytes: u64,
    /// SHA-256 digest of the raw pre-patch bytes.
    pub sha256: String,
}

/// Result of a single patch invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchResult {
    /// Created vs updated.
    pub outcome: PatchOutcome,

    /// Target config file path.
    pub path: String,

    /// Backup provenance; absent when the file did not exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<BackupArtifact>,

    /// Override keys that were applied, in order.
    pub applied_keys: Vec<String>,

    /// The merged document now on disk.
    pub config: Value,

    /// When the patch completed.
    pub created_at: DateTime<Utc>,
}

impl PatchResult {
    /// Serialize to pretty-printed JSON for machine consumption.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable rendering for terminal output.
    pub fn to_human(&self) -> String {
        let mut out = String::new();

        match self.outcome {
            PatchOutcome::Created => out.push_str(&format!("Created {}\n", self.path)),
            PatchOutcome::Updated => out.push_str(&format!("Updated {}\n", self.path)),
        }

        out.push_str(&format!("  Applied: {}\n", self.applied_keys.join(", ")));

        match &self.backup {
            Some(backup) => {
                out.push_str(&format!(
                    "  Backup: {} ({} bytes, sha256 {})\n",
                    backup.path, backup.bytes, backup.sha256
                ));
            }
            None => out.push_str("  Backup: none (no prior file)\n"),
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PatchResult {
        PatchResult {
            outcome: PatchOutcome::Updated,
            path: "/home/op/.docker/daemon.json".to_string(),
            backup: Some(BackupArtifact {
                path: "/home/op/.docker/daemon.json.backup".to_string(),
                bytes: 24,
                sha256: "ab".repeat(32),
            }),
            applied_keys: vec!["dns".to_string(), "ipv6".to_string()],
            config: json!({"dns": ["8.8.8.8"], "ipv6": false}),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_outcome_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PatchOutcome::Created).unwrap(),
            "\"created\""
        );
        assert_eq!(
            serde_json::to_string(&PatchOutcome::Updated).unwrap(),
            "\"updated\""
        );
    }

    #[test]
    fn test_json_round_trip() {
        let result = sample();
        let json = result.to_json().unwrap();
        let back: PatchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.outcome, PatchOutcome::Updated);
        assert_eq!(back.applied_keys, result.applied_keys);
        assert_eq!(back.config, result.config);
    }

    #[test]
    fn test_human_output_mentions_backup() {
        let human = sample().to_human();
        assert!(human.starts_with("Updated "));
        assert!(human.contains("daemon.json.backup"));
        assert!(human.contains("dns, ipv6"));
    }

    #[test]
    fn test_backup_omitted_from_json_when_absent() {
        let mut result = sample();
        result.outcome = PatchOutcome::Created;
        result.backup = None;
        let json = result.to_json().unwrap();
        assert!(!json.contains("\"backup\""));
    }
}
