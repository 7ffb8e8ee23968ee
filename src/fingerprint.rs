//! Plan fingerprinting and change detection.
//!
//! The fingerprint is SHA-256 over each discovered file's source path and
//! modification time, folded in discovery order. It does not cover file
//! contents: an edit that preserves the modification time is invisible to
//! it, and a touched-but-unchanged file still forces regeneration. The
//! recorded digest is a regeneration shortcut, not an integrity check.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::SystemTime;

/// Running digest over the discovered file set.
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Fold one file's identity into the digest.
    ///
    /// Must be called in discovery order; the fold is order-sensitive.
    pub fn fold(&mut self, source_path: &str, mtime: SystemTime) {
        let stamp = mtime
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        self.hasher.update(source_path.as_bytes());
        self.hasher
            .update(format!(":{}.{:09}\n", stamp.as_secs(), stamp.subsec_nanos()).as_bytes());
    }

    /// Produce the hex digest string.
    pub fn finish(self) -> String {
        hex_encode(&self.hasher.finalize())
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the recorded fingerprint, if any.
///
/// An absent or unreadable record means "no prior state" and the caller
/// proceeds with generation.
pub fn recorded(record_path: &Path) -> Option<String> {
    std::fs::read_to_string(record_path)
        .ok()
        .map(|s| s.trim().to_string())
}

/// Whether the recorded fingerprint matches the freshly computed one.
pub fn is_current(record_path: &Path, fingerprint: &str) -> bool {
    recorded(record_path).is_some_and(|old| old == fingerprint)
}

/// Persist the fingerprint record.
///
/// Called only after emission succeeds, so a failed run leaves the old
/// record intact and the next run regenerates.
pub fn persist(record_path: &Path, fingerprint: &str) -> Result<()> {
    std::fs::write(record_path, fingerprint).with_context(|| {
        format!(
            "Failed to write fingerprint record: {}",
            record_path.display()
        )
    })
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        hex.push_str(&format!("{b:02x}"));
    }
    hex
}
