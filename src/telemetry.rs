//! Desync reporting: what a peer learns when its local state hash disagrees
//! with the hash the other side advertised for the same frame.
//!
//! Narrowed from a general violation-observer framework down to the one
//! concern this crate actually owns: producing a [`DesyncReport`] and
//! logging it via `tracing`. Anything beyond that (metrics routing,
//! alerting, collecting observers for tests) belongs to the embedding
//! application, not the simulation core.

use crate::data::GameState;

/// Emitted when [`crate::rollback::RollbackController::check_peer_hash`] finds
/// that the local and remote hashes for the same frame disagree.
///
/// Carries a full snapshot of the local state at the mismatched frame so the
/// embedding application can log it, persist it for a bug report, or render
/// it for debugging, without this crate needing to know how.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DesyncReport {
    /// The frame at which the hashes diverged.
    pub frame: u32,
    /// The hash this peer computed for `frame`.
    pub local_hash: u32,
    /// The hash the remote peer reported for `frame`.
    pub peer_hash: u32,
    /// The full local state at `frame`, for offline diffing.
    pub local_state: GameState,
}

impl DesyncReport {
    /// Builds a report and immediately logs it via `tracing::error!`.
    #[must_use]
    pub fn new(frame: u32, local_hash: u32, peer_hash: u32, local_state: GameState) -> Self {
        let report = Self {
            frame,
            local_hash,
            peer_hash,
            local_state,
        };
        tracing::error!(
            frame = report.frame,
            local_hash = report.local_hash,
            peer_hash = report.peer_hash,
            "state desync detected"
        );
        report
    }

    /// Serializes this report to a JSON string.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Serializes this report to a pretty-printed JSON string.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json_pretty(&self) -> Option<String> {
        serde_json::to_string_pretty(self).ok()
    }
}

impl std::fmt::Display for DesyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "desync at frame {}: local={:#010x} peer={:#010x}",
            self.frame, self.local_hash, self.peer_hash
        )
    }
}
