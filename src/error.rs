//! Error types for the simulation core.
//!
//! Structured, zero-allocation variants over string-formatted ones, so a
//! caller can match on the specific failure instead of parsing a message.

use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// Every error this crate can return.
///
/// `#[non_exhaustive]`: new variants may be added without a breaking change.
/// Always include a wildcard arm when matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DuelcoreError {
    /// `get_state`/`submit_remote_inputs` referenced a frame outside the
    /// rollback window currently held in the ring buffer.
    FrameNotInWindow {
        /// The frame that was requested.
        requested: i32,
        /// The oldest frame still held in the window.
        oldest_available: i32,
        /// The controller's current frame.
        current: i32,
    },
}

impl Display for DuelcoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameNotInWindow {
                requested,
                oldest_available,
                current,
            } => {
                write!(
                    f,
                    "frame {requested} is outside the rollback window (oldest available: {oldest_available}, current: {current})"
                )
            }
        }
    }
}

impl Error for DuelcoreError {}
