//! # Duelcore
//!
//! A deterministic simulation core for a two-player fighting game, built for
//! rollback-style peer-to-peer networking: every operation is pure fixed-point
//! arithmetic over a compact [`GameState`](data::GameState), so two peers that
//! start from the same state and apply the same inputs end up bit-identical.
//!
//! This crate owns the simulation only. Transport, matchmaking, input
//! collection, and rendering are the embedder's job; duelcore hands back a
//! frame-addressable history of states via [`RollbackController`] and leaves
//! everything else alone.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod actions;
pub mod combat;
pub mod data;
pub mod error;
pub mod fixed;
pub mod geometry;
pub mod hash;
pub mod physics;
pub mod projectiles;
pub mod rng;
pub mod rollback;
pub mod simulation;
pub mod telemetry;
#[cfg(test)]
pub(crate) mod test_config;
pub mod types;

pub use data::{
    ActionDef, ActionFrameData, CharacterDef, GameState, HitboxEvent, InputFrame, MapData,
    PlayerState, ProjectileSpawn, ProjectileState, MAX_PROJECTILES,
};
pub use error::DuelcoreError;
pub use fixed::Fixed;
pub use rollback::RollbackController;
pub use telemetry::DesyncReport;
pub use types::{Facing, InputBits, PlayerId};

/// Fixed-point scale factor (spec §3): the stored integer `x` of a [`Fixed`]
/// represents the logical value `x / FIXED_POINT_SCALE`. Both peers must agree
/// on this constant, so it is a compile-time part of the wire contract rather
/// than a runtime-tunable setting.
pub const FIXED_POINT_SCALE: i32 = fixed::SCALE;

/// Number of past frames the rollback controller keeps state and input history
/// for. A `get_state`/`submit_remote_inputs` call referencing a frame older
/// than `current_frame() - ROLLBACK_WINDOW` returns
/// [`DuelcoreError::FrameNotInWindow`].
pub const ROLLBACK_WINDOW: usize = 120;
