//! Small typed wrappers shared across the simulation core.
//!
//! Mirrors the newtype discipline `fortress_rollback::Frame` applies to frame
//! numbers: a player index or an input word gets its own type instead of a
//! bare integer, so the compiler catches a player index used where an input
//! bitfield was expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A player slot. Duelcore is a fixed two-player core (spec Non-goals exclude
/// 3+ players), so this is an enum rather than an unbounded handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    /// Player 0.
    P0,
    /// Player 1.
    P1,
}

impl PlayerId {
    /// Both player IDs, in ascending order. Iterating this (rather than a raw
    /// `0..2` range) is how every per-player pass in this crate gets its
    /// "ascending index" ordering for determinism.
    pub const ALL: [PlayerId; 2] = [PlayerId::P0, PlayerId::P1];

    /// Index into a `[T; 2]` array.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerId::P0 => 0,
            PlayerId::P1 => 1,
        }
    }

    /// The other player.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> PlayerId {
        match self {
            PlayerId::P0 => PlayerId::P1,
            PlayerId::P1 => PlayerId::P0,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Which way a player is facing. `Right` is `+1`, `Left` is `-1`, matching
/// spec §3's `facing ∈ {LEFT=-1, RIGHT=+1}`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing left, sign `-1`.
    Left,
    /// Facing right, sign `+1`.
    Right,
}

impl Facing {
    /// Signed multiplier (`-1` or `+1`) for mirroring action data.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    /// Facing corresponding to a horizontal input direction, or `None` if
    /// neither `LEFT` nor `RIGHT` (or both) is held.
    #[inline]
    #[must_use]
    pub fn from_input(inputs: InputBits) -> Option<Facing> {
        match (inputs.contains(InputBits::LEFT), inputs.contains(InputBits::RIGHT)) {
            (true, false) => Some(Facing::Left),
            (false, true) => Some(Facing::Right),
            _ => None,
        }
    }
}

/// A 16-bit input word for one player on one frame. Bit assignments are fixed
/// and externally visible per spec §3/§6.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputBits(pub u16);

impl InputBits {
    /// No buttons held.
    pub const NONE: InputBits = InputBits(0);
    /// `UP`.
    pub const UP: InputBits = InputBits(0x0001);
    /// `DOWN`.
    pub const DOWN: InputBits = InputBits(0x0002);
    /// `LEFT`.
    pub const LEFT: InputBits = InputBits(0x0004);
    /// `RIGHT`.
    pub const RIGHT: InputBits = InputBits(0x0008);
    /// `JUMP`.
    pub const JUMP: InputBits = InputBits(0x0010);
    /// `ATTACK`.
    pub const ATTACK: InputBits = InputBits(0x0020);
    /// `SPECIAL`.
    pub const SPECIAL: InputBits = InputBits(0x0040);
    /// `DEFEND`.
    pub const DEFEND: InputBits = InputBits(0x0080);

    /// `true` if every bit set in `mask` is also set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, mask: InputBits) -> bool {
        self.0 & mask.0 == mask.0
    }

    /// Bitwise union of two input words.
    #[inline]
    #[must_use]
    pub const fn union(self, other: InputBits) -> InputBits {
        InputBits(self.0 | other.0)
    }
}
