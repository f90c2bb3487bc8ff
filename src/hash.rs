//! The cross-peer state hash: a pinned 32-bit FNV-1a over a canonical,
//! little-endian serialization of [`GameState`].
//!
//! Peers exchange this value every few frames to detect desync without
//! shipping the whole state (spec §4.9). The constants and field order below
//! are a fixed wire contract, not an implementation detail: changing either
//! breaks cross-peer agreement even though both sides would still "hash
//! correctly" on their own.

use crate::data::{GameState, PlayerState, ProjectileState, MAX_PROJECTILES};

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

struct Fnv1a32(u32);

impl Fnv1a32 {
    fn new() -> Self {
        Fnv1a32(FNV_OFFSET_BASIS)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u32::from(b);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn write_i32(&mut self, v: i32) {
        self.write(&v.to_le_bytes());
    }

    fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    fn write_u16(&mut self, v: u16) {
        self.write(&v.to_le_bytes());
    }

    fn write_i16(&mut self, v: i16) {
        self.write(&v.to_le_bytes());
    }

    fn write_u8(&mut self, v: u8) {
        self.write(&[v]);
    }

    fn finish(self) -> u32 {
        self.0
    }
}

fn hash_player(h: &mut Fnv1a32, player: &PlayerState) {
    h.write_i32(player.pos_x.raw());
    h.write_i32(player.pos_y.raw());
    h.write_i32(player.vel_x.raw());
    h.write_i32(player.vel_y.raw());
    h.write_u8(player.facing as u8);
    h.write_u8(u8::from(player.grounded));
    h.write_i16(player.health);
    h.write_u16(player.hitstun_remaining);
    h.write_u8(u8::from(player.current_action_id.is_some()));
    h.write_u32(player.current_action_id.unwrap_or(0));
    h.write_u16(player.action_frame);
    h.write_u16(player.meter);
    for word in player.input_buffer {
        h.write_u16(word.0);
    }
}

/// Inactive slots are canonicalized to [`ProjectileState::INACTIVE`] before
/// hashing, so stale position/velocity data left behind in a freed slot never
/// changes the hash.
fn hash_projectile(h: &mut Fnv1a32, slot: &ProjectileState) {
    let canonical = if slot.active {
        *slot
    } else {
        ProjectileState::INACTIVE
    };
    h.write_u8(u8::from(canonical.active));
    h.write_i32(canonical.pos_x.raw());
    h.write_i32(canonical.pos_y.raw());
    h.write_i32(canonical.vel_x.raw());
    h.write_i32(canonical.vel_y.raw());
    h.write_u8(canonical.owner.index() as u8);
    h.write_i16(canonical.damage);
    h.write_u16(canonical.lifetime_frames);
    h.write_i32(canonical.bounds.0.raw());
    h.write_i32(canonical.bounds.1.raw());
}

/// Computes the canonical state hash for `state`.
#[must_use]
pub fn state_hash(state: &GameState) -> u32 {
    let mut h = Fnv1a32::new();
    h.write_u32(state.frame_index);
    hash_player(&mut h, &state.players[0]);
    hash_player(&mut h, &state.players[1]);
    for slot in &state.projectiles[..MAX_PROJECTILES] {
        hash_projectile(&mut h, slot);
    }
    h.write_u32(state.active_projectile_count);
    h.write_u32(state.rng_state);
    h.finish()
}
