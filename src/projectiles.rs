//! Fixed-capacity projectile pool: integration, map collision, hurtbox hits,
//! and lifetime expiry, one pass per frame over the pool in ascending slot
//! order.

use crate::data::{CharacterDef, GameState, MapData};
use crate::types::PlayerId;

/// Advances every active projectile by one frame, in ascending slot order.
///
/// A projectile deactivates the instant it touches a map solid, hits the
/// opposing player's hurtbox (dealing its damage), or its lifetime counts
/// down to zero — whichever happens first, in that order, within the same
/// frame.
pub fn step_projectiles(state: &mut GameState, defs: &[CharacterDef; 2], map: &MapData) {
    for slot in 0..state.projectiles.len() {
        if !state.projectiles[slot].active {
            continue;
        }

        let projectile = state.projectiles[slot];
        let mut next = projectile;
        next.pos_x += projectile.vel_x;
        next.pos_y += projectile.vel_y;

        let body = next.aabb();

        if map.solids.iter().any(|solid| body.overlaps(solid)) {
            deactivate(state, slot);
            continue;
        }

        let target = projectile.owner.opponent();
        let target_def = &defs[target.index()];
        let target_player = state.player(target);
        if !target_player.is_defeated() {
            let hurtbox = target_player.hurtbox(target_def.hitbox_width, target_def.hitbox_height);
            if body.overlaps(&hurtbox) {
                let defender = state.player_mut(target);
                defender.health = defender.health.saturating_sub(next.damage).max(0);
                deactivate(state, slot);
                continue;
            }
        }

        if next.lifetime_frames == 0 {
            deactivate(state, slot);
            continue;
        }
        next.lifetime_frames -= 1;
        state.projectiles[slot] = next;
    }
}

fn deactivate(state: &mut GameState, slot: usize) {
    state.projectiles[slot] = crate::data::ProjectileState::INACTIVE;
    state.active_projectile_count = state.active_projectile_count.saturating_sub(1);
}

/// Activates the first free slot with the given projectile, if any room
/// remains in the pool. Returns `false` (no state changed) if the pool is
/// full.
#[must_use]
pub fn spawn(state: &mut GameState, projectile: crate::data::ProjectileState) -> bool {
    match state.free_projectile_slot() {
        Some(slot) => {
            state.projectiles[slot] = projectile;
            state.active_projectile_count += 1;
            true
        }
        None => false,
    }
}
