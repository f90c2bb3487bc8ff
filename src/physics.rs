//! Per-player physics: movement input, gravity, map collision, friction, and
//! the kill floor, in the fixed order spec §4.3 requires.
//!
//! Collision is swept one axis at a time (X fully resolved before Y starts),
//! against a fixed, ordered list of solids — the first solid a player's box
//! overlaps wins the resolution, so two peers iterating the same `MapData`
//! always pick the same one.

use crate::data::{CharacterDef, MapData, PlayerState};
use crate::fixed::Fixed;
use crate::geometry::Aabb;
use crate::types::{Facing, InputBits};

/// Advances one player by one frame of physics. Skips defeated players
/// (spec §4.5: physics and combat both skip a player once `health` reaches
/// zero).
pub fn step_player(player: &mut PlayerState, def: &CharacterDef, inputs: InputBits, map: &MapData) {
    if player.is_defeated() {
        return;
    }

    apply_movement_input(player, def, inputs);
    apply_gravity(player, def);
    resolve_collision_x(player, def, map);
    resolve_collision_y(player, def, map);
    apply_friction(player, def);
    apply_kill_floor(player, map);
}

fn apply_movement_input(player: &mut PlayerState, def: &CharacterDef, inputs: InputBits) {
    if player.hitstun_remaining > 0 {
        return;
    }

    match Facing::from_input(inputs) {
        Some(Facing::Left) => {
            player.vel_x = -def.walk_speed;
            player.facing = Facing::Left;
        }
        Some(Facing::Right) => {
            player.vel_x = def.walk_speed;
            player.facing = Facing::Right;
        }
        None => player.vel_x = Fixed::ZERO,
    }

    if inputs.contains(InputBits::JUMP) && player.grounded {
        player.vel_y = def.jump_force;
        player.grounded = false;
    }
}

fn apply_gravity(player: &mut PlayerState, def: &CharacterDef) {
    if player.grounded {
        return;
    }
    player.vel_y -= def.gravity;
    if player.vel_y < -def.max_fall_speed {
        player.vel_y = -def.max_fall_speed;
    }
}

fn player_box(player: &PlayerState, def: &CharacterDef) -> Aabb {
    player.hurtbox(def.hitbox_width, def.hitbox_height)
}

fn first_overlap<'a>(body: &Aabb, map: &'a MapData) -> Option<&'a Aabb> {
    map.solids.iter().find(|solid| body.overlaps(solid))
}

fn resolve_collision_x(player: &mut PlayerState, def: &CharacterDef, map: &MapData) {
    player.pos_x += player.vel_x;
    let half_width = Fixed::from_raw(def.hitbox_width.raw() / 2);
    let body = player_box(player, def);
    if let Some(solid) = first_overlap(&body, map) {
        if player.vel_x > Fixed::ZERO {
            player.pos_x = solid.min_x - half_width;
        } else if player.vel_x < Fixed::ZERO {
            player.pos_x = solid.max_x + half_width;
        }
        player.vel_x = Fixed::ZERO;
    }
}

fn resolve_collision_y(player: &mut PlayerState, def: &CharacterDef, map: &MapData) {
    player.pos_y += player.vel_y;
    let half_height = Fixed::from_raw(def.hitbox_height.raw() / 2);
    let body = player_box(player, def);
    if let Some(solid) = first_overlap(&body, map) {
        if player.vel_y > Fixed::ZERO {
            player.pos_y = solid.min_y - half_height;
        } else if player.vel_y < Fixed::ZERO {
            player.pos_y = solid.max_y + half_height;
            player.grounded = true;
        }
        player.vel_y = Fixed::ZERO;
    }
}

fn apply_friction(player: &mut PlayerState, def: &CharacterDef) {
    let friction = if player.grounded {
        def.friction_ground
    } else {
        def.friction_air
    };
    player.vel_x = decay_toward_zero(player.vel_x, friction);
}

/// Moves `value` toward zero by `amount` without overshooting past zero (so
/// friction can never flip the sign of velocity, per spec §4.3).
fn decay_toward_zero(value: Fixed, amount: Fixed) -> Fixed {
    if value > Fixed::ZERO {
        Fixed::from_raw((value.raw() - amount.raw()).max(0))
    } else if value < Fixed::ZERO {
        Fixed::from_raw((value.raw() + amount.raw()).min(0))
    } else {
        Fixed::ZERO
    }
}

fn apply_kill_floor(player: &mut PlayerState, map: &MapData) {
    if player.pos_y < map.kill_floor_y {
        player.health = 0;
    }
}
