//! Hitbox/hurtbox resolution: turns a frame's candidate hitboxes into
//! knockback, damage, and hitstun applied to both players in one pass.
//!
//! Candidates are paired up in a fixed order — owner ascending, target
//! ascending, hitbox ascending — and every pair is scored before anything is
//! applied, so two hits landing on the same frame trade simultaneously
//! instead of one cascading into the other's resolution.

use crate::data::{CharacterDef, GameState};
use crate::fixed::Fixed;
use crate::geometry::Aabb;
use crate::types::PlayerId;

/// The baseline term in the knockback weight formula. A character's own
/// `weight_factor_base` is its effective mass; this constant is the reference
/// mass a hit is tuned against, so `weight_factor_base == WEIGHT_BASELINE`
/// yields no scaling at all.
pub const WEIGHT_BASELINE: Fixed = Fixed::from_int(100);

/// One hitbox, already positioned in world space for this frame, ready to be
/// tested against the opponent's hurtbox. Built by [`crate::actions`] from
/// the active [`crate::data::HitboxEvent`]s of whichever action each player
/// is running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedHitbox {
    /// The player who owns this hitbox. Never hits its own hurtbox.
    pub owner: PlayerId,
    /// World-space hitbox bounds for this frame.
    pub aabb: Aabb,
    /// Damage dealt on hit.
    pub damage: i16,
    /// Base knockback magnitude.
    pub base_knockback: Fixed,
    /// Additional knockback scaled by damage.
    pub knockback_growth: Fixed,
    /// Hitstun imparted before the defender's `hitstun_multiplier`.
    pub hitstun: u16,
}

/// The resolved effect of one hitbox landing on one target.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HitResult {
    target: PlayerId,
    damage: i16,
    knockback_x: Fixed,
    knockback_y: Fixed,
    hitstun: u16,
}

/// Resolves every hitbox against both players' hurtboxes and applies the
/// combined effect in a single pass.
///
/// Pairs are considered in `owner` ascending, `target` ascending, hitbox
/// ascending order, matching the order `hitboxes` is already built in
/// (one owner's events, in event order, before the next owner's).
pub fn resolve_hits(state: &mut GameState, defs: &[CharacterDef; 2], hitboxes: &[PositionedHitbox]) {
    let mut results = Vec::new();

    for owner in PlayerId::ALL {
        for hitbox in hitboxes.iter().filter(|h| h.owner == owner) {
            for target in PlayerId::ALL {
                if target == owner {
                    continue;
                }
                let defender = state.player(target);
                if defender.is_defeated() {
                    continue;
                }
                let target_def = &defs[target.index()];
                let hurtbox = defender.hurtbox(target_def.hitbox_width, target_def.hitbox_height);
                if !hitbox.aabb.overlaps(&hurtbox) {
                    continue;
                }
                results.push(score_hit(hitbox, target, defender, target_def));
            }
        }
    }

    for result in results {
        let player = state.player_mut(result.target);
        player.vel_x += result.knockback_x;
        player.vel_y += result.knockback_y;
        player.health = player.health.saturating_sub(result.damage).max(0);
        player.hitstun_remaining = player.hitstun_remaining.max(result.hitstun);
    }
}

fn score_hit(
    hitbox: &PositionedHitbox,
    target: PlayerId,
    defender: &crate::data::PlayerState,
    target_def: &CharacterDef,
) -> HitResult {
    let (center_x, center_y) = hitbox.aabb.center();
    let dx = defender.pos_x - center_x;
    let dy = defender.pos_y - center_y;
    let (dir_x, dir_y) = normalized_direction(dx, dy);

    let growth = Fixed::from_int(i32::from(hitbox.damage)) * hitbox.knockback_growth;
    let knockback_scalar = hitbox.base_knockback + growth;
    let weight_factor = WEIGHT_BASELINE
        .checked_div(target_def.weight_factor_base + WEIGHT_BASELINE)
        .unwrap_or(Fixed::ZERO);
    let knockback_scalar = knockback_scalar * weight_factor;

    let hitstun = Fixed::from_int(i32::from(hitbox.hitstun)) * target_def.hitstun_multiplier;

    HitResult {
        target,
        damage: hitbox.damage,
        knockback_x: dir_x * knockback_scalar,
        knockback_y: dir_y * knockback_scalar,
        hitstun: hitstun.to_int().max(0) as u16,
    }
}

/// Normalizes `(dx, dy)` to a unit-length (scale-1000) direction. A
/// zero-length vector (target exactly on top of the hitbox center) points
/// toward `+X` by convention. A nonzero vector whose square root still
/// truncates to zero is clamped to the smallest representable magnitude
/// rather than dividing by zero.
fn normalized_direction(dx: Fixed, dy: Fixed) -> (Fixed, Fixed) {
    if dx == Fixed::ZERO && dy == Fixed::ZERO {
        return (Fixed::from_int(1), Fixed::ZERO);
    }
    let magnitude_sq = dx.checked_mul(dx).unwrap_or(Fixed::ZERO) + dy.checked_mul(dy).unwrap_or(Fixed::ZERO);
    let magnitude = magnitude_sq.sqrt();
    let magnitude = if magnitude == Fixed::ZERO { Fixed::from_raw(1) } else { magnitude };
    (
        dx.checked_div(magnitude).unwrap_or(Fixed::from_int(1)),
        dy.checked_div(magnitude).unwrap_or(Fixed::ZERO),
    )
}
