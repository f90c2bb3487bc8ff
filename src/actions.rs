//! Action timeline evaluation: starts new actions on button press, applies
//! per-frame movement overrides, and emits the hitboxes and projectile
//! spawns an action's current frame is responsible for.
//!
//! Actions are looked up by a plain `u32` id rather than dispatched through a
//! trait object, so the same `action_id` always resolves to the same
//! definition regardless of insertion order — a `BTreeMap` gives that lookup
//! without needing a perfect hash.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::combat::PositionedHitbox;
use crate::data::{ActionDef, CharacterDef, PlayerState, ProjectileState};
use crate::fixed::Fixed;
use crate::geometry::Aabb;
use crate::types::{InputBits, PlayerId};

/// A deterministic, insertion-order-independent table of action definitions
/// keyed by `action_id`.
#[derive(Debug, Clone, Default)]
pub struct ActionLibrary(BTreeMap<u32, ActionDef>);

impl ActionLibrary {
    /// Builds a library from `(action_id, definition)` pairs.
    #[must_use]
    pub fn new(actions: impl IntoIterator<Item = (u32, ActionDef)>) -> Self {
        ActionLibrary(actions.into_iter().collect())
    }

    /// Looks up an action definition by id.
    #[must_use]
    pub fn get(&self, action_id: u32) -> Option<&ActionDef> {
        self.0.get(&action_id)
    }

    /// Iterates every `(action_id, definition)` pair currently registered, in
    /// ascending id order. Used when rebuilding the table around a new or
    /// replaced entry.
    pub fn entries(&self) -> impl Iterator<Item = (u32, ActionDef)> + '_ {
        self.0.iter().map(|(id, action)| (*id, action.clone()))
    }
}

/// Hitboxes and projectile spawns produced by one player's action evaluation
/// this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionOutcome {
    /// Hitboxes active on this frame, already positioned in world space.
    /// Stack-allocated up to 4: most actions have at most one or two active
    /// hitboxes at a time.
    pub hitboxes: SmallVec<[PositionedHitbox; 4]>,
    /// Projectiles spawned this frame, ready to hand to
    /// [`crate::projectiles::spawn`].
    pub spawns: SmallVec<[ProjectileState; 4]>,
}

/// Advances one player's action state by one frame: starts a new action if
/// requested and allowed, applies the current frame's movement override, and
/// collects any hitboxes/spawns this frame triggers.
pub fn advance_player(
    id: PlayerId,
    player: &mut PlayerState,
    inputs: InputBits,
    def: &CharacterDef,
    library: &ActionLibrary,
) -> ActionOutcome {
    maybe_start_action(player, inputs, def, library);

    let Some(action_id) = player.current_action_id else {
        return ActionOutcome::default();
    };
    let Some(action) = library.get(action_id) else {
        player.current_action_id = None;
        player.action_frame = 0;
        return ActionOutcome::default();
    };

    if let Some(frame_data) = action.frame_data(player.action_frame) {
        let sign = Fixed::from_int(player.facing.sign());
        player.vel_x = frame_data.vel_x * sign;
        player.vel_y = frame_data.vel_y;
    }

    let outcome = ActionOutcome {
        hitboxes: action
            .hitboxes
            .iter()
            .filter(|h| h.is_active_on(player.action_frame))
            .map(|h| position_hitbox(id, player, h))
            .collect(),
        spawns: action
            .projectile_spawns
            .iter()
            .filter(|s| s.frame == player.action_frame)
            .map(|s| position_spawn(id, player, s))
            .collect(),
    };

    player.action_frame += 1;
    if player.action_frame >= action.total_frames {
        player.current_action_id = None;
        player.action_frame = 0;
    }

    outcome
}

fn maybe_start_action(player: &mut PlayerState, inputs: InputBits, def: &CharacterDef, library: &ActionLibrary) {
    if player.hitstun_remaining > 0 {
        return;
    }

    let requested = [
        (InputBits::ATTACK, def.default_attack_action_id),
        (InputBits::SPECIAL, def.default_special_action_id),
        (InputBits::DEFEND, def.default_defend_action_id),
    ]
    .into_iter()
    .find(|(bit, _)| inputs.contains(*bit))
    .map(|(_, action_id)| action_id);

    let Some(action_id) = requested else {
        return;
    };

    let idle_or_cancelable = match player.current_action_id {
        None => true,
        Some(current_id) => library
            .get(current_id)
            .and_then(|action| action.frame_data(player.action_frame))
            .is_some_and(|frame| frame.cancelable),
    };

    if idle_or_cancelable {
        player.current_action_id = Some(action_id);
        player.action_frame = 0;
    }
}

fn mirrored(offset_x: Fixed, offset_y: Fixed, sign: Fixed) -> (Fixed, Fixed) {
    (offset_x * sign, offset_y)
}

fn position_hitbox(owner: PlayerId, player: &PlayerState, hitbox: &crate::data::HitboxEvent) -> PositionedHitbox {
    let sign = Fixed::from_int(player.facing.sign());
    let (ox, oy) = mirrored(hitbox.offset_x, hitbox.offset_y, sign);
    PositionedHitbox {
        owner,
        aabb: Aabb::centered(player.pos_x + ox, player.pos_y + oy, hitbox.width, hitbox.height),
        damage: hitbox.damage,
        base_knockback: hitbox.base_knockback,
        knockback_growth: hitbox.knockback_growth,
        hitstun: hitbox.hitstun,
    }
}

fn position_spawn(owner: PlayerId, player: &PlayerState, spawn: &crate::data::ProjectileSpawn) -> ProjectileState {
    let sign = Fixed::from_int(player.facing.sign());
    let (ox, oy) = mirrored(spawn.offset_x, spawn.offset_y, sign);
    let (vx, _) = mirrored(spawn.vel_x, spawn.vel_y, sign);
    ProjectileState {
        active: true,
        pos_x: player.pos_x + ox,
        pos_y: player.pos_y + oy,
        vel_x: vx,
        vel_y: spawn.vel_y,
        owner,
        damage: spawn.damage,
        lifetime_frames: spawn.lifetime,
        bounds: (Fixed::from_int(1), Fixed::from_int(1)),
    }
}
