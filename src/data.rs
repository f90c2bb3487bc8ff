//! The simulation's data model: per-player and per-projectile state, the
//! frame-by-frame `GameState`, input frames, and the static character/action/
//! map definitions, per spec §3.

use crate::fixed::Fixed;
use crate::geometry::Aabb;
use crate::types::{Facing, InputBits, PlayerId};
use serde::{Deserialize, Serialize};

/// Fixed capacity of the projectile pool.
pub const MAX_PROJECTILES: usize = 32;

/// Small ring buffer of recent input words kept on each [`PlayerState`] for
/// move recognition. Fixed-size, no allocation, matches the "no dynamic
/// allocation inside `Simulation::tick`" constraint of spec §5/§7.
pub const INPUT_BUFFER_LEN: usize = 8;

/// Per-player simulation state. Exactly two exist in a match, indexed by
/// [`PlayerId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Horizontal position.
    pub pos_x: Fixed,
    /// Vertical position.
    pub pos_y: Fixed,
    /// Horizontal velocity.
    pub vel_x: Fixed,
    /// Vertical velocity.
    pub vel_y: Fixed,
    /// Which way the player is facing.
    pub facing: Facing,
    /// `true` while standing on a solid.
    pub grounded: bool,
    /// Remaining health; saturates at 0 and never goes negative (spec §3).
    pub health: i16,
    /// Frames of hitstun remaining. While nonzero, movement input is ignored
    /// and no new action may start.
    pub hitstun_remaining: u16,
    /// `action_id` of the action currently playing, or `None` when idle.
    pub current_action_id: Option<u32>,
    /// Cursor into the current action's timeline. `0` when idle.
    pub action_frame: u16,
    /// Special meter, `0..=max` (the cap is a character/action concern outside
    /// this core; this field just stores the value).
    pub meter: u16,
    /// Ring buffer of the last [`INPUT_BUFFER_LEN`] input words, most recent
    /// first, for move recognition by the embedding game.
    pub input_buffer: [InputBits; INPUT_BUFFER_LEN],
}

impl PlayerState {
    /// Builds the initial state for a character standing at `(pos_x, pos_y)`,
    /// facing `facing`, with `base_health` taken from its [`CharacterDef`].
    #[must_use]
    pub fn spawn(pos_x: Fixed, pos_y: Fixed, facing: Facing, base_health: i16) -> Self {
        PlayerState {
            pos_x,
            pos_y,
            vel_x: Fixed::ZERO,
            vel_y: Fixed::ZERO,
            facing,
            grounded: false,
            health: base_health,
            hitstun_remaining: 0,
            current_action_id: None,
            action_frame: 0,
            meter: 0,
            input_buffer: [InputBits::NONE; INPUT_BUFFER_LEN],
        }
    }

    /// `true` once health has reached zero; physics and combat skip a
    /// defeated player on subsequent frames (spec §4.5).
    #[inline]
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    /// Pushes a new input word into the front of the ring buffer, dropping
    /// the oldest entry.
    pub fn push_input(&mut self, inputs: InputBits) {
        for i in (1..INPUT_BUFFER_LEN).rev() {
            self.input_buffer[i] = self.input_buffer[i - 1];
        }
        self.input_buffer[0] = inputs;
    }

    /// The player's hurtbox, derived from position and the character's
    /// hitbox dimensions.
    #[must_use]
    pub fn hurtbox(&self, width: Fixed, height: Fixed) -> Aabb {
        Aabb::centered(self.pos_x, self.pos_y, width, height)
    }
}

/// Per-projectile simulation state. The pool has a fixed capacity of
/// [`MAX_PROJECTILES`]; inactive slots contribute nothing to the state hash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileState {
    /// `false` for a free slot.
    pub active: bool,
    /// Horizontal position.
    pub pos_x: Fixed,
    /// Vertical position.
    pub pos_y: Fixed,
    /// Horizontal velocity.
    pub vel_x: Fixed,
    /// Vertical velocity.
    pub vel_y: Fixed,
    /// Owning player; a projectile never hits its owner.
    pub owner: PlayerId,
    /// Damage dealt on hit.
    pub damage: i16,
    /// Frames remaining before the projectile despawns.
    pub lifetime_frames: u16,
    /// Full width/height of the projectile's AABB.
    pub bounds: (Fixed, Fixed),
}

impl ProjectileState {
    /// An inactive slot, serialized identically regardless of prior history
    /// (spec §3: "inactive slots must serialize to a fixed zero pattern").
    pub const INACTIVE: ProjectileState = ProjectileState {
        active: false,
        pos_x: Fixed::ZERO,
        pos_y: Fixed::ZERO,
        vel_x: Fixed::ZERO,
        vel_y: Fixed::ZERO,
        owner: PlayerId::P0,
        damage: 0,
        lifetime_frames: 0,
        bounds: (Fixed::ZERO, Fixed::ZERO),
    };

    /// The projectile's AABB.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::centered(self.pos_x, self.pos_y, self.bounds.0, self.bounds.1)
    }
}

impl Default for ProjectileState {
    fn default() -> Self {
        ProjectileState::INACTIVE
    }
}

/// The complete, value-semantic simulation state for one frame. Copying a
/// `GameState` duplicates the entire match state with no shared references,
/// per spec §3 — this is what makes ring-buffer snapshotting a plain `clone`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Monotonically increasing frame counter.
    pub frame_index: u32,
    /// The two players, indexed by [`PlayerId`].
    pub players: [PlayerState; 2],
    /// The fixed-capacity projectile pool.
    pub projectiles: [ProjectileState; MAX_PROJECTILES],
    /// Number of currently-active projectile slots.
    pub active_projectile_count: u32,
    /// Deterministic RNG state, advanced only by explicitly seeded choices.
    pub rng_state: u32,
}

impl GameState {
    /// Builds the initial state for a match: both players spawned per
    /// `character_defs`, no projectiles active.
    #[must_use]
    pub fn new_match(
        character_defs: &[CharacterDef; 2],
        p0_spawn: (Fixed, Fixed),
        p1_spawn: (Fixed, Fixed),
        rng_seed: u32,
    ) -> Self {
        GameState {
            frame_index: 0,
            players: [
                PlayerState::spawn(
                    p0_spawn.0,
                    p0_spawn.1,
                    Facing::Right,
                    character_defs[0].base_health,
                ),
                PlayerState::spawn(
                    p1_spawn.0,
                    p1_spawn.1,
                    Facing::Left,
                    character_defs[1].base_health,
                ),
            ],
            projectiles: [ProjectileState::INACTIVE; MAX_PROJECTILES],
            active_projectile_count: 0,
            rng_state: rng_seed,
        }
    }

    /// Borrows a player by ID.
    #[inline]
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    /// Mutably borrows a player by ID.
    #[inline]
    #[must_use]
    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id.index()]
    }

    /// Finds the first free projectile slot, if any.
    #[must_use]
    pub fn free_projectile_slot(&self) -> Option<usize> {
        self.projectiles.iter().position(|p| !p.active)
    }
}

/// One frame's worth of input for both players, per spec §3/§6.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputFrame {
    /// The frame this input applies to.
    pub frame_number: i32,
    /// Player 0's input word.
    pub player0_inputs: InputBits,
    /// Player 1's input word.
    pub player1_inputs: InputBits,
}

impl InputFrame {
    /// Builds an `InputFrame` with both players' inputs.
    #[must_use]
    pub fn new(frame_number: i32, player0_inputs: InputBits, player1_inputs: InputBits) -> Self {
        InputFrame {
            frame_number,
            player0_inputs,
            player1_inputs,
        }
    }

    /// Looks up one player's input word.
    #[inline]
    #[must_use]
    pub fn inputs_for(&self, id: PlayerId) -> InputBits {
        match id {
            PlayerId::P0 => self.player0_inputs,
            PlayerId::P1 => self.player1_inputs,
        }
    }

    /// Returns a copy with one player's input word replaced.
    #[must_use]
    pub fn with_inputs_for(mut self, id: PlayerId, inputs: InputBits) -> Self {
        match id {
            PlayerId::P0 => self.player0_inputs = inputs,
            PlayerId::P1 => self.player1_inputs = inputs,
        }
        self
    }
}

/// Static, per-archetype character parameters. Immutable after match start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDef {
    /// Starting (and maximum) health.
    pub base_health: i16,
    /// Ground walk speed.
    pub walk_speed: Fixed,
    /// Ground run speed (reserved for future use per spec §4.3).
    pub run_speed: Fixed,
    /// Vertical velocity applied on jump.
    pub jump_force: Fixed,
    /// Per-frame gravity applied while airborne.
    pub gravity: Fixed,
    /// Terminal fall speed (magnitude cap on downward `vel_y`).
    pub max_fall_speed: Fixed,
    /// Base weight factor controlling knockback scaling.
    pub weight_factor_base: Fixed,
    /// Multiplier applied to incoming hitstun.
    pub hitstun_multiplier: Fixed,
    /// Hurtbox width.
    pub hitbox_width: Fixed,
    /// Hurtbox height.
    pub hitbox_height: Fixed,
    /// Ground friction.
    pub friction_ground: Fixed,
    /// Air friction.
    pub friction_air: Fixed,
    /// `action_id` started by `ATTACK`.
    pub default_attack_action_id: u32,
    /// `action_id` started by `SPECIAL`.
    pub default_special_action_id: u32,
    /// `action_id` started by `DEFEND`.
    pub default_defend_action_id: u32,
}

/// One frame of an action's movement timeline.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionFrameData {
    /// Horizontal velocity override for this frame, before facing mirroring.
    pub vel_x: Fixed,
    /// Vertical velocity override for this frame.
    pub vel_y: Fixed,
    /// `true` if a new action may be started on this frame, preempting the
    /// current one.
    pub cancelable: bool,
    /// Hitstun to apply if the player is hit while on this frame (0 if not
    /// applicable to the action's own design).
    pub hitstun: u16,
}

/// An offensive hitbox window within an action's timeline.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitboxEvent {
    /// First `action_frame` (inclusive) this hitbox is active.
    pub start_frame: u16,
    /// First `action_frame` (exclusive) this hitbox stops being active.
    pub end_frame: u16,
    /// Horizontal offset from the owner's position, before facing mirroring.
    pub offset_x: Fixed,
    /// Vertical offset from the owner's position.
    pub offset_y: Fixed,
    /// Hitbox width.
    pub width: Fixed,
    /// Hitbox height.
    pub height: Fixed,
    /// Damage dealt on hit.
    pub damage: i16,
    /// Base knockback magnitude.
    pub base_knockback: Fixed,
    /// Additional knockback scaled by damage.
    pub knockback_growth: Fixed,
    /// Hitstun imparted on hit, before the defender's `hitstun_multiplier`.
    pub hitstun: u16,
}

impl HitboxEvent {
    /// `true` if `action_frame` falls within `[start_frame, end_frame)`.
    #[inline]
    #[must_use]
    pub fn is_active_on(&self, action_frame: u16) -> bool {
        action_frame >= self.start_frame && action_frame < self.end_frame
    }
}

/// A projectile spawn triggered at a specific frame of an action's timeline.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpawn {
    /// `action_frame` on which this spawn fires.
    pub frame: u16,
    /// Spawn offset from the owner's position, before facing mirroring.
    pub offset_x: Fixed,
    /// Spawn offset from the owner's position.
    pub offset_y: Fixed,
    /// Initial velocity, before facing mirroring.
    pub vel_x: Fixed,
    /// Initial velocity.
    pub vel_y: Fixed,
    /// Damage dealt on hit.
    pub damage: i16,
    /// Frames the projectile lives before despawning.
    pub lifetime: u16,
}

/// A complete action: movement timeline plus the hitboxes and projectile
/// spawns it can emit. Keyed by `action_id` in an [`ActionLibrary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDef {
    /// Total length of the action in frames; reaching this clears the action
    /// to idle.
    pub total_frames: u16,
    /// Per-frame `(vel_x, vel_y, cancelable, hitstun)` timeline, one entry per
    /// frame from `0` to `total_frames - 1`.
    pub timeline: Vec<ActionFrameData>,
    /// Hitboxes this action can emit.
    pub hitboxes: Vec<HitboxEvent>,
    /// Projectiles this action can spawn.
    pub projectile_spawns: Vec<ProjectileSpawn>,
}

impl ActionDef {
    /// The timeline entry for `action_frame`, if the action is long enough.
    #[must_use]
    pub fn frame_data(&self, action_frame: u16) -> Option<&ActionFrameData> {
        self.timeline.get(action_frame as usize)
    }
}

/// Immutable map geometry: a fixed ordered list of solid AABBs, plus the kill
/// floor Y coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    /// Solid AABBs, checked in this fixed order during collision resolution.
    pub solids: Vec<Aabb>,
    /// Any entity whose center drops below this Y is eliminated.
    pub kill_floor_y: Fixed,
}
