//! Rollback netcode: predicts ahead of confirmed remote input, and replays
//! forward from the last correct frame whenever a prediction turns out
//! wrong.
//!
//! Holds a fixed-size ring buffer of states and inputs spanning the last
//! [`crate::ROLLBACK_WINDOW`] frames plus a little slack for the re-simulation
//! starting point, indexed by frame number modulo the buffer's length. No
//! allocation happens on the steady-state tick/rollback path; the buffers
//! are sized once at construction.

use std::collections::BTreeMap;

use crate::actions::ActionLibrary;
use crate::data::{ActionDef, CharacterDef, GameState, InputFrame, MapData};
use crate::error::DuelcoreError;
use crate::fixed::Fixed;
use crate::hash;
use crate::simulation;
use crate::telemetry::DesyncReport;
use crate::types::{InputBits, PlayerId};
use crate::ROLLBACK_WINDOW;

const DEFAULT_SPAWN_Y: Fixed = Fixed::from_int(5);
const DEFAULT_SPAWN_OFFSET_X: Fixed = Fixed::from_int(3);

/// Two slots wider than [`ROLLBACK_WINDOW`]: `submit_remote_inputs` accepts
/// corrections one frame further back than `get_state`'s retrieval window
/// (`current - ROLLBACK_WINDOW`, not `current - ROLLBACK_WINDOW + 1`), and
/// re-simulating from that oldest accepted frame needs the state from one
/// frame further back still as its starting point. Without both extra slots
/// those lookups would alias with the newest frame's slot once the ring
/// buffer has wrapped.
const BUFFER_LEN: usize = ROLLBACK_WINDOW + 2;

fn placeholder_action() -> ActionDef {
    ActionDef {
        total_frames: 1,
        timeline: vec![crate::data::ActionFrameData {
            vel_x: Fixed::ZERO,
            vel_y: Fixed::ZERO,
            cancelable: true,
            hitstun: 0,
        }],
        hitboxes: Vec::new(),
        projectile_spawns: Vec::new(),
    }
}

/// Predicts ahead of confirmed network input and rolls back to re-simulate
/// when a remote input arrives that contradicts the prediction.
pub struct RollbackController {
    states: Vec<GameState>,
    inputs: Vec<InputFrame>,
    pending_remote: [BTreeMap<i32, InputBits>; 2],
    current_frame: i32,
    confirmed_frame: i32,
    map: MapData,
    character_defs: [CharacterDef; 2],
    action_library: ActionLibrary,
    is_development: bool,
    dropped_late_inputs: u32,
    dropped_projectile_spawns: u32,
}

impl RollbackController {
    /// Builds a controller for a fresh match. `character_defs` is cloned, not
    /// mutated in place — the caller keeps ownership of its own copy.
    ///
    /// Each character's `default_attack_action_id`/`default_special_action_id`/
    /// `default_defend_action_id` is registered with a placeholder, no-op
    /// [`ActionDef`] so the action evaluator always finds a definition for the
    /// default action IDs before the embedder loads real movesets via
    /// [`RollbackController::register_action`].
    #[must_use]
    pub fn new(map: MapData, character_defs: [CharacterDef; 2], is_development: bool) -> Self {
        let action_library = ActionLibrary::new(character_defs.iter().flat_map(|def| {
            [
                (def.default_attack_action_id, placeholder_action()),
                (def.default_special_action_id, placeholder_action()),
                (def.default_defend_action_id, placeholder_action()),
            ]
        }));

        let initial = GameState::new_match(
            &character_defs,
            (-DEFAULT_SPAWN_OFFSET_X, DEFAULT_SPAWN_Y),
            (DEFAULT_SPAWN_OFFSET_X, DEFAULT_SPAWN_Y),
            0,
        );

        RollbackController {
            states: vec![initial; BUFFER_LEN],
            inputs: vec![InputFrame::default(); BUFFER_LEN],
            pending_remote: [BTreeMap::new(), BTreeMap::new()],
            current_frame: 0,
            confirmed_frame: 0,
            map,
            character_defs,
            action_library,
            is_development,
            dropped_late_inputs: 0,
            dropped_projectile_spawns: 0,
        }
    }

    /// Registers (or replaces) the action definition for `action_id`, for
    /// embedders loading real movesets on top of the placeholder entries
    /// seeded at construction.
    pub fn register_action(&mut self, action_id: u32, action: ActionDef) {
        let mut entries: Vec<(u32, ActionDef)> = self.action_library.entries().collect();
        entries.retain(|(id, _)| *id != action_id);
        entries.push((action_id, action));
        self.action_library = ActionLibrary::new(entries);
    }

    /// `true` if this controller was built with extra development-mode
    /// diagnostics enabled.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.is_development
    }

    /// The most recently simulated frame number.
    #[must_use]
    pub fn current_frame(&self) -> i32 {
        self.current_frame
    }

    /// Number of remote inputs discarded for referencing a frame older than
    /// the rollback window.
    #[must_use]
    pub fn dropped_late_inputs(&self) -> u32 {
        self.dropped_late_inputs
    }

    /// Number of projectile spawns dropped because the pool was full at
    /// spawn time.
    #[must_use]
    pub fn dropped_projectile_spawns(&self) -> u32 {
        self.dropped_projectile_spawns
    }

    /// Oldest frame [`RollbackController::get_state`]/[`RollbackController::state_hash`]
    /// can still retrieve: a window of exactly `ROLLBACK_WINDOW` frames ending
    /// at `current_frame`.
    fn oldest_retrievable(&self) -> i32 {
        (self.current_frame - ROLLBACK_WINDOW as i32 + 1).max(0)
    }

    /// Oldest frame [`RollbackController::submit_remote_inputs`] still accepts
    /// a correction for. One frame older than [`Self::oldest_retrievable`]:
    /// a correction at exactly `current_frame - ROLLBACK_WINDOW` is accepted
    /// and re-simulated forward, even though that frame's state is already
    /// one past what `get_state` can hand back directly.
    fn oldest_accepted_for_submit(&self) -> i32 {
        (self.current_frame - ROLLBACK_WINDOW as i32).max(0)
    }

    fn slot(frame: i32) -> usize {
        frame.rem_euclid(BUFFER_LEN as i32) as usize
    }

    /// Both players' inputs are known locally this frame (no prediction
    /// needed): advances one frame directly.
    pub fn tick_prediction_local(&mut self, p0_inputs: InputBits, p1_inputs: InputBits) {
        let frame = InputFrame::new(self.current_frame + 1, p0_inputs, p1_inputs);
        self.advance(frame);
    }

    /// Advances one frame using `local_inputs` for `local_player` and a
    /// predicted value for the opponent: the opponent's submitted input for
    /// the new frame if it already arrived, otherwise a repeat of its last
    /// known input.
    pub fn tick_prediction(&mut self, local_player: PlayerId, local_inputs: InputBits) {
        let next_frame = self.current_frame + 1;
        let opponent = local_player.opponent();
        let predicted_remote = self.pending_remote[opponent.index()]
            .remove(&next_frame)
            .unwrap_or_else(|| self.inputs[Self::slot(self.current_frame)].inputs_for(opponent));

        let frame = InputFrame::new(next_frame, InputBits::NONE, InputBits::NONE)
            .with_inputs_for(local_player, local_inputs)
            .with_inputs_for(opponent, predicted_remote);
        self.advance(frame);
    }

    fn advance(&mut self, frame: InputFrame) {
        let prev_slot = Self::slot(self.current_frame);
        let mut state = self.states[prev_slot].clone();
        let report = simulation::tick(&mut state, frame, &self.map, &self.character_defs, &self.action_library);
        self.dropped_projectile_spawns += report.dropped_projectile_spawns;

        self.current_frame = frame.frame_number;
        let slot = Self::slot(self.current_frame);
        self.states[slot] = state;
        self.inputs[slot] = frame;
    }

    /// Submits an authoritative remote input for `frame`/`player`.
    ///
    /// - If `frame` is older than the rollback window, the input is
    ///   discarded and [`RollbackController::dropped_late_inputs`] ticks up;
    ///   this is never an error.
    /// - If `frame` is beyond `current_frame`, it is buffered and used the
    ///   next time a tick reaches that frame.
    /// - If `frame` is within the simulated window and matches the
    ///   prediction already made, nothing happens.
    /// - Otherwise every frame from `frame` through `current_frame` is
    ///   re-simulated with the corrected input.
    pub fn submit_remote_inputs(&mut self, frame: i32, player: PlayerId, inputs: InputBits) -> Result<(), DuelcoreError> {
        if frame > self.current_frame {
            self.pending_remote[player.index()].insert(frame, inputs);
            return Ok(());
        }

        if frame < self.oldest_accepted_for_submit() {
            self.dropped_late_inputs += 1;
            tracing::debug!(frame, current = self.current_frame, "discarding late remote input");
            return Ok(());
        }

        let slot = Self::slot(frame);
        if self.inputs[slot].inputs_for(player) == inputs {
            return Ok(());
        }

        tracing::debug!(
            frame,
            current = self.current_frame,
            distance = self.current_frame - frame,
            "rollback triggered by corrected remote input"
        );

        self.inputs[slot] = self.inputs[slot].with_inputs_for(player, inputs);

        let resim_start = frame;
        let resim_end = self.current_frame;
        let mut state = self.states[Self::slot(resim_start - 1)].clone();
        for f in resim_start..=resim_end {
            let input_frame = self.inputs[Self::slot(f)];
            let report = simulation::tick(&mut state, input_frame, &self.map, &self.character_defs, &self.action_library);
            self.dropped_projectile_spawns += report.dropped_projectile_spawns;
            self.states[Self::slot(f)] = state.clone();
        }

        Ok(())
    }

    /// Marks `frame` (and everything before it) as confirmed by both peers.
    /// Purely advisory bookkeeping: it does not evict anything from the
    /// ring buffer early.
    pub fn confirm_frame(&mut self, frame: i32) {
        self.confirmed_frame = self.confirmed_frame.max(frame);
    }

    /// The last frame both peers have confirmed.
    #[must_use]
    pub fn confirmed_frame(&self) -> i32 {
        self.confirmed_frame
    }

    /// Looks up the simulated state for `frame`.
    pub fn get_state(&self, frame: i32) -> Result<&GameState, DuelcoreError> {
        let oldest = self.oldest_retrievable();
        if frame > self.current_frame || frame < oldest {
            return Err(DuelcoreError::FrameNotInWindow {
                requested: frame,
                oldest_available: oldest,
                current: self.current_frame,
            });
        }
        Ok(&self.states[Self::slot(frame)])
    }

    /// Computes the canonical state hash for `frame`.
    pub fn state_hash(&self, frame: i32) -> Result<u32, DuelcoreError> {
        self.get_state(frame).map(hash::state_hash)
    }

    /// Compares this peer's hash for `frame` against a hash reported by the
    /// other peer. Returns `Some` (and logs via `tracing::error!` through
    /// [`DesyncReport::new`]) only on a genuine mismatch; returns `None` if
    /// the hashes agree or `frame` has already left the window.
    #[must_use]
    pub fn check_peer_hash(&self, frame: i32, peer_hash: u32) -> Option<DesyncReport> {
        let state = self.get_state(frame).ok()?;
        let local_hash = hash::state_hash(state);
        if local_hash == peer_hash {
            return None;
        }
        Some(DesyncReport::new(frame, local_hash, peer_hash, state.clone()))
    }
}
