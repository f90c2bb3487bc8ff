//! The per-frame simulation pipeline: the single function every rollback
//! frame (predicted or replayed) runs through, in a fixed order, with no
//! step reading a later step's output.

use smallvec::SmallVec;

use crate::actions::{self, ActionLibrary};
use crate::combat::{self, PositionedHitbox};
use crate::data::{CharacterDef, GameState, InputFrame, MapData};
use crate::physics;
use crate::projectiles;
use crate::types::PlayerId;

/// Counters for effects a tick silently dropped rather than erroring on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Projectile spawns that found no free pool slot this frame.
    pub dropped_projectile_spawns: u32,
}

/// Advances `state` by exactly one frame.
///
/// Order: push inputs, advance each player's action (collecting hitboxes and
/// projectile spawns), run physics, resolve combat, step the projectile
/// pool, decay hitstun, then increment the frame counter. Every step reads
/// only state already committed by an earlier step in the same call.
pub fn tick(
    state: &mut GameState,
    inputs: InputFrame,
    map: &MapData,
    defs: &[CharacterDef; 2],
    library: &ActionLibrary,
) -> TickReport {
    for id in PlayerId::ALL {
        state.player_mut(id).push_input(inputs.inputs_for(id));
    }

    let mut hitboxes: SmallVec<[PositionedHitbox; 8]> = SmallVec::new();
    let mut report = TickReport::default();
    for id in PlayerId::ALL {
        let player_inputs = inputs.inputs_for(id);
        let def = &defs[id.index()];
        let outcome = {
            let player = state.player_mut(id);
            actions::advance_player(id, player, player_inputs, def, library)
        };
        hitboxes.extend(outcome.hitboxes);
        for spawn in outcome.spawns {
            if !projectiles::spawn(state, spawn) {
                report.dropped_projectile_spawns += 1;
            }
        }
    }

    for id in PlayerId::ALL {
        let player_inputs = inputs.inputs_for(id);
        let def = &defs[id.index()];
        physics::step_player(state.player_mut(id), def, player_inputs, map);
    }

    combat::resolve_hits(state, defs, &hitboxes);

    projectiles::step_projectiles(state, defs, map);

    for id in PlayerId::ALL {
        let player = state.player_mut(id);
        player.hitstun_remaining = player.hitstun_remaining.saturating_sub(1);
    }

    state.frame_index += 1;

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Fixed;
    use crate::hash::state_hash;
    use crate::types::InputBits;
    use proptest::prelude::*;

    fn flat_character() -> CharacterDef {
        CharacterDef {
            base_health: 100,
            walk_speed: Fixed::from_int(5),
            run_speed: Fixed::from_int(8),
            jump_force: Fixed::from_int(15),
            gravity: Fixed::from_int(1),
            max_fall_speed: Fixed::from_int(20),
            weight_factor_base: Fixed::from_int(100),
            hitstun_multiplier: Fixed::from_int(1),
            hitbox_width: Fixed::from_int(2),
            hitbox_height: Fixed::from_int(3),
            friction_ground: Fixed::from_raw(200),
            friction_air: Fixed::from_raw(50),
            default_attack_action_id: 1,
            default_special_action_id: 2,
            default_defend_action_id: 3,
        }
    }

    fn defs() -> [CharacterDef; 2] {
        [flat_character(), flat_character()]
    }

    fn flat_map() -> MapData {
        MapData {
            solids: vec![crate::geometry::Aabb {
                min_x: Fixed::from_int(-1000),
                max_x: Fixed::from_int(1000),
                min_y: Fixed::from_int(-10),
                max_y: Fixed::from_int(0),
            }],
            kill_floor_y: Fixed::from_int(-100),
        }
    }

    #[test]
    fn idle_ticks_are_deterministic_across_two_runs() {
        let defs = defs();
        let map = flat_map();
        let library = ActionLibrary::default();

        let mut a = GameState::new_match(&defs, (Fixed::from_int(-2), Fixed::from_int(5)), (Fixed::from_int(2), Fixed::from_int(5)), 7);
        let mut b = a.clone();

        for _ in 0..500 {
            tick(&mut a, InputFrame::default(), &map, &defs, &library);
            tick(&mut b, InputFrame::default(), &map, &defs, &library);
        }

        assert_eq!(state_hash(&a), state_hash(&b));
    }

    #[test]
    fn frame_index_advances_monotonically() {
        let defs = defs();
        let map = flat_map();
        let library = ActionLibrary::default();
        let mut state = GameState::new_match(&defs, (Fixed::ZERO, Fixed::from_int(5)), (Fixed::from_int(4), Fixed::from_int(5)), 1);
        for expected in 1..=10u32 {
            tick(&mut state, InputFrame::default(), &map, &defs, &library);
            assert_eq!(state.frame_index, expected);
        }
    }

    #[test]
    fn symmetric_walk_moves_players_toward_each_other() {
        let defs = defs();
        let map = flat_map();
        let library = ActionLibrary::default();
        let mut state = GameState::new_match(&defs, (Fixed::from_int(-20), Fixed::from_int(5)), (Fixed::from_int(20), Fixed::from_int(5)), 1);
        let inputs = InputFrame::new(0, InputBits::RIGHT, InputBits::LEFT);
        for _ in 0..60 {
            tick(&mut state, inputs, &map, &defs, &library);
        }
        assert!(state.player(PlayerId::P0).pos_x > Fixed::from_int(-20));
        assert!(state.player(PlayerId::P1).pos_x < Fixed::from_int(20));
    }

    #[test]
    fn hitstun_decays_by_one_each_tick() {
        let defs = defs();
        let map = flat_map();
        let library = ActionLibrary::default();
        let mut state = GameState::new_match(&defs, (Fixed::ZERO, Fixed::from_int(5)), (Fixed::from_int(4), Fixed::from_int(5)), 1);
        state.player_mut(PlayerId::P0).hitstun_remaining = 3;
        tick(&mut state, InputFrame::default(), &map, &defs, &library);
        assert_eq!(state.player(PlayerId::P0).hitstun_remaining, 2);
    }

    #[test]
    fn health_never_goes_negative_even_under_repeated_hits() {
        let defs = defs();
        let map = flat_map();
        let library = ActionLibrary::new([(
            1,
            crate::data::ActionDef {
                total_frames: 1,
                timeline: vec![crate::data::ActionFrameData {
                    vel_x: Fixed::ZERO,
                    vel_y: Fixed::ZERO,
                    cancelable: true,
                    hitstun: 0,
                }],
                hitboxes: vec![crate::data::HitboxEvent {
                    start_frame: 0,
                    end_frame: 1,
                    offset_x: Fixed::from_int(4),
                    offset_y: Fixed::ZERO,
                    width: Fixed::from_int(6),
                    height: Fixed::from_int(6),
                    damage: 200,
                    base_knockback: Fixed::ZERO,
                    knockback_growth: Fixed::ZERO,
                    hitstun: 0,
                }],
                projectile_spawns: Vec::new(),
            },
        )]);
        let mut state = GameState::new_match(&defs, (Fixed::ZERO, Fixed::from_int(5)), (Fixed::from_int(4), Fixed::from_int(5)), 1);
        let inputs = InputFrame::new(0, InputBits::ATTACK, InputBits::NONE);
        for _ in 0..5 {
            tick(&mut state, inputs, &map, &defs, &library);
        }
        assert_eq!(state.player(PlayerId::P1).health, 0);
    }

    fn input_strategy() -> impl Strategy<Value = InputBits> {
        prop_oneof![
            Just(InputBits::NONE),
            Just(InputBits::LEFT),
            Just(InputBits::RIGHT),
            Just(InputBits::JUMP),
            Just(InputBits::LEFT.union(InputBits::JUMP)),
            Just(InputBits::RIGHT.union(InputBits::JUMP)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: crate::test_config::miri_case_count(),
            ..ProptestConfig::default()
        })]

        #[test]
        fn replaying_the_same_inputs_is_bit_identical(
            p0_inputs in prop::collection::vec(input_strategy(), 1..30),
            p1_inputs in prop::collection::vec(input_strategy(), 1..30),
        ) {
            let defs = defs();
            let map = flat_map();
            let library = ActionLibrary::default();
            let frame_count = p0_inputs.len().min(p1_inputs.len());

            let mut a = GameState::new_match(&defs, (Fixed::from_int(-5), Fixed::from_int(5)), (Fixed::from_int(5), Fixed::from_int(5)), 3);
            let mut b = a.clone();

            for i in 0..frame_count {
                let frame = InputFrame::new(i as i32, p0_inputs[i], p1_inputs[i]);
                tick(&mut a, frame, &map, &defs, &library);
                tick(&mut b, frame, &map, &defs, &library);
            }

            prop_assert_eq!(state_hash(&a), state_hash(&b));
        }

        #[test]
        fn health_never_goes_below_zero_under_arbitrary_input(
            inputs in prop::collection::vec(input_strategy(), 1..50),
        ) {
            let defs = defs();
            let map = flat_map();
            let library = ActionLibrary::default();
            let mut state = GameState::new_match(&defs, (Fixed::from_int(-5), Fixed::from_int(5)), (Fixed::from_int(5), Fixed::from_int(5)), 9);

            for (i, bits) in inputs.iter().enumerate() {
                let frame = InputFrame::new(i as i32, *bits, InputBits::NONE);
                tick(&mut state, frame, &map, &defs, &library);
            }

            prop_assert!(state.player(PlayerId::P0).health >= 0);
            prop_assert!(state.player(PlayerId::P1).health >= 0);
        }
    }
}
