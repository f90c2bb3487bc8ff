//! End-to-end scenario coverage for the simulation core: determinism,
//! symmetric movement, knockback, simultaneous trades, and rollback
//! correctness/bounds.

use duelcore::actions::ActionLibrary;
use duelcore::data::{ActionFrameData, CharacterDef, GameState, HitboxEvent, InputFrame, MapData};
use duelcore::geometry::Aabb;
use duelcore::hash::state_hash;
use duelcore::simulation;
use duelcore::types::{InputBits, PlayerId};
use duelcore::{Fixed, RollbackController, ROLLBACK_WINDOW};

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
        solids: vec![Aabb {
            min_x: Fixed::from_int(-10_000),
            max_x: Fixed::from_int(10_000),
            min_y: Fixed::from_int(-10),
            max_y: Fixed::from_int(0),
        }],
        kill_floor_y: Fixed::from_int(-1000),
    }
}

/// Scenario 1: two runs from the same seed, all-NONE input, stay
/// bit-identical for 10,000 frames.
#[test]
fn idle_determinism_over_ten_thousand_frames() {
    let defs = defs();
    let map = flat_map();
    let library = ActionLibrary::default();

    let mut a = GameState::new_match(&defs, (Fixed::from_int(-5), Fixed::from_int(5)), (Fixed::from_int(5), Fixed::from_int(5)), 42);
    let mut b = a.clone();

    for frame in 0..10_000 {
        let inputs = InputFrame::new(frame, InputBits::NONE, InputBits::NONE);
        simulation::tick(&mut a, inputs, &map, &defs, &library);
        simulation::tick(&mut b, inputs, &map, &defs, &library);
    }

    assert_eq!(state_hash(&a), state_hash(&b));
}

/// Scenario 2: players holding inward directions for 60 frames move toward
/// each other and stay symmetric.
#[test]
fn symmetric_walk_converges_players_toward_center() {
    let defs = defs();
    let map = flat_map();
    let library = ActionLibrary::default();

    let mut state = GameState::new_match(&defs, (Fixed::from_int(-2000), Fixed::from_int(1000)), (Fixed::from_int(2000), Fixed::from_int(1000)), 1);
    let inputs = InputFrame::new(0, InputBits::RIGHT, InputBits::LEFT);

    for _ in 0..60 {
        simulation::tick(&mut state, inputs, &map, &defs, &library);
    }

    let p0 = state.player(PlayerId::P0);
    let p1 = state.player(PlayerId::P1);
    assert!(p0.pos_x > Fixed::from_int(-2000));
    assert!(p1.pos_x < Fixed::from_int(2000));
    assert_eq!(p0.pos_x.raw(), -p1.pos_x.raw());
}

fn single_hitbox_action(damage: i16, base_knockback: Fixed, knockback_growth: Fixed, hitstun: u16) -> duelcore::data::ActionDef {
    duelcore::data::ActionDef {
        total_frames: 20,
        timeline: (0..20)
            .map(|_| ActionFrameData { vel_x: Fixed::ZERO, vel_y: Fixed::ZERO, cancelable: false, hitstun: 0 })
            .collect(),
        hitboxes: vec![HitboxEvent {
            start_frame: 5,
            end_frame: 6,
            offset_x: Fixed::from_int(2),
            offset_y: Fixed::ZERO,
            width: Fixed::from_int(2),
            height: Fixed::from_int(2),
            damage,
            base_knockback,
            knockback_growth,
            hitstun,
        }],
        projectile_spawns: Vec::new(),
    }
}

/// Scenario 3: an attack landing on frame 5 of a 20-frame action deals its
/// damage, knockback, and hitstun exactly once.
#[test]
fn hit_and_knockback_applies_exactly_once() {
    let defs = defs();
    let map = flat_map();
    let library = ActionLibrary::new([(1, single_hitbox_action(10, Fixed::from_raw(500), Fixed::from_raw(100), 20))]);

    let mut state = GameState::new_match(&defs, (Fixed::ZERO, Fixed::from_int(5)), (Fixed::from_int(2), Fixed::from_int(5)), 1);

    // The hitbox is active on action_frame 5; that's the 6th tick (index 5)
    // once the action starts on tick 0. Check the instant it lands, before
    // ground friction has a chance to bleed off the knockback.
    for frame in 0..6 {
        let inputs = InputFrame::new(frame, InputBits::ATTACK, InputBits::NONE);
        simulation::tick(&mut state, inputs, &map, &defs, &library);
    }

    let p1 = state.player(PlayerId::P1);
    assert_eq!(p1.health, 90);
    assert!(p1.vel_x > Fixed::ZERO);
    assert_eq!(p1.hitstun_remaining, 19);
}

/// Scenario 4: both players attack on the same frame; the trade is
/// symmetric regardless of which player is iterated first internally.
#[test]
fn simultaneous_attacks_trade_symmetrically() {
    let defs = defs();
    let map = flat_map();
    let library = ActionLibrary::new([
        (1, single_hitbox_action(10, Fixed::from_int(5), Fixed::ZERO, 10)),
        (2, single_hitbox_action(10, Fixed::from_int(5), Fixed::ZERO, 10)),
    ]);

    let mut state = GameState::new_match(&defs, (Fixed::from_int(-1), Fixed::from_int(5)), (Fixed::from_int(1), Fixed::from_int(5)), 1);

    for frame in 0..20 {
        let inputs = InputFrame::new(frame, InputBits::ATTACK, InputBits::SPECIAL);
        simulation::tick(&mut state, inputs, &map, &defs, &library);
    }

    assert_eq!(state.player(PlayerId::P0).health, state.player(PlayerId::P1).health);
}

/// Scenario 5: a prediction miss mid-match is corrected and re-simulated;
/// the result matches a straight-through run given the real inputs.
#[test]
fn rollback_resimulation_matches_straight_through_run() {
    let map = flat_map();
    let actual_p1 = |frame: i32| if frame == 30 { InputBits::RIGHT } else { InputBits::NONE };

    let mut straight = RollbackController::new(map.clone(), defs(), true);
    for frame in 1..=50 {
        straight.tick_prediction_local(InputBits::LEFT, actual_p1(frame));
    }
    let straight_hash = straight.state_hash(50).unwrap();

    let mut predicted = RollbackController::new(map, defs(), true);
    for frame in 1..=50 {
        predicted.tick_prediction(PlayerId::P0, InputBits::LEFT);
        predicted.submit_remote_inputs(frame, PlayerId::P1, actual_p1(frame)).unwrap();
    }
    let predicted_hash = predicted.state_hash(50).unwrap();

    assert_eq!(straight_hash, predicted_hash);
}

/// Scenario 6: a remote input exactly at the edge of the rollback window is
/// accepted; one frame older is silently discarded with only a counter bump.
#[test]
fn rollback_window_boundary_is_respected() {
    let mut controller = RollbackController::new(flat_map(), defs(), true);
    for _ in 0..(ROLLBACK_WINDOW + 10) {
        controller.tick_prediction_local(InputBits::NONE, InputBits::NONE);
    }

    let current = controller.current_frame();
    let oldest_accepted = current - ROLLBACK_WINDOW as i32;

    assert!(controller.submit_remote_inputs(oldest_accepted, PlayerId::P1, InputBits::RIGHT).is_ok());

    let before = controller.dropped_late_inputs();
    assert!(controller.submit_remote_inputs(oldest_accepted - 1, PlayerId::P1, InputBits::RIGHT).is_ok());
    assert_eq!(controller.dropped_late_inputs(), before + 1);
}
