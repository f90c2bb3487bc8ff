//! The deterministic random generator used for explicitly seeded choices
//! (spec §3's `rng_state` field). Unlike the rest of the simulation core,
//! which is driven entirely by player input, a handful of action effects may
//! want a seeded coin flip; this module is the one place that happens.
//!
//! Narrowed from a full PRNG surface to a single stepping function over a
//! `u32` because [`crate::data::GameState::rng_state`] is a plain `u32`
//! field, not an opaque generator object: the state has to serialize and
//! hash like any other piece of game state, so there is no separate
//! generator struct to carry around.

const MULTIPLIER: u32 = 747_796_405;
const INCREMENT: u32 = 2_891_336_453;

/// One step of a PCG-style 32-bit state, 32-bit output generator (the
/// `RXS-M-XS` permutation from the PCG family, the same family backing the
/// 64-bit generator this one is modeled on, narrowed to fit in a `u32`).
fn step(state: u32) -> u32 {
    let state = state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Advances `rng_state` and returns the new value. Every call to this
/// function (directly or via [`gen_range`]) mutates the state in place, so
/// replaying the same frame sequence from the same starting state always
/// reproduces the same draws.
pub fn next_u32(rng_state: &mut u32) -> u32 {
    *rng_state = step(*rng_state);
    *rng_state
}

/// Draws a value in `[0, span)`. Returns `0` for `span == 0` without
/// advancing the state, since there is no range to draw from.
pub fn gen_range(rng_state: &mut u32, span: u32) -> u32 {
    if span == 0 {
        return 0;
    }
    next_u32(rng_state) % span
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_produces_same_sequence() {
        let mut a = 12345u32;
        let mut b = 12345u32;
        for _ in 0..100 {
            assert_eq!(next_u32(&mut a), next_u32(&mut b));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = 1u32;
        let mut b = 2u32;
        let seq_a: Vec<u32> = (0..10).map(|_| next_u32(&mut a)).collect();
        let seq_b: Vec<u32> = (0..10).map(|_| next_u32(&mut b)).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn gen_range_stays_in_bounds() {
        let mut state = 7u32;
        for _ in 0..1000 {
            let v = gen_range(&mut state, 10);
            assert!(v < 10);
        }
    }

    #[test]
    fn gen_range_of_zero_span_does_not_advance_state() {
        let mut state = 99u32;
        let v = gen_range(&mut state, 0);
        assert_eq!(v, 0);
        assert_eq!(state, 99);
    }

    #[test]
    fn zero_seed_is_not_a_fixed_point() {
        // A generator that gets stuck at its own seed would make `rng_state`
        // meaningless after the first draw.
        let mut state = 0u32;
        let first = next_u32(&mut state);
        assert_ne!(first, 0);
        assert_eq!(state, first);
    }
}
