//! Fixed-point arithmetic.
//!
//! Duelcore never uses floating point: a single `f32`/`f64` operation on one
//! peer's machine and not another's (different FPU, different optimization
//! level, a fused-multiply-add that only fires on one target) is enough to
//! desync a rollback match. Every positional, velocity, and dimensional
//! quantity in the simulation core is instead a [`Fixed`], an `i32` scaled by
//! [`SCALE`]: the stored integer `x` represents the logical value `x / SCALE`.
//!
//! The newtype exists for the same reason `fortress_rollback::Frame` wraps a
//! bare `i32`: it stops a position from being added to a frame counter or a
//! damage value by accident, and it gives multiplication and division their
//! own fixed-point semantics instead of silently overflowing or truncating.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Fixed-point scale factor. The stored integer `x` represents `x / SCALE`.
pub const SCALE: i32 = 1000;

/// A fixed-point number: `Fixed(x)` represents the logical value `x / SCALE`.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Fixed(pub i32);

impl Fixed {
    /// The additive identity.
    pub const ZERO: Fixed = Fixed(0);

    /// Builds a `Fixed` directly from a scale-1000 raw integer.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Fixed(raw)
    }

    /// Builds a `Fixed` from a whole integer (`Fixed::from_int(3)` is `3.0`).
    #[inline]
    #[must_use]
    pub const fn from_int(value: i32) -> Self {
        Fixed(value * SCALE)
    }

    /// Returns the raw scale-1000 integer.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Truncating conversion back to a whole integer.
    #[inline]
    #[must_use]
    pub const fn to_int(self) -> i32 {
        self.0 / SCALE
    }

    /// Fixed-point multiplication: `mul(a, b) = (a * b) / SCALE`, computed in
    /// a 64-bit intermediate per spec §4.1.
    #[inline]
    #[must_use]
    pub fn checked_mul(self, rhs: Fixed) -> Option<Fixed> {
        let product = i64::from(self.0) * i64::from(rhs.0) / i64::from(SCALE);
        i32::try_from(product).ok().map(Fixed)
    }

    /// Fixed-point division: `div(a, b) = (a * SCALE) / b`, computed in a
    /// 64-bit intermediate per spec §4.1. Returns `None` for division by zero.
    #[inline]
    #[must_use]
    pub fn checked_div(self, rhs: Fixed) -> Option<Fixed> {
        if rhs.0 == 0 {
            return None;
        }
        let scaled = i64::from(self.0) * i64::from(SCALE) / i64::from(rhs.0);
        i32::try_from(scaled).ok().map(Fixed)
    }

    /// Clamps `self` into `[lo, hi]`.
    #[inline]
    #[must_use]
    pub fn clamp(self, lo: Fixed, hi: Fixed) -> Fixed {
        Fixed(self.0.clamp(lo.0, hi.0))
    }

    /// Absolute value.
    #[inline]
    #[must_use]
    pub const fn abs(self) -> Fixed {
        Fixed(self.0.abs())
    }

    /// `true` if this value is strictly negative.
    #[inline]
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Integer square root of this fixed-point value, itself returned as a
    /// `Fixed` (so `sqrt(Fixed::from_int(4))` reports `2.0`, not a bare `2`).
    #[inline]
    #[must_use]
    pub fn sqrt(self) -> Fixed {
        if self.0 <= 0 {
            return Fixed::ZERO;
        }
        // sqrt(x / SCALE) = sqrt(x * SCALE) / SCALE, kept in raw units so the
        // result is itself scale-1000.
        let scaled_up = i64::from(self.0) * i64::from(SCALE);
        Fixed(isqrt(scaled_up) as i32)
    }
}

/// Integer square root via Newton's method on a non-negative 64-bit input.
/// `isqrt(n <= 0) == 0`; otherwise returns the largest `k` with `k*k <= n`.
///
/// Termination is guaranteed: each iteration either strictly decreases the
/// estimate or the loop exits, and the estimate is bounded below by the true
/// root, so the sequence is finite.
#[inline]
#[must_use]
pub fn isqrt(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    if n == 1 {
        return 1;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / SCALE;
        let frac = (self.0 % SCALE).abs();
        write!(f, "{whole}.{frac:03}")
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 += rhs.0;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 -= rhs.0;
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

/// Panicking convenience multiply for call sites where overflow is already
/// known to be impossible (bounded game-world coordinates). Prefer
/// [`Fixed::checked_mul`] at any boundary where inputs are untrusted.
impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        self.checked_mul(rhs)
            .expect("fixed-point multiply overflowed i32")
    }
}

/// Panicking convenience divide; see the [`Mul`] impl's note. Division by
/// zero still panics (there is no silent zero fallback at this layer).
impl Div for Fixed {
    type Output = Fixed;
    #[inline]
    fn div(self, rhs: Fixed) -> Fixed {
        self.checked_div(rhs)
            .expect("fixed-point divide overflowed or divided by zero")
    }
}

impl From<i32> for Fixed {
    #[inline]
    fn from(raw: i32) -> Self {
        Fixed(raw)
    }
}
