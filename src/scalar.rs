//! Exact fixed-point scalars.
//!
//! Coordinates are degree 1 scalars: 32 bit integers scaled by 2^-12.
//! Products of two coordinates (cross products, the numerator of a
//! y-on-edge value) are degree 2 scalars: 64 bit integers scaled by 2^-24.
//! Comparisons between rationals multiply out into 128 bit integers, so no
//! operation in this crate ever rounds.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// The number of fractional bits in a [`ScalarDeg1`].
pub const SCALAR_DEG_1_FRACTIONAL_BITS: u32 = 12;

/// A degree 1 scalar: a coordinate.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScalarDeg1(i32);

impl ScalarDeg1 {
    /// Constructs a `ScalarDeg1` from its raw integer representation.
    #[inline]
    pub fn from_raw(raw: i32) -> ScalarDeg1 {
        ScalarDeg1(raw)
    }

    /// Returns the raw integer representation of this scalar.
    #[inline]
    pub fn raw(self) -> i32 {
        self.0
    }
}

impl From<i32> for ScalarDeg1 {
    #[inline]
    fn from(value: i32) -> ScalarDeg1 {
        ScalarDeg1(value << SCALAR_DEG_1_FRACTIONAL_BITS)
    }
}

impl From<f64> for ScalarDeg1 {
    /// Converts `value` to the nearest representable scalar.
    #[inline]
    fn from(value: f64) -> ScalarDeg1 {
        ScalarDeg1((value * (1 << SCALAR_DEG_1_FRACTIONAL_BITS) as f64).round() as i32)
    }
}

impl From<ScalarDeg1> for f64 {
    #[inline]
    fn from(value: ScalarDeg1) -> f64 {
        value.0 as f64 / (1 << SCALAR_DEG_1_FRACTIONAL_BITS) as f64
    }
}

impl Add for ScalarDeg1 {
    type Output = ScalarDeg1;
    #[inline]
    fn add(self, rhs: ScalarDeg1) -> ScalarDeg1 {
        ScalarDeg1(self.0 + rhs.0)
    }
}

impl Sub for ScalarDeg1 {
    type Output = ScalarDeg1;
    #[inline]
    fn sub(self, rhs: ScalarDeg1) -> ScalarDeg1 {
        ScalarDeg1(self.0 - rhs.0)
    }
}

impl Neg for ScalarDeg1 {
    type Output = ScalarDeg1;
    #[inline]
    fn neg(self) -> ScalarDeg1 {
        ScalarDeg1(-self.0)
    }
}

impl Mul for ScalarDeg1 {
    type Output = ScalarDeg2;

    /// Multiplies two degree 1 scalars into a degree 2 scalar. The full
    /// product is representable, so this never overflows.
    #[inline]
    fn mul(self, rhs: ScalarDeg1) -> ScalarDeg2 {
        ScalarDeg2(self.0 as i64 * rhs.0 as i64)
    }
}

impl fmt::Debug for ScalarDeg1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", f64::from(*self))
    }
}

/// A degree 2 scalar: the product of two coordinates.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScalarDeg2(i64);

impl ScalarDeg2 {
    /// The zero value.
    pub const ZERO: ScalarDeg2 = ScalarDeg2(0);

    /// Constructs a `ScalarDeg2` from its raw integer representation.
    #[inline]
    pub fn from_raw(raw: i64) -> ScalarDeg2 {
        ScalarDeg2(raw)
    }

    /// Returns the raw integer representation of this scalar.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }
}

impl Add for ScalarDeg2 {
    type Output = ScalarDeg2;
    #[inline]
    fn add(self, rhs: ScalarDeg2) -> ScalarDeg2 {
        ScalarDeg2(self.0 + rhs.0)
    }
}

impl Sub for ScalarDeg2 {
    type Output = ScalarDeg2;
    #[inline]
    fn sub(self, rhs: ScalarDeg2) -> ScalarDeg2 {
        ScalarDeg2(self.0 - rhs.0)
    }
}

impl Neg for ScalarDeg2 {
    type Output = ScalarDeg2;
    #[inline]
    fn neg(self) -> ScalarDeg2 {
        ScalarDeg2(-self.0)
    }
}

impl fmt::Debug for ScalarDeg2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as f64 / (1i64 << (2 * SCALAR_DEG_1_FRACTIONAL_BITS)) as f64)
    }
}

/// The y-coordinate of a point on a non-vertical edge, as an exact rational
/// with a degree 2 numerator and a degree 1 denominator.
///
/// Finite values keep their denominator strictly positive. The
/// [`infinity`](YOnEdge::infinity) and
/// [`negative_infinity`](YOnEdge::negative_infinity) sentinels use a zero
/// denominator with a ±1 numerator, which makes the cross-multiplied
/// comparison below order them correctly against every finite value.
/// Comparing the two opposite infinities against each other is not supported.
#[derive(Copy, Clone)]
pub struct YOnEdge {
    num: ScalarDeg2,
    denom: ScalarDeg1,
}

impl YOnEdge {
    /// Constructs a `YOnEdge` with value `num / denom`.
    ///
    /// The sign is normalized so the stored denominator is positive.
    #[inline]
    pub fn new(num: ScalarDeg2, denom: ScalarDeg1) -> YOnEdge {
        debug_assert!(denom.raw() != 0);
        if denom.raw() < 0 {
            YOnEdge { num: -num, denom: -denom }
        } else {
            YOnEdge { num, denom }
        }
    }

    /// The value greater than every finite `YOnEdge`.
    #[inline]
    pub fn infinity() -> YOnEdge {
        YOnEdge { num: ScalarDeg2::from_raw(1), denom: ScalarDeg1::from_raw(0) }
    }

    /// The value less than every finite `YOnEdge`.
    #[inline]
    pub fn negative_infinity() -> YOnEdge {
        YOnEdge { num: ScalarDeg2::from_raw(-1), denom: ScalarDeg1::from_raw(0) }
    }
}

impl PartialEq for YOnEdge {
    #[inline]
    fn eq(&self, other: &YOnEdge) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for YOnEdge {}

impl PartialOrd for YOnEdge {
    #[inline]
    fn partial_cmp(&self, other: &YOnEdge) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for YOnEdge {
    #[inline]
    fn cmp(&self, other: &YOnEdge) -> Ordering {
        let lhs = self.num.raw() as i128 * other.denom.raw() as i128;
        let rhs = other.num.raw() as i128 * self.denom.raw() as i128;
        lhs.cmp(&rhs)
    }
}

impl PartialEq<ScalarDeg1> for YOnEdge {
    #[inline]
    fn eq(&self, other: &ScalarDeg1) -> bool {
        // num / (denom << frac_bits) == other_raw >> frac_bits
        self.num.raw() == other.raw() as i64 * self.denom.raw() as i64
    }
}

impl PartialOrd<ScalarDeg1> for YOnEdge {
    #[inline]
    fn partial_cmp(&self, other: &ScalarDeg1) -> Option<Ordering> {
        let rhs = other.raw() as i64 * self.denom.raw() as i64;
        Some(self.num.raw().cmp(&rhs))
    }
}

impl fmt::Debug for YOnEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom.raw() == 0 {
            if self.num.raw() > 0 {
                write!(f, "inf")
            } else {
                write!(f, "-inf")
            }
        } else {
            let value = self.num.raw() as f64
                / (self.denom.raw() as f64 * (1 << SCALAR_DEG_1_FRACTIONAL_BITS) as f64);
            write!(f, "{}", value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deg1_from_f64_rounds_to_quantum() {
        let a = ScalarDeg1::from(0.25);
        assert_eq!(a.raw(), 1 << (SCALAR_DEG_1_FRACTIONAL_BITS - 2));
        assert_eq!(f64::from(a), 0.25);
    }

    #[test]
    fn deg1_arithmetic() {
        let a = ScalarDeg1::from(3);
        let b = ScalarDeg1::from(5);
        assert_eq!(a + b, ScalarDeg1::from(8));
        assert_eq!(a - b, ScalarDeg1::from(-2));
        assert_eq!(-a, ScalarDeg1::from(-3));
        assert!(a < b);
    }

    #[test]
    fn deg1_times_deg1_is_deg2() {
        let a = ScalarDeg1::from(3);
        let b = ScalarDeg1::from(-7);
        assert_eq!(a * b, ScalarDeg2::from_raw(-21 << (2 * SCALAR_DEG_1_FRACTIONAL_BITS)));
    }

    #[test]
    fn y_on_edge_comparisons() {
        // 3/2 vs 10/7, with denominators normalized from either sign.
        let a = YOnEdge::new(ScalarDeg1::from(3) * ScalarDeg1::from(1), ScalarDeg1::from(2));
        let b = YOnEdge::new(ScalarDeg1::from(-10) * ScalarDeg1::from(1), ScalarDeg1::from(-7));
        assert!(a > b);
        assert!(b < a);
        assert_eq!(a, YOnEdge::new(ScalarDeg1::from(6) * ScalarDeg1::from(1), ScalarDeg1::from(4)));
    }

    #[test]
    fn y_on_edge_vs_deg1() {
        let a = YOnEdge::new(ScalarDeg1::from(3) * ScalarDeg1::from(1), ScalarDeg1::from(2));
        assert!(a > ScalarDeg1::from(1));
        assert!(a < ScalarDeg1::from(2));
        let b = YOnEdge::new(ScalarDeg1::from(4) * ScalarDeg1::from(1), ScalarDeg1::from(2));
        assert!(b == ScalarDeg1::from(2));
    }

    #[test]
    fn y_on_edge_infinities() {
        let finite = YOnEdge::new(ScalarDeg1::from(100) * ScalarDeg1::from(1), ScalarDeg1::from(1));
        assert!(YOnEdge::infinity() > finite);
        assert!(YOnEdge::negative_infinity() < finite);
        assert!(finite < YOnEdge::infinity());
        assert!(finite > YOnEdge::negative_infinity());
    }
}
