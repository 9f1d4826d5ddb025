//! Points, vectors and the lexicographic orders used throughout the crate.

use std::fmt;
use std::ops::Sub;

use crate::scalar::{ScalarDeg1, ScalarDeg2};
use crate::HorizontalDirection;

/// A 2D point with exact fixed-point coordinates.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Point2 {
    x: ScalarDeg1,
    y: ScalarDeg1,
}

impl Point2 {
    /// Constructs a `Point2` from its two coordinates.
    #[inline]
    pub fn new(x: ScalarDeg1, y: ScalarDeg1) -> Point2 {
        Point2 { x, y }
    }

    /// Returns the x-coordinate of this point.
    #[inline]
    pub fn x(self) -> ScalarDeg1 {
        self.x
    }

    /// Returns the y-coordinate of this point.
    #[inline]
    pub fn y(self) -> ScalarDeg1 {
        self.y
    }
}

impl From<(f64, f64)> for Point2 {
    /// Converts a coordinate pair to the nearest representable point.
    #[inline]
    fn from((x, y): (f64, f64)) -> Point2 {
        Point2 { x: ScalarDeg1::from(x), y: ScalarDeg1::from(y) }
    }
}

impl Sub for Point2 {
    type Output = Vector2;
    #[inline]
    fn sub(self, rhs: Point2) -> Vector2 {
        Vector2 { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl fmt::Debug for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

/// The difference of two [`Point2`]s.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Vector2 {
    /// The x-component.
    pub x: ScalarDeg1,
    /// The y-component.
    pub y: ScalarDeg1,
}

/// Returns the cross product of `a` and `b`.
///
/// The sign is positive iff `b` points to the left of `a`.
#[inline]
pub fn cross(a: Vector2, b: Vector2) -> ScalarDeg2 {
    a.x * b.y - a.y * b.x
}

/// Returns whether `a` comes before `b` in the order on x-coordinates with
/// ties broken by y-coordinate.
#[inline]
pub fn lex_less_than(a: Point2, b: Point2) -> bool {
    (a.x, a.y) < (b.x, b.y)
}

/// Returns whether `a` comes after `b` in the lexicographic order.
#[inline]
pub fn lex_greater_than(a: Point2, b: Point2) -> bool {
    lex_less_than(b, a)
}

/// Returns whether `a` comes before `b` when going in `direction`.
///
/// With [`HorizontalDirection::Right`] this is the lexicographic order, with
/// [`HorizontalDirection::Left`] its reverse.
#[inline]
pub fn lex_less_than_with_direction(direction: HorizontalDirection, a: Point2, b: Point2) -> bool {
    match direction {
        HorizontalDirection::Right => lex_less_than(a, b),
        HorizontalDirection::Left => lex_less_than(b, a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HorizontalDirection::{Left, Right};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::from((x, y))
    }

    #[test]
    fn cross_sign() {
        let a = p(2.0, 2.0);
        let b = p(8.0, 5.0);
        let c = p(2.0, 3.0);
        assert!(cross(b - a, c - a) > ScalarDeg2::ZERO);
        assert!(cross(c - a, b - a) < ScalarDeg2::ZERO);
        assert_eq!(cross(b - a, b - a), ScalarDeg2::ZERO);
    }

    #[test]
    fn lex_less_than_x_different() {
        assert!(lex_less_than(p(1.0, 4.0), p(2.0, 3.0)));
        assert!(!lex_less_than(p(2.0, 3.0), p(1.0, 4.0)));
    }

    #[test]
    fn lex_less_than_y_tie_break() {
        assert!(lex_less_than(p(4.0, 1.0), p(4.0, 2.0)));
        assert!(!lex_less_than(p(4.0, 2.0), p(4.0, 1.0)));
        assert!(!lex_less_than(p(4.0, 1.0), p(4.0, 1.0)));
    }

    #[test]
    fn lex_less_than_with_direction_flips() {
        let a = p(1.0, 4.0);
        let b = p(2.0, 3.0);

        assert!(lex_less_than_with_direction(Right, a, b));
        assert!(!lex_less_than_with_direction(Left, a, b));
        assert!(!lex_less_than_with_direction(Right, b, a));
        assert!(lex_less_than_with_direction(Left, b, a));

        let c = p(4.0, 1.0);
        let d = p(4.0, 2.0);
        assert!(lex_less_than_with_direction(Right, c, d));
        assert!(lex_less_than_with_direction(Left, d, c));

        assert!(!lex_less_than_with_direction(Right, a, a));
        assert!(!lex_less_than_with_direction(Left, a, a));
    }
}
