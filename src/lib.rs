//! **polydecomp** computes vertical decompositions of simple polygons.
//!
//! A vertical decomposition partitions the interior or exterior of a polygon
//! into vertically convex cells by extending a maximal vertical segment from
//! every side vertex into the region until it hits the boundary again. The
//! cells form a planar graph of [`Node`](decomp::Node)s, which is the central
//! data structure of this crate: it is built by the
//! [divide-and-conquer builder](decomp::build_interior_decomposition) (or the
//! [sweep-line reference builder](decomp::sweep_line_build)), queried through
//! [`RegionIterator`](decomp::RegionIterator), and consumed by
//! [`triangulate`](triangulate::triangulate) and
//! [`intersect`](intersect::intersect).
//!
//! All arithmetic is exact: coordinates are fixed-point scalars and every
//! predicate is evaluated without rounding, so the decomposition is correct
//! for any valid input polygon.

pub mod decomp;
pub mod intersect;
pub mod point;
pub mod polygon;
pub mod scalar;
pub mod triangulate;
mod util;

#[doc(hidden)] // Not for public consumption -- only for testing
pub mod validation;

pub use crate::decomp::{
    build_exterior_decomposition, build_interior_decomposition, sweep_line_build, Edge, EdgeRange,
    Node, NodeId, NodePool, NodeType, Region, RegionIterator, VerticalDecomposition,
    VerticalDecompositionType,
};
pub use crate::intersect::intersect;
pub use crate::point::{cross, lex_less_than, Point2, Vector2};
pub use crate::polygon::{Polygon2, PolygonError};
pub use crate::scalar::{ScalarDeg1, ScalarDeg2, YOnEdge};
pub use crate::triangulate::{triangulate, Triangle2};

/// A horizontal direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalDirection {
    /// The direction of decreasing x.
    Left,
    /// The direction of increasing x.
    Right,
}

impl HorizontalDirection {
    /// Returns the other direction.
    #[inline]
    pub fn opposite(self) -> HorizontalDirection {
        match self {
            HorizontalDirection::Left => HorizontalDirection::Right,
            HorizontalDirection::Right => HorizontalDirection::Left,
        }
    }
}

/// The winding of a polygon boundary, or of the region a decomposition covers.
///
/// The internal convention is "interior left of the edge walk": with
/// [`Winding::Ccw`] the lower boundary of any region is traversed towards the
/// right and the upper boundary towards the left. Every algorithm in this
/// crate is invariant under a horizontal flip combined with a winding swap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Winding {
    /// Counter-clockwise.
    Ccw,
    /// Clockwise.
    Cw,
}

impl Winding {
    /// Returns the other winding.
    #[inline]
    pub fn opposite(self) -> Winding {
        match self {
            Winding::Ccw => Winding::Cw,
            Winding::Cw => Winding::Ccw,
        }
    }
}
