//! Simple polygons and their validation.

use thiserror::Error;

use crate::point::{cross, Point2};
use crate::scalar::ScalarDeg2;
use crate::util::next_cyclic;

/// The ways a vertex sequence can fail to form a valid polygon.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolygonError {
    /// Fewer than 3 vertices.
    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// Two vertices coincide.
    #[error("vertices {0} and {1} coincide")]
    DuplicateVertex(usize, usize),

    /// The boundary has clockwise winding.
    #[error("the vertices are not in counter-clockwise order")]
    NotCounterClockwise,

    /// Two boundary edges intersect.
    #[error("the edges starting at vertices {0} and {1} intersect")]
    SelfIntersection(usize, usize),
}

/// A validated simple polygon.
///
/// The vertices are stored in counter-clockwise order, are pairwise distinct
/// and the boundary doesn't self-intersect. The decomposition algorithms take
/// plain `&[Point2]` slices, so a `Polygon2` is handed to them through
/// [`vertices`](Polygon2::vertices); the type exists so that validation
/// happens once, at the input boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polygon2 {
    vertices: Vec<Point2>,
}

impl Polygon2 {
    /// Constructs a polygon from `vertices`, validating them.
    pub fn new(vertices: Vec<Point2>) -> Result<Polygon2, PolygonError> {
        validate_polygon_vertices(&vertices)?;
        Ok(Polygon2 { vertices })
    }

    /// Constructs a polygon without validating the vertices.
    ///
    /// The caller must guarantee the conditions checked by
    /// [`validate_polygon_vertices`]; they're still checked when debug
    /// assertions are enabled.
    pub fn unsafe_from_vertices(vertices: Vec<Point2>) -> Polygon2 {
        debug_assert!(validate_polygon_vertices(&vertices).is_ok());
        Polygon2 { vertices }
    }

    /// Returns the vertices of this polygon.
    #[inline]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns whether the polygon has no vertices. Always false for a
    /// validated polygon; provided for slice-like completeness.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Consumes the polygon and returns its vertices.
    #[inline]
    pub fn into_vertices(self) -> Vec<Point2> {
        self.vertices
    }
}

impl std::ops::Index<usize> for Polygon2 {
    type Output = Point2;
    #[inline]
    fn index(&self, index: usize) -> &Point2 {
        &self.vertices[index]
    }
}

impl AsRef<[Point2]> for Polygon2 {
    #[inline]
    fn as_ref(&self) -> &[Point2] {
        &self.vertices
    }
}

/// Validates that `vertices` form a simple polygon:
///
///  1. there are at least 3 vertices,
///  2. all vertices are distinct,
///  3. the winding is counter-clockwise,
///  4. the boundary has no self-intersections.
pub fn validate_polygon_vertices(vertices: &[Point2]) -> Result<(), PolygonError> {
    if vertices.len() < 3 {
        return Err(PolygonError::TooFewVertices(vertices.len()));
    }

    for i in 0..vertices.len() {
        for j in i + 1..vertices.len() {
            if vertices[i] == vertices[j] {
                return Err(PolygonError::DuplicateVertex(i, j));
            }
        }
    }

    if signed_doubled_area(vertices) <= 0 {
        return Err(PolygonError::NotCounterClockwise);
    }

    let num_vertices = vertices.len();
    for i in 0..num_vertices {
        let a1 = vertices[i];
        let a2 = vertices[next_cyclic(num_vertices, i)];
        for j in i + 1..num_vertices {
            let b1 = vertices[j];
            let b2 = vertices[next_cyclic(num_vertices, j)];

            if j == i + 1 || (i == 0 && j == num_vertices - 1) {
                // Adjacent edges share exactly one endpoint. They only
                // overlap further if the boundary doubles back over itself.
                let (shared, far_a, far_b) =
                    if j == i + 1 { (a2, a1, b2) } else { (a1, a2, b1) };
                if cross(far_a - shared, far_b - shared) == ScalarDeg2::ZERO
                    && collinear_same_side(shared, far_a, far_b)
                {
                    return Err(PolygonError::SelfIntersection(i, j));
                }
            } else if segments_intersect(a1, a2, b1, b2) {
                return Err(PolygonError::SelfIntersection(i, j));
            }
        }
    }

    Ok(())
}

fn signed_doubled_area(vertices: &[Point2]) -> i128 {
    let origin = vertices[0];
    let mut area: i128 = 0;
    for i in 1..vertices.len() - 1 {
        area += cross(vertices[i] - origin, vertices[i + 1] - origin).raw() as i128;
    }
    area
}

/// Whether collinear points `a` and `b` lie on the same side of `base` (so
/// the segments `base..a` and `base..b` overlap).
fn collinear_same_side(base: Point2, a: Point2, b: Point2) -> bool {
    let da = a - base;
    let db = b - base;
    (da.x.raw() as i64 * db.x.raw() as i64 + da.y.raw() as i64 * db.y.raw() as i64) > 0
}

/// Whether `p` lies on the closed segment `s..e`; all three collinear.
fn collinear_point_on_segment(p: Point2, s: Point2, e: Point2) -> bool {
    let (min_x, max_x) = if s.x() <= e.x() { (s.x(), e.x()) } else { (e.x(), s.x()) };
    let (min_y, max_y) = if s.y() <= e.y() { (s.y(), e.y()) } else { (e.y(), s.y()) };
    min_x <= p.x() && p.x() <= max_x && min_y <= p.y() && p.y() <= max_y
}

/// Whether the closed segments `a1..a2` and `b1..b2` share a point.
fn segments_intersect(a1: Point2, a2: Point2, b1: Point2, b2: Point2) -> bool {
    let d1 = cross(a2 - a1, b1 - a1);
    let d2 = cross(a2 - a1, b2 - a1);
    let d3 = cross(b2 - b1, a1 - b1);
    let d4 = cross(b2 - b1, a2 - b1);

    let zero = ScalarDeg2::ZERO;
    if ((d1 > zero && d2 < zero) || (d1 < zero && d2 > zero))
        && ((d3 > zero && d4 < zero) || (d3 < zero && d4 > zero))
    {
        return true;
    }

    (d1 == zero && collinear_point_on_segment(b1, a1, a2))
        || (d2 == zero && collinear_point_on_segment(b2, a1, a2))
        || (d3 == zero && collinear_point_on_segment(a1, b1, b2))
        || (d4 == zero && collinear_point_on_segment(a2, b1, b2))
}
