//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::f64::consts::PI;

use polydecomp::decomp::{NodeId, NodePool, RegionIterator};
use polydecomp::point::{cross, Point2};
use polydecomp::scalar::ScalarDeg2;
use polydecomp::triangulate::Triangle2;

pub fn pts(coords: &[(f64, f64)]) -> Vec<Point2> {
    coords.iter().copied().map(Point2::from).collect()
}

/// Builds a spiral with the given number of revolutions, vertices per
/// revolution and radii. The result is a valid counter-clockwise polygon.
pub fn spiral_polygon(
    num_revolutions: usize,
    num_vertices_per_revolution: usize,
    outer_radius: f64,
    inner_radius: f64,
) -> Vec<Point2> {
    let boundary_num_vertices = num_revolutions * num_vertices_per_revolution;

    let mut inward_vertices = Vec::new();
    let mut outward_vertices = Vec::new();

    for i in 0..=boundary_num_vertices {
        let angle = 2.0 * PI * i as f64 / num_vertices_per_revolution as f64;
        let inward_radius =
            outer_radius + (inner_radius - outer_radius) * i as f64 / boundary_num_vertices as f64;
        let outward_radius =
            inward_radius + (0.5 / num_revolutions as f64) * (inner_radius - outer_radius);
        let s = angle.sin();
        let c = angle.cos();

        inward_vertices.push(Point2::from((inward_radius * s, inward_radius * -c)));
        outward_vertices.push(Point2::from((outward_radius * s, outward_radius * -c)));
    }

    let mut vertices = inward_vertices;
    vertices.extend(outward_vertices.into_iter().rev());
    vertices
}

/// Collects the regions produced by a [`RegionIterator`] starting at
/// `first_node`, as vertex-index tuples which don't depend on node identity:
/// `(left_vertex, right_vertex, left_branch, right_branch)`.
pub fn collect_regions(
    vertices: &[Point2],
    nodes: &NodePool,
    first_node: NodeId,
) -> Vec<(usize, usize, u8, u8)> {
    RegionIterator::new(vertices, nodes, first_node)
        .map(|region| {
            (
                nodes[region.left_node].vertex,
                nodes[region.right_node].vertex,
                region.left_node_branch_index,
                region.right_node_branch_index,
            )
        })
        .collect()
}

/// Returns whether `point` lies in the closed region bounded by `polygon`.
pub fn point_in_closed_polygon(polygon: &[Point2], point: Point2) -> bool {
    let mut inside = false;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];

        if point_on_closed_segment(a, b, point) {
            return true;
        }

        // Count crossings of the upward ray from 'point'.
        if (a.y() > point.y()) != (b.y() > point.y()) {
            let side = cross(b - a, point - a);
            let crosses = if b.y() > a.y() {
                side > ScalarDeg2::ZERO
            } else {
                side < ScalarDeg2::ZERO
            };
            if crosses {
                inside = !inside;
            }
        }
    }
    inside
}

fn point_on_closed_segment(a: Point2, b: Point2, point: Point2) -> bool {
    if cross(b - a, point - a) != ScalarDeg2::ZERO {
        return false;
    }
    let (min_x, max_x) = if a.x() <= b.x() { (a.x(), b.x()) } else { (b.x(), a.x()) };
    let (min_y, max_y) = if a.y() <= b.y() { (a.y(), b.y()) } else { (b.y(), a.y()) };
    min_x <= point.x() && point.x() <= max_x && min_y <= point.y() && point.y() <= max_y
}

/// Returns whether the interiors of segments `a` and `b` properly cross.
fn interiors_cross(a: (Point2, Point2), b: (Point2, Point2)) -> bool {
    let zero = ScalarDeg2::ZERO;
    let a_start_side = cross(b.1 - b.0, a.0 - b.0);
    let a_end_side = cross(b.1 - b.0, a.1 - b.0);
    if !((a_start_side > zero && a_end_side < zero) || (a_start_side < zero && a_end_side > zero)) {
        return false;
    }

    let b_start_side = cross(a.1 - a.0, b.0 - a.0);
    let b_end_side = cross(a.1 - a.0, b.1 - a.0);
    (b_start_side > zero && b_end_side < zero) || (b_start_side < zero && b_end_side > zero)
}

/// Returns whether `q` lies entirely on the non-negative side of the axis
/// through `p_edge_start` with direction `p_edge_dir`.
fn is_separating_axis(p_edge_start: Point2, p_edge_end: Point2, q: &Triangle2) -> bool {
    (0..3).all(|i| cross(p_edge_end - p_edge_start, q[i] - p_edge_start) >= ScalarDeg2::ZERO)
}

/// Returns whether triangles `a` and `b` overlap on their interiors.
pub fn triangles_intersect(a: &Triangle2, b: &Triangle2) -> bool {
    for i in 0..3 {
        if is_separating_axis(a[i], a[(i + 1) % 3], b) || is_separating_axis(b[i], b[(i + 1) % 3], a)
        {
            return false;
        }
    }
    true
}

/// Returns whether `triangle` is contained within `polygon`.
fn triangle_is_within(polygon: &[Point2], triangle: &Triangle2) -> bool {
    for i in 0..3 {
        if !point_in_closed_polygon(polygon, triangle[i]) {
            return false;
        }

        let triangle_edge = (triangle[i], triangle[(i + 1) % 3]);
        for j in 0..polygon.len() {
            let polygon_edge = (polygon[j], polygon[(j + 1) % polygon.len()]);
            if interiors_cross(triangle_edge, polygon_edge) {
                return false;
            }
        }
    }
    true
}

/// Validates that `triangles` tessellate `polygon`:
///
///  1. there are `polygon.len() - 2` triangles,
///  2. every triangle vertex is a polygon vertex,
///  3. every triangle has counter-clockwise winding (a `Triangle2` invariant,
///     revalidated here),
///  4. every triangle lies within the polygon,
///  5. no two triangles overlap.
pub fn validate_triangulation(polygon: &[Point2], triangles: &[Triangle2]) -> bool {
    if triangles.len() != polygon.len() - 2 {
        return false;
    }

    let vertex_set: HashSet<Point2> = polygon.iter().copied().collect();

    for triangle in triangles {
        for i in 0..3 {
            if !vertex_set.contains(&triangle[i]) {
                return false;
            }
        }

        if cross(triangle[1] - triangle[0], triangle[2] - triangle[0]) <= ScalarDeg2::ZERO {
            return false;
        }

        if !triangle_is_within(polygon, triangle) {
            return false;
        }
    }

    for i in 0..triangles.len() {
        for j in i + 1..triangles.len() {
            if triangles_intersect(&triangles[i], &triangles[j]) {
                return false;
            }
        }
    }

    true
}

/// An exact closed-set intersection oracle for a pair of convex polygons:
/// they're disjoint iff some edge of one has the other strictly outside.
pub fn convex_polygons_intersect(a: &[Point2], b: &[Point2]) -> bool {
    !(separated_by_edge_axis(a, b) || separated_by_edge_axis(b, a))
}

fn separated_by_edge_axis(p: &[Point2], q: &[Point2]) -> bool {
    for i in 0..p.len() {
        let start = p[i];
        let end = p[(i + 1) % p.len()];
        if q.iter().all(|&v| cross(end - start, v - start) < ScalarDeg2::ZERO) {
            return true;
        }
    }
    false
}

/// Translates a polygon by an integer offset.
pub fn translated(polygon: &[Point2], dx: i32, dy: i32) -> Vec<Point2> {
    polygon
        .iter()
        .map(|p| {
            Point2::new(
                p.x() + polydecomp::scalar::ScalarDeg1::from(dx),
                p.y() + polydecomp::scalar::ScalarDeg1::from(dy),
            )
        })
        .collect()
}
