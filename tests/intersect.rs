mod utils;

use polydecomp::decomp::VerticalDecomposition;
use polydecomp::intersect::intersect;
use polydecomp::point::Point2;

/// Runs the intersection test in both argument orders and checks both give
/// the expected answer.
fn check_intersect(a: &[Point2], b: &[Point2], expected: bool) {
    let a_exterior = VerticalDecomposition::exterior(a);
    let b_exterior = VerticalDecomposition::exterior(b);

    assert_eq!(intersect(a, &a_exterior, b, &b_exterior), expected);
    assert_eq!(intersect(b, &b_exterior, a, &a_exterior), expected);
}

/// The 20 x 20 vertex pair from the intersection benchmark seed.
#[test]
fn benchmark_seed_polygons_intersect() {
    let a = utils::pts(&[
        (1.72, 8.00),
        (1.70, 6.54),
        (-0.82, 6.50),
        (-2.46, 5.70),
        (-3.14, 4.10),
        (-3.18, 3.04),
        (-2.18, 0.88),
        (-0.64, 0.30),
        (1.98, 0.36),
        (1.94, -1.26),
        (-2.44, -1.12),
        (-4.34, 0.96),
        (-6.32, 2.50),
        (-4.44, 4.22),
        (-5.60, 5.16),
        (-3.98, 5.70),
        (-6.00, 7.38),
        (-3.70, 8.60),
        (-1.56, 9.34),
        (0.52, 9.00),
    ]);
    let b = utils::pts(&[
        (-3.12, 12.74),
        (0.62, 13.36),
        (-0.44, 12.22),
        (4.06, 11.94),
        (2.46, 10.74),
        (7.98, 7.94),
        (8.16, 5.02),
        (5.44, 3.86),
        (7.12, 2.78),
        (8.60, 1.22),
        (8.40, -1.12),
        (5.52, -3.56),
        (1.52, -4.64),
        (-1.12, -3.66),
        (1.68, -2.84),
        (4.18, -0.62),
        (2.06, 1.80),
        (-0.90, 2.90),
        (3.36, 6.74),
        (0.66, 10.38),
        (-3.12, 12.74),
    ]);

    // The seed's polygon 'b' repeats its first vertex to close the loop.
    let b = b[..b.len() - 1].to_vec();

    check_intersect(&a, &b, true);
}

/// Horizontally disjoint polygons short-circuit before the main traversal.
#[test]
fn horizontally_disjoint() {
    let a = utils::pts(&[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0)]);
    let b = utils::pts(&[(5.0, 1.0), (8.0, 1.0), (8.0, 4.0), (5.0, 4.0)]);
    check_intersect(&a, &b, false);
}

/// Vertically separated but horizontally overlapping polygons force a real
/// traversal.
#[test]
fn vertically_separated() {
    let a = utils::pts(&[(0.0, 0.0), (6.0, 0.0), (6.0, 2.0), (0.0, 2.0)]);
    let b = utils::pts(&[(1.0, 5.0), (7.0, 5.0), (7.0, 8.0), (1.0, 8.0)]);
    check_intersect(&a, &b, false);
}

#[test]
fn overlapping_convex_polygons() {
    let a = utils::pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let b = utils::pts(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)]);
    check_intersect(&a, &b, true);
}

#[test]
fn nested_polygons_intersect() {
    let outer = utils::pts(&[(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0)]);
    let inner = utils::pts(&[(-1.0, -1.0), (1.0, -1.0), (0.0, 1.0)]);
    check_intersect(&outer, &inner, true);
}

/// A triangle inside the pocket of a U-shaped polygon, touching nothing.
#[test]
fn polygon_in_pocket_does_not_intersect() {
    let u_shape = utils::pts(&[
        (0.0, 0.0),
        (8.0, 0.0),
        (8.0, 2.0),
        (3.0, 2.0),
        (3.0, 6.0),
        (8.0, 6.0),
        (8.0, 8.0),
        (0.0, 8.0),
    ]);
    let pocket_triangle = utils::pts(&[(5.0, 3.0), (7.0, 3.0), (6.0, 5.0)]);
    check_intersect(&u_shape, &pocket_triangle, false);
}

/// The same pocket, but now the triangle pokes into the pocket wall.
#[test]
fn polygon_reaching_into_pocket_wall_intersects() {
    let u_shape = utils::pts(&[
        (0.0, 0.0),
        (8.0, 0.0),
        (8.0, 2.0),
        (3.0, 2.0),
        (3.0, 6.0),
        (8.0, 6.0),
        (8.0, 8.0),
        (0.0, 8.0),
    ]);
    let poking_triangle = utils::pts(&[(5.0, 3.0), (7.0, 1.0), (6.0, 5.0)]);
    check_intersect(&u_shape, &poking_triangle, true);
}

/// A finger reaching deep into another polygon's pocket through its open
/// mouth, without touching it.
#[test]
fn finger_in_pocket_does_not_intersect() {
    let u_shape = utils::pts(&[
        (0.0, 0.0),
        (8.0, 0.0),
        (8.0, 1.0),
        (2.0, 1.0),
        (2.0, 3.0),
        (8.0, 3.0),
        (8.0, 4.0),
        (0.0, 4.0),
    ]);
    let finger = utils::pts(&[(4.0, 1.8), (12.0, 1.8), (12.0, 2.2), (4.0, 2.2)]);
    check_intersect(&u_shape, &finger, false);
}

/// As above, but the finger dips into the pocket's lower arm.
#[test]
fn finger_crossing_pocket_arm_intersects() {
    let u_shape = utils::pts(&[
        (0.0, 0.0),
        (8.0, 0.0),
        (8.0, 1.0),
        (2.0, 1.0),
        (2.0, 3.0),
        (8.0, 3.0),
        (8.0, 4.0),
        (0.0, 4.0),
    ]);
    let finger = utils::pts(&[(4.0, 0.5), (12.0, 1.8), (12.0, 2.2), (4.0, 2.2)]);
    check_intersect(&u_shape, &finger, true);
}

/// Convex pairs checked against an exact separating-axis oracle.
#[test]
fn convex_pairs_match_separating_axis_oracle() {
    let base = utils::pts(&[(0.0, 0.0), (5.0, 0.0), (7.0, 3.0), (3.0, 6.0), (-1.0, 3.0)]);
    let other = utils::pts(&[(0.0, 0.0), (3.0, 1.0), (4.0, 4.0), (1.0, 3.0)]);

    for dx in -9..=9 {
        for dy in [-7, -3, 0, 3, 7] {
            let moved = utils::translated(&other, dx, dy);
            let expected = utils::convex_polygons_intersect(&base, &moved);
            check_intersect(&base, &moved, expected);
        }
    }
}
