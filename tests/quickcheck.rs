mod utils;

use quickcheck::{quickcheck, Arbitrary, Gen};

use polydecomp::decomp::{
    build_interior_decomposition, sweep_line_build, NodePool, RegionIterator,
    VerticalDecomposition, VerticalDecompositionType,
};
use polydecomp::intersect::intersect;
use polydecomp::point::Point2;
use polydecomp::polygon::validate_polygon_vertices;
use polydecomp::triangulate::triangulate;
use polydecomp::validation::{flip_horizontally, gather_nodes, validate_polygon_decomposition};
use polydecomp::{HorizontalDirection, Winding};

fn lattice_point(g: &mut Gen) -> Point2 {
    let x = i32::arbitrary(g).rem_euclid(41) - 20;
    let y = i32::arbitrary(g).rem_euclid(41) - 20;
    Point2::from((x as f64, y as f64))
}

fn raw_vector(point: Point2, center: (i64, i64), n: i64) -> (i64, i64) {
    (
        n * point.x().raw() as i64 - center.0,
        n * point.y().raw() as i64 - center.1,
    )
}

/// The angular half of a vector: 0 for the upper half plane (including the
/// positive x-axis), 1 for the lower.
fn angular_half(v: (i64, i64)) -> u8 {
    if v.1 > 0 || (v.1 == 0 && v.0 > 0) {
        0
    } else {
        1
    }
}

/// Sorts `points` counter-clockwise around their centroid, exactly.
fn angular_sort(mut points: Vec<Point2>) -> Vec<Point2> {
    let n = points.len() as i64;
    let center = points.iter().fold((0i64, 0i64), |acc, p| {
        (acc.0 + p.x().raw() as i64, acc.1 + p.y().raw() as i64)
    });

    points.sort_by(|&a, &b| {
        let va = raw_vector(a, center, n);
        let vb = raw_vector(b, center, n);
        angular_half(va).cmp(&angular_half(vb)).then_with(|| {
            let cross = va.0 as i128 * vb.1 as i128 - va.1 as i128 * vb.0 as i128;
            cross.cmp(&0).reverse()
        })
    });

    // Points collinear with the centroid would produce overlapping edges;
    // keep one per direction.
    points.dedup_by(|&mut a, &mut b| {
        let va = raw_vector(a, center, n);
        let vb = raw_vector(b, center, n);
        angular_half(va) == angular_half(vb)
            && va.0 as i128 * vb.1 as i128 - va.1 as i128 * vb.0 as i128 == 0
    });

    points
}

/// Strict convex hull (collinear points dropped), counter-clockwise.
fn convex_hull(mut points: Vec<Point2>) -> Vec<Point2> {
    points.sort_by_key(|p| (p.x(), p.y()));
    points.dedup();
    if points.len() < 3 {
        return points;
    }

    let turns_left = |a: Point2, b: Point2, c: Point2| {
        polydecomp::point::cross(b - a, c - a) > polydecomp::scalar::ScalarDeg2::ZERO
    };

    let mut lower: Vec<Point2> = Vec::new();
    for &p in &points {
        while lower.len() >= 2 && !turns_left(lower[lower.len() - 2], lower[lower.len() - 1], p) {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point2> = Vec::new();
    for &p in points.iter().rev() {
        while upper.len() >= 2 && !turns_left(upper[upper.len() - 2], upper[upper.len() - 1], p) {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn fallback_triangle() -> Vec<Point2> {
    utils::pts(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)])
}

/// A generated simple counter-clockwise polygon: random lattice points
/// sorted by angle around their centroid, falling back to the convex hull
/// (or a fixed triangle) when that doesn't produce a valid polygon.
#[derive(Clone, Debug)]
struct SimplePolygon(Vec<Point2>);

impl Arbitrary for SimplePolygon {
    fn arbitrary(g: &mut Gen) -> SimplePolygon {
        let num_points = 3 + usize::arbitrary(g) % 12;
        let points: Vec<Point2> = (0..num_points).map(|_| lattice_point(g)).collect();

        let star = angular_sort(points.clone());
        if validate_polygon_vertices(&star).is_ok() {
            return SimplePolygon(star);
        }

        let hull = convex_hull(points);
        if validate_polygon_vertices(&hull).is_ok() {
            SimplePolygon(hull)
        } else {
            SimplePolygon(fallback_triangle())
        }
    }
}

/// A generated convex counter-clockwise polygon.
#[derive(Clone, Debug)]
struct ConvexPolygon(Vec<Point2>);

impl Arbitrary for ConvexPolygon {
    fn arbitrary(g: &mut Gen) -> ConvexPolygon {
        let num_points = 3 + usize::arbitrary(g) % 12;
        let points: Vec<Point2> = (0..num_points).map(|_| lattice_point(g)).collect();

        let hull = convex_hull(points);
        if validate_polygon_vertices(&hull).is_ok() {
            ConvexPolygon(hull)
        } else {
            ConvexPolygon(fallback_triangle())
        }
    }
}

fn region_multiset(
    vertices: &[Point2],
    nodes: &NodePool,
    start: polydecomp::decomp::NodeId,
) -> Vec<(usize, usize, u8, u8)> {
    let mut regions: Vec<(usize, usize, u8, u8)> =
        RegionIterator::new(vertices, nodes, start)
            .map(|region| {
                (
                    nodes[region.left_node].vertex,
                    nodes[region.right_node].vertex,
                    region.left_node_branch_index,
                    region.right_node_branch_index,
                )
            })
            .collect();
    regions.sort_unstable();
    regions
}

quickcheck! {
    /// The triangulation of any generated polygon is a tessellation.
    fn triangulation_is_valid(polygon: SimplePolygon) -> bool {
        let vertices = polygon.0;
        let vd = sweep_line_build(&vertices, VerticalDecompositionType::Interior);
        let triangles = triangulate(&vertices, &vd.nodes, vd.leftmost_node);
        utils::validate_triangulation(&vertices, &triangles)
    }

    /// The divide-and-conquer builder always produces a valid decomposition.
    fn divide_and_conquer_is_valid(polygon: SimplePolygon) -> bool {
        let vertices = polygon.0;
        let mut node_pool = NodePool::new();
        let root = build_interior_decomposition(&vertices, Winding::Ccw, &mut node_pool);
        validate_polygon_decomposition(&vertices, &node_pool, Winding::Ccw, root)
    }

    /// Both builders induce the same regions.
    fn builders_agree(polygon: SimplePolygon) -> bool {
        let vertices = polygon.0;

        let sweep_vd = sweep_line_build(&vertices, VerticalDecompositionType::Interior);
        let sweep_regions = region_multiset(&vertices, &sweep_vd.nodes, sweep_vd.leftmost_node);

        let mut node_pool = NodePool::new();
        let root = build_interior_decomposition(&vertices, Winding::Ccw, &mut node_pool);
        let dnc_regions = region_multiset(&vertices, &node_pool, root);

        sweep_regions == dnc_regions
    }

    /// Decomposing the horizontally flipped polygon with the opposite
    /// winding mirrors the decomposition.
    fn flip_invariance(polygon: SimplePolygon) -> bool {
        let vertices = polygon.0;

        let mut node_pool = NodePool::new();
        let root = build_interior_decomposition(&vertices, Winding::Ccw, &mut node_pool);

        let mut flipped_vertices = vertices.clone();
        flip_horizontally(&mut flipped_vertices);
        let mut flipped_pool = NodePool::new();
        let flipped_root =
            build_interior_decomposition(&flipped_vertices, Winding::Cw, &mut flipped_pool);

        let node_summary = |nodes: &NodePool, id: polydecomp::decomp::NodeId, mirror: bool| {
            let node = &nodes[id];
            let direction = if mirror { node.direction.opposite() } else { node.direction };
            (node.vertex, direction == HorizontalDirection::Right, node.node_type, node.lower_opp_edge, node.upper_opp_edge)
        };

        let mut original: Vec<_> = gather_nodes(&node_pool, root)
            .into_iter()
            .map(|id| node_summary(&node_pool, id, false))
            .collect();
        let mut mirrored: Vec<_> = gather_nodes(&flipped_pool, flipped_root)
            .into_iter()
            .map(|id| node_summary(&flipped_pool, id, true))
            .collect();

        original.sort_by_key(|n| (n.0, n.1));
        mirrored.sort_by_key(|n| (n.0, n.1));
        original == mirrored
    }

    /// Intersection is symmetric, and on convex pairs it matches an
    /// exact separating-axis oracle.
    fn intersect_matches_convex_oracle(a: ConvexPolygon, b: ConvexPolygon, dx: i8, dy: i8) -> bool {
        let a = a.0;
        let b = utils::translated(&b.0, (dx % 16) as i32, (dy % 16) as i32);

        let a_exterior = VerticalDecomposition::exterior(&a);
        let b_exterior = VerticalDecomposition::exterior(&b);

        let forward = intersect(&a, &a_exterior, &b, &b_exterior);
        let backward = intersect(&b, &b_exterior, &a, &a_exterior);

        forward == backward && forward == utils::convex_polygons_intersect(&a, &b)
    }
}
