//! The polygon-polygon intersection test.
//!
//! Decides whether the interiors of two polygons overlap, using their
//! precomputed exterior decompositions. A cooperative traversal moves one
//! active point over each polygon's boundary so that the points face each
//! other; whichever boundary pokes through the other polygon's current edge
//! proves an intersection. The traversal visits every node a bounded number
//! of times, so the test runs in O(n + m) after the decompositions exist.

use crate::decomp::{
    edge_for_point_with_monotone_edge_range, y_on_edge_for_x, Edge, EdgeRange, NodeId, NodePool,
    NodeType, Region, RegionIterator, VerticalDecomposition, VerticalDecompositionType,
};
use crate::point::{lex_greater_than, lex_less_than, lex_less_than_with_direction, Point2};
use crate::util::{next_cyclic, prev_cyclic};
use crate::{HorizontalDirection, Winding};

/// The traversal state of one input polygon.
#[derive(Copy, Clone)]
struct PolygonIntersectState<'a> {
    vertices: &'a [Point2],
    nodes: &'a NodePool,

    /// The edge containing this polygon's active point.
    edge: Edge,

    /// The node the active point last passed.
    prev: NodeId,

    /// The node the active point will reach next.
    next: NodeId,
}

struct IntersectState<'a> {
    /// The polygon traversed in its own winding direction (counter-clockwise
    /// around its interior).
    a: PolygonIntersectState<'a>,

    /// The polygon traversed against its winding direction.
    b: PolygonIntersectState<'a>,

    /// The first node of polygon `b`'s traversal; reaching it again proves
    /// the traversal went all the way around without an intersection.
    b_first_node: Option<NodeId>,

    direction: HorizontalDirection,
}

impl<'a> IntersectState<'a> {
    #[inline]
    fn polygon(&self, is_a: bool) -> PolygonIntersectState<'a> {
        if is_a {
            self.a
        } else {
            self.b
        }
    }

    #[inline]
    fn set_polygon(&mut self, is_a: bool, polygon: PolygonIntersectState<'a>) {
        if is_a {
            self.a = polygon;
        } else {
            self.b = polygon;
        }
    }
}

enum IntermediateResult {
    /// An intersection was found.
    Intersect,

    /// Polygon `b`'s active point went all the way around without finding an
    /// intersection.
    BFirstNodeReached,

    /// The active points can't keep facing each other; a second traversal
    /// with the opposite initial orientation may still be necessary.
    Separated,

    ContinueIterating,
}

/// The edges of a region immediately below and above a query point. Either
/// can be `None` when the region is unbounded on that side.
#[derive(Copy, Clone)]
struct EdgePair {
    lower_edge: Option<Edge>,
    upper_edge: Option<Edge>,
}

struct InitialRegion {
    region: Region,
    edge_pair: EdgePair,
}

/// Returns whether the interiors of polygons `a` and `b` overlap.
///
/// `a_exterior` and `b_exterior` are the polygons' exterior vertical
/// decompositions (see [`VerticalDecomposition::exterior`]). Both polygons
/// must be counter-clockwise. The test allocates nothing and every decision
/// is exact.
pub fn intersect(
    a_vertices: &[Point2],
    a_exterior: &VerticalDecomposition,
    b_vertices: &[Point2],
    b_exterior: &VerticalDecomposition,
) -> bool {
    let a_leftmost = a_vertices[a_exterior.nodes[a_exterior.leftmost_node].vertex];
    let b_leftmost = b_vertices[b_exterior.nodes[b_exterior.leftmost_node].vertex];

    if lex_less_than(a_leftmost, b_leftmost) {
        intersect_ordered(a_vertices, a_exterior, b_vertices, b_exterior)
    } else {
        intersect_ordered(b_vertices, b_exterior, a_vertices, a_exterior)
    }
}

/// Implements `intersect` under the assumption that `a`'s leftmost vertex
/// lexicographically precedes `b`'s.
fn intersect_ordered(
    a_vertices: &[Point2],
    a_exterior: &VerticalDecomposition,
    b_vertices: &[Point2],
    b_exterior: &VerticalDecomposition,
) -> bool {
    let b_leftmost_node = b_exterior.leftmost_node;
    let b_leftmost_vertex = b_exterior.nodes[b_leftmost_node].vertex;
    let b_leftmost = b_vertices[b_leftmost_vertex];

    if lex_less_than(a_vertices[a_exterior.nodes[a_exterior.rightmost_node].vertex], b_leftmost) {
        // 'a' lies fully to the left of 'b'.
        return false;
    }

    let initial_region = match find_initial_region(a_vertices, a_exterior, b_leftmost) {
        Some(initial_region) => initial_region,
        None => {
            // The leftmost vertex of 'b' lies in no exterior region of 'a',
            // so it lies in 'a''s interior.
            return true;
        }
    };

    if let Some(upper_edge) = initial_region.edge_pair.upper_edge {
        // First pass: traverse 'a' counter-clockwise and 'b' clockwise,
        // starting at b's leftmost vertex.
        let mut state = IntersectState {
            a: PolygonIntersectState {
                vertices: a_vertices,
                nodes: &a_exterior.nodes,
                edge: upper_edge,
                prev: initial_region.region.left_node,
                next: initial_region.region.right_node,
            },
            b: PolygonIntersectState {
                vertices: b_vertices,
                nodes: &b_exterior.nodes,
                edge: Edge::incoming_edge(b_vertices, b_leftmost_vertex),
                prev: b_leftmost_node,
                next: b_exterior.nodes[b_leftmost_node].neighbors[2]
                    .expect("exterior extreme nodes have both outgoing branches"),
            },
            b_first_node: Some(b_leftmost_node),
            direction: HorizontalDirection::Right,
        };

        match intersect_main_loop(&mut state) {
            IntermediateResult::Intersect => return true,
            IntermediateResult::BFirstNodeReached => return false,
            IntermediateResult::Separated => {}
            IntermediateResult::ContinueIterating => unreachable!(),
        }
    }

    // The first pass ended separated (or couldn't start for lack of an upper
    // edge); retry from the same start point with the opposite orientation.
    // Without a lower edge there's nothing left to traverse.
    if let Some(lower_edge) = initial_region.edge_pair.lower_edge {
        let mut state = IntersectState {
            a: PolygonIntersectState {
                vertices: b_vertices,
                nodes: &b_exterior.nodes,
                edge: Edge::outgoing_edge(b_vertices, b_leftmost_vertex),
                prev: b_leftmost_node,
                next: b_exterior.nodes[b_leftmost_node].neighbors[1]
                    .expect("exterior extreme nodes have both outgoing branches"),
            },
            b: PolygonIntersectState {
                vertices: a_vertices,
                nodes: &a_exterior.nodes,
                edge: lower_edge,
                prev: initial_region.region.left_node,
                next: initial_region.region.right_node,
            },
            b_first_node: None,
            direction: HorizontalDirection::Right,
        };

        matches!(intersect_main_loop(&mut state), IntermediateResult::Intersect)
    } else {
        false
    }
}

/// Finds the region of `a`'s exterior decomposition containing `b_leftmost`,
/// or `None` if that point lies inside `a`.
fn find_initial_region(
    a_vertices: &[Point2],
    a_exterior: &VerticalDecomposition,
    b_leftmost: Point2,
) -> Option<InitialRegion> {
    let nodes = &a_exterior.nodes;
    let leftmost = a_exterior.leftmost_node;
    let rightmost = a_exterior.rightmost_node;

    if nodes[leftmost].neighbors[1] == nodes[leftmost].neighbors[2] {
        // A monotone polygon: the exterior has just the two half-plane-like
        // regions below and above it.
        let a_leftmost_vertex = nodes[leftmost].vertex;
        let a_rightmost_vertex = nodes[rightmost].vertex;

        let lower_hull = EdgeRange { start: a_leftmost_vertex, end: a_rightmost_vertex };
        let upper_edge = edge_for_point_with_monotone_edge_range(
            a_vertices,
            lower_hull,
            b_leftmost,
            HorizontalDirection::Right,
        );
        if upper_edge.on_exterior_side(a_vertices, b_leftmost, Winding::Ccw) {
            return Some(InitialRegion {
                region: Region {
                    left_node: leftmost,
                    right_node: rightmost,
                    left_node_branch_index: 1,
                    right_node_branch_index: 1,
                },
                edge_pair: EdgePair { lower_edge: None, upper_edge: Some(upper_edge) },
            });
        }

        let upper_hull = EdgeRange { start: a_rightmost_vertex, end: a_leftmost_vertex };
        let lower_edge = edge_for_point_with_monotone_edge_range(
            a_vertices,
            upper_hull,
            b_leftmost,
            HorizontalDirection::Left,
        );
        if lower_edge.on_exterior_side(a_vertices, b_leftmost, Winding::Ccw) {
            return Some(InitialRegion {
                region: Region {
                    left_node: leftmost,
                    right_node: rightmost,
                    left_node_branch_index: 2,
                    right_node_branch_index: 2,
                },
                edge_pair: EdgePair { lower_edge: Some(lower_edge), upper_edge: None },
            });
        }

        return None;
    }

    for region in RegionIterator::new(a_vertices, nodes, leftmost) {
        if let Some(edge_pair) = is_point_in_region(a_vertices, nodes, region, b_leftmost) {
            return Some(InitialRegion { region, edge_pair });
        }
    }

    None
}

/// Checks whether `point` lies inside `region` and returns the boundary
/// edges immediately below and above it if so.
fn is_point_in_region(
    vertices: &[Point2],
    nodes: &NodePool,
    region: Region,
    point: Point2,
) -> Option<EdgePair> {
    if !lex_greater_than(point, vertices[nodes[region.left_node].vertex])
        || !lex_less_than(point, vertices[nodes[region.right_node].vertex])
    {
        return None;
    }

    let lower_edge = match region.lower_boundary(nodes, VerticalDecompositionType::Exterior) {
        Some(lower_boundary) => {
            let edge = edge_for_point_with_monotone_edge_range(
                vertices,
                lower_boundary,
                point,
                HorizontalDirection::Left,
            );
            if !edge.on_exterior_side(vertices, point, Winding::Ccw) {
                return None;
            }
            Some(edge)
        }
        None => None,
    };

    let upper_edge = match region.upper_boundary(nodes, VerticalDecompositionType::Exterior) {
        Some(upper_boundary) => {
            let edge = edge_for_point_with_monotone_edge_range(
                vertices,
                upper_boundary,
                point,
                HorizontalDirection::Right,
            );
            if !edge.on_exterior_side(vertices, point, Winding::Ccw) {
                return None;
            }
            Some(edge)
        }
        None => None,
    };

    Some(EdgePair { lower_edge, upper_edge })
}

fn intersect_main_loop(state: &mut IntersectState<'_>) -> IntermediateResult {
    loop {
        let result = intersect_iteration(state);
        if !matches!(result, IntermediateResult::ContinueIterating) {
            return result;
        }
    }
}

/// Advances the traversal up to and past whichever next node comes first.
fn intersect_iteration(state: &mut IntersectState<'_>) -> IntermediateResult {
    let direction = state.direction;

    let a_next_point = state.a.vertices[state.a.nodes[state.a.next].vertex];
    let b_next_point = state.b.vertices[state.b.nodes[state.b.next].vertex];
    let next_is_a = lex_less_than_with_direction(direction, a_next_point, b_next_point);
    let next_node_point = if next_is_a { a_next_point } else { b_next_point };

    // Move both active points up to the next node, checking each boundary
    // vertex one of them passes against the other polygon's current edge.
    loop {
        let a_end_point = state.a.vertices[state.a.edge.end];
        let b_start_point = state.b.vertices[state.b.edge.start];

        if lex_less_than_with_direction(direction, a_end_point, b_start_point) {
            if !lex_less_than_with_direction(direction, a_end_point, next_node_point) {
                break;
            }

            if !state.b.edge.on_exterior_side(state.b.vertices, a_end_point, Winding::Ccw) {
                return IntermediateResult::Intersect;
            }

            state.a.edge.start = state.a.edge.end;
            state.a.edge.end = next_cyclic(state.a.vertices.len(), state.a.edge.end);
        } else {
            if !lex_less_than_with_direction(direction, b_start_point, next_node_point) {
                break;
            }

            if !state.a.edge.on_exterior_side(state.a.vertices, b_start_point, Winding::Ccw) {
                return IntermediateResult::Intersect;
            }

            state.b.edge.end = state.b.edge.start;
            state.b.edge.start = prev_cyclic(state.b.vertices.len(), state.b.edge.start);
        }
    }

    let p_is_lower = if next_is_a {
        direction == HorizontalDirection::Left
    } else {
        direction == HorizontalDirection::Right
    };
    let p = state.polygon(next_is_a);
    if p.nodes[p.next].direction == direction {
        intersect_iteration_advance_forward_node(state, next_is_a, p_is_lower)
    } else {
        intersect_iteration_advance_reverse_node(state, next_is_a, p_is_lower)
    }
}

/// Advances past `p.next` when its direction equals the traversal direction.
fn intersect_iteration_advance_forward_node(
    state: &mut IntersectState<'_>,
    p_is_a: bool,
    p_is_lower: bool,
) -> IntermediateResult {
    let direction = state.direction;
    let p_is_ccw = p_is_lower == (direction == HorizontalDirection::Left);

    let mut p = state.polygon(p_is_a);
    let q = state.polygon(!p_is_a);

    let p_next = p.next;
    let p_vertex = p.nodes[p_next].vertex;
    let p_vertex_point = p.vertices[p_vertex];

    if p.nodes[p_next].node_type == NodeType::Branch {
        let result = if q.edge.on_exterior_side(q.vertices, p_vertex_point, Winding::Ccw) {
            // Follow the branch on the outer side.
            p.edge = if p_is_ccw {
                Edge::outgoing_edge(p.vertices, p_vertex)
            } else {
                Edge::incoming_edge(p.vertices, p_vertex)
            };
            p.prev = p_next;
            p.next = p.nodes[p_next].neighbors[if p_is_lower { 2 } else { 1 }]
                .expect("exterior branch regions are bounded by nodes");
            IntermediateResult::ContinueIterating
        } else {
            p.prev = p_next;
            p.next = p.nodes[p_next].neighbors[if p_is_lower { 1 } else { 2 }]
                .expect("exterior branch regions are bounded by nodes");
            IntermediateResult::ContinueIterating
        };
        state.set_polygon(p_is_a, p);
        result
    } else {
        debug_assert_eq!(p.nodes[p_next].node_type, NodeType::Leaf);

        // The other polygon's boundary continues past a leaf of this one, so
        // it reaches into this polygon.
        IntermediateResult::Intersect
    }
}

/// Advances past `p.next` when its direction is opposite to the traversal
/// direction.
fn intersect_iteration_advance_reverse_node(
    state: &mut IntersectState<'_>,
    p_is_a: bool,
    p_is_lower: bool,
) -> IntermediateResult {
    let direction = state.direction;
    let p_is_ccw = p_is_lower == (direction == HorizontalDirection::Left);

    let mut p = state.polygon(p_is_a);
    let mut q = state.polygon(!p_is_a);

    let p_next = p.next;
    let p_vertex = p.nodes[p_next].vertex;

    if p.edge.start != p_vertex && p.edge.end != p_vertex {
        // The node belongs to a vertex on the opposite boundary of the
        // current region; just move past it.
        p.prev = p_next;
        p.next = p.nodes[p_next].neighbors[0].expect("reverse node has an incoming region");
        state.set_polygon(p_is_a, p);
        return IntermediateResult::ContinueIterating;
    }

    let p_vertex_point = p.vertices[p_vertex];

    if !q.edge.on_exterior_side(q.vertices, p_vertex_point, Winding::Ccw) {
        return IntermediateResult::Intersect;
    }

    // Decide whether to turn around into the branch above/below the current
    // one, by comparing the two opposite boundaries at this vertex.
    let q_opp_edge = opposite_edge_for_point(&q, p_vertex_point, direction, !p_is_lower);
    let p_opp_edge =
        if p_is_lower { p.nodes[p_next].lower_opp_edge } else { p.nodes[p_next].upper_opp_edge };

    let should_turn_around = match (p_opp_edge, q_opp_edge) {
        (Some(p_opp_edge), Some(q_opp_edge)) => {
            let y_on_p_opp_edge = y_on_edge_for_x(
                p_opp_edge.start_point(p.vertices),
                p_opp_edge.end_point(p.vertices),
                p_vertex_point.x(),
            );
            let y_on_q_opp_edge = y_on_edge_for_x(
                q_opp_edge.start_point(q.vertices),
                q_opp_edge.end_point(q.vertices),
                p_vertex_point.x(),
            );
            if p_is_lower {
                y_on_q_opp_edge > y_on_p_opp_edge
            } else {
                y_on_q_opp_edge < y_on_p_opp_edge
            }
        }
        (Some(_), None) => false,
        (None, Some(_)) => true,
        (None, None) => return IntermediateResult::Separated,
    };

    if should_turn_around {
        if let Some(q_opp_edge) = q_opp_edge {
            if !q_opp_edge.on_exterior_side(q.vertices, p_vertex_point, Winding::Ccw) {
                return IntermediateResult::Intersect;
            }
        }

        if !p_is_ccw && Some(p_next) == state.b_first_node {
            return IntermediateResult::BFirstNodeReached;
        }

        advance_past_vertex(&mut p, direction, p_is_lower);

        p.prev = p_next;
        p.next = p.nodes[p_next].neighbors[if p_is_lower { 1 } else { 2 }]
            .expect("exterior branch regions are bounded by nodes");

        q.edge = q_opp_edge.expect("turning around requires an opposite boundary");
        std::mem::swap(&mut q.next, &mut q.prev);

        state.direction = direction.opposite();
    } else {
        p.edge = p_opp_edge.expect("continuing requires an opposite boundary");
        p.prev = p_next;
        p.next = p.nodes[p_next].neighbors[0].expect("reverse node has an incoming region");
    }

    state.set_polygon(p_is_a, p);
    state.set_polygon(!p_is_a, q);
    IntermediateResult::ContinueIterating
}

/// Steps `p.edge` to the next edge of its boundary, in the winding direction
/// the polygon is currently traversed in.
fn advance_past_vertex(
    p: &mut PolygonIntersectState<'_>,
    direction: HorizontalDirection,
    is_lower: bool,
) {
    let is_ccw = is_lower == (direction == HorizontalDirection::Left);
    if is_ccw {
        p.edge.start = p.edge.end;
        p.edge.end = next_cyclic(p.vertices.len(), p.edge.end);
    } else {
        p.edge.end = p.edge.start;
        p.edge.start = prev_cyclic(p.vertices.len(), p.edge.start);
    }
}

/// Returns the edge on the opposite boundary of `p`'s current region whose
/// x-span contains `point`, or `None` if the region is unbounded there.
fn opposite_edge_for_point(
    p: &PolygonIntersectState<'_>,
    point: Point2,
    direction: HorizontalDirection,
    p_is_lower: bool,
) -> Option<Edge> {
    let (left_node, right_node) = match direction {
        HorizontalDirection::Right => (p.prev, p.next),
        HorizontalDirection::Left => (p.next, p.prev),
    };

    if p.nodes[left_node].node_type == NodeType::Branch
        && p.nodes[left_node].neighbors[1] == p.nodes[left_node].neighbors[2]
    {
        // A monotone polygon: the branch tests below can't tell the two
        // regions apart, but there's also no opposite boundary to find.
        return None;
    }

    let (range_start, range_end) = if p_is_lower {
        (
            if p.nodes[left_node].neighbors[1] == Some(right_node) {
                Some(p.nodes[left_node].vertex)
            } else {
                p.nodes[left_node].upper_opp_edge.map(|e| e.start)
            },
            if p.nodes[right_node].neighbors[1] == Some(left_node) {
                Some(p.nodes[right_node].vertex)
            } else {
                p.nodes[right_node].upper_opp_edge.map(|e| e.end)
            },
        )
    } else {
        (
            if p.nodes[right_node].neighbors[2] == Some(left_node) {
                Some(p.nodes[right_node].vertex)
            } else {
                p.nodes[right_node].lower_opp_edge.map(|e| e.start)
            },
            if p.nodes[left_node].neighbors[2] == Some(right_node) {
                Some(p.nodes[left_node].vertex)
            } else {
                p.nodes[left_node].lower_opp_edge.map(|e| e.end)
            },
        )
    };

    let range = EdgeRange { start: range_start?, end: range_end? };

    let range_direction =
        if p_is_lower { HorizontalDirection::Right } else { HorizontalDirection::Left };
    Some(edge_for_point_with_monotone_edge_range(p.vertices, range, point, range_direction))
}
