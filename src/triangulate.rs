//! Triangulation of a polygon through its interior vertical decomposition.
//!
//! Each cell of an interior decomposition is y-monotone, and the cells
//! between two branch nodes chain up into monotone channels. The walk visits
//! every boundary vertex in counter-clockwise order and triangulates each
//! channel with the standard linear-time front algorithm, so the whole
//! triangulation is linear in the number of vertices.

use crate::decomp::{NodeId, NodePool, NodeType};
use crate::point::{cross, lex_less_than, Point2};
use crate::scalar::ScalarDeg2;
use crate::util::{next_cyclic, prev_cyclic};
use crate::HorizontalDirection;

/// A triangle with counter-clockwise winding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triangle2 {
    vertices: [Point2; 3],
}

impl Triangle2 {
    /// Constructs a triangle from its three corners, which must be in
    /// counter-clockwise order.
    #[inline]
    pub fn new(v0: Point2, v1: Point2, v2: Point2) -> Triangle2 {
        debug_assert!(is_counter_clockwise(v0, v1, v2));
        Triangle2 { vertices: [v0, v1, v2] }
    }

    /// Returns the corners of this triangle.
    #[inline]
    pub fn vertices(&self) -> [Point2; 3] {
        self.vertices
    }
}

impl std::ops::Index<usize> for Triangle2 {
    type Output = Point2;
    #[inline]
    fn index(&self, index: usize) -> &Point2 {
        &self.vertices[index]
    }
}

/// Returns whether the corner sequence `v0, v1, v2` winds counter-clockwise.
#[inline]
fn is_counter_clockwise(v0: Point2, v1: Point2, v2: Point2) -> bool {
    cross(v1 - v0, v2 - v0) > ScalarDeg2::ZERO
}

struct TriangulateState<'a> {
    vertices: &'a [Point2],
    nodes: &'a NodePool,

    result: Vec<Triangle2>,

    /// The next vertex on the lower boundary of the current channel.
    lower_vertex: usize,

    /// The next vertex on the upper boundary of the current channel.
    upper_vertex: usize,

    prev_node: NodeId,
    next_node: NodeId,

    /// True iff the current front lies on the lower boundary.
    front_on_lower_boundary: bool,

    /// The concave front of the already triangulated part of the channel,
    /// leftmost vertex first. With the front on the lower boundary its edges
    /// face upwards, otherwise downwards.
    front_vertices: Vec<Point2>,
}

/// Triangulates the polygon formed by `vertices` using its interior vertical
/// decomposition, entered at the leaf `root_node`.
///
/// Returns exactly `vertices.len() - 2` counter-clockwise triangles whose
/// union is the polygon and whose interiors are pairwise disjoint.
pub fn triangulate(vertices: &[Point2], nodes: &NodePool, root_node: NodeId) -> Vec<Triangle2> {
    debug_assert_eq!(nodes[root_node].node_type, NodeType::Leaf);

    let mut state = TriangulateState {
        vertices,
        nodes,
        result: Vec::with_capacity(vertices.len() - 2),
        lower_vertex: 0,
        upper_vertex: 0,
        prev_node: root_node,
        next_node: root_node,
        front_on_lower_boundary: false,
        front_vertices: Vec::new(),
    };

    let mut node = root_node;
    let mut prev = nodes[root_node].neighbors[0].expect("a leaf has an incoming neighbor");

    // Visit the nodes in the order a point traversing the polygon boundary
    // counter-clockwise would encounter them (each non-leaf node twice).
    // Whenever the traversal is at the start of a new monotone channel, hand
    // the channel to the front algorithm.
    loop {
        if nodes[node].node_type == NodeType::Leaf {
            if nodes[node].direction == HorizontalDirection::Left {
                triangulate_monotone_channel_from_left_leaf(&mut state, node);
            }

            std::mem::swap(&mut node, &mut prev);
        } else {
            let next;
            if nodes[node].direction == HorizontalDirection::Right {
                if nodes[node].neighbors[0] == Some(prev) {
                    let lower_left_vertex = lower_opp_edge_start(state.nodes, node, state.vertices);
                    let upper_left_vertex = upper_opp_edge_end(state.nodes, node, state.vertices);
                    if lower_left_vertex.x() > upper_left_vertex.x()
                        && !lex_less_than(lower_left_vertex, vertices[nodes[prev].vertex])
                    {
                        triangulate_monotone_channel_from_lower_right_branch(&mut state, node);
                    }

                    next = nodes[node].neighbors[1].expect("branch regions are bounded");
                } else if nodes[node].neighbors[1] == Some(prev) {
                    next = nodes[node].neighbors[2].expect("branch regions are bounded");
                } else {
                    next = nodes[node].neighbors[0].expect("branch regions are bounded");

                    let lower_left_vertex = lower_opp_edge_start(state.nodes, node, state.vertices);
                    let upper_left_vertex = upper_opp_edge_end(state.nodes, node, state.vertices);
                    if upper_left_vertex.x() >= lower_left_vertex.x()
                        && !lex_less_than(upper_left_vertex, vertices[nodes[next].vertex])
                    {
                        triangulate_monotone_channel_from_upper_right_branch(&mut state, node);
                    }
                }
            } else {
                next = if nodes[node].neighbors[0] == Some(prev) {
                    nodes[node].neighbors[2]
                } else if nodes[node].neighbors[1] == Some(prev) {
                    nodes[node].neighbors[0]
                } else {
                    nodes[node].neighbors[1]
                }
                .expect("branch regions are bounded");
            }

            prev = node;
            node = next;
        }

        if node == root_node {
            break;
        }
    }

    debug_assert_eq!(state.result.len(), vertices.len() - 2);
    state.result
}

fn lower_opp_edge_start(nodes: &NodePool, node: NodeId, vertices: &[Point2]) -> Point2 {
    let edge = nodes[node].lower_opp_edge.expect("interior extensions have opposite edges");
    vertices[edge.start]
}

fn upper_opp_edge_end(nodes: &NodePool, node: NodeId, vertices: &[Point2]) -> Point2 {
    let edge = nodes[node].upper_opp_edge.expect("interior extensions have opposite edges");
    vertices[edge.end]
}

/// Triangulates the channel which starts at the given left leaf.
fn triangulate_monotone_channel_from_left_leaf(state: &mut TriangulateState<'_>, left_leaf: NodeId) {
    debug_assert_eq!(state.nodes[left_leaf].node_type, NodeType::Leaf);
    debug_assert_eq!(state.nodes[left_leaf].direction, HorizontalDirection::Left);

    let vertex = state.nodes[left_leaf].vertex;
    state.lower_vertex = next_cyclic(state.vertices.len(), vertex);
    state.upper_vertex = prev_cyclic(state.vertices.len(), vertex);
    state.prev_node = left_leaf;
    state.next_node = state.nodes[left_leaf].neighbors[0].expect("a leaf has an incoming neighbor");

    state.front_vertices.clear();
    state.front_vertices.push(state.vertices[vertex]);

    triangulate_monotone_channel(state);
}

/// Triangulates the secondary channel emerging from the lower branch of a
/// right branch node. It exists when the vertex right before the branch is
/// on the lower boundary.
fn triangulate_monotone_channel_from_lower_right_branch(
    state: &mut TriangulateState<'_>,
    node: NodeId,
) {
    let lower_opp_edge =
        state.nodes[node].lower_opp_edge.expect("interior extensions have opposite edges");

    state.lower_vertex = lower_opp_edge.end;
    state.upper_vertex = state.nodes[node].vertex;

    state.prev_node = node;
    state.next_node = state.nodes[node].neighbors[1].expect("branch regions are bounded");

    state.front_vertices.clear();
    state.front_vertices.push(state.vertices[lower_opp_edge.start]);
    state.front_on_lower_boundary = false;

    triangulate_monotone_channel(state);
}

/// Triangulates the secondary channel emerging from the upper branch of a
/// right branch node.
fn triangulate_monotone_channel_from_upper_right_branch(
    state: &mut TriangulateState<'_>,
    node: NodeId,
) {
    let upper_opp_edge =
        state.nodes[node].upper_opp_edge.expect("interior extensions have opposite edges");

    state.lower_vertex = state.nodes[node].vertex;
    state.upper_vertex = upper_opp_edge.start;

    state.prev_node = node;
    state.next_node = state.nodes[node].neighbors[2].expect("branch regions are bounded");

    state.front_vertices.clear();
    state.front_vertices.push(state.vertices[upper_opp_edge.end]);
    state.front_on_lower_boundary = true;

    triangulate_monotone_channel(state);
}

/// The main loop of the channel triangulation: steps through the channel's
/// vertices in x-order, feeding each to the front.
fn triangulate_monotone_channel(state: &mut TriangulateState<'_>) {
    loop {
        let lower_point = state.vertices[state.lower_vertex];
        let upper_point = state.vertices[state.upper_vertex];
        let next_node_vertex = state.nodes[state.next_node].vertex;
        let next_node_point = state.vertices[next_node_vertex];

        if lower_point.x() <= upper_point.x() && lower_point.x() <= next_node_point.x() {
            if state.lower_vertex == next_node_vertex {
                if state.nodes[state.next_node].node_type == NodeType::Leaf {
                    debug_assert_eq!(
                        state.nodes[state.next_node].direction,
                        HorizontalDirection::Right
                    );
                    triangulate_handle_last_vertex(state, next_node_point);
                    return;
                } else {
                    debug_assert_eq!(
                        state.nodes[state.next_node].direction,
                        HorizontalDirection::Left
                    );
                    if !triangulate_handle_left_branch(state) {
                        return;
                    }
                }
            } else {
                triangulate_handle_lower_vertex(state, lower_point);
                state.lower_vertex = next_cyclic(state.vertices.len(), state.lower_vertex);
            }
        } else if lex_less_than(upper_point, next_node_point) {
            triangulate_handle_upper_vertex(state, upper_point);
            state.upper_vertex = prev_cyclic(state.vertices.len(), state.upper_vertex);
        } else {
            debug_assert!(state.nodes[state.next_node].node_type != NodeType::Leaf);

            if state.nodes[state.next_node].direction == HorizontalDirection::Left {
                if !triangulate_handle_left_branch(state) {
                    return;
                }
            } else {
                triangulate_handle_right_branch(state);
            }
        }
    }
}

/// Handles a left branch in the channel; returns false when the channel ends
/// here.
fn triangulate_handle_left_branch(state: &mut TriangulateState<'_>) -> bool {
    let branch = state.next_node;
    let branch_point = state.vertices[state.nodes[branch].vertex];

    let incoming_branch_index;
    if state.nodes[branch].neighbors[1] == Some(state.prev_node) {
        triangulate_handle_upper_vertex(state, branch_point);
        state.upper_vertex = state.nodes[branch]
            .upper_opp_edge
            .expect("interior extensions have opposite edges")
            .start;
        incoming_branch_index = 1;
    } else {
        debug_assert_eq!(state.nodes[branch].neighbors[2], Some(state.prev_node));

        triangulate_handle_lower_vertex(state, branch_point);
        state.lower_vertex = state.nodes[branch]
            .lower_opp_edge
            .expect("interior extensions have opposite edges")
            .end;
        incoming_branch_index = 2;
    }

    state.prev_node = branch;
    state.next_node = state.nodes[branch].neighbors[0].expect("branch regions are bounded");

    let next = state.next_node;
    let next_point = state.vertices[state.nodes[next].vertex];
    let lower_point = state.vertices[state.lower_vertex];
    let upper_point = state.vertices[state.upper_vertex];

    if next_point.x() < lower_point.x()
        && next_point.x() <= upper_point.x()
        && state.nodes[next].node_type == NodeType::Branch
        && state.nodes[next].direction == HorizontalDirection::Right
    {
        // There's an edge between the vertices of the two facing branch
        // nodes, so the channel continues into the same branch of the next
        // node as the one we came from.
        if incoming_branch_index == 1 {
            state.upper_vertex = state.nodes[next].vertex;
        } else {
            state.lower_vertex = state.nodes[next].vertex;
        }

        state.prev_node = next;
        state.next_node = state.nodes[next].neighbors[incoming_branch_index]
            .expect("branch regions are bounded");
    } else if lower_point.x() <= upper_point.x() {
        if incoming_branch_index == 1 {
            triangulate_handle_last_vertex(state, lower_point);
            return false;
        }
    } else {
        if incoming_branch_index == 2 {
            triangulate_handle_last_vertex(state, upper_point);
            return false;
        }
    }

    true
}

/// Handles a right branch in the channel: the channel continues into the
/// branch on the same side as the front.
fn triangulate_handle_right_branch(state: &mut TriangulateState<'_>) {
    let branch = state.next_node;

    if state.front_on_lower_boundary {
        state.lower_vertex = state.nodes[branch].vertex;

        state.prev_node = branch;
        state.next_node = state.nodes[branch].neighbors[2].expect("branch regions are bounded");
    } else {
        state.upper_vertex = state.nodes[branch].vertex;

        state.prev_node = branch;
        state.next_node = state.nodes[branch].neighbors[1].expect("branch regions are bounded");
    }
}

fn triangulate_handle_lower_vertex(state: &mut TriangulateState<'_>, vertex: Point2) {
    if state.front_on_lower_boundary {
        while state.front_vertices.len() >= 2 {
            let a = state.front_vertices[state.front_vertices.len() - 2];
            let b = state.front_vertices[state.front_vertices.len() - 1];
            if !is_counter_clockwise(a, b, vertex) {
                break;
            }

            state.result.push(Triangle2::new(a, b, vertex));
            state.front_vertices.pop();
        }

        state.front_vertices.push(vertex);
    } else {
        for i in 1..state.front_vertices.len() {
            state.result.push(Triangle2::new(
                state.front_vertices[i],
                state.front_vertices[i - 1],
                vertex,
            ));
        }

        let last = *state.front_vertices.last().expect("the front is never empty");
        state.front_vertices.clear();
        state.front_vertices.push(last);
        state.front_vertices.push(vertex);

        state.front_on_lower_boundary = true;
    }
}

fn triangulate_handle_upper_vertex(state: &mut TriangulateState<'_>, vertex: Point2) {
    if !state.front_on_lower_boundary {
        while state.front_vertices.len() >= 2 {
            let a = state.front_vertices[state.front_vertices.len() - 1];
            let b = state.front_vertices[state.front_vertices.len() - 2];
            if !is_counter_clockwise(a, b, vertex) {
                break;
            }

            state.result.push(Triangle2::new(a, b, vertex));
            state.front_vertices.pop();
        }

        state.front_vertices.push(vertex);
    } else {
        for i in 1..state.front_vertices.len() {
            state.result.push(Triangle2::new(
                state.front_vertices[i - 1],
                state.front_vertices[i],
                vertex,
            ));
        }

        let last = *state.front_vertices.last().expect("the front is never empty");
        state.front_vertices.clear();
        state.front_vertices.push(last);
        state.front_vertices.push(vertex);

        state.front_on_lower_boundary = false;
    }
}

/// Fans out the remaining front triangles at the channel's closing vertex.
fn triangulate_handle_last_vertex(state: &mut TriangulateState<'_>, vertex: Point2) {
    if state.front_on_lower_boundary {
        for i in 1..state.front_vertices.len() {
            state.result.push(Triangle2::new(
                state.front_vertices[i - 1],
                state.front_vertices[i],
                vertex,
            ));
        }
    } else {
        for i in 1..state.front_vertices.len() {
            state.result.push(Triangle2::new(
                state.front_vertices[i],
                state.front_vertices[i - 1],
                vertex,
            ));
        }
    }
}
