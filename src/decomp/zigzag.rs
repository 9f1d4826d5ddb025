//! The zigzag phase: a single pass over the polygon boundary which cuts it
//! into chain decompositions at convex side vertices.
//!
//! The traversal alternates between forward legs (monotone in the current
//! direction) and reverse legs (entered after a convex side vertex flips the
//! direction). Reverse legs resolve the dangling opposite edges of the nodes
//! they pass. A convex side vertex reached while reversing can't be handled
//! within the current chain, so it ends the chain and starts the next one;
//! the merge phase later joins the chains back together.

use crate::point::{lex_less_than, lex_less_than_with_direction, Point2};
use crate::util::next_cyclic;
use crate::{HorizontalDirection, Winding};

use super::{
    edge_for_point_with_monotone_edge_range, ChainDecomposition, Edge, EdgeRange, Node, NodeId,
    NodePool, NodeType,
};

/// The chain decompositions produced by [`exterior_zigzag_phase`].
#[derive(Clone, Debug)]
pub struct ExteriorChainDecompositions {
    /// The node at the lexicographically least vertex. Its vertical extension
    /// reaches infinity both upwards and downwards.
    pub leftmost_node: NodeId,

    /// The node at the lexicographically greatest vertex.
    pub rightmost_node: NodeId,

    /// The chains covering the polygon's lower hull, ordered from the
    /// starting extreme vertex of the traversal.
    pub lower_chain_decompositions: Vec<ChainDecomposition>,

    /// The chains covering the polygon's upper hull.
    pub upper_chain_decompositions: Vec<ChainDecomposition>,
}

struct ZigzagState<'a> {
    vertices: &'a [Point2],
    winding: Winding,

    /// The current traversal direction.
    direction: HorizontalDirection,

    /// Whether the current leg is a forward leg.
    forward: bool,

    /// The vertex where the traversal terminates. For a polygon this is the
    /// first vertex of the first chain, for an exterior side traversal the
    /// vertex of `last_node`.
    last_vertex: usize,

    /// The edge containing the active point.
    current_edge: Edge,

    /// The node whose vertical extension bounds the active region on the
    /// side the traversal came from.
    prev_node: NodeId,

    /// The node bounding the active region in the traversal direction, if
    /// any.
    next_node: Option<NodeId>,

    /// The terminating node of an exterior side traversal.
    last_node: Option<NodeId>,

    /// The output; the last entry is the chain under construction.
    chain_decompositions: Vec<ChainDecomposition>,
}

#[inline]
fn is_convex_corner(winding: Winding, a: Point2, b: Point2, c: Point2) -> bool {
    let side = crate::point::cross(b - a, c - a);
    match winding {
        Winding::Ccw => side > crate::scalar::ScalarDeg2::ZERO,
        Winding::Cw => side < crate::scalar::ScalarDeg2::ZERO,
    }
}

/// Whether the boundary on the incoming side of the active point is the
/// lower boundary of the active region.
#[inline]
fn incoming_is_lower(winding: Winding, direction: HorizontalDirection) -> bool {
    (winding == Winding::Ccw) == (direction == HorizontalDirection::Right)
}

/// Decomposes the boundary of the polygon formed by `vertices` into chain
/// decompositions. Merging them (see
/// [`merge_chain_decompositions`](super::merge_chain_decompositions))
/// produces the polygon's interior decomposition.
pub fn interior_zigzag_phase(
    vertices: &[Point2],
    winding: Winding,
    node_pool: &mut NodePool,
) -> Vec<ChainDecomposition> {
    let mut state = interior_zigzag_init(vertices, winding, node_pool);
    zigzag_iterate(&mut state, node_pool);
    state.chain_decompositions
}

/// Runs the zigzag phase over both sides of the polygon's exterior.
///
/// `winding` is the winding of the exterior region, so the opposite of the
/// polygon's own winding. The extensions of the two extreme nodes reach out
/// to infinity, which their `None` opposite edges encode.
pub fn exterior_zigzag_phase(
    vertices: &[Point2],
    winding: Winding,
    node_pool: &mut NodePool,
) -> ExteriorChainDecompositions {
    let mut leftmost_vertex = 0;
    let mut rightmost_vertex = 0;
    for i in 1..vertices.len() {
        if lex_less_than(vertices[i], vertices[leftmost_vertex]) {
            leftmost_vertex = i;
        }
        if lex_less_than(vertices[rightmost_vertex], vertices[i]) {
            rightmost_vertex = i;
        }
    }

    let leftmost_node = node_pool.alloc(Node {
        direction: HorizontalDirection::Right,
        node_type: NodeType::Branch,
        vertex: leftmost_vertex,
        lower_opp_edge: None,
        upper_opp_edge: None,
        neighbors: [None; 3],
    });
    let rightmost_node = node_pool.alloc(Node {
        direction: HorizontalDirection::Left,
        node_type: NodeType::Branch,
        vertex: rightmost_vertex,
        lower_opp_edge: None,
        upper_opp_edge: None,
        neighbors: [None; 3],
    });

    let mut state = exterior_zigzag_init(vertices, winding, leftmost_node, rightmost_node, node_pool);
    zigzag_iterate(&mut state, node_pool);
    let first_side_chains = state.chain_decompositions;

    let mut state = exterior_zigzag_init(vertices, winding, rightmost_node, leftmost_node, node_pool);
    zigzag_iterate(&mut state, node_pool);
    let second_side_chains = state.chain_decompositions;

    // With a counter-clockwise exterior (so a clockwise polygon), the
    // traversal from the leftmost vertex follows the upper hull.
    let (lower_chain_decompositions, upper_chain_decompositions) = match winding {
        Winding::Ccw => (second_side_chains, first_side_chains),
        Winding::Cw => (first_side_chains, second_side_chains),
    };

    ExteriorChainDecompositions {
        leftmost_node,
        rightmost_node,
        lower_chain_decompositions,
        upper_chain_decompositions,
    }
}

/// Finds a convex side vertex to start the first chain with, and returns the
/// state with that vertex as its active point.
fn interior_zigzag_init<'a>(
    vertices: &'a [Point2],
    winding: Winding,
    node_pool: &mut NodePool,
) -> ZigzagState<'a> {
    let num_vertices = vertices.len();
    for i in 0..num_vertices {
        let prev = vertices[crate::util::prev_cyclic(num_vertices, i)];
        let cur = vertices[i];
        let next = vertices[next_cyclic(num_vertices, i)];

        let incoming_towards_right = lex_less_than(prev, cur);
        let outgoing_towards_right = lex_less_than(cur, next);
        if incoming_towards_right != outgoing_towards_right
            && is_convex_corner(winding, prev, cur, next)
        {
            let direction = if outgoing_towards_right {
                HorizontalDirection::Right
            } else {
                HorizontalDirection::Left
            };

            let node = node_pool.alloc(Node {
                direction,
                node_type: NodeType::Branch,
                vertex: i,
                lower_opp_edge: None,
                upper_opp_edge: None,
                neighbors: [None; 3],
            });

            return ZigzagState {
                vertices,
                winding,
                direction,
                forward: true,
                last_vertex: i,
                current_edge: Edge::outgoing_edge(vertices, i),
                prev_node: node,
                next_node: None,
                last_node: None,
                chain_decompositions: vec![ChainDecomposition { first_node: node, last_node: None }],
            };
        }
    }

    unreachable!("a valid polygon has a convex side vertex");
}

fn exterior_zigzag_init<'a>(
    vertices: &'a [Point2],
    winding: Winding,
    first_node: NodeId,
    last_node: NodeId,
    node_pool: &mut NodePool,
) -> ZigzagState<'a> {
    ZigzagState {
        vertices,
        winding,
        direction: node_pool[first_node].direction,
        forward: true,
        last_vertex: node_pool[last_node].vertex,
        current_edge: Edge::outgoing_edge(vertices, node_pool[first_node].vertex),
        prev_node: first_node,
        next_node: None,
        last_node: Some(last_node),
        chain_decompositions: vec![ChainDecomposition { first_node, last_node: None }],
    }
}

fn zigzag_iterate(state: &mut ZigzagState<'_>, node_pool: &mut NodePool) {
    loop {
        let keep_going = if state.forward {
            zigzag_forward(state, node_pool)
        } else {
            zigzag_reverse(state, node_pool)
        };
        if !keep_going {
            break;
        }
    }
}

/// Performs forward iterations until the next side vertex.
fn zigzag_forward(state: &mut ZigzagState<'_>, node_pool: &mut NodePool) -> bool {
    loop {
        let prev_vertex = state.current_edge.start;
        state.current_edge.start = state.current_edge.end;
        state.current_edge.end = next_cyclic(state.vertices.len(), state.current_edge.end);

        if lex_less_than_with_direction(
            state.direction,
            state.vertices[state.current_edge.end],
            state.vertices[state.current_edge.start],
        ) {
            let corner_is_convex = is_convex_corner(
                state.winding,
                state.vertices[prev_vertex],
                state.vertices[state.current_edge.start],
                state.vertices[state.current_edge.end],
            );
            return if corner_is_convex {
                zigzag_forward_convex_corner(state, node_pool, prev_vertex)
            } else {
                zigzag_concave_corner(state, node_pool)
            };
        }
    }
}

/// Performs reverse iterations until the next side vertex. Whenever
/// `next_node` comes before the active point, its dangling opposite edge is
/// resolved to the current edge and the region steps one node inward.
fn zigzag_reverse(state: &mut ZigzagState<'_>, node_pool: &mut NodePool) -> bool {
    loop {
        let passes_next_node = match state.next_node {
            Some(next) => lex_less_than_with_direction(
                state.direction,
                state.vertices[node_pool[next].vertex],
                state.vertices[state.current_edge.end],
            ),
            None => false,
        };

        if passes_next_node {
            let next = state.next_node.expect("checked above");
            if incoming_is_lower(state.winding, state.direction) {
                node_pool[next].lower_opp_edge = Some(state.current_edge);
            } else {
                node_pool[next].upper_opp_edge = Some(state.current_edge);
            }

            state.prev_node = next;
            state.next_node = node_pool[next].neighbors[0];
        } else {
            let prev_vertex = state.current_edge.start;
            state.current_edge.start = state.current_edge.end;
            state.current_edge.end = next_cyclic(state.vertices.len(), state.current_edge.end);

            if lex_less_than_with_direction(
                state.direction,
                state.vertices[state.current_edge.end],
                state.vertices[state.current_edge.start],
            ) {
                let corner_is_convex = is_convex_corner(
                    state.winding,
                    state.vertices[prev_vertex],
                    state.vertices[state.current_edge.start],
                    state.vertices[state.current_edge.end],
                );
                return if corner_is_convex {
                    zigzag_reverse_convex_corner(state, node_pool)
                } else {
                    zigzag_concave_corner(state, node_pool)
                };
            }
        }
    }
}

/// A convex side vertex reached on a forward leg: emit a leaf and start
/// reversing. If the vertex is the termination vertex, the current chain
/// ends with a closing branch node instead.
fn zigzag_forward_convex_corner(
    state: &mut ZigzagState<'_>,
    node_pool: &mut NodePool,
    prev_vertex: usize,
) -> bool {
    let inc_lower = incoming_is_lower(state.winding, state.direction);

    if state.current_edge.start == state.last_vertex {
        // We've come around to the first vertex, so the current chain ends
        // here. The current chain can't be the outgoing chain of this vertex
        // itself, since for that we'd have to be reversing.
        debug_assert!(state.chain_decompositions.len() > 1);
        debug_assert!(state.last_node.is_none());

        let node = node_pool.alloc(Node {
            direction: state.direction.opposite(),
            node_type: NodeType::Branch,
            vertex: state.current_edge.start,
            lower_opp_edge: None,
            upper_opp_edge: None,
            neighbors: [None; 3],
        });

        let branch = if inc_lower { 2 } else { 1 };
        node_pool[node].neighbors[branch] = Some(state.prev_node);
        node_pool[state.prev_node].neighbors[branch] = Some(node);

        let chain_index = state.chain_decompositions.len() - 1;
        state.chain_decompositions[chain_index].last_node = Some(node);
        return false;
    }

    let incoming_edge = Edge { start: prev_vertex, end: state.current_edge.start };
    let outgoing_edge = state.current_edge;
    let (lower_opp_edge, upper_opp_edge) = if inc_lower {
        (Some(incoming_edge), Some(outgoing_edge))
    } else {
        (Some(outgoing_edge), Some(incoming_edge))
    };

    let node = node_pool.alloc(Node {
        direction: state.direction,
        node_type: NodeType::Leaf,
        vertex: state.current_edge.start,
        lower_opp_edge,
        upper_opp_edge,
        neighbors: [Some(state.prev_node), None, None],
    });
    node_pool[state.prev_node].neighbors[if inc_lower { 2 } else { 1 }] = Some(node);

    state.next_node = Some(state.prev_node);
    state.prev_node = node;
    state.direction = state.direction.opposite();
    state.forward = false;

    true
}

/// A convex side vertex reached on a reverse leg: the zigzag can't handle
/// this within the current chain, so the chain ends and a new one starts.
fn zigzag_reverse_convex_corner(state: &mut ZigzagState<'_>, node_pool: &mut NodePool) -> bool {
    let inc_lower = incoming_is_lower(state.winding, state.direction);

    if state.current_edge.start == state.last_vertex && state.chain_decompositions.len() == 1 {
        // We've reached the first vertex while still in the first chain, so
        // the chain is the whole polygon boundary. Turn the first node into
        // the leaf node of this vertex.
        debug_assert!(state.next_node == Some(state.chain_decompositions[0].first_node));
        debug_assert!(state.last_node.is_none());

        let first_node = state.chain_decompositions[0].first_node;
        let vertex = node_pool[first_node].vertex;
        let incoming_edge = Edge::incoming_edge(state.vertices, vertex);
        let outgoing_edge = Edge::outgoing_edge(state.vertices, vertex);

        let first = &mut node_pool[first_node];
        first.direction = state.direction;
        first.node_type = NodeType::Leaf;
        if inc_lower {
            first.lower_opp_edge = Some(incoming_edge);
            first.upper_opp_edge = Some(outgoing_edge);
        } else {
            first.lower_opp_edge = Some(outgoing_edge);
            first.upper_opp_edge = Some(incoming_edge);
        }
        first.neighbors[0] = Some(state.prev_node);
        return false;
    }

    let corner_vertex = state.current_edge.start;
    let corner_point = state.vertices[corner_vertex];

    let resolved_opp_edge = match state.next_node {
        Some(next) => {
            let prev_opp_edge = if inc_lower {
                node_pool[state.prev_node].upper_opp_edge
            } else {
                node_pool[state.prev_node].lower_opp_edge
            };
            let range = EdgeRange {
                start: node_pool[next].vertex,
                end: prev_opp_edge.expect("reverse leg has a resolved opposite edge").end,
            };
            Some(edge_for_point_with_monotone_edge_range(
                state.vertices,
                range,
                corner_point,
                state.direction.opposite(),
            ))
        }
        None => None,
    };

    let old_chain_last_node = node_pool.alloc(Node {
        direction: state.direction.opposite(),
        node_type: NodeType::Branch,
        vertex: corner_vertex,
        lower_opp_edge: if inc_lower { None } else { resolved_opp_edge },
        upper_opp_edge: if inc_lower { resolved_opp_edge } else { None },
        neighbors: if inc_lower {
            [state.next_node, None, Some(state.prev_node)]
        } else {
            [state.next_node, Some(state.prev_node), None]
        },
    });

    node_pool[state.prev_node].neighbors[0] = Some(old_chain_last_node);
    if let Some(next) = state.next_node {
        node_pool[next].neighbors[if inc_lower { 1 } else { 2 }] = Some(old_chain_last_node);
    }

    let chain_index = state.chain_decompositions.len() - 1;
    state.chain_decompositions[chain_index].last_node = Some(old_chain_last_node);

    if state.current_edge.start == state.last_vertex {
        debug_assert!(state.last_node.is_none());
        return false;
    }

    let new_chain_first_node = node_pool.alloc(Node {
        direction: state.direction.opposite(),
        node_type: NodeType::Branch,
        vertex: corner_vertex,
        lower_opp_edge: None,
        upper_opp_edge: None,
        neighbors: [None; 3],
    });
    state
        .chain_decompositions
        .push(ChainDecomposition { first_node: new_chain_first_node, last_node: None });

    state.direction = state.direction.opposite();
    state.forward = true;
    state.prev_node = new_chain_first_node;
    state.next_node = None;

    true
}

/// A concave side vertex, reached on either kind of leg: emit a branch node
/// whose opposite edge on the far side stays unresolved, and start a forward
/// leg in the opposite direction.
fn zigzag_concave_corner(state: &mut ZigzagState<'_>, node_pool: &mut NodePool) -> bool {
    let inc_lower = incoming_is_lower(state.winding, state.direction);

    if state.current_edge.start == state.last_vertex {
        // An exterior side traversal ends in the terminating extreme node.
        let last_node = state.last_node.expect("only exterior traversals end at a concave corner");

        node_pool[last_node].neighbors[if inc_lower { 2 } else { 1 }] = Some(state.prev_node);
        let prev_branch = if state.forward {
            if inc_lower {
                2
            } else {
                1
            }
        } else {
            0
        };
        node_pool[state.prev_node].neighbors[prev_branch] = Some(last_node);

        let chain_index = state.chain_decompositions.len() - 1;
        state.chain_decompositions[chain_index].last_node = Some(last_node);
        return false;
    }

    let corner_vertex = state.current_edge.start;
    let corner_point = state.vertices[corner_vertex];

    let resolved_opp_edge = match state.next_node {
        Some(next) => {
            let prev_opp_edge = if inc_lower {
                node_pool[state.prev_node].upper_opp_edge
            } else {
                node_pool[state.prev_node].lower_opp_edge
            };
            let range = EdgeRange {
                start: node_pool[next].vertex,
                end: prev_opp_edge.expect("reverse side has a resolved opposite edge").end,
            };
            Some(edge_for_point_with_monotone_edge_range(
                state.vertices,
                range,
                corner_point,
                state.direction.opposite(),
            ))
        }
        None => None,
    };

    let node = node_pool.alloc(Node {
        direction: state.direction.opposite(),
        node_type: NodeType::Branch,
        vertex: corner_vertex,
        lower_opp_edge: if inc_lower { None } else { resolved_opp_edge },
        upper_opp_edge: if inc_lower { resolved_opp_edge } else { None },
        neighbors: if inc_lower {
            [state.next_node, None, Some(state.prev_node)]
        } else {
            [state.next_node, Some(state.prev_node), None]
        },
    });

    let prev_branch = if state.forward {
        if inc_lower {
            2
        } else {
            1
        }
    } else {
        0
    };
    node_pool[state.prev_node].neighbors[prev_branch] = Some(node);
    if let Some(next) = state.next_node {
        node_pool[next].neighbors[if inc_lower { 1 } else { 2 }] = Some(node);
    }

    state.prev_node = node;
    state.next_node = None;
    state.direction = state.direction.opposite();
    state.forward = true;

    true
}
