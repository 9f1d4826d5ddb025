//! The merge phase: joins two chain decompositions which share a vertex into
//! the decomposition of the combined chain.
//!
//! Two active points move outward from the shared vertex, one over each
//! chain's boundary, both facing the same merge direction. Vertical
//! extensions that used to end on the other side of a chain's own boundary
//! are re-targeted at the opposite chain's boundary as the active points
//! pass them; extensions that don't survive are queued on the "opposite"
//! side until a turn-around or the chain tail reattaches them.

use crate::point::{lex_less_than_with_direction, Point2};
use crate::util::{next_cyclic, prev_cyclic};
use crate::{HorizontalDirection, Winding};

use super::{y_on_edge_for_x, ChainDecomposition, Edge, Node, NodeId, NodePool, NodeType};

/// The part of the merge state belonging to one input chain.
#[derive(Copy, Clone)]
struct ChainMergeState {
    /// The next node of this chain to merge: the first node the active point
    /// will encounter, or `None` if the chain is exhausted.
    next: Option<NodeId>,

    /// The previously encountered node; determines which branch of `next` is
    /// the incoming one.
    prev: NodeId,

    /// The last node which stayed attached to this chain's severed opposite
    /// side, waiting to be reconnected.
    opp_last: Option<NodeId>,

    /// The branch of `opp_last` whose neighbor is still to be determined.
    opp_last_branch_index: u8,

    /// When up to date, the edge containing the main active point. May lag
    /// behind; `advance_edge` brings it up to date.
    edge: Option<Edge>,

    /// When up to date, the edge containing the opposite active point, or
    /// `None` if there's no opposite boundary. Advancing never changes
    /// whether this is `None`.
    opp_edge: Option<Edge>,
}

struct MergeState {
    winding: Winding,

    /// The current merge direction.
    direction: HorizontalDirection,

    a: ChainMergeState,
    b: ChainMergeState,

    /// The most recently merged node: the last node whose vertical extension
    /// got reconnected across the two chains.
    last_merged: NodeId,

    /// The branch of `last_merged` whose neighbor is still to be determined.
    last_merged_branch_index: u8,
}

impl MergeState {
    #[inline]
    fn chain(&self, is_a: bool) -> ChainMergeState {
        if is_a {
            self.a
        } else {
            self.b
        }
    }

    #[inline]
    fn set_chain(&mut self, is_a: bool, chain: ChainMergeState) {
        if is_a {
            self.a = chain;
        } else {
            self.b = chain;
        }
    }
}

/// Whether chain `a` is the lower chain for the given winding and merge
/// direction.
#[inline]
fn a_is_lower(winding: Winding, direction: HorizontalDirection) -> bool {
    (winding == Winding::Ccw) == (direction == HorizontalDirection::Left)
}

/// Whether the active point of the chain on the given side moves forward in
/// polygon vertex order when it moves in `direction`.
#[inline]
fn advances_with_vertex_order(
    winding: Winding,
    direction: HorizontalDirection,
    chain_is_lower: bool,
) -> bool {
    (chain_is_lower == (direction == HorizontalDirection::Right)) == (winding == Winding::Ccw)
}

/// Merges two chain decompositions.
///
/// The last vertex of `a` must equal the first vertex of `b`, and that vertex
/// must be a convex side vertex of the combined chain, so it becomes a leaf.
/// `winding` is the winding the chains were built with.
pub fn merge_chain_decompositions(
    vertices: &[Point2],
    winding: Winding,
    node_pool: &mut NodePool,
    a: &ChainDecomposition,
    b: &ChainDecomposition,
) -> ChainDecomposition {
    let a_last = a.last_node.expect("chain decompositions to merge have a last node");
    debug_assert_eq!(node_pool[a_last].vertex, node_pool[b.first_node].vertex);

    let mut merge_state = init_merge(vertices, winding, node_pool, a_last, b.first_node);

    while merge_iteration(vertices, node_pool, &mut merge_state) {}

    ChainDecomposition { first_node: a.first_node, last_node: b.last_node }
}

/// Creates the leaf at the shared vertex (and an outer branch for its outer
/// side if necessary) and sets up the initial merge state.
fn init_merge(
    vertices: &[Point2],
    winding: Winding,
    node_pool: &mut NodePool,
    a_node: NodeId,
    b_node: NodeId,
) -> MergeState {
    let vertex = node_pool[a_node].vertex;
    let prev_vertex = prev_cyclic(vertices.len(), vertex);
    let next_vertex = next_cyclic(vertices.len(), vertex);

    let direction = node_pool[a_node].direction;
    debug_assert_eq!(node_pool[b_node].direction, direction);

    let a_lower = a_is_lower(winding, direction);
    let b_lower = !a_lower;

    let mut a = ChainMergeState {
        prev: a_node,
        next: node_pool[a_node].neighbors[if a_lower { 2 } else { 1 }],
        opp_last: None,
        opp_last_branch_index: 0,
        edge: Some(Edge { start: prev_vertex, end: vertex }),
        opp_edge: if a_lower {
            node_pool[a_node].upper_opp_edge
        } else {
            node_pool[a_node].lower_opp_edge
        },
    };

    let mut b = ChainMergeState {
        prev: b_node,
        next: node_pool[b_node].neighbors[if b_lower { 2 } else { 1 }],
        opp_last: None,
        opp_last_branch_index: 0,
        edge: Some(Edge { start: vertex, end: next_vertex }),
        opp_edge: if b_lower {
            node_pool[b_node].upper_opp_edge
        } else {
            node_pool[b_node].lower_opp_edge
        },
    };

    // If both nodes had an incoming side, the two chains would intersect.
    debug_assert!(
        node_pool[a_node].neighbors[0].is_none() || node_pool[b_node].neighbors[0].is_none()
    );

    let leaf_node;
    if node_pool[a_node].neighbors[0].is_some() {
        if node_pool[a_node].lower_opp_edge.is_some() && node_pool[a_node].upper_opp_edge.is_some()
        {
            node_pool[a_node].node_type = NodeType::OuterBranch;
            a.opp_last = Some(a_node);
            a.opp_last_branch_index = if a_lower { 2 } else { 1 };
        } else {
            let incoming = node_pool[a_node].neighbors[0].expect("checked above");
            a.opp_last = Some(incoming);
            a.opp_last_branch_index = node_pool[incoming].neighbor_branch_index(a_node);
        }

        leaf_node = b_node;
    } else if node_pool[b_node].neighbors[0].is_some() {
        if node_pool[b_node].lower_opp_edge.is_some() && node_pool[b_node].upper_opp_edge.is_some()
        {
            node_pool[b_node].node_type = NodeType::OuterBranch;
            b.opp_last = Some(b_node);
            b.opp_last_branch_index = if b_lower { 2 } else { 1 };
        } else {
            let incoming = node_pool[b_node].neighbors[0].expect("checked above");
            b.opp_last = Some(incoming);
            b.opp_last_branch_index = node_pool[incoming].neighbor_branch_index(b_node);
        }

        leaf_node = a_node;
    } else {
        leaf_node = a_node;
    }

    let leaf = &mut node_pool[leaf_node];
    leaf.direction = direction.opposite();
    leaf.node_type = NodeType::Leaf;
    leaf.lower_opp_edge = if a_lower { a.edge } else { b.edge };
    leaf.upper_opp_edge = if a_lower { b.edge } else { a.edge };

    MergeState { winding, direction, a, b, last_merged: leaf_node, last_merged_branch_index: 0 }
}

/// Performs one merge step; returns false when the merge has finished.
fn merge_iteration(
    vertices: &[Point2],
    node_pool: &mut NodePool,
    merge_state: &mut MergeState,
) -> bool {
    let direction = merge_state.direction;
    let a_lower = a_is_lower(merge_state.winding, direction);

    if merge_state.b.next.is_none() {
        merge_tail(vertices, node_pool, merge_state, true, a_lower);
        return false;
    }

    let Some(a_next) = merge_state.a.next else {
        merge_tail(vertices, node_pool, merge_state, false, !a_lower);
        return false;
    };
    let b_next = merge_state.b.next.expect("checked above");

    if node_pool[a_next].vertex == node_pool[b_next].vertex {
        // Both chains have reached the global closing vertex.
        merge_closing_vertex(vertices, node_pool, merge_state, a_lower);
        return false;
    }

    let a_comes_first = lex_less_than_with_direction(
        direction,
        vertices[node_pool[a_next].vertex],
        vertices[node_pool[b_next].vertex],
    );
    let (p_is_a, p_next, p_lower) =
        if a_comes_first { (true, a_next, a_lower) } else { (false, b_next, !a_lower) };

    if node_pool[p_next].direction == direction {
        merge_iteration_forward_branch(vertices, node_pool, merge_state, p_is_a, p_lower);
    } else if node_pool[p_next].node_type == NodeType::Branch {
        merge_iteration_reverse_branch(vertices, node_pool, merge_state, p_is_a, p_lower);
    } else {
        debug_assert_eq!(node_pool[p_next].node_type, NodeType::OuterBranch);
        merge_iteration_reverse_outer_branch(node_pool, merge_state, p_is_a, p_lower);
    }

    true
}

/// Advances past `p.next` when its direction equals the merge direction.
fn merge_iteration_forward_branch(
    vertices: &[Point2],
    node_pool: &mut NodePool,
    merge_state: &mut MergeState,
    p_is_a: bool,
    p_lower: bool,
) {
    let winding = merge_state.winding;
    let direction = merge_state.direction;
    let mut p = merge_state.chain(p_is_a);
    let mut q = merge_state.chain(!p_is_a);

    let p_next = p.next.expect("forward branch requires a next node");
    debug_assert_eq!(node_pool[p_next].node_type, NodeType::Branch);
    debug_assert_eq!(node_pool[p_next].direction, direction);

    let p_next_vertex = node_pool[p_next].vertex;
    let p_next_point = vertices[p_next_vertex];

    advance_edge(vertices, winding, direction, &mut q, !p_lower, p_next_point);
    let q_edge = q.edge.expect("the main active edge is resolved");

    if q_edge.on_interior_side(vertices, p_next_point, winding) {
        // The vertical extension towards the other chain survives; its
        // opposite edge is re-targeted at the other chain's boundary.
        if p_lower {
            p.opp_edge = node_pool[p_next].upper_opp_edge;
            node_pool[p_next].upper_opp_edge = Some(q_edge);
        } else {
            p.opp_edge = node_pool[p_next].lower_opp_edge;
            node_pool[p_next].lower_opp_edge = Some(q_edge);
        }

        p.edge = Some(if advances_with_vertex_order(winding, direction, p_lower) {
            Edge::outgoing_edge(vertices, p_next_vertex)
        } else {
            Edge::incoming_edge(vertices, p_next_vertex)
        });

        push_merged_node(node_pool, merge_state, p_next, 0, if p_lower { 2 } else { 1 });

        p.prev = p_next;
        p.next = node_pool[p_next].neighbors[if p_lower { 2 } else { 1 }];
    } else {
        // The extension doesn't reach the other chain; the node dangles on
        // its own side until it's reattached.
        if p_lower {
            p.edge = node_pool[p_next].lower_opp_edge;
            node_pool[p_next].lower_opp_edge = None;
        } else {
            p.edge = node_pool[p_next].upper_opp_edge;
            node_pool[p_next].upper_opp_edge = None;
        }

        p.opp_edge = Some(if advances_with_vertex_order(winding, direction, p_lower) {
            Edge::incoming_edge(vertices, p_next_vertex)
        } else {
            Edge::outgoing_edge(vertices, p_next_vertex)
        });

        push_opp_node(node_pool, &mut p, p_next, 0, if p_lower { 1 } else { 2 });

        p.prev = p_next;
        p.next = node_pool[p_next].neighbors[if p_lower { 1 } else { 2 }];
    }

    merge_state.set_chain(p_is_a, p);
    merge_state.set_chain(!p_is_a, q);
}

/// Advances past `p.next` when its direction is opposite to the merge
/// direction.
fn merge_iteration_reverse_branch(
    vertices: &[Point2],
    node_pool: &mut NodePool,
    merge_state: &mut MergeState,
    p_is_a: bool,
    p_lower: bool,
) {
    let winding = merge_state.winding;
    let direction = merge_state.direction;
    let mut p = merge_state.chain(p_is_a);
    let mut q = merge_state.chain(!p_is_a);

    let p_next = p.next.expect("reverse branch requires a next node");
    debug_assert_eq!(node_pool[p_next].node_type, NodeType::Branch);
    debug_assert_eq!(node_pool[p_next].direction, direction.opposite());

    let p_next_vertex = node_pool[p_next].vertex;
    let p_next_point = vertices[p_next_vertex];

    let p_vertex_visible_from_q = p_lower == (node_pool[p_next].neighbors[2] == Some(p.prev));

    if p_vertex_visible_from_q {
        advance_edge(vertices, winding, direction, &mut q, !p_lower, p_next_point);

        let should_turn_around;
        if q.opp_edge.is_some() {
            p.opp_edge = if p_lower {
                node_pool[p_next].lower_opp_edge
            } else {
                node_pool[p_next].upper_opp_edge
            };
            advance_opp_edge(vertices, winding, direction, &mut q, !p_lower, p_next_point);

            if let Some(p_opp_edge) = p.opp_edge {
                let q_opp_edge = q.opp_edge.expect("checked above");
                let y_on_p_opp_edge = y_on_edge_for_x(
                    p_opp_edge.start_point(vertices),
                    p_opp_edge.end_point(vertices),
                    p_next_point.x(),
                );
                let y_on_q_opp_edge = y_on_edge_for_x(
                    q_opp_edge.start_point(vertices),
                    q_opp_edge.end_point(vertices),
                    p_next_point.x(),
                );
                should_turn_around = if p_lower {
                    y_on_q_opp_edge > y_on_p_opp_edge
                } else {
                    y_on_q_opp_edge < y_on_p_opp_edge
                };
            } else {
                should_turn_around = true;
            }
        } else {
            should_turn_around = false;
        }

        if should_turn_around {
            // The two opposite boundaries bracket the branch vertex, so the
            // merge direction flips here.
            push_merged_node(
                node_pool,
                merge_state,
                p_next,
                if p_lower { 2 } else { 1 },
                if p_lower { 1 } else { 2 },
            );

            if let Some(opp_last) = p.opp_last {
                debug_assert!(
                    node_pool[p_next].lower_opp_edge.is_some()
                        && node_pool[p_next].upper_opp_edge.is_some()
                );
                debug_assert!(node_pool[p_next].neighbors[0].is_some());

                let new_node = node_pool.alloc(Node {
                    direction: node_pool[p_next].direction,
                    node_type: NodeType::OuterBranch,
                    vertex: p_next_vertex,
                    lower_opp_edge: node_pool[p_next].lower_opp_edge,
                    upper_opp_edge: node_pool[p_next].upper_opp_edge,
                    neighbors: [None; 3],
                });

                let incoming = node_pool[p_next].neighbors[0].expect("checked above");
                node_pool[new_node].neighbors[0] = Some(incoming);
                node_pool[incoming].replace_neighbor(p_next, new_node);

                node_pool[new_node].neighbors[if p_lower { 2 } else { 1 }] = Some(opp_last);
                node_pool[opp_last].neighbors[p.opp_last_branch_index as usize] = Some(new_node);

                p.opp_last = Some(new_node);
                p.opp_last_branch_index = if p_lower { 1 } else { 2 };
            } else {
                p.opp_last = node_pool[p_next].neighbors[0];
                if let Some(opp_last) = p.opp_last {
                    p.opp_last_branch_index = node_pool[opp_last].neighbor_branch_index(p_next);
                }
            }

            if p_lower {
                p.opp_edge = node_pool[p_next].lower_opp_edge;
                node_pool[p_next].upper_opp_edge = q.edge;
                node_pool[p_next].lower_opp_edge = q.opp_edge;
            } else {
                p.opp_edge = node_pool[p_next].upper_opp_edge;
                node_pool[p_next].lower_opp_edge = q.edge;
                node_pool[p_next].upper_opp_edge = q.opp_edge;
            }

            p.edge = Some(if advances_with_vertex_order(winding, direction, p_lower) {
                Edge::outgoing_edge(vertices, p_next_vertex)
            } else {
                Edge::incoming_edge(vertices, p_next_vertex)
            });

            q.edge = q.opp_edge;
            q.opp_edge = None;

            merge_state.direction = direction.opposite();

            node_pool[p_next].neighbors[0] = q.next;
            let q_next = q.next.expect("the other chain still has nodes when turning around");
            node_pool[q_next].replace_neighbor(q.prev, p_next);

            p.prev = p_next;
            p.next = node_pool[p_next].neighbors[if p_lower { 1 } else { 2 }];

            q.prev = q_next;
            let q_opp_last = q.opp_last.expect("turning around reattaches the opposite side");
            node_pool[q_opp_last].neighbors[q.opp_last_branch_index as usize] = Some(q.prev);
            q.next = Some(q_opp_last);
            q.opp_last = None;
        } else {
            // Visible, but the merge continues in the same direction; both
            // opposite edges are updated in place.
            if p_lower {
                p.edge = node_pool[p_next].lower_opp_edge;
                p.opp_edge = node_pool[p_next].upper_opp_edge;
                node_pool[p_next].upper_opp_edge = q.edge;
            } else {
                p.edge = node_pool[p_next].upper_opp_edge;
                p.opp_edge = node_pool[p_next].lower_opp_edge;
                node_pool[p_next].lower_opp_edge = q.edge;
            }

            push_merged_node(node_pool, merge_state, p_next, if p_lower { 2 } else { 1 }, 0);

            p.prev = p_next;
            p.next = node_pool[p_next].neighbors[0];
        }
    } else {
        // The branch vertex lies on the opposite boundary of 'p', invisible
        // from the other chain; queue it on the opposite side.
        if p_lower {
            p.edge = node_pool[p_next].lower_opp_edge;
            p.opp_edge = node_pool[p_next].upper_opp_edge;
            node_pool[p_next].lower_opp_edge = None;
        } else {
            p.edge = node_pool[p_next].upper_opp_edge;
            p.opp_edge = node_pool[p_next].lower_opp_edge;
            node_pool[p_next].upper_opp_edge = None;
        }

        push_opp_node(node_pool, &mut p, p_next, if p_lower { 1 } else { 2 }, 0);

        p.prev = p_next;
        p.next = node_pool[p_next].neighbors[0];
    }

    merge_state.set_chain(p_is_a, p);
    merge_state.set_chain(!p_is_a, q);
}

/// Advances past `p.next` when it's an outer branch left over from an
/// earlier merge; both of its opposite edges resolve to the current region.
fn merge_iteration_reverse_outer_branch(
    node_pool: &mut NodePool,
    merge_state: &mut MergeState,
    p_is_a: bool,
    p_lower: bool,
) {
    let mut p = merge_state.chain(p_is_a);

    let node = p.next.expect("outer branch requires a next node");
    debug_assert_eq!(node_pool[node].node_type, NodeType::OuterBranch);
    debug_assert_eq!(node_pool[node].direction, merge_state.direction.opposite());

    if p_lower {
        p.edge = node_pool[node].lower_opp_edge;
        p.opp_edge = node_pool[node].upper_opp_edge;
        p.opp_last = node_pool[node].neighbors[2];
    } else {
        p.edge = node_pool[node].upper_opp_edge;
        p.opp_edge = node_pool[node].lower_opp_edge;
        p.opp_last = node_pool[node].neighbors[1];
    }

    let next = node_pool[node].neighbors[0].expect("outer branch has an incoming side");
    p.next = Some(next);
    node_pool[next].replace_neighbor(node, p.prev);

    let opp_last = p.opp_last.expect("outer branch has an opposite side");
    p.opp_last_branch_index = node_pool[opp_last].neighbor_branch_index(node);

    merge_state.set_chain(p_is_a, p);
}

/// Splices the rest of chain `p` onto the merged decomposition after chain
/// `q` has been fully consumed.
fn merge_tail(
    vertices: &[Point2],
    node_pool: &mut NodePool,
    merge_state: &mut MergeState,
    p_is_a: bool,
    p_lower: bool,
) {
    let winding = merge_state.winding;
    let direction = merge_state.direction;
    let mut p = merge_state.chain(p_is_a);

    debug_assert!(merge_state.chain(!p_is_a).next.is_none());
    debug_assert!(merge_state.chain(!p_is_a).opp_last.is_none());

    let p_next = p.next.expect("the unfinished chain has a next node");

    if let Some(opp_last) = p.opp_last {
        // The dangling opposite side needs a cap at the last merged vertex.
        let last_merged = merge_state.last_merged;
        let last_merged_vertex = node_pool[last_merged].vertex;
        advance_opp_edge(
            vertices,
            winding,
            direction,
            &mut p,
            p_lower,
            vertices[last_merged_vertex],
        );

        let node = node_pool.alloc(Node {
            direction: direction.opposite(),
            node_type: NodeType::OuterBranch,
            vertex: last_merged_vertex,
            lower_opp_edge: if p_lower {
                node_pool[last_merged].lower_opp_edge
            } else {
                p.opp_edge
            },
            upper_opp_edge: if p_lower {
                p.opp_edge
            } else {
                node_pool[last_merged].upper_opp_edge
            },
            neighbors: if p_lower {
                [p.next, Some(last_merged), Some(opp_last)]
            } else {
                [p.next, Some(opp_last), Some(last_merged)]
            },
        });

        node_pool[p_next].replace_neighbor(p.prev, node);
        node_pool[opp_last].neighbors[p.opp_last_branch_index as usize] = Some(node);
        node_pool[last_merged].neighbors[merge_state.last_merged_branch_index as usize] =
            Some(node);
    } else {
        node_pool[merge_state.last_merged].neighbors
            [merge_state.last_merged_branch_index as usize] = Some(p_next);
        node_pool[p_next].replace_neighbor(p.prev, merge_state.last_merged);
    }

    merge_state.set_chain(p_is_a, p);
}

/// Finishes the merge at the vertex where both chains' far ends meet; this
/// only happens when the combined chain closes the full polygon.
fn merge_closing_vertex(
    vertices: &[Point2],
    node_pool: &mut NodePool,
    merge_state: &mut MergeState,
    a_lower: bool,
) {
    let a_node = merge_state.a.next.expect("closing vertex requires both next nodes");

    let vertex = node_pool[a_node].vertex;
    let incoming_edge = Edge::incoming_edge(vertices, vertex);
    let outgoing_edge = Edge::outgoing_edge(vertices, vertex);

    let node = &mut node_pool[a_node];
    node.direction = merge_state.direction;
    node.node_type = NodeType::Leaf;
    if a_lower {
        node.lower_opp_edge = Some(outgoing_edge);
        node.upper_opp_edge = Some(incoming_edge);
    } else {
        node.lower_opp_edge = Some(incoming_edge);
        node.upper_opp_edge = Some(outgoing_edge);
    }

    node_pool[merge_state.last_merged].neighbors[merge_state.last_merged_branch_index as usize] =
        Some(a_node);
    node_pool[a_node].neighbors[0] = Some(merge_state.last_merged);
}

/// Connects a newly merged node to the merged side of the decomposition.
fn push_merged_node(
    node_pool: &mut NodePool,
    merge_state: &mut MergeState,
    node: NodeId,
    incoming_branch_index: u8,
    outgoing_branch_index: u8,
) {
    node_pool[merge_state.last_merged].neighbors[merge_state.last_merged_branch_index as usize] =
        Some(node);
    node_pool[node].neighbors[incoming_branch_index as usize] = Some(merge_state.last_merged);

    merge_state.last_merged = node;
    merge_state.last_merged_branch_index = outgoing_branch_index;
}

/// Connects a node whose extension dangles on its own chain's side to the
/// previous such nodes.
fn push_opp_node(
    node_pool: &mut NodePool,
    chain: &mut ChainMergeState,
    node: NodeId,
    incoming_branch_index: u8,
    outgoing_branch_index: u8,
) {
    if let Some(opp_last) = chain.opp_last {
        node_pool[opp_last].neighbors[chain.opp_last_branch_index as usize] = Some(node);
    }
    node_pool[node].neighbors[incoming_branch_index as usize] = chain.opp_last;

    chain.opp_last = Some(node);
    chain.opp_last_branch_index = outgoing_branch_index;
}

/// Advances `chain.edge` until it contains the position the main active
/// point has when the merge reaches a node with its vertex at `point`.
fn advance_edge(
    vertices: &[Point2],
    winding: Winding,
    direction: HorizontalDirection,
    chain: &mut ChainMergeState,
    chain_is_lower: bool,
    point: Point2,
) {
    let edge = chain.edge.as_mut().expect("the main active edge is resolved");
    if advances_with_vertex_order(winding, direction, chain_is_lower) {
        while lex_less_than_with_direction(direction, vertices[edge.end], point) {
            edge.start = edge.end;
            edge.end = next_cyclic(vertices.len(), edge.end);
        }
    } else {
        while lex_less_than_with_direction(direction, vertices[edge.start], point) {
            edge.end = edge.start;
            edge.start = prev_cyclic(vertices.len(), edge.start);
        }
    }
}

/// The counterpart of `advance_edge` for the opposite active point, which
/// moves against the chain's own vertex order.
fn advance_opp_edge(
    vertices: &[Point2],
    winding: Winding,
    direction: HorizontalDirection,
    chain: &mut ChainMergeState,
    chain_is_lower: bool,
    point: Point2,
) {
    let edge = chain.opp_edge.as_mut().expect("the opposite active edge is resolved");
    if advances_with_vertex_order(winding, direction, chain_is_lower) {
        while lex_less_than_with_direction(direction, vertices[edge.start], point) {
            edge.end = edge.start;
            edge.start = prev_cyclic(vertices.len(), edge.start);
        }
    } else {
        while lex_less_than_with_direction(direction, vertices[edge.end], point) {
            edge.start = edge.end;
            edge.end = next_cyclic(vertices.len(), edge.end);
        }
    }
}
