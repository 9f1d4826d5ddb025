//! Validation helpers for decompositions. Only used by the test suite.
//!
//! The checks here verify the documented node invariants: opposite edges
//! match exact ray casts, neighbor links are symmetric, the two nodes of a
//! region agree on which boundaries it has, and each boundary is monotone.

use fixedbitset::FixedBitSet;

use crate::decomp::{
    y_on_edge_for_x, ChainDecomposition, Edge, Node, NodeId, NodePool, NodeType,
};
use crate::point::{lex_less_than, lex_less_than_with_direction, Point2};
use crate::scalar::{ScalarDeg1, ScalarDeg2, YOnEdge};
use crate::util::next_cyclic;
use crate::{HorizontalDirection, Winding};

/// A contiguous range of a polygon boundary, with the x-coordinates of its
/// two endpoints. Rays are only cast against this part of the boundary, with
/// the first and last edge clamped to the endpoint x-coordinates.
pub struct PolygonRange {
    /// The index of the start vertex of the first edge.
    pub first_edge_index: usize,
    /// The number of edges in the range.
    pub num_edges: usize,
    /// The x-coordinate of the point where the range starts.
    pub start_point_x: ScalarDeg1,
    /// The x-coordinate of the point where the range ends.
    pub end_point_x: ScalarDeg1,
}

impl PolygonRange {
    /// The range covering the full boundary of `vertices`.
    pub fn full(vertices: &[Point2]) -> PolygonRange {
        PolygonRange {
            first_edge_index: 0,
            num_edges: vertices.len(),
            start_point_x: vertices[0].x(),
            end_point_x: vertices[0].x(),
        }
    }
}

/// Casts a ray upwards from `ray_origin` (with an infinitesimal bias towards
/// the right) and returns the first edge of `range` it hits from the
/// decomposed region's side, or `None`.
pub fn ray_cast_up(
    vertices: &[Point2],
    winding: Winding,
    range: &PolygonRange,
    ray_origin: Point2,
) -> Option<Edge> {
    let mut result_y = YOnEdge::infinity();
    let mut result = None;

    let mut edge_start = range.first_edge_index;
    for i in 0..range.num_edges {
        let edge_end = next_cyclic(vertices.len(), edge_start);

        let edge_start_x =
            if i == 0 { range.start_point_x } else { vertices[edge_start].x() };
        let edge_end_x =
            if i == range.num_edges - 1 { range.end_point_x } else { vertices[edge_end].x() };

        let edge_start_on_left = edge_start_x < ray_origin.x();
        let edge_end_on_left = edge_end_x < ray_origin.x();
        if edge_start_on_left != edge_end_on_left {
            let cur_y = y_on_edge_for_x(vertices[edge_start], vertices[edge_end], ray_origin.x());
            if cur_y > ray_origin.y() && cur_y < result_y {
                let hit_from_inside = match winding {
                    Winding::Ccw => edge_end_on_left,
                    Winding::Cw => edge_start_on_left,
                };
                result = if hit_from_inside { Some(Edge { start: edge_start, end: edge_end }) } else { None };
                result_y = cur_y;
            }
        }

        edge_start = edge_end;
    }

    result
}

/// The downward counterpart of [`ray_cast_up`].
pub fn ray_cast_down(
    vertices: &[Point2],
    winding: Winding,
    range: &PolygonRange,
    ray_origin: Point2,
) -> Option<Edge> {
    let mut result_y = YOnEdge::negative_infinity();
    let mut result = None;

    let mut edge_start = range.first_edge_index;
    for i in 0..range.num_edges {
        let edge_end = next_cyclic(vertices.len(), edge_start);

        let edge_start_x =
            if i == 0 { range.start_point_x } else { vertices[edge_start].x() };
        let edge_end_x =
            if i == range.num_edges - 1 { range.end_point_x } else { vertices[edge_end].x() };

        let edge_start_on_left = edge_start_x <= ray_origin.x();
        let edge_end_on_left = edge_end_x <= ray_origin.x();
        if edge_start_on_left != edge_end_on_left {
            let cur_y = y_on_edge_for_x(vertices[edge_start], vertices[edge_end], ray_origin.x());
            if cur_y < ray_origin.y() && cur_y > result_y {
                let hit_from_inside = match winding {
                    Winding::Ccw => edge_start_on_left,
                    Winding::Cw => edge_end_on_left,
                };
                result = if hit_from_inside { Some(Edge { start: edge_start, end: edge_end }) } else { None };
                result_y = cur_y;
            }
        }

        edge_start = edge_end;
    }

    result
}

/// Returns all nodes reachable from `node` through neighbor links.
pub fn gather_nodes(nodes: &NodePool, node: NodeId) -> Vec<NodeId> {
    let mut visited = FixedBitSet::with_capacity(nodes.len());
    let mut stack = vec![node];
    let mut result = Vec::new();

    while let Some(id) = stack.pop() {
        if visited.contains(id.index()) {
            continue;
        }
        visited.insert(id.index());
        result.push(id);

        let node = &nodes[id];
        for branch in 0..node.num_branches() {
            if let Some(neighbor) = node.neighbors[branch as usize] {
                stack.push(neighbor);
            }
        }
    }

    result
}

/// The vertices where the lower and upper boundary of one branch's region
/// meet the branch's node, or `None` where that boundary is absent.
pub type BranchBoundaryVertices = (Option<usize>, Option<usize>);

/// Returns the boundary vertices of the region on branch `branch_index` of
/// `node`, taking the ends of `chain_decomposition` (if any) and outer
/// branches into account.
pub fn node_branch_boundary_vertices(
    nodes: &NodePool,
    winding: Winding,
    chain_decomposition: Option<&ChainDecomposition>,
    node_id: NodeId,
    branch_index: u8,
) -> BranchBoundaryVertices {
    // The direction of a boundary with the decomposed region above it.
    let lower_boundary_direction = match winding {
        Winding::Ccw => HorizontalDirection::Right,
        Winding::Cw => HorizontalDirection::Left,
    };

    let node = &nodes[node_id];
    if node.node_type == NodeType::Leaf {
        debug_assert_eq!(branch_index, 0);
        return (Some(node.vertex), Some(node.vertex));
    }

    let is_chain_first = chain_decomposition.map_or(false, |c| c.first_node == node_id);
    let is_chain_last = chain_decomposition.map_or(false, |c| c.last_node == Some(node_id));

    match branch_index {
        0 => {
            if node.direction == lower_boundary_direction {
                (node.lower_opp_edge.map(|e| e.end), node.upper_opp_edge.map(|e| e.start))
            } else {
                (node.lower_opp_edge.map(|e| e.start), node.upper_opp_edge.map(|e| e.end))
            }
        }

        1 => {
            let mut has_upper_boundary = node.node_type != NodeType::OuterBranch;
            if is_chain_first && node.direction == lower_boundary_direction {
                has_upper_boundary = false;
            }
            if is_chain_last && node.direction != lower_boundary_direction {
                has_upper_boundary = false;
            }

            (
                if node.direction == lower_boundary_direction {
                    node.lower_opp_edge.map(|e| e.start)
                } else {
                    node.lower_opp_edge.map(|e| e.end)
                },
                if has_upper_boundary { Some(node.vertex) } else { None },
            )
        }

        2 => {
            let mut has_lower_boundary = node.node_type != NodeType::OuterBranch;
            if is_chain_first && node.direction != lower_boundary_direction {
                has_lower_boundary = false;
            }
            if is_chain_last && node.direction == lower_boundary_direction {
                has_lower_boundary = false;
            }

            (
                if has_lower_boundary { Some(node.vertex) } else { None },
                if node.direction == lower_boundary_direction {
                    node.upper_opp_edge.map(|e| e.end)
                } else {
                    node.upper_opp_edge.map(|e| e.start)
                },
            )
        }

        _ => {
            debug_assert!(false, "invalid branch index");
            (None, None)
        }
    }
}

/// Validates that the arc from `start_vertex` to `end_vertex` is monotone in
/// `direction`.
fn validate_boundary_is_monotone(
    vertices: &[Point2],
    direction: HorizontalDirection,
    start_vertex: usize,
    end_vertex: usize,
) -> bool {
    let mut vertex = start_vertex;
    while vertex != end_vertex {
        let next_vertex = next_cyclic(vertices.len(), vertex);
        if !lex_less_than_with_direction(direction, vertices[vertex], vertices[next_vertex]) {
            return false;
        }
        vertex = next_vertex;
    }
    true
}

#[allow(clippy::too_many_arguments)]
fn validate_neighboring_nodes_pair(
    vertices: &[Point2],
    nodes: &NodePool,
    winding: Winding,
    left_node: NodeId,
    left_node_branch_index: u8,
    left_boundary_vertices: BranchBoundaryVertices,
    right_node: NodeId,
    right_node_branch_index: u8,
    right_boundary_vertices: BranchBoundaryVertices,
) -> bool {
    debug_assert!(lex_less_than(
        vertices[nodes[left_node].vertex],
        vertices[nodes[right_node].vertex]
    ));

    // The outgoing direction of a branch is opposite to the node's direction
    // for branch 0 and equal to it for branches 1 and 2, so the left node's
    // branch must face right and the right node's branch left.
    if (left_node_branch_index == 0)
        != (nodes[left_node].direction == HorizontalDirection::Left)
    {
        return false;
    }
    if (right_node_branch_index == 0)
        != (nodes[right_node].direction == HorizontalDirection::Right)
    {
        return false;
    }

    let (left_lower, left_upper) = left_boundary_vertices;
    let (right_lower, right_upper) = right_boundary_vertices;

    // Both nodes must agree on whether the region has a lower boundary.
    if left_lower.is_some() != right_lower.is_some() {
        return false;
    }

    if let (Some(left_lower), Some(right_lower)) = (left_lower, right_lower) {
        let monotone = match winding {
            Winding::Ccw => validate_boundary_is_monotone(
                vertices,
                HorizontalDirection::Right,
                left_lower,
                right_lower,
            ),
            Winding::Cw => validate_boundary_is_monotone(
                vertices,
                HorizontalDirection::Left,
                right_lower,
                left_lower,
            ),
        };
        if !monotone {
            return false;
        }
    }

    if left_upper.is_some() != right_upper.is_some() {
        return false;
    }

    if let (Some(left_upper), Some(right_upper)) = (left_upper, right_upper) {
        let monotone = match winding {
            Winding::Ccw => validate_boundary_is_monotone(
                vertices,
                HorizontalDirection::Left,
                right_upper,
                left_upper,
            ),
            Winding::Cw => validate_boundary_is_monotone(
                vertices,
                HorizontalDirection::Right,
                left_upper,
                right_upper,
            ),
        };
        if !monotone {
            return false;
        }
    }

    true
}

/// Validates the neighbor links of `node`: each branch which has at least
/// one boundary must have a symmetric link, all other slots must be empty,
/// and each region the node bounds from the left must be consistent.
pub fn validate_node_neighbors(
    vertices: &[Point2],
    nodes: &NodePool,
    winding: Winding,
    chain_decomposition: Option<&ChainDecomposition>,
    node_id: NodeId,
) -> bool {
    let node = &nodes[node_id];
    for branch_index in 0..node.num_branches() {
        let boundary_vertices = node_branch_boundary_vertices(
            nodes,
            winding,
            chain_decomposition,
            node_id,
            branch_index,
        );

        if boundary_vertices.0.is_some() || boundary_vertices.1.is_some() {
            let neighbor = match node.neighbors[branch_index as usize] {
                Some(neighbor) => neighbor,
                None => return false,
            };

            // Find the branch of the neighbor which links back.
            let neighbor_num_branches = nodes[neighbor].num_branches();
            let mut neighbor_to_node_branch_index = None;
            for i in 0..neighbor_num_branches {
                if nodes[neighbor].neighbors[i as usize] == Some(node_id) {
                    neighbor_to_node_branch_index = Some(i);
                    break;
                }
            }
            let neighbor_to_node_branch_index = match neighbor_to_node_branch_index {
                Some(i) => i,
                None => return false,
            };

            // Validate each pair once, from its left node.
            if lex_less_than(vertices[node.vertex], vertices[nodes[neighbor].vertex]) {
                let neighbor_boundary_vertices = node_branch_boundary_vertices(
                    nodes,
                    winding,
                    chain_decomposition,
                    neighbor,
                    neighbor_to_node_branch_index,
                );
                if !validate_neighboring_nodes_pair(
                    vertices,
                    nodes,
                    winding,
                    node_id,
                    branch_index,
                    boundary_vertices,
                    neighbor,
                    neighbor_to_node_branch_index,
                    neighbor_boundary_vertices,
                ) {
                    return false;
                }
            }
        } else if node.neighbors[branch_index as usize].is_some() {
            return false;
        }
    }

    true
}

/// Validates that the opposite edges of `node` match exact ray casts against
/// `range`.
pub fn validate_node_opp_edges(
    vertices: &[Point2],
    winding: Winding,
    range: &PolygonRange,
    node: &Node,
) -> bool {
    if node.node_type == NodeType::Leaf {
        let incoming_edge = Edge::incoming_edge(vertices, node.vertex);
        let outgoing_edge = Edge::outgoing_edge(vertices, node.vertex);
        let incoming_is_lower =
            (winding == Winding::Ccw) == (node.direction == HorizontalDirection::Right);
        if incoming_is_lower {
            node.lower_opp_edge == Some(incoming_edge) && node.upper_opp_edge == Some(outgoing_edge)
        } else {
            node.lower_opp_edge == Some(outgoing_edge) && node.upper_opp_edge == Some(incoming_edge)
        }
    } else {
        let origin = vertices[node.vertex];
        node.lower_opp_edge == ray_cast_down(vertices, winding, range, origin)
            && node.upper_opp_edge == ray_cast_up(vertices, winding, range, origin)
    }
}

/// Validates a chain decomposition: symmetric neighbor links, per-branch
/// neighbor presence and monotone region boundaries.
///
/// The opposite edges of a partial chain refer to a boundary that is only
/// locally complete, so they're checked by [`validate_polygon_decomposition`]
/// once the chains have been merged into a full decomposition.
pub fn validate_chain_decomposition(
    vertices: &[Point2],
    nodes: &NodePool,
    winding: Winding,
    chain_decomposition: &ChainDecomposition,
) -> bool {
    for node_id in gather_nodes(nodes, chain_decomposition.first_node) {
        if !validate_node_neighbors(vertices, nodes, winding, Some(chain_decomposition), node_id) {
            return false;
        }
    }
    true
}

/// Validates a complete decomposition reachable from `root_node`: the
/// chain-level neighbor checks plus the ray-cast check of every node's
/// opposite edges.
pub fn validate_polygon_decomposition(
    vertices: &[Point2],
    nodes: &NodePool,
    winding: Winding,
    root_node: NodeId,
) -> bool {
    let range = PolygonRange::full(vertices);
    let gathered = gather_nodes(nodes, root_node);

    for &node_id in &gathered {
        if !validate_node_opp_edges(vertices, winding, &range, &nodes[node_id]) {
            return false;
        }
    }

    for &node_id in &gathered {
        if !validate_node_neighbors(vertices, nodes, winding, None, node_id) {
            return false;
        }
    }

    true
}

/// Negates the x-coordinate of every vertex, which flips the winding.
pub fn flip_horizontally(vertices: &mut [Point2]) {
    for vertex in vertices.iter_mut() {
        *vertex = Point2::new(-vertex.x(), vertex.y());
    }
}

/// Builds the unmerged single-vertex chain decompositions of a polygon: one
/// chain per arc between consecutive convex side vertices, with a fresh node
/// at each side vertex and all opposite edges unresolved.
///
/// This mirrors what the zigzag phase produces at its chain boundaries and
/// feeds the merge phase directly in tests.
pub fn initial_chain_decompositions(
    vertices: &[Point2],
    winding: Winding,
    node_pool: &mut NodePool,
) -> Vec<ChainDecomposition> {
    let num_vertices = vertices.len();
    let lower_boundary_towards_right = winding == Winding::Ccw;

    let is_convex_corner = |a: Point2, b: Point2, c: Point2| {
        let side = crate::point::cross(b - a, c - a);
        match winding {
            Winding::Ccw => side > ScalarDeg2::ZERO,
            Winding::Cw => side < ScalarDeg2::ZERO,
        }
    };

    // Find the first convex side vertex.
    let mut start = None;
    for i in 0..num_vertices {
        let prev = vertices[crate::util::prev_cyclic(num_vertices, i)];
        let cur = vertices[i];
        let next = vertices[next_cyclic(num_vertices, i)];
        if lex_less_than(prev, cur) != lex_less_than(cur, next) && is_convex_corner(prev, cur, next)
        {
            start = Some(i);
            break;
        }
    }
    let start = start.expect("a valid polygon has a convex side vertex");

    let mut result: Vec<ChainDecomposition> = Vec::new();
    let mut prev_node: Option<NodeId> = None;

    let mut vertex = start;
    for i in 0..=num_vertices {
        let prev = vertices[crate::util::prev_cyclic(num_vertices, vertex)];
        let cur = vertices[vertex];
        let next = vertices[next_cyclic(num_vertices, vertex)];
        let incoming_towards_right = lex_less_than(prev, cur);
        let outgoing_towards_right = lex_less_than(cur, next);

        if incoming_towards_right != outgoing_towards_right {
            let is_convex = is_convex_corner(prev, cur, next);

            if i != 0 {
                // Add a node to the current chain.
                let node = node_pool.alloc(Node {
                    direction: if incoming_towards_right {
                        HorizontalDirection::Left
                    } else {
                        HorizontalDirection::Right
                    },
                    node_type: NodeType::Branch,
                    vertex,
                    lower_opp_edge: None,
                    upper_opp_edge: None,
                    neighbors: [None; 3],
                });

                let prev_node_id = prev_node.expect("a chain is in progress");
                let branch = if incoming_towards_right == lower_boundary_towards_right {
                    2
                } else {
                    1
                };
                node_pool[node].neighbors[branch] = Some(prev_node_id);
                node_pool[prev_node_id].neighbors[branch] = Some(node);

                prev_node = Some(node);

                if is_convex {
                    // A convex corner's node is the last node of its chain.
                    let chain_index = result.len() - 1;
                    result[chain_index].last_node = Some(node);
                }
            }

            if is_convex && i != num_vertices {
                // Start a new chain.
                let node = node_pool.alloc(Node {
                    direction: if outgoing_towards_right {
                        HorizontalDirection::Right
                    } else {
                        HorizontalDirection::Left
                    },
                    node_type: NodeType::Branch,
                    vertex,
                    lower_opp_edge: None,
                    upper_opp_edge: None,
                    neighbors: [None; 3],
                });

                result.push(ChainDecomposition { first_node: node, last_node: None });
                prev_node = Some(node);
            }
        }

        vertex = next_cyclic(num_vertices, vertex);
    }

    result
}
