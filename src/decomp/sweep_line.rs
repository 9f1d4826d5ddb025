//! The sweep-line reference builder.
//!
//! A direct O(n log n) plane sweep over the vertices in lexicographic order,
//! maintaining the list of edges crossing the sweep line. It exists as a
//! simple oracle for the divide-and-conquer builder: both must induce the
//! same regions. Input polygons are counter-clockwise.

use crate::point::{cross, lex_less_than, Point2};
use crate::scalar::ScalarDeg2;
use crate::util::{next_cyclic, prev_cyclic};
use crate::HorizontalDirection;

use super::{
    Edge, Node, NodeId, NodePool, NodeType, VerticalDecomposition, VerticalDecompositionType,
};

/// A sweep event, one per vertex.
struct Event {
    vertex: usize,

    /// Whether the incoming edge at this vertex points to the right.
    incoming_towards_right: bool,

    /// Whether the outgoing edge at this vertex points to the right.
    outgoing_towards_right: bool,

    /// For a side vertex, whether the corner is concave with respect to the
    /// region being decomposed. Unset otherwise.
    is_concave_corner: bool,
}

/// An edge currently intersecting the sweep line. The two sentinel edges at
/// ±infinity of an exterior sweep have no vertices.
#[derive(Copy, Clone)]
struct ActiveEdge {
    left_vertex: Option<usize>,
    right_vertex: Option<usize>,

    /// The node on the left side of the region above this edge. Only
    /// meaningful for edges with the decomposed region above them.
    region_left_node: Option<NodeId>,

    /// The branch of `region_left_node` corresponding to the region above
    /// this edge.
    region_left_node_branch_index: u8,
}

impl ActiveEdge {
    /// The [`Edge`] this active edge corresponds to, or `None` for a
    /// sentinel.
    fn edge(&self, num_vertices: usize) -> Option<Edge> {
        let left = self.left_vertex?;
        let right = self.right_vertex?;

        // The edge runs from the vertex whose cyclic successor is the other.
        if next_cyclic(num_vertices, left) == right {
            Some(Edge { start: left, end: right })
        } else {
            debug_assert_eq!(next_cyclic(num_vertices, right), left);
            Some(Edge { start: right, end: left })
        }
    }
}

struct SweepState<'a> {
    vertices: &'a [Point2],
    decomposition_type: VerticalDecompositionType,
    events: Vec<Event>,
    active_edges: Vec<ActiveEdge>,
    nodes: NodePool,
}

/// Computes the vertical decomposition of the given region of the
/// counter-clockwise polygon formed by `vertices` with a plane sweep.
pub fn sweep_line_build(
    vertices: &[Point2],
    decomposition_type: VerticalDecompositionType,
) -> VerticalDecomposition {
    let mut state = SweepState {
        vertices,
        decomposition_type,
        events: Vec::new(),
        active_edges: Vec::new(),
        nodes: NodePool::new(),
    };
    state.init_sweep();
    state.run_sweep();

    let leftmost_node = NodeId::new(0);
    let rightmost_node = NodeId::new(state.nodes.len() - 1);
    VerticalDecomposition { nodes: state.nodes, leftmost_node, rightmost_node }
}

impl<'a> SweepState<'a> {
    fn init_sweep(&mut self) {
        let num_vertices = self.vertices.len();
        self.events.reserve(num_vertices);

        let mut num_nodes = 0;
        let mut prev_vertex = num_vertices - 2;
        let mut cur_vertex = num_vertices - 1;
        let mut incoming_towards_right =
            lex_less_than(self.vertices[prev_vertex], self.vertices[cur_vertex]);
        for next_vertex in 0..num_vertices {
            let outgoing_towards_right =
                lex_less_than(self.vertices[cur_vertex], self.vertices[next_vertex]);

            let mut is_concave_corner = false;
            if incoming_towards_right != outgoing_towards_right {
                let orientation = cross(
                    self.vertices[cur_vertex] - self.vertices[prev_vertex],
                    self.vertices[next_vertex] - self.vertices[cur_vertex],
                );
                is_concave_corner = match self.decomposition_type {
                    VerticalDecompositionType::Interior => orientation < ScalarDeg2::ZERO,
                    VerticalDecompositionType::Exterior => orientation > ScalarDeg2::ZERO,
                };
                num_nodes += 1;
            }

            self.events.push(Event {
                vertex: cur_vertex,
                incoming_towards_right,
                outgoing_towards_right,
                is_concave_corner,
            });

            incoming_towards_right = outgoing_towards_right;
            prev_vertex = cur_vertex;
            cur_vertex = next_vertex;
        }

        let vertices = self.vertices;
        self.events.sort_by(|a, b| {
            if lex_less_than(vertices[a.vertex], vertices[b.vertex]) {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Greater
            }
        });

        if self.decomposition_type == VerticalDecompositionType::Exterior {
            // The exterior has regions which extend infinitely upwards and
            // downwards. Two sentinel edges at ±infinity make them behave
            // like ordinary regions.
            let sentinel = ActiveEdge {
                left_vertex: None,
                right_vertex: None,
                region_left_node: None,
                region_left_node_branch_index: 0,
            };
            self.active_edges = vec![sentinel, sentinel];
        }

        self.nodes = NodePool::with_capacity(num_nodes);
    }

    fn run_sweep(&mut self) {
        for i in 0..self.events.len() {
            let event_index = i;
            if self.events[event_index].incoming_towards_right
                == self.events[event_index].outgoing_towards_right
            {
                self.handle_transition_event(event_index);
            } else if self.events[event_index].outgoing_towards_right {
                self.handle_appear_event(event_index);
            } else {
                self.handle_vanish_event(event_index);
            }
        }
    }

    /// Handles an event where two new edges appear on the sweep line.
    fn handle_appear_event(&mut self, event_index: usize) {
        let vertex = self.events[event_index].vertex;
        let is_concave_corner = self.events[event_index].is_concave_corner;
        let insert_index = self.insert_location(self.vertices[vertex]);

        let num_vertices = self.vertices.len();
        let prev_vertex = prev_cyclic(num_vertices, vertex);
        let next_vertex = next_cyclic(num_vertices, vertex);

        if is_concave_corner {
            // A single region splits into two when going towards the right.
            // The part between the two outgoing edges is outside the region
            // being decomposed.
            let lower_opp_edge = self.active_edges[insert_index - 1];
            let upper_opp_edge = self.active_edges[insert_index];

            let new_node = self.nodes.alloc(Node {
                direction: HorizontalDirection::Right,
                node_type: NodeType::Branch,
                vertex,
                lower_opp_edge: lower_opp_edge.edge(num_vertices),
                upper_opp_edge: upper_opp_edge.edge(num_vertices),
                neighbors: [lower_opp_edge.region_left_node, None, None],
            });

            if let Some(left_node) = lower_opp_edge.region_left_node {
                self.nodes[left_node].neighbors
                    [lower_opp_edge.region_left_node_branch_index as usize] = Some(new_node);
            }

            // The region above the lower opposite edge is now the lower
            // outgoing region.
            self.active_edges[insert_index - 1].region_left_node = Some(new_node);
            self.active_edges[insert_index - 1].region_left_node_branch_index = 1;

            let (lower_right_vertex, upper_right_vertex) = match self.decomposition_type {
                VerticalDecompositionType::Interior => (prev_vertex, next_vertex),
                VerticalDecompositionType::Exterior => (next_vertex, prev_vertex),
            };

            self.active_edges.insert(
                insert_index,
                ActiveEdge {
                    left_vertex: Some(vertex),
                    right_vertex: Some(upper_right_vertex),
                    region_left_node: Some(new_node),
                    region_left_node_branch_index: 2,
                },
            );
            self.active_edges.insert(
                insert_index,
                ActiveEdge {
                    left_vertex: Some(vertex),
                    right_vertex: Some(lower_right_vertex),
                    region_left_node: None,
                    region_left_node_branch_index: 0,
                },
            );
        } else {
            // A convex side vertex opens one new region, without a left
            // node. The region above the upper outgoing edge is outside the
            // region being decomposed.
            let (lower_right_vertex, upper_right_vertex, lower_appearing_edge, upper_appearing_edge) =
                match self.decomposition_type {
                    VerticalDecompositionType::Interior => (
                        next_vertex,
                        prev_vertex,
                        Edge { start: vertex, end: next_vertex },
                        Edge { start: prev_vertex, end: vertex },
                    ),
                    VerticalDecompositionType::Exterior => (
                        prev_vertex,
                        next_vertex,
                        Edge { start: prev_vertex, end: vertex },
                        Edge { start: vertex, end: next_vertex },
                    ),
                };

            let new_node = self.nodes.alloc(Node {
                direction: HorizontalDirection::Left,
                node_type: NodeType::Leaf,
                vertex,
                lower_opp_edge: Some(lower_appearing_edge),
                upper_opp_edge: Some(upper_appearing_edge),
                neighbors: [None; 3],
            });

            self.active_edges.insert(
                insert_index,
                ActiveEdge {
                    left_vertex: Some(vertex),
                    right_vertex: Some(upper_right_vertex),
                    region_left_node: None,
                    region_left_node_branch_index: 0,
                },
            );
            self.active_edges.insert(
                insert_index,
                ActiveEdge {
                    left_vertex: Some(vertex),
                    right_vertex: Some(lower_right_vertex),
                    region_left_node: Some(new_node),
                    region_left_node_branch_index: 0,
                },
            );
        }
    }

    /// Handles an event where two edges vanish from the sweep line.
    fn handle_vanish_event(&mut self, event_index: usize) {
        let vertex = self.events[event_index].vertex;
        let is_concave_corner = self.events[event_index].is_concave_corner;
        let num_vertices = self.vertices.len();

        let removal_index = self
            .active_edges
            .iter()
            .position(|e| e.right_vertex == Some(vertex))
            .expect("a vanish event's vertex ends an active edge");

        if is_concave_corner {
            // Two regions join and continue as one towards the right.
            let lower_opp_edge = self.active_edges[removal_index - 1];
            let upper_opp_edge = self.active_edges[removal_index + 2];
            let upper_vanishing_edge = self.active_edges[removal_index + 1];

            let node = self.nodes.alloc(Node {
                direction: HorizontalDirection::Left,
                node_type: NodeType::Branch,
                vertex,
                lower_opp_edge: lower_opp_edge.edge(num_vertices),
                upper_opp_edge: upper_opp_edge.edge(num_vertices),
                neighbors: [
                    None,
                    lower_opp_edge.region_left_node,
                    upper_vanishing_edge.region_left_node,
                ],
            });

            let lower_left_node =
                lower_opp_edge.region_left_node.expect("closing regions have a left node");
            self.nodes[lower_left_node].neighbors
                [lower_opp_edge.region_left_node_branch_index as usize] = Some(node);
            let upper_left_node =
                upper_vanishing_edge.region_left_node.expect("closing regions have a left node");
            self.nodes[upper_left_node].neighbors
                [upper_vanishing_edge.region_left_node_branch_index as usize] = Some(node);

            self.active_edges[removal_index - 1].region_left_node = Some(node);
            self.active_edges[removal_index - 1].region_left_node_branch_index = 0;
        } else {
            // A convex side vertex ends the region between the two vanishing
            // edges.
            let lower_vanishing_edge = self.active_edges[removal_index];
            let upper_vanishing_edge = self.active_edges[removal_index + 1];

            let node = self.nodes.alloc(Node {
                direction: HorizontalDirection::Right,
                node_type: NodeType::Leaf,
                vertex,
                lower_opp_edge: lower_vanishing_edge.edge(num_vertices),
                upper_opp_edge: upper_vanishing_edge.edge(num_vertices),
                neighbors: [lower_vanishing_edge.region_left_node, None, None],
            });

            let left_node =
                lower_vanishing_edge.region_left_node.expect("closing regions have a left node");
            self.nodes[left_node].neighbors
                [lower_vanishing_edge.region_left_node_branch_index as usize] = Some(node);
        }

        self.active_edges.drain(removal_index..removal_index + 2);
    }

    /// Handles an event where one active edge continues into the next.
    fn handle_transition_event(&mut self, event_index: usize) {
        let vertex = self.events[event_index].vertex;
        let outgoing_towards_right = self.events[event_index].outgoing_towards_right;
        let num_vertices = self.vertices.len();

        for active_edge in self.active_edges.iter_mut() {
            if active_edge.right_vertex == Some(vertex) {
                active_edge.left_vertex = active_edge.right_vertex;
                active_edge.right_vertex = Some(if outgoing_towards_right {
                    next_cyclic(num_vertices, vertex)
                } else {
                    prev_cyclic(num_vertices, vertex)
                });
                break;
            }
        }
    }

    /// Returns the index at which the edges of a vertex at `point` should be
    /// inserted into the active edge list.
    fn insert_location(&self, point: Point2) -> usize {
        let (mut range_begin, mut range_end) = match self.decomposition_type {
            VerticalDecompositionType::Interior => (0, self.active_edges.len()),
            // The sentinels bracket every vertex, so they can be skipped.
            VerticalDecompositionType::Exterior => (1, self.active_edges.len() - 1),
        };

        while range_begin != range_end {
            let range_mid = (range_begin + range_end) / 2;
            let mid_edge = &self.active_edges[range_mid];
            let left = self.vertices[mid_edge.left_vertex.expect("sentinels are excluded")];
            let right = self.vertices[mid_edge.right_vertex.expect("sentinels are excluded")];
            if cross(right - left, point - left) < ScalarDeg2::ZERO {
                range_end = range_mid;
            } else {
                range_begin = range_mid + 1;
            }
        }

        range_begin
    }
}
