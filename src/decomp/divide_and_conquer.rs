//! The divide-and-conquer builder: runs the zigzag phase, then folds the
//! resulting chains with balanced pairwise merges.

use crate::point::Point2;
use crate::{HorizontalDirection, Winding};

use super::{
    exterior_zigzag_phase, interior_zigzag_phase, merge_chain_decompositions, ChainDecomposition,
    NodeId, NodePool,
};

/// The result of [`build_exterior_decomposition`].
///
/// All other nodes are reachable from the two extreme nodes through the
/// `neighbors` links. The extensions of the extreme nodes reach out to
/// infinity on one side.
#[derive(Copy, Clone, Debug)]
pub struct ExteriorDecomposition {
    /// The node at the lexicographically least vertex.
    pub leftmost_node: NodeId,
    /// The node at the lexicographically greatest vertex.
    pub rightmost_node: NodeId,
}

fn merge_chain_decompositions_rec(
    vertices: &[Point2],
    winding: Winding,
    node_pool: &mut NodePool,
    chain_decompositions: &[ChainDecomposition],
) -> ChainDecomposition {
    if chain_decompositions.len() == 1 {
        chain_decompositions[0]
    } else {
        let mid = chain_decompositions.len() / 2;
        let a = merge_chain_decompositions_rec(
            vertices,
            winding,
            node_pool,
            &chain_decompositions[..mid],
        );
        let b = merge_chain_decompositions_rec(
            vertices,
            winding,
            node_pool,
            &chain_decompositions[mid..],
        );
        merge_chain_decompositions(vertices, winding, node_pool, &a, &b)
    }
}

/// Computes the vertical decomposition of the interior of the polygon formed
/// by `vertices`, with the given winding.
///
/// The returned node is some node of the decomposition; all others are
/// reachable through the `neighbors` links. The nodes are allocated from
/// `node_pool`, so the decomposition lives exactly as long as the pool.
pub fn build_interior_decomposition(
    vertices: &[Point2],
    winding: Winding,
    node_pool: &mut NodePool,
) -> NodeId {
    let chain_decompositions = interior_zigzag_phase(vertices, winding, node_pool);
    let merged =
        merge_chain_decompositions_rec(vertices, winding, node_pool, &chain_decompositions);
    merged.first_node
}

/// Computes the vertical decomposition of the exterior of the polygon formed
/// by `vertices`, with `winding` the winding of the polygon itself.
pub fn build_exterior_decomposition(
    vertices: &[Point2],
    winding: Winding,
    node_pool: &mut NodePool,
) -> ExteriorDecomposition {
    // The exterior region winds the other way around.
    let exterior_winding = winding.opposite();

    let chain_decompositions = exterior_zigzag_phase(vertices, exterior_winding, node_pool);

    merge_chain_decompositions_rec(
        vertices,
        exterior_winding,
        node_pool,
        &chain_decompositions.lower_chain_decompositions,
    );
    merge_chain_decompositions_rec(
        vertices,
        exterior_winding,
        node_pool,
        &chain_decompositions.upper_chain_decompositions,
    );

    debug_assert_eq!(
        node_pool[chain_decompositions.leftmost_node].direction,
        HorizontalDirection::Right
    );
    debug_assert_eq!(
        node_pool[chain_decompositions.rightmost_node].direction,
        HorizontalDirection::Left
    );

    ExteriorDecomposition {
        leftmost_node: chain_decompositions.leftmost_node,
        rightmost_node: chain_decompositions.rightmost_node,
    }
}
