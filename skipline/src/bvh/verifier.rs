use fxhash::FxHashSet;
use skipline_gpu::{PrimitiveId, Triangle};
use thiserror::Error;

use crate::{BoundingBox, BvhNode, BvhNodeId, BvhNodes};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum VerificationError {
    #[error("leaf {node_id:?} does not contain its primitive {primitive_id:?}")]
    PrimitiveNotContained {
        node_id: BvhNodeId,
        primitive_id: PrimitiveId,
    },

    #[error("node {node_id:?} does not contain its child {child_id:?}")]
    ChildNotContained {
        node_id: BvhNodeId,
        child_id: BvhNodeId,
    },

    #[error("node {node_id:?} points at non-existing child {child_id:?}")]
    DanglingChild {
        node_id: BvhNodeId,
        child_id: BvhNodeId,
    },

    #[error(
        "leaf {node_id:?} points at non-existing primitive {primitive_id:?}"
    )]
    DanglingPrimitive {
        node_id: BvhNodeId,
        primitive_id: PrimitiveId,
    },

    #[error("root {0:?} does not exist")]
    DanglingRoot(BvhNodeId),

    #[error("tree has {0} nodes, but no root")]
    MissingRoot(usize),

    #[error("node {0:?} is reachable through more than one parent")]
    SharedNode(BvhNodeId),

    #[error("primitive {0:?} is referenced more than once")]
    DuplicatePrimitive(PrimitiveId),

    #[error("primitive {0:?} is not referenced by any leaf")]
    MissingPrimitive(PrimitiveId),
}

/// Checks whether the tree is valid and logs the outcome; see [`validate()`].
pub fn verify(nodes: &BvhNodes, triangles: &[Triangle]) -> bool {
    log::debug!("Verifying tree; nodes={}", nodes.len());

    match validate(nodes, triangles) {
        Ok(()) => {
            log::debug!("Tree verified");
            true
        }

        Err(err) => {
            log::warn!("Tree verification failed: {err}");
            false
        }
    }
}

/// Checks whether the tree is valid:
///
/// - every leaf's box contains its primitives,
/// - every internal node's box contains its children's boxes,
/// - every node is reachable from the root through exactly one path,
/// - every primitive is referenced by exactly one leaf.
///
/// Both builders compute their boxes incrementally, so a bug anywhere upstream
/// is going to pop up here as a containment violation.
pub fn validate(
    nodes: &BvhNodes,
    triangles: &[Triangle],
) -> Result<(), VerificationError> {
    // Containment, walking from the last-inserted node to the first one
    for (node_id, node) in nodes.iter().rev() {
        match *node {
            BvhNode::Internal {
                bounds,
                left_id,
                right_id,
            } => {
                for child_id in [left_id, right_id] {
                    let child = nodes.get(child_id).ok_or(
                        VerificationError::DanglingChild { node_id, child_id },
                    )?;

                    if !bounds.contains(&child.bounds()) {
                        return Err(VerificationError::ChildNotContained {
                            node_id,
                            child_id,
                        });
                    }
                }
            }

            BvhNode::Leaf { bounds, .. } => {
                for primitive_id in node.primitives() {
                    let triangle = triangles
                        .get(primitive_id.get() as usize)
                        .ok_or(VerificationError::DanglingPrimitive {
                            node_id,
                            primitive_id,
                        })?;

                    if !bounds.contains(&BoundingBox::from_triangle(triangle))
                    {
                        return Err(VerificationError::PrimitiveNotContained {
                            node_id,
                            primitive_id,
                        });
                    }
                }
            }
        }
    }

    // ---

    let Some(root_id) = nodes.root() else {
        if !nodes.is_empty() {
            return Err(VerificationError::MissingRoot(nodes.len()));
        }

        if !triangles.is_empty() {
            return Err(VerificationError::MissingPrimitive(PrimitiveId::new(
                0,
            )));
        }

        return Ok(());
    };

    if nodes.get(root_id).is_none() {
        return Err(VerificationError::DanglingRoot(root_id));
    }

    // ---

    let mut visited_nodes = FxHashSet::default();
    let mut visited_primitives = FxHashSet::default();
    let mut stack = vec![root_id];

    while let Some(node_id) = stack.pop() {
        if !visited_nodes.insert(node_id) {
            return Err(VerificationError::SharedNode(node_id));
        }

        let node = &nodes[node_id];

        for primitive_id in node.primitives() {
            if !visited_primitives.insert(primitive_id) {
                return Err(VerificationError::DuplicatePrimitive(primitive_id));
            }
        }

        if let Some(children) = node.children() {
            stack.extend(children);
        }
    }

    if let Some(primitive_id) = (0..triangles.len())
        .map(|id| PrimitiveId::new(id as u32))
        .find(|id| !visited_primitives.contains(id))
    {
        return Err(VerificationError::MissingPrimitive(primitive_id));
    }

    Ok(())
}
