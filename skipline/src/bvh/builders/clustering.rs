use std::collections::VecDeque;
use std::mem;

use skipline_gpu::Triangle;

use crate::{BoundingBox, BvhNode, BvhNodes, BvhPrimitive};

/// Builds BVH by greedy, bottom-up pairing.
///
/// First the triangles get paired into leaves, then the leaves get paired into
/// internal nodes, then those get paired etc., until there's just one node
/// left - the root, which ends up being the last node in the arena.
///
/// Each pair is formed by taking the first not-yet-paired item and looking
/// for the partner whose combined bounding box has the smallest surface area.
///
/// That lookup is linear, so the whole process is quadratic - fine for tens of
/// thousands of triangles, too slow for millions.
pub fn build(triangles: &[Triangle]) -> BvhNodes {
    let primitives = BvhPrimitive::collect(triangles);

    if primitives.is_empty() {
        return Default::default();
    }

    let mut nodes = BvhNodes::with_capacity(primitives.len());
    let mut level = Vec::with_capacity(primitives.len() / 2 + 1);

    // ---
    // Phase 1: Triangles -> leaves

    let mut remaining = VecDeque::from(primitives);

    while let Some(primitive) = remaining.pop_front() {
        let partner = find_partner(
            primitive.bounds,
            remaining.iter().map(|candidate| candidate.bounds),
        )
        .and_then(|idx| remaining.remove(idx));

        let node = match partner {
            Some(partner) => BvhNode::Leaf {
                bounds: primitive.bounds + partner.bounds,
                primitive_a: primitive.id,
                primitive_b: Some(partner.id),
            },

            None => BvhNode::Leaf {
                bounds: primitive.bounds,
                primitive_a: primitive.id,
                primitive_b: None,
            },
        };

        level.push(nodes.add(node));
    }

    // ---
    // Phase 2: Leaves -> internal nodes -> ... -> root

    while level.len() > 1 {
        let mut remaining = VecDeque::from(mem::take(&mut level));

        while let Some(left_id) = remaining.pop_front() {
            let left_bb = nodes[left_id].bounds();

            let right_id = find_partner(
                left_bb,
                remaining.iter().map(|id| nodes[*id].bounds()),
            )
            .and_then(|idx| remaining.remove(idx));

            // Odd node out at this level - it will get paired with something
            // on the next one
            let Some(right_id) = right_id else {
                level.push(left_id);
                continue;
            };

            level.push(nodes.add(BvhNode::Internal {
                bounds: left_bb + nodes[right_id].bounds(),
                left_id,
                right_id,
            }));
        }
    }

    nodes.set_root(level[0]);

    log::debug!(
        "Built clustered tree; triangles={}, nodes={}",
        triangles.len(),
        nodes.len()
    );

    nodes
}

/// Returns index of the candidate whose box, combined with `bounds`, has the
/// smallest surface area; ties go to the earliest candidate.
fn find_partner(
    bounds: BoundingBox,
    candidates: impl Iterator<Item = BoundingBox>,
) -> Option<usize> {
    candidates
        .map(|candidate| (bounds + candidate).area())
        .enumerate()
        .min_by(|(_, area_a), (_, area_b)| area_a.total_cmp(area_b))
        .map(|(idx, _)| idx)
}
