use std::collections::VecDeque;

use skipline_gpu::Triangle;

use crate::{Axis, BoundingBox, BvhNode, BvhNodes, BvhPrimitive, SahParams};

/// Builds BVH by recursively partitioning the triangles using SAH.
///
/// Each subset gets sorted by centroids along each axis in turn, then up to
/// [`SahParams::max_split_candidates`] split positions per axis are evaluated
/// and the cheapest one (across all axes) wins. Subsets of one or two
/// triangles become leaves.
///
/// Root ends up at id zero; children are always allocated in adjacent pairs,
/// after their parent.
///
/// Thanks to:
/// https://jacco.ompf2.com/2022/04/13/how-to-build-a-bvh-part-1-basics/.
pub fn build(triangles: &[Triangle], params: &SahParams) -> BvhNodes {
    let mut primitives = BvhPrimitive::collect(triangles);

    if primitives.is_empty() {
        return Default::default();
    }

    let mut nodes = BvhNodes::with_capacity(2 * primitives.len() - 1);
    let root_id = nodes.add(BvhNode::default());

    nodes.set_root(root_id);

    let mut queue = VecDeque::from_iter([(root_id, 0..primitives.len())]);

    while let Some((node_id, range)) = queue.pop_front() {
        let subset = &mut primitives[range.clone()];
        let bounds: BoundingBox = subset.iter().map(|p| p.bounds).collect();

        if subset.len() <= 2 {
            nodes[node_id] = BvhNode::Leaf {
                bounds,
                primitive_a: subset[0].id,
                primitive_b: subset.get(1).map(|p| p.id),
            };

            continue;
        }

        let pivot = range.start + find_split(subset, bounds, params);
        let left_id = nodes.add(BvhNode::default());
        let right_id = nodes.add(BvhNode::default());

        nodes[node_id] = BvhNode::Internal {
            bounds,
            left_id,
            right_id,
        };

        queue.push_back((left_id, range.start..pivot));
        queue.push_back((right_id, pivot..range.end));
    }

    log::debug!(
        "Built SAH tree; triangles={}, nodes={}",
        triangles.len(),
        nodes.len()
    );

    nodes
}

#[derive(Clone, Copy, Debug)]
struct SplittingPlane {
    split_by: Axis,
    split_at: usize,
    split_cost: f32,
}

/// Finds the cheapest split of given primitives, reorders them so that the
/// left side comes first and returns the number of primitives on the left
/// side (always within `1..primitives.len()`).
fn find_split(
    primitives: &mut [BvhPrimitive],
    bounds: BoundingBox,
    params: &SahParams,
) -> usize {
    let len = primitives.len();
    let total_area = bounds.area();

    // Degenerate subsets (e.g. a bunch of coincident triangles) have no area
    // to optimize for - cut them in half and move on
    if total_area <= 0.0 {
        return len / 2;
    }

    let stride = len / params.max_split_candidates.max(1) + 1;

    // left_areas[i] = area of primitives[..i]
    // right_areas[i] = area of primitives[i..]
    let mut left_areas = vec![0.0; len];
    let mut right_areas = vec![0.0; len];
    let mut best: Option<SplittingPlane> = None;

    for split_by in Axis::all() {
        sort(primitives, split_by);

        let mut left_bb = BoundingBox::default();
        let mut right_bb = BoundingBox::default();

        for i in 1..len {
            left_bb += primitives[i - 1].bounds;
            left_areas[i] = left_bb.area();

            right_bb += primitives[len - i].bounds;
            right_areas[len - i] = right_bb.area();
        }

        for split_at in (1..len).step_by(stride) {
            let left_count = split_at as f32;
            let right_count = (len - split_at) as f32;

            let split_cost = params.traversal_cost
                + (left_areas[split_at] / total_area)
                    * left_count
                    * params.intersection_cost
                + (right_areas[split_at] / total_area)
                    * right_count
                    * params.intersection_cost;

            let is_current_split_better =
                best.map_or(true, |best| split_cost < best.split_cost);

            if is_current_split_better {
                best = Some(SplittingPlane {
                    split_by,
                    split_at,
                    split_cost,
                });
            }
        }
    }

    match best {
        Some(best) => {
            sort(primitives, best.split_by);
            best.split_at
        }

        // Unreachable for `len > 1`, since `1..len` always yields at least
        // one candidate
        None => len / 2,
    }
}

/// Sorts primitives by their centers along given axis.
///
/// Ties get resolved by primitive ids, so that sorting by the same axis always
/// yields the same order - no matter which axis we've sorted by before.
fn sort(primitives: &mut [BvhPrimitive], axis: Axis) {
    primitives.sort_unstable_by(|a, b| {
        a.center[axis]
            .total_cmp(&b.center[axis])
            .then(a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use glam::vec3;
    use skipline_gpu::{MaterialId, PrimitiveId};

    use super::*;
    use crate::{random_triangles, unit_triangle, verifier, BvhNodeId};

    fn leaves(nodes: &BvhNodes) -> Vec<Vec<PrimitiveId>> {
        nodes
            .iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.primitives().collect())
            .collect()
    }

    #[test]
    fn empty() {
        let target = build(&[], &Default::default());

        assert!(target.is_empty());
        assert_eq!(None, target.root());
    }

    #[test]
    fn single_triangle() {
        let triangles = [unit_triangle(vec3(1.0, 2.0, 3.0), 0)];
        let target = build(&triangles, &Default::default());

        assert_eq!(1, target.len());

        assert_eq!(
            BvhNode::Leaf {
                bounds: BoundingBox::new(
                    vec3(1.0, 2.0, 3.0),
                    vec3(2.0, 3.0, 3.0)
                ),
                primitive_a: PrimitiveId::new(0),
                primitive_b: None,
            },
            target[target.root().unwrap()]
        );
    }

    #[test]
    fn two_triangles() {
        let triangles = [
            unit_triangle(vec3(0.0, 0.0, 0.0), 0),
            unit_triangle(vec3(100.0, 0.0, 0.0), 1),
        ];

        let target = build(&triangles, &Default::default());

        assert_eq!(1, target.len());

        assert_eq!(
            vec![vec![PrimitiveId::new(0), PrimitiveId::new(1)]],
            leaves(&target)
        );
    }

    #[test]
    fn separates_clusters() {
        // Two clusters, far apart along the Z axis, with primitives
        // interleaved in the input
        let triangles: Vec<_> = (0..8)
            .map(|idx| {
                let z = if idx % 2 == 0 { 0.0 } else { 1000.0 };

                unit_triangle(vec3(idx as f32 * 0.1, 0.0, z), idx)
            })
            .collect();

        let target = build(&triangles, &Default::default());
        let root = target[target.root().unwrap()];
        let [left_id, right_id] = root.children().unwrap();

        assert_eq!(0.0, target[left_id].bounds().max().z);
        assert_eq!(1000.0, target[right_id].bounds().min().z);
        assert!(verifier::verify(&target, &triangles));
    }

    #[test]
    fn leaves_hold_at_most_two_triangles() {
        let triangles = random_triangles(123, 257);
        let target = build(&triangles, &Default::default());

        // A full binary tree with `n` leaves has `2n - 1` nodes
        let leaves = leaves(&target);

        assert_eq!(2 * leaves.len() - 1, target.len());

        for leaf in &leaves {
            assert!(leaf.len() == 1 || leaf.len() == 2);
        }

        let mut ids: Vec<_> = leaves.into_iter().flatten().collect();

        ids.sort();

        assert_eq!(
            (0..257).map(PrimitiveId::new).collect::<Vec<_>>(),
            ids
        );
    }

    #[test]
    fn children_follow_parents() {
        let triangles = random_triangles(321, 100);
        let target = build(&triangles, &Default::default());

        assert_eq!(Some(BvhNodeId::new(0)), target.root());

        for (id, node) in target.iter() {
            if let Some([left_id, right_id]) = node.children() {
                assert!(left_id > id);
                assert_eq!(left_id.get() + 1, right_id.get());
            }
        }
    }

    #[test]
    fn produces_valid_trees() {
        for (seed, count) in [(1, 3), (2, 10), (3, 100), (4, 1000)] {
            let triangles = random_triangles(seed, count);
            let target = build(&triangles, &Default::default());

            assert_eq!(Ok(()), verifier::validate(&target, &triangles));
        }
    }

    #[test]
    fn respects_max_split_candidates() {
        let triangles = random_triangles(5, 500);

        let target = build(
            &triangles,
            &SahParams {
                max_split_candidates: 1,
                ..Default::default()
            },
        );

        assert_eq!(Ok(()), verifier::validate(&target, &triangles));
    }

    #[test]
    fn degenerate_triangles() {
        // All triangles collapse into the same line, so every candidate box
        // has zero area
        let triangles: Vec<_> = (0..7)
            .map(|idx| {
                Triangle::new(
                    vec3(0.0, 0.0, 0.0),
                    vec3(1.0, 0.0, 0.0),
                    vec3(2.0, 0.0, 0.0),
                    MaterialId::new(idx),
                )
            })
            .collect();

        let target = build(&triangles, &Default::default());

        for (_, node) in target.iter() {
            assert!(!node.bounds().min().is_nan());
            assert!(!node.bounds().max().is_nan());
        }

        for leaf in leaves(&target) {
            assert!(leaf.len() <= 2);
        }

        assert_eq!(Ok(()), verifier::validate(&target, &triangles));
    }
}
