use skipline_gpu::LinkedNode;

use super::{BvhNode, BvhNodeId, BvhNodes};

/// Flattens the tree into a stackless, pre-order array of [`LinkedNode`]s.
///
/// Each node gets two links:
///
/// - `miss` points at the first node after the current subtree (or is
///   [`LinkedNode::TERMINAL`] when the subtree reaches the end of the array),
/// - `hit` points at the first child for internal nodes and is equal to `miss`
///   for leaves.
///
/// Since pre-order places every subtree in a contiguous range starting at its
/// root, both links always point forward - that's what allows the traversal to
/// get away without a stack.
///
/// Nodes unreachable from the root are skipped.
pub fn run(nodes: &BvhNodes, buffer: &mut Vec<LinkedNode>) {
    buffer.clear();

    let Some(root_id) = nodes.root() else {
        return;
    };

    let order = preorder(nodes, root_id);
    let len = order.len();

    assert!(
        len <= i32::MAX as usize,
        "tree is too large to be linked ({len} nodes)"
    );

    // Children come after their parents in pre-order, so walking backwards
    // yields children's sizes before parents need them
    let mut sizes = vec![0; nodes.len()];

    for &id in order.iter().rev() {
        let size = 1 + nodes[id].children().map_or(0, |[left_id, right_id]| {
            sizes[left_id.get() as usize] + sizes[right_id.get() as usize]
        });

        sizes[id.get() as usize] = size;
    }

    buffer.reserve(len);

    for (ptr, &id) in order.iter().enumerate() {
        let node = nodes[id];
        let bounds = node.bounds();
        let size = sizes[id.get() as usize];

        let miss_ptr = if ptr + size == len {
            LinkedNode::TERMINAL
        } else {
            (ptr + size) as i32
        };

        let linked = match node {
            BvhNode::Internal { .. } => LinkedNode::internal(
                bounds.min(),
                bounds.max(),
                ptr as i32 + 1,
                miss_ptr,
            ),

            BvhNode::Leaf {
                primitive_a,
                primitive_b,
                ..
            } => {
                // Negative ids mark internal nodes
                for primitive_id in node.primitives() {
                    assert!(
                        primitive_id.get() <= i32::MAX as u32,
                        "primitive {} is out of linkable range",
                        primitive_id.get()
                    );
                }

                LinkedNode::leaf(
                    bounds.min(),
                    bounds.max(),
                    primitive_a,
                    primitive_b,
                    miss_ptr,
                    miss_ptr,
                )
            }
        };

        for link in [linked.hit_ptr(), linked.miss_ptr()] {
            assert!(
                link == LinkedNode::TERMINAL
                    || (link as usize > ptr && (link as usize) < len),
                "node #{ptr} got a backward or out-of-bounds link: {link}"
            );
        }

        buffer.push(linked);
    }

    log::debug!("Linked tree; nodes={}", buffer.len());
}

/// Returns ids of nodes reachable from `root_id`, in pre-order (node, then
/// its left subtree, then its right subtree).
fn preorder(nodes: &BvhNodes, root_id: BvhNodeId) -> Vec<BvhNodeId> {
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack = vec![root_id];

    while let Some(id) = stack.pop() {
        assert!(
            order.len() < nodes.len(),
            "tree contains a cycle or a shared node"
        );

        order.push(id);

        if let Some([left_id, right_id]) = nodes[id].children() {
            stack.push(right_id);
            stack.push(left_id);
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use glam::{vec3, Vec3};
    use skipline_gpu::PrimitiveId;

    use super::*;
    use crate::{builders, random_triangles, BoundingBox};

    fn link(nodes: &BvhNodes) -> Vec<LinkedNode> {
        let mut buffer = Vec::new();

        run(nodes, &mut buffer);
        buffer
    }

    fn leaf(nodes: &mut BvhNodes, x: f32, primitive_id: u32) -> BvhNodeId {
        nodes.add(BvhNode::Leaf {
            bounds: BoundingBox::new(
                vec3(x, 0.0, 0.0),
                vec3(x + 1.0, 1.0, 0.0),
            ),
            primitive_a: PrimitiveId::new(primitive_id),
            primitive_b: None,
        })
    }

    fn internal(
        nodes: &mut BvhNodes,
        left_id: BvhNodeId,
        right_id: BvhNodeId,
    ) -> BvhNodeId {
        let bounds = nodes[left_id].bounds() + nodes[right_id].bounds();

        nodes.add(BvhNode::Internal {
            bounds,
            left_id,
            right_id,
        })
    }

    #[test]
    fn empty() {
        let mut buffer = vec![LinkedNode::default()];

        run(&BvhNodes::default(), &mut buffer);

        assert!(buffer.is_empty());
    }

    #[test]
    fn single_leaf() {
        let mut nodes = BvhNodes::default();
        let root_id = leaf(&mut nodes, 0.0, 0);

        nodes.set_root(root_id);

        let target = link(&nodes);

        assert_eq!(1, target.len());
        assert!(target[0].is_leaf());
        assert_eq!(LinkedNode::TERMINAL, target[0].hit_ptr());
        assert_eq!(LinkedNode::TERMINAL, target[0].miss_ptr());
    }

    #[test]
    #[should_panic(expected = "out of linkable range")]
    fn rejects_unlinkable_primitive_ids() {
        let mut nodes = BvhNodes::default();
        let left_id = leaf(&mut nodes, 0.0, 0);
        let right_id = leaf(&mut nodes, 2.0, i32::MAX as u32 + 1);
        let root_id = internal(&mut nodes, left_id, right_id);

        nodes.set_root(root_id);
        link(&nodes);
    }

    #[test]
    fn links_largest_primitive_id() {
        let mut nodes = BvhNodes::default();
        let root_id = leaf(&mut nodes, 0.0, i32::MAX as u32);

        nodes.set_root(root_id);

        let target = link(&nodes);

        assert!(target[0].is_leaf());

        assert_eq!(
            [Some(PrimitiveId::new(i32::MAX as u32)), None],
            target[0].primitives()
        );
    }

    #[test]
    fn hand_made_tree() {
        //        root
        //       /    \
        //      a      d
        //     / \
        //    b   c
        //
        // Built bottom-up, so that arena order differs from pre-order.
        let mut nodes = BvhNodes::default();
        let b = leaf(&mut nodes, 0.0, 0);
        let c = leaf(&mut nodes, 2.0, 1);
        let d = leaf(&mut nodes, 4.0, 2);
        let a = internal(&mut nodes, b, c);
        let root = internal(&mut nodes, a, d);

        nodes.set_root(root);

        let target = link(&nodes);

        // (hit, miss), in pre-order: root, a, b, c, d
        let links: Vec<_> = target
            .iter()
            .map(|node| (node.hit_ptr(), node.miss_ptr()))
            .collect();

        assert_eq!(vec![(1, -1), (2, 4), (3, 3), (4, 4), (-1, -1)], links);

        assert_eq!(vec3(0.0, 0.0, 0.0), target[0].min());
        assert_eq!(vec3(5.0, 1.0, 0.0), target[0].max());
        assert_eq!(vec3(0.0, 0.0, 0.0), target[1].min());
        assert_eq!(vec3(3.0, 1.0, 0.0), target[1].max());

        let primitives: Vec<_> = target
            .iter()
            .filter(|node| node.is_leaf())
            .map(|node| node.primitives()[0])
            .collect();

        assert_eq!(
            vec![
                Some(PrimitiveId::new(0)),
                Some(PrimitiveId::new(1)),
                Some(PrimitiveId::new(2)),
            ],
            primitives
        );
    }

    #[test]
    fn links_point_forward() {
        let triangles = random_triangles(7, 300);

        for nodes in [
            builders::sah::build(&triangles, &Default::default()),
            builders::clustering::build(&triangles),
        ] {
            let target = link(&nodes);

            assert_eq!(nodes.len(), target.len());

            for (ptr, node) in target.iter().enumerate() {
                for link in [node.hit_ptr(), node.miss_ptr()] {
                    assert!(link == -1 || link as usize > ptr);
                }

                if node.is_leaf() {
                    assert_eq!(node.hit_ptr(), node.miss_ptr());
                } else {
                    assert_eq!(ptr as i32 + 1, node.hit_ptr());
                }
            }
        }
    }

    #[test]
    fn every_walk_terminates() {
        let triangles = random_triangles(8, 200);
        let nodes = builders::sah::build(&triangles, &Default::default());
        let target = link(&nodes);

        // Always following `hit` visits every node; always following `miss`
        // skips straight to the end
        for follow_hit in [true, false] {
            let mut ptr = 0;
            let mut steps = 0;

            while ptr != LinkedNode::TERMINAL {
                let node = target[ptr as usize];

                ptr = if follow_hit {
                    node.hit_ptr()
                } else {
                    node.miss_ptr()
                };

                steps += 1;

                assert!(steps <= target.len());
            }

            if follow_hit {
                assert_eq!(target.len(), steps);
            } else {
                assert_eq!(1, steps);
            }
        }
    }

    #[test]
    fn keeps_boxes() {
        let triangles = random_triangles(9, 50);
        let nodes = builders::clustering::build(&triangles);
        let target = link(&nodes);

        let mut expected: Vec<_> = nodes
            .iter()
            .map(|(_, node)| (node.bounds().min(), node.bounds().max()))
            .map(|(min, max)| [min.to_array(), max.to_array()])
            .collect();

        let mut actual: Vec<_> = target
            .iter()
            .map(|node| [node.min().to_array(), node.max().to_array()])
            .collect();

        let sort = |items: &mut Vec<[[f32; 3]; 2]>| {
            items.sort_by(|a, b| a.partial_cmp(b).unwrap());
        };

        sort(&mut expected);
        sort(&mut actual);

        assert_eq!(expected, actual);
        assert!(target.iter().all(|node| node.min() != Vec3::MAX));
    }
}
