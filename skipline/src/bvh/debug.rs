//! Helpers for eyeballing the hierarchy - they turn node boxes into regular
//! triangles, which can then be traced (or rasterized) together with, or
//! instead of, the actual scene.

use std::collections::VecDeque;

use glam::vec3;
use skipline_gpu::{MaterialId, Triangle};

use crate::{BoundingBox, BvhNodes};

/// Returns boxes of all nodes lying exactly at given depth (root lives at
/// depth zero), in breadth-first order.
///
/// Branches which end (in leaves) before reaching that depth don't contribute
/// anything.
pub fn boxes_at_depth(nodes: &BvhNodes, depth: usize) -> Vec<BoundingBox> {
    let mut boxes = Vec::new();
    let mut queue = VecDeque::from_iter(nodes.root().map(|id| (id, 0)));

    while let Some((id, node_depth)) = queue.pop_front() {
        let node = &nodes[id];

        if node_depth == depth {
            boxes.push(node.bounds());
            continue;
        }

        if let Some(children) = node.children() {
            queue.extend(children.map(|child_id| (child_id, node_depth + 1)));
        }
    }

    boxes
}

/// Returns [`boxes_at_depth()`], with each box converted into 12 triangles
/// (two per face) of given material.
pub fn box_triangles(
    nodes: &BvhNodes,
    depth: usize,
    material_id: MaterialId,
) -> Vec<Triangle> {
    boxes_at_depth(nodes, depth)
        .into_iter()
        .flat_map(|bounds| box_to_triangles(bounds, material_id))
        .collect()
}

fn box_to_triangles(
    bounds: BoundingBox,
    material_id: MaterialId,
) -> [Triangle; 12] {
    let (min, max) = (bounds.min(), bounds.max());

    // Corners, indexed by bits: x = 0b001, y = 0b010, z = 0b100
    let corner = |idx: usize| {
        vec3(
            if idx & 0b001 == 0 { min.x } else { max.x },
            if idx & 0b010 == 0 { min.y } else { max.y },
            if idx & 0b100 == 0 { min.z } else { max.z },
        )
    };

    const FACES: [[usize; 4]; 6] = [
        [0, 2, 6, 4], // -x
        [1, 5, 7, 3], // +x
        [0, 4, 5, 1], // -y
        [2, 3, 7, 6], // +y
        [0, 1, 3, 2], // -z
        [4, 6, 7, 5], // +z
    ];

    let mut triangles = [Triangle::default(); 12];

    for (face_idx, [a, b, c, d]) in FACES.into_iter().enumerate() {
        triangles[2 * face_idx] =
            Triangle::new(corner(a), corner(b), corner(c), material_id);

        triangles[2 * face_idx + 1] =
            Triangle::new(corner(a), corner(c), corner(d), material_id);
    }

    triangles
}
