use glam::Vec3;

use crate::{BvhView, Hit, LinkedNode, TrianglesView};

#[derive(Copy, Clone, Debug, Default)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: 1.0 / direction,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Traces this ray and returns its nearest hit, together with the number
    /// of nodes visited on the way (useful for heatmaps).
    pub fn trace_nearest(
        self,
        triangles: TrianglesView,
        bvh: BvhView,
    ) -> (Hit, u32) {
        let mut hit = Hit::none();

        let traversed_nodes =
            self.trace(triangles, bvh, TracingMode::Nearest, &mut hit);

        (hit, traversed_nodes)
    }

    /// Traces this ray and returns whether it hits anything up to the given
    /// distance.
    pub fn trace_any(
        self,
        triangles: TrianglesView,
        bvh: BvhView,
        max_distance: f32,
    ) -> bool {
        let mut hit = Hit {
            distance: max_distance,
            ..Hit::none()
        };

        self.trace(triangles, bvh, TracingMode::Any, &mut hit);

        hit.distance < max_distance
    }

    fn trace(
        self,
        triangles: TrianglesView,
        bvh: BvhView,
        mode: TracingMode,
        hit: &mut Hit,
    ) -> u32 {
        let mut traversed_nodes = 0;

        // Index into the `bvh` array; points at the currently processed node.
        //
        // There's no stack - each node tells us where to go next, depending on
        // whether we've hit its bounding box or not.
        let mut bvh_ptr = if bvh.is_empty() {
            LinkedNode::TERMINAL
        } else {
            0
        };

        while bvh_ptr != LinkedNode::TERMINAL {
            traversed_nodes += 1;

            let node = bvh.get(bvh_ptr as u32);

            // Boxes further away than our current best shot cannot contain
            // anything better, so they get skipped together with their entire
            // subtree
            if !self.intersects_box(node.min(), node.max(), hit.distance) {
                bvh_ptr = node.miss_ptr();
                continue;
            }

            for primitive_id in node.primitives().into_iter().flatten() {
                let triangle = triangles.get(primitive_id);

                let Some(triangle_hit) = triangle.hit(self) else {
                    continue;
                };

                if triangle_hit.distance >= hit.distance {
                    continue;
                }

                let normal = if triangle_hit.normal.dot(self.direction) > 0.0 {
                    -triangle_hit.normal
                } else {
                    triangle_hit.normal
                };

                *hit = Hit {
                    distance: triangle_hit.distance,
                    point: self.at(triangle_hit.distance),
                    normal,
                    primitive_id,
                    material_id: triangle.material_id(),
                };

                if let TracingMode::Any = mode {
                    return traversed_nodes;
                }
            }

            bvh_ptr = node.hit_ptr();
        }

        traversed_nodes
    }

    /// Slab test; returns whether this ray enters given box no further than
    /// `best_distance`.
    ///
    /// Zero direction components yield infinities, which the min/max ordering
    /// below deals with - except when the origin lies exactly on the box's
    /// face, where `0 * inf` gives NaN; such a ray runs within that slab, so
    /// the slab spans the entire line.
    pub fn intersects_box(
        self,
        aabb_min: Vec3,
        aabb_max: Vec3,
        best_distance: f32,
    ) -> bool {
        let hit_min = (aabb_min - self.origin) * self.inv_direction;
        let hit_max = (aabb_max - self.origin) * self.inv_direction;
        let on_face = hit_min.is_nan_mask() | hit_max.is_nan_mask();

        let tmin = Vec3::select(
            on_face,
            Vec3::NEG_INFINITY,
            hit_min.min(hit_max),
        )
        .max_element();

        let tmax =
            Vec3::select(on_face, Vec3::INFINITY, hit_min.max(hit_max))
                .min_element();

        tmax >= tmin && tmax >= 0.0 && tmin <= best_distance
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TracingMode {
    Nearest,
    Any,
}
