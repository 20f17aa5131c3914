use glam::Vec3;
use skipline_gpu::{PrimitiveId, Triangle};

use crate::BoundingBox;

/// Triangle as seen by the builders - just its id, center and bounds.
#[derive(Clone, Copy, Debug)]
pub struct BvhPrimitive {
    pub id: PrimitiveId,
    pub center: Vec3,
    pub bounds: BoundingBox,
}

impl BvhPrimitive {
    pub fn new(id: PrimitiveId, triangle: &Triangle) -> Self {
        Self {
            id,
            center: triangle.center(),
            bounds: BoundingBox::from_triangle(triangle),
        }
    }

    pub fn collect(triangles: &[Triangle]) -> Vec<Self> {
        triangles
            .iter()
            .enumerate()
            .map(|(id, triangle)| {
                Self::new(PrimitiveId::new(id as u32), triangle)
            })
            .collect()
    }
}
