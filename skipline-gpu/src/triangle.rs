use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

use crate::{Hit, MaterialId, Ray};

/// Triangle as uploaded to the GPU.
///
/// Layout:
///
/// - `d0.xyz` = first vertex, `d0.w` = material id (bit-casted),
/// - `d1.xyz` = second vertex,
/// - `d2.xyz` = third vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Triangle {
    pub d0: Vec4,
    pub d1: Vec4,
    pub d2: Vec4,
}

impl Triangle {
    /// Determinants smaller than this mean the ray runs parallel to the
    /// triangle's plane
    pub const PARALLEL_EPSILON: f32 = 0.0000001;

    pub fn new(
        position0: Vec3,
        position1: Vec3,
        position2: Vec3,
        material_id: MaterialId,
    ) -> Self {
        Self {
            d0: position0.extend(f32::from_bits(material_id.get())),
            d1: position1.extend(0.0),
            d2: position2.extend(0.0),
        }
    }

    pub fn position0(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn position1(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn position2(&self) -> Vec3 {
        self.d2.xyz()
    }

    pub fn positions(&self) -> [Vec3; 3] {
        [self.position0(), self.position1(), self.position2()]
    }

    pub fn material_id(&self) -> MaterialId {
        MaterialId::new(self.d0.w.to_bits())
    }

    pub fn center(&self) -> Vec3 {
        self.positions().into_iter().sum::<Vec3>() / 3.0
    }

    /// Intersects this triangle using the Möller-Trumbore algorithm.
    pub fn hit(&self, ray: Ray) -> Option<TriangleHit> {
        let v0v1 = self.position1() - self.position0();
        let v0v2 = self.position2() - self.position0();

        // ---

        let pvec = ray.direction().cross(v0v2);
        let det = v0v1.dot(pvec);

        if det.abs() < Self::PARALLEL_EPSILON {
            return None;
        }

        // ---

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - self.position0();
        let u = tvec.dot(pvec) * inv_det;
        let qvec = tvec.cross(v0v1);
        let v = ray.direction().dot(qvec) * inv_det;
        let distance = v0v2.dot(qvec) * inv_det;

        if (u < 0.0)
            | (u > 1.0)
            | (v < 0.0)
            | (u + v > 1.0)
            | (distance <= Hit::MIN_DISTANCE)
        {
            return None;
        }

        Some(TriangleHit {
            distance,
            normal: v0v1.cross(v0v2).normalize(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
    pub distance: f32,

    /// Geometric normal, as defined by the vertex winding (i.e. not flipped
    /// towards the ray)
    pub normal: Vec3,
}

/// Index of a triangle within the caller's triangle slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveId(u32);

impl PrimitiveId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}
