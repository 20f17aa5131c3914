use glam::Vec3;

use crate::{MaterialId, PrimitiveId};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub distance: f32,
    pub point: Vec3,

    /// Geometric normal of the hit triangle, flipped so that it faces the
    /// incoming ray
    pub normal: Vec3,

    pub primitive_id: PrimitiveId,
    pub material_id: MaterialId,
}

impl Hit {
    /// Hits closer than this are treated as the ray re-hitting the surface it
    /// has just started from
    pub const MIN_DISTANCE: f32 = 0.0001;

    pub fn none() -> Self {
        Self {
            distance: f32::MAX,
            point: Default::default(),
            normal: Default::default(),
            primitive_id: Default::default(),
            material_id: Default::default(),
        }
    }

    pub fn is_some(&self) -> bool {
        self.distance < f32::MAX
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    pub fn into_option(self) -> Option<Self> {
        self.is_some().then_some(self)
    }
}

impl Default for Hit {
    fn default() -> Self {
        Self::none()
    }
}
