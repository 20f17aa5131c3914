/// Opaque material reference carried by each triangle.
///
/// The BVH never looks into materials - it only passes this id through to
/// the hit, so that the shading side can look the material up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialId(u32);

impl MaterialId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}
