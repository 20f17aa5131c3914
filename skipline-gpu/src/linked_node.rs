use bytemuck::{Pod, Zeroable};
use glam::{ivec4, IVec4, Vec3, Vec4, Vec4Swizzles};

use crate::PrimitiveId;

/// Node of the flattened hierarchy, as consumed by the stackless traversal.
///
/// Layout:
///
/// - `d0.xyz` = bounding box's min,
/// - `d1.xyz` = bounding box's max,
/// - `d2` = `(primitive_a, primitive_b, hit, miss)`.
///
/// Leaves hold one or two primitives (`primitive_b` is -1 for the former);
/// internal nodes hold -1 in both primitive slots.
///
/// `hit` points at the node to visit next when the ray intersects this node's
/// box, `miss` at the node to visit when it doesn't - either can be
/// [`LinkedNode::TERMINAL`], which ends the traversal.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LinkedNode {
    pub d0: Vec4,
    pub d1: Vec4,
    pub d2: IVec4,
}

impl LinkedNode {
    pub const TERMINAL: i32 = -1;

    pub fn internal(min: Vec3, max: Vec3, hit: i32, miss: i32) -> Self {
        Self {
            d0: min.extend(0.0),
            d1: max.extend(0.0),
            d2: ivec4(Self::TERMINAL, Self::TERMINAL, hit, miss),
        }
    }

    pub fn leaf(
        min: Vec3,
        max: Vec3,
        primitive_a: PrimitiveId,
        primitive_b: Option<PrimitiveId>,
        hit: i32,
        miss: i32,
    ) -> Self {
        let primitive_b =
            primitive_b.map_or(Self::TERMINAL, |id| id.get() as i32);

        Self {
            d0: min.extend(0.0),
            d1: max.extend(0.0),
            d2: ivec4(primitive_a.get() as i32, primitive_b, hit, miss),
        }
    }

    pub fn min(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn max(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn is_leaf(&self) -> bool {
        self.d2.x >= 0
    }

    pub fn primitives(&self) -> [Option<PrimitiveId>; 2] {
        let decode = |id: i32| (id >= 0).then(|| PrimitiveId::new(id as u32));

        [decode(self.d2.x), decode(self.d2.y)]
    }

    pub fn hit_ptr(&self) -> i32 {
        self.d2.z
    }

    pub fn miss_ptr(&self) -> i32 {
        self.d2.w
    }
}
