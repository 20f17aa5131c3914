use skipline_gpu::PrimitiveId;

use crate::BoundingBox;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BvhNode {
    Internal {
        bounds: BoundingBox,
        left_id: BvhNodeId,
        right_id: BvhNodeId,
    },

    Leaf {
        bounds: BoundingBox,
        primitive_a: PrimitiveId,
        primitive_b: Option<PrimitiveId>,
    },
}

impl BvhNode {
    pub fn bounds(&self) -> BoundingBox {
        match self {
            BvhNode::Internal { bounds, .. } => *bounds,
            BvhNode::Leaf { bounds, .. } => *bounds,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    pub fn children(&self) -> Option<[BvhNodeId; 2]> {
        if let BvhNode::Internal {
            left_id, right_id, ..
        } = self
        {
            Some([*left_id, *right_id])
        } else {
            None
        }
    }

    /// Returns primitives referenced by this node; empty for internal nodes.
    pub fn primitives(&self) -> impl Iterator<Item = PrimitiveId> {
        let (a, b) = if let BvhNode::Leaf {
            primitive_a,
            primitive_b,
            ..
        } = self
        {
            (Some(*primitive_a), *primitive_b)
        } else {
            (None, None)
        };

        a.into_iter().chain(b)
    }
}

impl Default for BvhNode {
    fn default() -> Self {
        BvhNode::Leaf {
            bounds: Default::default(),
            primitive_a: Default::default(),
            primitive_b: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BvhNodeId(u32);

impl BvhNodeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}
