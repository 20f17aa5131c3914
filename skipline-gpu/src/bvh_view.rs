use crate::LinkedNode;

/// Read-only view into the flattened, linked hierarchy.
///
/// Root always lives at index zero; an empty view represents an empty scene.
#[derive(Clone, Copy)]
pub struct BvhView<'a> {
    buffer: &'a [LinkedNode],
}

impl<'a> BvhView<'a> {
    pub fn new(buffer: &'a [LinkedNode]) -> Self {
        Self { buffer }
    }

    pub fn get(self, ptr: u32) -> LinkedNode {
        self.buffer[ptr as usize]
    }

    pub fn is_empty(self) -> bool {
        self.buffer.is_empty()
    }
}
