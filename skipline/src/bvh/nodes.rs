use std::ops;

use super::{BvhNode, BvhNodeId};

/// Arena of nodes forming a (not yet linked) tree.
///
/// Children refer to each other through [`BvhNodeId`]s; where the root lives
/// depends on the builder - SAH puts it first, clustering puts it last.
#[derive(Clone, Debug, Default)]
pub struct BvhNodes {
    nodes: Vec<BvhNode>,
    root: Option<BvhNodeId>,
}

impl BvhNodes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
        }
    }

    pub fn add(&mut self, node: BvhNode) -> BvhNodeId {
        self.nodes.push(node);

        BvhNodeId::new((self.nodes.len() - 1) as u32)
    }

    pub fn set_root(&mut self, id: BvhNodeId) {
        self.root = Some(id);
    }

    pub fn root(&self) -> Option<BvhNodeId> {
        self.root
    }

    pub fn get(&self, id: BvhNodeId) -> Option<&BvhNode> {
        self.nodes.get(id.get() as usize)
    }

    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = (BvhNodeId, &BvhNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(id, node)| (BvhNodeId::new(id as u32), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ops::Index<BvhNodeId> for BvhNodes {
    type Output = BvhNode;

    fn index(&self, index: BvhNodeId) -> &Self::Output {
        &self.nodes[index.get() as usize]
    }
}

impl ops::IndexMut<BvhNodeId> for BvhNodes {
    fn index_mut(&mut self, index: BvhNodeId) -> &mut Self::Output {
        &mut self.nodes[index.get() as usize]
    }
}
