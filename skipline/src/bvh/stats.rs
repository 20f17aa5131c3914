use std::fmt;

use crate::{BvhNode, BvhNodes, SahParams};

/// Summary of a built tree's shape and its expected traversal cost.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BvhStats {
    pub nodes: usize,
    pub internal_nodes: usize,
    pub leaves: usize,

    /// Depth of the deepest node; root lives at depth zero
    pub max_depth: usize,

    /// Expected cost of tracing a random ray through the tree:
    ///
    /// ```text
    /// Σ SA(internal) / SA(root) * Ct
    ///     + Σ SA(leaf) / SA(root) * |leaf| * Ci
    /// ```
    ///
    /// Lower is better; useful mostly for comparing builders against each
    /// other on the same scene.
    pub sah_cost: f32,
}

impl BvhStats {
    pub fn new(nodes: &BvhNodes, params: &SahParams) -> Self {
        let mut this = Self::default();

        let Some(root_id) = nodes.root() else {
            return this;
        };

        let root_area = nodes[root_id].bounds().area();

        // Completely flat scenes have nothing to normalize by - in that case
        // every node is assumed to be hit by every ray
        let area_ratio = |node: &BvhNode| {
            if root_area > 0.0 {
                node.bounds().area() / root_area
            } else {
                1.0
            }
        };

        let mut stack = vec![(root_id, 0)];

        while let Some((id, depth)) = stack.pop() {
            let node = &nodes[id];

            this.nodes += 1;
            this.max_depth = this.max_depth.max(depth);

            if let Some([left_id, right_id]) = node.children() {
                this.internal_nodes += 1;
                this.sah_cost += area_ratio(node) * params.traversal_cost;

                stack.push((left_id, depth + 1));
                stack.push((right_id, depth + 1));
            } else {
                this.leaves += 1;

                this.sah_cost += area_ratio(node)
                    * node.primitives().count() as f32
                    * params.intersection_cost;
            }
        }

        this
    }
}

impl fmt::Display for BvhStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes={} (internal={}, leaves={}), max_depth={}, sah_cost={:.2}",
            self.nodes,
            self.internal_nodes,
            self.leaves,
            self.max_depth,
            self.sah_cost
        )
    }
}
