pub mod builders;
pub mod debug;
pub mod linker;
mod node;
mod nodes;
mod primitive;
mod stats;
pub mod verifier;

use skipline_gpu::{BvhView, Hit, LinkedNode, Ray, Triangle, TrianglesView};

pub use self::node::*;
pub use self::nodes::*;
pub use self::primitive::*;
pub use self::stats::*;
use crate::{measure, BvhConfig, ConfigError};

/// Bounding volume hierarchy over a static list of triangles, in both forms:
/// as a tree (handy for inspecting) and as a linked array (ready for the
/// stackless traversal, either here or on the GPU).
///
/// Triangles themselves are not owned - the hierarchy refers to them through
/// their indices, so the same slice has to be passed to the tracing functions.
#[derive(Clone, Debug, Default)]
pub struct Bvh {
    nodes: BvhNodes,
    linked: Vec<LinkedNode>,
    verified: Option<bool>,
    stats: BvhStats,
}

impl Bvh {
    pub fn build(
        triangles: &[Triangle],
        config: &BvhConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        log::info!(
            "Building BVH; triangles={}, builder={}",
            triangles.len(),
            config.builder
        );

        let nodes =
            measure("bvh.build", || builders::build(triangles, config));

        let verified = config.verify.then(|| {
            measure("bvh.verify", || verifier::verify(&nodes, triangles))
        });

        let mut linked = Vec::new();

        measure("bvh.link", || linker::run(&nodes, &mut linked));

        let stats = BvhStats::new(&nodes, &config.sah);

        log::info!("BVH ready; {stats}");

        Ok(Self {
            nodes,
            linked,
            verified,
            stats,
        })
    }

    pub fn nodes(&self) -> &BvhNodes {
        &self.nodes
    }

    pub fn linked(&self) -> &[LinkedNode] {
        &self.linked
    }

    /// Returns the verifier's verdict, or `None` if verification was disabled
    /// through [`BvhConfig::verify`].
    pub fn verified(&self) -> Option<bool> {
        self.verified
    }

    pub fn stats(&self) -> &BvhStats {
        &self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.linked.is_empty()
    }

    pub fn view(&self) -> BvhView<'_> {
        BvhView::new(&self.linked)
    }

    /// Returns the linked nodes as raw bytes, ready to be uploaded into a
    /// storage buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.linked)
    }

    pub fn trace_nearest(
        &self,
        ray: Ray,
        triangles: &[Triangle],
    ) -> Option<Hit> {
        let (hit, _) =
            ray.trace_nearest(TrianglesView::new(triangles), self.view());

        hit.into_option()
    }

    /// Returns whether given ray hits anything closer than `max_distance`.
    pub fn trace_any(
        &self,
        ray: Ray,
        triangles: &[Triangle],
        max_distance: f32,
    ) -> bool {
        ray.trace_any(TrianglesView::new(triangles), self.view(), max_distance)
    }
}
