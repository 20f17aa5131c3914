pub mod clustering;
pub mod sah;

use skipline_gpu::Triangle;

use crate::{BuilderKind, BvhConfig, BvhNodes};

/// Builds the tree using whichever builder the config asks for.
pub fn build(triangles: &[Triangle], config: &BvhConfig) -> BvhNodes {
    match config.builder {
        BuilderKind::Sah => sah::build(triangles, &config.sah),
        BuilderKind::Clustering => clustering::build(triangles),
    }
}
