//! Bounding volume hierarchy builder for static triangle meshes.
//!
//! The hierarchy can be built either top-down (using the surface area
//! heuristic) or bottom-up (by greedily clustering nearby primitives); then
//! it's verified and linked into a flat array that can be traversed without a
//! stack - either here, through [`trace_closest_hit()`], or on the GPU, using
//! the same kernel from `skipline-gpu`.
//!
//! ```no_run
//! use skipline::gpu::prelude::*;
//! use skipline::{Bvh, BvhConfig};
//!
//! let triangles = vec![Triangle::new(
//!     vec3(-1.0, -1.0, -2.0),
//!     vec3(1.0, -1.0, -2.0),
//!     vec3(0.0, 1.0, -2.0),
//!     MaterialId::new(0),
//! )];
//!
//! let bvh = Bvh::build(&triangles, &BvhConfig::default()).unwrap();
//! let ray = Ray::new(Vec3::ZERO, vec3(0.0, 0.0, -1.0));
//!
//! assert!(bvh.trace_nearest(ray, &triangles).is_some());
//! ```

mod bvh;
mod config;
mod tracer;
mod utils;

pub use skipline_gpu as gpu;
pub use skipline_gpu::{
    BvhView, Hit, LinkedNode, MaterialId, PrimitiveId, Ray, Triangle,
    TrianglesView,
};

pub use self::bvh::*;
pub use self::config::*;
pub use self::tracer::*;
pub use self::utils::*;
