//! Plain-old-data structs and kernels shared between the BVH builder and the
//! code that traverses the flattened hierarchy (CPU ray casters and GPU
//! compute kernels alike).
//!
//! Nothing in here allocates, recurses or mutates the hierarchy - a traversal
//! owns only its ray and a single node pointer.

#![allow(clippy::manual_range_contains)]

mod bvh_view;
mod hit;
mod linked_node;
mod material;
mod ray;
mod triangle;
mod triangles;

pub use self::bvh_view::*;
pub use self::hit::*;
pub use self::linked_node::*;
pub use self::material::*;
pub use self::ray::*;
pub use self::triangle::*;
pub use self::triangles::*;

pub mod prelude {
    pub use glam::*;

    pub use crate::*;
}
