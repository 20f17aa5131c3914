use glam::Vec3;
use skipline_gpu::{
    BvhView, Hit, LinkedNode, PrimitiveId, Ray, Triangle, TrianglesView,
};

/// Returns the nearest hit of given ray against a linked hierarchy.
///
/// `linked` must come from [`crate::linker::run()`] over a tree built for
/// exactly these `triangles`.
pub fn trace_closest_hit(
    origin: Vec3,
    direction: Vec3,
    linked: &[LinkedNode],
    triangles: &[Triangle],
) -> Option<Hit> {
    let (hit, _) = Ray::new(origin, direction)
        .trace_nearest(TrianglesView::new(triangles), BvhView::new(linked));

    hit.into_option()
}

/// Returns the nearest hit of given ray by testing each triangle in turn.
///
/// Slow, but trivially correct - that's what the hierarchy gets compared
/// against.
pub fn trace_brute_force(ray: Ray, triangles: &[Triangle]) -> Option<Hit> {
    let mut hit = Hit::none();

    for (id, triangle) in triangles.iter().enumerate() {
        let Some(triangle_hit) = triangle.hit(ray) else {
            continue;
        };

        if triangle_hit.distance >= hit.distance {
            continue;
        }

        let normal = if triangle_hit.normal.dot(ray.direction()) > 0.0 {
            -triangle_hit.normal
        } else {
            triangle_hit.normal
        };

        hit = Hit {
            distance: triangle_hit.distance,
            point: ray.at(triangle_hit.distance),
            normal,
            primitive_id: PrimitiveId::new(id as u32),
            material_id: triangle.material_id(),
        };
    }

    hit.into_option()
}
