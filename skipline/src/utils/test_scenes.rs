use glam::{vec3, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skipline_gpu::{MaterialId, Triangle};

/// Returns a unit-sized triangle lying in the XY plane, with its first vertex
/// at `at`.
pub fn unit_triangle(at: Vec3, material_id: u32) -> Triangle {
    Triangle::new(
        at,
        at + vec3(1.0, 0.0, 0.0),
        at + vec3(0.0, 1.0, 0.0),
        MaterialId::new(material_id),
    )
}

/// Returns a soup of small, randomly placed and oriented triangles.
pub fn random_triangles(seed: u64, count: usize) -> Vec<Triangle> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|idx| {
            let center = vec3(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );

            let mut vertex = || {
                center
                    + vec3(
                        rng.gen_range(-2.0..2.0),
                        rng.gen_range(-2.0..2.0),
                        rng.gen_range(-2.0..2.0),
                    )
            };

            Triangle::new(
                vertex(),
                vertex(),
                vertex(),
                MaterialId::new(idx as u32),
            )
        })
        .collect()
}

/// Returns random rays, all starting outside of [`random_triangles()`]'s
/// scene and aimed roughly at it.
pub fn random_rays(seed: u64, count: usize) -> Vec<(Vec3, Vec3)> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let origin = vec3(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                100.0,
            );

            let target = vec3(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );

            (origin, (target - origin).normalize())
        })
        .collect()
}
