//! Builds a hierarchy over a random triangle soup, checks it and (optionally)
//! dumps the linked nodes into a file.
//!
//! Usage:
//!
//! ```text
//! bvh-inspector [triangles] [seed] [sah|clustering] [output.bin]
//! ```

use std::env;

use glam::{vec3, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skipline::{
    debug, trace_brute_force, BuilderKind, Bvh, BvhConfig, BvhView,
    MaterialId, Ray, Triangle, TrianglesView,
};

const RAYS: usize = 10_000;
const SCENE_SIZE: f32 = 100.0;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = env::args().skip(1);

    let triangle_count = args
        .next()
        .map(|arg| arg.parse::<usize>().expect("invalid triangle count"))
        .unwrap_or(10_000);

    let seed = args
        .next()
        .map(|arg| arg.parse::<u64>().expect("invalid seed"))
        .unwrap_or(123);

    let builder = args
        .next()
        .map(|arg| arg.parse::<BuilderKind>().unwrap())
        .unwrap_or_default();

    let output = args.next();

    // ---

    let mut rng = StdRng::seed_from_u64(seed);
    let triangles = random_triangles(&mut rng, triangle_count);
    let config = BvhConfig::default().with_builder(builder);
    let bvh = Bvh::build(&triangles, &config).unwrap();

    if bvh.verified() != Some(true) {
        log::error!("Verification failed");
        return;
    }

    for depth in 0..4 {
        log::info!(
            "Depth {depth}: {} boxes ({} debug triangles)",
            debug::boxes_at_depth(bvh.nodes(), depth).len(),
            debug::box_triangles(bvh.nodes(), depth, MaterialId::new(0)).len(),
        );
    }

    // ---

    let mut hits = 0;
    let mut mismatches = 0;
    let mut traversed_nodes = 0;
    let mut max_traversed_nodes = 0;

    for _ in 0..RAYS {
        let ray = random_ray(&mut rng);

        let (hit, traversed) = ray.trace_nearest(
            TrianglesView::new(&triangles),
            BvhView::new(bvh.linked()),
        );

        let expected = trace_brute_force(ray, &triangles);

        if hit.into_option().map(|hit| hit.primitive_id)
            != expected.map(|hit| hit.primitive_id)
        {
            log::warn!(
                "Mismatch for {} -> {}: got {:?}, expected {:?}",
                ray.origin(),
                ray.direction(),
                hit.into_option(),
                expected
            );

            mismatches += 1;
        }

        if hit.is_some() {
            hits += 1;
        }

        traversed_nodes += traversed as usize;
        max_traversed_nodes = max_traversed_nodes.max(traversed);
    }

    log::info!(
        "Traced {RAYS} rays; hits={hits}, mismatches={mismatches}, \
         avg_traversed_nodes={:.1}, max_traversed_nodes={max_traversed_nodes}",
        traversed_nodes as f32 / RAYS as f32,
    );

    // ---

    if let Some(output) = output {
        std::fs::write(&output, bvh.as_bytes()).unwrap();

        log::info!("Saved {} bytes into {output}", bvh.as_bytes().len());
    }
}

fn random_triangles(rng: &mut StdRng, count: usize) -> Vec<Triangle> {
    (0..count)
        .map(|idx| {
            let center = random_point(rng, SCENE_SIZE / 2.0);

            Triangle::new(
                center + random_point(rng, 1.0),
                center + random_point(rng, 1.0),
                center + random_point(rng, 1.0),
                MaterialId::new(idx as u32),
            )
        })
        .collect()
}

fn random_ray(rng: &mut StdRng) -> Ray {
    let origin = random_point(rng, SCENE_SIZE);
    let target = random_point(rng, SCENE_SIZE / 2.0);

    Ray::new(origin, (target - origin).normalize())
}

fn random_point(rng: &mut StdRng, extent: f32) -> Vec3 {
    vec3(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}
