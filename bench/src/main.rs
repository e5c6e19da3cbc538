use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::{sync::Arc, time::Instant};

use tsuki::{
    kdtree::{KdTreeSettings, TraversalMethod},
    materials::Material,
    math::{
        point3,
        transforms::{scale, translation},
        vec3, Matrix4x4, Ray,
    },
    scene::{IndexSettings, Scene},
    shapes::Sphere,
};

const INVERT_ITERATIONS: usize = 5000000;
const SPHERE_COUNT: usize = 5000;
const RAY_COUNT: usize = 200000;

fn bench_invert(m: &Matrix4x4<f32>) {
    let mut m = *m;
    let start = Instant::now();
    for _ in 0..INVERT_ITERATIONS {
        m = match m.inverted() {
            Some(inv) => inv,
            None => panic!("Benchmark matrix is singular"),
        };
        if m.m[0][0].is_nan() {
            panic!("We only wanted to force the loop to be executed!")
        }
    }
    let elapsed_ns = start.elapsed().as_nanos();
    let elapsed_ms = (elapsed_ns as f64) * 1e-6;
    let us_per_invert = (elapsed_ns as f64) * 1e-3 / (INVERT_ITERATIONS as f64);
    println!(
        "Invert   took {:4.1} ms total, {:0.4} us per invert",
        elapsed_ms, us_per_invert
    );
}

fn random_scene(rng: &mut Pcg32) -> Scene {
    let mut scene = Scene::new("bench");
    let root = scene.transforms().root();
    let sphere = Arc::new(Sphere::new(Material::default()));
    for _ in 0..SPHERE_COUNT {
        let p = vec3(
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
        );
        let r = rng.gen_range(0.1..1.0);
        let node = scene
            .add_transform(root, &translation(p) * &scale(r, r, r))
            .unwrap();
        scene.add_shape(sphere.clone(), node).unwrap();
    }
    scene
}

fn random_rays(rng: &mut Pcg32) -> Vec<Ray<f32>> {
    (0..RAY_COUNT)
        .map(|_| {
            let o = point3(
                rng.gen_range(-60.0..60.0),
                rng.gen_range(-60.0..60.0),
                rng.gen_range(-60.0..60.0),
            );
            let d = vec3(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            Ray::unbounded(o, d.normalized())
        })
        .collect()
}

fn bench_intersect(name: &str, scene: &mut Scene, settings: IndexSettings, rays: &[Ray<f32>]) {
    scene.build_index(&settings);
    if let Some(stats) = scene.index_stats() {
        println!(
            "{:8} {} nodes, {} leaves, depth {}, {} references, built in {:.3} s",
            name,
            stats.node_count,
            stats.leaf_count,
            stats.max_depth,
            stats.object_references,
            stats.build_s
        );
    }

    let start = Instant::now();
    let hits = rays.iter().filter(|&&r| scene.intersect(r).is_some()).count();
    let elapsed_ns = start.elapsed().as_nanos();
    let elapsed_ms = (elapsed_ns as f64) * 1e-6;
    let us_per_ray = (elapsed_ns as f64) * 1e-3 / (rays.len() as f64);
    println!(
        "{:8} took {:6.1} ms total, {:0.4} us per ray, {} hits",
        name, elapsed_ms, us_per_ray, hits
    );
}

fn main() {
    let srt = Matrix4x4::new([
        [-1.2049938, 2.0927511, -1.5511264, 2.0],
        [-0.3637712, -1.7792745, -3.1372856, 3.0],
        [-1.5542396, -1.2060579, 1.9368648, 4.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    println!("Identity");
    bench_invert(&Matrix4x4::identity());
    println!("SRT");
    bench_invert(&srt);

    let mut rng = Pcg32::seed_from_u64(0x5EED);
    let mut scene = random_scene(&mut rng);
    let rays = random_rays(&mut rng);
    println!("{} spheres, {} rays", SPHERE_COUNT, RAY_COUNT);

    // Every ray against every object is slow, use a subset
    bench_intersect(
        "Linear",
        &mut scene,
        IndexSettings {
            use_kd_tree: false,
            ..IndexSettings::default()
        },
        &rays[0..RAY_COUNT / 100],
    );
    for traversal in [TraversalMethod::Recursive, TraversalMethod::Stack] {
        for max_depth in [8, 12, 16, 20] {
            bench_intersect(
                &format!("{}/{}", traversal, max_depth),
                &mut scene,
                IndexSettings {
                    use_kd_tree: true,
                    traversal,
                    kd_tree: KdTreeSettings {
                        max_depth,
                        ..KdTreeSettings::default()
                    },
                },
                &rays,
            );
        }
    }
}
