//! Benchmarks for the host-side motion model and per-frame scene update.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sphere_streams::motion::{self, MotionParams};
use sphere_streams::{Scene, SceneConfig};

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("motion");
    let params = MotionParams::new(0.3, 0.05, 35.0, 1.5, Vec3::new(0.0, 10.0, 0.5));

    group.bench_function("evaluate", |b| {
        b.iter(|| black_box(motion::evaluate(black_box(&params), black_box(12.5), 0.0)))
    });

    group.bench_function("evaluate_hold", |b| {
        b.iter(|| black_box(motion::evaluate(black_box(&params), black_box(12.5), 0.5)))
    });

    group.bench_function("wrap_unit_negative", |b| {
        b.iter(|| black_box(motion::wrap_unit(black_box(-123.456))))
    });

    group.finish();
}

fn bench_scene_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_update");

    for n in [1_000u32, 10_000, 50_000] {
        let config = SceneConfig {
            n_instances: n,
            ..SceneConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut scene = match Scene::new(config) {
            Ok(scene) => scene,
            Err(_) => continue,
        };
        scene.restart(&mut rng);

        let mut t = 0.0f32;
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                t += 1.0 / 60.0;
                black_box(scene.update(t)).ok();
            })
        });
    }

    group.finish();
}

fn bench_restart(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_restart");
    group.sample_size(20);

    for n in [1_000u32, 10_000] {
        let config = SceneConfig {
            n_instances: n,
            ..SceneConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(2);
        let mut scene = match Scene::new(config) {
            Ok(scene) => scene,
            Err(_) => continue,
        };
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| scene.restart(&mut rng))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_scene_update, bench_restart);
criterion_main!(benches);
