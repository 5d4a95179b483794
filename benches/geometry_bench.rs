use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use pano_scene_viewer::core::demo::{rebuild_group, DemoSceneParams};
use pano_scene_viewer::core::walls::{triangulate, walls_from_polygon};
use pano_scene_viewer::core::{pick_node, OrbitCamera, Scene, SceneGroup};
use std::hint::black_box;

fn build_ring_polygon(segments: usize) -> Vec<Vec2> {
    (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            // Leicht gezackter Ring, damit die Ohren-Suche arbeiten muss
            let radius = 1.0 + 0.2 * ((i % 3) as f32);
            Vec2::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

fn bench_triangulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulation");

    for &segments in &[16usize, 64, 256] {
        let polygon = build_ring_polygon(segments);

        group.bench_with_input(
            BenchmarkId::new("triangulate", segments),
            &polygon,
            |b, polygon| {
                b.iter(|| {
                    let indices = triangulate(black_box(polygon));
                    black_box(indices.len())
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("walls_from_polygon", segments),
            &polygon,
            |b, polygon| {
                b.iter(|| {
                    let mesh = walls_from_polygon(black_box(polygon), 1.0);
                    black_box(mesh.indices.len())
                })
            },
        );
    }

    group.finish();
}

fn demo_scene() -> Scene {
    let params = DemoSceneParams {
        fill_opacity: 0.2,
        stroke_opacity: 1.0,
        stroke_width: 1.0,
        color_seed: 42,
    };
    let mut scene = Scene::new();
    rebuild_group(&mut scene, SceneGroup::Walls, true, &params);
    rebuild_group(&mut scene, SceneGroup::Primitives, true, &params);
    scene
}

fn bench_picking(c: &mut Criterion) {
    let scene = demo_scene();
    let camera = OrbitCamera::default();
    let viewport = Vec2::new(1280.0, 720.0);

    let rays: Vec<(Vec3, Vec3)> = (0..64)
        .map(|i| {
            let x = (i % 8) as f32 / 8.0 * viewport.x;
            let y = (i / 8) as f32 / 8.0 * viewport.y;
            camera.screen_ray(Vec2::new(x, y), viewport)
        })
        .collect();

    c.bench_function("pick_node_ray_grid", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for (origin, dir) in &rays {
                if pick_node(black_box(&scene), 0.3, *origin, *dir).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
}

criterion_group!(benches, bench_triangulation, bench_picking);
criterion_main!(benches);
