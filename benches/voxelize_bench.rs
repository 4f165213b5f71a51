use blockvox::voxelization::{create_grid, voxelize, BvhIntersector};
use blockvox::{BoundingBox, Color, MaterialRef, TriangleMesh, Vector3, VoxelizationOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// `n`×`n` grid of small cubes on the xz plane, alternating colors.
fn cube_field(n: usize) -> Vec<TriangleMesh> {
    let mut meshes = Vec::with_capacity(n * n);
    for x in 0..n {
        for z in 0..n {
            let color = if (x + z) % 2 == 0 {
                Color::new(200, 40, 40)
            } else {
                Color::new(40, 40, 200)
            };
            meshes.push(TriangleMesh::cuboid(
                Vector3::new(x as f64 * 1.5, 0.0, z as f64 * 1.5),
                Vector3::new(1.0, 1.0 + (x % 3) as f64, 1.0),
                MaterialRef::Flat(color),
            ));
        }
    }
    meshes
}

/// Subdivided sphere-ish mesh with per-vertex colors.
fn uv_sphere(rings: usize, segments: usize) -> TriangleMesh {
    let mut positions = Vec::new();
    let mut colors = Vec::new();
    for r in 0..=rings {
        let theta = std::f64::consts::PI * r as f64 / rings as f64;
        for s in 0..segments {
            let phi = 2.0 * std::f64::consts::PI * s as f64 / segments as f64;
            positions.push(Vector3::new(
                theta.sin() * phi.cos(),
                theta.cos(),
                theta.sin() * phi.sin(),
            ));
            colors.push(Color::new((r * 255 / rings) as u8, 128, (s * 255 / segments) as u8));
        }
    }
    let mut indices = Vec::new();
    for r in 0..rings {
        for s in 0..segments {
            let a = (r * segments + s) as u32;
            let b = (r * segments + (s + 1) % segments) as u32;
            let c = a + segments as u32;
            let d = b + segments as u32;
            indices.push([a, c, b]);
            indices.push([b, c, d]);
        }
    }
    TriangleMesh::new(positions, indices, MaterialRef::Opaque).with_colors(colors)
}

// ── Benchmarks ───────────────────────────────────────────────────────────────

fn bench_create_grid(c: &mut Criterion) {
    let bbox = BoundingBox::new(Vector3::ZERO, Vector3::new(4.0, 2.0, 3.0));
    let mut group = c.benchmark_group("create_grid");
    for resolution in [16u32, 32, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(resolution), &resolution, |b, &r| {
            b.iter(|| black_box(create_grid(black_box(&bbox), r)))
        });
    }
    group.finish();
}

fn bench_build_intersector(c: &mut Criterion) {
    let sphere = [uv_sphere(64, 128)];
    c.bench_function("build_intersector_sphere_16k_tris", |b| {
        b.iter(|| black_box(BvhIntersector::build(black_box(&sphere)).ok()))
    });
}

fn bench_voxelize_sphere(c: &mut Criterion) {
    let sphere = [uv_sphere(48, 96)];
    let mut group = c.benchmark_group("voxelize_sphere");
    group.measurement_time(Duration::from_secs(10));
    for resolution in [16u32, 32, 64] {
        let options = VoxelizationOptions::new().with_resolution(resolution);
        group.bench_with_input(BenchmarkId::from_parameter(resolution), &options, |b, opts| {
            b.iter(|| black_box(voxelize(black_box(&sphere), opts).ok()))
        });
    }
    group.finish();
}

fn bench_voxelize_many_meshes(c: &mut Criterion) {
    let field = cube_field(6);
    let options = VoxelizationOptions::new().with_resolution(32);
    let mut group = c.benchmark_group("voxelize_many_meshes");
    group.sample_size(20);
    group.bench_function("36_cubes_r32", |b| {
        b.iter(|| black_box(voxelize(black_box(&field), &options).ok()))
    });
    let filled = options.clone().with_fill_interior(true);
    group.bench_function("36_cubes_r32_filled", |b| {
        b.iter(|| black_box(voxelize(black_box(&field), &filled).ok()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_create_grid,
    bench_build_intersector,
    bench_voxelize_sphere,
    bench_voxelize_many_meshes,
);
criterion_main!(benches);
