//! Voxelizing a box mesh.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use hermite_terrain::{voxelize, LinearIndexer, VoxelGrid, VoxelizationProperties};

/// Unit box as a flat triangle list with outward winding.
fn box_mesh() -> (Vec<Vec3>, Vec<Vec3>) {
  let corner = |i: usize| {
    Vec3::new(
      if i & 1 != 0 { 0.5 } else { -0.5 },
      if i & 2 != 0 { 0.5 } else { -0.5 },
      if i & 4 != 0 { 0.5 } else { -0.5 },
    )
  };
  // Quads as corner bit patterns, counter-clockwise from outside.
  let quads: [([usize; 4], Vec3); 6] = [
    ([0, 4, 6, 2], -Vec3::X),
    ([1, 3, 7, 5], Vec3::X),
    ([0, 1, 5, 4], -Vec3::Y),
    ([2, 6, 7, 3], Vec3::Y),
    ([0, 2, 3, 1], -Vec3::Z),
    ([4, 5, 7, 6], Vec3::Z),
  ];

  let mut vertices = Vec::new();
  let mut normals = Vec::new();
  for ([a, b, c, d], n) in quads {
    vertices.extend([a, b, c, a, c, d].map(corner));
    normals.extend([n; 6]);
  }
  (vertices, normals)
}

fn bench_voxelize_box(c: &mut Criterion) {
  let (vertices, normals) = box_mesh();
  let properties = VoxelizationProperties::FLAT.with_padding(2.5);

  let mut group = c.benchmark_group("voxelizer::voxelize (box)");
  for size in [32usize, 64] {
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
      b.iter(|| {
        let mut grid: VoxelGrid<LinearIndexer> = VoxelGrid::cube(size);
        let report = voxelize(black_box(&vertices), &normals, &mut grid, 1, &properties).unwrap();
        black_box((grid, report))
      })
    });
  }
  group.finish();
}

criterion_group!(benches, bench_voxelize_box);
criterion_main!(benches);
