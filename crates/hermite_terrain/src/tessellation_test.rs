use super::*;
use crate::cms::{CmsPolygonizer, PolygonizerScratch};
use crate::color::MaterialColors;
use crate::grid::{Grid, VoxelGrid};
use crate::indexer::LinearIndexer;
use crate::types::{Axis, HermiteVoxel};

fn polygonize(grid: &VoxelGrid<LinearIndexer>) -> PolygonizerOutput {
  let mut out = PolygonizerOutput::new();
  CmsPolygonizer::new().polygonize_grid(grid, &mut PolygonizerScratch::new(), &mut out);
  out
}

fn wall() -> PolygonizerOutput {
  let mut grid: VoxelGrid<LinearIndexer> = Grid::cube(2);
  for z in 0..2 {
    for y in 0..2 {
      grid.set(0, y, z, HermiteVoxel::new(3).with_edge(Axis::X, 0.5, Vec3::X));
    }
  }
  polygonize(&grid)
}

fn corner() -> PolygonizerOutput {
  let mut grid: VoxelGrid<LinearIndexer> = Grid::cube(2);
  let voxel = HermiteVoxel::new(1)
    .with_edge(Axis::X, 0.5, Vec3::X)
    .with_edge(Axis::Y, 0.5, Vec3::Y)
    .with_edge(Axis::Z, 0.5, Vec3::Z);
  grid.set(0, 0, 0, voxel);
  polygonize(&grid)
}

#[test]
fn test_smooth_loop_fans_around_centroid() {
  let polygonized = wall();
  let mut mesh = MeshOutput::new();
  tessellate(&polygonized, &Affine3A::IDENTITY, &mut DedupCache::new(), &mut mesh);

  // Four loop vertices plus the shared centre.
  assert_eq!(mesh.triangle_count(), 4);
  assert_eq!(mesh.vertex_count(), 5);
  assert!(mesh.positions.iter().any(|p| (*p - Vec3::new(0.5, 0.5, 0.5)).length() < 1e-5));
  assert!(mesh.normals.iter().all(|n| (*n - Vec3::X).length() < 1e-5));
  assert!(mesh.materials.iter().all(|&m| m == 3));
}

#[test]
fn test_sharp_corner_fans_around_feature() {
  let polygonized = corner();
  let mut mesh = MeshOutput::new();
  tessellate(&polygonized, &Affine3A::IDENTITY, &mut DedupCache::new(), &mut mesh);

  // Nine loop vertices, three of them doubled 2D features whose zero-length
  // edges are skipped.
  assert_eq!(polygonized.components[0].size, 9);
  assert_eq!(mesh.triangle_count(), 6);
  assert!(mesh.positions.iter().any(|p| (*p - Vec3::splat(0.5)).length() < 1e-3));
  assert!(mesh.normals.iter().all(|n| n.is_finite()));
  assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
}

#[test]
fn test_sharp_corner_faces_keep_axis_normals() {
  let polygonized = corner();
  let mut mesh = MeshOutput::new();
  tessellate(&polygonized, &Affine3A::IDENTITY, &mut DedupCache::new(), &mut mesh);

  // Each cut face of the box corner is flat, so every emitted normal is one
  // of the three face axes.
  for n in &mesh.normals {
    let axis_aligned = [Vec3::X, Vec3::Y, Vec3::Z].iter().any(|a| (*n - *a).length() < 1e-4);
    assert!(axis_aligned, "unexpected normal {n:?}");
  }
}

#[test]
fn test_dedup_cache_shares_vertices_between_calls() {
  let polygonized = wall();
  let mut cache = DedupCache::new();
  let mut mesh = MeshOutput::new();
  tessellate(&polygonized, &Affine3A::IDENTITY, &mut cache, &mut mesh);
  let vertices = mesh.vertex_count();
  tessellate(&polygonized, &Affine3A::IDENTITY, &mut cache, &mut mesh);

  assert_eq!(mesh.vertex_count(), vertices);
  assert_eq!(mesh.triangle_count(), 8);
  assert_eq!(cache.len(), vertices);
}

#[test]
fn test_transform_applies_to_positions_and_bounds() {
  let polygonized = wall();
  let transform = Affine3A::from_translation(Vec3::new(10.0, 0.0, 0.0));
  let mut mesh = MeshOutput::new();
  tessellate(&polygonized, &transform, &mut DedupCache::new(), &mut mesh);

  assert!(mesh.positions.iter().all(|p| (p.x - 10.5).abs() < 1e-5));
  assert!((mesh.bounds.min.x - 10.5).abs() < 1e-5);
  assert_eq!(mesh.bounds.max.y, 1.0);
}

#[test]
fn test_colors_follow_materials() {
  let polygonized = wall();
  let mut mesh = MeshOutput::new();
  tessellate_with_colors(&polygonized, &Affine3A::IDENTITY, &MaterialColors, &mut DedupCache::new(), &mut mesh);

  assert_eq!(mesh.colors.len(), mesh.vertex_count());
  assert!(mesh.colors.iter().all(|c| *c == [0, 0, 3, 0]));
}

#[test]
fn test_empty_output_tessellates_to_nothing() {
  let mut mesh = MeshOutput::new();
  tessellate(&PolygonizerOutput::new(), &Affine3A::IDENTITY, &mut DedupCache::new(), &mut mesh);
  assert!(mesh.is_empty());
  assert!(!mesh.bounds.is_valid());
}
