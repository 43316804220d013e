use super::*;
use crate::sdf::{BoxSdf, SphereSdf};
use crate::types::HermiteVoxel;

type TestGrid = VoxelGrid<LinearIndexer>;

fn center() -> Vec3 {
  Vec3::splat(4.0)
}

#[test]
fn test_sphere_sets_materials_and_crossings() {
  let grid = TestGrid::cube(9);
  let (out, changed) = apply_sdf(&grid, center(), &SphereSdf::new(2.5), 3, false);

  assert!(changed);
  assert_eq!(out.get(4, 4, 4).material, 3);
  assert_eq!(out.get(2, 4, 4).material, 3);
  assert_eq!(out.get(1, 4, 4).material, AIR);
  assert_eq!(out.get(0, 0, 0).material, AIR);

  let left = out.get(1, 4, 4).edges[Axis::X.index()];
  assert!((left.intersection - 0.5).abs() < 1e-3);
  assert!((left.normal + Vec3::X).length() < 1e-2);

  let right = out.get(6, 4, 4).edges[Axis::X.index()];
  assert!((right.intersection - 0.5).abs() < 1e-3);
  assert!((right.normal - Vec3::X).length() < 1e-2);

  // Fully interior edges carry no crossing.
  assert_eq!(out.get(4, 4, 4).edges[Axis::X.index()].normal, Vec3::ZERO);
}

#[test]
fn test_snapshot_is_not_modified() {
  let grid = TestGrid::cube(9);
  let before = grid.clone();
  let _ = apply_sdf(&grid, center(), &SphereSdf::new(2.5), 3, false);
  assert_eq!(grid, before);
}

#[test]
fn test_repeated_union_is_idempotent() {
  let grid = TestGrid::cube(9);
  let sphere = SphereSdf::new(2.7);
  let (first, _) = apply_sdf(&grid, center(), &sphere, 2, false);
  let (second, changed) = apply_sdf(&first, center(), &sphere, 2, false);
  assert!(!changed);
  assert_eq!(first, second);
}

#[test]
fn test_carving_same_shape_clears_materials() {
  let grid = TestGrid::cube(9);
  let sphere = SphereSdf::new(3.2);
  let (filled, _) = apply_sdf(&grid, center(), &sphere, 5, false);
  let (carved, changed) = apply_sdf(&filled, center(), &sphere, AIR, false);
  assert!(changed);
  assert!(carved.iter().all(|(_, v)| v.material == AIR));
}

#[test]
fn test_carving_flips_normals() {
  let mut grid = TestGrid::cube(9);
  grid.fill(HermiteVoxel::new(1));
  let (out, _) = apply_sdf(&grid, center(), &SphereSdf::new(2.5), AIR, false);
  assert_eq!(out.get(4, 4, 4).material, AIR);
  // The remaining solid lies at -X of this crossing, so its normal points +X.
  let left = out.get(1, 4, 4).edges[Axis::X.index()];
  assert!((left.normal - Vec3::X).length() < 1e-2);
}

#[test]
fn test_replace_only_touches_solid_points() {
  let mut grid = TestGrid::cube(9);
  for (x, y, z) in grid.coords().collect::<Vec<_>>() {
    if y < 4 {
      grid.set(x, y, z, HermiteVoxel::new(1));
    }
  }
  let (out, changed) = apply_sdf(&grid, center(), &SphereSdf::new(2.5), 7, true);
  assert!(changed);
  assert_eq!(out.get(4, 3, 4).material, 7);
  assert_eq!(out.get(4, 5, 4).material, AIR);
  assert_eq!(out.get(4, 0, 4).material, 1);
}

#[test]
fn test_edit_outside_grid_changes_nothing() {
  let grid = TestGrid::cube(5);
  let (out, changed) = apply_sdf(&grid, Vec3::splat(100.0), &SphereSdf::new(2.0), 1, false);
  assert!(!changed);
  assert_eq!(out, grid);
}

/// Snapshot with a solid point at (3,4,4) whose -X edge crossing sits at 0.8.
fn crossing_snapshot() -> TestGrid {
  let mut grid = TestGrid::cube(9);
  grid.set(3, 4, 4, HermiteVoxel::new(1));
  grid.set(2, 4, 4, HermiteVoxel::EMPTY.with_edge(Axis::X, 0.8, -Vec3::X));
  grid
}

#[test]
fn test_additive_edit_pushes_crossing_outward() {
  let grid = crossing_snapshot();
  // Box face at x = 2.3.
  let wall = BoxSdf::new(10.0);
  let (out, _) = apply_sdf(&grid, Vec3::new(12.3, 4.0, 4.0), &wall, 1, false);
  let edge = out.get(2, 4, 4).edges[Axis::X.index()];
  assert!((edge.intersection - 0.3).abs() < 1e-3);
}

#[test]
fn test_additive_edit_does_not_erode_existing_crossing() {
  let grid = crossing_snapshot();
  // Box face at x = 2.9, behind the existing surface at 2.8.
  let wall = BoxSdf::new(10.0);
  let (out, _) = apply_sdf(&grid, Vec3::new(12.9, 4.0, 4.0), &wall, 1, false);
  let edge = out.get(2, 4, 4).edges[Axis::X.index()];
  assert_eq!(edge.intersection, 0.8);
  assert_eq!(edge.normal, -Vec3::X);
}

#[test]
fn test_carve_short_of_existing_surface_keeps_crossing() {
  let grid = crossing_snapshot();
  // Carved region x <= 2.5 ends before the surface at 2.8.
  let wall = BoxSdf::new(10.0);
  let (out, _) = apply_sdf(&grid, Vec3::new(-7.5, 4.0, 4.0), &wall, AIR, false);
  assert_eq!(out.get(3, 4, 4).material, 1);
  let edge = out.get(2, 4, 4).edges[Axis::X.index()];
  assert_eq!(edge.intersection, 0.8);
  assert_eq!(edge.normal, -Vec3::X);
}

#[test]
fn test_carve_past_existing_surface_moves_crossing() {
  let grid = crossing_snapshot();
  // Carved region x <= 2.9 eats into the solid beyond 2.8.
  let wall = BoxSdf::new(10.0);
  let (out, _) = apply_sdf(&grid, Vec3::new(-7.1, 4.0, 4.0), &wall, AIR, false);
  assert_eq!(out.get(3, 4, 4).material, 1);
  let edge = out.get(2, 4, 4).edges[Axis::X.index()];
  assert!((edge.intersection - 0.9).abs() < 1e-3);
  // The box face normal is +X; carving flips it to face out of the solid.
  assert!((edge.normal + Vec3::X).length() < 1e-2);
}

#[test]
fn test_find_intersection_on_plane() {
  struct Plane;
  impl Sdf for Plane {
    fn eval(&self, p: Vec3) -> f32 {
      p.x - 0.3
    }
    fn bounds(&self) -> crate::types::MinMaxAABB {
      crate::types::MinMaxAABB::from_half_extents(Vec3::splat(10.0))
    }
  }
  let p = find_intersection(Vec3::ZERO, -0.3, Vec3::X, 0.7, &Plane, INTERSECTION_EPSILON, INTERSECTION_STEPS);
  assert!((p.x - 0.3).abs() < 1e-4);
}

#[test]
fn test_find_intersection_on_sphere_converges() {
  let sphere = SphereSdf::new(1.0);
  let a = Vec3::new(0.2, 0.6, 0.0);
  let b = Vec3::new(1.2, 0.6, 0.0);
  let p = find_intersection(a, sphere.eval(a), b, sphere.eval(b), &sphere, INTERSECTION_EPSILON, INTERSECTION_STEPS);
  assert!(sphere.eval(p).abs() < 0.01);
  assert!((p.y - 0.6).abs() < 1e-5);
}
