use super::*;
use crate::grid::Grid;
use crate::indexer::LinearIndexer;
use crate::types::{Axis, HermiteVoxel};

fn polygonize(grid: &VoxelGrid<LinearIndexer>) -> PolygonizerOutput {
  let polygonizer = CmsPolygonizer::new();
  let mut scratch = PolygonizerScratch::new();
  let mut out = PolygonizerOutput::new();
  polygonizer.polygonize_grid(grid, &mut scratch, &mut out);
  out
}

/// Solid box corner `[0, 0.5]^3` in a single cell.
fn corner_grid() -> VoxelGrid<LinearIndexer> {
  let mut grid: VoxelGrid<LinearIndexer> = Grid::cube(2);
  let voxel = HermiteVoxel::new(1)
    .with_edge(Axis::X, 0.5, Vec3::X)
    .with_edge(Axis::Y, 0.5, Vec3::Y)
    .with_edge(Axis::Z, 0.5, Vec3::Z);
  grid.set(0, 0, 0, voxel);
  grid
}

/// Solid slab `x < 0.3` filling the x = 0 side of a single cell.
fn wall_grid(top_material: MaterialId) -> VoxelGrid<LinearIndexer> {
  let mut grid: VoxelGrid<LinearIndexer> = Grid::cube(2);
  for z in 0..2 {
    for y in 0..2 {
      let material = if y == 0 { 1 } else { top_material };
      let mut voxel = HermiteVoxel::new(material).with_edge(Axis::X, 0.3, Vec3::X);
      if y == 0 && top_material != 1 {
        voxel = voxel.with_edge(Axis::Y, 0.5, Vec3::Y);
      }
      grid.set(0, y, z, voxel);
    }
  }
  grid
}

#[test]
fn test_uniform_cells_produce_nothing() {
  let empty: VoxelGrid<LinearIndexer> = Grid::cube(3);
  assert!(polygonize(&empty).is_empty());

  let full: VoxelGrid<LinearIndexer> = Grid::filled(3, 3, 3, HermiteVoxel::new(2));
  assert!(polygonize(&full).is_empty());
}

#[test]
fn test_box_corner_is_sharp_corner_feature() {
  let out = polygonize(&corner_grid());
  assert_eq!(out.components.len(), 1);

  let component = out.components[0];
  assert!(component.regular_feature);
  assert!(!component.material_transition_feature);
  assert!((component.feature_vertex - Vec3::splat(0.5)).length() < 1e-3);

  for &index in out.component_indices(&component) {
    let v = out.vertex(index);
    assert_eq!(v.material, 1);
    assert!(v.position.cmpge(Vec3::ZERO).all() && v.position.cmple(Vec3::ONE).all());
  }
}

#[test]
fn test_box_corner_has_2d_features_on_each_face() {
  let out = polygonize(&corner_grid());
  let component = out.components[0];
  let indices = out.component_indices(&component);
  let sharp = indices.iter().filter(|p| p.is_2d_sharp_feature()).count();
  let edges = indices.len() - sharp;
  // One crossing per cut cube edge, two feature vertices per face.
  assert_eq!(edges, 3);
  assert_eq!(sharp, 6);
}

#[test]
fn test_flat_wall_is_smooth_loop() {
  let out = polygonize(&wall_grid(1));
  assert_eq!(out.components.len(), 1);

  let component = out.components[0];
  assert!(!component.has_feature());
  assert_eq!(component.size, 4);
  for &index in out.component_indices(&component) {
    assert!(!index.is_2d_sharp_feature());
    let v = out.vertex(index);
    assert!((v.position.x - 0.3).abs() < 1e-5);
    assert_eq!(v.normal, Vec3::X);
  }
}

#[test]
fn test_material_boundary_inserts_transitions() {
  let out = polygonize(&wall_grid(2));
  assert_eq!(out.components.len(), 1);

  let component = out.components[0];
  let indices = out.component_indices(&component);
  let transitions: Vec<_> = indices.iter().filter(|p| p.is_material_transition()).collect();
  // One transition vertex on each of the two faces spanning both materials,
  // each emitted once per side.
  assert_eq!(transitions.len(), 4);
  for p in transitions {
    let v = out.vertex(*p);
    assert!((v.normal - Vec3::X).length() < 1e-5);
  }

  let materials: Vec<_> = indices.iter().map(|&p| out.vertex(p).material).collect();
  assert!(materials.contains(&1));
  assert!(materials.contains(&2));
  assert!(indices.iter().all(|&p| out.vertex(p).position.is_finite()));
}

#[test]
fn test_output_accumulates_across_cells() {
  let mut grid: VoxelGrid<LinearIndexer> = Grid::new(3, 2, 2);
  for z in 0..2 {
    for y in 0..2 {
      grid.set(0, y, z, HermiteVoxel::EMPTY.with_edge(Axis::X, 0.5, -Vec3::X));
      grid.set(1, y, z, HermiteVoxel::new(1).with_edge(Axis::X, 0.5, Vec3::X));
    }
  }
  let out = polygonize(&grid);
  assert_eq!(out.components.len(), 2);
  let total: usize = out.components.iter().map(|c| c.size).sum();
  assert_eq!(total, out.indices.len());
}

#[test]
fn test_scratch_reuse_is_stable() {
  let polygonizer = CmsPolygonizer::new();
  let grid = corner_grid();
  let cell = CellData::from_grid(&grid, 0, 0, 0);
  let mut scratch = PolygonizerScratch::new();

  let mut first = PolygonizerOutput::new();
  polygonizer.polygonize(&cell, &mut scratch, &mut first);
  let mut second = PolygonizerOutput::new();
  polygonizer.polygonize(&cell, &mut scratch, &mut second);

  assert_eq!(first.vertices, second.vertices);
  assert_eq!(first.components, second.components);
}

#[test]
fn test_clamp_feature() {
  assert_eq!(clamp_feature(Vec2::new(-3.0, 0.5), 1.0, 1.0), Vec2::new(0.0, 0.5));
  assert_eq!(clamp_feature(Vec2::new(0.5, 5.0), 1.0, 1.0), Vec2::new(0.5, 1.0));
  assert_eq!(clamp_feature(Vec2::new(1.5, -0.5), 1.0, 1.0), Vec2::new(1.5, -0.5));
}

#[test]
fn test_ambiguous_face_keeps_diagonal_corners_apart() {
  // Solid corners (0,0,0) and (1,1,0) meet the z = 0 face diagonally. Linking
  // the two corners would cross the features, so each corner gets its own
  // loop. Only the violation count decides here; the acute-angle tie-break
  // is a heuristic and is not asserted.
  let mut grid: VoxelGrid<LinearIndexer> = Grid::cube(2);
  grid.set(
    0,
    0,
    0,
    HermiteVoxel::new(1)
      .with_edge(Axis::X, 0.4, Vec3::X)
      .with_edge(Axis::Y, 0.4, Vec3::Y)
      .with_edge(Axis::Z, 0.4, Vec3::Z),
  );
  grid.set(1, 1, 0, HermiteVoxel::new(1).with_edge(Axis::Z, 0.4, Vec3::Z));
  grid.set(0, 1, 0, HermiteVoxel::EMPTY.with_edge(Axis::X, 0.6, -Vec3::X));
  grid.set(1, 0, 0, HermiteVoxel::EMPTY.with_edge(Axis::Y, 0.6, -Vec3::Y));

  let out = polygonize(&grid);
  assert_eq!(out.components.len(), 2);

  let near = |p: Vec3| {
    out
      .components
      .iter()
      .any(|c| c.regular_feature && (c.feature_vertex - p).length() < 1e-3)
  };
  assert!(near(Vec3::splat(0.4)));
  assert!(near(Vec3::new(0.6, 0.6, 0.4)));
}
