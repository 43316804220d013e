//! Parity fill and edge population.

use super::bin::{column_axes, column_coords, column_point};
use super::intersect::{Intersection, IntersectionColumn};
use super::VoxelizationProperties;
use crate::grid::VoxelGrid;
use crate::indexer::Indexer;
use crate::types::{Axis, MaterialId};

/// A solid/empty transition that no ray hit could be snapped onto.
///
/// `(x, y, z)` is the lower voxel of the edge. `inside` is true when that
/// lower voxel is the solid one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Hole {
  pub x: usize,
  pub y: usize,
  pub z: usize,
  pub axis: Axis,
  pub inside: bool,
}

/// Mark voxels between each entering and leaving hit as solid.
///
/// Points `floor(enter) + 1 ..= floor(leave)` lie inside the crossing pair.
pub(crate) fn fill_materials<I: Indexer>(
  grid: &mut VoxelGrid<I>,
  columns: &[IntersectionColumn],
  material: MaterialId,
) {
  let dims = [grid.width(), grid.height(), grid.depth()];

  for column in columns {
    let axis = column.axis;
    let last = dims[axis.index()] as i64 - 1;
    let (u, v) = column_coords(axis, dims, column.index);

    for pair in column.hits.chunks_exact(2) {
      let enter = pair[0].distance.floor() as i64;
      let leave = (pair[1].distance.floor() as i64).min(last);
      for k in (enter + 1).max(0)..=leave {
        let (x, y, z) = column_point(axis, u, v, k as usize);
        let voxel = grid.get_mut(x, y, z);
        *voxel = voxel.with_material(material);
      }
    }
  }
}

/// Walk each column and give every solid/empty transition an edge crossing.
///
/// The hit closest to the edge center is used when its normal is not too
/// grazing for the axis and it lies within the snap distance. Otherwise the
/// transition is appended to `holes`.
pub(crate) fn populate_edges<I: Indexer>(
  grid: &mut VoxelGrid<I>,
  columns: &[IntersectionColumn],
  material: MaterialId,
  properties: &VoxelizationProperties,
  holes: &mut Vec<Hole>,
) {
  let dims = [grid.width(), grid.height(), grid.depth()];

  for column in columns {
    let axis = column.axis;
    let unit = axis.unit();
    let (u, v) = column_coords(axis, dims, column.index);

    let (x, y, z) = column_point(axis, u, v, 0);
    let mut prev_solid = grid.get(x, y, z).material == material;

    for k in 1..dims[axis.index()] {
      let (x, y, z) = column_point(axis, u, v, k);
      let solid = grid.get(x, y, z).material == material;

      if solid != prev_solid {
        let center = k as f32 - 0.5;
        let (lx, ly, lz) = column_point(axis, u, v, k - 1);

        match closest_hit(&column.hits, center, unit, properties.angle_threshold) {
          Some(hit) if (hit.distance - center).abs() < properties.snap_threshold => {
            let t = (hit.distance - (k - 1) as f32).clamp(0.0, 1.0);
            let voxel = grid.get_mut(lx, ly, lz);
            *voxel = voxel.with_edge(axis, t, hit.normal);
          }
          _ => holes.push(Hole {
            x: lx,
            y: ly,
            z: lz,
            axis,
            inside: prev_solid,
          }),
        }
      }

      prev_solid = solid;
    }
  }
}

fn closest_hit(
  hits: &[Intersection],
  center: f32,
  unit: glam::Vec3,
  angle_threshold: f32,
) -> Option<&Intersection> {
  hits
    .iter()
    .filter(|hit| hit.normal.dot(unit).abs() > angle_threshold)
    .min_by(|a, b| {
      (a.distance - center)
        .abs()
        .total_cmp(&(b.distance - center).abs())
    })
}

#[cfg(test)]
mod tests {
  use glam::Vec3;

  use super::*;
  use crate::grid::Grid;
  use crate::indexer::LinearIndexer;

  fn column(axis: Axis, index: usize, hits: &[(f32, Vec3)]) -> IntersectionColumn {
    IntersectionColumn {
      axis,
      index,
      hits: hits
        .iter()
        .map(|&(distance, normal)| Intersection { distance, normal })
        .collect(),
    }
  }

  #[test]
  fn test_parity_fill_between_hit_pairs() {
    let mut grid: VoxelGrid<LinearIndexer> = Grid::cube(10);
    let columns = [column(
      Axis::X,
      2 * 10 + 3,
      &[(1.5, -Vec3::X), (3.2, Vec3::X), (5.7, -Vec3::X), (7.0, Vec3::X)],
    )];

    fill_materials(&mut grid, &columns, 4);

    let solid: Vec<usize> = (0..10).filter(|&x| grid.get(x, 3, 2).material == 4).collect();
    assert_eq!(solid, vec![2, 3, 6, 7]);
  }

  #[test]
  fn test_unpaired_hit_fills_nothing() {
    let mut grid: VoxelGrid<LinearIndexer> = Grid::cube(6);
    let columns = [column(Axis::Y, 0, &[(2.5, Vec3::Y)])];

    fill_materials(&mut grid, &columns, 1);
    assert!(grid.iter().all(|(_, v)| v.material == 0));
  }

  #[test]
  fn test_transitions_snap_to_closest_hit() {
    let mut grid: VoxelGrid<LinearIndexer> = Grid::cube(8);
    let columns = [column(Axis::Z, 1 * 8 + 1, &[(2.25, -Vec3::Z), (5.5, Vec3::Z)])];
    fill_materials(&mut grid, &columns, 1);

    let mut holes = Vec::new();
    populate_edges(&mut grid, &columns, 1, &VoxelizationProperties::FLAT, &mut holes);

    assert!(holes.is_empty());
    let entry = grid.get(1, 1, 2).edge(Axis::Z);
    assert!((entry.intersection - 0.25).abs() < 1e-6);
    assert_eq!(entry.normal, -Vec3::Z);
    let exit = grid.get(1, 1, 5).edge(Axis::Z);
    assert!((exit.intersection - 0.5).abs() < 1e-6);
    assert_eq!(exit.normal, Vec3::Z);
  }

  #[test]
  fn test_grazing_hits_become_holes() {
    let mut grid: VoxelGrid<LinearIndexer> = Grid::cube(8);
    let grazing = Vec3::new(0.0, 1.0, 0.01).normalize();
    let columns = [column(Axis::Z, 1 * 8 + 1, &[(2.5, -grazing), (5.5, grazing)])];
    fill_materials(&mut grid, &columns, 1);

    let mut holes = Vec::new();
    populate_edges(&mut grid, &columns, 1, &VoxelizationProperties::FLAT, &mut holes);

    assert_eq!(
      holes,
      vec![
        Hole { x: 1, y: 1, z: 2, axis: Axis::Z, inside: false },
        Hole { x: 1, y: 1, z: 5, axis: Axis::Z, inside: true },
      ]
    );
    assert!(!grid.get(1, 1, 2).edge(Axis::Z).has_intersection());
  }
}
