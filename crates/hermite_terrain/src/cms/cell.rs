//! Read-only views of one voxel cell (8 corners, 12 edges).
//!
//! Two layouts implement [`VoxelCell`]: [`CellData`], an owned copy filled
//! from a voxel grid, and [`SliceCell`], a view into flat per-cell arrays
//! ([`CellArrays`]) for polygonizing arbitrary cell lists.

use glam::{UVec3, Vec3};

use super::face::CellFace;
use super::tables::{CORNER_OFFSETS, CUBE_EDGE_SOURCE, FACE_EDGE_TO_CUBE_EDGE};
use crate::grid::VoxelGrid;
use crate::indexer::Indexer;
use crate::types::{Axis, MaterialId, AIR};

/// Cell side length in voxel units.
pub const CELL_SIZE: f32 = 1.0;

/// Hermite data of a single cell.
pub trait VoxelCell {
  /// Position of corner 0.
  fn position(&self) -> Vec3;

  fn corner_material(&self, corner: usize) -> MaterialId;

  /// Crossing on a cube edge, measured from its lower corner.
  fn edge_intersection(&self, cube_edge: usize) -> f32;

  fn edge_normal(&self, cube_edge: usize) -> Vec3;

  /// Corner materials in face order m1..m4.
  #[inline]
  fn face_materials(&self, face: CellFace) -> [MaterialId; 4] {
    face.corners().map(|c| self.corner_material(c))
  }

  /// Crossing on a face edge, measured in the face's walking direction.
  #[inline]
  fn face_intersection(&self, face_edge: usize) -> f32 {
    let (edge, reversed) = FACE_EDGE_TO_CUBE_EDGE[face_edge];
    let t = self.edge_intersection(edge as usize);
    if reversed {
      1.0 - t
    } else {
      t
    }
  }

  #[inline]
  fn face_normal(&self, face_edge: usize) -> Vec3 {
    self.edge_normal(FACE_EDGE_TO_CUBE_EDGE[face_edge].0 as usize)
  }

  #[inline]
  fn has_intersection(&self, face_edge: usize) -> bool {
    self.face_normal(face_edge).length_squared() > 0.001
  }

  /// Number of corners whose material is not air.
  fn solid_count(&self) -> usize {
    (0..8).filter(|&c| self.corner_material(c) != AIR).count()
  }
}

/// Owned cell, copied out of a voxel grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellData {
  pub position: Vec3,
  pub materials: [MaterialId; 8],
  pub intersections: [f32; 12],
  pub normals: [Vec3; 12],
}

impl CellData {
  /// Gather the cell whose corner 0 is grid point `(x, y, z)`.
  ///
  /// The cell's far corner must lie inside the grid.
  pub fn from_grid<I: Indexer>(grid: &VoxelGrid<I>, x: usize, y: usize, z: usize) -> Self {
    let corner = |c: usize| {
      let [ox, oy, oz] = CORNER_OFFSETS[c];
      grid.get(x + ox as usize, y + oy as usize, z + oz as usize)
    };

    let mut materials = [AIR; 8];
    for (c, m) in materials.iter_mut().enumerate() {
      *m = corner(c).material;
    }

    let mut intersections = [0.0; 12];
    let mut normals = [Vec3::ZERO; 12];
    for (edge, &(c, axis)) in CUBE_EDGE_SOURCE.iter().enumerate() {
      let e = corner(c as usize).edge(Axis::from_index(axis as usize));
      intersections[edge] = e.intersection;
      normals[edge] = e.normal;
    }

    Self {
      position: UVec3::new(x as u32, y as u32, z as u32).as_vec3(),
      materials,
      intersections,
      normals,
    }
  }
}

impl VoxelCell for CellData {
  #[inline]
  fn position(&self) -> Vec3 {
    self.position
  }

  #[inline]
  fn corner_material(&self, corner: usize) -> MaterialId {
    self.materials[corner]
  }

  #[inline]
  fn edge_intersection(&self, cube_edge: usize) -> f32 {
    self.intersections[cube_edge]
  }

  #[inline]
  fn edge_normal(&self, cube_edge: usize) -> Vec3 {
    self.normals[cube_edge]
  }
}

/// Structure-of-arrays storage for many cells.
#[derive(Clone, Debug, Default)]
pub struct CellArrays {
  pub positions: Vec<Vec3>,
  /// 8 per cell.
  pub materials: Vec<MaterialId>,
  /// 12 per cell.
  pub intersections: Vec<f32>,
  /// 12 per cell.
  pub normals: Vec<Vec3>,
}

impl CellArrays {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, cell: &CellData) {
    self.positions.push(cell.position);
    self.materials.extend_from_slice(&cell.materials);
    self.intersections.extend_from_slice(&cell.intersections);
    self.normals.extend_from_slice(&cell.normals);
  }

  pub fn len(&self) -> usize {
    self.positions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  pub fn cell(&self, index: usize) -> SliceCell<'_> {
    assert!(index < self.len(), "cell {index} out of range");
    SliceCell {
      position: self.positions[index],
      materials: &self.materials[index * 8..index * 8 + 8],
      intersections: &self.intersections[index * 12..index * 12 + 12],
      normals: &self.normals[index * 12..index * 12 + 12],
    }
  }
}

/// Borrowed view of one cell inside [`CellArrays`].
#[derive(Clone, Copy, Debug)]
pub struct SliceCell<'a> {
  position: Vec3,
  materials: &'a [MaterialId],
  intersections: &'a [f32],
  normals: &'a [Vec3],
}

impl VoxelCell for SliceCell<'_> {
  #[inline]
  fn position(&self) -> Vec3 {
    self.position
  }

  #[inline]
  fn corner_material(&self, corner: usize) -> MaterialId {
    self.materials[corner]
  }

  #[inline]
  fn edge_intersection(&self, cube_edge: usize) -> f32 {
    self.intersections[cube_edge]
  }

  #[inline]
  fn edge_normal(&self, cube_edge: usize) -> Vec3 {
    self.normals[cube_edge]
  }
}

#[cfg(test)]
#[path = "cell_test.rs"]
mod cell_test;
