//! Core data types shared by storage, polygonization and meshing.
//!
//! # Hermite Voxel Layout
//!
//! ```text
//!            +Y
//!            │
//!            │ edge[1]
//!            │
//!            ●──────── +X
//!           ╱  edge[0]
//!          ╱ edge[2]
//!        +Z
//!
//!  Each grid point owns the three edges leaving it towards +X, +Y and +Z.
//!  An edge stores where the surface crosses it (0..1 along the edge) and
//!  the surface normal at that crossing.
//! ```

use glam::{IVec3, Vec3};

/// Material identifier. `AIR` (0) is empty space.
pub type MaterialId = i32;

/// The empty material.
pub const AIR: MaterialId = 0;

/// Grid axis, also used to address the three edges of a voxel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
  X = 0,
  Y = 1,
  Z = 2,
}

impl Axis {
  pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

  #[inline]
  pub fn index(self) -> usize {
    self as usize
  }

  #[inline]
  pub fn from_index(index: usize) -> Self {
    match index {
      0 => Axis::X,
      1 => Axis::Y,
      2 => Axis::Z,
      _ => panic!("axis index {index} out of range"),
    }
  }

  /// Integer step from a grid point to the other end of its edge.
  #[inline]
  pub fn offset(self) -> IVec3 {
    match self {
      Axis::X => IVec3::X,
      Axis::Y => IVec3::Y,
      Axis::Z => IVec3::Z,
    }
  }

  #[inline]
  pub fn unit(self) -> Vec3 {
    self.offset().as_vec3()
  }
}

/// Surface crossing on one voxel edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HermiteEdge {
  /// Crossing position along the edge in [0, 1].
  pub intersection: f32,
  /// Surface normal at the crossing. Zero when the edge has no crossing.
  pub normal: Vec3,
}

impl HermiteEdge {
  pub const NONE: Self = Self {
    intersection: 0.0,
    normal: Vec3::ZERO,
  };

  pub fn new(intersection: f32, normal: Vec3) -> Self {
    Self {
      intersection,
      normal,
    }
  }

  /// True when a usable normal is stored.
  #[inline]
  pub fn has_intersection(&self) -> bool {
    self.normal.length_squared() > 0.001
  }
}

impl Default for HermiteEdge {
  fn default() -> Self {
    Self::NONE
  }
}

/// One grid point of hermite data.
///
/// `is_set` marks voxels that were written by an edit. Grid copies that skip
/// unset voxels use it to apply sparse stamps.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct HermiteVoxel {
  pub material: MaterialId,
  pub is_set: bool,
  pub edges: [HermiteEdge; 3],
}

impl HermiteVoxel {
  pub const EMPTY: Self = Self {
    material: AIR,
    is_set: false,
    edges: [HermiteEdge::NONE; 3],
  };

  pub fn new(material: MaterialId) -> Self {
    Self {
      material,
      is_set: true,
      edges: [HermiteEdge::NONE; 3],
    }
  }

  #[inline]
  pub fn is_solid(&self) -> bool {
    self.material != AIR
  }

  #[inline]
  pub fn edge(&self, axis: Axis) -> &HermiteEdge {
    &self.edges[axis.index()]
  }

  /// Copy with a new material. Always marks the voxel as set.
  #[inline]
  pub fn with_material(mut self, material: MaterialId) -> Self {
    self.material = material;
    self.is_set = true;
    self
  }

  /// Copy with one edge replaced. Always marks the voxel as set.
  #[inline]
  pub fn with_edge(mut self, axis: Axis, intersection: f32, normal: Vec3) -> Self {
    self.edges[axis.index()] = HermiteEdge::new(intersection, normal);
    self.is_set = true;
    self
  }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: Vec3,
  pub max: Vec3,
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: Vec3::splat(f32::INFINITY),
      max: Vec3::splat(f32::NEG_INFINITY),
    }
  }

  pub fn new(min: Vec3, max: Vec3) -> Self {
    Self { min, max }
  }

  /// Box symmetric around the origin.
  pub fn from_half_extents(half: Vec3) -> Self {
    Self {
      min: -half,
      max: half,
    }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: Vec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  pub fn union(&self, other: &MinMaxAABB) -> MinMaxAABB {
    MinMaxAABB {
      min: self.min.min(other.min),
      max: self.max.max(other.max),
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min.cmple(self.max).all()
  }

  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  /// The eight corners, x varying fastest.
  pub fn corners(&self) -> [Vec3; 8] {
    let (a, b) = (self.min, self.max);
    [
      Vec3::new(a.x, a.y, a.z),
      Vec3::new(b.x, a.y, a.z),
      Vec3::new(a.x, b.y, a.z),
      Vec3::new(b.x, b.y, a.z),
      Vec3::new(a.x, a.y, b.z),
      Vec3::new(b.x, a.y, b.z),
      Vec3::new(a.x, b.y, b.z),
      Vec3::new(b.x, b.y, b.z),
    ]
  }

  pub fn translated(&self, offset: Vec3) -> MinMaxAABB {
    MinMaxAABB {
      min: self.min + offset,
      max: self.max + offset,
    }
  }

  pub fn expanded(&self, amount: f32) -> MinMaxAABB {
    MinMaxAABB {
      min: self.min - Vec3::splat(amount),
      max: self.max + Vec3::splat(amount),
    }
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Packed RGBA color.
pub type Color32 = [u8; 4];

/// Mesh generation result: parallel per-vertex arrays plus triangle indices.
#[derive(Clone, Debug, Default)]
pub struct MeshOutput {
  pub positions: Vec<Vec3>,
  pub normals: Vec<Vec3>,
  pub materials: Vec<MaterialId>,
  /// Per-vertex colors derived from the material.
  pub colors: Vec<Color32>,
  /// Triangle indices (3 indices per triangle).
  pub indices: Vec<u32>,
  /// Bounding box encompassing all vertices.
  pub bounds: MinMaxAABB,
}

impl MeshOutput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear all buffers, preserving capacity.
  pub fn clear(&mut self) {
    self.positions.clear();
    self.normals.clear();
    self.materials.clear();
    self.colors.clear();
    self.indices.clear();
    self.bounds = MinMaxAABB::empty();
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
