//! One cube of the world's voxels plus its cached mesh.
//!
//! ```text
//!   local 0 ............ size-1 | size
//!         owned voxels          | padding, mirrored from the +X/+Y/+Z
//!                               | neighbour's first layer
//! ```
//!
//! Cells span two grid points, so the last owned cell of a chunk reads the
//! padding layer. Keeping that layer in sync is [`super::padding`]'s job.

use glam::{Affine3A, IVec3};

use super::ChunkPos;
use crate::cms::{CmsPolygonizer, FeatureThresholds, PolygonizerOutput, PolygonizerScratch, SharpFeatureSolver2D};
use crate::color::MaterialColors;
use crate::grid::VoxelGrid;
use crate::indexer::{Indexer, LinearIndexer};
use crate::qef::SharpFeatureSolver;
use crate::tessellation::{tessellate_with_colors, DedupCache};
use crate::types::{HermiteVoxel, MaterialId, MeshOutput};

#[derive(Clone, Debug)]
pub struct Chunk<I: Indexer = LinearIndexer> {
  pos: ChunkPos,
  size: usize,
  voxels: VoxelGrid<I>,
  mesh: Option<MeshOutput>,
  needs_rebuild: bool,
}

impl<I: Indexer> Chunk<I> {
  /// Empty chunk of `size`³ owned voxels.
  pub fn new(pos: ChunkPos, size: usize) -> Self {
    assert!(size > 0, "chunk size must be positive");
    Self {
      pos,
      size,
      voxels: VoxelGrid::cube(size + 1),
      mesh: None,
      needs_rebuild: false,
    }
  }

  /// Chunk wrapping existing voxel data, including the padding layer.
  pub fn from_voxels(pos: ChunkPos, voxels: VoxelGrid<I>) -> Self {
    let (w, h, d) = voxels.dims();
    assert!(w == h && h == d && w > 1, "chunk voxels must be a cube of side size + 1, got {w}x{h}x{d}");
    Self {
      pos,
      size: w - 1,
      voxels,
      mesh: None,
      needs_rebuild: true,
    }
  }

  #[inline]
  pub fn pos(&self) -> ChunkPos {
    self.pos
  }

  #[inline]
  pub fn size(&self) -> usize {
    self.size
  }

  /// First voxel of this chunk in world voxel coordinates.
  #[inline]
  pub fn min_voxel(&self) -> IVec3 {
    self.pos.min_voxel(self.size)
  }

  #[inline]
  pub fn voxels(&self) -> &VoxelGrid<I> {
    &self.voxels
  }

  /// Mutable voxel access. Marks the chunk for rebuild.
  pub fn voxels_mut(&mut self) -> &mut VoxelGrid<I> {
    self.needs_rebuild = true;
    &mut self.voxels
  }

  #[inline]
  pub fn voxel(&self, x: usize, y: usize, z: usize) -> &HermiteVoxel {
    self.voxels.get(x, y, z)
  }

  #[inline]
  pub fn material(&self, x: usize, y: usize, z: usize) -> MaterialId {
    self.voxels.get(x, y, z).material
  }

  /// Swap in a new voxel buffer of the same size, returning the old one.
  pub fn replace_voxels(&mut self, voxels: VoxelGrid<I>) -> VoxelGrid<I> {
    assert_eq!(voxels.dims(), self.voxels.dims(), "replacement voxels must match the chunk size");
    self.needs_rebuild = true;
    std::mem::replace(&mut self.voxels, voxels)
  }

  #[inline]
  pub fn mesh(&self) -> Option<&MeshOutput> {
    self.mesh.as_ref()
  }

  #[inline]
  pub fn needs_rebuild(&self) -> bool {
    self.needs_rebuild
  }

  pub fn mark_rebuild(&mut self) {
    self.needs_rebuild = true;
  }

  /// True when [`crate::world::World::update`] should rebuild this chunk.
  #[inline]
  pub fn is_dirty(&self) -> bool {
    self.needs_rebuild || self.mesh.is_none()
  }

  /// Install a mesh built by [`Chunk::build_mesh`].
  pub fn set_mesh(&mut self, mesh: MeshOutput) {
    self.mesh = Some(mesh);
    self.needs_rebuild = false;
  }

  /// Deep copy of the voxels, padding included, without the mesh.
  pub fn snapshot(&self) -> Chunk<I> {
    Chunk {
      pos: self.pos,
      size: self.size,
      voxels: self.voxels.clone(),
      mesh: None,
      needs_rebuild: false,
    }
  }

  /// Polygonize every cell and tessellate the result in chunk-local space.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "chunk::build_mesh"))]
  pub fn build_mesh<P, S, S2>(&self, polygonizer: &CmsPolygonizer<P, S, S2>) -> MeshOutput
  where
    P: FeatureThresholds,
    S: SharpFeatureSolver,
    S2: SharpFeatureSolver2D,
  {
    let mut scratch = PolygonizerScratch::new();
    let mut polygonized = PolygonizerOutput::new();
    polygonizer.polygonize_grid(&self.voxels, &mut scratch, &mut polygonized);

    let mut mesh = MeshOutput::new();
    let mut cache = DedupCache::new();
    tessellate_with_colors(&polygonized, &Affine3A::IDENTITY, &MaterialColors, &mut cache, &mut mesh);
    mesh
  }
}

#[cfg(test)]
#[path = "chunk_test.rs"]
mod chunk_test;
