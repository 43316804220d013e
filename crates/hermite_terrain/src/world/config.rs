//! WorldConfig - chunk layout, meshing thresholds and placement of a world.

use glam::Affine3A;

use crate::cms::CmsProperties;
use crate::error::{VoxelError, VoxelResult};

#[derive(Clone, Debug)]
pub struct WorldConfig {
  /// Owned voxels per chunk along each axis.
  pub chunk_size: usize,

  /// Thresholds used when rebuilding chunk meshes.
  pub cms: CmsProperties,

  /// Local voxel space to global space.
  pub transform: Affine3A,

  /// Edits kept by undo managers created for this world.
  pub edit_queue_size: usize,
}

impl Default for WorldConfig {
  fn default() -> Self {
    Self {
      chunk_size: 16,
      cms: CmsProperties::default(),
      transform: Affine3A::IDENTITY,
      edit_queue_size: 16,
    }
  }
}

impl WorldConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
    self.chunk_size = chunk_size;
    self
  }

  pub fn with_cms(mut self, cms: CmsProperties) -> Self {
    self.cms = cms;
    self
  }

  pub fn with_transform(mut self, transform: Affine3A) -> Self {
    self.transform = transform;
    self
  }

  pub fn with_edit_queue_size(mut self, edit_queue_size: usize) -> Self {
    self.edit_queue_size = edit_queue_size;
    self
  }

  pub fn validate(&self) -> VoxelResult<()> {
    if self.chunk_size == 0 {
      return Err(VoxelError::InvalidConfig("chunk_size must be positive"));
    }
    if self.chunk_size > 1024 {
      return Err(VoxelError::InvalidConfig("chunk_size must not exceed 1024"));
    }
    if self.edit_queue_size == 0 {
      return Err(VoxelError::InvalidConfig("edit_queue_size must be positive"));
    }
    if !self.cms.is_valid() {
      return Err(VoxelError::InvalidConfig("cms thresholds must be cosines in [-1, 1]"));
    }
    let det = self.transform.matrix3.determinant();
    if !det.is_finite() || det.abs() < 1e-12 || !self.transform.translation.is_finite() {
      return Err(VoxelError::InvalidConfig("transform must be finite and invertible"));
    }
    Ok(())
  }
}
