//! Errors for caller-supplied data.
//!
//! Coordinate contract violations panic instead; these variants cover input
//! that can legitimately be wrong at runtime (meshes, configs).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VoxelError {
  #[error("triangle list length {0} is not a multiple of 3")]
  NotATriangleList(usize),

  #[error("mesh has {vertices} vertices but {normals} normals")]
  NormalCountMismatch { vertices: usize, normals: usize },

  #[error("mesh has no triangles")]
  EmptyMesh,

  #[error("mesh contains a non-finite vertex at index {0}")]
  NonFiniteVertex(usize),

  #[error("invalid voxelization properties: {0}")]
  InvalidProperties(&'static str),

  #[error("grid {width}x{height}x{depth} is too small for padding {padding}")]
  GridTooSmall {
    width: usize,
    height: usize,
    depth: usize,
    padding: f32,
  },

  #[error("invalid world config: {0}")]
  InvalidConfig(&'static str),

  #[error("background task panicked or was dropped")]
  TaskLost,
}

pub type VoxelResult<T> = Result<T, VoxelError>;
