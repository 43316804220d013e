//! Mesh voxelizer - scan-converts a closed triangle list into hermite voxels.
//!
//! # Stages
//!
//! ```text
//!   scale ──► bin ──► intersect (X | Y | Z) ──► fill ──► populate ──► patch
//!    │         │            │                     │          │           │
//!   fit      triangle   ray per column,        parity     snap hits   nearest
//!   grid     → columns  sorted hits            materials  onto edges  triangle
//!   minus    per axis                                     or record   for every
//!   padding                                               a hole      hole
//! ```
//!
//! Pure per-axis parity leaves transitions where no ray crossed cleanly
//! (face and edge junctions, grazing faces). Those become holes and get an
//! intersection from the closest triangle, so every solid/empty transition
//! ends up with a normal.
//!
//! [`voxelize`] runs the stages on the calling thread (each stage fans out on
//! rayon). [`voxelize_async`] runs the whole pipeline on the rayon pool and
//! hands back a [`VoxelizationJob`].

mod bin;
mod fill;
mod intersect;
mod job;
mod patch;
mod scale;

use glam::Vec3;
use tracing::debug;
use web_time::Instant;

use crate::error::{VoxelError, VoxelResult};
use crate::grid::VoxelGrid;
use crate::indexer::Indexer;
use crate::types::{Axis, MaterialId};

pub use intersect::{flat_normal, intersect_triangle};
pub use job::{voxelize_async, VoxelizationJob, VoxelizationOutput};
pub use patch::point_triangle_distance_sq;
pub use scale::scale_to_grid;

/// Tuning for [`voxelize`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelizationProperties {
  /// Minimum work items per rayon split in the parallel stages.
  pub batch_size: usize,
  /// Gap between the scaled mesh and the grid boundary, in voxels. Must be > 0.
  pub padding: f32,
  /// Minimum `|normal · axis|` for a hit to be snapped onto an edge along
  /// that axis. Raising it sends more transitions to the patch pass.
  pub angle_threshold: f32,
  /// Maximum distance between an edge center and a hit for the hit to be
  /// used on that edge. Should be at least 0.5 and below 1.5 voxels.
  pub snap_threshold: f32,
  /// Interpolate vertex normals instead of using face normals. Only useful
  /// when vertex normals stay close to the face normals.
  pub smooth_normals: bool,
}

impl VoxelizationProperties {
  /// Face normals.
  pub const FLAT: Self = Self {
    batch_size: 32,
    padding: 1.0,
    angle_threshold: 0.05,
    snap_threshold: 0.8,
    smooth_normals: false,
  };

  /// Interpolated vertex normals.
  pub const SMOOTH: Self = Self {
    smooth_normals: true,
    ..Self::FLAT
  };

  pub fn with_batch_size(mut self, batch_size: usize) -> Self {
    self.batch_size = batch_size;
    self
  }

  pub fn with_padding(mut self, padding: f32) -> Self {
    self.padding = padding;
    self
  }

  pub fn with_angle_threshold(mut self, angle_threshold: f32) -> Self {
    self.angle_threshold = angle_threshold;
    self
  }

  pub fn with_snap_threshold(mut self, snap_threshold: f32) -> Self {
    self.snap_threshold = snap_threshold;
    self
  }

  pub fn with_smooth_normals(mut self, smooth_normals: bool) -> Self {
    self.smooth_normals = smooth_normals;
    self
  }

  pub fn validate(&self) -> VoxelResult<()> {
    if self.batch_size == 0 {
      return Err(VoxelError::InvalidProperties("batch_size must be positive"));
    }
    if !self.padding.is_finite() || self.padding <= 0.0 {
      return Err(VoxelError::InvalidProperties("padding must be positive"));
    }
    if !(0.0..1.0).contains(&self.angle_threshold) {
      return Err(VoxelError::InvalidProperties("angle_threshold must be in [0, 1)"));
    }
    if !self.snap_threshold.is_finite() || self.snap_threshold <= 0.0 {
      return Err(VoxelError::InvalidProperties("snap_threshold must be positive"));
    }
    Ok(())
  }
}

impl Default for VoxelizationProperties {
  fn default() -> Self {
    Self::FLAT
  }
}

/// Counts from one voxelization run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoxelizationReport {
  pub triangles: usize,
  /// Ray columns with at least one binned triangle, over all three axes.
  pub columns: usize,
  pub intersections: usize,
  /// Transitions with no usable ray hit.
  pub holes: usize,
  pub patches: usize,
}

impl VoxelizationReport {
  /// Holes that did not receive a patch. Zero for any non-empty mesh.
  pub fn unpatched(&self) -> usize {
    self.holes.saturating_sub(self.patches)
  }
}

/// Voxelize a flat triangle list into `grid` with `material`.
///
/// The mesh is scaled uniformly to fit the grid minus `padding` on every
/// side and centered. Voxels become solid by ray parity, edges receive the
/// crossing position and normal. Existing voxels outside the mesh are left
/// untouched.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "voxelizer::voxelize"))]
pub fn voxelize<I: Indexer>(
  vertices: &[Vec3],
  normals: &[Vec3],
  grid: &mut VoxelGrid<I>,
  material: MaterialId,
  properties: &VoxelizationProperties,
) -> VoxelResult<VoxelizationReport> {
  validate_input(vertices, normals, grid, properties)?;

  let start = Instant::now();
  let dims = [grid.width(), grid.height(), grid.depth()];

  let scaled = {
    let _span = tracing::info_span!("voxelize_scale").entered();
    scale_to_grid(vertices, dims, properties.padding)
  };

  let bins = {
    let _span = tracing::info_span!("voxelize_bin").entered();
    bin::bin_triangles(&scaled, dims, properties.batch_size)
  };

  let columns = {
    let _span = tracing::info_span!("voxelize_intersect").entered();
    Axis::ALL.map(|axis| {
      intersect::intersect_axis(
        axis,
        &bins[axis.index()],
        &scaled,
        normals,
        dims,
        properties.smooth_normals,
        properties.batch_size,
      )
    })
  };

  let holes = {
    let _span = tracing::info_span!("voxelize_fill").entered();
    for axis_columns in &columns {
      fill::fill_materials(grid, axis_columns, material);
    }
    let mut holes = Vec::new();
    for axis_columns in &columns {
      fill::populate_edges(grid, axis_columns, material, properties, &mut holes);
    }
    holes
  };

  let patches = {
    let _span = tracing::info_span!("voxelize_patch").entered();
    let patches = patch::find_patches(&holes, &scaled, normals, properties);
    patch::apply_patches(grid, &patches);
    patches
  };

  let report = VoxelizationReport {
    triangles: vertices.len() / 3,
    columns: columns.iter().map(Vec::len).sum(),
    intersections: columns
      .iter()
      .flat_map(|axis| axis.iter().map(|c| c.hits.len()))
      .sum(),
    holes: holes.len(),
    patches: patches.len(),
  };

  debug!(
    triangles = report.triangles,
    columns = report.columns,
    intersections = report.intersections,
    holes = report.holes,
    patches = report.patches,
    elapsed_us = start.elapsed().as_micros() as u64,
    "voxelized mesh"
  );

  Ok(report)
}

fn validate_input<I: Indexer>(
  vertices: &[Vec3],
  normals: &[Vec3],
  grid: &VoxelGrid<I>,
  properties: &VoxelizationProperties,
) -> VoxelResult<()> {
  properties.validate()?;

  if vertices.len() % 3 != 0 {
    return Err(VoxelError::NotATriangleList(vertices.len()));
  }
  if vertices.is_empty() {
    return Err(VoxelError::EmptyMesh);
  }
  if normals.len() != vertices.len() {
    return Err(VoxelError::NormalCountMismatch {
      vertices: vertices.len(),
      normals: normals.len(),
    });
  }
  if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
    return Err(VoxelError::NonFiniteVertex(index));
  }

  let (width, height, depth) = grid.dims();
  let smallest = width.min(height).min(depth) as f32;
  if smallest / 2.0 - properties.padding <= 0.0 {
    return Err(VoxelError::GridTooSmall {
      width,
      height,
      depth,
      padding: properties.padding,
    });
  }

  Ok(())
}
