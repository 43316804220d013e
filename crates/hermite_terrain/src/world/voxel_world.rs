//! World - sparse chunk map with grid and SDF edits, raycasting and mesh
//! rebuilds.
//!
//! # Edit flow
//!
//! ```text
//!   snapshot (1-voxel wider range, optional)
//!        │
//!   create missing chunks
//!        │
//!   per-chunk job in parallel ──► new voxel buffers
//!        │
//!   publish buffers, mark needs_rebuild
//!        │
//!   propagate padding to -X/-Y/-Z neighbours
//! ```
//!
//! Chunks are taken out of the map (or only read) while jobs run, so a chunk
//! is either entirely before or entirely after an edit.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Affine3A, IVec3, Quat, Vec3};
use rayon::prelude::*;
use tracing::debug;
use web_time::Instant;

use super::padding::{padding_targets, update_padding, NEIGHBOR_OFFSETS};
use super::{Chunk, ChunkPos, WorldConfig};
use crate::cms::{CmsPolygonizer, IntersectionSolver2D};
use crate::edit::{ChunkSnapshot, EditConsumer, VoxelEdit, VoxelEditManager};
use crate::error::VoxelResult;
use crate::grid::VoxelGrid;
use crate::indexer::{Indexer, LinearIndexer};
use crate::metrics::TerrainMetrics;
use crate::qef::SvdQefSolver;
use crate::sdf::{Sdf, TransformSdf};
use crate::sdf_edit;
use crate::task_queue::RebuildQueue;
use crate::types::{HermiteVoxel, MaterialId, AIR};

// =============================================================================
// WorldId - unique identifier
// =============================================================================

static WORLD_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque world identifier, unique within the process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct WorldId(u64);

impl WorldId {
  pub fn new() -> Self {
    Self(WORLD_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  pub fn raw(&self) -> u64 {
    self.0
  }
}

impl Default for WorldId {
  fn default() -> Self {
    Self::new()
  }
}

// =============================================================================
// Options and results
// =============================================================================

/// How [`World::apply_grid`] writes a grid into chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApplyGridOptions {
  /// Refresh neighbour padding after writing.
  pub propagate_padding: bool,
  /// Also write each chunk's padding layer.
  pub include_padding: bool,
  /// Copy voxels that were never set, not only stamped ones.
  pub write_unset: bool,
}

impl Default for ApplyGridOptions {
  fn default() -> Self {
    Self {
      propagate_padding: true,
      include_padding: false,
      write_unset: false,
    }
  }
}

impl ApplyGridOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_propagate_padding(mut self, propagate_padding: bool) -> Self {
    self.propagate_padding = propagate_padding;
    self
  }

  pub fn with_include_padding(mut self, include_padding: bool) -> Self {
    self.include_padding = include_padding;
    self
  }

  pub fn with_write_unset(mut self, write_unset: bool) -> Self {
    self.write_unset = write_unset;
    self
  }
}

/// Distance a raycast advances per step, in voxels.
pub const RAYCAST_STEP: f32 = 0.1;

/// First solid cell found by [`World::raycast`], in local voxel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RayHit {
  /// Cell whose corners contain solid material.
  pub cell: IVec3,
  /// Cell visited just before `cell`; equals `cell` when the ray starts inside.
  pub side: IVec3,
  /// Chunk owning the solid corner.
  pub chunk: ChunkPos,
}

// =============================================================================
// World
// =============================================================================

pub struct World<I: Indexer = LinearIndexer> {
  pub id: WorldId,
  config: WorldConfig,
  inverse_transform: Affine3A,
  chunks: HashMap<ChunkPos, Chunk<I>>,
  polygonizer: CmsPolygonizer,
  rebuild_queue: RebuildQueue,
  metrics: TerrainMetrics,
}

impl<I: Indexer> World<I> {
  pub fn new(config: WorldConfig) -> VoxelResult<Self> {
    config.validate()?;
    Ok(Self {
      id: WorldId::new(),
      inverse_transform: config.transform.inverse(),
      polygonizer: CmsPolygonizer::with_parts(config.cms, SvdQefSolver::new(), IntersectionSolver2D),
      config,
      chunks: HashMap::new(),
      rebuild_queue: RebuildQueue::new(),
      metrics: TerrainMetrics::new(),
    })
  }

  #[inline]
  pub fn config(&self) -> &WorldConfig {
    &self.config
  }

  #[inline]
  pub fn chunk_size(&self) -> usize {
    self.config.chunk_size
  }

  #[inline]
  pub fn transform(&self) -> &Affine3A {
    &self.config.transform
  }

  /// Move the world. The transform must be invertible.
  pub fn set_transform(&mut self, transform: Affine3A) {
    let det = transform.matrix3.determinant();
    assert!(det.is_finite() && det.abs() > 1e-12, "world transform must be invertible");
    self.config.transform = transform;
    self.inverse_transform = transform.inverse();
  }

  pub fn polygonizer(&self) -> &CmsPolygonizer {
    &self.polygonizer
  }

  pub fn metrics(&self) -> &TerrainMetrics {
    &self.metrics
  }

  /// Undo manager sized by this world's config.
  pub fn new_edit_manager(&self) -> VoxelEditManager<I> {
    VoxelEditManager::new(self.config.edit_queue_size)
  }

  // ---------------------------------------------------------------------------
  // Coordinates
  // ---------------------------------------------------------------------------

  /// Global point to local voxel space.
  #[inline]
  pub fn world_to_local(&self, p: Vec3) -> Vec3 {
    self.inverse_transform.transform_point3(p)
  }

  /// Local voxel space point to global space.
  #[inline]
  pub fn local_to_world(&self, p: Vec3) -> Vec3 {
    self.config.transform.transform_point3(p)
  }

  #[inline]
  pub fn world_dir_to_local(&self, d: Vec3) -> Vec3 {
    self.inverse_transform.transform_vector3(d)
  }

  // ---------------------------------------------------------------------------
  // Chunk access
  // ---------------------------------------------------------------------------

  pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk<I>> {
    self.chunks.get(&pos)
  }

  pub fn chunk_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk<I>> {
    self.chunks.get_mut(&pos)
  }

  pub fn chunks(&self) -> impl Iterator<Item = &Chunk<I>> {
    self.chunks.values()
  }

  pub fn chunk_count(&self) -> usize {
    self.chunks.len()
  }

  /// Drop every chunk.
  pub fn clear(&mut self) {
    self.chunks.clear();
  }

  /// Voxel at a local voxel coordinate, if its chunk exists.
  pub fn voxel(&self, p: IVec3) -> Option<&HermiteVoxel> {
    let cs = self.chunk_size();
    let pos = ChunkPos::from_voxel(p, cs);
    let local = (p - pos.min_voxel(cs)).as_uvec3();
    self
      .chunks
      .get(&pos)
      .map(|chunk| chunk.voxel(local.x as usize, local.y as usize, local.z as usize))
  }

  /// Material at a local voxel coordinate; air where no chunk exists.
  pub fn material(&self, p: IVec3) -> MaterialId {
    self.voxel(p).map_or(AIR, |v| v.material)
  }

  /// Create `pos` if missing, pulling its padding from existing neighbours.
  fn ensure_chunk(&mut self, pos: ChunkPos) {
    if self.chunks.contains_key(&pos) {
      return;
    }
    let mut chunk = Chunk::new(pos, self.chunk_size());
    for off in NEIGHBOR_OFFSETS {
      if let Some(source) = self.chunks.get(&pos.offset(off)) {
        update_padding(&mut chunk, source);
      }
    }
    self.chunks.insert(pos, chunk);
  }

  /// Copy `pos`'s border voxels into the padding of its negative neighbours.
  pub fn propagate_padding(&mut self, pos: ChunkPos) {
    if !self.chunks.contains_key(&pos) {
      return;
    }
    for target_pos in padding_targets(pos) {
      let Some(mut target) = self.chunks.remove(&target_pos) else {
        continue;
      };
      if let Some(source) = self.chunks.get(&pos) {
        update_padding(&mut target, source);
      }
      self.chunks.insert(target_pos, target);
    }
  }

  // ---------------------------------------------------------------------------
  // Snapshots
  // ---------------------------------------------------------------------------

  /// Deep copies of every chunk in `min..=max`. Missing chunks are recorded
  /// as empty so restoring clears whatever was written there since.
  pub fn snapshot_range(&self, min: ChunkPos, max: ChunkPos) -> VoxelEdit<I> {
    let cs = self.chunk_size();
    let snapshots = ChunkPos::range(min, max)
      .map(|pos| ChunkSnapshot {
        pos,
        voxels: match self.chunks.get(&pos) {
          Some(chunk) => chunk.voxels().clone(),
          None => VoxelGrid::cube(cs + 1),
        },
      })
      .collect();
    VoxelEdit::new(snapshots)
  }

  /// Snapshot of every chunk a grid write at `origin` of `dims` could touch,
  /// padding neighbours included.
  pub fn snapshot_region(&self, origin: IVec3, dims: (usize, usize, usize)) -> VoxelEdit<I> {
    let cs = self.chunk_size();
    let end = origin + IVec3::new(dims.0 as i32, dims.1 as i32, dims.2 as i32);
    self.snapshot_range(
      ChunkPos::from_voxel(origin - IVec3::ONE, cs),
      ChunkPos::from_voxel(end + IVec3::ONE, cs),
    )
  }

  /// Put `voxels`, padding included, into chunk `pos` and return what it held.
  /// A missing chunk is created and reported as empty. Neighbours are not
  /// touched.
  pub fn swap_chunk_voxels(&mut self, pos: ChunkPos, voxels: VoxelGrid<I>) -> VoxelGrid<I> {
    let cs = self.chunk_size();
    self
      .chunks
      .entry(pos)
      .or_insert_with(|| Chunk::new(pos, cs))
      .replace_voxels(voxels)
  }

  // ---------------------------------------------------------------------------
  // Grid edits
  // ---------------------------------------------------------------------------

  /// Write `grid` into the world with its first voxel at local voxel `origin`.
  ///
  /// Unset grid voxels are skipped unless `write_unset`. With a consumer the
  /// affected chunks are snapshotted first.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "world::apply_grid"))]
  pub fn apply_grid<J: Indexer>(
    &mut self,
    origin: IVec3,
    grid: &VoxelGrid<J>,
    options: ApplyGridOptions,
    consumer: Option<&mut dyn EditConsumer<I>>,
  ) {
    if grid.is_empty() {
      return;
    }
    let start = Instant::now();
    let cs = self.chunk_size();
    let (w, h, d) = grid.dims();
    let last = origin + IVec3::new(w as i32 - 1, h as i32 - 1, d as i32 - 1);

    if let Some(consumer) = consumer {
      consumer.consume(self.snapshot_region(origin, grid.dims()));
    }

    let positions: Vec<ChunkPos> =
      ChunkPos::range(ChunkPos::from_voxel(origin, cs), ChunkPos::from_voxel(last, cs)).collect();
    for &pos in &positions {
      self.ensure_chunk(pos);
    }

    let extent = cs + options.include_padding as usize;
    let mut batch: Vec<Chunk<I>> = positions.iter().filter_map(|pos| self.chunks.remove(pos)).collect();
    batch
      .par_iter_mut()
      .for_each(|chunk| copy_grid_into(chunk, origin, grid, extent, options.write_unset));
    for chunk in batch {
      self.chunks.insert(chunk.pos(), chunk);
    }

    if options.propagate_padding {
      for &pos in &positions {
        self.propagate_padding(pos);
      }
    }

    let elapsed_us = start.elapsed().as_micros() as u64;
    self.metrics.record_edit(elapsed_us, positions.len());
    debug!(chunks = positions.len(), elapsed_us, "applied grid");
  }

  // ---------------------------------------------------------------------------
  // SDF edits
  // ---------------------------------------------------------------------------

  /// Stamp `sdf`, placed at global `position` and `rotation`, into the world.
  ///
  /// The field is evaluated in local voxel units. Material 0 carves; with
  /// `replace` only solid voxels change material. Returns true when any
  /// material changed.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "world::apply_sdf"))]
  pub fn apply_sdf<S: Sdf + ?Sized>(
    &mut self,
    position: Vec3,
    rotation: Quat,
    sdf: &S,
    material: MaterialId,
    replace: bool,
    consumer: Option<&mut dyn EditConsumer<I>>,
  ) -> bool {
    let start = Instant::now();
    let cs = self.chunk_size();

    let local_position = self.world_to_local(position);
    let (_, world_rotation, _) = self.config.transform.to_scale_rotation_translation();
    let local_rotation = world_rotation.inverse() * rotation;
    let placed = TransformSdf::new(Affine3A::from_rotation_translation(local_rotation, local_position), sdf);

    let bounds = placed.bounds();
    if !bounds.is_valid() {
      return false;
    }

    if let Some(consumer) = consumer {
      consumer.consume(self.snapshot_range(
        ChunkPos::from_point(bounds.min - Vec3::ONE, cs),
        ChunkPos::from_point(bounds.max + Vec3::ONE, cs),
      ));
    }

    let positions: Vec<ChunkPos> =
      ChunkPos::range(ChunkPos::from_point(bounds.min, cs), ChunkPos::from_point(bounds.max, cs)).collect();
    for &pos in &positions {
      self.ensure_chunk(pos);
    }

    let results: Vec<(ChunkPos, VoxelGrid<I>, bool)> = {
      let _span = tracing::info_span!("sdf_chunk_jobs").entered();
      let chunks = &self.chunks;
      positions
        .par_iter()
        .filter_map(|&pos| {
          let chunk = chunks.get(&pos)?;
          let origin = -pos.min_voxel(cs).as_vec3();
          let (voxels, changed) = sdf_edit::apply_sdf(chunk.voxels(), origin, &placed, material, replace);
          Some((pos, voxels, changed))
        })
        .collect()
    };

    let mut any_changed = false;
    let mut changed_chunks = 0;
    for (pos, voxels, changed) in results {
      let Some(chunk) = self.chunks.get_mut(&pos) else {
        continue;
      };
      any_changed |= changed;
      // Crossings can move without any material changing.
      if changed || voxels != *chunk.voxels() {
        chunk.replace_voxels(voxels);
        changed_chunks += 1;
      }
    }

    for &pos in &positions {
      self.propagate_padding(pos);
    }

    let elapsed_us = start.elapsed().as_micros() as u64;
    self.metrics.record_edit(elapsed_us, changed_chunks);
    debug!(
      chunks = positions.len(),
      changed = changed_chunks,
      elapsed_ms = elapsed_us as f64 / 1000.0,
      "applied sdf edit"
    );
    any_changed
  }

  // ---------------------------------------------------------------------------
  // Queries
  // ---------------------------------------------------------------------------

  /// March from global `origin` along `dir` for up to `max_distance` local
  /// voxel units, reporting the first cell with a solid corner.
  pub fn raycast(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<RayHit> {
    let cs = self.chunk_size();
    let mut pos = self.world_to_local(origin);
    let dir = self.world_dir_to_local(dir).normalize_or_zero();
    if dir == Vec3::ZERO || max_distance.is_nan() || max_distance <= 0.0 {
      return None;
    }
    let step = dir * RAYCAST_STEP;
    let steps = (max_distance / RAYCAST_STEP).ceil() as usize;

    let mut prev: Option<IVec3> = None;
    for _ in 0..steps {
      let cell = pos.floor().as_ivec3();
      if prev != Some(cell) {
        for z in 0..2 {
          for y in 0..2 {
            for x in 0..2 {
              let corner = cell + IVec3::new(x, y, z);
              if self.material(corner) != AIR {
                return Some(RayHit {
                  cell,
                  side: prev.unwrap_or(cell),
                  chunk: ChunkPos::from_voxel(corner, cs),
                });
              }
            }
          }
        }
        prev = Some(cell);
      }
      pos += step;
    }
    None
  }

  // ---------------------------------------------------------------------------
  // Meshing
  // ---------------------------------------------------------------------------

  /// Rebuild the mesh of every chunk that needs one. Returns the number of
  /// chunks rebuilt.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "world::update"))]
  pub fn update(&mut self) -> usize {
    let start = Instant::now();
    for chunk in self.chunks.values() {
      if chunk.is_dirty() {
        self.rebuild_queue.enqueue(chunk.pos());
      }
    }
    if self.rebuild_queue.pending_count() == 0 {
      return 0;
    }

    let built = self.rebuild_queue.tick(&self.chunks, &self.polygonizer);
    let (mut vertices, mut triangles) = (0, 0);
    for completion in self.rebuild_queue.drain_completions() {
      if let Some(chunk) = self.chunks.get_mut(&completion.pos) {
        vertices += completion.mesh.vertex_count();
        triangles += completion.mesh.triangle_count();
        chunk.set_mesh(completion.mesh);
      }
    }

    let elapsed_us = start.elapsed().as_micros() as u64;
    self.metrics.record_rebuild(elapsed_us, built, vertices, triangles);
    debug!(chunks = built, vertices, triangles, elapsed_us, "rebuilt chunk meshes");
    built
  }
}

/// Copy the part of `grid` (placed at `origin`) that overlaps `chunk`'s first
/// `extent` voxels along each axis.
fn copy_grid_into<I: Indexer, J: Indexer>(
  chunk: &mut Chunk<I>,
  origin: IVec3,
  grid: &VoxelGrid<J>,
  extent: usize,
  write_unset: bool,
) {
  let (w, h, d) = grid.dims();
  let offset = chunk.min_voxel() - origin;
  let lo = (-offset).max(IVec3::ZERO);
  let hi = (IVec3::new(w as i32, h as i32, d as i32) - offset).min(IVec3::splat(extent as i32));
  if lo.cmpge(hi).any() {
    return;
  }

  let voxels = chunk.voxels_mut();
  for z in lo.z..hi.z {
    for y in lo.y..hi.y {
      for x in lo.x..hi.x {
        let local = IVec3::new(x, y, z);
        let src = grid.at(local + offset);
        if write_unset || src.is_set {
          *voxels.at_mut(local) = *src;
        }
      }
    }
  }
}

#[cfg(test)]
#[path = "voxel_world_test.rs"]
mod voxel_world_test;
