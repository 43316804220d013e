//! Rebuild queue for chunk meshes.
//!
//! Following the stage pattern: Enqueue → Tick → Completions
//!
//! Uses rayon for parallel execution on all platforms.
//! On WASM, requires wasm-bindgen-rayon initialization before use.

use std::collections::HashMap;

use rayon::prelude::*;
use web_time::Instant;

use crate::cms::{CmsPolygonizer, FeatureThresholds, SharpFeatureSolver2D};
use crate::indexer::Indexer;
use crate::qef::SharpFeatureSolver;
use crate::types::MeshOutput;
use crate::world::{Chunk, ChunkPos};

/// Mesh built for one chunk.
pub struct RebuildCompletion {
  pub pos: ChunkPos,
  pub mesh: MeshOutput,
  /// Polygonize + tessellate time in microseconds.
  pub mesh_time_us: u64,
}

/// Stage that rebuilds queued chunk meshes in parallel.
#[derive(Default)]
pub struct RebuildQueue {
  pending: Vec<ChunkPos>,
  completed: Vec<RebuildCompletion>,
}

impl RebuildQueue {
  pub fn new() -> Self {
    Self::default()
  }

  /// Queue a chunk. Queuing the same chunk twice before a tick is a no-op.
  pub fn enqueue(&mut self, pos: ChunkPos) -> bool {
    if self.pending.contains(&pos) {
      return false;
    }
    self.pending.push(pos);
    true
  }

  /// Build every pending chunk still present in `chunks`.
  /// Returns the number of meshes built this tick.
  pub fn tick<I, P, S, S2>(&mut self, chunks: &HashMap<ChunkPos, Chunk<I>>, polygonizer: &CmsPolygonizer<P, S, S2>) -> usize
  where
    I: Indexer,
    P: FeatureThresholds + Sync,
    S: SharpFeatureSolver + Sync,
    S2: SharpFeatureSolver2D + Sync,
  {
    if self.pending.is_empty() {
      return 0;
    }

    let requests = std::mem::take(&mut self.pending);
    let completions: Vec<RebuildCompletion> = requests
      .into_par_iter()
      .filter_map(|pos| {
        let chunk = chunks.get(&pos)?;
        let start = Instant::now();
        let mesh = chunk.build_mesh(polygonizer);
        Some(RebuildCompletion {
          pos,
          mesh,
          mesh_time_us: start.elapsed().as_micros() as u64,
        })
      })
      .collect();

    let count = completions.len();
    self.completed.extend(completions);
    count
  }

  /// Take all built meshes.
  pub fn drain_completions(&mut self) -> Vec<RebuildCompletion> {
    std::mem::take(&mut self.completed)
  }

  pub fn pending_count(&self) -> usize {
    self.pending.len()
  }

  pub fn completed_count(&self) -> usize {
    self.completed.len()
  }

  /// True when no work remains.
  pub fn is_idle(&self) -> bool {
    self.pending.is_empty() && self.completed.is_empty()
  }
}

#[cfg(test)]
#[path = "task_queue_test.rs"]
mod task_queue_test;
