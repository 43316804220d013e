//! Timing and size statistics for edits and chunk rebuilds.
//!
//! Collection is compiled in with the `metrics` feature and can be switched
//! off at runtime through [`COLLECT_METRICS`]. Without the feature every
//! `record_*` call is a no-op.

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// True when metrics are compiled in and enabled at runtime.
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Samples retained by each timing window.
pub const WINDOW_CAPACITY: usize = 128;

/// Fixed-capacity window of recent samples, oldest evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow {
  samples: VecDeque<u64>,
  capacity: usize,
}

impl RollingWindow {
  pub fn new(capacity: usize) -> Self {
    assert!(capacity > 0, "rolling window needs a non-zero capacity");
    Self {
      samples: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  pub fn push(&mut self, value: u64) {
    if self.samples.len() == self.capacity {
      self.samples.pop_front();
    }
    self.samples.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.samples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.samples.is_empty()
  }

  pub fn clear(&mut self) {
    self.samples.clear();
  }

  pub fn last(&self) -> Option<u64> {
    self.samples.back().copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
    self.samples.iter().copied()
  }

  pub fn sum(&self) -> u64 {
    self.samples.iter().sum()
  }

  pub fn average(&self) -> f64 {
    if self.samples.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.samples.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.samples.iter().min()?;
    let max = self.samples.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for RollingWindow {
  fn default() -> Self {
    Self::new(WINDOW_CAPACITY)
  }
}

/// Statistics a [`World`](crate::world::World) accumulates while editing and
/// rebuilding.
#[derive(Debug, Clone, Default)]
pub struct TerrainMetrics {
  /// SDF and grid edit durations in microseconds.
  pub edit_timings: RollingWindow,
  /// Rebuild pass durations in microseconds.
  pub rebuild_timings: RollingWindow,

  pub edits_applied: u64,
  /// Chunks whose voxels changed, summed over all edits.
  pub chunks_edited: u64,
  pub chunks_rebuilt: u64,

  /// Vertex and triangle totals of the last rebuild pass.
  pub last_rebuild_vertices: u64,
  pub last_rebuild_triangles: u64,
}

impl TerrainMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record_edit(&mut self, elapsed_us: u64, chunks_changed: usize) {
    if !is_enabled() {
      return;
    }
    self.edit_timings.push(elapsed_us);
    self.edits_applied += 1;
    self.chunks_edited += chunks_changed as u64;
  }

  pub fn record_rebuild(&mut self, elapsed_us: u64, chunks: usize, vertices: usize, triangles: usize) {
    if !is_enabled() {
      return;
    }
    self.rebuild_timings.push(elapsed_us);
    self.chunks_rebuilt += chunks as u64;
    self.last_rebuild_vertices = vertices as u64;
    self.last_rebuild_triangles = triangles as u64;
  }

  pub fn avg_edit_us(&self) -> f64 {
    self.edit_timings.average()
  }

  pub fn avg_rebuild_us(&self) -> f64 {
    self.rebuild_timings.average()
  }

  /// Clear timing windows; cumulative counters are kept.
  pub fn reset_timings(&mut self) {
    self.edit_timings.clear();
    self.rebuild_timings.clear();
  }
}
