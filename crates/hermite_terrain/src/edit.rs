//! Snapshot based undo and redo of world edits.
//!
//! An edit owns deep copies of every chunk it is about to overwrite, taken
//! before the write. Restoring swaps those copies in and hands back the
//! chunks it replaced, which is the edit that reverses the restore. Undo and
//! redo move that reverse edit to the other list:
//!
//! ```text
//!   apply E1 E2 E3     edits  = [E1 E2 E3]       undone = []
//!   undo               edits  = [E1 E2]          undone = [R3]
//!   undo               edits  = [E1]             undone = [R3 R2]
//!   redo               edits  = [E1 E2']         undone = [R3]
//!   undo               edits  = [E1]             undone = [R3 R2']
//! ```
//!
//! `Rn` reapplies edit n, `En'` reverses it again. Every entry restores the
//! state next to the current one, so each call moves exactly one step.

use std::collections::VecDeque;

use tracing::debug;

use crate::grid::VoxelGrid;
use crate::indexer::{Indexer, LinearIndexer};
use crate::world::{ChunkPos, World};

/// Voxels of one chunk, padding included, as they were before an edit.
#[derive(Clone, Debug)]
pub struct ChunkSnapshot<I: Indexer = LinearIndexer> {
  pub pos: ChunkPos,
  pub voxels: VoxelGrid<I>,
}

/// Receives the snapshots an edit produces.
pub trait EditConsumer<I: Indexer> {
  fn consume(&mut self, edit: VoxelEdit<I>);
}

impl<I: Indexer> EditConsumer<I> for Vec<VoxelEdit<I>> {
  fn consume(&mut self, edit: VoxelEdit<I>) {
    self.push(edit);
  }
}

#[derive(Clone, Debug)]
pub struct VoxelEdit<I: Indexer = LinearIndexer> {
  snapshots: Vec<ChunkSnapshot<I>>,
}

impl<I: Indexer> VoxelEdit<I> {
  pub fn new(snapshots: Vec<ChunkSnapshot<I>>) -> Self {
    Self { snapshots }
  }

  /// One edit owning the snapshots of all `edits`, in order.
  pub fn merge(edits: impl IntoIterator<Item = VoxelEdit<I>>) -> Self {
    Self {
      snapshots: edits.into_iter().flat_map(|e| e.snapshots).collect(),
    }
  }

  pub fn snapshots(&self) -> &[ChunkSnapshot<I>] {
    &self.snapshots
  }

  pub fn len(&self) -> usize {
    self.snapshots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.snapshots.is_empty()
  }

  /// Swap every snapshot into `world`. Returns the chunks it replaced as an
  /// edit that undoes this restore.
  pub fn restore(&self, world: &mut World<I>) -> VoxelEdit<I> {
    let mut replaced: Vec<ChunkSnapshot<I>> = self
      .snapshots
      .iter()
      .map(|snapshot| ChunkSnapshot {
        pos: snapshot.pos,
        voxels: world.swap_chunk_voxels(snapshot.pos, snapshot.voxels.clone()),
      })
      .collect();
    // A chunk listed twice ends with its last snapshot, so the reverse edit
    // must replay in the opposite order.
    replaced.reverse();
    for snapshot in &self.snapshots {
      world.propagate_padding(snapshot.pos);
    }
    VoxelEdit::new(replaced)
  }
}

/// Bounded linear undo/redo history.
#[derive(Debug)]
pub struct VoxelEditManager<I: Indexer = LinearIndexer> {
  queue_size: usize,
  edits: VecDeque<VoxelEdit<I>>,
  undone: Vec<VoxelEdit<I>>,
}

impl<I: Indexer> VoxelEditManager<I> {
  pub const DEFAULT_QUEUE_SIZE: usize = 16;

  pub fn new(queue_size: usize) -> Self {
    assert!(queue_size > 0, "edit queue size must be positive");
    Self {
      queue_size,
      edits: VecDeque::with_capacity(queue_size),
      undone: Vec::new(),
    }
  }

  pub fn queue_size(&self) -> usize {
    self.queue_size
  }

  /// Change the history bound. Oldest edits beyond it are dropped.
  pub fn set_queue_size(&mut self, queue_size: usize) {
    assert!(queue_size > 0, "edit queue size must be positive");
    self.queue_size = queue_size;
    while self.edits.len() > queue_size {
      self.edits.pop_front();
    }
  }

  pub fn can_undo(&self) -> bool {
    !self.edits.is_empty()
  }

  pub fn can_redo(&self) -> bool {
    !self.undone.is_empty()
  }

  /// Applied edits currently held.
  pub fn len(&self) -> usize {
    self.edits.len()
  }

  pub fn is_empty(&self) -> bool {
    self.edits.is_empty()
  }

  /// Record an applied edit. Drops the oldest one when full and forgets
  /// everything that was undone.
  pub fn queue_edit(&mut self, edit: VoxelEdit<I>) {
    self.push_applied(edit);
    self.undone.clear();
  }

  /// Restore the state before the newest applied edit.
  pub fn undo(&mut self, world: &mut World<I>) -> bool {
    let Some(edit) = self.edits.pop_back() else {
      return false;
    };
    let reverse = edit.restore(world);
    debug!(snapshots = edit.len(), remaining = self.edits.len(), "undo");
    self.undone.push(reverse);
    true
  }

  /// Re-apply the most recently undone edit.
  pub fn redo(&mut self, world: &mut World<I>) -> bool {
    let Some(edit) = self.undone.pop() else {
      return false;
    };
    let reverse = edit.restore(world);
    debug!(snapshots = edit.len(), remaining = self.undone.len(), "redo");
    self.push_applied(reverse);
    true
  }

  fn push_applied(&mut self, edit: VoxelEdit<I>) {
    if self.edits.len() >= self.queue_size {
      self.edits.pop_front();
    }
    self.edits.push_back(edit);
  }

  /// Drop all history.
  pub fn clear(&mut self) {
    self.edits.clear();
    self.undone.clear();
  }
}

impl<I: Indexer> Default for VoxelEditManager<I> {
  fn default() -> Self {
    Self::new(Self::DEFAULT_QUEUE_SIZE)
  }
}

impl<I: Indexer> EditConsumer<I> for VoxelEditManager<I> {
  fn consume(&mut self, edit: VoxelEdit<I>) {
    self.queue_edit(edit);
  }
}

#[cfg(test)]
#[path = "edit_test.rs"]
mod edit_test;
