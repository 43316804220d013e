//! Mirroring of neighbour voxels into a chunk's padding layer.
//!
//! ```text
//!   target (C - off)        source C
//!   ┌────────────┬─┐        ┌────────────┐
//!   │   owned    │p│ <───── │0           │   p = source voxel 0 along
//!   └────────────┴─┘        └────────────┘       every axis where off = 1
//! ```
//!
//! A chunk's padding is owned by its +X/+Y/+Z neighbours (and the diagonal
//! ones), so after writing chunk C the seven chunks C - off with
//! off ∈ {0,1}³ \ {0} need refreshing.

use glam::IVec3;

use super::{Chunk, ChunkPos};
use crate::indexer::Indexer;

/// The seven offsets from a chunk to the chunks whose padding it feeds.
pub const NEIGHBOR_OFFSETS: [IVec3; 7] = [
  IVec3::new(1, 0, 0),
  IVec3::new(0, 1, 0),
  IVec3::new(1, 1, 0),
  IVec3::new(0, 0, 1),
  IVec3::new(1, 0, 1),
  IVec3::new(0, 1, 1),
  IVec3::new(1, 1, 1),
];

/// Positions whose padding mirrors voxels of `pos`.
pub fn padding_targets(pos: ChunkPos) -> impl Iterator<Item = ChunkPos> {
  NEIGHBOR_OFFSETS.into_iter().map(move |off| pos.offset(-off))
}

/// Copy the voxels of `source` that `target` mirrors into its padding.
///
/// # Panics
///
/// When `source` is not a +X/+Y/+Z (or diagonal) neighbour of `target`, or
/// the chunk sizes differ.
pub fn update_padding<I: Indexer>(target: &mut Chunk<I>, source: &Chunk<I>) {
  assert_eq!(target.size(), source.size(), "padding between chunks of different size");
  let off = source.pos().as_ivec3() - target.pos().as_ivec3();
  let is_neighbor = off.cmpge(IVec3::ZERO).all() && off.cmple(IVec3::ONE).all() && off != IVec3::ZERO;
  assert!(
    is_neighbor,
    "chunk {:?} is not a -X/-Y/-Z neighbor of {:?}",
    target.pos(),
    source.pos()
  );

  let cs = target.size();
  let off = off.as_uvec3();
  let start = off * cs as u32;
  let end = start + 1 + (1 - off) * (cs as u32 - 1);

  let src = source.voxels();
  let dst = target.voxels_mut();
  for z in start.z as usize..end.z as usize {
    for y in start.y as usize..end.y as usize {
      for x in start.x as usize..end.x as usize {
        dst.set(x, y, z, *src.get(x % cs, y % cs, z % cs));
      }
    }
  }
}

#[cfg(test)]
#[path = "padding_test.rs"]
mod padding_test;
