//! Coordinate to storage-offset mappings for dense 3D grids.
//!
//! ```text
//! LinearIndexer (x fastest):      MortonIndexer (Z-order):
//!
//!   index = x + y*W + z*W*H         index = ..z1y1x1 z0y0x0 (bit interleave)
//!
//!   neighbours along x are          neighbours in all three axes stay
//!   adjacent in memory              close in memory
//! ```
//!
//! Grids are generic over the indexer so the hot loops monomorphize and the
//! layout choice costs no dynamic dispatch.

/// Maps `(x, y, z)` to a linear storage offset and back.
pub trait Indexer: Clone + Send + Sync + 'static {
  /// Indexer for a grid of the given dimensions.
  fn for_size(width: usize, height: usize, depth: usize) -> Self;

  fn to_index(&self, x: usize, y: usize, z: usize) -> usize;

  fn from_index(&self, index: usize) -> (usize, usize, usize);

  /// Number of storage slots needed to address every in-bounds coordinate.
  fn storage_len(&self) -> usize;
}

/// Row-major layout, x varying fastest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearIndexer {
  width: usize,
  height: usize,
  depth: usize,
  stride: usize,
}

impl Indexer for LinearIndexer {
  fn for_size(width: usize, height: usize, depth: usize) -> Self {
    Self {
      width,
      height,
      depth,
      stride: width * height,
    }
  }

  #[inline(always)]
  fn to_index(&self, x: usize, y: usize, z: usize) -> usize {
    x + y * self.width + z * self.stride
  }

  #[inline(always)]
  fn from_index(&self, index: usize) -> (usize, usize, usize) {
    (
      index % self.width,
      (index / self.width) % self.height,
      (index / self.stride) % self.depth,
    )
  }

  fn storage_len(&self) -> usize {
    self.stride * self.depth
  }
}

/// Z-order (Morton) layout.
///
/// Supports up to 21 bits per axis. Storage length is derived from the code of
/// the largest coordinate, since interleaving is monotonic per axis, so grids
/// whose sides are not powers of two stay addressable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MortonIndexer {
  width: usize,
  height: usize,
  depth: usize,
}

impl MortonIndexer {
  /// Interleave three 21-bit coordinates.
  #[inline(always)]
  pub fn encode(x: u32, y: u32, z: u32) -> u64 {
    spread_bits(x as u64) | (spread_bits(y as u64) << 1) | (spread_bits(z as u64) << 2)
  }

  #[inline(always)]
  pub fn decode(code: u64) -> (u32, u32, u32) {
    (
      compact_bits(code) as u32,
      compact_bits(code >> 1) as u32,
      compact_bits(code >> 2) as u32,
    )
  }
}

impl Indexer for MortonIndexer {
  fn for_size(width: usize, height: usize, depth: usize) -> Self {
    assert!(
      width <= 1 << 21 && height <= 1 << 21 && depth <= 1 << 21,
      "morton indexer supports at most 2^21 cells per axis"
    );
    Self {
      width,
      height,
      depth,
    }
  }

  #[inline(always)]
  fn to_index(&self, x: usize, y: usize, z: usize) -> usize {
    Self::encode(x as u32, y as u32, z as u32) as usize
  }

  #[inline(always)]
  fn from_index(&self, index: usize) -> (usize, usize, usize) {
    let (x, y, z) = Self::decode(index as u64);
    (x as usize, y as usize, z as usize)
  }

  fn storage_len(&self) -> usize {
    if self.width == 0 || self.height == 0 || self.depth == 0 {
      return 0;
    }
    self.to_index(self.width - 1, self.height - 1, self.depth - 1) + 1
  }
}

/// Spread the low 21 bits of `v` so two zero bits follow each bit.
#[inline(always)]
fn spread_bits(v: u64) -> u64 {
  let mut x = v & 0x1f_ffff;
  x = (x | (x << 32)) & 0x001f_0000_0000_ffff;
  x = (x | (x << 16)) & 0x001f_0000_ff00_00ff;
  x = (x | (x << 8)) & 0x100f_00f0_0f00_f00f;
  x = (x | (x << 4)) & 0x10c3_0c30_c30c_30c3;
  x = (x | (x << 2)) & 0x1249_2492_4924_9249;
  x
}

/// Inverse of [`spread_bits`].
#[inline(always)]
fn compact_bits(v: u64) -> u64 {
  let mut x = v & 0x1249_2492_4924_9249;
  x = (x ^ (x >> 2)) & 0x10c3_0c30_c30c_30c3;
  x = (x ^ (x >> 4)) & 0x100f_00f0_0f00_f00f;
  x = (x ^ (x >> 8)) & 0x001f_0000_ff00_00ff;
  x = (x ^ (x >> 16)) & 0x001f_0000_0000_ffff;
  x = (x ^ (x >> 32)) & 0x1f_ffff;
  x
}

#[cfg(test)]
#[path = "indexer_test.rs"]
mod indexer_test;
