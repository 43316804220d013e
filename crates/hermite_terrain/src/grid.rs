//! Dense 3D storage behind a pluggable [`Indexer`].

use glam::IVec3;

use crate::indexer::{Indexer, LinearIndexer};
use crate::types::HermiteVoxel;

/// Dense 3D array. Out-of-range access is a caller bug and panics.
#[derive(Clone, Debug)]
pub struct Grid<T, I: Indexer = LinearIndexer> {
  indexer: I,
  width: usize,
  height: usize,
  depth: usize,
  data: Vec<T>,
}

/// Hermite voxel grid, the storage unit of chunks and edits.
pub type VoxelGrid<I> = Grid<HermiteVoxel, I>;

impl<T: Clone + Default, I: Indexer> Grid<T, I> {
  pub fn new(width: usize, height: usize, depth: usize) -> Self {
    Self::filled(width, height, depth, T::default())
  }

  /// Grid of equal side length.
  pub fn cube(size: usize) -> Self {
    Self::new(size, size, size)
  }

  pub fn filled(width: usize, height: usize, depth: usize, value: T) -> Self {
    let indexer = I::for_size(width, height, depth);
    let data = vec![value; indexer.storage_len()];
    Self {
      indexer,
      width,
      height,
      depth,
      data,
    }
  }

  /// Reset every element.
  pub fn fill(&mut self, value: T) {
    self.data.fill(value);
  }

  /// Copy all elements from a grid of identical dimensions.
  pub fn copy_from(&mut self, other: &Grid<T, I>) {
    assert_eq!(self.dims(), other.dims(), "grid dimensions differ");
    self.data.clone_from_slice(&other.data);
  }
}

impl<T, I: Indexer> Grid<T, I> {
  #[inline]
  pub fn width(&self) -> usize {
    self.width
  }

  #[inline]
  pub fn height(&self) -> usize {
    self.height
  }

  #[inline]
  pub fn depth(&self) -> usize {
    self.depth
  }

  #[inline]
  pub fn dims(&self) -> (usize, usize, usize) {
    (self.width, self.height, self.depth)
  }

  /// Number of addressable cells.
  #[inline]
  pub fn len(&self) -> usize {
    self.width * self.height * self.depth
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn indexer(&self) -> &I {
    &self.indexer
  }

  /// True when the signed coordinate lies inside the grid.
  #[inline]
  pub fn contains(&self, p: IVec3) -> bool {
    p.x >= 0
      && p.y >= 0
      && p.z >= 0
      && (p.x as usize) < self.width
      && (p.y as usize) < self.height
      && (p.z as usize) < self.depth
  }

  #[inline]
  fn offset(&self, x: usize, y: usize, z: usize) -> usize {
    assert!(
      x < self.width && y < self.height && z < self.depth,
      "grid access ({x}, {y}, {z}) outside {}x{}x{}",
      self.width,
      self.height,
      self.depth
    );
    self.indexer.to_index(x, y, z)
  }

  #[inline]
  pub fn get(&self, x: usize, y: usize, z: usize) -> &T {
    let i = self.offset(x, y, z);
    &self.data[i]
  }

  #[inline]
  pub fn get_mut(&mut self, x: usize, y: usize, z: usize) -> &mut T {
    let i = self.offset(x, y, z);
    &mut self.data[i]
  }

  #[inline]
  pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) {
    let i = self.offset(x, y, z);
    self.data[i] = value;
  }

  /// Signed-coordinate access; negative coordinates panic like any other
  /// out-of-range access.
  #[inline]
  pub fn at(&self, p: IVec3) -> &T {
    assert!(self.contains(p), "grid access {p} out of bounds");
    self.get(p.x as usize, p.y as usize, p.z as usize)
  }

  #[inline]
  pub fn at_mut(&mut self, p: IVec3) -> &mut T {
    assert!(self.contains(p), "grid access {p} out of bounds");
    self.get_mut(p.x as usize, p.y as usize, p.z as usize)
  }

  /// Every in-bounds coordinate, x varying fastest.
  pub fn coords(&self) -> impl Iterator<Item = (usize, usize, usize)> {
    let (w, h, d) = self.dims();
    (0..d).flat_map(move |z| (0..h).flat_map(move |y| (0..w).map(move |x| (x, y, z))))
  }

  /// Iterate `(coordinate, value)` in x-fastest order.
  pub fn iter(&self) -> impl Iterator<Item = ((usize, usize, usize), &T)> {
    self.coords().map(move |(x, y, z)| ((x, y, z), self.get(x, y, z)))
  }

  /// Iterate `(coordinate, value)` in storage order. Cheaper than [`iter`]
  /// for layouts that are not x-fastest. Unused slots of padded layouts are
  /// skipped.
  ///
  /// [`iter`]: Self::iter
  pub fn iter_storage(&self) -> impl Iterator<Item = ((usize, usize, usize), &T)> {
    self.data.iter().enumerate().filter_map(move |(i, value)| {
      let (x, y, z) = self.indexer.from_index(i);
      (x < self.width && y < self.height && z < self.depth).then_some(((x, y, z), value))
    })
  }
}

impl<T: PartialEq, I: Indexer> PartialEq for Grid<T, I> {
  fn eq(&self, other: &Self) -> bool {
    // Equal dims give both grids the same layout.
    self.dims() == other.dims()
      && self
        .iter_storage()
        .zip(other.iter_storage())
        .all(|((_, a), (_, b))| a == b)
  }
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;
