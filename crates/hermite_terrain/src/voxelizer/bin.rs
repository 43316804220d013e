//! Triangle to ray-column binning.
//!
//! A column is the line of grid points along one axis with fixed `(u, v)`
//! coordinates on the other two axes. Each triangle lands in every column its
//! AABB footprint covers.

use glam::{IVec3, Vec3};
use rayon::prelude::*;

use crate::types::Axis;

/// Footprint widening so triangles lying exactly on a column are kept.
const BIN_EPSILON: f32 = 0.0001;

/// The two axes spanning the columns of rays cast along `axis`.
pub(crate) fn column_axes(axis: Axis) -> (Axis, Axis) {
  match axis {
    Axis::X => (Axis::Y, Axis::Z),
    Axis::Y => (Axis::X, Axis::Z),
    Axis::Z => (Axis::X, Axis::Y),
  }
}

pub(crate) fn column_count(axis: Axis, dims: [usize; 3]) -> usize {
  let (u, v) = column_axes(axis);
  dims[u.index()] * dims[v.index()]
}

/// `(u, v)` coordinates of column `index`, laid out as `v * dims[u] + u`.
pub(crate) fn column_coords(axis: Axis, dims: [usize; 3], index: usize) -> (usize, usize) {
  let (u, _) = column_axes(axis);
  let width = dims[u.index()];
  (index % width, index / width)
}

/// Grid point on column `(u, v)` at position `k` along `axis`.
pub(crate) fn column_point(axis: Axis, u: usize, v: usize, k: usize) -> (usize, usize, usize) {
  match axis {
    Axis::X => (k, u, v),
    Axis::Y => (u, k, v),
    Axis::Z => (u, v, k),
  }
}

/// Triangles binned into one column. Entries are first-vertex indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BinColumn {
  pub index: usize,
  pub triangles: Vec<usize>,
}

/// Bin every triangle for all three axes. Only non-empty columns are kept,
/// in ascending column order.
pub(crate) fn bin_triangles(
  vertices: &[Vec3],
  dims: [usize; 3],
  batch_size: usize,
) -> [Vec<BinColumn>; 3] {
  let last = IVec3::new(dims[0] as i32, dims[1] as i32, dims[2] as i32) - IVec3::ONE;

  let footprints: Vec<(IVec3, IVec3)> = vertices
    .par_chunks_exact(3)
    .with_min_len(batch_size)
    .map(|tri| {
      let min = tri[0].min(tri[1]).min(tri[2]) - Vec3::splat(BIN_EPSILON);
      let max = tri[0].max(tri[1]).max(tri[2]) + Vec3::splat(BIN_EPSILON);
      let lo = min.ceil().as_ivec3().max(IVec3::ZERO);
      let hi = max.floor().as_ivec3().min(last);
      (lo, hi)
    })
    .collect();

  Axis::ALL.map(|axis| collect_axis(axis, dims, &footprints))
}

fn collect_axis(axis: Axis, dims: [usize; 3], footprints: &[(IVec3, IVec3)]) -> Vec<BinColumn> {
  let (u, v) = column_axes(axis);
  let (u, v) = (u.index(), v.index());
  let width = dims[u];

  let mut columns: Vec<Vec<usize>> = vec![Vec::new(); column_count(axis, dims)];
  for (t, (lo, hi)) in footprints.iter().enumerate() {
    for cv in lo[v]..=hi[v] {
      for cu in lo[u]..=hi[u] {
        columns[cv as usize * width + cu as usize].push(t * 3);
      }
    }
  }

  columns
    .into_iter()
    .enumerate()
    .filter(|(_, triangles)| !triangles.is_empty())
    .map(|(index, triangles)| BinColumn { index, triangles })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_column_layout_round_trips() {
    let dims = [4, 5, 6];
    for axis in Axis::ALL {
      let (u, v) = column_axes(axis);
      let index = 3 * dims[u.index()] + 2;
      assert_eq!(column_coords(axis, dims, index), (2, 3));
    }
  }

  #[test]
  fn test_axis_aligned_triangle_bins_only_across_its_plane() {
    // Triangle in the plane x = 1.5 covering y, z in [1.5, 3.5].
    let vertices = [
      Vec3::new(1.5, 1.5, 1.5),
      Vec3::new(1.5, 3.5, 1.5),
      Vec3::new(1.5, 1.5, 3.5),
    ];
    let bins = bin_triangles(&vertices, [6, 6, 6], 1);

    let x_cols: Vec<_> = bins[0]
      .iter()
      .map(|c| column_coords(Axis::X, [6, 6, 6], c.index))
      .collect();
    assert_eq!(x_cols, vec![(2, 2), (3, 2), (2, 3), (3, 3)]);
    assert!(bins[0].iter().all(|c| c.triangles == vec![0]));

    // No integer x inside the footprint, so nothing to bin along Y or Z.
    assert!(bins[1].is_empty());
    assert!(bins[2].is_empty());
  }

  #[test]
  fn test_footprint_clamped_to_grid() {
    let vertices = [
      Vec3::new(-3.0, -3.0, 1.0),
      Vec3::new(9.0, -3.0, 1.0),
      Vec3::new(-3.0, 9.0, 1.0),
    ];
    let bins = bin_triangles(&vertices, [4, 4, 4], 1);
    assert_eq!(bins[2].len(), 16);
  }
}
