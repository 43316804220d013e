//! Per-column ray casting against binned triangles.

use glam::Vec3;
use rayon::prelude::*;

use super::bin::{column_axes, column_coords, BinColumn};
use crate::types::Axis;

/// Determinant below which a ray counts as parallel to a triangle.
const PARALLEL_EPSILON: f32 = 0.00001;

/// Rays start this far off the column line so they never run exactly along
/// a triangle diagonal lying on integer coordinates.
const RAY_OFFSET: f32 = 0.0001;

/// One ray hit: distance along the axis in grid units and surface normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Intersection {
  pub distance: f32,
  pub normal: Vec3,
}

/// Sorted hits of one column.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct IntersectionColumn {
  pub axis: Axis,
  pub index: usize,
  pub hits: Vec<Intersection>,
}

/// Face normal of the triangle `(a, b, c)`; outward for counter-clockwise
/// winding. Zero for degenerate triangles.
pub fn flat_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
  (c - b).cross(a - b).normalize_or_zero()
}

/// Möller-Trumbore ray/triangle test, two-sided.
///
/// Returns `(t, u, v)` where the hit point is `orig + t * dir` and `u`, `v`
/// are the barycentric weights of `v1` and `v2`.
pub fn intersect_triangle(orig: Vec3, dir: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<(f32, f32, f32)> {
  let edge1 = v1 - v0;
  let edge2 = v2 - v0;

  let pvec = dir.cross(edge2);
  let det = edge1.dot(pvec);
  let tvec = orig - v0;
  let qvec = tvec.cross(edge1);

  let u = tvec.dot(pvec);
  let v = dir.dot(qvec);

  if det > PARALLEL_EPSILON {
    if u < 0.0 || u > det || v < 0.0 || u + v > det {
      return None;
    }
  } else if det < -PARALLEL_EPSILON {
    if u > 0.0 || u < det || v > 0.0 || u + v < det {
      return None;
    }
  } else {
    return None;
  }

  let inv_det = 1.0 / det;
  Some((edge2.dot(qvec) * inv_det, u * inv_det, v * inv_det))
}

/// Cast one ray per binned column along `axis` and collect sorted hits.
pub(crate) fn intersect_axis(
  axis: Axis,
  bins: &[BinColumn],
  vertices: &[Vec3],
  normals: &[Vec3],
  dims: [usize; 3],
  smooth_normals: bool,
  batch_size: usize,
) -> Vec<IntersectionColumn> {
  let length = dims[axis.index()] as f32;
  let dir = axis.unit() * length;

  bins
    .par_iter()
    .with_min_len(batch_size)
    .map(|column| {
      let orig = ray_origin(axis, dims, column.index);
      let mut hits: Vec<Intersection> = column
        .triangles
        .iter()
        .filter_map(|&t| {
          let (a, b, c) = (vertices[t], vertices[t + 1], vertices[t + 2]);
          let (hit, bu, bv) = intersect_triangle(orig, dir, a, b, c)?;
          let normal = if smooth_normals {
            ((1.0 - bu - bv) * normals[t] + bu * normals[t + 1] + bv * normals[t + 2]).normalize_or_zero()
          } else {
            flat_normal(a, b, c)
          };
          Some(Intersection {
            distance: hit * length,
            normal,
          })
        })
        .collect();
      hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
      IntersectionColumn {
        axis,
        index: column.index,
        hits,
      }
    })
    .collect()
}

/// Start of the ray through column `index`, nudged off the integer lattice
/// along the axis that follows the second column axis cyclically.
pub(crate) fn ray_origin(axis: Axis, dims: [usize; 3], index: usize) -> Vec3 {
  let (u_axis, v_axis) = column_axes(axis);
  let (u, v) = column_coords(axis, dims, index);
  let mut orig = u_axis.unit() * u as f32 + v_axis.unit() * v as f32;
  let nudge = Axis::from_index((axis.index() + 2) % 3);
  orig += nudge.unit() * RAY_OFFSET;
  orig
}
