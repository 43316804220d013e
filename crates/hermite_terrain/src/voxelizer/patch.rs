//! Hole patching from the closest triangle.

use glam::Vec3;
use rayon::prelude::*;

use super::fill::Hole;
use super::intersect::flat_normal;
use super::VoxelizationProperties;
use crate::grid::VoxelGrid;
use crate::indexer::Indexer;
use crate::types::Axis;

/// Synthesized crossing for one hole.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Patch {
  pub x: usize,
  pub y: usize,
  pub z: usize,
  pub axis: Axis,
  pub intersection: f32,
  pub normal: Vec3,
}

/// Find a patch for every hole in parallel. Brute force over all triangles.
pub(crate) fn find_patches(
  holes: &[Hole],
  vertices: &[Vec3],
  normals: &[Vec3],
  properties: &VoxelizationProperties,
) -> Vec<Patch> {
  if vertices.len() < 3 {
    return Vec::new();
  }

  holes
    .par_iter()
    .with_min_len(properties.batch_size)
    .map(|hole| find_patch(hole, vertices, normals, properties))
    .collect()
}

pub(crate) fn apply_patches<I: Indexer>(grid: &mut VoxelGrid<I>, patches: &[Patch]) {
  for patch in patches {
    let voxel = grid.get_mut(patch.x, patch.y, patch.z);
    *voxel = voxel.with_edge(patch.axis, patch.intersection, patch.normal);
  }
}

fn find_patch(
  hole: &Hole,
  vertices: &[Vec3],
  normals: &[Vec3],
  properties: &VoxelizationProperties,
) -> Patch {
  let edge = hole.axis.unit();
  let base = Vec3::new(hole.x as f32, hole.y as f32, hole.z as f32);
  // Probe from the solid end of the edge.
  let corner = if hole.inside { base } else { base + edge };

  let mut closest_dist_sq = f32::MAX;
  let mut closest_point = corner;
  let mut closest_tri = 0;
  for (t, tri) in vertices.chunks_exact(3).enumerate() {
    let (dist_sq, point) = point_triangle_distance_sq(corner, tri[0], tri[1], tri[2]);
    if dist_sq < closest_dist_sq {
      closest_dist_sq = dist_sq;
      closest_point = point;
      closest_tri = t * 3;
    }
  }

  let (a, b, c) = (
    vertices[closest_tri],
    vertices[closest_tri + 1],
    vertices[closest_tri + 2],
  );
  let face = flat_normal(a, b, c);

  let normal = if properties.smooth_normals {
    let (u, v, w) = barycentric(closest_point, a, b, c);
    let interpolated =
      (u * normals[closest_tri] + v * normals[closest_tri + 1] + w * normals[closest_tri + 2]).normalize_or_zero();
    let facing = if hole.inside { 1.0 } else { -1.0 };
    // Near-tangent interpolated normals give degenerate features.
    if interpolated.dot(edge) * facing <= properties.angle_threshold {
      face
    } else {
      interpolated
    }
  } else {
    face
  };

  Patch {
    x: hole.x,
    y: hole.y,
    z: hole.z,
    axis: hole.axis,
    intersection: edge.dot(closest_point - base).clamp(0.0, 1.0),
    normal,
  }
}

/// Barycentric weights of `p` for `a`, `b`, `c`.
fn barycentric(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> (f32, f32, f32) {
  let (v0, v1, v2) = (b - a, c - a, p - a);
  let d00 = v0.dot(v0);
  let d01 = v0.dot(v1);
  let d11 = v1.dot(v1);
  let d20 = v2.dot(v0);
  let d21 = v2.dot(v1);
  let denom = (d00 * d11 - d01 * d01).max(1e-30);
  let v = (d11 * d20 - d01 * d21) / denom;
  let w = (d00 * d21 - d01 * d20) / denom;
  (1.0 - v - w, v, w)
}

fn point_segment_distance_sq(p: Vec3, a: Vec3, b: Vec3) -> (f32, Vec3) {
  let ab = b - a;
  let len_sq = ab.length_squared();
  let t = if len_sq > 0.0 {
    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
  } else {
    0.0
  };
  let closest = a + ab * t;
  (p.distance_squared(closest), closest)
}

/// Squared distance from `p` to the triangle `(x1, x2, x3)` and the closest
/// point on it.
pub fn point_triangle_distance_sq(p: Vec3, x1: Vec3, x2: Vec3, x3: Vec3) -> (f32, Vec3) {
  let x13 = x1 - x3;
  let x23 = x2 - x3;
  let x03 = p - x3;
  let m13 = x13.length_squared();
  let m23 = x23.length_squared();
  let d = x13.dot(x23);
  let inv_det = 1.0 / (m13 * m23 - d * d).max(1e-30);
  let a = x13.dot(x03);
  let b = x23.dot(x03);
  let w23 = inv_det * (m23 * a - d * b);
  let w31 = inv_det * (m13 * b - d * a);
  let w12 = 1.0 - w23 - w31;

  if w23 >= 0.0 && w31 >= 0.0 && w12 >= 0.0 {
    let closest = w23 * x1 + w31 * x2 + w12 * x3;
    return (p.distance_squared(closest), closest);
  }

  // Outside the face: the closest point is on one of the two edges facing
  // the region the projection fell into.
  let (first, second) = if w23 > 0.0 {
    (point_segment_distance_sq(p, x1, x2), point_segment_distance_sq(p, x1, x3))
  } else if w31 > 0.0 {
    (point_segment_distance_sq(p, x1, x2), point_segment_distance_sq(p, x2, x3))
  } else {
    (point_segment_distance_sq(p, x1, x3), point_segment_distance_sq(p, x2, x3))
  };

  if first.0 < second.0 {
    first
  } else {
    second
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const TRI: [Vec3; 3] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(4.0, 0.0, 0.0),
    Vec3::new(0.0, 4.0, 0.0),
  ];

  #[test]
  fn test_distance_above_face() {
    let (d, p) = point_triangle_distance_sq(Vec3::new(1.0, 1.0, 2.0), TRI[0], TRI[1], TRI[2]);
    assert!((d - 4.0).abs() < 1e-5);
    assert!((p - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
  }

  #[test]
  fn test_distance_beside_edge_lands_mid_segment() {
    // Closest point is the middle of the hypotenuse, not one of its ends.
    let (d, p) = point_triangle_distance_sq(Vec3::new(3.0, 3.0, 0.0), TRI[0], TRI[1], TRI[2]);
    assert!((p - Vec3::new(2.0, 2.0, 0.0)).length() < 1e-5);
    assert!((d - 2.0).abs() < 1e-5);
  }

  #[test]
  fn test_distance_past_vertex() {
    let (d, p) = point_triangle_distance_sq(Vec3::new(-1.0, -1.0, 0.0), TRI[0], TRI[1], TRI[2]);
    assert!((p - Vec3::ZERO).length() < 1e-5);
    assert!((d - 2.0).abs() < 1e-5);
  }

  #[test]
  fn test_patch_uses_closest_triangle() {
    // Face at z = 2.4, normal +Z for this winding.
    let vertices = vec![
      Vec3::new(-10.0, -10.0, 2.4),
      Vec3::new(10.0, -10.0, 2.4),
      Vec3::new(0.0, 10.0, 2.4),
    ];
    let normals = vec![Vec3::Z; 3];
    let hole = Hole {
      x: 1,
      y: 1,
      z: 2,
      axis: Axis::Z,
      inside: true,
    };

    let patches = find_patches(&[hole], &vertices, &normals, &VoxelizationProperties::FLAT);
    assert_eq!(patches.len(), 1);
    let patch = patches[0];
    assert!((patch.intersection - 0.4).abs() < 1e-5);
    assert!((patch.normal - Vec3::Z).length() < 1e-5);

    let mut grid: VoxelGrid<crate::indexer::LinearIndexer> = crate::grid::Grid::cube(4);
    apply_patches(&mut grid, &patches);
    assert!((grid.get(1, 1, 2).edge(Axis::Z).intersection - 0.4).abs() < 1e-5);
  }

  #[test]
  fn test_tangent_smooth_normal_falls_back_to_face() {
    let vertices = vec![
      Vec3::new(-10.0, -10.0, 2.5),
      Vec3::new(10.0, -10.0, 2.5),
      Vec3::new(0.0, 10.0, 2.5),
    ];
    let normals = vec![Vec3::X; 3];
    let hole = Hole {
      x: 1,
      y: 1,
      z: 2,
      axis: Axis::Z,
      inside: true,
    };

    let patches = find_patches(&[hole], &vertices, &normals, &VoxelizationProperties::SMOOTH);
    assert!((patches[0].normal - Vec3::Z).length() < 1e-5);
  }
}
