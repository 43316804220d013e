use glam::Vec3;

/// Uniformly scale and center `vertices` into a grid of `dims` points,
/// leaving `padding` voxels free on every side.
///
/// The scale is the smallest per-axis ratio between the free half extent and
/// the largest vertex distance from the bounds center on that axis, so the
/// mesh never clips. Flat axes (zero extent) do not constrain the scale.
pub fn scale_to_grid(vertices: &[Vec3], dims: [usize; 3], padding: f32) -> Vec<Vec3> {
  if vertices.is_empty() {
    return Vec::new();
  }

  let center = Vec3::new(dims[0] as f32, dims[1] as f32, dims[2] as f32) / 2.0;

  let (min, max) = vertices
    .iter()
    .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(min, max), v| {
      (min.min(*v), max.max(*v))
    });
  let mid = (min + max) / 2.0;

  let max_dist = vertices
    .iter()
    .fold(Vec3::ZERO, |acc, v| acc.max((*v - mid).abs()));

  let room = center - Vec3::splat(padding);
  let mut scale = f32::MAX;
  for axis in 0..3 {
    if max_dist[axis] > 0.0 {
      scale = scale.min(room[axis] / max_dist[axis]);
    }
  }
  if scale == f32::MAX {
    scale = 1.0;
  }

  vertices.iter().map(|v| (*v - mid) * scale + center).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unit_cube_fills_grid_minus_padding() {
    let vertices = [Vec3::splat(-0.5), Vec3::splat(0.5), Vec3::new(0.5, -0.5, 0.5)];
    let scaled = scale_to_grid(&vertices, [8, 8, 8], 1.5);

    assert!((scaled[0] - Vec3::splat(1.5)).length() < 1e-5);
    assert!((scaled[1] - Vec3::splat(6.5)).length() < 1e-5);
  }

  #[test]
  fn test_centers_meshes_away_from_origin() {
    let vertices = [Vec3::splat(10.0), Vec3::splat(12.0)];
    let scaled = scale_to_grid(&vertices, [10, 10, 10], 1.0);

    assert!((scaled[0] - Vec3::splat(1.0)).length() < 1e-5);
    assert!((scaled[1] - Vec3::splat(9.0)).length() < 1e-5);
  }

  #[test]
  fn test_smallest_axis_limits_scale() {
    // Wide in x, so x decides the scale and y keeps the aspect ratio.
    let vertices = [Vec3::new(-2.0, -1.0, 0.0), Vec3::new(2.0, 1.0, 0.0)];
    let scaled = scale_to_grid(&vertices, [10, 10, 10], 1.0);

    assert!((scaled[0] - Vec3::new(1.0, 3.0, 5.0)).length() < 1e-5);
    assert!((scaled[1] - Vec3::new(9.0, 7.0, 5.0)).length() < 1e-5);
  }
}
