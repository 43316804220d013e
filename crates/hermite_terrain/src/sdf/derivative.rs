use glam::Vec3;

use super::Sdf;

/// Step used for surface normals of edits.
pub const NORMAL_EPSILON: f32 = 0.001;

/// Normalized central difference gradient of `sdf` at `p`.
///
/// Returns zero where the gradient vanishes.
#[inline]
pub fn central_difference_normal<S: Sdf + ?Sized>(sdf: &S, p: Vec3, epsilon: f32) -> Vec3 {
  let dx = Vec3::new(epsilon, 0.0, 0.0);
  let dy = Vec3::new(0.0, epsilon, 0.0);
  let dz = Vec3::new(0.0, 0.0, epsilon);
  Vec3::new(
    sdf.eval(p + dx) - sdf.eval(p - dx),
    sdf.eval(p + dy) - sdf.eval(p - dy),
    sdf.eval(p + dz) - sdf.eval(p - dz),
  )
  .normalize_or_zero()
}
