//! Primitive fields. Each renders as its unit mesh scaled by its size.

use glam::{Affine3A, Vec2, Vec3};

use super::{Sdf, SdfShape};
use crate::types::MinMaxAABB;

/// Axis aligned box centered at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxSdf {
  pub half_extents: Vec3,
}

impl BoxSdf {
  /// Cube with half side `radius`.
  pub fn new(radius: f32) -> Self {
    Self::from_half_extents(Vec3::splat(radius))
  }

  pub fn from_half_extents(half_extents: Vec3) -> Self {
    Self { half_extents }
  }
}

impl Sdf for BoxSdf {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    let d = p.abs() - self.half_extents;
    d.max(Vec3::ZERO).length() + d.max_element().min(0.0)
  }

  fn bounds(&self) -> MinMaxAABB {
    MinMaxAABB::from_half_extents(self.half_extents)
  }

  fn shape(&self) -> SdfShape {
    SdfShape::Box
  }

  fn render_transform(&self) -> Option<Affine3A> {
    Some(Affine3A::from_scale(self.half_extents))
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereSdf {
  pub radius: f32,
}

impl SphereSdf {
  pub fn new(radius: f32) -> Self {
    Self { radius }
  }
}

impl Sdf for SphereSdf {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    p.length() - self.radius
  }

  fn bounds(&self) -> MinMaxAABB {
    MinMaxAABB::from_half_extents(Vec3::splat(self.radius))
  }

  fn shape(&self) -> SdfShape {
    SdfShape::Sphere
  }

  fn render_transform(&self) -> Option<Affine3A> {
    Some(Affine3A::from_scale(Vec3::splat(self.radius)))
  }
}

/// Capped cylinder along Y; `height` is the half height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylinderSdf {
  pub height: f32,
  pub radius: f32,
}

impl CylinderSdf {
  pub fn new(height: f32, radius: f32) -> Self {
    Self { height, radius }
  }
}

impl Sdf for CylinderSdf {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    let d = Vec2::new(Vec2::new(p.x, p.z).length(), p.y).abs() - Vec2::new(self.radius, self.height);
    d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length()
  }

  fn bounds(&self) -> MinMaxAABB {
    MinMaxAABB::from_half_extents(Vec3::new(self.radius, self.height, self.radius))
  }

  fn shape(&self) -> SdfShape {
    SdfShape::Cylinder
  }

  fn render_transform(&self) -> Option<Affine3A> {
    Some(Affine3A::from_scale(Vec3::new(self.radius, self.height, self.radius)))
  }
}

/// Square pyramid standing on the XZ plane, apex up.
///
/// The exact pyramid distance is evaluated in a frame scaled by
/// `1.1 * base` and lifted by 0.1, then cut flat at the base so the solid
/// stays inside its bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PyramidSdf {
  pub height: f32,
  pub base: f32,
  frame_scale: f32,
  frame_height: f32,
}

impl PyramidSdf {
  pub fn new(height: f32, base: f32) -> Self {
    let frame_scale = base * 1.1;
    Self {
      height,
      base,
      frame_scale,
      frame_height: height / frame_scale + 0.1,
    }
  }
}

#[inline]
fn sign(v: f32) -> f32 {
  if v > 0.0 {
    1.0
  } else if v < 0.0 {
    -1.0
  } else {
    0.0
  }
}

impl Sdf for PyramidSdf {
  fn eval(&self, p: Vec3) -> f32 {
    let h = self.frame_height;
    let mut p = p / self.frame_scale + Vec3::new(0.0, 0.1, 0.0);
    let m2 = h * h + 0.25;

    p.x = p.x.abs();
    p.z = p.z.abs();
    if p.z > p.x {
      std::mem::swap(&mut p.x, &mut p.z);
    }
    p.x -= 0.5;
    p.z -= 0.5;

    let q = Vec3::new(p.z, h * p.y - 0.5 * p.x, h * p.x + 0.5 * p.y);
    let s = (-q.x).max(0.0);
    let t = ((q.y - 0.5 * p.z) / (m2 + 0.25)).clamp(0.0, 1.0);

    let a = m2 * (q.x + s) * (q.x + s) + q.y * q.y;
    let b = m2 * (q.x + 0.5 * t) * (q.x + 0.5 * t) + (q.y - m2 * t) * (q.y - m2 * t);

    let d2 = if q.y.min(-q.x * m2 - q.y * 0.5) > 0.0 { 0.0 } else { a.min(b) };
    let pyramid = ((d2 + q.z * q.z) / m2).sqrt() * sign(q.z.max(-p.y));
    pyramid.max(-(p.y - 0.1)) * self.frame_scale
  }

  fn bounds(&self) -> MinMaxAABB {
    MinMaxAABB::from_half_extents(Vec3::splat(self.height))
  }

  fn shape(&self) -> SdfShape {
    SdfShape::Pyramid
  }

  fn render_transform(&self) -> Option<Affine3A> {
    Some(Affine3A::from_scale(Vec3::splat(self.height)))
  }
}

#[cfg(test)]
#[path = "primitives_test.rs"]
mod primitives_test;
