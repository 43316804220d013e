//! Adapter fields that move, scale or fully transform another field.

use glam::{Affine3A, Vec3};

use super::Sdf;
use crate::types::MinMaxAABB;

/// Bounds of `aabb` after `transform`, from its 8 transformed corners.
pub fn transform_bounds(aabb: &MinMaxAABB, transform: &Affine3A) -> MinMaxAABB {
  let mut out = MinMaxAABB::empty();
  for corner in aabb.corners() {
    out.encapsulate(transform.transform_point3(corner));
  }
  out
}

/// Shifts `sdf` by `-offset`.
#[derive(Clone, Debug)]
pub struct OffsetSdf<S> {
  pub offset: Vec3,
  pub sdf: S,
}

impl<S: Sdf> OffsetSdf<S> {
  pub fn new(offset: Vec3, sdf: S) -> Self {
    Self { offset, sdf }
  }
}

impl<S: Sdf> Sdf for OffsetSdf<S> {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    self.sdf.eval(p + self.offset)
  }

  fn bounds(&self) -> MinMaxAABB {
    self.sdf.bounds().translated(-self.offset)
  }

  fn render_transform(&self) -> Option<Affine3A> {
    Some(Affine3A::from_translation(-self.offset))
  }

  fn render_child(&self) -> Option<&dyn Sdf> {
    Some(&self.sdf)
  }
}

/// Uniformly scales `sdf`, keeping distances metric.
#[derive(Clone, Debug)]
pub struct ScaleSdf<S> {
  pub scale: f32,
  pub sdf: S,
}

impl<S: Sdf> ScaleSdf<S> {
  pub fn new(scale: f32, sdf: S) -> Self {
    assert!(scale > 0.0, "scale must be positive, got {scale}");
    Self { scale, sdf }
  }
}

impl<S: Sdf> Sdf for ScaleSdf<S> {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    self.sdf.eval(p / self.scale) * self.scale
  }

  fn bounds(&self) -> MinMaxAABB {
    let b = self.sdf.bounds();
    MinMaxAABB::new(b.min * self.scale, b.max * self.scale)
  }

  fn render_transform(&self) -> Option<Affine3A> {
    Some(Affine3A::from_scale(Vec3::splat(self.scale)))
  }

  fn render_child(&self) -> Option<&dyn Sdf> {
    Some(&self.sdf)
  }
}

/// Places `sdf` with an arbitrary affine transform.
///
/// Distances are only exact for rigid transforms; edits only rely on the sign
/// and on a monotonic magnitude, which any invertible transform preserves.
#[derive(Clone, Debug)]
pub struct TransformSdf<S> {
  transform: Affine3A,
  inverse: Affine3A,
  pub sdf: S,
}

impl<S: Sdf> TransformSdf<S> {
  pub fn new(transform: Affine3A, sdf: S) -> Self {
    Self {
      transform,
      inverse: transform.inverse(),
      sdf,
    }
  }

  pub fn transform(&self) -> &Affine3A {
    &self.transform
  }
}

impl<S: Sdf> Sdf for TransformSdf<S> {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    self.sdf.eval(self.inverse.transform_point3(p))
  }

  fn bounds(&self) -> MinMaxAABB {
    transform_bounds(&self.sdf.bounds(), &self.transform)
  }

  fn render_transform(&self) -> Option<Affine3A> {
    Some(self.transform)
  }

  fn render_child(&self) -> Option<&dyn Sdf> {
    Some(&self.sdf)
  }
}
