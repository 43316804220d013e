//! Signed distance fields used as edit brushes.
//!
//! Negative values are inside the shape. Every field reports an axis aligned
//! bound outside of which it is guaranteed positive; edits only visit grid
//! points inside that bound.
//!
//! Adapter fields (offset, scale, transform) also expose a render chain so a
//! host can draw a brush preview: follow [`Sdf::render_child`] down to the
//! leaf shape while composing [`Sdf::render_transform`] on the way.

use std::sync::Arc;

use glam::{Affine3A, Vec3};

use crate::types::MinMaxAABB;

pub mod brush;
pub mod derivative;
pub mod primitives;
pub mod transform;

pub use brush::{BrushEvaluator, BrushOperation, BrushPrimitive, BrushType, CustomBrush, DefaultBrushEvaluator};
pub use derivative::{central_difference_normal, NORMAL_EPSILON};
pub use primitives::{BoxSdf, CylinderSdf, PyramidSdf, SphereSdf};
pub use transform::{transform_bounds, OffsetSdf, ScaleSdf, TransformSdf};

/// Deepest adapter chain followed by [`render_chain`].
pub const MAX_RENDER_DEPTH: usize = 30;

/// Leaf shape kinds a renderer can draw with a unit mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SdfShape {
  Box,
  Sphere,
  Cylinder,
  Pyramid,
  /// No canonical mesh (adapters, compound brushes).
  Custom,
}

pub trait Sdf: Send + Sync {
  fn eval(&self, p: Vec3) -> f32;

  fn bounds(&self) -> MinMaxAABB;

  fn shape(&self) -> SdfShape {
    SdfShape::Custom
  }

  /// Transform applied to the unit render mesh of this field.
  fn render_transform(&self) -> Option<Affine3A> {
    None
  }

  /// Field to draw instead of this one.
  fn render_child(&self) -> Option<&dyn Sdf> {
    None
  }
}

impl<T: Sdf + ?Sized> Sdf for &T {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    (**self).eval(p)
  }

  fn bounds(&self) -> MinMaxAABB {
    (**self).bounds()
  }

  fn shape(&self) -> SdfShape {
    (**self).shape()
  }

  fn render_transform(&self) -> Option<Affine3A> {
    (**self).render_transform()
  }

  fn render_child(&self) -> Option<&dyn Sdf> {
    (**self).render_child()
  }
}

impl<T: Sdf + ?Sized> Sdf for Box<T> {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    (**self).eval(p)
  }

  fn bounds(&self) -> MinMaxAABB {
    (**self).bounds()
  }

  fn shape(&self) -> SdfShape {
    (**self).shape()
  }

  fn render_transform(&self) -> Option<Affine3A> {
    (**self).render_transform()
  }

  fn render_child(&self) -> Option<&dyn Sdf> {
    (**self).render_child()
  }
}

impl<T: Sdf + ?Sized> Sdf for Arc<T> {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    (**self).eval(p)
  }

  fn bounds(&self) -> MinMaxAABB {
    (**self).bounds()
  }

  fn shape(&self) -> SdfShape {
    (**self).shape()
  }

  fn render_transform(&self) -> Option<Affine3A> {
    (**self).render_transform()
  }

  fn render_child(&self) -> Option<&dyn Sdf> {
    (**self).render_child()
  }
}

/// Leaf of a render chain and the transform placing its unit mesh.
pub struct RenderTarget<'a> {
  pub shape: SdfShape,
  pub sdf: &'a dyn Sdf,
  pub transform: Affine3A,
}

/// Walk the adapter chain of `sdf`, outermost transform applied last.
pub fn render_chain(sdf: &dyn Sdf) -> RenderTarget<'_> {
  let mut transform = Affine3A::IDENTITY;
  let mut current = sdf;
  for _ in 0..MAX_RENDER_DEPTH {
    if let Some(t) = current.render_transform() {
      transform = transform * t;
    }
    match current.render_child() {
      Some(child) => current = child,
      None => break,
    }
  }
  RenderTarget {
    shape: current.shape(),
    sdf: current,
    transform,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use glam::Quat;

  #[test]
  fn test_render_chain_composes_outer_first() {
    let sphere = SphereSdf::new(2.0);
    let scaled = ScaleSdf::new(3.0, sphere);
    let moved = TransformSdf::new(Affine3A::from_translation(Vec3::new(10.0, 0.0, 0.0)), scaled);

    let target = render_chain(&moved);
    assert_eq!(target.shape, SdfShape::Sphere);
    // Unit sphere scaled by radius, then by 3, then moved.
    let p = target.transform.transform_point3(Vec3::X);
    assert!((p - Vec3::new(16.0, 0.0, 0.0)).length() < 1e-5);
  }

  #[test]
  fn test_render_chain_of_leaf_is_its_own_transform() {
    let cylinder = CylinderSdf::new(4.0, 1.0);
    let target = render_chain(&cylinder);
    assert_eq!(target.shape, SdfShape::Cylinder);
    assert_eq!(target.transform.transform_point3(Vec3::ONE), Vec3::new(1.0, 4.0, 1.0));
  }

  #[test]
  fn test_references_and_boxes_forward() {
    let rotated = TransformSdf::new(Affine3A::from_quat(Quat::from_rotation_y(1.0)), BoxSdf::new(1.0));
    let boxed: Box<dyn Sdf> = Box::new(rotated.clone());
    let arc: Arc<dyn Sdf> = Arc::new(rotated.clone());
    let p = Vec3::new(0.3, 2.0, -0.7);
    assert_eq!(boxed.eval(p), rotated.eval(p));
    assert_eq!((&rotated).eval(p), arc.eval(p));
    assert_eq!(boxed.bounds(), rotated.bounds());
  }
}
