//! Compound brushes built from a list of blended primitives.
//!
//! ```text
//!   value = p0
//!   value = smooth_union(value, p1, blend1)       (Union)
//!   value = smooth_subtract(value, p2, blend2)    (Difference)
//!   ...
//! ```
//!
//! Primitive kinds are opaque to the brush; a [`BrushEvaluator`] turns a kind
//! into a distance and a bound. [`DefaultBrushEvaluator`] knows boxes and
//! spheres.

use glam::{Affine3A, Vec3};

use super::primitives::{BoxSdf, SphereSdf};
use super::transform::transform_bounds;
use super::Sdf;
use crate::types::MinMaxAABB;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BrushOperation {
  #[default]
  Union,
  Difference,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BrushType {
  #[default]
  Box,
  Sphere,
}

/// One placed primitive of a [`CustomBrush`].
#[derive(Clone, Debug)]
pub struct BrushPrimitive<K> {
  pub kind: K,
  pub operation: BrushOperation,
  pub blend: f32,
  transform: Affine3A,
  inverse: Affine3A,
}

impl<K> BrushPrimitive<K> {
  pub fn new(kind: K, operation: BrushOperation, blend: f32, transform: Affine3A) -> Self {
    Self {
      kind,
      operation,
      blend,
      transform,
      inverse: transform.inverse(),
    }
  }

  pub fn transform(&self) -> &Affine3A {
    &self.transform
  }

  pub fn set_transform(&mut self, transform: Affine3A) {
    self.transform = transform;
    self.inverse = transform.inverse();
  }
}

pub trait BrushEvaluator<K>: Send + Sync {
  /// Distance of the primitive `kind` in its own frame.
  fn eval(&self, kind: &K, p: Vec3) -> f32;

  /// Bound of the primitive `kind` in its own frame.
  fn bounds(&self, kind: &K) -> MinMaxAABB;

  /// Field used to draw a preview of `kind`, if any.
  fn render_sdf(&self, _kind: &K) -> Option<Box<dyn Sdf>> {
    None
  }
}

/// Boxes and spheres of size [`DefaultBrushEvaluator::BASE_SIZE`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultBrushEvaluator;

impl DefaultBrushEvaluator {
  pub const BASE_SIZE: f32 = 5.0;
}

impl BrushEvaluator<BrushType> for DefaultBrushEvaluator {
  fn eval(&self, kind: &BrushType, p: Vec3) -> f32 {
    match kind {
      BrushType::Box => BoxSdf::new(Self::BASE_SIZE).eval(p),
      BrushType::Sphere => SphereSdf::new(Self::BASE_SIZE).eval(p),
    }
  }

  fn bounds(&self, _kind: &BrushType) -> MinMaxAABB {
    MinMaxAABB::from_half_extents(Vec3::splat(Self::BASE_SIZE))
  }

  fn render_sdf(&self, kind: &BrushType) -> Option<Box<dyn Sdf>> {
    Some(match kind {
      BrushType::Box => Box::new(BoxSdf::new(Self::BASE_SIZE)),
      BrushType::Sphere => Box::new(SphereSdf::new(Self::BASE_SIZE)),
    })
  }
}

#[inline]
fn smooth_union(a: f32, b: f32, blend: f32) -> f32 {
  if blend <= 0.0 {
    return a.min(b);
  }
  let h = (blend - (a - b).abs()).max(0.0);
  a.min(b) - h * h * 0.25 / blend
}

#[inline]
fn smooth_subtract(a: f32, b: f32, blend: f32) -> f32 {
  if blend <= 0.0 {
    return a.max(-b);
  }
  let h = (blend - (-b - a).abs()).max(0.0);
  a.max(-b) + h * h * 0.25 / blend
}

#[derive(Clone, Debug)]
pub struct CustomBrush<K = BrushType, E = DefaultBrushEvaluator> {
  pub primitives: Vec<BrushPrimitive<K>>,
  pub evaluator: E,
}

impl CustomBrush {
  pub fn new() -> Self {
    Self::with_evaluator(DefaultBrushEvaluator)
  }
}

impl Default for CustomBrush {
  fn default() -> Self {
    Self::new()
  }
}

impl<K, E: BrushEvaluator<K>> CustomBrush<K, E> {
  pub fn with_evaluator(evaluator: E) -> Self {
    Self {
      primitives: Vec::new(),
      evaluator,
    }
  }

  pub fn with_primitive(mut self, primitive: BrushPrimitive<K>) -> Self {
    self.primitives.push(primitive);
    self
  }

  pub fn push(&mut self, primitive: BrushPrimitive<K>) {
    self.primitives.push(primitive);
  }

  /// Preview fields of every primitive with their placements.
  pub fn render_parts(&self) -> Vec<(Affine3A, Box<dyn Sdf>)> {
    self
      .primitives
      .iter()
      .filter_map(|prim| self.evaluator.render_sdf(&prim.kind).map(|sdf| (prim.transform, sdf)))
      .collect()
  }
}

impl<K: Send + Sync, E: BrushEvaluator<K>> Sdf for CustomBrush<K, E> {
  fn eval(&self, p: Vec3) -> f32 {
    let mut iter = self.primitives.iter();
    let Some(first) = iter.next() else {
      return f32::MAX;
    };
    let mut value = self.evaluator.eval(&first.kind, first.inverse.transform_point3(p));
    for prim in iter {
      let pv = self.evaluator.eval(&prim.kind, prim.inverse.transform_point3(p));
      value = match prim.operation {
        BrushOperation::Union => smooth_union(value, pv, prim.blend),
        BrushOperation::Difference => smooth_subtract(value, pv, prim.blend),
      };
    }
    value
  }

  fn bounds(&self) -> MinMaxAABB {
    if self.primitives.is_empty() {
      return MinMaxAABB::new(Vec3::ZERO, Vec3::ZERO);
    }
    let mut bounds = MinMaxAABB::empty();
    let mut max_blend = 0.0f32;
    for prim in &self.primitives {
      bounds = bounds.union(&transform_bounds(&self.evaluator.bounds(&prim.kind), &prim.transform));
      max_blend = max_blend.max(prim.blend);
    }
    bounds.expanded(max_blend)
  }
}

#[cfg(test)]
#[path = "brush_test.rs"]
mod brush_test;
