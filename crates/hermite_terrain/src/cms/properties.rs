//! Tuning thresholds for sharp feature and material transition detection.
//!
//! All thresholds are cosines of angles, in [-1, 1].

use crate::types::{MaterialId, AIR};

/// Classification predicates consumed by the polygonizer.
pub trait FeatureThresholds {
  fn is_solid(&self, material: MaterialId) -> bool;

  /// `theta`: cosine between projected 2D normals, `phi`: between 3D normals.
  fn is_sharp_2d(&self, theta: f32, phi: f32) -> bool;

  fn is_valid_2d_transition(&self, min_theta: f32, max_theta: f32) -> bool;

  fn is_sharp_3d(&self, theta: f32) -> bool;

  fn is_sharp_3d_corner(&self, phi: f32) -> bool;

  fn is_valid_3d_transition(&self, theta: f32) -> bool;
}

/// 2D (per-face) thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SharpFeatureProperties2D {
  pub max_feature_theta: f32,
  pub max_feature_phi: f32,
  pub max_transition_theta: f32,
}

/// 3D (per-component) thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SharpFeatureProperties3D {
  pub max_feature_theta: f32,
  pub min_corner_phi: f32,
  pub min_transition_theta: f32,
}

/// Standard threshold set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CmsProperties {
  pub air_material: MaterialId,
  pub sharp_2d: SharpFeatureProperties2D,
  pub sharp_3d: SharpFeatureProperties3D,
}

impl Default for CmsProperties {
  fn default() -> Self {
    Self {
      air_material: AIR,
      sharp_2d: SharpFeatureProperties2D {
        max_feature_theta: 0.6,
        max_feature_phi: 0.6,
        max_transition_theta: 0.99,
      },
      sharp_3d: SharpFeatureProperties3D {
        max_feature_theta: 0.6,
        min_corner_phi: 0.7,
        min_transition_theta: -0.999,
      },
    }
  }
}

impl CmsProperties {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_air_material(mut self, material: MaterialId) -> Self {
    self.air_material = material;
    self
  }

  pub fn with_sharp_2d(mut self, props: SharpFeatureProperties2D) -> Self {
    self.sharp_2d = props;
    self
  }

  pub fn with_sharp_3d(mut self, props: SharpFeatureProperties3D) -> Self {
    self.sharp_3d = props;
    self
  }

  /// True when every threshold is a cosine.
  pub fn is_valid(&self) -> bool {
    let in_range = |v: f32| (-1.0..=1.0).contains(&v);
    in_range(self.sharp_2d.max_feature_theta)
      && in_range(self.sharp_2d.max_feature_phi)
      && in_range(self.sharp_2d.max_transition_theta)
      && in_range(self.sharp_3d.max_feature_theta)
      && in_range(self.sharp_3d.min_corner_phi)
      && in_range(self.sharp_3d.min_transition_theta)
  }
}

impl FeatureThresholds for CmsProperties {
  #[inline]
  fn is_solid(&self, material: MaterialId) -> bool {
    material != self.air_material
  }

  #[inline]
  fn is_sharp_2d(&self, theta: f32, phi: f32) -> bool {
    theta < self.sharp_2d.max_feature_theta && phi < self.sharp_2d.max_feature_phi
  }

  #[inline]
  fn is_valid_2d_transition(&self, min_theta: f32, _max_theta: f32) -> bool {
    min_theta < self.sharp_2d.max_transition_theta
  }

  #[inline]
  fn is_sharp_3d(&self, theta: f32) -> bool {
    theta < self.sharp_3d.max_feature_theta
  }

  #[inline]
  fn is_sharp_3d_corner(&self, phi: f32) -> bool {
    phi > self.sharp_3d.min_corner_phi
  }

  #[inline]
  fn is_valid_3d_transition(&self, theta: f32) -> bool {
    theta > self.sharp_3d.min_transition_theta
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let props = CmsProperties::default();
    assert!(props.is_valid());
    assert!(!props.is_solid(0));
    assert!(props.is_solid(3));
    // Right angle on a face is sharp, a shallow bend is not.
    assert!(props.is_sharp_2d(0.0, 0.0));
    assert!(!props.is_sharp_2d(0.9, 0.9));
    assert!(props.is_sharp_3d(0.5));
    assert!(!props.is_sharp_3d(0.6));
    assert!(props.is_sharp_3d_corner(0.8));
    assert!(props.is_valid_3d_transition(0.0));
    assert!(!props.is_valid_3d_transition(-1.0));
  }

  #[test]
  fn test_custom_air() {
    let props = CmsProperties::new().with_air_material(9);
    assert!(props.is_solid(0));
    assert!(!props.is_solid(9));
  }

  #[test]
  fn test_out_of_range_invalid() {
    let props = CmsProperties::new().with_sharp_3d(SharpFeatureProperties3D {
      max_feature_theta: 2.0,
      min_corner_phi: 0.7,
      min_transition_theta: -0.999,
    });
    assert!(!props.is_valid());
  }
}
