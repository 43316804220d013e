//! Polygonizer output: closed vertex loops ("components") per cell.

use glam::Vec3;

use crate::types::MaterialId;

const TRANSITION_BIT: u32 = 0b001;
const SHARP_2D_BIT: u32 = 0b010;
const NORMAL_SET_BIT: u32 = 0b100;

/// Vertex index with three classification flags packed into the low bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedIndex(u32);

impl PackedIndex {
  /// Largest index that fits next to the flags.
  pub const MAX_INDEX: usize = (u32::MAX >> 3) as usize;

  pub fn new(index: usize, is_material_transition: bool, is_2d_sharp_feature: bool, is_normal_set: bool) -> Self {
    assert!(index <= Self::MAX_INDEX, "component vertex index {index} overflows");
    let mut packed = (index as u32) << 3;
    if is_material_transition {
      packed |= TRANSITION_BIT;
    }
    if is_2d_sharp_feature {
      packed |= SHARP_2D_BIT;
    }
    if is_normal_set {
      packed |= NORMAL_SET_BIT;
    }
    Self(packed)
  }

  #[inline]
  pub fn index(self) -> usize {
    (self.0 >> 3) as usize
  }

  #[inline]
  pub fn is_material_transition(self) -> bool {
    self.0 & TRANSITION_BIT != 0
  }

  #[inline]
  pub fn is_2d_sharp_feature(self) -> bool {
    self.0 & SHARP_2D_BIT != 0
  }

  #[inline]
  pub fn is_normal_set(self) -> bool {
    self.0 & NORMAL_SET_BIT != 0
  }
}

impl std::fmt::Debug for PackedIndex {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PackedIndex")
      .field("index", &self.index())
      .field("transition", &self.is_material_transition())
      .field("sharp_2d", &self.is_2d_sharp_feature())
      .field("normal_set", &self.is_normal_set())
      .finish()
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComponentVertex {
  pub position: Vec3,
  pub normal: Vec3,
  pub material: MaterialId,
}

/// One closed loop and its reconstructed 3D feature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshComponent {
  /// First entry in [`PolygonizerOutput::indices`].
  pub index: usize,
  pub size: usize,
  /// Fan hub when [`MeshComponent::has_feature`] holds.
  pub feature_vertex: Vec3,
  /// Sharp 3D edge or corner present.
  pub regular_feature: bool,
  pub material_transition_feature: bool,
}

impl MeshComponent {
  #[inline]
  pub fn has_feature(&self) -> bool {
    self.regular_feature || self.material_transition_feature
  }

  pub fn range(&self) -> std::ops::Range<usize> {
    self.index..self.index + self.size
  }
}

/// Accumulated polygonizer output over any number of cells.
#[derive(Clone, Debug, Default)]
pub struct PolygonizerOutput {
  pub components: Vec<MeshComponent>,
  pub indices: Vec<PackedIndex>,
  pub vertices: Vec<ComponentVertex>,
}

impl PolygonizerOutput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn clear(&mut self) {
    self.components.clear();
    self.indices.clear();
    self.vertices.clear();
  }

  pub fn is_empty(&self) -> bool {
    self.components.is_empty()
  }

  /// Packed indices of one component's loop.
  pub fn component_indices(&self, component: &MeshComponent) -> &[PackedIndex] {
    &self.indices[component.range()]
  }

  #[inline]
  pub fn vertex(&self, index: PackedIndex) -> &ComponentVertex {
    &self.vertices[index.index()]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_packed_index_flags() {
    let p = PackedIndex::new(1234, true, false, true);
    assert_eq!(p.index(), 1234);
    assert!(p.is_material_transition());
    assert!(!p.is_2d_sharp_feature());
    assert!(p.is_normal_set());

    let q = PackedIndex::new(0, false, true, false);
    assert_eq!(q.index(), 0);
    assert!(q.is_2d_sharp_feature());
    assert!(!q.is_normal_set());
  }

  #[test]
  fn test_packed_index_max() {
    let p = PackedIndex::new(PackedIndex::MAX_INDEX, true, true, true);
    assert_eq!(p.index(), PackedIndex::MAX_INDEX);
  }

  #[test]
  #[should_panic]
  fn test_packed_index_overflow() {
    let _ = PackedIndex::new(PackedIndex::MAX_INDEX + 1, false, false, false);
  }

  #[test]
  fn test_component_feature_flag() {
    let mut c = MeshComponent {
      index: 2,
      size: 3,
      feature_vertex: Vec3::ZERO,
      regular_feature: false,
      material_transition_feature: false,
    };
    assert!(!c.has_feature());
    assert_eq!(c.range(), 2..5);
    c.material_transition_feature = true;
    assert!(c.has_feature());
  }
}
