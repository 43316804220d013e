//! Material to vertex color mapping.
//!
//! Materials double as packed colors: bits 24-31 alpha, 16-23 red,
//! 8-15 green, 0-7 blue.

use crate::types::{Color32, MaterialId};

/// Maps a material id to an RGBA vertex color.
pub trait MaterialColorMap {
  fn color(&self, material: MaterialId) -> Color32;
}

/// Decodes the material id itself as a packed ARGB color.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialColors;

impl MaterialColors {
  /// Unpack to `[r, g, b, a]`.
  #[inline]
  pub fn from_integer(value: MaterialId) -> Color32 {
    let alpha = ((value >> 24) & 0xFF) as u8;
    let red = ((value >> 16) & 0xFF) as u8;
    let green = ((value >> 8) & 0xFF) as u8;
    let blue = (value & 0xFF) as u8;
    [red, green, blue, alpha]
  }

  #[inline]
  pub fn to_integer(red: u8, green: u8, blue: u8, alpha: u8) -> MaterialId {
    ((alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32) as MaterialId
  }
}

impl MaterialColorMap for MaterialColors {
  fn color(&self, material: MaterialId) -> Color32 {
    Self::from_integer(material)
  }
}

impl<F: Fn(MaterialId) -> Color32> MaterialColorMap for F {
  fn color(&self, material: MaterialId) -> Color32 {
    self(material)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_channel_layout() {
    let packed = MaterialColors::to_integer(0x11, 0x22, 0x33, 0x44);
    assert_eq!(packed, 0x4411_2233);
    assert_eq!(MaterialColors::from_integer(packed), [0x11, 0x22, 0x33, 0x44]);
  }

  #[test]
  fn test_opaque_white_is_negative_id() {
    let white = MaterialColors::to_integer(255, 255, 255, 255);
    assert_eq!(white, -1);
    assert_eq!(MaterialColors.color(white), [255; 4]);
  }

  #[test]
  fn test_closure_map() {
    let map = |m: MaterialId| [m as u8, 0, 0, 255];
    assert_eq!(map.color(3), [3, 0, 0, 255]);
  }
}
