//! The six faces of a voxel cell and their 2D frames.

use glam::Vec3;

/// Cell face, in polygonization order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellFace {
  ZNeg = 0,
  XPos = 1,
  ZPos = 2,
  XNeg = 3,
  YNeg = 4,
  YPos = 5,
}

impl CellFace {
  pub const ALL: [CellFace; 6] = [
    CellFace::ZNeg,
    CellFace::XPos,
    CellFace::ZPos,
    CellFace::XNeg,
    CellFace::YNeg,
    CellFace::YPos,
  ];

  /// Outward normal.
  pub fn normal(self) -> Vec3 {
    match self {
      CellFace::ZNeg => Vec3::NEG_Z,
      CellFace::XPos => Vec3::X,
      CellFace::ZPos => Vec3::Z,
      CellFace::XNeg => Vec3::NEG_X,
      CellFace::YNeg => Vec3::NEG_Y,
      CellFace::YPos => Vec3::Y,
    }
  }

  /// Face-space x direction in cell space.
  pub fn basis_x(self) -> Vec3 {
    match self {
      CellFace::ZNeg => Vec3::X,
      CellFace::XPos => Vec3::Z,
      CellFace::ZPos => Vec3::NEG_X,
      CellFace::XNeg => Vec3::NEG_Z,
      CellFace::YNeg => Vec3::X,
      CellFace::YPos => Vec3::X,
    }
  }

  /// Face-space y direction in cell space.
  pub fn basis_y(self) -> Vec3 {
    match self {
      CellFace::ZNeg | CellFace::XPos | CellFace::ZPos | CellFace::XNeg => Vec3::Y,
      CellFace::YNeg => Vec3::NEG_Z,
      CellFace::YPos => Vec3::Z,
    }
  }

  /// Cell corners at face-space (0,0), (W,0), (W,H), (0,H).
  pub fn corners(self) -> [usize; 4] {
    match self {
      CellFace::ZNeg => [0, 1, 5, 4],
      CellFace::XPos => [1, 2, 6, 5],
      CellFace::ZPos => [2, 3, 7, 6],
      CellFace::XNeg => [3, 0, 4, 7],
      CellFace::YNeg => [3, 2, 1, 0],
      CellFace::YPos => [4, 5, 6, 7],
    }
  }

  /// Face-space origin relative to the cell position.
  pub fn origin(self) -> Vec3 {
    match self {
      CellFace::ZNeg => Vec3::ZERO,
      CellFace::XPos => Vec3::X,
      CellFace::ZPos => Vec3::new(1.0, 0.0, 1.0),
      CellFace::XNeg => Vec3::Z,
      CellFace::YNeg => Vec3::Z,
      CellFace::YPos => Vec3::Y,
    }
  }

  /// First global face-edge id; the face's edges are `base..base + 4`.
  pub fn edge_base(self) -> usize {
    match self {
      CellFace::XNeg => 0,
      CellFace::XPos => 4,
      CellFace::YNeg => 8,
      CellFace::YPos => 12,
      CellFace::ZNeg => 16,
      CellFace::ZPos => 20,
    }
  }

  /// Global face-edge ids of the four local edges.
  pub fn edges(self) -> [usize; 4] {
    let base = self.edge_base();
    [base, base + 1, base + 2, base + 3]
  }
}

#[cfg(test)]
#[path = "face_test.rs"]
mod face_test;
