//! Per-face sharp feature reconstruction.
//!
//! A 2D feature is the intersection of the two tangent lines through the
//! boundary crossings of one face segment:
//!
//! ```text
//!          feature
//!            ╳
//!           ╱ ╲        tangent lines are perpendicular
//!          ╱   ╲       to the projected normals n1, n2
//!   n1 ↖  ●     ●  ↗ n2
//!        p1     p2
//! ```

use glam::Vec2;

/// Classification of a reconstructed 2D feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureType2D {
  /// Regular sharp feature inside the face.
  Sharp,
  /// Sharp feature whose point lies outside the face.
  SharpOutOfBounds,
  /// Tangent lines could not be intersected (parallel or degenerate).
  Invalid,
  /// Intersection found but the angle is too shallow to be sharp.
  None,
}

impl FeatureType2D {
  #[inline]
  pub fn is_sharp(self) -> bool {
    matches!(self, Self::Sharp | Self::SharpOutOfBounds)
  }

  #[inline]
  pub fn is_in_bounds(self) -> bool {
    !matches!(self, Self::SharpOutOfBounds)
  }

  #[inline]
  pub fn is_valid(self) -> bool {
    !matches!(self, Self::Invalid)
  }
}

/// Solver result. The point is always set, even for `Invalid`, because
/// ambiguity resolution compares feature triangles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Feature2D {
  pub kind: FeatureType2D,
  pub point: Vec2,
}

/// Finds 2D sharp features on a cell face.
pub trait SharpFeatureSolver2D {
  /// `n1`/`n2` are the normals projected into face space.
  fn solve(&self, p1: Vec2, n1: Vec2, p2: Vec2, n2: Vec2, width: f32, height: f32) -> Feature2D;

  /// Whether the feature triangles `(a1, s1, b1)` and `(a2, s2, b2)` overlap.
  fn check_feature_intersection(&self, a1: Vec2, s1: Vec2, b1: Vec2, a2: Vec2, s2: Vec2, b2: Vec2) -> bool;
}

/// Tangent line intersection solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntersectionSolver2D;

impl SharpFeatureSolver2D for IntersectionSolver2D {
  fn solve(&self, p1: Vec2, n1: Vec2, p2: Vec2, n2: Vec2, width: f32, height: f32) -> Feature2D {
    let tangent1 = p1 + Vec2::new(n1.y, -n1.x);
    let tangent2 = p2 + Vec2::new(n2.y, -n2.x);
    match find_line_intersection(p1, tangent1, p2, tangent2) {
      Some(point) => {
        let out = point.x < 0.0 || point.x > width || point.y < 0.0 || point.y > height;
        Feature2D {
          kind: if out {
            FeatureType2D::SharpOutOfBounds
          } else {
            FeatureType2D::Sharp
          },
          point,
        }
      }
      None => Feature2D {
        kind: FeatureType2D::Invalid,
        point: (p1 + p2) * 0.5,
      },
    }
  }

  fn check_feature_intersection(&self, a1: Vec2, s1: Vec2, b1: Vec2, a2: Vec2, s2: Vec2, b2: Vec2) -> bool {
    // Base-to-base overlaps cannot happen for marching squares segments.
    segments_intersect(a1, s1, a2, s2)
      || segments_intersect(a1, s1, b2, s2)
      || segments_intersect(b1, s1, a2, s2)
      || segments_intersect(b1, s1, b2, s2)
      || segments_intersect(a1, b1, a2, s2)
      || segments_intersect(a1, b1, b2, s2)
      || segments_intersect(a1, s1, a2, b2)
      || segments_intersect(b1, s1, a2, b2)
  }
}

/// Intersection of the infinite lines through `(p1, p2)` and `(p3, p4)`.
pub fn find_line_intersection(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> Option<Vec2> {
  let d = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
  if d == 0.0 {
    return None;
  }
  let a = p1.x * p2.y - p1.y * p2.x;
  let b = p3.x * p4.y - p3.y * p4.x;
  let rx = (a * (p3.x - p4.x) - (p1.x - p2.x) * b) / d;
  let ry = (a * (p3.y - p4.y) - (p1.y - p2.y) * b) / d;
  if rx.is_finite() && ry.is_finite() {
    Some(Vec2::new(rx, ry))
  } else {
    None
  }
}

/// Whether segments `a→b` and `p→r` cross, with a small tolerance at the ends.
pub fn segments_intersect(a: Vec2, b: Vec2, p: Vec2, r: Vec2) -> bool {
  let det = (b.x - a.x) * (r.y - p.y) - (r.x - p.x) * (b.y - a.y);
  if det == 0.0 {
    return false;
  }
  let lambda = ((r.y - p.y) * (r.x - a.x) + (p.x - r.x) * (r.y - a.y)) / det;
  let gamma = ((a.y - b.y) * (r.x - a.x) + (b.x - a.x) * (r.y - a.y)) / det;
  (-0.001 < lambda && lambda < 1.001) && (-0.001 < gamma && gamma < 1.001)
}

#[cfg(test)]
#[path = "solver2d_test.rs"]
mod solver2d_test;
