use super::*;
use crate::cms::tables::{CORNER_OFFSETS, CUBE_EDGES, FACE_EDGE_TO_CUBE_EDGE};

fn corner(i: usize) -> Vec3 {
  let [x, y, z] = CORNER_OFFSETS[i];
  Vec3::new(x as f32, y as f32, z as f32)
}

fn to_cell(face: CellFace, x: f32, y: f32) -> Vec3 {
  face.origin() + face.basis_x() * x + face.basis_y() * y
}

#[test]
fn test_face_corners_match_frame() {
  for face in CellFace::ALL {
    let c = face.corners();
    assert_eq!(to_cell(face, 0.0, 0.0), corner(c[0]), "{face:?}");
    assert_eq!(to_cell(face, 1.0, 0.0), corner(c[1]), "{face:?}");
    assert_eq!(to_cell(face, 1.0, 1.0), corner(c[2]), "{face:?}");
    assert_eq!(to_cell(face, 0.0, 1.0), corner(c[3]), "{face:?}");
  }
}

#[test]
fn test_frame_winding_is_consistent() {
  for face in CellFace::ALL {
    assert_eq!(face.basis_y().cross(face.basis_x()), face.normal(), "{face:?}");
  }
}

/// A crossing at `t` along a cube edge lands on the same point whether it is
/// read through the face-edge table or the cube edge directly.
#[test]
fn test_face_edges_match_cube_edges() {
  let t = 0.3;
  for face in CellFace::ALL {
    for (local, id) in face.edges().into_iter().enumerate() {
      let (cube_edge, reversed) = FACE_EDGE_TO_CUBE_EDGE[id];
      let [a, b] = CUBE_EDGES[cube_edge as usize];
      let (a, b) = (corner(a as usize), corner(b as usize));
      // Cube edge crossings are measured from the lower corner.
      let (lo, hi) = if a.cmple(b).all() { (a, b) } else { (b, a) };
      let expected = lo.lerp(hi, t);

      let s = if reversed { 1.0 - t } else { t };
      let (x, y) = match local {
        0 => (s, 0.0),
        1 => (1.0, s),
        2 => (1.0 - s, 1.0),
        _ => (0.0, 1.0 - s),
      };
      let actual = to_cell(face, x, y);
      assert!(
        (actual - expected).length() < 1e-6,
        "{face:?} edge {local}: {actual} != {expected}"
      );
    }
  }
}
