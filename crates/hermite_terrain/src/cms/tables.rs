//! Marching squares case tables for a single cell face.
//!
//! # Face Layout
//!
//! ```text
//!   m4 ──── edge 2 ──── m3
//!    │       (W-t, H)    │
//!    │                   │
//! edge 3              edge 1
//! (0, H-t)            (W, t)
//!    │                   │
//!    │       (t, 0)      │
//!   m1 ──── edge 0 ──── m2
//! ```
//!
//! The case index has bit `i` set when face corner `m(i+1)` is solid. Each
//! case lists the boundary edges its segments cross (in segment order) and
//! which face corner supplies the material of each crossing.

/// Segment edges for one marching squares case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentCase {
  /// Number of crossed edges: 0, 2 or 4 (ambiguous).
  pub count: u8,
  pub edges: [u8; 4],
  /// Face corner (0..4) whose material tags each crossing.
  pub materials: [u8; 4],
}

/// Face edges that may carry a material transition for one case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionCase {
  pub count: u8,
  pub edges: [u8; 2],
  /// Face corners on either side of each transition edge.
  pub materials: [[u8; 2]; 2],
}

const fn seg(count: u8, edges: [u8; 4], materials: [u8; 4]) -> SegmentCase {
  SegmentCase {
    count,
    edges,
    materials,
  }
}

const fn trans(count: u8, edges: [u8; 2], materials: [[u8; 2]; 2]) -> TransitionCase {
  TransitionCase {
    count,
    edges,
    materials,
  }
}

pub const SEGMENT_CASES: [SegmentCase; 16] = [
  seg(0, [0, 0, 0, 0], [0, 0, 0, 0]),
  seg(2, [3, 0, 0, 0], [0, 0, 0, 0]),
  seg(2, [0, 1, 0, 0], [1, 1, 0, 0]),
  seg(2, [3, 1, 0, 0], [0, 1, 0, 0]),
  seg(2, [1, 2, 0, 0], [2, 2, 0, 0]),
  seg(4, [3, 2, 1, 0], [0, 2, 2, 0]),
  seg(2, [0, 2, 0, 0], [1, 2, 0, 0]),
  seg(2, [3, 2, 0, 0], [0, 2, 0, 0]),
  seg(2, [2, 3, 0, 0], [3, 3, 0, 0]),
  seg(2, [2, 0, 0, 0], [3, 0, 0, 0]),
  seg(4, [2, 3, 0, 1], [3, 3, 1, 1]),
  seg(2, [2, 1, 0, 0], [3, 1, 0, 0]),
  seg(2, [1, 3, 0, 0], [2, 3, 0, 0]),
  seg(2, [1, 0, 0, 0], [2, 0, 0, 0]),
  seg(2, [0, 3, 0, 0], [1, 3, 0, 0]),
  seg(0, [0, 0, 0, 0], [0, 0, 0, 0]),
];

pub const TRANSITION_CASES: [TransitionCase; 16] = [
  trans(0, [0, 0], [[0, 0], [0, 0]]),
  trans(0, [0, 0], [[0, 0], [0, 0]]),
  trans(0, [0, 0], [[0, 0], [0, 0]]),
  trans(1, [0, 0], [[0, 1], [0, 0]]),
  trans(0, [0, 0], [[0, 0], [0, 0]]),
  trans(0, [0, 0], [[0, 0], [0, 0]]),
  trans(1, [1, 0], [[1, 2], [0, 0]]),
  trans(2, [0, 1], [[0, 1], [1, 2]]),
  trans(0, [0, 0], [[0, 0], [0, 0]]),
  trans(1, [3, 0], [[3, 0], [0, 0]]),
  trans(0, [0, 0], [[0, 0], [0, 0]]),
  trans(2, [3, 0], [[3, 0], [0, 1]]),
  trans(1, [2, 0], [[2, 3], [0, 0]]),
  trans(2, [2, 3], [[2, 3], [3, 0]]),
  trans(2, [1, 2], [[1, 2], [2, 3]]),
  trans(0, [0, 0], [[0, 0], [0, 0]]),
];

/// Cell corner offsets, indexed as the polygonizer's corner numbering.
pub const CORNER_OFFSETS: [[u8; 3]; 8] = [
  [0, 0, 0],
  [1, 0, 0],
  [1, 0, 1],
  [0, 0, 1],
  [0, 1, 0],
  [1, 1, 0],
  [1, 1, 1],
  [0, 1, 1],
];

/// Cube edges as corner pairs.
pub const CUBE_EDGES: [[u8; 2]; 12] = [
  [0, 1],
  [1, 2],
  [2, 3],
  [3, 0],
  [4, 5],
  [5, 6],
  [6, 7],
  [7, 4],
  [0, 4],
  [1, 5],
  [2, 6],
  [3, 7],
];

/// Cube edge of each face edge, and whether the face walks it backwards.
///
/// Face edges are numbered `face_base + local_edge`, see [`CellFace::edge_base`].
///
/// [`CellFace::edge_base`]: super::face::CellFace::edge_base
pub const FACE_EDGE_TO_CUBE_EDGE: [(u8, bool); 24] = [
  (3, true),
  (8, false),
  (7, false),
  (11, true),
  (1, false),
  (10, false),
  (5, true),
  (9, true),
  (2, false),
  (1, true),
  (0, true),
  (3, false),
  (4, false),
  (5, false),
  (6, true),
  (7, true),
  (0, false),
  (9, false),
  (4, true),
  (8, true),
  (2, true),
  (11, false),
  (6, false),
  (10, true),
];

/// Voxel owning each cube edge, as (corner, axis index). The edge runs from
/// that corner towards +axis.
pub const CUBE_EDGE_SOURCE: [(u8, u8); 12] = [
  (0, 0),
  (1, 2),
  (3, 0),
  (0, 2),
  (4, 0),
  (5, 2),
  (7, 0),
  (4, 2),
  (0, 1),
  (1, 1),
  (2, 1),
  (3, 1),
];

#[cfg(test)]
#[path = "tables_test.rs"]
mod tables_test;
