use super::*;

fn solid_corners(case: usize) -> [bool; 4] {
  [case & 1 != 0, case & 2 != 0, case & 4 != 0, case & 8 != 0]
}

/// Face edge `e` connects face corners `e` and `(e + 1) % 4`.
fn edge_is_cut(case: usize, edge: u8) -> bool {
  let s = solid_corners(case);
  s[edge as usize] != s[(edge as usize + 1) % 4]
}

#[test]
fn test_uniform_cases_empty() {
  assert_eq!(SEGMENT_CASES[0].count, 0);
  assert_eq!(SEGMENT_CASES[15].count, 0);
}

#[test]
fn test_segment_edges_are_cut() {
  for (case, entry) in SEGMENT_CASES.iter().enumerate() {
    for &edge in &entry.edges[..entry.count as usize] {
      assert!(edge_is_cut(case, edge), "case {case} lists uncut edge {edge}");
    }
    let cut = (0..4).filter(|&e| edge_is_cut(case, e)).count();
    assert_eq!(cut, entry.count as usize, "case {case}");
  }
}

#[test]
fn test_crossing_materials_are_solid() {
  for (case, entry) in SEGMENT_CASES.iter().enumerate() {
    let solid = solid_corners(case);
    for &m in &entry.materials[..entry.count as usize] {
      assert!(solid[m as usize], "case {case} tags with empty corner {m}");
    }
  }
}

#[test]
fn test_transition_edges_join_solid_corners() {
  for (case, entry) in TRANSITION_CASES.iter().enumerate() {
    let solid = solid_corners(case);
    for i in 0..entry.count as usize {
      let edge = entry.edges[i] as usize;
      assert!(solid[edge] && solid[(edge + 1) % 4], "case {case} edge {edge}");
      assert_eq!(entry.materials[i], [edge as u8, ((edge + 1) % 4) as u8]);
    }
  }
}

#[test]
fn test_cube_edge_sources_match_corners() {
  for (edge, &(corner, axis)) in CUBE_EDGE_SOURCE.iter().enumerate() {
    let [a, b] = CUBE_EDGES[edge];
    let (a, b) = (CORNER_OFFSETS[a as usize], CORNER_OFFSETS[b as usize]);
    let start = CORNER_OFFSETS[corner as usize];
    // The owning corner is the lower end along the edge axis.
    let lower = if a[axis as usize] < b[axis as usize] { a } else { b };
    assert_eq!(start, lower, "edge {edge}");
  }
}

#[test]
fn test_every_cube_edge_used_twice_by_faces() {
  let mut uses = [0; 12];
  for &(edge, _) in &FACE_EDGE_TO_CUBE_EDGE {
    uses[edge as usize] += 1;
  }
  assert!(uses.iter().all(|&u| u == 2));
}
