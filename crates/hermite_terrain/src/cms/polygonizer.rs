//! Cubical Marching Squares polygonizer.
//!
//! # Per-Cell Pipeline
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  for each of the 6 faces                                           │
//! │    case index from 4 corner materials ──► SEGMENT_CASES            │
//! │    2 crossings ─► 1 segment                                        │
//! │    4 crossings ─► pick the diagonal pairing with fewer violations  │
//! │    each segment: optional 2D sharp feature, optional material      │
//! │    transition vertex                                               │
//! ├────────────────────────────────────────────────────────────────────┤
//! │  join segments end-to-start into closed components                 │
//! ├────────────────────────────────────────────────────────────────────┤
//! │  per component: classify 3D edge / corner / material transition,   │
//! │  solve the feature vertex with the QEF solver                      │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All intermediate lists live in a caller-owned [`PolygonizerScratch`] that
//! is cleared per cell, so polygonizing a chunk does not allocate once the
//! buffers are warm.

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use super::cell::{CellArrays, CellData, VoxelCell, CELL_SIZE};
use super::component::{ComponentVertex, MeshComponent, PackedIndex, PolygonizerOutput};
use super::face::CellFace;
use super::properties::{CmsProperties, FeatureThresholds};
use super::solver2d::{find_line_intersection, Feature2D, FeatureType2D, IntersectionSolver2D, SharpFeatureSolver2D};
use super::tables::{SegmentCase, SEGMENT_CASES, TRANSITION_CASES};
use crate::grid::VoxelGrid;
use crate::indexer::Indexer;
use crate::qef::{SharpFeatureSolver, SvdQefSolver};
use crate::types::{MaterialId, AIR};

/// Squared distance under which segment endpoints are joined.
const JOIN_DISTANCE_SQ: f32 = 0.00001;
/// Normals shorter than this (squared) count as unset.
const NORMAL_SET_SQ: f32 = 0.01;

// =============================================================================
// Scratch
// =============================================================================

#[derive(Clone, Copy, Debug)]
struct SegmentTransition {
  /// Position of the transition vertex inside its segment.
  local_index: usize,
  surface_normal: Vec3,
  materials: [MaterialId; 2],
}

#[derive(Clone, Copy, Debug)]
struct Segment {
  index: usize,
  size: usize,
  transition: Option<SegmentTransition>,
}

/// Material boundary crossing a face edge between two solid corners.
#[derive(Clone, Copy, Debug)]
struct MaterialTransition {
  point: Vec2,
  /// Transition normal projected into face space.
  direction: Vec2,
  normal: Vec3,
  materials: [MaterialId; 2],
}

#[derive(Clone, Copy, Debug)]
struct SegmentVertex {
  pos: Vec2,
  normal: Vec3,
  material: MaterialId,
}

/// Boundary crossing on a face edge.
#[derive(Clone, Copy, Debug)]
struct TaggedEdge {
  material: MaterialId,
  intersection: Vec2,
  normal: Vec3,
  /// Normal projected into face space and renormalized.
  projected: Vec2,
}

/// Reusable buffers for [`CmsPolygonizer::polygonize`].
#[derive(Clone, Debug, Default)]
pub struct PolygonizerScratch {
  segments: Vec<Segment>,
  segment_vertices: Vec<Vec3>,
  segment_normals: Vec<Vec3>,
  /// `None` marks the placeholder slot of a transition vertex.
  segment_materials: Vec<Option<MaterialId>>,
  component: Vec<Segment>,
  transition_surface_normals: Vec<Vec3>,
  material_transitions: SmallVec<[MaterialTransition; 2]>,
  points: Vec<Vec3>,
  normals: Vec<Vec3>,
}

impl PolygonizerScratch {
  pub fn new() -> Self {
    Self::default()
  }

  fn begin_cell(&mut self) {
    self.segments.clear();
    self.segment_vertices.clear();
    self.segment_normals.clear();
    self.segment_materials.clear();
  }

  fn push_vertex(&mut self, position: Vec3, normal: Vec3, material: Option<MaterialId>) {
    self.segment_vertices.push(position);
    self.segment_normals.push(normal);
    self.segment_materials.push(material);
  }
}

/// 2D frame of one face in cell space.
struct FaceFrame {
  origin: Vec3,
  basis_x: Vec3,
  basis_y: Vec3,
  width: f32,
  height: f32,
}

impl FaceFrame {
  fn new(cell_position: Vec3, face: CellFace) -> Self {
    Self {
      origin: cell_position + face.origin() * CELL_SIZE,
      basis_x: face.basis_x(),
      basis_y: face.basis_y(),
      width: CELL_SIZE,
      height: CELL_SIZE,
    }
  }

  #[inline]
  fn to_world(&self, p: Vec2) -> Vec3 {
    self.origin + self.basis_x * p.x + self.basis_y * p.y
  }

  #[inline]
  fn project(&self, n: Vec3) -> Vec2 {
    Vec2::new(n.dot(self.basis_x), n.dot(self.basis_y))
  }

  /// Face-space position of a crossing at `t` on local edge `edge`.
  #[inline]
  fn edge_point(&self, edge: usize, t: f32) -> Vec2 {
    match edge {
      0 => Vec2::new(t, 0.0),
      1 => Vec2::new(self.width, t),
      2 => Vec2::new(self.width - t, self.height),
      _ => Vec2::new(0.0, self.height - t),
    }
  }
}

// =============================================================================
// Polygonizer
// =============================================================================

/// CMS polygonizer, generic over thresholds and both feature solvers.
#[derive(Clone, Debug, Default)]
pub struct CmsPolygonizer<P = CmsProperties, S = SvdQefSolver, S2 = IntersectionSolver2D> {
  pub properties: P,
  pub solver: S,
  pub solver_2d: S2,
}

impl CmsPolygonizer {
  /// Default thresholds, unclamped QEF solver.
  pub fn new() -> Self {
    Self::default()
  }
}

impl<P: FeatureThresholds, S: SharpFeatureSolver, S2: SharpFeatureSolver2D> CmsPolygonizer<P, S, S2> {
  pub fn with_parts(properties: P, solver: S, solver_2d: S2) -> Self {
    Self {
      properties,
      solver,
      solver_2d,
    }
  }

  /// Polygonize one cell, appending its components to `out`.
  pub fn polygonize<C: VoxelCell>(&self, cell: &C, scratch: &mut PolygonizerScratch, out: &mut PolygonizerOutput) {
    scratch.begin_cell();
    for face in CellFace::ALL {
      self.generate_face_segments(cell, face, scratch);
    }
    self.generate_components(cell, scratch, out);
  }

  /// Polygonize every cell stored in `cells`.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "cms::polygonize_cells"))]
  pub fn polygonize_cells(&self, cells: &CellArrays, out: &mut PolygonizerOutput) {
    let mut scratch = PolygonizerScratch::new();
    for i in 0..cells.len() {
      self.polygonize(&cells.cell(i), &mut scratch, out);
    }
  }

  /// Polygonize every cell of a grid whose corners are not all equal in
  /// solidity. Cell `(x, y, z)` spans grid points `(x..=x+1, ..)`.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "cms::polygonize_grid"))]
  pub fn polygonize_grid<I: Indexer>(&self, grid: &VoxelGrid<I>, scratch: &mut PolygonizerScratch, out: &mut PolygonizerOutput) {
    let (w, h, d) = grid.dims();
    for z in 0..d.saturating_sub(1) {
      for y in 0..h.saturating_sub(1) {
        for x in 0..w.saturating_sub(1) {
          let cell = CellData::from_grid(grid, x, y, z);
          let solid = cell.materials.iter().filter(|&&m| self.properties.is_solid(m)).count();
          if solid == 0 || solid == 8 {
            continue;
          }
          self.polygonize(&cell, scratch, out);
        }
      }
    }
  }

  // ---------------------------------------------------------------------------
  // Face segments
  // ---------------------------------------------------------------------------

  fn generate_face_segments<C: VoxelCell>(&self, cell: &C, face: CellFace, scratch: &mut PolygonizerScratch) {
    let materials = cell.face_materials(face);
    let mut case = 0;
    for (i, &m) in materials.iter().enumerate() {
      if self.properties.is_solid(m) {
        case |= 1 << i;
      }
    }
    if case == 0 || case == 0b1111 {
      return;
    }

    let frame = FaceFrame::new(cell.position(), face);
    let edges = face.edges();

    scratch.material_transitions.clear();
    let transitions = &TRANSITION_CASES[case];
    for i in 0..transitions.count as usize {
      let local = transitions.edges[i] as usize;
      let id = edges[local];
      if !cell.has_intersection(id) {
        continue;
      }
      let normal = cell.face_normal(id);
      let [m1, m2] = transitions.materials[i];
      scratch.material_transitions.push(MaterialTransition {
        point: frame.edge_point(local, cell.face_intersection(id)),
        direction: frame.project(normal),
        normal,
        materials: [materials[m1 as usize], materials[m2 as usize]],
      });
    }

    let entry = &SEGMENT_CASES[case];
    let tagged = |k: usize| Self::tagged_edge(cell, entry, k, &edges, &materials, &frame);
    match entry.count {
      2 => {
        let (te0, te1) = (tagged(0), tagged(1));
        let feature = self.find_2d_feature(&te0, &te1, &frame);
        self.create_segment(scratch, &frame, &te0, &te1, feature);
      }
      4 => {
        let te = [tagged(0), tagged(1), tagged(2), tagged(3)];
        self.resolve_ambiguous_face(scratch, &frame, &te);
      }
      _ => {}
    }
  }

  fn tagged_edge<C: VoxelCell>(
    cell: &C,
    entry: &SegmentCase,
    k: usize,
    edges: &[usize; 4],
    materials: &[MaterialId; 4],
    frame: &FaceFrame,
  ) -> TaggedEdge {
    let local = entry.edges[k] as usize;
    let id = edges[local];
    let normal = cell.face_normal(id);
    TaggedEdge {
      material: materials[entry.materials[k] as usize],
      intersection: frame.edge_point(local, cell.face_intersection(id)),
      normal,
      projected: frame.project(normal).normalize(),
    }
  }

  /// Two-segment case: both diagonal pairings are tried, the one whose
  /// features are valid, in bounds and non-overlapping wins.
  fn resolve_ambiguous_face(&self, scratch: &mut PolygonizerScratch, frame: &FaceFrame, te: &[TaggedEdge; 4]) {
    let solver = &self.solver_2d;
    let f1 = self.find_2d_feature(&te[0], &te[1], frame);
    let f2 = self.find_2d_feature(&te[2], &te[3], frame);
    let mut case1 = violations(f1.kind) + violations(f2.kind);
    if solver.check_feature_intersection(
      te[0].intersection,
      f1.point,
      te[1].intersection,
      te[2].intersection,
      f2.point,
      te[3].intersection,
    ) {
      case1 += 3;
    }
    if case1 == 0 {
      self.create_segment(scratch, frame, &te[0], &te[1], f1);
      self.create_segment(scratch, frame, &te[2], &te[3], f2);
      return;
    }

    let f4 = self.find_2d_feature(&te[0], &te[3], frame);
    let f3 = self.find_2d_feature(&te[1], &te[2], frame);
    let mut case2 = violations(f3.kind) + violations(f4.kind);
    if solver.check_feature_intersection(
      te[1].intersection,
      f3.point,
      te[2].intersection,
      te[0].intersection,
      f4.point,
      te[3].intersection,
    ) {
      case2 += 3;
    }

    let use_case1 = if case2 == 0 {
      false
    } else if case1 == case2 {
      // Heuristic: prefer the pairing with less acute normal pairs.
      let acute1 = te[0].projected.dot(te[1].projected).abs() + te[2].projected.dot(te[3].projected).abs();
      let acute2 = te[1].projected.dot(te[2].projected).abs() + te[0].projected.dot(te[3].projected).abs();
      acute1 < acute2
    } else {
      case1 < case2
    };

    if use_case1 {
      self.create_segment(scratch, frame, &te[0], &te[1], f1);
      self.create_segment(scratch, frame, &te[2], &te[3], f2);
    } else {
      self.create_segment(scratch, frame, &te[2], &te[1], f3);
      self.create_segment(scratch, frame, &te[0], &te[3], f4);
    }
  }

  /// Solve the 2D feature; shallow angles are demoted to `None` but keep
  /// their point for disambiguation.
  fn find_2d_feature(&self, a: &TaggedEdge, b: &TaggedEdge, frame: &FaceFrame) -> Feature2D {
    let mut feature = self.solver_2d.solve(
      a.intersection,
      a.projected,
      b.intersection,
      b.projected,
      frame.width,
      frame.height,
    );
    if !self.properties.is_sharp_2d(a.projected.dot(b.projected), a.normal.dot(b.normal)) {
      feature.kind = FeatureType2D::None;
    }
    feature
  }

  fn create_segment(
    &self,
    scratch: &mut PolygonizerScratch,
    frame: &FaceFrame,
    e1: &TaggedEdge,
    e2: &TaggedEdge,
    feature: Feature2D,
  ) {
    let is_sharp = feature.kind.is_sharp();
    let mut verts: SmallVec<[SegmentVertex; 4]> = SmallVec::new();
    verts.push(SegmentVertex {
      pos: e1.intersection,
      normal: e1.normal,
      material: e1.material,
    });
    if is_sharp {
      let point = clamp_feature(feature.point, frame.width, frame.height);
      verts.push(SegmentVertex {
        pos: point,
        normal: e1.normal,
        material: e1.material,
      });
      verts.push(SegmentVertex {
        pos: point,
        normal: e2.normal,
        material: e2.material,
      });
    }
    verts.push(SegmentVertex {
      pos: e2.intersection,
      normal: e2.normal,
      material: e2.material,
    });

    let mut insertion = if is_sharp {
      None
    } else {
      self.find_transition_insertion(&scratch.material_transitions, frame, &mut verts)
    };

    if !is_sharp && insertion.is_none() && e1.material != e2.material {
      // Materials differ without a usable transition line: split at the
      // midpoint.
      insertion = Some(TransitionInsertion {
        after: 0,
        vertex: frame.to_world((verts[0].pos + verts[1].pos) * 0.5),
        normal: Vec3::ZERO,
        materials: [e1.material, e2.material],
      });
    }

    let index = scratch.segment_vertices.len();
    let mut transition = None;
    for (i, v) in verts.iter().enumerate() {
      scratch.push_vertex(frame.to_world(v.pos), v.normal, Some(v.material));
      if let Some(ins) = insertion.filter(|ins| ins.after == i) {
        transition = Some(scratch.segment_vertices.len() - index);
        scratch.push_vertex(ins.vertex, ins.normal, None);
      }
    }
    let size = scratch.segment_vertices.len() - index;

    let transition = transition.zip(insertion).map(|(local_index, ins)| {
      // Transitions are smooth: their surface normal averages the neighbours.
      let before = scratch.segment_normals[index + local_index - 1];
      let after = scratch.segment_normals[index + local_index + 1];
      SegmentTransition {
        local_index,
        surface_normal: (before + after) * 0.5,
        materials: ins.materials,
      }
    });

    scratch.segments.push(Segment {
      index,
      size,
      transition,
    });
  }

  /// Find the best material transition crossing along the segment's
  /// sub-edges. A crossing that lies on a sub-edge and matches its materials
  /// wins immediately; otherwise the closest projection is kept.
  fn find_transition_insertion(
    &self,
    transitions: &[MaterialTransition],
    frame: &FaceFrame,
    verts: &mut SmallVec<[SegmentVertex; 4]>,
  ) -> Option<TransitionInsertion> {
    if transitions.is_empty() {
      return None;
    }

    let mut best: Option<TransitionInsertion> = None;
    let mut min_error = f32::MAX;
    for i in 0..verts.len() - 1 {
      if best.is_some() {
        break;
      }
      let (v1, v2) = (verts[i], verts[i + 1]);
      let delta = v2.pos - v1.pos;
      let length = delta.length();
      let dir = delta / length;

      for t in transitions.iter().rev() {
        let theta1 = t.normal.dot(v1.normal).abs();
        let theta2 = t.normal.dot(v2.normal).abs();
        if !self.properties.is_valid_2d_transition(theta1.min(theta2), theta1.max(theta2)) {
          continue;
        }
        let line_end = t.point + Vec2::new(t.direction.y, -t.direction.x);
        let Some(hit) = find_line_intersection(t.point, line_end, v1.pos, v2.pos) else {
          continue;
        };

        let projection = dir.dot(hit - v1.pos);
        let on_segment = projection >= 0.0 && projection < length;
        let error = if projection < 0.0 {
          -projection
        } else if projection > length {
          projection - length
        } else {
          0.0
        };
        if !(on_segment || error < min_error) {
          continue;
        }
        if on_segment && t.materials != [v1.material, v2.material] {
          continue;
        }

        min_error = error;
        let point = if on_segment {
          hit
        } else if projection <= 0.0 {
          v1.pos + dir * length * 0.0001
        } else {
          v2.pos - dir * length * 0.0001
        };
        best = Some(TransitionInsertion {
          after: i,
          vertex: frame.to_world(point),
          normal: v1.normal.cross(t.normal.cross(v1.normal)).normalize(),
          materials: if on_segment {
            t.materials
          } else {
            [v1.material, v2.material]
          },
        });
        if on_segment {
          verts[i].material = t.materials[0];
          verts[i + 1].material = t.materials[1];
          break;
        }
      }
    }
    best
  }

  // ---------------------------------------------------------------------------
  // Components
  // ---------------------------------------------------------------------------

  fn generate_components<C: VoxelCell>(&self, cell: &C, scratch: &mut PolygonizerScratch, out: &mut PolygonizerOutput) {
    while let Some(start) = scratch.segments.pop() {
      scratch.component.clear();
      scratch.component.push(start);
      let mut end = scratch.segment_vertices[start.index + start.size - 1];

      while let Some(i) = scratch
        .segments
        .iter()
        .position(|s| (scratch.segment_vertices[s.index] - end).length_squared() < JOIN_DISTANCE_SQ)
      {
        let next = scratch.segments.swap_remove(i);
        end = scratch.segment_vertices[next.index + next.size - 1];
        scratch.component.push(next);
      }

      let component_index = out.indices.len();
      scratch.transition_surface_normals.clear();
      let last = scratch.component.len() - 1;
      let mut current_material = AIR;

      for (j, segment) in scratch.component.iter().enumerate() {
        // Shared endpoints appear once: skip each segment's first vertex
        // except on the first, and the closing vertex on the last.
        let first = if j == 0 { 0 } else { 1 };
        let end = if j == last { segment.size - 1 } else { segment.size };
        for i in first..end {
          let position = scratch.segment_vertices[segment.index + i];
          let normal = scratch.segment_normals[segment.index + i];
          let normal_set = normal.length_squared() > NORMAL_SET_SQ;

          match segment.transition {
            Some(t) if t.local_index == i => {
              for material in t.materials {
                out.indices.push(PackedIndex::new(out.vertices.len(), true, false, normal_set));
                out.vertices.push(ComponentVertex {
                  position,
                  normal,
                  material,
                });
                scratch.transition_surface_normals.push(t.surface_normal);
              }
              current_material = t.materials[1];
            }
            _ => {
              let is_2d_feature = i != 0 && i != segment.size - 1;
              let material = scratch.segment_materials[segment.index + i].unwrap_or(current_material);
              current_material = material;
              out.indices.push(PackedIndex::new(out.vertices.len(), false, is_2d_feature, normal_set));
              out.vertices.push(ComponentVertex {
                position,
                normal,
                material,
              });
            }
          }
        }
      }

      let size = out.indices.len() - component_index;
      let component = self.reconstruct_3d_feature(cell, component_index, size, scratch, out);
      out.components.push(component);
    }
  }

  fn reconstruct_3d_feature<C: VoxelCell>(
    &self,
    cell: &C,
    index: usize,
    size: usize,
    scratch: &mut PolygonizerScratch,
    out: &mut PolygonizerOutput,
  ) -> MeshComponent {
    let range = index..index + size;
    let indices = &out.indices[range.clone()];
    let vertex = |p: PackedIndex| out.vertices[p.index()];

    // Most divergent pair of regular normals.
    let mut theta = 1.0f32;
    let mut n0 = Vec3::ZERO;
    let mut n1 = Vec3::ZERO;
    let mut regular_samples = 0;
    let mut transition_samples = 0;
    let mut vert_sum = Vec3::ZERO;
    let mut vert_count = 0;
    for (i, &p1) in indices.iter().enumerate() {
      if p1.is_2d_sharp_feature() {
        continue;
      }
      let v1 = vertex(p1);
      vert_sum += v1.position;
      vert_count += 1;
      if !p1.is_normal_set() {
        continue;
      }
      if p1.is_material_transition() {
        transition_samples += 1;
        continue;
      }
      regular_samples += 1;
      for (j, &p2) in indices.iter().enumerate() {
        if i == j || p2.is_2d_sharp_feature() || !p2.is_normal_set() || p2.is_material_transition() {
          continue;
        }
        let n2 = vertex(p2).normal;
        let cos = v1.normal.dot(n2);
        if cos <= theta {
          n0 = v1.normal;
          n1 = n2;
          theta = cos;
        }
      }
    }

    let mut component = MeshComponent {
      index,
      size,
      feature_vertex: Vec3::ZERO,
      regular_feature: false,
      material_transition_feature: false,
    };

    if regular_samples + transition_samples > 2 {
      let vert_mean = vert_sum / vert_count as f32;

      // Most divergent pair of transition normals, oriented by which side
      // of the component centre each vertex lies on.
      let mut transition_theta = 1.0f32;
      for (i, &p1) in indices.iter().enumerate() {
        if p1.is_2d_sharp_feature() || !p1.is_normal_set() || !p1.is_material_transition() {
          continue;
        }
        let v1 = vertex(p1);
        for (j, &p2) in indices.iter().enumerate() {
          if i == j || p2.is_2d_sharp_feature() || !p2.is_normal_set() || !p2.is_material_transition() {
            continue;
          }
          let v2 = vertex(p2);
          // Relaxed with few samples: only same-material pairs compare.
          if v1.material != v2.material && transition_samples <= 4 {
            continue;
          }
          let diff1 = v1.position - vert_mean;
          let diff2 = v2.position - vert_mean;
          let perp = diff1.cross(diff2);
          let d1 = diff1.cross(perp);
          let d2 = diff2.cross(perp);
          let cos = v1.normal.dot(v2.normal);
          if sign(d1.dot(v1.normal)) == sign(d2.dot(v2.normal)) {
            transition_theta = transition_theta.min(-cos);
          } else {
            transition_theta = transition_theta.min(cos);
          }
        }
      }

      let has_pair = n0.length_squared() > NORMAL_SET_SQ && n1.length_squared() > NORMAL_SET_SQ;
      let is_sharp = has_pair && self.properties.is_sharp_3d(theta);
      let is_transition =
        has_pair && transition_samples >= 2 && self.properties.is_valid_3d_transition(transition_theta);

      if is_sharp || is_transition {
        let excluded = |p: PackedIndex| p.is_2d_sharp_feature() || (p.is_material_transition() && !is_transition);

        let is_corner = if is_transition && self.properties.is_sharp_3d(transition_theta) {
          true
        } else {
          let plane_normal = n0.cross(n1);
          let phi = indices
            .iter()
            .filter(|&&p| !excluded(p) && p.is_normal_set())
            .map(|&p| vertex(p).normal.dot(plane_normal).abs())
            .fold(0.0f32, f32::max);
          self.properties.is_sharp_3d_corner(phi)
        };

        let only_transition = !is_sharp && is_transition;
        scratch.points.clear();
        scratch.normals.clear();
        let mut ls_sum = Vec3::ZERO;
        let mut ls_count = 0;
        for (i, &p) in indices.iter().enumerate() {
          if excluded(p) {
            continue;
          }
          let v = vertex(p);
          let normal = if only_transition && !p.is_material_transition() {
            // Without a regular feature, the fan plane through the centre
            // preserves the smooth surface better than the vertex normal.
            let next = vertex(indices[(i + 1) % size]).position;
            (v.position - vert_mean).cross(next - vert_mean).normalize()
          } else if p.is_normal_set() {
            v.normal
          } else {
            Vec3::ZERO
          };
          if !(normal.length_squared() > NORMAL_SET_SQ) {
            continue;
          }
          if !p.is_material_transition() {
            ls_sum += v.position;
            ls_count += 1;
          }
          scratch.normals.push(if normal.is_finite() { normal } else { Vec3::ZERO });
          scratch.points.push(v.position);
        }
        let ls_mean = if ls_count > 0 {
          ls_sum / ls_count as f32
        } else {
          vert_mean
        };

        component.feature_vertex =
          self
            .solver
            .solve(cell.position(), &scratch.points, &scratch.normals, !is_corner, ls_mean);
        component.regular_feature = is_sharp;
        component.material_transition_feature = is_transition;
      }
    }

    // Transition vertices take the smoothed surface normal from here on.
    let mut t = 0;
    for k in range {
      let p = out.indices[k];
      if p.is_material_transition() {
        out.vertices[p.index()].normal = scratch.transition_surface_normals[t];
        t += 1;
      }
    }

    component
  }
}

#[derive(Clone, Copy, Debug)]
struct TransitionInsertion {
  /// Segment vertex the transition vertex follows.
  after: usize,
  vertex: Vec3,
  normal: Vec3,
  materials: [MaterialId; 2],
}

#[inline]
fn violations(kind: FeatureType2D) -> u32 {
  let mut v = 0;
  if !kind.is_valid() {
    v += 2;
  }
  if !kind.is_in_bounds() {
    v += 1;
  }
  v
}

/// Pull far-away features back onto the face border.
#[inline]
fn clamp_feature(mut p: Vec2, width: f32, height: f32) -> Vec2 {
  if p.x < -width {
    p.x = 0.0;
  } else if p.x > width * 2.0 {
    p.x = width;
  }
  if p.y < -height {
    p.y = 0.0;
  } else if p.y > height * 2.0 {
    p.y = height;
  }
  p
}

#[inline]
fn sign(x: f32) -> i32 {
  if x > 0.0 {
    1
  } else if x < 0.0 {
    -1
  } else {
    0
  }
}

#[cfg(test)]
#[path = "polygonizer_test.rs"]
mod polygonizer_test;
