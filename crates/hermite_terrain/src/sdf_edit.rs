//! Stamping a signed distance field into a hermite voxel grid.
//!
//! # Passes
//!
//! ```text
//!   1. materials     every grid point inside the SDF bound (+1) gets the
//!                    edit material when the field is negative there
//!   2. crossings     every edge leaving a point in the bound gets a new
//!                    intersection + normal when the field changes sign
//!                    along it, or loses its crossing when both ends are
//!                    inside
//! ```
//!
//! The snapshot is never written; results land in a full copy so pass 2 can
//! compare the new crossing against the one stored before the edit.
//!
//! Edges that already separate two materials keep their crossing unless the
//! new one moves the surface away from the solid side (additive edits) or
//! towards it (carving). An unrelated surface on the far side of the edge is
//! therefore never eroded.

use glam::{IVec3, Vec3};

use crate::grid::{Grid, VoxelGrid};
use crate::indexer::{Indexer, LinearIndexer};
use crate::sdf::{central_difference_normal, Sdf, NORMAL_EPSILON};
use crate::types::{Axis, MaterialId, AIR};

/// Field magnitude below which the crossing search stops.
pub const INTERSECTION_EPSILON: f32 = 0.001;

/// Refinement steps of the crossing search.
pub const INTERSECTION_STEPS: usize = 4;

/// Apply `sdf` to a copy of `snapshot` and report whether any material changed.
///
/// `origin` is the grid-space position of the field's origin: grid point `p`
/// samples the field at `p - origin`. With `replace` only points that are
/// already solid change material.
pub fn apply_sdf<S: Sdf + ?Sized, I: Indexer>(
  snapshot: &VoxelGrid<I>,
  origin: Vec3,
  sdf: &S,
  material: MaterialId,
  replace: bool,
) -> (VoxelGrid<I>, bool) {
  let mut out = snapshot.clone();
  let changed = apply_sdf_into(snapshot, origin, sdf, material, replace, &mut out);
  (out, changed)
}

/// [`apply_sdf`] writing into a caller-owned grid of the same size.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "sdf_edit::apply"))]
pub fn apply_sdf_into<S: Sdf + ?Sized, I: Indexer>(
  snapshot: &VoxelGrid<I>,
  origin: Vec3,
  sdf: &S,
  material: MaterialId,
  replace: bool,
  out: &mut VoxelGrid<I>,
) -> bool {
  out.copy_from(snapshot);

  let (w, h, d) = snapshot.dims();
  if w == 0 || h == 0 || d == 0 {
    return false;
  }
  let bounds = sdf.bounds();
  let min = (origin + bounds.min).floor().as_ivec3();
  let max = (origin + bounds.max).ceil().as_ivec3();
  let last = IVec3::new(w as i32 - 1, h as i32 - 1, d as i32 - 1);

  let mut field: Grid<f32, LinearIndexer> = Grid::new(w, h, d);
  let mut changed = false;

  // Pass 1: materials, one voxel beyond the bound so every edge of pass 2 has
  // both ends evaluated.
  let lo = min.max(IVec3::ZERO);
  let hi = (max.min(last) + IVec3::ONE).min(last);
  for z in lo.z..=hi.z {
    for y in lo.y..=hi.y {
      for x in lo.x..=hi.x {
        let (ux, uy, uz) = (x as usize, y as usize, z as usize);
        let value = sdf.eval(Vec3::new(x as f32, y as f32, z as f32) - origin);
        field.set(ux, uy, uz, value);
        if value >= 0.0 {
          continue;
        }
        let voxel = out.get_mut(ux, uy, uz);
        let write = if replace {
          voxel.material != AIR
        } else {
          voxel.material != material
        };
        if write {
          *voxel = voxel.with_material(material);
          changed = true;
        }
      }
    }
  }

  // Pass 2: crossings, for points whose three edges all stay inside the grid.
  let hi = max.min(last - IVec3::ONE);
  let ctx = EdgeContext {
    snapshot,
    field: &field,
    origin,
    sdf,
    material,
    replace,
  };
  for z in lo.z..=hi.z {
    for y in lo.y..=hi.y {
      for x in lo.x..=hi.x {
        for axis in Axis::ALL {
          ctx.apply_edge(out, IVec3::new(x, y, z), axis);
        }
      }
    }
  }

  changed
}

struct EdgeContext<'a, S: ?Sized, I: Indexer> {
  snapshot: &'a VoxelGrid<I>,
  field: &'a Grid<f32, LinearIndexer>,
  origin: Vec3,
  sdf: &'a S,
  material: MaterialId,
  replace: bool,
}

impl<S: Sdf + ?Sized, I: Indexer> EdgeContext<'_, S, I> {
  fn apply_edge(&self, out: &mut VoxelGrid<I>, start: IVec3, axis: Axis) {
    let end = start + axis.offset();
    let d1 = *self.field.at(start);
    let d2 = *self.field.at(end);
    let crosses = (d1 < 0.0) != (d2 < 0.0);

    // Carving flips normals so they keep pointing out of the remaining solid.
    let facing = if self.material == AIR { -1.0 } else { 1.0 };

    let ignored = self.replace && (!out.at(start).is_solid() || !out.at(end).is_solid());
    if ignored {
      if crosses && out.at(start).material == out.at(end).material {
        let (t, normal) = self.crossing(start, d1, end, d2);
        let voxel = out.at_mut(start);
        *voxel = voxel.with_edge(axis, t, normal * facing);
      }
      return;
    }

    if crosses {
      let (t, normal) = self.crossing(start, d1, end, d2);
      let before_start = self.snapshot.at(start);
      let before_end = self.snapshot.at(end);

      let overwrite = if before_start.material == before_end.material {
        true
      } else {
        let existing = out.at(start).edges[axis.index()].intersection;
        let (s1, s2) = (before_start.is_solid(), before_end.is_solid());
        if self.material != AIR {
          (d1 < 0.0 && s1 && t > existing) || (d2 < 0.0 && s2 && t < existing)
        } else {
          (d1 < 0.0 && s2 && t > existing) || (d2 < 0.0 && s1 && t < existing)
        }
      };

      if overwrite {
        let voxel = out.at_mut(start);
        *voxel = voxel.with_edge(axis, t, normal * facing);
      }
    } else if d1 < 0.0 && d2 < 0.0 {
      let voxel = out.at_mut(start);
      *voxel = voxel.with_edge(axis, 0.0, Vec3::ZERO);
    }
  }

  /// Crossing parameter along the unit edge and the field normal there.
  fn crossing(&self, start: IVec3, d1: f32, end: IVec3, d2: f32) -> (f32, Vec3) {
    let v1 = start.as_vec3() - self.origin;
    let v2 = end.as_vec3() - self.origin;
    let point = find_intersection(v1, d1, v2, d2, self.sdf, INTERSECTION_EPSILON, INTERSECTION_STEPS);
    let t = (point - v1).length();
    (t, central_difference_normal(self.sdf, point, NORMAL_EPSILON))
  }
}

/// Locate the zero crossing of `sdf` between `v1` and `v2`.
///
/// Each step moves both ends inward by their field magnitude before halving,
/// which converges much faster than plain bisection on near-linear fields.
/// Returns whichever end is closer to the surface.
pub fn find_intersection<S: Sdf + ?Sized>(
  v1: Vec3,
  mut d1: f32,
  v2: Vec3,
  d2: f32,
  sdf: &S,
  epsilon: f32,
  max_steps: usize,
) -> Vec3 {
  let dir = (v2 - v1).normalize_or_zero();
  let (mut p1, mut p2) = (v1, v2);
  let (mut abs1, mut abs2) = (d1.abs(), d2.abs());

  for _ in 0..max_steps {
    let p3 = (p1 + dir * abs1 + p2 - dir * abs2) * 0.5;
    let d3 = sdf.eval(p3);
    if (d3 < 0.0) == (d1 < 0.0) {
      p1 = p3;
      d1 = d3;
      abs1 = d3.abs();
    } else {
      p2 = p3;
      abs2 = d3.abs();
    }
    if abs1 < epsilon || abs2 < epsilon {
      break;
    }
  }

  if abs1 < abs2 {
    p1
  } else {
    p2
  }
}

#[cfg(test)]
#[path = "sdf_edit_test.rs"]
mod sdf_edit_test;
