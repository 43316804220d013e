//! Triangle-fan tessellation of polygonizer components.
//!
//! Every component loop becomes a fan around its feature vertex, or around
//! the loop centroid when no feature was reconstructed:
//!
//! ```text
//!        v2 ────── v3
//!       ╱ ╲       ╱ │
//!     v1 ─ center ─ v4
//!       ╲ ╱       ╲ │
//!        v0 ────── v5
//! ```
//!
//! Vertices are deduplicated by quantized position, normal and material so
//! neighbouring cells share their boundary vertices.

use std::collections::HashMap;

use glam::{Affine3A, IVec3, Vec3};
use smallvec::SmallVec;

use crate::cms::{MeshComponent, PackedIndex, PolygonizerOutput};
use crate::color::MaterialColorMap;
use crate::types::{MaterialId, MeshOutput};

/// Quantization steps per unit for vertex deduplication.
pub const DEDUP_QUANTIZATION: f32 = 1024.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct VertexKey {
  position: IVec3,
  normal: IVec3,
  material: MaterialId,
}

impl VertexKey {
  #[inline]
  fn new(position: Vec3, normal: Vec3, material: MaterialId) -> Self {
    Self {
      position: (position * DEDUP_QUANTIZATION).as_ivec3(),
      normal: (normal * DEDUP_QUANTIZATION).as_ivec3(),
      material,
    }
  }
}

/// Maps quantized vertices to their index in one [`MeshOutput`].
///
/// A cache must only ever be used with the mesh it was filled from.
#[derive(Clone, Debug, Default)]
pub struct DedupCache {
  table: HashMap<VertexKey, u32>,
}

impl DedupCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn clear(&mut self) {
    self.table.clear();
  }

  pub fn len(&self) -> usize {
    self.table.len()
  }

  pub fn is_empty(&self) -> bool {
    self.table.is_empty()
  }
}

/// Run of a regular-feature loop between two 2D feature vertices, sharing
/// one averaged normal. Indices are relative to the component start.
#[derive(Clone, Copy, Debug)]
struct SharpSection {
  start: usize,
  end: usize,
  normal: Vec3,
}

/// Appends triangles to a mesh, sharing vertices through a [`DedupCache`].
struct MeshWriter<'a> {
  transform: &'a Affine3A,
  cache: &'a mut DedupCache,
  mesh: &'a mut MeshOutput,
}

impl MeshWriter<'_> {
  /// Transform and emit one triangle corner.
  fn push(&mut self, position: Vec3, normal: Vec3, material: MaterialId) {
    let position = self.transform.transform_point3(position);
    let normal = self.transform.transform_vector3(normal);
    let key = VertexKey::new(position, normal, material);
    let mesh = &mut *self.mesh;
    let index = *self.cache.table.entry(key).or_insert_with(|| {
      let index = mesh.positions.len() as u32;
      mesh.positions.push(position);
      mesh.normals.push(normal);
      mesh.materials.push(material);
      mesh.bounds.encapsulate(position);
      index
    });
    self.mesh.indices.push(index);
  }
}

/// Tessellate every component of `polygonized` into `mesh`.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "tessellation::tessellate"))]
pub fn tessellate(polygonized: &PolygonizerOutput, transform: &Affine3A, cache: &mut DedupCache, mesh: &mut MeshOutput) {
  let mut writer = MeshWriter { transform, cache, mesh };
  let mut sections: SmallVec<[SharpSection; 8]> = SmallVec::new();
  for component in &polygonized.components {
    tessellate_component(component, polygonized, &mut sections, &mut writer);
  }
}

/// [`tessellate`], then color every newly added vertex from its material.
pub fn tessellate_with_colors<M: MaterialColorMap>(
  polygonized: &PolygonizerOutput,
  transform: &Affine3A,
  colors: &M,
  cache: &mut DedupCache,
  mesh: &mut MeshOutput,
) {
  let first = mesh.positions.len();
  tessellate(polygonized, transform, cache, mesh);
  // Colors may lag behind when earlier calls skipped them.
  mesh.colors.resize(first, [0; 4]);
  let new_colors: Vec<_> = mesh.materials[first..].iter().map(|&m| colors.color(m)).collect();
  mesh.colors.extend(new_colors);
}

fn tessellate_component(
  component: &MeshComponent,
  out: &PolygonizerOutput,
  sections: &mut SmallVec<[SharpSection; 8]>,
  writer: &mut MeshWriter<'_>,
) {
  let size = component.size;
  if size == 0 {
    return;
  }
  let indices = out.component_indices(component);

  let center = if component.has_feature() {
    component.feature_vertex
  } else {
    indices.iter().map(|&p| out.vertex(p).position).sum::<Vec3>() / size as f32
  };

  // Normals weighted by inverse distance to the fan centre.
  let weighted = |p: PackedIndex| {
    let v = out.vertex(p);
    v.normal / (v.position - center).length()
  };

  if component.regular_feature {
    find_sharp_sections(indices, out, sections);

    for i in 0..size {
      let p1 = indices[i];
      let p2 = indices[(i + 1) % size];
      let (v1, v2) = (out.vertex(p1), out.vertex(p2));
      if is_degenerate(v1.position, v2.position) {
        continue;
      }

      let mut face_average = Vec3::ZERO;
      if p1.is_normal_set() {
        face_average += weighted(p1);
      }
      if p2.is_normal_set() {
        face_average += weighted(p2);
      }
      let face_average = face_average.normalize_or_zero();

      let center_normal = sections
        .iter()
        .rev()
        .find(|s| i >= s.start && i < s.end)
        .map_or(face_average, |s| s.normal);

      writer.push(v1.position, if p1.is_normal_set() { v1.normal } else { center_normal }, v1.material);
      writer.push(center, center_normal, v1.material);
      writer.push(v2.position, if p2.is_normal_set() { v2.normal } else { center_normal }, v2.material);
    }
  } else {
    let full_average = indices
      .iter()
      .filter(|p| p.is_normal_set())
      .map(|&p| weighted(p))
      .sum::<Vec3>()
      .normalize_or_zero();

    for i in 0..size {
      let p1 = indices[i];
      let p2 = indices[(i + 1) % size];
      let (v1, v2) = (out.vertex(p1), out.vertex(p2));
      if is_degenerate(v1.position, v2.position) {
        continue;
      }

      let mut face_average = Vec3::ZERO;
      if p1.is_normal_set() {
        face_average += weighted(p1);
      }
      if p2.is_normal_set() {
        face_average += weighted(p2);
      }
      let face_average = face_average.normalize_or_zero();

      writer.push(v1.position, if p1.is_normal_set() { v1.normal } else { face_average }, v1.material);
      writer.push(center, full_average, v1.material);
      writer.push(v2.position, if p2.is_normal_set() { v2.normal } else { face_average }, v2.material);
    }
  }
}

/// Duplicated loop vertices (2D features, transitions) span no area.
#[inline]
fn is_degenerate(a: Vec3, b: Vec3) -> bool {
  (b - a).length_squared() < 1e-12
}

/// Split a loop at its 2D feature vertices. Each run between two feature
/// vertices gets the normalized sum of its vertex normals; a run that wraps
/// past the loop end is stored as two sections.
fn find_sharp_sections(indices: &[PackedIndex], out: &PolygonizerOutput, sections: &mut SmallVec<[SharpSection; 8]>) {
  sections.clear();
  let size = indices.len();
  let mut start: Option<usize> = None;
  let mut sum = Vec3::ZERO;

  // Two laps so the run spanning the loop seam is closed too.
  for i in 0..size * 2 {
    let j = i % size;
    let p = indices[j];
    if p.is_2d_sharp_feature() {
      if let Some(s) = start {
        let normal = sum.normalize_or_zero();
        if normal != Vec3::ZERO {
          if j < s {
            sections.push(SharpSection { start: s, end: size, normal });
            sections.push(SharpSection { start: 0, end: j, normal });
          } else {
            sections.push(SharpSection { start: s, end: j, normal });
          }
        }
      }
      if i >= size && start.is_some() {
        break;
      }
      start = Some(j);
      sum = Vec3::ZERO;
    } else if start.is_some() && p.is_normal_set() {
      sum += out.vertex(p).normal;
    }
  }
}

#[cfg(test)]
#[path = "tessellation_test.rs"]
mod tessellation_test;
