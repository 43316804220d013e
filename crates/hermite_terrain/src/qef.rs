//! Quadratic error function solver for 3D sharp features.
//!
//! Minimizes `Σ (nᵢ · (x - pᵢ))²` over the hermite samples of a component.
//! The normal equations `AᵀA x = Aᵀb` are diagonalized with Jacobi sweeps;
//! singular values below 1% of the largest are dropped so nearly parallel
//! planes cannot push the solution to infinity.
//!
//! Port of Nick Gildea's public domain `qef` solver.

use glam::{Vec3, Vec4};

use crate::cms::cell::CELL_SIZE;

const SVD_NUM_SWEEPS: usize = 5;
const PSEUDO_INVERSE_THRESHOLD: f32 = 0.01;
/// Slack around the cell when clamping.
const CLAMP_MARGIN: f32 = 0.1;

/// Symmetric 3x3 matrix; only entries with `row <= col` are meaningful.
type Mat3Sym = [[f32; 3]; 3];

/// Reconstructs a feature point from (point, normal) samples.
pub trait SharpFeatureSolver {
  /// `is_edge` requests a feature on a line (one degree of freedom left
  /// free) rather than a corner. `mean` centres the system.
  fn solve(&self, cell_position: Vec3, points: &[Vec3], normals: &[Vec3], is_edge: bool, mean: Vec3) -> Vec3;
}

/// SVD based QEF solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct SvdQefSolver {
  /// Fall back to the mean when the feature leaves the cell.
  pub clamp: bool,
}

impl SvdQefSolver {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_clamp(mut self, clamp: bool) -> Self {
    self.clamp = clamp;
    self
  }
}

impl SharpFeatureSolver for SvdQefSolver {
  fn solve(&self, cell_position: Vec3, points: &[Vec3], normals: &[Vec3], is_edge: bool, mean: Vec3) -> Vec3 {
    debug_assert_eq!(points.len(), normals.len());
    if points.is_empty() {
      return mean;
    }

    let mut qef = QefData::default();
    for (&p, &n) in points.iter().zip(normals) {
      qef.add(n, p - mean);
    }
    let (x, _error) = qef.solve(is_edge);
    let feature = x + mean;

    if !self.clamp {
      return feature;
    }

    let lo = cell_position - Vec3::splat(CLAMP_MARGIN);
    let hi = cell_position + Vec3::splat(CELL_SIZE + CLAMP_MARGIN);
    if feature.cmpge(lo).all() && feature.cmplt(hi).all() {
      feature
    } else {
      mean
    }
  }
}

/// Accumulated normal equations.
#[derive(Clone, Copy, Debug, Default)]
pub struct QefData {
  ata: Mat3Sym,
  atb: Vec3,
  point_accum: Vec4,
}

impl QefData {
  /// Add the plane through `p` with normal `n`.
  pub fn add(&mut self, n: Vec3, p: Vec3) {
    self.ata[0][0] += n.x * n.x;
    self.ata[0][1] += n.x * n.y;
    self.ata[0][2] += n.x * n.z;
    self.ata[1][1] += n.y * n.y;
    self.ata[1][2] += n.y * n.z;
    self.ata[2][2] += n.z * n.z;

    let b = p.dot(n);
    self.atb += n * b;
    self.point_accum += p.extend(1.0);
  }

  /// Solve for the minimizer; returns it with the residual error.
  pub fn solve(&self, zero_smallest_sv: bool) -> (Vec3, f32) {
    let mass_point = self.point_accum.truncate() / self.point_accum.w;
    let atb = self.atb - vmul_sym(&self.ata, mass_point);
    let x = solve_ata_atb(&self.ata, atb, zero_smallest_sv);
    let error = {
      let r = atb - vmul_sym(&self.ata, x);
      r.dot(r)
    };
    (x + mass_point, error)
  }
}

fn givens_coeffs_sym(a_pp: f32, a_pq: f32, a_qq: f32) -> (f32, f32) {
  if a_pq == 0.0 {
    return (1.0, 0.0);
  }
  let tau = (a_qq - a_pp) / (2.0 * a_pq);
  let stt = (1.0 + tau * tau).sqrt();
  let tan = 1.0 / if tau >= 0.0 { tau + stt } else { tau - stt };
  let c = 1.0 / (1.0 + tan * tan).sqrt();
  (c, tan * c)
}

#[inline]
fn rotate_xy(x: f32, y: f32, c: f32, s: f32) -> (f32, f32) {
  (c * x - s * y, s * x + c * y)
}

#[inline]
fn rotateq_xy(x: f32, y: f32, a: f32, c: f32, s: f32) -> (f32, f32) {
  let cc = c * c;
  let ss = s * s;
  let mx = 2.0 * c * s * a;
  (cc * x - mx + ss * y, ss * x + mx + cc * y)
}

fn rotate(vtav: &mut Mat3Sym, v: &mut [[f32; 3]; 3], a: usize, b: usize) {
  if vtav[a][b] == 0.0 {
    return;
  }
  let (c, s) = givens_coeffs_sym(vtav[a][a], vtav[a][b], vtav[b][b]);
  let (aa, bb) = rotateq_xy(vtav[a][a], vtav[b][b], vtav[a][b], c, s);
  vtav[a][a] = aa;
  vtav[b][b] = bb;
  let (x, y) = rotate_xy(vtav[0][3 - b], vtav[1 - a][2], c, s);
  vtav[0][3 - b] = x;
  vtav[1 - a][2] = y;
  vtav[a][b] = 0.0;

  for row in v.iter_mut() {
    let (x, y) = rotate_xy(row[a], row[b], c, s);
    row[a] = x;
    row[b] = y;
  }
}

/// Jacobi eigen decomposition; returns the eigenvalues and rotation.
fn solve_sym(a: &Mat3Sym) -> (Vec3, [[f32; 3]; 3]) {
  let mut vtav = *a;
  let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
  for _ in 0..SVD_NUM_SWEEPS {
    rotate(&mut vtav, &mut v, 0, 1);
    rotate(&mut vtav, &mut v, 0, 2);
    rotate(&mut vtav, &mut v, 1, 2);
  }
  (Vec3::new(vtav[0][0], vtav[1][1], vtav[2][2]), v)
}

#[inline]
fn invdet(x: f32, tol: f32) -> f32 {
  if x.abs() < tol || (1.0 / x).abs() < tol {
    0.0
  } else {
    1.0 / x
  }
}

fn pseudo_inverse(mut sigma: Vec3, v: &[[f32; 3]; 3], zero_smallest_sv: bool) -> [[f32; 3]; 3] {
  if zero_smallest_sv {
    let mut smallest = 0;
    for i in 1..3 {
      if sigma[i] < sigma[smallest] {
        smallest = i;
      }
    }
    sigma[smallest] = 0.0;
  }

  let tol = PSEUDO_INVERSE_THRESHOLD * sigma.abs().max_element();
  let d = [invdet(sigma.x, tol), invdet(sigma.y, tol), invdet(sigma.z, tol)];

  let mut out = [[0.0; 3]; 3];
  for (i, row) in out.iter_mut().enumerate() {
    for (j, value) in row.iter_mut().enumerate() {
      *value = (0..3).map(|k| v[i][k] * d[k] * v[j][k]).sum();
    }
  }
  out
}

fn solve_ata_atb(ata: &Mat3Sym, atb: Vec3, zero_smallest_sv: bool) -> Vec3 {
  let (sigma, v) = solve_sym(ata);
  let vinv = pseudo_inverse(sigma, &v, zero_smallest_sv);
  Vec3::new(
    Vec3::from(vinv[0]).dot(atb),
    Vec3::from(vinv[1]).dot(atb),
    Vec3::from(vinv[2]).dot(atb),
  )
}

fn vmul_sym(a: &Mat3Sym, v: Vec3) -> Vec3 {
  Vec3::new(
    a[0][0] * v.x + a[0][1] * v.y + a[0][2] * v.z,
    a[0][1] * v.x + a[1][1] * v.y + a[1][2] * v.z,
    a[0][2] * v.x + a[1][2] * v.y + a[2][2] * v.z,
  )
}

#[cfg(test)]
#[path = "qef_test.rs"]
mod qef_test;
