use super::*;

const EPS: f32 = 1e-5;

#[test]
fn test_orthogonal_normals_give_corner() {
  // Solid square [0, 0.5]² in the m1 corner of the face.
  let feature = IntersectionSolver2D.solve(
    Vec2::new(0.5, 0.0),
    Vec2::X,
    Vec2::new(0.0, 0.5),
    Vec2::Y,
    1.0,
    1.0,
  );
  assert_eq!(feature.kind, FeatureType2D::Sharp);
  assert!((feature.point - Vec2::new(0.5, 0.5)).length() < EPS);
}

#[test]
fn test_out_of_bounds_feature() {
  let n2 = Vec2::new(-0.6, 0.8);
  let feature = IntersectionSolver2D.solve(Vec2::new(0.9, 0.0), Vec2::X, Vec2::new(0.0, 0.9), n2, 1.0, 1.0);
  assert_eq!(feature.kind, FeatureType2D::SharpOutOfBounds);
  assert!(feature.kind.is_sharp());
  assert!(!feature.kind.is_in_bounds());
  assert!((feature.point - Vec2::new(0.9, 1.575)).length() < 1e-4);
}

#[test]
fn test_parallel_normals_invalid_midpoint() {
  let feature = IntersectionSolver2D.solve(Vec2::new(0.2, 0.0), Vec2::Y, Vec2::new(0.8, 0.0), Vec2::Y, 1.0, 1.0);
  assert_eq!(feature.kind, FeatureType2D::Invalid);
  assert!(!feature.kind.is_valid());
  assert!(feature.kind.is_in_bounds());
  assert_eq!(feature.point, Vec2::new(0.5, 0.0));
}

#[test]
fn test_type_flags() {
  assert!(FeatureType2D::Sharp.is_sharp() && FeatureType2D::Sharp.is_in_bounds());
  assert!(!FeatureType2D::None.is_sharp());
  assert!(FeatureType2D::None.is_valid());
}

#[test]
fn test_line_intersection() {
  let p = find_line_intersection(Vec2::ZERO, Vec2::ONE, Vec2::Y, Vec2::X).unwrap();
  assert!((p - Vec2::splat(0.5)).length() < EPS);
  assert!(find_line_intersection(Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::new(1.0, 1.0)).is_none());
}

#[test]
fn test_segments_intersect() {
  assert!(segments_intersect(Vec2::ZERO, Vec2::ONE, Vec2::Y, Vec2::X));
  assert!(!segments_intersect(Vec2::ZERO, Vec2::splat(0.4), Vec2::Y, Vec2::new(0.4, 0.6)));
  // Parallel segments never count.
  assert!(!segments_intersect(Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::ONE));
}

#[test]
fn test_feature_triangle_overlap() {
  let solver = IntersectionSolver2D;
  let crossing = solver.check_feature_intersection(
    Vec2::new(0.0, 0.4),
    Vec2::new(0.8, 0.8),
    Vec2::new(0.4, 0.0),
    Vec2::new(1.0, 0.6),
    Vec2::new(0.2, 0.2),
    Vec2::new(0.6, 1.0),
  );
  assert!(crossing);

  let apart = solver.check_feature_intersection(
    Vec2::new(0.0, 0.3),
    Vec2::new(0.3, 0.3),
    Vec2::new(0.3, 0.0),
    Vec2::new(1.0, 0.7),
    Vec2::new(0.7, 0.7),
    Vec2::new(0.7, 1.0),
  );
  assert!(!apart);
}
