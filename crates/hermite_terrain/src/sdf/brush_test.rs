use super::*;

fn at(x: f32) -> Affine3A {
  Affine3A::from_translation(Vec3::new(x, 0.0, 0.0))
}

#[test]
fn test_single_primitive_is_used_directly() {
  let brush = CustomBrush::new().with_primitive(BrushPrimitive::new(BrushType::Sphere, BrushOperation::Difference, 2.0, at(3.0)));
  assert!((brush.eval(Vec3::new(3.0, 0.0, 0.0)) + 5.0).abs() < 1e-5);
}

#[test]
fn test_hard_union_is_min() {
  let brush = CustomBrush::new()
    .with_primitive(BrushPrimitive::new(BrushType::Sphere, BrushOperation::Union, 0.0, at(-10.0)))
    .with_primitive(BrushPrimitive::new(BrushType::Sphere, BrushOperation::Union, 0.0, at(10.0)));
  assert!((brush.eval(Vec3::new(10.0, 0.0, 0.0)) + 5.0).abs() < 1e-5);
  assert!((brush.eval(Vec3::new(-10.0, 0.0, 0.0)) + 5.0).abs() < 1e-5);
  assert!((brush.eval(Vec3::ZERO) - 5.0).abs() < 1e-5);
}

#[test]
fn test_smooth_union_bulges_between_primitives() {
  let hard = CustomBrush::new()
    .with_primitive(BrushPrimitive::new(BrushType::Sphere, BrushOperation::Union, 0.0, at(-6.0)))
    .with_primitive(BrushPrimitive::new(BrushType::Sphere, BrushOperation::Union, 0.0, at(6.0)));
  let soft = CustomBrush::new()
    .with_primitive(BrushPrimitive::new(BrushType::Sphere, BrushOperation::Union, 0.0, at(-6.0)))
    .with_primitive(BrushPrimitive::new(BrushType::Sphere, BrushOperation::Union, 4.0, at(6.0)));
  let p = Vec3::ZERO;
  // Both spheres are 1 away, so the blend subtracts blend / 4.
  assert!((hard.eval(p) - 1.0).abs() < 1e-5);
  assert!((soft.eval(p) - 0.0).abs() < 1e-5);
}

#[test]
fn test_difference_carves_hole() {
  let brush = CustomBrush::new()
    .with_primitive(BrushPrimitive::new(BrushType::Box, BrushOperation::Union, 0.0, Affine3A::IDENTITY))
    .with_primitive(BrushPrimitive::new(
      BrushType::Sphere,
      BrushOperation::Difference,
      0.0,
      Affine3A::from_scale(Vec3::splat(0.5)),
    ));
  assert!(brush.eval(Vec3::ZERO) > 0.0);
  assert!(brush.eval(Vec3::new(4.0, 4.0, 4.0)) < 0.0);
}

#[test]
fn test_bounds_cover_primitives_and_blend() {
  let brush = CustomBrush::new()
    .with_primitive(BrushPrimitive::new(BrushType::Box, BrushOperation::Union, 0.0, at(-10.0)))
    .with_primitive(BrushPrimitive::new(BrushType::Sphere, BrushOperation::Union, 1.5, at(10.0)));
  let b = brush.bounds();
  assert_eq!(b.min, Vec3::new(-16.5, -6.5, -6.5));
  assert_eq!(b.max, Vec3::new(16.5, 6.5, 6.5));
}

#[test]
fn test_empty_brush() {
  let brush = CustomBrush::new();
  assert_eq!(brush.bounds(), MinMaxAABB::new(Vec3::ZERO, Vec3::ZERO));
  assert!(brush.eval(Vec3::ZERO) > 0.0);
  assert!(brush.render_parts().is_empty());
}

#[test]
fn test_render_parts_follow_primitives() {
  let mut brush = CustomBrush::new();
  brush.push(BrushPrimitive::new(BrushType::Sphere, BrushOperation::Union, 0.0, at(2.0)));
  brush.push(BrushPrimitive::new(BrushType::Box, BrushOperation::Difference, 0.0, at(-2.0)));
  let parts = brush.render_parts();
  assert_eq!(parts.len(), 2);
  assert_eq!(parts[0].1.shape(), crate::sdf::SdfShape::Sphere);
  assert_eq!(parts[1].0.transform_point3(Vec3::ZERO), Vec3::new(-2.0, 0.0, 0.0));
}
