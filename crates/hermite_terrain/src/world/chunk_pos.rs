use glam::{IVec3, Vec3};

/// Integer chunk coordinate. Chunk `c` covers voxels `c * size .. (c + 1) * size`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
  pub x: i32,
  pub y: i32,
  pub z: i32,
}

impl ChunkPos {
  pub const ZERO: Self = Self::new(0, 0, 0);

  #[inline]
  pub const fn new(x: i32, y: i32, z: i32) -> Self {
    Self { x, y, z }
  }

  #[inline]
  pub fn from_ivec3(v: IVec3) -> Self {
    Self::new(v.x, v.y, v.z)
  }

  #[inline]
  pub fn as_ivec3(self) -> IVec3 {
    IVec3::new(self.x, self.y, self.z)
  }

  /// Chunk containing the voxel `p`, flooring for negative coordinates.
  #[inline]
  pub fn from_voxel(p: IVec3, chunk_size: usize) -> Self {
    let cs = chunk_size as i32;
    Self::new(p.x.div_euclid(cs), p.y.div_euclid(cs), p.z.div_euclid(cs))
  }

  /// Chunk containing the local-space point `p`.
  #[inline]
  pub fn from_point(p: Vec3, chunk_size: usize) -> Self {
    Self::from_ivec3((p / chunk_size as f32).floor().as_ivec3())
  }

  /// First voxel of this chunk.
  #[inline]
  pub fn min_voxel(self, chunk_size: usize) -> IVec3 {
    self.as_ivec3() * chunk_size as i32
  }

  #[inline]
  pub fn offset(self, d: IVec3) -> Self {
    Self::from_ivec3(self.as_ivec3() + d)
  }

  /// Every position of the inclusive box `min..=max`, x fastest.
  pub fn range(min: ChunkPos, max: ChunkPos) -> impl Iterator<Item = ChunkPos> {
    (min.z..=max.z)
      .flat_map(move |z| (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| ChunkPos::new(x, y, z))))
  }
}

impl From<IVec3> for ChunkPos {
  fn from(v: IVec3) -> Self {
    Self::from_ivec3(v)
  }
}
