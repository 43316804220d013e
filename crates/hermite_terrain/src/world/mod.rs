//! Sparse chunked world of hermite voxels.
//!
//! ```text
//!   World
//!   ├── chunks: ChunkPos → Chunk   (created on first write)
//!   │     └── (size + 1)³ voxels, mesh, needs_rebuild
//!   ├── polygonizer                (rebuilds dirty chunk meshes)
//!   └── transform                  (local voxel space → global space)
//! ```

mod chunk;
mod chunk_pos;
mod config;
pub mod padding;
mod voxel_world;

pub use chunk::Chunk;
pub use chunk_pos::ChunkPos;
pub use config::WorldConfig;
pub use padding::{padding_targets, update_padding};
pub use voxel_world::{ApplyGridOptions, RayHit, World, WorldId, RAYCAST_STEP};
