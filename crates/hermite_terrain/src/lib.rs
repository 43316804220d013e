//! hermite_terrain - editable hermite-voxel terrain with sharp-feature meshing
//!
//! Every grid point stores a material and, for its three positive edges, the
//! surface crossing and normal. Meshes come from a Cubical Marching Squares
//! polygonizer that rebuilds sharp edges and corners from those normals.
//!
//! # Features
//!
//! - **CMS polygonizer**: case-table 2D segments per cell face, ambiguity
//!   resolution, 2D and 3D sharp features solved through an SVD QEF
//! - **SDF edits**: union, carve and replace with primitives or custom
//!   brushes, including conflict resolution on already crossed edges
//! - **Chunked world**: sparse chunk map with padding propagation, raycasts
//!   and parallel mesh rebuilds
//! - **Undo/redo**: bounded history of chunk snapshots
//! - **Mesh voxelizer**: binned ray casting, parity fill and hole patching
//!
//! # Data flow
//!
//! ```text
//!   Sdf / triangle mesh
//!          │
//!   sdf_edit | voxelizer ──► World chunks (HermiteVoxel grids)
//!                                   │
//!                            CmsPolygonizer ──► PolygonizerOutput
//!                                                      │
//!                                              tessellation ──► MeshOutput
//! ```
//!
//! # Example
//!
//! ```ignore
//! use glam::{Quat, Vec3};
//! use hermite_terrain::{SphereSdf, World, WorldConfig};
//!
//! let mut world = World::new(WorldConfig::default())?;
//! let mut history = world.new_edit_manager();
//!
//! world.apply_sdf(Vec3::splat(8.0), Quat::IDENTITY, &SphereSdf::new(5.0), 1, false, Some(&mut history));
//! world.update();
//!
//! for chunk in world.chunks() {
//!   if let Some(mesh) = chunk.mesh() {
//!     println!("{:?}: {} triangles", chunk.pos(), mesh.triangle_count());
//!   }
//! }
//!
//! history.undo(&mut world);
//! ```

pub mod types;
pub use types::{Axis, Color32, HermiteEdge, HermiteVoxel, MaterialId, MeshOutput, MinMaxAABB, AIR};

pub mod error;
pub use error::{VoxelError, VoxelResult};

// Storage
pub mod grid;
pub mod indexer;
pub use grid::{Grid, VoxelGrid};
pub use indexer::{Indexer, LinearIndexer, MortonIndexer};

// Meshing
pub mod cms;
pub mod color;
pub mod qef;
pub mod tessellation;
pub use cms::{CmsPolygonizer, CmsProperties, FeatureThresholds, PolygonizerOutput, VoxelCell};
pub use color::{MaterialColorMap, MaterialColors};
pub use qef::{SharpFeatureSolver, SvdQefSolver};
pub use tessellation::{tessellate, tessellate_with_colors, DedupCache};

// Editing
pub mod edit;
pub mod sdf;
pub mod sdf_edit;
pub use edit::{ChunkSnapshot, EditConsumer, VoxelEdit, VoxelEditManager};
pub use sdf::{BoxSdf, CustomBrush, CylinderSdf, PyramidSdf, Sdf, SphereSdf};

// World isolation and chunk rebuilds
pub mod task_queue;
pub mod world;
pub use task_queue::{RebuildCompletion, RebuildQueue};
pub use world::{Chunk, ChunkPos, World, WorldConfig, WorldId};

pub mod voxelizer;
pub use voxelizer::{voxelize, voxelize_async, VoxelizationJob, VoxelizationProperties, VoxelizationReport};

pub mod metrics;
