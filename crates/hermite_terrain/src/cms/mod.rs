//! Cubical Marching Squares over hermite cells.
//!
//! [`polygonizer`] turns one cell into closed vertex loops ("components"),
//! each optionally carrying a 3D feature vertex. Triangulation happens later
//! in [`crate::tessellation`].

pub mod cell;
pub mod component;
pub mod face;
pub mod polygonizer;
pub mod properties;
pub mod solver2d;
pub mod tables;

pub use cell::{CellArrays, CellData, SliceCell, VoxelCell, CELL_SIZE};
pub use component::{ComponentVertex, MeshComponent, PackedIndex, PolygonizerOutput};
pub use face::CellFace;
pub use polygonizer::{CmsPolygonizer, PolygonizerScratch};
pub use properties::{CmsProperties, FeatureThresholds, SharpFeatureProperties2D, SharpFeatureProperties3D};
pub use solver2d::{Feature2D, FeatureType2D, IntersectionSolver2D, SharpFeatureSolver2D};
