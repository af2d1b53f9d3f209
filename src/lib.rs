#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! The terrain subsystem of a voxel renderer: chunked voxel storage,
//! seeded procedural generation, per-face meshing, and position-driven
//! streaming with background workers, built on WGPU.
//!
//! ## Key Modules
//!
//! * `voxels` - Block types, chunks, the terrain chunk map, and generation
//! * `meshing` - Conversion of voxel data into opaque/translucent meshes
//! * `streaming` - The controller that keeps the world generated and
//!   resident around a moving camera
//! * `task_management` - The worker pool generation and meshing run on
//! * `rendering` - GPU residency for chunk meshes behind the
//!   `MeshUploader` seam
//! * `raycast` - Grid marching for interaction and collision
//!
//! ## Architecture
//!
//! Chunks are pure voxel data, keyed by a packed corner key and shared
//! behind read-write locks. Workers read chunks to generate and mesh;
//! only the main thread mutates the chunk map, by draining task results
//! each tick. GPU state lives entirely on the rendering side, keyed by
//! the same chunk keys, so voxel data outlives meshes.
//!
//! ## Usage
//!
//! ```no_run
//! use cgmath::Vector3;
//! use voxel_terrain::config::TerrainConfig;
//! use voxel_terrain::streaming::StreamingController;
//! use voxel_terrain::voxels::world::Terrain;
//! # struct NullUploader;
//! # impl voxel_terrain::rendering::MeshUploader for NullUploader {
//! #     fn upload(&mut self, _m: voxel_terrain::meshing::ChunkMeshData) {}
//! #     fn release(&mut self, _k: voxel_terrain::voxels::coords::ChunkKey) {}
//! # }
//!
//! let config = TerrainConfig::default();
//! let mut terrain = Terrain::new();
//! let mut controller = StreamingController::new(&config);
//! let mut uploader = NullUploader;
//!
//! let mut prev = Vector3::new(0.0, 140.0, 0.0);
//! loop {
//!     let pos = prev; // camera movement goes here
//!     controller.update(&mut terrain, &mut uploader, pos, prev);
//!     prev = pos;
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod meshing;
pub mod raycast;
pub mod rendering;
pub mod streaming;
pub mod task_management;
pub mod voxels;

pub use config::TerrainConfig;
pub use error::TerrainError;
pub use streaming::StreamingController;
pub use voxels::world::Terrain;
