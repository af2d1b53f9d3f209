//! # Core Module
//!
//! This module provides the shared concurrency primitive used throughout the
//! terrain subsystem.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//!
//! ## Usage
//! ```rust
//! use voxel_terrain::core::MtResource;
//! use voxel_terrain::voxels::block::BlockType;
//! use voxel_terrain::voxels::chunk::Chunk;
//! use voxel_terrain::voxels::coords::ChunkKey;
//!
//! let chunk = MtResource::new(Chunk::new(ChunkKey::from_corner(0, 0)));
//! chunk.get_mut().set_block_at(3, 64, 3, BlockType::Stone).unwrap();
//! assert_eq!(chunk.get().block_at(3, 64, 3).unwrap(), BlockType::Stone);
//! ```

pub mod mt_resource;

// Re-export types for easier access
pub use mt_resource::MtResource;
