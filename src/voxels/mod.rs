//! # Voxels Module
//!
//! Voxel data model and terrain generation.
//!
//! ## Key Components
//! - `block`: Block types, surface properties, and face directions
//! - `coords`: Coordinate conventions and the packed `ChunkKey`
//! - `chunk`: The 16x256x16 storage unit
//! - `world`: The `Terrain` chunk map and block edit entry points
//! - `generation`: Seeded procedural generation
//! - `tasks`: Background tasks operating on voxel data

pub mod block;
pub mod chunk;
pub mod coords;
pub mod generation;
pub mod tasks;
pub mod world;
