//! # Rendering Module
//!
//! GPU residency for chunk meshes.
//!
//! ## Key Components
//! - `MeshUploader`: The seam between streaming and the GPU. The streaming
//!   layer only ever hands over finished mesh buffers or asks for a chunk's
//!   GPU state to be dropped; everything `wgpu` lives behind this trait, so
//!   tests and headless runs use lightweight recording implementations.
//! - `TerrainRenderer`: The `wgpu` implementation, keyed by `ChunkKey`.
//!
//! Chunks themselves never hold GPU state. Render state lives in a map on
//! this side of the seam, which is what lets a chunk's voxels outlive its
//! mesh when it leaves draw range.

pub mod renderer;

pub use renderer::TerrainRenderer;

use crate::meshing::ChunkMeshData;
use crate::voxels::coords::ChunkKey;

/// Consumer of finished chunk meshes.
pub trait MeshUploader {
    /// Takes ownership of a chunk's freshly built mesh buffers. Replaces
    /// any previous mesh for the same chunk.
    fn upload(&mut self, mesh: ChunkMeshData);

    /// Drops all GPU state for the given chunk. Releasing a chunk that was
    /// never uploaded is a no-op.
    fn release(&mut self, key: ChunkKey);
}
