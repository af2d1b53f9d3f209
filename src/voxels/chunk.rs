//! # Chunk Module
//!
//! This module defines the fundamental unit of terrain storage: a 16x256x16
//! column of voxels addressed by its packed corner key.
//!
//! ## Key Components
//! - `Chunk`: dense voxel storage plus by-value links to horizontal neighbors
//!
//! ## Design
//! Chunks hold voxel data only. GPU state for a chunk lives on the rendering
//! side, keyed by the same `ChunkKey`, so a chunk can outlive its mesh (voxels
//! are retained when a chunk leaves draw range) and worker threads can read
//! chunks without touching graphics resources.

use crate::error::TerrainError;
use crate::voxels::block::{BlockType, Direction};
use crate::voxels::coords::{
    linear_index, ChunkKey, CHUNK_DIM_X, CHUNK_DIM_Y, CHUNK_DIM_Z, CHUNK_VOLUME,
};

/// A 16x256x16 column of voxels.
///
/// Neighbor links are stored as `Option<ChunkKey>` rather than references, so
/// chunks can live in a flat map without self-referential lifetimes. Only the
/// four horizontal slots are ever populated; the world is one chunk tall.
pub struct Chunk {
    key: ChunkKey,
    blocks: Vec<BlockType>,
    neighbors: [Option<ChunkKey>; 6],
}

impl Chunk {
    /// Creates an all-`Empty` chunk at the given corner key.
    ///
    /// # Arguments
    /// * `key` - The packed world corner of this chunk
    ///
    /// # Returns
    /// A new chunk with every cell set to `BlockType::Empty` and no
    /// neighbor links.
    pub fn new(key: ChunkKey) -> Self {
        Self {
            key,
            blocks: vec![BlockType::Empty; CHUNK_VOLUME],
            neighbors: [None; 6],
        }
    }

    /// Returns this chunk's packed corner key.
    pub fn key(&self) -> ChunkKey {
        self.key
    }

    /// Reads a cell by chunk-local coordinates.
    ///
    /// This is the hot-path accessor used by generation and meshing, which
    /// only ever produce in-bounds coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the chunk.
    pub(crate) fn block_local(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.blocks[linear_index(x, y, z)]
    }

    /// Writes a cell by chunk-local coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the chunk.
    pub(crate) fn set_block_local(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) {
        self.blocks[linear_index(x, y, z)] = block_type;
    }

    /// Reads a cell by chunk-local coordinates, validating bounds.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Chunk-local coordinates
    ///
    /// # Returns
    /// The block type at the cell, or `TerrainError::OutOfBounds` if any
    /// coordinate falls outside `[0,16) x [0,256) x [0,16)`.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Result<BlockType, TerrainError> {
        if !Self::in_bounds(x, y, z) {
            return Err(TerrainError::OutOfBounds { x, y, z });
        }
        Ok(self.block_local(x, y, z))
    }

    /// Writes a cell by chunk-local coordinates, validating bounds.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Chunk-local coordinates
    /// * `block_type` - The value to store
    ///
    /// # Returns
    /// `Ok(())`, or `TerrainError::OutOfBounds` if any coordinate falls
    /// outside the chunk.
    pub fn set_block_at(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        block_type: BlockType,
    ) -> Result<(), TerrainError> {
        if !Self::in_bounds(x, y, z) {
            return Err(TerrainError::OutOfBounds { x, y, z });
        }
        self.set_block_local(x, y, z, block_type);
        Ok(())
    }

    /// Returns the key of the neighboring chunk in the given direction, if
    /// one has been linked.
    pub fn neighbor(&self, direction: Direction) -> Option<ChunkKey> {
        self.neighbors[direction as usize]
    }

    /// Links this chunk to a neighbor. Linking is one-directional; the world
    /// links both sides when it instantiates a chunk.
    pub fn set_neighbor(&mut self, direction: Direction, key: ChunkKey) {
        self.neighbors[direction as usize] = Some(key);
    }

    fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_DIM_X).contains(&x)
            && (0..CHUNK_DIM_Y).contains(&y)
            && (0..CHUNK_DIM_Z).contains(&z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chunk_is_all_empty() {
        let chunk = Chunk::new(ChunkKey::from_corner(0, 0));
        assert_eq!(chunk.block_at(0, 0, 0).unwrap(), BlockType::Empty);
        assert_eq!(chunk.block_at(15, 255, 15).unwrap(), BlockType::Empty);
    }

    #[test]
    fn writes_are_isolated_per_cell() {
        let mut chunk = Chunk::new(ChunkKey::from_corner(16, -32));
        chunk.set_block_at(3, 100, 7, BlockType::Stone).unwrap();
        assert_eq!(chunk.block_at(3, 100, 7).unwrap(), BlockType::Stone);
        // Cells one step away on each axis stay untouched.
        assert_eq!(chunk.block_at(2, 100, 7).unwrap(), BlockType::Empty);
        assert_eq!(chunk.block_at(4, 100, 7).unwrap(), BlockType::Empty);
        assert_eq!(chunk.block_at(3, 99, 7).unwrap(), BlockType::Empty);
        assert_eq!(chunk.block_at(3, 101, 7).unwrap(), BlockType::Empty);
        assert_eq!(chunk.block_at(3, 100, 6).unwrap(), BlockType::Empty);
        assert_eq!(chunk.block_at(3, 100, 8).unwrap(), BlockType::Empty);
    }

    #[test]
    fn out_of_bounds_access_is_an_error() {
        let chunk = Chunk::new(ChunkKey::from_corner(0, 0));
        assert_eq!(
            chunk.block_at(16, 0, 0),
            Err(TerrainError::OutOfBounds { x: 16, y: 0, z: 0 })
        );
        assert_eq!(
            chunk.block_at(0, -1, 0),
            Err(TerrainError::OutOfBounds { x: 0, y: -1, z: 0 })
        );
        assert_eq!(
            chunk.block_at(0, 256, 0),
            Err(TerrainError::OutOfBounds { x: 0, y: 256, z: 0 })
        );
    }

    #[test]
    fn neighbor_links_default_to_none() {
        let mut chunk = Chunk::new(ChunkKey::from_corner(0, 0));
        for direction in Direction::all() {
            assert_eq!(chunk.neighbor(direction), None);
        }
        let east = ChunkKey::from_corner(16, 0);
        chunk.set_neighbor(Direction::XPOS, east);
        assert_eq!(chunk.neighbor(Direction::XPOS), Some(east));
        assert_eq!(chunk.neighbor(Direction::XNEG), None);
    }
}
