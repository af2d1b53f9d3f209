//! # Terrain World Module
//!
//! This module defines `Terrain`, the owner of all instantiated chunks.
//!
//! ## Ownership Model
//! Chunks live in a flat map keyed by their packed corner key and are held
//! behind `MtResource`, so worker threads can read and fill voxel data while
//! the main thread stays the sole mutator of the map itself. Structural
//! changes (instantiating a chunk, marking a zone as requested) take `&mut
//! self` and therefore only happen on the main thread; voxel edits go
//! through each chunk's own lock and only need `&self`.
//!
//! Chunks are instantiated all-`Empty` *before* generation runs: a chunk
//! exists, is linked to its neighbors, and reads as empty air from the
//! moment its zone is requested, and a background worker fills it in place
//! through its write lock.
//!
//! Voxel data is never discarded: chunks that drift out of draw range lose
//! their GPU meshes but keep their blocks, so player edits survive
//! round-trips out of and back into view.

use std::collections::{HashMap, HashSet};

use cgmath::Vector3;
use log::debug;

use crate::core::MtResource;
use crate::error::TerrainError;
use crate::meshing::{mesh_chunk, ChunkMeshData};
use crate::voxels::block::{BlockType, Direction};
use crate::voxels::chunk::Chunk;
use crate::voxels::coords::{world_to_local, ChunkKey, CHUNK_DIM_X, CHUNK_DIM_Y, CHUNK_DIM_Z};

/// The collection of all instantiated chunks, keyed by packed corner.
pub struct Terrain {
    chunks: HashMap<ChunkKey, MtResource<Chunk>>,
    generated_zones: HashSet<ChunkKey>,
}

impl Default for Terrain {
    fn default() -> Self {
        Self::new()
    }
}

impl Terrain {
    /// Creates an empty terrain with no chunks and no requested zones.
    pub fn new() -> Self {
        Self {
            chunks: HashMap::new(),
            generated_zones: HashSet::new(),
        }
    }

    /// Returns the number of instantiated chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` if a chunk covers the given world column.
    pub fn has_chunk_at(&self, x: i32, z: i32) -> bool {
        self.chunks.contains_key(&ChunkKey::chunk_at(x, z))
    }

    /// Returns a handle to the chunk with the given corner key, if it
    /// exists.
    pub fn chunk(&self, key: ChunkKey) -> Option<MtResource<Chunk>> {
        self.chunks.get(&key).cloned()
    }

    /// Returns `true` if generation for the given zone has been requested
    /// or completed.
    ///
    /// Zones are marked at request time, not completion time, so a zone in
    /// flight is never requested twice.
    pub fn zone_generated(&self, zone: ChunkKey) -> bool {
        self.generated_zones.contains(&zone)
    }

    /// Marks a zone as requested. Called by the streaming layer when it
    /// publishes the zone's generation task.
    pub fn mark_zone_generated(&mut self, zone: ChunkKey) {
        self.generated_zones.insert(zone);
    }

    /// Instantiates the chunk covering the given world column, or returns
    /// the existing one.
    ///
    /// A freshly instantiated chunk is all-`Empty` but fully part of the
    /// world: it is linked both ways with any existing horizontal neighbor
    /// (including chunks of previously instantiated zones, so border faces
    /// between zones can be culled once both sides exist) and reads as
    /// empty air until a generation worker fills it through its lock.
    ///
    /// # Arguments
    /// * `x`, `z` - Any world column the chunk should cover
    ///
    /// # Returns
    /// A handle to the chunk.
    pub fn instantiate_chunk_at(&mut self, x: i32, z: i32) -> MtResource<Chunk> {
        let key = ChunkKey::chunk_at(x, z);
        if let Some(existing) = self.chunks.get(&key) {
            return existing.clone();
        }
        let resource = MtResource::new(Chunk::new(key));
        self.chunks.insert(key, resource.clone());
        for direction in Direction::horizontal() {
            let offset = direction.offset();
            let neighbor_key = ChunkKey::from_corner(
                key.x() + offset.x * CHUNK_DIM_X,
                key.z() + offset.z * CHUNK_DIM_Z,
            );
            if let Some(neighbor) = self.chunks.get(&neighbor_key) {
                resource.get_mut().set_neighbor(direction, neighbor_key);
                neighbor.get_mut().set_neighbor(direction.opposite(), key);
            }
        }
        resource
    }

    /// Reads the block at a world position.
    ///
    /// # Arguments
    /// * `pos` - The world-space position to read
    ///
    /// # Returns
    /// The block type, `BlockType::Empty` for positions above or below the
    /// world, or `TerrainError::MissingChunk` if no chunk covers the column.
    pub fn block_at_world(&self, pos: Vector3<i32>) -> Result<BlockType, TerrainError> {
        if !(0..CHUNK_DIM_Y).contains(&pos.y) {
            return Ok(BlockType::Empty);
        }
        let chunk = self
            .chunks
            .get(&ChunkKey::chunk_at(pos.x, pos.z))
            .ok_or(TerrainError::MissingChunk { x: pos.x, z: pos.z })?;
        let local = world_to_local(pos);
        chunk.get().block_at(local.x, local.y, local.z)
    }

    /// Writes the block at a world position.
    ///
    /// Writes above or below the world are silently ignored; world height is
    /// physically bounded and this is not a caller error.
    ///
    /// # Arguments
    /// * `pos` - The world-space position to write
    /// * `block_type` - The value to store
    ///
    /// # Returns
    /// `Ok(())`, or `TerrainError::MissingChunk` if no chunk covers the
    /// column.
    pub fn set_block_at_world(
        &self,
        pos: Vector3<i32>,
        block_type: BlockType,
    ) -> Result<(), TerrainError> {
        if !(0..CHUNK_DIM_Y).contains(&pos.y) {
            debug!("ignoring block write outside world height at {:?}", pos);
            return Ok(());
        }
        let chunk = self
            .chunks
            .get(&ChunkKey::chunk_at(pos.x, pos.z))
            .ok_or(TerrainError::MissingChunk { x: pos.x, z: pos.z })?;
        let local = world_to_local(pos);
        chunk.get_mut().set_block_at(local.x, local.y, local.z, block_type)
    }

    /// Applies a block edit and synchronously remeshes every affected chunk.
    ///
    /// The owning chunk is always remeshed. When the edit touches a chunk
    /// border, the neighbor on the far side of that border is remeshed too
    /// (each axis checks its own coordinate), so a removed border block
    /// exposes the neighbor's face immediately instead of leaving a hole.
    ///
    /// Remeshing happens inline rather than through the worker pool: a
    /// player edit affects at most three chunks and the result must be
    /// visible the same frame.
    ///
    /// # Arguments
    /// * `pos` - The world-space position to edit
    /// * `block_type` - The value to store
    ///
    /// # Returns
    /// Fresh mesh data for every remeshed chunk, or an error if the edit
    /// itself failed. Edits outside world height return an empty vector.
    pub fn change_block_at(
        &self,
        pos: Vector3<i32>,
        block_type: BlockType,
    ) -> Result<Vec<ChunkMeshData>, TerrainError> {
        if !(0..CHUNK_DIM_Y).contains(&pos.y) {
            return Ok(Vec::new());
        }
        self.set_block_at_world(pos, block_type)?;

        let owner_key = ChunkKey::chunk_at(pos.x, pos.z);
        let local = world_to_local(pos);
        let mut dirty = vec![owner_key];
        if local.x == 0 {
            dirty.push(owner_key.offset(-1, 0, CHUNK_DIM_X));
        } else if local.x == CHUNK_DIM_X - 1 {
            dirty.push(owner_key.offset(1, 0, CHUNK_DIM_X));
        }
        if local.z == 0 {
            dirty.push(owner_key.offset(0, -1, CHUNK_DIM_Z));
        } else if local.z == CHUNK_DIM_Z - 1 {
            dirty.push(owner_key.offset(0, 1, CHUNK_DIM_Z));
        }

        let mut meshes = Vec::new();
        for key in dirty {
            if let Some(mesh) = self.remesh_chunk(key) {
                meshes.push(mesh);
            }
        }
        Ok(meshes)
    }

    /// Builds fresh mesh data for the chunk with the given key, if it
    /// exists.
    pub fn remesh_chunk(&self, key: ChunkKey) -> Option<ChunkMeshData> {
        let chunk = self.chunks.get(&key)?;
        let guard = chunk.get();
        let neighbors = self.neighbors_for(&guard);
        Some(mesh_chunk(&guard, &neighbors))
    }

    /// Resolves a chunk's neighbor links into handles, ready to pass to the
    /// mesher. Vertical slots are always `None`.
    pub fn neighbors_for(&self, chunk: &Chunk) -> [Option<MtResource<Chunk>>; 6] {
        std::array::from_fn(|i| {
            let direction = Direction::all()[i];
            chunk
                .neighbor(direction)
                .and_then(|key| self.chunks.get(&key).cloned())
        })
    }
}
