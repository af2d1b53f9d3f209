//! # Meshing Module
//!
//! This module converts chunk voxel data into triangle meshes.
//!
//! ## Key Components
//! - `Vertex`: The 48-byte vertex format shared with the rendering pipeline
//! - `ChunkMeshData`: CPU-side mesh buffers for one chunk, split into an
//!   opaque and a translucent pass
//! - `mesh_chunk`: The per-face mesher
//!
//! ## Face Culling
//! A face is emitted only where it can be seen:
//! - An opaque block's face is emitted when the neighboring cell is
//!   transparent (empty or water)
//! - A transparent block's face is emitted only when the neighboring cell is
//!   empty, so bodies of water have a surface but no interior walls
//!
//! Neighbor lookups cross chunk borders through the chunk's neighbor links;
//! an unlinked border counts as empty, so the wall of the generated world is
//! rendered rather than left open. Those border faces disappear when the
//! neighboring chunk arrives and the chunk is remeshed.

use std::sync::RwLockReadGuard;

use crate::core::MtResource;
use crate::voxels::block::BlockType;
use crate::voxels::chunk::Chunk;
use crate::voxels::coords::{ChunkKey, CHUNK_DIM_X, CHUNK_DIM_Y, CHUNK_DIM_Z};

pub mod chunk_mesh_task;
pub mod face;
pub mod vertex;

pub use chunk_mesh_task::ChunkMeshTask;
pub use vertex::Vertex;

use face::{BlockFace, BLOCK_FACES, UV_CELL};

/// CPU-side mesh buffers for one chunk.
///
/// Positions are in world space. Opaque and translucent geometry are kept in
/// separate buffers because they draw in different passes with different
/// blend state.
pub struct ChunkMeshData {
    /// The chunk these buffers were built from.
    pub key: ChunkKey,
    /// Vertices of the opaque pass
    pub opaque_vertices: Vec<Vertex>,
    /// Triangle indices into `opaque_vertices`
    pub opaque_indices: Vec<u32>,
    /// Vertices of the translucent pass
    pub transparent_vertices: Vec<Vertex>,
    /// Triangle indices into `transparent_vertices`
    pub transparent_indices: Vec<u32>,
}

impl ChunkMeshData {
    fn new(key: ChunkKey) -> Self {
        Self {
            key,
            opaque_vertices: Vec::new(),
            opaque_indices: Vec::new(),
            transparent_vertices: Vec::new(),
            transparent_indices: Vec::new(),
        }
    }

    /// Returns `true` if neither pass has any geometry.
    pub fn is_empty(&self) -> bool {
        self.opaque_indices.is_empty() && self.transparent_indices.is_empty()
    }
}

/// Builds the mesh for one chunk.
///
/// Neighbor read locks are acquired once up front, so the per-cell loop
/// never touches a lock. Callers pass the chunk's linked neighbors in
/// direction order; vertical slots are always `None`.
///
/// # Arguments
/// * `chunk` - The chunk to mesh
/// * `neighbors` - The chunk's neighbors, indexed by `Direction`
///
/// # Returns
/// Freshly built mesh buffers for the chunk.
pub fn mesh_chunk(chunk: &Chunk, neighbors: &[Option<MtResource<Chunk>>; 6]) -> ChunkMeshData {
    let guards: [Option<RwLockReadGuard<'_, Chunk>>; 6] =
        std::array::from_fn(|i| neighbors[i].as_ref().map(|n| n.get()));

    let mut mesh = ChunkMeshData::new(chunk.key());
    for x in 0..CHUNK_DIM_X {
        for y in 0..CHUNK_DIM_Y {
            for z in 0..CHUNK_DIM_Z {
                let current = chunk.block_local(x, y, z);
                if current.is_empty() {
                    continue;
                }
                for block_face in &BLOCK_FACES {
                    let adjacent = adjacent_block(chunk, &guards, x, y, z, block_face);
                    if current.is_transparent() {
                        if adjacent.is_empty() {
                            append_face(
                                &mut mesh.transparent_vertices,
                                &mut mesh.transparent_indices,
                                block_face,
                                current,
                                chunk,
                                x,
                                y,
                                z,
                            );
                        }
                    } else if adjacent.is_transparent() {
                        append_face(
                            &mut mesh.opaque_vertices,
                            &mut mesh.opaque_indices,
                            block_face,
                            current,
                            chunk,
                            x,
                            y,
                            z,
                        );
                    }
                }
            }
        }
    }
    mesh
}

/// Reads the cell one step from `(x, y, z)` in the face's direction,
/// following neighbor links across X/Z chunk borders.
///
/// Above and below the world there are no chunks; those cells read as
/// `Empty`, which gives the terrain a floor face at y = 0 and open sky.
fn adjacent_block(
    chunk: &Chunk,
    guards: &[Option<RwLockReadGuard<'_, Chunk>>; 6],
    x: i32,
    y: i32,
    z: i32,
    block_face: &BlockFace,
) -> BlockType {
    let offset = block_face.direction.offset();
    let (nx, ny, nz) = (x + offset.x, y + offset.y, z + offset.z);
    if !(0..CHUNK_DIM_Y).contains(&ny) {
        return BlockType::Empty;
    }
    if (0..CHUNK_DIM_X).contains(&nx) && (0..CHUNK_DIM_Z).contains(&nz) {
        return chunk.block_local(nx, ny, nz);
    }
    match &guards[block_face.direction as usize] {
        Some(neighbor) => {
            neighbor.block_local(nx.rem_euclid(CHUNK_DIM_X), ny, nz.rem_euclid(CHUNK_DIM_Z))
        }
        None => BlockType::Empty,
    }
}

/// Appends one quad to the given buffers. Each buffer keeps its own running
/// vertex base for the shared-corner index pattern (0,1,2)(0,2,3).
fn append_face(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    block_face: &BlockFace,
    block_type: BlockType,
    chunk: &Chunk,
    x: i32,
    y: i32,
    z: i32,
) {
    let base = vertices.len() as u32;
    let world_x = (chunk.key().x() + x) as f32;
    let world_y = y as f32;
    let world_z = (chunk.key().z() + z) as f32;
    let normal = block_face.direction.normal();
    let atlas = block_type.atlas_offset(block_face.direction);
    let cosine_power = block_type.cosine_power();
    let animation_flag = block_type.animation_flag();

    for corner in &block_face.corners {
        vertices.push(Vertex::new(
            [
                world_x + corner.offset[0],
                world_y + corner.offset[1],
                world_z + corner.offset[2],
            ],
            [normal.x, normal.y, normal.z],
            [
                atlas[0] * UV_CELL + corner.uv[0],
                atlas[1] * UV_CELL + corner.uv[1],
            ],
            cosine_power,
            animation_flag,
        ));
    }
    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}
