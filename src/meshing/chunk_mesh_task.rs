//! # Chunk Mesh Task
//!
//! Background task that builds the mesh buffers for one chunk.
//!
//! The task captures handles to the chunk and its linked neighbors when it
//! is created on the main thread, so the worker never touches the chunk map.
//! If a neighbor arrives after capture the resulting border faces are
//! corrected by the remesh the streaming layer schedules for that event.

use crate::core::MtResource;
use crate::meshing::{mesh_chunk, ChunkMeshData};
use crate::task_management::task::{Task, TaskResult, TerrainEvent};
use crate::voxels::chunk::Chunk;
use crate::voxels::world::Terrain;

/// Meshes one chunk on a worker thread.
pub struct ChunkMeshTask {
    chunk: MtResource<Chunk>,
    neighbors: [Option<MtResource<Chunk>>; 6],
}

impl ChunkMeshTask {
    /// Creates a meshing task from a chunk handle and its resolved
    /// neighbors.
    ///
    /// # Arguments
    /// * `chunk` - The chunk to mesh
    /// * `neighbors` - The chunk's neighbors, indexed by `Direction`
    pub fn new(chunk: MtResource<Chunk>, neighbors: [Option<MtResource<Chunk>>; 6]) -> Self {
        Self { chunk, neighbors }
    }
}

impl Task for ChunkMeshTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let guard = self.chunk.get();
        let mesh = mesh_chunk(&guard, &self.neighbors);
        Box::new(ChunkMeshResult { mesh })
    }
}

/// Finished mesh buffers, handed to the streaming layer for upload.
pub struct ChunkMeshResult {
    mesh: ChunkMeshData,
}

impl TaskResult for ChunkMeshResult {
    fn handle_result(
        self: Box<Self>,
        _terrain: &mut Terrain,
    ) -> (Vec<Box<dyn Task + Send>>, Vec<TerrainEvent>) {
        (Vec::new(), vec![TerrainEvent::MeshReady(self.mesh)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::BlockType;
    use crate::voxels::coords::ChunkKey;

    #[test]
    fn task_produces_the_same_mesh_as_direct_meshing() {
        let mut chunk = Chunk::new(ChunkKey::from_corner(0, 0));
        chunk.set_block_at(4, 50, 4, BlockType::Stone).unwrap();
        let resource = MtResource::new(chunk);
        let neighbors: [Option<MtResource<Chunk>>; 6] = Default::default();

        let task = ChunkMeshTask::new(resource.clone(), neighbors);
        let result = task.process();
        let mut terrain = Terrain::new();
        let (follow_ups, mut events) = result.handle_result(&mut terrain);
        assert!(follow_ups.is_empty());
        assert_eq!(events.len(), 1);
        match events.pop().unwrap() {
            TerrainEvent::MeshReady(mesh) => {
                assert_eq!(mesh.key, ChunkKey::from_corner(0, 0));
                assert_eq!(mesh.opaque_vertices.len(), 24);
            }
            _ => panic!("expected a mesh event"),
        }
    }
}
