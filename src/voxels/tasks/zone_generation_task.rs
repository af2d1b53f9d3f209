//! # Zone Generation Task
//!
//! Background task that fills the 16 chunks of one 64x64 zone with
//! generated terrain.
//!
//! Generation works in whole zones rather than single chunks so the noise
//! sampling cost is amortized and the streaming layer has fewer units to
//! track. The zone's chunks are instantiated all-`Empty` on the main thread
//! before the task is published; the worker fills each one in place through
//! its write lock, so the chunks are part of the world (and read as empty
//! air) for the whole generation window.

use std::sync::Arc;

use log::debug;

use crate::core::MtResource;
use crate::task_management::task::{Task, TaskResult, TerrainEvent};
use crate::voxels::chunk::Chunk;
use crate::voxels::coords::ChunkKey;
use crate::voxels::generation::TerrainGenerator;
use crate::voxels::world::Terrain;

/// Fills all chunks of one zone on a worker thread.
pub struct ZoneGenerationTask {
    zone: ChunkKey,
    chunks: Vec<MtResource<Chunk>>,
    generator: Arc<TerrainGenerator>,
}

impl ZoneGenerationTask {
    /// Creates a task for the given zone.
    ///
    /// # Arguments
    /// * `zone` - The zone's packed corner key (a multiple of 64 on both
    ///   axes)
    /// * `chunks` - Handles to the zone's 16 freshly instantiated chunks
    /// * `generator` - The shared terrain generator
    pub fn new(
        zone: ChunkKey,
        chunks: Vec<MtResource<Chunk>>,
        generator: Arc<TerrainGenerator>,
    ) -> Self {
        Self {
            zone,
            chunks,
            generator,
        }
    }
}

impl Task for ZoneGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        for chunk in &self.chunks {
            self.generator.fill_chunk(&mut chunk.get_mut());
        }
        debug!("generated zone {:?}", self.zone);
        Box::new(ZoneGenerationResult { zone: self.zone })
    }
}

/// Notification that a zone's chunks have been filled.
pub struct ZoneGenerationResult {
    zone: ChunkKey,
}

impl TaskResult for ZoneGenerationResult {
    fn handle_result(
        self: Box<Self>,
        _terrain: &mut Terrain,
    ) -> (Vec<Box<dyn Task + Send>>, Vec<TerrainEvent>) {
        (Vec::new(), vec![TerrainEvent::ZoneGenerated { zone: self.zone }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::BlockType;
    use cgmath::Vector3;

    #[test]
    fn processing_fills_the_instantiated_chunks_in_place() {
        let generator = Arc::new(TerrainGenerator::new(42));
        let zone = ChunkKey::from_corner(-64, -64);
        let mut terrain = Terrain::new();
        let chunks: Vec<MtResource<Chunk>> = zone
            .zone_chunks()
            .map(|key| terrain.instantiate_chunk_at(key.x(), key.z()))
            .collect();

        // The chunks exist and read as empty air before generation runs.
        assert_eq!(terrain.chunk_count(), 16);
        assert_eq!(
            terrain.block_at_world(Vector3::new(-1, 0, -1)).unwrap(),
            BlockType::Empty
        );

        let task = ZoneGenerationTask::new(zone, chunks, generator);
        let result = task.process();
        let (follow_ups, events) = result.handle_result(&mut terrain);
        assert!(follow_ups.is_empty());
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            TerrainEvent::ZoneGenerated { zone: z } if z == zone
        ));

        // Bedrock-depth blocks are generated across the whole zone.
        assert_eq!(
            terrain.block_at_world(Vector3::new(-1, 0, -1)).unwrap(),
            BlockType::Stone
        );
        assert_eq!(
            terrain.block_at_world(Vector3::new(-64, 0, -64)).unwrap(),
            BlockType::Stone
        );
    }
}
