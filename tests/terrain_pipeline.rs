//! End-to-end exercises of the terrain pipeline: generation into a chunk
//! map, meshing, streaming with real worker threads, and interaction.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use cgmath::Vector3;

use voxel_terrain::config::TerrainConfig;
use voxel_terrain::meshing::ChunkMeshData;
use voxel_terrain::raycast::grid_march;
use voxel_terrain::rendering::MeshUploader;
use voxel_terrain::streaming::StreamingController;
use voxel_terrain::voxels::block::BlockType;
use voxel_terrain::voxels::coords::{ChunkKey, ZONE_SIZE};
use voxel_terrain::voxels::generation::TerrainGenerator;
use voxel_terrain::voxels::world::Terrain;

#[derive(Default)]
struct RecordingUploader {
    resident: HashMap<ChunkKey, usize>,
    releases: usize,
}

impl MeshUploader for RecordingUploader {
    fn upload(&mut self, mesh: ChunkMeshData) {
        self.resident.insert(mesh.key, mesh.opaque_indices.len());
    }

    fn release(&mut self, key: ChunkKey) {
        if self.resident.remove(&key).is_some() {
            self.releases += 1;
        }
    }
}

/// Generates one zone synchronously and meshes every chunk through the
/// terrain's own remesh path.
fn generate_zone_synchronously(seed: u32, zone: ChunkKey) -> (Terrain, Vec<ChunkMeshData>) {
    let generator = TerrainGenerator::new(seed);
    let mut terrain = Terrain::new();
    for key in zone.zone_chunks() {
        let chunk = terrain.instantiate_chunk_at(key.x(), key.z());
        generator.fill_chunk(&mut chunk.get_mut());
    }
    terrain.mark_zone_generated(zone);

    let meshes = zone
        .zone_chunks()
        .map(|key| terrain.remesh_chunk(key).expect("chunk exists"))
        .collect();
    (terrain, meshes)
}

#[test]
fn generated_zone_meshes_every_chunk() {
    let (_, meshes) = generate_zone_synchronously(2024, ChunkKey::from_corner(0, 0));
    assert_eq!(meshes.len(), 16);
    for mesh in &meshes {
        // Terrain always produces a visible surface per chunk, and indices
        // always come in whole triangles.
        assert!(!mesh.opaque_indices.is_empty(), "chunk {:?} is empty", mesh.key);
        assert_eq!(mesh.opaque_indices.len() % 3, 0);
        assert_eq!(mesh.transparent_indices.len() % 3, 0);
        // Every index addresses a real vertex.
        let max = *mesh.opaque_indices.iter().max().unwrap() as usize;
        assert!(max < mesh.opaque_vertices.len());
    }
}

#[test]
fn generation_is_identical_across_runs() {
    let zone = ChunkKey::from_corner(-128, 64);
    let (terrain_a, _) = generate_zone_synchronously(77, zone);
    let (terrain_b, _) = generate_zone_synchronously(77, zone);
    for x in zone.x()..zone.x() + ZONE_SIZE {
        for z in zone.z()..zone.z() + ZONE_SIZE {
            for y in (0..256).step_by(13) {
                let pos = Vector3::new(x, y, z);
                assert_eq!(
                    terrain_a.block_at_world(pos).unwrap(),
                    terrain_b.block_at_world(pos).unwrap()
                );
            }
        }
    }
}

#[test]
fn streaming_keeps_the_draw_ring_resident_while_walking() {
    let config = TerrainConfig {
        seed: 5,
        create_radius: 1,
        draw_radius: 1,
        worker_count: 2,
    };
    let mut terrain = Terrain::new();
    let mut controller = StreamingController::new(&config);
    let mut uploader = RecordingUploader::default();

    let mut prev = Vector3::new(0.5, 150.0, 0.5);
    let deadline = Instant::now() + Duration::from_secs(120);
    while !controller.initial_load_complete(&terrain) {
        assert!(Instant::now() < deadline, "initial load stalled");
        controller.update(&mut terrain, &mut uploader, prev, prev);
        std::thread::sleep(Duration::from_millis(2));
    }
    assert_eq!(terrain.chunk_count(), 9 * 16);
    assert_eq!(uploader.resident.len(), 9 * 16);

    // Walk two zones east, then settle.
    let mut pos = prev;
    while pos.x < 2.5 * ZONE_SIZE as f32 {
        pos.x += 4.0;
        controller.update(&mut terrain, &mut uploader, pos, prev);
        prev = pos;
        std::thread::sleep(Duration::from_millis(2));
    }
    while controller.outstanding_tasks() > 0 {
        assert!(Instant::now() < deadline, "walk settle stalled");
        controller.update(&mut terrain, &mut uploader, pos, prev);
        std::thread::sleep(Duration::from_millis(2));
    }

    // Two zone columns were left behind and released.
    assert_eq!(uploader.releases, 2 * 3 * 16);
    // The ring around the new position is resident.
    assert_eq!(uploader.resident.len(), 9 * 16);
    // Nothing was ever un-generated.
    assert!(terrain.has_chunk_at(0, 0));
}

#[test]
fn raycast_and_edit_interact_with_generated_terrain() {
    let (terrain, _) = generate_zone_synchronously(11, ChunkKey::from_corner(0, 0));

    // Cast straight down from above the world's tallest possible terrain.
    let hit = grid_march(
        Vector3::new(32.5, 255.5, 32.5),
        Vector3::new(0.0, -256.0, 0.0),
        &terrain,
    )
    .unwrap()
    .expect("downward ray must hit generated terrain");
    assert!(!terrain.block_at_world(hit.cell).unwrap().is_empty());

    // Carve the hit block out and verify the ray now passes one cell deeper.
    let meshes = terrain.change_block_at(hit.cell, BlockType::Empty).unwrap();
    assert!(!meshes.is_empty());
    let deeper = grid_march(
        Vector3::new(32.5, 255.5, 32.5),
        Vector3::new(0.0, -256.0, 0.0),
        &terrain,
    )
    .unwrap()
    .expect("ray must hit the next block down");
    assert!(deeper.cell.y < hit.cell.y);
}
