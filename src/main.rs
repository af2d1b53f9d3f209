//! # Headless Terrain Demo
//!
//! Streams terrain around a scripted camera walk without opening a window,
//! printing progress as zones generate, mesh, and retire. Useful for
//! profiling generation and for exercising the streaming layer end to end.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release [config.json]
//! RUST_LOG=debug cargo run --release
//! ```
//!
//! With no config file a random seed is used.

use std::time::{Duration, Instant};

use cgmath::Vector3;
use log::info;

use voxel_terrain::config::TerrainConfig;
use voxel_terrain::meshing::ChunkMeshData;
use voxel_terrain::rendering::MeshUploader;
use voxel_terrain::streaming::StreamingController;
use voxel_terrain::voxels::coords::ChunkKey;
use voxel_terrain::voxels::world::Terrain;

/// Counts mesh traffic instead of uploading to a GPU.
#[derive(Default)]
struct CountingUploader {
    resident: std::collections::HashSet<ChunkKey>,
    uploads: usize,
    releases: usize,
    opaque_indices: usize,
    transparent_indices: usize,
}

impl MeshUploader for CountingUploader {
    fn upload(&mut self, mesh: ChunkMeshData) {
        self.uploads += 1;
        self.opaque_indices += mesh.opaque_indices.len();
        self.transparent_indices += mesh.transparent_indices.len();
        self.resident.insert(mesh.key);
    }

    fn release(&mut self, key: ChunkKey) {
        if self.resident.remove(&key) {
            self.releases += 1;
        }
    }
}

fn load_config() -> TerrainConfig {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("cannot read config {path}: {e}"));
            TerrainConfig::from_json(&text)
                .unwrap_or_else(|e| panic!("cannot parse config {path}: {e}"))
        }
        None => TerrainConfig {
            seed: fastrand::u32(..),
            ..TerrainConfig::default()
        },
    }
}

fn main() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    let config = load_config();
    info!("Logger initialized; seed {}", config.seed);

    let mut terrain = Terrain::new();
    let mut controller = StreamingController::new(&config);
    let mut uploader = CountingUploader::default();

    // Initial load at the origin.
    let start = Instant::now();
    let origin = Vector3::new(0.5, 140.0, 0.5);
    let mut prev = origin;
    while !controller.initial_load_complete(&terrain) {
        controller.update(&mut terrain, &mut uploader, origin, prev);
        std::thread::sleep(Duration::from_millis(2));
    }
    info!(
        "initial load: {} chunks, {} uploads in {:.2?}",
        terrain.chunk_count(),
        uploader.uploads,
        start.elapsed()
    );

    // Walk east through several zones and let streaming follow.
    let walk_start = Instant::now();
    let mut pos = origin;
    while pos.x < 400.0 && walk_start.elapsed() < Duration::from_secs(120) {
        pos.x += 2.0;
        controller.update(&mut terrain, &mut uploader, pos, prev);
        prev = pos;
        std::thread::sleep(Duration::from_millis(5));
    }

    // Drain whatever the walk left in flight.
    while controller.outstanding_tasks() > 0 {
        controller.update(&mut terrain, &mut uploader, pos, prev);
        std::thread::sleep(Duration::from_millis(2));
    }

    info!(
        "walk done: {} chunks generated, {} resident, {} uploads, {} releases",
        terrain.chunk_count(),
        uploader.resident.len(),
        uploader.uploads,
        uploader.releases
    );
    info!(
        "mesh totals: {} opaque / {} transparent indices",
        uploader.opaque_indices, uploader.transparent_indices
    );
}
