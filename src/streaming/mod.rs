//! # Streaming Module
//!
//! Position-driven terrain streaming.
//!
//! The `StreamingController` watches the camera move through zone space and
//! keeps three rings of state in step:
//! - **Generation** (create radius): zones near the camera whose voxels must
//!   exist. An ungenerated zone in range has its 16 chunks instantiated
//!   all-empty on the spot (so the world can answer lookups over it
//!   immediately) and gets a background generation task that fills them in
//!   place; zones are marked at request time so one zone is never generated
//!   twice.
//! - **GPU residency** (draw radius, at most the create radius): chunks near
//!   the camera keep meshes uploaded. Zones leaving the draw ring have their
//!   chunks' GPU state released; their voxels are retained, so edits survive
//!   and re-entry only costs a remesh.
//! - **Meshing**: freshly generated zones inside the draw ring, and
//!   generated zones re-entering it, get per-chunk meshing tasks. When a new
//!   zone lands next to an already-meshed one, the chunks across the seam
//!   are remeshed so stale border walls disappear.
//!
//! Each zone the controller is actively driving moves through an explicit
//! state machine, queryable via `zone_state`: `Generating` while its fill
//! task runs, `MeshingPending` while any of its 16 chunk meshes has yet to
//! be uploaded, and `Resident` once all of them are on the GPU. Zones that
//! are neither generating nor inside the draw ring carry no state; their
//! voxels simply persist.
//!
//! All chunk-map mutation happens on the main thread inside `update`;
//! workers fill and read chunks only through their locks.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use cgmath::Vector3;
use log::{debug, info};

use crate::config::TerrainConfig;
use crate::meshing::ChunkMeshTask;
use crate::rendering::MeshUploader;
use crate::task_management::task::TerrainEvent;
use crate::task_management::TaskManager;
use crate::voxels::block::{BlockType, Direction};
use crate::voxels::coords::{ChunkKey, ZONE_CHUNKS, ZONE_SIZE};
use crate::voxels::generation::TerrainGenerator;
use crate::voxels::tasks::ZoneGenerationTask;
use crate::voxels::world::Terrain;

/// Lifecycle state of a zone the controller is actively driving.
///
/// Zones that are neither generating nor inside the draw ring have no
/// state; a generated zone's voxels persist regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneState {
    /// The zone's chunks are instantiated and a worker is filling them.
    Generating,
    /// At least one of the zone's 16 chunk meshes has not been uploaded.
    MeshingPending,
    /// All 16 chunk meshes are uploaded to the GPU.
    Resident,
}

/// Drives generation, meshing, and GPU residency from camera movement.
pub struct StreamingController {
    task_manager: TaskManager,
    generator: Arc<TerrainGenerator>,
    create_radius: i32,
    draw_radius: i32,
    last_pos: Vector3<f32>,
    zone_states: HashMap<ChunkKey, ZoneState>,
    pending_meshes: HashMap<ChunkKey, HashSet<ChunkKey>>,
}

impl StreamingController {
    /// Creates a controller and its worker pool.
    ///
    /// # Arguments
    /// * `config` - Seed, radii, and worker count
    pub fn new(config: &TerrainConfig) -> Self {
        info!(
            "terrain streaming: seed {}, create radius {}, draw radius {}, {} workers",
            config.seed, config.create_radius, config.draw_radius, config.worker_count
        );
        Self {
            task_manager: TaskManager::new(config.worker_count),
            generator: Arc::new(TerrainGenerator::new(config.seed)),
            create_radius: config.create_radius,
            draw_radius: config.draw_radius.min(config.create_radius),
            last_pos: Vector3::new(0.0, 0.0, 0.0),
            zone_states: HashMap::new(),
            pending_meshes: HashMap::new(),
        }
    }

    /// Returns the lifecycle state of a zone, or `None` if the controller
    /// is not actively driving it.
    pub fn zone_state(&self, zone: ChunkKey) -> Option<ZoneState> {
        self.zone_states.get(&zone).copied()
    }

    /// Number of generation and meshing tasks not yet completed.
    pub fn outstanding_tasks(&self) -> usize {
        self.task_manager.outstanding_tasks()
    }

    /// Returns `true` once the initial area around the spawn position has
    /// finished generating: the create ring's worth of chunks exists and no
    /// work is still in flight. Hosts gate the first playable frame on this.
    pub fn initial_load_complete(&self, terrain: &Terrain) -> bool {
        let chunks_per_side = self.create_radius * ZONE_CHUNKS;
        terrain.chunk_count() >= (chunks_per_side * chunks_per_side) as usize
            && self.task_manager.outstanding_tasks() == 0
    }

    /// Advances streaming by one tick.
    ///
    /// Drains completed background work into the terrain and the uploader,
    /// then reconciles the create and draw rings against the camera's
    /// movement since the previous tick.
    ///
    /// # Arguments
    /// * `terrain` - The terrain being streamed
    /// * `uploader` - Receiver of finished meshes and release requests
    /// * `pos` - The camera's current world position
    /// * `prev_pos` - The camera's position on the previous tick
    pub fn update(
        &mut self,
        terrain: &mut Terrain,
        uploader: &mut impl MeshUploader,
        pos: Vector3<f32>,
        prev_pos: Vector3<f32>,
    ) {
        self.last_pos = pos;
        self.poll_results(terrain, uploader);

        let curr_zone = zone_of(pos);
        let prev_zone = zone_of(prev_pos);
        let curr_draw = zones_in_radius(curr_zone, self.draw_radius);
        let prev_draw = zones_in_radius(prev_zone, self.draw_radius);

        // Zones that left the draw ring lose their GPU meshes and their
        // state entry. Voxels stay.
        for zone in prev_draw.difference(&curr_draw) {
            debug!("releasing zone {:?}", zone);
            if self.zone_states.get(zone) != Some(&ZoneState::Generating) {
                self.zone_states.remove(zone);
                self.pending_meshes.remove(zone);
            }
            for key in zone.zone_chunks() {
                uploader.release(key);
            }
        }

        // Generated zones that entered the draw ring are remeshed from their
        // retained voxels. Zones still generating are skipped here; their
        // completion event handles them.
        for zone in curr_draw.difference(&prev_draw) {
            if terrain.zone_generated(*zone)
                && self.zone_states.get(zone) != Some(&ZoneState::Generating)
            {
                self.spawn_zone_meshing(terrain, *zone, false);
            }
        }

        // Anything in the create ring that has never been requested has its
        // chunks instantiated on the spot and gets a fill task. Marking
        // happens at request time, which is the dedupe: a zone in flight is
        // "generated" as far as requests go.
        for zone in zones_in_radius(curr_zone, self.create_radius) {
            if !terrain.zone_generated(zone) {
                debug!("requesting generation of zone {:?}", zone);
                terrain.mark_zone_generated(zone);
                self.zone_states.insert(zone, ZoneState::Generating);
                let chunks = zone
                    .zone_chunks()
                    .map(|key| terrain.instantiate_chunk_at(key.x(), key.z()))
                    .collect();
                self.task_manager.publish_task(Box::new(ZoneGenerationTask::new(
                    zone,
                    chunks,
                    Arc::clone(&self.generator),
                )));
            }
        }

        self.task_manager.process_queued_tasks();
    }

    /// Drains completed tasks: commits generated zones, uploads finished
    /// meshes, and schedules meshing for zones that completed inside the
    /// draw ring.
    pub fn poll_results(&mut self, terrain: &mut Terrain, uploader: &mut impl MeshUploader) {
        let events = self.task_manager.process_completed_tasks(terrain);
        if events.is_empty() {
            return;
        }
        let draw_zones = zones_in_radius(zone_of(self.last_pos), self.draw_radius);
        for event in events {
            match event {
                TerrainEvent::ZoneGenerated { zone } => {
                    if draw_zones.contains(&zone) {
                        self.spawn_zone_meshing(terrain, zone, true);
                    } else {
                        // The camera moved on while the fill ran; the voxels
                        // persist but the zone is no longer actively driven.
                        self.zone_states.remove(&zone);
                    }
                }
                TerrainEvent::MeshReady(mesh) => {
                    let zone = ChunkKey::zone_at(mesh.key.x(), mesh.key.z());
                    if let Some(pending) = self.pending_meshes.get_mut(&zone) {
                        pending.remove(&mesh.key);
                        if pending.is_empty() {
                            self.pending_meshes.remove(&zone);
                            self.zone_states.insert(zone, ZoneState::Resident);
                            debug!("zone {:?} is resident", zone);
                        }
                    }
                    uploader.upload(mesh);
                }
            }
        }
        self.task_manager.process_queued_tasks();
    }

    /// Publishes meshing tasks for every chunk of a zone and moves the zone
    /// to `MeshingPending`; it becomes `Resident` once all 16 uploads land.
    ///
    /// With `include_seams`, existing chunks just across the zone's border
    /// are remeshed as well, so walls they grew against the formerly missing
    /// neighbor are dropped. Seam chunks belong to other zones and do not
    /// count towards this zone's residency.
    fn spawn_zone_meshing(&mut self, terrain: &Terrain, zone: ChunkKey, include_seams: bool) {
        self.zone_states.insert(zone, ZoneState::MeshingPending);
        self.pending_meshes.insert(zone, zone.zone_chunks().collect());
        let mut targets: HashSet<ChunkKey> = zone.zone_chunks().collect();
        if include_seams {
            for key in zone.zone_chunks() {
                if let Some(chunk) = terrain.chunk(key) {
                    let guard = chunk.get();
                    for direction in Direction::horizontal() {
                        if let Some(neighbor_key) = guard.neighbor(direction) {
                            if ChunkKey::zone_at(neighbor_key.x(), neighbor_key.z()) != zone {
                                targets.insert(neighbor_key);
                            }
                        }
                    }
                }
            }
        }
        for key in targets {
            if let Some(chunk) = terrain.chunk(key) {
                let neighbors = terrain.neighbors_for(&chunk.get());
                self.task_manager
                    .publish_task(Box::new(ChunkMeshTask::new(chunk, neighbors)));
            }
        }
    }

    /// Applies a block edit and uploads the resulting meshes.
    ///
    /// Edits against columns with no chunk are skipped rather than treated
    /// as fatal; interaction code probes the world edge constantly.
    ///
    /// # Returns
    /// `true` if the edit was applied.
    pub fn apply_block_change(
        &mut self,
        terrain: &Terrain,
        uploader: &mut impl MeshUploader,
        pos: Vector3<i32>,
        block_type: BlockType,
    ) -> bool {
        match terrain.change_block_at(pos, block_type) {
            Ok(meshes) => {
                for mesh in meshes {
                    uploader.upload(mesh);
                }
                true
            }
            Err(error) => {
                debug!("skipping block change at {:?}: {}", pos, error);
                false
            }
        }
    }
}

/// The corner key of the zone containing a world position.
fn zone_of(pos: Vector3<f32>) -> ChunkKey {
    ChunkKey::zone_at(pos.x.floor() as i32, pos.z.floor() as i32)
}

/// All zone corners within `radius` zones of `center`, the center included.
fn zones_in_radius(center: ChunkKey, radius: i32) -> HashSet<ChunkKey> {
    let mut zones = HashSet::new();
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            zones.insert(center.offset(dx, dz, ZONE_SIZE));
        }
    }
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meshing::ChunkMeshData;
    use std::collections::HashMap;
    use std::time::{Duration, Instant};

    /// Records uploads and releases instead of touching a GPU.
    #[derive(Default)]
    struct RecordingUploader {
        resident: HashMap<ChunkKey, (usize, usize)>,
        uploads: usize,
        releases: usize,
    }

    impl MeshUploader for RecordingUploader {
        fn upload(&mut self, mesh: ChunkMeshData) {
            self.uploads += 1;
            self.resident.insert(
                mesh.key,
                (mesh.opaque_indices.len(), mesh.transparent_indices.len()),
            );
        }

        fn release(&mut self, key: ChunkKey) {
            if self.resident.remove(&key).is_some() {
                self.releases += 1;
            }
        }
    }

    fn small_config() -> TerrainConfig {
        TerrainConfig {
            seed: 31,
            create_radius: 1,
            draw_radius: 1,
            worker_count: 2,
        }
    }

    fn drive_until_idle(
        controller: &mut StreamingController,
        terrain: &mut Terrain,
        uploader: &mut RecordingUploader,
        pos: Vector3<f32>,
    ) {
        let deadline = Instant::now() + Duration::from_secs(60);
        loop {
            controller.update(terrain, uploader, pos, pos);
            if controller.outstanding_tasks() == 0 {
                // One more drain for results that landed after the check.
                controller.poll_results(terrain, uploader);
                if controller.outstanding_tasks() == 0 {
                    break;
                }
            }
            assert!(Instant::now() < deadline, "streaming stalled");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn initial_load_generates_and_meshes_the_rings() {
        let mut controller = StreamingController::new(&small_config());
        let mut terrain = Terrain::new();
        let mut uploader = RecordingUploader::default();
        let origin = Vector3::new(0.0, 140.0, 0.0);

        assert!(!controller.initial_load_complete(&terrain));
        drive_until_idle(&mut controller, &mut terrain, &mut uploader, origin);

        // Create ring: 3x3 zones of 16 chunks each.
        assert_eq!(terrain.chunk_count(), 9 * 16);
        assert!(controller.initial_load_complete(&terrain));
        // Draw ring: every chunk of the 3x3 zones has a mesh resident.
        assert_eq!(uploader.resident.len(), 9 * 16);
        // Generated terrain always has opaque geometry.
        for (key, (opaque, _)) in &uploader.resident {
            assert!(*opaque > 0, "chunk {:?} has no opaque mesh", key);
            assert_eq!(opaque % 3, 0);
        }
    }

    #[test]
    fn zone_states_progress_from_generating_to_resident() {
        let mut controller = StreamingController::new(&small_config());
        let mut terrain = Terrain::new();
        let mut uploader = RecordingUploader::default();
        let origin = Vector3::new(0.0, 140.0, 0.0);
        let home = ChunkKey::from_corner(0, 0);

        // The first tick instantiates the zone's chunks and starts its
        // fill: the zone is generating, and lookups over it already succeed
        // instead of reporting missing chunks.
        controller.update(&mut terrain, &mut uploader, origin, origin);
        assert_eq!(controller.zone_state(home), Some(ZoneState::Generating));
        assert!(terrain.has_chunk_at(0, 0));
        assert!(terrain.block_at_world(Vector3::new(0, 250, 0)).is_ok());

        drive_until_idle(&mut controller, &mut terrain, &mut uploader, origin);
        // Every zone of the draw ring has all 16 meshes uploaded.
        for dz in -1..=1 {
            for dx in -1..=1 {
                let zone = home.offset(dx, dz, ZONE_SIZE);
                assert_eq!(controller.zone_state(zone), Some(ZoneState::Resident));
            }
        }

        // Walking away drops the state entries; the voxels stay.
        let far = Vector3::new(4.0 * ZONE_SIZE as f32, 140.0, 0.0);
        controller.update(&mut terrain, &mut uploader, far, origin);
        assert_eq!(controller.zone_state(home), None);
        assert!(terrain.has_chunk_at(0, 0));
    }

    #[test]
    fn moving_releases_exited_zones_and_generates_new_ones() {
        let mut controller = StreamingController::new(&small_config());
        let mut terrain = Terrain::new();
        let mut uploader = RecordingUploader::default();
        let origin = Vector3::new(0.0, 140.0, 0.0);
        drive_until_idle(&mut controller, &mut terrain, &mut uploader, origin);
        let chunks_before = terrain.chunk_count();

        // Step one zone east.
        let east = Vector3::new(ZONE_SIZE as f32, 140.0, 0.0);
        controller.update(&mut terrain, &mut uploader, east, origin);
        // The western column of zones left the draw ring.
        assert_eq!(uploader.releases, 3 * 16);
        for key in ChunkKey::from_corner(-ZONE_SIZE, 0).zone_chunks() {
            assert!(!uploader.resident.contains_key(&key));
        }
        // Voxels of the released zone are retained.
        assert!(terrain.has_chunk_at(-1, 0));

        drive_until_idle(&mut controller, &mut terrain, &mut uploader, east);
        // A new column of three zones was generated.
        assert_eq!(terrain.chunk_count(), chunks_before + 3 * 16);
        // And the new draw ring is fully resident again.
        for zone_dz in -1..=1 {
            for key in ChunkKey::from_corner(2 * ZONE_SIZE, zone_dz * ZONE_SIZE).zone_chunks() {
                assert!(uploader.resident.contains_key(&key));
            }
        }
    }

    #[test]
    fn reentering_a_zone_remeshes_without_regenerating() {
        let mut controller = StreamingController::new(&small_config());
        let mut terrain = Terrain::new();
        let mut uploader = RecordingUploader::default();
        let origin = Vector3::new(32.0, 140.0, 32.0);
        drive_until_idle(&mut controller, &mut terrain, &mut uploader, origin);

        // Edit a block, walk away far enough to release the home zone, then
        // walk back.
        let edit_pos = Vector3::new(32, 140, 32);
        assert!(controller.apply_block_change(
            &terrain,
            &mut uploader,
            edit_pos,
            BlockType::Sponge
        ));
        let far = Vector3::new(4.0 * ZONE_SIZE as f32, 140.0, 32.0);
        controller.update(&mut terrain, &mut uploader, far, origin);
        drive_until_idle(&mut controller, &mut terrain, &mut uploader, far);
        assert!(!uploader.resident.contains_key(&ChunkKey::from_corner(32, 32)));

        let chunks_after_walk = terrain.chunk_count();
        controller.update(&mut terrain, &mut uploader, origin, far);
        drive_until_idle(&mut controller, &mut terrain, &mut uploader, origin);

        // The edit survived the round trip: the zone was not regenerated.
        assert_eq!(
            terrain.block_at_world(edit_pos).unwrap(),
            BlockType::Sponge
        );
        assert_eq!(terrain.chunk_count(), chunks_after_walk);
        assert!(uploader
            .resident
            .contains_key(&ChunkKey::from_corner(32, 32)));
    }

    #[test]
    fn block_changes_outside_the_world_are_skipped() {
        let mut controller = StreamingController::new(&small_config());
        let terrain = Terrain::new();
        let mut uploader = RecordingUploader::default();
        // No chunks exist; the edit must be refused without panicking.
        assert!(!controller.apply_block_change(
            &terrain,
            &mut uploader,
            Vector3::new(10_000, 100, 10_000),
            BlockType::Stone
        ));
        assert_eq!(uploader.uploads, 0);
    }
}
