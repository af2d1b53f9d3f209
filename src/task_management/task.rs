//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the background task
//! system used for terrain generation and meshing.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be executed asynchronously
//! - `TaskResult`: Represents the result of a completed task
//! - `TerrainEvent`: Notifications a result raises for the streaming layer
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the main thread with
//!    mutable access to the terrain, where it commits its data
//! 5. The result can spawn new tasks and raise events for the caller
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back to the main thread

use crate::meshing::ChunkMeshData;
use crate::voxels::coords::ChunkKey;
use crate::voxels::world::Terrain;

/// A notification raised when a completed task changes terrain state.
///
/// Events carry what the streaming layer needs to react: freshly generated
/// zones may need meshing, and finished meshes need uploading. Keeping these
/// as values returned up the call stack avoids locked completion lists.
pub enum TerrainEvent {
    /// A generation zone's 16 chunks are now resident in the terrain.
    ZoneGenerated {
        /// The generated zone's packed corner key
        zone: ChunkKey,
    },

    /// A chunk's mesh buffers are ready for upload.
    MeshReady(ChunkMeshData),
}

/// A trait representing a unit of work that can be executed asynchronously.
///
/// Tasks are the primary mechanism for offloading work from the main thread
/// to background workers. They should own all the data they need: a
/// generation task carries its zone corner and a handle to the generator, a
/// meshing task carries handles to the chunks it reads.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// This runs on a background thread and must not touch main-thread
    /// state. Heavy work belongs here; `handle_result` should only commit.
    ///
    /// # Returns
    /// A boxed `TaskResult` that will be processed on the main thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// A trait representing the result of processing a `Task`.
///
/// Results are processed on the main thread, which is the only place the
/// terrain's chunk map may be mutated. A result commits its payload and
/// reports what happened.
pub trait TaskResult: Send {
    /// Commits this result into the terrain on the main thread.
    ///
    /// # Arguments
    /// * `terrain` - The terrain to commit into
    ///
    /// # Returns
    /// A tuple containing:
    /// 1. New tasks to schedule (can be empty)
    /// 2. Events for the streaming layer to react to (can be empty)
    fn handle_result(
        self: Box<Self>,
        terrain: &mut Terrain,
    ) -> (Vec<Box<dyn Task + Send>>, Vec<TerrainEvent>);
}
