//! # Task Management System
//!
//! This module provides the worker pool that runs terrain generation and
//! meshing off the main thread.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Central coordinator for task distribution and worker
//!   management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The result of a completed task, committed on the main
//!   thread, which can spawn additional tasks and raise `TerrainEvent`s
//! - `TaskChannel`: Communication channel between the main thread and one
//!   worker thread
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using
//!    round-robin
//! 3. Workers process tasks and send results back on their channel
//! 4. Results are drained on the main thread in `process_completed_tasks()`,
//!    where each result commits into the terrain
//! 5. Results can spawn new tasks or raise events for the streaming layer
//!
//! ## Performance Considerations
//! - Each worker accepts one task at a time; everything else waits in the
//!   overflow queue, so a burst of zone requests cannot flood the channels
//! - Tasks should be coarse-grained (a whole zone, a whole chunk mesh) to
//!   amortize scheduling overhead

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::info;

use crate::voxels::world::Terrain;
use task::{Task, TaskResult, TerrainEvent};

/// A communication channel between the main thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from main thread to worker
/// - `result_receiver`: Receives task results from worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `_worker`: Handle to the worker thread (kept alive by this struct)
///
/// # Implementation Notes
/// - Uses MPSC channels for communication
/// - The worker loop exits when the sender is dropped, so dropping the
///   manager shuts the pool down
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// This is set to 1 to ensure tasks are processed in order within each
/// channel. Increasing this value would allow for pipelining but would
/// require more sophisticated task dependency management.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating and managing worker threads
/// - Distributing tasks across available workers
/// - Collecting and processing task results
/// - Queueing tasks when all workers are busy
///
/// # Fields
/// - `channels`: Set of active worker channels
/// - `queued_tasks`: Tasks waiting for an available worker
/// - `current_channel`: Index for round-robin scheduling
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker
    /// threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create, typically the
    ///   CPU core count or a small fixed number
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        info!(
            "Starting task manager with {} workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );
        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    let _ = result_tx.send(result);
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Returns the number of tasks not yet completed: in flight on workers
    /// plus waiting in the overflow queue.
    ///
    /// The streaming layer uses this as its outstanding-work gauge, e.g. to
    /// decide whether the initial load has finished.
    pub fn outstanding_tasks(&self) -> usize {
        let in_flight: usize = self
            .channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum();
        in_flight + self.queued_tasks.len()
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Arguments
    /// * `task` - The task to send to the worker
    /// * `channel_idx` - Index of the target worker channel (must be valid)
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the send failed (e.g. worker disconnected), giving
    ///   the task back for requeueing
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds an available worker channel that can accept a new task.
    ///
    /// This implements a round-robin scheduling strategy starting from the
    /// last used channel to ensure even distribution of tasks across all
    /// workers. Channels that have reached their maximum number of in-flight
    /// tasks are skipped.
    ///
    /// # Returns
    /// - `Some(usize)` index of an available channel
    /// - `None` if all channels are busy or there are no channels
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        if self
            .channels
            .iter()
            .all(|channel| channel.num_tasks_in_flight >= MAX_TASKS_IN_FLIGHT)
        {
            return None;
        }

        let start_channel = self.current_channel;
        let mut current = start_channel;

        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                // This shouldn't happen due to the earlier check
                info!("All channels are full, but missed the first check");
                return None;
            }
        }
    }

    /// Publishes a new task for execution.
    ///
    /// The task will be executed as soon as a worker becomes available, or
    /// queued if all workers are busy.
    ///
    /// # Arguments
    /// * `task` - The task to be executed
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        if self.channels.is_empty() {
            self.queued_tasks.push_back(task);
            return false;
        }

        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Processes any queued tasks if workers are available.
    ///
    /// This method should be called periodically (typically once per frame)
    /// to ensure that queued tasks are scheduled as workers free up. Tasks
    /// are processed in FIFO order; processing stops when no worker can
    /// accept more work.
    pub fn process_queued_tasks(&mut self) {
        if self.queued_tasks.is_empty() {
            return;
        }

        match self.find_available_channel() {
            None => {} // No available channels, keep tasks queued
            Some(mut channel_idx) => {
                while let Some(task) = self.queued_tasks.pop_front() {
                    match self.try_send_task(task, channel_idx) {
                        Ok(_) => match self.find_available_channel() {
                            Some(next_idx) => channel_idx = next_idx,
                            None => break,
                        },
                        Err(task) => {
                            // Channel is disconnected, put the task back and
                            // stop processing.
                            self.queued_tasks.push_front(task);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Drains all completed task results from worker threads.
    ///
    /// Must be called on the main thread, which owns the terrain's chunk
    /// map. Each result commits its payload into the terrain; follow-up
    /// tasks it spawns are published immediately, and the events it raises
    /// are collected for the caller.
    ///
    /// # Arguments
    /// * `terrain` - The terrain to commit results into
    ///
    /// # Returns
    /// All events raised by the drained results, in arrival order.
    pub fn process_completed_tasks(&mut self, terrain: &mut Terrain) -> Vec<TerrainEvent> {
        let mut tasks_to_queue = Vec::new();
        let mut events = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                let (new_tasks, new_events) = result.handle_result(terrain);
                events.extend(new_events);
                for task in new_tasks {
                    tasks_to_queue.push(task);
                }
            }
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTask(i64);
    struct EchoResult(i64);

    impl Task for EchoTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            Box::new(EchoResult(self.0))
        }
    }

    impl TaskResult for EchoResult {
        fn handle_result(
            self: Box<Self>,
            _terrain: &mut Terrain,
        ) -> (Vec<Box<dyn Task + Send>>, Vec<TerrainEvent>) {
            (
                Vec::new(),
                vec![TerrainEvent::ZoneGenerated {
                    zone: crate::voxels::coords::ChunkKey(self.0),
                }],
            )
        }
    }

    #[test]
    fn tasks_round_trip_through_the_pool() {
        let mut manager = TaskManager::new(2);
        let mut terrain = Terrain::new();
        for i in 0..8 {
            manager.publish_task(Box::new(EchoTask(i)));
        }

        let mut seen = Vec::new();
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while seen.len() < 8 {
            assert!(std::time::Instant::now() < deadline, "pool stalled");
            manager.process_queued_tasks();
            for event in manager.process_completed_tasks(&mut terrain) {
                if let TerrainEvent::ZoneGenerated { zone } = event {
                    seen.push(zone.0);
                }
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
        assert_eq!(manager.outstanding_tasks(), 0);
    }

    #[test]
    fn overflow_beyond_worker_count_is_queued() {
        let mut manager = TaskManager::new(1);
        assert!(manager.publish_task(Box::new(EchoTask(0))));
        // The single worker already has a task in flight; the rest queue.
        assert!(!manager.publish_task(Box::new(EchoTask(1))));
        assert_eq!(manager.outstanding_tasks(), 2);
    }
}
