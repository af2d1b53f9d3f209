//! # Voxel Tasks Module
//!
//! Background tasks operating on voxel data.

pub mod zone_generation_task;

pub use zone_generation_task::ZoneGenerationTask;
