//! # Terrain Error Types
//!
//! This module defines the error taxonomy for the terrain subsystem.
//!
//! There are only three failure modes a caller can observe:
//! - Out-of-bounds chunk-local voxel access, which is a programming error and
//!   must never silently wrap into a neighboring slot
//! - World-space lookups at coordinates no instantiated chunk covers, which
//!   interaction code hits every frame near the edge of the generated world
//!   and must be able to recover from
//! - A degenerate (all-zero) ray handed to the grid march, which would loop
//!   forever if accepted
//!
//! Note that a world-space Y coordinate outside `[0, 256)` is *not* an error:
//! world height is physically bounded, so reads above/below the world are
//! defined as `Empty` and writes are no-ops.

use std::error::Error;
use std::fmt;

/// Errors produced by terrain queries and interaction entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainError {
    /// A chunk-local voxel access outside `[0,16) x [0,256) x [0,16)`.
    ///
    /// This indicates broken index math in the caller; the coordinates are
    /// carried so the offending access can be reported precisely.
    OutOfBounds {
        /// The offending local X coordinate
        x: i32,
        /// The offending local Y coordinate
        y: i32,
        /// The offending local Z coordinate
        z: i32,
    },

    /// A world-space lookup at an (x, z) column no instantiated chunk covers.
    ///
    /// Callers that cannot tolerate this (e.g. block placement) are expected
    /// to check `Terrain::has_chunk_at` first, or to skip the action for the
    /// current tick when they receive this error.
    MissingChunk {
        /// The world X coordinate of the lookup
        x: i32,
        /// The world Z coordinate of the lookup
        z: i32,
    },

    /// A grid march was requested with a zero direction on all axes.
    DegenerateRay,
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainError::OutOfBounds { x, y, z } => {
                write!(f, "chunk-local coordinates ({x}, {y}, {z}) are out of bounds")
            }
            TerrainError::MissingChunk { x, z } => {
                write!(f, "no chunk covers world column ({x}, {z})")
            }
            TerrainError::DegenerateRay => {
                write!(f, "grid march ray has zero direction on all axes")
            }
        }
    }
}

impl Error for TerrainError {}
