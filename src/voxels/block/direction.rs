//! # Direction Module
//!
//! This module defines the six axis-aligned directions of a voxel block.
//! It provides the neighbor offsets used for cross-chunk lookups and the
//! outward normals used by the mesher.

use cgmath::Vector3;

/// Represents the six axis-aligned directions from a voxel block.
///
/// Each variant is assigned a unique integer value used to index the
/// per-chunk neighbor table and the per-face lookup tables in the mesher.
///
/// The order is: [XPOS, XNEG, YPOS, YNEG, ZPOS, ZNEG]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Direction {
    /// Towards positive X
    XPOS = 0,

    /// Towards negative X
    XNEG = 1,

    /// Towards positive Y
    YPOS = 2,

    /// Towards negative Y
    YNEG = 3,

    /// Towards positive Z
    ZPOS = 4,

    /// Towards negative Z
    ZNEG = 5,
}

impl Direction {
    /// Returns an array containing all six directions in index order.
    ///
    /// # Returns
    /// An array containing all `Direction` variants.
    pub fn all() -> [Direction; 6] {
        [
            Direction::XPOS,
            Direction::XNEG,
            Direction::YPOS,
            Direction::YNEG,
            Direction::ZPOS,
            Direction::ZNEG,
        ]
    }

    /// Returns the four horizontal directions, the only ones along which
    /// chunks have neighbors. The world is a single chunk tall.
    pub fn horizontal() -> [Direction; 4] {
        [
            Direction::XPOS,
            Direction::XNEG,
            Direction::ZPOS,
            Direction::ZNEG,
        ]
    }

    /// Returns the unit offset to the neighboring cell in this direction.
    ///
    /// # Returns
    /// An integer vector with exactly one non-zero component.
    pub fn offset(&self) -> Vector3<i32> {
        match self {
            Direction::XPOS => Vector3::new(1, 0, 0),
            Direction::XNEG => Vector3::new(-1, 0, 0),
            Direction::YPOS => Vector3::new(0, 1, 0),
            Direction::YNEG => Vector3::new(0, -1, 0),
            Direction::ZPOS => Vector3::new(0, 0, 1),
            Direction::ZNEG => Vector3::new(0, 0, -1),
        }
    }

    /// Returns the outward face normal for this direction as floats.
    ///
    /// # Returns
    /// A unit vector suitable for direct inclusion in vertex data.
    pub fn normal(&self) -> Vector3<f32> {
        let offset = self.offset();
        Vector3::new(offset.x as f32, offset.y as f32, offset.z as f32)
    }

    /// Returns the direction pointing the opposite way.
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::XPOS => Direction::XNEG,
            Direction::XNEG => Direction::XPOS,
            Direction::YPOS => Direction::YNEG,
            Direction::YNEG => Direction::YPOS,
            Direction::ZPOS => Direction::ZNEG,
            Direction::ZNEG => Direction::ZPOS,
        }
    }
}
