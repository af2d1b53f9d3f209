//! # Face Table Module
//!
//! This module defines the static per-face geometry the mesher stamps out
//! for every visible block face: four corner offsets wound counter-clockwise
//! when viewed from outside the block, each with its corner of the texture
//! atlas cell.

use crate::voxels::block::Direction;

/// Size of one atlas cell in normalized UV space (16x16 atlas).
pub const UV_CELL: f32 = 1.0 / 16.0;

/// One corner of a block face: a position offset within the unit cube and
/// the corner's relative UV within an atlas cell.
pub struct FaceCorner {
    /// Corner position offset within the unit cube
    pub offset: [f32; 3],
    /// Relative UV within the atlas cell, either 0 or `UV_CELL`
    pub uv: [f32; 2],
}

/// The geometry of one of the six block faces.
pub struct BlockFace {
    /// The outward direction of this face
    pub direction: Direction,
    /// The four corners, wound counter-clockwise from outside
    pub corners: [FaceCorner; 4],
}

/// All six faces of the unit cube.
///
/// Corners are ordered so that the triangles (0,1,2) and (0,2,3) are
/// counter-clockwise from outside; index order within a face matches the UV
/// winding, with UV corner (0,0) first.
pub static BLOCK_FACES: [BlockFace; 6] = [
    BlockFace {
        direction: Direction::XPOS,
        corners: [
            FaceCorner { offset: [1.0, 0.0, 1.0], uv: [0.0, 0.0] },
            FaceCorner { offset: [1.0, 0.0, 0.0], uv: [UV_CELL, 0.0] },
            FaceCorner { offset: [1.0, 1.0, 0.0], uv: [UV_CELL, UV_CELL] },
            FaceCorner { offset: [1.0, 1.0, 1.0], uv: [0.0, UV_CELL] },
        ],
    },
    BlockFace {
        direction: Direction::XNEG,
        corners: [
            FaceCorner { offset: [0.0, 0.0, 0.0], uv: [0.0, 0.0] },
            FaceCorner { offset: [0.0, 0.0, 1.0], uv: [UV_CELL, 0.0] },
            FaceCorner { offset: [0.0, 1.0, 1.0], uv: [UV_CELL, UV_CELL] },
            FaceCorner { offset: [0.0, 1.0, 0.0], uv: [0.0, UV_CELL] },
        ],
    },
    BlockFace {
        direction: Direction::YPOS,
        corners: [
            FaceCorner { offset: [0.0, 1.0, 1.0], uv: [0.0, 0.0] },
            FaceCorner { offset: [1.0, 1.0, 1.0], uv: [UV_CELL, 0.0] },
            FaceCorner { offset: [1.0, 1.0, 0.0], uv: [UV_CELL, UV_CELL] },
            FaceCorner { offset: [0.0, 1.0, 0.0], uv: [0.0, UV_CELL] },
        ],
    },
    BlockFace {
        direction: Direction::YNEG,
        corners: [
            FaceCorner { offset: [0.0, 0.0, 0.0], uv: [0.0, 0.0] },
            FaceCorner { offset: [1.0, 0.0, 0.0], uv: [UV_CELL, 0.0] },
            FaceCorner { offset: [1.0, 0.0, 1.0], uv: [UV_CELL, UV_CELL] },
            FaceCorner { offset: [0.0, 0.0, 1.0], uv: [0.0, UV_CELL] },
        ],
    },
    BlockFace {
        direction: Direction::ZPOS,
        corners: [
            FaceCorner { offset: [0.0, 0.0, 1.0], uv: [0.0, 0.0] },
            FaceCorner { offset: [1.0, 0.0, 1.0], uv: [UV_CELL, 0.0] },
            FaceCorner { offset: [1.0, 1.0, 1.0], uv: [UV_CELL, UV_CELL] },
            FaceCorner { offset: [0.0, 1.0, 1.0], uv: [0.0, UV_CELL] },
        ],
    },
    BlockFace {
        direction: Direction::ZNEG,
        corners: [
            FaceCorner { offset: [1.0, 0.0, 0.0], uv: [0.0, 0.0] },
            FaceCorner { offset: [0.0, 0.0, 0.0], uv: [UV_CELL, 0.0] },
            FaceCorner { offset: [0.0, 1.0, 0.0], uv: [UV_CELL, UV_CELL] },
            FaceCorner { offset: [1.0, 1.0, 0.0], uv: [0.0, UV_CELL] },
        ],
    },
];
