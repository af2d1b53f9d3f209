//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification, conversion, and
//! the per-type surface properties the mesher bakes into vertex data.

use num_derive::FromPrimitive;

use super::{direction::Direction, BlockTypeSize};

/// Side length, in texture atlas cells, of the square block texture atlas.
/// UV offsets are expressed in cells and scaled by `1 / ATLAS_CELLS`.
pub const ATLAS_CELLS: f32 = 16.0;

/// Enumerates all possible block types in the voxel world.
///
/// Each variant represents a distinct type of block with its own surface
/// properties. The `FromPrimitive` derive allows conversion from integers,
/// which is useful for serialization and deserialization.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// The absence of a block. Non-solid and transparent.
    Empty,

    /// A grass block with different textures on top and sides.
    Grass,

    /// A basic dirt block.
    Dirt,

    /// A stone block, the filler below ground level.
    Stone,

    /// A water block. Transparent, rendered in the translucent pass with
    /// surface animation.
    Water,

    /// A snow block, capping the highest mountain peaks.
    Snow,

    /// A lava block. Opaque but animated like water.
    Lava,

    /// A sand block, covering desert and island shores.
    Sand,

    /// A sponge block.
    Sponge,

    /// A red clay block, forming the tops of desert pillars.
    RedClay,
}

impl BlockType {
    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// This is typically used when deserializing block data or converting
    /// from the compact storage format to the rich enum type.
    ///
    /// # Arguments
    /// * `btype` - The block type as a `BlockTypeSize`
    ///
    /// # Returns
    /// The corresponding `BlockType`
    ///
    /// # Panics
    /// Panics if the input value doesn't correspond to a valid `BlockType`.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Self {
        let btype_option = num::FromPrimitive::from_u8(btype as BlockTypeSize);
        btype_option.unwrap()
    }

    /// Returns `true` if this block occupies no space.
    pub fn is_empty(&self) -> bool {
        matches!(self, BlockType::Empty)
    }

    /// Returns `true` if a face behind this block remains visible.
    ///
    /// Transparency drives face culling: an opaque block's face is emitted
    /// when its neighbor is transparent, a transparent block's face only when
    /// its neighbor is `Empty` (so adjacent water cells share no interior
    /// walls).
    pub fn is_transparent(&self) -> bool {
        matches!(self, BlockType::Empty | BlockType::Water)
    }

    /// Returns `true` if this block's surface is animated by the shader.
    pub fn is_animated(&self) -> bool {
        matches!(self, BlockType::Water | BlockType::Lava)
    }

    /// Returns the base texture atlas offset, in cells, for the given face.
    ///
    /// # Arguments
    /// * `direction` - The face being textured
    ///
    /// # Returns
    /// The bottom-left corner of the face's atlas cell, in cell units.
    /// Multiply by `1 / ATLAS_CELLS` to obtain UV coordinates.
    pub fn atlas_offset(&self, direction: Direction) -> [f32; 2] {
        match self {
            BlockType::Empty => [0.0, 0.0],
            BlockType::Grass => match direction {
                Direction::YPOS => [8.0, 13.0],
                Direction::YNEG => [2.0, 15.0],
                _ => [3.0, 15.0],
            },
            BlockType::Dirt => [2.0, 15.0],
            BlockType::Stone => [1.0, 15.0],
            BlockType::Water => [14.0, 3.0],
            BlockType::Snow => [2.0, 11.0],
            BlockType::Lava => [14.0, 1.0],
            BlockType::Sand => [2.0, 14.0],
            BlockType::Sponge => [0.0, 12.0],
            BlockType::RedClay => [8.0, 5.0],
        }
    }

    /// Returns the Blinn-Phong specular exponent baked into this block's
    /// vertices. Liquids are glossy, everything else is matte.
    pub fn cosine_power(&self) -> f32 {
        match self {
            BlockType::Water => 80.0,
            BlockType::Lava => 8.0,
            _ => 1.0,
        }
    }

    /// Returns the animation flag baked into this block's vertices: `1.0`
    /// for surfaces the shader scrolls, `0.0` otherwise.
    pub fn animation_flag(&self) -> f32 {
        if self.is_animated() {
            1.0
        } else {
            0.0
        }
    }
}
