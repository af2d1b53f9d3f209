//! # Block Module
//!
//! This module provides the core block-related functionality for the terrain
//! subsystem. It includes block type definitions and the six axis-aligned
//! face directions.

pub mod block_type;
pub mod direction;

pub use block_type::BlockType;
pub use direction::Direction;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage and serialization of block data.
pub type BlockTypeSize = u8;
