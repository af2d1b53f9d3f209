//! # Coordinate Module
//!
//! This module defines the coordinate conventions of the terrain subsystem
//! and the packed key type used to address chunks and generation zones.
//!
//! ## Coordinate Spaces
//! - **World space**: integer block coordinates over the whole terrain.
//!   X and Z are unbounded, Y spans `[0, 256)`.
//! - **Chunk-local space**: `[0, 16) x [0, 256) x [0, 16)` within one chunk.
//! - **Chunk corners**: world (x, z) floored to a multiple of 16.
//! - **Zone corners**: world (x, z) floored to a multiple of 64. A zone is
//!   the 4x4 block of chunks generated as one unit.

use cgmath::Vector3;

/// Chunk extent along the X axis, in blocks.
pub const CHUNK_DIM_X: i32 = 16;

/// Chunk extent along the Y axis, in blocks. The world is one chunk tall.
pub const CHUNK_DIM_Y: i32 = 256;

/// Chunk extent along the Z axis, in blocks.
pub const CHUNK_DIM_Z: i32 = 16;

/// Number of cells in one chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_DIM_X * CHUNK_DIM_Y * CHUNK_DIM_Z) as usize;

/// Side length of a generation zone, in blocks.
pub const ZONE_SIZE: i32 = 64;

/// Number of chunks along one side of a generation zone.
pub const ZONE_CHUNKS: i32 = ZONE_SIZE / CHUNK_DIM_X;

/// A packed identifier for a chunk or generation zone.
///
/// The corner X coordinate occupies the high 32 bits and the corner Z
/// coordinate the low 32 bits, so a key is a single hashable integer and
/// neighbor links can be stored by value instead of by reference. Unpacking
/// sign-extends both halves, so negative corners round-trip exactly.
///
/// The same packing serves chunk corners (multiples of 16) and zone corners
/// (multiples of 64); the two are never mixed in one map.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey(pub i64);

impl ChunkKey {
    /// Packs a corner coordinate pair into a key.
    ///
    /// # Arguments
    /// * `x` - The corner X coordinate
    /// * `z` - The corner Z coordinate
    ///
    /// # Returns
    /// The packed key.
    pub fn from_corner(x: i32, z: i32) -> Self {
        ChunkKey(((x as i64) << 32) | ((z as i64) & 0xffff_ffff))
    }

    /// Returns the key of the chunk containing the given world column.
    pub fn chunk_at(x: i32, z: i32) -> Self {
        Self::from_corner(floor_multiple(x, CHUNK_DIM_X), floor_multiple(z, CHUNK_DIM_Z))
    }

    /// Returns the key of the generation zone containing the given world
    /// column.
    pub fn zone_at(x: i32, z: i32) -> Self {
        Self::from_corner(floor_multiple(x, ZONE_SIZE), floor_multiple(z, ZONE_SIZE))
    }

    /// Returns the corner X coordinate, sign-extended from the high bits.
    pub fn x(&self) -> i32 {
        (self.0 >> 32) as i32
    }

    /// Returns the corner Z coordinate, sign-extended from the low bits.
    pub fn z(&self) -> i32 {
        self.0 as i32
    }

    /// Returns the key offset by a whole number of steps of the given stride.
    ///
    /// # Arguments
    /// * `dx` - Steps along X
    /// * `dz` - Steps along Z
    /// * `stride` - Blocks per step (`CHUNK_DIM_X` for chunks, `ZONE_SIZE`
    ///   for zones)
    pub fn offset(&self, dx: i32, dz: i32, stride: i32) -> Self {
        Self::from_corner(self.x() + dx * stride, self.z() + dz * stride)
    }

    /// Returns the keys of the 16 chunks making up the zone this key names.
    pub fn zone_chunks(&self) -> impl Iterator<Item = ChunkKey> + '_ {
        let (x, z) = (self.x(), self.z());
        (0..ZONE_CHUNKS).flat_map(move |cx| {
            (0..ZONE_CHUNKS)
                .map(move |cz| ChunkKey::from_corner(x + cx * CHUNK_DIM_X, z + cz * CHUNK_DIM_Z))
        })
    }
}

impl std::fmt::Debug for ChunkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChunkKey({}, {})", self.x(), self.z())
    }
}

/// Floors `v` to the nearest multiple of `m` at or below it.
///
/// Unlike truncating division this rounds towards negative infinity, so
/// negative coordinates land in the correct cell.
pub fn floor_multiple(v: i32, m: i32) -> i32 {
    v.div_euclid(m) * m
}

/// Converts a world block coordinate to chunk-local coordinates.
///
/// Y passes through unchanged; X and Z wrap into `[0, 16)`.
pub fn world_to_local(pos: Vector3<i32>) -> Vector3<i32> {
    Vector3::new(
        pos.x.rem_euclid(CHUNK_DIM_X),
        pos.y,
        pos.z.rem_euclid(CHUNK_DIM_Z),
    )
}

/// Computes the linear cell index for in-bounds chunk-local coordinates.
///
/// The layout is X fastest, then Y, then Z: `x + 16y + 4096z`.
///
/// # Panics
/// Panics if any coordinate is outside the chunk. Out-of-bounds local
/// coordinates must never alias another cell.
pub fn linear_index(x: i32, y: i32, z: i32) -> usize {
    assert!(
        (0..CHUNK_DIM_X).contains(&x)
            && (0..CHUNK_DIM_Y).contains(&y)
            && (0..CHUNK_DIM_Z).contains(&z),
        "chunk-local coordinates ({x}, {y}, {z}) out of bounds"
    );
    (x + CHUNK_DIM_X * y + CHUNK_DIM_X * CHUNK_DIM_Y * z) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn key_round_trips(x in i32::MIN..=i32::MAX, z in i32::MIN..=i32::MAX) {
            let key = ChunkKey::from_corner(x, z);
            prop_assert_eq!(key.x(), x);
            prop_assert_eq!(key.z(), z);
        }

        #[test]
        fn distinct_corners_pack_to_distinct_keys(
            a in (-1_000_000i32..1_000_000, -1_000_000i32..1_000_000),
            b in (-1_000_000i32..1_000_000, -1_000_000i32..1_000_000),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(
                ChunkKey::from_corner(a.0, a.1),
                ChunkKey::from_corner(b.0, b.1)
            );
        }

        #[test]
        fn linear_index_is_a_bijection(
            x in 0..CHUNK_DIM_X, y in 0..CHUNK_DIM_Y, z in 0..CHUNK_DIM_Z,
        ) {
            let index = linear_index(x, y, z);
            prop_assert!(index < CHUNK_VOLUME);
            let rz = index as i32 / (CHUNK_DIM_X * CHUNK_DIM_Y);
            let ry = (index as i32 / CHUNK_DIM_X) % CHUNK_DIM_Y;
            let rx = index as i32 % CHUNK_DIM_X;
            prop_assert_eq!((rx, ry, rz), (x, y, z));
        }
    }

    #[test]
    fn negative_columns_floor_towards_negative_infinity() {
        assert_eq!(ChunkKey::chunk_at(-1, -1), ChunkKey::from_corner(-16, -16));
        assert_eq!(ChunkKey::chunk_at(-16, -17), ChunkKey::from_corner(-16, -32));
        assert_eq!(ChunkKey::zone_at(-1, 63), ChunkKey::from_corner(-64, 0));
    }

    #[test]
    fn world_to_local_wraps_negatives() {
        let local = world_to_local(Vector3::new(-1, 40, -33));
        assert_eq!(local, Vector3::new(15, 40, 15));
    }

    #[test]
    fn zone_chunks_enumerates_the_full_grid() {
        let zone = ChunkKey::from_corner(-64, 128);
        let chunks: Vec<ChunkKey> = zone.zone_chunks().collect();
        assert_eq!(chunks.len(), 16);
        for key in &chunks {
            assert_eq!(ChunkKey::zone_at(key.x(), key.z()), zone);
        }
    }

    #[test]
    #[should_panic]
    fn linear_index_rejects_out_of_bounds() {
        linear_index(16, 0, 0);
    }
}
