//! # Terrain Generation Module
//!
//! This module turns world coordinates into voxels. Generation is purely
//! functional over (seed, position): filling the same chunk twice produces
//! identical blocks, which is what makes zone-level deduplication safe.
//!
//! ## Structure
//! Each column gets four candidate surface heights, one per biome, from
//! independent noise fields. A low-frequency two-channel selector blends the
//! four heights bilinearly into the column's final height and picks the
//! dominant biome for block selection. Below sea level, empty cells are
//! flooded from y = 127 downward until the first solid block.

use cgmath::Vector3;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin, Seedable};

use crate::voxels::chunk::Chunk;
use crate::voxels::coords::{CHUNK_DIM_X, CHUNK_DIM_Z};
use crate::voxels::block::BlockType;

/// Top of the water table. Empty cells at or below this height are flooded.
pub const SEA_LEVEL: i32 = 127;

/// The four terrain biomes. The selector's Y channel separates low terrain
/// (desert, island) from high terrain (grassland, mountain); the X channel
/// separates the pair members.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Biome {
    Grassland,
    Mountain,
    Desert,
    Island,
}

/// Candidate surface heights for one column, one per biome.
///
/// All four are always computed: the blend needs every height, and the block
/// rules consult the desert height even inside other biomes (to keep red
/// clay exclusive to true desert pillars).
#[derive(Copy, Clone, Debug)]
pub struct BiomeHeights {
    pub grassland: f64,
    pub desert: f64,
    pub mountain: f64,
    pub island: f64,
}

/// Seeded noise fields for terrain generation.
///
/// Construction is cheap; one generator is shared read-only across all
/// worker threads for the lifetime of the terrain.
pub struct TerrainGenerator {
    grassland: Fbm<Perlin>,
    desert_base: Fbm<Perlin>,
    desert_pillar: Perlin,
    mountain: Fbm<Perlin>,
    island: Fbm<Perlin>,
    biome_x: Perlin,
    biome_y: Perlin,
    patch: Perlin,
}

impl TerrainGenerator {
    /// Creates a generator with every noise field derived from one seed.
    ///
    /// # Arguments
    /// * `seed` - The world seed. Fields are salted with distinct offsets so
    ///   they decorrelate.
    pub fn new(seed: u32) -> Self {
        Self {
            grassland: Fbm::<Perlin>::new(seed).set_octaves(5),
            desert_base: Fbm::<Perlin>::new(seed.wrapping_add(1)).set_octaves(4),
            desert_pillar: Perlin::new(seed.wrapping_add(2)),
            mountain: Fbm::<Perlin>::new(seed.wrapping_add(3)).set_octaves(6),
            island: Fbm::<Perlin>::new(seed.wrapping_add(4)).set_octaves(4),
            biome_x: Perlin::new(seed.wrapping_add(5)),
            biome_y: Perlin::new(seed.wrapping_add(6)),
            patch: Perlin::new(seed.wrapping_add(7)),
        }
    }

    /// Rolling grassland height: gentle variation around y = 129.
    pub fn grassland_height(&self, x: f64, z: f64) -> f64 {
        129.0 + 16.0 * self.grassland.get([x / 256.0, z / 256.0])
    }

    /// Desert height: nearly flat dunes, punctured by steep clay pillars
    /// where a high-frequency field exceeds its threshold.
    pub fn desert_height(&self, x: f64, z: f64) -> f64 {
        let dunes = 132.0 + 3.0 * self.desert_base.get([x / 128.0, z / 128.0]);
        let pillar = smoothstep(0.6, 0.75, self.desert_pillar.get([x / 24.0, z / 24.0]));
        dunes + 26.0 * pillar
    }

    /// Mountain height: a wide field raised to a power, so most terrain sits
    /// low with occasional sharp peaks reaching towards y = 230.
    pub fn mountain_height(&self, x: f64, z: f64) -> f64 {
        let base = 0.5 * (self.mountain.get([x / 512.0, z / 512.0]) + 1.0);
        130.0 + 100.0 * base.powf(1.8)
    }

    /// Island height: low mounds that mostly stay near or below sea level,
    /// so the water table turns them into an archipelago.
    pub fn island_height(&self, x: f64, z: f64) -> f64 {
        118.0 + 24.0 * 0.5 * (self.island.get([x / 300.0, z / 300.0]) + 1.0)
    }

    /// Samples the two-channel biome selector for a column.
    ///
    /// Each channel is mapped to `[0, 1]` and pushed towards the extremes by
    /// two smoothsteps, so biome interiors are large and transitions narrow.
    pub fn biome_selector(&self, x: f64, z: f64) -> (f64, f64) {
        let raw_x = 0.5 * (self.biome_x.get([x / 750.0, z / 750.0]) + 1.0);
        let raw_y = 0.5 * (self.biome_y.get([x / 750.0, z / 750.0]) + 1.0);
        (
            smoothstep(0.0, 1.0, smoothstep(0.25, 0.75, raw_x)),
            smoothstep(0.0, 1.0, smoothstep(0.25, 0.75, raw_y)),
        )
    }

    /// Computes all four candidate heights for a column.
    pub fn biome_heights(&self, x: f64, z: f64) -> BiomeHeights {
        BiomeHeights {
            grassland: self.grassland_height(x, z),
            desert: self.desert_height(x, z),
            mountain: self.mountain_height(x, z),
            island: self.island_height(x, z),
        }
    }

    /// Chooses the block type for one cell of a column.
    ///
    /// # Arguments
    /// * `pos` - The cell's world position
    /// * `max_height` - The column's final blended height, truncated
    /// * `biome` - The column's dominant biome
    /// * `heights` - The column's candidate heights
    pub fn block_for(
        &self,
        pos: Vector3<i32>,
        max_height: i32,
        biome: Biome,
        heights: &BiomeHeights,
    ) -> BlockType {
        match biome {
            Biome::Grassland => {
                // A raised desert height inside grassland means the column is
                // blending with a pillar; expose stone there instead of grass.
                if pos.y < 127 || heights.desert >= 134.0 {
                    BlockType::Stone
                } else if pos.y < max_height {
                    BlockType::Dirt
                } else if pos.y < 145 && heights.desert < 134.0 {
                    BlockType::Grass
                } else {
                    self.dirt_stone_patch(pos)
                }
            }
            Biome::Desert => {
                if pos.y < 127 {
                    BlockType::Stone
                // Only true desert pillars get red clay; any height above 134
                // produced by biome interpolation stays sand.
                } else if pos.y < 134 || (pos.y as f64) > heights.desert {
                    BlockType::Sand
                } else {
                    BlockType::RedClay
                }
            }
            Biome::Mountain => {
                if pos.y < 128 {
                    BlockType::Stone
                } else if pos.y < 200 || pos.y < max_height {
                    self.dirt_stone_patch(pos)
                } else {
                    BlockType::Snow
                }
            }
            Biome::Island => {
                if pos.y < 127 {
                    BlockType::Stone
                } else if pos.y < 130 {
                    BlockType::Sand
                } else if pos.y < max_height {
                    BlockType::Dirt
                } else if pos.y < 145 {
                    BlockType::Grass
                } else {
                    BlockType::Stone
                }
            }
        }
    }

    /// Mottled dirt/stone surface used by grassland peaks and mountains.
    /// Sampled at the world position so the pattern never repeats with the
    /// chunk grid.
    fn dirt_stone_patch(&self, pos: Vector3<i32>) -> BlockType {
        let sample = self.patch.get([
            pos.x as f64 / 8.0,
            pos.y as f64 / 8.0,
            pos.z as f64 / 8.0,
        ]);
        if sample > 0.2 {
            BlockType::Dirt
        } else {
            BlockType::Stone
        }
    }

    /// Fills one chunk with generated terrain.
    ///
    /// Each column is generated independently: candidate heights are blended
    /// by the biome selector, cells up to the blended height are filled
    /// according to the dominant biome's rules, and the water table floods
    /// remaining empty cells from `SEA_LEVEL` downward.
    pub fn fill_chunk(&self, chunk: &mut Chunk) {
        let corner_x = chunk.key().x();
        let corner_z = chunk.key().z();
        for x in 0..CHUNK_DIM_X {
            for z in 0..CHUNK_DIM_Z {
                let world_x = (corner_x + x) as f64;
                let world_z = (corner_z + z) as f64;
                let (sx, sy) = self.biome_selector(world_x, world_z);
                let heights = self.biome_heights(world_x, world_z);
                let column_height = blend_heights(&heights, sx, sy);
                let biome = biome_map(sx, sy);
                let max_height = column_height as i32;

                let top = column_height.ceil() as i32;
                for y in 0..top {
                    let world_pos = Vector3::new(corner_x + x, y, corner_z + z);
                    let block_type = self.block_for(world_pos, max_height, biome, &heights);
                    chunk.set_block_local(x, y, z, block_type);
                }
                for y in (0..=SEA_LEVEL).rev() {
                    if !chunk.block_local(x, y, z).is_empty() {
                        break;
                    }
                    chunk.set_block_local(x, y, z, BlockType::Water);
                }
            }
        }
    }
}

/// Maps a selector sample to the dominant biome by quadrant.
///
/// Low Y is desert/island, high Y is grassland/mountain; low X picks the
/// first of each pair.
pub fn biome_map(sx: f64, sy: f64) -> Biome {
    if sy < 0.5 {
        if sx < 0.5 {
            Biome::Desert
        } else {
            Biome::Island
        }
    } else if sx < 0.5 {
        Biome::Grassland
    } else {
        Biome::Mountain
    }
}

/// Bilinearly blends the four candidate heights by the selector and clamps
/// the result into the world's vertical range.
pub fn blend_heights(heights: &BiomeHeights, sx: f64, sy: f64) -> f64 {
    let low = mix(heights.desert, heights.island, sx);
    let high = mix(heights.grassland, heights.mountain, sx);
    mix(low, high, sy).clamp(0.0, 255.0)
}

fn mix(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Hermite smoothstep with edge clamping, matching the GLSL builtin.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::coords::ChunkKey;
    use proptest::prelude::*;

    #[test]
    fn biome_quadrants() {
        assert_eq!(biome_map(0.2, 0.2), Biome::Desert);
        assert_eq!(biome_map(0.8, 0.2), Biome::Island);
        assert_eq!(biome_map(0.2, 0.8), Biome::Grassland);
        assert_eq!(biome_map(0.8, 0.8), Biome::Mountain);
    }

    #[test]
    fn smoothstep_clamps_and_interpolates() {
        assert_eq!(smoothstep(0.25, 0.75, 0.0), 0.0);
        assert_eq!(smoothstep(0.25, 0.75, 1.0), 1.0);
        assert_eq!(smoothstep(0.25, 0.75, 0.5), 0.5);
        assert!(smoothstep(0.25, 0.75, 0.3) < 0.3);
    }

    proptest! {
        #[test]
        fn blended_height_stays_in_world_range(
            grassland in -1000.0f64..1000.0,
            desert in -1000.0f64..1000.0,
            mountain in -1000.0f64..1000.0,
            island in -1000.0f64..1000.0,
            sx in 0.0f64..=1.0,
            sy in 0.0f64..=1.0,
        ) {
            let heights = BiomeHeights { grassland, desert, mountain, island };
            let blended = blend_heights(&heights, sx, sy);
            prop_assert!((0.0..=255.0).contains(&blended));
        }
    }

    #[test]
    fn blend_is_exact_at_selector_corners() {
        let heights = BiomeHeights {
            grassland: 140.0,
            desert: 130.0,
            mountain: 220.0,
            island: 120.0,
        };
        assert_eq!(blend_heights(&heights, 0.0, 0.0), 130.0);
        assert_eq!(blend_heights(&heights, 1.0, 0.0), 120.0);
        assert_eq!(blend_heights(&heights, 0.0, 1.0), 140.0);
        assert_eq!(blend_heights(&heights, 1.0, 1.0), 220.0);
    }

    #[test]
    fn generation_is_deterministic() {
        let generator_a = TerrainGenerator::new(1234);
        let generator_b = TerrainGenerator::new(1234);
        let key = ChunkKey::from_corner(-64, 112);
        let mut chunk_a = Chunk::new(key);
        let mut chunk_b = Chunk::new(key);
        generator_a.fill_chunk(&mut chunk_a);
        generator_b.fill_chunk(&mut chunk_b);
        for x in 0..16 {
            for y in 0..256 {
                for z in 0..16 {
                    assert_eq!(chunk_a.block_local(x, y, z), chunk_b.block_local(x, y, z));
                }
            }
        }
    }

    #[test]
    fn columns_are_solid_below_surface_and_wet_at_sea_level() {
        let generator = TerrainGenerator::new(7);
        let mut chunk = Chunk::new(ChunkKey::from_corner(0, 0));
        generator.fill_chunk(&mut chunk);
        for x in 0..16 {
            for z in 0..16 {
                // Deep underground is always stone.
                assert_eq!(chunk.block_local(x, 0, z), BlockType::Stone);
                assert_eq!(chunk.block_local(x, 100, z), BlockType::Stone);
                // At or below the sea level cap, no cell is left empty.
                for y in 0..=SEA_LEVEL {
                    assert!(!chunk.block_local(x, y, z).is_empty());
                }
            }
        }
    }

    #[test]
    fn water_never_floats_above_solid_gaps() {
        let generator = TerrainGenerator::new(99);
        let mut chunk = Chunk::new(ChunkKey::from_corner(256, -512));
        generator.fill_chunk(&mut chunk);
        // Water only appears in the contiguous run of previously-empty cells
        // reaching down from sea level, so below any water cell there is
        // never an empty cell.
        for x in 0..16 {
            for z in 0..16 {
                let mut seen_water = false;
                for y in (0..=SEA_LEVEL).rev() {
                    match chunk.block_local(x, y, z) {
                        BlockType::Water => seen_water = true,
                        BlockType::Empty => assert!(!seen_water),
                        _ => {}
                    }
                }
            }
        }
    }
}
