//! # Grid March Module
//!
//! Voxel ray casting for interaction and collision.
//!
//! Two entry points share the same stepping scheme:
//! - `grid_march` walks a ray through every cell boundary it crosses and
//!   reports the first non-empty cell. Interaction code uses it to find the
//!   block under the crosshair.
//! - `grid_march_axis` restricts the march to a single axis of a movement
//!   vector. Collision code calls it once per axis so the player slides
//!   along walls instead of stopping dead.
//!
//! The ray's length is its direction vector's magnitude; both functions
//! never look past it. Cells above or below the world read as empty, so
//! rays pass through open sky without error, but a ray entering a column
//! with no chunk is a real error the caller must handle.

use cgmath::{InnerSpace, Vector3};

use crate::error::TerrainError;
use crate::voxels::coords::CHUNK_DIM_Y;
use crate::voxels::world::Terrain;

/// The first solid cell a ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The world cell containing the non-empty block.
    pub cell: Vector3<i32>,
    /// Distance along the ray to the cell boundary where it was hit.
    pub distance: f32,
}

/// The outcome of marching one axis of a movement vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMarch {
    /// `true` if a non-empty cell blocks movement along this axis.
    pub blocked: bool,
    /// Distance that can be travelled along this axis before the
    /// obstruction (the full component length if unblocked).
    pub distance: f32,
}

/// Marches a ray through the voxel grid and returns the first non-empty
/// cell, if any within the ray's length.
///
/// # Arguments
/// * `origin` - The ray's starting point
/// * `direction` - The ray's direction; its magnitude is the search length
/// * `terrain` - The terrain to sample
///
/// # Returns
/// `Ok(Some(hit))` on a hit, `Ok(None)` if the ray stays in empty cells,
/// `TerrainError::DegenerateRay` for an all-zero direction, or
/// `TerrainError::MissingChunk` if the ray enters an ungenerated column.
pub fn grid_march(
    origin: Vector3<f32>,
    direction: Vector3<f32>,
    terrain: &Terrain,
) -> Result<Option<RayHit>, TerrainError> {
    if direction == Vector3::new(0.0, 0.0, 0.0) {
        return Err(TerrainError::DegenerateRay);
    }
    let max_len = direction.magnitude();
    let direction = direction.normalize();
    let mut ray_origin = origin;
    let mut curr_cell = floor_cell(ray_origin);

    let mut curr_t = 0.0f32;
    while curr_t < max_len {
        let mut min_t = 3.0f32.sqrt();
        let mut interface_axis = None;
        for i in 0..3 {
            if direction[i] != 0.0 {
                let mut offset = direction[i].signum().max(0.0);
                // A ray starting exactly on a boundary and looking in the
                // negative direction must step into the previous cell, not
                // re-test the boundary forever.
                if curr_cell[i] as f32 == ray_origin[i] && offset == 0.0 {
                    offset = -1.0;
                }
                let next_intercept = curr_cell[i] as f32 + offset;
                let axis_t = ((next_intercept - ray_origin[i]) / direction[i]).min(max_len);
                if axis_t < min_t {
                    min_t = axis_t;
                    interface_axis = Some(i);
                }
            }
        }
        let Some(axis) = interface_axis else {
            return Err(TerrainError::DegenerateRay);
        };
        curr_t += min_t;
        ray_origin += direction * min_t;
        let mut cell_offset = Vector3::new(0, 0, 0);
        if direction[axis] < 0.0 {
            cell_offset[axis] = -1;
        }
        curr_cell = floor_cell(ray_origin) + cell_offset;

        let cell_type = terrain.block_at_world(curr_cell)?;
        if !cell_type.is_empty() {
            return Ok(Some(RayHit {
                cell: curr_cell,
                distance: curr_t.min(max_len),
            }));
        }
    }
    Ok(None)
}

/// Marches a single axis of a movement vector.
///
/// Only boundaries along `axis` are considered; the other components of the
/// direction still shape the path, so diagonal movement tests each wall it
/// grazes. A zero component on the marched axis means no movement and no
/// obstruction.
///
/// # Arguments
/// * `origin` - The starting point
/// * `direction` - The full movement vector for this step
/// * `axis` - The axis to march: 0 for X, 1 for Y, 2 for Z
/// * `terrain` - The terrain to sample
pub fn grid_march_axis(
    origin: Vector3<f32>,
    direction: Vector3<f32>,
    axis: usize,
    terrain: &Terrain,
) -> Result<AxisMarch, TerrainError> {
    let max_len = direction[axis].abs();
    if direction[axis] == 0.0 {
        return Ok(AxisMarch {
            blocked: false,
            distance: 0.0,
        });
    }
    let direction = direction.normalize();
    let mut ray_origin = origin;
    let mut curr_cell = floor_cell(ray_origin);

    let mut curr_t = 0.0f32;
    while curr_t < max_len {
        let offset = direction[axis].signum().max(0.0);
        let next_intercept = curr_cell[axis] as f32 + offset;
        let axis_t = (next_intercept - ray_origin[axis]) / direction[axis];
        curr_t = (curr_t + axis_t).min(max_len);
        ray_origin += direction * axis_t.min(max_len);
        let mut cell_offset = Vector3::new(0, 0, 0);
        if direction[axis] < 0.0 {
            cell_offset[axis] = -1;
        }
        curr_cell = floor_cell(ray_origin) + cell_offset;
        // Leaving the world vertically ends the march unobstructed.
        if curr_cell.y < 0 || curr_cell.y >= CHUNK_DIM_Y {
            return Ok(AxisMarch {
                blocked: false,
                distance: max_len,
            });
        }

        let cell_type = terrain.block_at_world(curr_cell)?;
        if !cell_type.is_empty() {
            return Ok(AxisMarch {
                blocked: true,
                distance: curr_t.min(max_len),
            });
        }
    }
    Ok(AxisMarch {
        blocked: false,
        distance: curr_t.min(max_len),
    })
}

fn floor_cell(pos: Vector3<f32>) -> Vector3<i32> {
    Vector3::new(
        pos.x.floor() as i32,
        pos.y.floor() as i32,
        pos.z.floor() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::BlockType;
    use crate::voxels::coords::ChunkKey;

    fn floor_terrain() -> Terrain {
        let mut terrain = Terrain::new();
        for key in ChunkKey::from_corner(0, 0).zone_chunks() {
            let handle = terrain.instantiate_chunk_at(key.x(), key.z());
            let mut chunk = handle.get_mut();
            for x in 0..16 {
                for z in 0..16 {
                    chunk.set_block_local(x, 100, z, BlockType::Stone);
                }
            }
        }
        terrain
    }

    #[test]
    fn downward_ray_hits_the_floor() {
        let terrain = floor_terrain();
        let hit = grid_march(
            Vector3::new(8.5, 105.5, 8.5),
            Vector3::new(0.0, -10.0, 0.0),
            &terrain,
        )
        .unwrap()
        .expect("should hit");
        assert_eq!(hit.cell, Vector3::new(8, 100, 8));
        assert!((hit.distance - 4.5).abs() < 1e-4);
    }

    #[test]
    fn short_ray_stops_before_the_floor() {
        let terrain = floor_terrain();
        let hit = grid_march(
            Vector3::new(8.5, 105.5, 8.5),
            Vector3::new(0.0, -2.0, 0.0),
            &terrain,
        )
        .unwrap();
        assert_eq!(hit, None);
    }

    #[test]
    fn diagonal_ray_finds_the_entry_cell() {
        let terrain = floor_terrain();
        let hit = grid_march(
            Vector3::new(4.5, 103.5, 4.5),
            Vector3::new(3.0, -6.0, 3.0),
            &terrain,
        )
        .unwrap()
        .expect("should hit");
        assert_eq!(hit.cell.y, 100);
    }

    #[test]
    fn zero_direction_is_rejected() {
        let terrain = floor_terrain();
        assert_eq!(
            grid_march(Vector3::new(8.0, 105.0, 8.0), Vector3::new(0.0, 0.0, 0.0), &terrain),
            Err(TerrainError::DegenerateRay)
        );
    }

    #[test]
    fn ray_into_ungenerated_column_is_an_error() {
        let terrain = floor_terrain();
        let result = grid_march(
            Vector3::new(63.5, 101.5, 8.5),
            Vector3::new(10.0, 0.0, 0.0),
            &terrain,
        );
        assert!(matches!(result, Err(TerrainError::MissingChunk { .. })));
    }

    #[test]
    fn axis_march_with_zero_component_is_unblocked() {
        let terrain = floor_terrain();
        let march = grid_march_axis(
            Vector3::new(8.5, 105.5, 8.5),
            Vector3::new(1.0, 0.0, 0.0),
            1,
            &terrain,
        )
        .unwrap();
        assert!(!march.blocked);
        assert_eq!(march.distance, 0.0);
    }

    #[test]
    fn axis_march_stops_at_the_floor() {
        let terrain = floor_terrain();
        let march = grid_march_axis(
            Vector3::new(8.5, 105.5, 8.5),
            Vector3::new(0.0, -10.0, 0.0),
            1,
            &terrain,
        )
        .unwrap();
        assert!(march.blocked);
        assert!(march.distance < 10.0);
        assert!((march.distance - 4.5).abs() < 1e-4);
    }

    #[test]
    fn axis_march_above_the_world_is_unblocked() {
        let terrain = floor_terrain();
        let march = grid_march_axis(
            Vector3::new(8.5, 255.5, 8.5),
            Vector3::new(0.0, 3.0, 0.0),
            1,
            &terrain,
        )
        .unwrap();
        assert!(!march.blocked);
    }
}
