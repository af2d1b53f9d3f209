//! # Terrain Configuration
//!
//! Runtime-tunable parameters for the terrain subsystem, loadable from a JSON
//! file so radii and worker counts can be adjusted without a rebuild.
//!
//! Every field has a default, and unknown fields are ignored, so a config file
//! only needs to name the values it wants to override:
//!
//! ```json
//! { "seed": 1337, "create_radius": 6 }
//! ```

use serde::Deserialize;

/// Tunable parameters for terrain generation and streaming.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed fed to every noise source. Two runs with the same seed produce
    /// byte-identical terrain.
    pub seed: u32,

    /// Radius, in 64-block zones, of the square region around the camera
    /// whose voxel data is kept generated.
    pub create_radius: i32,

    /// Radius, in 64-block zones, of the square region around the camera
    /// whose chunks are kept meshed and resident on the GPU. Must not exceed
    /// `create_radius`.
    pub draw_radius: i32,

    /// Number of background worker threads shared by generation and meshing.
    pub worker_count: usize,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            create_radius: 4,
            draw_radius: 3,
            worker_count: 4,
        }
    }
}

impl TerrainConfig {
    /// Parses a configuration from JSON text, falling back to defaults for
    /// any field the text omits.
    ///
    /// # Arguments
    ///
    /// * `text` - The JSON document to parse.
    ///
    /// # Returns
    ///
    /// The parsed configuration, or a `serde_json` error if the document is
    /// malformed.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut config: TerrainConfig = serde_json::from_str(text)?;
        config.clamp_radii();
        Ok(config)
    }

    /// Clamps `draw_radius` so it never exceeds `create_radius`, and forces
    /// both positive. Meshing a chunk requires its zone's voxels to exist, so
    /// drawing farther than we create can never be satisfied.
    fn clamp_radii(&mut self) {
        if self.create_radius < 1 {
            log::warn!(
                "create_radius {} is below 1, clamping",
                self.create_radius
            );
            self.create_radius = 1;
        }
        if self.draw_radius < 1 {
            log::warn!("draw_radius {} is below 1, clamping", self.draw_radius);
            self.draw_radius = 1;
        }
        if self.draw_radius > self.create_radius {
            log::warn!(
                "draw_radius {} exceeds create_radius {}, clamping",
                self.draw_radius,
                self.create_radius
            );
            self.draw_radius = self.create_radius;
        }
        if self.worker_count == 0 {
            log::warn!("worker_count 0 is invalid, using 1");
            self.worker_count = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config = TerrainConfig::from_json(r#"{ "seed": 99 }"#).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.create_radius, 4);
        assert_eq!(config.draw_radius, 3);
        assert_eq!(config.worker_count, 4);
    }

    #[test]
    fn draw_radius_clamped_to_create_radius() {
        let config =
            TerrainConfig::from_json(r#"{ "create_radius": 2, "draw_radius": 10 }"#).unwrap();
        assert_eq!(config.draw_radius, 2);
    }

    #[test]
    fn zero_worker_count_rejected() {
        let config = TerrainConfig::from_json(r#"{ "worker_count": 0 }"#).unwrap();
        assert_eq!(config.worker_count, 1);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(TerrainConfig::from_json("{ seed: }").is_err());
    }
}
