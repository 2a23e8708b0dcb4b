//! Persisted configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GRID_WIDTH, DEFAULT_SLIDER, DEFAULT_TICK_INTERVAL_MS};
use crate::mesh::Mesh;
use crate::params::ImageAdjustments;

/// Startup configuration. Missing fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Nodes across the sheet.
    #[serde(default = "default_grid_width")]
    pub grid_width: usize,
    /// Interval of the timer-driven tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Home speed slider position in `[0, 1]` applied at startup. Reset
    /// always returns to the midpoint.
    #[serde(default = "default_slider")]
    pub home_speed_slider: f32,
    /// Damping slider position in `[0, 1]` applied at startup.
    #[serde(default = "default_slider")]
    pub damping_slider: f32,
    #[serde(default)]
    pub adjustments: ImageAdjustments,
    /// Image used as the sheet texture.
    #[serde(default)]
    pub texture_path: Option<PathBuf>,
}

fn default_grid_width() -> usize {
    DEFAULT_GRID_WIDTH
}
fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}
fn default_slider() -> f32 {
    DEFAULT_SLIDER
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            grid_width: default_grid_width(),
            tick_interval_ms: default_tick_interval_ms(),
            home_speed_slider: default_slider(),
            damping_slider: default_slider(),
            adjustments: ImageAdjustments::default(),
            texture_path: None,
        }
    }
}

impl MeshConfig {
    /// Uninitialized mesh with this configuration's grid width.
    pub fn build_mesh(&self) -> Mesh {
        Mesh::new(self.grid_width)
    }

    /// Apply the startup slider positions. Call after
    /// [`Mesh::initialize`], which resets parameters to their defaults.
    pub fn apply_sliders(&self, mesh: &mut Mesh) {
        mesh.set_home_speed(self.home_speed_slider);
        mesh.set_damping(self.damping_slider);
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Save configuration to JSON file
    pub fn save_json(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_json(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DAMPING_RANGE, HOME_SPEED_RANGE};

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: MeshConfig = serde_json::from_str(r#"{ "grid_width": 40 }"#).unwrap();
        assert_eq!(config.grid_width, 40);
        assert_eq!(config.tick_interval_ms, 50);
        assert_eq!(config.home_speed_slider, 0.5);
        assert_eq!(config.adjustments, ImageAdjustments::default());
        assert!(config.texture_path.is_none());
    }

    #[test]
    fn test_partial_adjustments() {
        let config: MeshConfig =
            serde_json::from_str(r#"{ "adjustments": { "effects_enabled": true } }"#).unwrap();
        assert!(config.adjustments.effects_enabled);
        assert_eq!(config.adjustments.posterize, 17.0);
    }

    #[test]
    fn test_json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("mesh_config_{}.json", std::process::id()));
        let config = MeshConfig {
            grid_width: 32,
            tick_interval_ms: 16,
            texture_path: Some(PathBuf::from("copper.png")),
            ..MeshConfig::default()
        };

        config.save_json(&path).unwrap();
        let loaded = MeshConfig::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(MeshConfig::load_json(Path::new("/nonexistent/mesh.json")).is_err());
    }

    #[test]
    fn test_sliders_survive_initialize() {
        let config = MeshConfig {
            grid_width: 10,
            home_speed_slider: 1.0,
            damping_slider: 0.0,
            ..MeshConfig::default()
        };
        let mut mesh = config.build_mesh();
        assert!(!mesh.is_initialized());

        mesh.initialize(640, 480).unwrap();
        config.apply_sliders(&mut mesh);

        assert_eq!(mesh.grid().unwrap().width, 10);
        assert_eq!(mesh.params.home_speed, HOME_SPEED_RANGE.map(1.0));
        assert_eq!(mesh.params.damping, DAMPING_RANGE.map(0.0));
    }

    #[test]
    fn test_oversized_grid_width_is_an_error() {
        let config: MeshConfig =
            serde_json::from_str(r#"{ "grid_width": 9000000000000000000 }"#).unwrap();
        let mut mesh = config.build_mesh();

        let result = mesh.initialize(800, 600);
        assert!(matches!(result, Err(crate::MeshError::TooManyNodes { .. })));
        assert!(!mesh.is_initialized());
        assert!(mesh.vertices().is_empty());
    }
}
