//! Demo configuration

use bounds_engine::config::{BoundsDescription, Config, NodeDescription, SceneDescription};
use bounds_engine::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Settings for the movement demo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Number of frames to simulate
    pub frames: u32,
    /// Seconds per frame
    pub time_step: f32,
    /// Horizontal speed in units per second
    pub move_speed: f32,
    /// Downward acceleration in units per second squared
    pub gravity: f32,
    /// Penetration resolution passes per frame
    pub max_resolution_passes: u32,
    /// Scripted input direction (normalized before use)
    pub input_direction: Vec3,
    /// Name of the node that moves
    pub player: String,
    /// Scene to build
    pub scene: SceneDescription,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            frames: 120,
            time_step: 1.0 / 60.0,
            move_speed: 3.0,
            gravity: 9.8,
            max_resolution_passes: 4,
            input_direction: Vec3::new(1.0, 0.0, 0.3),
            player: "player".to_string(),
            scene: default_scene(),
        }
    }
}

impl Config for MovementConfig {}

/// Floor mesh, a wall, two sphere obstacles and a capsule player
pub fn default_scene() -> SceneDescription {
    let floor = BoundsDescription::Triangles {
        vertices: vec![
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(10.0, 0.0, -10.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(-10.0, 0.0, 10.0),
        ],
        indices: vec![0, 2, 1, 0, 3, 2],
    };

    SceneDescription {
        nodes: vec![
            NodeDescription::new("floor").with_bounds(floor),
            NodeDescription::new("wall")
                .at(Vec3::new(5.0, 1.5, 0.0))
                .with_bounds(BoundsDescription::Aabb { width: 1.0, height: 3.0, depth: 10.0 }),
            NodeDescription::new("boulder")
                .at(Vec3::new(2.0, 0.5, 2.5))
                .with_bounds(BoundsDescription::Sphere { radius: 0.5 }),
            NodeDescription::new("pebble")
                .at(Vec3::new(-3.0, 0.25, 1.0))
                .with_bounds(BoundsDescription::Sphere { radius: 0.25 }),
            NodeDescription::new("player")
                .at(Vec3::new(0.0, 1.5, 0.0))
                .with_bounds(BoundsDescription::Capsule { height: 2.0, radius: 0.5 }),
        ],
    }
}
