//! Scripted movement loop

use bounds_engine::foundation::math::Vec3;
use bounds_engine::scene::{NodeId, SceneError, SceneGraph};
use log::{debug, info};
use thiserror::Error;

use crate::config::MovementConfig;

/// How far below the player to look for ground
const GROUND_CHECK_DEPTH: f32 = 0.1;

/// Demo failures
#[derive(Error, Debug)]
pub enum AppError {
    /// Config file could not be read or written
    #[error("Config error: {0}")]
    Config(#[from] bounds_engine::config::ConfigError),

    /// Scene could not be built or queried
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// The configured player node does not exist
    #[error("Player node '{0}' not found")]
    MissingPlayer(String),
}

/// Moves one node through a scene, resolving collisions each frame
pub struct MovementApp {
    config: MovementConfig,
    scene: SceneGraph,
    player: NodeId,
    obstacles: Vec<NodeId>,
    vertical_speed: f32,
    grounded: bool,
}

impl MovementApp {
    /// Build the scene described by `config`
    pub fn new(config: MovementConfig) -> Result<Self, AppError> {
        let scene = SceneGraph::from_description(&config.scene)?;
        let player = scene
            .find_by_name(&config.player)
            .ok_or_else(|| AppError::MissingPlayer(config.player.clone()))?;

        // Everything else with a volume blocks the player
        let obstacles: Vec<NodeId> = scene
            .all_bounds()
            .iter()
            .map(|bounds| bounds.id())
            .filter(|id| *id != player)
            .collect();
        info!("Player '{}' against {} obstacles", config.player, obstacles.len());

        Ok(Self {
            config,
            scene,
            player,
            obstacles,
            vertical_speed: 0.0,
            grounded: false,
        })
    }

    /// Current world position of the player
    pub fn player_position(&self) -> Vec3 {
        self.scene
            .world_transform(self.player)
            .map_or_else(Vec3::zeros, |transform| transform.position)
    }

    /// Whether the last frame ended standing on something
    pub fn grounded(&self) -> bool {
        self.grounded
    }

    /// Scene being simulated
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Run every configured frame
    pub fn run(&mut self) -> Result<(), AppError> {
        for frame in 0..self.config.frames {
            self.step()?;
            let position = self.player_position();
            info!(
                "Frame {frame}: player at ({:.3}, {:.3}, {:.3}){}",
                position.x,
                position.y,
                position.z,
                if self.grounded { " grounded" } else { "" }
            );
        }
        Ok(())
    }

    /// Advance one frame
    pub fn step(&mut self) -> Result<(), AppError> {
        let dt = self.config.time_step;
        if self.grounded {
            self.vertical_speed = 0.0;
        }
        self.vertical_speed -= self.config.gravity * dt;

        let input = self
            .config
            .input_direction
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros);
        let mut delta = input * self.config.move_speed * dt + Vec3::y() * self.vertical_speed * dt;

        // Slide along whatever the move would hit, nearest first
        let ahead = self.scene.collision_test(self.player, delta, &self.obstacles)?;
        for collision in &ahead {
            delta = collision.slide_against_average_normal(delta);
        }
        self.scene.translate(self.player, delta)?;

        self.resolve_penetration()?;
        self.grounded = self.check_ground()?;
        Ok(())
    }

    fn check_ground(&self) -> Result<bool, AppError> {
        let below = self
            .scene
            .collision_test(self.player, Vec3::new(0.0, -GROUND_CHECK_DEPTH, 0.0), &self.obstacles)?;
        Ok(below.iter().any(|collision| collision.average_normal().y > 0.5))
    }

    fn resolve_penetration(&mut self) -> Result<(), AppError> {
        for pass in 0..self.config.max_resolution_passes {
            let overlaps = self.scene.collision_test(self.player, Vec3::zeros(), &self.obstacles)?;
            let Some(nearest) = overlaps.first() else {
                break;
            };

            let push = nearest.average_mtv();
            debug!("Resolution pass {pass}: pushing by {:?}", push.as_slice());
            self.scene.translate(self.player, push)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_lands_on_floor_and_stops_at_wall() {
        let mut app = MovementApp::new(MovementConfig::default()).unwrap();
        for _ in 0..240 {
            app.step().unwrap();
        }

        let position = app.player_position();
        // Capsule of height 2 rests with its centre about one unit up
        assert!(position.y > 0.9 && position.y < 1.5, "y = {}", position.y);
        // Wall face is at x = 4.5 and the capsule radius is 0.5
        assert!(position.x < 4.01, "x = {}", position.x);
        assert!(app.grounded());
    }

    #[test]
    fn test_missing_player_is_reported() {
        let config = MovementConfig { player: "ghost".to_string(), ..MovementConfig::default() };
        assert!(matches!(MovementApp::new(config), Err(AppError::MissingPlayer(_))));
    }

    #[test]
    fn test_obstacles_exclude_player() {
        let app = MovementApp::new(MovementConfig::default()).unwrap();
        assert_eq!(app.obstacles.len(), 4);
        assert!(!app.obstacles.contains(&app.player));
        assert_eq!(app.scene().len(), 5);
    }
}
