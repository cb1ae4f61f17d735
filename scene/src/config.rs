use crate::error::{SceneError, SceneResult};
use common::vector::Vec2;
use quadtree::quadtree::Config;
use tracing::warn;

/// Side of one chunk in world units.
pub const DEFAULT_CHUNK_SIZE: f32 = 128.0 * 15.0;

#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub chunk_size: f32,
    /// Minimum number of chunks around the camera that are simulated.
    pub chunk_radius: usize,
    pub screen_width: f32,
    pub screen_height: f32,
    pub quadtree: Config,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_radius: 1,
            screen_width: 1920.0,
            screen_height: 1080.0,
            quadtree: Config::default(),
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> SceneResult<()> {
        let problem = if !self.chunk_size.is_finite() || self.chunk_size <= 0.0 {
            Some(format!("chunk_size must be positive, got {}", self.chunk_size))
        } else if !self.screen_width.is_finite()
            || !self.screen_height.is_finite()
            || self.screen_width <= 0.0
            || self.screen_height <= 0.0
        {
            Some(format!(
                "screen size must be positive, got {}x{}",
                self.screen_width, self.screen_height
            ))
        } else if self.quadtree.node_capacity == 0 {
            Some("quadtree node_capacity must be at least 1".to_string())
        } else {
            None
        };

        match problem {
            Some(problem) => {
                warn!(%problem, "rejected scene config");
                Err(SceneError::InvalidConfig(problem))
            }
            None => Ok(()),
        }
    }

    /// Half the screen size, the distance from the camera to a screen edge at zoom 1.
    pub fn screen_half(&self) -> Vec2 {
        Vec2::new(self.screen_width / 2.0, self.screen_height / 2.0)
    }
}
