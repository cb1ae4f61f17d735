use crate::chunk_grid::ChunkAnchor;
use collisions::GeometryCache;
use common::vector::Vec2;

/// Reference viewpoint that decides which part of the scene is simulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            position: Vec2::zeros(),
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vec2) -> Self {
        Camera {
            position,
            ..Self::default()
        }
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Half extents of the visible world area.
    pub fn view_half_extents(&self, screen_half: Vec2) -> Vec2 {
        screen_half / self.zoom
    }

    /// True when the cached AABB overlaps the visible area, edges inclusive.
    pub fn can_see(&self, cache: &GeometryCache, screen_half: Vec2) -> bool {
        let view = self.view_half_extents(screen_half);
        let offset = cache.position() - self.position;
        let half_width = cache.aabb_width / 2.0;
        let half_height = cache.aabb_height / 2.0;

        offset.x + half_width >= -view.x
            && offset.x - half_width <= view.x
            && offset.y + half_height >= -view.y
            && offset.y - half_height <= view.y
    }

    /// Chunks around the camera to simulate: enough to cover the visible
    /// area, and never fewer than `min_radius`.
    pub fn chunk_radius(&self, screen_half: Vec2, chunk_size: f32, min_radius: usize) -> usize {
        let reach = screen_half.x.max(screen_half.y) / self.zoom;
        let chunks = (reach / chunk_size).ceil();
        if chunks.is_finite() && chunks > min_radius as f32 {
            chunks as usize
        } else {
            min_radius
        }
    }
}

impl ChunkAnchor for Camera {
    fn anchor(&self) -> Vec2 {
        self.position
    }
}
