use crate::body::PhysicsBody;
use common::shapes::Rectangle;
use common::vector::Vec2;

/// Per-frame snapshot of a body, the only state the broad and narrow phase
/// read.
///
/// `x`/`y` is the center. `width`/`height` are the full, unrotated sprite
/// extents, so `aabb_width`/`aabb_height` are the full extents of the
/// rotated sprite.
#[derive(Debug, Clone, Default)]
pub struct GeometryCache {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub vx: f32,
    pub vy: f32,
    pub ax: f32,
    pub ay: f32,
    pub aabb_width: f32,
    pub aabb_height: f32,
    pub solid: bool,
    pub fixed: bool,
    /// Hull vertices offset by the cached position.
    pub hull: Vec<Vec2>,
}

impl GeometryCache {
    pub fn from_body(body: &PhysicsBody, width: f32, height: f32) -> Self {
        let mut cache = Self::default();
        cache.refresh(body, width, height);
        cache
    }

    /// Overwrites every field from the body's current state.
    pub fn refresh(&mut self, body: &PhysicsBody, width: f32, height: f32) {
        let abs_cos = body.rotation.cos().abs();
        let abs_sin = body.rotation.sin().abs();

        self.x = body.position.x;
        self.y = body.position.y;
        self.width = width;
        self.height = height;
        self.rotation = body.rotation;
        self.vx = body.velocity.x;
        self.vy = body.velocity.y;
        self.ax = body.acceleration.x;
        self.ay = body.acceleration.y;
        self.aabb_width = abs_cos * width + abs_sin * height;
        self.aabb_height = abs_cos * height + abs_sin * width;
        self.solid = body.solid;
        self.fixed = body.fixed;

        self.hull.clear();
        self.hull
            .extend(body.vertices.iter().map(|vertex| vertex + body.position));
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn aabb(&self) -> Rectangle {
        Rectangle::new(self.x, self.y, self.aabb_width, self.aabb_height)
    }

    /// Squared radius of the circle through the sprite's corners.
    pub fn bounding_radius_squared(&self) -> f32 {
        (self.width * self.width + self.height * self.height) / 4.0
    }
}
