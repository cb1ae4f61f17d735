use common::vector::{self, Vec2};
use std::f32::consts::PI;

pub const DEFAULT_MAX_ACCELERATION: f32 = 0.025;
pub const DEFAULT_MAX_SPEED: f32 = 0.4;
pub const DEFAULT_MASS: f32 = 1000.0;

/// Number of headings a body can be displayed at.
pub const TOTAL_DISPLAY_ANGLES: u32 = 32;
pub const ROUNDING_ANGLE_INCREMENT: f32 = 2.0 * PI / TOTAL_DISPLAY_ANGLES as f32;

/// Kinematic and collision state of one simulated entity.
///
/// `vertices` is a convex hull in object-local space (already rotated by
/// every `rotate` call). An empty hull is allowed and never collides.
/// `mass` must be positive; it is not checked.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub forward: Vec2,
    pub rotation: f32,
    pub mass: f32,
    pub max_speed: f32,
    pub max_acceleration: f32,
    pub solid: bool,
    pub fixed: bool,
    pub vertices: Vec<Vec2>,
}

impl PhysicsBody {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_vertices(mut self, vertices: Vec<Vec2>) -> Self {
        self.vertices = vertices;
        self
    }

    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    /// Axis-aligned box hull centered on the body.
    pub fn with_box_hull(self, width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        self.with_vertices(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
    }

    pub fn add_force(&mut self, force: Vec2) {
        self.acceleration += force / self.mass;
    }

    pub fn add_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse / self.mass;
    }

    /// Turns the body, its heading and its hull by `theta` radians.
    pub fn rotate(&mut self, theta: f32) -> &mut Self {
        self.forward = vector::rotated(&self.forward, theta);
        self.rotation = vector::angle(&self.forward);
        for vertex in &mut self.vertices {
            *vertex = vector::rotated(vertex, theta);
        }
        self
    }

    /// Snaps `angle` to the nearest displayable heading.
    pub fn display_angle(angle: f32) -> f32 {
        (angle / ROUNDING_ANGLE_INCREMENT).round() * ROUNDING_ANGLE_INCREMENT
    }

    /// Advances velocity and position by `dt`.
    ///
    /// Acceleration is clamped, then applied along the nearest display
    /// heading so motion matches what is drawn.
    pub fn integrate(&mut self, dt: f32) {
        self.acceleration = vector::limited(&self.acceleration, self.max_acceleration);

        let heading = Self::display_angle(vector::angle(&self.acceleration));
        let display_acceleration = vector::with_angle(&self.acceleration, heading);
        self.velocity += display_acceleration * dt;

        self.velocity = vector::limited(&self.velocity, self.max_speed);
        self.position += self.velocity * dt;

        self.rotation = vector::angle(&self.forward);
    }
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            forward: Vec2::new(1.0, 0.0),
            rotation: 0.0,
            mass: DEFAULT_MASS,
            max_speed: DEFAULT_MAX_SPEED,
            max_acceleration: DEFAULT_MAX_ACCELERATION,
            solid: true,
            fixed: false,
            vertices: Vec::new(),
        }
    }
}
