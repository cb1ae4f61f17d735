use nalgebra::Vector2;

pub type Vec2 = Vector2<f32>;

/// Heading of `v` in radians, `atan2(y, x)`.
#[inline]
pub fn angle(v: &Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Same length as `v`, pointing at `angle`.
pub fn with_angle(v: &Vec2, angle: f32) -> Vec2 {
    let length = v.norm();
    Vec2::new(angle.cos() * length, angle.sin() * length)
}

pub fn rotated(v: &Vec2, theta: f32) -> Vec2 {
    let (sin, cos) = theta.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Clamps the length of `v` to `max`, keeping its direction.
pub fn limited(v: &Vec2, max: f32) -> Vec2 {
    let length_sq = v.norm_squared();
    if length_sq > max * max {
        v * (max / length_sq.sqrt())
    } else {
        *v
    }
}

/// `v` turned a quarter turn counter-clockwise.
#[inline]
pub fn orthogonal(v: &Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}
