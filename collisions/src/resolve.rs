use crate::body::PhysicsBody;
use crate::narrow_phase::CollisionResult;

/// Distance a resolved body is pushed along the contact direction.
pub const SEPARATION_DISTANCE: f32 = 2.0;

/// Applies the contact to `receiver` only.
///
/// Velocity is overwritten with the direction rather than reflected, and the
/// push-out is a fixed distance regardless of overlap depth. Fixed or
/// non-solid receivers, and contacts with a non-solid body, are ignored.
pub fn resolve(receiver: &mut PhysicsBody, other_solid: bool, result: &CollisionResult) {
    if receiver.fixed || !receiver.solid || !other_solid {
        return;
    }

    receiver.acceleration.fill(0.0);

    if let Some(direction) = result.direction {
        receiver.velocity = direction;
        receiver.position += direction * SEPARATION_DISTANCE;
    }
}

/// Resolves both sides of a contact; `b` receives the negated direction.
pub fn resolve_pair(a: &mut PhysicsBody, b: &mut PhysicsBody, result: &CollisionResult) {
    let a_solid = a.solid;
    let b_solid = b.solid;
    resolve(a, b_solid, result);
    resolve(b, a_solid, &result.reversed());
}
