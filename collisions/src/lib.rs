pub mod body;
pub mod cache;
pub mod narrow_phase;
pub mod resolve;

pub use body::PhysicsBody;
pub use cache::GeometryCache;
pub use narrow_phase::{CollisionResult, NarrowPhase, NarrowPhaseStats};
pub use resolve::{resolve, resolve_pair};
