use crate::cache::GeometryCache;
use common::vector::{self, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResult {
    pub colliding: bool,
    /// Unit normal of the first intersecting edge of the second body. Only
    /// set when `colliding`.
    pub direction: Option<Vec2>,
}

impl CollisionResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn hit(direction: Vec2) -> Self {
        Self {
            colliding: true,
            direction: Some(direction),
        }
    }

    /// Same contact seen from the other body.
    pub fn reversed(&self) -> Self {
        Self {
            colliding: self.colliding,
            direction: self.direction.map(|direction| -direction),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NarrowPhaseStats {
    pub tests: u64,
    /// Pairs dropped because neither is solid or both are fixed.
    pub filtered: u64,
    pub circle_rejections: u64,
    pub exact_tests: u64,
    pub collisions: u64,
}

/// Exact convex hull test, counting how far each pair gets through the
/// gates.
#[derive(Debug, Default)]
pub struct NarrowPhase {
    stats: NarrowPhaseStats,
}

impl NarrowPhase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> NarrowPhaseStats {
        self.stats
    }

    pub fn take_stats(&mut self) -> NarrowPhaseStats {
        std::mem::take(&mut self.stats)
    }

    pub fn test(&mut self, a: &GeometryCache, b: &GeometryCache) -> CollisionResult {
        self.stats.tests += 1;

        if !may_interact(a, b) {
            self.stats.filtered += 1;
            return CollisionResult::none();
        }

        if !bounding_circles_overlap(a, b) {
            self.stats.circle_rejections += 1;
            return CollisionResult::none();
        }

        self.stats.exact_tests += 1;
        match first_edge_intersection(&a.hull, &b.hull) {
            Some((p1, p2)) => {
                self.stats.collisions += 1;
                CollisionResult::hit(vector::orthogonal(&(p2 - p1)).normalize())
            }
            None => CollisionResult::none(),
        }
    }
}

/// False when neither body is solid or both are fixed.
#[inline]
pub fn may_interact(a: &GeometryCache, b: &GeometryCache) -> bool {
    !((!a.solid && !b.solid) || (a.fixed && b.fixed))
}

/// Compares the squared center distance against the sum of the squared
/// half-diagonals.
#[inline]
pub fn bounding_circles_overlap(a: &GeometryCache, b: &GeometryCache) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy <= a.bounding_radius_squared() + b.bounding_radius_squared()
}

/// Walks A's edges (outer) against B's edges (inner) in stored order and
/// returns the first B edge `(p1, p2)` that crosses an A edge.
pub fn first_edge_intersection(a: &[Vec2], b: &[Vec2]) -> Option<(Vec2, Vec2)> {
    if a.len() < 2 || b.len() < 2 {
        return None;
    }

    for i in 0..a.len() {
        let q1 = a[i];
        let q2 = a[(i + 1) % a.len()];

        for j in 0..b.len() {
            let p1 = b[j];
            let p2 = b[(j + 1) % b.len()];

            if segment_intersection(q1, q2, p1, p2).is_some() {
                return Some((p1, p2));
            }
        }
    }

    None
}

/// Intersection point of segments `q1q2` and `p1p2`.
///
/// Parallel or coincident segments never intersect. The point must lie in
/// both segments' bounding extents, bounds inclusive.
pub fn segment_intersection(q1: Vec2, q2: Vec2, p1: Vec2, p2: Vec2) -> Option<Vec2> {
    // General form a*x + b*y = c
    let a1 = q2.y - q1.y;
    let b1 = q1.x - q2.x;
    let c1 = a1 * q1.x + b1 * q1.y;

    let a2 = p2.y - p1.y;
    let b2 = p1.x - p2.x;
    let c2 = a2 * p1.x + b2 * p1.y;

    let determinant = a1 * b2 - a2 * b1;
    if determinant == 0.0 {
        return None;
    }

    let x = (b2 * c1 - b1 * c2) / determinant;
    let y = (a1 * c2 - a2 * c1) / determinant;

    let within = |s1: Vec2, s2: Vec2| {
        s1.x.min(s2.x) <= x && x <= s1.x.max(s2.x) && s1.y.min(s2.y) <= y && y <= s1.y.max(s2.y)
    };

    if within(p1, p2) && within(q1, q2) {
        Some(Vec2::new(x, y))
    } else {
        None
    }
}
