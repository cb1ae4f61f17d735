use collisions::{GeometryCache, PhysicsBody};
use std::fmt;

/// Never reused within a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

impl EntityId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Draw layer. Lower layers come first in every per-frame pass.
pub type LayerId = i32;

/// Opaque handle the display layer attaches to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    layer: LayerId,
    pub body: PhysicsBody,
    width: f32,
    height: f32,
    render_handle: Option<RenderHandle>,
    cache: GeometryCache,
}

impl Entity {
    pub(crate) fn new(
        id: EntityId,
        layer: LayerId,
        body: PhysicsBody,
        width: f32,
        height: f32,
    ) -> Self {
        let cache = GeometryCache::from_body(&body, width, height);
        Entity {
            id,
            layer,
            body,
            width,
            height,
            render_handle: None,
            cache,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Takes effect at the next cache refresh.
    pub fn set_sprite_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn render_handle(&self) -> Option<RenderHandle> {
        self.render_handle
    }

    pub fn set_render_handle(&mut self, handle: Option<RenderHandle>) {
        self.render_handle = handle;
    }

    /// Snapshot from the last refresh, not the live body.
    pub fn cache(&self) -> &GeometryCache {
        &self.cache
    }

    pub fn refresh_cache(&mut self) {
        self.cache.refresh(&self.body, self.width, self.height);
    }
}
