pub mod camera;
pub mod chunk_grid;
pub mod config;
pub mod entity;
pub mod error;
pub mod registry;
pub mod scene;

pub use camera::Camera;
pub use chunk_grid::{ChunkAnchor, ChunkGrid};
pub use config::SceneConfig;
pub use entity::{Entity, EntityId, LayerId, RenderHandle};
pub use error::{SceneError, SceneResult};
pub use registry::SceneRegistry;
pub use scene::{FrameStats, Scene};
