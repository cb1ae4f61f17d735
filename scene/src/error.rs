use crate::entity::EntityId;
use quadtree::QuadtreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid scene config: {0}")]
    InvalidConfig(String),
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    #[error("spatial index rejected an entity: {0}")]
    Quadtree(#[from] QuadtreeError),
}

pub type SceneResult<T> = Result<T, SceneError>;
