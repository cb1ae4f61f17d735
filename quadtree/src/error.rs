use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuadtreeError {
    #[error("rectangle width/height must be finite and non-negative (width: {width}, height: {height})")]
    InvalidRectangleDims { width: f32, height: f32 },
    #[error("rectangle center must be finite (x: {x}, y: {y})")]
    NonFiniteRectangle { x: f32, y: f32 },
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;

pub(crate) fn validate_rectangle(rect: &common::shapes::Rectangle) -> QuadtreeResult<()> {
    if !rect.x.is_finite() || !rect.y.is_finite() {
        return Err(QuadtreeError::NonFiniteRectangle {
            x: rect.x,
            y: rect.y,
        });
    }
    if !rect.width.is_finite() || !rect.height.is_finite() || rect.width < 0.0 || rect.height < 0.0
    {
        return Err(QuadtreeError::InvalidRectangleDims {
            width: rect.width,
            height: rect.height,
        });
    }
    Ok(())
}
