use thiserror::Error;

use crate::render::CanvasLayer;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The host could not provide a 2D drawing surface for a layer.
    #[error("2d drawing surface unavailable for {layer:?} canvas")]
    SurfaceUnavailable { layer: CanvasLayer },

    #[error("invalid style configuration: {0}")]
    InvalidConfig(String),

    #[error("paint error: {0}")]
    Paint(String),

    #[error("render backend error: {0}")]
    Backend(String),
}
