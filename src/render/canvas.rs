use serde::{Deserialize, Serialize};

use crate::error::ChartResult;
use crate::render::{
    CirclePrimitive, LinePrimitive, PolygonPrimitive, RectPrimitive, TextPrimitive,
};

/// The two stacked surfaces of a draw widget. `Main` holds series content,
/// `Overlay` sits on top of it and holds interactive content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayer {
    Main,
    Overlay,
}

/// Backing-store dimensions in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackingSize {
    pub width: u32,
    pub height: u32,
}

impl BackingSize {
    /// `floor(size * pixel_ratio)` for both dimensions.
    #[must_use]
    pub fn for_logical(width: f64, height: f64, pixel_ratio: f64) -> Self {
        let scale = |value: f64| (value * pixel_ratio).floor().max(0.0) as u32;
        Self {
            width: scale(width),
            height: scale(height),
        }
    }
}

/// A 2D drawing surface exclusively owned by one draw widget.
///
/// Coordinates passed to drawing calls are logical pixels; implementations
/// apply the pixel-ratio scale transform installed by `resize`.
pub trait Canvas {
    /// CSS-style size in logical pixels.
    fn logical_size(&self) -> (f64, f64);
    fn pixel_ratio(&self) -> f64;
    fn backing_size(&self) -> BackingSize;

    /// Reallocates the backing store to `floor(size * pixel_ratio)` and
    /// re-applies the scale transform. Content is lost.
    fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) -> ChartResult<()>;
    fn clear(&mut self) -> ChartResult<()>;

    fn stroke_line(&mut self, line: &LinePrimitive) -> ChartResult<()>;
    fn draw_circle(&mut self, circle: &CirclePrimitive) -> ChartResult<()>;
    fn draw_rect(&mut self, rect: &RectPrimitive) -> ChartResult<()>;
    fn draw_text(&mut self, text: &TextPrimitive) -> ChartResult<()>;
    fn fill_polygon(&mut self, polygon: &PolygonPrimitive) -> ChartResult<()>;
}

/// Host environment that creates drawing surfaces for a widget and places
/// them in its container.
pub trait CanvasHost {
    type Canvas: Canvas;

    fn device_pixel_ratio(&self) -> f64;

    /// Creates and attaches the surface for `layer`. `None` means the host
    /// has no 2D drawing support.
    fn create_canvas(&mut self, layer: CanvasLayer) -> Option<Self::Canvas>;
}

#[cfg(test)]
mod tests {
    use super::BackingSize;

    #[test]
    fn backing_size_floors_scaled_dimensions() {
        assert_eq!(
            BackingSize::for_logical(101.0, 50.5, 1.5),
            BackingSize {
                width: 151,
                height: 75
            }
        );
    }
}
