mod canvas;
mod frame;
mod headless;
mod paint;
mod primitives;

pub use canvas::{BackingSize, Canvas, CanvasHost, CanvasLayer};
pub use frame::RenderFrame;
pub use headless::{CanvasJournal, CanvasOp, HeadlessCanvas, HeadlessHost, JournalEntry};
pub use paint::{AreaFill, GradientStop, LinearGradient, Paint, resolve_area_fill};
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, LineStrokeStyle, PolygonPrimitive, RectPrimitive,
    TextHAlign, TextPrimitive, TextVAlign,
};

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoCanvas, CairoHost};
