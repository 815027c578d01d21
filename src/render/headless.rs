use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{ChartError, ChartResult};
use crate::render::{
    BackingSize, Canvas, CanvasHost, CanvasLayer, CirclePrimitive, LinePrimitive,
    PolygonPrimitive, RectPrimitive, RenderFrame, TextPrimitive,
};

/// Operation observed on a headless canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasOp {
    Resize(BackingSize),
    Clear,
    Line,
    Circle,
    Rect,
    Text,
    Polygon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalEntry {
    pub layer: CanvasLayer,
    pub op: CanvasOp,
}

/// Shared, ordered log of operations across the canvases of one host.
#[derive(Debug, Clone, Default)]
pub struct CanvasJournal(Rc<RefCell<Vec<JournalEntry>>>);

impl CanvasJournal {
    fn record(&self, layer: CanvasLayer, op: CanvasOp) {
        self.0.borrow_mut().push(JournalEntry { layer, op });
    }

    #[must_use]
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.0.borrow().clone()
    }

    /// Returns and forgets everything recorded so far.
    pub fn take(&self) -> Vec<JournalEntry> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Canvas without a display: validates and records every primitive.
///
/// Used by tests and headless hosts to observe exactly what a widget paints.
#[derive(Debug)]
pub struct HeadlessCanvas {
    layer: CanvasLayer,
    width: f64,
    height: f64,
    pixel_ratio: f64,
    backing: BackingSize,
    frame: RenderFrame,
    clear_count: usize,
    journal: CanvasJournal,
}

impl HeadlessCanvas {
    #[must_use]
    pub fn new(layer: CanvasLayer, journal: CanvasJournal) -> Self {
        Self {
            layer,
            width: 0.0,
            height: 0.0,
            pixel_ratio: 1.0,
            backing: BackingSize::default(),
            frame: RenderFrame::new(),
            clear_count: 0,
            journal,
        }
    }

    #[must_use]
    pub fn layer(&self) -> CanvasLayer {
        self.layer
    }

    /// Everything drawn since the last clear.
    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clear_count
    }
}

impl Canvas for HeadlessCanvas {
    fn logical_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn backing_size(&self) -> BackingSize {
        self.backing
    }

    fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) -> ChartResult<()> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(ChartError::InvalidData(
                "pixel ratio must be finite and > 0".to_owned(),
            ));
        }
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        self.backing = BackingSize::for_logical(width, height, pixel_ratio);
        self.frame.clear();
        self.journal.record(self.layer, CanvasOp::Resize(self.backing));
        Ok(())
    }

    fn clear(&mut self) -> ChartResult<()> {
        self.frame.clear();
        self.clear_count += 1;
        self.journal.record(self.layer, CanvasOp::Clear);
        Ok(())
    }

    fn stroke_line(&mut self, line: &LinePrimitive) -> ChartResult<()> {
        line.validate()?;
        self.frame.lines.push(*line);
        self.journal.record(self.layer, CanvasOp::Line);
        Ok(())
    }

    fn draw_circle(&mut self, circle: &CirclePrimitive) -> ChartResult<()> {
        circle.validate()?;
        self.frame.circles.push(*circle);
        self.journal.record(self.layer, CanvasOp::Circle);
        Ok(())
    }

    fn draw_rect(&mut self, rect: &RectPrimitive) -> ChartResult<()> {
        rect.validate()?;
        self.frame.rects.push(*rect);
        self.journal.record(self.layer, CanvasOp::Rect);
        Ok(())
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> ChartResult<()> {
        text.validate()?;
        self.frame.texts.push(text.clone());
        self.journal.record(self.layer, CanvasOp::Text);
        Ok(())
    }

    fn fill_polygon(&mut self, polygon: &PolygonPrimitive) -> ChartResult<()> {
        polygon.validate()?;
        self.frame.polygons.push(polygon.clone());
        self.journal.record(self.layer, CanvasOp::Polygon);
        Ok(())
    }
}

/// Host handing out headless canvases that share one journal.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    pixel_ratio: f64,
    supports_2d: bool,
    journal: CanvasJournal,
}

impl HeadlessHost {
    #[must_use]
    pub fn new(pixel_ratio: f64) -> Self {
        Self {
            pixel_ratio,
            supports_2d: true,
            journal: CanvasJournal::default(),
        }
    }

    /// Host that cannot create any 2D surface.
    #[must_use]
    pub fn without_2d_support() -> Self {
        Self {
            supports_2d: false,
            ..Self::new(1.0)
        }
    }

    #[must_use]
    pub fn journal(&self) -> CanvasJournal {
        self.journal.clone()
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl CanvasHost for HeadlessHost {
    type Canvas = HeadlessCanvas;

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn create_canvas(&mut self, layer: CanvasLayer) -> Option<Self::Canvas> {
        self.supports_2d
            .then(|| HeadlessCanvas::new(layer, self.journal.clone()))
    }
}
