use crate::render::{CirclePrimitive, LinePrimitive, PolygonPrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic record of what one canvas currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderFrame {
    pub lines: Vec<LinePrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
    pub polygons: Vec<PolygonPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.circles.clear();
        self.rects.clear();
        self.texts.clear();
        self.polygons.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
            && self.circles.is_empty()
            && self.rects.is_empty()
            && self.texts.is_empty()
            && self.polygons.is_empty()
    }
}
