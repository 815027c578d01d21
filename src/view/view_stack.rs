use crate::render::{Canvas, CanvasLayer};
use crate::view::{View, ViewContext};
use crate::widget::{DrawWidget, WidgetContent};

/// Views of one widget per canvas, drawn in registration order.
#[derive(Default)]
pub struct ViewStack {
    main: Vec<Box<dyn View>>,
    overlay: Vec<Box<dyn View>>,
}

impl ViewStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Later views paint on top of earlier ones.
    pub fn add_view(&mut self, layer: CanvasLayer, view: Box<dyn View>) {
        match layer {
            CanvasLayer::Main => self.main.push(view),
            CanvasLayer::Overlay => self.overlay.push(view),
        }
    }

    #[must_use]
    pub fn view_names(&self, layer: CanvasLayer) -> Vec<&str> {
        let views = match layer {
            CanvasLayer::Main => &self.main,
            CanvasLayer::Overlay => &self.overlay,
        };
        views.iter().map(|view| view.name()).collect()
    }

    /// Ticks every view's animation; true while any of them still runs.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.main
            .iter_mut()
            .chain(self.overlay.iter_mut())
            .fold(false, |running, view| view.tick(now_ms) || running)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.main.len() + self.overlay.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WidgetContent for ViewStack {
    fn update_main(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) {
        for view in &mut self.main {
            view.draw(canvas, ctx);
        }
    }

    fn update_overlay(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) {
        for view in &mut self.overlay {
            view.draw(canvas, ctx);
        }
    }
}

impl<C: Canvas> DrawWidget<C, ViewStack> {
    /// Registers `view` on `layer`; views draw in registration order.
    pub fn add_view(&mut self, layer: CanvasLayer, view: impl View + 'static) {
        self.content_mut().add_view(layer, Box::new(view));
    }
}
