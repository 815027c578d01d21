use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ChartResult;
use crate::interaction::GraphicMarkStore;
use crate::render::Canvas;
use crate::view::{View, ViewContext};

/// Draws every mark of a shared store; registered on the overlay canvas.
#[derive(Debug)]
pub struct GraphicMarkView {
    store: Rc<RefCell<GraphicMarkStore>>,
}

impl GraphicMarkView {
    #[must_use]
    pub fn new(store: Rc<RefCell<GraphicMarkStore>>) -> Self {
        Self { store }
    }
}

impl View for GraphicMarkView {
    fn name(&self) -> &str {
        "graphic_mark"
    }

    fn draw_imp(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) -> ChartResult<()> {
        self.store.borrow_mut().draw(canvas, ctx);
        Ok(())
    }
}
