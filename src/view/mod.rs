//! Views turn the visible data window into figures on one canvas.

mod candle_area;
mod candle_bar;
mod graphic_mark;
mod session_break;
mod view_stack;

use tracing::warn;

use crate::config::ChartStyles;
use crate::core::{Axis, BarSpace, Bounding, DataStore, PaneId, VisibleData};
use crate::error::ChartResult;
use crate::figure::FigureRegistry;
use crate::render::Canvas;

pub use candle_area::CandleAreaView;
pub use candle_bar::CandleBarView;
pub use graphic_mark::GraphicMarkView;
pub use session_break::SessionBreakView;
pub use view_stack::ViewStack;

/// Read-only collaborators a pane hands to its views and marks.
///
/// `visible_data` and `bar_space` are taken from the store once per frame
/// so every view walks the same window.
#[derive(Clone, Copy)]
pub struct ViewContext<'a> {
    pub pane_id: PaneId,
    /// Size of the widget; coordinates are local to it.
    pub bounding: Bounding,
    pub store: &'a dyn DataStore,
    pub x_axis: &'a dyn Axis,
    pub y_axis: &'a dyn Axis,
    pub styles: &'a ChartStyles,
    pub figures: &'a FigureRegistry,
    pub visible_data: &'a [VisibleData],
    pub bar_space: BarSpace,
}

impl ViewContext<'_> {
    /// Widget rectangle with its origin at the canvas origin.
    #[must_use]
    pub fn local_bounding(&self) -> Bounding {
        Bounding::from_size(self.bounding.width, self.bounding.height)
    }
}

pub trait View {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    fn draw_imp(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) -> ChartResult<()>;

    /// Draws the view, containing any paint failure to this view.
    fn draw(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) {
        if let Err(err) = self.draw_imp(canvas, ctx) {
            warn!(
                view = self.name(),
                pane = %ctx.pane_id,
                error = %err,
                "view draw failed, continuing with next view"
            );
        }
    }

    /// Advances any animation the view owns. Returns whether it is still
    /// running; views without animations keep the default.
    fn tick(&mut self, _now_ms: f64) -> bool {
        false
    }
}

/// View drawing zero or more figures per visible data point.
pub trait ChildrenView {
    fn draw_child(
        &mut self,
        canvas: &mut dyn Canvas,
        ctx: &ViewContext<'_>,
        data: &VisibleData,
        bar_space: BarSpace,
        index: usize,
    ) -> ChartResult<()>;

    /// Walks the visible window in time-ascending order. A failing point
    /// degrades that point only.
    fn draw_children(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) {
        for (index, data) in ctx.visible_data.iter().enumerate() {
            if let Err(err) = self.draw_child(canvas, ctx, data, ctx.bar_space, index) {
                warn!(
                    data_index = data.data_index,
                    error = %err,
                    "child figure draw failed"
                );
            }
        }
    }
}
