use chrono::NaiveDate;

use crate::core::primitives::utc_day_of_millis;
use crate::core::{BarSpace, Coordinate, VisibleData};
use crate::error::ChartResult;
use crate::figure::{FigureAttrs, FigureSpec, FigureStyles, LineAttrs, LineStyles};
use crate::render::Canvas;
use crate::view::{ChildrenView, View, ViewContext};

/// Vertical separator at every visible point that opens a new UTC day.
///
/// Gap points carry no timestamp and neither open nor close a session.
#[derive(Debug, Default)]
pub struct SessionBreakView {
    previous_day: Option<NaiveDate>,
}

impl SessionBreakView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl View for SessionBreakView {
    fn name(&self) -> &str {
        "session_break"
    }

    fn draw_imp(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) -> ChartResult<()> {
        if !ctx.styles.separator.show {
            return Ok(());
        }
        self.previous_day = None;
        self.draw_children(canvas, ctx);
        Ok(())
    }
}

impl ChildrenView for SessionBreakView {
    fn draw_child(
        &mut self,
        canvas: &mut dyn Canvas,
        ctx: &ViewContext<'_>,
        data: &VisibleData,
        bar_space: BarSpace,
        _index: usize,
    ) -> ChartResult<()> {
        let Some(day) = data
            .data
            .and_then(|candle| utc_day_of_millis(candle.timestamp))
        else {
            return Ok(());
        };
        let previous = self.previous_day.replace(day);
        if previous.is_none_or(|previous| previous == day) {
            return Ok(());
        }

        let styles = &ctx.styles.separator;
        // Between the previous bar and this one.
        let x = data.x - bar_space.half_gap_bar;
        let spec = FigureSpec::new(
            "line",
            FigureAttrs::Line(LineAttrs::segment(
                Coordinate::new(x, 0.0),
                Coordinate::new(x, ctx.bounding.height),
            )),
            FigureStyles::Line(LineStyles {
                color: styles.color,
                size: styles.size,
                style: styles.stroke_style(),
            }),
        );
        match ctx.figures.create_figure(spec) {
            Some(figure) => figure.draw(canvas),
            None => Ok(()),
        }
    }
}
