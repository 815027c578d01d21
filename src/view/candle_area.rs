use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::config::{AreaPointStyles, CandleType};
use crate::core::{Coordinate, PaneId};
use crate::error::ChartResult;
use crate::figure::{
    CircleAttrs, CircleStyles, Figure, FigureAttrs, FigureSpec, FigureStyles, LineAttrs,
    LineStyles, PolygonAttrs, PolygonStyles,
};
use crate::interaction::AnimationDriver;
use crate::render::{Canvas, LineStrokeStyle, resolve_area_fill};
use crate::view::{View, ViewContext};
use crate::widget::{RedrawTrigger, UpdateLevel};

/// Ripple bounds shared with the animation callback.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RippleBounds {
    radius: f64,
    ripple_radius: f64,
    duration: f64,
}

/// Close-price area series with a pulsing marker on the latest point.
///
/// The ripple circle is created once and then mutated in place every frame.
/// Its radius is driven by an owned `AnimationDriver` whose callback only
/// requests a main-canvas redraw of this pane.
pub struct CandleAreaView {
    ripple: Option<Figure>,
    ripple_radius: Rc<Cell<f64>>,
    bounds: Rc<Cell<RippleBounds>>,
    animation: AnimationDriver,
}

impl CandleAreaView {
    #[must_use]
    pub fn new(pane_id: PaneId, trigger: Rc<dyn RedrawTrigger>) -> Self {
        let defaults = AreaPointStyles::default();
        let ripple_radius = Rc::new(Cell::new(defaults.radius));
        let bounds = Rc::new(Cell::new(RippleBounds {
            radius: defaults.radius,
            ripple_radius: defaults.ripple_radius,
            duration: defaults.animation_duration,
        }));

        let radius_sink = Rc::clone(&ripple_radius);
        let frame_bounds = Rc::clone(&bounds);
        let mut animation = AnimationDriver::new(move |elapsed| {
            let RippleBounds {
                radius,
                ripple_radius,
                duration,
            } = frame_bounds.get();
            let progress = (elapsed / duration).clamp(0.0, 1.0);
            radius_sink.set(radius + (ripple_radius - radius) * progress);
            trigger.request_redraw(pane_id, UpdateLevel::Main);
        });
        animation
            .set_duration(defaults.animation_duration)
            .set_iteration_count(None);

        Self {
            ripple: None,
            ripple_radius,
            bounds,
            animation,
        }
    }

    /// Retained ripple circle, once the marker has been drawn.
    #[must_use]
    pub fn ripple_figure(&self) -> Option<&Figure> {
        self.ripple.as_ref()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    fn draw_area(&self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) -> ChartResult<()> {
        let styles = &ctx.styles.candle.area;
        let mut runs: Vec<Vec<Coordinate>> = Vec::new();
        let mut current = Vec::new();
        for data in ctx.visible_data {
            match data.close() {
                Some(close) => {
                    current.push(Coordinate::new(data.x, ctx.y_axis.convert_to_pixel(close)));
                }
                // Gaps break the line.
                None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }

        let bottom = ctx.bounding.height;
        for run in runs.iter().filter(|run| run.len() >= 2) {
            let top = run.iter().map(|c| c.y).fold(f64::INFINITY, f64::min);
            if let Some(fill) = resolve_area_fill(&styles.fill, 0.0, top, bottom)
                && let (Some(first), Some(last)) = (run.first(), run.last())
            {
                let mut outline = run.clone();
                outline.push(Coordinate::new(last.x, bottom));
                outline.push(Coordinate::new(first.x, bottom));
                let spec = FigureSpec::new(
                    "polygon",
                    FigureAttrs::Polygon(PolygonAttrs {
                        coordinates: outline,
                    }),
                    FigureStyles::Polygon(PolygonStyles { fill }),
                );
                if let Some(figure) = ctx.figures.create_figure(spec) {
                    figure.draw(canvas)?;
                }
            }

            let spec = FigureSpec::new(
                "line",
                FigureAttrs::Line(LineAttrs::polyline(run.iter().copied())),
                FigureStyles::Line(LineStyles {
                    color: styles.line_color,
                    size: styles.line_size,
                    style: LineStrokeStyle::Solid,
                }),
            );
            if let Some(figure) = ctx.figures.create_figure(spec) {
                figure.draw(canvas)?;
            }
        }
        Ok(())
    }

    fn draw_last_point(
        &mut self,
        canvas: &mut dyn Canvas,
        ctx: &ViewContext<'_>,
    ) -> ChartResult<()> {
        let styles = ctx.styles.candle.area.point;
        let last_index = ctx.store.data_len().checked_sub(1);
        let center = ctx
            .visible_data
            .last()
            .filter(|data| Some(data.data_index) == last_index)
            .and_then(|data| {
                data.close()
                    .map(|close| Coordinate::new(data.x, ctx.y_axis.convert_to_pixel(close)))
            });
        let Some(center) = center.filter(|_| styles.show) else {
            self.animation.stop();
            return Ok(());
        };

        let ripple_r = if styles.animation {
            self.bounds.set(RippleBounds {
                radius: styles.radius,
                ripple_radius: styles.ripple_radius,
                duration: styles.animation_duration,
            });
            self.animation.set_duration(styles.animation_duration);
            if !self.animation.is_running() {
                self.ripple_radius.set(styles.radius);
                self.animation.start();
            }
            self.ripple_radius.get()
        } else {
            self.animation.stop();
            styles.ripple_radius
        };

        let ripple_attrs = FigureAttrs::Circle(CircleAttrs {
            x: center.x,
            y: center.y,
            r: ripple_r,
        });
        let ripple_styles = FigureStyles::Circle(CircleStyles {
            color: Some(styles.ripple_color),
            border_color: styles.ripple_color,
            border_size: 0.0,
        });
        let updated = self.ripple.as_mut().is_some_and(|ripple| {
            ripple.set_styles(ripple_styles.clone()) && ripple.set_attrs(ripple_attrs.clone())
        });
        if !updated {
            // A retained figure that refused the new geometry would paint stale.
            self.ripple = ctx.figures.create_figure(FigureSpec::new(
                "circle",
                ripple_attrs,
                ripple_styles,
            ));
        }
        if let Some(ripple) = &self.ripple {
            ripple.draw(canvas)?;
        }

        let point = ctx.figures.create_figure(FigureSpec::new(
            "circle",
            FigureAttrs::Circle(CircleAttrs {
                x: center.x,
                y: center.y,
                r: styles.radius,
            }),
            FigureStyles::Circle(CircleStyles {
                color: Some(styles.color),
                border_color: styles.color,
                border_size: 0.0,
            }),
        ));
        match point {
            Some(point) => point.draw(canvas),
            None => Ok(()),
        }
    }
}

impl View for CandleAreaView {
    fn name(&self) -> &str {
        "candle_area"
    }

    fn draw_imp(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) -> ChartResult<()> {
        if ctx.styles.candle.kind != CandleType::Area {
            self.animation.stop();
            return Ok(());
        }
        self.draw_area(canvas, ctx)?;
        self.draw_last_point(canvas, ctx)
    }

    fn tick(&mut self, now_ms: f64) -> bool {
        self.animation.tick(now_ms)
    }
}

impl fmt::Debug for CandleAreaView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandleAreaView")
            .field("ripple", &self.ripple)
            .field("ripple_radius", &self.ripple_radius.get())
            .field("animation", &self.animation)
            .finish()
    }
}
