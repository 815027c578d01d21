use crate::config::{CandleBarStyles, CandleType};
use crate::core::{BarSpace, Coordinate, KLineData, VisibleData};
use crate::error::ChartResult;
use crate::figure::{
    FigureAttrs, FigureSpec, FigureStyles, LineAttrs, LineStyles, RectAttrs, RectStyles,
};
use crate::render::{Canvas, Color, LineStrokeStyle};
use crate::view::{ChildrenView, View, ViewContext};

/// Candle, hollow candle or OHLC bar per visible point.
#[derive(Debug, Default)]
pub struct CandleBarView;

impl CandleBarView {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn color(styles: &CandleBarStyles, data: &KLineData) -> Color {
        if data.close > data.open {
            styles.up_color
        } else if data.close < data.open {
            styles.down_color
        } else {
            styles.no_change_color
        }
    }
}

impl View for CandleBarView {
    fn name(&self) -> &str {
        "candle_bar"
    }

    fn draw_imp(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) -> ChartResult<()> {
        if ctx.styles.candle.kind != CandleType::Area {
            self.draw_children(canvas, ctx);
        }
        Ok(())
    }
}

impl ChildrenView for CandleBarView {
    fn draw_child(
        &mut self,
        canvas: &mut dyn Canvas,
        ctx: &ViewContext<'_>,
        data: &VisibleData,
        bar_space: BarSpace,
        _index: usize,
    ) -> ChartResult<()> {
        let Some(candle) = data.data.filter(KLineData::has_ohlc) else {
            return Ok(());
        };
        let styles = &ctx.styles.candle.bar;
        let color = Self::color(styles, &candle);
        let to_y = |price: f64| ctx.y_axis.convert_to_pixel(price);
        let (open_y, high_y, low_y, close_y) =
            (to_y(candle.open), to_y(candle.high), to_y(candle.low), to_y(candle.close));
        let x = data.x;

        let line = |start: Coordinate, end: Coordinate| {
            FigureSpec::new(
                "line",
                FigureAttrs::Line(LineAttrs::segment(start, end)),
                FigureStyles::Line(LineStyles {
                    color,
                    size: styles.wick_size,
                    style: LineStrokeStyle::Solid,
                }),
            )
        };

        let mut specs = Vec::with_capacity(3);
        match ctx.styles.candle.kind {
            CandleType::Ohlc => {
                specs.push(line(Coordinate::new(x, high_y), Coordinate::new(x, low_y)));
                specs.push(line(
                    Coordinate::new(x - bar_space.half_bar, open_y),
                    Coordinate::new(x, open_y),
                ));
                specs.push(line(
                    Coordinate::new(x, close_y),
                    Coordinate::new(x + bar_space.half_bar, close_y),
                ));
            }
            CandleType::CandleSolid | CandleType::CandleStroke => {
                let body_top = open_y.min(close_y);
                let body_bottom = open_y.max(close_y);
                specs.push(line(Coordinate::new(x, high_y), Coordinate::new(x, body_top)));
                specs.push(line(Coordinate::new(x, body_bottom), Coordinate::new(x, low_y)));
                let hollow = ctx.styles.candle.kind == CandleType::CandleStroke;
                specs.push(FigureSpec::new(
                    "rect",
                    FigureAttrs::Rect(RectAttrs {
                        x: x - bar_space.half_bar,
                        y: body_top,
                        width: bar_space.bar,
                        // Flat candles still show a one pixel body.
                        height: (body_bottom - body_top).max(1.0),
                    }),
                    FigureStyles::Rect(RectStyles {
                        color: if hollow { Color::TRANSPARENT } else { color },
                        border_color: color,
                        border_size: if hollow { styles.wick_size } else { 0.0 },
                        border_radius: 0.0,
                    }),
                ));
            }
            CandleType::Area => {}
        }

        for spec in specs {
            if let Some(figure) = ctx.figures.create_figure(spec) {
                figure.draw(canvas)?;
            }
        }
        Ok(())
    }
}
