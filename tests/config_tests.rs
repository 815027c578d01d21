use std::rc::Rc;

use kline_core::config::{CandleType, ChartStyles};
use kline_core::core::{Coordinate, DataStore, KLineData, PaneId, Precision};
use kline_core::error::{ChartError, ChartResult};
use kline_core::figure::{FigureAttrs, FigureStyles, FigureTemplate};
use kline_core::render::{Canvas, HeadlessCanvas, HeadlessHost, RectPrimitive};
use kline_core::widget::{ManualFrameScheduler, RedrawQueue, UpdateLevel};
use kline_core::{CandlePane, CandlePaneConfig};

fn pane_from(config: CandlePaneConfig) -> ChartResult<CandlePane<HeadlessCanvas>> {
    let mut host = HeadlessHost::default();
    CandlePane::new(&mut host, config, Rc::new(RedrawQueue::new()))
}

#[test]
fn pane_config_survives_a_json_round_trip() {
    let mut styles = ChartStyles::default();
    styles.candle.kind = CandleType::Ohlc;
    styles.separator.dashed = true;
    let config = CandlePaneConfig::new(800.0, 300.0)
        .with_pane_id(PaneId::new(3))
        .with_bar_spacing(12.0)
        .with_precision(Precision {
            price: 4,
            volume: 2,
        })
        .with_styles(styles);

    let json = config.to_json_pretty().expect("serialize");
    let restored = CandlePaneConfig::from_json_str(&json).expect("parse");
    assert_eq!(restored, config);

    let pane = pane_from(restored).expect("pane");
    assert_eq!(pane.pane_id(), PaneId::new(3));
    assert_eq!(pane.store().precision(), config.precision);
}

#[test]
fn partial_style_json_keeps_defaults_elsewhere() {
    let config = CandlePaneConfig::from_json_str(
        r#"{"width": 400, "height": 200,
            "styles": {"graphic_mark": {"point": {"radius": 6}}}}"#,
    )
    .expect("valid config");

    let defaults = ChartStyles::default();
    assert_eq!(config.styles.graphic_mark.point.radius, 6.0);
    assert_eq!(config.styles.candle, defaults.candle);
    assert_eq!(config.bar_spacing, 8.0);
}

#[test]
fn invalid_configs_are_rejected_before_building_a_pane() {
    let bad_spacing = CandlePaneConfig::new(400.0, 200.0).with_bar_spacing(0.0);
    assert!(matches!(
        pane_from(bad_spacing),
        Err(ChartError::InvalidConfig(_))
    ));

    let bad_viewport = CandlePaneConfig::new(f64::NAN, 200.0);
    assert!(matches!(
        pane_from(bad_viewport),
        Err(ChartError::InvalidViewport { .. })
    ));

    let err = ChartStyles::from_json_str(r#"{"candle":{"area":{"point":{"ripple_radius":1}}}}"#)
        .expect_err("ripple smaller than the point");
    assert!(matches!(err, ChartError::InvalidConfig(_)));

    let err = CandlePaneConfig::from_json_str("{not json").expect_err("malformed");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn rejected_styles_leave_the_pane_untouched() {
    let queue = Rc::new(RedrawQueue::new());
    let mut host = HeadlessHost::default();
    let mut pane = CandlePane::new(
        &mut host,
        CandlePaneConfig::new(400.0, 200.0),
        Rc::clone(&queue),
    )
    .expect("pane");
    let mut scheduler = ManualFrameScheduler::new();
    pane.flush(&mut scheduler).expect("flush");

    let mut styles = ChartStyles::default();
    styles.separator.size = -1.0;
    let err = pane.set_styles(styles).expect_err("negative size");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
    assert_eq!(pane.styles(), &ChartStyles::default());
    assert!(queue.is_empty());

    pane.request_update(UpdateLevel::Overlay);
    assert_eq!(queue.pending_level(PaneId::CANDLE), Some(UpdateLevel::Overlay));
}

/// Draws circles as their bounding squares.
struct SquareDots;

impl FigureTemplate for SquareDots {
    fn name(&self) -> &str {
        "circle"
    }

    fn accepts(&self, attrs: &FigureAttrs, styles: &FigureStyles) -> bool {
        matches!(
            (attrs, styles),
            (FigureAttrs::Circle(_), FigureStyles::Circle(_))
        )
    }

    fn draw(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) -> ChartResult<()> {
        let (FigureAttrs::Circle(circle), FigureStyles::Circle(style)) = (attrs, styles) else {
            return Ok(());
        };
        canvas.draw_rect(&RectPrimitive {
            x: circle.x - circle.r,
            y: circle.y - circle.r,
            width: circle.r * 2.0,
            height: circle.r * 2.0,
            fill_color: style.color.unwrap_or(style.border_color),
            border_color: style.border_color,
            border_width: 0.0,
            corner_radius: 0.0,
        })
    }

    fn check_event_on(
        &self,
        coordinate: Coordinate,
        attrs: &FigureAttrs,
        _styles: &FigureStyles,
    ) -> bool {
        let FigureAttrs::Circle(circle) = attrs else {
            return false;
        };
        (coordinate.x - circle.x).abs() <= circle.r && (coordinate.y - circle.y).abs() <= circle.r
    }
}

#[test]
fn registered_figure_replaces_the_builtin_of_the_same_name() {
    let mut styles = ChartStyles::default();
    styles.candle.kind = CandleType::Area;
    styles.candle.area.point.animation = false;
    let mut pane =
        pane_from(CandlePaneConfig::new(400.0, 200.0).with_styles(styles)).expect("pane");
    let replaced = pane.figures_mut().register(Rc::new(SquareDots));
    assert!(replaced.is_some());

    pane.set_data(
        (0..5)
            .map(|i| KLineData::new(i * 60_000, 10.0, 12.0, 9.0, 11.0))
            .collect(),
    );
    let mut scheduler = ManualFrameScheduler::new();
    pane.flush(&mut scheduler).expect("flush");
    let handle = scheduler.take_due()[0];
    pane.run_frame(handle).expect("frame");

    let frame = pane.widget().main_canvas().frame();
    assert!(frame.circles.is_empty());
    assert_eq!(frame.rects.len(), 2);
    assert!((frame.rects[0].width - 16.0).abs() < 1e-9);
}
