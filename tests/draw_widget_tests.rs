use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kline_core::config::ChartStyles;
use kline_core::core::{
    Bounding, Coordinate, DataStore, IndexAxis, KLineData, LinearAxis, PaneId, TimeSeriesStore,
    VisibleData,
};
use kline_core::error::{ChartError, ChartResult};
use kline_core::figure::{
    FigureAttrs, FigureRegistry, FigureSpec, FigureStyles, LineAttrs, LineStyles,
};
use kline_core::render::{
    BackingSize, Canvas, CanvasHost, CanvasJournal, CanvasLayer, CanvasOp, CirclePrimitive,
    Color, HeadlessCanvas, HeadlessHost, LinePrimitive, LineStrokeStyle, PolygonPrimitive,
    RectPrimitive, TextPrimitive,
};
use kline_core::view::{View, ViewContext, ViewStack};
use kline_core::widget::{
    DrawWidget, FrameScheduler, ManualFrameScheduler, RedrawDispatch, UpdateLevel,
};

struct Fixture {
    store: TimeSeriesStore,
    x_axis: IndexAxis,
    y_axis: LinearAxis,
    styles: ChartStyles,
    figures: FigureRegistry,
    visible: Vec<VisibleData>,
}

impl Fixture {
    fn new() -> Self {
        let mut store = TimeSeriesStore::new(200.0, 10.0).expect("store");
        store.set_data(
            (0..5)
                .map(|i| KLineData::new(i * 60_000, 10.0, 12.0, 9.0, 11.0))
                .collect(),
        );
        let x_axis = store.x_axis().expect("x axis");
        let visible = store.visible_data();
        Self {
            store,
            x_axis,
            y_axis: LinearAxis::price(0.0, 20.0, 100.0).expect("y axis"),
            styles: ChartStyles::default(),
            figures: FigureRegistry::with_builtins(),
            visible,
        }
    }

    fn context(&self) -> ViewContext<'_> {
        ViewContext {
            pane_id: PaneId::CANDLE,
            bounding: Bounding::from_size(200.0, 100.0),
            store: &self.store,
            x_axis: &self.x_axis,
            y_axis: &self.y_axis,
            styles: &self.styles,
            figures: &self.figures,
            visible_data: &self.visible,
            bar_space: self.store.bar_space(),
        }
    }
}

/// Draws one diagonal line and records its name.
struct RecordingView {
    name: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl View for RecordingView {
    fn name(&self) -> &str {
        self.name
    }

    fn draw_imp(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) -> ChartResult<()> {
        self.log.borrow_mut().push(self.name);
        let spec = FigureSpec::new(
            "line",
            FigureAttrs::Line(LineAttrs::segment(
                Coordinate::new(0.0, 0.0),
                Coordinate::new(10.0, 10.0),
            )),
            FigureStyles::Line(LineStyles {
                color: Color::rgb(0.0, 0.0, 0.0),
                size: 1.0,
                style: LineStrokeStyle::Solid,
            }),
        );
        match ctx.figures.create_figure(spec) {
            Some(figure) => figure.draw(canvas),
            None => Ok(()),
        }
    }
}

struct FailingView;

impl View for FailingView {
    fn name(&self) -> &str {
        "failing"
    }

    fn draw_imp(&mut self, _canvas: &mut dyn Canvas, _ctx: &ViewContext<'_>) -> ChartResult<()> {
        Err(ChartError::Paint("gradient stop rejected".to_owned()))
    }
}

fn build_widget(
    host: &mut HeadlessHost,
    log: &Rc<RefCell<Vec<&'static str>>>,
) -> DrawWidget<HeadlessCanvas, ViewStack> {
    let mut widget = DrawWidget::new(host, ViewStack::new()).expect("widget init");
    widget.add_view(
        CanvasLayer::Main,
        RecordingView {
            name: "main-a",
            log: Rc::clone(log),
        },
    );
    widget.add_view(
        CanvasLayer::Main,
        RecordingView {
            name: "main-b",
            log: Rc::clone(log),
        },
    );
    widget.add_view(
        CanvasLayer::Overlay,
        RecordingView {
            name: "overlay",
            log: Rc::clone(log),
        },
    );
    widget
}

fn bounding() -> Bounding {
    Bounding::from_size(200.0, 100.0)
}

#[test]
fn host_without_2d_support_aborts_construction() {
    let mut host = HeadlessHost::without_2d_support();
    let result = DrawWidget::<HeadlessCanvas, ViewStack>::new(&mut host, ViewStack::new());
    assert!(matches!(
        result,
        Err(ChartError::SurfaceUnavailable {
            layer: CanvasLayer::Main
        })
    ));
}

#[test]
fn first_update_resizes_and_escalates_to_drawer() {
    let fixture = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut host = HeadlessHost::new(2.0);
    let journal = host.journal();
    let mut widget = build_widget(&mut host, &log);
    let mut scheduler = ManualFrameScheduler::new();

    widget
        .update(UpdateLevel::Overlay, bounding(), &mut scheduler)
        .expect("update");
    assert_eq!(widget.pending_level(), Some(UpdateLevel::Drawer));
    assert_eq!(widget.main_canvas().backing_size().width, 400);
    assert_eq!(widget.overlay_canvas().backing_size().height, 200);

    // Nothing is drawn until the frame fires.
    assert!(log.borrow().is_empty());
    assert!(
        journal
            .entries()
            .iter()
            .all(|entry| matches!(entry.op, CanvasOp::Resize(_)))
    );

    let handle = scheduler.take_due()[0];
    let dispatch = widget.run_frame(handle, &fixture.context());
    assert_eq!(dispatch, Some(RedrawDispatch::Both));
    assert_eq!(*log.borrow(), vec!["main-a", "main-b", "overlay"]);
}

#[test]
fn consecutive_updates_coalesce_into_the_last_request() {
    let fixture = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut host = HeadlessHost::default();
    let mut widget = build_widget(&mut host, &log);
    let mut scheduler = ManualFrameScheduler::new();

    widget
        .update(UpdateLevel::All, bounding(), &mut scheduler)
        .expect("initial update");
    let initial = scheduler.take_due()[0];
    widget.run_frame(initial, &fixture.context());
    log.borrow_mut().clear();

    for level in [UpdateLevel::Main, UpdateLevel::All, UpdateLevel::Overlay] {
        widget
            .update(level, bounding(), &mut scheduler)
            .expect("update");
    }
    assert_eq!(scheduler.pending().len(), 1);
    assert_eq!(scheduler.cancelled_count(), 2);
    assert_eq!(widget.pending_level(), Some(UpdateLevel::Overlay));

    let handle = scheduler.take_due()[0];
    assert_eq!(widget.pending_handle(), Some(handle));
    assert_eq!(
        widget.run_frame(handle, &fixture.context()),
        Some(RedrawDispatch::Overlay)
    );
    assert_eq!(*log.borrow(), vec!["overlay"]);
    assert_eq!(widget.main_canvas().clear_count(), 1);
    assert_eq!(widget.overlay_canvas().clear_count(), 2);
}

#[test]
fn resize_keeps_drawer_through_later_weaker_requests() {
    let fixture = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut host = HeadlessHost::default();
    let mut widget = build_widget(&mut host, &log);
    let mut scheduler = ManualFrameScheduler::new();

    widget
        .update(UpdateLevel::Main, bounding(), &mut scheduler)
        .expect("first update");
    let first = scheduler.take_due()[0];
    widget.run_frame(first, &fixture.context());

    widget
        .update(
            UpdateLevel::Overlay,
            Bounding::from_size(300.0, 120.0),
            &mut scheduler,
        )
        .expect("resize");
    widget
        .update(
            UpdateLevel::Overlay,
            Bounding::from_size(300.0, 120.0),
            &mut scheduler,
        )
        .expect("overlay only");
    assert_eq!(widget.pending_level(), Some(UpdateLevel::Drawer));

    let handle = scheduler.take_due()[0];
    assert_eq!(
        widget.run_frame(handle, &fixture.context()),
        Some(RedrawDispatch::Both)
    );
    assert_eq!(widget.main_canvas().logical_size(), (300.0, 120.0));
}

#[test]
fn pixel_ratio_change_reallocates_backing_stores() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut host = HeadlessHost::default();
    let mut widget = build_widget(&mut host, &log);
    let mut scheduler = ManualFrameScheduler::new();

    widget
        .update(UpdateLevel::All, bounding(), &mut scheduler)
        .expect("update");
    scheduler.take_due();
    widget.set_pixel_ratio(1.5).expect("ratio");
    widget
        .update(UpdateLevel::Main, bounding(), &mut scheduler)
        .expect("update");

    assert_eq!(widget.pending_level(), Some(UpdateLevel::Drawer));
    assert_eq!(widget.main_canvas().backing_size().width, 300);
    assert_eq!(widget.overlay_canvas().backing_size().height, 150);
}

#[test]
fn main_is_cleared_and_drawn_before_overlay() {
    let fixture = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut host = HeadlessHost::default();
    let journal = host.journal();
    let mut widget = build_widget(&mut host, &log);
    let mut scheduler = ManualFrameScheduler::new();

    widget
        .update(UpdateLevel::All, bounding(), &mut scheduler)
        .expect("update");
    journal.take();
    let handle = scheduler.take_due()[0];
    widget.run_frame(handle, &fixture.context());

    let layers: Vec<(CanvasLayer, CanvasOp)> = journal
        .take()
        .into_iter()
        .map(|entry| (entry.layer, entry.op))
        .collect();
    assert_eq!(
        layers,
        vec![
            (CanvasLayer::Main, CanvasOp::Clear),
            (CanvasLayer::Main, CanvasOp::Line),
            (CanvasLayer::Main, CanvasOp::Line),
            (CanvasLayer::Overlay, CanvasOp::Clear),
            (CanvasLayer::Overlay, CanvasOp::Line),
        ]
    );
}

#[test]
fn stale_and_cancelled_handles_do_nothing() {
    let fixture = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut host = HeadlessHost::default();
    let mut widget = build_widget(&mut host, &log);
    let mut scheduler = ManualFrameScheduler::new();

    widget
        .update(UpdateLevel::All, bounding(), &mut scheduler)
        .expect("update");
    let superseded = scheduler.pending()[0];
    widget
        .update(UpdateLevel::Main, bounding(), &mut scheduler)
        .expect("update");

    assert_eq!(widget.run_frame(superseded, &fixture.context()), None);
    assert!(log.borrow().is_empty());

    let current = scheduler.take_due()[0];
    assert!(widget.run_frame(current, &fixture.context()).is_some());
    assert_eq!(widget.run_frame(current, &fixture.context()), None);
}

#[test]
fn invalid_bounding_is_rejected_without_scheduling() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut host = HeadlessHost::default();
    let mut widget = build_widget(&mut host, &log);
    let mut scheduler = ManualFrameScheduler::new();

    let err = widget
        .update(
            UpdateLevel::All,
            Bounding::from_size(0.0, 100.0),
            &mut scheduler,
        )
        .expect_err("zero width");
    assert!(matches!(err, ChartError::InvalidViewport { .. }));
    assert!(scheduler.pending().is_empty());
    assert_eq!(widget.pending_level(), None);
}

#[test]
fn failing_view_does_not_abort_the_frame() {
    let fixture = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut host = HeadlessHost::default();
    let mut widget = DrawWidget::new(&mut host, ViewStack::new()).expect("widget init");
    widget.add_view(CanvasLayer::Main, FailingView);
    widget.add_view(
        CanvasLayer::Main,
        RecordingView {
            name: "after-failure",
            log: Rc::clone(&log),
        },
    );
    let mut scheduler = ManualFrameScheduler::new();

    widget
        .update(UpdateLevel::Main, bounding(), &mut scheduler)
        .expect("update");
    let handle = scheduler.take_due()[0];
    widget.run_frame(handle, &fixture.context());

    assert_eq!(*log.borrow(), vec!["after-failure"]);
    assert_eq!(widget.main_canvas().frame().lines.len(), 1);
    assert_eq!(
        widget.content().view_names(CanvasLayer::Main),
        vec!["failing", "after-failure"]
    );
}

#[test]
fn request_frame_hands_out_increasing_handles() {
    let mut scheduler = ManualFrameScheduler::new();
    let first = scheduler.request_frame();
    let second = scheduler.request_frame();
    assert!(second > first);
}

/// Headless canvas whose next resize can be made to fail.
struct FlakyCanvas {
    inner: HeadlessCanvas,
    fail_next_resize: Rc<Cell<bool>>,
}

impl Canvas for FlakyCanvas {
    fn logical_size(&self) -> (f64, f64) {
        self.inner.logical_size()
    }

    fn pixel_ratio(&self) -> f64 {
        self.inner.pixel_ratio()
    }

    fn backing_size(&self) -> BackingSize {
        self.inner.backing_size()
    }

    fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) -> ChartResult<()> {
        if self.fail_next_resize.replace(false) {
            return Err(ChartError::Backend("surface allocation failed".to_owned()));
        }
        self.inner.resize(width, height, pixel_ratio)
    }

    fn clear(&mut self) -> ChartResult<()> {
        self.inner.clear()
    }

    fn stroke_line(&mut self, line: &LinePrimitive) -> ChartResult<()> {
        self.inner.stroke_line(line)
    }

    fn draw_circle(&mut self, circle: &CirclePrimitive) -> ChartResult<()> {
        self.inner.draw_circle(circle)
    }

    fn draw_rect(&mut self, rect: &RectPrimitive) -> ChartResult<()> {
        self.inner.draw_rect(rect)
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> ChartResult<()> {
        self.inner.draw_text(text)
    }

    fn fill_polygon(&mut self, polygon: &PolygonPrimitive) -> ChartResult<()> {
        self.inner.fill_polygon(polygon)
    }
}

#[derive(Default)]
struct FlakyHost {
    overlay_fails: Rc<Cell<bool>>,
}

impl CanvasHost for FlakyHost {
    type Canvas = FlakyCanvas;

    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    fn create_canvas(&mut self, layer: CanvasLayer) -> Option<FlakyCanvas> {
        let fail_next_resize = match layer {
            CanvasLayer::Main => Rc::new(Cell::new(false)),
            CanvasLayer::Overlay => Rc::clone(&self.overlay_fails),
        };
        Some(FlakyCanvas {
            inner: HeadlessCanvas::new(layer, CanvasJournal::default()),
            fail_next_resize,
        })
    }
}

#[test]
fn failed_overlay_resize_is_retried_on_the_next_update() {
    let mut host = FlakyHost::default();
    let overlay_fails = Rc::clone(&host.overlay_fails);
    let mut widget = DrawWidget::new(&mut host, ViewStack::new()).expect("widget init");
    let mut scheduler = ManualFrameScheduler::new();
    let resized = Bounding::from_size(200.0, 80.0);

    widget
        .update(UpdateLevel::All, Bounding::from_size(100.0, 50.0), &mut scheduler)
        .expect("initial update");
    overlay_fails.set(true);
    assert!(matches!(
        widget.update(UpdateLevel::All, resized, &mut scheduler),
        Err(ChartError::Backend(_))
    ));
    assert_eq!(widget.main_canvas().logical_size(), (200.0, 80.0));
    assert_eq!(widget.overlay_canvas().logical_size(), (100.0, 50.0));

    widget
        .update(UpdateLevel::Main, resized, &mut scheduler)
        .expect("retry");
    assert_eq!(widget.overlay_canvas().logical_size(), (200.0, 80.0));
    assert_eq!(widget.pending_level(), Some(UpdateLevel::Drawer));
}
