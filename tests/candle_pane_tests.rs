use std::rc::Rc;

use kline_core::core::{Bounding, Coordinate, KLineData, PaneId};
use kline_core::interaction::{ClickOutcome, HoverType};
use kline_core::render::{Canvas, HeadlessCanvas, HeadlessHost};
use kline_core::widget::{ManualFrameScheduler, RedrawDispatch, RedrawQueue, UpdateLevel};
use kline_core::{CandlePane, CandlePaneConfig};

struct Harness {
    pane: CandlePane<HeadlessCanvas>,
    queue: Rc<RedrawQueue>,
    scheduler: ManualFrameScheduler,
}

impl Harness {
    /// 60 bars at spacing 8 in a 400 px pane: indices 10..60 are visible and
    /// index `i` is centred at `x = (i - 10) * 8 + 4`.
    fn new() -> Self {
        let mut host = HeadlessHost::default();
        let queue = Rc::new(RedrawQueue::new());
        let mut pane = CandlePane::new(
            &mut host,
            CandlePaneConfig::new(400.0, 200.0),
            Rc::clone(&queue),
        )
        .expect("pane");
        pane.set_data(
            (0..60)
                .map(|i| KLineData::new(i * 60_000, 10.0, 14.0, 6.0, 12.0))
                .collect(),
        );
        let mut harness = Self {
            pane,
            queue,
            scheduler: ManualFrameScheduler::new(),
        };
        harness.frame();
        harness
    }

    fn frame(&mut self) -> Option<RedrawDispatch> {
        self.pane.flush(&mut self.scheduler).expect("flush")?;
        let handle = *self.scheduler.take_due().last().expect("scheduled frame");
        self.pane.run_frame(handle).expect("frame")
    }

    fn place_segment(&mut self, from: Coordinate, to: Coordinate) {
        self.pane.start_drawing("segment").expect("template");
        assert!(self.pane.mouse_move(from).expect("move"));
        assert_eq!(
            self.pane.mouse_left_button_down(),
            ClickOutcome::Advanced { step: 2 }
        );
        assert!(self.pane.mouse_move(to).expect("move"));
        assert_eq!(self.pane.mouse_left_button_down(), ClickOutcome::Finished);
    }
}

#[test]
fn set_bounding_resizes_immediately_and_repaints_everything() {
    let mut harness = Harness::new();
    harness
        .pane
        .set_bounding(Bounding::from_size(600.0, 300.0))
        .expect("valid bounding");

    assert_eq!(harness.pane.flush(&mut harness.scheduler).expect("flush"), Some(UpdateLevel::All));
    assert_eq!(
        harness.pane.widget().pending_level(),
        Some(UpdateLevel::Drawer)
    );
    assert_eq!(harness.pane.widget().main_canvas().logical_size(), (600.0, 300.0));
    assert_eq!(harness.pane.widget().overlay_canvas().logical_size(), (600.0, 300.0));
    // 75 slots now fit, so the whole series is visible.
    assert_eq!(harness.pane.store().visible_from(), 0);

    let handle = harness.scheduler.take_due()[0];
    assert_eq!(harness.pane.run_frame(handle).expect("frame"), Some(RedrawDispatch::Both));
}

#[test]
fn invalid_bounding_is_rejected() {
    let mut harness = Harness::new();
    assert!(
        harness
            .pane
            .set_bounding(Bounding::from_size(0.0, 300.0))
            .is_err()
    );
    assert_eq!(harness.pane.bounding(), Bounding::from_size(400.0, 200.0));
}

#[test]
fn mark_edits_only_repaint_the_overlay() {
    let mut harness = Harness::new();
    let main_clears = harness.pane.widget().main_canvas().clear_count();

    harness.place_segment(Coordinate::new(100.0, 50.0), Coordinate::new(180.0, 120.0));
    assert_eq!(
        harness.queue.pending_level(PaneId::CANDLE),
        Some(UpdateLevel::Overlay)
    );
    assert_eq!(harness.frame(), Some(RedrawDispatch::Overlay));

    assert_eq!(harness.pane.widget().main_canvas().clear_count(), main_clears);
    assert_eq!(harness.pane.widget().overlay_canvas().frame().lines.len(), 1);
    let marks = harness.pane.marks();
    assert_eq!(marks.marks().len(), 1);
    assert_eq!(marks.marks()[0].points()[0].data_index, Some(22));
    assert_eq!(marks.marks()[0].points()[1].data_index, Some(32));
}

#[test]
fn hovered_point_can_be_dragged_through_the_pane() {
    let mut harness = Harness::new();
    harness.place_segment(Coordinate::new(100.0, 50.0), Coordinate::new(180.0, 120.0));
    harness.frame();

    assert!(harness.pane.mouse_move(Coordinate::new(101.0, 51.0)).expect("hover"));
    assert_eq!(harness.pane.marks().marks()[0].hover_type(), HoverType::Point);
    assert_eq!(harness.pane.mouse_left_button_down(), ClickOutcome::Ignored);
    assert!(
        harness
            .pane
            .mouse_pressed_move(Coordinate::new(140.0, 60.0))
            .expect("drag")
    );
    harness.pane.mouse_up();
    assert!(
        !harness
            .pane
            .mouse_pressed_move(Coordinate::new(150.0, 60.0))
            .expect("drag")
    );

    let marks = harness.pane.marks();
    assert_eq!(marks.marks()[0].points()[0].data_index, Some(27));
    assert_eq!(marks.marks()[0].points()[1].data_index, Some(32));
}

#[test]
fn removing_and_clearing_marks() {
    let mut harness = Harness::new();
    harness.place_segment(Coordinate::new(100.0, 50.0), Coordinate::new(180.0, 120.0));
    harness.place_segment(Coordinate::new(20.0, 20.0), Coordinate::new(60.0, 40.0));
    harness.frame();
    assert_eq!(harness.pane.widget().overlay_canvas().frame().lines.len(), 2);

    let first = harness.pane.marks().marks()[0].id();
    assert!(harness.pane.remove_mark(first));
    assert!(!harness.pane.remove_mark(first));
    assert_eq!(harness.frame(), Some(RedrawDispatch::Overlay));
    assert_eq!(harness.pane.widget().overlay_canvas().frame().lines.len(), 1);

    harness.pane.start_drawing("rayLine").expect("template");
    harness.pane.clear_marks();
    harness.frame();
    assert!(harness.pane.marks().marks().is_empty());
    assert!(!harness.pane.marks().is_drawing());
    assert!(harness.pane.widget().overlay_canvas().frame().is_empty());
}

#[test]
fn cancelled_drawing_leaves_no_mark() {
    let mut harness = Harness::new();
    harness.pane.start_drawing("fibonacciLine").expect("template");
    harness.pane.mouse_move(Coordinate::new(100.0, 50.0)).expect("move");
    assert!(harness.pane.cancel_drawing());
    assert!(!harness.pane.cancel_drawing());
    assert_eq!(
        harness.pane.start_drawing("unknown").expect("lookup"),
        None
    );

    harness.frame();
    assert!(harness.pane.marks().marks().is_empty());
}
