use std::hint::black_box;
use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use kline_core::config::ChartStyles;
use kline_core::core::{
    Axis, Bounding, Coordinate, DataStore, KLineData, LinearAxis, PaneId, TimeSeriesStore,
};
use kline_core::figure::FigureRegistry;
use kline_core::interaction::GraphicMark;
use kline_core::interaction::templates::Segment;
use kline_core::render::HeadlessHost;
use kline_core::view::ViewContext;
use kline_core::widget::{ManualFrameScheduler, RedrawQueue, UpdateLevel};
use kline_core::{CandlePane, CandlePaneConfig};

fn generated_bars(count: i64) -> Vec<KLineData> {
    (0..count)
        .map(|i| {
            let base = 100.0 + i as f64 * 0.05;
            let close = if i % 2 == 0 { base + 1.0 } else { base - 1.0 };
            let low = base.min(close) - 0.75;
            let high = base.max(close) + 0.75;
            KLineData::new(i * 60_000, base, high, low, close)
        })
        .collect()
}

fn bench_price_axis_round_trip(c: &mut Criterion) {
    let axis = LinearAxis::price(0.0, 10_000.0, 1080.0).expect("valid axis");

    c.bench_function("price_axis_round_trip", |b| {
        b.iter(|| {
            let px = axis.convert_to_pixel(black_box(4_321.123));
            axis.convert_from_pixel(px)
        })
    });
}

fn bench_visible_projection_10k(c: &mut Criterion) {
    let mut store = TimeSeriesStore::new(20_000.0, 2.0).expect("valid store");
    store.set_data(generated_bars(10_000));

    c.bench_function("visible_projection_10k", |b| {
        b.iter(|| black_box(&store).visible_data())
    });
}

fn bench_segment_hover(c: &mut Criterion) {
    let mut store = TimeSeriesStore::new(1600.0, 8.0).expect("valid store");
    store.set_data(generated_bars(2_000));
    let x_axis = store.x_axis().expect("x axis");
    let y_axis = LinearAxis::price(0.0, 250.0, 900.0).expect("y axis");
    let styles = ChartStyles::default();
    let figures = FigureRegistry::with_builtins();
    let visible = store.visible_data();
    let ctx = ViewContext {
        pane_id: PaneId::CANDLE,
        bounding: Bounding::from_size(1600.0, 900.0),
        store: &store,
        x_axis: &x_axis,
        y_axis: &y_axis,
        styles: &styles,
        figures: &figures,
        visible_data: &visible,
        bar_space: store.bar_space(),
    };

    let mut mark = GraphicMark::new(Box::new(Segment)).expect("segment");
    mark.mouse_move_for_drawing(&ctx, Coordinate::new(100.0, 700.0));
    mark.mouse_left_button_down_for_drawing();
    mark.mouse_move_for_drawing(&ctx, Coordinate::new(1400.0, 200.0));
    mark.mouse_left_button_down_for_drawing();

    c.bench_function("segment_hover_hit_test", |b| {
        b.iter(|| {
            let query = black_box(Coordinate::new(750.0, 450.0));
            mark.check_mouse_point_on_graphic(&ctx, query)
        })
    });
}

fn bench_pane_full_frame_2k(c: &mut Criterion) {
    let mut host = HeadlessHost::default();
    let queue = Rc::new(RedrawQueue::new());
    let mut pane = CandlePane::new(
        &mut host,
        CandlePaneConfig::new(1600.0, 900.0),
        Rc::clone(&queue),
    )
    .expect("pane init");
    pane.set_data(generated_bars(2_000));
    let mut scheduler = ManualFrameScheduler::new();

    c.bench_function("pane_full_frame_2k", |b| {
        b.iter(|| {
            pane.request_update(UpdateLevel::All);
            pane.flush(&mut scheduler).expect("flush");
            for handle in scheduler.take_due() {
                pane.run_frame(handle).expect("frame");
            }
        })
    });
}

criterion_group!(
    benches,
    bench_price_axis_round_trip,
    bench_visible_projection_10k,
    bench_segment_hover,
    bench_pane_full_frame_2k
);
criterion_main!(benches);
