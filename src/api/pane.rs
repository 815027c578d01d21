use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::config::ChartStyles;
use crate::core::{
    Bounding, Coordinate, DataStore, IndexAxis, KLineData, LinearAxis, PaneId, TimeSeriesStore,
    VisibleData,
};
use crate::error::ChartResult;
use crate::figure::FigureRegistry;
use crate::interaction::{ClickOutcome, GraphicMarkStore, MarkId};
use crate::render::{Canvas, CanvasHost, CanvasLayer};
use crate::view::{
    CandleAreaView, CandleBarView, GraphicMarkView, SessionBreakView, ViewContext, ViewStack,
};
use crate::widget::{
    DrawWidget, FrameHandle, FrameScheduler, RedrawDispatch, RedrawQueue, RedrawTrigger,
    UpdateLevel,
};

use super::CandlePaneConfig;

/// Vertical padding added above and below the visible price range.
const PRICE_MARGIN_RATIO: f64 = 0.1;

/// Read-only collaborators shared by frames and pointer routing.
#[derive(Debug)]
struct PaneModel {
    pane_id: PaneId,
    bounding: Bounding,
    store: TimeSeriesStore,
    price_axis: LinearAxis,
    styles: ChartStyles,
    figures: FigureRegistry,
}

impl PaneModel {
    fn context<'a>(
        &'a self,
        x_axis: &'a IndexAxis,
        visible_data: &'a [VisibleData],
    ) -> ViewContext<'a> {
        ViewContext {
            pane_id: self.pane_id,
            bounding: self.bounding,
            store: &self.store,
            x_axis,
            y_axis: &self.price_axis,
            styles: &self.styles,
            figures: &self.figures,
            visible_data,
            bar_space: self.store.bar_space(),
        }
    }

    /// Fits the price axis to the visible highs and lows. Windows without
    /// values keep the previous range.
    fn autoscale(&mut self, visible_data: &[VisibleData]) -> ChartResult<()> {
        let range = visible_data
            .iter()
            .filter_map(|data| data.data.filter(KLineData::has_value))
            .map(|candle| {
                if candle.has_ohlc() {
                    (candle.low, candle.high)
                } else {
                    (candle.close, candle.close)
                }
            })
            .reduce(|(min, max), (low, high)| (min.min(low), max.max(high)));
        let Some((mut min, mut max)) = range else {
            return Ok(());
        };
        if min == max {
            let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.01 };
            min -= pad;
            max += pad;
        }
        let margin = (max - min) * PRICE_MARGIN_RATIO;
        self.price_axis = LinearAxis::price(min - margin, max + margin, self.bounding.height)?;
        Ok(())
    }
}

/// One candle pane: a draw widget with the standard view composition plus
/// the collaborators its views read.
///
/// Main canvas: session breaks, candles, area series. Overlay canvas:
/// graphic marks. Every invalidation goes through the shared redraw queue
/// and is applied by `flush`.
pub struct CandlePane<C: Canvas> {
    widget: DrawWidget<C, ViewStack>,
    model: PaneModel,
    queue: Rc<RedrawQueue>,
    marks: Rc<RefCell<GraphicMarkStore>>,
}

impl<C: Canvas> CandlePane<C> {
    pub fn new<H>(
        host: &mut H,
        config: CandlePaneConfig,
        queue: Rc<RedrawQueue>,
    ) -> ChartResult<Self>
    where
        H: CanvasHost<Canvas = C>,
    {
        config.validate()?;
        let pane_id = config.pane_id;
        let trigger: Rc<dyn RedrawTrigger> = queue.clone();
        let marks = Rc::new(RefCell::new(GraphicMarkStore::new(
            pane_id,
            Rc::clone(&trigger),
        )));

        let mut widget = DrawWidget::new(host, ViewStack::new())?;
        widget.add_view(CanvasLayer::Main, SessionBreakView::new());
        widget.add_view(CanvasLayer::Main, CandleBarView::new());
        widget.add_view(CanvasLayer::Main, CandleAreaView::new(pane_id, trigger));
        widget.add_view(CanvasLayer::Overlay, GraphicMarkView::new(Rc::clone(&marks)));

        let mut store = TimeSeriesStore::new(config.width, config.bar_spacing)?;
        store.set_precision(config.precision);
        let model = PaneModel {
            pane_id,
            bounding: config.bounding(),
            store,
            price_axis: LinearAxis::price(0.0, 1.0, config.height)?,
            styles: config.styles,
            figures: FigureRegistry::with_builtins(),
        };

        queue.request_redraw(pane_id, UpdateLevel::All);
        debug!(
            pane = %pane_id,
            width = config.width,
            height = config.height,
            "candle pane created"
        );
        Ok(Self {
            widget,
            model,
            queue,
            marks,
        })
    }

    #[must_use]
    pub fn pane_id(&self) -> PaneId {
        self.model.pane_id
    }

    #[must_use]
    pub fn bounding(&self) -> Bounding {
        self.model.bounding
    }

    #[must_use]
    pub fn widget(&self) -> &DrawWidget<C, ViewStack> {
        &self.widget
    }

    #[must_use]
    pub fn store(&self) -> &TimeSeriesStore {
        &self.model.store
    }

    #[must_use]
    pub fn price_axis(&self) -> LinearAxis {
        self.model.price_axis
    }

    #[must_use]
    pub fn styles(&self) -> &ChartStyles {
        &self.model.styles
    }

    pub fn figures_mut(&mut self) -> &mut FigureRegistry {
        &mut self.model.figures
    }

    #[must_use]
    pub fn marks(&self) -> Ref<'_, GraphicMarkStore> {
        self.marks.borrow()
    }

    /// Queues a redraw of this pane; applied by the next `flush`.
    pub fn request_update(&self, level: UpdateLevel) {
        self.queue.request_redraw(self.model.pane_id, level);
    }

    pub fn set_bounding(&mut self, bounding: Bounding) -> ChartResult<()> {
        self.model.store.set_width(bounding.width)?;
        self.model.price_axis.set_length(bounding.height)?;
        self.model.bounding = bounding;
        self.request_update(UpdateLevel::All);
        Ok(())
    }

    pub fn set_styles(&mut self, styles: ChartStyles) -> ChartResult<()> {
        styles.validate()?;
        self.model.styles = styles;
        self.request_update(UpdateLevel::All);
        Ok(())
    }

    pub fn set_data(&mut self, data: Vec<KLineData>) {
        self.model.store.set_data(data);
        self.request_update(UpdateLevel::All);
    }

    /// Appends or replaces the latest bar.
    pub fn update_data(&mut self, candle: KLineData) -> ChartResult<()> {
        self.model.store.update_data(candle)?;
        self.request_update(UpdateLevel::All);
        Ok(())
    }

    pub fn set_visible_from(&mut self, index: usize) {
        self.model.store.set_visible_from(index);
        self.request_update(UpdateLevel::All);
    }

    /// Applies the queued redraw request of this pane, if any, and returns
    /// the level handed to the widget.
    pub fn flush(
        &mut self,
        scheduler: &mut dyn FrameScheduler,
    ) -> ChartResult<Option<UpdateLevel>> {
        let Some(level) = self.queue.take(self.model.pane_id) else {
            return Ok(None);
        };
        if level.dispatch().includes_main() {
            let visible_data = self.model.store.visible_data();
            self.model.autoscale(&visible_data)?;
        }
        self.widget.update(level, self.model.bounding, scheduler)?;
        Ok(Some(level))
    }

    /// Frame callback forwarded from the host scheduler.
    pub fn run_frame(&mut self, handle: FrameHandle) -> ChartResult<Option<RedrawDispatch>> {
        let x_axis = self.model.store.x_axis()?;
        let visible_data = self.model.store.visible_data();
        let ctx = self.model.context(&x_axis, &visible_data);
        Ok(self.widget.run_frame(handle, &ctx))
    }

    /// Advances view animations. Returns whether any is still running.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.widget.content_mut().tick(now_ms)
    }

    /// Starts placing a built-in mark; `None` for an unknown name.
    pub fn start_drawing(&mut self, name: &str) -> ChartResult<Option<MarkId>> {
        self.marks.borrow_mut().start_drawing(name)
    }

    pub fn cancel_drawing(&mut self) -> bool {
        self.marks.borrow_mut().cancel_drawing()
    }

    pub fn remove_mark(&mut self, id: MarkId) -> bool {
        self.marks.borrow_mut().remove(id)
    }

    pub fn clear_marks(&mut self) {
        self.marks.borrow_mut().clear();
    }

    pub fn mouse_move(&mut self, coordinate: Coordinate) -> ChartResult<bool> {
        let x_axis = self.model.store.x_axis()?;
        let visible_data = self.model.store.visible_data();
        let ctx = self.model.context(&x_axis, &visible_data);
        Ok(self.marks.borrow_mut().mouse_move(&ctx, coordinate))
    }

    pub fn mouse_left_button_down(&mut self) -> ClickOutcome {
        self.marks.borrow_mut().mouse_left_button_down()
    }

    pub fn mouse_pressed_move(&mut self, coordinate: Coordinate) -> ChartResult<bool> {
        let x_axis = self.model.store.x_axis()?;
        let visible_data = self.model.store.visible_data();
        let ctx = self.model.context(&x_axis, &visible_data);
        Ok(self.marks.borrow_mut().mouse_pressed_move(&ctx, coordinate))
    }

    pub fn mouse_up(&mut self) {
        self.marks.borrow_mut().mouse_up();
    }
}

impl<C: Canvas> std::fmt::Debug for CandlePane<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandlePane")
            .field("model", &self.model)
            .field("pending_level", &self.widget.pending_level())
            .field("marks", &self.marks)
            .finish_non_exhaustive()
    }
}
