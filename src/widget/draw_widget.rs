use tracing::{debug, trace, warn};

use crate::core::Bounding;
use crate::error::{ChartError, ChartResult};
use crate::render::{Canvas, CanvasHost, CanvasLayer};
use crate::view::ViewContext;
use crate::widget::{FrameHandle, FrameScheduler, RedrawDispatch, UpdateLevel};

/// Content painted by a `DrawWidget` into its two canvases.
pub trait WidgetContent {
    fn update_main(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>);
    fn update_overlay(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingFrame {
    handle: FrameHandle,
    level: UpdateLevel,
}

/// Double-buffered widget: a main canvas with an overlay canvas stacked on
/// top, each invalidated independently.
///
/// `update` never draws. It resizes when the bounding size changed and
/// schedules a single coalesced frame; `run_frame` clears and repaints the
/// canvases the frame's level implicates, main before overlay.
#[derive(Debug)]
pub struct DrawWidget<C: Canvas, W: WidgetContent> {
    main: C,
    overlay: C,
    content: W,
    bounding: Bounding,
    pixel_ratio: f64,
    pixel_ratio_dirty: bool,
    pending: Option<PendingFrame>,
}

impl<C: Canvas, W: WidgetContent> DrawWidget<C, W> {
    /// Creates both surfaces through `host`. A host without 2D support is
    /// a configuration error and aborts construction.
    pub fn new<H>(host: &mut H, content: W) -> ChartResult<Self>
    where
        H: CanvasHost<Canvas = C>,
    {
        let main = host
            .create_canvas(CanvasLayer::Main)
            .ok_or(ChartError::SurfaceUnavailable {
                layer: CanvasLayer::Main,
            })?;
        let overlay = host
            .create_canvas(CanvasLayer::Overlay)
            .ok_or(ChartError::SurfaceUnavailable {
                layer: CanvasLayer::Overlay,
            })?;
        let pixel_ratio = host.device_pixel_ratio();
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(ChartError::InvalidData(
                "device pixel ratio must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self {
            main,
            overlay,
            content,
            bounding: Bounding::default(),
            pixel_ratio,
            pixel_ratio_dirty: false,
            pending: None,
        })
    }

    #[must_use]
    pub fn bounding(&self) -> Bounding {
        self.bounding
    }

    #[must_use]
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Changes the device pixel ratio; the next `update` reallocates both
    /// backing stores.
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f64) -> ChartResult<()> {
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(ChartError::InvalidData(
                "device pixel ratio must be finite and > 0".to_owned(),
            ));
        }
        if pixel_ratio != self.pixel_ratio {
            self.pixel_ratio = pixel_ratio;
            self.pixel_ratio_dirty = true;
        }
        Ok(())
    }

    #[must_use]
    pub fn main_canvas(&self) -> &C {
        &self.main
    }

    #[must_use]
    pub fn overlay_canvas(&self) -> &C {
        &self.overlay
    }

    #[must_use]
    pub fn content(&self) -> &W {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut W {
        &mut self.content
    }

    /// Level of the frame waiting to run, if any.
    #[must_use]
    pub fn pending_level(&self) -> Option<UpdateLevel> {
        self.pending.map(|pending| pending.level)
    }

    #[must_use]
    pub fn pending_handle(&self) -> Option<FrameHandle> {
        self.pending.map(|pending| pending.handle)
    }

    /// Central invalidation entry point.
    ///
    /// A size (or pixel ratio) change reallocates both backing stores right
    /// away and escalates to `Drawer`. Any frame still pending is cancelled
    /// and replaced; a pending `Drawer` stays `Drawer` since the canvases it
    /// must repaint were already reallocated.
    pub fn update(
        &mut self,
        level: UpdateLevel,
        bounding: Bounding,
        scheduler: &mut dyn FrameScheduler,
    ) -> ChartResult<()> {
        if !bounding.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: bounding.width,
                height: bounding.height,
            });
        }

        let mut level = level;
        let size = (bounding.width, bounding.height);
        // Either surface may lag behind after a failed resize.
        if self.pixel_ratio_dirty
            || self.main.logical_size() != size
            || self.overlay.logical_size() != size
        {
            self.main
                .resize(bounding.width, bounding.height, self.pixel_ratio)?;
            self.overlay
                .resize(bounding.width, bounding.height, self.pixel_ratio)?;
            self.pixel_ratio_dirty = false;
            debug!(
                requested = ?level,
                width = bounding.width,
                height = bounding.height,
                pixel_ratio = self.pixel_ratio,
                "widget resized, escalating to drawer"
            );
            level = UpdateLevel::Drawer;
        }
        self.bounding = bounding;

        if let Some(previous) = self.pending.take() {
            scheduler.cancel_frame(previous.handle);
            trace!(
                superseded = ?previous.level,
                requested = ?level,
                "pending frame superseded"
            );
            if previous.level == UpdateLevel::Drawer {
                level = UpdateLevel::Drawer;
            }
        }

        let handle = scheduler.request_frame();
        self.pending = Some(PendingFrame { handle, level });
        Ok(())
    }

    /// Frame callback. Runs the pending redraw when `handle` is the current
    /// one; stale or cancelled handles do nothing and return `None`.
    pub fn run_frame(
        &mut self,
        handle: FrameHandle,
        ctx: &ViewContext<'_>,
    ) -> Option<RedrawDispatch> {
        let pending = match self.pending {
            Some(pending) if pending.handle == handle => pending,
            _ => {
                trace!(handle = handle.raw(), "ignoring stale frame handle");
                return None;
            }
        };
        self.pending = None;

        let dispatch = pending.level.dispatch();
        if dispatch.includes_main() {
            if let Err(err) = self.main.clear() {
                warn!(error = %err, layer = ?CanvasLayer::Main, "canvas clear failed");
            }
            self.content.update_main(&mut self.main, ctx);
        }
        if dispatch.includes_overlay() {
            if let Err(err) = self.overlay.clear() {
                warn!(error = %err, layer = ?CanvasLayer::Overlay, "canvas clear failed");
            }
            self.content.update_overlay(&mut self.overlay, ctx);
        }
        Some(dispatch)
    }
}
