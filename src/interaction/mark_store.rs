use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::core::{Coordinate, PaneId};
use crate::error::ChartResult;
use crate::interaction::templates::create_template;
use crate::interaction::{ClickOutcome, GraphicMark, HoverType, MarkId, MarkTemplate};
use crate::render::Canvas;
use crate::view::ViewContext;
use crate::widget::{RedrawTrigger, UpdateLevel};

/// Graphic marks of one pane: the finished marks plus the one being placed.
///
/// Routes pointer events to the right mark and asks for an overlay redraw
/// after every change.
pub struct GraphicMarkStore {
    pane_id: PaneId,
    trigger: Rc<dyn RedrawTrigger>,
    marks: Vec<GraphicMark>,
    progress: Option<GraphicMark>,
    pressed: Option<MarkId>,
}

impl GraphicMarkStore {
    #[must_use]
    pub fn new(pane_id: PaneId, trigger: Rc<dyn RedrawTrigger>) -> Self {
        Self {
            pane_id,
            trigger,
            marks: Vec::new(),
            progress: None,
            pressed: None,
        }
    }

    #[must_use]
    pub fn marks(&self) -> &[GraphicMark] {
        &self.marks
    }

    #[must_use]
    pub fn progress(&self) -> Option<&GraphicMark> {
        self.progress.as_ref()
    }

    #[must_use]
    pub fn get(&self, id: MarkId) -> Option<&GraphicMark> {
        self.progress
            .iter()
            .chain(&self.marks)
            .find(|mark| mark.id() == id)
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.progress.is_some()
    }

    /// Mark whose point is being dragged.
    #[must_use]
    pub fn dragging(&self) -> Option<MarkId> {
        self.pressed
    }

    /// Starts placing a built-in mark. Unknown names start nothing.
    pub fn start_drawing(&mut self, name: &str) -> ChartResult<Option<MarkId>> {
        let Some(template) = create_template(name) else {
            debug!(name, "unknown graphic mark name");
            return Ok(None);
        };
        self.start_drawing_with(template).map(Some)
    }

    /// Starts placing a mark with a custom template, replacing any mark
    /// still being placed.
    pub fn start_drawing_with(&mut self, template: Box<dyn MarkTemplate>) -> ChartResult<MarkId> {
        let mark = GraphicMark::new(template)?;
        let id = mark.id();
        // Hover is not re-tested while a mark is in progress.
        for finished in &mut self.marks {
            finished.reset_hover_params();
        }
        self.pressed = None;
        if let Some(cancelled) = self.progress.replace(mark) {
            debug!(mark = %cancelled.id(), "unfinished graphic mark replaced");
        }
        self.request_overlay();
        Ok(id)
    }

    pub fn cancel_drawing(&mut self) -> bool {
        let cancelled = self.progress.take().is_some();
        if cancelled {
            self.request_overlay();
        }
        cancelled
    }

    pub fn remove(&mut self, id: MarkId) -> bool {
        if self.progress.as_ref().is_some_and(|mark| mark.id() == id) {
            return self.cancel_drawing();
        }
        let before = self.marks.len();
        self.marks.retain(|mark| mark.id() != id);
        let removed = self.marks.len() != before;
        if removed {
            if self.pressed == Some(id) {
                self.pressed = None;
            }
            debug!(mark = %id, "graphic mark removed");
            self.request_overlay();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.marks.clear();
        self.progress = None;
        self.pressed = None;
        self.request_overlay();
    }

    /// Tracks the mark being placed, or updates hover state of the finished
    /// marks (topmost first). Returns whether the pointer is on a mark.
    pub fn mouse_move(&mut self, ctx: &ViewContext<'_>, coordinate: Coordinate) -> bool {
        if let Some(progress) = self.progress.as_mut() {
            let tracked = progress.mouse_move_for_drawing(ctx, coordinate);
            self.request_overlay();
            return tracked;
        }

        let before: Vec<(HoverType, Option<usize>)> = self
            .marks
            .iter()
            .map(|mark| (mark.hover_type(), mark.hover_index()))
            .collect();
        let mut hit = false;
        for mark in self.marks.iter_mut().rev() {
            if hit {
                mark.reset_hover_params();
            } else {
                hit = mark.check_mouse_point_on_graphic(ctx, coordinate);
            }
        }
        let changed = self
            .marks
            .iter()
            .zip(before)
            .any(|(mark, previous)| (mark.hover_type(), mark.hover_index()) != previous);
        if changed {
            self.request_overlay();
        }
        hit
    }

    /// Confirms a point of the mark being placed, or grabs the hovered
    /// point of a finished mark for dragging.
    pub fn mouse_left_button_down(&mut self) -> ClickOutcome {
        let Some(progress) = self.progress.as_mut() else {
            self.pressed = self
                .marks
                .iter()
                .rev()
                .find(|mark| mark.hover_type() == HoverType::Point)
                .map(GraphicMark::id);
            return ClickOutcome::Ignored;
        };
        let outcome = progress.mouse_left_button_down_for_drawing();
        if outcome == ClickOutcome::Finished
            && let Some(finished) = self.progress.take()
        {
            self.marks.push(finished);
        }
        if outcome != ClickOutcome::Ignored {
            self.request_overlay();
        }
        outcome
    }

    /// Drags the grabbed point. Returns whether a point moved.
    pub fn mouse_pressed_move(&mut self, ctx: &ViewContext<'_>, coordinate: Coordinate) -> bool {
        let Some(id) = self.pressed else {
            return false;
        };
        let moved = self
            .marks
            .iter_mut()
            .find(|mark| mark.id() == id)
            .is_some_and(|mark| mark.mouse_pressed_move(ctx, coordinate));
        if moved {
            self.request_overlay();
        }
        moved
    }

    pub fn mouse_up(&mut self) {
        self.pressed = None;
    }

    /// Draws finished marks in creation order, then the mark being placed.
    /// A failing mark is logged and skipped.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) {
        for mark in self.marks.iter_mut().chain(self.progress.as_mut()) {
            if let Err(err) = mark.draw(canvas, ctx) {
                warn!(mark = %mark.id(), error = %err, "graphic mark draw failed");
            }
        }
    }

    fn request_overlay(&self) {
        self.trigger
            .request_redraw(self.pane_id, UpdateLevel::Overlay);
    }
}

impl fmt::Debug for GraphicMarkStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicMarkStore")
            .field("pane_id", &self.pane_id)
            .field("marks", &self.marks)
            .field("progress", &self.progress)
            .field("pressed", &self.pressed)
            .finish_non_exhaustive()
    }
}
