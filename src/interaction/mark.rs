use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;
use tracing::debug;

use crate::config::{GraphicMarkStyles, MarkPointStyles};
use crate::core::geometry::check_coordinate_on_circle;
use crate::core::{Bounding, Coordinate, DataStore, Precision, TimePricePoint};
use crate::error::{ChartError, ChartResult};
use crate::figure::{
    CircleAttrs, CircleStyles, FigureAttrs, FigureSpec, FigureStyles, LineAttrs, LineStyles,
    TextAttrs, TextStyles,
};
use crate::render::{Canvas, TextHAlign, TextVAlign};
use crate::view::ViewContext;

static NEXT_MARK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a graphic mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(u64);

impl MarkId {
    fn next() -> Self {
        Self(NEXT_MARK_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mark#{}", self.0)
    }
}

/// Placement state: `Placing(step)` tracks point `step` (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStep {
    Placing(usize),
    Finished,
}

impl DrawStep {
    pub const START: Self = Self::Placing(1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverType {
    #[default]
    None,
    Point,
    Other,
}

/// Result of a confirming click while placing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The point was locked in; tracking continues with `step`.
    Advanced { step: usize },
    Finished,
    /// Nothing to confirm: finished already, or no point tracked yet for
    /// the current step.
    Ignored,
}

/// Label drawn by a mark, in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSource {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub align: TextHAlign,
    pub baseline: TextVAlign,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphicData {
    Lines(Vec<[Coordinate; 2]>),
    Texts(Vec<TextSource>),
}

/// Drawable group derived by a mark template. Groups with
/// `is_draw == Some(false)` are neither drawn nor hit-tested.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicGroup {
    pub is_draw: Option<bool>,
    pub data: GraphicData,
}

impl GraphicGroup {
    #[must_use]
    pub fn lines(lines: Vec<[Coordinate; 2]>) -> Self {
        Self {
            is_draw: None,
            data: GraphicData::Lines(lines),
        }
    }

    #[must_use]
    pub fn texts(texts: Vec<TextSource>) -> Self {
        Self {
            is_draw: None,
            data: GraphicData::Texts(texts),
        }
    }

    #[must_use]
    pub fn with_is_draw(mut self, is_draw: bool) -> Self {
        self.is_draw = Some(is_draw);
        self
    }

    #[must_use]
    pub fn is_drawn(&self) -> bool {
        self.is_draw != Some(false)
    }
}

/// One derived shape offered to `MarkTemplate::check_mouse_point_on`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphicShape<'a> {
    Line(&'a [Coordinate; 2]),
    Text(&'a TextSource),
}

/// Pixel-space view of a mark handed to its template.
#[derive(Debug, Clone, Copy)]
pub struct MarkGeometry<'a> {
    /// Pixel position of every placed point, index-aligned with `points`.
    pub coordinates: &'a [Coordinate],
    pub points: &'a [TimePricePoint],
    /// Canvas rectangle, origin at zero.
    pub bounding: Bounding,
    pub precision: Precision,
}

/// Capabilities of one kind of graphic mark.
///
/// The state machine owns placement and hover bookkeeping and the generic
/// line/text/point drawing; a template supplies the geometry derived from
/// the placed points and its hit-testing.
pub trait MarkTemplate {
    fn name(&self) -> &'static str;

    /// Number of anchor points, at least one.
    fn total_step(&self) -> usize;

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup>;

    fn check_mouse_point_on(&self, shape: GraphicShape<'_>, target: Coordinate) -> bool;

    /// Adjusts the point being tracked for `step` while placing. `placed`
    /// holds the points confirmed before it.
    fn perform_mouse_move_for_drawing(
        &self,
        step: usize,
        tracked: &mut TimePricePoint,
        placed: &[TimePricePoint],
    );

    /// Adjusts a dragged point. Only `dragged` may change; `points` is the
    /// state before the drag step.
    fn perform_mouse_pressed_move(
        &self,
        index: usize,
        dragged: &mut TimePricePoint,
        points: &[TimePricePoint],
    );

    /// Extra painting after the generic groups.
    fn draw_extend(
        &self,
        canvas: &mut dyn Canvas,
        geometry: &MarkGeometry<'_>,
        styles: &GraphicMarkStyles,
    ) -> ChartResult<()>;
}

/// Interactive annotation anchored to time/price points.
pub struct GraphicMark {
    id: MarkId,
    template: Box<dyn MarkTemplate>,
    draw_step: DrawStep,
    points: Vec<TimePricePoint>,
    hover_type: HoverType,
    hover_index: Option<usize>,
}

impl GraphicMark {
    /// Starts placing a new mark at `DrawStep::START`.
    pub fn new(template: Box<dyn MarkTemplate>) -> ChartResult<Self> {
        if template.total_step() == 0 {
            return Err(ChartError::InvalidData(format!(
                "graphic mark `{}` must have at least one point",
                template.name()
            )));
        }
        let mark = Self {
            id: MarkId::next(),
            template,
            draw_step: DrawStep::START,
            points: Vec::new(),
            hover_type: HoverType::None,
            hover_index: None,
        };
        debug!(mark = %mark.id, name = mark.name(), "graphic mark created");
        Ok(mark)
    }

    #[must_use]
    pub fn id(&self) -> MarkId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.template.name()
    }

    #[must_use]
    pub fn total_step(&self) -> usize {
        self.template.total_step()
    }

    #[must_use]
    pub fn draw_step(&self) -> DrawStep {
        self.draw_step
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.draw_step == DrawStep::Finished
    }

    #[must_use]
    pub fn points(&self) -> &[TimePricePoint] {
        &self.points
    }

    #[must_use]
    pub fn hover_type(&self) -> HoverType {
        self.hover_type
    }

    #[must_use]
    pub fn hover_index(&self) -> Option<usize> {
        self.hover_index
    }

    pub fn reset_hover_params(&mut self) {
        self.hover_type = HoverType::None;
        self.hover_index = None;
    }

    /// Tracks the point of the current step under the pointer. Returns
    /// `false` once the mark is finished.
    pub fn mouse_move_for_drawing(
        &mut self,
        ctx: &ViewContext<'_>,
        coordinate: Coordinate,
    ) -> bool {
        let DrawStep::Placing(step) = self.draw_step else {
            return false;
        };
        let mut tracked = point_from_pixel(ctx, coordinate);
        let placed = &self.points[..step - 1];
        self.template
            .perform_mouse_move_for_drawing(step, &mut tracked, placed);
        if self.points.len() >= step {
            self.points[step - 1] = tracked;
        } else {
            self.points.push(tracked);
        }
        true
    }

    /// Confirms the point tracked for the current step.
    pub fn mouse_left_button_down_for_drawing(&mut self) -> ClickOutcome {
        let DrawStep::Placing(step) = self.draw_step else {
            return ClickOutcome::Ignored;
        };
        if self.points.len() < step {
            debug!(mark = %self.id, step, "click without a tracked point ignored");
            return ClickOutcome::Ignored;
        }
        if step >= self.total_step() {
            self.draw_step = DrawStep::Finished;
            debug!(mark = %self.id, name = self.name(), "graphic mark finished");
            ClickOutcome::Finished
        } else {
            self.draw_step = DrawStep::Placing(step + 1);
            debug!(mark = %self.id, step = step + 1, "graphic mark advanced");
            ClickOutcome::Advanced { step: step + 1 }
        }
    }

    /// Drags the hovered point to `coordinate`. Requires a point hover.
    pub fn mouse_pressed_move(&mut self, ctx: &ViewContext<'_>, coordinate: Coordinate) -> bool {
        let (HoverType::Point, Some(index)) = (self.hover_type, self.hover_index) else {
            return false;
        };
        if index >= self.points.len() {
            return false;
        }
        let mut dragged = point_from_pixel(ctx, coordinate);
        self.template
            .perform_mouse_pressed_move(index, &mut dragged, &self.points);
        self.points[index] = dragged;
        true
    }

    /// Hit-tests `coordinate` against placed points first, then against the
    /// derived shapes. Updates hover state and returns whether anything hit.
    pub fn check_mouse_point_on_graphic(
        &mut self,
        ctx: &ViewContext<'_>,
        coordinate: Coordinate,
    ) -> bool {
        let coordinates = self.pixel_coordinates(ctx);
        let radius = ctx.styles.graphic_mark.point.radius;
        if let Some(index) = coordinates
            .iter()
            .position(|point| check_coordinate_on_circle(*point, radius, coordinate))
        {
            self.hover_type = HoverType::Point;
            self.hover_index = Some(index);
            return true;
        }

        let geometry = self.geometry(ctx, &coordinates);
        let groups = self.template.create_graphic_options(&geometry);
        if let Some(index) = drawn_shapes(&groups)
            .into_iter()
            .position(|shape| self.template.check_mouse_point_on(shape, coordinate))
        {
            self.hover_type = HoverType::Other;
            self.hover_index = Some(index);
            return true;
        }

        self.reset_hover_params();
        false
    }

    /// Paints the mark. Pixel positions are recomputed on every call.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, ctx: &ViewContext<'_>) -> ChartResult<()> {
        for point in &mut self.points {
            resolve_point(ctx.store, point);
        }
        let coordinates = self.pixel_coordinates(ctx);
        let styles = &ctx.styles.graphic_mark;

        if !self.points.is_empty() {
            let geometry = self.geometry(ctx, &coordinates);
            for group in self.template.create_graphic_options(&geometry) {
                if !group.is_drawn() {
                    continue;
                }
                match group.data {
                    GraphicData::Lines(lines) => draw_lines(canvas, ctx, &lines, styles)?,
                    GraphicData::Texts(texts) => draw_texts(canvas, ctx, texts, styles)?,
                }
            }
            self.template.draw_extend(canvas, &geometry, styles)?;
        }

        if self.hover_type != HoverType::None {
            for (index, coordinate) in coordinates.iter().enumerate() {
                let active =
                    self.hover_type == HoverType::Point && self.hover_index == Some(index);
                draw_point(canvas, ctx, *coordinate, &styles.point, active)?;
            }
        }
        Ok(())
    }

    fn pixel_coordinates(&self, ctx: &ViewContext<'_>) -> SmallVec<[Coordinate; 4]> {
        self.points
            .iter()
            .map(|point| pixel_from_point(ctx, point))
            .collect()
    }

    fn geometry<'a>(
        &'a self,
        ctx: &ViewContext<'_>,
        coordinates: &'a [Coordinate],
    ) -> MarkGeometry<'a> {
        MarkGeometry {
            coordinates,
            points: &self.points,
            bounding: ctx.local_bounding(),
            precision: ctx.store.precision(),
        }
    }
}

impl fmt::Debug for GraphicMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicMark")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("draw_step", &self.draw_step)
            .field("points", &self.points)
            .field("hover_type", &self.hover_type)
            .field("hover_index", &self.hover_index)
            .finish()
    }
}

/// Converts a pixel into a time/price point with both time anchors set.
/// A non-finite `x` leaves the point without time anchors.
#[must_use]
pub fn point_from_pixel(ctx: &ViewContext<'_>, coordinate: Coordinate) -> TimePricePoint {
    let index = ctx.x_axis.convert_from_pixel(coordinate.x).round();
    let data_index = index.is_finite().then_some(index as i64);
    TimePricePoint {
        timestamp: data_index.and_then(|index| ctx.store.data_index_to_timestamp(index)),
        data_index,
        price: ctx.y_axis.convert_from_pixel(coordinate.y),
    }
}

/// Pixel position of `point`; the timestamp anchor wins when both are set.
/// A point without any resolvable time anchor maps to a non-finite `x`.
#[must_use]
pub fn pixel_from_point(ctx: &ViewContext<'_>, point: &TimePricePoint) -> Coordinate {
    let data_index = point
        .timestamp
        .and_then(|timestamp| ctx.store.timestamp_to_data_index(timestamp))
        .or(point.data_index);
    let x = data_index.map_or(f64::NAN, |index| ctx.x_axis.convert_to_pixel(index as f64));
    Coordinate::new(x, ctx.y_axis.convert_to_pixel(point.price))
}

/// Fills in whichever time anchor is missing.
pub fn resolve_point(store: &dyn DataStore, point: &mut TimePricePoint) {
    match (point.timestamp, point.data_index) {
        (Some(timestamp), None) => point.data_index = store.timestamp_to_data_index(timestamp),
        (None, Some(data_index)) => point.timestamp = store.data_index_to_timestamp(data_index),
        _ => {}
    }
}

fn drawn_shapes(groups: &[GraphicGroup]) -> Vec<GraphicShape<'_>> {
    let mut shapes = Vec::new();
    for group in groups.iter().filter(|group| group.is_drawn()) {
        match &group.data {
            GraphicData::Lines(lines) => shapes.extend(lines.iter().map(GraphicShape::Line)),
            GraphicData::Texts(texts) => shapes.extend(texts.iter().map(GraphicShape::Text)),
        }
    }
    shapes
}

fn draw_lines(
    canvas: &mut dyn Canvas,
    ctx: &ViewContext<'_>,
    lines: &[[Coordinate; 2]],
    styles: &GraphicMarkStyles,
) -> ChartResult<()> {
    let line_styles = LineStyles {
        color: styles.line.color,
        size: styles.line.size,
        style: styles.line.style,
    };
    for [start, end] in lines {
        let spec = FigureSpec::new(
            "line",
            FigureAttrs::Line(LineAttrs::segment(*start, *end)),
            FigureStyles::Line(line_styles),
        );
        if let Some(figure) = ctx.figures.create_figure(spec) {
            figure.draw(canvas)?;
        }
    }
    Ok(())
}

fn draw_texts(
    canvas: &mut dyn Canvas,
    ctx: &ViewContext<'_>,
    texts: Vec<TextSource>,
    styles: &GraphicMarkStyles,
) -> ChartResult<()> {
    for text in texts {
        let spec = FigureSpec::new(
            "text",
            FigureAttrs::Text(TextAttrs {
                x: text.x,
                y: text.y,
                text: text.text,
            }),
            FigureStyles::Text(TextStyles {
                color: styles.text.color,
                size: styles.text.size,
                family: styles.text.family.clone(),
                align: text.align,
                baseline: text.baseline,
            }),
        );
        if let Some(figure) = ctx.figures.create_figure(spec) {
            figure.draw(canvas)?;
        }
    }
    Ok(())
}

fn draw_point(
    canvas: &mut dyn Canvas,
    ctx: &ViewContext<'_>,
    coordinate: Coordinate,
    styles: &MarkPointStyles,
    active: bool,
) -> ChartResult<()> {
    let (r, color, border_color, border_size) = if active {
        (
            styles.active_radius,
            styles.active_color,
            styles.active_border_color,
            styles.active_border_size,
        )
    } else {
        (
            styles.radius,
            styles.color,
            styles.border_color,
            styles.border_size,
        )
    };
    let spec = FigureSpec::new(
        "circle",
        FigureAttrs::Circle(CircleAttrs {
            x: coordinate.x,
            y: coordinate.y,
            r,
        }),
        FigureStyles::Circle(CircleStyles {
            color: Some(color),
            border_color,
            border_size,
        }),
    );
    match ctx.figures.create_figure(spec) {
        Some(figure) => figure.draw(canvas),
        None => Ok(()),
    }
}
