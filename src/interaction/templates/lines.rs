//! Line-shaped marks.

use crate::config::GraphicMarkStyles;
use crate::core::geometry::{
    check_coordinate_on_ray_line, check_coordinate_on_segment,
    check_coordinate_on_straight_line, parallel_lines, ray_line_end, straight_line_ends,
};
use crate::core::{Coordinate, TimePricePoint};
use crate::error::ChartResult;
use crate::interaction::{GraphicGroup, GraphicShape, MarkGeometry, MarkTemplate};
use crate::render::{Canvas, Color, Paint, PolygonPrimitive};

fn line_hit(shape: GraphicShape<'_>, target: Coordinate) -> bool {
    match shape {
        GraphicShape::Line([start, end]) => check_coordinate_on_segment(*start, *end, target),
        GraphicShape::Text(_) => false,
    }
}

/// Two-point segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segment;

impl MarkTemplate for Segment {
    fn name(&self) -> &'static str {
        "segment"
    }

    fn total_step(&self) -> usize {
        2
    }

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup> {
        match geometry.coordinates {
            [start, end] => vec![GraphicGroup::lines(vec![[*start, *end]])],
            _ => Vec::new(),
        }
    }

    fn check_mouse_point_on(&self, shape: GraphicShape<'_>, target: Coordinate) -> bool {
        line_hit(shape, target)
    }

    fn perform_mouse_move_for_drawing(
        &self,
        _step: usize,
        _tracked: &mut TimePricePoint,
        _placed: &[TimePricePoint],
    ) {
    }

    fn perform_mouse_pressed_move(
        &self,
        _index: usize,
        _dragged: &mut TimePricePoint,
        _points: &[TimePricePoint],
    ) {
    }

    fn draw_extend(
        &self,
        _canvas: &mut dyn Canvas,
        _geometry: &MarkGeometry<'_>,
        _styles: &GraphicMarkStyles,
    ) -> ChartResult<()> {
        Ok(())
    }
}

/// Ray from the first point through the second, to the canvas edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayLine;

impl MarkTemplate for RayLine {
    fn name(&self) -> &'static str {
        "rayLine"
    }

    fn total_step(&self) -> usize {
        2
    }

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup> {
        match geometry.coordinates {
            [start, end] => vec![GraphicGroup::lines(vec![[
                *start,
                ray_line_end(*start, *end, geometry.bounding),
            ]])],
            _ => Vec::new(),
        }
    }

    fn check_mouse_point_on(&self, shape: GraphicShape<'_>, target: Coordinate) -> bool {
        match shape {
            GraphicShape::Line([start, end]) => check_coordinate_on_ray_line(*start, *end, target),
            GraphicShape::Text(_) => false,
        }
    }

    fn perform_mouse_move_for_drawing(
        &self,
        _step: usize,
        _tracked: &mut TimePricePoint,
        _placed: &[TimePricePoint],
    ) {
    }

    fn perform_mouse_pressed_move(
        &self,
        _index: usize,
        _dragged: &mut TimePricePoint,
        _points: &[TimePricePoint],
    ) {
    }

    fn draw_extend(
        &self,
        _canvas: &mut dyn Canvas,
        _geometry: &MarkGeometry<'_>,
        _styles: &GraphicMarkStyles,
    ) -> ChartResult<()> {
        Ok(())
    }
}

/// Infinite line through two points, clipped to the canvas.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLine;

impl MarkTemplate for StraightLine {
    fn name(&self) -> &'static str {
        "straightLine"
    }

    fn total_step(&self) -> usize {
        2
    }

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup> {
        match geometry.coordinates {
            [start, end] => vec![GraphicGroup::lines(vec![straight_line_ends(
                *start,
                *end,
                geometry.bounding,
            )])],
            _ => Vec::new(),
        }
    }

    fn check_mouse_point_on(&self, shape: GraphicShape<'_>, target: Coordinate) -> bool {
        match shape {
            GraphicShape::Line([start, end]) => {
                check_coordinate_on_straight_line(*start, *end, target)
            }
            GraphicShape::Text(_) => false,
        }
    }

    fn perform_mouse_move_for_drawing(
        &self,
        _step: usize,
        _tracked: &mut TimePricePoint,
        _placed: &[TimePricePoint],
    ) {
    }

    fn perform_mouse_pressed_move(
        &self,
        _index: usize,
        _dragged: &mut TimePricePoint,
        _points: &[TimePricePoint],
    ) {
    }

    fn draw_extend(
        &self,
        _canvas: &mut dyn Canvas,
        _geometry: &MarkGeometry<'_>,
        _styles: &GraphicMarkStyles,
    ) -> ChartResult<()> {
        Ok(())
    }
}

/// Full-width horizontal line at one price.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalStraightLine;

impl MarkTemplate for HorizontalStraightLine {
    fn name(&self) -> &'static str {
        "horizontalStraightLine"
    }

    fn total_step(&self) -> usize {
        1
    }

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup> {
        match geometry.coordinates {
            [anchor] => vec![GraphicGroup::lines(vec![[
                Coordinate::new(0.0, anchor.y),
                Coordinate::new(geometry.bounding.width, anchor.y),
            ]])],
            _ => Vec::new(),
        }
    }

    fn check_mouse_point_on(&self, shape: GraphicShape<'_>, target: Coordinate) -> bool {
        line_hit(shape, target)
    }

    fn perform_mouse_move_for_drawing(
        &self,
        _step: usize,
        _tracked: &mut TimePricePoint,
        _placed: &[TimePricePoint],
    ) {
    }

    fn perform_mouse_pressed_move(
        &self,
        _index: usize,
        _dragged: &mut TimePricePoint,
        _points: &[TimePricePoint],
    ) {
    }

    fn draw_extend(
        &self,
        _canvas: &mut dyn Canvas,
        _geometry: &MarkGeometry<'_>,
        _styles: &GraphicMarkStyles,
    ) -> ChartResult<()> {
        Ok(())
    }
}

/// Horizontal ray from one anchor to the right edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalRayLine;

impl MarkTemplate for HorizontalRayLine {
    fn name(&self) -> &'static str {
        "horizontalRayLine"
    }

    fn total_step(&self) -> usize {
        1
    }

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup> {
        match geometry.coordinates {
            [anchor] => vec![GraphicGroup::lines(vec![[
                *anchor,
                Coordinate::new(geometry.bounding.width, anchor.y),
            ]])],
            _ => Vec::new(),
        }
    }

    fn check_mouse_point_on(&self, shape: GraphicShape<'_>, target: Coordinate) -> bool {
        line_hit(shape, target)
    }

    fn perform_mouse_move_for_drawing(
        &self,
        _step: usize,
        _tracked: &mut TimePricePoint,
        _placed: &[TimePricePoint],
    ) {
    }

    fn perform_mouse_pressed_move(
        &self,
        _index: usize,
        _dragged: &mut TimePricePoint,
        _points: &[TimePricePoint],
    ) {
    }

    fn draw_extend(
        &self,
        _canvas: &mut dyn Canvas,
        _geometry: &MarkGeometry<'_>,
        _styles: &GraphicMarkStyles,
    ) -> ChartResult<()> {
        Ok(())
    }
}

/// Full-height vertical line at one time.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalStraightLine;

impl MarkTemplate for VerticalStraightLine {
    fn name(&self) -> &'static str {
        "verticalStraightLine"
    }

    fn total_step(&self) -> usize {
        1
    }

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup> {
        match geometry.coordinates {
            [anchor] => vec![GraphicGroup::lines(vec![[
                Coordinate::new(anchor.x, 0.0),
                Coordinate::new(anchor.x, geometry.bounding.height),
            ]])],
            _ => Vec::new(),
        }
    }

    fn check_mouse_point_on(&self, shape: GraphicShape<'_>, target: Coordinate) -> bool {
        line_hit(shape, target)
    }

    fn perform_mouse_move_for_drawing(
        &self,
        _step: usize,
        _tracked: &mut TimePricePoint,
        _placed: &[TimePricePoint],
    ) {
    }

    fn perform_mouse_pressed_move(
        &self,
        _index: usize,
        _dragged: &mut TimePricePoint,
        _points: &[TimePricePoint],
    ) {
    }

    fn draw_extend(
        &self,
        _canvas: &mut dyn Canvas,
        _geometry: &MarkGeometry<'_>,
        _styles: &GraphicMarkStyles,
    ) -> ChartResult<()> {
        Ok(())
    }
}

/// Segment held at the price of its first point.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalSegment;

impl MarkTemplate for HorizontalSegment {
    fn name(&self) -> &'static str {
        "horizontalSegment"
    }

    fn total_step(&self) -> usize {
        2
    }

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup> {
        match geometry.coordinates {
            [start, end] => vec![GraphicGroup::lines(vec![[*start, *end]])],
            _ => Vec::new(),
        }
    }

    fn check_mouse_point_on(&self, shape: GraphicShape<'_>, target: Coordinate) -> bool {
        line_hit(shape, target)
    }

    fn perform_mouse_move_for_drawing(
        &self,
        step: usize,
        tracked: &mut TimePricePoint,
        placed: &[TimePricePoint],
    ) {
        if step == 2
            && let Some(first) = placed.first()
        {
            tracked.price = first.price;
        }
    }

    fn perform_mouse_pressed_move(
        &self,
        index: usize,
        dragged: &mut TimePricePoint,
        points: &[TimePricePoint],
    ) {
        // The segment keeps its price; dragging an end only moves it in time.
        if let Some(other) = points.get(1 - index.min(1)) {
            dragged.price = other.price;
        }
    }

    fn draw_extend(
        &self,
        _canvas: &mut dyn Canvas,
        _geometry: &MarkGeometry<'_>,
        _styles: &GraphicMarkStyles,
    ) -> ChartResult<()> {
        Ok(())
    }
}

/// Segment held at the time of its first point.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalSegment;

impl MarkTemplate for VerticalSegment {
    fn name(&self) -> &'static str {
        "verticalSegment"
    }

    fn total_step(&self) -> usize {
        2
    }

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup> {
        match geometry.coordinates {
            [start, end] => vec![GraphicGroup::lines(vec![[*start, *end]])],
            _ => Vec::new(),
        }
    }

    fn check_mouse_point_on(&self, shape: GraphicShape<'_>, target: Coordinate) -> bool {
        line_hit(shape, target)
    }

    fn perform_mouse_move_for_drawing(
        &self,
        step: usize,
        tracked: &mut TimePricePoint,
        placed: &[TimePricePoint],
    ) {
        if step == 2
            && let Some(first) = placed.first()
        {
            tracked.timestamp = first.timestamp;
            tracked.data_index = first.data_index;
        }
    }

    fn perform_mouse_pressed_move(
        &self,
        index: usize,
        dragged: &mut TimePricePoint,
        points: &[TimePricePoint],
    ) {
        if let Some(other) = points.get(1 - index.min(1)) {
            dragged.timestamp = other.timestamp;
            dragged.data_index = other.data_index;
        }
    }

    fn draw_extend(
        &self,
        _canvas: &mut dyn Canvas,
        _geometry: &MarkGeometry<'_>,
        _styles: &GraphicMarkStyles,
    ) -> ChartResult<()> {
        Ok(())
    }
}

/// Straight line through the first two points plus its parallel through
/// the third.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelStraightLine;

impl MarkTemplate for ParallelStraightLine {
    fn name(&self) -> &'static str {
        "parallelStraightLine"
    }

    fn total_step(&self) -> usize {
        3
    }

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup> {
        channel_groups(geometry, false)
    }

    fn check_mouse_point_on(&self, shape: GraphicShape<'_>, target: Coordinate) -> bool {
        match shape {
            GraphicShape::Line([start, end]) => {
                check_coordinate_on_straight_line(*start, *end, target)
            }
            GraphicShape::Text(_) => false,
        }
    }

    fn perform_mouse_move_for_drawing(
        &self,
        _step: usize,
        _tracked: &mut TimePricePoint,
        _placed: &[TimePricePoint],
    ) {
    }

    fn perform_mouse_pressed_move(
        &self,
        _index: usize,
        _dragged: &mut TimePricePoint,
        _points: &[TimePricePoint],
    ) {
    }

    fn draw_extend(
        &self,
        _canvas: &mut dyn Canvas,
        _geometry: &MarkGeometry<'_>,
        _styles: &GraphicMarkStyles,
    ) -> ChartResult<()> {
        Ok(())
    }
}

/// Parallel channel mirrored around the line through the first two points,
/// with a translucent band between the outer lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceChannelLine;

impl PriceChannelLine {
    const BAND_ALPHA: f64 = 0.1;
}

impl MarkTemplate for PriceChannelLine {
    fn name(&self) -> &'static str {
        "priceChannelLine"
    }

    fn total_step(&self) -> usize {
        3
    }

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup> {
        channel_groups(geometry, true)
    }

    fn check_mouse_point_on(&self, shape: GraphicShape<'_>, target: Coordinate) -> bool {
        match shape {
            GraphicShape::Line([start, end]) => {
                check_coordinate_on_straight_line(*start, *end, target)
            }
            GraphicShape::Text(_) => false,
        }
    }

    fn perform_mouse_move_for_drawing(
        &self,
        _step: usize,
        _tracked: &mut TimePricePoint,
        _placed: &[TimePricePoint],
    ) {
    }

    fn perform_mouse_pressed_move(
        &self,
        _index: usize,
        _dragged: &mut TimePricePoint,
        _points: &[TimePricePoint],
    ) {
    }

    fn draw_extend(
        &self,
        canvas: &mut dyn Canvas,
        geometry: &MarkGeometry<'_>,
        styles: &GraphicMarkStyles,
    ) -> ChartResult<()> {
        let [start, end, offset] = geometry.coordinates else {
            return Ok(());
        };
        if !start.is_finite() || !end.is_finite() || !offset.is_finite() {
            return Ok(());
        }
        let lines = parallel_lines(*start, *end, *offset, geometry.bounding, true);
        let [_, upper, lower] = lines.as_slice() else {
            return Ok(());
        };
        let band = PolygonPrimitive::new(
            vec![upper[0], upper[1], lower[1], lower[0]],
            Paint::Solid(band_color(styles.line.color)),
        );
        canvas.fill_polygon(&band)
    }
}

fn band_color(line: Color) -> Color {
    line.with_alpha(line.alpha * PriceChannelLine::BAND_ALPHA)
}

fn channel_groups(geometry: &MarkGeometry<'_>, mirrored: bool) -> Vec<GraphicGroup> {
    match geometry.coordinates {
        [start, end] => vec![GraphicGroup::lines(vec![straight_line_ends(
            *start,
            *end,
            geometry.bounding,
        )])],
        [start, end, offset] => vec![GraphicGroup::lines(parallel_lines(
            *start,
            *end,
            *offset,
            geometry.bounding,
            mirrored,
        ))],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{HorizontalSegment, PriceChannelLine, RayLine, Segment};
    use crate::core::{Bounding, Coordinate, Precision, TimePricePoint};
    use crate::interaction::{GraphicData, GraphicShape, MarkGeometry, MarkTemplate};

    fn geometry<'a>(
        coordinates: &'a [Coordinate],
        points: &'a [TimePricePoint],
    ) -> MarkGeometry<'a> {
        MarkGeometry {
            coordinates,
            points,
            bounding: Bounding::from_size(400.0, 200.0),
            precision: Precision::default(),
        }
    }

    #[test]
    fn segment_needs_both_points() {
        let points = [TimePricePoint::from_data_index(0, 1.0)];
        let one = [Coordinate::new(10.0, 10.0)];
        assert!(Segment.create_graphic_options(&geometry(&one, &points)).is_empty());
    }

    #[test]
    fn ray_extends_to_the_right_edge() {
        let coordinates = [Coordinate::new(10.0, 100.0), Coordinate::new(20.0, 90.0)];
        let groups = RayLine.create_graphic_options(&geometry(&coordinates, &[]));
        let GraphicData::Lines(lines) = &groups[0].data else {
            panic!("expected lines");
        };
        assert_eq!(lines[0][1].x, 400.0);
        assert!(
            RayLine.check_mouse_point_on(GraphicShape::Line(&lines[0]), Coordinate::new(110.0, 0.0))
        );
    }

    #[test]
    fn horizontal_segment_keeps_its_price() {
        let placed = [TimePricePoint::from_data_index(3, 42.0)];
        let mut tracked = TimePricePoint::from_data_index(9, 50.0);
        HorizontalSegment.perform_mouse_move_for_drawing(2, &mut tracked, &placed);
        assert_eq!(tracked.price, 42.0);
        assert_eq!(tracked.data_index, Some(9));

        let points = [placed[0], tracked];
        let mut dragged = TimePricePoint::from_data_index(1, 60.0);
        HorizontalSegment.perform_mouse_pressed_move(0, &mut dragged, &points);
        assert_eq!(dragged.price, 42.0);
        assert_eq!(dragged.data_index, Some(1));
    }

    #[test]
    fn price_channel_mirrors_the_offset_line() {
        let coordinates = [
            Coordinate::new(0.0, 100.0),
            Coordinate::new(100.0, 100.0),
            Coordinate::new(50.0, 80.0),
        ];
        let groups = PriceChannelLine.create_graphic_options(&geometry(&coordinates, &[]));
        let GraphicData::Lines(lines) = &groups[0].data else {
            panic!("expected lines");
        };
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2][0].y, 120.0);
    }
}
