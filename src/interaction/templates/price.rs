use crate::config::GraphicMarkStyles;
use crate::core::geometry::check_coordinate_on_segment;
use crate::core::{Coordinate, TimePricePoint};
use crate::error::ChartResult;
use crate::interaction::{GraphicGroup, GraphicShape, MarkGeometry, MarkTemplate, TextSource};
use crate::render::{Canvas, TextHAlign, TextVAlign};

/// Horizontal ray to the right edge labelled with its price.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceLine;

impl PriceLine {
    const LABEL_GAP: f64 = 2.0;
}

impl MarkTemplate for PriceLine {
    fn name(&self) -> &'static str {
        "priceLine"
    }

    fn total_step(&self) -> usize {
        1
    }

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup> {
        let ([anchor], [point]) = (geometry.coordinates, geometry.points) else {
            return Vec::new();
        };
        vec![
            GraphicGroup::lines(vec![[
                *anchor,
                Coordinate::new(geometry.bounding.width, anchor.y),
            ]]),
            // A label above the top edge would be clipped away entirely.
            GraphicGroup::texts(vec![TextSource {
                x: anchor.x,
                y: anchor.y - Self::LABEL_GAP,
                text: geometry.precision.format_price(point.price),
                align: TextHAlign::Left,
                baseline: TextVAlign::Bottom,
            }])
            .with_is_draw(anchor.y - Self::LABEL_GAP > 0.0),
        ]
    }

    fn check_mouse_point_on(&self, shape: GraphicShape<'_>, target: Coordinate) -> bool {
        match shape {
            GraphicShape::Line([start, end]) => check_coordinate_on_segment(*start, *end, target),
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
