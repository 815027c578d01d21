use crate::config::GraphicMarkStyles;
use crate::core::geometry::{check_coordinate_on_segment, fibonacci_levels};
use crate::core::{Coordinate, TimePricePoint};
use crate::error::ChartResult;
use crate::interaction::{GraphicGroup, GraphicShape, MarkGeometry, MarkTemplate, TextSource};
use crate::render::{Canvas, TextHAlign, TextVAlign};

/// Fibonacci retracement levels between two points.
///
/// The first point is the 100% level and the second the 0% level; every
/// level runs from the first point's x to the right edge, labelled with its
/// price and ratio. With a single point only the 100% level is shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct FibonacciLine;

impl FibonacciLine {
    fn level(
        geometry: &MarkGeometry<'_>,
        x: f64,
        y: f64,
        price: f64,
        ratio: f64,
    ) -> ([Coordinate; 2], TextSource) {
        let line = [
            Coordinate::new(x, y),
            Coordinate::new(geometry.bounding.width, y),
        ];
        let text = TextSource {
            x,
            y,
            text: format!(
                "{} ({:.1}%)",
                geometry.precision.format_price(price),
                ratio * 100.0
            ),
            align: TextHAlign::Left,
            baseline: TextVAlign::Bottom,
        };
        (line, text)
    }
}

impl MarkTemplate for FibonacciLine {
    fn name(&self) -> &'static str {
        "fibonacciLine"
    }

    fn total_step(&self) -> usize {
        2
    }

    fn create_graphic_options(&self, geometry: &MarkGeometry<'_>) -> Vec<GraphicGroup> {
        let (lines, texts): (Vec<_>, Vec<_>) = match (geometry.coordinates, geometry.points) {
            ([anchor], [point]) => {
                vec![Self::level(geometry, anchor.x, anchor.y, point.price, 1.0)]
                    .into_iter()
                    .unzip()
            }
            ([first, second], [first_point, second_point]) => {
                let ys = fibonacci_levels(second.y, first.y);
                let prices = fibonacci_levels(second_point.price, first_point.price);
                ys.into_iter()
                    .zip(prices)
                    .map(|((ratio, y), (_, price))| Self::level(geometry, first.x, y, price, ratio))
                    .unzip()
            }
            _ => return Vec::new(),
        };
        vec![GraphicGroup::lines(lines), GraphicGroup::texts(texts)]
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

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::FibonacciLine;
    use crate::core::{Bounding, Coordinate, Precision, TimePricePoint};
    use crate::interaction::{GraphicData, MarkGeometry, MarkTemplate};

    #[test]
    fn levels_run_from_first_point_to_second() {
        let coordinates = [Coordinate::new(10.0, 20.0), Coordinate::new(60.0, 120.0)];
        let points = [
            TimePricePoint::from_data_index(0, 200.0),
            TimePricePoint::from_data_index(5, 100.0),
        ];
        let groups = FibonacciLine.create_graphic_options(&MarkGeometry {
            coordinates: &coordinates,
            points: &points,
            bounding: Bounding::from_size(300.0, 200.0),
            precision: Precision::default(),
        });
        let (GraphicData::Lines(lines), GraphicData::Texts(texts)) =
            (&groups[0].data, &groups[1].data)
        else {
            panic!("expected lines then texts");
        };
        assert_eq!(lines.len(), 7);
        assert_relative_eq!(lines[0][0].y, 20.0);
        assert_relative_eq!(lines[6][0].y, 120.0);
        assert_relative_eq!(lines[3][0].y, 70.0);
        assert_eq!(texts[0].text, "200.00 (100.0%)");
        assert_eq!(texts[3].text, "150.00 (50.0%)");
        assert_eq!(lines[0][1].x, 300.0);
    }
}
