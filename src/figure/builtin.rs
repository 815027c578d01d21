use crate::core::Coordinate;
use crate::core::geometry::{check_coordinate_on_circle, check_coordinate_on_segment};
use crate::error::ChartResult;
use crate::figure::{FigureAttrs, FigureStyles, FigureTemplate};
use crate::render::{
    Canvas, CirclePrimitive, LinePrimitive, PolygonPrimitive, RectPrimitive, TextHAlign,
    TextPrimitive, TextVAlign,
};

/// Polyline of at least two points.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFigure;

impl FigureTemplate for LineFigure {
    fn name(&self) -> &str {
        "line"
    }

    fn accepts(&self, attrs: &FigureAttrs, styles: &FigureStyles) -> bool {
        match (attrs, styles) {
            (FigureAttrs::Line(line), FigureStyles::Line(style)) => {
                line.coordinates.len() >= 2
                    && line.coordinates.iter().all(|c| c.is_finite())
                    && style.size.is_finite()
                    && style.size > 0.0
            }
            _ => false,
        }
    }

    fn draw(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) -> ChartResult<()> {
        let (FigureAttrs::Line(line), FigureStyles::Line(style)) = (attrs, styles) else {
            return Ok(());
        };
        for pair in line.coordinates.windows(2) {
            let primitive = LinePrimitive::between(pair[0], pair[1], style.size, style.color)
                .with_stroke_style(style.style);
            canvas.stroke_line(&primitive)?;
        }
        Ok(())
    }

    fn check_event_on(
        &self,
        coordinate: Coordinate,
        attrs: &FigureAttrs,
        _styles: &FigureStyles,
    ) -> bool {
        let FigureAttrs::Line(line) = attrs else {
            return false;
        };
        line.coordinates
            .windows(2)
            .any(|pair| check_coordinate_on_segment(pair[0], pair[1], coordinate))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CircleFigure;

impl FigureTemplate for CircleFigure {
    fn name(&self) -> &str {
        "circle"
    }

    fn accepts(&self, attrs: &FigureAttrs, styles: &FigureStyles) -> bool {
        match (attrs, styles) {
            (FigureAttrs::Circle(circle), FigureStyles::Circle(_)) => {
                circle.x.is_finite()
                    && circle.y.is_finite()
                    && circle.r.is_finite()
                    && circle.r >= 0.0
            }
            _ => false,
        }
    }

    fn draw(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) -> ChartResult<()> {
        let (FigureAttrs::Circle(circle), FigureStyles::Circle(style)) = (attrs, styles) else {
            return Ok(());
        };
        canvas.draw_circle(&CirclePrimitive {
            x: circle.x,
            y: circle.y,
            radius: circle.r,
            fill_color: style.color,
            border_color: style.border_color,
            border_width: style.border_size,
        })
    }

    fn check_event_on(
        &self,
        coordinate: Coordinate,
        attrs: &FigureAttrs,
        _styles: &FigureStyles,
    ) -> bool {
        let FigureAttrs::Circle(circle) = attrs else {
            return false;
        };
        check_coordinate_on_circle(Coordinate::new(circle.x, circle.y), circle.r, coordinate)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RectFigure;

impl FigureTemplate for RectFigure {
    fn name(&self) -> &str {
        "rect"
    }

    fn accepts(&self, attrs: &FigureAttrs, styles: &FigureStyles) -> bool {
        match (attrs, styles) {
            (FigureAttrs::Rect(rect), FigureStyles::Rect(_)) => {
                rect.x.is_finite()
                    && rect.y.is_finite()
                    && rect.width.is_finite()
                    && rect.height.is_finite()
            }
            _ => false,
        }
    }

    fn draw(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) -> ChartResult<()> {
        let (FigureAttrs::Rect(rect), FigureStyles::Rect(style)) = (attrs, styles) else {
            return Ok(());
        };
        // Negative extents are normalized so bars can be built from open/close.
        let primitive = RectPrimitive::new(
            rect.x.min(rect.x + rect.width),
            rect.y.min(rect.y + rect.height),
            rect.width.abs(),
            rect.height.abs(),
            style.color,
        )
        .with_border(style.border_color, style.border_size)
        .with_corner_radius(style.border_radius);
        canvas.draw_rect(&primitive)
    }

    fn check_event_on(
        &self,
        coordinate: Coordinate,
        attrs: &FigureAttrs,
        _styles: &FigureStyles,
    ) -> bool {
        let FigureAttrs::Rect(rect) = attrs else {
            return false;
        };
        inside_box(
            coordinate,
            rect.x.min(rect.x + rect.width),
            rect.y.min(rect.y + rect.height),
            rect.width.abs(),
            rect.height.abs(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextFigure;

impl TextFigure {
    fn primitive(attrs: &FigureAttrs, styles: &FigureStyles) -> Option<TextPrimitive> {
        let (FigureAttrs::Text(text), FigureStyles::Text(style)) = (attrs, styles) else {
            return None;
        };
        Some(
            TextPrimitive::new(
                text.text.clone(),
                text.x,
                text.y,
                style.size,
                style.color,
                style.align,
            )
            .with_font_family(style.family.clone())
            .with_v_align(style.baseline),
        )
    }
}

impl FigureTemplate for TextFigure {
    fn name(&self) -> &str {
        "text"
    }

    fn accepts(&self, attrs: &FigureAttrs, styles: &FigureStyles) -> bool {
        Self::primitive(attrs, styles).is_some_and(|text| text.validate().is_ok())
    }

    fn draw(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) -> ChartResult<()> {
        match Self::primitive(attrs, styles) {
            Some(text) => canvas.draw_text(&text),
            None => Ok(()),
        }
    }

    fn check_event_on(
        &self,
        coordinate: Coordinate,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) -> bool {
        let Some(text) = Self::primitive(attrs, styles) else {
            return false;
        };
        let width = text.estimated_width();
        let height = text.font_size_px;
        let left = match text.h_align {
            TextHAlign::Left => text.x,
            TextHAlign::Center => text.x - width / 2.0,
            TextHAlign::Right => text.x - width,
        };
        let top = match text.v_align {
            TextVAlign::Top => text.y,
            TextVAlign::Middle => text.y - height / 2.0,
            TextVAlign::Bottom => text.y - height,
        };
        inside_box(coordinate, left, top, width, height)
    }
}

/// Closed polygon of at least three points.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolygonFigure;

impl FigureTemplate for PolygonFigure {
    fn name(&self) -> &str {
        "polygon"
    }

    fn accepts(&self, attrs: &FigureAttrs, styles: &FigureStyles) -> bool {
        match (attrs, styles) {
            (FigureAttrs::Polygon(polygon), FigureStyles::Polygon(style)) => {
                polygon.coordinates.len() >= 3
                    && polygon.coordinates.iter().all(|c| c.is_finite())
                    && style.fill.validate().is_ok()
            }
            _ => false,
        }
    }

    fn draw(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) -> ChartResult<()> {
        let (FigureAttrs::Polygon(polygon), FigureStyles::Polygon(style)) = (attrs, styles)
        else {
            return Ok(());
        };
        canvas.fill_polygon(&PolygonPrimitive::new(
            polygon.coordinates.clone(),
            style.fill.clone(),
        ))
    }

    fn check_event_on(
        &self,
        coordinate: Coordinate,
        attrs: &FigureAttrs,
        _styles: &FigureStyles,
    ) -> bool {
        let FigureAttrs::Polygon(polygon) = attrs else {
            return false;
        };
        point_in_polygon(coordinate, &polygon.coordinates)
    }
}

fn inside_box(coordinate: Coordinate, left: f64, top: f64, width: f64, height: f64) -> bool {
    coordinate.x >= left
        && coordinate.x <= left + width
        && coordinate.y >= top
        && coordinate.y <= top + height
}

// Even-odd ray casting.
fn point_in_polygon(target: Coordinate, points: &[Coordinate]) -> bool {
    let mut inside = false;
    let mut previous = match points.last() {
        Some(last) => *last,
        None => return false,
    };
    for current in points {
        if (current.y > target.y) != (previous.y > target.y) {
            let x_cross = (previous.x - current.x) * (target.y - current.y)
                / (previous.y - current.y)
                + current.x;
            if target.x < x_cross {
                inside = !inside;
            }
        }
        previous = *current;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::point_in_polygon;
    use crate::core::Coordinate;

    #[test]
    fn polygon_hit_uses_even_odd_rule() {
        let square = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Coordinate::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Coordinate::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Coordinate::new(5.0, 5.0), &square[..0]));
    }
}
