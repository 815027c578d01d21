use smallvec::SmallVec;

use crate::core::Coordinate;
use crate::render::{Color, LineStrokeStyle, Paint, TextHAlign, TextVAlign};

/// Polyline through `coordinates`, most figures are two-point segments.
#[derive(Debug, Clone, PartialEq)]
pub struct LineAttrs {
    pub coordinates: SmallVec<[Coordinate; 4]>,
}

impl LineAttrs {
    #[must_use]
    pub fn segment(start: Coordinate, end: Coordinate) -> Self {
        Self {
            coordinates: SmallVec::from_slice(&[start, end]),
        }
    }

    #[must_use]
    pub fn polyline(coordinates: impl IntoIterator<Item = Coordinate>) -> Self {
        Self {
            coordinates: coordinates.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleAttrs {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectAttrs {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextAttrs {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonAttrs {
    pub coordinates: Vec<Coordinate>,
}

/// Geometry of a figure, one variant per built-in shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FigureAttrs {
    Line(LineAttrs),
    Circle(CircleAttrs),
    Rect(RectAttrs),
    Text(TextAttrs),
    Polygon(PolygonAttrs),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyles {
    pub color: Color,
    pub size: f64,
    pub style: LineStrokeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleStyles {
    pub color: Option<Color>,
    pub border_color: Color,
    pub border_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyles {
    pub color: Color,
    pub border_color: Color,
    pub border_size: f64,
    pub border_radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyles {
    pub color: Color,
    pub size: f64,
    pub family: String,
    pub align: TextHAlign,
    pub baseline: TextVAlign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStyles {
    pub fill: Paint,
}

/// Paint parameters of a figure, matching `FigureAttrs` variant for variant.
#[derive(Debug, Clone, PartialEq)]
pub enum FigureStyles {
    Line(LineStyles),
    Circle(CircleStyles),
    Rect(RectStyles),
    Text(TextStyles),
    Polygon(PolygonStyles),
}
