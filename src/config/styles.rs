use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{AreaFill, Color, GradientStop, LineStrokeStyle};

/// How the candle pane draws its series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandleType {
    #[default]
    CandleSolid,
    CandleStroke,
    Ohlc,
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandleBarStyles {
    pub up_color: Color,
    pub down_color: Color,
    pub no_change_color: Color,
    /// Wick and OHLC tick width.
    pub wick_size: f64,
}

impl Default for CandleBarStyles {
    fn default() -> Self {
        Self {
            up_color: Color::rgb8(0x2D, 0xC0, 0x8E),
            down_color: Color::rgb8(0xF9, 0x28, 0x55),
            no_change_color: Color::rgb8(0x88, 0x88, 0x88),
            wick_size: 1.0,
        }
    }
}

/// Marker on the last point of an area series, with its optional ripple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaPointStyles {
    pub show: bool,
    pub color: Color,
    pub radius: f64,
    pub ripple_color: Color,
    pub ripple_radius: f64,
    pub animation: bool,
    /// One ripple iteration, in milliseconds.
    pub animation_duration: f64,
}

impl Default for AreaPointStyles {
    fn default() -> Self {
        Self {
            show: true,
            color: Color::rgb8(0x21, 0x96, 0xF3),
            radius: 4.0,
            ripple_color: Color::rgb8(0x21, 0x96, 0xF3).with_alpha(0.3),
            ripple_radius: 8.0,
            animation: true,
            animation_duration: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandleAreaStyles {
    pub line_size: f64,
    pub line_color: Color,
    pub fill: AreaFill,
    pub point: AreaPointStyles,
}

impl Default for CandleAreaStyles {
    fn default() -> Self {
        let blue = Color::rgb8(0x21, 0x96, 0xF3);
        Self {
            line_size: 2.0,
            line_color: blue,
            fill: AreaFill::Gradient(vec![
                GradientStop::new(0.0, blue.with_alpha(0.2)),
                GradientStop::new(1.0, blue.with_alpha(0.01)),
            ]),
            point: AreaPointStyles::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandleStyles {
    #[serde(rename = "type")]
    pub kind: CandleType,
    pub bar: CandleBarStyles,
    pub area: CandleAreaStyles,
}

/// Vertical session-break separator lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparatorStyles {
    pub show: bool,
    pub color: Color,
    pub size: f64,
    pub dashed: bool,
}

impl Default for SeparatorStyles {
    fn default() -> Self {
        Self {
            show: true,
            color: Color::rgb8(0x88, 0x88, 0x88).with_alpha(0.3),
            size: 1.0,
            dashed: true,
        }
    }
}

impl SeparatorStyles {
    #[must_use]
    pub fn stroke_style(&self) -> LineStrokeStyle {
        if self.dashed {
            LineStrokeStyle::Dashed {
                dash: 4.0,
                gap: 4.0,
            }
        } else {
            LineStrokeStyle::Solid
        }
    }
}

/// Anchor point circles of graphic marks, default and hovered ("active").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkPointStyles {
    pub color: Color,
    pub border_color: Color,
    pub border_size: f64,
    /// Also the hit radius used for hover detection.
    pub radius: f64,
    pub active_color: Color,
    pub active_border_color: Color,
    pub active_border_size: f64,
    pub active_radius: f64,
}

impl Default for MarkPointStyles {
    fn default() -> Self {
        let blue = Color::rgb8(0x16, 0x77, 0xFF);
        Self {
            color: blue,
            border_color: blue.with_alpha(0.35),
            border_size: 1.0,
            radius: 5.0,
            active_color: blue,
            active_border_color: blue.with_alpha(0.35),
            active_border_size: 3.0,
            active_radius: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkLineStyles {
    pub color: Color,
    pub size: f64,
    pub style: LineStrokeStyle,
}

impl Default for MarkLineStyles {
    fn default() -> Self {
        Self {
            color: Color::rgb8(0x16, 0x77, 0xFF),
            size: 1.0,
            style: LineStrokeStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkTextStyles {
    pub color: Color,
    pub size: f64,
    pub family: String,
    /// Gap between a label and the geometry it annotates.
    pub offset: f64,
}

impl Default for MarkTextStyles {
    fn default() -> Self {
        Self {
            color: Color::rgb8(0x16, 0x77, 0xFF),
            size: 12.0,
            family: "Helvetica Neue".to_owned(),
            offset: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicMarkStyles {
    pub point: MarkPointStyles,
    pub line: MarkLineStyles,
    pub text: MarkTextStyles,
}

/// Read-only paint configuration, scoped by feature area.
///
/// Every level defaults, so partial JSON only overrides what it names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyles {
    pub candle: CandleStyles,
    pub separator: SeparatorStyles,
    pub graphic_mark: GraphicMarkStyles,
}

impl ChartStyles {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let styles: Self = serde_json::from_str(input)
            .map_err(|err| ChartError::InvalidConfig(format!("failed to parse styles: {err}")))?;
        styles.validate()?;
        Ok(styles)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ChartError::InvalidConfig(format!("failed to serialize styles: {err}")))
    }

    pub fn validate(&self) -> ChartResult<()> {
        let point = &self.candle.area.point;
        let mark_point = &self.graphic_mark.point;
        for (field, value) in [
            ("candle.bar.wick_size", self.candle.bar.wick_size),
            ("candle.area.line_size", self.candle.area.line_size),
            ("candle.area.point.radius", point.radius),
            ("candle.area.point.ripple_radius", point.ripple_radius),
            ("candle.area.point.animation_duration", point.animation_duration),
            ("separator.size", self.separator.size),
            ("graphic_mark.point.radius", mark_point.radius),
            ("graphic_mark.point.active_radius", mark_point.active_radius),
            ("graphic_mark.line.size", self.graphic_mark.line.size),
            ("graphic_mark.text.size", self.graphic_mark.text.size),
        ] {
            ensure_positive(field, value)?;
        }
        for (field, value) in [
            ("graphic_mark.point.border_size", mark_point.border_size),
            ("graphic_mark.point.active_border_size", mark_point.active_border_size),
            ("graphic_mark.text.offset", self.graphic_mark.text.offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "`{field}` must be finite and >= 0"
                )));
            }
        }
        if point.ripple_radius < point.radius {
            return Err(ChartError::InvalidConfig(
                "`candle.area.point.ripple_radius` must not be smaller than `radius`".to_owned(),
            ));
        }
        Ok(())
    }
}

fn ensure_positive(field: &str, value: f64) -> ChartResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ChartError::InvalidConfig(format!(
            "`{field}` must be finite and > 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CandleType, ChartStyles};
    use crate::error::ChartError;

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let styles = ChartStyles::from_json_str(
            r#"{"candle":{"type":"area","area":{"point":{"animation":false}}}}"#,
        )
        .expect("valid styles");
        let defaults = ChartStyles::default();
        assert_eq!(styles.candle.kind, CandleType::Area);
        assert!(!styles.candle.area.point.animation);
        assert_eq!(styles.candle.area.point.radius, defaults.candle.area.point.radius);
        assert_eq!(styles.graphic_mark, defaults.graphic_mark);
    }

    #[test]
    fn invalid_radius_is_rejected() {
        let err = ChartStyles::from_json_str(r#"{"graphic_mark":{"point":{"radius":-1.0}}}"#)
            .expect_err("negative radius");
        assert!(matches!(err, ChartError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = ChartStyles::from_json_str("{").expect_err("malformed");
        assert!(matches!(err, ChartError::InvalidConfig(_)));
    }

    #[test]
    fn pretty_json_parses_back() {
        let styles = ChartStyles::default();
        let json = styles.to_json_pretty().expect("serialize");
        assert_eq!(ChartStyles::from_json_str(&json).expect("parse"), styles);
    }
}
