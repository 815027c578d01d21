use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::Coordinate;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// One color stop of a gradient, `offset` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

impl GradientStop {
    #[must_use]
    pub const fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Linear gradient between two points, built stop by stop.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Coordinate,
    pub end: Coordinate,
    stops: Vec<GradientStop>,
}

impl LinearGradient {
    #[must_use]
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Adds a stop, keeping stops ordered by offset.
    ///
    /// Offsets outside `[0, 1]` and invalid colors are rejected and leave the
    /// gradient unchanged.
    pub fn add_color_stop(&mut self, offset: f64, color: Color) -> ChartResult<()> {
        if !offset.is_finite() || !(0.0..=1.0).contains(&offset) {
            return Err(ChartError::Paint(format!(
                "gradient stop offset {offset} is outside [0, 1]"
            )));
        }
        color
            .validate()
            .map_err(|err| ChartError::Paint(format!("gradient stop color rejected: {err}")))?;
        let position = self
            .stops
            .partition_point(|stop| OrderedFloat(stop.offset) <= OrderedFloat(offset));
        self.stops.insert(position, GradientStop::new(offset, color));
        Ok(())
    }

    #[must_use]
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }
}

/// Fill or stroke source.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
}

impl Paint {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Solid(color) => color.validate(),
            Self::LinearGradient(gradient) => {
                if gradient.stops.is_empty() {
                    return Err(ChartError::Paint("gradient has no color stops".to_owned()));
                }
                if !gradient.start.is_finite() || !gradient.end.is_finite() {
                    return Err(ChartError::Paint(
                        "gradient end points must be finite".to_owned(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Area fill as configured: a plain color or a list of vertical gradient stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AreaFill {
    Solid(Color),
    Gradient(Vec<GradientStop>),
}

/// Resolves a configured fill into a paint spanning `top..bottom`.
///
/// Gradient assembly is a recoverable step: the first rejected stop is logged
/// and assembly stops, keeping the stops already added. A gradient left
/// without any stop yields `None` and the fill is skipped for this frame.
#[must_use]
pub fn resolve_area_fill(fill: &AreaFill, left: f64, top: f64, bottom: f64) -> Option<Paint> {
    match fill {
        AreaFill::Solid(color) => Some(Paint::Solid(*color)),
        AreaFill::Gradient(stops) => {
            let mut gradient =
                LinearGradient::new(Coordinate::new(left, top), Coordinate::new(left, bottom));
            for stop in stops {
                if let Err(err) = gradient.add_color_stop(stop.offset, stop.color) {
                    warn!(error = %err, "gradient assembly stopped early");
                    break;
                }
            }
            if gradient.stops().is_empty() {
                warn!("gradient fill has no usable stops; skipping fill");
                return None;
            }
            Some(Paint::LinearGradient(gradient))
        }
    }
}
