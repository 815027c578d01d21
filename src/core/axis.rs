use crate::error::{ChartError, ChartResult};

/// Coordinate conversion collaborator for one chart dimension.
///
/// Implementations must be monotonic and invertible for the current
/// viewport; callers never validate invertibility.
pub trait Axis {
    fn convert_to_pixel(&self, value: f64) -> f64;
    fn convert_from_pixel(&self, pixel: f64) -> f64;
    /// Axis length in logical pixels (width for x, height for y).
    fn length(&self) -> f64;
}

/// Linear value axis, used for prices.
///
/// With `inverted` set, larger values map to smaller pixels so that higher
/// prices sit higher on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearAxis {
    domain_start: f64,
    domain_end: f64,
    length: f64,
    inverted: bool,
}

impl LinearAxis {
    pub fn new(domain_start: f64, domain_end: f64, length: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "axis domain must be finite and non-zero".to_owned(),
            ));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(ChartError::InvalidViewport {
                width: length,
                height: length,
            });
        }

        Ok(Self {
            domain_start,
            domain_end,
            length,
            inverted: false,
        })
    }

    /// Price axis: `min` at the bottom edge, `max` at the top edge.
    pub fn price(min: f64, max: f64, height: f64) -> ChartResult<Self> {
        Ok(Self::new(min, max, height)?.with_inverted(true))
    }

    #[must_use]
    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn set_length(&mut self, length: f64) -> ChartResult<()> {
        if !length.is_finite() || length <= 0.0 {
            return Err(ChartError::InvalidViewport {
                width: length,
                height: length,
            });
        }
        self.length = length;
        Ok(())
    }
}

impl Axis for LinearAxis {
    fn convert_to_pixel(&self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        if self.inverted {
            (1.0 - normalized) * self.length
        } else {
            normalized * self.length
        }
    }

    fn convert_from_pixel(&self, pixel: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let mut normalized = pixel / self.length;
        if self.inverted {
            normalized = 1.0 - normalized;
        }
        self.domain_start + normalized * span
    }

    fn length(&self) -> f64 {
        self.length
    }
}

/// Time axis over data indices.
///
/// Index `from` is centred in the first bar slot; every following index
/// advances by one bar spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexAxis {
    from: f64,
    bar_spacing: f64,
    length: f64,
}

impl IndexAxis {
    pub fn new(from: f64, bar_spacing: f64, length: f64) -> ChartResult<Self> {
        if !from.is_finite() {
            return Err(ChartError::InvalidData(
                "first visible index must be finite".to_owned(),
            ));
        }
        if !bar_spacing.is_finite() || bar_spacing <= 0.0 {
            return Err(ChartError::InvalidData(
                "bar spacing must be finite and > 0".to_owned(),
            ));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(ChartError::InvalidViewport {
                width: length,
                height: 0.0,
            });
        }
        Ok(Self {
            from,
            bar_spacing,
            length,
        })
    }

    #[must_use]
    pub fn bar_spacing(&self) -> f64 {
        self.bar_spacing
    }

    /// Number of whole bar slots that fit in the axis length.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        (self.length / self.bar_spacing).ceil() as usize
    }
}

impl Axis for IndexAxis {
    fn convert_to_pixel(&self, value: f64) -> f64 {
        (value - self.from) * self.bar_spacing + self.bar_spacing / 2.0
    }

    fn convert_from_pixel(&self, pixel: f64) -> f64 {
        self.from + (pixel - self.bar_spacing / 2.0) / self.bar_spacing
    }

    fn length(&self) -> f64 {
        self.length
    }
}
