use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_millis, decimal_to_f64};
use crate::error::ChartResult;

/// Rectangle a widget occupies inside its container, in logical pixels.
///
/// Computed by the outer layout pass and read-only to the rendering core.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounding {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounding {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Pixel coordinate inside a widget.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One raw candle of the time series.
///
/// A non-finite `close` marks a data gap: views skip such points for
/// geometry instead of treating them as errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KLineData {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl KLineData {
    #[must_use]
    pub const fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    #[must_use]
    pub const fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Converts strongly-typed temporal/decimal input into a candle.
    pub fn from_decimal(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> ChartResult<Self> {
        Ok(Self::new(
            datetime_to_unix_millis(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
        ))
    }

    #[must_use]
    pub fn has_value(&self) -> bool {
        self.close.is_finite()
    }

    #[must_use]
    pub fn has_ohlc(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.has_value()
    }
}

/// One time-series point as positioned on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleData {
    pub data: Option<KLineData>,
    /// Bar center in logical pixels.
    pub x: f64,
    /// Stable index into the full series, not into the visible window.
    pub data_index: usize,
}

impl VisibleData {
    /// Close price when the point carries a numeric value.
    #[must_use]
    pub fn close(&self) -> Option<f64> {
        self.data.filter(KLineData::has_value).map(|data| data.close)
    }
}

/// Horizontal space allocated to one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarSpace {
    /// Body width.
    pub bar: f64,
    pub half_bar: f64,
    /// Full spacing including the gap between bars.
    pub gap_bar: f64,
    pub half_gap_bar: f64,
}

impl BarSpace {
    const BAR_GAP_RATIO: f64 = 0.2;

    /// Derives the body width from a bar spacing (80% of the spacing,
    /// floored to whole pixels, at least one pixel).
    #[must_use]
    pub fn from_spacing(gap_bar: f64) -> Self {
        let bar = (gap_bar * (1.0 - Self::BAR_GAP_RATIO)).floor().max(1.0);
        Self {
            bar,
            half_bar: bar / 2.0,
            gap_bar,
            half_gap_bar: gap_bar / 2.0,
        }
    }
}

/// Decimal places used when formatting prices and volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precision {
    pub price: usize,
    pub volume: usize,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            price: 2,
            volume: 0,
        }
    }
}

impl Precision {
    #[must_use]
    pub fn format_price(self, price: f64) -> String {
        format!("{price:.prec$}", prec = self.price)
    }
}

/// Time/price anchor of a graphic mark.
///
/// Exactly one of `timestamp`/`data_index` is authoritative; the other is
/// resolved through the data store before converting to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimePricePoint {
    pub timestamp: Option<i64>,
    pub data_index: Option<i64>,
    pub price: f64,
}

impl TimePricePoint {
    #[must_use]
    pub const fn from_timestamp(timestamp: i64, price: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            data_index: None,
            price,
        }
    }

    #[must_use]
    pub const fn from_data_index(data_index: i64, price: f64) -> Self {
        Self {
            timestamp: None,
            data_index: Some(data_index),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{BarSpace, Bounding, KLineData, VisibleData};

    #[test]
    fn bar_space_keeps_a_gap_and_a_visible_body() {
        let space = BarSpace::from_spacing(10.0);
        assert_eq!(space.bar, 8.0);
        assert_eq!(space.half_bar, 4.0);
        assert_eq!(space.half_gap_bar, 5.0);

        let tiny = BarSpace::from_spacing(0.5);
        assert_eq!(tiny.bar, 1.0);
    }

    #[test]
    fn non_finite_close_is_a_gap() {
        let gap = VisibleData {
            data: Some(KLineData::new(0, 1.0, 2.0, 0.5, f64::NAN)),
            x: 4.0,
            data_index: 0,
        };
        assert_eq!(gap.close(), None);

        let empty = VisibleData {
            data: None,
            x: 4.0,
            data_index: 1,
        };
        assert_eq!(empty.close(), None);
    }

    #[test]
    fn bounding_validity_requires_positive_size() {
        assert!(Bounding::from_size(10.0, 4.0).is_valid());
        assert!(!Bounding::from_size(0.0, 4.0).is_valid());
        assert!(!Bounding::from_size(f64::NAN, 4.0).is_valid());
    }

    #[test]
    fn decimal_input_converts_to_a_candle() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 0).unwrap();
        let candle = KLineData::from_decimal(
            time,
            Decimal::new(10_050, 2),
            Decimal::new(10_200, 2),
            Decimal::new(9_975, 2),
            Decimal::new(10_125, 2),
        )
        .expect("convertible")
        .with_volume(12.5);

        assert_eq!(candle.timestamp, time.timestamp_millis());
        assert!((candle.close - 101.25).abs() < 1e-12);
        assert!(candle.has_ohlc());
        assert_eq!(candle.volume, Some(12.5));
    }
}
