use std::cmp::Ordering;

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::core::{Axis, BarSpace, IndexAxis, KLineData, Precision, VisibleData};
use crate::error::{ChartError, ChartResult};

/// Time-series collaborator consumed by views and graphic marks.
///
/// `data_index_to_timestamp` and `timestamp_to_data_index` must be exact
/// inverses for indices inside the series.
pub trait DataStore {
    fn data_len(&self) -> usize;
    /// Visible window in time-ascending order.
    fn visible_data(&self) -> Vec<VisibleData>;
    fn bar_space(&self) -> BarSpace;
    fn data_index_to_timestamp(&self, data_index: i64) -> Option<i64>;
    fn timestamp_to_data_index(&self, timestamp: i64) -> Option<i64>;
    fn precision(&self) -> Precision;
}

#[cfg(feature = "parallel-projection")]
const PARALLEL_PROJECTION_MIN_POINTS: usize = 2048;

/// In-memory reference store: full series plus a visible index window.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesStore {
    data: Vec<KLineData>,
    visible_from: usize,
    bar_spacing: f64,
    width: f64,
    precision: Precision,
}

impl TimeSeriesStore {
    pub fn new(width: f64, bar_spacing: f64) -> ChartResult<Self> {
        // Validates both values through the axis constructor.
        IndexAxis::new(0.0, bar_spacing, width)?;
        Ok(Self {
            data: Vec::new(),
            visible_from: 0,
            bar_spacing,
            width,
            precision: Precision::default(),
        })
    }

    /// Replaces the series. Input is sorted by timestamp; duplicates keep the
    /// latest sample.
    pub fn set_data(&mut self, data: Vec<KLineData>) {
        let original_count = data.len();
        self.data = canonicalize(data);
        debug!(
            original_count,
            canonical_count = self.data.len(),
            "set kline data"
        );
        self.scroll_to_realtime();
    }

    /// Appends a newer candle or replaces the latest one with the same timestamp.
    pub fn update_data(&mut self, candle: KLineData) -> ChartResult<()> {
        match self
            .data
            .last()
            .map_or(Ordering::Greater, |last| candle.timestamp.cmp(&last.timestamp))
        {
            Ordering::Less => Err(ChartError::InvalidData(
                "candle update must not be older than the latest candle".to_owned(),
            )),
            Ordering::Equal => {
                if let Some(last) = self.data.last_mut() {
                    *last = candle;
                }
                trace!(timestamp = candle.timestamp, "replace latest candle");
                Ok(())
            }
            Ordering::Greater => {
                let was_at_realtime = self.is_at_realtime();
                self.data.push(candle);
                if was_at_realtime {
                    self.scroll_to_realtime();
                }
                trace!(count = self.data.len(), "append candle");
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn data(&self) -> &[KLineData] {
        &self.data
    }

    pub fn set_precision(&mut self, precision: Precision) {
        self.precision = precision;
    }

    pub fn set_width(&mut self, width: f64) -> ChartResult<()> {
        IndexAxis::new(0.0, self.bar_spacing, width)?;
        let was_at_realtime = self.is_at_realtime();
        self.width = width;
        if was_at_realtime {
            self.scroll_to_realtime();
        }
        Ok(())
    }

    pub fn set_bar_spacing(&mut self, bar_spacing: f64) -> ChartResult<()> {
        IndexAxis::new(0.0, bar_spacing, self.width)?;
        let was_at_realtime = self.is_at_realtime();
        self.bar_spacing = bar_spacing;
        if was_at_realtime {
            self.scroll_to_realtime();
        }
        Ok(())
    }

    pub fn set_visible_from(&mut self, index: usize) {
        self.visible_from = index.min(self.data.len().saturating_sub(1));
    }

    #[must_use]
    pub fn visible_from(&self) -> usize {
        self.visible_from
    }

    /// Moves the window so the latest candle sits in the rightmost slot.
    pub fn scroll_to_realtime(&mut self) {
        let slots = self.slot_count();
        self.visible_from = self.data.len().saturating_sub(slots);
    }

    /// Time axis matching the current window.
    pub fn x_axis(&self) -> ChartResult<IndexAxis> {
        IndexAxis::new(self.visible_from as f64, self.bar_spacing, self.width)
    }

    fn slot_count(&self) -> usize {
        (self.width / self.bar_spacing).floor().max(1.0) as usize
    }

    fn is_at_realtime(&self) -> bool {
        self.visible_from + self.slot_count() >= self.data.len()
    }

    fn visible_range(&self) -> (usize, usize) {
        let from = self.visible_from.min(self.data.len());
        let to = (from + self.slot_count()).min(self.data.len());
        (from, to)
    }

    fn bar_interval(&self) -> Option<i64> {
        match self.data.as_slice() {
            [.., previous, last] => Some(last.timestamp - previous.timestamp).filter(|i| *i > 0),
            _ => None,
        }
    }
}

impl DataStore for TimeSeriesStore {
    fn data_len(&self) -> usize {
        self.data.len()
    }

    fn visible_data(&self) -> Vec<VisibleData> {
        let (from, to) = self.visible_range();
        let Ok(axis) = self.x_axis() else {
            return Vec::new();
        };
        let project = |data_index: usize| VisibleData {
            data: self.data.get(data_index).copied(),
            x: axis.convert_to_pixel(data_index as f64),
            data_index,
        };

        #[cfg(feature = "parallel-projection")]
        {
            if to - from >= PARALLEL_PROJECTION_MIN_POINTS {
                return (from..to).into_par_iter().map(project).collect();
            }
        }

        (from..to).map(project).collect()
    }

    fn bar_space(&self) -> BarSpace {
        BarSpace::from_spacing(self.bar_spacing)
    }

    fn data_index_to_timestamp(&self, data_index: i64) -> Option<i64> {
        let len = i64::try_from(self.data.len()).ok()?;
        if (0..len).contains(&data_index) {
            return self.data.get(usize::try_from(data_index).ok()?).map(|d| d.timestamp);
        }
        let interval = self.bar_interval()?;
        if data_index >= len {
            let last = self.data.last()?;
            Some(last.timestamp + (data_index - (len - 1)) * interval)
        } else {
            let first = self.data.first()?;
            Some(first.timestamp + data_index * interval)
        }
    }

    fn timestamp_to_data_index(&self, timestamp: i64) -> Option<i64> {
        let first = self.data.first()?;
        let last = self.data.last()?;
        let last_index = i64::try_from(self.data.len() - 1).ok()?;
        if timestamp > last.timestamp {
            let interval = self.bar_interval()?;
            return Some(last_index + (timestamp - last.timestamp) / interval);
        }
        if timestamp < first.timestamp {
            let interval = self.bar_interval()?;
            return Some((timestamp - first.timestamp) / interval);
        }
        // Greatest index whose timestamp does not exceed the query.
        let upper = self.data.partition_point(|d| d.timestamp <= timestamp);
        i64::try_from(upper.saturating_sub(1)).ok()
    }

    fn precision(&self) -> Precision {
        self.precision
    }
}

fn canonicalize(mut data: Vec<KLineData>) -> Vec<KLineData> {
    data.sort_by_key(|candle| candle.timestamp);
    let mut out: Vec<KLineData> = Vec::with_capacity(data.len());
    for candle in data {
        match out.last_mut() {
            Some(last) if last.timestamp == candle.timestamp => *last = candle,
            _ => out.push(candle),
        }
    }
    out
}
