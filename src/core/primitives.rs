use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_millis(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis()
}

/// UTC calendar day of a millisecond timestamp.
#[must_use]
pub fn utc_day_of_millis(timestamp: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(timestamp).map(|time| time.date_naive())
}
