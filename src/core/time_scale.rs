use chrono::{DateTime, Duration, Utc};

use crate::core::primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
use crate::core::time_interval::time_ticks;
use crate::core::{LinearScale, Record};
use crate::error::{ChartError, ChartResult};

/// Half-width in days used to widen a domain whose records share one
/// timestamp.
const SINGLE_INSTANT_PADDING_DAYS: i64 = 1;

/// Time axis: `[first, last]` timestamp mapped linearly onto `[0, width]`.
///
/// Internally works in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, width: f64) -> ChartResult<Self> {
        let (start, end) = if start == end {
            let padding = Duration::days(SINGLE_INSTANT_PADDING_DAYS);
            (start - padding, end + padding)
        } else if start < end {
            (start, end)
        } else {
            (end, start)
        };
        if !width.is_finite() || width <= 0.0 {
            return Err(ChartError::InvalidData(
                "time scale width must be finite and > 0".to_owned(),
            ));
        }

        let linear = LinearScale::new(
            (datetime_to_unix_millis(start), datetime_to_unix_millis(end)),
            (0.0, width),
        )?;
        Ok(Self { start, end, linear })
    }

    /// Fits the domain to the earliest and latest record.
    pub fn from_records(records: &[Record], width: f64) -> ChartResult<Self> {
        let mut timestamps = records.iter().map(|record| record.timestamp);
        let first = timestamps.next().ok_or(ChartError::EmptyDataset)?;
        let (min, max) = timestamps.fold((first, first), |(min, max), timestamp| {
            (min.min(timestamp), max.max(timestamp))
        });
        Self::new(min, max, width)
    }

    #[must_use]
    pub fn domain(self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.linear.range()
    }

    #[must_use]
    pub fn time_to_pixel(self, time: DateTime<Utc>) -> f64 {
        self.linear.apply(datetime_to_unix_millis(time))
    }

    /// Inverse mapping in epoch milliseconds; not clamped to the domain.
    #[must_use]
    pub fn pixel_to_millis(self, pixel: f64) -> f64 {
        self.linear.invert(pixel)
    }

    #[must_use]
    pub fn pixel_to_time(self, pixel: f64) -> Option<DateTime<Utc>> {
        unix_millis_to_datetime(self.pixel_to_millis(pixel))
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<DateTime<Utc>> {
        time_ticks(self.start, self.end, count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::TimeScale;

    #[test]
    fn single_instant_domain_is_widened() {
        let t = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single().expect("valid date");
        let scale = TimeScale::new(t, t, 500.0).expect("scale");
        assert!((scale.time_to_pixel(t) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn maps_and_inverts_time() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single().expect("valid date");
        let end = Utc.with_ymd_and_hms(2020, 1, 3, 0, 0, 0).single().expect("valid date");
        let mid = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).single().expect("valid date");
        let scale = TimeScale::new(start, end, 400.0).expect("scale");

        assert!((scale.time_to_pixel(mid) - 200.0).abs() < 1e-9);
        assert_eq!(scale.pixel_to_time(200.0), Some(mid));
        assert!(TimeScale::new(start, end, 0.0).is_err());
    }
}
