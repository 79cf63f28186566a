use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::core::primitives::datetime_to_unix_millis;
use crate::render::Color;

/// Outer pixel size of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Size of the inner drawing area (outer size minus margins).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
}

impl Dimension {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// One typed input row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    /// Series values keyed by column name, in configured column order.
    pub values: IndexMap<String, f64>,
}

impl Record {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, values: IndexMap<String, f64>) -> Self {
        Self { timestamp, values }
    }

    /// Timestamp as epoch milliseconds, the unit the time scale works in.
    #[must_use]
    pub fn time_value(&self) -> f64 {
        datetime_to_unix_millis(self.timestamp)
    }

    #[must_use]
    pub fn value(&self, series_name: &str) -> Option<f64> {
        self.values.get(series_name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// One named, colored line; `points[i]` projects `records[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: Color,
    pub points: Vec<SeriesPoint>,
}
