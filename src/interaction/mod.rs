mod nearest;
mod tooltip_layout;

pub use nearest::{bisect_left, nearest_record_index, nearest_series_index};
pub use tooltip_layout::{
    FOCUS_DOT_RADIUS_PX, LABEL_CORNER_RADIUS_PX, TOOLTIP_FONT_SIZE_PX, TooltipBox,
    value_line_offset_px,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{ChartScales, Record};
use crate::render::TextAnchor;

/// Side of the focus point the hover label is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    /// Label extends to the right.
    Start,
    /// Label extends to the left; used in the right half of the plot.
    End,
}

impl AnchorSide {
    #[must_use]
    pub fn for_position(x: f64, plot_width: f64) -> Self {
        if x > plot_width / 2.0 {
            Self::End
        } else {
            Self::Start
        }
    }

    #[must_use]
    pub fn text_anchor(self) -> TextAnchor {
        match self {
            Self::Start => TextAnchor::Start,
            Self::End => TextAnchor::End,
        }
    }
}

/// Focused record and series for the current pointer position.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipState {
    /// Index into the configured series list.
    pub active_series: usize,
    /// Index into the timestamp-sorted records.
    pub active_record: usize,
    pub anchor_side: AnchorSide,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    /// Focus point in plot coordinates.
    pub x: f64,
    pub y: f64,
}

impl TooltipState {
    /// Snaps a plot-relative pointer position to the nearest record in time,
    /// then to the series whose value there is closest to the pointer.
    #[must_use]
    pub fn resolve(
        records: &[Record],
        columns: &[String],
        scales: &ChartScales,
        pointer_x: f64,
        pointer_y: f64,
    ) -> Option<Self> {
        let time_ms = scales.x.pixel_to_millis(pointer_x);
        let active_record = nearest_record_index(records, time_ms)?;
        let record = &records[active_record];

        let target_value = scales.y.pixel_to_value(pointer_y);
        let active_series = nearest_series_index(record, columns, target_value)?;
        let value = record.value(&columns[active_series])?;

        let x = scales.x.time_to_pixel(record.timestamp);
        let (_, plot_width) = scales.x.range();
        Some(Self {
            active_series,
            active_record,
            anchor_side: AnchorSide::for_position(x, plot_width),
            timestamp: record.timestamp,
            value,
            x,
            y: scales.y.value_to_pixel(value),
        })
    }
}

/// Pointer-driven hover state owned by the chart engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    cursor: Option<(f64, f64)>,
    tooltip: Option<TooltipState>,
}

impl InteractionState {
    #[must_use]
    pub fn cursor(&self) -> Option<(f64, f64)> {
        self.cursor
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&TooltipState> {
        self.tooltip.as_ref()
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64, tooltip: Option<TooltipState>) {
        self.cursor = Some((x, y));
        self.tooltip = tooltip;
    }

    pub fn on_pointer_leave(&mut self) {
        self.cursor = None;
        self.tooltip = None;
    }
}
