use tracing::{trace, warn};

use crate::error::ChartResult;
use crate::interaction::TooltipState;
use crate::render::DrawingSurface;

use super::tooltip_scene_builder::{TooltipContent, hide_tooltip, show_tooltip};
use super::ChartEngine;

impl<S: DrawingSurface> ChartEngine<S> {
    /// Handles a pointer position relative to the inner drawing area.
    ///
    /// Returns the focused record/series, or `None` when hover is disabled,
    /// no data is loaded or the coordinates are not finite.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> ChartResult<Option<TooltipState>> {
        if !self.config.hover {
            return Ok(None);
        }
        if !x.is_finite() || !y.is_finite() {
            warn!(x, y, "ignoring non-finite pointer position");
            return Ok(None);
        }
        let (Some(data), Some(scales)) = (self.state.data.as_ref(), self.state.scales.as_ref())
        else {
            trace!(x, y, "pointer move before data load");
            return Ok(None);
        };

        let tooltip =
            TooltipState::resolve(&data.records, &self.config.values.columns, scales, x, y);
        match &tooltip {
            Some(state) => {
                show_tooltip(
                    &mut self.surface,
                    state,
                    &TooltipContent {
                        series: &data.series,
                        display_format: &self.compiled.display_format,
                        value_format: &self.compiled.value_format,
                        plot_height: self.state.layout.inner.height,
                    },
                )?;
                trace!(
                    x,
                    y,
                    record = state.active_record,
                    series = state.active_series,
                    anchor = ?state.anchor_side,
                    "pointer move"
                );
            }
            None => hide_tooltip(&mut self.surface, &data.series),
        }
        self.state.interaction.on_pointer_move(x, y, tooltip.clone());
        Ok(tooltip)
    }

    /// Hides the whole focus layer and clears the tooltip state.
    pub fn pointer_leave(&mut self) {
        if let Some(data) = self.state.data.as_ref() {
            hide_tooltip(&mut self.surface, &data.series);
        }
        self.state.interaction.on_pointer_leave();
        trace!("pointer leave");
    }
}
