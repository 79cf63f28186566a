use tracing::debug;

use crate::core::{Layout, ScaleEngine};
use crate::error::ChartResult;
use crate::render::DrawingSurface;

use super::scene_renderer::{ChartFrame, draw_chart};
use super::tooltip_scene_builder::hide_tooltip;
use super::ChartEngine;

impl<S: DrawingSurface> ChartEngine<S> {
    /// Applies a host width notification: recomputes layout and scales from
    /// scratch and redraws in place. Idempotent for equal widths.
    ///
    /// The legend is left alone and any visible tooltip is hidden, since its
    /// position belongs to the previous scales.
    pub fn resize(&mut self, width: u32) -> ChartResult<Layout> {
        let layout = self.layout_engine.compute(width)?;

        let Some(data) = self.state.data.as_ref() else {
            self.state.layout = layout;
            debug!(width, bucket = ?layout.bucket, "resized chart without data");
            return Ok(layout);
        };
        let scales = ScaleEngine::compute(&data.records, &self.config.values.columns, layout.inner)?;

        draw_chart(
            &mut self.surface,
            &mut self.state.ledger,
            &ChartFrame {
                layout: &layout,
                scales: &scales,
                data,
                value_format: &self.compiled.value_format,
                interpolation: self.config.values.interpolate,
                hover: self.config.hover,
            },
        )?;
        hide_tooltip(&mut self.surface, &data.series);
        self.state.interaction.on_pointer_leave();

        debug!(
            width,
            height = layout.outer.height,
            bucket = ?layout.bucket,
            x_ticks = self.state.ledger.x_ticks(),
            y_ticks = self.state.ledger.y_ticks(),
            "resized chart"
        );
        self.state.layout = layout;
        self.state.scales = Some(scales);
        Ok(layout)
    }
}
