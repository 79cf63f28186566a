use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{ChartScales, DataMapper, MappedData, RawRecord, ScaleEngine, records_from_json};
use crate::error::{ChartError, ChartResult};
use crate::render::DrawingSurface;

use super::chart_config::DataSourceKind;
use super::legend_builder::{LEGEND_PARTS, build_legend};
use super::scene_renderer::{ChartFrame, clear_series_elements, draw_chart};
use super::tooltip_scene_builder::{FOCUS_PARTS, setup_focus};
use super::ChartEngine;

/// Data-acquisition collaborator: resolves the configured locator into raw
/// rows (HTTP fetch, JSON or CSV file read, fixture, ...).
pub trait RecordSource {
    fn fetch(&mut self, locator: &str, kind: DataSourceKind) -> ChartResult<Vec<RawRecord>>;
}

impl<F> RecordSource for F
where
    F: FnMut(&str, DataSourceKind) -> ChartResult<Vec<RawRecord>>,
{
    fn fetch(&mut self, locator: &str, kind: DataSourceKind) -> ChartResult<Vec<RawRecord>> {
        self(locator, kind)
    }
}

impl<S: DrawingSurface> ChartEngine<S> {
    /// Maps `raw`, builds the scene and replaces any previously loaded chart.
    ///
    /// Mapping and scale errors leave the previous chart untouched. A surface
    /// error while drawing removes the series elements and leaves the engine
    /// without data, as before the first load.
    pub fn load_records(&mut self, raw: &[RawRecord]) -> ChartResult<()> {
        let mapper = DataMapper::new(
            self.config.date.column.clone(),
            self.compiled.parse_format.clone(),
            self.config.values.columns.clone(),
        )?
        .with_modifier(self.config.values.modify.clone());
        let data = mapper.map(raw)?;
        let scales =
            ScaleEngine::compute(&data.records, mapper.columns(), self.state.layout.inner)?;

        clear_series_elements(
            &mut self.surface,
            &mut self.state.ledger,
            &FOCUS_PARTS,
            &LEGEND_PARTS,
        );
        self.state.interaction.on_pointer_leave();
        self.state.ledger.series = data.series_names();

        let legend_items = match self.draw_loaded(&data, &scales) {
            Ok(legend_items) => legend_items,
            Err(err) => {
                warn!(error = %err, "drawing loaded data failed, chart cleared");
                clear_series_elements(
                    &mut self.surface,
                    &mut self.state.ledger,
                    &FOCUS_PARTS,
                    &LEGEND_PARTS,
                );
                self.state.data = None;
                self.state.scales = None;
                return Err(err);
            }
        };

        debug!(
            records = data.records.len(),
            series = data.series.len(),
            legend_items,
            y_upper = scales.y.domain().1,
            "loaded chart data"
        );
        self.state.data = Some(data);
        self.state.scales = Some(scales);
        Ok(())
    }

    fn draw_loaded(&mut self, data: &MappedData, scales: &ChartScales) -> ChartResult<usize> {
        let legend_items = build_legend(&mut self.surface, &data.series)?;
        draw_chart(
            &mut self.surface,
            &mut self.state.ledger,
            &ChartFrame {
                layout: &self.state.layout,
                scales,
                data,
                value_format: &self.compiled.value_format,
                interpolation: self.config.values.interpolate,
                hover: self.config.hover,
            },
        )?;
        setup_focus(&mut self.surface, &data.series)?;
        Ok(legend_items)
    }

    /// Loads a JSON payload: either an array of row objects or an object
    /// with a `data` array.
    pub fn load_json(&mut self, payload: Value) -> ChartResult<()> {
        let rows = records_from_json(payload)?;
        self.load_records(&rows)
    }

    pub fn load_json_str(&mut self, input: &str) -> ChartResult<()> {
        let payload: Value = serde_json::from_str(input).map_err(|e| {
            ChartError::data_format(0, "data", format!("failed to parse json payload: {e}"))
        })?;
        self.load_json(payload)
    }

    /// Resolves the configured locator through `source` and loads the rows.
    pub fn load_from<R: RecordSource + ?Sized>(&mut self, source: &mut R) -> ChartResult<()> {
        let kind = self.config.data_source_kind()?;
        let rows = source.fetch(&self.config.data, kind).inspect_err(|err| {
            warn!(error = %err, locator = %self.config.data, "record source failed");
        })?;
        self.load_records(&rows)
    }
}
