use crate::core::{ChartScales, Layout, LayoutEngine, MappedData};
use crate::error::ChartResult;
use crate::interaction::{InteractionState, TooltipState};
use crate::render::DrawingSurface;

use super::chart_config::{ChartConfig, CompiledConfig};
use super::scene_renderer::SceneLedger;

/// Host width assumed until the first resize notification.
pub const INITIAL_WIDTH_PX: u32 = 640;

/// Mutable per-chart state read by every event handler.
#[derive(Debug, Clone)]
pub struct ChartState {
    pub layout: Layout,
    pub data: Option<MappedData>,
    pub scales: Option<ChartScales>,
    pub interaction: InteractionState,
    pub(super) ledger: SceneLedger,
}

/// One chart instance: configuration, mapped data, layout, scales, hover
/// state and the drawing surface it renders into.
///
/// All methods take `&mut self` and run to completion; the engine holds no
/// global state, so several charts can coexist.
pub struct ChartEngine<S: DrawingSurface> {
    pub(super) surface: S,
    pub(super) config: ChartConfig,
    pub(super) compiled: CompiledConfig,
    pub(super) layout_engine: LayoutEngine,
    pub(super) state: ChartState,
}

impl<S: DrawingSurface> ChartEngine<S> {
    /// Validates `config` and computes the initial layout. Nothing is drawn
    /// until data is loaded.
    pub fn new(surface: S, config: ChartConfig) -> ChartResult<Self> {
        let compiled = config.compile()?;
        let layout_engine = LayoutEngine::new(config.layout)?;
        let layout = layout_engine.compute(INITIAL_WIDTH_PX)?;

        Ok(Self {
            surface,
            config,
            compiled,
            layout_engine,
            state: ChartState {
                layout,
                data: None,
                scales: None,
                interaction: InteractionState::default(),
                ledger: SceneLedger::default(),
            },
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &ChartState {
        &self.state
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.state.layout
    }

    #[must_use]
    pub fn data(&self) -> Option<&MappedData> {
        self.state.data.as_ref()
    }

    #[must_use]
    pub fn scales(&self) -> Option<&ChartScales> {
        self.state.scales.as_ref()
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&TooltipState> {
        self.state.interaction.tooltip()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}
