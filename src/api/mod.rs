mod chart_config;
mod data_controller;
mod engine;
mod interaction_controller;
mod layout_controller;
mod legend_builder;
mod scene_renderer;
mod tooltip_scene_builder;

pub use chart_config::{ChartConfig, DataSourceKind, DateConfig, ValuesConfig};
pub use data_controller::RecordSource;
pub use engine::{ChartEngine, ChartState, INITIAL_WIDTH_PX};
pub use legend_builder::{LEGEND_FONT_SIZE_PX, LEGEND_HEIGHT_PX, LEGEND_PARTS};
pub use scene_renderer::{
    AXIS_COLOR, AXIS_FONT_SIZE_PX, CAPTURE_ID, GRID_COLOR, SERIES_STROKE_WIDTH_PX, SceneLedger,
    X_AXIS_ID, X_GRID_ID, Y_AXIS_ID, Y_GRID_ID,
};
pub use tooltip_scene_builder::{FOCUS_GUIDE_ID, FOCUS_PARTS};
