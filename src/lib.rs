//! linechart-rs: responsive multi-series time-series line charts.
//!
//! Tabular records are mapped into typed series, scaled into a drawing area
//! derived from the host width, and drawn as retained elements on any
//! [`render::DrawingSurface`]. Pointer events resolve the nearest record and
//! series and drive a hover tooltip.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, ChartEngine};
pub use error::{ChartError, ChartResult};
