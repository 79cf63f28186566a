mod element_id;
mod path;
mod primitives;
mod retained_scene;
pub mod svg;

pub use element_id::{ElementId, series_slug};
pub use path::{Interpolation, line_path};
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, PathCommand, PathPrimitive, Primitive, RectPrimitive,
    TextAnchor, TextBounds, TextPrimitive, TextSpan,
};
pub use retained_scene::{RetainedScene, SceneNode, SceneStats, estimate_text_bounds};

use crate::core::Viewport;
use crate::error::ChartResult;

/// Outer drawing size plus the translation applied to plot-layer elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub viewport: Viewport,
    pub origin_x: f64,
    pub origin_y: f64,
}

/// Paint layer of an element, bottom to top.
///
/// Every layer but `Legend` lives in plot space, i.e. the inner drawing
/// area translated by the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneLayer {
    Axis,
    Grid,
    Series,
    /// Hover guide, dots and label boxes.
    Focus,
    /// Transparent pointer-capture rect.
    Capture,
    /// Legend strip laid out once outside the plot.
    Legend,
}

impl SceneLayer {
    #[must_use]
    pub fn in_plot_space(self) -> bool {
        self != Self::Legend
    }

    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Axis => "axis",
            Self::Grid => "grid",
            Self::Series => "lines",
            Self::Focus => "focus",
            Self::Capture => "interaction",
            Self::Legend => "legend",
        }
    }
}

/// Retained-mode contract implemented by any drawing backend.
///
/// Elements are keyed by stable ids: `upsert` creates or replaces in place
/// and keeps the element's current visibility, so repeated draws never
/// accumulate elements. `measure_text` reports the extent of text that has
/// already been committed with `upsert`.
pub trait DrawingSurface {
    fn set_canvas(&mut self, canvas: Canvas) -> ChartResult<()>;

    fn upsert(&mut self, id: &ElementId, layer: SceneLayer, primitive: Primitive)
    -> ChartResult<()>;

    /// Removes an element; returns whether it existed.
    fn remove(&mut self, id: &ElementId) -> bool;

    /// Shows or hides an existing element. Unknown ids are ignored.
    fn set_visible(&mut self, id: &ElementId, visible: bool);

    fn measure_text(&self, id: &ElementId) -> ChartResult<TextBounds>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoPaintStats, CairoSurface};
