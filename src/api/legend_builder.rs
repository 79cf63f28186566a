use tracing::debug;

use crate::core::Series;
use crate::error::ChartResult;
use crate::render::{
    Color, DrawingSurface, ElementId, Primitive, RectPrimitive, SceneLayer, TextAnchor,
    TextPrimitive,
};

pub const LEGEND_PARTS: [&str; 2] = ["swatch", "label"];
pub const LEGEND_FONT_SIZE_PX: f64 = 12.0;
pub const LEGEND_HEIGHT_PX: f64 = 20.0;

const SWATCH_SIZE_PX: f64 = 12.0;
const SWATCH_GAP_PX: f64 = 6.0;
const ITEM_GAP_PX: f64 = 16.0;
const LABEL_COLOR: Color = Color::from_rgb8(0x33, 0x33, 0x33);

/// Lays out one swatch and label per series, left to right in configured
/// order. Single-series charts get no legend. Returns the number of items.
pub fn build_legend<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    series: &[Series],
) -> ChartResult<usize> {
    if series.len() < 2 {
        return Ok(0);
    }

    let mut x = 0.0;
    for entry in series {
        let item = ElementId::legend_item(&entry.name);
        let swatch = RectPrimitive::new(
            x,
            (LEGEND_HEIGHT_PX - SWATCH_SIZE_PX) / 2.0,
            SWATCH_SIZE_PX,
            SWATCH_SIZE_PX,
            Some(entry.color),
        );
        surface.upsert(&item.child("swatch"), SceneLayer::Legend, Primitive::Rect(swatch))?;

        let label_id = item.child("label");
        let label = TextPrimitive::new(
            entry.name.clone(),
            x + SWATCH_SIZE_PX + SWATCH_GAP_PX,
            LEGEND_HEIGHT_PX / 2.0 + LEGEND_FONT_SIZE_PX * 0.35,
            LEGEND_FONT_SIZE_PX,
            LABEL_COLOR,
            TextAnchor::Start,
        );
        surface.upsert(&label_id, SceneLayer::Legend, Primitive::Text(label))?;
        let label_width = surface.measure_text(&label_id)?.width;

        x += SWATCH_SIZE_PX + SWATCH_GAP_PX + label_width + ITEM_GAP_PX;
    }

    debug!(items = series.len(), "built legend");
    Ok(series.len())
}
