use indexmap::IndexMap;

use crate::error::{ChartError, ChartResult};
use crate::render::{
    Canvas, DrawingSurface, ElementId, Primitive, SceneLayer, TextBounds, TextPrimitive,
};

/// Line box height relative to font size used by text measurement.
const LINE_HEIGHT_RATIO: f64 = 1.2;

/// One retained element.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub layer: SceneLayer,
    pub primitive: Primitive,
    pub visible: bool,
}

/// Counters of surface mutations since construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneStats {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

/// In-memory drawing surface used by tests, headless hosts and the SVG
/// writer.
///
/// Elements keep insertion order within their layer. Text is measured with
/// a deterministic, font-independent width estimate.
#[derive(Debug, Default)]
pub struct RetainedScene {
    canvas: Option<Canvas>,
    nodes: IndexMap<ElementId, SceneNode>,
    stats: SceneStats,
}

impl RetainedScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn canvas(&self) -> Option<Canvas> {
        self.canvas
    }

    #[must_use]
    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.nodes.get(id).is_some_and(|node| node.visible)
    }

    /// Elements in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (&ElementId, &SceneNode)> {
        self.nodes.iter()
    }

    /// Elements bottom to top: by layer, then insertion order.
    #[must_use]
    pub fn paint_order(&self) -> Vec<(&ElementId, &SceneNode)> {
        let mut ordered: Vec<_> = self.nodes.iter().collect();
        ordered.sort_by_key(|(_, node)| node.layer);
        ordered
    }

    /// Number of elements whose top-level group equals `group`.
    #[must_use]
    pub fn count_in_group(&self, group: &str) -> usize {
        self.nodes.keys().filter(|id| id.group() == group).count()
    }

    /// Number of elements whose id starts with `prefix`.
    #[must_use]
    pub fn count_with_prefix(&self, prefix: &str) -> usize {
        self.nodes
            .keys()
            .filter(|id| id.as_str().starts_with(prefix))
            .count()
    }
}

impl DrawingSurface for RetainedScene {
    fn set_canvas(&mut self, canvas: Canvas) -> ChartResult<()> {
        if !canvas.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: i64::from(canvas.viewport.width),
                height: i64::from(canvas.viewport.height),
            });
        }
        self.canvas = Some(canvas);
        Ok(())
    }

    fn upsert(
        &mut self,
        id: &ElementId,
        layer: SceneLayer,
        primitive: Primitive,
    ) -> ChartResult<()> {
        primitive.validate()?;
        match self.nodes.get_mut(id.as_str()) {
            Some(node) => {
                node.layer = layer;
                node.primitive = primitive;
                self.stats.updated += 1;
            }
            None => {
                self.nodes.insert(
                    id.clone(),
                    SceneNode {
                        layer,
                        primitive,
                        visible: true,
                    },
                );
                self.stats.created += 1;
            }
        }
        Ok(())
    }

    fn remove(&mut self, id: &ElementId) -> bool {
        let removed = self.nodes.shift_remove(id.as_str()).is_some();
        if removed {
            self.stats.removed += 1;
        }
        removed
    }

    fn set_visible(&mut self, id: &ElementId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(id.as_str()) {
            node.visible = visible;
        }
    }

    fn measure_text(&self, id: &ElementId) -> ChartResult<TextBounds> {
        let text = self
            .nodes
            .get(id.as_str())
            .and_then(|node| node.primitive.as_text())
            .ok_or_else(|| ChartError::InvalidData(format!("no text element `{id}` to measure")))?;
        Ok(estimate_text_bounds(text))
    }
}

fn estimate_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' | ':' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    units * font_size_px
}

/// Backend-independent bounding box of a text element: the widest span by
/// the vertical distance between the outer spans plus one line box.
#[must_use]
pub fn estimate_text_bounds(text: &TextPrimitive) -> TextBounds {
    let width = text
        .spans
        .iter()
        .map(|span| estimate_text_width_px(&span.text, text.font_size_px))
        .fold(0.0, f64::max);
    let (top, bottom) = text
        .spans
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(top, bottom), span| {
            (top.min(span.offset_y), bottom.max(span.offset_y))
        });
    let spread = if top.is_finite() { bottom - top } else { 0.0 };
    TextBounds {
        width,
        height: spread + text.font_size_px * LINE_HEIGHT_RATIO,
    }
}

#[cfg(test)]
mod tests {
    use super::RetainedScene;
    use crate::render::{
        Color, DrawingSurface, ElementId, LinePrimitive, Primitive, SceneLayer, TextAnchor,
        TextPrimitive, TextSpan,
    };

    fn line(x: f64) -> Primitive {
        Primitive::Line(LinePrimitive::new(x, 0.0, x, 10.0, 1.0, Color::rgb(0.0, 0.0, 0.0)))
    }

    #[test]
    fn upsert_updates_in_place_and_keeps_visibility() {
        let mut scene = RetainedScene::new();
        let id = ElementId::new("grid-x/0");
        scene.upsert(&id, SceneLayer::Grid, line(1.0)).expect("create");
        scene.set_visible(&id, false);
        scene.upsert(&id, SceneLayer::Grid, line(2.0)).expect("update");

        assert_eq!(scene.len(), 1);
        assert!(!scene.is_visible("grid-x/0"));
        assert_eq!(scene.stats().created, 1);
        assert_eq!(scene.stats().updated, 1);
    }

    #[test]
    fn invalid_primitives_are_rejected() {
        let mut scene = RetainedScene::new();
        let result = scene.upsert(&ElementId::new("bad"), SceneLayer::Grid, line(f64::NAN));
        assert!(result.is_err());
        assert!(scene.is_empty());
    }

    #[test]
    fn multi_line_text_measures_widest_span() {
        let mut scene = RetainedScene::new();
        let id = ElementId::new("label");
        let text = TextPrimitive::new("", 0.0, 0.0, 10.0, Color::rgb(0.0, 0.0, 0.0), TextAnchor::Start)
            .with_spans([TextSpan::new("11", 0.0), TextSpan::new("1111", 12.0)]);
        scene
            .upsert(&id, SceneLayer::Grid, Primitive::Text(text))
            .expect("text");

        let bounds = scene.measure_text(&id).expect("measure");
        assert!((bounds.width - 24.8).abs() < 1e-9);
        assert!((bounds.height - 24.0).abs() < 1e-9);
        assert!(scene.measure_text(&ElementId::new("missing")).is_err());
    }
}
