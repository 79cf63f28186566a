//! SVG serialization of a [`RetainedScene`].
//!
//! Plot-space layers become `<g>` groups inside a container translated by
//! the canvas origin; the legend is placed in a band below the chart.
//! Every element carries its [`ElementId`](crate::render::ElementId) as `id`
//! so hosts can style series from external CSS.

use std::fmt::{self, Write};

use crate::error::{ChartError, ChartResult};
use crate::render::{
    Canvas, Color, ElementId, PathCommand, Primitive, RetainedScene, SceneLayer, SceneNode,
    TextPrimitive,
};

/// Height reserved below the chart when the scene has legend elements.
pub const LEGEND_BAND_PX: f64 = 28.0;

const LEGEND_TOP_GAP_PX: f64 = 4.0;

pub fn to_svg(scene: &RetainedScene) -> ChartResult<String> {
    let canvas = scene
        .canvas()
        .ok_or_else(|| ChartError::InvalidData("scene has no canvas to serialize".to_owned()))?;
    let mut out = String::new();
    write_document(&mut out, canvas, &scene.paint_order())
        .map_err(|e| ChartError::InvalidData(format!("failed to write svg: {e}")))?;
    Ok(out)
}

fn write_document(
    out: &mut String,
    canvas: Canvas,
    nodes: &[(&ElementId, &SceneNode)],
) -> fmt::Result {
    let has_legend = nodes
        .iter()
        .any(|(_, node)| node.layer == SceneLayer::Legend);
    let width = f64::from(canvas.viewport.width);
    let chart_height = f64::from(canvas.viewport.height);
    let height = if has_legend {
        chart_height + LEGEND_BAND_PX
    } else {
        chart_height
    };

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="linechart" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}">"#
    )?;
    writeln!(
        out,
        r#"  <g class="container" transform="translate({},{})">"#,
        num(canvas.origin_x),
        num(canvas.origin_y)
    )?;

    let mut open_layer: Option<SceneLayer> = None;
    for (id, node) in nodes.iter().filter(|(_, node)| node.layer.in_plot_space()) {
        if open_layer != Some(node.layer) {
            if open_layer.is_some() {
                writeln!(out, "    </g>")?;
            }
            writeln!(out, r#"    <g class="{}">"#, node.layer.class_name())?;
            open_layer = Some(node.layer);
        }
        write_node(out, id.as_str(), node, "      ")?;
    }
    if open_layer.is_some() {
        writeln!(out, "    </g>")?;
    }
    writeln!(out, "  </g>")?;

    if has_legend {
        writeln!(
            out,
            r#"  <g class="legend" transform="translate({},{})">"#,
            num(canvas.origin_x),
            num(chart_height + LEGEND_TOP_GAP_PX)
        )?;
        for (id, node) in nodes
            .iter()
            .filter(|(_, node)| node.layer == SceneLayer::Legend)
        {
            write_node(out, id.as_str(), node, "    ")?;
        }
        writeln!(out, "  </g>")?;
    }
    writeln!(out, "</svg>")
}

fn write_node(out: &mut String, id: &str, node: &SceneNode, indent: &str) -> fmt::Result {
    let id = escape(id);
    let hidden = if node.visible {
        ""
    } else {
        r#" style="display:none""#
    };

    match &node.primitive {
        Primitive::Line(line) => writeln!(
            out,
            r#"{indent}<line id="{id}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}"{} stroke-width="{}"{hidden}/>"#,
            num(line.x1),
            num(line.y1),
            num(line.x2),
            num(line.y2),
            line.color.to_hex(),
            opacity("stroke-opacity", line.color),
            num(line.stroke_width),
        ),
        Primitive::Rect(rect) => {
            let fill = match rect.fill_color {
                Some(color) => format!(r#"fill="{}"{}"#, color.to_hex(), opacity("fill-opacity", color)),
                None => r#"fill="none" pointer-events="all""#.to_owned(),
            };
            writeln!(
                out,
                r#"{indent}<rect id="{id}" x="{}" y="{}" width="{}" height="{}" rx="{r}" ry="{r}" {fill}{hidden}/>"#,
                num(rect.x),
                num(rect.y),
                num(rect.width),
                num(rect.height),
                r = num(rect.corner_radius),
            )
        }
        Primitive::Circle(circle) => writeln!(
            out,
            r#"{indent}<circle id="{id}" cx="{}" cy="{}" r="{}" fill="{}"{}{hidden}/>"#,
            num(circle.cx),
            num(circle.cy),
            num(circle.radius),
            circle.fill_color.to_hex(),
            opacity("fill-opacity", circle.fill_color),
        ),
        Primitive::Path(path) => writeln!(
            out,
            r#"{indent}<path id="{id}" class="line" d="{}" fill="none" stroke="{}"{} stroke-width="{}"{hidden}/>"#,
            path_data(&path.commands),
            path.color.to_hex(),
            opacity("stroke-opacity", path.color),
            num(path.stroke_width),
        ),
        Primitive::Text(text) => write_text(out, &id, text, indent, hidden),
    }
}

fn write_text(
    out: &mut String,
    id: &str,
    text: &TextPrimitive,
    indent: &str,
    hidden: &str,
) -> fmt::Result {
    write!(
        out,
        r#"{indent}<text id="{id}" x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{}"{hidden}>"#,
        num(text.x),
        num(text.y),
        num(text.font_size_px),
        text.color.to_hex(),
        text.anchor.as_str(),
    )?;
    if let [span] = text.spans.as_slice() {
        if span.offset_y == 0.0 && span.color.is_none() {
            write!(out, "{}", escape(&span.text))?;
            return writeln!(out, "</text>");
        }
    }
    for span in &text.spans {
        let fill = span
            .color
            .map(|color| format!(r#" fill="{}""#, color.to_hex()))
            .unwrap_or_default();
        write!(
            out,
            r#"<tspan x="{}" y="{}"{fill}>{}</tspan>"#,
            num(text.x),
            num(text.y + span.offset_y),
            escape(&span.text),
        )?;
    }
    writeln!(out, "</text>")
}

fn path_data(commands: &[PathCommand]) -> String {
    let mut data = String::new();
    for command in commands {
        if !data.is_empty() {
            data.push(' ');
        }
        match *command {
            PathCommand::MoveTo { x, y } => data.push_str(&format!("M{},{}", num(x), num(y))),
            PathCommand::LineTo { x, y } => data.push_str(&format!("L{},{}", num(x), num(y))),
            PathCommand::CubicTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => data.push_str(&format!(
                "C{},{} {},{} {},{}",
                num(x1),
                num(y1),
                num(x2),
                num(y2),
                num(x),
                num(y)
            )),
        }
    }
    data
}

fn opacity(attribute: &str, color: Color) -> String {
    if color.alpha < 1.0 {
        format!(r#" {attribute}="{}""#, num(color.alpha))
    } else {
        String::new()
    }
}

/// Coordinates rounded to two decimals without trailing zeros.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_owned();
    }
    let text = format!("{rounded:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape, num, to_svg};
    use crate::core::Viewport;
    use crate::render::{
        Canvas, Color, DrawingSurface, ElementId, LinePrimitive, Primitive, RectPrimitive,
        RetainedScene, SceneLayer,
    };

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(12.346), "12.35");
        assert_eq!(num(-6.5), "-6.5");
        assert_eq!(num(-0.001), "0");
        assert_eq!(escape(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn scene_without_canvas_is_rejected() {
        assert!(to_svg(&RetainedScene::new()).is_err());
    }

    #[test]
    fn layers_are_grouped_and_hidden_elements_marked() {
        let mut scene = RetainedScene::new();
        scene
            .set_canvas(Canvas {
                viewport: Viewport::new(100, 50),
                origin_x: 45.0,
                origin_y: 10.0,
            })
            .expect("canvas");
        let guide = ElementId::new("focus/guide");
        scene
            .upsert(
                &guide,
                SceneLayer::Focus,
                Primitive::Line(LinePrimitive::new(1.0, 0.0, 1.0, 20.0, 1.0, Color::rgb(0.0, 0.0, 0.0))),
            )
            .expect("guide");
        scene.set_visible(&guide, false);
        scene
            .upsert(
                &ElementId::new("grid-x/line-0"),
                SceneLayer::Grid,
                Primitive::Line(LinePrimitive::new(5.0, 0.0, 5.0, 20.0, 1.0, Color::rgb(0.5, 0.5, 0.5))),
            )
            .expect("grid");
        scene
            .upsert(
                &ElementId::new("legend-item--a/swatch"),
                SceneLayer::Legend,
                Primitive::Rect(RectPrimitive::new(0.0, 4.0, 12.0, 12.0, Some(Color::rgb(1.0, 0.0, 0.0)))),
            )
            .expect("legend");

        let svg = to_svg(&scene).expect("svg");
        assert!(svg.contains(r#"height="78""#));
        assert!(svg.contains(r#"transform="translate(45,10)""#));
        let grid_at = svg.find(r#"id="grid-x/line-0""#).expect("grid element");
        let guide_at = svg.find(r#"id="focus/guide""#).expect("guide element");
        assert!(grid_at < guide_at);
        assert!(svg.contains(r#"style="display:none""#));
        assert!(svg.contains(r#"<g class="legend" transform="translate(45,54)">"#));
    }
}
