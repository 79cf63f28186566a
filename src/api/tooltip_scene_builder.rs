use crate::core::{DateFormat, NumberFormat, Series};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    FOCUS_DOT_RADIUS_PX, LABEL_CORNER_RADIUS_PX, TOOLTIP_FONT_SIZE_PX, TooltipBox, TooltipState,
    value_line_offset_px,
};
use crate::render::{
    CirclePrimitive, Color, DrawingSurface, ElementId, LinePrimitive, Primitive, RectPrimitive,
    SceneLayer, TextAnchor, TextPrimitive, TextSpan,
};

pub const FOCUS_GUIDE_ID: &str = "focus/guide";
pub const FOCUS_PARTS: [&str; 3] = ["dot", "box", "text"];

const GUIDE_COLOR: Color = Color::from_rgb8(0x99, 0x99, 0x99);
const LABEL_FILL: Color = Color::rgba(1.0, 1.0, 1.0, 0.9);
const LABEL_TEXT_COLOR: Color = Color::from_rgb8(0x33, 0x33, 0x33);

/// Creates the hidden focus guide and one focus group (dot, box, text) per
/// series.
pub fn setup_focus<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    series: &[Series],
) -> ChartResult<()> {
    let guide = ElementId::new(FOCUS_GUIDE_ID);
    surface.upsert(
        &guide,
        SceneLayer::Focus,
        Primitive::Line(LinePrimitive::new(0.0, 0.0, 0.0, 0.0, 1.0, GUIDE_COLOR)),
    )?;
    surface.set_visible(&guide, false);

    for entry in series {
        let group = ElementId::focus_group(&entry.name);
        let dot = CirclePrimitive::new(0.0, 0.0, FOCUS_DOT_RADIUS_PX, entry.color);
        let label_box = RectPrimitive::new(0.0, 0.0, 0.0, 0.0, Some(LABEL_FILL))
            .with_corner_radius(LABEL_CORNER_RADIUS_PX);
        let text = label_text(String::new(), String::new(), entry.color, 0.0, 0.0);

        for (part, primitive) in FOCUS_PARTS.iter().zip([
            Primitive::Circle(dot),
            Primitive::Rect(label_box),
            Primitive::Text(text),
        ]) {
            let id = group.child(part);
            surface.upsert(&id, SceneLayer::Focus, primitive)?;
            surface.set_visible(&id, false);
        }
    }
    Ok(())
}

/// Text and formats a hover label is built from.
#[derive(Debug, Clone, Copy)]
pub struct TooltipContent<'a> {
    pub series: &'a [Series],
    pub display_format: &'a DateFormat,
    pub value_format: &'a NumberFormat,
    pub plot_height: f64,
}

/// Moves the guide to the focused record and shows only the focused series'
/// group. Text is committed and measured before the box is sized around it.
pub fn show_tooltip<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    state: &TooltipState,
    content: &TooltipContent<'_>,
) -> ChartResult<()> {
    let focused = content.series.get(state.active_series).ok_or_else(|| {
        ChartError::InvalidData(format!("no series at index {}", state.active_series))
    })?;
    for (index, entry) in content.series.iter().enumerate() {
        if index != state.active_series {
            set_group_visible(surface, &entry.name, false);
        }
    }

    let guide = ElementId::new(FOCUS_GUIDE_ID);
    surface.upsert(
        &guide,
        SceneLayer::Focus,
        Primitive::Line(LinePrimitive::new(
            state.x,
            0.0,
            state.x,
            content.plot_height,
            1.0,
            GUIDE_COLOR,
        )),
    )?;
    surface.set_visible(&guide, true);

    let group = ElementId::focus_group(&focused.name);
    let text_id = group.child("text");
    let date_text = content.display_format.format(state.timestamp);
    let value_text = content.value_format.format(state.value);

    surface.upsert(
        &text_id,
        SceneLayer::Focus,
        Primitive::Text(label_text(
            date_text.clone(),
            value_text.clone(),
            focused.color,
            state.x,
            state.y,
        )),
    )?;
    let bounds = surface.measure_text(&text_id)?;
    let placed = TooltipBox::place(state.x, state.y, bounds, state.anchor_side);

    surface.upsert(
        &group.child("box"),
        SceneLayer::Focus,
        Primitive::Rect(
            RectPrimitive::new(
                placed.box_x,
                placed.box_y,
                placed.box_width,
                placed.box_height,
                Some(LABEL_FILL),
            )
            .with_corner_radius(LABEL_CORNER_RADIUS_PX),
        ),
    )?;
    surface.upsert(
        &group.child("dot"),
        SceneLayer::Focus,
        Primitive::Circle(CirclePrimitive::new(
            state.x,
            state.y,
            FOCUS_DOT_RADIUS_PX,
            focused.color,
        )),
    )?;
    let mut text = label_text(
        date_text,
        value_text,
        focused.color,
        placed.text_x,
        placed.text_y,
    );
    text.anchor = placed.text_anchor;
    surface.upsert(&text_id, SceneLayer::Focus, Primitive::Text(text))?;

    set_group_visible(surface, &focused.name, true);
    Ok(())
}

/// Hides the guide and every focus group.
pub fn hide_tooltip<S: DrawingSurface + ?Sized>(surface: &mut S, series: &[Series]) {
    surface.set_visible(&ElementId::new(FOCUS_GUIDE_ID), false);
    for entry in series {
        set_group_visible(surface, &entry.name, false);
    }
}

fn set_group_visible<S: DrawingSurface + ?Sized>(surface: &mut S, series_name: &str, visible: bool) {
    let group = ElementId::focus_group(series_name);
    for part in FOCUS_PARTS {
        surface.set_visible(&group.child(part), visible);
    }
}

fn label_text(date: String, value: String, color: Color, x: f64, y: f64) -> TextPrimitive {
    TextPrimitive::new(
        String::new(),
        x,
        y,
        TOOLTIP_FONT_SIZE_PX,
        LABEL_TEXT_COLOR,
        TextAnchor::Start,
    )
    .with_spans([
        TextSpan::new(date, 0.0),
        TextSpan::new(value, value_line_offset_px()).with_color(color),
    ])
}
