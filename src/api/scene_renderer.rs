use tracing::trace;

use crate::core::{ChartScales, Layout, MappedData, NumberFormat, multi_scale_label};
use crate::error::ChartResult;
use crate::render::{
    Canvas, Color, DrawingSurface, ElementId, Interpolation, LinePrimitive, PathPrimitive,
    Primitive, RectPrimitive, SceneLayer, TextAnchor, TextPrimitive, line_path,
};

pub const AXIS_COLOR: Color = Color::from_rgb8(0x33, 0x33, 0x33);
pub const GRID_COLOR: Color = Color::from_rgb8(0xe5, 0xe5, 0xe5);
pub const AXIS_FONT_SIZE_PX: f64 = 10.0;
pub const SERIES_STROKE_WIDTH_PX: f64 = 2.0;

const TICK_SIZE_PX: f64 = 6.0;
const TICK_PADDING_PX: f64 = 3.0;
const AXIS_STROKE_WIDTH_PX: f64 = 1.0;

pub const X_AXIS_ID: &str = "axis-x";
pub const Y_AXIS_ID: &str = "axis-y";
pub const X_GRID_ID: &str = "grid-x";
pub const Y_GRID_ID: &str = "grid-y";
pub const CAPTURE_ID: &str = "interaction";

/// Element counts of the previous draw pass, used to prune elements that a
/// smaller tick count no longer produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneLedger {
    x_ticks: usize,
    y_ticks: usize,
    /// Series whose line, focus and legend elements are on the surface.
    pub(crate) series: Vec<String>,
}

impl SceneLedger {
    #[must_use]
    pub fn x_ticks(&self) -> usize {
        self.x_ticks
    }

    #[must_use]
    pub fn y_ticks(&self) -> usize {
        self.y_ticks
    }

    #[must_use]
    pub fn series(&self) -> &[String] {
        &self.series
    }
}

/// Everything one draw pass reads.
#[derive(Debug, Clone, Copy)]
pub struct ChartFrame<'a> {
    pub layout: &'a Layout,
    pub scales: &'a ChartScales,
    pub data: &'a MappedData,
    pub value_format: &'a NumberFormat,
    pub interpolation: Interpolation,
    pub hover: bool,
}

/// Draws or redraws axes, gridlines, series lines and the capture rect in
/// place. Safe to call any number of times.
pub fn draw_chart<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    ledger: &mut SceneLedger,
    frame: &ChartFrame<'_>,
) -> ChartResult<()> {
    let layout = frame.layout;
    surface.set_canvas(Canvas {
        viewport: layout.outer,
        origin_x: layout.margins.left,
        origin_y: layout.margins.top,
    })?;

    ledger.x_ticks = draw_x_axis(surface, ledger.x_ticks, frame)?;
    ledger.y_ticks = draw_y_axis(surface, ledger.y_ticks, frame)?;
    draw_series_lines(surface, frame)?;

    let capture = ElementId::new(CAPTURE_ID);
    if frame.hover {
        let rect = RectPrimitive::new(0.0, 0.0, layout.inner.width, layout.inner.height, None);
        surface.upsert(&capture, SceneLayer::Capture, Primitive::Rect(rect))?;
    } else {
        surface.remove(&capture);
    }
    ledger.series = frame.data.series_names();

    trace!(
        x_ticks = ledger.x_ticks,
        y_ticks = ledger.y_ticks,
        series = ledger.series.len(),
        "drew chart scene"
    );
    Ok(())
}

fn draw_x_axis<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    previous: usize,
    frame: &ChartFrame<'_>,
) -> ChartResult<usize> {
    let (width, height) = (frame.layout.inner.width, frame.layout.inner.height);
    let axis = ElementId::new(X_AXIS_ID);
    let grid = ElementId::new(X_GRID_ID);
    surface.upsert(
        &axis.child("domain"),
        SceneLayer::Axis,
        Primitive::Line(axis_line(0.0, height, width, height)),
    )?;

    let ticks = frame.scales.x.ticks(frame.layout.tick_counts.x);
    for (index, tick) in ticks.iter().enumerate() {
        let x = frame.scales.x.time_to_pixel(*tick);
        surface.upsert(
            &grid.child(format_args!("line-{index}")),
            SceneLayer::Grid,
            Primitive::Line(grid_line(x, 0.0, x, height)),
        )?;
        surface.upsert(
            &axis.child(format_args!("tick-{index}")),
            SceneLayer::Axis,
            Primitive::Line(axis_line(x, height, x, height + TICK_SIZE_PX)),
        )?;
        let label = TextPrimitive::new(
            multi_scale_label(*tick),
            x,
            height + TICK_SIZE_PX + TICK_PADDING_PX + AXIS_FONT_SIZE_PX * 0.71,
            AXIS_FONT_SIZE_PX,
            AXIS_COLOR,
            TextAnchor::Middle,
        );
        surface.upsert(
            &axis.child(format_args!("label-{index}")),
            SceneLayer::Axis,
            Primitive::Text(label),
        )?;
    }

    prune_ticks(surface, &axis, &grid, ticks.len(), previous);
    Ok(ticks.len())
}

fn draw_y_axis<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    previous: usize,
    frame: &ChartFrame<'_>,
) -> ChartResult<usize> {
    let (width, height) = (frame.layout.inner.width, frame.layout.inner.height);
    let axis = ElementId::new(Y_AXIS_ID);
    let grid = ElementId::new(Y_GRID_ID);
    surface.upsert(
        &axis.child("domain"),
        SceneLayer::Axis,
        Primitive::Line(axis_line(0.0, 0.0, 0.0, height)),
    )?;

    let ticks = frame.scales.y.ticks(frame.layout.tick_counts.y);
    for (index, tick) in ticks.iter().enumerate() {
        let y = frame.scales.y.value_to_pixel(*tick);
        surface.upsert(
            &grid.child(format_args!("line-{index}")),
            SceneLayer::Grid,
            Primitive::Line(grid_line(0.0, y, width, y)),
        )?;
        surface.upsert(
            &axis.child(format_args!("tick-{index}")),
            SceneLayer::Axis,
            Primitive::Line(axis_line(-TICK_SIZE_PX, y, 0.0, y)),
        )?;
        let label = TextPrimitive::new(
            frame.value_format.format(*tick),
            -(TICK_SIZE_PX + TICK_PADDING_PX),
            y + AXIS_FONT_SIZE_PX * 0.32,
            AXIS_FONT_SIZE_PX,
            AXIS_COLOR,
            TextAnchor::End,
        );
        surface.upsert(
            &axis.child(format_args!("label-{index}")),
            SceneLayer::Axis,
            Primitive::Text(label),
        )?;
    }

    prune_ticks(surface, &axis, &grid, ticks.len(), previous);
    Ok(ticks.len())
}

fn prune_ticks<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    axis: &ElementId,
    grid: &ElementId,
    current: usize,
    previous: usize,
) {
    for index in current..previous {
        surface.remove(&grid.child(format_args!("line-{index}")));
        surface.remove(&axis.child(format_args!("tick-{index}")));
        surface.remove(&axis.child(format_args!("label-{index}")));
    }
}

fn draw_series_lines<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    frame: &ChartFrame<'_>,
) -> ChartResult<()> {
    let scales = frame.scales;
    for series in &frame.data.series {
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|point| {
                (
                    scales.x.time_to_pixel(point.timestamp),
                    scales.y.value_to_pixel(point.value),
                )
            })
            .collect();
        let path = PathPrimitive::new(
            line_path(&points, frame.interpolation),
            SERIES_STROKE_WIDTH_PX,
            series.color,
        );
        surface.upsert(
            &ElementId::series_line(&series.name),
            SceneLayer::Series,
            Primitive::Path(path),
        )?;
    }
    Ok(())
}

/// Removes every element tied to the series of a previous load.
pub fn clear_series_elements<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    ledger: &mut SceneLedger,
    focus_parts: &[&str],
    legend_parts: &[&str],
) {
    for name in ledger.series.drain(..) {
        surface.remove(&ElementId::series_line(&name));
        let focus = ElementId::focus_group(&name);
        for part in focus_parts {
            surface.remove(&focus.child(part));
        }
        let legend = ElementId::legend_item(&name);
        for part in legend_parts {
            surface.remove(&legend.child(part));
        }
    }
}

fn axis_line(x1: f64, y1: f64, x2: f64, y2: f64) -> LinePrimitive {
    LinePrimitive::new(x1, y1, x2, y2, AXIS_STROKE_WIDTH_PX, AXIS_COLOR)
}

fn grid_line(x1: f64, y1: f64, x2: f64, y2: f64) -> LinePrimitive {
    LinePrimitive::new(x1, y1, x2, y2, AXIS_STROKE_WIDTH_PX, GRID_COLOR)
}
