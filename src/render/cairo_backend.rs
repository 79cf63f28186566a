use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::io::Write;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;

use crate::error::{ChartError, ChartResult};
use crate::render::svg::LEGEND_BAND_PX;
use crate::render::{
    Canvas, Color, DrawingSurface, ElementId, PathCommand, Primitive, RectPrimitive,
    RetainedScene, SceneLayer, TextAnchor, TextBounds, TextPrimitive,
};

const LEGEND_TOP_GAP_PX: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoPaintStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub circles_drawn: usize,
    pub paths_drawn: usize,
    pub texts_drawn: usize,
    /// Hidden elements skipped during the pass.
    pub hidden_skipped: usize,
}

/// Cairo + Pango drawing surface.
///
/// Keeps the scene in a [`RetainedScene`] and measures text with Pango so
/// hover label boxes fit the rendered glyphs. [`CairoSurface::paint`]
/// rasterises into an offscreen image; [`CairoSurface::paint_on_context`]
/// draws into a host-provided context (e.g. a GTK draw callback).
#[derive(Debug)]
pub struct CairoSurface {
    scene: RetainedScene,
    /// 1x1 target used only to create Pango layouts for measurement.
    measure_target: ImageSurface,
    background: Color,
    last_stats: CairoPaintStats,
}

impl CairoSurface {
    pub fn new() -> ChartResult<Self> {
        let measure_target = ImageSurface::create(Format::ARgb32, 1, 1)
            .map_err(|err| map_backend_error("failed to create measurement surface", err))?;
        Ok(Self {
            scene: RetainedScene::new(),
            measure_target,
            background: Color::rgb(1.0, 1.0, 1.0),
            last_stats: CairoPaintStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn scene(&self) -> &RetainedScene {
        &self.scene
    }

    pub fn set_background(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.background = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoPaintStats {
        self.last_stats
    }

    /// Pixel size of the painted image, legend band included.
    pub fn image_size(&self) -> ChartResult<(i32, i32)> {
        let canvas = self.require_canvas()?;
        let has_legend = self
            .scene
            .nodes()
            .any(|(_, node)| node.layer == SceneLayer::Legend);
        let extra = if has_legend { LEGEND_BAND_PX } else { 0.0 };
        let width = i32::try_from(canvas.viewport.width)
            .map_err(|_| ChartError::InvalidData("canvas too wide for cairo".to_owned()))?;
        let height = f64::from(canvas.viewport.height) + extra;
        Ok((width, height.ceil() as i32))
    }

    /// Rasterises the current scene into a new image surface.
    pub fn paint(&mut self) -> ChartResult<ImageSurface> {
        let (width, height) = self.image_size()?;
        let image = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        let context = Context::new(&image)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.paint_on_context(&context)?;
        drop(context);
        Ok(image)
    }

    pub fn write_png<W: Write>(&mut self, writer: &mut W) -> ChartResult<()> {
        let image = self.paint()?;
        image
            .write_to_png(writer)
            .map_err(|err| ChartError::InvalidData(format!("failed to encode png: {err}")))
    }

    pub fn paint_on_context(&mut self, context: &Context) -> ChartResult<CairoPaintStats> {
        let canvas = self.require_canvas()?;
        apply_color(context, self.background);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoPaintStats::default();
        for (_, node) in self.scene.paint_order() {
            if !node.visible {
                stats.hidden_skipped += 1;
                continue;
            }
            context
                .save()
                .map_err(|err| map_backend_error("failed to save cairo state", err))?;
            if node.layer.in_plot_space() {
                context.translate(canvas.origin_x, canvas.origin_y);
            } else {
                context.translate(
                    canvas.origin_x,
                    f64::from(canvas.viewport.height) + LEGEND_TOP_GAP_PX,
                );
            }
            let painted = paint_primitive(context, &node.primitive, &mut stats);
            context
                .restore()
                .map_err(|err| map_backend_error("failed to restore cairo state", err))?;
            painted?;
        }

        self.last_stats = stats;
        Ok(stats)
    }

    fn require_canvas(&self) -> ChartResult<Canvas> {
        self.scene
            .canvas()
            .ok_or_else(|| ChartError::InvalidData("cairo surface has no canvas".to_owned()))
    }
}

impl DrawingSurface for CairoSurface {
    fn set_canvas(&mut self, canvas: Canvas) -> ChartResult<()> {
        self.scene.set_canvas(canvas)
    }

    fn upsert(
        &mut self,
        id: &ElementId,
        layer: SceneLayer,
        primitive: Primitive,
    ) -> ChartResult<()> {
        self.scene.upsert(id, layer, primitive)
    }

    fn remove(&mut self, id: &ElementId) -> bool {
        self.scene.remove(id)
    }

    fn set_visible(&mut self, id: &ElementId, visible: bool) {
        self.scene.set_visible(id, visible);
    }

    fn measure_text(&self, id: &ElementId) -> ChartResult<TextBounds> {
        let text = self
            .scene
            .get(id.as_str())
            .and_then(|node| node.primitive.as_text())
            .ok_or_else(|| ChartError::InvalidData(format!("no text element `{id}` to measure")))?;
        let context = Context::new(&self.measure_target)
            .map_err(|err| map_backend_error("failed to create measurement context", err))?;

        let mut width: f64 = 0.0;
        let mut top = f64::INFINITY;
        let mut bottom = f64::NEG_INFINITY;
        for span in &text.spans {
            let layout = span_layout(&context, text, &span.text);
            let (span_width, span_height) = layout.pixel_size();
            let ascent = f64::from(layout.baseline()) / f64::from(pango::SCALE);
            width = width.max(f64::from(span_width));
            top = top.min(span.offset_y - ascent);
            bottom = bottom.max(span.offset_y - ascent + f64::from(span_height));
        }
        Ok(TextBounds {
            width,
            height: if top.is_finite() { bottom - top } else { 0.0 },
        })
    }
}

fn paint_primitive(
    context: &Context,
    primitive: &Primitive,
    stats: &mut CairoPaintStats,
) -> ChartResult<()> {
    match primitive {
        Primitive::Line(line) => {
            apply_color(context, line.color);
            context.set_line_width(line.stroke_width);
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            stats.lines_drawn += 1;
        }
        Primitive::Rect(rect) => {
            // Rects without fill are hit regions only.
            if let Some(fill) = rect.fill_color {
                append_rect_path(context, *rect);
                apply_color(context, fill);
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                stats.rects_drawn += 1;
            }
        }
        Primitive::Circle(circle) => {
            context.new_sub_path();
            context.arc(circle.cx, circle.cy, circle.radius, 0.0, TAU);
            apply_color(context, circle.fill_color);
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill circle", err))?;
            stats.circles_drawn += 1;
        }
        Primitive::Path(path) => {
            if path.commands.is_empty() {
                return Ok(());
            }
            context.new_path();
            for command in &path.commands {
                match *command {
                    PathCommand::MoveTo { x, y } => context.move_to(x, y),
                    PathCommand::LineTo { x, y } => context.line_to(x, y),
                    PathCommand::CubicTo {
                        x1,
                        y1,
                        x2,
                        y2,
                        x,
                        y,
                    } => context.curve_to(x1, y1, x2, y2, x, y),
                }
            }
            apply_color(context, path.color);
            context.set_line_width(path.stroke_width);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke path", err))?;
            stats.paths_drawn += 1;
        }
        Primitive::Text(text) => {
            for span in &text.spans {
                let layout = span_layout(context, text, &span.text);
                let (span_width, _) = layout.pixel_size();
                let x = match text.anchor {
                    TextAnchor::Start => text.x,
                    TextAnchor::Middle => text.x - f64::from(span_width) / 2.0,
                    TextAnchor::End => text.x - f64::from(span_width),
                };
                let ascent = f64::from(layout.baseline()) / f64::from(pango::SCALE);
                apply_color(context, span.color.unwrap_or(text.color));
                context.move_to(x, text.y + span.offset_y - ascent);
                pangocairo::functions::show_layout(context, &layout);
            }
            stats.texts_drawn += 1;
        }
    }
    Ok(())
}

fn span_layout(context: &Context, text: &TextPrimitive, content: &str) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(context);
    let font_description = FontDescription::from_string(&format!("Sans {}px", text.font_size_px));
    layout.set_font_description(Some(&font_description));
    layout.set_text(content);
    layout
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn append_rect_path(context: &Context, rect: RectPrimitive) {
    if rect.corner_radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }

    let radius = rect
        .corner_radius
        .min(rect.width * 0.5)
        .min(rect.height * 0.5);
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;

    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
