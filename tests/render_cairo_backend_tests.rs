#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use linechart_rs::render::CairoSurface;
use linechart_rs::{ChartConfig, ChartEngine};
use serde_json::json;

fn loaded_engine() -> ChartEngine<CairoSurface> {
    let config = ChartConfig::new("date", vec!["a".to_owned(), "b".to_owned()]);
    let mut engine =
        ChartEngine::new(CairoSurface::new().expect("surface"), config).expect("engine init");
    engine
        .load_json(json!([
            { "date": "2020-01-01", "a": 1, "b": 2 },
            { "date": "2020-01-02", "a": 3, "b": 5 },
            { "date": "2020-01-03", "a": 2, "b": 4 },
        ]))
        .expect("load");
    engine
}

#[test]
fn painting_without_a_canvas_fails() {
    let mut surface = CairoSurface::new().expect("surface");
    assert!(surface.paint().is_err());
}

#[test]
fn paints_series_axes_and_legend() {
    let mut surface = loaded_engine().into_surface();
    let (width, height) = surface.image_size().expect("size");
    assert_eq!(width, 640);
    assert_eq!(height, 360 + 28);

    let image = surface.paint().expect("paint");
    assert_eq!(image.width(), width);
    let stats = surface.last_stats();
    assert_eq!(stats.paths_drawn, 2);
    // two legend swatches; the capture rect has no fill
    assert_eq!(stats.rects_drawn, 2);
    assert!(stats.lines_drawn >= 4);
    assert!(stats.texts_drawn >= 2);
    assert!(stats.hidden_skipped > 0);
}

#[test]
fn hover_label_is_sized_from_pango_metrics() {
    let mut engine = loaded_engine();
    let tooltip = engine
        .pointer_move(10.0, 10.0)
        .expect("pointer move")
        .expect("tooltip");
    let scene = engine.surface().scene();
    let node = scene
        .get(&format!("focus-group--{}/box", ["a", "b"][tooltip.active_series]))
        .expect("label box");
    let linechart_rs::render::Primitive::Rect(rect) = &node.primitive else {
        panic!("label box must be a rect");
    };
    assert!(node.visible);
    assert!(rect.width > 13.0);
    assert!(rect.height > 13.0);

    let mut surface = engine.into_surface();
    surface.paint().expect("paint");
    assert_eq!(surface.last_stats().circles_drawn, 1);
}

#[test]
fn can_draw_on_an_external_context() {
    let mut surface = loaded_engine().into_surface();
    let target = ImageSurface::create(Format::ARgb32, 640, 388).expect("image");
    let context = Context::new(&target).expect("context");
    let stats = surface.paint_on_context(&context).expect("paint");
    assert_eq!(stats.paths_drawn, 2);
}

#[test]
fn png_output_has_the_png_signature() {
    let mut surface = loaded_engine().into_surface();
    let mut bytes = Vec::new();
    surface.write_png(&mut bytes).expect("png");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
