use approx::assert_relative_eq;
use chrono::{TimeZone, Utc};
use linechart_rs::api::{CAPTURE_ID, FOCUS_GUIDE_ID};
use linechart_rs::interaction::AnchorSide;
use linechart_rs::render::{RetainedScene, TextAnchor};
use linechart_rs::{ChartConfig, ChartEngine};
use serde_json::json;

fn two_series_engine() -> ChartEngine<RetainedScene> {
    let config = ChartConfig::new("date", vec!["a".to_owned(), "b".to_owned()]);
    let mut engine = ChartEngine::new(RetainedScene::new(), config).expect("engine init");
    engine
        .load_json(json!([
            { "date": "2020-01-01", "a": 1, "b": 2 },
            { "date": "2020-01-02", "a": 3, "b": 5 },
        ]))
        .expect("load");
    engine
}

fn focus_visible(engine: &ChartEngine<RetainedScene>, series: &str) -> bool {
    ["dot", "box", "text"]
        .iter()
        .all(|part| engine.surface().is_visible(&format!("focus-group--{series}/{part}")))
}

fn focus_hidden(engine: &ChartEngine<RetainedScene>, series: &str) -> bool {
    ["dot", "box", "text"]
        .iter()
        .all(|part| !engine.surface().is_visible(&format!("focus-group--{series}/{part}")))
}

#[test]
fn pointer_snaps_to_nearest_record_and_series() {
    let mut engine = two_series_engine();
    let scales = engine.scales().expect("scales").clone();
    assert_eq!(scales.y.domain(), (0.0, 5.5));

    let second_day = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).single().expect("valid date");
    let x = scales.x.time_to_pixel(second_day);
    let y = scales.y.value_to_pixel(4.5);
    let tooltip = engine
        .pointer_move(x - 3.0, y)
        .expect("pointer move")
        .expect("tooltip");

    assert_eq!(tooltip.active_record, 1);
    assert_eq!(tooltip.active_series, 1);
    assert_eq!(tooltip.value, 5.0);
    assert_eq!(tooltip.anchor_side, AnchorSide::End);
    assert_relative_eq!(tooltip.x, x);
    assert_relative_eq!(tooltip.y, scales.y.value_to_pixel(5.0));
    assert_eq!(engine.tooltip(), Some(&tooltip));
}

#[test]
fn second_day_near_four_focuses_b() {
    let config = ChartConfig::new("date", vec!["a".to_owned(), "b".to_owned()]);
    let mut engine = ChartEngine::new(RetainedScene::new(), config).expect("engine init");
    engine
        .load_json(json!([
            { "date": "2020-01-01", "a": 1, "b": 5 },
            { "date": "2020-01-02", "a": 3, "b": 4 },
        ]))
        .expect("load");
    let scales = engine.scales().expect("scales").clone();
    let (_, upper) = scales.y.domain();
    assert!(upper >= 5.0 * 1.02);

    let second_day = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).single().expect("valid date");
    let tooltip = engine
        .pointer_move(scales.x.time_to_pixel(second_day), scales.y.value_to_pixel(4.1))
        .expect("pointer move")
        .expect("tooltip");
    assert_eq!(tooltip.active_record, 1);
    assert_eq!(tooltip.timestamp, second_day);
    assert_eq!(tooltip.active_series, 1);
    assert_eq!(tooltip.value, 4.0);
}

#[test]
fn only_the_focused_series_group_is_visible() {
    let mut engine = two_series_engine();
    let scales = engine.scales().expect("scales").clone();

    engine
        .pointer_move(10.0, scales.y.value_to_pixel(2.0))
        .expect("pointer move");
    assert!(focus_visible(&engine, "b"));
    assert!(focus_hidden(&engine, "a"));
    assert!(engine.surface().is_visible(FOCUS_GUIDE_ID));

    engine
        .pointer_move(10.0, scales.y.value_to_pixel(0.5))
        .expect("pointer move");
    assert!(focus_visible(&engine, "a"));
    assert!(focus_hidden(&engine, "b"));
}

#[test]
fn tooltip_text_uses_display_and_value_formats() {
    let config = ChartConfig::new("date", vec!["a".to_owned()])
        .with_display_format("%d.%m.%Y")
        .with_value_format(".1f");
    let mut engine = ChartEngine::new(RetainedScene::new(), config).expect("engine init");
    engine
        .load_json(json!([
            { "date": "2020-01-01", "a": 1 },
            { "date": "2020-01-02", "a": 3 },
        ]))
        .expect("load");

    engine.pointer_move(0.0, 0.0).expect("pointer move");
    let node = engine
        .surface()
        .get("focus-group--a/text")
        .expect("focus text");
    let text = node.primitive.as_text().expect("text primitive");
    let spans: Vec<&str> = text.spans.iter().map(|span| span.text.as_str()).collect();
    assert_eq!(spans, vec!["01.01.2020", "1.0"]);
    assert_eq!(text.anchor, TextAnchor::Start);
}

#[test]
fn label_flips_to_the_left_past_the_midpoint() {
    let mut engine = two_series_engine();
    let width = engine.layout().inner.width;

    let left = engine
        .pointer_move(width * 0.2, 0.0)
        .expect("pointer move")
        .expect("tooltip");
    assert_eq!(left.anchor_side, AnchorSide::Start);
    let right = engine
        .pointer_move(width * 0.8, 0.0)
        .expect("pointer move")
        .expect("tooltip");
    assert_eq!(right.anchor_side, AnchorSide::End);

    let text = engine
        .surface()
        .get("focus-group--b/text")
        .and_then(|node| node.primitive.as_text())
        .expect("focus text");
    assert_eq!(text.anchor, TextAnchor::End);
    assert!(text.x < right.x);
}

#[test]
fn pointer_outside_the_data_clamps_to_the_ends() {
    let mut engine = two_series_engine();
    let width = engine.layout().inner.width;

    let before = engine.pointer_move(-50.0, 0.0).expect("move").expect("tooltip");
    assert_eq!(before.active_record, 0);
    let after = engine
        .pointer_move(width + 50.0, 0.0)
        .expect("move")
        .expect("tooltip");
    assert_eq!(after.active_record, 1);
}

#[test]
fn pointer_leave_hides_the_focus_layer() {
    let mut engine = two_series_engine();
    engine.pointer_move(20.0, 20.0).expect("pointer move");
    assert!(engine.tooltip().is_some());

    engine.pointer_leave();
    assert!(engine.tooltip().is_none());
    assert!(engine.state().interaction.cursor().is_none());
    assert!(!engine.surface().is_visible(FOCUS_GUIDE_ID));
    assert!(focus_hidden(&engine, "a"));
    assert!(focus_hidden(&engine, "b"));
}

#[test]
fn non_finite_pointer_positions_are_ignored() {
    let mut engine = two_series_engine();
    engine.pointer_move(20.0, 20.0).expect("pointer move");
    let before = engine.tooltip().cloned();

    assert!(engine.pointer_move(f64::NAN, 10.0).expect("move").is_none());
    assert!(engine.pointer_move(10.0, f64::INFINITY).expect("move").is_none());
    assert_eq!(engine.tooltip().cloned(), before);
}

#[test]
fn pointer_before_data_is_a_no_op() {
    let config = ChartConfig::new("date", vec!["a".to_owned()]);
    let mut engine = ChartEngine::new(RetainedScene::new(), config).expect("engine init");
    assert!(engine.pointer_move(5.0, 5.0).expect("move").is_none());
    engine.pointer_leave();
    assert!(engine.surface().is_empty());
}

#[test]
fn disabled_hover_skips_capture_and_focus() {
    let config = ChartConfig::new("date", vec!["a".to_owned()]).with_hover(false);
    let mut engine = ChartEngine::new(RetainedScene::new(), config).expect("engine init");
    engine
        .load_json(json!([
            { "date": "2020-01-01", "a": 1 },
            { "date": "2020-01-02", "a": 3 },
        ]))
        .expect("load");

    assert!(engine.surface().get(CAPTURE_ID).is_none());
    assert!(engine.pointer_move(5.0, 5.0).expect("move").is_none());
    assert!(engine.tooltip().is_none());
    assert!(!engine.surface().is_visible(FOCUS_GUIDE_ID));
}

#[test]
fn hover_enabled_adds_a_plot_sized_capture_rect() {
    let engine = two_series_engine();
    let node = engine.surface().get(CAPTURE_ID).expect("capture rect");
    let linechart_rs::render::Primitive::Rect(rect) = &node.primitive else {
        panic!("capture element must be a rect");
    };
    let inner = engine.layout().inner;
    assert_eq!((rect.width, rect.height), (inner.width, inner.height));
    assert!(rect.fill_color.is_none());
}
