use approx::assert_relative_eq;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use indexmap::IndexMap;
use linechart_rs::core::{
    ColorScale, Dimension, LinearScale, PALETTE, Record, ScaleEngine, TimeScale, ValueScale,
};

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single().expect("valid date")
}

fn record(time: DateTime<Utc>, values: &[(&str, f64)]) -> Record {
    let values: IndexMap<String, f64> = values
        .iter()
        .map(|(name, value)| ((*name).to_owned(), *value))
        .collect();
    Record::new(time, values)
}

#[test]
fn linear_scale_round_trip_within_tolerance() {
    let scale = LinearScale::new((10.0, 110.0), (0.0, 1000.0)).expect("valid scale");

    let px = scale.apply(42.5);
    assert_relative_eq!(px, 325.0, epsilon = 1e-9);
    assert_relative_eq!(scale.invert(px), 42.5, epsilon = 1e-9);
}

#[test]
fn linear_scale_rejects_degenerate_domain() {
    assert!(LinearScale::new((1.0, 1.0), (0.0, 10.0)).is_err());
    assert!(LinearScale::new((0.0, f64::NAN), (0.0, 10.0)).is_err());
    assert!(LinearScale::new((0.0, 1.0), (0.0, f64::INFINITY)).is_err());
}

#[test]
fn inverted_range_grows_upwards() {
    let scale = LinearScale::new((0.0, 10.0), (300.0, 0.0)).expect("valid scale");
    assert_relative_eq!(scale.apply(0.0), 300.0);
    assert_relative_eq!(scale.apply(10.0), 0.0);
    assert_relative_eq!(scale.invert(150.0), 5.0);
}

#[test]
fn nice_extends_to_round_step_multiples() {
    let scale = LinearScale::new((0.0, 5.1), (0.0, 100.0))
        .expect("valid scale")
        .nice(10)
        .expect("nice");
    assert_eq!(scale.domain(), (0.0, 5.5));

    let scale = LinearScale::new((0.0, 97.0), (0.0, 100.0))
        .expect("valid scale")
        .nice(10)
        .expect("nice");
    assert_eq!(scale.domain(), (0.0, 100.0));
}

#[test]
fn ticks_use_one_two_five_steps() {
    let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0)).expect("valid scale");
    let ticks = scale.ticks(5);
    assert_eq!(ticks, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);

    let ticks = LinearScale::new((0.0, 5.5), (0.0, 100.0))
        .expect("valid scale")
        .ticks(10);
    assert_eq!(ticks.first().copied(), Some(0.0));
    assert_eq!(ticks.last().copied(), Some(5.5));
    assert_eq!(ticks.len(), 12);
}

#[test]
fn value_scale_pads_the_maximum_and_starts_at_zero() {
    let scale = ValueScale::from_max(5.0, 300.0).expect("scale");
    assert_eq!(scale.domain(), (0.0, 5.5));
    assert_relative_eq!(scale.value_to_pixel(0.0), 300.0);
    assert_relative_eq!(scale.pixel_to_value(0.0), 5.5);
    assert_eq!(scale.data_max(), 5.0);
}

#[test]
fn value_scale_falls_back_when_nothing_is_positive() {
    assert_eq!(ValueScale::from_max(0.0, 100.0).expect("scale").domain(), (0.0, 1.0));
    assert_eq!(ValueScale::from_max(-3.0, 100.0).expect("scale").domain(), (0.0, 1.0));
    assert!(ValueScale::from_max(1.0, 0.0).is_err());
}

#[test]
fn time_scale_maps_first_and_last_record_to_range_ends() {
    let records = vec![
        record(utc(2020, 1, 5), &[("a", 1.0)]),
        record(utc(2020, 1, 1), &[("a", 2.0)]),
        record(utc(2020, 1, 3), &[("a", 3.0)]),
    ];
    let scale = TimeScale::from_records(&records, 800.0).expect("scale");

    assert_eq!(scale.domain(), (utc(2020, 1, 1), utc(2020, 1, 5)));
    assert_relative_eq!(scale.time_to_pixel(utc(2020, 1, 1)), 0.0);
    assert_relative_eq!(scale.time_to_pixel(utc(2020, 1, 3)), 400.0);
    assert_relative_eq!(scale.time_to_pixel(utc(2020, 1, 5)), 800.0);
    assert_eq!(scale.pixel_to_time(400.0), Some(utc(2020, 1, 3)));
}

#[test]
fn time_scale_widens_a_single_instant() {
    let records = vec![record(utc(2020, 6, 1), &[("a", 1.0)])];
    let scale = TimeScale::from_records(&records, 200.0).expect("scale");

    assert_eq!(scale.domain(), (utc(2020, 5, 31), utc(2020, 6, 2)));
    assert_relative_eq!(scale.time_to_pixel(utc(2020, 6, 1)), 100.0);
}

#[test]
fn yearly_ticks_land_on_new_year() {
    let scale = TimeScale::new(utc(2000, 1, 1), utc(2010, 1, 1), 900.0).expect("scale");
    let ticks = scale.ticks(10);

    assert_eq!(ticks.first().copied(), Some(utc(2000, 1, 1)));
    assert_eq!(ticks.last().copied(), Some(utc(2010, 1, 1)));
    assert!(ticks.iter().all(|tick| tick.month() == 1 && tick.day() == 1));
}

#[test]
fn time_ticks_stay_inside_the_domain_and_ascend() {
    let (start, end) = (utc(2020, 1, 1), utc(2020, 3, 1));
    let scale = TimeScale::new(start, end, 600.0).expect("scale");
    for count in [5, 10] {
        let ticks = scale.ticks(count);
        assert!(!ticks.is_empty());
        assert!(ticks.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(ticks.iter().all(|tick| *tick >= start && *tick <= end));
    }
    assert!(scale.ticks(5).len() <= scale.ticks(10).len());
}

#[test]
fn scale_engine_uses_every_configured_column() {
    let records = vec![
        record(utc(2020, 1, 1), &[("a", 1.0), ("b", 2.0)]),
        record(utc(2020, 1, 2), &[("a", 3.0), ("b", 5.0)]),
    ];
    let columns = vec!["a".to_owned(), "b".to_owned()];
    let scales =
        ScaleEngine::compute(&records, &columns, Dimension::new(400.0, 300.0)).expect("scales");

    assert_eq!(scales.y.domain(), (0.0, 5.5));
    assert_eq!(scales.x.range(), (0.0, 400.0));
    assert_eq!(scales.y.range(), (300.0, 0.0));
    assert_eq!(scales.color.color_for("b"), Some(PALETTE[1]));
}

#[test]
fn scale_engine_rejects_empty_input_and_bad_dimensions() {
    let columns = vec!["a".to_owned()];
    assert!(ScaleEngine::compute(&[], &columns, Dimension::new(10.0, 10.0)).is_err());

    let records = vec![record(utc(2020, 1, 1), &[("a", 1.0)])];
    assert!(ScaleEngine::compute(&records, &columns, Dimension::new(0.0, 10.0)).is_err());
    assert!(ScaleEngine::compute(&records, &columns, Dimension::new(10.0, -1.0)).is_err());
}

#[test]
fn palette_wraps_past_six_series() {
    let columns: Vec<String> = (0..8).map(|index| format!("s{index}")).collect();
    let scale = ColorScale::new(&columns);

    assert_eq!(scale.color_for("s6"), Some(PALETTE[0]));
    assert_eq!(scale.color_for("s7"), Some(PALETTE[1]));
    assert_eq!(ColorScale::color_at(13), PALETTE[1]);
}
