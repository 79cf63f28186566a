use ordered_float::OrderedFloat;

use crate::core::Record;

/// First index `i` in `lo..=len` with `records[i].time >= time_ms`.
#[must_use]
pub fn bisect_left(records: &[Record], time_ms: f64, lo: usize) -> usize {
    let lo = lo.min(records.len());
    lo + records[lo..].partition_point(|record| record.time_value() < time_ms)
}

/// Index of the record closest in time to `time_ms`.
///
/// Compares the neighbours around the bisection point; ties resolve to the
/// earlier record and positions outside the data clamp to the ends.
#[must_use]
pub fn nearest_record_index(records: &[Record], time_ms: f64) -> Option<usize> {
    match records.len() {
        0 => None,
        1 => Some(0),
        len => {
            let index = bisect_left(records, time_ms, 1);
            if index >= len {
                return Some(len - 1);
            }
            let before = records[index - 1].time_value();
            let after = records[index].time_value();
            if time_ms - before > after - time_ms {
                Some(index)
            } else {
                Some(index - 1)
            }
        }
    }
}

/// Position in `columns` of the series whose value in `record` is closest to
/// `value`; the first configured series wins exact ties.
#[must_use]
pub fn nearest_series_index(record: &Record, columns: &[String], value: f64) -> Option<usize> {
    columns
        .iter()
        .enumerate()
        .filter_map(|(index, column)| {
            record
                .value(column)
                .map(|candidate| (index, OrderedFloat((candidate - value).abs())))
        })
        .min_by_key(|&(_, distance)| distance)
        .map(|(index, _)| index)
}
