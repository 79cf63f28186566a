use tracing::trace;

use crate::core::{ColorScale, Dimension, Record, TimeScale, ValueScale};
use crate::error::{ChartError, ChartResult};

/// The three mappings one draw pass needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScales {
    pub x: TimeScale,
    pub y: ValueScale,
    pub color: ColorScale,
}

/// Builds [`ChartScales`] from mapped records and the inner drawing size.
///
/// Scales are rebuilt from scratch on every call; nothing is patched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleEngine;

impl ScaleEngine {
    pub fn compute(
        records: &[Record],
        columns: &[String],
        dimension: Dimension,
    ) -> ChartResult<ChartScales> {
        if records.is_empty() {
            return Err(ChartError::EmptyDataset);
        }
        if !dimension.is_valid() {
            return Err(ChartError::InvalidData(format!(
                "drawing dimension must be positive, got {}x{}",
                dimension.width, dimension.height
            )));
        }

        let x = TimeScale::from_records(records, dimension.width)?;
        let y = ValueScale::from_records(records, columns, dimension.height)?;
        let color = ColorScale::new(columns);
        trace!(
            y_upper = y.domain().1,
            width = dimension.width,
            height = dimension.height,
            "computed scales"
        );
        Ok(ChartScales { x, y, color })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use indexmap::IndexMap;

    use super::ScaleEngine;
    use crate::core::{Dimension, Record};
    use crate::error::ChartError;

    #[test]
    fn two_record_domains() {
        let record = |day, a, b| {
            let mut values = IndexMap::new();
            values.insert("a".to_owned(), a);
            values.insert("b".to_owned(), b);
            Record::new(
                Utc.with_ymd_and_hms(2020, 1, day, 0, 0, 0).single().expect("valid date"),
                values,
            )
        };
        let records = vec![record(1, 1.0, 2.0), record(2, 3.0, 5.0)];
        let columns = vec!["a".to_owned(), "b".to_owned()];

        let scales =
            ScaleEngine::compute(&records, &columns, Dimension::new(400.0, 300.0)).expect("scales");
        assert_eq!(scales.y.domain(), (0.0, 5.5));
        assert_eq!(scales.x.range(), (0.0, 400.0));
        assert_eq!(scales.color.domain(), columns.as_slice());
    }

    #[test]
    fn empty_records_are_rejected() {
        let result = ScaleEngine::compute(&[], &["a".to_owned()], Dimension::new(10.0, 10.0));
        assert!(matches!(result, Err(ChartError::EmptyDataset)));
    }
}
