use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::core::date_format::DateFormat;
use crate::core::{ColorScale, Record, Series, SeriesPoint};
use crate::error::{ChartError, ChartResult};

/// One untyped input row as delivered by the data-acquisition collaborator.
pub type RawRecord = serde_json::Map<String, Value>;

/// Numeric transform applied to every coerced value, e.g. a unit conversion.
#[derive(Clone)]
pub struct ValueModifier(Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl ValueModifier {
    pub fn new(modify: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(modify))
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        (self.0)(value)
    }
}

impl fmt::Debug for ValueModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueModifier(..)")
    }
}

/// Typed records sorted by timestamp plus one series per configured column.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedData {
    pub records: Vec<Record>,
    pub series: Vec<Series>,
}

impl MappedData {
    #[must_use]
    pub fn series_names(&self) -> Vec<String> {
        self.series.iter().map(|series| series.name.clone()).collect()
    }
}

/// Turns raw rows into [`Record`]s and per-series point sequences.
#[derive(Debug, Clone)]
pub struct DataMapper {
    date_column: String,
    date_format: DateFormat,
    columns: Vec<String>,
    modifier: Option<ValueModifier>,
}

impl DataMapper {
    pub fn new(
        date_column: impl Into<String>,
        date_format: DateFormat,
        columns: Vec<String>,
    ) -> ChartResult<Self> {
        let date_column = date_column.into();
        if date_column.is_empty() {
            return Err(ChartError::Configuration(
                "date column must not be empty".to_owned(),
            ));
        }
        if columns.is_empty() {
            return Err(ChartError::Configuration(
                "at least one value column is required".to_owned(),
            ));
        }
        for (index, column) in columns.iter().enumerate() {
            if columns[..index].contains(column) {
                return Err(ChartError::Configuration(format!(
                    "value column `{column}` is configured twice"
                )));
            }
        }

        Ok(Self {
            date_column,
            date_format,
            columns,
            modifier: None,
        })
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: Option<ValueModifier>) -> Self {
        self.modifier = modifier;
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn map(&self, raw: &[RawRecord]) -> ChartResult<MappedData> {
        if raw.is_empty() {
            return Err(ChartError::EmptyDataset);
        }

        let mut records = raw
            .iter()
            .enumerate()
            .map(|(index, row)| self.map_record(index, row))
            .collect::<ChartResult<Vec<_>>>()?;
        // Stable: equal timestamps keep input order.
        records.sort_by_key(|record| record.timestamp);

        let series = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, name)| Series {
                name: name.clone(),
                color: ColorScale::color_at(index),
                points: records
                    .iter()
                    .map(|record| SeriesPoint {
                        timestamp: record.timestamp,
                        value: record.values[index],
                    })
                    .collect(),
            })
            .collect();

        debug!(
            record_count = records.len(),
            series_count = self.columns.len(),
            "mapped raw records"
        );
        Ok(MappedData { records, series })
    }

    fn map_record(&self, index: usize, row: &RawRecord) -> ChartResult<Record> {
        let timestamp = self.parse_timestamp(index, row)?;
        let mut values = IndexMap::with_capacity(self.columns.len());
        for column in &self.columns {
            let raw_value = row.get(column).ok_or_else(|| {
                ChartError::Configuration(format!(
                    "record {index} has no value column `{column}`"
                ))
            })?;
            let mut value = coerce_number(raw_value)
                .map_err(|message| ChartError::data_format(index, column, message))?;
            if let Some(modifier) = &self.modifier {
                value = modifier.apply(value);
                if !value.is_finite() {
                    return Err(ChartError::data_format(
                        index,
                        column,
                        "value modifier produced a non-finite value",
                    ));
                }
            }
            values.insert(column.clone(), value);
        }
        Ok(Record::new(timestamp, values))
    }

    fn parse_timestamp(&self, index: usize, row: &RawRecord) -> ChartResult<DateTime<Utc>> {
        let raw = row.get(&self.date_column).ok_or_else(|| {
            ChartError::Configuration(format!(
                "record {index} has no date column `{}`",
                self.date_column
            ))
        })?;
        let text = match raw {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            other => {
                return Err(ChartError::data_format(
                    index,
                    &self.date_column,
                    format!("expected a date string, got {}", json_kind(other)),
                ));
            }
        };
        self.date_format.parse(&text).map_err(|err| {
            ChartError::data_format(
                index,
                &self.date_column,
                format!(
                    "`{text}` does not match `{}`: {err}",
                    self.date_format.pattern()
                ),
            )
        })
    }
}

/// Strict numeric coercion: JSON numbers, or strings holding a finite number.
fn coerce_number(value: &Value) -> Result<f64, String> {
    let number = match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| format!("number `{number}` is out of range"))?,
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err("empty value".to_owned());
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| format!("`{text}` is not a number"))?
        }
        other => return Err(format!("expected a number, got {}", json_kind(other))),
    };
    if number.is_finite() {
        Ok(number)
    } else {
        Err(format!("`{number}` is not a finite number"))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Extracts raw rows from a payload shaped either `[{..}, ..]` or
/// `{"data": [{..}, ..]}`.
pub fn records_from_json(payload: Value) -> ChartResult<Vec<RawRecord>> {
    let rows = match payload {
        Value::Array(rows) => rows,
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(ChartError::data_format(
                    0,
                    "data",
                    "payload object must carry a `data` array",
                ));
            }
        },
        other => {
            return Err(ChartError::data_format(
                0,
                "data",
                format!("payload must be an array or object, got {}", json_kind(&other)),
            ));
        }
    };

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| match row {
            Value::Object(object) => Ok(object),
            other => Err(ChartError::data_format(
                index,
                "record",
                format!("expected an object, got {}", json_kind(&other)),
            )),
        })
        .collect()
}
