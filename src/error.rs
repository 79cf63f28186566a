use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    /// A raw record's date or value field could not be parsed or coerced.
    #[error("invalid data format in record {record}, field `{field}`: {message}")]
    DataFormat {
        record: usize,
        field: String,
        message: String,
    },

    #[error("dataset is empty: at least one record is required")]
    EmptyDataset,

    #[error("invalid chart configuration: {0}")]
    Configuration(String),

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: i64, height: i64 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl ChartError {
    pub(crate) fn data_format(
        record: usize,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DataFormat {
            record,
            field: field.into(),
            message: message.into(),
        }
    }
}
