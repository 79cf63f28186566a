use serde::{Deserialize, Serialize};

use crate::core::{DateFormat, LayoutPolicy, NumberFormat, ValueModifier};
use crate::error::{ChartError, ChartResult};
use crate::render::Interpolation;

/// Where the data-acquisition collaborator should fetch records from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// `http://` or `https://` locator.
    Remote,
    /// Local path ending in `.json`.
    Json,
    /// Any other local path.
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateConfig {
    pub column: String,
    #[serde(default = "default_parse_format")]
    pub parse_format: String,
    #[serde(default = "default_display_format")]
    pub display_format: String,
}

impl DateConfig {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            parse_format: default_parse_format(),
            display_format: default_display_format(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesConfig {
    pub columns: Vec<String>,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub interpolate: Interpolation,
    /// Runtime-only numeric transform; see [`ChartConfig::with_value_modifier`].
    #[serde(skip)]
    pub modify: Option<ValueModifier>,
}

impl ValuesConfig {
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            format: String::new(),
            interpolate: Interpolation::default(),
            modify: None,
        }
    }
}

/// Chart description in the camelCase JSON shape hosts already use:
///
/// ```json
/// {
///   "data": "data/co2.csv",
///   "date": { "column": "date", "parseFormat": "%Y-%m-%d", "displayFormat": "%b %Y" },
///   "values": { "columns": ["CO2"], "format": ",.1f", "interpolate": "monotone" },
///   "hover": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    /// Opaque locator handed to the data-acquisition collaborator.
    #[serde(default)]
    pub data: String,
    pub date: DateConfig,
    pub values: ValuesConfig,
    #[serde(default = "default_hover")]
    pub hover: bool,
    #[serde(default)]
    pub layout: LayoutPolicy,
}

fn default_parse_format() -> String {
    "%Y-%m-%d".to_owned()
}

fn default_display_format() -> String {
    "%b %d, %Y".to_owned()
}

fn default_hover() -> bool {
    true
}

impl ChartConfig {
    #[must_use]
    pub fn new(date_column: impl Into<String>, value_columns: Vec<String>) -> Self {
        Self {
            data: String::new(),
            date: DateConfig::new(date_column),
            values: ValuesConfig::new(value_columns),
            hover: default_hover(),
            layout: LayoutPolicy::default(),
        }
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::Configuration(format!("failed to parse chart config: {e}")))
    }

    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    #[must_use]
    pub fn with_parse_format(mut self, pattern: impl Into<String>) -> Self {
        self.date.parse_format = pattern.into();
        self
    }

    #[must_use]
    pub fn with_display_format(mut self, pattern: impl Into<String>) -> Self {
        self.date.display_format = pattern.into();
        self
    }

    #[must_use]
    pub fn with_value_format(mut self, specifier: impl Into<String>) -> Self {
        self.values.format = specifier.into();
        self
    }

    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.values.interpolate = interpolation;
        self
    }

    /// Installs a transform applied to every value after numeric coercion.
    #[must_use]
    pub fn with_value_modifier(
        mut self,
        modify: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.values.modify = Some(ValueModifier::new(modify));
        self
    }

    #[must_use]
    pub fn with_hover(mut self, hover: bool) -> Self {
        self.hover = hover;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutPolicy) -> Self {
        self.layout = layout;
        self
    }

    /// Classifies the data locator the way the acquisition collaborator
    /// dispatches on it.
    pub fn data_source_kind(&self) -> ChartResult<DataSourceKind> {
        let locator = self.data.trim();
        if locator.is_empty() {
            return Err(ChartError::Configuration(
                "no data locator configured".to_owned(),
            ));
        }
        let lower = locator.to_ascii_lowercase();
        Ok(if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSourceKind::Remote
        } else if lower.ends_with(".json") {
            DataSourceKind::Json
        } else {
            DataSourceKind::Csv
        })
    }

    /// Checks and compiles the parts of the config the engine needs.
    pub(crate) fn compile(&self) -> ChartResult<CompiledConfig> {
        if self.values.columns.is_empty() {
            return Err(ChartError::Configuration(
                "at least one value column is required".to_owned(),
            ));
        }
        if self.date.column.trim().is_empty() {
            return Err(ChartError::Configuration(
                "date column must not be empty".to_owned(),
            ));
        }
        self.layout.validate()?;

        Ok(CompiledConfig {
            parse_format: DateFormat::new(self.date.parse_format.clone())?,
            display_format: DateFormat::new(self.date.display_format.clone())?,
            value_format: NumberFormat::parse(&self.values.format)?,
        })
    }
}

/// Validated formats derived from a [`ChartConfig`].
#[derive(Debug, Clone)]
pub(crate) struct CompiledConfig {
    pub parse_format: DateFormat,
    pub display_format: DateFormat,
    pub value_format: NumberFormat,
}
