use std::borrow::Borrow;
use std::fmt;

/// Stable identifier of one scene element.
///
/// Ids are deterministic so repeated draws update the same element and
/// hosts can target series elements from external stylesheets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the stroked path for a series, e.g. `line-CO2`.
    #[must_use]
    pub fn series_line(series_name: &str) -> Self {
        Self(format!("line-{}", series_slug(series_name)))
    }

    /// Id prefix of the hover focus group of a series, e.g. `focus-group--CO2`.
    #[must_use]
    pub fn focus_group(series_name: &str) -> Self {
        Self(format!("focus-group--{}", series_slug(series_name)))
    }

    #[must_use]
    pub fn legend_item(series_name: &str) -> Self {
        Self(format!("legend-item--{}", series_slug(series_name)))
    }

    /// Derives a child id, e.g. `focus-group--a` → `focus-group--a/dot`.
    #[must_use]
    pub fn child(&self, part: impl fmt::Display) -> Self {
        Self(format!("{}/{part}", self.0))
    }

    /// The id's top-level group, i.e. everything before the first `/`.
    #[must_use]
    pub fn group(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Strips every non-word character (anything but ASCII alphanumerics and
/// `_`) from a series name.
#[must_use]
pub fn series_slug(series_name: &str) -> String {
    series_name
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect()
}
