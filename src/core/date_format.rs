use chrono::format::{self, Item, ParseResult, Parsed, StrftimeItems};
use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::error::{ChartError, ChartResult};

/// Validated strftime-style pattern (`%Y-%m-%d`, `%d/%m/%Y %H:%M`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
}

impl DateFormat {
    pub fn new(pattern: impl Into<String>) -> ChartResult<Self> {
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return Err(ChartError::Configuration(
                "date pattern must not be empty".to_owned(),
            ));
        }
        if StrftimeItems::new(&pattern).any(|item| item == Item::Error) {
            return Err(ChartError::Configuration(format!(
                "invalid date pattern `{pattern}`"
            )));
        }
        Ok(Self { pattern })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn format(&self, time: DateTime<Utc>) -> String {
        time.format(&self.pattern).to_string()
    }

    /// Parses `text` as a UTC instant.
    ///
    /// Patterns with an offset are converted to UTC, others are read as UTC.
    /// Fields the pattern leaves out default to January 1st 1900 at midnight,
    /// so `%Y` reads `2015` as the start of that year.
    pub fn parse(&self, text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, text.trim(), StrftimeItems::new(&self.pattern))?;
        fill_missing_fields(&mut parsed)?;
        match parsed.offset() {
            Some(_) => parsed.to_datetime().map(|time| time.with_timezone(&Utc)),
            None => parsed
                .to_naive_datetime_with_offset(0)
                .map(|time| time.and_utc()),
        }
    }
}

fn fill_missing_fields(parsed: &mut Parsed) -> ParseResult<()> {
    if parsed.timestamp().is_some() {
        return Ok(());
    }

    let has_year = parsed.year().is_some()
        || parsed.year_div_100().is_some()
        || parsed.year_mod_100().is_some()
        || parsed.isoyear().is_some()
        || parsed.isoyear_mod_100().is_some();
    if !has_year {
        parsed.set_year(1900)?;
    }

    // Ordinal and week numbers pin the day on their own.
    let day_in_year = parsed.ordinal().is_some()
        || parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some()
        || parsed.isoweek().is_some();
    if !day_in_year {
        if parsed.month().is_none() {
            parsed.set_month(1)?;
        }
        if parsed.day().is_none() {
            parsed.set_day(1)?;
        }
    }

    if parsed.hour_mod_12().is_none() {
        parsed.set_hour12(12)?;
    }
    if parsed.hour_div_12().is_none() {
        parsed.set_ampm(false)?;
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    Ok(())
}

/// Tick label that shows only the most significant non-zero component:
/// milliseconds, seconds, minutes, hours, weekday, day, month, then year.
#[must_use]
pub fn multi_scale_label(time: DateTime<Utc>) -> String {
    let pattern = if time.timestamp_subsec_millis() != 0 {
        ".%3f"
    } else if time.second() != 0 {
        ":%S"
    } else if time.minute() != 0 {
        "%I:%M"
    } else if time.hour() != 0 {
        "%I %p"
    } else if time.weekday().num_days_from_sunday() != 0 && time.day() != 1 {
        "%a %d"
    } else if time.day() != 1 {
        "%b %d"
    } else if time.month() != 1 {
        "%B"
    } else {
        "%Y"
    };
    time.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{DateFormat, multi_scale_label};

    #[test]
    fn date_only_patterns_parse_to_midnight_utc() {
        let format = DateFormat::new("%Y-%m-%d").expect("pattern");
        let expected = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).single().expect("valid date");
        assert_eq!(format.parse("2020-01-02"), Ok(expected));
        assert!(format.parse("2020-13-02").is_err());
        assert!(format.parse("").is_err());
    }

    #[test]
    fn missing_fields_fill_with_period_start() {
        let at = |y, m, d, h| {
            Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
                .single()
                .expect("valid date")
        };
        let parse = |pattern: &str, text: &str| {
            DateFormat::new(pattern).expect("pattern").parse(text)
        };
        assert_eq!(parse("%Y", "2015"), Ok(at(2015, 1, 1, 0)));
        assert_eq!(parse("%m/%Y", "07/1999"), Ok(at(1999, 7, 1, 0)));
        assert_eq!(parse("%Y-%m-%d %I %p", "2020-01-02 03 PM"), Ok(at(2020, 1, 2, 15)));
        assert_eq!(parse("%Y-%m-%d %H", "2020-01-02 07"), Ok(at(2020, 1, 2, 7)));
        assert!(parse("%Y-%m", "2015").is_err());
        assert!(parse("%Y", "2015-03").is_err());
    }

    #[test]
    fn offsets_are_converted_to_utc() {
        let format = DateFormat::new("%Y-%m-%dT%H:%M:%S%z").expect("pattern");
        let expected = Utc.with_ymd_and_hms(2020, 1, 1, 22, 0, 0).single().expect("valid date");
        assert_eq!(format.parse("2020-01-02T00:00:00+0200"), Ok(expected));
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        assert!(DateFormat::new("%Q").is_err());
        assert!(DateFormat::new("  ").is_err());
    }

    #[test]
    fn multi_scale_labels_pick_most_significant_component() {
        let at = |y, m, d, h, min| {
            Utc.with_ymd_and_hms(y, m, d, h, min, 0)
                .single()
                .expect("valid date")
        };
        assert_eq!(multi_scale_label(at(2020, 1, 1, 0, 0)), "2020");
        assert_eq!(multi_scale_label(at(2020, 3, 1, 0, 0)), "March");
        // 2020-03-08 is a Sunday.
        assert_eq!(multi_scale_label(at(2020, 3, 8, 0, 0)), "Mar 08");
        assert_eq!(multi_scale_label(at(2020, 3, 9, 0, 0)), "Mon 09");
        assert_eq!(multi_scale_label(at(2020, 3, 9, 15, 0)), "03 PM");
        assert_eq!(multi_scale_label(at(2020, 3, 9, 15, 30)), "03:30");
    }
}
