use std::fmt;
use std::str::FromStr;

use num_format::{Locale, ToFormattedString};

use crate::error::{ChartError, ChartResult};

/// Default precision of fixed, percent, exponent and SI formats.
const DEFAULT_PRECISION: usize = 6;

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignPolicy {
    /// Minus for negatives only.
    Negative,
    /// Plus for positives, minus for negatives.
    Always,
    /// Space for positives, minus for negatives.
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatKind {
    /// Shortest round-trip representation, or `precision` significant digits.
    General,
    Fixed,
    Integer,
    Percent,
    Exponent,
    SiPrefix,
}

/// Compact numeric format specifier in the style of d3-format:
/// `[sign][$][0][width][,][.precision][~][type]`, e.g. `,.0f`, `$.2f`,
/// `.1%`, `.3s`, `+.2e`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    specifier: String,
    sign: SignPolicy,
    currency: bool,
    zero_pad: bool,
    width: Option<usize>,
    grouping: bool,
    precision: Option<usize>,
    trim: bool,
    kind: FormatKind,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            specifier: String::new(),
            sign: SignPolicy::Negative,
            currency: false,
            zero_pad: false,
            width: None,
            grouping: false,
            precision: None,
            trim: false,
            kind: FormatKind::General,
        }
    }
}

impl FromStr for NumberFormat {
    type Err = ChartError;

    fn from_str(specifier: &str) -> ChartResult<Self> {
        let invalid = |reason: &str| {
            ChartError::Configuration(format!("number format `{specifier}`: {reason}"))
        };
        let mut format = Self {
            specifier: specifier.to_owned(),
            ..Self::default()
        };
        let mut chars = specifier.chars().peekable();

        match chars.peek() {
            Some('-') => {
                chars.next();
            }
            Some('+') => {
                format.sign = SignPolicy::Always;
                chars.next();
            }
            Some(' ') => {
                format.sign = SignPolicy::Space;
                chars.next();
            }
            _ => {}
        }
        if chars.next_if_eq(&'$').is_some() {
            format.currency = true;
        }
        if chars.next_if_eq(&'0').is_some() {
            format.zero_pad = true;
        }

        let mut width = String::new();
        while let Some(digit) = chars.next_if(char::is_ascii_digit) {
            width.push(digit);
        }
        if !width.is_empty() {
            format.width = Some(width.parse().map_err(|_| invalid("width out of range"))?);
        }
        if chars.next_if_eq(&',').is_some() {
            format.grouping = true;
        }
        if chars.next_if_eq(&'.').is_some() {
            let mut precision = String::new();
            while let Some(digit) = chars.next_if(char::is_ascii_digit) {
                precision.push(digit);
            }
            if precision.is_empty() {
                return Err(invalid("`.` must be followed by a precision"));
            }
            format.precision = Some(
                precision
                    .parse()
                    .map_err(|_| invalid("precision out of range"))?,
            );
        }
        if chars.next_if_eq(&'~').is_some() {
            format.trim = true;
        }

        format.kind = match chars.next() {
            None => FormatKind::General,
            Some('f') => FormatKind::Fixed,
            Some('d') => FormatKind::Integer,
            Some('%') => FormatKind::Percent,
            Some('e') => FormatKind::Exponent,
            Some('s') => FormatKind::SiPrefix,
            Some('g') => FormatKind::General,
            Some(other) => return Err(invalid(&format!("unsupported type `{other}`"))),
        };
        if chars.next().is_some() {
            return Err(invalid("unexpected trailing characters"));
        }
        Ok(format)
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.specifier)
    }
}

impl NumberFormat {
    pub fn parse(specifier: &str) -> ChartResult<Self> {
        specifier.parse()
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let negative = value < 0.0;
        let magnitude = value.abs();
        let (mut body, suffix) = match self.kind {
            FormatKind::General => (self.general(magnitude), ""),
            FormatKind::Fixed => (
                format!("{:.*}", self.precision.unwrap_or(DEFAULT_PRECISION), magnitude),
                "",
            ),
            FormatKind::Integer => (format!("{:.0}", magnitude), ""),
            FormatKind::Percent => (
                format!(
                    "{:.*}",
                    self.precision.unwrap_or(DEFAULT_PRECISION),
                    magnitude * 100.0
                ),
                "%",
            ),
            FormatKind::Exponent => (self.exponent(magnitude), ""),
            FormatKind::SiPrefix => {
                let (scaled, prefix) = si_scale(magnitude);
                let digits = self.precision.unwrap_or(DEFAULT_PRECISION).max(1);
                (to_significant(scaled, digits), prefix)
            }
        };

        if self.trim {
            body = trim_fraction(&body);
        }
        // Values that round to zero never carry a minus sign.
        let negative = negative && body.chars().any(|ch| ch.is_ascii_digit() && ch != '0');
        let sign = match (negative, self.sign) {
            (true, _) => "-",
            (false, SignPolicy::Always) => "+",
            (false, SignPolicy::Space) => " ",
            (false, SignPolicy::Negative) => "",
        };
        let currency = if self.currency { "$" } else { "" };

        let (integer, fraction) = match body.find(['.', 'e']) {
            Some(split) => body.split_at(split),
            None => (body.as_str(), ""),
        };
        // Integer parts past u128 (only reachable near f64::MAX) stay ungrouped.
        let mut integer = match integer.parse::<u128>() {
            Ok(whole) if self.grouping => whole.to_formatted_string(&Locale::en),
            _ => integer.to_owned(),
        };
        let fixed_len = sign.len() + currency.len() + fraction.len() + suffix.len();
        if let (true, Some(width)) = (self.zero_pad, self.width) {
            while integer.len() + fixed_len < width {
                integer.insert(0, '0');
            }
        }

        let rendered = format!("{sign}{currency}{integer}{fraction}{suffix}");
        match self.width {
            Some(width) if !self.zero_pad && rendered.chars().count() < width => {
                format!("{rendered:>width$}")
            }
            _ => rendered,
        }
    }

    fn general(&self, magnitude: f64) -> String {
        match self.precision {
            Some(digits) => to_significant(magnitude, digits.max(1)),
            None => format!("{magnitude}"),
        }
    }

    fn exponent(&self, magnitude: f64) -> String {
        let raw = format!("{:.*e}", self.precision.unwrap_or(DEFAULT_PRECISION), magnitude);
        match raw.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => raw,
        }
    }
}

/// Scales into `[1, 1000)` and returns the matching SI prefix.
fn si_scale(magnitude: f64) -> (f64, &'static str) {
    if magnitude == 0.0 {
        return (0.0, "");
    }
    let exponent = ((magnitude.log10() / 3.0).floor() as i32).clamp(-8, 8);
    let scaled = magnitude / 10f64.powi(exponent * 3);
    (scaled, SI_PREFIXES[(exponent + 8) as usize])
}

/// Fixed-point rendering with `digits` significant digits.
fn to_significant(magnitude: f64, digits: usize) -> String {
    if magnitude == 0.0 {
        return format!("{:.*}", digits.saturating_sub(1), 0.0);
    }
    let leading = magnitude.log10().floor() as i64;
    let decimals = digits as i64 - 1 - leading;
    if decimals >= 0 {
        format!("{:.*}", decimals as usize, magnitude)
    } else {
        let unit = 10f64.powi((-decimals) as i32);
        format!("{:.0}", (magnitude / unit).round() * unit)
    }
}

fn trim_fraction(body: &str) -> String {
    let (number, exponent) = match body.find('e') {
        Some(split) => body.split_at(split),
        None => (body, ""),
    };
    if !number.contains('.') {
        return body.to_owned();
    }
    let trimmed = number.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}{exponent}")
}
