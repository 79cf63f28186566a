use crate::core::{LinearScale, Record};
use crate::error::{ChartError, ChartResult};

/// Headroom added above the largest value before nicing.
pub const Y_AXIS_PADDING: f64 = 0.02;

/// Tick count the upper bound is niced against, independent of how many
/// ticks the axis finally draws.
const NICE_REFERENCE_TICKS: usize = 10;

/// Upper bound used when no value is positive.
const FALLBACK_UPPER_BOUND: f64 = 1.0;

/// Value axis: `[0, nice(max * (1 + padding))]` mapped onto `[height, 0]` so
/// larger values draw higher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    linear: LinearScale,
    data_max: f64,
}

impl ValueScale {
    /// Fits the scale to the largest value of the given columns over all
    /// records.
    pub fn from_records(records: &[Record], columns: &[String], height: f64) -> ChartResult<Self> {
        if records.is_empty() {
            return Err(ChartError::EmptyDataset);
        }
        let data_max = records
            .iter()
            .flat_map(|record| columns.iter().filter_map(|column| record.value(column)))
            .fold(f64::NEG_INFINITY, f64::max);
        Self::from_max(data_max, height)
    }

    /// Fits the scale to a known maximum. The upper bound always lies above
    /// a positive `data_max`, except at `f64::MAX` where it saturates.
    pub fn from_max(data_max: f64, height: f64) -> ChartResult<Self> {
        if !data_max.is_finite() {
            return Err(ChartError::InvalidData(
                "value scale needs at least one finite value".to_owned(),
            ));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(ChartError::InvalidData(
                "value scale height must be finite and > 0".to_owned(),
            ));
        }

        let padded = data_max + data_max * Y_AXIS_PADDING;
        let upper = if padded > 0.0 {
            padded.min(f64::MAX)
        } else {
            FALLBACK_UPPER_BOUND
        };
        let linear = LinearScale::new((0.0, upper), (height, 0.0))?;
        // Nicing overflows near f64::MAX and loses its step for subnormals.
        let mut linear = linear.nice(NICE_REFERENCE_TICKS).unwrap_or(linear);
        if linear.domain().1 <= data_max {
            linear = LinearScale::new((0.0, next_up(data_max)), (height, 0.0))?;
        }
        Ok(Self { linear, data_max })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.linear.domain()
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.linear.range()
    }

    /// Largest raw value the scale was fitted to.
    #[must_use]
    pub fn data_max(self) -> f64 {
        self.data_max
    }

    #[must_use]
    pub fn value_to_pixel(self, value: f64) -> f64 {
        self.linear.apply(value)
    }

    #[must_use]
    pub fn pixel_to_value(self, pixel: f64) -> f64 {
        self.linear.invert(pixel)
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        self.linear.ticks(count)
    }
}

/// Next representable value above a non-negative finite `value`.
fn next_up(value: f64) -> f64 {
    if value >= f64::MAX {
        f64::MAX
    } else {
        f64::from_bits(value.to_bits() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::ValueScale;

    #[test]
    fn upper_bound_is_padded_and_niced() {
        let scale = ValueScale::from_max(5.0, 300.0).expect("scale");
        assert_eq!(scale.domain(), (0.0, 5.5));
        assert_eq!(scale.range(), (300.0, 0.0));
        assert!((scale.value_to_pixel(5.5)).abs() < 1e-9);
    }

    #[test]
    fn padding_pushes_round_maxima_to_the_next_step() {
        let scale = ValueScale::from_max(100.0, 300.0).expect("scale");
        assert_eq!(scale.domain(), (0.0, 110.0));
    }

    #[test]
    fn non_positive_maxima_fall_back_to_unit_domain() {
        let scale = ValueScale::from_max(0.0, 300.0).expect("scale");
        assert_eq!(scale.domain(), (0.0, 1.0));
        let scale = ValueScale::from_max(-4.0, 300.0).expect("scale");
        assert!(scale.domain().1 > -4.0);
    }

    #[test]
    fn maxima_near_the_float_limit_stay_finite() {
        let scale = ValueScale::from_max(1.78e308, 300.0).expect("scale");
        assert_eq!(scale.domain(), (0.0, f64::MAX));
        assert!(scale.value_to_pixel(1.78e308) > 0.0);

        let scale = ValueScale::from_max(f64::MAX, 300.0).expect("scale");
        assert_eq!(scale.domain(), (0.0, f64::MAX));
    }

    #[test]
    fn subnormal_maxima_get_a_larger_upper_bound() {
        let tiny = 5e-324;
        let scale = ValueScale::from_max(tiny, 300.0).expect("scale");
        assert!(scale.domain().1 > tiny);
        assert!(ValueScale::from_max(f64::NAN, 300.0).is_err());
    }
}
