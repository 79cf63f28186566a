use crate::error::{ChartError, ChartResult};

/// Continuous linear mapping from a domain interval onto a pixel range.
///
/// The range may be inverted (`range_start > range_end`), which is how the
/// value axis grows upwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        let (domain_start, domain_end) = domain;
        let (range_start, range_end) = range;
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    /// Maps a range value back into the domain. A degenerate range maps
    /// everything to the domain start.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let range_span = self.range_end - self.range_start;
        if range_span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / range_span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Extends the domain outward to multiples of the tick step chosen for
    /// `count` ticks.
    pub fn nice(self, count: usize) -> ChartResult<Self> {
        let step = tick_step(self.domain_start, self.domain_end, count);
        if !step.is_finite() || step <= 0.0 {
            return Ok(self);
        }
        let (lo, hi) = ordered(self.domain_start, self.domain_end);
        let (nice_lo, nice_hi) = (
            step_multiple((lo / step).floor() as i64, step),
            step_multiple((hi / step).ceil() as i64, step),
        );
        let domain = if self.domain_start <= self.domain_end {
            (nice_lo, nice_hi)
        } else {
            (nice_hi, nice_lo)
        };
        Self::new(domain, self.range())
    }

    /// Round tick values covering the domain, roughly `count` of them.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        linear_ticks(self.domain_start, self.domain_end, count)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Tick spacing of 1, 2 or 5 times a power of ten giving close to `count`
/// intervals over `[start, end]`.
#[must_use]
pub fn tick_step(start: f64, end: f64, count: usize) -> f64 {
    let (lo, hi) = ordered(start, end);
    let span = hi - lo;
    let count = count.max(1) as f64;
    if !span.is_finite() || span <= 0.0 {
        return f64::NAN;
    }

    let mut step = 10f64.powi((span / count).log10().floor() as i32);
    let error = count / span * step;
    if error <= 0.15 {
        step *= 10.0;
    } else if error <= 0.35 {
        step *= 5.0;
    } else if error <= 0.75 {
        step *= 2.0;
    }
    step
}

/// Multiples of `tick_step` inside `[start, end]`, ascending.
#[must_use]
pub fn linear_ticks(start: f64, end: f64, count: usize) -> Vec<f64> {
    let step = tick_step(start, end, count);
    if !step.is_finite() || step <= 0.0 {
        return Vec::new();
    }
    let (lo, hi) = ordered(start, end);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    if last < first {
        return Vec::new();
    }

    (first..=last).map(|index| step_multiple(index, step)).collect()
}

/// `index * step`, computed by dividing through the inverse step for decimal
/// steps so values stay drift-free (3 * 0.1 != 0.3, but 3 / 10 == 0.3).
fn step_multiple(index: i64, step: f64) -> f64 {
    let inverse = (1.0 / step).round();
    if step < 1.0 && inverse > 0.0 {
        index as f64 / inverse
    } else {
        index as f64 * step
    }
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, linear_ticks, tick_step};

    #[test]
    fn tick_step_picks_one_two_five_multiples() {
        assert_eq!(tick_step(0.0, 5.1, 10), 0.5);
        assert_eq!(tick_step(0.0, 100.0, 10), 10.0);
        assert_eq!(tick_step(0.0, 100.0, 5), 20.0);
        assert!(tick_step(3.0, 3.0, 10).is_nan());
    }

    #[test]
    fn ticks_are_clean_decimals() {
        assert_eq!(
            linear_ticks(0.0, 1.0, 10),
            vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
        );
    }

    #[test]
    fn nice_rounds_domain_outward() {
        let scale = LinearScale::new((0.0, 5.1), (300.0, 0.0)).expect("valid scale");
        let niced = scale.nice(10).expect("nice");
        assert_eq!(niced.domain(), (0.0, 5.5));
        assert_eq!(niced.range(), (300.0, 0.0));
    }

    #[test]
    fn invert_round_trips_through_inverted_range() {
        let scale = LinearScale::new((0.0, 10.0), (200.0, 0.0)).expect("valid scale");
        let px = scale.apply(2.5);
        assert!((px - 150.0).abs() < 1e-9);
        assert!((scale.invert(px) - 2.5).abs() < 1e-9);
    }
}
