use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
};

use crate::core::primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
use crate::core::scale::{linear_ticks, tick_step};

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = 60.0 * SECOND_MS;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;
const WEEK_MS: f64 = 7.0 * DAY_MS;
const MONTH_MS: f64 = 30.0 * DAY_MS;
const YEAR_MS: f64 = 365.0 * DAY_MS;

/// Upper bound on generated ticks; guards against runaway calendar walks.
const MAX_TICKS: usize = 10_000;

/// Calendar unit a time tick is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    /// Weeks start on Sunday.
    Week,
    Month,
    Year,
}

/// A calendar interval such as "every 15 minutes" or "every 3 months".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub unit: TimeUnit,
    pub step: u32,
}

/// Candidate intervals with their nominal duration, shortest first.
const CANDIDATES: [(TimeUnit, u32, f64); 17] = [
    (TimeUnit::Second, 1, SECOND_MS),
    (TimeUnit::Second, 5, 5.0 * SECOND_MS),
    (TimeUnit::Second, 15, 15.0 * SECOND_MS),
    (TimeUnit::Second, 30, 30.0 * SECOND_MS),
    (TimeUnit::Minute, 1, MINUTE_MS),
    (TimeUnit::Minute, 5, 5.0 * MINUTE_MS),
    (TimeUnit::Minute, 15, 15.0 * MINUTE_MS),
    (TimeUnit::Minute, 30, 30.0 * MINUTE_MS),
    (TimeUnit::Hour, 1, HOUR_MS),
    (TimeUnit::Hour, 3, 3.0 * HOUR_MS),
    (TimeUnit::Hour, 6, 6.0 * HOUR_MS),
    (TimeUnit::Hour, 12, 12.0 * HOUR_MS),
    (TimeUnit::Day, 1, DAY_MS),
    (TimeUnit::Day, 2, 2.0 * DAY_MS),
    (TimeUnit::Week, 1, WEEK_MS),
    (TimeUnit::Month, 1, MONTH_MS),
    (TimeUnit::Month, 3, 3.0 * MONTH_MS),
];

/// Tick strategy resolved for a time span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeTickPlan {
    /// Span shorter than one second per tick: plain linear millisecond ticks.
    Milliseconds,
    Calendar(TimeInterval),
}

impl TimeTickPlan {
    /// Picks the interval whose nominal duration is closest (by ratio) to
    /// `span / count`.
    #[must_use]
    pub fn for_span(start_ms: f64, end_ms: f64, count: usize) -> Self {
        let span = (end_ms - start_ms).abs();
        let target = span / count.max(1) as f64;
        let index = CANDIDATES.partition_point(|&(_, _, duration)| duration <= target);

        if index == 0 {
            return Self::Milliseconds;
        }
        if index == CANDIDATES.len() {
            let years = tick_step(start_ms / YEAR_MS, end_ms / YEAR_MS, count);
            let step = if years.is_finite() {
                years.round().max(1.0) as u32
            } else {
                1
            };
            return Self::Calendar(TimeInterval {
                unit: TimeUnit::Year,
                step,
            });
        }

        let (lower_unit, lower_step, lower) = CANDIDATES[index - 1];
        let (upper_unit, upper_step, upper) = CANDIDATES[index];
        let (unit, step) = if target / lower < upper / target {
            (lower_unit, lower_step)
        } else {
            (upper_unit, upper_step)
        };
        Self::Calendar(TimeInterval { unit, step })
    }
}

/// Calendar-aligned ticks inside `[start, end]`, roughly `count` of them.
#[must_use]
pub fn time_ticks(start: DateTime<Utc>, end: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let (start_ms, end_ms) = (datetime_to_unix_millis(start), datetime_to_unix_millis(end));

    match TimeTickPlan::for_span(start_ms, end_ms, count) {
        TimeTickPlan::Milliseconds => linear_ticks(start_ms, end_ms, count)
            .into_iter()
            .filter_map(unix_millis_to_datetime)
            .collect(),
        TimeTickPlan::Calendar(interval) => interval.range(start, end),
    }
}

impl TimeInterval {
    /// Aligned instants `t` with `start <= t <= end` whose unit number is a
    /// multiple of `step` (e.g. months 0, 3, 6, 9 for quarterly ticks).
    #[must_use]
    pub fn range(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let end = end.naive_utc();
        let mut ticks = Vec::new();
        let Some(mut cursor) = self.ceil(start.naive_utc()) else {
            return ticks;
        };

        while cursor <= end && ticks.len() < MAX_TICKS {
            if self.step <= 1 || self.unit_number(cursor) % i64::from(self.step) == 0 {
                ticks.push(cursor.and_utc());
            }
            match self.offset(cursor) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        ticks
    }

    fn floor(self, time: NaiveDateTime) -> Option<NaiveDateTime> {
        let date = time.date();
        match self.unit {
            TimeUnit::Second => time.with_nanosecond(0),
            TimeUnit::Minute => time.with_nanosecond(0)?.with_second(0),
            TimeUnit::Hour => time.with_nanosecond(0)?.with_second(0)?.with_minute(0),
            TimeUnit::Day => Some(date.and_time(NaiveTime::MIN)),
            TimeUnit::Week => {
                let back = i64::from(date.weekday().num_days_from_sunday());
                Some((date - Duration::days(back)).and_time(NaiveTime::MIN))
            }
            TimeUnit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .map(|first| first.and_time(NaiveTime::MIN)),
            TimeUnit::Year => {
                NaiveDate::from_ymd_opt(date.year(), 1, 1).map(|first| first.and_time(NaiveTime::MIN))
            }
        }
    }

    fn ceil(self, time: NaiveDateTime) -> Option<NaiveDateTime> {
        let floored = self.floor(time)?;
        if floored < time {
            self.offset(floored)
        } else {
            Some(floored)
        }
    }

    /// Advances by one unit (not by `step`; filtering happens in `range`).
    fn offset(self, time: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.unit {
            TimeUnit::Second => time.checked_add_signed(Duration::seconds(1)),
            TimeUnit::Minute => time.checked_add_signed(Duration::minutes(1)),
            TimeUnit::Hour => time.checked_add_signed(Duration::hours(1)),
            TimeUnit::Day => time.checked_add_signed(Duration::days(1)),
            TimeUnit::Week => time.checked_add_signed(Duration::weeks(1)),
            TimeUnit::Month => time.checked_add_months(Months::new(1)),
            TimeUnit::Year => time.checked_add_months(Months::new(12)),
        }
    }

    fn unit_number(self, time: NaiveDateTime) -> i64 {
        match self.unit {
            TimeUnit::Second => i64::from(time.second()),
            TimeUnit::Minute => i64::from(time.minute()),
            TimeUnit::Hour => i64::from(time.hour()),
            TimeUnit::Day => i64::from(time.day0()),
            TimeUnit::Week => 0,
            TimeUnit::Month => i64::from(time.month0()),
            TimeUnit::Year => i64::from(time.year()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Datelike, TimeZone, Utc};

    use super::{TimeInterval, TimeTickPlan, TimeUnit, time_ticks};

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().expect("valid date")
    }

    #[test]
    fn plan_picks_closest_interval() {
        let day = 86_400_000.0;
        assert_eq!(
            TimeTickPlan::for_span(0.0, 10.0 * day, 10),
            TimeTickPlan::Calendar(TimeInterval {
                unit: TimeUnit::Day,
                step: 1
            })
        );
        assert_eq!(TimeTickPlan::for_span(0.0, 500.0, 10), TimeTickPlan::Milliseconds);
        assert!(matches!(
            TimeTickPlan::for_span(0.0, 40.0 * 365.0 * day, 10),
            TimeTickPlan::Calendar(TimeInterval {
                unit: TimeUnit::Year,
                step: 5
            })
        ));
    }

    #[test]
    fn daily_ticks_align_to_midnight() {
        let ticks = time_ticks(utc(2020, 1, 1, 6), utc(2020, 1, 4, 0), 3);
        assert_eq!(ticks, vec![utc(2020, 1, 2, 0), utc(2020, 1, 3, 0), utc(2020, 1, 4, 0)]);
    }

    #[test]
    fn quarterly_ticks_land_on_quarter_starts() {
        let ticks = time_ticks(utc(2019, 2, 1, 0), utc(2021, 12, 31, 0), 14);
        assert_eq!(ticks.first().copied(), Some(utc(2019, 4, 1, 0)));
        assert!(ticks.iter().all(|tick| tick.month0() % 3 == 0 && tick.day() == 1));
    }
}
