use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Date, Time};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("start time must be earlier than end time")]
pub struct InvalidInterval;

/// A calendar date plus a start/end time-of-day pair. Overnight spans are not
/// representable; `new` rejects any interval where the start does not come
/// strictly before the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
}

impl TimeInterval {
    pub fn new(date: Date, start_time: Time, end_time: Time) -> Result<Self, InvalidInterval> {
        if start_time >= end_time {
            return Err(InvalidInterval);
        }
        Ok(Self {
            date,
            start_time,
            end_time,
        })
    }

    /// Inclusive-boundary overlap: two same-date intervals conflict when
    /// neither lies strictly before the other, so intervals that merely touch
    /// at an endpoint (a.end == b.start) are treated as conflicting.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.date == other.date
            && self.start_time <= other.end_time
            && other.start_time <= self.end_time
    }

    /// Whether `at` on `date` falls inside this interval, endpoints included.
    pub fn contains(&self, date: Date, at: Time) -> bool {
        self.date == date && self.start_time <= at && at <= self.end_time
    }
}

/// Optional date bounds for availability queries. An absent bound means "no
/// filter" on that side.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DateRange {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl DateRange {
    pub fn contains(&self, date: Date) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn interval(start: Time, end: Time) -> TimeInterval {
        TimeInterval::new(date!(2024 - 06 - 01), start, end).unwrap()
    }

    #[test]
    fn rejects_reversed_or_empty_interval() {
        assert!(TimeInterval::new(date!(2024 - 06 - 01), time!(10:00), time!(09:00)).is_err());
        assert!(TimeInterval::new(date!(2024 - 06 - 01), time!(10:00), time!(10:00)).is_err());
    }

    #[test]
    fn overlapping_intervals_conflict() {
        let a = interval(time!(10:00), time!(10:30));
        let b = interval(time!(10:15), time!(10:45));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_endpoints_conflict() {
        let a = interval(time!(10:00), time!(10:30));
        let b = interval(time!(10:30), time!(11:00));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn disjoint_intervals_do_not_conflict() {
        let a = interval(time!(09:00), time!(09:30));
        let b = interval(time!(09:31), time!(10:00));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn different_dates_never_conflict() {
        let a = interval(time!(10:00), time!(10:30));
        let b = TimeInterval::new(date!(2024 - 06 - 02), time!(10:00), time!(10:30)).unwrap();
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn contains_uses_inclusive_endpoints() {
        let a = interval(time!(10:00), time!(10:30));
        assert!(a.contains(date!(2024 - 06 - 01), time!(10:00)));
        assert!(a.contains(date!(2024 - 06 - 01), time!(10:30)));
        assert!(!a.contains(date!(2024 - 06 - 01), time!(10:31)));
        assert!(!a.contains(date!(2024 - 06 - 02), time!(10:15)));
    }

    #[test]
    fn open_range_matches_everything() {
        let range = DateRange::default();
        assert!(range.contains(date!(2024 - 06 - 01)));

        let bounded = DateRange {
            from: Some(date!(2024 - 06 - 01)),
            to: Some(date!(2024 - 06 - 30)),
        };
        assert!(bounded.contains(date!(2024 - 06 - 15)));
        assert!(!bounded.contains(date!(2024 - 07 - 01)));
    }
}
