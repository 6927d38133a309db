//! Year-scoped date arithmetic: enumeration, clamping, and ISO week spans.
use crate::error::HolidayError;
use std::iter::FusedIterator;
use time::{Date, Month, Weekday};

/// A calendar year whose neighbouring years are also representable, so that
/// ISO weeks straddling either boundary can always be resolved.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct TargetYear {
    year: i32,
    first: Date,
    last: Date,
}

impl TargetYear {
    pub(crate) fn new(year: i32) -> Result<TargetYear, HolidayError> {
        let invalid = || HolidayError::InvalidYear { year };
        let prev = year.checked_sub(1).ok_or_else(invalid)?;
        let next = year.checked_add(1).ok_or_else(invalid)?;
        Date::from_calendar_date(prev, Month::January, 1).map_err(|_| invalid())?;
        Date::from_calendar_date(next, Month::December, 31).map_err(|_| invalid())?;
        let first = Date::from_calendar_date(year, Month::January, 1).map_err(|_| invalid())?;
        let last = Date::from_calendar_date(year, Month::December, 31).map_err(|_| invalid())?;
        Ok(TargetYear { year, first, last })
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn first_day(&self) -> Date {
        self.first
    }

    pub(crate) fn last_day(&self) -> Date {
        self.last
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.first <= date && date <= self.last
    }

    /// Returns `date` if it lies within the year, otherwise whichever of
    /// January 1 or December 31 is nearer.
    pub(crate) fn clamp(&self, date: Date) -> Date {
        date.clamp(self.first, self.last)
    }

    /// Clamps both ends of `[start, end]` to the year.  Returns `None` if the
    /// range lies entirely outside of it.
    pub(crate) fn clamp_range(&self, start: Date, end: Date) -> Option<DateRange> {
        if end < self.first || start > self.last {
            return None;
        }
        enumerate(self.clamp(start), self.clamp(end)).ok()
    }

    pub(crate) fn days(&self) -> DateRange {
        DateRange {
            next: Some(self.first),
            end: self.last,
        }
    }

    pub(crate) fn day_count(&self) -> u16 {
        self.last.ordinal()
    }

    /// The first and last day of each month of the year, January first
    pub(crate) fn months(&self) -> Vec<MonthSpan> {
        let mut spans: Vec<MonthSpan> = Vec::with_capacity(12);
        for date in self.days() {
            match spans.last_mut() {
                Some(span) if span.month == date.month() => span.end = date,
                _ => spans.push(MonthSpan {
                    month: date.month(),
                    start: date,
                    end: date,
                }),
            }
        }
        spans
    }

    /// Every ISO week intersecting the year, in order, each clamped to the
    /// year's first and last days.  Weeks belonging to the previous and next
    /// ISO years are included when they overlap the boundaries.
    pub(crate) fn week_spans(&self) -> Vec<WeekSpan> {
        let mut spans = Vec::new();
        for iso_year in [self.year - 1, self.year, self.year + 1] {
            for week in 1..=time::util::weeks_in_year(iso_year) {
                let (Ok(monday), Ok(sunday)) = (
                    Date::from_iso_week_date(iso_year, week, Weekday::Monday),
                    Date::from_iso_week_date(iso_year, week, Weekday::Sunday),
                ) else {
                    continue;
                };
                if monday > self.last || sunday < self.first {
                    continue;
                }
                spans.push(WeekSpan {
                    iso_year,
                    week,
                    start: self.clamp(monday),
                    end: self.clamp(sunday),
                });
            }
        }
        spans
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct MonthSpan {
    pub(crate) month: Month,
    pub(crate) start: Date,
    pub(crate) end: Date,
}

/// The portion of one ISO week that falls within a target year
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct WeekSpan {
    pub(crate) iso_year: i32,
    pub(crate) week: u8,
    pub(crate) start: Date,
    pub(crate) end: Date,
}

/// Ascending, inclusive sequence of consecutive dates.  Cloning yields an
/// independent iterator starting from the same position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DateRange {
    next: Option<Date>,
    end: Date,
}

impl Iterator for DateRange {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        let date = self.next?;
        self.next = date.next_day().filter(|&d| d <= self.end);
        Some(date)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.next.map_or(0, |d| {
            usize::try_from((self.end - d).whole_days() + 1).unwrap_or(0)
        });
        (n, Some(n))
    }
}

impl ExactSizeIterator for DateRange {}

impl FusedIterator for DateRange {}

/// Enumerates every date from `start` through `end`, both inclusive
pub(crate) fn enumerate(start: Date, end: Date) -> Result<DateRange, HolidayError> {
    if start > end {
        return Err(HolidayError::InvalidRange { start, end });
    }
    Ok(DateRange {
        next: Some(start),
        end,
    })
}

/// One-based day of the year, in `1..=366`
pub(crate) fn day_of_year(date: Date) -> u16 {
    date.ordinal()
}

/// ISO-8601 `(year, week)` of the date; weeks start on Monday and week 1 is
/// the one containing the year's first Thursday.
pub(crate) fn iso_week(date: Date) -> (i32, u8) {
    let (year, week, _) = date.to_iso_week_date();
    (year, week)
}

pub(crate) fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

pub(crate) fn is_last_day_of_month(date: Date) -> bool {
    match date.next_day() {
        Some(tomorrow) => date.month() != tomorrow.month(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_enumerate_single_day() {
        let d = date!(2024 - 02 - 29);
        let days = enumerate(d, d).unwrap().collect::<Vec<_>>();
        assert_eq!(days, vec![d]);
    }

    #[test]
    fn test_enumerate_length() {
        let start = date!(2023 - 12 - 30);
        let end = date!(2024 - 01 - 03);
        let range = enumerate(start, end).unwrap();
        assert_eq!(range.len(), 5);
        let days = range.collect::<Vec<_>>();
        assert_eq!(days.len(), 5);
        assert_eq!(days.first(), Some(&start));
        assert_eq!(days.last(), Some(&end));
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_enumerate_restartable() {
        let range = enumerate(date!(2024 - 05 - 01), date!(2024 - 05 - 10)).unwrap();
        let first = range.clone().collect::<Vec<_>>();
        let second = range.collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn test_enumerate_invalid_range() {
        let r = enumerate(date!(2024 - 05 - 02), date!(2024 - 05 - 01));
        assert_eq!(
            r.unwrap_err(),
            HolidayError::InvalidRange {
                start: date!(2024 - 05 - 02),
                end: date!(2024 - 05 - 01),
            }
        );
    }

    #[test]
    fn test_clamp() {
        let year = TargetYear::new(2024).unwrap();
        assert_eq!(year.clamp(date!(2023 - 12 - 23)), date!(2024 - 01 - 01));
        assert_eq!(year.clamp(date!(2024 - 07 - 14)), date!(2024 - 07 - 14));
        assert_eq!(year.clamp(date!(2025 - 01 - 06)), date!(2024 - 12 - 31));
    }

    #[test]
    fn test_clamp_idempotent() {
        let year = TargetYear::new(2024).unwrap();
        for d in [
            date!(2019 - 06 - 01),
            date!(2024 - 01 - 01),
            date!(2024 - 09 - 10),
            date!(2024 - 12 - 31),
            date!(2031 - 02 - 01),
        ] {
            assert_eq!(year.clamp(year.clamp(d)), year.clamp(d));
        }
    }

    #[test]
    fn test_clamp_range() {
        let year = TargetYear::new(2024).unwrap();
        let days = year
            .clamp_range(date!(2024 - 12 - 23), date!(2025 - 01 - 04))
            .unwrap()
            .collect::<Vec<_>>();
        assert_eq!(days.len(), 9);
        assert_eq!(days.last(), Some(&date!(2024 - 12 - 31)));
        assert!(year
            .clamp_range(date!(2023 - 12 - 01), date!(2023 - 12 - 31))
            .is_none());
    }

    #[test]
    fn test_year_days() {
        assert_eq!(TargetYear::new(2023).unwrap().days().count(), 365);
        assert_eq!(TargetYear::new(2024).unwrap().days().count(), 366);
        assert_eq!(TargetYear::new(2024).unwrap().day_count(), 366);
    }

    #[test]
    fn test_invalid_year() {
        assert_eq!(
            TargetYear::new(9999),
            Err(HolidayError::InvalidYear { year: 9999 })
        );
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(day_of_year(date!(2024 - 01 - 01)), 1);
        assert_eq!(day_of_year(date!(2024 - 03 - 01)), 61);
        assert_eq!(day_of_year(date!(2024 - 12 - 31)), 366);
        assert_eq!(day_of_year(date!(2023 - 12 - 31)), 365);
    }

    #[test]
    fn test_iso_week() {
        assert_eq!(iso_week(date!(2024 - 12 - 30)), (2025, 1));
        assert_eq!(iso_week(date!(2021 - 01 - 03)), (2020, 53));
        assert_eq!(iso_week(date!(2024 - 01 - 01)), (2024, 1));
    }

    #[test]
    fn test_week_spans_2024() {
        let year = TargetYear::new(2024).unwrap();
        let spans = year.week_spans();
        // 2024-01-01 is a Monday, so the year opens with a full week 1 and
        // closes with two days of 2025's week 1.
        assert_eq!(spans.len(), 53);
        assert_eq!(
            spans.first(),
            Some(&WeekSpan {
                iso_year: 2024,
                week: 1,
                start: date!(2024 - 01 - 01),
                end: date!(2024 - 01 - 07),
            })
        );
        assert_eq!(
            spans.last(),
            Some(&WeekSpan {
                iso_year: 2025,
                week: 1,
                start: date!(2024 - 12 - 30),
                end: date!(2024 - 12 - 31),
            })
        );
    }

    #[test]
    fn test_week_spans_2025() {
        let year = TargetYear::new(2025).unwrap();
        let spans = year.week_spans();
        assert_eq!(
            spans.first(),
            Some(&WeekSpan {
                iso_year: 2025,
                week: 1,
                start: date!(2025 - 01 - 01),
                end: date!(2025 - 01 - 05),
            })
        );
        let n = spans
            .iter()
            .filter(|s| s.iso_year == 2025 && s.week == 1)
            .count();
        assert_eq!(n, 1);
    }

    #[test]
    fn test_week_spans_single_day() {
        // 2021-01-03 is the Sunday of 2020's week 53
        let year = TargetYear::new(2021).unwrap();
        let spans = year.week_spans();
        assert_eq!(
            spans.first(),
            Some(&WeekSpan {
                iso_year: 2020,
                week: 53,
                start: date!(2021 - 01 - 01),
                end: date!(2021 - 01 - 03),
            })
        );
        // 2023-01-01 is a Sunday: the only day of 2022's week 52 in 2023
        let year = TargetYear::new(2023).unwrap();
        let first = year.week_spans()[0];
        assert_eq!(first.start, first.end);
        assert_eq!((first.iso_year, first.week), (2022, 52));
    }

    #[test]
    fn test_months() {
        let months = TargetYear::new(2024).unwrap().months();
        assert_eq!(months.len(), 12);
        assert_eq!(months[1].month, Month::February);
        assert_eq!(months[1].start, date!(2024 - 02 - 01));
        assert_eq!(months[1].end, date!(2024 - 02 - 29));
        assert_eq!(months[1].end.day(), 29);
        assert_eq!(months[11].end, date!(2024 - 12 - 31));
    }

    #[test]
    fn test_is_last_day_of_month() {
        assert!(is_last_day_of_month(date!(2024 - 02 - 29)));
        assert!(!is_last_day_of_month(date!(2023 - 02 - 27)));
        assert!(is_last_day_of_month(date!(2023 - 12 - 31)));
    }
}
