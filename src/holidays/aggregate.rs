use super::coverage::Transition;
use super::source::{HolidaySource, SourceError};
use super::{CoverageDescriptor, DateCoverage, HolidayInterval, HolidayKind, SubdivisionRegistry};
use crate::dates::TargetYear;
use crate::error::HolidayError;
use thiserror::Error;
use time::Date;
use tracing::{debug, info};

/// Per-date holiday coverage for every day of one year, along with the
/// registry of the countries involved
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct YearCoverageIndex {
    year: TargetYear,
    // Invariant: one entry per day of `year`, in order
    days: Vec<DateCoverage>,
    registry: SubdivisionRegistry,
}

impl YearCoverageIndex {
    pub(crate) fn year(&self) -> TargetYear {
        self.year
    }

    pub(crate) fn registry(&self) -> &SubdivisionRegistry {
        &self.registry
    }

    pub(crate) fn days(&self) -> std::slice::Iter<'_, DateCoverage> {
        self.days.iter()
    }

    /// Returns `None` for dates outside the year
    pub(crate) fn day(&self, date: Date) -> Option<&DateCoverage> {
        if !self.year.contains(date) {
            return None;
        }
        self.days.get(usize::from(date.ordinal() - 1))
    }

    /// Number of `country`'s regions on holiday on `date`.  Nationwide
    /// holidays count every region.
    pub(crate) fn coverage_count(&self, country: &str, date: Date) -> Result<u32, HolidayError> {
        let total = self.registry.count(country)?;
        Ok(self
            .day(date)
            .and_then(|d| d.coverage(country))
            .map_or(0, |c| c.count(total)))
    }

    /// Fraction of `country`'s regions on holiday on `date`, in `[0, 1]`
    pub(crate) fn coverage_percentage(
        &self,
        country: &str,
        date: Date,
    ) -> Result<f64, HolidayError> {
        let total = self.registry.count(country)?;
        let count = self.coverage_count(country, date)?;
        Ok((f64::from(count) / f64::from(total)).clamp(0.0, 1.0))
    }
}

/// Folds holiday intervals into a [`YearCoverageIndex`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HolidayAggregator {
    index: YearCoverageIndex,
}

impl HolidayAggregator {
    pub(crate) fn new(year: TargetYear, registry: SubdivisionRegistry) -> HolidayAggregator {
        HolidayAggregator {
            index: YearCoverageIndex {
                year,
                days: year.days().map(DateCoverage::new).collect(),
                registry,
            },
        }
    }

    pub(crate) fn ingest(&mut self, interval: &HolidayInterval) -> Result<(), HolidayError> {
        let YearCoverageIndex {
            year,
            days,
            registry,
        } = &mut self.index;
        let country = interval.country();
        registry.country(country)?;
        // Regions given a holiday-kind tag on every covered date
        let tagged = match interval.coverage() {
            CoverageDescriptor::Nationwide => {
                let mut codes = registry
                    .region_codes(country)?
                    .map(String::from)
                    .collect::<Vec<_>>();
                if codes.is_empty() {
                    codes.push(String::from(country));
                }
                codes
            }
            CoverageDescriptor::Regions(regions) => {
                for code in regions {
                    registry.region(country, code)?;
                }
                regions.iter().cloned().collect()
            }
        };
        let Some(range) = year.clamp_range(interval.start(), interval.end()) else {
            debug!(
                country = %country,
                start = %interval.start(),
                end = %interval.end(),
                "Holiday lies outside of the target year; skipping"
            );
            return Ok(());
        };
        for date in range {
            let Some(day) = days.get_mut(usize::from(date.ordinal() - 1)) else {
                continue;
            };
            let transition = day.record(country, interval.coverage(), interval.kind());
            if transition == Transition::Redundant {
                debug!(
                    country = %country,
                    date = %date,
                    "Holiday is already nationwide; subdivisions will be ignored"
                );
            }
            for code in &tagged {
                day.tag(country, code, interval.kind());
            }
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> YearCoverageIndex {
        self.index
    }
}

#[derive(Debug, Error)]
pub(crate) enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Holiday(#[from] HolidayError),
}

/// Builds the coverage index for `countries` over `year`.  The registry is
/// completed for every country before the first holiday is requested.
pub(crate) fn aggregate_year<S: HolidaySource>(
    source: &S,
    year: TargetYear,
    countries: &[String],
) -> Result<YearCoverageIndex, LoadError> {
    let known = source.fetch_countries()?;
    let mut registry = SubdivisionRegistry::new();
    for code in countries {
        if registry.contains(code) {
            continue;
        }
        let record = known
            .iter()
            .find(|c| &c.iso_code == code)
            .cloned()
            .ok_or_else(|| HolidayError::UnknownCountry {
                country: code.clone(),
            })?;
        let tree = source.fetch_subdivisions(code)?;
        registry.insert(record, tree);
        let regions = registry.count(code)?;
        debug!(country = %code, regions, "Loaded subdivisions");
    }
    let mut aggregator = HolidayAggregator::new(year, registry);
    let mut ingested = 0usize;
    for code in countries {
        for kind in HolidayKind::ALL {
            for record in source.fetch_holiday_intervals(code, year, kind)? {
                let interval = HolidayInterval::new(
                    record.kind,
                    code.clone(),
                    record.start,
                    record.end,
                    record.nationwide,
                    record.subdivisions,
                )?;
                aggregator.ingest(&interval)?;
                ingested += 1;
            }
        }
    }
    let index = aggregator.finish();
    let holiday_days = index
        .days()
        .filter(|day| day.countries().next().is_some())
        .count();
    info!(
        year = year.year(),
        countries = countries.len(),
        holidays = ingested,
        holiday_days,
        "Aggregated holidays"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::super::source::{CountryRecord, HolidayRecord, SubdivisionRecord};
    use super::super::{Coverage, Names};
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use time::macros::date;

    fn leaf(code: &str) -> SubdivisionRecord {
        SubdivisionRecord {
            code: String::from(code),
            names: Names::new().with("EN", code),
            children: Vec::new(),
        }
    }

    fn country(code: &str) -> CountryRecord {
        CountryRecord {
            iso_code: String::from(code),
            names: Names::new().with("EN", code),
        }
    }

    fn registry() -> SubdivisionRegistry {
        let mut reg = SubdivisionRegistry::new();
        reg.insert(
            country("DE"),
            vec![leaf("A"), leaf("B"), leaf("C"), leaf("D")],
        );
        reg.insert(country("LU"), Vec::new());
        reg
    }

    fn interval(kind: HolidayKind, start: Date, end: Date, regions: &[&str]) -> HolidayInterval {
        let regions = regions
            .iter()
            .map(|&r| String::from(r))
            .collect::<BTreeSet<_>>();
        let nationwide = regions.is_empty();
        HolidayInterval::new(kind, String::from("DE"), start, end, nationwide, regions).unwrap()
    }

    fn aggregator() -> HolidayAggregator {
        HolidayAggregator::new(TargetYear::new(2024).unwrap(), registry())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_nationwide_public_holiday() {
        let mut agg = aggregator();
        let d = date!(2024 - 01 - 01);
        agg.ingest(&interval(HolidayKind::Public, d, d, &[])).unwrap();
        let index = agg.finish();
        assert_eq!(index.coverage_count("DE", d).unwrap(), 4);
        assert!(approx(index.coverage_percentage("DE", d).unwrap(), 1.0));
        let day = index.day(d).unwrap();
        for r in ["A", "B", "C", "D"] {
            assert!(day.has_kind("DE", r, HolidayKind::Public));
        }
        assert_eq!(index.coverage_count("DE", date!(2024 - 01 - 02)).unwrap(), 0);
    }

    #[test]
    fn test_explicit_sets_merge() {
        let mut agg = aggregator();
        let d = date!(2024 - 06 - 10);
        agg.ingest(&interval(HolidayKind::School, d, d, &["A", "B"]))
            .unwrap();
        agg.ingest(&interval(HolidayKind::School, d, d, &["B", "C"]))
            .unwrap();
        let index = agg.finish();
        assert_eq!(index.coverage_count("DE", d).unwrap(), 3);
        assert!(approx(index.coverage_percentage("DE", d).unwrap(), 0.75));
        let expected = ["A", "B", "C"].map(String::from).into_iter().collect();
        assert_eq!(
            index.day(d).unwrap().coverage("DE"),
            Some(&Coverage::Partial(expected))
        );
    }

    #[test]
    fn test_explicit_after_nationwide() {
        let mut agg = aggregator();
        let d = date!(2024 - 10 - 03);
        agg.ingest(&interval(HolidayKind::Public, d, d, &[])).unwrap();
        agg.ingest(&interval(HolidayKind::School, d, d, &["A"]))
            .unwrap();
        let index = agg.finish();
        let day = index.day(d).unwrap();
        assert_eq!(day.coverage("DE"), Some(&Coverage::Total));
        assert_eq!(index.coverage_count("DE", d).unwrap(), 4);
        // Kinds are still recorded for the explicit region
        assert!(day.has_kind("DE", "A", HolidayKind::School));
        assert!(day.has_kind("DE", "A", HolidayKind::Public));
        assert!(!day.has_kind("DE", "B", HolidayKind::School));
    }

    #[test]
    fn test_all_regions_explicitly() {
        let mut agg = aggregator();
        let d = date!(2024 - 03 - 08);
        let iv = interval(HolidayKind::Public, d, d, &["A", "B", "C", "D"]);
        agg.ingest(&iv).unwrap();
        let index = agg.finish();
        assert!(approx(index.coverage_percentage("DE", d).unwrap(), 1.0));
        assert!(!index.day(d).unwrap().coverage("DE").unwrap().is_total());
    }

    #[test]
    fn test_coverage_monotonic() {
        let mut agg = aggregator();
        let start = date!(2024 - 07 - 01);
        let end = date!(2024 - 07 - 31);
        let steps = [
            interval(HolidayKind::School, start, end, &["A"]),
            interval(HolidayKind::School, start, date!(2024 - 07 - 10), &[]),
            interval(HolidayKind::School, start, end, &["B"]),
            interval(
                HolidayKind::Public,
                date!(2024 - 07 - 05),
                date!(2024 - 07 - 05),
                &["C"],
            ),
        ];
        let mut previous = 0;
        for iv in &steps {
            agg.ingest(iv).unwrap();
            let index = agg.clone().finish();
            let count = index.coverage_count("DE", date!(2024 - 07 - 05)).unwrap();
            assert!(count >= previous);
            previous = count;
        }
        assert_eq!(previous, 4);
    }

    #[test]
    fn test_cross_year_interval_clamped() {
        let mut agg = aggregator();
        agg.ingest(&interval(
            HolidayKind::School,
            date!(2023 - 12 - 21),
            date!(2024 - 01 - 03),
            &["A"],
        ))
        .unwrap();
        agg.ingest(&interval(
            HolidayKind::School,
            date!(2023 - 10 - 01),
            date!(2023 - 10 - 10),
            &["B"],
        ))
        .unwrap();
        let index = agg.finish();
        assert_eq!(index.coverage_count("DE", date!(2024 - 01 - 03)).unwrap(), 1);
        assert_eq!(index.coverage_count("DE", date!(2024 - 01 - 04)).unwrap(), 0);
        assert_eq!(index.day(date!(2023 - 12 - 31)), None);
        assert_eq!(index.coverage_count("DE", date!(2023 - 12 - 31)).unwrap(), 0);
    }

    #[test]
    fn test_country_without_regions() {
        let mut agg = aggregator();
        let d = date!(2024 - 06 - 23);
        let iv = HolidayInterval::new(
            HolidayKind::Public,
            String::from("LU"),
            d,
            d,
            true,
            BTreeSet::new(),
        )
        .unwrap();
        agg.ingest(&iv).unwrap();
        let index = agg.finish();
        assert_eq!(index.coverage_count("LU", d).unwrap(), 1);
        assert!(approx(index.coverage_percentage("LU", d).unwrap(), 1.0));
        assert!(index.day(d).unwrap().has_kind("LU", "LU", HolidayKind::Public));
    }

    #[test]
    fn test_unknown_country() {
        let mut agg = aggregator();
        let d = date!(2024 - 06 - 23);
        let iv = HolidayInterval::new(
            HolidayKind::Public,
            String::from("FR"),
            d,
            d,
            true,
            BTreeSet::new(),
        )
        .unwrap();
        assert_eq!(
            agg.ingest(&iv),
            Err(HolidayError::UnknownCountry {
                country: String::from("FR")
            })
        );
    }

    #[test]
    fn test_unknown_region() {
        let mut agg = aggregator();
        let d = date!(2024 - 06 - 23);
        assert_eq!(
            agg.ingest(&interval(HolidayKind::School, d, d, &["A", "Q"])),
            Err(HolidayError::UnknownRegion {
                country: String::from("DE"),
                region: String::from("Q"),
            })
        );
        // Nothing was applied
        assert_eq!(agg.finish().coverage_count("DE", d).unwrap(), 0);
    }

    #[derive(Debug, Default)]
    struct ScriptedSource {
        calls: RefCell<Vec<String>>,
        /// Extra public holiday handed out for DE
        malformed: Option<HolidayRecord>,
    }

    impl HolidaySource for ScriptedSource {
        fn fetch_countries(&self) -> Result<Vec<CountryRecord>, SourceError> {
            self.calls.borrow_mut().push(String::from("countries"));
            Ok(vec![country("DE"), country("LU")])
        }

        fn fetch_subdivisions(&self, code: &str) -> Result<Vec<SubdivisionRecord>, SourceError> {
            self.calls.borrow_mut().push(format!("subdivisions {code}"));
            if code == "DE" {
                Ok(vec![leaf("A"), leaf("B")])
            } else {
                Ok(Vec::new())
            }
        }

        fn fetch_holiday_intervals(
            &self,
            code: &str,
            _year: TargetYear,
            kind: HolidayKind,
        ) -> Result<Vec<HolidayRecord>, SourceError> {
            self.calls.borrow_mut().push(format!("holidays {code} {kind}"));
            if code == "DE" && kind == HolidayKind::School {
                Ok(vec![HolidayRecord {
                    kind,
                    start: date!(2024 - 02 - 05),
                    end: date!(2024 - 02 - 09),
                    nationwide: false,
                    subdivisions: BTreeSet::from([String::from("B")]),
                }])
            } else if code == "DE" && kind == HolidayKind::Public {
                Ok(self.malformed.iter().cloned().collect())
            } else {
                Ok(Vec::new())
            }
        }
    }

    #[test]
    fn test_aggregate_year_fetch_order() {
        let source = ScriptedSource::default();
        let year = TargetYear::new(2024).unwrap();
        let countries = [String::from("DE"), String::from("LU")];
        let index = aggregate_year(&source, year, &countries).unwrap();
        assert_eq!(
            *source.calls.borrow(),
            [
                "countries",
                "subdivisions DE",
                "subdivisions LU",
                "holidays DE public",
                "holidays DE school",
                "holidays LU public",
                "holidays LU school",
            ]
        );
        assert!(approx(
            index
                .coverage_percentage("DE", date!(2024 - 02 - 07))
                .unwrap(),
            0.5
        ));
    }

    #[test]
    fn test_aggregate_year_unknown_country() {
        let source = ScriptedSource::default();
        let year = TargetYear::new(2024).unwrap();
        let r = aggregate_year(&source, year, &[String::from("PL")]);
        assert!(matches!(
            r,
            Err(LoadError::Holiday(HolidayError::UnknownCountry { .. }))
        ));
        // No holidays were requested
        assert_eq!(source.calls.borrow().len(), 1);
    }

    #[test]
    fn test_aggregate_year_rejects_reversed_range() {
        let source = ScriptedSource {
            malformed: Some(HolidayRecord {
                kind: HolidayKind::Public,
                start: date!(2025 - 01 - 03),
                end: date!(2024 - 12 - 30),
                nationwide: true,
                subdivisions: BTreeSet::new(),
            }),
            ..ScriptedSource::default()
        };
        let year = TargetYear::new(2024).unwrap();
        let r = aggregate_year(&source, year, &[String::from("DE")]);
        assert_eq!(
            r.err().and_then(|e| match e {
                LoadError::Holiday(e) => Some(e),
                LoadError::Source(_) => None,
            }),
            Some(HolidayError::InvalidRange {
                start: date!(2025 - 01 - 03),
                end: date!(2024 - 12 - 30),
            })
        );
        // Aggregation stopped at the first public holiday
        assert_eq!(source.calls.borrow().last().unwrap(), "holidays DE public");
    }

    #[test]
    fn test_aggregate_year_rejects_ambiguous_descriptor() {
        let source = ScriptedSource {
            malformed: Some(HolidayRecord {
                kind: HolidayKind::Public,
                start: date!(2024 - 05 - 30),
                end: date!(2024 - 05 - 30),
                nationwide: true,
                subdivisions: BTreeSet::from([String::from("A")]),
            }),
            ..ScriptedSource::default()
        };
        let year = TargetYear::new(2024).unwrap();
        let r = aggregate_year(&source, year, &[String::from("DE")]);
        assert!(matches!(
            r,
            Err(LoadError::Holiday(
                HolidayError::AmbiguousCoverageDescriptor { ref country, .. }
            )) if country == "DE"
        ));
    }
}
