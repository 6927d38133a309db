//! A small coverage index for January 2024 shared by the renderer tests
use crate::dates::TargetYear;
use crate::holidays::{
    CountryRecord, HolidayAggregator, HolidayInterval, HolidayKind, Names, SubdivisionRecord,
    SubdivisionRegistry, YearCoverageIndex,
};
use std::collections::BTreeSet;
use time::macros::date;
use time::Date;

fn leaf(code: &str, name: &str) -> SubdivisionRecord {
    SubdivisionRecord {
        code: String::from(code),
        names: Names::new().with("DE", name),
        children: Vec::new(),
    }
}

fn country(code: &str, name: &str) -> CountryRecord {
    CountryRecord {
        iso_code: String::from(code),
        names: Names::new().with("DE", name),
    }
}

fn interval(
    kind: HolidayKind,
    country: &str,
    start: Date,
    end: Date,
    regions: &[&str],
) -> HolidayInterval {
    let regions = regions
        .iter()
        .map(|&r| String::from(r))
        .collect::<BTreeSet<_>>();
    HolidayInterval::new(
        kind,
        String::from(country),
        start,
        end,
        regions.is_empty(),
        regions,
    )
    .unwrap()
}

/// Germany (Bayern, Niedersachsen) and Poland (two voivodeships):
///
/// - 01-01: nationwide public holiday in DE
/// - 01-02 to 01-05: school holidays in DE-NI
/// - 01-02: school holiday in PL-DS
/// - 01-03: school and public holiday in DE-BY
/// - 01-06: public holiday in DE-BY, nationwide public holiday in PL
/// - 01-09: nationwide school holiday and public holiday in DE-BY
pub(super) fn january() -> YearCoverageIndex {
    let mut registry = SubdivisionRegistry::new();
    registry.insert(
        country("DE", "Deutschland"),
        vec![leaf("DE-NI", "Niedersachsen"), leaf("DE-BY", "Bayern")],
    );
    registry.insert(
        country("PL", "Polen"),
        vec![leaf("PL-DS", "Niederschlesien"), leaf("PL-MZ", "Masowien")],
    );
    let mut agg = HolidayAggregator::new(TargetYear::new(2024).unwrap(), registry);
    let intervals = [
        interval(
            HolidayKind::Public,
            "DE",
            date!(2024 - 01 - 01),
            date!(2024 - 01 - 01),
            &[],
        ),
        interval(
            HolidayKind::School,
            "DE",
            date!(2024 - 01 - 02),
            date!(2024 - 01 - 05),
            &["DE-NI"],
        ),
        interval(
            HolidayKind::School,
            "PL",
            date!(2024 - 01 - 02),
            date!(2024 - 01 - 02),
            &["PL-DS"],
        ),
        interval(
            HolidayKind::School,
            "DE",
            date!(2024 - 01 - 03),
            date!(2024 - 01 - 03),
            &["DE-BY"],
        ),
        interval(
            HolidayKind::Public,
            "DE",
            date!(2024 - 01 - 03),
            date!(2024 - 01 - 03),
            &["DE-BY"],
        ),
        interval(
            HolidayKind::Public,
            "DE",
            date!(2024 - 01 - 06),
            date!(2024 - 01 - 06),
            &["DE-BY"],
        ),
        interval(
            HolidayKind::Public,
            "PL",
            date!(2024 - 01 - 06),
            date!(2024 - 01 - 06),
            &[],
        ),
        interval(
            HolidayKind::School,
            "DE",
            date!(2024 - 01 - 09),
            date!(2024 - 01 - 09),
            &[],
        ),
        interval(
            HolidayKind::Public,
            "DE",
            date!(2024 - 01 - 09),
            date!(2024 - 01 - 09),
            &["DE-BY"],
        ),
    ];
    for iv in &intervals {
        agg.ingest(iv).unwrap();
    }
    agg.finish()
}
