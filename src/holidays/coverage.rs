use super::{CoverageDescriptor, HolidayKind};
use std::collections::{BTreeMap, BTreeSet};
use time::Date;

/// How much of one country a single date's holidays cover.
///
/// The only transition out of `Partial` is into `Total`; once a country is
/// covered nationwide on a date, nothing can shrink that coverage again.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Coverage {
    Partial(BTreeSet<String>),
    Total,
}

impl Default for Coverage {
    fn default() -> Coverage {
        Coverage::Partial(BTreeSet::new())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Transition {
    Unchanged,
    /// New regions joined a partial coverage
    Extended,
    /// Partial coverage became nationwide
    Promoted,
    /// An explicit region set arrived after the date was already nationwide
    Redundant,
}

impl Coverage {
    pub(crate) fn absorb(&mut self, descriptor: &CoverageDescriptor) -> Transition {
        match descriptor {
            CoverageDescriptor::Nationwide => {
                if self.is_total() {
                    Transition::Unchanged
                } else {
                    *self = Coverage::Total;
                    Transition::Promoted
                }
            }
            CoverageDescriptor::Regions(regions) => match self {
                Coverage::Total => Transition::Redundant,
                Coverage::Partial(covered) => {
                    let before = covered.len();
                    covered.extend(regions.iter().cloned());
                    if covered.len() > before {
                        Transition::Extended
                    } else {
                        Transition::Unchanged
                    }
                }
            },
        }
    }

    pub(crate) fn is_total(&self) -> bool {
        matches!(self, Coverage::Total)
    }

    /// Number of covered regions, where nationwide coverage counts as `total`
    pub(crate) fn count(&self, total: u32) -> u32 {
        match self {
            Coverage::Total => total,
            Coverage::Partial(covered) => u32::try_from(covered.len()).unwrap_or(u32::MAX),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct CountryDay {
    coverage: Coverage,
    /// Kinds of the holidays that covered the whole country
    nationwide: BTreeSet<HolidayKind>,
    kinds: BTreeMap<String, BTreeSet<HolidayKind>>,
}

/// Everything the ingested holidays say about a single date
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DateCoverage {
    date: Date,
    countries: BTreeMap<String, CountryDay>,
}

impl DateCoverage {
    pub(crate) fn new(date: Date) -> DateCoverage {
        DateCoverage {
            date,
            countries: BTreeMap::new(),
        }
    }

    pub(crate) fn date(&self) -> Date {
        self.date
    }

    pub(crate) fn record(
        &mut self,
        country: &str,
        descriptor: &CoverageDescriptor,
        kind: HolidayKind,
    ) -> Transition {
        let day = self.day_mut(country);
        if matches!(descriptor, CoverageDescriptor::Nationwide) {
            day.nationwide.insert(kind);
        }
        day.coverage.absorb(descriptor)
    }

    /// Records that `region` observes a holiday of `kind` on this date.
    /// Both kinds may be present at once.
    pub(crate) fn tag(&mut self, country: &str, region: &str, kind: HolidayKind) {
        self.day_mut(country)
            .kinds
            .entry(String::from(region))
            .or_default()
            .insert(kind);
    }

    /// Coverage of `country`, or `None` if no holiday touched it on this date
    pub(crate) fn coverage(&self, country: &str) -> Option<&Coverage> {
        self.countries.get(country).map(|d| &d.coverage)
    }

    /// Whether a holiday of `kind` covered all of `country` on this date.
    /// Coverage can become total through another kind, or through explicit
    /// regions adding up to the whole country, without this holding.
    pub(crate) fn is_nationwide(&self, country: &str, kind: HolidayKind) -> bool {
        self.countries
            .get(country)
            .is_some_and(|d| d.nationwide.contains(&kind))
    }

    pub(crate) fn has_kind(&self, country: &str, region: &str, kind: HolidayKind) -> bool {
        self.countries
            .get(country)
            .and_then(|d| d.kinds.get(region))
            .is_some_and(|kinds| kinds.contains(&kind))
    }

    /// Countries with any holiday on this date
    pub(crate) fn countries(&self) -> impl Iterator<Item = (&str, &Coverage)> + '_ {
        self.countries
            .iter()
            .map(|(code, day)| (code.as_str(), &day.coverage))
    }

    fn day_mut(&mut self, country: &str) -> &mut CountryDay {
        self.countries.entry(String::from(country)).or_default()
    }
}
