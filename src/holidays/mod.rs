mod aggregate;
mod coverage;
mod regions;
mod source;
pub(crate) use self::aggregate::{aggregate_year, YearCoverageIndex};
pub(crate) use self::coverage::DateCoverage;
pub(crate) use self::regions::{Country, Entity, Names, SubdivisionRegistry};
pub(crate) use self::source::JsonDataset;
#[cfg(test)]
pub(crate) use self::{
    aggregate::HolidayAggregator,
    coverage::Coverage,
    source::{CountryRecord, SubdivisionRecord},
};
use crate::error::HolidayError;
use std::collections::BTreeSet;
use std::fmt;
use time::Date;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) enum HolidayKind {
    Public,
    School,
}

impl HolidayKind {
    pub(crate) const ALL: [HolidayKind; 2] = [HolidayKind::Public, HolidayKind::School];
}

impl fmt::Display for HolidayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HolidayKind::Public => write!(f, "public"),
            HolidayKind::School => write!(f, "school"),
        }
    }
}

/// Which regions of a country an interval applies to
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum CoverageDescriptor {
    Nationwide,
    // Invariant: never empty
    Regions(BTreeSet<String>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HolidayInterval {
    kind: HolidayKind,
    country: String,
    start: Date,
    end: Date,
    coverage: CoverageDescriptor,
}

impl HolidayInterval {
    /// Validates a raw holiday record.  Exactly one of `nationwide` or a
    /// non-empty `regions` set must be given, and `start` must not come after
    /// `end`.
    pub(crate) fn new(
        kind: HolidayKind,
        country: String,
        start: Date,
        end: Date,
        nationwide: bool,
        regions: BTreeSet<String>,
    ) -> Result<HolidayInterval, HolidayError> {
        if start > end {
            return Err(HolidayError::InvalidRange { start, end });
        }
        let coverage = match (nationwide, regions.is_empty()) {
            (true, true) => CoverageDescriptor::Nationwide,
            (false, false) => CoverageDescriptor::Regions(regions),
            _ => {
                return Err(HolidayError::AmbiguousCoverageDescriptor {
                    country,
                    start,
                    end,
                })
            }
        };
        Ok(HolidayInterval {
            kind,
            country,
            start,
            end,
            coverage,
        })
    }

    pub(crate) fn kind(&self) -> HolidayKind {
        self.kind
    }

    pub(crate) fn country(&self) -> &str {
        &self.country
    }

    pub(crate) fn start(&self) -> Date {
        self.start
    }

    pub(crate) fn end(&self) -> Date {
        self.end
    }

    pub(crate) fn coverage(&self) -> &CoverageDescriptor {
        &self.coverage
    }
}
