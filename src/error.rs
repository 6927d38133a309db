use thiserror::Error;
use time::Date;

/// Failures raised while building a year's holiday coverage.  Any of these
/// aborts aggregation; a partially-populated index is never rendered.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum HolidayError {
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: Date, end: Date },

    #[error("year {year} is outside the supported calendar range")]
    InvalidYear { year: i32 },

    #[error("unknown country code {country:?}")]
    UnknownCountry { country: String },

    #[error("unknown subdivision {region:?} for country {country:?}")]
    UnknownRegion { country: String, region: String },

    /// The interval claimed to be nationwide while also naming subdivisions,
    /// or named neither
    #[error("holiday in {country} from {start} to {end} must be either nationwide or limited to subdivisions")]
    AmbiguousCoverageDescriptor {
        country: String,
        start: Date,
        end: Date,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_display() {
        let err = HolidayError::InvalidRange {
            start: date!(2024 - 03 - 02),
            end: date!(2024 - 03 - 01),
        };
        assert_eq!(
            err.to_string(),
            "invalid date range: 2024-03-02 is after 2024-03-01"
        );
        let err = HolidayError::UnknownRegion {
            country: String::from("DE"),
            region: String::from("DE-XX"),
        };
        assert_eq!(
            err.to_string(),
            r#"unknown subdivision "DE-XX" for country "DE""#
        );
    }
}
