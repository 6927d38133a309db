//! Loading countries, subdivisions, and holidays from a JSON document shaped
//! like the responses of the OpenHolidays API.
use super::{HolidayKind, Names};
use crate::dates::TargetYear;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date};
use tracing::debug;

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CountryRecord {
    pub(crate) iso_code: String,
    pub(crate) names: Names,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SubdivisionRecord {
    pub(crate) code: String,
    pub(crate) names: Names,
    pub(crate) children: Vec<SubdivisionRecord>,
}

/// A holiday as delivered by a source, before validation
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HolidayRecord {
    pub(crate) kind: HolidayKind,
    pub(crate) start: Date,
    pub(crate) end: Date,
    pub(crate) nationwide: bool,
    pub(crate) subdivisions: BTreeSet<String>,
}

/// Where holiday data comes from.  Countries and subdivisions must be fetched
/// before any holidays, as resolving a holiday's subdivision codes requires
/// the region tree.
pub(crate) trait HolidaySource {
    fn fetch_countries(&self) -> Result<Vec<CountryRecord>, SourceError>;

    fn fetch_subdivisions(&self, country: &str) -> Result<Vec<SubdivisionRecord>, SourceError>;

    /// Returns the holidays of `kind` for `country` that overlap `year`, along
    /// with any whose start comes after their end
    fn fetch_holiday_intervals(
        &self,
        country: &str,
        year: TargetYear,
        kind: HolidayKind,
    ) -> Result<Vec<HolidayRecord>, SourceError>;
}

#[derive(Debug, Error)]
pub(crate) enum SourceError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse holiday data")]
    Json(#[from] serde_json::Error),
    #[error("invalid date {value:?} in holiday data")]
    Date {
        value: String,
        source: time::error::Parse,
    },
}

/// Holiday data held in a single JSON document
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct JsonDataset(Document);

impl JsonDataset {
    pub(crate) fn open<P: AsRef<Path>>(path: P) -> Result<JsonDataset, SourceError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_owned(),
            source,
        })?;
        JsonDataset::from_json(&src)
    }

    pub(crate) fn from_json(src: &str) -> Result<JsonDataset, SourceError> {
        Ok(JsonDataset(serde_json::from_str(src)?))
    }
}

impl HolidaySource for JsonDataset {
    fn fetch_countries(&self) -> Result<Vec<CountryRecord>, SourceError> {
        Ok(self
            .0
            .countries
            .iter()
            .map(|c| CountryRecord {
                iso_code: c.iso_code.clone(),
                names: names(&c.name),
            })
            .collect())
    }

    fn fetch_subdivisions(&self, country: &str) -> Result<Vec<SubdivisionRecord>, SourceError> {
        Ok(self
            .0
            .subdivisions
            .get(country)
            .map(|tree| tree.iter().map(SubdivisionJson::to_record).collect())
            .unwrap_or_default())
    }

    fn fetch_holiday_intervals(
        &self,
        country: &str,
        year: TargetYear,
        kind: HolidayKind,
    ) -> Result<Vec<HolidayRecord>, SourceError> {
        let listing = match kind {
            HolidayKind::Public => &self.0.public_holidays,
            HolidayKind::School => &self.0.school_holidays,
        };
        let mut records = Vec::new();
        for holiday in listing.get(country).into_iter().flatten() {
            let Some(kind) = classify(&holiday.holiday_type) else {
                debug!(
                    country = %country,
                    holiday_type = %holiday.holiday_type,
                    "Skipping holiday of unsupported type"
                );
                continue;
            };
            let start = parse_date(&holiday.start_date)?;
            let end = parse_date(&holiday.end_date)?;
            // Reversed ranges are passed on to be rejected at ingestion
            if start <= end && (end < year.first_day() || start > year.last_day()) {
                continue;
            }
            records.push(HolidayRecord {
                kind,
                start,
                end,
                nationwide: holiday.nationwide,
                subdivisions: holiday.subdivisions.iter().map(|s| s.code.clone()).collect(),
            });
        }
        Ok(records)
    }
}

fn classify(holiday_type: &str) -> Option<HolidayKind> {
    match holiday_type {
        "Public" | "Bank" => Some(HolidayKind::Public),
        "School" | "BackToSchool" | "EndOfLessons" => Some(HolidayKind::School),
        _ => None,
    }
}

fn parse_date(value: &str) -> Result<Date, SourceError> {
    Date::parse(value, &YMD_FMT).map_err(|source| SourceError::Date {
        value: String::from(value),
        source,
    })
}

fn names(texts: &[LocalizedText]) -> Names {
    let mut names = Names::new();
    for t in texts {
        names.insert(&t.language, &t.text);
    }
    names
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Document {
    countries: Vec<CountryJson>,
    #[serde(default)]
    subdivisions: BTreeMap<String, Vec<SubdivisionJson>>,
    #[serde(default)]
    public_holidays: BTreeMap<String, Vec<HolidayJson>>,
    #[serde(default)]
    school_holidays: BTreeMap<String, Vec<HolidayJson>>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct LocalizedText {
    language: String,
    text: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
struct CountryJson {
    iso_code: String,
    #[serde(default)]
    name: Vec<LocalizedText>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct SubdivisionJson {
    code: String,
    #[serde(default)]
    name: Vec<LocalizedText>,
    #[serde(default)]
    children: Vec<SubdivisionJson>,
}

impl SubdivisionJson {
    fn to_record(&self) -> SubdivisionRecord {
        SubdivisionRecord {
            code: self.code.clone(),
            names: names(&self.name),
            children: self.children.iter().map(SubdivisionJson::to_record).collect(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
struct HolidayJson {
    start_date: String,
    end_date: String,
    #[serde(default)]
    nationwide: bool,
    #[serde(default)]
    subdivisions: Vec<SubdivisionRef>,
    #[serde(rename = "type")]
    holiday_type: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct SubdivisionRef {
    code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    static SAMPLE: &str = r#"{
        "countries": [
            {"isoCode": "DE", "name": [{"language": "DE", "text": "Deutschland"}, {"language": "EN", "text": "Germany"}]}
        ],
        "subdivisions": {
            "DE": [
                {"code": "DE-NI", "name": [{"language": "DE", "text": "Niedersachsen"}], "children": []},
                {"code": "DE-BY", "name": [{"language": "DE", "text": "Bayern"}],
                 "children": [{"code": "DE-BY-AU", "name": [{"language": "DE", "text": "Augsburg"}]}]}
            ]
        },
        "publicHolidays": {
            "DE": [
                {"id": "x", "startDate": "2024-01-01", "endDate": "2024-01-01", "nationwide": true, "type": "Public"},
                {"startDate": "2024-08-08", "endDate": "2024-08-08", "nationwide": false,
                 "subdivisions": [{"code": "DE-BY-AU", "shortName": "AU"}], "type": "Public"},
                {"startDate": "2024-12-24", "endDate": "2024-12-24", "nationwide": true, "type": "Optional"},
                {"startDate": "2023-12-25", "endDate": "2023-12-25", "nationwide": true, "type": "Public"}
            ]
        },
        "schoolHolidays": {
            "DE": [
                {"startDate": "2023-12-27", "endDate": "2024-01-05", "nationwide": false,
                 "subdivisions": [{"code": "DE-NI"}], "type": "School"}
            ]
        }
    }"#;

    #[test]
    fn test_countries() {
        let data = JsonDataset::from_json(SAMPLE).unwrap();
        let countries = data.fetch_countries().unwrap();
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].iso_code, "DE");
        assert_eq!(countries[0].names.get("en"), Some("Germany"));
    }

    #[test]
    fn test_subdivision_tree() {
        let data = JsonDataset::from_json(SAMPLE).unwrap();
        let tree = data.fetch_subdivisions("DE").unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].children.len(), 1);
        assert_eq!(tree[1].children[0].code, "DE-BY-AU");
        assert!(data.fetch_subdivisions("AT").unwrap().is_empty());
    }

    #[test]
    fn test_public_holidays() {
        let data = JsonDataset::from_json(SAMPLE).unwrap();
        let year = TargetYear::new(2024).unwrap();
        let records = data
            .fetch_holiday_intervals("DE", year, HolidayKind::Public)
            .unwrap();
        // The optional holiday and the one from 2023 are dropped
        assert_eq!(records.len(), 2);
        assert!(records[0].nationwide);
        assert!(records[0].subdivisions.is_empty());
        assert_eq!(
            records[1].subdivisions.iter().collect::<Vec<_>>(),
            ["DE-BY-AU"]
        );
    }

    #[test]
    fn test_school_holidays_overlapping_year() {
        let data = JsonDataset::from_json(SAMPLE).unwrap();
        let year = TargetYear::new(2024).unwrap();
        let records = data
            .fetch_holiday_intervals("DE", year, HolidayKind::School)
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, HolidayKind::School);
        assert_eq!(records[0].start, date!(2023 - 12 - 27));
        assert_eq!(records[0].end, date!(2024 - 01 - 05));
    }

    #[test]
    fn test_bad_date() {
        let data = JsonDataset::from_json(
            r#"{"countries": [], "publicHolidays": {"DE": [
                {"startDate": "2024-13-01", "endDate": "2024-13-01", "nationwide": true, "type": "Public"}
            ]}}"#,
        )
        .unwrap();
        let year = TargetYear::new(2024).unwrap();
        let r = data.fetch_holiday_intervals("DE", year, HolidayKind::Public);
        assert!(matches!(r, Err(SourceError::Date { value, .. }) if value == "2024-13-01"));
    }

    #[test]
    fn test_reversed_range_kept() {
        let data = JsonDataset::from_json(
            r#"{"countries": [], "publicHolidays": {"DE": [
                {"startDate": "2025-01-03", "endDate": "2024-12-30", "nationwide": true, "type": "Public"},
                {"startDate": "2023-05-02", "endDate": "2023-05-01", "nationwide": true, "type": "Public"}
            ]}}"#,
        )
        .unwrap();
        let year = TargetYear::new(2024).unwrap();
        let records = data
            .fetch_holiday_intervals("DE", year, HolidayKind::Public)
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].start, date!(2025 - 01 - 03));
        assert_eq!(records[0].end, date!(2024 - 12 - 30));
        assert_eq!(records[1].start, date!(2023 - 05 - 02));
    }
}
