use super::source::{CountryRecord, SubdivisionRecord};
use crate::error::HolidayError;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Display names keyed by language code, in the order the source listed
/// them
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Names(Vec<(String, String)>);

impl Names {
    pub(crate) fn new() -> Names {
        Names::default()
    }

    pub(crate) fn with(mut self, language: &str, text: &str) -> Names {
        self.insert(language, text);
        self
    }

    /// Sets the name in `language`, keeping its original position if the
    /// language is already present
    pub(crate) fn insert(&mut self, language: &str, text: &str) {
        let language = language.to_ascii_uppercase();
        match self.0.iter_mut().find(|(lang, _)| *lang == language) {
            Some((_, name)) => *name = String::from(text),
            None => self.0.push((language, String::from(text))),
        }
    }

    /// Returns the name in `language`, falling back to the first name listed
    pub(crate) fn get(&self, language: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(lang, _)| lang.eq_ignore_ascii_case(language))
            .or_else(|| self.0.first())
            .map(|(_, name)| name.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Country {
    pub(crate) code: String,
    pub(crate) names: Names,
}

impl Country {
    pub(crate) fn display_name(&self, language: &str) -> &str {
        self.names.get(language).unwrap_or(&self.code)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Region {
    pub(crate) code: String,
    pub(crate) names: Names,
    pub(crate) parent: Option<String>,
    pub(crate) children: Vec<String>,
}

impl Region {
    pub(crate) fn display_name(&self, language: &str) -> &str {
        self.names.get(language).unwrap_or(&self.code)
    }
}

/// Anything that can occupy a labelled row of the grid
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Entity<'a> {
    Country(&'a Country),
    Region(&'a Region),
}

impl<'a> Entity<'a> {
    pub(crate) fn code(&self) -> &'a str {
        match *self {
            Entity::Country(c) => &c.code,
            Entity::Region(r) => &r.code,
        }
    }

    pub(crate) fn display_name(&self, language: &str) -> &'a str {
        match *self {
            Entity::Country(c) => c.display_name(language),
            Entity::Region(r) => r.display_name(language),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct CountryRegions {
    country: Country,
    regions: HashMap<String, Region>,
}

/// Countries of interest together with every one of their subdivisions,
/// flattened so that nested regions can be found by code directly
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct SubdivisionRegistry {
    countries: BTreeMap<String, CountryRegions>,
}

impl SubdivisionRegistry {
    pub(crate) fn new() -> SubdivisionRegistry {
        SubdivisionRegistry::default()
    }

    pub(crate) fn insert(&mut self, country: CountryRecord, tree: Vec<SubdivisionRecord>) {
        let mut regions = HashMap::new();
        flatten(&country.iso_code, None, tree, &mut regions);
        let code = country.iso_code.clone();
        self.countries.insert(
            code,
            CountryRegions {
                country: Country {
                    code: country.iso_code,
                    names: country.names,
                },
                regions,
            },
        );
    }

    pub(crate) fn contains(&self, country: &str) -> bool {
        self.countries.contains_key(country)
    }

    pub(crate) fn country(&self, code: &str) -> Result<&Country, HolidayError> {
        self.entry(code).map(|e| &e.country)
    }

    pub(crate) fn countries(&self) -> impl Iterator<Item = &Country> + '_ {
        self.countries.values().map(|e| &e.country)
    }

    /// Countries sorted by their display name in `language`
    pub(crate) fn countries_by_name(&self, language: &str) -> Vec<&Country> {
        let mut countries = self.countries().collect::<Vec<_>>();
        countries.sort_by(|a, b| {
            collate(a.display_name(language), b.display_name(language))
                .then_with(|| a.code.cmp(&b.code))
        });
        countries
    }

    pub(crate) fn region(&self, country: &str, code: &str) -> Result<&Region, HolidayError> {
        self.entry(country)?
            .regions
            .get(code)
            .ok_or_else(|| HolidayError::UnknownRegion {
                country: String::from(country),
                region: String::from(code),
            })
    }

    /// Every region of the country at any depth, sorted by display name in
    /// `language`
    pub(crate) fn regions_of(
        &self,
        country: &str,
        language: &str,
    ) -> Result<Vec<&Region>, HolidayError> {
        let mut regions = self.entry(country)?.regions.values().collect::<Vec<_>>();
        regions.sort_by(|a, b| {
            collate(a.display_name(language), b.display_name(language))
                .then_with(|| a.code.cmp(&b.code))
        });
        Ok(regions)
    }

    pub(crate) fn region_codes(
        &self,
        country: &str,
    ) -> Result<impl Iterator<Item = &str> + '_, HolidayError> {
        Ok(self.entry(country)?.regions.keys().map(String::as_str))
    }

    /// Number of regions used as the denominator of coverage percentages.  A
    /// country without subdivisions counts as a single unit.
    pub(crate) fn count(&self, country: &str) -> Result<u32, HolidayError> {
        let n = self.entry(country)?.regions.len();
        Ok(u32::try_from(n).unwrap_or(u32::MAX).max(1))
    }

    fn entry(&self, country: &str) -> Result<&CountryRegions, HolidayError> {
        self.countries
            .get(country)
            .ok_or_else(|| HolidayError::UnknownCountry {
                country: String::from(country),
            })
    }
}

fn flatten(
    country: &str,
    parent: Option<&str>,
    tree: Vec<SubdivisionRecord>,
    out: &mut HashMap<String, Region>,
) {
    for node in tree {
        let children = node.children.iter().map(|c| c.code.clone()).collect();
        flatten(country, Some(&node.code), node.children, out);
        let code = node.code.clone();
        let region = Region {
            code: node.code,
            names: node.names,
            parent: parent.map(String::from),
            children,
        };
        if out.insert(code, region).is_some() {
            warn!(
                country = %country,
                "Duplicate subdivision code in registry; keeping the last one"
            );
        }
    }
}

// Case-insensitive, with ties broken by byte order
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
