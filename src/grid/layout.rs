//! Assigning rows and columns to regions and dates.  Nothing in here knows
//! about styles or holidays.
use super::{CellRange, Col, GridSize, Row};
use crate::dates::{day_of_year, TargetYear};
use crate::error::HolidayError;
use crate::holidays::{Country, Entity, SubdivisionRegistry};
use serde::Deserialize;
use time::{Date, Month, Weekday};

/// Columns to the left of the first day in the strip layout
pub(crate) const LABEL_COLUMNS: Col = 1;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum LayoutMode {
    /// One row per region and one column per day
    #[default]
    Strip,
    /// Three columns per month and one row per day of the month
    MonthGrid,
}

impl LayoutMode {
    /// Leftmost column showing `date`
    pub(crate) fn date_column(self, date: Date) -> Col {
        match self {
            LayoutMode::Strip => strip_column(date),
            LayoutMode::MonthGrid => MonthGridLayout::week_col(date.month()),
        }
    }

    /// Columns to scroll by for a week in the strip or a month in the grid
    pub(crate) fn page_columns(self) -> Col {
        match self {
            LayoutMode::Strip => 7,
            LayoutMode::MonthGrid => MonthGridLayout::COLUMNS_PER_MONTH,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            LayoutMode::Strip => "year strip",
            LayoutMode::MonthGrid => "month grid",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum HeaderRow<'a> {
    MonthNames,
    WeekNumbers,
    DayNumbers,
    /// Number of the country's regions on holiday, per day
    Count(&'a Country),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RowEntry<'a> {
    Header(HeaderRow<'a>),
    /// A region of the primary country, or the primary country itself if it
    /// has no regions
    Primary(Entity<'a>),
    Separator,
    /// Summary row for a country other than the primary one
    Foreign(&'a Country),
}

/// Row assignment for the strip layout.  The header block comes first, then
/// the primary country's regions sorted by name, then a blank row, then one
/// row per other country sorted by name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RowLayout<'a> {
    primary: &'a Country,
    entries: Vec<RowEntry<'a>>,
    header_rows: Row,
}

impl<'a> RowLayout<'a> {
    pub(crate) const MONTH_NAMES_ROW: Row = 0;
    pub(crate) const WEEK_NUMBERS_ROW: Row = 1;
    pub(crate) const DAY_NUMBERS_ROW: Row = 2;

    pub(crate) fn strip(
        registry: &'a SubdivisionRegistry,
        primary: &str,
        count_rows: &[String],
        language: &str,
    ) -> Result<RowLayout<'a>, HolidayError> {
        let primary = registry.country(primary)?;
        let mut entries = vec![
            RowEntry::Header(HeaderRow::MonthNames),
            RowEntry::Header(HeaderRow::WeekNumbers),
            RowEntry::Header(HeaderRow::DayNumbers),
        ];
        for code in count_rows {
            entries.push(RowEntry::Header(HeaderRow::Count(registry.country(code)?)));
        }
        let header_rows = Row::try_from(entries.len()).unwrap_or(Row::MAX);
        let regions = registry.regions_of(&primary.code, language)?;
        if regions.is_empty() {
            entries.push(RowEntry::Primary(Entity::Country(primary)));
        } else {
            entries.extend(regions.into_iter().map(|r| RowEntry::Primary(Entity::Region(r))));
        }
        let foreign = registry
            .countries_by_name(language)
            .into_iter()
            .filter(|c| c.code != primary.code)
            .collect::<Vec<_>>();
        if !foreign.is_empty() {
            entries.push(RowEntry::Separator);
            entries.extend(foreign.into_iter().map(RowEntry::Foreign));
        }
        Ok(RowLayout {
            primary,
            entries,
            header_rows,
        })
    }

    pub(crate) fn primary(&self) -> &'a Country {
        self.primary
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (Row, RowEntry<'a>)> + '_ {
        std::iter::zip(0.., self.entries.iter().copied())
    }

    /// Rows of the primary country's regions
    pub(crate) fn primary_rows(&self) -> impl Iterator<Item = (Row, Entity<'a>)> + '_ {
        self.entries().filter_map(|(row, e)| match e {
            RowEntry::Primary(entity) => Some((row, entity)),
            _ => None,
        })
    }

    pub(crate) fn foreign_rows(&self) -> impl Iterator<Item = (Row, &'a Country)> + '_ {
        self.entries().filter_map(|(row, e)| match e {
            RowEntry::Foreign(country) => Some((row, country)),
            _ => None,
        })
    }

    pub(crate) fn count_rows(&self) -> impl Iterator<Item = (Row, &'a Country)> + '_ {
        self.entries().filter_map(|(row, e)| match e {
            RowEntry::Header(HeaderRow::Count(country)) => Some((row, country)),
            _ => None,
        })
    }

    /// Every row labelled with a region or country
    pub(crate) fn labelled_rows(&self) -> impl Iterator<Item = (Row, Entity<'a>)> + '_ {
        self.entries().filter_map(|(row, e)| match e {
            RowEntry::Primary(entity) => Some((row, entity)),
            RowEntry::Foreign(country) => Some((row, Entity::Country(country))),
            _ => None,
        })
    }

    pub(crate) fn header_rows(&self) -> Row {
        self.header_rows
    }

    pub(crate) fn row_count(&self) -> Row {
        Row::try_from(self.entries.len()).unwrap_or(Row::MAX)
    }

    pub(crate) fn size(&self, year: TargetYear) -> GridSize {
        GridSize::new(self.row_count(), LABEL_COLUMNS + year.day_count())
    }
}

/// Column of `date` in the strip layout
pub(crate) fn strip_column(date: Date) -> Col {
    LABEL_COLUMNS + day_of_year(date) - 1
}

/// Header cells covering one month in the strip layout
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthBand {
    pub(crate) month: Month,
    pub(crate) range: CellRange,
}

pub(crate) fn month_bands(year: TargetYear, row: Row) -> Vec<MonthBand> {
    year.months()
        .into_iter()
        .map(|span| MonthBand {
            month: span.month,
            range: CellRange::row_span(row, strip_column(span.start), strip_column(span.end)),
        })
        .collect()
}

/// Header cells covering the part of one ISO week within the year
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct WeekBand {
    pub(crate) week: u8,
    pub(crate) range: CellRange,
}

/// Week number banding over the previous, target, and next ISO years, each
/// week clamped to the target year's columns
pub(crate) fn week_bands(year: TargetYear, row: Row) -> Vec<WeekBand> {
    year.week_spans()
        .into_iter()
        .map(|span| WeekBand {
            week: span.week,
            range: CellRange::row_span(row, strip_column(span.start), strip_column(span.end)),
        })
        .collect()
}

/// Coordinates of the cells showing one date in the month-grid layout
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthCell {
    pub(crate) row: Row,
    /// Week number, shaded by the secondary country's coverage
    pub(crate) week_col: Col,
    /// Day number, shaded by the primary country's coverage
    pub(crate) day_col: Col,
    /// Free field, marked on nationwide holidays of the primary country
    pub(crate) field_col: Col,
}

/// Twelve side-by-side month columns.  Each month's rows are shifted down by
/// the weekday of its first day, so that equal weekdays share a row across
/// months whose first days fall on the same weekday.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthGridLayout;

impl MonthGridLayout {
    pub(crate) const MONTH_NAMES_ROW: Row = 0;
    pub(crate) const DESCRIPTION_ROW: Row = 1;
    pub(crate) const HEADER_ROWS: Row = 2;
    pub(crate) const COLUMNS_PER_MONTH: Col = 3;
    // Up to six days of offset plus 31 days
    const DAY_ROWS: Row = 6 + 31;

    pub(crate) fn size() -> GridSize {
        GridSize::new(
            MonthGridLayout::HEADER_ROWS + MonthGridLayout::DAY_ROWS,
            MonthGridLayout::COLUMNS_PER_MONTH * 12,
        )
    }

    pub(crate) fn week_col(month: Month) -> Col {
        MonthGridLayout::COLUMNS_PER_MONTH * (Col::from(u8::from(month)) - 1)
    }

    /// The columns of a month's banner
    pub(crate) fn month_range(month: Month) -> CellRange {
        let first = MonthGridLayout::week_col(month);
        CellRange::row_span(
            MonthGridLayout::MONTH_NAMES_ROW,
            first,
            first + MonthGridLayout::COLUMNS_PER_MONTH - 1,
        )
    }

    pub(crate) fn cell(date: Date) -> MonthCell {
        let week_col = MonthGridLayout::week_col(date.month());
        MonthCell {
            row: MonthGridLayout::HEADER_ROWS
                + Row::from(first_weekday_offset(date))
                + Row::from(date.day())
                - 1,
            week_col,
            day_col: week_col + 1,
            field_col: week_col + 2,
        }
    }
}

/// Days from Monday to the weekday of the first of `date`'s month
fn first_weekday_offset(date: Date) -> u8 {
    let weekday = date.weekday().number_days_from_monday();
    (weekday + 7 - (date.day() - 1) % 7) % 7
}

/// Whether the month-grid shows the week number on this date
pub(crate) fn starts_week_label(date: Date) -> bool {
    date.weekday() == Weekday::Monday || date.day() == 1
}
