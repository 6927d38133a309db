//! The year as a single strip: one column per day, one row per region
use super::compose::{Accumulator, CellUpdate, CellWriter, ComposeMode, ImmediateWriter};
use super::layout::{month_bands, strip_column, week_bands, RowLayout, LABEL_COLUMNS};
use super::palette::{shade, Theme};
use super::sink::TabularSink;
use super::style::{CellStyle, Side};
use super::RenderError;
use crate::dates::is_weekend;
use crate::holidays::{HolidayKind, YearCoverageIndex};
use tracing::info;

const DAY_COLUMN_WIDTH: u16 = 3;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct StripOptions {
    pub(crate) primary: String,
    /// Countries given a coverage-count row in the header
    pub(crate) count_rows: Vec<String>,
    pub(crate) language: String,
    pub(crate) theme: Theme,
}

pub(crate) fn render_strip<S: TabularSink>(
    index: &YearCoverageIndex,
    opts: &StripOptions,
    mode: ComposeMode,
    sink: &mut S,
) -> Result<(), RenderError> {
    let layout = RowLayout::strip(
        index.registry(),
        &opts.primary,
        &opts.count_rows,
        &opts.language,
    )?;
    let size = layout.size(index.year());
    match mode {
        ComposeMode::Immediate => {
            let mut writer = ImmediateWriter::new(sink, size);
            paint(&mut writer, index, &layout, opts)?;
        }
        ComposeMode::Accumulate => {
            let mut acc = Accumulator::new(size);
            paint(&mut acc, index, &layout, opts)?;
            acc.commit(sink);
        }
    }
    info!(
        rows = size.rows,
        cols = size.cols,
        mode = ?mode,
        "Rendered year strip"
    );
    Ok(())
}

// Public holidays are painted after school holidays so that they win where
// both fall on the same cell.
fn paint<W: CellWriter>(
    w: &mut W,
    index: &YearCoverageIndex,
    layout: &RowLayout<'_>,
    opts: &StripOptions,
) -> Result<(), RenderError> {
    let year = index.year();
    let theme = &opts.theme;
    let primary = layout.primary().code.as_str();

    // Labels
    let mut label_width = 0;
    for (row, entity) in layout.labelled_rows() {
        let name = entity.display_name(&opts.language);
        label_width = label_width.max(name.chars().count());
        w.paint(row, 0, CellUpdate::text(name, CellStyle::new()))?;
    }
    for (row, country) in layout.count_rows() {
        let name = country.display_name(&opts.language);
        label_width = label_width.max(name.chars().count());
        w.paint(row, 0, CellUpdate::text(name, CellStyle::new().bold()))?;
    }

    // School holidays
    for day in index.days() {
        let col = strip_column(day.date());
        for (row, entity) in layout.primary_rows() {
            if day.has_kind(primary, entity.code(), HolidayKind::School) {
                w.paint(row, col, CellUpdate::styled(theme.school()))?;
            }
        }
    }

    // Month names
    for band in month_bands(year, RowLayout::MONTH_NAMES_ROW) {
        w.merge(band.range, &band.month.to_string(), theme.banner())?;
    }

    // Day numbers, shading weekends down the whole column
    let day_row = RowLayout::DAY_NUMBERS_ROW;
    for date in year.days() {
        let col = strip_column(date);
        let mut style = CellStyle::new().border(Side::Bottom, true).centered();
        if is_weekend(date) {
            style = style.fill(theme.weekend);
            for (row, _) in layout.labelled_rows() {
                w.paint(row, col, CellUpdate::clear(theme.weekend()))?;
            }
        }
        w.paint(day_row, col, CellUpdate::text(date.day().to_string(), style))?;
    }

    // Week numbers
    for band in week_bands(year, RowLayout::WEEK_NUMBERS_ROW) {
        w.span(band.range, &band.week.to_string(), theme.banner())?;
    }

    // Public holidays in the primary country, coverage shades elsewhere
    for day in index.days() {
        let col = strip_column(day.date());
        let nationwide = day.is_nationwide(primary, HolidayKind::Public);
        for (row, entity) in layout.primary_rows() {
            if day.has_kind(primary, entity.code(), HolidayKind::Public) {
                let style = if nationwide {
                    theme.national()
                } else {
                    theme.public()
                };
                w.paint(row, col, CellUpdate::styled(style))?;
            }
        }
        for (row, country) in layout.foreign_rows() {
            if day.coverage(&country.code).is_some() {
                let pct = index.coverage_percentage(&country.code, day.date())?;
                w.paint(row, col, CellUpdate::styled(shade(pct)))?;
            }
        }
    }

    // Coverage counts
    for (row, country) in layout.count_rows() {
        for date in year.days() {
            let count = index.coverage_count(&country.code, date)?;
            let pct = index.coverage_percentage(&country.code, date)?;
            w.paint(
                row,
                strip_column(date),
                CellUpdate::text(count.to_string(), shade(pct).centered()),
            )?;
        }
    }

    let label_width = u16::try_from(label_width).unwrap_or(u16::MAX);
    w.column_width(0, label_width.saturating_add(1))?;
    for date in year.days() {
        w.column_width(strip_column(date), DAY_COLUMN_WIDTH)?;
    }
    w.freeze(layout.header_rows(), LABEL_COLUMNS)?;
    Ok(())
}
