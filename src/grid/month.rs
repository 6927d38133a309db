//! The year as twelve month columns, each three cells wide
use super::compose::{Accumulator, CellUpdate, CellWriter, ComposeMode, ImmediateWriter};
use super::layout::{starts_week_label, MonthGridLayout};
use super::palette::{shade, Theme};
use super::sink::TabularSink;
use super::style::{CellStyle, Side};
use super::RenderError;
use crate::dates::{is_last_day_of_month, is_weekend, iso_week};
use crate::holidays::YearCoverageIndex;
use time::Weekday;
use tracing::info;

const NUMBER_COLUMN_WIDTH: u16 = 3;

const FIELD_COLUMN_WIDTH: u16 = 6;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGridOptions {
    pub(crate) primary: String,
    /// Country whose coverage shades the week number column
    pub(crate) secondary: Option<String>,
    pub(crate) theme: Theme,
}

pub(crate) fn render_month_grid<S: TabularSink>(
    index: &YearCoverageIndex,
    opts: &MonthGridOptions,
    mode: ComposeMode,
    sink: &mut S,
) -> Result<(), RenderError> {
    let registry = index.registry();
    registry.country(&opts.primary)?;
    if let Some(secondary) = &opts.secondary {
        registry.country(secondary)?;
    }
    let size = MonthGridLayout::size();
    match mode {
        ComposeMode::Immediate => {
            let mut writer = ImmediateWriter::new(sink, size);
            paint(&mut writer, index, opts)?;
        }
        ComposeMode::Accumulate => {
            let mut acc = Accumulator::new(size);
            paint(&mut acc, index, opts)?;
            acc.commit(sink);
        }
    }
    info!(
        primary = %opts.primary,
        secondary = opts.secondary.as_deref().unwrap_or("-"),
        mode = ?mode,
        "Rendered month grid"
    );
    Ok(())
}

fn paint<W: CellWriter>(
    w: &mut W,
    index: &YearCoverageIndex,
    opts: &MonthGridOptions,
) -> Result<(), RenderError> {
    let theme = &opts.theme;
    let year = index.year();

    // Month names and the country codes above each month
    let code_style = CellStyle::new().bold().centered();
    for span in year.months() {
        let range = MonthGridLayout::month_range(span.month);
        w.merge(range, &span.month.to_string(), theme.banner())?;
        let row = MonthGridLayout::DESCRIPTION_ROW;
        if let Some(secondary) = &opts.secondary {
            w.paint(
                row,
                range.first_col,
                CellUpdate::text(secondary.as_str(), code_style.clone()),
            )?;
        }
        w.paint(
            row,
            range.first_col + 1,
            CellUpdate::text(opts.primary.as_str(), code_style.clone()),
        )?;
    }

    // Day and week numbers with the borders that box in each week
    for date in year.days() {
        let cell = MonthGridLayout::cell(date);
        let mut base = CellStyle::new();
        if date.weekday() == Weekday::Sunday || is_last_day_of_month(date) {
            base = base.border(Side::Bottom, true);
        }
        if date.weekday() == Weekday::Saturday || date.day() == 1 {
            base = base.border(Side::Top, true);
        }
        if is_weekend(date) {
            base = base.fill(theme.weekend);
        }
        w.paint(
            cell.row,
            cell.day_col,
            CellUpdate::text(
                date.day().to_string(),
                base.clone().border(Side::Right, true),
            ),
        )?;
        let week_style = base
            .clone()
            .border(Side::Left, true)
            .border(Side::Right, false);
        let week = if starts_week_label(date) {
            let (_, week) = iso_week(date);
            CellUpdate::text(week.to_string(), week_style)
        } else {
            CellUpdate::styled(week_style)
        };
        w.paint(cell.row, cell.week_col, week)?;
        w.paint(
            cell.row,
            cell.field_col,
            CellUpdate::clear(base.border(Side::Left, true).border(Side::Right, true)),
        )?;
    }

    // Coverage shades: primary on the day number, secondary on the week
    // number
    for day in index.days() {
        let cell = MonthGridLayout::cell(day.date());
        if let Some(coverage) = day.coverage(&opts.primary) {
            let pct = index.coverage_percentage(&opts.primary, day.date())?;
            w.paint(cell.row, cell.day_col, CellUpdate::styled(shade(pct)))?;
            if coverage.is_total() {
                w.paint(cell.row, cell.field_col, CellUpdate::styled(theme.public()))?;
            }
        }
        if let Some(secondary) = &opts.secondary {
            if day.coverage(secondary).is_some() {
                let pct = index.coverage_percentage(secondary, day.date())?;
                w.paint(cell.row, cell.week_col, CellUpdate::styled(shade(pct)))?;
            }
        }
    }

    for span in year.months() {
        let range = MonthGridLayout::month_range(span.month);
        w.column_width(range.first_col, NUMBER_COLUMN_WIDTH)?;
        w.column_width(range.first_col + 1, NUMBER_COLUMN_WIDTH)?;
        w.column_width(range.last_col, FIELD_COLUMN_WIDTH)?;
    }
    w.freeze(MonthGridLayout::HEADER_ROWS, 0)?;
    Ok(())
}
