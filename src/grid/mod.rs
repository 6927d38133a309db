//! Laying the coverage index out on a grid of styled cells and committing it
//! to a tabular sink
mod compose;
mod layout;
mod month;
mod palette;
mod sink;
mod strip;
mod style;
#[cfg(test)]
mod testdata;
pub(crate) use self::compose::ComposeMode;
pub(crate) use self::layout::LayoutMode;
pub(crate) use self::month::{render_month_grid, MonthGridOptions};
pub(crate) use self::palette::Theme;
pub(crate) use self::sink::Sheet;
#[cfg(test)]
pub(crate) use self::sink::TabularSink;
pub(crate) use self::strip::{render_strip, StripOptions};
pub(crate) use self::style::{Align, CellStyle, Rgb, Side};
use thiserror::Error;

pub(crate) type Row = u16;

pub(crate) type Col = u16;

/// Number of rows and columns in a laid-out grid
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct GridSize {
    pub(crate) rows: Row,
    pub(crate) cols: Col,
}

impl GridSize {
    pub(crate) fn new(rows: Row, cols: Col) -> GridSize {
        GridSize { rows, cols }
    }

    pub(crate) fn check(&self, row: Row, col: Col) -> Result<(), LayoutOverflow> {
        if row < self.rows && col < self.cols {
            Ok(())
        } else {
            Err(LayoutOverflow {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub(crate) fn check_range(&self, range: CellRange) -> Result<(), LayoutOverflow> {
        self.check(range.first_row, range.first_col)?;
        self.check(range.last_row, range.last_col)
    }

    /// Position of a cell in a row-major arena of this size
    pub(crate) fn index(&self, row: Row, col: Col) -> Result<usize, LayoutOverflow> {
        self.check(row, col)?;
        Ok(usize::from(row) * usize::from(self.cols) + usize::from(col))
    }

    pub(crate) fn cell_count(&self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }
}

/// An inclusive rectangle of cells
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct CellRange {
    pub(crate) first_row: Row,
    pub(crate) last_row: Row,
    pub(crate) first_col: Col,
    pub(crate) last_col: Col,
}

impl CellRange {
    /// Builds the range spanning both corners, in whichever order they are
    /// given
    pub(crate) fn new(a: (Row, Col), b: (Row, Col)) -> CellRange {
        CellRange {
            first_row: a.0.min(b.0),
            last_row: a.0.max(b.0),
            first_col: a.1.min(b.1),
            last_col: a.1.max(b.1),
        }
    }

    pub(crate) fn row_span(row: Row, first_col: Col, last_col: Col) -> CellRange {
        CellRange::new((row, first_col), (row, last_col))
    }

    pub(crate) fn is_single(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }

    pub(crate) fn contains(&self, row: Row, col: Col) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }
}

/// A pass tried to touch a cell outside of the grid it laid out.  This is a
/// bug in the renderer, not in the data.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("cell ({row}, {col}) lies outside of the {rows}x{cols} grid")]
pub(crate) struct LayoutOverflow {
    pub(crate) row: Row,
    pub(crate) col: Col,
    pub(crate) rows: Row,
    pub(crate) cols: Col,
}

/// Everything a renderer can fail with
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum RenderError {
    #[error(transparent)]
    Layout(#[from] LayoutOverflow),
    #[error(transparent)]
    Holiday(#[from] crate::error::HolidayError),
}
