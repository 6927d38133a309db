use crate::grid::{Col, Row, Sheet};
use thiserror::Error;

/// Which part of a sheet is on screen.  The frozen header rows and label
/// columns are always shown; `top` and `left` are the first scrollable row
/// and column drawn after them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Viewport {
    frozen_rows: Row,
    frozen_cols: Col,
    rows: Row,
    cols: Col,
    top: Row,
    left: Col,
}

impl Viewport {
    pub(crate) fn new(sheet: &Sheet) -> Viewport {
        let (frozen_rows, frozen_cols) = sheet.frozen();
        Viewport {
            frozen_rows,
            frozen_cols,
            rows: sheet.row_count(),
            cols: sheet.col_count(),
            top: frozen_rows,
            left: frozen_cols,
        }
    }

    pub(crate) fn frozen(&self) -> (Row, Col) {
        (self.frozen_rows, self.frozen_cols)
    }

    pub(crate) fn top(&self) -> Row {
        self.top
    }

    pub(crate) fn left(&self) -> Col {
        self.left
    }

    pub(crate) fn scroll_right(&mut self, n: Col) -> Result<(), EdgeError> {
        let last = self.cols.saturating_sub(1).max(self.frozen_cols);
        if self.left >= last {
            return Err(EdgeError);
        }
        self.left = self.left.saturating_add(n).min(last);
        Ok(())
    }

    pub(crate) fn scroll_left(&mut self, n: Col) -> Result<(), EdgeError> {
        if self.left <= self.frozen_cols {
            return Err(EdgeError);
        }
        self.left = self.left.saturating_sub(n).max(self.frozen_cols);
        Ok(())
    }

    pub(crate) fn scroll_down(&mut self, n: Row) -> Result<(), EdgeError> {
        let last = self.rows.saturating_sub(1).max(self.frozen_rows);
        if self.top >= last {
            return Err(EdgeError);
        }
        self.top = self.top.saturating_add(n).min(last);
        Ok(())
    }

    pub(crate) fn scroll_up(&mut self, n: Row) -> Result<(), EdgeError> {
        if self.top <= self.frozen_rows {
            return Err(EdgeError);
        }
        self.top = self.top.saturating_sub(n).max(self.frozen_rows);
        Ok(())
    }

    pub(crate) fn home(&mut self) {
        self.left = self.frozen_cols;
    }

    /// Scrolls so that `col` is the first scrollable column shown
    pub(crate) fn jump_to_col(&mut self, col: Col) {
        let last = self.cols.saturating_sub(1).max(self.frozen_cols);
        self.left = col.clamp(self.frozen_cols, last);
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the edge of the sheet")]
pub(crate) struct EdgeError;
