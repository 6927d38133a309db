use super::style::CellStyle;
use super::{CellRange, Col, Row};
use std::collections::BTreeMap;

/// Handle to a style registered with a [`TabularSink`]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct StyleId(usize);

/// Destination for a rendered grid, shaped after a spreadsheet writer:
/// formats are registered once and then referred to by handle.
pub(crate) trait TabularSink {
    fn add_style(&mut self, style: &CellStyle) -> StyleId;

    /// Replaces the cell's text and style wholesale
    fn write_cell(&mut self, row: Row, col: Col, text: &str, style: StyleId);

    fn merge_range(&mut self, range: CellRange, text: &str, style: StyleId);

    fn set_column_width(&mut self, col: Col, width: u16);

    /// Keeps the rows above `row` and the columns left of `col` in place
    /// while scrolling
    fn freeze_header(&mut self, row: Row, col: Col);
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SheetCell {
    pub(crate) text: String,
    pub(crate) style: StyleId,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Merge {
    pub(crate) range: CellRange,
    pub(crate) text: String,
    pub(crate) style: StyleId,
}

/// In-memory worksheet
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Sheet {
    styles: Vec<CellStyle>,
    cells: BTreeMap<(Row, Col), SheetCell>,
    merges: Vec<Merge>,
    widths: BTreeMap<Col, u16>,
    frozen: (Row, Col),
    writes: usize,
}

impl Sheet {
    pub(crate) const DEFAULT_COLUMN_WIDTH: u16 = 8;

    pub(crate) fn new() -> Sheet {
        Sheet::default()
    }

    pub(crate) fn cell(&self, row: Row, col: Col) -> Option<&SheetCell> {
        self.cells.get(&(row, col))
    }

    pub(crate) fn style(&self, id: StyleId) -> Option<&CellStyle> {
        self.styles.get(id.0)
    }

    pub(crate) fn style_count(&self) -> usize {
        self.styles.len()
    }

    /// Number of `write_cell` calls received so far
    pub(crate) fn write_count(&self) -> usize {
        self.writes
    }

    pub(crate) fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// The most recently merged range containing the cell
    pub(crate) fn merge_at(&self, row: Row, col: Col) -> Option<&Merge> {
        self.merges.iter().rev().find(|m| m.range.contains(row, col))
    }

    pub(crate) fn column_width(&self, col: Col) -> u16 {
        self.widths
            .get(&col)
            .copied()
            .unwrap_or(Sheet::DEFAULT_COLUMN_WIDTH)
    }

    pub(crate) fn frozen(&self) -> (Row, Col) {
        self.frozen
    }

    /// Number of rows containing any written or merged cell
    pub(crate) fn row_count(&self) -> Row {
        let cells = self.cells.keys().map(|&(r, _)| r);
        let merges = self.merges.iter().map(|m| m.range.last_row);
        cells.chain(merges).max().map_or(0, |r| r.saturating_add(1))
    }

    /// Number of columns containing any written or merged cell
    pub(crate) fn col_count(&self) -> Col {
        let cells = self.cells.keys().map(|&(_, c)| c);
        let merges = self.merges.iter().map(|m| m.range.last_col);
        cells.chain(merges).max().map_or(0, |c| c.saturating_add(1))
    }

    /// Text shown at a position: a merged range shows its text in its top
    /// left cell only
    pub(crate) fn text_at(&self, row: Row, col: Col) -> &str {
        match self.merge_at(row, col) {
            Some(m) if (m.range.first_row, m.range.first_col) == (row, col) => &m.text,
            Some(_) => "",
            None => self.cell(row, col).map_or("", |c| c.text.as_str()),
        }
    }

    /// Style in effect at a position, taking merged ranges into account
    pub(crate) fn style_at(&self, row: Row, col: Col) -> Option<&CellStyle> {
        let id = match self.merge_at(row, col) {
            Some(m) => m.style,
            None => self.cell(row, col)?.style,
        };
        self.style(id)
    }
}

impl TabularSink for Sheet {
    fn add_style(&mut self, style: &CellStyle) -> StyleId {
        self.styles.push(style.clone());
        StyleId(self.styles.len() - 1)
    }

    fn write_cell(&mut self, row: Row, col: Col, text: &str, style: StyleId) {
        self.writes += 1;
        self.cells.insert(
            (row, col),
            SheetCell {
                text: String::from(text),
                style,
            },
        );
    }

    fn merge_range(&mut self, range: CellRange, text: &str, style: StyleId) {
        self.merges.push(Merge {
            range,
            text: String::from(text),
            style,
        });
    }

    fn set_column_width(&mut self, col: Col, width: u16) {
        self.widths.insert(col, width);
    }

    fn freeze_header(&mut self, row: Row, col: Col) {
        self.frozen = (row, col);
    }
}
