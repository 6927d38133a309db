//! Two ways of getting rendering passes onto a sink.
//!
//! [`ImmediateWriter`] forwards every paint straight to the sink, so a later
//! pass replaces whatever an earlier pass wrote at the same cell.
//! [`Accumulator`] folds all passes into a per-cell style map first and
//! writes each touched cell exactly once on [`Accumulator::commit`].
use super::sink::{StyleId, TabularSink};
use super::style::CellStyle;
use super::{CellRange, Col, GridSize, LayoutOverflow, Row};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ComposeMode {
    #[default]
    Immediate,
    Accumulate,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) enum TextUpdate {
    #[default]
    Keep,
    Set(String),
    Clear,
}

/// One pass's contribution to a single cell
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct CellUpdate {
    pub(crate) style: CellStyle,
    pub(crate) text: TextUpdate,
}

impl CellUpdate {
    pub(crate) fn styled(style: CellStyle) -> CellUpdate {
        CellUpdate {
            style,
            text: TextUpdate::Keep,
        }
    }

    /// Sets the text along with the style.  Empty text leaves earlier text
    /// alone; use [`CellUpdate::clear`] to blank a cell.
    pub(crate) fn text<S: Into<String>>(text: S, style: CellStyle) -> CellUpdate {
        let text = text.into();
        CellUpdate {
            style,
            text: if text.is_empty() {
                TextUpdate::Keep
            } else {
                TextUpdate::Set(text)
            },
        }
    }

    pub(crate) fn clear(style: CellStyle) -> CellUpdate {
        CellUpdate {
            style,
            text: TextUpdate::Clear,
        }
    }
}

/// What rendering passes draw through
pub(crate) trait CellWriter {
    fn paint(&mut self, row: Row, col: Col, update: CellUpdate) -> Result<(), LayoutOverflow>;

    fn merge(
        &mut self,
        range: CellRange,
        text: &str,
        style: CellStyle,
    ) -> Result<(), LayoutOverflow>;

    fn column_width(&mut self, col: Col, width: u16) -> Result<(), LayoutOverflow>;

    fn freeze(&mut self, row: Row, col: Col) -> Result<(), LayoutOverflow>;

    /// Writes `text` in a single cell if `range` is one cell wide, otherwise
    /// merges the range
    fn span(
        &mut self,
        range: CellRange,
        text: &str,
        style: CellStyle,
    ) -> Result<(), LayoutOverflow> {
        if range.is_single() {
            self.paint(
                range.first_row,
                range.first_col,
                CellUpdate::text(text, style),
            )
        } else {
            self.merge(range, text, style)
        }
    }
}

/// Registers each distinct style with a sink only once
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct StyleCache {
    ids: HashMap<CellStyle, StyleId>,
}

impl StyleCache {
    pub(crate) fn new() -> StyleCache {
        StyleCache::default()
    }

    pub(crate) fn get<S: TabularSink + ?Sized>(
        &mut self,
        sink: &mut S,
        style: &CellStyle,
    ) -> StyleId {
        if let Some(&id) = self.ids.get(style) {
            return id;
        }
        let id = sink.add_style(style);
        self.ids.insert(style.clone(), id);
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }
}

#[derive(Debug)]
pub(crate) struct ImmediateWriter<'a, S> {
    sink: &'a mut S,
    size: GridSize,
    cache: StyleCache,
}

impl<'a, S: TabularSink> ImmediateWriter<'a, S> {
    pub(crate) fn new(sink: &'a mut S, size: GridSize) -> ImmediateWriter<'a, S> {
        ImmediateWriter {
            sink,
            size,
            cache: StyleCache::new(),
        }
    }
}

impl<S: TabularSink> CellWriter for ImmediateWriter<'_, S> {
    fn paint(&mut self, row: Row, col: Col, update: CellUpdate) -> Result<(), LayoutOverflow> {
        self.size.check(row, col)?;
        let style = self.cache.get(&mut *self.sink, &update.style);
        let text = match &update.text {
            TextUpdate::Set(s) => s.as_str(),
            TextUpdate::Keep | TextUpdate::Clear => "",
        };
        self.sink.write_cell(row, col, text, style);
        Ok(())
    }

    fn merge(
        &mut self,
        range: CellRange,
        text: &str,
        style: CellStyle,
    ) -> Result<(), LayoutOverflow> {
        self.size.check_range(range)?;
        let style = self.cache.get(&mut *self.sink, &style);
        self.sink.merge_range(range, text, style);
        Ok(())
    }

    fn column_width(&mut self, col: Col, width: u16) -> Result<(), LayoutOverflow> {
        self.size.check(0, col)?;
        self.sink.set_column_width(col, width);
        Ok(())
    }

    fn freeze(&mut self, row: Row, col: Col) -> Result<(), LayoutOverflow> {
        self.size.check(row, col)?;
        self.sink.freeze_header(row, col);
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct CellState {
    style: CellStyle,
    text: String,
}

impl CellState {
    fn apply(&mut self, update: CellUpdate) {
        self.style.merge(&update.style);
        match update.text {
            TextUpdate::Keep => (),
            TextUpdate::Set(s) => self.text = s,
            TextUpdate::Clear => self.text.clear(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct PendingMerge {
    range: CellRange,
    text: String,
    style: CellStyle,
}

/// Cell store for deferred rendering.  Every pass mutates the same arena,
/// and nothing reaches the sink until [`Accumulator::commit`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Accumulator {
    size: GridSize,
    // Row-major; `None` for cells no pass has touched
    cells: Vec<Option<CellState>>,
    merges: Vec<PendingMerge>,
    widths: Vec<(Col, u16)>,
    frozen: Option<(Row, Col)>,
}

impl Accumulator {
    pub(crate) fn new(size: GridSize) -> Accumulator {
        Accumulator {
            size,
            cells: vec![None; size.cell_count()],
            merges: Vec::new(),
            widths: Vec::new(),
            frozen: None,
        }
    }

    /// The accumulated style of a cell, if any pass has touched it
    #[cfg(test)]
    pub(crate) fn style(&self, row: Row, col: Col) -> Option<&CellStyle> {
        let i = self.size.index(row, col).ok()?;
        self.cells.get(i)?.as_ref().map(|c| &c.style)
    }

    #[cfg(test)]
    pub(crate) fn text(&self, row: Row, col: Col) -> Option<&str> {
        let i = self.size.index(row, col).ok()?;
        self.cells.get(i)?.as_ref().map(|c| c.text.as_str())
    }

    /// Writes every touched cell to the sink once, in row-major order,
    /// followed by the merged ranges and layout settings.  Returns the number
    /// of cells written.
    pub(crate) fn commit<S: TabularSink>(self, sink: &mut S) -> usize {
        let mut cache = StyleCache::new();
        let mut written = 0;
        let cols = usize::from(self.size.cols).max(1);
        for (i, cell) in self.cells.into_iter().enumerate() {
            let Some(cell) = cell else {
                continue;
            };
            let (Ok(row), Ok(col)) = (Row::try_from(i / cols), Col::try_from(i % cols)) else {
                continue;
            };
            let style = cache.get(sink, &cell.style);
            sink.write_cell(row, col, &cell.text, style);
            written += 1;
        }
        for m in self.merges {
            let style = cache.get(sink, &m.style);
            sink.merge_range(m.range, &m.text, style);
        }
        for (col, width) in self.widths {
            sink.set_column_width(col, width);
        }
        if let Some((row, col)) = self.frozen {
            sink.freeze_header(row, col);
        }
        debug!(cells = written, styles = cache.len(), "Committed accumulated grid");
        written
    }
}

impl CellWriter for Accumulator {
    fn paint(&mut self, row: Row, col: Col, update: CellUpdate) -> Result<(), LayoutOverflow> {
        let i = self.size.index(row, col)?;
        if let Some(slot) = self.cells.get_mut(i) {
            slot.get_or_insert_with(CellState::default).apply(update);
        }
        Ok(())
    }

    fn merge(
        &mut self,
        range: CellRange,
        text: &str,
        style: CellStyle,
    ) -> Result<(), LayoutOverflow> {
        self.size.check_range(range)?;
        if let Some(m) = self.merges.iter_mut().find(|m| m.range == range) {
            m.style.merge(&style);
            if !text.is_empty() {
                m.text = String::from(text);
            }
        } else {
            self.merges.push(PendingMerge {
                range,
                text: String::from(text),
                style,
            });
        }
        Ok(())
    }

    fn column_width(&mut self, col: Col, width: u16) -> Result<(), LayoutOverflow> {
        self.size.check(0, col)?;
        self.widths.push((col, width));
        Ok(())
    }

    fn freeze(&mut self, row: Row, col: Col) -> Result<(), LayoutOverflow> {
        self.size.check(row, col)?;
        self.frozen = Some((row, col));
        Ok(())
    }
}
