use super::viewport::Viewport;
use crate::grid::{Align, CellStyle, Sheet};
use crate::theme::{cell_style, BASE_STYLE};
use ratatui::prelude::*;

/// A sheet drawn one terminal line per row, each column as wide as the
/// sheet says
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SheetView<'a> {
    sheet: &'a Sheet,
}

impl<'a> SheetView<'a> {
    pub(crate) fn new(sheet: &'a Sheet) -> SheetView<'a> {
        SheetView { sheet }
    }
}

impl StatefulWidget for SheetView<'_> {
    type State = Viewport;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let (frozen_rows, frozen_cols) = state.frozen();
        let cols = place(
            (0..frozen_cols).chain(state.left()..self.sheet.col_count()),
            area.width,
            |c| self.sheet.column_width(c),
        );
        let rows = place(
            (0..frozen_rows).chain(state.top()..self.sheet.row_count()),
            area.height,
            |_| 1,
        );
        let mut canvas = BufferCanvas::new(area, buf);
        paint(self.sheet, &rows, &cols, &mut canvas);
    }
}

/// Lays out the whole sheet as text, without styling
pub(crate) fn plain_lines(sheet: &Sheet) -> Vec<String> {
    let cols = place(0..sheet.col_count(), u16::MAX, |c| sheet.column_width(c));
    let rows = place(0..sheet.row_count(), u16::MAX, |_| 1);
    let width = cols.last().map_or(0, |c| c.offset.saturating_add(c.extent));
    let mut canvas = LineCanvas::new(rows.len(), width);
    paint(sheet, &rows, &cols, &mut canvas);
    canvas.into_lines()
}

/// A row or column given a place on screen
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Placed {
    index: u16,
    offset: u16,
    extent: u16,
}

fn place<I, F>(indices: I, limit: u16, extent: F) -> Vec<Placed>
where
    I: IntoIterator<Item = u16>,
    F: Fn(u16) -> u16,
{
    let mut placed = Vec::new();
    let mut offset = 0u16;
    for index in indices {
        if offset >= limit {
            break;
        }
        let extent = extent(index).min(limit - offset);
        placed.push(Placed {
            index,
            offset,
            extent,
        });
        offset = offset.saturating_add(extent);
    }
    placed
}

fn paint<C: Canvas>(sheet: &Sheet, rows: &[Placed], cols: &[Placed], canvas: &mut C) {
    for row in rows {
        for col in cols {
            let cstyle = sheet.style_at(row.index, col.index);
            let style = cstyle.map_or(BASE_STYLE, cell_style);
            canvas.fill(row.offset, col.offset, col.extent, style);
            if sheet.merge_at(row.index, col.index).is_none() {
                let align = cstyle.map_or(Align::Left, CellStyle::align);
                let text = sheet.text_at(row.index, col.index);
                print_aligned(canvas, (row.offset, col.offset), col.extent, text, align, style);
            }
        }
    }
    // Merged text runs across whatever part of its range is on screen
    for merge in sheet.merges() {
        let Some(row) = rows.iter().find(|r| r.index == merge.range.first_row) else {
            continue;
        };
        let mut covered = cols
            .iter()
            .filter(|c| (merge.range.first_col..=merge.range.last_col).contains(&c.index));
        let Some(first) = covered.next() else {
            continue;
        };
        let last = covered.last().unwrap_or(first);
        let width = (last.offset + last.extent).saturating_sub(first.offset);
        let cstyle = sheet.style(merge.style);
        let style = cstyle.map_or(BASE_STYLE, cell_style);
        let align = cstyle.map_or(Align::Left, CellStyle::align);
        print_aligned(
            canvas,
            (row.offset, first.offset),
            width,
            &merge.text,
            align,
            style,
        );
    }
}

fn print_aligned<C: Canvas>(
    canvas: &mut C,
    (y, x): (u16, u16),
    width: u16,
    s: &str,
    align: Align,
    style: Style,
) {
    if s.is_empty() {
        return;
    }
    let text_width = u16::try_from(Line::raw(s).width()).unwrap_or(u16::MAX);
    let pad = match align {
        Align::Left => 0,
        Align::Center => width.saturating_sub(text_width) / 2,
    };
    canvas.print(y, x.saturating_add(pad), width - pad, s, style);
}

trait Canvas {
    fn fill(&mut self, y: u16, x: u16, width: u16, style: Style);

    /// Writes at most `width` columns of `s`
    fn print(&mut self, y: u16, x: u16, width: u16, s: &str, style: Style);
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }
}

impl Canvas for BufferCanvas<'_> {
    fn fill(&mut self, y: u16, x: u16, width: u16, style: Style) {
        if y < self.area.height && x < self.area.width {
            self.buf.set_style(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                style,
            );
        }
    }

    fn print(&mut self, y: u16, x: u16, width: u16, s: &str, style: Style) {
        if y < self.area.height && x < self.area.width {
            let width = (self.area.width - x).min(width);
            self.buf.set_stringn(
                x + self.area.x,
                y + self.area.y,
                s,
                usize::from(width),
                style,
            );
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct LineCanvas {
    lines: Vec<Vec<char>>,
}

impl LineCanvas {
    fn new(height: usize, width: u16) -> LineCanvas {
        LineCanvas {
            lines: vec![vec![' '; usize::from(width)]; height],
        }
    }

    fn into_lines(self) -> Vec<String> {
        self.lines
            .into_iter()
            .map(|ln| String::from_iter(ln).trim_end().to_owned())
            .collect()
    }
}

impl Canvas for LineCanvas {
    fn fill(&mut self, _y: u16, _x: u16, _width: u16, _style: Style) {}

    fn print(&mut self, y: u16, x: u16, width: u16, s: &str, _style: Style) {
        let Some(line) = self.lines.get_mut(usize::from(y)) else {
            return;
        };
        let start = usize::from(x);
        for (slot, ch) in line
            .iter_mut()
            .skip(start)
            .take(usize::from(width))
            .zip(s.chars())
        {
            *slot = ch;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellRange, Rgb, TabularSink};

    fn sheet() -> Sheet {
        let mut sheet = Sheet::new();
        let plain = sheet.add_style(&CellStyle::new());
        let centered = sheet.add_style(&CellStyle::new().centered());
        let holiday =
            sheet.add_style(&CellStyle::new().fill(Rgb(0xF4, 0xB1, 0x83)).bold().centered());
        sheet.merge_range(CellRange::row_span(0, 1, 4), "January", centered);
        sheet.write_cell(1, 0, "DE-BY", plain);
        sheet.write_cell(1, 1, "1", centered);
        sheet.write_cell(1, 2, "2", holiday);
        sheet.write_cell(1, 3, "3", centered);
        sheet.write_cell(1, 4, "4", centered);
        sheet.set_column_width(0, 5);
        for col in 1..=4 {
            sheet.set_column_width(col, 3);
        }
        sheet.freeze_header(1, 1);
        sheet
    }

    fn buffer_lines(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn draw(sheet: &Sheet, vp: &mut Viewport) -> Buffer {
        let area = Rect::new(0, 0, 14, 2);
        let mut buf = Buffer::empty(area);
        SheetView::new(sheet).render(area, &mut buf, vp);
        buf
    }

    #[test]
    fn test_render_columns() {
        let sheet = sheet();
        let mut vp = Viewport::new(&sheet);
        let buf = draw(&sheet, &mut vp);
        assert_eq!(buffer_lines(&buf), ["      January ", "DE-BY 1  2  3 "]);
        assert_eq!(buf[(9, 1)].bg, Color::Rgb(0xF4, 0xB1, 0x83));
        assert_eq!(buf[(8, 1)].bg, Color::Rgb(0xF4, 0xB1, 0x83));
        assert!(buf[(9, 1)].modifier.contains(Modifier::BOLD));
        assert_eq!(buf[(6, 1)].bg, Color::Black);
    }

    #[test]
    fn test_frozen_column_stays() {
        let sheet = sheet();
        let mut vp = Viewport::new(&sheet);
        vp.scroll_right(2).unwrap();
        let buf = draw(&sheet, &mut vp);
        assert_eq!(buffer_lines(&buf), ["     Januar   ", "DE-BY 3  4    "]);
    }

    #[test]
    fn test_plain_lines() {
        assert_eq!(
            plain_lines(&sheet()),
            ["       January", "DE-BY 1  2  3  4"]
        );
    }

    #[test]
    fn test_place_clips_last() {
        let placed = place(0..5, 10, |_| 4);
        assert_eq!(
            placed,
            [
                Placed {
                    index: 0,
                    offset: 0,
                    extent: 4
                },
                Placed {
                    index: 1,
                    offset: 4,
                    extent: 4
                },
                Placed {
                    index: 2,
                    offset: 8,
                    extent: 2
                },
            ]
        );
    }
}
