use crate::grid::{CellStyle, Rgb, Side};
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

/// Text on a filled cell when the cell names no font colour of its own
const FILLED_TEXT: Color = Color::Black;

pub(crate) const STATUS_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

impl From<Rgb> for Color {
    fn from(Rgb(r, g, b): Rgb) -> Color {
        Color::Rgb(r, g, b)
    }
}

/// Terminal rendition of a sheet cell's style.  Bottom borders become an
/// underline; the other sides have no terminal equivalent.
pub(crate) fn cell_style(style: &CellStyle) -> Style {
    let mut st = BASE_STYLE;
    if let Some(fill) = style.fill_color() {
        st = st.bg(fill.into()).fg(FILLED_TEXT);
    }
    if let Some(font) = style.text_color() {
        st = st.fg(font.into());
    }
    if style.is_bold() {
        st = st.add_modifier(Modifier::BOLD);
    }
    if style.has_border(Side::Bottom) {
        st = st.add_modifier(Modifier::UNDERLINED);
    }
    st
}

pub(crate) mod jumpto {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
