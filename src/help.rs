use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

/// Width of the key column
const KEY_WIDTH: usize = 16;

static KEYS: &[(&str, &str)] = &[
    ("h, LEFT", "Scroll left one day"),
    ("l, RIGHT", "Scroll right one day"),
    ("H, PAGE UP", "Scroll left one page"),
    ("L, PAGE DOWN", "Scroll right one page"),
    ("k, UP", "Scroll up one row"),
    ("j, DOWN", "Scroll down one row"),
    ("0, HOME", "Jump to the start of the year"),
    ("g", "Input date to jump to"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

static FOOTER: &str = "Press the Any Key to dismiss.";

/// Overlay listing the viewer's key bindings
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn text() -> Text<'static> {
        let mut lines = KEYS
            .iter()
            .map(|&(keys, action)| Line::raw(format!("{keys:KEY_WIDTH$}{action}")))
            .collect::<Vec<_>>();
        lines.push(Line::raw(""));
        lines.push(Line::raw(FOOTER));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Help::text();
        // Room for the border on every side
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.height);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.width);
        let para = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(2).min(area.width),
            height: help_area.height,
        };
        Clear.render(outer_area, buf);
        Block::new().style(self.0).render(outer_area, buf);
        para.render(help_area, buf);
    }
}
