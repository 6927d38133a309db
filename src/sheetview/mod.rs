//! Showing a rendered sheet in the terminal, or as plain text
mod viewport;
mod widget;
pub(crate) use self::viewport::Viewport;
pub(crate) use self::widget::{plain_lines, SheetView};
