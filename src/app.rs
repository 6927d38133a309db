use crate::dates::TargetYear;
use crate::grid::{LayoutMode, Sheet};
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::sheetview::{SheetView, Viewport};
use crate::theme::{BASE_STYLE, STATUS_STYLE};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use tracing::debug;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    sheet: Sheet,
    viewport: Viewport,
    year: TargetYear,
    mode: LayoutMode,
    state: AppState,
}

impl App {
    pub(crate) fn new(sheet: Sheet, year: TargetYear, mode: LayoutMode) -> App {
        let viewport = Viewport::new(&sheet);
        App {
            sheet,
            viewport,
            year,
            mode,
            state: AppState::Browsing,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Browsing => match key {
                KeyCode::Char('h') | KeyCode::Left => self.viewport.scroll_left(1).is_ok(),
                KeyCode::Char('l') | KeyCode::Right => self.viewport.scroll_right(1).is_ok(),
                KeyCode::Char('H') | KeyCode::PageUp => {
                    self.viewport.scroll_left(self.mode.page_columns()).is_ok()
                }
                KeyCode::Char('L') | KeyCode::PageDown => {
                    self.viewport.scroll_right(self.mode.page_columns()).is_ok()
                }
                KeyCode::Char('k') | KeyCode::Up => self.viewport.scroll_up(1).is_ok(),
                KeyCode::Char('j') | KeyCode::Down => self.viewport.scroll_down(1).is_ok(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.viewport.home();
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new(self.year.year()));
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Browsing;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Browsing;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char('0') => state.handle_input(JumpToInput::Digit(0)),
                        KeyCode::Char('1') => state.handle_input(JumpToInput::Digit(1)),
                        KeyCode::Char('2') => state.handle_input(JumpToInput::Digit(2)),
                        KeyCode::Char('3') => state.handle_input(JumpToInput::Digit(3)),
                        KeyCode::Char('4') => state.handle_input(JumpToInput::Digit(4)),
                        KeyCode::Char('5') => state.handle_input(JumpToInput::Digit(5)),
                        KeyCode::Char('6') => state.handle_input(JumpToInput::Digit(6)),
                        KeyCode::Char('7') => state.handle_input(JumpToInput::Digit(7)),
                        KeyCode::Char('8') => state.handle_input(JumpToInput::Digit(8)),
                        KeyCode::Char('9') => state.handle_input(JumpToInput::Digit(9)),
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Jump(date) => {
                            self.state = AppState::Browsing;
                            self.jump_to(date);
                            true
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn jump_to(&mut self, date: time::Date) {
        let col = self.mode.date_column(date);
        debug!(%date, col, "Jumping to date");
        self.viewport.jump_to_col(col);
    }

    fn status_line(&self) -> Line<'static> {
        Line::styled(
            format!(
                " {year} {mode}  (? for help)",
                year = self.year.year(),
                mode = self.mode.label()
            ),
            STATUS_STYLE,
        )
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [sheet_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        SheetView::new(&self.sheet).render(sheet_area, buf, &mut self.viewport);
        self.status_line().render(status_area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Browsing,
    Helping,
    Jumping(JumpToState),
    Quitting,
}
