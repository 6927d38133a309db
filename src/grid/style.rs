use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[serde(try_from = "String")]
pub(crate) struct Rgb(pub(crate) u8, pub(crate) u8, pub(crate) u8);

impl Rgb {
    pub(crate) const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
    pub(crate) const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Rgb, ParseRgbError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseRgbError(String::from(s)));
        }
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| ParseRgbError(String::from(s)))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseRgbError;

    fn try_from(s: String) -> Result<Rgb, ParseRgbError> {
        s.parse()
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid colour {0:?}; expected #RRGGBB")]
pub(crate) struct ParseRgbError(String);

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) enum Align {
    Left,
    Center,
}

/// Name of a single style attribute
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) enum StyleKey {
    Fill,
    FontColor,
    Bold,
    Align,
    Border(Side),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum StyleValue {
    Color(Rgb),
    Flag(bool),
    Align(Align),
}

/// A set of style attributes.  Combining two styles is per attribute: keys
/// present in the newer style replace those of the older, and all other keys
/// are left alone.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct CellStyle(BTreeMap<StyleKey, StyleValue>);

impl CellStyle {
    pub(crate) fn new() -> CellStyle {
        CellStyle::default()
    }

    pub(crate) fn fill(self, color: Rgb) -> CellStyle {
        self.with(StyleKey::Fill, StyleValue::Color(color))
    }

    pub(crate) fn font_color(self, color: Rgb) -> CellStyle {
        self.with(StyleKey::FontColor, StyleValue::Color(color))
    }

    pub(crate) fn bold(self) -> CellStyle {
        self.with(StyleKey::Bold, StyleValue::Flag(true))
    }

    pub(crate) fn centered(self) -> CellStyle {
        self.with(StyleKey::Align, StyleValue::Align(Align::Center))
    }

    pub(crate) fn border(self, side: Side, on: bool) -> CellStyle {
        self.with(StyleKey::Border(side), StyleValue::Flag(on))
    }

    pub(crate) fn boxed(self) -> CellStyle {
        [Side::Top, Side::Bottom, Side::Left, Side::Right]
            .into_iter()
            .fold(self, |style, side| style.border(side, true))
    }

    pub(crate) fn with(mut self, key: StyleKey, value: StyleValue) -> CellStyle {
        self.0.insert(key, value);
        self
    }

    /// Overlays `newer` onto `self`, attribute by attribute
    pub(crate) fn merge(&mut self, newer: &CellStyle) {
        self.0.extend(newer.0.iter().map(|(&k, &v)| (k, v)));
    }

    pub(crate) fn get(&self, key: StyleKey) -> Option<StyleValue> {
        self.0.get(&key).copied()
    }

    pub(crate) fn fill_color(&self) -> Option<Rgb> {
        self.color(StyleKey::Fill)
    }

    pub(crate) fn text_color(&self) -> Option<Rgb> {
        self.color(StyleKey::FontColor)
    }

    pub(crate) fn is_bold(&self) -> bool {
        self.flag(StyleKey::Bold)
    }

    pub(crate) fn has_border(&self, side: Side) -> bool {
        self.flag(StyleKey::Border(side))
    }

    pub(crate) fn align(&self) -> Align {
        match self.get(StyleKey::Align) {
            Some(StyleValue::Align(a)) => a,
            _ => Align::Left,
        }
    }

    fn color(&self, key: StyleKey) -> Option<Rgb> {
        match self.get(key) {
            Some(StyleValue::Color(c)) => Some(c),
            _ => None,
        }
    }

    fn flag(&self, key: StyleKey) -> bool {
        matches!(self.get(key), Some(StyleValue::Flag(true)))
    }
}
