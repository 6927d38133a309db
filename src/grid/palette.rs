use super::style::{CellStyle, Rgb};
use serde::Deserialize;

/// Shades used for coverage percentages, lightest first
pub(crate) const GRAY_SCALE: [Rgb; 11] = [
    Rgb(0xFF, 0xFF, 0xFF),
    Rgb(0xE6, 0xE6, 0xE6),
    Rgb(0xCC, 0xCC, 0xCC),
    Rgb(0xB3, 0xB3, 0xB3),
    Rgb(0x99, 0x99, 0x99),
    Rgb(0x80, 0x80, 0x80),
    Rgb(0x66, 0x66, 0x66),
    Rgb(0x4D, 0x4D, 0x4D),
    Rgb(0x33, 0x33, 0x33),
    Rgb(0x1A, 0x1A, 0x1A),
    Rgb(0x00, 0x00, 0x00),
];

/// Text on fills at or above this coverage is drawn light-on-dark
const LIGHT_TEXT_THRESHOLD: f64 = 0.5;

/// Maps a coverage fraction onto [`GRAY_SCALE`], rounding to the nearest
/// shade.  Values outside `[0, 1]` are clamped and NaN counts as zero.
pub(crate) fn grayscale(percentage: f64) -> Rgb {
    let pct = if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 1.0)
    };
    let steps = GRAY_SCALE.len() - 1;
    let scaled = pct * f64::from(u32::try_from(steps).unwrap_or(u32::MAX));
    let index = (1u32..)
        .take(steps)
        .filter(|&i| f64::from(i) - 0.5 <= scaled)
        .count();
    GRAY_SCALE
        .get(index)
        .copied()
        .unwrap_or(Rgb::BLACK)
}

pub(crate) fn font_for(percentage: f64) -> Rgb {
    if percentage >= LIGHT_TEXT_THRESHOLD {
        Rgb::WHITE
    } else {
        Rgb::BLACK
    }
}

/// Fill and font colour for a cell shaded by coverage
pub(crate) fn shade(percentage: f64) -> CellStyle {
    CellStyle::new()
        .fill(grayscale(percentage))
        .font_color(font_for(percentage))
}

/// Fill colours for the different kinds of days
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Theme {
    pub(crate) school: Rgb,
    pub(crate) public: Rgb,
    pub(crate) national: Rgb,
    pub(crate) weekend: Rgb,
}

impl Default for Theme {
    fn default() -> Theme {
        Theme {
            school: Rgb(0x9B, 0xC2, 0xE6),
            public: Rgb(0xF4, 0xB1, 0x83),
            national: Rgb(0xC0, 0x50, 0x4D),
            weekend: Rgb(0xD9, 0xD9, 0xD9),
        }
    }
}

impl Theme {
    pub(crate) fn school(&self) -> CellStyle {
        CellStyle::new().fill(self.school)
    }

    pub(crate) fn public(&self) -> CellStyle {
        CellStyle::new().fill(self.public)
    }

    pub(crate) fn national(&self) -> CellStyle {
        CellStyle::new().fill(self.national).font_color(Rgb::WHITE)
    }

    pub(crate) fn weekend(&self) -> CellStyle {
        CellStyle::new().fill(self.weekend)
    }

    /// Banner cells: month names and week numbers
    pub(crate) fn banner(&self) -> CellStyle {
        CellStyle::new()
            .bold()
            .boxed()
            .centered()
            .fill(Rgb::WHITE)
    }
}
