use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::LabelColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Ansi256(u8),
    Hex { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorDepth {
    #[default]
    TrueColor,
    Color256,
    Color16,
}

#[derive(Debug, Error)]
#[error("invalid color value for field \"{field}\": \"{value}\"")]
pub struct ColorParseError {
    pub field: String,
    pub value: String,
}

impl Color {
    /// Parse `"0"`..`"255"` (ANSI-256 index), `"#RRGGBB"` or `"#RGB"`.
    ///
    /// `field` only feeds the error message.
    ///
    /// # Errors
    ///
    /// Returns `ColorParseError` if the string is not a valid color.
    pub fn parse(s: &str, field: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError {
            field: field.to_owned(),
            value: s.to_owned(),
        };

        let Some(hex) = s.strip_prefix('#') else {
            let n: u16 = s.parse().map_err(|_| err())?;
            return u8::try_from(n).map(Color::Ansi256).map_err(|_| err());
        };

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());
        match hex.len() {
            6 => Ok(Color::Hex {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
            // "#abc" is shorthand for "#aabbcc".
            3 => Ok(Color::Hex {
                r: channel(&hex[0..1])? * 17,
                g: channel(&hex[1..2])? * 17,
                b: channel(&hex[2..3])? * 17,
            }),
            _ => Err(err()),
        }
    }

    /// Const constructor for palette tables.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Hex { r, g, b }
    }

    /// Convert to a `crossterm::style::Color` at the given terminal color depth.
    ///
    /// ANSI indices 0–15 go through crossterm's named variants so the
    /// terminal's own 16-color palette applies.
    pub fn to_crossterm_color(self, depth: ColorDepth) -> crossterm::style::Color {
        match (depth, self) {
            (_, Color::Ansi256(n)) if depth != ColorDepth::Color16 || n < 16 => {
                ansi_to_crossterm(n)
            }
            (ColorDepth::TrueColor, Color::Hex { r, g, b }) => {
                crossterm::style::Color::Rgb { r, g, b }
            }
            (ColorDepth::Color256, Color::Hex { r, g, b }) => {
                crossterm::style::Color::AnsiValue(nearest_cube_index(r, g, b))
            }
            _ => {
                let (r, g, b) = self.to_rgb();
                ansi_to_crossterm(nearest_ansi16(r, g, b))
            }
        }
    }

    fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Hex { r, g, b } => (r, g, b),
            Color::Ansi256(n) => ansi256_to_rgb(n),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Ansi256(n) => write!(f, "{n}"),
            Color::Hex { r, g, b } => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s, "<unknown>")
    }
}

impl ColorDepth {
    /// Detect terminal color depth from `COLORTERM` / `TERM`.
    pub fn detect() -> Self {
        if let Ok(ct) = std::env::var("COLORTERM")
            && (ct == "truecolor" || ct == "24bit")
        {
            return ColorDepth::TrueColor;
        }
        if let Ok(term) = std::env::var("TERM")
            && term.contains("256color")
        {
            return ColorDepth::Color256;
        }
        ColorDepth::Color16
    }
}

// ---------------------------------------------------------------------------
// Design-system palette
// ---------------------------------------------------------------------------

/// Named colors of the review UI's design system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesignColor {
    Red700,
    Green700,
    Grey700,
    Grey300,
    Grey100,
}

impl DesignColor {
    pub const fn color(self) -> Color {
        match self {
            Self::Red700 => Color::rgb(0xc4, 0x1b, 0x1b),
            Self::Green700 => Color::rgb(0x1b, 0x84, 0x1d),
            Self::Grey700 => Color::rgb(0x4f, 0x51, 0x62),
            Self::Grey300 => Color::rgb(0xb0, 0xb1, 0xc4),
            Self::Grey100 => Color::rgb(0xf3, 0xf3, 0xfa),
        }
    }
}

/// Chip color of a server-side label color name.
pub const fn label_color(name: LabelColor) -> Color {
    match name {
        LabelColor::Red => Color::rgb(0xe4, 0x3f, 0x32),
        LabelColor::Green => Color::rgb(0x42, 0xab, 0x45),
        LabelColor::Yellow => Color::rgb(0xe1, 0xa8, 0x00),
        LabelColor::Blue => Color::rgb(0x00, 0x92, 0xe4),
        LabelColor::Pink => Color::rgb(0xe8, 0x4f, 0x9f),
        LabelColor::Purple => Color::rgb(0x9a, 0x3d, 0xc9),
        LabelColor::Violet => Color::rgb(0x72, 0x4d, 0xd1),
        LabelColor::Indigo => Color::rgb(0x4a, 0x54, 0xd8),
        LabelColor::Cyan => Color::rgb(0x00, 0xad, 0xc8),
        LabelColor::Orange => Color::rgb(0xff, 0x83, 0x2b),
        LabelColor::Brown => Color::rgb(0xa3, 0x6b, 0x3f),
        LabelColor::Mint => Color::rgb(0x2c, 0xbd, 0x95),
        LabelColor::Lime => Color::rgb(0x8a, 0xbf, 0x26),
        LabelColor::Unknown => Color::Ansi256(245),
    }
}

// ---------------------------------------------------------------------------
// ANSI helpers
// ---------------------------------------------------------------------------

fn ansi_to_crossterm(n: u8) -> crossterm::style::Color {
    use crossterm::style::Color;
    match n {
        0 => Color::Black,
        1 => Color::DarkRed,
        2 => Color::DarkGreen,
        3 => Color::DarkYellow,
        4 => Color::DarkBlue,
        5 => Color::DarkMagenta,
        6 => Color::DarkCyan,
        7 => Color::Grey,
        8 => Color::DarkGrey,
        9 => Color::Red,
        10 => Color::Green,
        11 => Color::Yellow,
        12 => Color::Blue,
        13 => Color::Magenta,
        14 => Color::Cyan,
        15 => Color::White,
        _ => Color::AnsiValue(n),
    }
}

const ANSI16_RGB: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

fn ansi256_to_rgb(n: u8) -> (u8, u8, u8) {
    match n {
        0..=15 => ANSI16_RGB[usize::from(n)],
        16..=231 => {
            let idx = n - 16;
            let level = |i: u8| if i == 0 { 0 } else { 55 + 40 * i };
            (level(idx / 36), level((idx / 6) % 6), level(idx % 6))
        }
        232..=255 => {
            let v = 8 + 10 * (n - 232);
            (v, v, v)
        }
    }
}

/// Nearest index in the 6x6x6 cube or the grayscale ramp.
fn nearest_cube_index(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        return match r {
            0..=7 => 16,
            249..=255 => 231,
            v => 232 + ((v - 8) / 10).min(23),
        };
    }
    let level = |v: u8| -> u8 {
        match v {
            0..=47 => 0,
            48..=114 => 1,
            v => ((v - 35) / 40).min(5),
        }
    };
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

/// Nearest of the 16 standard colors by squared distance.
fn nearest_ansi16(r: u8, g: u8, b: u8) -> u8 {
    let dist = |&(cr, cg, cb): &(u8, u8, u8)| {
        let d = |a: u8, c: u8| (i32::from(a) - i32::from(c)).pow(2);
        d(r, cr) + d(g, cg) + d(b, cb)
    };
    ANSI16_RGB
        .iter()
        .enumerate()
        .min_by_key(|(_, rgb)| dist(rgb))
        .map_or(7, |(i, _)| u8::try_from(i).unwrap_or(7))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grey_hex_maps_to_ramp() {
        assert_eq!(nearest_cube_index(0x80, 0x80, 0x80), 244);
    }

    #[test]
    fn pure_red_maps_to_bright_red() {
        assert_eq!(nearest_ansi16(255, 0, 0), 9);
    }

    #[test]
    fn cube_roundtrip_is_stable() {
        let (r, g, b) = ansi256_to_rgb(196);
        assert_eq!(nearest_cube_index(r, g, b), 196);
    }
}
