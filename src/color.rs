// src/color.rs

//! Defines the canvas colour type (`Color`) and the small palette of named
//! colours the script vocabulary can refer to (`NamedColor`).

use serde::{Deserialize, Serialize};

/// Colours that script commands and configuration defaults refer to by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black,
    White,
    Green,
    Yellow,
}

impl NamedColor {
    /// Returns the concrete RGBA value of this named colour.
    pub const fn to_color(self) -> Color {
        match self {
            NamedColor::Black => Color::opaque(0, 0, 0),
            NamedColor::White => Color::opaque(255, 255, 255),
            NamedColor::Green => Color::opaque(0, 255, 0),
            NamedColor::Yellow => Color::opaque(255, 255, 0),
        }
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        named.to_color()
    }
}

/// An RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque_alpha")]
    pub a: u8,
}

fn opaque_alpha() -> u8 {
    u8::MAX
}

impl Color {
    pub const BLACK: Color = NamedColor::Black.to_color();
    pub const WHITE: Color = NamedColor::White.to_color();
    pub const GREEN: Color = NamedColor::Green.to_color();
    pub const YELLOW: Color = NamedColor::Yellow.to_color();

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: u8::MAX }
    }

    /// Converts to the RGBA byte order used by framebuffers.
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Reads a colour back from four RGBA bytes.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        let [r, g, b, a] = bytes;
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}
