// src/color.rs

//! Defines the RGBA color value and the named palette used by drawing operations.

use serde::{Deserialize, Serialize};

/// RGBA color in 32-bit format (8 bits per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const GREEN: Rgba = Rgba::opaque(0, 255, 0);
    pub const YELLOW: Rgba = Rgba::opaque(255, 255, 0);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to RGBA byte array
    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Source-over composite of `self` onto `dst`, non-premultiplied.
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            255 => self,
            0 => dst,
            src_a => {
                let sa = src_a as u32;
                let da = dst.a as u32;
                // Everything scaled by 255*255 to stay in integers.
                let out_a = sa * 255 + da * (255 - sa);
                if out_a == 0 {
                    return Rgba::TRANSPARENT;
                }
                let blend = |s: u8, d: u8| -> u8 {
                    let num = s as u32 * sa * 255 + d as u32 * da * (255 - sa);
                    ((num + out_a / 2) / out_a) as u8
                };
                Rgba {
                    r: blend(self.r, dst.r),
                    g: blend(self.g, dst.g),
                    b: blend(self.b, dst.b),
                    a: ((out_a + 127) / 255) as u8,
                }
            }
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::TRANSPARENT
    }
}

/// Colors the drawing language can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Black,
    White,
    Green,
    Yellow,
}

impl NamedColor {
    /// The reference sRGB value, used when no color scheme overrides it.
    pub fn to_rgba(self) -> Rgba {
        match self {
            NamedColor::Black => Rgba::BLACK,
            NamedColor::White => Rgba::WHITE,
            NamedColor::Green => Rgba::GREEN,
            NamedColor::Yellow => Rgba::YELLOW,
        }
    }
}
