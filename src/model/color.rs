//! Layer line colors.

use std::fmt;

/// An RGB line color.
///
/// Halo stores the color as a decimal integer whose three little-endian
/// bytes are red, green and blue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LineColor {
    /// Creates a color from its components.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Decodes a Halo `LineColor` value. Returns `None` if it does not fit
    /// in three bytes.
    pub fn from_halo_value(value: u32) -> Option<Self> {
        if value > 0x00FF_FFFF {
            return None;
        }
        let [r, g, b, _] = value.to_le_bytes();
        Some(Self { r, g, b })
    }

    /// Encodes the color as a Halo `LineColor` value.
    pub fn to_halo_value(&self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, 0])
    }

    /// Returns `[r, g, b]`.
    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for LineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.to_halo_value())
    }
}
