//! Color types for tri-color e-paper displays
//!
//! This module defines the [`PixelColor`] enum for the black, white and red
//! states of the panel, plus the classification result `None`.
//!
//! ## Color Representation
//!
//! Each pixel is represented by:
//! - 1 bit in the black/white plane
//! - 1 bit in the red plane
//!
//! | Color | BW Plane | RED Plane |
//! |-------|----------|-----------|
//! | Black | 0        | 0         |
//! | White | 1        | 0         |
//! | Red   | 1        | 1         |
//!
//! ## Example
//!
//! ```
//! use epd2in66::PixelColor;
//!
//! assert_eq!(PixelColor::Red.plane_bits(), Some((true, true)));
//! assert_eq!(PixelColor::None.plane_bits(), None);
//! ```

/// Classification of a source pixel
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PixelColor {
    /// No panel color; nothing is written
    #[default]
    None,
    /// White pixels
    White,
    /// Black pixels
    Black,
    /// Red pixels
    Red,
}

impl PixelColor {
    /// Bits to store as `(black_plane, red_plane)`
    ///
    /// Returns `None` for [`PixelColor::None`].
    pub fn plane_bits(self) -> Option<(bool, bool)> {
        match self {
            Self::White => Some((true, false)),
            Self::Black => Some((false, false)),
            Self::Red => Some((true, true)),
            Self::None => None,
        }
    }

    /// Fill byte for the black/white plane
    pub fn bw_byte(self) -> u8 {
        match self {
            Self::White | Self::Red => 0xFF,
            Self::Black | Self::None => 0x00,
        }
    }

    /// Fill byte for the red plane
    pub fn red_byte(self) -> u8 {
        match self {
            Self::Red => 0xFF,
            _ => 0x00,
        }
    }
}
