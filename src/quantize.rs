//! RGB565 to panel color quantization
//!
//! Maps one 16-bit RGB565 pixel, given as its (low, high) bytes, to
//! [`PixelColor::White`], [`PixelColor::Black`] or [`PixelColor::Red`].
//! The thresholds are calibrated against the panel's inks and are applied
//! to the unscaled channel fields.
//!
//! ```
//! use epd2in66::{quantize, PixelColor};
//!
//! assert_eq!(quantize(0x00, 0xF8), PixelColor::Red);
//! assert_eq!(quantize(0x00, 0x00), PixelColor::Black);
//! assert_eq!(quantize(0xFF, 0xFF), PixelColor::White);
//! ```

use crate::color::PixelColor;

const RED_MIN: u8 = 160;
const RED_OTHER_MAX: u8 = 40;
const BLACK_MAX: u8 = 100;

/// Red, green and blue fields of an RGB565 pixel
///
/// Red keeps its position in the high byte (0..=248 in steps of 8),
/// green is the 6-bit field (0..=63), blue the 5-bit field (0..=31).
pub fn channels(low: u8, high: u8) -> (u8, u8, u8) {
    let red = high & 0xF8;
    let green = ((high & 0x07) << 3) | ((low & 0xE0) >> 5);
    let blue = low & 0x1F;
    (red, green, blue)
}

/// Classify an RGB565 pixel, first match wins
///
/// 1. Red if red >= 160, green < 40 and blue < 40
/// 2. Black if all three channels are below 100
/// 3. White otherwise
pub fn quantize(low: u8, high: u8) -> PixelColor {
    let (red, green, blue) = channels(low, high);

    if red >= RED_MIN && green < RED_OTHER_MAX && blue < RED_OTHER_MAX {
        PixelColor::Red
    } else if red < BLACK_MAX && green < BLACK_MAX && blue < BLACK_MAX {
        PixelColor::Black
    } else {
        PixelColor::White
    }
}

/// Classify an embedded-graphics [`Rgb565`](embedded_graphics_core::pixelcolor::Rgb565) color
#[cfg(feature = "graphics")]
pub fn quantize_rgb565(color: embedded_graphics_core::pixelcolor::Rgb565) -> PixelColor {
    use embedded_graphics_core::pixelcolor::IntoStorage;

    let [low, high] = color.into_storage().to_le_bytes();
    quantize(low, high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels() {
        assert_eq!(channels(0x00, 0xF8), (248, 0, 0));
        assert_eq!(channels(0x00, 0x00), (0, 0, 0));
        assert_eq!(channels(0xFF, 0xFF), (248, 63, 31));
        assert_eq!(channels(0xE0, 0x07), (0, 63, 0));
    }

    #[test]
    fn test_reference_pixels() {
        assert_eq!(quantize(0x00, 0xF8), PixelColor::Red);
        assert_eq!(quantize(0x00, 0x00), PixelColor::Black);
        assert_eq!(quantize(0xFF, 0xFF), PixelColor::White);
    }

    #[test]
    fn test_thresholds() {
        // red field 160 is the lowest red
        assert_eq!(quantize(0x00, 0xA0), PixelColor::Red);
        // red field 152 is neither red nor black
        assert_eq!(quantize(0x00, 0x98), PixelColor::White);
        // red field 96 with no other channel is black
        assert_eq!(quantize(0x00, 0x60), PixelColor::Black);
        // green field 5 bits high (40) spoils red
        assert_eq!(quantize(0x00, 0xF8 | 0x05), PixelColor::White);
        // green 39 keeps red
        assert_eq!(quantize(0xE0, 0xF8 | 0x04), PixelColor::Red);
        // blue never reaches 40, so pure green+blue stays black below 100
        assert_eq!(quantize(0xFF, 0x07), PixelColor::Black);
    }

    #[test]
    fn test_total_and_deterministic() {
        for high in 0..=u8::MAX {
            for low in 0..=u8::MAX {
                let first = quantize(low, high);
                assert_ne!(first, PixelColor::None);
                assert_eq!(first, quantize(low, high));
            }
        }
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn test_quantize_rgb565() {
        use embedded_graphics_core::pixelcolor::{Rgb565, RgbColor};

        assert_eq!(quantize_rgb565(Rgb565::RED), PixelColor::Red);
        assert_eq!(quantize_rgb565(Rgb565::BLACK), PixelColor::Black);
        assert_eq!(quantize_rgb565(Rgb565::WHITE), PixelColor::White);
        assert_eq!(quantize_rgb565(Rgb565::GREEN), PixelColor::Black);
    }
}
