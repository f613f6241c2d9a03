//! Graphics support via embedded-graphics
//!
//! [`Panel`] implements [`DrawTarget`] with [`Rgb565`] colors, so text,
//! primitives and images can be drawn straight into its planes. Every pixel
//! goes through [`quantize_rgb565`] and the same mirrored, landscape mapping
//! a renderer flush uses, so drawn and flushed content line up.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     pixelcolor::Rgb565,
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use epd2in66::Panel;
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::SpiBus;
//! # use epd2in66::{Builder, Dimensions, Display, Interface};
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiBus for MockSpi {
//! #     fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let interface = Interface::new(MockSpi, MockPin, MockPin, MockPin, MockPin);
//! # let config = match Builder::new().dimensions(Dimensions::PANEL_2IN66).build() {
//! #     Ok(config) => config,
//! #     Err(_) => return,
//! # };
//! # let display = Display::new(interface, config);
//! # let mut delay = MockDelay;
//! let mut panel = match Panel::try_new(display, [0u8; 5624], [0u8; 5624]) {
//!     Ok(panel) => panel,
//!     Err(_) => return,
//! };
//!
//! // Clear to white
//! let _ = DrawTarget::clear(&mut panel, Rgb565::WHITE);
//!
//! // Red banner with black text
//! let _ = Rectangle::new(Point::new(1, 0), Size::new(151, 20))
//!     .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
//!     .draw(&mut panel);
//! let _ = Text::new(
//!     "Hello, e-Paper!",
//!     Point::new(4, 40),
//!     MonoTextStyle::new(&FONT_6X10, Rgb565::BLACK),
//! )
//! .draw(&mut panel);
//!
//! // Update physical display
//! let _ = panel.present(&mut delay);
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::Rgb565,
    prelude::Pixel,
};

use crate::interface::DisplayInterface;
use crate::panel::Panel;
use crate::quantize::quantize_rgb565;

impl<I, B1, B2> DrawTarget for Panel<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsRef<[u8]> + AsMut<[u8]>,
    B2: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
                continue;
            };
            self.set_pixel(x, y, quantize_rgb565(color));
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_color(quantize_rgb565(color));
        Ok(())
    }
}

impl<I, B1, B2> OriginDimensions for Panel<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsRef<[u8]> + AsMut<[u8]>,
    B2: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        let dims = self.display().dimensions();
        Size::new(u32::from(dims.width), u32::from(dims.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, Dimensions};
    use crate::display::tests::MockInterface;
    use crate::display::Display;
    use crate::rotation::vlsb_index;
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_graphics::{
        prelude::*,
        primitives::{PrimitiveStyle, Rectangle},
    };

    fn test_panel() -> Panel<MockInterface, Vec<u8>, Vec<u8>> {
        let config = Builder::new()
            .dimensions(Dimensions::PANEL_2IN66)
            .build()
            .unwrap();
        let display = Display::new(MockInterface::default(), config);
        Panel::try_new(display, vec![0u8; 5624], vec![0u8; 5624]).unwrap()
    }

    #[test]
    fn test_size_is_native_panel() {
        let panel = test_panel();
        assert_eq!(panel.size(), Size::new(152, 296));
    }

    #[test]
    fn test_clear_quantizes() {
        let mut panel = test_panel();
        DrawTarget::clear(&mut panel, Rgb565::RED).unwrap();
        assert!(panel.black_plane().as_bytes().iter().all(|b| *b == 0xFF));
        assert!(panel.red_plane().as_bytes().iter().all(|b| *b == 0xFF));

        DrawTarget::clear(&mut panel, Rgb565::BLACK).unwrap();
        assert!(panel.black_plane().as_bytes().iter().all(|b| *b == 0x00));
        assert!(panel.red_plane().as_bytes().iter().all(|b| *b == 0x00));
    }

    #[test]
    fn test_pixel_uses_mirrored_mapping() {
        let mut panel = test_panel();
        Pixel(Point::new(8, 0), Rgb565::WHITE).draw(&mut panel).unwrap();

        // x 8 -> absolute 144 -> landscape (0, 144)
        let (index, bit) = vlsb_index(0, 144, 296);
        assert_eq!(panel.black_plane().as_bytes()[index], bit);
        assert_eq!(panel.red_plane().as_bytes()[index], 0);
    }

    #[test]
    fn test_negative_and_column_zero_are_dropped() {
        let mut panel = test_panel();
        Pixel(Point::new(-1, 5), Rgb565::WHITE).draw(&mut panel).unwrap();
        Pixel(Point::new(3, -2), Rgb565::WHITE).draw(&mut panel).unwrap();
        Pixel(Point::new(0, 5), Rgb565::WHITE).draw(&mut panel).unwrap();
        assert!(panel.black_plane().as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_filled_rectangle() {
        let mut panel = test_panel();
        Rectangle::new(Point::new(1, 0), Size::new(8, 8))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut panel)
            .unwrap();

        let set: u32 = panel
            .red_plane()
            .as_bytes()
            .iter()
            .map(|b| b.count_ones())
            .sum();
        assert_eq!(set, 64);
    }
}
