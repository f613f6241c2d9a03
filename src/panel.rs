//! Panel handle: one controller plus its two planes
//!
//! [`Panel`] is the value a renderer talks to. It owns the [`Display`] driver
//! and the black and red landscape [`Plane`]s, takes dirty-rectangle flushes
//! into the planes, and pushes the planes to the controller on
//! [`present`](Panel::present).
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::SpiBus;
//! use epd2in66::{Builder, Dimensions, DirtyRect, Display, InitMode, Interface, Panel};
//! # use core::convert::Infallible;
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
//! # let mut delay = MockDelay;
//! # let pixels = [0u8; 152 * 2];
//! let interface = Interface::new(MockSpi, MockPin, MockPin, MockPin, MockPin);
//! let config = match Builder::new().dimensions(Dimensions::PANEL_2IN66).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let display = Display::new(interface, config);
//! let mut panel = match Panel::try_new(display, [0u8; 5624], [0u8; 5624]) {
//!     Ok(panel) => panel,
//!     Err(_) => return,
//! };
//!
//! if panel.initialize(&mut delay, InitMode::Fast).is_err() {
//!     return;
//! }
//!
//! // White background, then one renderer flush
//! panel.fill_planes(0xFF, 0x00);
//! if let Some(rect) = DirtyRect::new(8, 0, 151, 0) {
//!     let report = panel.flush(&rect, &pixels, || {});
//!     let _ = report;
//! }
//!
//! let _ = panel.present(&mut delay);
//! let _ = panel.sleep();
//! ```

use embedded_hal::delay::DelayNs;

use crate::color::PixelColor;
use crate::display::{Display, InitMode, PlaneSelector};
use crate::error::Error;
use crate::flush::{flush_into, DirtyRect, FlushReady, FlushReport};
use crate::framebuffer::Plane;
use crate::interface::DisplayInterface;
use crate::rotation::{mirror_position, to_landscape};

type PanelResult<I> = core::result::Result<(), Error<I>>;

/// Controller driver plus black and red landscape planes
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `B1` - Buffer for the black/white plane
/// * `B2` - Buffer for the red plane
pub struct Panel<I, B1, B2>
where
    I: DisplayInterface,
{
    display: Display<I>,
    black: Plane<B1>,
    red: Plane<B2>,
}

impl<I, B1, B2> Panel<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsRef<[u8]> + AsMut<[u8]>,
    B2: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Pair a driver with two plane buffers
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferSizeMismatch` unless both buffers are exactly
    /// `dimensions.buffer_size()` bytes.
    pub fn try_new(display: Display<I>, black: B1, red: B2) -> Result<Self, Error<I>> {
        let dimensions = *display.dimensions();
        let black = Plane::new(black, dimensions)?;
        let red = Plane::new(red, dimensions)?;
        Ok(Self {
            display,
            black,
            red,
        })
    }

    /// Reset and configure the controller
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D, mode: InitMode) -> PanelResult<I> {
        self.display.initialize(delay, mode)
    }

    /// Flush a renderer's dirty rectangle into the planes
    ///
    /// See [`flush_into`] for the pixel layout. `ready` is called exactly
    /// once.
    pub fn flush<R: FlushReady>(
        &mut self,
        rect: &DirtyRect,
        pixels: &[u8],
        ready: R,
    ) -> FlushReport {
        let panel_width = self.display.dimensions().width;
        flush_into(&mut self.black, &mut self.red, panel_width, rect, pixels, ready)
    }

    /// Fill the local planes with raw bytes
    pub fn fill_planes(&mut self, black: u8, red: u8) {
        self.black.fill(black);
        self.red.fill(red);
    }

    /// Fill the local planes with one color
    pub fn fill_color(&mut self, color: PixelColor) {
        self.fill_planes(color.bw_byte(), color.red_byte());
    }

    /// Write one pixel at renderer coordinate `(x, y)`
    ///
    /// Uses the flush mapping, so `x` is mirrored against the panel width.
    /// Returns whether the pixel landed on the planes.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: PixelColor) -> bool {
        let Some((black_bit, red_bit)) = color.plane_bits() else {
            return false;
        };
        let panel_width = self.display.dimensions().width;
        let (x_abs, y_abs) = mirror_position(x, y, 0, 0, panel_width);
        let (lx, ly) = to_landscape(x_abs, y_abs);
        if !self.black.set_pixel(lx, ly, black_bit) {
            return false;
        }
        self.red.set_pixel(lx, ly, red_bit)
    }

    /// Upload both planes and refresh the panel
    pub fn present<D: DelayNs>(&mut self, delay: &mut D) -> PanelResult<I> {
        self.display
            .upload_landscape_plane(PlaneSelector::Black, self.black.as_bytes())?;
        self.display
            .upload_landscape_plane(PlaneSelector::Red, self.red.as_bytes())?;
        self.display.activate_display(delay)
    }

    /// Clear the planes and the panel RAM
    ///
    /// The black plane gets `fill`, the red plane `!fill`, matching
    /// [`Display::clear`].
    pub fn clear<D: DelayNs>(&mut self, delay: &mut D, fill: u8) -> PanelResult<I> {
        self.fill_planes(fill, !fill);
        self.display.clear(delay, fill)
    }

    /// Put the controller into deep sleep
    pub fn sleep(&mut self) -> PanelResult<I> {
        self.display.sleep()
    }

    /// Access the underlying Display
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// Access the underlying Display mutably
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }

    /// Black/white plane
    pub fn black_plane(&self) -> &Plane<B1> {
        &self.black
    }

    /// Red plane
    pub fn red_plane(&self) -> &Plane<B2> {
        &self.red
    }

    /// Take the panel apart
    pub fn release(self) -> (Display<I>, B1, B2) {
        (self.display, self.black.into_inner(), self.red.into_inner())
    }
}

#[cfg(feature = "alloc")]
impl<I> Panel<I, alloc::vec::Vec<u8>, alloc::vec::Vec<u8>>
where
    I: DisplayInterface,
{
    /// Pair a driver with two heap-allocated, zeroed planes
    pub fn new_allocated(display: Display<I>) -> Self {
        let dimensions = *display.dimensions();
        Self {
            display,
            black: Plane::allocate(dimensions),
            red: Plane::allocate(dimensions),
        }
    }
}
