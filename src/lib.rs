//! Waveshare 2.66" Black/White/Red E-Paper Driver
//!
//! A driver for the 152x296 tri-color e-paper panel built around an
//! SSD1680-class controller, plus the glue that turns a renderer's RGB565
//! dirty rectangles into the panel's two bit planes.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Fast and partial initialization modes
//! - RGB565 to black/white/red quantization
//! - Bounded busy-wait with a configurable timeout
//!
//! ## Layers
//!
//! - [`Interface`]: SPI bus plus CS, DC, RST and BUSY lines
//! - [`Display`]: the controller command protocol
//! - [`Plane`]: landscape, vertical-LSB-first bit planes
//! - [`Panel`]: one driver with its black and red planes, the target of
//!   renderer flushes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::SpiBus;
//! use epd2in66::{Builder, Dimensions, DirtyRect, Display, InitMode, Interface, Panel};
//!
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
//! # let (spi, cs, dc, rst, busy) = (MockSpi, MockPin, MockPin, MockPin, MockPin);
//! # let mut delay = MockDelay;
//! # let frame = [0xFFu8; 152 * 296 * 2];
//! let interface = Interface::new(spi, cs, dc, rst, busy);
//! let config = match Builder::new()
//!     .dimensions(Dimensions::PANEL_2IN66)
//!     .busy_timeout_ms(10_000)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let display = Display::new(interface, config);
//! let mut panel = match Panel::try_new(display, [0u8; 5624], [0u8; 5624]) {
//!     Ok(panel) => panel,
//!     Err(_) => return,
//! };
//!
//! if panel.initialize(&mut delay, InitMode::Fast).is_err() {
//!     return;
//! }
//! let _ = panel.clear(&mut delay, 0xFF);
//!
//! // A renderer hands over a dirty rectangle and its RGB565 pixels
//! if let Some(rect) = DirtyRect::new(8, 0, 151, 295) {
//!     let report = panel.flush(&rect, &frame, || {});
//!     if !report.is_clean() {
//!         // inspect report.first_error
//!     }
//! }
//!
//! let _ = panel.present(&mut delay);
//! let _ = panel.sleep();
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Panel color classification
pub mod color;
/// Controller command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Dirty-rectangle flush into the planes
pub mod flush;
/// Landscape bit planes
pub mod framebuffer;
/// Hardware interface abstraction
pub mod interface;
/// Partial refresh waveform
pub mod lut;
/// Panel handle owning the driver and its planes
pub mod panel;
/// RGB565 quantization
pub mod quantize;
/// Coordinate rotation utilities
pub mod rotation;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use color::PixelColor;
pub use config::{
    Builder, Config, DEFAULT_BUSY_POLL_MS, DEFAULT_BUSY_TIMEOUT_MS, Dimensions, MAX_GATE_OUTPUTS,
    MAX_SOURCE_OUTPUTS,
};
pub use display::{ControllerState, Display, InitMode, PlaneSelector};
pub use error::{BuilderError, Error, PixelError, SizeMismatch};
pub use flush::{DirtyRect, FlushReady, FlushReport};
pub use framebuffer::Plane;
pub use interface::InterfaceError;
pub use interface::{DisplayInterface, Interface};
pub use panel::Panel;
pub use quantize::quantize;

#[cfg(feature = "graphics")]
pub use quantize::quantize_rgb565;
