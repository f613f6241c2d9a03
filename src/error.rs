//! Error types for the driver
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Errors that abort a display operation
//! - [`SizeMismatch`] - Plane buffer of the wrong length
//! - [`PixelError`] - Per-pixel problems found while flushing; the pixel is
//!   skipped and the frame continues
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level bus and GPIO errors
//!
//! ## Example
//!
//! ```
//! use epd2in66::{Builder, Dimensions, BuilderError};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Width must be byte aligned
//! let result = Dimensions::new(150, 296);
//! assert!(result.is_err());
//! ```

use crate::interface::DisplayInterface;

/// Maximum gate outputs (rows) supported by the controller
pub const MAX_GATE_OUTPUTS: u16 = 296;

/// Maximum source outputs (columns) supported by the controller
pub const MAX_SOURCE_OUTPUTS: u16 = 176;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// Unknown initialization mode
    ///
    /// Rejected before any bus traffic.
    UnknownMode {
        /// Raw mode value
        mode: u8,
    },
    /// Buffer length disagrees with the plane size
    BufferSizeMismatch {
        /// Plane size in bytes
        expected: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// The busy line did not clear within the configured timeout
    ///
    /// The controller state is unknown afterwards; reset before reuse.
    HardwareTimeout {
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u32,
    },
    /// Command issued while the controller is in deep sleep
    ///
    /// Only [`Display::reset`](crate::Display::reset) or
    /// [`Display::initialize`](crate::Display::initialize) wake it.
    Asleep,
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::UnknownMode { mode } => write!(f, "Unknown init mode {mode}"),
            Self::BufferSizeMismatch { expected, provided } => {
                write!(
                    f,
                    "Buffer size mismatch: expected {expected} bytes, provided {provided}"
                )
            }
            Self::HardwareTimeout { timeout_ms } => {
                write!(f, "Display still busy after {timeout_ms}ms")
            }
            Self::Asleep => write!(f, "Display is in deep sleep"),
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

impl<I: DisplayInterface> From<SizeMismatch> for Error<I> {
    fn from(err: SizeMismatch) -> Self {
        Self::BufferSizeMismatch {
            expected: err.expected,
            provided: err.provided,
        }
    }
}

/// A plane buffer whose length differs from the panel's RAM size
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeMismatch {
    /// Plane size in bytes
    pub expected: usize,
    /// Provided buffer size in bytes
    pub provided: usize,
}

impl core::fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Plane buffer is {} bytes, panel needs {}",
            self.provided, self.expected
        )
    }
}

impl core::error::Error for SizeMismatch {}

/// Non-fatal per-pixel errors recorded while flushing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelError {
    /// The pixel's two bytes lie outside the supplied pixel buffer
    OutOfRange {
        /// X offset inside the dirty rectangle
        x: u16,
        /// Y offset inside the dirty rectangle
        y: u16,
        /// Pixel index into the buffer
        index: usize,
        /// Buffer length in bytes
        len: usize,
    },
    /// The quantizer produced no panel color
    Unclassified {
        /// X offset inside the dirty rectangle
        x: u16,
        /// Y offset inside the dirty rectangle
        y: u16,
        /// Low byte of the RGB565 pixel
        low: u8,
        /// High byte of the RGB565 pixel
        high: u8,
    },
}

impl core::fmt::Display for PixelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfRange { x, y, index, len } => write!(
                f,
                "Pixel ({x},{y}) out of range: index {index}, buffer {len} bytes"
            ),
            Self::Unclassified { x, y, low, high } => {
                write!(f, "Pixel ({x},{y}) unclassified: {low:#04x};{high:#04x}")
            }
        }
    }
}

impl core::error::Error for PixelError {}

/// Errors that can occur when building configuration
#[derive(Debug)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width requested
        width: u16,
        /// Height requested
        height: u16,
    },
    /// Busy-wait timeout of zero
    ///
    /// Every busy wait must be bounded.
    InvalidTimeout,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (max {MAX_SOURCE_OUTPUTS}x{MAX_GATE_OUTPUTS}, width must be multiple of 8)"
            ),
            Self::InvalidTimeout => write!(f, "Busy timeout must be nonzero"),
        }
    }
}

impl core::error::Error for BuilderError {}
