//! Dirty-rectangle flush into the landscape planes
//!
//! A renderer hands over a rectangle in panel pixel space and an RGB565 pixel
//! buffer covering it. Each pixel is quantized and written to both planes at
//! its rotated, mirrored position (see [`crate::rotation`]). Problems with
//! single pixels are logged, counted in the [`FlushReport`] and skipped; the
//! completion callback runs exactly once per flush no matter what.
//!
//! ## Pixel buffer layout
//!
//! Two bytes per pixel, low byte first, rows stored with the full panel width
//! as stride: the pixel at rectangle offset `(x, y)` starts at byte
//! `2 * (x + y * panel_width)`.
//!
//! ## Example
//!
//! ```
//! use epd2in66::{flush::flush_into, DirtyRect, Dimensions, Plane};
//!
//! let dims = Dimensions::PANEL_2IN66;
//! let (Ok(mut black), Ok(mut red)) = (
//!     Plane::new([0u8; 5624], dims),
//!     Plane::new([0u8; 5624], dims),
//! ) else {
//!     return;
//! };
//!
//! // One red pixel at (8, 0)
//! let Some(rect) = DirtyRect::new(8, 0, 8, 0) else { return };
//! let mut done = 0;
//! let report = flush_into(&mut black, &mut red, dims.width, &rect, &[0x00, 0xF8], || done += 1);
//!
//! assert_eq!(done, 1);
//! assert_eq!(report.written, 1);
//! assert_eq!(red.pixel(0, 144), Some(true));
//! ```

use crate::error::PixelError;
use crate::framebuffer::Plane;
use crate::quantize::quantize;
use crate::rotation::{mirror_position, to_landscape};

/// Inclusive rectangle in panel pixel space
///
/// Only [`DirtyRect::new`] builds one, so `x1 <= x2` and `y1 <= y2` always
/// hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyRect {
    x1: u16,
    y1: u16,
    x2: u16,
    y2: u16,
}

impl DirtyRect {
    /// Create a rectangle, `None` if `x2 < x1` or `y2 < y1`
    pub fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Option<Self> {
        if x2 < x1 || y2 < y1 {
            return None;
        }
        Some(Self { x1, y1, x2, y2 })
    }

    /// Left column
    pub fn x1(&self) -> u16 {
        self.x1
    }

    /// Top row
    pub fn y1(&self) -> u16 {
        self.y1
    }

    /// Right column, inclusive
    pub fn x2(&self) -> u16 {
        self.x2
    }

    /// Bottom row, inclusive
    pub fn y2(&self) -> u16 {
        self.y2
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.spans().map_or(0, |(w, _)| u32::from(w) + 1)
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.spans().map_or(0, |(_, h)| u32::from(h) + 1)
    }

    /// Largest x and y offsets inside the rectangle, `None` if inverted
    fn spans(&self) -> Option<(u16, u16)> {
        Some((self.x2.checked_sub(self.x1)?, self.y2.checked_sub(self.y1)?))
    }
}

/// Completion signal handed back to the renderer
///
/// Implemented for every `FnMut()`, so a closure is usually all a caller
/// needs.
pub trait FlushReady {
    /// The flush has finished and the pixel buffer may be reused
    fn flush_ready(&mut self);
}

impl<F: FnMut()> FlushReady for F {
    fn flush_ready(&mut self) {
        self();
    }
}

/// Outcome of one flush
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Pixels written to the planes
    pub written: usize,
    /// Pixels whose rotated position fell outside the planes
    pub clipped: usize,
    /// Pixels whose bytes lay outside the pixel buffer
    pub out_of_range: usize,
    /// Pixels the quantizer could not classify
    pub unclassified: usize,
    /// First per-pixel error seen
    pub first_error: Option<PixelError>,
}

impl FlushReport {
    /// `true` if no pixel error was recorded
    pub fn is_clean(&self) -> bool {
        self.first_error.is_none()
    }

    fn record(&mut self, error: PixelError) {
        log::warn!("flush: {}", error);
        match error {
            PixelError::OutOfRange { .. } => self.out_of_range += 1,
            PixelError::Unclassified { .. } => self.unclassified += 1,
        }
        if self.first_error.is_none() {
            self.first_error = Some(error);
        }
    }
}

/// Quantize `pixels` over `rect` into the two planes and signal completion
///
/// `panel_width` is the native panel width; it is both the mirror axis and
/// the pixel buffer row stride. `ready` is called exactly once, after the
/// last pixel.
pub fn flush_into<B1, B2, R>(
    black: &mut Plane<B1>,
    red: &mut Plane<B2>,
    panel_width: u16,
    rect: &DirtyRect,
    pixels: &[u8],
    mut ready: R,
) -> FlushReport
where
    B1: AsRef<[u8]> + AsMut<[u8]>,
    B2: AsRef<[u8]> + AsMut<[u8]>,
    R: FlushReady,
{
    let report = write_pixels(black, red, panel_width, rect, pixels);
    log::debug!(
        "flushed {:?}: {} written, {} clipped",
        rect,
        report.written,
        report.clipped
    );
    ready.flush_ready();
    report
}

fn write_pixels<B1, B2>(
    black: &mut Plane<B1>,
    red: &mut Plane<B2>,
    panel_width: u16,
    rect: &DirtyRect,
    pixels: &[u8],
) -> FlushReport
where
    B1: AsRef<[u8]> + AsMut<[u8]>,
    B2: AsRef<[u8]> + AsMut<[u8]>,
{
    let mut report = FlushReport::default();
    let stride = usize::from(panel_width);
    let Some((x_span, y_span)) = rect.spans() else {
        log::warn!("flush: inverted rectangle {:?}", rect);
        return report;
    };

    for y in 0..=y_span {
        for x in 0..=x_span {
            let index = usize::from(x) + usize::from(y) * stride;
            let start = index * 2;
            let Some(&[low, high]) = pixels.get(start..start + 2) else {
                report.record(PixelError::OutOfRange {
                    x,
                    y,
                    index,
                    len: pixels.len(),
                });
                continue;
            };

            let Some((black_bit, red_bit)) = quantize(low, high).plane_bits() else {
                report.record(PixelError::Unclassified { x, y, low, high });
                continue;
            };

            let (x_abs, y_abs) = mirror_position(x, y, rect.x1, rect.y1, panel_width);
            let (lx, ly) = to_landscape(x_abs, y_abs);
            if black.set_pixel(lx, ly, black_bit) {
                red.set_pixel(lx, ly, red_bit);
                report.written += 1;
            } else {
                log::trace!("clipped pixel at ({}, {})", x_abs, y_abs);
                report.clipped += 1;
            }
        }
    }
    report
}
