//! Landscape bit planes
//!
//! A [`Plane`] is one 1-bit-per-pixel buffer laid out in landscape: its width
//! is the panel's height and its height the panel's width. Pixels are packed
//! vertical-LSB-first (see [`vlsb_index`]). The panel handle keeps two of
//! them, one for the black/white RAM and one for the red RAM.
//!
//! ## Example
//!
//! ```
//! use epd2in66::{Dimensions, Plane};
//!
//! let dims = Dimensions::PANEL_2IN66;
//! let mut plane = match Plane::new([0u8; 5624], dims) {
//!     Ok(plane) => plane,
//!     Err(_) => return,
//! };
//! assert_eq!((plane.width(), plane.height()), (296, 152));
//!
//! plane.fill(0xFF);
//! plane.set_pixel(10, 3, false);
//! assert_eq!(plane.pixel(10, 3), Some(false));
//! assert_eq!(plane.as_bytes()[10], 0xF7);
//! ```

use crate::config::Dimensions;
use crate::error::SizeMismatch;
use crate::rotation::vlsb_index;

/// One landscape, vertical-LSB-first bit plane
#[derive(Clone, Debug)]
pub struct Plane<B> {
    buffer: B,
    /// Landscape width (panel height)
    width: u16,
    /// Landscape height (panel width)
    height: u16,
}

impl<B> Plane<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap a buffer as the landscape plane of a panel with native `dimensions`
    ///
    /// # Errors
    ///
    /// Returns [`SizeMismatch`] unless the buffer is exactly
    /// `dimensions.buffer_size()` bytes.
    pub fn new(buffer: B, dimensions: Dimensions) -> Result<Self, SizeMismatch> {
        let expected = dimensions.buffer_size();
        let provided = buffer.as_ref().len();
        if provided != expected {
            return Err(SizeMismatch { expected, provided });
        }
        Ok(Self {
            buffer,
            width: dimensions.height,
            height: dimensions.width,
        })
    }

    /// Landscape width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Landscape height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Set or clear one pixel
    ///
    /// Coordinates outside the plane, or past the end of the buffer when the
    /// landscape height is not a multiple of 8, are ignored. Returns whether a
    /// bit was written.
    pub fn set_pixel(&mut self, x: i32, y: i32, value: bool) -> bool {
        let Some((index, bit)) = self.locate(x, y) else {
            return false;
        };
        let Some(byte) = self.buffer.as_mut().get_mut(index) else {
            return false;
        };
        if value {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
        true
    }

    /// Read one pixel, `None` outside the plane
    pub fn pixel(&self, x: i32, y: i32) -> Option<bool> {
        let (index, bit) = self.locate(x, y)?;
        self.buffer.as_ref().get(index).map(|byte| byte & bit != 0)
    }

    /// Set every byte of the plane to `byte`
    pub fn fill(&mut self, byte: u8) {
        self.buffer.as_mut().fill(byte);
    }

    /// Raw plane bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// Give back the underlying buffer
    pub fn into_inner(self) -> B {
        self.buffer
    }

    /// Locate a pixel, `None` outside the plane
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        if x >= u32::from(self.width) || y >= u32::from(self.height) {
            return None;
        }
        Some(vlsb_index(x, y, u32::from(self.width)))
    }
}

#[cfg(feature = "alloc")]
impl Plane<alloc::vec::Vec<u8>> {
    /// Allocate a zeroed plane for a panel with native `dimensions`
    pub fn allocate(dimensions: Dimensions) -> Self {
        Self {
            buffer: alloc::vec![0u8; dimensions.buffer_size()],
            width: dimensions.height,
            height: dimensions.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_plane() -> Plane<[u8; 16]> {
        // 16 x 8 native -> 8 wide, 16 tall landscape
        Plane::new([0u8; 16], Dimensions::new(16, 8).unwrap()).unwrap()
    }

    #[test]
    fn test_plane_size_must_match() {
        let dims = Dimensions::PANEL_2IN66;
        assert!(Plane::new(alloc::vec![0u8; 5624], dims).is_ok());
        let err = Plane::new(alloc::vec![0u8; 5623], dims).unwrap_err();
        assert_eq!(
            err,
            SizeMismatch {
                expected: 5624,
                provided: 5623
            }
        );
        assert!(Plane::new(alloc::vec![0u8; 5625], dims).is_err());
    }

    #[test]
    fn test_landscape_dimensions() {
        let plane = small_plane();
        assert_eq!(plane.width(), 8);
        assert_eq!(plane.height(), 16);
    }

    #[test]
    fn test_set_pixel_is_vertical_lsb_first() {
        let mut plane = small_plane();
        assert!(plane.set_pixel(0, 0, true));
        assert!(plane.set_pixel(0, 7, true));
        assert!(plane.set_pixel(2, 9, true));
        assert_eq!(plane.as_bytes()[0], 0x81);
        assert_eq!(plane.as_bytes()[8 + 2], 0x02);
    }

    #[test]
    fn test_clear_pixel() {
        let mut plane = small_plane();
        plane.fill(0xFF);
        plane.set_pixel(5, 4, false);
        assert_eq!(plane.as_bytes()[5], 0xEF);
        assert_eq!(plane.pixel(5, 4), Some(false));
        assert_eq!(plane.pixel(5, 3), Some(true));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut plane = small_plane();
        assert!(!plane.set_pixel(8, 0, true));
        assert!(!plane.set_pixel(0, 16, true));
        assert!(!plane.set_pixel(-1, 0, true));
        assert!(plane.as_bytes().iter().all(|b| *b == 0));
        assert_eq!(plane.pixel(0, -1), None);
    }

    #[test]
    fn test_fill() {
        let mut plane = small_plane();
        plane.fill(0xA5);
        assert!(plane.as_bytes().iter().all(|b| *b == 0xA5));
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_allocate_matches_panel() {
        let plane = Plane::allocate(Dimensions::PANEL_2IN66);
        assert_eq!(plane.as_bytes().len(), 5624);
        assert_eq!((plane.width(), plane.height()), (296, 152));
    }

    #[test]
    fn test_unaligned_height_never_indexes_past_buffer() {
        // width 150 skips Dimensions::new, so the last byte page is partial
        let dims = Dimensions {
            width: 150,
            height: 296,
        };
        let mut plane = Plane::new(alloc::vec![0u8; 5550], dims).unwrap();
        assert!(!plane.set_pixel(295, 149, true));
        assert_eq!(plane.pixel(295, 149), None);
        assert!(plane.set_pixel(0, 0, true));
        assert_eq!(plane.pixel(0, 0), Some(true));
    }
}
