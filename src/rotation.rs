//! Coordinate rotation utilities
//!
//! The panel is wired in portrait (152 x 296) but its framebuffers are kept in
//! landscape: axes swapped, with the panel's x axis mirrored. These helpers
//! hold that mapping in one place so the flush path, the drawing path and the
//! landscape upload agree on it.
//!
//! ## Mapping
//!
//! - A pixel at offset `(x_rel, y_rel)` of a dirty rectangle with origin
//!   `(x_start, y_start)` lands at absolute `(W - (x_rel + x_start), y_rel + y_start)`.
//! - Absolute `(x_abs, y_abs)` is stored at landscape plane coordinate `(y_abs, x_abs)`.
//! - Landscape planes are packed vertical-LSB-first: 8 vertically adjacent
//!   pixels per byte, the topmost in bit 0.
//!
//! ## Example
//!
//! ```
//! use epd2in66::rotation::{mirror_position, to_landscape, vlsb_index};
//!
//! // Rectangle origin (8, 0) on a 152-wide panel
//! let (x_abs, y_abs) = mirror_position(0, 0, 8, 0, 152);
//! assert_eq!((x_abs, y_abs), (144, 0));
//!
//! let (lx, ly) = to_landscape(x_abs, y_abs);
//! assert_eq!((lx, ly), (0, 144));
//!
//! // Landscape plane is 296 wide: row 144 sits in byte page 18, bit 0
//! assert_eq!(vlsb_index(0, 144, 296), (18 * 296, 0x01));
//! ```

/// Map a dirty-rectangle pixel to its absolute, mirrored panel position
///
/// # Arguments
///
/// * `x_rel`, `y_rel` - Offset inside the dirty rectangle
/// * `x_start`, `y_start` - Rectangle origin in panel pixel space
/// * `panel_width` - Native panel width
///
/// The result may fall outside the panel (e.g. `x_abs == panel_width` for a
/// pixel at `x == 0`); callers clip against the plane.
pub fn mirror_position(
    x_rel: u16,
    y_rel: u16,
    x_start: u16,
    y_start: u16,
    panel_width: u16,
) -> (i32, i32) {
    let x_abs = i32::from(panel_width) - (i32::from(x_rel) + i32::from(x_start));
    let y_abs = i32::from(y_rel) + i32::from(y_start);
    (x_abs, y_abs)
}

/// Landscape plane coordinate of an absolute panel position
pub fn to_landscape(x_abs: i32, y_abs: i32) -> (i32, i32) {
    (y_abs, x_abs)
}

/// Byte index and bit mask of a pixel in a vertical-LSB-first plane
///
/// # Arguments
///
/// * `x` - Column, 0 to plane_width-1
/// * `y` - Row
/// * `plane_width` - Plane width in pixels
pub fn vlsb_index(x: u32, y: u32, plane_width: u32) -> (usize, u8) {
    let index = ((y / 8) * plane_width + x) as usize;
    let bit = 0x01 << (y % 8);
    (index, bit)
}

/// Index of the landscape plane byte sent at panel row `row`, byte column `column`
///
/// The landscape upload walks panel rows top to bottom, and within a row
/// takes the plane's byte pages in reverse.
///
/// # Arguments
///
/// * `row` - Panel row, 0 to height-1
/// * `column` - Byte column in the row, 0 to width/8-1
/// * `width_bytes` - Panel width in bytes
/// * `height` - Panel height in pixels (the landscape plane width)
pub fn landscape_upload_index(
    row: usize,
    column: usize,
    width_bytes: usize,
    height: usize,
) -> usize {
    (width_bytes - column - 1) * height + row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_origin_maps_to_mirrored_column() {
        // (x_start, y_start, W) -> (W - x_start, y_start)
        let cases: [(u16, u16, u16); 6] = [
            (0, 0, 152),
            (8, 0, 152),
            (0, 10, 152),
            (151, 295, 152),
            (16, 3, 128),
            (200, 0, 152),
        ];
        for (x_start, y_start, width) in cases {
            let (x_abs, y_abs) = mirror_position(0, 0, x_start, y_start, width);
            assert_eq!(x_abs, i32::from(width) - i32::from(x_start));
            assert_eq!(y_abs, i32::from(y_start));
        }
    }

    #[test]
    fn test_mirror_moves_left_as_x_grows() {
        let (a, _) = mirror_position(3, 0, 10, 0, 152);
        let (b, _) = mirror_position(4, 0, 10, 0, 152);
        assert_eq!(a, 139);
        assert_eq!(b, 138);
    }

    #[test]
    fn test_to_landscape_swaps_axes() {
        assert_eq!(to_landscape(5, 100), (100, 5));
    }

    #[test]
    fn test_vlsb_index() {
        // 8x8 plane: column 0, rows 0..7 share byte 0
        assert_eq!(vlsb_index(0, 0, 8), (0, 0x01));
        assert_eq!(vlsb_index(0, 7, 8), (0, 0x80));
        // next column is the next byte
        assert_eq!(vlsb_index(1, 0, 8), (1, 0x01));
        // row 8 starts the second page
        assert_eq!(vlsb_index(0, 8, 8), (8, 0x01));
        assert_eq!(vlsb_index(295, 151, 296), (18 * 296 + 295, 0x80));
    }

    #[test]
    fn test_landscape_upload_index() {
        // first byte sent is the last page, column 0
        assert_eq!(landscape_upload_index(0, 0, 19, 296), 18 * 296);
        // last byte of the first row is page 0
        assert_eq!(landscape_upload_index(0, 18, 19, 296), 0);
        assert_eq!(landscape_upload_index(295, 18, 19, 296), 295);
    }
}
