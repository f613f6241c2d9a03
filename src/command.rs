//! Controller command definitions
//!
//! Opcodes and fixed payloads understood by the SSD1680-class controller on
//! the 2.66" tri-color panel. Commands are sent with the DC pin low, their
//! payload bytes with the DC pin high.
//!
//! ## Command Structure
//!
//! Every byte (or block) goes out in its own chip-select frame:
//! 1. Release CS
//! 2. Set DC low (command) or high (data)
//! 3. Assert CS
//! 4. Send the byte(s)
//! 5. Release CS
//!
//! ## Example
//!
//! ```rust,no_run
//! use epd2in66::{command, DisplayInterface};
//! # fn demo<I: DisplayInterface>(interface: &mut I) {
//! // Soft reset
//! let _ = interface.send_command(command::SOFT_RESET);
//!
//! // Data entry mode: X increment, Y increment
//! let _ = interface.send_command(command::DATA_ENTRY_MODE);
//! let _ = interface.send_data(command::DATA_ENTRY_XINC_YINC);
//! # }
//! ```

// System control commands

/// Soft reset command (0x12)
///
/// Restores register defaults (RAM is kept). BUSY stays high until done.
pub const SOFT_RESET: u8 = 0x12;

/// Deep sleep command (0x10)
///
/// Enters deep sleep. Only a hardware reset can wake the controller.
/// Requires 1 byte, see [`DEEP_SLEEP_MODE_1`].
pub const DEEP_SLEEP: u8 = 0x10;

/// Border waveform control command (0x3C)
///
/// Selects the waveform driven on the border. Requires 1 byte:
/// [`BORDER_FAST`] or [`BORDER_PARTIAL`].
pub const BORDER_WAVEFORM: u8 = 0x3C;

/// Write display option command (0x37)
///
/// Enables the "previous" functions needed by the partial waveform.
/// Requires 10 bytes, see [`DISPLAY_OPTION_PARTIAL`].
pub const WRITE_DISPLAY_OPTION: u8 = 0x37;

// RAM and data commands

/// Data entry mode command (0x11)
///
/// Sets how the RAM address counter advances after each data byte.
/// Requires 1 byte: bits 1:0 pick X/Y increment or decrement, bit 2 picks
/// which counter moves first. This driver always sends
/// [`DATA_ENTRY_XINC_YINC`].
pub const DATA_ENTRY_MODE: u8 = 0x11;

/// Set RAM X address range command (0x44)
///
/// Requires 2 bytes: [start / 8, end / 8]
pub const SET_RAM_X_RANGE: u8 = 0x44;

/// Set RAM Y address range command (0x45)
///
/// Requires 4 bytes: [start_LSB, start_MSB, end_LSB, end_MSB]
pub const SET_RAM_Y_RANGE: u8 = 0x45;

/// Set RAM X address counter command (0x4E)
///
/// Requires 1 byte.
pub const SET_RAM_X_COUNTER: u8 = 0x4E;

/// Set RAM Y address counter command (0x4F)
///
/// Requires 2 bytes: [address_LSB, address_MSB]
pub const SET_RAM_Y_COUNTER: u8 = 0x4F;

/// Write to BW RAM command (0x24)
///
/// Bit=1: White, Bit=0: Black
pub const WRITE_RAM_BW: u8 = 0x24;

/// Write to RED RAM command (0x26)
///
/// Bit=1: Red (overrides BW for that pixel)
pub const WRITE_RAM_RED: u8 = 0x26;

// Display update commands

/// Display update control 2 command (0x22)
///
/// Selects the update sequence run by [`MASTER_ACTIVATION`].
pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;

/// Master activation command (0x20)
///
/// Runs the sequence chosen by [`DISPLAY_UPDATE_CTRL2`] (or the OTP
/// default). BUSY is held high until the panel has refreshed.
pub const MASTER_ACTIVATION: u8 = 0x20;

/// Write LUT command (0x32)
///
/// Loads the waveform table. Requires 153 bytes.
pub const WRITE_LUT: u8 = 0x32;

// Fixed payloads

/// Data entry mode payload: X increment, Y increment
pub const DATA_ENTRY_XINC_YINC: u8 = 0x03;

/// Border waveform payload used by the fast init mode
pub const BORDER_FAST: u8 = 0x01;

/// Border waveform payload used by the partial init mode
pub const BORDER_PARTIAL: u8 = 0x80;

/// Update control 2 payload used by the partial init mode
pub const UPDATE_CTRL2_PARTIAL: u8 = 0xCF;

/// Deep sleep payload (mode 1)
pub const DEEP_SLEEP_MODE_1: u8 = 0x01;

/// Display option sequence written by the partial init mode
pub const DISPLAY_OPTION_PARTIAL: [u8; 10] =
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00];
