//! Core display operations
//!
//! [`Display`] owns the controller's command protocol: reset timing, RAM
//! window and cursor addressing, waveform upload, plane upload, activation
//! and deep sleep. Every wait on the busy line is bounded by
//! [`Config::busy_timeout_ms`].

use embedded_hal::delay::DelayNs;

use crate::command::{
    BORDER_FAST, BORDER_PARTIAL, BORDER_WAVEFORM, DATA_ENTRY_MODE, DATA_ENTRY_XINC_YINC,
    DEEP_SLEEP, DEEP_SLEEP_MODE_1, DISPLAY_OPTION_PARTIAL, DISPLAY_UPDATE_CTRL2,
    MASTER_ACTIVATION, SET_RAM_X_COUNTER, SET_RAM_X_RANGE, SET_RAM_Y_COUNTER, SET_RAM_Y_RANGE,
    SOFT_RESET, UPDATE_CTRL2_PARTIAL, WRITE_DISPLAY_OPTION, WRITE_LUT, WRITE_RAM_BW,
    WRITE_RAM_RED,
};
use crate::config::{Config, Dimensions};
use crate::error::{Error, MAX_SOURCE_OUTPUTS};
use crate::interface::DisplayInterface;
use crate::lut::LUT_PARTIAL;
use crate::rotation::landscape_upload_index;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Bytes per SPI block when streaming fills and landscape rows
const BLOCK_BYTES: usize = (MAX_SOURCE_OUTPUTS / 8) as usize;

/// Controller initialization mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum InitMode {
    /// Fast mode: OTP waveform, border set to follow LUT 1
    Fast = 0,
    /// Partial mode: uploads the partial waveform and display options
    Partial = 1,
}

impl TryFrom<u8> for InitMode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Fast),
            1 => Ok(Self::Partial),
            other => Err(other),
        }
    }
}

/// Controller RAM plane
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneSelector {
    /// Black/white RAM
    Black,
    /// Red RAM
    Red,
}

impl PlaneSelector {
    /// RAM-write opcode for this plane
    pub fn command(self) -> u8 {
        match self {
            Self::Black => WRITE_RAM_BW,
            Self::Red => WRITE_RAM_RED,
        }
    }
}

/// Logical controller state as tracked by the driver
///
/// A failed operation leaves the state where it failed, which marks the
/// controller as indeterminate until the next [`Display::initialize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControllerState {
    /// Nothing sent yet
    #[default]
    Uninitialized,
    /// Reset pulse sent, not configured
    Resetting,
    /// Soft reset issued, not yet configured
    AwaitingBusyClear,
    /// Ready for RAM writes and updates
    Configured(InitMode),
    /// Display update running
    Updating,
    /// Deep sleep, only a reset wakes the controller
    Sleeping,
}

/// Core display driver
///
/// This struct provides the controller protocol. For framebuffers and the
/// flush path, wrap it in a [`Panel`](crate::Panel).
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Protocol state
    state: ControllerState,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            state: ControllerState::Uninitialized,
        }
    }

    /// Hardware reset pulse (200ms high, 200ms low, 200ms high)
    ///
    /// Wakes the controller from deep sleep.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        log::debug!("hardware reset");
        self.state = ControllerState::Resetting;
        self.interface.reset(delay).map_err(Error::Interface)
    }

    /// Issue a soft reset and wait for the controller to come back
    ///
    /// The state stays [`ControllerState::AwaitingBusyClear`] until
    /// [`initialize`](Self::initialize) configures the controller.
    pub fn software_reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.ensure_awake()?;
        self.send_command(SOFT_RESET)?;
        self.state = ControllerState::AwaitingBusyClear;
        self.wait_busy(delay)
    }

    /// Program the RAM data entry mode (X increment, Y increment)
    pub fn set_ram_entry_mode(&mut self) -> DisplayResult<I> {
        self.ensure_awake()?;
        self.send_command(DATA_ENTRY_MODE)?;
        self.send_data(DATA_ENTRY_XINC_YINC)
    }

    /// Set the RAM window
    ///
    /// X coordinates are sent as byte addresses (`x >> 3`), so the low three
    /// bits are ignored. Y coordinates are sent little-endian.
    pub fn set_window(
        &mut self,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
    ) -> DisplayResult<I> {
        self.ensure_awake()?;
        self.send_command(SET_RAM_X_RANGE)?;
        self.send_data((x_start >> 3) as u8)?;
        self.send_data((x_end >> 3) as u8)?;

        self.send_command(SET_RAM_Y_RANGE)?;
        let [y_start_lo, y_start_hi] = y_start.to_le_bytes();
        let [y_end_lo, y_end_hi] = y_end.to_le_bytes();
        self.send_data(y_start_lo)?;
        self.send_data(y_start_hi)?;
        self.send_data(y_end_lo)?;
        self.send_data(y_end_hi)
    }

    /// Set the RAM address counter
    pub fn set_cursor(&mut self, x: u8, y: u16) -> DisplayResult<I> {
        self.ensure_awake()?;
        self.send_command(SET_RAM_X_COUNTER)?;
        self.send_data(x)?;

        self.send_command(SET_RAM_Y_COUNTER)?;
        let [lo, hi] = y.to_le_bytes();
        self.send_data(lo)?;
        self.send_data(hi)
    }

    /// Reset and configure the controller
    ///
    /// Runs the reset pulse, soft reset, data entry mode and RAM window, then
    /// the mode-specific setup:
    /// - [`InitMode::Fast`]: border waveform only
    /// - [`InitMode::Partial`]: waveform upload, display options, border and
    ///   update control, then one activation
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D, mode: InitMode) -> DisplayResult<I> {
        log::debug!("initializing in {:?} mode", mode);
        self.reset(delay)?;
        self.software_reset(delay)?;
        self.set_ram_entry_mode()?;

        let Dimensions { width, height } = self.config.dimensions;
        self.set_window(self.config.window_x_start, 0, width, height)?;

        match mode {
            InitMode::Fast => {
                self.send_command(BORDER_WAVEFORM)?;
                self.send_data(BORDER_FAST)?;
            }
            InitMode::Partial => {
                self.upload_waveform(delay)?;

                self.send_command(WRITE_DISPLAY_OPTION)?;
                self.send_block(&DISPLAY_OPTION_PARTIAL)?;

                self.send_command(BORDER_WAVEFORM)?;
                self.send_data(BORDER_PARTIAL)?;

                self.send_command(DISPLAY_UPDATE_CTRL2)?;
                self.send_data(UPDATE_CTRL2_PARTIAL)?;

                self.send_command(MASTER_ACTIVATION)?;
                self.wait_busy(delay)?;
            }
        }

        self.state = ControllerState::Configured(mode);
        Ok(())
    }

    /// Initialize from a raw mode number (0 = fast, 1 = partial)
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownMode` for any other value, before touching the
    /// hardware.
    pub fn initialize_raw<D: DelayNs>(&mut self, delay: &mut D, mode: u8) -> DisplayResult<I> {
        let mode = InitMode::try_from(mode).map_err(|mode| {
            log::warn!("no such init mode: {}", mode);
            Error::UnknownMode { mode }
        })?;
        self.initialize(delay, mode)
    }

    /// Upload the 153-byte partial waveform and wait for the controller
    pub fn upload_waveform<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.ensure_awake()?;
        self.send_command(WRITE_LUT)?;
        self.send_block(&LUT_PARTIAL)?;
        self.wait_busy(delay)
    }

    /// Write a whole plane verbatim to controller RAM
    ///
    /// The RAM cursor is set to [`Config::ram_origin`] first.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferSizeMismatch` if `bytes` is not exactly
    /// `dimensions.buffer_size()` long; nothing is sent in that case.
    pub fn upload_plane(&mut self, selector: PlaneSelector, bytes: &[u8]) -> DisplayResult<I> {
        self.ensure_awake()?;
        self.check_plane_len(bytes.len())?;
        log::debug!("uploading {:?} plane ({} bytes)", selector, bytes.len());

        self.start_ram_write(selector)?;
        self.send_block(bytes)
    }

    /// Write a landscape, vertical-LSB-first plane to controller RAM
    ///
    /// Streams the plane in panel row order: for every panel row, the byte
    /// pages of the landscape plane are taken last to first, which performs
    /// the rotation and mirroring of [`crate::rotation`] on the way out.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferSizeMismatch` on a length mismatch; nothing is
    /// sent in that case.
    pub fn upload_landscape_plane(
        &mut self,
        selector: PlaneSelector,
        plane: &[u8],
    ) -> DisplayResult<I> {
        self.ensure_awake()?;
        self.check_plane_len(plane.len())?;
        log::debug!("uploading landscape {:?} plane", selector);

        self.start_ram_write(selector)?;

        let width_bytes = usize::from(self.config.dimensions.width / 8);
        let height = usize::from(self.config.dimensions.height);
        let mut block = [0u8; BLOCK_BYTES];
        for row in 0..height {
            let mut filled = 0;
            for column in 0..width_bytes {
                block[filled] = plane[landscape_upload_index(row, column, width_bytes, height)];
                filled += 1;
                if filled == block.len() {
                    self.send_block(&block)?;
                    filled = 0;
                }
            }
            if filled > 0 {
                self.send_block(&block[..filled])?;
            }
        }
        Ok(())
    }

    /// Run the display update and wait for it to finish
    pub fn activate_display<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.ensure_awake()?;
        let previous = self.state;
        self.state = ControllerState::Updating;
        self.send_command(MASTER_ACTIVATION)?;
        self.wait_busy(delay)?;
        self.state = previous;
        Ok(())
    }

    /// Fill both RAM planes and refresh
    ///
    /// The black RAM gets `fill`, the red RAM gets `!fill`.
    pub fn clear<D: DelayNs>(&mut self, delay: &mut D, fill: u8) -> DisplayResult<I> {
        self.ensure_awake()?;
        self.start_ram_write(PlaneSelector::Black)?;
        self.write_repeated(fill)?;
        self.start_ram_write(PlaneSelector::Red)?;
        self.write_repeated(!fill)?;
        self.activate_display(delay)
    }

    /// Enter deep sleep
    ///
    /// Every command except [`reset`](Self::reset) and
    /// [`initialize`](Self::initialize) fails with `Error::Asleep` afterwards.
    pub fn sleep(&mut self) -> DisplayResult<I> {
        self.ensure_awake()?;
        self.send_command(DEEP_SLEEP)?;
        self.send_data(DEEP_SLEEP_MODE_1)?;
        self.state = ControllerState::Sleeping;
        log::debug!("entered deep sleep");
        Ok(())
    }

    /// Wait for the busy line to clear
    ///
    /// Settles for one poll interval, polls every [`Config::busy_poll_ms`]
    /// until the line is idle, then settles once more.
    ///
    /// # Errors
    ///
    /// Returns `Error::HardwareTimeout` once [`Config::busy_timeout_ms`] has
    /// elapsed with the line still busy. A timeout of 0 fails on the first
    /// busy sample.
    pub fn wait_busy<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let poll_ms = self.config.busy_poll_ms;
        let timeout_ms = self.config.busy_timeout_ms;

        log::debug!("e-Paper busy");
        delay.delay_ms(poll_ms);

        let mut waited_ms: u32 = 0;
        while self.interface.is_busy().map_err(Error::Interface)? {
            if waited_ms >= timeout_ms {
                log::error!("busy line stuck after {}ms", waited_ms);
                return Err(Error::HardwareTimeout { timeout_ms });
            }
            delay.delay_ms(poll_ms);
            waited_ms = waited_ms.saturating_add(poll_ms);
        }

        log::debug!("e-Paper busy release after {}ms", waited_ms);
        delay.delay_ms(poll_ms);
        Ok(())
    }

    /// Current protocol state
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Release the hardware interface
    pub fn release(self) -> I {
        self.interface
    }

    fn ensure_awake(&self) -> DisplayResult<I> {
        if self.state == ControllerState::Sleeping {
            log::warn!("command rejected: display is asleep");
            return Err(Error::Asleep);
        }
        Ok(())
    }

    fn check_plane_len(&self, provided: usize) -> DisplayResult<I> {
        let expected = self.config.dimensions.buffer_size();
        if provided != expected {
            return Err(Error::BufferSizeMismatch { expected, provided });
        }
        Ok(())
    }

    /// Point the cursor at the RAM origin and open a RAM write
    fn start_ram_write(&mut self, selector: PlaneSelector) -> DisplayResult<I> {
        let (x, y) = self.config.ram_origin;
        self.set_cursor(x, y)?;
        self.send_command(selector.command())
    }

    /// Send `byte` repeated over one full plane
    fn write_repeated(&mut self, byte: u8) -> DisplayResult<I> {
        let block = [byte; BLOCK_BYTES];
        let mut remaining = self.config.dimensions.buffer_size();
        while remaining > 0 {
            let len = remaining.min(block.len());
            self.send_block(&block[..len])?;
            remaining -= len;
        }
        Ok(())
    }

    /// Send a command to the display controller
    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    /// Send one data byte to the display controller
    fn send_data(&mut self, data: u8) -> DisplayResult<I> {
        self.interface.send_data(data).map_err(Error::Interface)
    }

    /// Send a data block to the display controller
    fn send_block(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.interface.send_block(data).map_err(Error::Interface)
    }
}
