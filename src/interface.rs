//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for talking to the panel controller over SPI.
//!
//! ## Hardware Requirements
//!
//! The panel requires:
//! - SPI bus (MOSI + SCK, 4 MHz on the reference board)
//! - 4 GPIO pins:
//!   - **CS**: Chip select (output, active low)
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low)
//!   - **BUSY**: Busy status (input, active high)
//!
//! Chip select is driven by this crate rather than by an `SpiDevice`, because
//! every byte has to be framed by its own CS pulse.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::SpiBus;
//! use epd2in66::{DisplayInterface, Interface};
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
//! // SPI bus, then CS, DC, RST and BUSY
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin, MockPin);
//!
//! let _ = interface.reset(&mut delay);
//!
//! // Send command
//! let _ = interface.send_command(0x12); // Soft reset
//!
//! // Send data
//! let _ = interface.send_block(&[0xFF, 0x00, 0xFF]);
//!
//! // Poll the busy line
//! let _ = interface.is_busy();
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Hold time of each phase of the reset pulse, in milliseconds
pub const RESET_PULSE_MS: u32 = 200;

/// Trait for hardware interface to the panel controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// Every call is a self-contained transfer; implementations must not batch
/// bytes across calls.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a command byte to the controller
    ///
    /// The implementation must:
    /// 1. Release CS
    /// 2. Set DC pin low (command mode)
    /// 3. Assert CS, send the byte, release CS
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send a single data byte to the controller
    ///
    /// Same framing as [`send_command`](Self::send_command) with DC high.
    fn send_data(&mut self, data: u8) -> InterfaceResult<(), Self::Error>;

    /// Send a block of data bytes in one chip-select frame
    fn send_block(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Perform the hardware reset pulse
    ///
    /// The implementation must drive RST high, low, then high again,
    /// holding each level for [`RESET_PULSE_MS`].
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;

    /// Sample the busy line
    ///
    /// Returns `true` while the controller is processing a command.
    fn is_busy(&mut self) -> InterfaceResult<bool, Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Hardware interface implementation
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI bus and GPIO traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI bus implementing [`SpiBus`]
/// * `CS` - Chip select pin implementing [`OutputPin`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
pub struct Interface<SPI, CS, DC, RST, BUSY> {
    /// SPI bus for communication
    spi: SPI,
    /// Chip select pin (active low)
    cs: CS,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Busy pin
    busy: BUSY,
    /// Busy pin polarity (true = active high, false = active low)
    busy_active_high: bool,
}

impl<SPI, CS, DC, RST, BUSY> Interface<SPI, CS, DC, RST, BUSY>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Create a new Interface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI bus (must implement [`SpiBus`])
    /// * `cs` - Chip select pin (output, active low)
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    /// * `busy` - Busy pin (input, active high)
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            cs,
            dc,
            rst,
            busy,
            busy_active_high: true,
        }
    }

    /// Set busy pin polarity
    ///
    /// Default is active-high. Set to false for active-low panels.
    pub fn set_busy_active_high(&mut self, active_high: bool) -> &mut Self {
        self.busy_active_high = active_high;
        self
    }

    /// Get busy pin polarity (true = active high)
    pub fn busy_active_high(&self) -> bool {
        self.busy_active_high
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, CS, DC, RST, BUSY) {
        (self.spi, self.cs, self.dc, self.rst, self.busy)
    }
}

impl<SPI, CS, DC, RST, BUSY, PinErr> Interface<SPI, CS, DC, RST, BUSY>
where
    SPI: SpiBus,
    CS: OutputPin<Error = PinErr>,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
{
    /// Write `bytes` inside one chip-select frame
    ///
    /// CS is released even when the SPI write fails.
    fn framed_write(
        &mut self,
        data_mode: bool,
        bytes: &[u8],
    ) -> InterfaceResult<(), InterfaceError<SPI::Error, PinErr>> {
        self.cs.set_high().map_err(InterfaceError::Pin)?;
        if data_mode {
            self.dc.set_high().map_err(InterfaceError::Pin)?;
        } else {
            self.dc.set_low().map_err(InterfaceError::Pin)?;
        }
        self.cs.set_low().map_err(InterfaceError::Pin)?;

        let written = self.spi.write(bytes).and_then(|()| self.spi.flush());

        self.cs.set_high().map_err(InterfaceError::Pin)?;
        written.map_err(InterfaceError::Spi)
    }
}

impl<SPI, CS, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, CS, DC, RST, BUSY>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    CS: OutputPin<Error = PinErr>,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.framed_write(false, &[command])
    }

    fn send_data(&mut self, data: u8) -> InterfaceResult<(), Self::Error> {
        self.framed_write(true, &[data])
    }

    fn send_block(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.framed_write(true, data)
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        // HIGH -> LOW -> HIGH, each held for the full pulse time
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        Ok(())
    }

    fn is_busy(&mut self) -> InterfaceResult<bool, Self::Error> {
        let level = if self.busy_active_high {
            self.busy.is_high()
        } else {
            self.busy.is_low()
        };
        level.map_err(InterfaceError::Pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use embedded_hal::digital::ErrorType;
    use embedded_hal::spi::ErrorType as SpiErrorType;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Cs(bool),
        Dc(bool),
        Rst(bool),
        Write(Vec<u8>),
        Flush,
        DelayMs(u32),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    #[derive(Debug, Clone, Copy)]
    struct MockError;

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    struct MockSpi {
        log: Log,
        fail: bool,
    }

    impl SpiErrorType for MockSpi {
        type Error = MockError;
    }

    impl SpiBus for MockSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(MockError);
            }
            self.log.borrow_mut().push(Event::Write(words.to_vec()));
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push(Event::Flush);
            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum Role {
        Cs,
        Dc,
        Rst,
    }

    struct MockPin {
        log: Log,
        role: Role,
    }

    impl ErrorType for MockPin {
        type Error = MockError;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.record(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.record(true);
            Ok(())
        }
    }

    impl MockPin {
        fn record(&self, level: bool) {
            let event = match self.role {
                Role::Cs => Event::Cs(level),
                Role::Dc => Event::Dc(level),
                Role::Rst => Event::Rst(level),
            };
            self.log.borrow_mut().push(event);
        }
    }

    struct MockBusy {
        high: bool,
    }

    impl ErrorType for MockBusy {
        type Error = MockError;
    }

    impl InputPin for MockBusy {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }
    }

    struct MockDelay {
        log: Log,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Event::DelayMs(ms));
        }
    }

    fn interface(
        log: &Log,
        busy_high: bool,
        spi_fails: bool,
    ) -> Interface<MockSpi, MockPin, MockPin, MockPin, MockBusy> {
        let pin = |role| MockPin {
            log: log.clone(),
            role,
        };
        Interface::new(
            MockSpi {
                log: log.clone(),
                fail: spi_fails,
            },
            pin(Role::Cs),
            pin(Role::Dc),
            pin(Role::Rst),
            MockBusy { high: busy_high },
        )
    }

    #[test]
    fn test_command_framing() {
        let log = Log::default();
        let mut interface = interface(&log, false, false);
        interface.send_command(0x12).unwrap();
        assert_eq!(
            *log.borrow(),
            alloc::vec![
                Event::Cs(true),
                Event::Dc(false),
                Event::Cs(false),
                Event::Write(alloc::vec![0x12]),
                Event::Flush,
                Event::Cs(true),
            ]
        );
    }

    #[test]
    fn test_data_framing() {
        let log = Log::default();
        let mut interface = interface(&log, false, false);
        interface.send_data(0x03).unwrap();
        assert_eq!(
            *log.borrow(),
            alloc::vec![
                Event::Cs(true),
                Event::Dc(true),
                Event::Cs(false),
                Event::Write(alloc::vec![0x03]),
                Event::Flush,
                Event::Cs(true),
            ]
        );
    }

    #[test]
    fn test_each_call_is_framed_separately() {
        let log = Log::default();
        let mut interface = interface(&log, false, false);
        interface.send_block(&[1, 2, 3]).unwrap();
        interface.send_data(4).unwrap();

        let events = log.borrow();
        let writes: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, Event::Write(_)))
            .collect();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0], &Event::Write(alloc::vec![1, 2, 3]));
        let cs_releases = events.iter().filter(|e| **e == Event::Cs(true)).count();
        assert_eq!(cs_releases, 4);
    }

    #[test]
    fn test_spi_error_releases_chip_select() {
        let log = Log::default();
        let mut interface = interface(&log, false, true);
        let result = interface.send_command(0x20);
        assert!(matches!(result, Err(InterfaceError::Spi(_))));
        assert_eq!(log.borrow().last(), Some(&Event::Cs(true)));
    }

    #[test]
    fn test_reset_pulse_timing() {
        let log = Log::default();
        let mut interface = interface(&log, false, false);
        let mut delay = MockDelay { log: log.clone() };
        interface.reset(&mut delay).unwrap();
        assert_eq!(
            *log.borrow(),
            alloc::vec![
                Event::Rst(true),
                Event::DelayMs(200),
                Event::Rst(false),
                Event::DelayMs(200),
                Event::Rst(true),
                Event::DelayMs(200),
            ]
        );
    }

    #[test]
    fn test_busy_polarity() {
        let log = Log::default();
        let mut interface = interface(&log, true, false);
        assert!(interface.busy_active_high());
        assert!(interface.is_busy().unwrap());

        interface.set_busy_active_high(false);
        assert!(!interface.is_busy().unwrap());
    }
}
