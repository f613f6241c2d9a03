//! Display configuration types and builder

pub use crate::error::{BuilderError, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS};

/// Default timeout for busy-wait in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 30_000;

/// Default busy-line polling interval in milliseconds
pub const DEFAULT_BUSY_POLL_MS: u32 = 100;

/// Display dimensions in the panel's native portrait orientation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    /// Width in pixels (source outputs)
    pub width: u16,
    /// Height in pixels (gate outputs)
    pub height: u16,
}

impl Dimensions {
    /// Native geometry of the 2.66" panel: 152 x 296
    pub const PANEL_2IN66: Self = Self {
        width: 152,
        height: 296,
    };

    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - width is 0, > MAX_SOURCE_OUTPUTS or not a multiple of 8
    /// - height is 0 or > MAX_GATE_OUTPUTS
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_SOURCE_OUTPUTS || width % 8 != 0 {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        if height == 0 || height > MAX_GATE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Size in bytes of one bit plane
    pub fn buffer_size(&self) -> usize {
        (self.width as usize * self.height as usize) / 8
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::PANEL_2IN66
    }
}

/// Display configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// First X pixel of the RAM window programmed by `initialize`
    pub window_x_start: u16,
    /// RAM address counter (x byte, y row) set before every plane upload
    pub ram_origin: (u8, u16),
    /// Busy-wait timeout in milliseconds, never zero when built by [`Builder`]
    pub busy_timeout_ms: u32,
    /// Busy-line polling interval in milliseconds
    pub busy_poll_ms: u32,
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use epd2in66::{Builder, Dimensions};
///
/// let config = Builder::new()
///     .dimensions(Dimensions::PANEL_2IN66)
///     .busy_timeout_ms(10_000)
///     .build();
/// assert!(config.is_ok());
/// ```
#[must_use]
pub struct Builder {
    /// Display dimensions (required)
    dimensions: Option<Dimensions>,
    /// First X pixel of the RAM window
    window_x_start: u16,
    /// RAM origin override, derived from dimensions when unset
    ram_origin: Option<(u8, u16)>,
    /// Busy-wait timeout in milliseconds
    busy_timeout_ms: u32,
    /// Busy-line polling interval in milliseconds
    busy_poll_ms: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            // Panel wiring skips the first source byte
            window_x_start: 8,
            ram_origin: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            busy_poll_ms: DEFAULT_BUSY_POLL_MS,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the first X pixel of the RAM window
    pub fn window_x_start(mut self, value: u16) -> Self {
        self.window_x_start = value;
        self
    }

    /// Set the RAM address counter used before plane uploads
    ///
    /// Defaults to `(1, height - 1)`.
    pub fn ram_origin(mut self, x: u8, y: u16) -> Self {
        self.ram_origin = Some((x, y));
        self
    }

    /// Set the busy-wait timeout in milliseconds
    ///
    /// Default is 30,000ms (30 seconds). Zero is rejected by [`Builder::build`].
    pub fn busy_timeout_ms(mut self, value: u32) -> Self {
        self.busy_timeout_ms = value;
        self
    }

    /// Set the busy-line polling interval in milliseconds
    pub fn busy_poll_ms(mut self, value: u32) -> Self {
        self.busy_poll_ms = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set
    /// and `BuilderError::InvalidTimeout` if the busy timeout is zero
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.ok_or(BuilderError::MissingDimensions)?;
        if self.busy_timeout_ms == 0 {
            return Err(BuilderError::InvalidTimeout);
        }
        Ok(Config {
            dimensions,
            window_x_start: self.window_x_start,
            ram_origin: self
                .ram_origin
                .unwrap_or((1, dimensions.height.saturating_sub(1))),
            busy_timeout_ms: self.busy_timeout_ms,
            busy_poll_ms: self.busy_poll_ms.max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_buffer_size() {
        assert_eq!(Dimensions::PANEL_2IN66.buffer_size(), 5624);
    }

    #[test]
    fn test_dimensions_validation() {
        assert!(Dimensions::new(152, 296).is_ok());
        assert!(Dimensions::new(150, 296).is_err());
        assert!(Dimensions::new(0, 296).is_err());
        assert!(Dimensions::new(184, 296).is_err());
        assert!(Dimensions::new(152, 0).is_err());
        assert!(Dimensions::new(152, 297).is_err());
    }

    #[test]
    fn test_builder_requires_dimensions() {
        assert!(matches!(
            Builder::new().build(),
            Err(BuilderError::MissingDimensions)
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let config = Builder::new()
            .dimensions(Dimensions::PANEL_2IN66)
            .build()
            .unwrap();
        assert_eq!(config.ram_origin, (1, 295));
        assert_eq!(config.window_x_start, 8);
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
        assert_eq!(config.busy_poll_ms, 100);
    }

    #[test]
    fn test_builder_overrides() {
        let config = Builder::new()
            .dimensions(Dimensions::new(128, 250).unwrap())
            .ram_origin(0, 0)
            .busy_timeout_ms(5_000)
            .build()
            .unwrap();
        assert_eq!(config.ram_origin, (0, 0));
        assert_eq!(config.busy_timeout_ms, 5_000);
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = Builder::new()
            .dimensions(Dimensions::PANEL_2IN66)
            .busy_timeout_ms(0)
            .build();
        assert!(matches!(result, Err(BuilderError::InvalidTimeout)));
    }
}
