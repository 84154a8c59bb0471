//! Link bus abstractions
//!
//! The display module is clocked by the host: every exchange shifts the
//! outgoing frame out while the module's pending bytes are shifted in.

use embedded_hal::spi::SpiDevice;

/// Lowest supported link clock in kHz
pub const MIN_FREQUENCY_KHZ: u32 = 5_000;

/// Highest supported link clock in kHz
pub const MAX_FREQUENCY_KHZ: u32 = 40_000;

/// Full-duplex frame link to the display module
pub trait LinkBus {
    /// Error type for link operations
    type Error;

    /// Exchange one frame
    ///
    /// Transmits `tx` while filling `rx` with the module's response bytes.
    /// The buffers may differ in length; the shorter side is padded by the
    /// implementation.
    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: LinkBus + ?Sized> LinkBus for &mut T {
    type Error = T::Error;

    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error> {
        T::exchange(self, tx, rx)
    }
}

/// Link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkConfig {
    /// Clock frequency in kHz
    pub frequency_khz: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            frequency_khz: 25_000, // 25 MHz
        }
    }
}

/// Link configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkConfigError {
    /// Clock frequency outside the supported range
    FrequencyOutOfRange(u32),
}

impl LinkConfig {
    /// Create a configuration for the given clock, validating it
    pub fn with_frequency_khz(frequency_khz: u32) -> Result<Self, LinkConfigError> {
        let config = Self { frequency_khz };
        config.validate()?;
        Ok(config)
    }

    /// Check that the clock is within 5-40 MHz
    pub fn validate(&self) -> Result<(), LinkConfigError> {
        if (MIN_FREQUENCY_KHZ..=MAX_FREQUENCY_KHZ).contains(&self.frequency_khz) {
            Ok(())
        } else {
            Err(LinkConfigError::FrequencyOutOfRange(self.frequency_khz))
        }
    }

    /// Clock frequency in Hz, for HAL SPI configuration structs
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_khz * 1_000
    }
}

/// [`LinkBus`] over an `embedded-hal` SPI device
///
/// Chip select is owned by the device; each exchange is one transaction.
pub struct SpiLink<D> {
    device: D,
}

impl<D: SpiDevice> SpiLink<D> {
    /// Wrap an SPI device
    pub fn new(device: D) -> Self {
        Self { device }
    }

    /// Release the wrapped device
    pub fn release(self) -> D {
        self.device
    }
}

impl<D: SpiDevice> LinkBus for SpiLink<D> {
    type Error = D::Error;

    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error> {
        self.device.transfer(rx, tx)
    }
}
