//! Transfer descriptor and SPI mode definitions

use core::fmt;

/// Default SPI clock speed in Hz (1 MHz)
pub const DEFAULT_SPEED_HZ: u32 = 1_000_000;

/// Default transfer length in bytes
pub const DEFAULT_TRANSFER_LEN: usize = 6;

/// SPI clock mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpiMode {
    /// CPOL=0, CPHA=0: clock idles low, data sampled on the leading edge
    #[default]
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

impl SpiMode {
    /// Clock polarity bit
    pub fn cpol(self) -> u8 {
        (self.bits() >> 1) & 1
    }

    /// Clock phase bit
    pub fn cpha(self) -> u8 {
        self.bits() & 1
    }

    /// Mode as the kernel's `SPI_CPOL | SPI_CPHA` bit pattern
    pub fn bits(self) -> u8 {
        match self {
            Self::Mode0 => 0,
            Self::Mode1 => 1,
            Self::Mode2 => 2,
            Self::Mode3 => 3,
        }
    }
}

impl TryFrom<u8> for SpiMode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Mode0),
            1 => Ok(Self::Mode1),
            2 => Ok(Self::Mode2),
            3 => Ok(Self::Mode3),
            other => Err(other),
        }
    }
}

impl fmt::Display for SpiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Transfer descriptor
///
/// Bound once when the console is initialized and reused, unchanged, for
/// every transfer of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferConfig {
    /// Length of both the transmit and receive buffer, in bytes
    pub len: usize,
    /// Clock speed in Hz
    pub speed_hz: u32,
    /// Word size; 0 leaves the driver default (8 bits)
    pub bits_per_word: u8,
    /// Delay after the transfer before deselecting, in microseconds
    pub delay_usecs: u16,
    /// Clock mode
    pub mode: SpiMode,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            len: DEFAULT_TRANSFER_LEN,
            speed_hz: DEFAULT_SPEED_HZ,
            bits_per_word: 0,
            delay_usecs: 0,
            mode: SpiMode::Mode0,
        }
    }
}

impl TransferConfig {
    /// Create a descriptor with the default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transfer length in bytes
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    /// Set the clock speed in Hz
    pub fn with_speed(mut self, speed_hz: u32) -> Self {
        self.speed_hz = speed_hz;
        self
    }

    /// Set the SPI mode
    pub fn with_mode(mut self, mode: SpiMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor() {
        let config = TransferConfig::default();
        assert_eq!(config.len, 6);
        assert_eq!(config.speed_hz, 1_000_000);
        assert_eq!(config.bits_per_word, 0);
        assert_eq!(config.delay_usecs, 0);
        assert_eq!(config.mode, SpiMode::Mode0);
    }

    #[test]
    fn test_builder() {
        let config = TransferConfig::new()
            .with_len(16)
            .with_speed(500_000)
            .with_mode(SpiMode::Mode3);
        assert_eq!(config.len, 16);
        assert_eq!(config.speed_hz, 500_000);
        assert_eq!(config.mode, SpiMode::Mode3);
    }

    #[test]
    fn test_spi_mode_bits() {
        assert_eq!(SpiMode::Mode0.cpol(), 0);
        assert_eq!(SpiMode::Mode0.cpha(), 0);
        assert_eq!(SpiMode::Mode1.cpol(), 0);
        assert_eq!(SpiMode::Mode1.cpha(), 1);
        assert_eq!(SpiMode::Mode2.cpol(), 1);
        assert_eq!(SpiMode::Mode2.cpha(), 0);
        assert_eq!(SpiMode::Mode3.cpol(), 1);
        assert_eq!(SpiMode::Mode3.cpha(), 1);
    }

    #[test]
    fn test_spi_mode_from_u8() {
        for raw in 0..4u8 {
            assert_eq!(SpiMode::try_from(raw).map(SpiMode::bits), Ok(raw));
        }
        assert_eq!(SpiMode::try_from(4), Err(4));
    }
}
