//! SPI host interface boundary
//!
//! Every backend (Linux spidev, the in-memory loopback, test mocks)
//! implements [`SpiBus`]. The console only ever talks to the device
//! through this trait.

use crate::error::Result;
use crate::transfer::{SpiMode, TransferConfig};

/// A host-side SPI controller able to run one full-duplex message at a time
///
/// Implementations block until the operation completes. Errors are
/// reported through the core [`Error`](crate::Error) type; backends are
/// expected to log their own detailed cause before mapping it.
pub trait SpiBus {
    /// Set the clock polarity/phase mode on the device
    fn set_mode(&mut self, mode: SpiMode) -> Result<()>;

    /// Set the maximum clock speed in Hz
    fn set_max_speed(&mut self, speed_hz: u32) -> Result<()>;

    /// Perform one full-duplex transfer
    ///
    /// Shifts `tx.len()` bytes out of `tx` while filling `rx` with the bytes
    /// clocked in. `tx` and `rx` must have the same length. The per-transfer
    /// fields of `config` (speed, bits per word, delay) apply to this message.
    fn transfer(&mut self, config: &TransferConfig, tx: &[u8], rx: &mut [u8]) -> Result<()>;

    /// Largest number of bytes a single transfer may carry
    fn max_transfer_len(&self) -> usize {
        usize::MAX
    }
}

impl<B: SpiBus + ?Sized> SpiBus for &mut B {
    fn set_mode(&mut self, mode: SpiMode) -> Result<()> {
        (**self).set_mode(mode)
    }

    fn set_max_speed(&mut self, speed_hz: u32) -> Result<()> {
        (**self).set_max_speed(speed_hz)
    }

    fn transfer(&mut self, config: &TransferConfig, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        (**self).transfer(config, tx, rx)
    }

    fn max_transfer_len(&self) -> usize {
        (**self).max_transfer_len()
    }
}

#[cfg(feature = "std")]
impl<B: SpiBus + ?Sized> SpiBus for std::boxed::Box<B> {
    fn set_mode(&mut self, mode: SpiMode) -> Result<()> {
        (**self).set_mode(mode)
    }

    fn set_max_speed(&mut self, speed_hz: u32) -> Result<()> {
        (**self).set_max_speed(speed_hz)
    }

    fn transfer(&mut self, config: &TransferConfig, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        (**self).transfer(config, tx, rx)
    }

    fn max_transfer_len(&self) -> usize {
        (**self).max_transfer_len()
    }
}

/// Apply the mode and speed of `config` to the bus
///
/// Rerunning this with the same descriptor reapplies the same settings.
pub fn configure<B: SpiBus + ?Sized>(bus: &mut B, config: &TransferConfig) -> Result<()> {
    bus.set_mode(config.mode)?;
    bus.set_max_speed(config.speed_hz)?;
    log::debug!(
        "Configured SPI bus: mode={}, speed={} Hz",
        config.mode,
        config.speed_hz
    );
    Ok(())
}
