//! Backend dispatch
//!
//! Maps the device argument onto a compiled-in `SpiBus` implementation:
//! the literal `dummy` selects the in-memory loopback, anything else is
//! treated as a spidev path.

use spiconsole_core::SpiBus;
use thiserror::Error;

/// Device name selecting the loopback backend
#[cfg(feature = "dummy")]
pub const DUMMY_DEVICE: &str = "dummy";

/// A backend-agnostic boxed bus
pub type BoxedSpiBus = Box<dyn SpiBus>;

/// Errors raised while opening a backend
#[derive(Debug, Error)]
pub enum OpenError {
    /// No compiled-in backend handles this device
    #[cfg(not(feature = "linux-spi"))]
    #[error("No SPI backend available for {0} (rebuild with the linux-spi feature)")]
    Unsupported(String),

    /// spidev open failed
    #[cfg(feature = "linux-spi")]
    #[error(transparent)]
    LinuxSpi(#[from] spiconsole_linux_spi::LinuxSpiError),
}

/// Open the bus named by `device`
pub fn open_bus(device: &str) -> Result<BoxedSpiBus, OpenError> {
    #[cfg(feature = "dummy")]
    if device == DUMMY_DEVICE {
        log::info!("Using in-memory loopback bus");
        return Ok(Box::new(spiconsole_dummy::LoopbackSpi::new_default()));
    }

    #[cfg(feature = "linux-spi")]
    let bus = spiconsole_linux_spi::LinuxSpi::open(device)
        .map(|spi| Box::new(spi) as BoxedSpiBus)
        .map_err(OpenError::from);

    #[cfg(not(feature = "linux-spi"))]
    let bus = Err(OpenError::Unsupported(device.to_string()));

    bus
}
