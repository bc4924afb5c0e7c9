//! spiconsole-linux-spi - Linux spidev backend
//!
//! This crate drives SPI controllers exposed by the Linux kernel as
//! character devices at `/dev/spidevX.Y`, where X is the bus number and Y
//! is the chip select.
//!
//! # Example
//!
//! ```no_run
//! use spiconsole_core::{SpiBus, SpiMode, TransferConfig};
//! use spiconsole_linux_spi::LinuxSpi;
//!
//! let mut spi = LinuxSpi::open("/dev/spidev0.0")?;
//! let config = TransferConfig::new().with_len(2);
//! spi.set_mode(SpiMode::Mode0)?;
//! spi.set_max_speed(config.speed_hz)?;
//!
//! let tx = [0x9f, 0x00];
//! let mut rx = [0u8; 2];
//! spi.transfer(&config, &tx, &mut rx)?;
//! println!("RX: {:02x} {:02x}", rx[0], rx[1]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with spidev support enabled (`CONFIG_SPI_SPIDEV`)
//! - Read/write access to `/dev/spidevX.Y` device
//! - May require adding user to `spi` group or using udev rules

pub mod device;
pub mod error;

// Re-exports
pub use device::LinuxSpi;
pub use error::{LinuxSpiError, Result};
