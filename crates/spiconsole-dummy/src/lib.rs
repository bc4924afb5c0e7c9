//! spiconsole-dummy - In-memory loopback SPI bus for testing
//!
//! This crate provides a bus that behaves as if MISO were wired straight
//! to MOSI: every byte shifted out is clocked back in. It's useful for
//! trying the console without real hardware.

#![cfg_attr(not(feature = "std"), no_std)]

use spiconsole_core::error::{Error, Result};
use spiconsole_core::{SpiBus, SpiMode, TransferConfig};

/// Default transfer limit, matching spidev's default `bufsiz`
pub const DEFAULT_MAX_TRANSFER_LEN: usize = 4096;

/// Configuration for the loopback bus
#[derive(Debug, Clone)]
pub struct LoopbackConfig {
    /// XOR mask applied to every returned byte (0 echoes unchanged)
    pub invert_mask: u8,
    /// Largest transfer accepted
    pub max_transfer_len: usize,
}

impl Default for LoopbackConfig {
    fn default() -> Self {
        Self {
            invert_mask: 0,
            max_transfer_len: DEFAULT_MAX_TRANSFER_LEN,
        }
    }
}

/// Loopback SPI bus
///
/// Records the last applied mode and speed so callers can inspect the
/// configuration the console bound.
#[derive(Debug, Default)]
pub struct LoopbackSpi {
    config: LoopbackConfig,
    mode: Option<SpiMode>,
    speed_hz: Option<u32>,
    transfers: usize,
}

impl LoopbackSpi {
    /// Create a new loopback bus with the given configuration
    pub fn new(config: LoopbackConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Create a loopback bus that echoes bytes unchanged
    pub fn new_default() -> Self {
        Self::new(LoopbackConfig::default())
    }

    /// Mode applied by the last `set_mode`, if any
    pub fn mode(&self) -> Option<SpiMode> {
        self.mode
    }

    /// Speed applied by the last `set_max_speed`, if any
    pub fn speed_hz(&self) -> Option<u32> {
        self.speed_hz
    }

    /// Number of transfers performed
    pub fn transfers(&self) -> usize {
        self.transfers
    }
}

impl SpiBus for LoopbackSpi {
    fn set_mode(&mut self, mode: SpiMode) -> Result<()> {
        log::debug!("dummy: Set mode to {}", mode);
        self.mode = Some(mode);
        Ok(())
    }

    fn set_max_speed(&mut self, speed_hz: u32) -> Result<()> {
        log::debug!("dummy: Set speed to {} Hz", speed_hz);
        self.speed_hz = Some(speed_hz);
        Ok(())
    }

    fn transfer(&mut self, _config: &TransferConfig, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        if tx.len() != rx.len() {
            return Err(Error::BufferMismatch);
        }
        if self.mode.is_none() || self.speed_hz.is_none() {
            log::warn!("dummy: Transfer on an unconfigured bus");
        }

        for (r, t) in rx.iter_mut().zip(tx) {
            *r = t ^ self.config.invert_mask;
        }
        self.transfers += 1;
        Ok(())
    }

    fn max_transfer_len(&self) -> usize {
        self.config.max_transfer_len
    }
}
