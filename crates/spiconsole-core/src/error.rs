//! Error types for spiconsole-core
//!
//! This module provides a no_std compatible error type shared by every
//! SPI backend.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Configuration errors
    /// Setting the SPI mode on the device failed
    SetModeFailed,
    /// Setting the maximum clock speed on the device failed
    SetSpeedFailed,
    /// Transfer length is zero or exceeds what the bus can move at once
    InvalidLength {
        /// Requested length in bytes
        len: usize,
        /// Largest length the bus accepts
        max: usize,
    },

    // Transfer errors
    /// The full-duplex transfer reported failure
    TransferFailed,
    /// Transmit and receive buffers differ in length
    BufferMismatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetModeFailed => write!(f, "could not write SPI mode"),
            Self::SetSpeedFailed => write!(f, "could not write the SPI max speed"),
            Self::InvalidLength { len, max } => {
                write!(f, "invalid transfer length {} (must be 1..={})", len, max)
            }
            Self::TransferFailed => write!(f, "failed to transfer SPI message"),
            Self::BufferMismatch => write!(f, "transmit and receive buffers differ in length"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
