//! spiconsole-core - Core library for the interactive SPI console
//!
//! This crate holds everything that does not depend on a particular SPI
//! host interface: the [`SpiBus`](bus::SpiBus) boundary trait, the transfer
//! descriptor, the operator input parser and the hex dump formatter. It is
//! `no_std` compatible; the interactive [`Console`](console::Console)
//! needs the `std` feature.
//!
//! # Features
//!
//! - `std` - Enable the console session and its read-eval-print loop
//!
//! # Example
//!
//! ```ignore
//! use spiconsole_core::{console::Console, transfer::TransferConfig};
//!
//! let mut console = Console::initialize(bus, TransferConfig::default())?;
//! let stdin = std::io::stdin().lock();
//! let stdout = std::io::stdout().lock();
//! let summary = console.run(stdin, stdout)?;
//! println!("{} transfers", summary.transfers);
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod bus;
#[cfg(feature = "std")]
pub mod console;
pub mod error;
pub mod hex;
pub mod parse;
pub mod transfer;

pub use bus::SpiBus;
pub use error::{Error, Result};
pub use transfer::{SpiMode, TransferConfig};
