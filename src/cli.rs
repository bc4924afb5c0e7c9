//! CLI argument parsing

use clap::Parser;
use spiconsole_core::transfer::{DEFAULT_SPEED_HZ, DEFAULT_TRANSFER_LEN};
use spiconsole_core::SpiMode;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse an SPI mode number (0-3)
fn parse_mode(s: &str) -> Result<SpiMode, String> {
    let mode: u8 = s
        .parse()
        .map_err(|_| format!("Invalid mode value: {}", s))?;
    SpiMode::try_from(mode).map_err(|m| format!("Invalid SPI mode: {} (must be 0-3)", m))
}

/// Parse a non-zero transfer length
fn parse_len(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Transfer length must be at least 1 byte".to_string()),
        Ok(len) => Ok(len),
        Err(e) => Err(format!("Invalid length: {}", e)),
    }
}

#[derive(Parser, Debug)]
#[command(name = "spiconsole")]
#[command(author, version, about = "Interactive SPI transfer console", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// SPI device to open, e.g. /dev/spidev0.0 ("dummy" for an in-memory loopback)
    #[arg(value_name = "DEVICE")]
    pub device: String,

    /// SPI clock speed in Hz (decimal or 0x-prefixed hex)
    #[arg(short, long, default_value_t = DEFAULT_SPEED_HZ, value_parser = parse_hex_u32)]
    pub speed: u32,

    /// SPI mode (0-3)
    #[arg(short, long, default_value_t = SpiMode::Mode0, value_parser = parse_mode)]
    pub mode: SpiMode,

    /// Bytes exchanged per transfer
    #[arg(short, long, default_value_t = DEFAULT_TRANSFER_LEN, value_parser = parse_len)]
    pub len: usize,
}
