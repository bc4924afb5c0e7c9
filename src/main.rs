//! spiconsole - Interactive console for exercising an SPI bus
//!
//! Opens an SPI device, applies the transfer mode and clock speed once,
//! then reads lines of hex bytes from stdin. Each line is sent as one
//! full-duplex transfer and the transmitted and received bytes are printed:
//!
//! ```text
//! $ spiconsole /dev/spidev0.0
//! Enter bytes to send or 'q' to quit
//! 0x9f 0 0 0
//! TX: 9f 00 00 00 00 00
//! RX: ff ef 40 18 00 00
//! Enter bytes to send or 'q' to quit
//! q
//! ```

mod backends;
mod cli;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use spiconsole_core::console::Console;
use spiconsole_core::TransferConfig;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Initialize logger, RUST_LOG overrides the verbosity flags
    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".bright_red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = TransferConfig::new()
        .with_len(cli.len)
        .with_speed(cli.speed)
        .with_mode(cli.mode);

    let bus = backends::open_bus(&cli.device)?;
    let mut console = Console::initialize(bus, config)?;
    log::info!(
        "Ready: mode={}, speed={} kHz, {} bytes per transfer",
        config.mode,
        config.speed_hz / 1000,
        config.len
    );

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    let summary = console.run(stdin, stdout)?;

    log::info!(
        "{} transfers ({} failed), closing {}",
        summary.transfers,
        summary.failed,
        cli.device
    );
    Ok(())
}
