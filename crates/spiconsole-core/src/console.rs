//! Interactive SPI console
//!
//! [`Console`] owns the bus, the transfer descriptor and both transfer
//! buffers for the lifetime of a session. [`Console::run`] is the
//! read-eval-print loop: prompt, read a line, parse it into the transmit
//! buffer, run one transfer, print what went out and what came back.

use crate::bus::{configure, SpiBus};
use crate::error::{Error, Result};
use crate::hex::HexBytes;
use crate::parse::{parse_into, ParseOutcome};
use crate::transfer::TransferConfig;

use std::io::{self, BufRead, Write};
use std::string::String;
use std::vec::Vec;

/// Prompt written before every input line
pub const PROMPT: &str = "Enter bytes to send or 'q' to quit";

/// What an input line asks the console to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// End the session
    Quit,
    /// Nothing to send, prompt again
    Skip,
    /// Parse and transfer these bytes
    Send(&'a str),
}

impl<'a> Command<'a> {
    /// Classify a line with its terminator already removed
    ///
    /// A line starting with `q` quits, a blank line is skipped, anything
    /// else is sent.
    pub fn classify(line: &'a str) -> Self {
        if line.starts_with('q') {
            Self::Quit
        } else if line.trim().is_empty() {
            Self::Skip
        } else {
            Self::Send(line)
        }
    }
}

/// Result of a single [`Console::parse_and_send`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    /// How the input line filled the transmit buffer
    pub parsed: ParseOutcome,
    /// Outcome of the transfer itself
    pub result: Result<()>,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionEnd {
    /// The operator typed `q`
    #[default]
    Quit,
    /// Input reached end of file
    EndOfInput,
}

/// Counters collected over one [`Console::run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Transfers attempted
    pub transfers: usize,
    /// Transfers that reported failure
    pub failed: usize,
    /// Blank lines that were skipped
    pub skipped: usize,
    /// Why the loop stopped
    pub end: SessionEnd,
}

/// SPI console session
pub struct Console<B: SpiBus> {
    bus: B,
    config: TransferConfig,
    tx: Vec<u8>,
    rx: Vec<u8>,
}

impl<B: SpiBus> Console<B> {
    /// Configure the bus and allocate the transfer buffers
    ///
    /// Applies the descriptor's mode and speed to the device. On failure the
    /// bus is dropped, which releases the device.
    pub fn initialize(mut bus: B, config: TransferConfig) -> Result<Self> {
        let max = bus.max_transfer_len();
        if config.len == 0 || config.len > max {
            return Err(Error::InvalidLength {
                len: config.len,
                max,
            });
        }

        let tx = alloc_buffer(config.len, max)?;
        let rx = alloc_buffer(config.len, max)?;

        configure(&mut bus, &config)?;

        Ok(Self {
            bus,
            config,
            tx,
            rx,
        })
    }

    /// Reapply the bound descriptor to the bus
    pub fn reconfigure(&mut self) -> Result<()> {
        configure(&mut self.bus, &self.config)
    }

    /// The transfer descriptor bound at initialization
    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Bytes sent by the last transfer
    pub fn tx(&self) -> &[u8] {
        &self.tx
    }

    /// Bytes received by the last transfer
    pub fn rx(&self) -> &[u8] {
        &self.rx
    }

    /// Borrow the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Parse `line` into the transmit buffer, transfer, and dump both buffers
    ///
    /// The full buffer length is always transferred, whatever the number of
    /// bytes the line supplied. A failed transfer is logged and reported in
    /// the returned [`Exchange`]; the dump is written either way. Only
    /// errors writing to `out` are returned as `Err`.
    pub fn parse_and_send<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Exchange> {
        self.tx.fill(0);
        self.rx.fill(0);

        let parsed = parse_into(line, &mut self.tx);

        let result = self.bus.transfer(&self.config, &self.tx, &mut self.rx);
        if let Err(e) = result {
            log::error!("Failed to transfer SPI message: {}", e);
        }

        writeln!(out, "TX: {}", HexBytes(&self.tx))?;
        writeln!(out, "RX: {}", HexBytes(&self.rx))?;
        out.flush()?;

        Ok(Exchange { parsed, result })
    }

    /// Run the interactive loop until `q` or end of input
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut out: W,
    ) -> io::Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut buf = Vec::new();

        loop {
            writeln!(out, "{}", PROMPT)?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                summary.end = SessionEnd::EndOfInput;
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            match Command::classify(strip_line_ending(&line)) {
                Command::Quit => {
                    summary.end = SessionEnd::Quit;
                    break;
                }
                Command::Skip => summary.skipped += 1,
                Command::Send(text) => {
                    let exchange = self.parse_and_send(text, &mut out)?;
                    summary.transfers += 1;
                    if exchange.result.is_err() {
                        summary.failed += 1;
                    }
                }
            }
        }

        log::debug!(
            "Session ended ({:?}): {} transfers, {} failed",
            summary.end,
            summary.transfers,
            summary.failed
        );
        Ok(summary)
    }
}

/// Allocate a zeroed transfer buffer, reporting allocation failure as a bad length
fn alloc_buffer(len: usize, max: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::InvalidLength { len, max })?;
    buf.resize(len, 0);
    Ok(buf)
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}
