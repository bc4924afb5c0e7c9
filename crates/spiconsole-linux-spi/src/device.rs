//! Linux SPI device implementation
//!
//! This module provides the `LinuxSpi` struct that implements the `SpiBus`
//! trait using Linux's spidev interface.

use crate::error::{LinuxSpiError, Result};

use spiconsole_core::error::{Error as CoreError, Result as CoreResult};
use spiconsole_core::{SpiBus, SpiMode, TransferConfig};

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

/// Path to kernel spidev buffer size parameter
const BUF_SIZE_SYSFS: &str = "/sys/module/spidev/parameters/bufsiz";

/// Linux spidev ioctl constants
mod ioctl {
    use nix::ioctl_write_ptr;

    // SPI ioctl magic number
    const SPI_IOC_MAGIC: u8 = b'k';

    // SPI ioctl type numbers
    const SPI_IOC_TYPE_MODE: u8 = 1;
    const SPI_IOC_TYPE_MAX_SPEED_HZ: u8 = 4;

    ioctl_write_ptr!(spi_ioc_wr_mode, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE, u8);
    ioctl_write_ptr!(
        spi_ioc_wr_max_speed_hz,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_MAX_SPEED_HZ,
        u32
    );

    // SPI_IOC_MESSAGE(n) = _IOW(SPI_IOC_MAGIC, 0, char[SPI_MSGSIZE(n)])
    // where SPI_MSGSIZE(n) = (n) * sizeof(struct spi_ioc_transfer)

    /// Size of struct spi_ioc_transfer (fixed by the kernel ABI)
    pub const SPI_IOC_TRANSFER_SIZE: usize = 32;

    /// Calculate ioctl number for SPI_IOC_MESSAGE(n)
    pub fn spi_ioc_message(n: u8) -> libc::c_ulong {
        let size = (n as usize) * SPI_IOC_TRANSFER_SIZE;
        // _IOW = _IOC(_IOC_WRITE, type, nr, size)
        // _IOC(dir, type, nr, size) = ((dir)<<30)|((size)<<16)|((type)<<8)|(nr)
        ((1u32 << 30) | ((size as u32) << 16) | ((SPI_IOC_MAGIC as u32) << 8)) as libc::c_ulong
    }
}

/// SPI transfer structure for ioctl
/// This must match the kernel's struct spi_ioc_transfer layout
#[repr(C)]
#[derive(Debug, Default, Clone)]
struct SpiIocTransfer {
    tx_buf: u64,          // __u64 tx_buf
    rx_buf: u64,          // __u64 rx_buf
    len: u32,             // __u32 len
    speed_hz: u32,        // __u32 speed_hz
    delay_usecs: u16,     // __u16 delay_usecs
    bits_per_word: u8,    // __u8 bits_per_word
    cs_change: u8,        // __u8 cs_change
    tx_nbits: u8,         // __u8 tx_nbits
    rx_nbits: u8,         // __u8 rx_nbits
    word_delay_usecs: u8, // __u8 word_delay_usecs
    _pad: u8,             // padding
}

impl SpiIocTransfer {
    /// Describe one full-duplex message over `tx` and `rx`
    fn full_duplex(config: &TransferConfig, tx: &[u8], rx: &mut [u8]) -> Result<Self> {
        let len = u32::try_from(tx.len()).map_err(|_| {
            LinuxSpiError::InvalidParameter(format!("transfer length {} too large", tx.len()))
        })?;

        Ok(Self {
            tx_buf: tx.as_ptr() as u64,
            rx_buf: rx.as_mut_ptr() as u64,
            len,
            speed_hz: config.speed_hz,
            delay_usecs: config.delay_usecs,
            bits_per_word: config.bits_per_word,
            ..Default::default()
        })
    }
}

/// Linux SPI bus using the spidev interface
///
/// Owns the open `/dev/spidevX.Y` file; dropping the value closes it.
pub struct LinuxSpi {
    /// File handle for spidev device
    file: File,
    /// Device path, kept for diagnostics
    path: String,
    /// Maximum kernel buffer size
    max_kernel_buf_size: usize,
}

impl LinuxSpi {
    /// Open a spidev device
    ///
    /// The device is opened read/write but not configured; mode and speed
    /// are applied through [`SpiBus::set_mode`] and [`SpiBus::set_max_speed`].
    pub fn open(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(LinuxSpiError::NoDevice);
        }

        log::debug!("linux_spi: Opening device {}", path);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| LinuxSpiError::OpenFailed {
                path: path.to_string(),
                source: e,
            })?;

        let max_kernel_buf_size = get_max_kernel_buf_size();
        log::debug!(
            "linux_spi: Max kernel buffer size: {} bytes",
            max_kernel_buf_size
        );

        log::info!("linux_spi: Opened {}", path);

        Ok(Self {
            file,
            path: path.to_string(),
            max_kernel_buf_size,
        })
    }

    /// Write the SPI mode register
    pub fn write_mode(&mut self, mode: u8) -> Result<()> {
        let fd = self.file.as_raw_fd();
        unsafe {
            ioctl::spi_ioc_wr_mode(fd, &mode).map_err(|e| LinuxSpiError::SetModeFailed {
                mode,
                source: std::io::Error::from_raw_os_error(e as i32),
            })?;
        }
        log::debug!("linux_spi: Set mode to {}", mode);
        Ok(())
    }

    /// Write the maximum clock speed
    pub fn write_max_speed(&mut self, speed_hz: u32) -> Result<()> {
        let fd = self.file.as_raw_fd();
        unsafe {
            ioctl::spi_ioc_wr_max_speed_hz(fd, &speed_hz).map_err(|e| {
                LinuxSpiError::SetSpeedFailed {
                    speed: speed_hz,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }
        log::debug!("linux_spi: Set speed to {} Hz", speed_hz);
        Ok(())
    }

    /// Perform one full-duplex SPI_IOC_MESSAGE(1) transfer
    pub fn spi_transfer(
        &mut self,
        config: &TransferConfig,
        tx: &[u8],
        rx: &mut [u8],
    ) -> Result<()> {
        if tx.len() != rx.len() {
            return Err(LinuxSpiError::InvalidParameter(format!(
                "tx length {} does not match rx length {}",
                tx.len(),
                rx.len()
            )));
        }

        let fd = self.file.as_raw_fd();
        let transfer = SpiIocTransfer::full_duplex(config, tx, rx)?;

        let ret = unsafe {
            libc::ioctl(
                fd,
                ioctl::spi_ioc_message(1),
                &transfer as *const SpiIocTransfer,
            )
        };

        let moved = check_transfer_ret(ret)?;
        log::trace!("linux_spi: Transferred {} bytes", moved);
        Ok(())
    }
}

impl SpiBus for LinuxSpi {
    fn set_mode(&mut self, mode: SpiMode) -> CoreResult<()> {
        self.write_mode(mode.bits()).map_err(|e| {
            log::error!("linux_spi: {}", e);
            CoreError::SetModeFailed
        })
    }

    fn set_max_speed(&mut self, speed_hz: u32) -> CoreResult<()> {
        self.write_max_speed(speed_hz).map_err(|e| {
            log::error!("linux_spi: {}", e);
            CoreError::SetSpeedFailed
        })
    }

    fn transfer(&mut self, config: &TransferConfig, tx: &[u8], rx: &mut [u8]) -> CoreResult<()> {
        self.spi_transfer(config, tx, rx).map_err(|e| {
            log::debug!("linux_spi: {}: {}", self.path, e);
            match e {
                LinuxSpiError::InvalidParameter(_) => CoreError::BufferMismatch,
                _ => CoreError::TransferFailed,
            }
        })
    }

    fn max_transfer_len(&self) -> usize {
        self.max_kernel_buf_size
    }
}

impl Drop for LinuxSpi {
    fn drop(&mut self) {
        log::debug!("linux_spi: Closing {}", self.path);
    }
}

/// Interpret the SPI_IOC_MESSAGE return value, the number of bytes moved
fn check_transfer_ret(ret: libc::c_int) -> Result<usize> {
    match ret {
        r if r < 0 => Err(LinuxSpiError::TransferFailed(
            std::io::Error::last_os_error(),
        )),
        0 => Err(LinuxSpiError::ShortTransfer),
        r => Ok(r as usize),
    }
}

/// Read the maximum kernel buffer size from sysfs, or use page size as fallback
fn get_max_kernel_buf_size() -> usize {
    match std::fs::read_to_string(BUF_SIZE_SYSFS) {
        Ok(content) => {
            if let Some(size) = parse_buf_size(&content) {
                log::debug!("linux_spi: Using buffer size {} from sysfs", size);
                return size;
            }
            log::warn!("linux_spi: Invalid buffer size in {}", BUF_SIZE_SYSFS);
        }
        Err(_) => {
            log::debug!("linux_spi: Cannot read {}, using page size", BUF_SIZE_SYSFS);
        }
    }

    // Fall back to page size
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as usize;
    log::debug!("linux_spi: Using page size {} as buffer size", page_size);
    page_size
}

fn parse_buf_size(content: &str) -> Option<usize> {
    content.trim().parse::<usize>().ok().filter(|&size| size > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spi_ioc_message_number() {
        // SPI_IOC_MESSAGE(1) on Linux: _IOW('k', 0, char[32])
        assert_eq!(ioctl::spi_ioc_message(1), 0x4020_6b00);
        assert_eq!(ioctl::spi_ioc_message(2), 0x4040_6b00);
    }

    #[test]
    fn test_transfer_struct_layout() {
        assert_eq!(
            std::mem::size_of::<SpiIocTransfer>(),
            ioctl::SPI_IOC_TRANSFER_SIZE
        );
    }

    #[test]
    fn test_full_duplex_descriptor() {
        let config = TransferConfig::default();
        let tx = [1u8, 2, 3, 4, 5, 6];
        let mut rx = [0u8; 6];
        let xfer = SpiIocTransfer::full_duplex(&config, &tx, &mut rx).unwrap();

        assert_eq!(xfer.len, 6);
        assert_eq!(xfer.speed_hz, 1_000_000);
        assert_eq!(xfer.bits_per_word, 0);
        assert_eq!(xfer.delay_usecs, 0);
        assert_eq!(xfer.tx_buf, tx.as_ptr() as u64);
        assert_eq!(xfer.rx_buf, rx.as_ptr() as u64);
        assert_eq!(xfer.cs_change, 0);
    }

    #[test]
    fn test_check_transfer_ret() {
        assert_eq!(check_transfer_ret(6).unwrap(), 6);
        assert!(matches!(
            check_transfer_ret(0),
            Err(LinuxSpiError::ShortTransfer)
        ));
        assert!(matches!(
            check_transfer_ret(-1),
            Err(LinuxSpiError::TransferFailed(_))
        ));
    }

    #[test]
    fn test_parse_buf_size() {
        assert_eq!(parse_buf_size("4096\n"), Some(4096));
        assert_eq!(parse_buf_size("0"), None);
        assert_eq!(parse_buf_size("bogus"), None);
    }

    #[test]
    fn test_open_empty_path() {
        assert!(matches!(LinuxSpi::open(""), Err(LinuxSpiError::NoDevice)));
    }

    #[test]
    fn test_open_missing_device() {
        let err = LinuxSpi::open("/nonexistent/spidev9.9").err();
        match err {
            Some(LinuxSpiError::OpenFailed { path, .. }) => {
                assert_eq!(path, "/nonexistent/spidev9.9");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
