//! Hex dump formatting

use core::fmt;

/// Display adapter printing bytes as space-separated two-digit lowercase hex
///
/// `HexBytes(&[0x01, 0xab])` displays as `01 ab`.
#[derive(Debug, Clone, Copy)]
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;

    #[test]
    fn test_hex_bytes() {
        assert_eq!(
            format!("{}", HexBytes(&[0x01, 0x02, 0x03, 0x04, 0x00, 0x00])),
            "01 02 03 04 00 00"
        );
        assert_eq!(format!("{}", HexBytes(&[0xab, 0xCD])), "ab cd");
        assert_eq!(format!("{}", HexBytes(&[])), "");
    }
}
