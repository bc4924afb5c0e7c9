//! Operator input parser
//!
//! Turns a typed line such as `"0x01 0x02 ff 3"` into bytes. Tokens are
//! either two bare hex digits (`"a3"`, `"1"`) or a `0x` prefix followed by
//! two hex digits (`"0x1a"`). The split is positional rather than
//! whitespace driven: a token is two characters wide unless its second
//! character is `x`, in which case it is four characters wide.
//!
//! Parsing never fails. A token whose characters are not all hex digits
//! keeps only its leading run of hex digits (none gives `0x00`), and input
//! beyond the buffer's capacity is dropped. Both cases are reported
//! through [`ParseOutcome`] and the log.

/// Width of a bare token such as `"1a"`
const BARE_WIDTH: usize = 2;

/// Width of a prefixed token such as `"0x1a"`
const PREFIXED_WIDTH: usize = 4;

/// Characters skipped between tokens
fn is_separator(b: u8) -> bool {
    b == b' ' || b == b'\n'
}

/// One byte token taken from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    raw: &'a [u8],
    value: u8,
    exact: bool,
}

impl<'a> Token<'a> {
    /// The characters consumed for this token
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    /// Byte value of the token
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Whether the token was well-formed hex (trailing whitespace allowed)
    pub fn is_exact(&self) -> bool {
        self.exact
    }
}

/// Iterator over the byte tokens of a line, see [`tokens`]
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a [u8],
    pos: usize,
}

/// Split a line into byte tokens
pub fn tokens(line: &str) -> Tokens<'_> {
    Tokens {
        input: line.as_bytes(),
        pos: 0,
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.input.len() && is_separator(self.input[self.pos]) {
            self.pos += 1;
        }
        if self.pos >= self.input.len() {
            return None;
        }

        let start = self.pos;
        let prefixed = self.input.get(start + 1) == Some(&b'x');
        let width = if prefixed { PREFIXED_WIDTH } else { BARE_WIDTH };
        let end = (start + width).min(self.input.len());
        self.pos = end;

        let raw = &self.input[start..end];
        let digits = if prefixed {
            raw.strip_prefix(b"0x").unwrap_or(raw)
        } else {
            raw
        };
        let (value, exact) = hex_value(digits);

        Some(Token { raw, value, exact })
    }
}

fn nibble(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

/// Read the leading run of hex digits in `digits` as a byte
///
/// Returns the value and whether the whole input was hex digits apart from
/// trailing whitespace. An input without a leading hex digit yields 0.
pub fn hex_value(digits: &[u8]) -> (u8, bool) {
    let run = digits.iter().take_while(|b| b.is_ascii_hexdigit()).count();
    let value = digits[..run]
        .iter()
        .fold(0u8, |acc, &b| (acc << 4) | nibble(b));
    let exact = run > 0 && digits[run..].iter().all(u8::is_ascii_whitespace);
    (value, exact)
}

/// Summary of one [`parse_into`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Number of buffer slots written
    pub filled: usize,
    /// Tokens that were not clean hex and were coerced
    pub coerced: usize,
    /// Input remained after the buffer was full
    pub truncated: bool,
}

/// Parse `line` into the front of `buf`
///
/// Slots past [`ParseOutcome::filled`] are left untouched; callers that
/// need them zeroed clear the buffer first.
pub fn parse_into(line: &str, buf: &mut [u8]) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let mut tokens = tokens(line);

    for slot in buf.iter_mut() {
        let Some(token) = tokens.next() else {
            break;
        };
        if !token.is_exact() {
            log::warn!(
                "Malformed hex token \"{}\", sending 0x{:02x}",
                token.raw().escape_ascii(),
                token.value()
            );
            outcome.coerced += 1;
        }
        *slot = token.value();
        outcome.filled += 1;
    }

    if outcome.filled == buf.len() && tokens.next().is_some() {
        log::debug!("Input exceeds {} bytes, ignoring the rest", buf.len());
        outcome.truncated = true;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;
    use std::vec::Vec;

    fn parse6(line: &str) -> ([u8; 6], ParseOutcome) {
        let mut buf = [0u8; 6];
        let outcome = parse_into(line, &mut buf);
        (buf, outcome)
    }

    #[test]
    fn test_bare_tokens() {
        let (buf, outcome) = parse6("1 2 3 4");
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04, 0x00, 0x00]);
        assert_eq!(outcome.filled, 4);
        assert_eq!(outcome.coerced, 0);
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_prefixed_tokens() {
        let (buf, outcome) = parse6("0x01 0x02 0x03 0x04");
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04, 0x00, 0x00]);
        assert_eq!(outcome.filled, 4);
    }

    #[test]
    fn test_mixed_tokens() {
        let (buf, _) = parse6("0x1a 2b 0x03");
        assert_eq!(buf, [0x1a, 0x2b, 0x03, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_uppercase_and_lowercase_digits() {
        let (buf, outcome) = parse6("A3 ff 0xC0 0xde");
        assert_eq!(buf, [0xa3, 0xff, 0xc0, 0xde, 0x00, 0x00]);
        assert_eq!(outcome.coerced, 0);
    }

    #[test]
    fn test_full_buffer() {
        let (buf, outcome) = parse6("01 02 03 04 05 06");
        assert_eq!(buf, [1, 2, 3, 4, 5, 6]);
        assert_eq!(outcome.filled, 6);
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_excess_tokens_truncated() {
        let (buf, outcome) = parse6("1 2 3 4 5 6 7 8");
        assert_eq!(buf, [1, 2, 3, 4, 5, 6]);
        assert_eq!(outcome.filled, 6);
        assert!(outcome.truncated);
    }

    #[test]
    fn test_trailing_separators_not_truncation() {
        let (_, outcome) = parse6("1 2 3 4 5 6   \n");
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_tokens_are_positional() {
        // Two characters at a time, no separator required
        let (buf, _) = parse6("0102ff");
        assert_eq!(buf, [0x01, 0x02, 0xff, 0x00, 0x00, 0x00]);

        // An odd digit count splits the run
        let (buf, _) = parse6("123");
        assert_eq!(buf, [0x12, 0x03, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_short_prefixed_token() {
        let (buf, outcome) = parse6("0x1 0x2");
        assert_eq!(buf, [0x01, 0x02, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(outcome.coerced, 0);
    }

    #[test]
    fn test_malformed_tokens_coerce() {
        let (buf, outcome) = parse6("zz 1z 0xg1");
        assert_eq!(buf, [0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(outcome.filled, 3);
        assert_eq!(outcome.coerced, 3);
    }

    #[test]
    fn test_tab_is_not_a_separator() {
        let (buf, outcome) = parse6("1\t2");
        assert_eq!(buf, [0x01, 0x02, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(outcome.coerced, 0);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(parse6("").1.filled, 0);
        assert_eq!(parse6("   \n").1.filled, 0);
    }

    #[test]
    fn test_hex_value() {
        assert_eq!(hex_value(b"1a"), (0x1a, true));
        assert_eq!(hex_value(b"7 "), (0x07, true));
        assert_eq!(hex_value(b"x1"), (0x00, false));
        assert_eq!(hex_value(b""), (0x00, false));
        assert_eq!(hex_value(b"1x23"), (0x01, false));
    }

    #[test]
    fn test_token_iterator() {
        let raws: Vec<&[u8]> = tokens("0x1a 2b\n3").map(|t| t.raw()).collect();
        assert_eq!(raws, vec![&b"0x1a"[..], &b"2b"[..], &b"3"[..]]);
    }
}
