//! Hex codec for the host wire protocol.
//!
//! Payloads cross the serial line as bare hex text, two uppercase digits per
//! byte, no separators. Decoding is deliberately lenient about digit values:
//! a character outside `[0-9A-Fa-f]` contributes a zero nibble instead of
//! failing. The deployed host tooling relies on this, so it is part of the
//! protocol rather than a validation gap.

use core::fmt;

/// Decode error: input was empty, of odd length, or larger than the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidHex;

/// Value of a single hex digit, zero for anything unrecognized.
pub fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'A'..=b'F' => c - b'A' + 10,
        b'a'..=b'f' => c - b'a' + 10,
        _ => 0,
    }
}

/// Combine two hex digits into a byte, high digit first.
pub fn byte(high: u8, low: u8) -> u8 {
    (nibble(high) << 4) | nibble(low)
}

/// Decode hex text into `out`, returning the number of bytes written.
///
/// Fails on empty or odd-length input, and when the decoded length would
/// exceed `out`. Digit values are decoded leniently, see the module docs.
pub fn decode(text: &[u8], out: &mut [u8]) -> Result<usize, InvalidHex> {
    if text.is_empty() || text.len() % 2 != 0 || text.len() / 2 > out.len() {
        return Err(InvalidHex);
    }

    for (slot, pair) in out.iter_mut().zip(text.chunks_exact(2)) {
        *slot = byte(pair[0], pair[1]);
    }
    Ok(text.len() / 2)
}

/// Encode `bytes` as uppercase hex text, two digits per byte.
pub fn encode_to<W: fmt::Write>(bytes: &[u8], out: &mut W) -> fmt::Result {
    for b in bytes {
        write!(out, "{:02X}", b)?;
    }
    Ok(())
}
