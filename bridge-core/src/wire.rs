//! Host wire protocol: line-oriented text commands and replies.
//!
//! The host speaks a small line protocol over the serial link:
//!
//! - `TX:<hex>` — inject the decoded bytes toward the peer, answered with
//!   `TX:OK` or a `TX:ERR:*` code.
//! - `PING` — health check, answered with `PONG`.
//!
//! The bridge additionally emits unsolicited `RX:<len>:<hex>` lines for every
//! frame the peer writes to it, and a two-line banner at startup. Unknown
//! commands are dropped without a response.

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::hex;

/// Largest payload carried in either direction, in bytes.
pub const MAX_PAYLOAD: usize = 128;

/// Longest accepted command line, in characters.
pub const MAX_LINE: usize = 512;

/// Capacity that fits any rendered reply, the `RX:` line being the longest.
pub const MAX_REPLY: usize = 272;

/// First banner line, identifying the firmware to the host.
pub const BANNER: &str = "I2C_PROXY:V1";

/// Second banner line, emitted once the bridge is listening on the bus.
pub const READY: &str = "READY";

/// Opaque byte sequence crossing the bridge.
pub type Payload = Vec<u8, MAX_PAYLOAD>;

/// A parsed host command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Inject the payload toward the peer as a controller write.
    Transmit(Payload),
    /// Health check.
    Ping,
}

/// Why a recognized command could not be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Hex text was empty, of odd length, or shorter than one byte.
    InvalidHex,
    /// Decoded payload would exceed [`MAX_PAYLOAD`] bytes.
    TooLong,
}

/// Classify one complete input line.
///
/// `None` means the line is not a recognized command and must be ignored
/// without a response. Validation failures of recognized commands are
/// reported so the host link can answer with the matching error code.
pub fn parse(line: &[u8]) -> Option<Result<Command, CommandError>> {
    if let Some(text) = line.strip_prefix(b"TX:") {
        if text.len() < 2 || text.len() % 2 != 0 {
            return Some(Err(CommandError::InvalidHex));
        }
        if text.len() > MAX_PAYLOAD * 2 {
            return Some(Err(CommandError::TooLong));
        }

        let mut bytes = [0u8; MAX_PAYLOAD];
        let Ok(len) = hex::decode(text, &mut bytes) else {
            return Some(Err(CommandError::InvalidHex));
        };
        // Infallible after the length checks above
        let payload = Payload::from_slice(&bytes[..len]).ok()?;
        Some(Ok(Command::Transmit(payload)))
    } else if line == b"PING" {
        Some(Ok(Command::Ping))
    } else {
        None
    }
}

/// One line of bridge-to-host traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply<'a> {
    /// Transmit completed, trailer read, target role re-armed.
    TxOk,
    /// Transmit rejected before touching the bus: malformed hex.
    TxInvalidHex,
    /// Transmit rejected before touching the bus: payload too long.
    TxTooLong,
    /// Transmit failed on the bus (error or timeout).
    TxBusFault,
    /// Answer to `PING`.
    Pong,
    /// Unsolicited forward of a frame the peer wrote to the bridge.
    Frame(&'a [u8]),
}

impl Reply<'_> {
    /// Render the reply, CRLF terminated, into `out`.
    ///
    /// Fails only if `out` is too small; [`MAX_REPLY`] always suffices.
    pub fn render<const N: usize>(&self, out: &mut String<N>) -> fmt::Result {
        match self {
            Reply::TxOk => out.write_str("TX:OK")?,
            Reply::TxInvalidHex => out.write_str("TX:ERR:INVALID_HEX")?,
            Reply::TxTooLong => out.write_str("TX:ERR:TOO_LONG")?,
            Reply::TxBusFault => out.write_str("TX:ERR:BUS")?,
            Reply::Pong => out.write_str("PONG")?,
            Reply::Frame(bytes) => {
                write!(out, "RX:{}:", bytes.len())?;
                hex::encode_to(bytes, out)?;
            }
        }
        out.write_str("\r\n")
    }
}

impl From<CommandError> for Reply<'_> {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::InvalidHex => Reply::TxInvalidHex,
            CommandError::TooLong => Reply::TxTooLong,
        }
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use super::*;

    fn rendered(reply: Reply) -> String<MAX_REPLY> {
        let mut out = String::new();
        reply.render(&mut out).unwrap();
        out
    }

    #[test]
    fn parse_transmit() {
        let cmd = parse(b"TX:0102").unwrap().unwrap();
        assert_eq!(cmd, Command::Transmit(Payload::from_slice(&[0x01, 0x02]).unwrap()));
    }

    #[test]
    fn parse_transmit_single_byte() {
        let cmd = parse(b"TX:ff").unwrap().unwrap();
        assert_eq!(cmd, Command::Transmit(Payload::from_slice(&[0xFF]).unwrap()));
    }

    #[test]
    fn parse_transmit_max_payload() {
        let mut line = std::vec::Vec::from(&b"TX:"[..]);
        line.extend(core::iter::repeat(b'A').take(MAX_PAYLOAD * 2));
        let Command::Transmit(payload) = parse(&line).unwrap().unwrap() else {
            panic!("expected transmit");
        };
        assert_eq!(payload.len(), MAX_PAYLOAD);
        assert!(payload.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn parse_rejects_bad_hex_lengths() {
        assert_eq!(parse(b"TX:"), Some(Err(CommandError::InvalidHex)));
        assert_eq!(parse(b"TX:A"), Some(Err(CommandError::InvalidHex)));
        assert_eq!(parse(b"TX:ABC"), Some(Err(CommandError::InvalidHex)));
    }

    #[test]
    fn parse_rejects_oversized_payload() {
        let mut line = std::vec::Vec::from(&b"TX:"[..]);
        line.extend(core::iter::repeat(b'0').take(MAX_PAYLOAD * 2 + 2));
        assert_eq!(parse(&line), Some(Err(CommandError::TooLong)));
    }

    #[test]
    fn parse_ping_is_exact_match() {
        assert_eq!(parse(b"PING"), Some(Ok(Command::Ping)));
        assert_eq!(parse(b"PINGG"), None);
        assert_eq!(parse(b"PIN"), None);
    }

    #[test]
    fn parse_ignores_unknown_commands() {
        assert_eq!(parse(b""), None);
        assert_eq!(parse(b"RESET"), None);
        assert_eq!(parse(b"tx:0102"), None);
    }

    #[test]
    fn render_fixed_replies() {
        assert_eq!(rendered(Reply::TxOk), "TX:OK\r\n");
        assert_eq!(rendered(Reply::TxInvalidHex), "TX:ERR:INVALID_HEX\r\n");
        assert_eq!(rendered(Reply::TxTooLong), "TX:ERR:TOO_LONG\r\n");
        assert_eq!(rendered(Reply::TxBusFault), "TX:ERR:BUS\r\n");
        assert_eq!(rendered(Reply::Pong), "PONG\r\n");
    }

    #[test]
    fn render_frame() {
        assert_eq!(rendered(Reply::Frame(&[0x01, 0x02, 0x03])), "RX:3:010203\r\n");
        assert_eq!(rendered(Reply::Frame(&[])), "RX:0:\r\n");
    }

    #[test]
    fn render_largest_frame_fits() {
        let bytes = [0xEEu8; MAX_PAYLOAD];
        let line = rendered(Reply::Frame(&bytes));
        assert!(line.starts_with("RX:128:"));
        assert!(line.ends_with("\r\n"));
    }
}
