//! Passive line-oriented UART reader.
//!
//! Buffers a serial stream until a line terminator and hands each completed
//! line to the caller as a discrete text event. Purely an observer: no
//! request/response semantics, no interpretation of line content. Lines are
//! bounded to [`MAX_LINE`] bytes; further input is silently dropped until the
//! line is flushed by its terminator.

#![no_std]
#![warn(missing_docs)]

use bridge_core::line::LineBuffer;
use bridge_core::warn;
use embedded_io_async::Read;
use heapless::String;

/// Longest line delivered to the consumer, in bytes.
pub const MAX_LINE: usize = 128;

/// Why the reader stopped producing lines.
#[derive(Debug)]
pub enum Error<E> {
    /// The underlying stream failed.
    Io(E),
    /// The underlying stream reached end of input.
    Closed,
}

/// Wraps a serial receiver and yields one completed line at a time.
pub struct LineReader<R> {
    uart: R,
    buf: LineBuffer<MAX_LINE>,
}

impl<R: Read> LineReader<R> {
    /// Create a reader over a serial receiver.
    pub fn new(uart: R) -> Self {
        Self {
            uart,
            buf: LineBuffer::new(),
        }
    }

    /// Wait for the next completed, non-empty line.
    ///
    /// Lines that are not valid UTF-8 are dropped with a warning rather than
    /// delivered mangled.
    pub async fn next_line(&mut self) -> Result<String<MAX_LINE>, Error<R::Error>> {
        loop {
            let mut chunk = [0u8; 32];
            let n = match self.uart.read(&mut chunk).await {
                Ok(0) => return Err(Error::Closed),
                Ok(n) => n,
                Err(e) => return Err(Error::Io(e)),
            };

            for &byte in &chunk[..n] {
                if let Some(raw) = self.buf.push(byte) {
                    match String::from_utf8(raw) {
                        Ok(line) => return Ok(line),
                        Err(_) => warn!("dropping non-utf8 line"),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use std::vec::Vec;

    use super::*;
    use embassy_futures::block_on;
    use embedded_io_async::ErrorType;

    struct ScriptRx {
        data: Vec<u8>,
        pos: usize,
    }

    impl ScriptRx {
        fn new(data: &[u8]) -> Self {
            Self {
                data: data.to_vec(),
                pos: 0,
            }
        }
    }

    impl ErrorType for ScriptRx {
        type Error = core::convert::Infallible;
    }

    impl Read for ScriptRx {
        async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let n = (self.data.len() - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    fn lines(input: &[u8]) -> Vec<String<MAX_LINE>> {
        let mut reader = LineReader::new(ScriptRx::new(input));
        let mut out = Vec::new();
        block_on(async {
            loop {
                match reader.next_line().await {
                    Ok(line) => out.push(line),
                    Err(Error::Closed) => break,
                    Err(Error::Io(_)) => panic!("infallible"),
                }
            }
        });
        out
    }

    #[test]
    fn emits_each_completed_line() {
        let got = lines(b"temp=21.5\nhum=40\r");
        assert_eq!(got.len(), 2);
        assert_eq!(got[0], "temp=21.5");
        assert_eq!(got[1], "hum=40");
    }

    #[test]
    fn skips_empty_lines_and_partial_tail() {
        let got = lines(b"\r\n\na\ntrailing-without-terminator");
        assert_eq!(got.len(), 1);
        assert_eq!(got[0], "a");
    }

    #[test]
    fn truncates_overlong_lines_at_capacity() {
        let mut input = Vec::from(&[b'x'; 200][..]);
        input.push(b'\n');
        input.extend_from_slice(b"next\n");

        let got = lines(&input);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].len(), MAX_LINE);
        assert_eq!(got[1], "next");
    }

    #[test]
    fn drops_non_utf8_lines() {
        let got = lines(b"ok\n\xFF\xFE\nalso-ok\n");
        assert_eq!(got.len(), 2);
        assert_eq!(got[0], "ok");
        assert_eq!(got[1], "also-ok");
    }
}
