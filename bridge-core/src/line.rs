//! Bounded accumulation of serial input into discrete lines.

use heapless::Vec;

/// Accumulates raw serial bytes until a line terminator.
///
/// `\n` and `\r` both complete a line, so CRLF input yields one line followed
/// by an ignored empty one. Input beyond the capacity `N` is silently dropped;
/// the truncated line is still delivered on its terminator and the buffer
/// resets cleanly, so an overlong line never bleeds into the next one.
#[derive(Debug, Default)]
pub struct LineBuffer<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> LineBuffer<N> {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feed one byte, returning a completed non-empty line if this byte
    /// terminated one.
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8, N>> {
        if byte == b'\n' || byte == b'\r' {
            if self.buf.is_empty() {
                return None;
            }
            return Some(core::mem::take(&mut self.buf));
        }

        // Overflow bytes are dropped, not an error
        let _ = self.buf.push(byte);
        None
    }
}
