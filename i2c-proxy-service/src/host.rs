//! The host link: serial side of the bridge.

use bridge_core::line::LineBuffer;
use bridge_core::wire::{self, Command, Reply};
use bridge_core::{info, trace};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_io_async::{Read, Write};
use heapless::String;

use crate::Bridge;

/// Why the host link stopped running.
#[derive(Debug)]
pub enum HostError<RE, WE> {
    /// The serial input reached end of stream.
    Closed,
    /// Reading from the host failed.
    Read(RE),
    /// Writing to the host failed.
    Write(WE),
}

/// Owns the serial line and drives the command/response protocol.
///
/// A single poll loop serves both directions: frames published by the bus
/// worker are forwarded as unsolicited `RX:` lines, and completed input lines
/// are dispatched as commands. Frame forwarding is checked first on every
/// iteration, matching the original firmware's loop order. Exactly one
/// command is in flight at a time; the link does not read further input until
/// the bus worker has answered.
pub struct HostLink<'a, M: RawMutex, RX, TX> {
    rx: RX,
    tx: TX,
    line: LineBuffer<{ wire::MAX_LINE }>,
    bridge: &'a Bridge<M>,
}

impl<'a, M: RawMutex, RX: Read, TX: Write> HostLink<'a, M, RX, TX> {
    /// Create a link over the two halves of the serial line.
    pub fn new(rx: RX, tx: TX, bridge: &'a Bridge<M>) -> Self {
        Self {
            rx,
            tx,
            line: LineBuffer::new(),
            bridge,
        }
    }

    /// Emit the startup banner, then serve the link until the input closes.
    pub async fn run(&mut self) -> Result<(), HostError<RX::Error, TX::Error>> {
        self.write_line(wire::BANNER).await?;
        self.write_line(wire::READY).await?;
        info!("host link ready");
        loop {
            self.step().await?;
        }
    }

    /// Forward one pending frame or process one chunk of host input.
    pub async fn step(&mut self) -> Result<(), HostError<RX::Error, TX::Error>> {
        let mut chunk = [0u8; 64];
        match select(self.bridge.frames.wait(), self.rx.read(&mut chunk)).await {
            Either::First(frame) => self.write_reply(Reply::Frame(&frame)).await,
            Either::Second(Ok(0)) => Err(HostError::Closed),
            Either::Second(Ok(n)) => {
                for &byte in &chunk[..n] {
                    if let Some(line) = self.line.push(byte) {
                        self.dispatch(&line).await?;
                    }
                }
                Ok(())
            }
            Either::Second(Err(e)) => Err(HostError::Read(e)),
        }
    }

    /// Classify and execute one complete input line.
    async fn dispatch(&mut self, line: &[u8]) -> Result<(), HostError<RX::Error, TX::Error>> {
        match wire::parse(line) {
            // Unknown input is dropped without a response
            None => Ok(()),
            Some(Err(err)) => self.write_reply(err.into()).await,
            Some(Ok(Command::Ping)) => self.write_reply(Reply::Pong).await,
            Some(Ok(Command::Transmit(payload))) => {
                trace!("transmit request, {} bytes", payload.len());
                let reply = match self.bridge.transmit.execute(payload).await {
                    Ok(()) => Reply::TxOk,
                    Err(_) => Reply::TxBusFault,
                };
                self.write_reply(reply).await
            }
        }
    }

    async fn write_reply(&mut self, reply: Reply<'_>) -> Result<(), HostError<RX::Error, TX::Error>> {
        let mut out: String<{ wire::MAX_REPLY }> = String::new();
        // MAX_REPLY fits every reply by construction
        let _ = reply.render(&mut out);
        self.tx
            .write_all(out.as_bytes())
            .await
            .map_err(HostError::Write)
    }

    async fn write_line(&mut self, line: &str) -> Result<(), HostError<RX::Error, TX::Error>> {
        self.tx
            .write_all(line.as_bytes())
            .await
            .map_err(HostError::Write)?;
        self.tx.write_all(b"\r\n").await.map_err(HostError::Write)
    }
}
