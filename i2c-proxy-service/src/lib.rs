//! Dual-role I2C proxy bridge.
//!
//! The bridge answers at the peer's own bus address so it can observe every
//! transaction the peer initiates, and on host command it briefly claims the
//! bus as controller to inject arbitrary bytes toward the peer. Two
//! cooperating tasks make up the service:
//!
//! - the [bus worker](worker::BusWorker), which exclusively owns the
//!   [`DualRoleBus`](bus::DualRoleBus) peripheral and is the only place the
//!   bus role ever changes, and
//! - the [host link](host::HostLink), which owns the serial line and speaks
//!   the text protocol defined in [`bridge_core::wire`].
//!
//! They share exactly two synchronization points: a single-slot frame mailbox
//! (peer-to-host traffic, last write wins) and a deferred transmit channel
//! (host-to-peer requests, one in flight at a time).

#![no_std]
#![warn(missing_docs)]

pub mod bus;
pub mod host;
pub mod worker;

use bridge_core::{ipc, mailbox, wire};
use embassy_sync::blocking_mutex::raw::RawMutex;

/// Bus address of the peer device. The bridge both answers at this address
/// in target mode and writes to it in controller mode.
pub const PEER_ADDRESS: u8 = 0x17;

/// Why a transmit request did not complete on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitError {
    /// The bus transaction failed (peer NAK or controller error).
    Bus,
    /// The transaction did not complete within the configured timeout.
    Timeout,
}

/// Outcome of a transmit request.
pub type TransmitResult = Result<(), TransmitError>;

/// Single-slot mailbox carrying frames received from the peer.
pub type FrameSlot<M> = mailbox::Slot<M, wire::Payload>;

/// Deferred channel carrying transmit requests to the bus worker.
pub type TransmitChannel<M> = ipc::Channel<M, wire::Payload, TransmitResult>;

/// The shared state between the bus worker and the host link.
///
/// Typically lives in a `static`; both tasks take references to it.
pub struct Bridge<M: RawMutex> {
    /// Frames the peer wrote to the bridge, awaiting forwarding.
    pub frames: FrameSlot<M>,
    /// Host transmit requests, answered once the bus sequence finishes.
    pub transmit: TransmitChannel<M>,
}

impl<M: RawMutex> Bridge<M> {
    /// Create an idle bridge.
    pub const fn new() -> Self {
        Self {
            frames: FrameSlot::new(),
            transmit: TransmitChannel::new(),
        }
    }
}

impl<M: RawMutex> Default for Bridge<M> {
    fn default() -> Self {
        Self::new()
    }
}
