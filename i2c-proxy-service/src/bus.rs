//! Hardware seam: dual-role access to the shared I2C bus.

use core::future::Future;

use embedded_hal_async::i2c::{I2c, SevenBitAddress};

/// The role the bus peripheral currently holds. It is in exactly one role at
/// any instant; transitions happen only inside the bus worker's transmit
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusRole {
    /// Passively answering at the configured address.
    Target,
    /// Actively initiating transactions.
    Controller,
}

/// Something the peer did while the bridge was in target mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TargetEvent {
    /// The peer wrote to us; this many bytes were drained into the caller's
    /// buffer (anything beyond the buffer was discarded).
    Write(usize),
    /// The peer addressed us for a read and is waiting for a response.
    Read,
}

/// An I2C peripheral that can switch between target and controller roles on
/// the same bus.
///
/// Controller-phase traffic goes through the inherited [`I2c`] methods;
/// `write_read` in particular performs write, repeated start, read, stop,
/// which is the exact framing the peer requires. This trait adds the role
/// switching and the target-mode event surface that `embedded-hal` does not
/// model.
///
/// Implementations must make [`target_event`](DualRoleBus::target_event)
/// cancel-safe: the worker drops the event future whenever a transmit
/// request arrives.
pub trait DualRoleBus: I2c<SevenBitAddress> {
    /// Stop answering at the target address and claim the bus as controller.
    fn enter_controller(&mut self) -> impl Future<Output = Result<(), Self::Error>>;

    /// Release the bus and resume answering at `address` as a target.
    fn enter_target(&mut self, address: SevenBitAddress) -> impl Future<Output = Result<(), Self::Error>>;

    /// Wait to be addressed while in target mode.
    ///
    /// On a peer write, drain the received bytes into `buf`, discarding
    /// anything that does not fit, and return [`TargetEvent::Write`] with the
    /// drained count. On a peer read, return [`TargetEvent::Read`] without
    /// consuming anything; the caller answers via
    /// [`respond`](DualRoleBus::respond).
    fn target_event(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<TargetEvent, Self::Error>>;

    /// Answer an in-progress target-mode read with `bytes`.
    fn respond(&mut self, bytes: &[u8]) -> impl Future<Output = Result<(), Self::Error>>;
}
