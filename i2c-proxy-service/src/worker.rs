//! The bus worker: exclusive owner of the dual-role I2C peripheral.

use bridge_core::wire::{self, Payload};
use bridge_core::{error, info, trace};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{with_timeout, Duration, TimeoutError};

use crate::bus::{BusRole, DualRoleBus, TargetEvent};
use crate::{Bridge, TransmitError, TransmitResult, PEER_ADDRESS};

/// Fixed reply to any target-mode read. The peer performs a repeated-start
/// read after every write and expects exactly two bytes back regardless of
/// transaction semantics; the content is never interpreted.
const READ_REPLY: [u8; 2] = [0x00, 0x00];

/// Bus worker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Address the bridge answers at and transmits to.
    pub peer_address: u8,
    /// Upper bound on a single controller transaction. `None` inherits the
    /// original firmware behavior of blocking indefinitely on a stalled bus.
    pub transaction_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            peer_address: PEER_ADDRESS,
            transaction_timeout: Some(Duration::from_millis(100)),
        }
    }
}

/// Owns the bus peripheral and serializes every role transition.
///
/// The worker is the single producer of the frame mailbox and the single
/// consumer of the transmit channel. While a transmit sequence runs it is not
/// listening for target events, so a reception can never interleave with an
/// in-flight controller transaction.
pub struct BusWorker<'a, M: RawMutex, B: DualRoleBus> {
    bus: B,
    config: Config,
    role: BusRole,
    bridge: &'a Bridge<M>,
}

impl<'a, M: RawMutex, B: DualRoleBus> BusWorker<'a, M, B> {
    /// Create a worker around a peripheral that is not yet on the bus.
    pub fn new(bus: B, config: Config, bridge: &'a Bridge<M>) -> Self {
        Self {
            bus,
            config,
            role: BusRole::Target,
            bridge,
        }
    }

    /// The role the peripheral currently holds.
    pub fn role(&self) -> BusRole {
        self.role
    }

    /// Join the bus in target mode and service it forever.
    ///
    /// Only the initial role entry can fail; runtime faults are reported per
    /// command or logged.
    pub async fn run(&mut self) -> Result<(), B::Error> {
        self.bus.enter_target(self.config.peer_address).await?;
        info!("bus worker listening at 0x{:02x}", self.config.peer_address);
        loop {
            self.step().await;
        }
    }

    /// Service one bus event or one transmit request.
    pub async fn step(&mut self) {
        let mut frame = [0u8; wire::MAX_PAYLOAD];
        match select(self.bus.target_event(&mut frame), self.bridge.transmit.receive()).await {
            Either::First(Ok(TargetEvent::Write(len))) => {
                trace!("peer wrote {} bytes", len);
                if let Ok(payload) = Payload::from_slice(&frame[..len]) {
                    self.bridge.frames.publish(payload);
                }
            }
            Either::First(Ok(TargetEvent::Read)) => {
                if self.bus.respond(&READ_REPLY).await.is_err() {
                    error!("failed to answer peer read");
                }
            }
            Either::First(Err(_)) => {
                error!("target event fault, still listening");
            }
            Either::Second(payload) => {
                let result = self.controller_transmit(&payload).await;
                self.bridge.transmit.respond(result);
            }
        }
    }

    /// Inject `payload` toward the peer as a controller write.
    ///
    /// The sequence is atomic with respect to target servicing: leave target
    /// mode, write the payload ending in a repeated start, read and discard
    /// the two-byte trailer the peer always appends, then re-enter target
    /// mode. The target role is re-armed even when the write fails, so one
    /// bad transaction cannot take the bridge off the bus.
    async fn controller_transmit(&mut self, payload: &[u8]) -> TransmitResult {
        if self.bus.enter_controller().await.is_err() {
            error!("failed to claim bus as controller");
            let _ = self.bus.enter_target(self.config.peer_address).await;
            return Err(TransmitError::Bus);
        }
        self.role = BusRole::Controller;
        trace!("controller write of {} bytes", payload.len());

        let mut trailer = [0u8; 2];
        let transaction = self.bus.write_read(self.config.peer_address, payload, &mut trailer);
        let result = match self.config.transaction_timeout {
            Some(timeout) => match with_timeout(timeout, transaction).await {
                Ok(res) => res.map_err(|_| TransmitError::Bus),
                Err(TimeoutError) => {
                    error!("controller transaction timed out");
                    Err(TransmitError::Timeout)
                }
            },
            None => transaction.await.map_err(|_| TransmitError::Bus),
        };

        let rearm = self
            .bus
            .enter_target(self.config.peer_address)
            .await
            .map_err(|_| TransmitError::Bus);
        self.role = BusRole::Target;

        result.and(rearm)
    }
}
