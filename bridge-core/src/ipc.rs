//! Deferred execution of commands across tasks.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

/// A request/response channel between a requesting task and a worker task.
///
/// [`execute`](Channel::execute) is serialized by an internal mutex, so at
/// most one command is in flight at a time and a response always belongs to
/// the command that was just sent. There is no queueing: the requester holds
/// the lock until the worker has answered.
pub struct Channel<M: RawMutex, C, R> {
    command: Signal<M, C>,
    response: Signal<M, R>,
    request_lock: Mutex<M, ()>,
}

impl<M: RawMutex, C: Send, R: Send> Channel<M, C, R> {
    /// Create a new channel.
    pub const fn new() -> Self {
        Self {
            command: Signal::new(),
            response: Signal::new(),
            request_lock: Mutex::new(()),
        }
    }

    /// Send a command and wait for the worker's response.
    pub async fn execute(&self, command: C) -> R {
        let _guard = self.request_lock.lock().await;
        // A previous requester may have been cancelled between command and
        // response; make sure we do not pick up its answer.
        self.response.reset();
        self.command.signal(command);
        self.response.wait().await
    }

    /// Wait for the next command.
    pub async fn receive(&self) -> C {
        self.command.wait().await
    }

    /// Answer the command most recently received.
    pub fn respond(&self, response: R) {
        self.response.signal(response);
    }
}

impl<M: RawMutex, C: Send, R: Send> Default for Channel<M, C, R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn execute_round_trip() {
        let channel: Channel<NoopRawMutex, u8, u16> = Channel::new();

        let worker = async {
            let cmd = channel.receive().await;
            channel.respond(cmd as u16 * 2);
        };

        let (response, ()) = block_on(join(channel.execute(21), worker));
        assert_eq!(response, 42);
    }

    #[test]
    fn sequential_commands_each_get_their_response() {
        let channel: Channel<NoopRawMutex, u8, u8> = Channel::new();

        let worker = async {
            for _ in 0..3 {
                let cmd = channel.receive().await;
                channel.respond(cmd + 1);
            }
        };

        let requester = async {
            for cmd in [1u8, 5, 9] {
                assert_eq!(channel.execute(cmd).await, cmd + 1);
            }
        };

        block_on(join(requester, worker));
    }

    #[test]
    fn stale_response_is_discarded() {
        let channel: Channel<NoopRawMutex, u8, u8> = Channel::new();
        // A response left over from a cancelled exchange
        channel.respond(0xEE);

        let worker = async {
            let cmd = channel.receive().await;
            channel.respond(cmd);
        };

        let (response, ()) = block_on(join(channel.execute(0x11), worker));
        assert_eq!(response, 0x11);
    }
}
