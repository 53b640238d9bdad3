//! Shared plumbing for the I2C proxy bridge.
//!
//! The bridge sits between a host computer on a serial line and an I2C bus
//! shared with a third-party controller device (the peer). This crate holds
//! the pieces that are independent of any particular peripheral: the hex
//! codec, the host wire protocol, bounded line accumulation, the single-slot
//! frame mailbox and the deferred request/response channel.

#![no_std]
#![warn(missing_docs)]

pub mod fmt;
pub mod hex;
pub mod ipc;
pub mod line;
pub mod mailbox;
pub mod wire;
