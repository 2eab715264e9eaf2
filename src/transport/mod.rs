// src/transport/mod.rs

//! Blocking, line-oriented access to the sensor hardware.
//!
//! A port sends single request bytes and hands back complete response lines.
//! Lines that arrived before a send are never attributed to it: `send` discards
//! them first.

pub mod serial;
pub use serial::SerialTransport;

#[cfg(feature = "std")]
pub mod channel;
#[cfg(feature = "std")]
pub use channel::ChannelTransport;

#[cfg(test)]
pub(crate) mod mock;

use crate::common::error::LinkError;
use crate::common::hal_traits::LinkInstant;
use crate::common::request::StreamHandshake;
use crate::common::timing;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::time::Duration;

/// The capability the protocol engines consume.
pub trait TransportPort {
    /// Error of the underlying link.
    type Error: Debug;
    type Instant: LinkInstant;

    /// Whether a link with the hardware is established.
    fn is_connected(&self) -> bool;

    fn now(&self) -> Self::Instant;

    /// Discards pending input, then writes `byte`.
    ///
    /// Fails with `NotConnected` when no link is established.
    fn send(&mut self, byte: u8) -> Result<(), LinkError<Self::Error>>;

    /// Blocks for one complete line, without its terminator.
    ///
    /// `Ok(None)` when `timeout` elapses first.
    fn await_line(&mut self, timeout: Duration) -> Result<Option<String>, LinkError<Self::Error>>;

    /// Sends `byte` and waits for one line. An empty string means no line
    /// arrived within `timeout`.
    fn send_and_await_line(&mut self, byte: u8, timeout: Duration) -> Result<String, LinkError<Self::Error>> {
        self.send(byte)?;
        Ok(self.await_line(timeout)?.unwrap_or_default())
    }

    /// Runs a start/collect/stop exchange and returns the collected lines.
    ///
    /// Collection stops when `capacity` lines arrived or `timeout` elapsed,
    /// whichever comes first. The stop byte is then sent and input is drained
    /// until the stop acknowledgement shows up.
    fn send_and_await_buffer(
        &mut self,
        handshake: &StreamHandshake<'_>,
        capacity: usize,
        timeout: Duration,
    ) -> Result<Vec<String>, LinkError<Self::Error>> {
        self.send(handshake.start_byte)?;

        let deadline = self.now() + timeout;
        let mut lines = Vec::with_capacity(capacity);
        while lines.len() < capacity {
            let now = self.now();
            if now >= deadline {
                break;
            }
            match self.await_line(deadline - now)? {
                Some(line) => lines.push(line),
                None => break,
            }
        }
        log::debug!("stream collected {} of {} lines", lines.len(), capacity);

        self.send(handshake.stop_byte)?;
        drain_until_ack(self, handshake.stop_ack, handshake.stop_ack_timeout)?;
        Ok(lines)
    }
}

/// Discards lines until one equals `ack`. Returns whether it was seen.
///
/// `bound` of `None` waits for as long as it takes.
pub fn drain_until_ack<P>(port: &mut P, ack: &str, bound: Option<Duration>) -> Result<bool, LinkError<P::Error>>
where
    P: TransportPort + ?Sized,
{
    let deadline = bound.map(|b| port.now() + b);
    loop {
        let wait = match deadline {
            Some(deadline) => {
                let now = port.now();
                if now >= deadline {
                    log::warn!("stop acknowledgement {:?} not received, giving up", ack);
                    return Ok(false);
                }
                deadline - now
            }
            None => timing::DRAIN_WAIT_SLICE,
        };
        match port.await_line(wait)? {
            Some(line) if line.trim_end() == ack => return Ok(true),
            Some(line) => log::trace!("draining {:?}", line),
            None => {}
        }
    }
}

impl<T: TransportPort + ?Sized> TransportPort for &mut T {
    type Error = T::Error;
    type Instant = T::Instant;

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn now(&self) -> Self::Instant {
        (**self).now()
    }

    fn send(&mut self, byte: u8) -> Result<(), LinkError<Self::Error>> {
        (**self).send(byte)
    }

    fn await_line(&mut self, timeout: Duration) -> Result<Option<String>, LinkError<Self::Error>> {
        (**self).await_line(timeout)
    }

    fn send_and_await_buffer(
        &mut self,
        handshake: &StreamHandshake<'_>,
        capacity: usize,
        timeout: Duration,
    ) -> Result<Vec<String>, LinkError<Self::Error>> {
        (**self).send_and_await_buffer(handshake, capacity, timeout)
    }
}
