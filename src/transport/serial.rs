// src/transport/serial.rs

use super::TransportPort;
use crate::common::{
    error::LinkError,
    hal_traits::{LinkTimer, SerialLink},
    timing,
};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::time::Duration;
use nb::Result as NbResult;

/// Line-oriented port over a byte-level, non-blocking serial link.
///
/// Bytes are assembled into lines terminated by `\n` (a preceding `\r` is
/// dropped). A line that is still incomplete when a wait times out is kept and
/// finished by the next wait. Lines longer than [`timing::MAX_LINE_LEN`] are
/// discarded whole.
#[derive(Debug)]
pub struct SerialTransport<IF>
where
    IF: SerialLink + LinkTimer,
    IF::Error: Debug,
{
    interface: IF,
    partial: Vec<u8>,
    overflowed: bool,
}

impl<IF> SerialTransport<IF>
where
    IF: SerialLink + LinkTimer,
    IF::Error: Debug,
{
    pub fn new(interface: IF) -> Self {
        SerialTransport {
            interface,
            partial: Vec::new(),
            overflowed: false,
        }
    }

    pub fn interface(&self) -> &IF {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    pub fn into_inner(self) -> IF {
        self.interface
    }

    /// Executes a non-blocking I/O operation (`f`) repeatedly until it
    /// stops returning `WouldBlock`, returning the final result or a timeout error.
    fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        timeout: Duration,
        mut f: FN,
    ) -> Result<T, LinkError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let deadline = self.interface.now() + timeout;
        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Err(LinkError::Timeout);
                    }
                    self.interface.delay_us(timing::POLL_INTERVAL_US);
                }
                Err(nb::Error::Other(e)) => return Err(LinkError::Io(e)),
            }
        }
    }

    /// Throws away every byte already received, including a partial line.
    fn discard_pending_input(&mut self) -> Result<(), LinkError<IF::Error>> {
        let mut dropped = self.partial.len();
        self.partial.clear();
        self.overflowed = false;
        loop {
            match self.interface.read_byte() {
                Ok(_) => dropped += 1,
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => return Err(LinkError::Io(e)),
            }
        }
        if dropped > 0 {
            log::trace!("discarded {} stale bytes before send", dropped);
        }
        Ok(())
    }

    /// Feeds one received byte into the line assembler. Returns a finished line.
    fn accept_byte(&mut self, byte: u8) -> Option<String> {
        match byte {
            b'\n' => {
                let raw = core::mem::take(&mut self.partial);
                if core::mem::replace(&mut self.overflowed, false) {
                    log::trace!("dropped over-long line");
                    return None;
                }
                if raw.is_empty() {
                    return None;
                }
                Some(String::from_utf8_lossy(&raw).into_owned())
            }
            b'\r' => None,
            _ => {
                if self.partial.len() >= timing::MAX_LINE_LEN {
                    self.overflowed = true;
                    self.partial.clear();
                }
                if !self.overflowed {
                    self.partial.push(byte);
                }
                None
            }
        }
    }
}

impl<IF> TransportPort for SerialTransport<IF>
where
    IF: SerialLink + LinkTimer,
    IF::Error: Debug,
{
    type Error = IF::Error;
    type Instant = IF::Instant;

    fn is_connected(&self) -> bool {
        self.interface.is_connected()
    }

    fn now(&self) -> IF::Instant {
        self.interface.now()
    }

    fn send(&mut self, byte: u8) -> Result<(), LinkError<IF::Error>> {
        if !self.interface.is_connected() {
            return Err(LinkError::NotConnected);
        }
        self.discard_pending_input()?;
        self.execute_blocking_io_with_timeout(timing::WRITE_TIMEOUT, |iface| iface.write_byte(byte))?;
        self.execute_blocking_io_with_timeout(timing::WRITE_TIMEOUT, |iface| iface.flush())?;
        Ok(())
    }

    fn await_line(&mut self, timeout: Duration) -> Result<Option<String>, LinkError<IF::Error>> {
        if !self.interface.is_connected() {
            return Err(LinkError::NotConnected);
        }
        let deadline = self.interface.now() + timeout;
        loop {
            match self.interface.read_byte() {
                Ok(byte) => {
                    if let Some(line) = self.accept_byte(byte) {
                        return Ok(Some(line));
                    }
                }
                Err(nb::Error::WouldBlock) => self.interface.delay_us(timing::POLL_INTERVAL_US),
                Err(nb::Error::Other(e)) => return Err(LinkError::Io(e)),
            }
            // A link streaming bytes without a terminator must not hold the wait open.
            if self.interface.now() >= deadline {
                return Ok(None);
            }
        }
    }
}
