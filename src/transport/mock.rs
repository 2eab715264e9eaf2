// src/transport/mock.rs

//! Scripted port for engine tests. Each `send` discards unread lines and
//! queues the next scripted reply; waiting on an empty queue advances the
//! simulated clock by the full timeout.

use super::TransportPort;
use crate::common::error::LinkError;
use alloc::collections::VecDeque;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(pub u64);

impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockCommError;

#[derive(Debug, Default)]
pub(crate) struct MockPort {
    pub connected: bool,
    pub now_us: u64,
    pub sent: Vec<u8>,
    pub stale_dropped: usize,
    script: VecDeque<Vec<String>>,
    /// Reply used once the script runs out.
    fallback: Option<Vec<String>>,
    inbox: VecDeque<String>,
}

impl MockPort {
    /// Time each delivered line takes to arrive.
    const LINE_COST_US: u64 = 1_000;

    pub fn new() -> Self {
        MockPort {
            connected: true,
            ..Default::default()
        }
    }

    /// Queues the reply to the next unscripted send.
    pub fn reply(&mut self, lines: &[&str]) -> &mut Self {
        self.script.push_back(lines.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Reply for every send once the script is exhausted.
    pub fn always_reply(&mut self, lines: &[&str]) -> &mut Self {
        self.fallback = Some(lines.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.now_us)
    }
}

impl TransportPort for MockPort {
    type Error = MockCommError;
    type Instant = MockInstant;

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn now(&self) -> MockInstant {
        MockInstant(self.now_us)
    }

    fn send(&mut self, byte: u8) -> Result<(), LinkError<MockCommError>> {
        if !self.connected {
            return Err(LinkError::NotConnected);
        }
        self.stale_dropped += self.inbox.len();
        self.inbox.clear();
        self.sent.push(byte);
        let next = match self.script.pop_front() {
            Some(lines) => lines,
            None => self.fallback.clone().unwrap_or_default(),
        };
        self.inbox.extend(next);
        Ok(())
    }

    fn await_line(&mut self, timeout: Duration) -> Result<Option<String>, LinkError<MockCommError>> {
        if !self.connected {
            return Err(LinkError::NotConnected);
        }
        match self.inbox.pop_front() {
            Some(line) => {
                self.now_us += Self::LINE_COST_US;
                Ok(Some(line))
            }
            None => {
                self.now_us += timeout.as_micros() as u64;
                Ok(None)
            }
        }
    }
}
