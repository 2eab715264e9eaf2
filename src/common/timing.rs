// src/common/timing.rs

use core::time::Duration;

// === Discrete Requests ===

/// Default time to wait for one response line per request attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(1000);
/// Default number of request/response exchanges per data-assurance run.
pub const DEFAULT_RETRY_LIMIT: usize = 5;
/// Exchanges allowed for a metadata request.
pub const METADATA_ATTEMPTS: usize = 2;

// === Continuous Stream ===

/// Default bound on the whole collection window of a stream.
pub const DEFAULT_STREAM_TIMEOUT: Duration = Duration::from_millis(120_000);
/// Default bound on draining lines after the stop byte until the acknowledgement.
pub const DEFAULT_STOP_ACK_TIMEOUT: Duration = Duration::from_secs(5);
/// Wait per poll while draining without a bound.
pub const DRAIN_WAIT_SLICE: Duration = Duration::from_secs(1);

// === Link Polling ===

/// Pause between polls of a non-blocking link that reported `WouldBlock`.
pub const POLL_INTERVAL_US: u32 = 100;
/// Upper bound for a single byte write or flush on a serial link.
pub const WRITE_TIMEOUT: Duration = Duration::from_millis(20);
/// Longest line a serial link assembles before dropping it as noise.
pub const MAX_LINE_LEN: usize = 256;
