// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// Monotonic point in time as reported by a [`LinkTimer`] or a transport port.
pub trait LinkInstant:
    Copy + PartialOrd + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> LinkInstant for T where
    T: Copy + PartialOrd + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Timer/delay operations needed to poll a link against a deadline.
pub trait LinkTimer {
    type Instant: LinkInstant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Current monotonic time.
    fn now(&self) -> Self::Instant;
}

/// Byte-level, non-blocking access to the serial link a sensor hub sits on.
pub trait SerialLink {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the link.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if no byte is available yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the link.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;

    /// Whether a link with the hardware is currently established.
    ///
    /// Links that cannot tell report `true` and surface failures as I/O errors.
    fn is_connected(&self) -> bool {
        true
    }
}
