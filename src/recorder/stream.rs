// src/recorder/stream.rs

use crate::common::{
    error::LinkError,
    range_table::RangeTable,
    reading::SampleBuffer,
    request::StreamSpec,
    response::extract::extract_ecg_sample,
};
use crate::transport::TransportPort;
use alloc::string::String;

/// Runs one start/collect/stop handshake and parses the collected samples.
///
/// Single attempt, no retry. The target length is resolved before anything is
/// sent. A stream cut short by the timeout, and samples dropped as malformed
/// or out of range, both leave the buffer shorter than requested.
pub fn fetch_stream<P>(
    port: &mut P,
    spec: &StreamSpec,
    ranges: &RangeTable,
) -> Result<SampleBuffer<f32>, LinkError<P::Error>>
where
    P: TransportPort + ?Sized,
{
    let length = spec.resolve_length()?;
    log::debug!(
        "{} stream: start byte {:#04x}, {} samples, timeout {:?}",
        spec.kind,
        spec.start_byte,
        length,
        spec.timeout
    );
    let lines = port.send_and_await_buffer(&spec.handshake(), length, spec.timeout)?;
    Ok(parse_samples(&lines, length, ranges))
}

/// Parses stream lines into a buffer of `requested` capacity.
///
/// Invalid lines are dropped, never replaced.
pub fn parse_samples(lines: &[String], requested: usize, ranges: &RangeTable) -> SampleBuffer<f32> {
    let mut buffer = SampleBuffer::with_capacity(requested);
    let mut dropped = 0usize;
    for line in lines {
        match extract_ecg_sample(line, ranges) {
            Ok(sample) => {
                if !buffer.push(sample) {
                    break;
                }
            }
            Err(e) => {
                log::trace!("sample {:?} dropped: {}", line, e);
                dropped += 1;
            }
        }
    }
    if dropped > 0 {
        log::warn!("{} of {} stream samples dropped", dropped, lines.len());
    }
    buffer
}
