// src/common/response/packet.rs

use crate::common::request::Delimiters;
use alloc::string::String;
use alloc::vec::Vec;

/// Splits a response line into every fragment tagged with `sensor_id`.
///
/// The line is cut on `sensor_id` followed by the id/data delimiter. Text before
/// the first marker belongs to other sensors and is dropped; each remaining
/// piece is truncated at the next sensor delimiter. Fragments come back in
/// wire order, so the most recent reading for the sensor is last.
pub fn split_packet<'a>(line: &'a str, sensor_id: char, delimiters: &Delimiters) -> Vec<&'a str> {
    let mut marker = String::with_capacity(8);
    marker.push(sensor_id);
    marker.push(delimiters.id_data);

    line.split(marker.as_str())
        .skip(1)
        .map(|piece| match piece.split_once(delimiters.sensor) {
            Some((head, _)) => head,
            None => piece,
        })
        .collect()
}
