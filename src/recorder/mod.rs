// src/recorder/mod.rs

//! Protocol engines. Each runs over any [`TransportPort`](crate::transport::TransportPort)
//! and reads its configuration once at the start of the run.

pub mod assurance;
pub mod metadata;
pub mod stream;

pub use assurance::fetch_discrete;
pub use metadata::fetch_metadata;
pub use stream::{fetch_stream, parse_samples};
