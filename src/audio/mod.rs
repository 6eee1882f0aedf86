//! Audio output
//!
//! The `AudioSink` trait is the boundary the session applies commands
//! against; `SoftwareMixer` is the in-process implementation.

mod mixer;
mod sink;

pub use mixer::SoftwareMixer;
pub use sink::{AudioSink, SinkError};
