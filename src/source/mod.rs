//! Keypoint source
//!
//! Frame records from an external hand-landmark detector, one JSON object
//! per line, read off the async runtime on a dedicated thread.

mod reader;
mod record;

pub use reader::{FrameSource, InputSource};
pub use record::FrameRecord;
