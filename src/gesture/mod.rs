//! Gesture classification
//!
//! Turns a hand observation into a fist verdict and a pinch distance.

mod classifier;

pub use classifier::{classify, GestureVerdict};
