//! Core traits and types shared by the video pipeline crates.
//!
//! Every chip advances in whole ticks of its own clock and exposes its state
//! for inspection without side effects.

mod observable;
mod tickable;
mod ticks;

pub use observable::{Observable, Value};
pub use tickable::Tickable;
pub use ticks::Ticks;
