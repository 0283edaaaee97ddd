#![cfg_attr(not(feature = "std"), no_std)]

//! # Signal Core
//!
//! Control logic for a single-intersection traffic light on bare-metal
//! targets. Arbitrates per tick between a pedestrian crossing, two manual
//! override switches, and the automatic timed sequence.

pub mod arbiter;
pub mod hal;
pub mod latch;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use arbiter::*;
pub use hal::{Duration, Instant, *};
pub use latch::*;
pub use types::*;

/// Controller library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reference configuration: 10 s red, 15 s green, 3 s yellow on a 100 ms
/// tick, with a 10 s crossing hold
pub fn default_config() -> ControllerConfig {
    ControllerConfig {
        red_ticks: 100,
        green_ticks: 150,
        yellow_ticks: 30,
        tick: Duration::from_millis(100),
        crossing_hold: Duration::from_millis(10_000),
        debounce_ms: 50,
    }
}
