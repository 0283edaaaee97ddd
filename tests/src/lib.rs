//! Host-based integration tests for the controller core.
//!
//! Everything here runs against the virtual-tick harness — no hardware,
//! no real pauses.

#[cfg(test)]
mod crossing_tests;
#[cfg(test)]
mod priority_tests;
#[cfg(test)]
mod sequence_tests;
