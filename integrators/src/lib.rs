//! Integrators

#[macro_use]
extern crate log;

mod vcm;

// Re-export.
pub use vcm::*;
