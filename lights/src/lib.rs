//! Lights

#[macro_use]
extern crate log;

mod background;
mod diffuse;
mod point;

// Re-export.
pub use background::*;
pub use diffuse::*;
pub use point::*;
