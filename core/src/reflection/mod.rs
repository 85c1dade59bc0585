//! Reflection

mod bsdf;
mod bxdf_type;

// Re-export
pub use bsdf::*;
pub use bxdf_type::*;
