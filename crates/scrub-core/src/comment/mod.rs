//! Comment module
//!
//! The remote comment as the processor sees it.

pub mod model;

pub use model::*;
