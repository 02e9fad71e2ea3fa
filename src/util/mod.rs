//! Implements utility functions

mod means;
mod tabulated;
pub use crate::util::means::*;
pub use crate::util::tabulated::*;
