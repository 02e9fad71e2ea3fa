//! Implements the base structures for a finite volume simulation

mod config;
mod constants;
mod parameters;
mod sample_meshes;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_meshes::*;
