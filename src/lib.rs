//! pmfv -- multi-phase multi-component flow in porous media with finite volumes
//!
//! The crate is organized in layers:
//!
//! * [problem] defines the boundary/initial conditions and the soil parameters of a simulation
//! * [models] computes the volume variables (the closure of each control volume)
//! * [fv] assembles and solves the discrete balance equations
//! * [output] post-processes the volume variables for visualization with ParaView

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod flash;
pub mod fluid;
pub mod fv;
pub mod material;
pub mod models;
pub mod output;
pub mod prelude;
pub mod problem;
pub mod util;
