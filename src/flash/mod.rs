//! Implements the compositional phase-equilibrium (flash) solver

mod ncp_flash;
pub use crate::flash::ncp_flash::*;
