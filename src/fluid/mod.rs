//! Implements the fluid state and the fluid systems (thermodynamic relations)

mod black_oil;
mod fluid_state;
mod fluid_system;
mod h2o_n2;
mod immiscible;
pub use crate::fluid::black_oil::*;
pub use crate::fluid::fluid_state::*;
pub use crate::fluid::fluid_system::*;
pub use crate::fluid::h2o_n2::*;
pub use crate::fluid::immiscible::*;
