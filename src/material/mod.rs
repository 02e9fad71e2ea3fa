//! Implements the material laws: capillary pressure, relative permeability, and heat conduction

mod brooks_corey;
mod heat_conduction;
mod linear_law;
mod material_law;
mod van_genuchten;
pub use crate::material::brooks_corey::*;
pub use crate::material::heat_conduction::*;
pub use crate::material::linear_law::*;
pub use crate::material::material_law::*;
pub use crate::material::van_genuchten::*;
