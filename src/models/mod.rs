//! Implements the models: primary variables and volume variables (closure relations)

mod black_oil_model;
mod flash_model;
mod immiscible;
mod model;
mod richards;
mod soil_data;
mod stokes;
mod volume_variables;
pub use crate::models::black_oil_model::*;
pub use crate::models::flash_model::*;
pub use crate::models::immiscible::*;
pub use crate::models::model::*;
pub use crate::models::richards::*;
pub use crate::models::soil_data::*;
pub use crate::models::stokes::*;
pub use crate::models::volume_variables::*;
