//! Makes available common structures needed to run a simulation
//!
//! You may write `use pmfv::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{Config, ParamHeatConduction, ParamMaterialLaw, ParamSoil, SampleMeshes};
pub use crate::base::{DEFAULT_OUT_DIR, DEFAULT_TEST_DIR};
pub use crate::fluid::{BlackOilFluidSystem, FluidState, FluidSystem, H2oN2FluidSystem, ImmiscibleFluidSystem};
pub use crate::fv::{FileIo, FvGrid, FvState, SolverImplicit};
pub use crate::models::{BlackOilModel, FlashModel, ImmiscibleModel, Model, RichardsModel, SoilData, VolumeVariables};
pub use crate::output::{OutputModule, VtkOutput};
pub use crate::problem::{BoundaryCondition, Problem};
