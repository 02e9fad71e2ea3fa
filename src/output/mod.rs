//! Implements the post-processing of volume variables for visualization with ParaView
//!
//! Each output module converts the volume variables into a set of named cell fields.
//! The modules are selected by flags and driven by [VtkOutput].

mod black_oil;
mod composition;
mod energy;
mod multi_phase;
mod output_module;
mod stokes;
mod vtk_multi_writer;
pub use crate::output::black_oil::*;
pub use crate::output::composition::*;
pub use crate::output::energy::*;
pub use crate::output::multi_phase::*;
pub use crate::output::output_module::*;
pub use crate::output::stokes::*;
pub use crate::output::vtk_multi_writer::*;
