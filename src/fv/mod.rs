//! Implements the cell-centred finite volume method with two-point flux approximation

mod assembler;
mod control_convergence;
mod file_io;
mod file_io_write_vtu;
mod fv_state;
mod grid;
mod linear_system;
mod solver_implicit;
pub use crate::fv::assembler::*;
pub use crate::fv::control_convergence::*;
pub use crate::fv::file_io::*;
pub use crate::fv::fv_state::*;
pub use crate::fv::grid::*;
pub use crate::fv::linear_system::*;
pub use crate::fv::solver_implicit::*;
