//! Implements the problem definition (initial and boundary conditions, spatial parameters) and samples

mod black_oil_column;
mod grid_adaptation;
mod injection;
mod problem;
mod richards_lens;
pub use crate::problem::black_oil_column::*;
pub use crate::problem::grid_adaptation::*;
pub use crate::problem::injection::*;
pub use crate::problem::problem::*;
pub use crate::problem::richards_lens::*;
