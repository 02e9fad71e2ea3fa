use super::FvGrid;
use crate::base::Config;
use crate::StrError;
use russell_lab::Vector;
use russell_sparse::{LinSolver, SparseMatrix, Sym};

/// Holds variables to solve the global linear system
pub struct LinearSystem<'a> {
    /// Total number of global equations (n_cell × n_equation)
    pub n_equation: usize,

    /// Holds the supremum of the number of nonzero values (nnz) in the global matrix
    ///
    /// **Notes:**
    ///
    /// 1. The residual of a control volume depends on the primary variables of the control volume
    ///    itself and of its face neighbours (two-point stencil)
    /// 2. Thus, each control volume `i` contributes `(1 + n_neighbor_i) × neq × neq` entries,
    ///    where `neq` is the number of equations per control volume
    /// 3. The supremum is the sum of these contributions over all control volumes
    pub nnz_sup: usize,

    /// Holds the residual vector R
    pub rr: Vector,

    /// Holds the global Jacobian matrix K
    pub kk: SparseMatrix,

    /// Holds the linear solver
    pub solver: LinSolver<'a>,

    /// Holds the "minus-delta-U" vector (the solution of the linear system)
    pub mdu: Vector,
}

impl<'a> LinearSystem<'a> {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `grid` -- the finite volume grid
    /// * `config` -- the configuration with the linear solver type
    /// * `neq` -- the number of equations per control volume
    pub fn new(grid: &FvGrid, config: &Config, neq: usize) -> Result<Self, StrError> {
        let n_equation = grid.n_cell() * neq;
        let nnz_sup = grid
            .cells
            .iter()
            .fold(0, |acc, cell| acc + (1 + cell.neighbors.len()) * neq * neq);
        Ok(LinearSystem {
            n_equation,
            nnz_sup,
            rr: Vector::new(n_equation),
            kk: SparseMatrix::new_coo(n_equation, n_equation, nnz_sup, Sym::No)?,
            solver: LinSolver::new(config.lin_sol_genie)?,
            mdu: Vector::new(n_equation),
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
