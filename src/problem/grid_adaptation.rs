use crate::fv::FvGrid;
use crate::StrError;

/// Holds the thresholds of the saturation-based grid adaptation indicator
#[derive(Clone, Copy, Debug)]
pub struct GridAdaptation {
    /// Indicator value above which a cell is marked for refinement
    pub refine_tol: f64,

    /// Indicator value below which a cell is marked for coarsening
    pub coarsen_tol: f64,

    /// Maximum refinement level
    pub max_level: usize,
}

impl GridAdaptation {
    /// Allocates a new instance with the default thresholds
    pub fn new() -> Self {
        GridAdaptation {
            refine_tol: 0.2,
            coarsen_tol: 0.025,
            max_level: 2,
        }
    }

    /// Marks the cells for refinement (+1), coarsening (-1), or nothing (0)
    ///
    /// For each phase, the indicator of a cell is computed over the cell and its face neighbours:
    ///
    /// ```text
    ///            max S - min S
    /// ind = ——————————————————————————————
    ///       max(0.01, max S + min S) / 2
    /// ```
    ///
    /// A cell is refined if the indicator of any phase exceeds `refine_tol` and the level is below
    /// `max_level`. A cell is coarsened only if the indicators of all phases are below `coarsen_tol`.
    ///
    /// # Input
    ///
    /// * `grid` -- the finite volume grid
    /// * `saturations` -- (n_cell) the saturations of all phases in each cell
    /// * `levels` -- (n_cell) the current refinement levels
    ///
    /// # Output
    ///
    /// Returns the marks and the number of marked cells
    pub fn mark(&self, grid: &FvGrid, saturations: &[Vec<f64>], levels: &[usize]) -> Result<(Vec<i32>, usize), StrError> {
        let n_cell = grid.n_cell();
        if saturations.len() != n_cell || levels.len() != n_cell {
            return Err("the arrays of saturations and levels must have n_cell entries");
        }
        let n_phase = if n_cell > 0 { saturations[0].len() } else { 0 };
        let mut marks = vec![0; n_cell];
        let mut n_marked = 0;
        for i in 0..n_cell {
            if saturations[i].len() != n_phase {
                return Err("all cells must have the same number of phases");
            }
            let mut refine = false;
            let mut coarsen = true;
            for alpha in 0..n_phase {
                let mut s_min = saturations[i][alpha];
                let mut s_max = saturations[i][alpha];
                for j in &grid.cells[i].neighbors {
                    s_min = f64::min(s_min, saturations[*j][alpha]);
                    s_max = f64::max(s_max, saturations[*j][alpha]);
                }
                let indicator = (s_max - s_min) / (f64::max(0.01, s_max + s_min) / 2.0);
                if indicator > self.refine_tol {
                    refine = true;
                }
                if indicator >= self.coarsen_tol {
                    coarsen = false;
                }
            }
            if refine && levels[i] < self.max_level {
                marks[i] = 1;
                n_marked += 1;
            } else if coarsen && levels[i] > 0 {
                marks[i] = -1;
                n_marked += 1;
            }
        }
        Ok((marks, n_marked))
    }
}

/// Marks the cells for refinement or coarsening with the default thresholds
///
/// See [GridAdaptation::mark]
pub fn mark_for_grid_adaptation(
    grid: &FvGrid,
    saturations: &[Vec<f64>],
    levels: &[usize],
) -> Result<(Vec<i32>, usize), StrError> {
    GridAdaptation::new().mark(grid, saturations, levels)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
