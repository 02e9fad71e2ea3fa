use super::FvGrid;
use crate::models::Model;
use crate::problem::Problem;
use crate::StrError;
use russell_lab::Vector;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the state of a finite volume simulation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FvState {
    /// Time
    pub t: f64,

    /// Delta time
    pub dt: f64,

    /// Number of equations per control volume
    pub n_equation: usize,

    /// Primary variables {U}
    ///
    /// (n_cell × n_equation)
    pub uu: Vector,

    /// Primary variables at the beginning of the time step
    ///
    /// (n_cell × n_equation)
    pub uu_old: Vector,
}

impl FvState {
    /// Allocates a new instance with the initial conditions given by the problem
    pub fn new<M>(grid: &FvGrid, model: &M, problem: &dyn Problem, t_ini: f64) -> Result<Self, StrError>
    where
        M: Model,
    {
        let n_cell = grid.n_cell();
        if n_cell == 0 {
            return Err("there are no cells in the grid");
        }
        let neq = model.n_equation();
        let mut uu = Vector::new(n_cell * neq);
        for (i, cell) in grid.cells.iter().enumerate() {
            let fs = problem.initial(cell)?;
            model.primary_variables_from_fluid_state(&mut uu.as_mut_data()[i * neq..(i + 1) * neq], &fs)?;
        }
        Ok(FvState {
            t: t_ini,
            dt: 0.0,
            n_equation: neq,
            uu: uu.clone(),
            uu_old: uu,
        })
    }

    /// Returns the primary variables of a control volume
    pub fn cell_values(&self, cell: usize) -> &[f64] {
        &self.uu.as_data()[cell * self.n_equation..(cell + 1) * self.n_equation]
    }

    /// Reads a JSON file containing the state
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(input);
        let state = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(state)
    }

    /// Writes a JSON file with the state
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::FvState;
    use crate::base::{Config, ParamPhase, SampleMeshes, DEFAULT_TEST_DIR};
    use crate::fluid::{FluidState, FluidSystem, ImmiscibleFluidSystem};
    use crate::fv::{FvCell, FvGrid};
    use crate::models::{ImmiscibleModel, SoilData};
    use crate::problem::{to_dim_matrix, Problem};
    use crate::StrError;
    use russell_lab::Matrix;

    struct Sample {
        fluid: ImmiscibleFluidSystem,
    }

    impl Problem for Sample {
        fn intrinsic_permeability(&self, _: &FvCell) -> Result<Matrix, StrError> {
            Ok(to_dim_matrix(2, 1e-12))
        }
        fn porosity(&self, _: &FvCell) -> Result<f64, StrError> {
            Ok(0.3)
        }
        fn temperature(&self) -> Result<f64, StrError> {
            Ok(293.15)
        }
        fn initial(&self, cell: &FvCell) -> Result<FluidState, StrError> {
            let mut fs = self.fluid.new_fluid_state();
            fs.temperature = 293.15;
            fs.pressure = vec![1e5 + cell.centroid[0], 1e5 + cell.centroid[0]];
            fs.saturation = vec![0.7, 0.3];
            fs.set_immiscible_composition();
            Ok(fs)
        }
    }

    #[test]
    fn new_and_json_work() {
        let grid = FvGrid::new(&SampleMeshes::two_qua4()).unwrap();
        let fluid = ImmiscibleFluidSystem::water_gas();
        let problem = Sample { fluid: fluid.clone() };
        let config = Config::new();
        let soil = SoilData::new(&grid, &problem, &config).unwrap();
        let model = ImmiscibleModel::new(&fluid, &soil, &config).unwrap();
        let state = FvState::new(&grid, &model, &problem, 0.0).unwrap();
        assert_eq!(state.n_equation, 2);
        assert_eq!(state.uu.as_data(), &[1e5 + 0.5, 0.3, 1e5 + 1.5, 0.3]);
        assert_eq!(state.cell_values(1), &[1e5 + 1.5, 0.3]);
        assert_eq!(state.uu_old.as_data(), state.uu.as_data());

        let path = format!("{}/fv_state_json_works.json", DEFAULT_TEST_DIR);
        state.write_json(&path).unwrap();
        let read = FvState::read_json(&path).unwrap();
        assert_eq!(read.uu.as_data(), state.uu.as_data());
        assert_eq!(read.t, 0.0);
        assert_eq!(FvState::read_json("/tmp/not-found/state.json").err(), Some("cannot open file"));
    }
}
