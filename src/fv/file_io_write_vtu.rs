use super::{FileIo, FvState};
use crate::output::{write_pvd, VtkMultiWriter};
use crate::StrError;
use gemlab::mesh::Mesh;

impl FileIo {
    /// Writes a file associated with a single time station to perform visualization with ParaView
    ///
    /// The primary variables are written as cell data. The files are indexed with `index`
    /// corresponding to each time station.
    pub fn write_vtu(&self, mesh: &Mesh, state: &FvState, index: usize) -> Result<(), StrError> {
        if !self.enabled() {
            return Err("FileIo must be enabled first");
        }
        let n_cell = mesh.cells.len();
        let neq = state.n_equation;
        if state.uu.dim() != n_cell * neq {
            return Err("the state is incompatible with the mesh");
        }
        if self.primary_variable_names.len() != neq {
            return Err("the number of primary variable names is incompatible with the state");
        }
        let mut writer = VtkMultiWriter::new(mesh);
        for (k, name) in self.primary_variable_names.iter().enumerate() {
            let values = (0..n_cell).map(|c| state.uu[c * neq + k]).collect();
            writer.attach_scalar(name, values)?;
        }
        writer.write_vtu(&self.path_vtu(index))
    }

    /// Writes a summary file for all time stations to perform visualization with ParaView
    pub fn write_pvd(&self) -> Result<(), StrError> {
        self.write_pvd_selected(&self.indices)
    }

    /// Writes a summary file for some time stations (given by their output indices)
    pub fn write_pvd_selected(&self, indices: &[usize]) -> Result<(), StrError> {
        if !self.enabled() {
            return Err("FileIo must be enabled first");
        }
        let mut entries = Vec::with_capacity(indices.len());
        for index in indices {
            match self.indices.iter().position(|i| i == index) {
                Some(k) => entries.push((self.times[k], self.path_vtu(*index))),
                None => return Err("the output index is not in the summary"),
            }
        }
        write_pvd(&self.path_pvd(), &entries)
    }

    /// Returns the output indices of the time stations within [t_min, t_max]
    ///
    /// With `last_only`, at most the latest station within the range is returned.
    pub fn select_indices(&self, t_min: Option<f64>, t_max: Option<f64>, last_only: bool) -> Vec<usize> {
        let lower = t_min.unwrap_or(f64::NEG_INFINITY);
        let upper = t_max.unwrap_or(f64::INFINITY);
        let mut selected: Vec<_> = self
            .indices
            .iter()
            .zip(self.times.iter())
            .filter(|(_, t)| **t >= lower && **t <= upper)
            .map(|(index, _)| *index)
            .collect();
        if last_only && selected.len() > 1 {
            selected.drain(..selected.len() - 1);
        }
        selected
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::base::{Config, DEFAULT_TEST_DIR};
    use crate::fluid::ImmiscibleFluidSystem;
    use crate::fv::{FileIo, FvGrid, FvState};
    use crate::models::{ImmiscibleModel, SoilData};
    use crate::problem::InjectionProblem;
    use std::fs;

    #[test]
    fn write_vtu_captures_errors() {
        let fluid = ImmiscibleFluidSystem::water_gas();
        let problem = InjectionProblem::new(&fluid).unwrap();
        let mesh = problem.mesh(2, 2).unwrap();
        let grid = FvGrid::new(&mesh).unwrap();
        let config = Config::new();
        let soil = SoilData::new(&grid, &problem, &config).unwrap();
        let model = ImmiscibleModel::new(&fluid, &soil, &config).unwrap();
        let state = FvState::new(&grid, &model, &problem, 0.0).unwrap();
        let file_io = FileIo::new();
        assert_eq!(
            file_io.write_vtu(&mesh, &state, 0).err(),
            Some("FileIo must be enabled first")
        );
        assert_eq!(file_io.write_pvd().err(), Some("FileIo must be enabled first"));
        assert_eq!(file_io.select_indices(None, None, false), &[] as &[usize]);
    }

    #[test]
    fn write_vtu_and_pvd_work() {
        let fluid = ImmiscibleFluidSystem::water_gas();
        let problem = InjectionProblem::new(&fluid).unwrap();
        let mesh = problem.mesh(2, 2).unwrap();
        let grid = FvGrid::new(&mesh).unwrap();
        let config = Config::new();
        let soil = SoilData::new(&grid, &problem, &config).unwrap();
        let model = ImmiscibleModel::new(&fluid, &soil, &config).unwrap();
        let state = FvState::new(&grid, &model, &problem, 0.0).unwrap();

        let mut file_io = FileIo::new_enabled(&mesh, &model, "test_write_vtu_works", Some(DEFAULT_TEST_DIR)).unwrap();
        file_io.write_state(&state).unwrap();
        file_io.write_vtu(&mesh, &state, 0).unwrap();
        file_io.write_pvd().unwrap();

        let vtu = fs::read_to_string(&file_io.path_vtu(0)).map_err(|_| "cannot open file").unwrap();
        assert!(vtu.contains("Name=\"p_w\""));
        assert!(vtu.contains("Name=\"S_n\""));
        let pvd = fs::read_to_string(&file_io.path_pvd()).map_err(|_| "cannot open file").unwrap();
        assert!(pvd.contains("test_write_vtu_works-00000000000000000000.vtu"));
    }

    #[test]
    fn select_indices_and_write_pvd_selected_work() {
        let fluid = ImmiscibleFluidSystem::water_gas();
        let problem = InjectionProblem::new(&fluid).unwrap();
        let mesh = problem.mesh(2, 2).unwrap();
        let grid = FvGrid::new(&mesh).unwrap();
        let config = Config::new();
        let soil = SoilData::new(&grid, &problem, &config).unwrap();
        let model = ImmiscibleModel::new(&fluid, &soil, &config).unwrap();
        let mut state = FvState::new(&grid, &model, &problem, 0.0).unwrap();

        let mut file_io = FileIo::new_enabled(&mesh, &model, "test_write_pvd_selected", Some(DEFAULT_TEST_DIR)).unwrap();
        for t in [0.0, 10.0, 20.0, 30.0] {
            state.t = t;
            file_io.write_state(&state).unwrap();
        }
        assert_eq!(file_io.select_indices(None, None, false), &[0, 1, 2, 3]);
        assert_eq!(file_io.select_indices(Some(5.0), Some(20.0), false), &[1, 2]);
        assert_eq!(file_io.select_indices(Some(5.0), Some(20.0), true), &[2]);
        assert_eq!(file_io.select_indices(None, None, true), &[3]);
        assert_eq!(file_io.select_indices(Some(31.0), None, true), &[] as &[usize]);

        assert_eq!(
            file_io.write_pvd_selected(&[1, 7]).err(),
            Some("the output index is not in the summary")
        );
        for index in [1, 3] {
            let state = file_io.read_state(index).unwrap();
            file_io.write_vtu(&mesh, &state, index).unwrap();
        }
        file_io.write_pvd_selected(&[1, 3]).unwrap();
        let pvd = fs::read_to_string(&file_io.path_pvd()).map_err(|_| "cannot open file").unwrap();
        assert!(pvd.contains("timestep=\"10.0\""));
        assert!(pvd.contains("timestep=\"30.0\""));
        assert!(!pvd.contains("timestep=\"20.0\""));
        assert!(pvd.contains("test_write_pvd_selected-00000000000000000003.vtu"));
    }
}
