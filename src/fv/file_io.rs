use super::FvState;
use crate::base::DEFAULT_OUT_DIR;
use crate::models::Model;
use crate::StrError;
use gemlab::mesh::Mesh;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Assists in generating output files
///
/// The summary file records the indices and times of the saved states, and the
/// names of the primary variables needed to post-process them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileIo {
    /// Holds a flag to enable/disable the file generation
    enabled: bool,

    /// Defines the output directory
    output_dir: String,

    /// Defines the filename stem
    filename_stem: String,

    /// Holds the count of files written
    output_count: usize,

    /// Holds the indices of the output files
    pub indices: Vec<usize>,

    /// Holds the simulation times corresponding to each output file
    pub times: Vec<f64>,

    /// Holds the names of the primary variables
    pub primary_variable_names: Vec<String>,
}

impl FileIo {
    /// Allocates a new instance with deactivated generation of files
    pub fn new() -> Self {
        FileIo {
            enabled: false,
            output_dir: String::new(),
            filename_stem: String::new(),
            output_count: 0,
            indices: Vec::new(),
            times: Vec::new(),
            primary_variable_names: Vec::new(),
        }
    }

    /// Allocates a new instance and writes the mesh file
    ///
    /// # Input
    ///
    /// * `mesh` -- the mesh
    /// * `model` -- the model defining the primary variables
    /// * `filename_stem` -- the last part of the filename without extension, e.g., "my_simulation"
    /// * `output_directory` -- the directory to save the output files.
    ///   None means that the default directory will be used; see [DEFAULT_OUT_DIR]
    pub fn new_enabled<M>(
        mesh: &Mesh,
        model: &M,
        filename_stem: &str,
        output_directory: Option<&str>,
    ) -> Result<Self, StrError>
    where
        M: Model,
    {
        // output directory
        let out_dir = match output_directory {
            Some(d) => d,
            None => DEFAULT_OUT_DIR,
        };

        // create directory
        fs::create_dir_all(out_dir).map_err(|_| "cannot create output directory")?;

        // write the mesh
        let path = format!("{}/{}-mesh.json", out_dir, filename_stem);
        mesh.write_json(&path)?;

        // new structure
        Ok(FileIo {
            enabled: true,
            output_dir: out_dir.to_string(),
            filename_stem: filename_stem.to_string(),
            output_count: 0,
            indices: Vec::new(),
            times: Vec::new(),
            primary_variable_names: model.primary_variable_names(),
        })
    }

    /// Indicates whether the generation of files is enabled
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Generates the filename path for the mesh file
    pub fn path_mesh(&self) -> String {
        if self.enabled {
            format!("{}/{}-mesh.json", self.output_dir, self.filename_stem)
        } else {
            "".to_string()
        }
    }

    /// Generates the filename path for the summary file
    pub fn path_summary(&self) -> String {
        if self.enabled {
            format!("{}/{}-summary.json", self.output_dir, self.filename_stem)
        } else {
            "".to_string()
        }
    }

    /// Generates the filename path for the state files
    pub fn path_state(&self, index: usize) -> String {
        if self.enabled {
            format!("{}/{}-{:0>20}.json", self.output_dir, self.filename_stem, index)
        } else {
            "".to_string()
        }
    }

    /// Generates the filename path for the VTU files
    pub fn path_vtu(&self, index: usize) -> String {
        if self.enabled {
            format!("{}/{}-{:0>20}.vtu", self.output_dir, self.filename_stem, index)
        } else {
            "".to_string()
        }
    }

    /// Generates the filename path for the PVD file
    pub fn path_pvd(&self) -> String {
        if self.enabled {
            format!("{}/{}.pvd", self.output_dir, self.filename_stem)
        } else {
            "".to_string()
        }
    }

    /// Reads the summary file and the mesh for post-processing
    ///
    /// # Input
    ///
    /// * `out_dir` -- the directory where the summary and associated files are located
    /// * `fn_stem` -- the filename stem
    pub fn read_summary(out_dir: &str, fn_stem: &str) -> Result<(FileIo, Mesh), StrError> {
        // load FileIo
        let full_path = format!("{}/{}-summary.json", out_dir, fn_stem);
        let mut file_io = FileIo::read_json(&full_path)?;

        // update output_dir because the files may have been moved
        file_io.output_dir = out_dir.to_string();

        // load the mesh
        let mesh = Mesh::read_json(&file_io.path_mesh())?;
        Ok((file_io, mesh))
    }

    /// Reads a JSON file with the state at a given index (time station)
    pub fn read_state(&self, index: usize) -> Result<FvState, StrError> {
        FvState::read_json(&self.path_state(index))
    }

    /// Reads a JSON file containing this struct
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
        let summary = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(summary)
    }

    /// Writes a JSON file with this struct
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

    /// Writes the current state to a file
    ///
    /// **Note:** No output is generated if the generation of files is disabled.
    pub(crate) fn write_state(&mut self, state: &FvState) -> Result<(), StrError> {
        if self.enabled {
            // save the state
            let path = self.path_state(self.output_count);
            state.write_json(&path)?;

            // update counters
            self.indices.push(self.output_count);
            self.times.push(state.t);
            self.output_count += 1;
        }
        Ok(())
    }

    /// Writes this struct to a file
    pub(crate) fn write_self(&self) -> Result<(), StrError> {
        if self.enabled {
            let path = self.path_summary();
            self.write_json(&path)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::FileIo;
    use crate::base::{Config, SampleMeshes, DEFAULT_OUT_DIR, DEFAULT_TEST_DIR};
    use crate::fluid::ImmiscibleFluidSystem;
    use crate::fv::{FvGrid, FvState};
    use crate::models::{RichardsModel, SoilData};
    use crate::problem::RichardsLensProblem;
    use russell_lab::Vector;

    #[test]
    fn new_works() {
        let file_io = FileIo::new();
        assert!(!file_io.enabled());
        assert_eq!(file_io.path_mesh(), "");
        assert_eq!(file_io.path_summary(), "");
        assert_eq!(file_io.path_state(0), "");
        assert_eq!(file_io.path_vtu(0), "");
        assert_eq!(file_io.path_pvd(), "");
        file_io.write_self().unwrap();
    }

    #[test]
    fn new_enabled_and_read_summary_work() {
        let fluid = ImmiscibleFluidSystem::water_gas();
        let problem = RichardsLensProblem::new(&fluid).unwrap();
        let mesh = problem.mesh(3, 2).unwrap();
        let grid = FvGrid::new(&mesh).unwrap();
        let config = Config::new();
        let soil = SoilData::new(&grid, &problem, &config).unwrap();
        let model = RichardsModel::new(&fluid, &soil, &config).unwrap();

        let file_io = FileIo::new_enabled(&mesh, &model, "test", None).unwrap();
        assert_eq!(file_io.path_mesh(), format!("{}/test-mesh.json", DEFAULT_OUT_DIR));
        assert_eq!(file_io.path_pvd(), format!("{}/test.pvd", DEFAULT_OUT_DIR));

        let mut file_io = FileIo::new_enabled(&mesh, &model, "file_io", Some(DEFAULT_TEST_DIR)).unwrap();
        assert_eq!(file_io.primary_variable_names, &["p_w"]);
        assert_eq!(
            file_io.path_state(123),
            format!("{}/file_io-00000000000000000123.json", DEFAULT_TEST_DIR)
        );
        let mut state = FvState::new(&grid, &model, &problem, 0.0).unwrap();
        file_io.write_state(&state).unwrap();
        state.t = 1.5;
        state.uu = Vector::filled(6, 1e5);
        file_io.write_state(&state).unwrap();
        file_io.write_self().unwrap();

        let (summary, mesh_read) = FileIo::read_summary(DEFAULT_TEST_DIR, "file_io").unwrap();
        assert_eq!(summary.indices, &[0, 1]);
        assert_eq!(summary.times, &[0.0, 1.5]);
        assert_eq!(mesh_read.cells.len(), 6);
        let read = summary.read_state(1).unwrap();
        assert_eq!(read.uu.as_data(), &[1e5; 6]);
        assert_eq!(
            FileIo::read_summary(DEFAULT_TEST_DIR, "__not_found__").err(),
            Some("cannot open file")
        );
    }
}
