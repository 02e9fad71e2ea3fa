use super::{write_pvd, VtkMultiWriter};
use crate::base::DEFAULT_OUT_DIR;
use crate::StrError;
use gemlab::mesh::Mesh;
use std::fs;

/// Defines a post-processing module that converts volume variables into output fields
///
/// A module allocates buffers only for the enabled quantities, fills them cell by cell,
/// and finally hands them over to the writer.
pub trait OutputModule<V> {
    /// Allocates the buffers of the enabled quantities
    fn alloc_buffers(&mut self, n_cell: usize);

    /// Stores the quantities of a control volume into the buffers
    fn process_cell(&mut self, cell: usize, vv: &V) -> Result<(), StrError>;

    /// Moves the buffers into the writer
    fn commit_buffers(&mut self, writer: &mut VtkMultiWriter) -> Result<(), StrError>;
}

/// Holds the scalar buffers of the enabled quantities of an output module
///
/// Each buffer is tagged with the quantity `Q` it stores and the name of the field.
pub(crate) struct ScalarBuffers<Q> {
    items: Vec<(Q, String, Vec<f64>)>,
}

impl<Q: Copy> ScalarBuffers<Q> {
    /// Allocates a new (empty) instance
    pub(crate) fn new() -> Self {
        ScalarBuffers { items: Vec::new() }
    }

    /// Removes all buffers
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    /// Adds a buffer
    pub(crate) fn add(&mut self, quantity: Q, name: String, n_cell: usize) {
        self.items.push((quantity, name, vec![0.0; n_cell]));
    }

    /// Returns the number of buffers
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Sets the values of a cell in all buffers
    pub(crate) fn set<F>(&mut self, cell: usize, value: F) -> Result<(), StrError>
    where
        F: Fn(Q) -> f64,
    {
        for (quantity, _, buffer) in self.items.iter_mut() {
            if cell >= buffer.len() {
                return Err("the cell index is out of bounds (buffers must be allocated first)");
            }
            buffer[cell] = value(*quantity);
        }
        Ok(())
    }

    /// Moves all buffers into the writer
    pub(crate) fn commit(&mut self, writer: &mut VtkMultiWriter) -> Result<(), StrError> {
        for (_, name, buffer) in self.items.drain(..) {
            writer.attach_scalar(&name, buffer)?;
        }
        Ok(())
    }
}

/// Drives a collection of output modules and writes a series of VTU files and the PVD file
///
/// The files are named `{stem}-vars-{index}.vtu` and `{stem}-vars.pvd`.
pub struct VtkOutput<'a, V> {
    mesh: &'a Mesh,
    modules: Vec<Box<dyn OutputModule<V> + 'a>>,
    output_dir: String,
    filename_stem: String,

    /// Holds the simulation times corresponding to each VTU file
    pub times: Vec<f64>,
}

impl<'a, V> VtkOutput<'a, V> {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `mesh` -- the mesh
    /// * `filename_stem` -- the last part of the filename without extension, e.g., "my_simulation"
    /// * `output_directory` -- the directory to save the output files.
    ///   None means that the default directory will be used; see [DEFAULT_OUT_DIR]
    pub fn new(mesh: &'a Mesh, filename_stem: &str, output_directory: Option<&str>) -> Result<Self, StrError> {
        let out_dir = match output_directory {
            Some(d) => d,
            None => DEFAULT_OUT_DIR,
        };
        fs::create_dir_all(out_dir).map_err(|_| "cannot create output directory")?;
        Ok(VtkOutput {
            mesh,
            modules: Vec::new(),
            output_dir: out_dir.to_string(),
            filename_stem: filename_stem.to_string(),
            times: Vec::new(),
        })
    }

    /// Adds an output module
    pub fn add_module(&mut self, module: Box<dyn OutputModule<V> + 'a>) -> &mut Self {
        self.modules.push(module);
        self
    }

    /// Returns the number of modules
    pub fn n_module(&self) -> usize {
        self.modules.len()
    }

    /// Generates the filename path for the VTU files
    pub fn path_vtu(&self, index: usize) -> String {
        format!("{}/{}-vars-{:0>20}.vtu", self.output_dir, self.filename_stem, index)
    }

    /// Generates the filename path for the PVD file
    pub fn path_pvd(&self) -> String {
        format!("{}/{}-vars.pvd", self.output_dir, self.filename_stem)
    }

    /// Writes the fields of all modules at time t
    ///
    /// The PVD file is rewritten after each VTU file; thus, it is always complete.
    pub fn write(&mut self, t: f64, vars: &[V]) -> Result<(), StrError> {
        let n_cell = self.mesh.cells.len();
        if vars.len() != n_cell {
            return Err("the number of volume variables must equal the number of cells");
        }
        let mut writer = VtkMultiWriter::new(self.mesh);
        for module in self.modules.iter_mut() {
            module.alloc_buffers(n_cell);
            for (cell, vv) in vars.iter().enumerate() {
                module.process_cell(cell, vv)?;
            }
            module.commit_buffers(&mut writer)?;
        }
        let index = self.times.len();
        writer.write_vtu(&self.path_vtu(index))?;
        self.times.push(t);
        let entries: Vec<_> = self
            .times
            .iter()
            .enumerate()
            .map(|(i, time)| (*time, self.path_vtu(i)))
            .collect();
        write_pvd(&self.path_pvd(), &entries)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{OutputModule, VtkOutput};
    use crate::base::{SampleMeshes, DEFAULT_TEST_DIR};
    use crate::output::VtkMultiWriter;
    use crate::StrError;
    use std::fs;

    struct Doubler {
        buffer: Vec<f64>,
    }

    impl OutputModule<f64> for Doubler {
        fn alloc_buffers(&mut self, n_cell: usize) {
            self.buffer = vec![0.0; n_cell];
        }
        fn process_cell(&mut self, cell: usize, vv: &f64) -> Result<(), StrError> {
            self.buffer[cell] = 2.0 * vv;
            Ok(())
        }
        fn commit_buffers(&mut self, writer: &mut VtkMultiWriter) -> Result<(), StrError> {
            writer.attach_scalar("double", std::mem::take(&mut self.buffer))
        }
    }

    #[test]
    fn write_works() {
        let mesh = SampleMeshes::two_qua4();
        let mut output = VtkOutput::new(&mesh, "vtk_output_works", Some(DEFAULT_TEST_DIR)).unwrap();
        output.add_module(Box::new(Doubler { buffer: Vec::new() }));
        assert_eq!(output.n_module(), 1);
        assert_eq!(
            output.write(0.0, &[1.0]).err(),
            Some("the number of volume variables must equal the number of cells")
        );
        output.write(0.0, &[1.0, 2.0]).unwrap();
        output.write(0.5, &[3.0, 4.0]).unwrap();
        assert_eq!(output.times, &[0.0, 0.5]);

        let vtu = fs::read_to_string(&output.path_vtu(1)).map_err(|_| "cannot open file").unwrap();
        assert!(vtu.contains("Name=\"double\" NumberOfComponents=\"1\" format=\"ascii\">\n6.0 8.0 \n"));
        let pvd = fs::read_to_string(&output.path_pvd()).map_err(|_| "cannot open file").unwrap();
        assert!(pvd.contains("timestep=\"0.5\""));
        assert!(pvd.contains("vtk_output_works-vars-00000000000000000001.vtu"));
    }
}
