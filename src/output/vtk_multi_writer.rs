use crate::StrError;
use gemlab::mesh::Mesh;
use std::ffi::OsStr;
use std::fmt::Write;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::Path;

/// Holds a named buffer of cell data
struct CellData {
    name: String,
    n_component: usize,
    values: Vec<f64>,
}

/// Collects cell data from several output modules and writes VTU files
///
/// The finite volumes are cell-centred; thus, all fields are written as cell data.
/// Vectors are padded with zeros to three components as required by ParaView.
pub struct VtkMultiWriter<'a> {
    mesh: &'a Mesh,
    data: Vec<CellData>,
}

impl<'a> VtkMultiWriter<'a> {
    /// Allocates a new instance
    pub fn new(mesh: &'a Mesh) -> Self {
        VtkMultiWriter { mesh, data: Vec::new() }
    }

    /// Returns the number of cells
    pub fn n_cell(&self) -> usize {
        self.mesh.cells.len()
    }

    /// Returns the names of the attached fields
    pub fn names(&self) -> Vec<&str> {
        self.data.iter().map(|d| d.name.as_str()).collect()
    }

    /// Attaches a scalar field (one value per cell)
    pub fn attach_scalar(&mut self, name: &str, values: Vec<f64>) -> Result<(), StrError> {
        if values.len() != self.n_cell() {
            return Err("the number of values must equal the number of cells");
        }
        self.data.push(CellData {
            name: name.to_string(),
            n_component: 1,
            values,
        });
        Ok(())
    }

    /// Attaches a vector field (`n_component` values per cell, stored contiguously)
    pub fn attach_vector(&mut self, name: &str, n_component: usize, values: Vec<f64>) -> Result<(), StrError> {
        if n_component < 1 || n_component > 3 {
            return Err("the number of components of a vector must be 1, 2, or 3");
        }
        if values.len() != self.n_cell() * n_component {
            return Err("the number of values must equal the number of cells times the number of components");
        }
        self.data.push(CellData {
            name: name.to_string(),
            n_component,
            values,
        });
        Ok(())
    }

    /// Removes all attached fields
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Writes the VTU file with the mesh and all attached fields
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_vtu<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let mesh = self.mesh;
        let ndim = mesh.ndim;
        let npoint = mesh.points.len();
        let ncell = mesh.cells.len();
        if ncell < 1 {
            return Err("there are no cells to write");
        }

        // output buffer
        let mut buffer = String::new();

        // header
        write!(
            &mut buffer,
            "<?xml version=\"1.0\"?>\n\
             <VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">\n\
             <UnstructuredGrid>\n\
             <Piece NumberOfPoints=\"{}\" NumberOfCells=\"{}\">\n",
            npoint, ncell
        )
        .unwrap();

        // nodes: coordinates
        write!(
            &mut buffer,
            "<Points>\n\
             <DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">\n",
        )
        .unwrap();
        for point in &mesh.points {
            for dim in 0..ndim {
                write!(&mut buffer, "{:?} ", point.coords[dim]).unwrap();
            }
            if ndim == 2 {
                write!(&mut buffer, "0.0 ").unwrap();
            }
        }
        write!(
            &mut buffer,
            "\n</DataArray>\n\
             </Points>\n"
        )
        .unwrap();

        // cells: connectivity
        write!(
            &mut buffer,
            "<Cells>\n\
             <DataArray type=\"Int32\" Name=\"connectivity\" format=\"ascii\">\n"
        )
        .unwrap();
        for cell in &mesh.cells {
            if cell.kind.vtk_type().is_none() {
                return Err("cannot generate VTU file because VTK cell type is not available");
            }
            for p in &cell.points {
                write!(&mut buffer, "{} ", p).unwrap();
            }
        }

        // cells: offsets
        write!(
            &mut buffer,
            "\n</DataArray>\n\
             <DataArray type=\"Int32\" Name=\"offsets\" format=\"ascii\">\n"
        )
        .unwrap();
        let mut offset = 0;
        for cell in &mesh.cells {
            offset += cell.points.len();
            write!(&mut buffer, "{} ", offset).unwrap();
        }

        // cells: types
        write!(
            &mut buffer,
            "\n</DataArray>\n\
             <DataArray type=\"UInt8\" Name=\"types\" format=\"ascii\">\n"
        )
        .unwrap();
        for cell in &mesh.cells {
            if let Some(vtk) = cell.kind.vtk_type() {
                write!(&mut buffer, "{} ", vtk).unwrap();
            }
        }
        write!(
            &mut buffer,
            "\n</DataArray>\n\
             </Cells>\n"
        )
        .unwrap();

        // data: cells
        write!(&mut buffer, "<CellData Scalars=\"TheScalars\">\n").unwrap();
        for d in &self.data {
            let n_component = if d.n_component == 1 { 1 } else { 3 };
            write!(
                &mut buffer,
                "<DataArray type=\"Float64\" Name=\"{}\" NumberOfComponents=\"{}\" format=\"ascii\">\n",
                d.name, n_component
            )
            .unwrap();
            for c in 0..ncell {
                for i in 0..d.n_component {
                    write!(&mut buffer, "{:?} ", d.values[c * d.n_component + i]).unwrap();
                }
                for _ in d.n_component..n_component {
                    write!(&mut buffer, "0.0 ").unwrap();
                }
            }
            write!(&mut buffer, "\n</DataArray>\n").unwrap();
        }
        write!(&mut buffer, "</CellData>\n").unwrap();

        // footer
        write!(
            &mut buffer,
            "</Piece>\n\
             </UnstructuredGrid>\n\
             </VTKFile>\n"
        )
        .unwrap();

        // write file
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create VTU file")?;
        file.write_all(buffer.as_bytes()).map_err(|_| "cannot write VTU file")?;
        Ok(())
    }
}

/// Writes a PVD file collecting VTU files at several time stations
///
/// # Input
///
/// * `full_path` -- may be a String, &str, or Path
/// * `entries` -- pairs of time and VTU filename
pub fn write_pvd<P>(full_path: &P, entries: &[(f64, String)]) -> Result<(), StrError>
where
    P: AsRef<OsStr> + ?Sized,
{
    // header
    let mut buffer = String::new();
    write!(&mut buffer, "<?xml version=\"1.0\"?>\n<VTKFile type=\"Collection\" version=\"0.1\" byte_order=\"LittleEndian\">\n<Collection>\n").unwrap();

    // add VTU entries to PVD file
    for (time, vtu_fn) in entries {
        write!(&mut buffer, "<DataSet timestep=\"{:?}\" file=\"{}\" />\n", time, vtu_fn).unwrap();
    }

    // footer
    write!(&mut buffer, "</Collection>\n</VTKFile>\n").unwrap();

    // write file
    let path = Path::new(full_path).to_path_buf();
    if let Some(p) = path.parent() {
        fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
    }
    let mut file = File::create(&path).map_err(|_| "cannot create PVD file")?;
    file.write_all(buffer.as_bytes()).map_err(|_| "cannot write PVD file")?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
