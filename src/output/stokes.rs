use super::{OutputModule, ScalarBuffers, VtkMultiWriter};
use crate::models::Stokes2cniVolumeVariables;
use crate::StrError;
use serde::{Deserialize, Serialize};

/// Reference pressure subtracted from the gas pressure in the `delP` field (Pa)
const P_REF: f64 = 1e5;

/// Selects the quantities written by the free-flow output module
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct VtkStokesFlags {
    /// Writes the gas pressure (`pg`) and its deviation from 1e5 Pa (`delP`)
    pub pressure: bool,

    /// Writes the mass fraction of water vapour in the gas
    pub mass_fraction: bool,

    /// Writes the temperature
    pub temperature: bool,

    /// Writes the gas density
    pub density: bool,

    /// Writes the gas viscosity
    pub viscosity: bool,

    /// Writes the specific enthalpy of the gas
    pub enthalpy: bool,

    /// Writes the velocity vector
    pub velocity: bool,
}

impl VtkStokesFlags {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        VtkStokesFlags {
            pressure: true,
            mass_fraction: true,
            temperature: true,
            density: true,
            viscosity: true,
            enthalpy: true,
            velocity: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Quantity {
    Pressure,
    DeltaPressure,
    MassFraction,
    Temperature,
    Density,
    Viscosity,
    Enthalpy,
}

/// Writes the quantities of the non-isothermal two-component free flow
pub struct VtkStokesModule {
    flags: VtkStokesFlags,
    ndim: usize,
    buffers: ScalarBuffers<Quantity>,
    velocity: Vec<f64>,
}

impl VtkStokesModule {
    /// Allocates a new instance
    pub fn new(ndim: usize, flags: VtkStokesFlags) -> Self {
        VtkStokesModule {
            flags,
            ndim,
            buffers: ScalarBuffers::new(),
            velocity: Vec::new(),
        }
    }
}

impl OutputModule<Stokes2cniVolumeVariables> for VtkStokesModule {
    fn alloc_buffers(&mut self, n_cell: usize) {
        let f = &self.flags;
        let b = &mut self.buffers;
        b.clear();
        if f.pressure {
            b.add(Quantity::Pressure, "pg".to_string(), n_cell);
            b.add(Quantity::DeltaPressure, "delP".to_string(), n_cell);
        }
        if f.mass_fraction {
            b.add(Quantity::MassFraction, "X_gH2O".to_string(), n_cell);
        }
        if f.temperature {
            b.add(Quantity::Temperature, "temperature".to_string(), n_cell);
        }
        if f.density {
            b.add(Quantity::Density, "rhoG".to_string(), n_cell);
        }
        if f.viscosity {
            b.add(Quantity::Viscosity, "mu".to_string(), n_cell);
        }
        if f.enthalpy {
            b.add(Quantity::Enthalpy, "h".to_string(), n_cell);
        }
        self.velocity = if f.velocity {
            vec![0.0; n_cell * self.ndim]
        } else {
            Vec::new()
        };
    }

    fn process_cell(&mut self, cell: usize, vv: &Stokes2cniVolumeVariables) -> Result<(), StrError> {
        if self.flags.velocity {
            if vv.velocity.len() != self.ndim {
                return Err("the velocity vector must have ndim components");
            }
            if (cell + 1) * self.ndim > self.velocity.len() {
                return Err("the cell index is out of bounds (buffers must be allocated first)");
            }
            for i in 0..self.ndim {
                self.velocity[cell * self.ndim + i] = vv.velocity[i];
            }
        }
        self.buffers.set(cell, |q| match q {
            Quantity::Pressure => vv.pressure(),
            Quantity::DeltaPressure => vv.pressure() - P_REF,
            Quantity::MassFraction => vv.mass_fraction_h2o(),
            Quantity::Temperature => vv.temperature(),
            Quantity::Density => vv.density(),
            Quantity::Viscosity => vv.viscosity(),
            Quantity::Enthalpy => vv.enthalpy(),
        })
    }

    fn commit_buffers(&mut self, writer: &mut VtkMultiWriter) -> Result<(), StrError> {
        self.buffers.commit(writer)?;
        if self.flags.velocity {
            writer.attach_vector("v", self.ndim, std::mem::take(&mut self.velocity))?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{VtkStokesFlags, VtkStokesModule};
    use crate::base::{SampleMeshes, DEFAULT_TEST_DIR};
    use crate::fluid::H2oN2FluidSystem;
    use crate::models::Stokes2cniVolumeVariables;
    use crate::output::{OutputModule, VtkMultiWriter, VtkOutput};
    use std::fs;

    #[test]
    fn process_cell_captures_errors() {
        let fluid = H2oN2FluidSystem::new();
        let vv = Stokes2cniVolumeVariables::new(&fluid, 3, &[0.0, 0.0, 0.0, 1e5, 0.01, 293.15]).unwrap();
        let mut module = VtkStokesModule::new(2, VtkStokesFlags::new());
        module.alloc_buffers(1);
        assert_eq!(
            module.process_cell(0, &vv).err(),
            Some("the velocity vector must have ndim components")
        );
        let vv = Stokes2cniVolumeVariables::new(&fluid, 2, &[0.0, 0.0, 1e5, 0.01, 293.15]).unwrap();
        assert_eq!(
            module.process_cell(1, &vv).err(),
            Some("the cell index is out of bounds (buffers must be allocated first)")
        );
    }

    #[test]
    fn stokes_works() {
        let fluid = H2oN2FluidSystem::new();
        let mesh = SampleMeshes::two_qua4();
        let vars = vec![
            Stokes2cniVolumeVariables::new(&fluid, 2, &[1.0, 2.0, 1.5e5, 0.01, 293.15]).unwrap(),
            Stokes2cniVolumeVariables::new(&fluid, 2, &[3.0, 4.0, 1e5, 0.02, 300.0]).unwrap(),
        ];

        let mut module = VtkStokesModule::new(2, VtkStokesFlags::new());
        module.alloc_buffers(2);
        for (cell, vv) in vars.iter().enumerate() {
            module.process_cell(cell, vv).unwrap();
        }
        let mut writer = VtkMultiWriter::new(&mesh);
        module.commit_buffers(&mut writer).unwrap();
        assert_eq!(
            writer.names(),
            &["pg", "delP", "X_gH2O", "temperature", "rhoG", "mu", "h", "v"]
        );

        let mut output = VtkOutput::new(&mesh, "output_stokes_works", Some(DEFAULT_TEST_DIR)).unwrap();
        output.add_module(Box::new(VtkStokesModule::new(2, VtkStokesFlags::new())));
        output.write(0.0, &vars).unwrap();
        let contents = fs::read_to_string(&output.path_vtu(0)).map_err(|_| "cannot open file").unwrap();
        assert!(contents.contains("Name=\"delP\" NumberOfComponents=\"1\" format=\"ascii\">\n50000.0 0.0 \n"));
        assert!(contents.contains("Name=\"v\" NumberOfComponents=\"3\" format=\"ascii\">\n1.0 2.0 0.0 3.0 4.0 0.0 \n"));
    }
}
