use super::{OutputModule, ScalarBuffers, VtkMultiWriter};
use crate::fluid::FluidSystem;
use crate::models::VolumeVariables;
use crate::StrError;
use serde::{Deserialize, Serialize};

/// Selects the quantities written by the energy output module
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct VtkEnergyFlags {
    /// Writes the temperature
    pub temperature: bool,

    /// Writes the specific enthalpy of each phase
    pub enthalpy: bool,

    /// Writes the specific internal energy of each phase
    pub internal_energy: bool,

    /// Writes the effective heat conductivity
    pub heat_conductivity: bool,

    /// Writes the volumetric heat capacity of the solid
    pub heat_capacity_solid: bool,
}

impl VtkEnergyFlags {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        VtkEnergyFlags {
            temperature: true,
            enthalpy: false,
            internal_energy: false,
            heat_conductivity: false,
            heat_capacity_solid: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Quantity {
    Temperature,
    Enthalpy(usize),
    InternalEnergy(usize),
    HeatConductivity,
    HeatCapacitySolid,
}

/// Writes the energy-related quantities
pub struct VtkEnergyModule {
    flags: VtkEnergyFlags,
    phase_names: Vec<&'static str>,
    buffers: ScalarBuffers<Quantity>,
}

impl VtkEnergyModule {
    /// Allocates a new instance
    pub fn new(fluid: &dyn FluidSystem, flags: VtkEnergyFlags) -> Self {
        VtkEnergyModule {
            flags,
            phase_names: (0..fluid.n_phase()).map(|alpha| fluid.phase_name(alpha)).collect(),
            buffers: ScalarBuffers::new(),
        }
    }
}

impl<V: VolumeVariables> OutputModule<V> for VtkEnergyModule {
    fn alloc_buffers(&mut self, n_cell: usize) {
        let f = &self.flags;
        let b = &mut self.buffers;
        b.clear();
        if f.temperature {
            b.add(Quantity::Temperature, "temperature".to_string(), n_cell);
        }
        for (alpha, name) in self.phase_names.iter().enumerate() {
            if f.enthalpy {
                b.add(Quantity::Enthalpy(alpha), format!("h_{}", name), n_cell);
            }
            if f.internal_energy {
                b.add(Quantity::InternalEnergy(alpha), format!("u_{}", name), n_cell);
            }
        }
        if f.heat_conductivity {
            b.add(Quantity::HeatConductivity, "lambda_eff".to_string(), n_cell);
        }
        if f.heat_capacity_solid {
            b.add(Quantity::HeatCapacitySolid, "c_s".to_string(), n_cell);
        }
    }

    fn process_cell(&mut self, cell: usize, vv: &V) -> Result<(), StrError> {
        let fs = vv.fluid_state();
        if fs.n_phase() != self.phase_names.len() {
            return Err("the number of phases of the volume variables is incorrect");
        }
        self.buffers.set(cell, |q| match q {
            Quantity::Temperature => fs.temperature,
            Quantity::Enthalpy(alpha) => fs.enthalpy[alpha],
            Quantity::InternalEnergy(alpha) => fs.internal_energy(alpha),
            Quantity::HeatConductivity => vv.heat_conductivity(),
            Quantity::HeatCapacitySolid => vv.heat_capacity_solid(),
        })
    }

    fn commit_buffers(&mut self, writer: &mut VtkMultiWriter) -> Result<(), StrError> {
        self.buffers.commit(writer)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
