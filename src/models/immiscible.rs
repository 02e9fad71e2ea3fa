use super::{EnergyVolumeVariables, Model, PorousVolumeVariables, SoilData};
use crate::base::Config;
use crate::fluid::{FluidState, FluidSystem};
use crate::StrError;

/// Implements the multi-phase model of immiscible fluids
///
/// Each phase α is made of component α only; the balance equations are written in mass.
///
/// Primary variables: `p₀, S₁ … S_{M-1} [, T]`
pub struct ImmiscibleModel<'a> {
    fluid: &'a dyn FluidSystem,
    soil: &'a SoilData,
    energy: bool,
}

impl<'a> ImmiscibleModel<'a> {
    /// Allocates a new instance
    pub fn new(fluid: &'a dyn FluidSystem, soil: &'a SoilData, config: &Config) -> Result<Self, StrError> {
        if fluid.n_component() != fluid.n_phase() {
            return Err("the immiscible model requires one component per phase");
        }
        if config.enable_diffusion {
            return Err("diffusion is not available in the immiscible model");
        }
        if let Some(cell) = soil.cells.first() {
            cell.material.check_n_phase(fluid.n_phase())?;
        }
        Ok(ImmiscibleModel {
            fluid,
            soil,
            energy: config.enable_energy,
        })
    }

    /// Completes a fluid state given the pressure of phase 0 and the saturations
    fn complete(&self, cell: usize, fs: &mut FluidState, p0: f64) -> Result<(), StrError> {
        let n_phase = fs.n_phase();
        let mut pc = vec![0.0; n_phase];
        self.soil.cells[cell].material.capillary_pressures(&mut pc, fs)?;
        for alpha in 0..n_phase {
            fs.pressure[alpha] = p0 + pc[alpha];
        }
        fs.set_immiscible_composition();
        self.fluid.update_all(fs);
        Ok(())
    }
}

impl<'a> Model for ImmiscibleModel<'a> {
    type Vars = PorousVolumeVariables;

    fn n_equation(&self) -> usize {
        self.fluid.n_phase() + if self.energy { 1 } else { 0 }
    }

    fn n_component_equation(&self) -> usize {
        self.fluid.n_phase()
    }

    fn energy_enabled(&self) -> bool {
        self.energy
    }

    fn diffusion_enabled(&self) -> bool {
        false
    }

    fn conserved_in_moles(&self) -> bool {
        false
    }

    fn molar_mass(&self, comp: usize) -> f64 {
        self.fluid.molar_mass(comp)
    }

    fn primary_variable_names(&self) -> Vec<String> {
        let mut names = vec![format!("p_{}", self.fluid.phase_name(0))];
        for alpha in 1..self.fluid.n_phase() {
            names.push(format!("S_{}", self.fluid.phase_name(alpha)));
        }
        if self.energy {
            names.push("T".to_string());
        }
        names
    }

    fn equation_names(&self) -> Vec<String> {
        let mut names: Vec<_> = (0..self.fluid.n_phase())
            .map(|alpha| format!("mass_{}", self.fluid.phase_name(alpha)))
            .collect();
        if self.energy {
            names.push("energy".to_string());
        }
        names
    }

    fn primary_variables_from_fluid_state(&self, pvs: &mut [f64], fs: &FluidState) -> Result<(), StrError> {
        if pvs.len() != self.n_equation() {
            return Err("the array of primary variables must have n_equation entries");
        }
        if fs.n_phase() != self.fluid.n_phase() {
            return Err("the fluid state is incompatible with the fluid system");
        }
        pvs[0] = fs.pressure[0];
        for alpha in 1..fs.n_phase() {
            pvs[alpha] = fs.saturation[alpha];
        }
        if self.energy {
            pvs[fs.n_phase()] = fs.temperature;
        }
        Ok(())
    }

    fn volume_variables(&self, cell: usize, pvs: &[f64], _hint: Option<&Self::Vars>) -> Result<Self::Vars, StrError> {
        let soil = &self.soil.cells[cell];
        let n_phase = self.fluid.n_phase();
        let mut fs = self.fluid.new_fluid_state();
        fs.temperature = EnergyVolumeVariables::temperature(soil, pvs, self.energy)?;
        let mut s0 = 1.0;
        for alpha in 1..n_phase {
            fs.saturation[alpha] = pvs[alpha];
            s0 -= pvs[alpha];
        }
        fs.saturation[0] = s0;
        self.complete(cell, &mut fs, pvs[0])?;
        PorousVolumeVariables::new(fs, self.fluid, soil, false, false)
    }

    fn boundary_volume_variables(&self, cell: usize, fs: &FluidState) -> Result<Self::Vars, StrError> {
        if fs.n_phase() != self.fluid.n_phase() {
            return Err("the fluid state is incompatible with the fluid system");
        }
        let mut state = fs.clone();
        self.complete(cell, &mut state, fs.pressure[0])?;
        PorousVolumeVariables::new(state, self.fluid, &self.soil.cells[cell], false, false)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
