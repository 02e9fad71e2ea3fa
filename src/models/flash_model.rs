use super::{EnergyVolumeVariables, Model, PorousVolumeVariables, SoilData};
use crate::base::Config;
use crate::flash::NcpFlash;
use crate::fluid::{FluidState, FluidSystem};
use crate::StrError;

/// Implements the compositional model based on the NCP flash
///
/// The primary variables are the total molar concentrations of each component
/// (moles per unit volume of pore space); the phase distribution is computed by the flash.
/// The balance equations are written in moles.
///
/// Primary variables: `c_tot⁰ … c_totᴺ⁻¹ [, T]`
pub struct FlashModel<'a> {
    fluid: &'a dyn FluidSystem,
    soil: &'a SoilData,
    energy: bool,
    diffusion: bool,
    flash_tolerance: f64,
    flash_max_iterations: usize,
}

impl<'a> FlashModel<'a> {
    /// Allocates a new instance
    pub fn new(fluid: &'a dyn FluidSystem, soil: &'a SoilData, config: &Config) -> Result<Self, StrError> {
        if let Some(cell) = soil.cells.first() {
            cell.material.check_n_phase(fluid.n_phase())?;
        }
        Ok(FlashModel {
            fluid,
            soil,
            energy: config.enable_energy,
            diffusion: config.enable_diffusion,
            flash_tolerance: config.flash_tolerance(),
            flash_max_iterations: config.flash_max_iterations,
        })
    }

    /// Returns the tolerance used by the flash
    pub fn flash_tolerance(&self) -> f64 {
        self.flash_tolerance
    }
}

impl<'a> Model for FlashModel<'a> {
    type Vars = PorousVolumeVariables;

    fn n_equation(&self) -> usize {
        self.fluid.n_component() + if self.energy { 1 } else { 0 }
    }

    fn n_component_equation(&self) -> usize {
        self.fluid.n_component()
    }

    fn energy_enabled(&self) -> bool {
        self.energy
    }

    fn diffusion_enabled(&self) -> bool {
        self.diffusion
    }

    fn conserved_in_moles(&self) -> bool {
        true
    }

    fn molar_mass(&self, comp: usize) -> f64 {
        self.fluid.molar_mass(comp)
    }

    fn primary_variable_names(&self) -> Vec<String> {
        let mut names: Vec<_> = (0..self.fluid.n_component())
            .map(|kappa| format!("c_tot_{}", self.fluid.component_name(kappa)))
            .collect();
        if self.energy {
            names.push("T".to_string());
        }
        names
    }

    fn equation_names(&self) -> Vec<String> {
        let mut names: Vec<_> = (0..self.fluid.n_component())
            .map(|kappa| format!("moles_{}", self.fluid.component_name(kappa)))
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
        if fs.n_phase() != self.fluid.n_phase() || fs.n_component() != self.fluid.n_component() {
            return Err("the fluid state is incompatible with the fluid system");
        }
        let mut state = fs.clone();
        self.fluid.update_densities_and_fugacities(&mut state);
        let n_comp = state.n_component();
        for kappa in 0..n_comp {
            pvs[kappa] = 0.0;
            for alpha in 0..state.n_phase() {
                pvs[kappa] += state.saturation[alpha] * state.molarity(alpha, kappa);
            }
        }
        if self.energy {
            pvs[n_comp] = state.temperature;
        }
        Ok(())
    }

    fn volume_variables(&self, cell: usize, pvs: &[f64], hint: Option<&Self::Vars>) -> Result<Self::Vars, StrError> {
        let soil = &self.soil.cells[cell];
        let n_comp = self.fluid.n_component();
        let temperature = EnergyVolumeVariables::temperature(soil, pvs, self.energy)?;
        let mut fs = self.fluid.new_fluid_state();
        match hint {
            Some(h) => {
                fs.assign(&h.fluid_state)?;
                fs.temperature = temperature;
                self.fluid.update_densities_and_fugacities(&mut fs);
            }
            None => {
                fs.temperature = temperature;
                NcpFlash::guess_initial(&mut fs, self.fluid, &pvs[0..n_comp])?;
            }
        }
        NcpFlash::solve(
            &mut fs,
            self.fluid,
            &soil.material,
            &pvs[0..n_comp],
            self.flash_tolerance,
            self.flash_max_iterations,
        )?;
        PorousVolumeVariables::new(fs, self.fluid, soil, true, self.diffusion)
    }

    fn boundary_volume_variables(&self, cell: usize, fs: &FluidState) -> Result<Self::Vars, StrError> {
        if fs.n_phase() != self.fluid.n_phase() || fs.n_component() != self.fluid.n_component() {
            return Err("the fluid state is incompatible with the fluid system");
        }
        let mut state = fs.clone();
        self.fluid.update_all(&mut state);
        PorousVolumeVariables::new(state, self.fluid, &self.soil.cells[cell], true, self.diffusion)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
