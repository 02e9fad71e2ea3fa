use super::{FluidState, FluidSystem};
use crate::base::{ParamDensity, ParamPhase, GAS_CONSTANT, ZERO_CELSIUS};
use crate::StrError;

/// Implements a fluid system of immiscible phases
///
/// Each phase α is made of a single component α; thus, the number of components
/// equals the number of phases and phase 0 is the wetting phase.
#[derive(Clone, Debug)]
pub struct ImmiscibleFluidSystem {
    phases: Vec<ParamPhase>,
    names: Vec<&'static str>,
}

impl ImmiscibleFluidSystem {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `phases` -- parameters and names of the phases, ordered from the most wetting one
    pub fn new(phases: &[(&'static str, ParamPhase)]) -> Result<Self, StrError> {
        if phases.len() < 1 {
            return Err("at least one phase is required");
        }
        for (_, p) in phases {
            if p.molar_mass <= 0.0 {
                return Err("the molar mass must be > 0.0");
            }
            if p.viscosity <= 0.0 {
                return Err("the viscosity must be > 0.0");
            }
            if let ParamDensity::Constant { rho } = p.density {
                if rho <= 0.0 {
                    return Err("the density must be > 0.0");
                }
            }
        }
        Ok(ImmiscibleFluidSystem {
            phases: phases.iter().map(|(_, p)| *p).collect(),
            names: phases.iter().map(|(n, _)| *n).collect(),
        })
    }

    /// Returns a water and nitrogen (gas) system
    pub fn water_gas() -> Self {
        ImmiscibleFluidSystem {
            phases: vec![ParamPhase::sample_water(), ParamPhase::sample_nitrogen()],
            names: vec!["w", "n"],
        }
    }

    /// Returns a water and DNAPL system
    pub fn water_dnapl() -> Self {
        ImmiscibleFluidSystem {
            phases: vec![ParamPhase::sample_water(), ParamPhase::sample_dnapl()],
            names: vec!["w", "n"],
        }
    }

    /// Returns the density of a phase given the pressure and temperature
    pub fn phase_density(&self, phase: usize, pressure: f64, temperature: f64) -> f64 {
        let param = &self.phases[phase];
        match param.density {
            ParamDensity::Constant { rho } => rho,
            ParamDensity::Compressible { rho_ref, cc, p_ref } => rho_ref * (1.0 + cc * (pressure - p_ref)),
            ParamDensity::IdealGas => pressure * param.molar_mass / (GAS_CONSTANT * temperature),
        }
    }
}

impl FluidSystem for ImmiscibleFluidSystem {
    fn n_phase(&self) -> usize {
        self.phases.len()
    }

    fn n_component(&self) -> usize {
        self.phases.len()
    }

    fn phase_name(&self, phase: usize) -> &'static str {
        self.names[phase]
    }

    fn component_name(&self, comp: usize) -> &'static str {
        self.names[comp]
    }

    fn is_liquid(&self, phase: usize) -> bool {
        self.phases[phase].liquid
    }

    fn molar_mass(&self, comp: usize) -> f64 {
        self.phases[comp].molar_mass
    }

    fn density(&self, fs: &FluidState, phase: usize) -> f64 {
        self.phase_density(phase, fs.pressure[phase], fs.temperature)
    }

    fn molar_density(&self, fs: &FluidState, phase: usize) -> f64 {
        self.density(fs, phase) / self.phases[phase].molar_mass
    }

    fn viscosity(&self, _fs: &FluidState, phase: usize) -> f64 {
        self.phases[phase].viscosity
    }

    fn enthalpy(&self, fs: &FluidState, phase: usize) -> f64 {
        self.phases[phase].heat_capacity * (fs.temperature - ZERO_CELSIUS)
    }

    fn fugacity_coefficient(&self, _fs: &FluidState, phase: usize, comp: usize) -> f64 {
        // other components cannot dissolve in the phase
        if phase == comp {
            1.0
        } else {
            1e10
        }
    }

    fn diffusion_coefficient(&self, _fs: &FluidState, _phase: usize, _comp: usize) -> f64 {
        0.0
    }

    fn thermal_conductivity(&self, _fs: &FluidState, phase: usize) -> f64 {
        self.phases[phase].thermal_conductivity
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
