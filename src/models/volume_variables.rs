use super::SoilCell;
use crate::fluid::{FluidState, FluidSystem};
use crate::StrError;
use russell_lab::Matrix;

/// Defines the closure relations of a control volume
///
/// The volume variables are computed from the primary variables at every iteration.
/// The conserved quantities are either moles or mass, depending on the model.
pub trait VolumeVariables {
    /// Returns the fluid state
    fn fluid_state(&self) -> &FluidState;

    /// Returns the porosity
    fn porosity(&self) -> f64;

    /// Returns the intrinsic permeability tensor (m²)
    fn intrinsic_permeability(&self) -> &Matrix;

    /// Returns the relative permeability of a phase
    fn relative_permeability(&self, phase: usize) -> f64;

    /// Indicates whether the balance equations are written in moles (otherwise in mass)
    fn conserved_in_moles(&self) -> bool;

    /// Returns the volumetric heat capacity of the solid (J/(m³ K))
    fn heat_capacity_solid(&self) -> f64;

    /// Returns the effective heat conductivity of the fluid-filled medium (W/(m K))
    fn heat_conductivity(&self) -> f64;

    /// Returns the effective diffusion coefficient of a component in a phase (m²/s)
    fn effective_diffusion(&self, phase: usize, comp: usize) -> f64;

    /// Returns the longitudinal dispersivity (m)
    fn dispersivity(&self) -> Option<f64>;

    /// Returns the mobility of a phase
    ///
    /// ```text
    /// λα = krα / μα
    /// ```
    fn mobility(&self, phase: usize) -> f64 {
        let mu = self.fluid_state().viscosity[phase];
        if mu > 0.0 {
            self.relative_permeability(phase) / mu
        } else {
            0.0
        }
    }

    /// Returns the molar or mass density of a phase (consistent with the balance equations)
    fn equation_density(&self, phase: usize) -> f64 {
        let fs = self.fluid_state();
        if self.conserved_in_moles() {
            fs.molar_density[phase]
        } else {
            fs.density[phase]
        }
    }

    /// Returns the mole or mass fraction of a component in a phase (consistent with the balance equations)
    fn equation_fraction(&self, phase: usize, comp: usize) -> f64 {
        let fs = self.fluid_state();
        if self.conserved_in_moles() {
            fs.mole_fraction[phase][comp]
        } else {
            fs.mass_fraction(phase, comp)
        }
    }

    /// Returns the amount of a component per unit volume of a phase (mol/m³ or kg/m³)
    fn component_density(&self, phase: usize, comp: usize) -> f64 {
        self.equation_density(phase) * self.equation_fraction(phase, comp)
    }
}

/// Holds the energy-related volume variables
#[derive(Clone, Debug)]
pub struct EnergyVolumeVariables {
    /// Temperature (K)
    pub temperature: f64,

    /// Volumetric heat capacity of the solid (J/(m³ K))
    pub heat_capacity_solid: f64,

    /// Effective heat conductivity (W/(m K))
    pub heat_conductivity: f64,
}

impl EnergyVolumeVariables {
    /// Returns the temperature of a control volume
    ///
    /// With energy, the temperature is the last primary variable; otherwise, it is given by the problem.
    pub fn temperature(soil: &SoilCell, pvs: &[f64], with_energy: bool) -> Result<f64, StrError> {
        let temperature = if with_energy {
            match pvs.last() {
                Some(t) => *t,
                None => return Err("the temperature must be the last primary variable"),
            }
        } else {
            match soil.temperature {
                Some(t) => t,
                None => return Err("the temperature of the isothermal problem is not available"),
            }
        };
        if !(temperature > 0.0) {
            return Err("the temperature must be positive");
        }
        Ok(temperature)
    }

    /// Allocates a new instance
    pub fn new(soil: &SoilCell, fs: &FluidState) -> Self {
        let heat_conductivity = match &soil.heat_conduction {
            Some(law) => law.conductivity(fs.saturation[0]),
            None => 0.0,
        };
        EnergyVolumeVariables {
            temperature: fs.temperature,
            heat_capacity_solid: soil.heat_capacity_solid,
            heat_conductivity,
        }
    }
}

/// Holds the diffusion-related volume variables
#[derive(Clone, Debug)]
pub struct DiffusionVolumeVariables {
    /// Tortuosity of each phase
    pub tortuosity: Vec<f64>,

    /// Binary diffusion coefficients (n_phase × n_component) (m²/s)
    pub coefficient: Vec<Vec<f64>>,

    /// Effective diffusion coefficients `φ S τ D` (n_phase × n_component) (m²/s)
    pub effective: Vec<Vec<f64>>,
}

impl DiffusionVolumeVariables {
    /// Allocates a new instance
    ///
    /// Without a given tortuosity, the Millington-Quirk relation is used:
    ///
    /// ```text
    ///     (φ S)^(7/3)
    /// τ = ———————————
    ///         φ²
    /// ```
    pub fn new<F>(fluid: &F, fs: &FluidState, porosity: f64, tortuosity: Option<f64>) -> Self
    where
        F: FluidSystem + ?Sized,
    {
        let n_phase = fs.n_phase();
        let n_comp = fs.n_component();
        let mut tau = vec![0.0; n_phase];
        let mut coefficient = vec![vec![0.0; n_comp]; n_phase];
        let mut effective = vec![vec![0.0; n_comp]; n_phase];
        for alpha in 0..n_phase {
            let s = f64::max(fs.saturation[alpha], 0.0);
            tau[alpha] = match tortuosity {
                Some(t) => t,
                None => f64::powf(porosity * s, 7.0 / 3.0) / (porosity * porosity),
            };
            for kappa in 0..n_comp {
                coefficient[alpha][kappa] = fluid.diffusion_coefficient(fs, alpha, kappa);
                effective[alpha][kappa] = porosity * s * tau[alpha] * coefficient[alpha][kappa];
            }
        }
        DiffusionVolumeVariables {
            tortuosity: tau,
            coefficient,
            effective,
        }
    }
}

/// Holds the volume variables of a porous medium filled with fluids
#[derive(Clone, Debug)]
pub struct PorousVolumeVariables {
    /// Fluid state
    pub fluid_state: FluidState,

    /// Porosity
    pub porosity: f64,

    /// Intrinsic permeability tensor (m²)
    pub permeability: Matrix,

    /// Relative permeability of each phase
    pub relative_permeability: Vec<f64>,

    /// Indicates whether the conserved quantities are moles
    pub molar: bool,

    /// Energy-related quantities
    pub energy: EnergyVolumeVariables,

    /// Diffusion-related quantities; None if diffusion is disabled
    pub diffusion: Option<DiffusionVolumeVariables>,

    /// Longitudinal dispersivity (m)
    pub dispersivity: Option<f64>,
}

impl PorousVolumeVariables {
    /// Allocates a new instance given a fluid state with all properties already updated
    pub fn new<F>(
        fluid_state: FluidState,
        fluid: &F,
        soil: &SoilCell,
        molar: bool,
        with_diffusion: bool,
    ) -> Result<Self, StrError>
    where
        F: FluidSystem + ?Sized,
    {
        let mut relative_permeability = vec![0.0; fluid_state.n_phase()];
        soil.material
            .relative_permeabilities(&mut relative_permeability, &fluid_state)?;
        let energy = EnergyVolumeVariables::new(soil, &fluid_state);
        let diffusion = if with_diffusion {
            Some(DiffusionVolumeVariables::new(
                fluid,
                &fluid_state,
                soil.porosity,
                soil.tortuosity,
            ))
        } else {
            None
        };
        Ok(PorousVolumeVariables {
            fluid_state,
            porosity: soil.porosity,
            permeability: soil.permeability.clone(),
            relative_permeability,
            molar,
            energy,
            diffusion,
            dispersivity: soil.dispersivity,
        })
    }
}

impl VolumeVariables for PorousVolumeVariables {
    fn fluid_state(&self) -> &FluidState {
        &self.fluid_state
    }
    fn porosity(&self) -> f64 {
        self.porosity
    }
    fn intrinsic_permeability(&self) -> &Matrix {
        &self.permeability
    }
    fn relative_permeability(&self, phase: usize) -> f64 {
        self.relative_permeability[phase]
    }
    fn conserved_in_moles(&self) -> bool {
        self.molar
    }
    fn heat_capacity_solid(&self) -> f64 {
        self.energy.heat_capacity_solid
    }
    fn heat_conductivity(&self) -> f64 {
        self.energy.heat_conductivity
    }
    fn effective_diffusion(&self, phase: usize, comp: usize) -> f64 {
        match &self.diffusion {
            Some(d) => d.effective[phase][comp],
            None => 0.0,
        }
    }
    fn dispersivity(&self) -> Option<f64> {
        self.dispersivity
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{DiffusionVolumeVariables, EnergyVolumeVariables, PorousVolumeVariables, VolumeVariables};
    use crate::base::{ParamHeatConduction, ParamMaterialLaw};
    use crate::fluid::{FluidSystem, H2oN2FluidSystem};
    use crate::material::{HeatConductionLaw, MaterialLaw};
    use crate::models::SoilCell;
    use crate::problem::to_dim_matrix;
    use russell_lab::approx_eq;

    fn soil_cell() -> SoilCell {
        SoilCell {
            porosity: 0.3,
            permeability: to_dim_matrix(2, 1e-12),
            material: MaterialLaw::new(&ParamMaterialLaw::Null).unwrap(),
            heat_capacity_solid: 2e6,
            heat_conduction: Some(HeatConductionLaw::new(&ParamHeatConduction::Somerton {
                lambda_dry: 0.5,
                lambda_sat: 2.5,
            })
            .unwrap()),
            tortuosity: None,
            dispersivity: Some(0.5),
            temperature: Some(283.15),
        }
    }

    #[test]
    fn temperature_works() {
        let mut soil = soil_cell();
        assert_eq!(EnergyVolumeVariables::temperature(&soil, &[1e5, 300.0], true), Ok(300.0));
        assert_eq!(EnergyVolumeVariables::temperature(&soil, &[1e5, 300.0], false), Ok(283.15));
        assert_eq!(
            EnergyVolumeVariables::temperature(&soil, &[1e5, -1.0], true).err(),
            Some("the temperature must be positive")
        );
        soil.temperature = None;
        assert_eq!(
            EnergyVolumeVariables::temperature(&soil, &[1e5], false).err(),
            Some("the temperature of the isothermal problem is not available")
        );
    }

    #[test]
    fn porous_volume_variables_work() {
        let fluid = H2oN2FluidSystem::new();
        let soil = soil_cell();
        let mut fs = fluid.new_fluid_state();
        fs.temperature = 283.15;
        fs.pressure = vec![1e5, 1e5];
        fs.saturation = vec![0.25, 0.75];
        fs.mole_fraction = vec![vec![0.99, 0.01], vec![0.02, 0.98]];
        fluid.update_all(&mut fs);

        let vv = PorousVolumeVariables::new(fs.clone(), &fluid, &soil, true, true).unwrap();
        assert_eq!(vv.porosity(), 0.3);
        assert_eq!(vv.relative_permeability(1), 0.75);
        approx_eq(vv.mobility(0), 0.25 / fs.viscosity[0], 1e-12);
        approx_eq(vv.component_density(1, 1), fs.molar_density[1] * 0.98, 1e-12);
        approx_eq(vv.heat_conductivity(), 0.5 + 0.5 * 2.0, 1e-15);
        assert_eq!(vv.heat_capacity_solid(), 2e6);
        assert_eq!(vv.dispersivity(), Some(0.5));
        let tau = f64::powf(0.3 * 0.75, 7.0 / 3.0) / (0.3 * 0.3);
        let d = fluid.diffusion_coefficient(&fs, 1, 0);
        approx_eq(vv.effective_diffusion(1, 0), 0.3 * 0.75 * tau * d, 1e-20);

        let vv = PorousVolumeVariables::new(fs.clone(), &fluid, &soil, false, false).unwrap();
        assert_eq!(vv.effective_diffusion(1, 0), 0.0);
        approx_eq(vv.component_density(0, 0), fs.density[0] * fs.mass_fraction(0, 0), 1e-12);
    }

    #[test]
    fn diffusion_with_tortuosity_works() {
        let fluid = H2oN2FluidSystem::new();
        let mut fs = fluid.new_fluid_state();
        fs.temperature = 283.15;
        fs.pressure = vec![1e5, 1e5];
        fs.saturation = vec![1.0, 0.0];
        let dd = DiffusionVolumeVariables::new(&fluid, &fs, 0.4, Some(0.5));
        assert_eq!(dd.tortuosity, &[0.5, 0.5]);
        approx_eq(dd.effective[0][1], 0.4 * 0.5 * 2e-9, 1e-24);
        assert_eq!(dd.effective[1][1], 0.0);
    }
}
