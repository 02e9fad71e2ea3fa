use crate::StrError;
use serde::{Deserialize, Serialize};

/// Holds the thermodynamic state of all fluid phases in a control volume
///
/// The phase quantities are indexed by `[phase]` and the compositions by `[phase][component]`.
/// The derived quantities (mass fractions, molarities, fugacities, ...) are computed on demand.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FluidState {
    /// Temperature (K), the same for all phases
    pub temperature: f64,

    /// Phase pressures (Pa)
    pub pressure: Vec<f64>,

    /// Phase saturations
    pub saturation: Vec<f64>,

    /// Phase (mass) densities (kg/m³)
    pub density: Vec<f64>,

    /// Phase molar densities (mol/m³)
    pub molar_density: Vec<f64>,

    /// Phase dynamic viscosities (Pa s)
    pub viscosity: Vec<f64>,

    /// Phase specific enthalpies (J/kg)
    pub enthalpy: Vec<f64>,

    /// Mole fractions `[phase][component]`
    pub mole_fraction: Vec<Vec<f64>>,

    /// Fugacity coefficients `[phase][component]`
    pub fugacity_coef: Vec<Vec<f64>>,

    /// Molar masses of the components (kg/mol)
    pub molar_mass: Vec<f64>,
}

impl FluidState {
    /// Allocates a new instance with zeroed values
    ///
    /// The number of components is given by the length of `molar_mass`.
    pub fn new(n_phase: usize, molar_mass: &[f64]) -> Self {
        let n_comp = molar_mass.len();
        FluidState {
            temperature: 0.0,
            pressure: vec![0.0; n_phase],
            saturation: vec![0.0; n_phase],
            density: vec![0.0; n_phase],
            molar_density: vec![0.0; n_phase],
            viscosity: vec![0.0; n_phase],
            enthalpy: vec![0.0; n_phase],
            mole_fraction: vec![vec![0.0; n_comp]; n_phase],
            fugacity_coef: vec![vec![0.0; n_comp]; n_phase],
            molar_mass: molar_mass.to_vec(),
        }
    }

    /// Returns the number of phases
    pub fn n_phase(&self) -> usize {
        self.pressure.len()
    }

    /// Returns the number of components
    pub fn n_component(&self) -> usize {
        self.molar_mass.len()
    }

    /// Copies all values from another fluid state
    pub fn assign(&mut self, other: &FluidState) -> Result<(), StrError> {
        if other.n_phase() != self.n_phase() || other.n_component() != self.n_component() {
            return Err("cannot assign fluid state with different numbers of phases or components");
        }
        self.clone_from(other);
        Ok(())
    }

    /// Sets the composition of a phase with each component alone in its phase (immiscible fluids)
    ///
    /// Phase α contains only component α.
    pub fn set_immiscible_composition(&mut self) {
        for alpha in 0..self.n_phase() {
            for kappa in 0..self.n_component() {
                self.mole_fraction[alpha][kappa] = if alpha == kappa { 1.0 } else { 0.0 };
            }
        }
    }

    /// Sets the mole fractions of a phase given its mass fractions
    pub fn set_mass_fractions(&mut self, phase: usize, mass_fractions: &[f64]) -> Result<(), StrError> {
        let n_comp = self.n_component();
        if mass_fractions.len() != n_comp {
            return Err("the number of mass fractions must equal the number of components");
        }
        let mut sum = 0.0;
        for kappa in 0..n_comp {
            sum += mass_fractions[kappa] / self.molar_mass[kappa];
        }
        if sum <= 0.0 {
            return Err("the sum of mass fractions must be positive");
        }
        for kappa in 0..n_comp {
            self.mole_fraction[phase][kappa] = mass_fractions[kappa] / self.molar_mass[kappa] / sum;
        }
        Ok(())
    }

    /// Returns the sum of mole fractions of a phase
    pub fn sum_mole_fractions(&self, phase: usize) -> f64 {
        self.mole_fraction[phase].iter().sum()
    }

    /// Returns the average molar mass of a phase (kg/mol)
    ///
    /// ```text
    /// M̄α = Σκ xακ Mκ
    /// ```
    pub fn average_molar_mass(&self, phase: usize) -> f64 {
        let mut sum = 0.0;
        for kappa in 0..self.n_component() {
            sum += self.mole_fraction[phase][kappa] * self.molar_mass[kappa];
        }
        sum
    }

    /// Returns the mass fraction of a component in a phase
    ///
    /// The mole fractions are normalized (they may not sum up to one when the phase is absent).
    pub fn mass_fraction(&self, phase: usize, comp: usize) -> f64 {
        let mut sum = 0.0;
        for kappa in 0..self.n_component() {
            sum += self.mole_fraction[phase][kappa].max(0.0) * self.molar_mass[kappa];
        }
        if sum <= 0.0 {
            return 0.0;
        }
        self.mole_fraction[phase][comp].max(0.0) * self.molar_mass[comp] / sum
    }

    /// Returns the molarity (concentration) of a component in a phase (mol/m³)
    pub fn molarity(&self, phase: usize, comp: usize) -> f64 {
        self.molar_density[phase] * self.mole_fraction[phase][comp]
    }

    /// Returns the fugacity of a component in a phase (Pa)
    ///
    /// ```text
    /// fακ = φακ xακ pα
    /// ```
    pub fn fugacity(&self, phase: usize, comp: usize) -> f64 {
        self.fugacity_coef[phase][comp] * self.mole_fraction[phase][comp] * self.pressure[phase]
    }

    /// Returns the specific internal energy of a phase (J/kg)
    ///
    /// ```text
    /// uα = hα - pα / ρα
    /// ```
    pub fn internal_energy(&self, phase: usize) -> f64 {
        if self.density[phase] > 0.0 {
            self.enthalpy[phase] - self.pressure[phase] / self.density[phase]
        } else {
            self.enthalpy[phase]
        }
    }

    /// Returns the total mass fraction of a component over all phases
    pub fn total_mass_fraction(&self, comp: usize) -> f64 {
        let mut mass_comp = 0.0;
        let mut mass_total = 0.0;
        for alpha in 0..self.n_phase() {
            let m = self.saturation[alpha] * self.density[alpha];
            mass_comp += m * self.mass_fraction(alpha, comp);
            mass_total += m;
        }
        if mass_total > 0.0 {
            mass_comp / mass_total
        } else {
            0.0
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
