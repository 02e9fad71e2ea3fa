use super::FluidState;

/// Defines the thermodynamic relations of a fluid system
///
/// A fluid system computes the phase properties (densities, viscosities, enthalpies, ...)
/// given the pressures, temperature, and compositions stored in a [FluidState].
pub trait FluidSystem {
    /// Returns the number of phases
    fn n_phase(&self) -> usize;

    /// Returns the number of components
    fn n_component(&self) -> usize;

    /// Returns the name of a phase
    fn phase_name(&self, phase: usize) -> &'static str;

    /// Returns the name of a component
    fn component_name(&self, comp: usize) -> &'static str;

    /// Indicates whether a phase is a liquid
    fn is_liquid(&self, phase: usize) -> bool;

    /// Returns the molar mass of a component (kg/mol)
    fn molar_mass(&self, comp: usize) -> f64;

    /// Returns the mass density of a phase (kg/m³)
    fn density(&self, fs: &FluidState, phase: usize) -> f64;

    /// Returns the molar density of a phase (mol/m³)
    fn molar_density(&self, fs: &FluidState, phase: usize) -> f64 {
        let mm = fs.average_molar_mass(phase);
        if mm > 0.0 {
            self.density(fs, phase) / mm
        } else {
            0.0
        }
    }

    /// Returns the dynamic viscosity of a phase (Pa s)
    fn viscosity(&self, fs: &FluidState, phase: usize) -> f64;

    /// Returns the specific enthalpy of a phase (J/kg)
    fn enthalpy(&self, fs: &FluidState, phase: usize) -> f64;

    /// Returns the fugacity coefficient of a component in a phase
    fn fugacity_coefficient(&self, fs: &FluidState, phase: usize, comp: usize) -> f64;

    /// Returns the binary molecular diffusion coefficient of a component in a phase (m²/s)
    fn diffusion_coefficient(&self, fs: &FluidState, phase: usize, comp: usize) -> f64;

    /// Returns the thermal conductivity of a phase (W/(m K))
    fn thermal_conductivity(&self, fs: &FluidState, phase: usize) -> f64;

    /// Returns the molar masses of all components
    fn molar_masses(&self) -> Vec<f64> {
        (0..self.n_component()).map(|c| self.molar_mass(c)).collect()
    }

    /// Allocates a new fluid state compatible with this fluid system
    fn new_fluid_state(&self) -> FluidState {
        FluidState::new(self.n_phase(), &self.molar_masses())
    }

    /// Updates the densities and the fugacity coefficients
    ///
    /// This is the subset of properties needed by the flash solver.
    fn update_densities_and_fugacities(&self, fs: &mut FluidState) {
        for alpha in 0..self.n_phase() {
            fs.density[alpha] = self.density(fs, alpha);
            fs.molar_density[alpha] = self.molar_density(fs, alpha);
            for kappa in 0..self.n_component() {
                fs.fugacity_coef[alpha][kappa] = self.fugacity_coefficient(fs, alpha, kappa);
            }
        }
    }

    /// Updates all phase properties
    fn update_all(&self, fs: &mut FluidState) {
        self.update_densities_and_fugacities(fs);
        for alpha in 0..self.n_phase() {
            fs.viscosity[alpha] = self.viscosity(fs, alpha);
            fs.enthalpy[alpha] = self.enthalpy(fs, alpha);
        }
    }
}
