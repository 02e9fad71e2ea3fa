use super::VolumeVariables;
use crate::fluid::FluidState;
use crate::StrError;

/// Defines a model: the primary variables and the closure relations of the balance equations
///
/// The balance equations are ordered as follows: one equation per conserved component
/// (`0 … n_component_equation-1`) followed by the energy equation (if enabled).
pub trait Model {
    /// Defines the volume variables computed by this model
    type Vars: VolumeVariables + Clone;

    /// Returns the number of equations (and primary variables) per control volume
    fn n_equation(&self) -> usize;

    /// Returns the number of component balance equations
    fn n_component_equation(&self) -> usize;

    /// Indicates whether the energy equation is enabled
    fn energy_enabled(&self) -> bool;

    /// Indicates whether the molecular diffusion is enabled
    fn diffusion_enabled(&self) -> bool;

    /// Indicates whether the balance equations are written in moles (otherwise in mass)
    fn conserved_in_moles(&self) -> bool;

    /// Returns the molar mass of a component (kg/mol)
    fn molar_mass(&self, comp: usize) -> f64;

    /// Returns the names of the primary variables
    fn primary_variable_names(&self) -> Vec<String>;

    /// Returns the names of the balance equations
    fn equation_names(&self) -> Vec<String>;

    /// Calculates the primary variables corresponding to a fluid state
    fn primary_variables_from_fluid_state(&self, pvs: &mut [f64], fs: &FluidState) -> Result<(), StrError>;

    /// Computes the volume variables of a control volume
    ///
    /// # Input
    ///
    /// * `cell` -- index of the control volume
    /// * `pvs` -- primary variables of the control volume
    /// * `hint` -- volume variables at a nearby state (e.g., the previous iteration) used as initial guess
    fn volume_variables(&self, cell: usize, pvs: &[f64], hint: Option<&Self::Vars>) -> Result<Self::Vars, StrError>;

    /// Computes the volume variables at a Dirichlet boundary face owned by a control volume
    ///
    /// The soil data of the owning control volume are used.
    fn boundary_volume_variables(&self, cell: usize, fs: &FluidState) -> Result<Self::Vars, StrError>;

    /// Converts the Neumann mass rates into the units of the balance equations
    ///
    /// # Input
    ///
    /// * `mass_rates` -- mass rate of each component per unit area (kg/(m² s))
    /// * `energy_rate` -- energy rate per unit area (W/m²)
    ///
    /// # Output
    ///
    /// * `rates` -- (n_equation) the fluxes per unit area
    fn neumann_rates(&self, rates: &mut [f64], mass_rates: &[f64], energy_rate: f64) -> Result<(), StrError> {
        let nc = self.n_component_equation();
        if rates.len() != self.n_equation() {
            return Err("the array of rates must have n_equation entries");
        }
        if mass_rates.len() < nc {
            return Err("the number of Neumann mass rates is insufficient");
        }
        for kappa in 0..nc {
            rates[kappa] = if self.conserved_in_moles() {
                mass_rates[kappa] / self.molar_mass(kappa)
            } else {
                mass_rates[kappa]
            };
        }
        if self.energy_enabled() {
            rates[nc] = energy_rate;
        }
        Ok(())
    }
}
