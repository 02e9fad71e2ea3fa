use crate::fluid::{FluidState, FluidSystem, H2oN2FluidSystem};
use crate::StrError;

const GAS: usize = H2oN2FluidSystem::GAS;
const H2O: usize = H2oN2FluidSystem::H2O;

/// Holds the volume variables of the non-isothermal two-component free flow (gas phase only)
///
/// The free flow consists of a single gas phase made of water vapour and air (nitrogen).
///
/// Primary variables: `v₀ … v_{ndim-1}, p, X_gH2O, T`
#[derive(Clone, Debug)]
pub struct Stokes2cniVolumeVariables {
    /// Fluid state (only the gas phase is present)
    pub fluid_state: FluidState,

    /// Velocity vector (m/s)
    pub velocity: Vec<f64>,
}

impl Stokes2cniVolumeVariables {
    /// Returns the names of the primary variables
    pub fn primary_variable_names(ndim: usize) -> Vec<String> {
        let mut names: Vec<_> = (0..ndim).map(|i| format!("v{}", i)).collect();
        names.push("p".to_string());
        names.push("X_gH2O".to_string());
        names.push("T".to_string());
        names
    }

    /// Allocates a new instance from the primary variables
    pub fn new(fluid: &H2oN2FluidSystem, ndim: usize, pvs: &[f64]) -> Result<Self, StrError> {
        if ndim < 2 || ndim > 3 {
            return Err("the space dimension must be 2 or 3");
        }
        if pvs.len() != ndim + 3 {
            return Err("the array of primary variables must have ndim + 3 entries");
        }
        let pressure = pvs[ndim];
        let x_h2o = pvs[ndim + 1];
        let temperature = pvs[ndim + 2];
        if !(temperature > 0.0) {
            return Err("the temperature must be positive");
        }
        if x_h2o < 0.0 || x_h2o > 1.0 {
            return Err("the mass fraction of water vapour must be in [0, 1]");
        }
        let mut fs = fluid.new_fluid_state();
        fs.temperature = temperature;
        fs.pressure = vec![pressure; 2];
        fs.saturation[GAS] = 1.0;
        fs.set_immiscible_composition();
        fs.set_mass_fractions(GAS, &[x_h2o, 1.0 - x_h2o])?;
        fluid.update_all(&mut fs);
        Ok(Stokes2cniVolumeVariables {
            fluid_state: fs,
            velocity: pvs[0..ndim].to_vec(),
        })
    }

    /// Returns the gas pressure
    pub fn pressure(&self) -> f64 {
        self.fluid_state.pressure[GAS]
    }

    /// Returns the mass fraction of water vapour in the gas
    pub fn mass_fraction_h2o(&self) -> f64 {
        self.fluid_state.mass_fraction(GAS, H2O)
    }

    /// Returns the temperature
    pub fn temperature(&self) -> f64 {
        self.fluid_state.temperature
    }

    /// Returns the gas density
    pub fn density(&self) -> f64 {
        self.fluid_state.density[GAS]
    }

    /// Returns the gas viscosity
    pub fn viscosity(&self) -> f64 {
        self.fluid_state.viscosity[GAS]
    }

    /// Returns the specific enthalpy of the gas
    pub fn enthalpy(&self) -> f64 {
        self.fluid_state.enthalpy[GAS]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Stokes2cniVolumeVariables;
    use crate::base::GAS_CONSTANT;
    use crate::fluid::H2oN2FluidSystem;
    use russell_lab::approx_eq;

    #[test]
    fn new_captures_errors() {
        let fluid = H2oN2FluidSystem::new();
        assert_eq!(
            Stokes2cniVolumeVariables::new(&fluid, 1, &[0.0, 1e5, 0.0, 300.0]).err(),
            Some("the space dimension must be 2 or 3")
        );
        assert_eq!(
            Stokes2cniVolumeVariables::new(&fluid, 2, &[0.0, 1e5, 0.0, 300.0]).err(),
            Some("the array of primary variables must have ndim + 3 entries")
        );
        assert_eq!(
            Stokes2cniVolumeVariables::new(&fluid, 2, &[0.0, 0.0, 1e5, 0.0, 0.0]).err(),
            Some("the temperature must be positive")
        );
        assert_eq!(
            Stokes2cniVolumeVariables::new(&fluid, 2, &[0.0, 0.0, 1e5, 1.5, 300.0]).err(),
            Some("the mass fraction of water vapour must be in [0, 1]")
        );
    }

    #[test]
    fn new_works() {
        let fluid = H2oN2FluidSystem::new();
        assert_eq!(
            Stokes2cniVolumeVariables::primary_variable_names(2),
            &["v0", "v1", "p", "X_gH2O", "T"]
        );
        let vv = Stokes2cniVolumeVariables::new(&fluid, 2, &[0.5, -0.1, 1.2e5, 0.01, 300.0]).unwrap();
        assert_eq!(vv.velocity, &[0.5, -0.1]);
        assert_eq!(vv.pressure(), 1.2e5);
        assert_eq!(vv.temperature(), 300.0);
        approx_eq(vv.mass_fraction_h2o(), 0.01, 1e-14);
        assert_eq!(vv.viscosity(), fluid.gas_viscosity);

        // ideal gas
        let mm = vv.fluid_state.average_molar_mass(1);
        approx_eq(vv.density(), 1.2e5 * mm / (GAS_CONSTANT * 300.0), 1e-10);
        assert!(vv.enthalpy() > 0.0);
    }
}
