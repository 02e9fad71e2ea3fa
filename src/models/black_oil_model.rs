use super::{EnergyVolumeVariables, Model, PorousVolumeVariables, SoilData, VolumeVariables};
use crate::base::Config;
use crate::fluid::{BlackOilFluidSystem, FluidState, FluidSystem};
use crate::StrError;
use russell_lab::Matrix;

const W: usize = BlackOilFluidSystem::WATER;
const O: usize = BlackOilFluidSystem::OIL;
const G: usize = BlackOilFluidSystem::GAS;

/// Holds the volume variables of the black-oil model
#[derive(Clone, Debug)]
pub struct BlackOilVolumeVariables {
    /// Holds the common volume variables
    pub base: PorousVolumeVariables,

    /// Gas dissolution factor of the oil
    pub rs: f64,

    /// Gas dissolution factor of saturated oil
    pub rs_sat: f64,

    /// Formation volume factor of gas
    pub bg: f64,

    /// Formation volume factor of oil
    pub bo: f64,

    /// Saturation (bubble point) pressure of the oil
    pub p_sat_oil: f64,
}

impl VolumeVariables for BlackOilVolumeVariables {
    fn fluid_state(&self) -> &FluidState {
        &self.base.fluid_state
    }
    fn porosity(&self) -> f64 {
        self.base.porosity
    }
    fn intrinsic_permeability(&self) -> &Matrix {
        &self.base.permeability
    }
    fn relative_permeability(&self, phase: usize) -> f64 {
        self.base.relative_permeability[phase]
    }
    fn conserved_in_moles(&self) -> bool {
        false
    }
    fn heat_capacity_solid(&self) -> f64 {
        self.base.heat_capacity_solid()
    }
    fn heat_conductivity(&self) -> f64 {
        self.base.heat_conductivity()
    }
    fn effective_diffusion(&self, _phase: usize, _comp: usize) -> f64 {
        0.0
    }
    fn dispersivity(&self) -> Option<f64> {
        None
    }
}

/// Implements the black-oil model
///
/// The balance equations are written in mass of the water, oil, and gas components.
/// Capillarity is neglected.
///
/// Primary variables: `p_o, S_w, X_g`
///
/// The third variable switches meaning with the presence of free gas:
///
/// * `X_g ≥ 0` -- gas saturation `S_g = X_g`; the oil is saturated, `Rs = Rs,sat(p_o)`
/// * `-1 ≤ X_g < 0` -- no free gas; the oil is undersaturated with `Rs = (1 + X_g) Rs,sat(p_o)`
///
/// The mapping is continuous at `X_g = 0`; hence, the Newton iterations may cross the
/// bubble point without any explicit switching of primary variables.
pub struct BlackOilModel<'a> {
    fluid: &'a BlackOilFluidSystem,
    soil: &'a SoilData,
}

impl<'a> BlackOilModel<'a> {
    /// Allocates a new instance
    pub fn new(fluid: &'a BlackOilFluidSystem, soil: &'a SoilData, config: &Config) -> Result<Self, StrError> {
        if config.enable_energy {
            return Err("energy is not available in the black-oil model");
        }
        if config.enable_diffusion {
            return Err("diffusion is not available in the black-oil model");
        }
        for cell in &soil.cells {
            if !cell.material.is_null() {
                return Err("the black-oil model requires the Null material law");
            }
        }
        Ok(BlackOilModel { fluid, soil })
    }

    /// Completes the fluid state given the oil pressure and the gas dissolution factor
    fn complete(&self, fs: &mut FluidState, p_oil: f64, rs: f64) -> Result<(), StrError> {
        for alpha in 0..3 {
            fs.pressure[alpha] = p_oil;
        }
        let rho_o = self.fluid.surface_density(O);
        let rho_g = self.fluid.surface_density(G);
        let x_og = rs * rho_g / (rho_o + rs * rho_g);
        fs.set_mass_fractions(W, &[1.0, 0.0, 0.0])?;
        fs.set_mass_fractions(O, &[0.0, 1.0 - x_og, x_og])?;
        fs.set_mass_fractions(G, &[0.0, 0.0, 1.0])?;
        self.fluid.update_all(fs);
        Ok(())
    }

    /// Computes the volume variables given a complete fluid state
    fn new_vars(&self, cell: usize, fs: FluidState) -> Result<BlackOilVolumeVariables, StrError> {
        let t = fs.temperature;
        let p = fs.pressure[O];
        let x_og = fs.mass_fraction(O, G);
        let rs = self.fluid.dissolution_factor_from_mass_fraction(x_og);
        let rs_sat = self.fluid.gas_dissolution_factor(t, p);
        let bg = self.fluid.gas_formation_volume_factor(t, p);
        let bo = self.fluid.saturated_oil_formation_volume_factor(t, p);
        let p_sat_oil = self.fluid.oil_saturation_pressure(t, x_og)?;
        let base = PorousVolumeVariables::new(fs, self.fluid, &self.soil.cells[cell], false, false)?;
        Ok(BlackOilVolumeVariables {
            base,
            rs,
            rs_sat,
            bg,
            bo,
            p_sat_oil,
        })
    }
}

impl<'a> Model for BlackOilModel<'a> {
    type Vars = BlackOilVolumeVariables;

    fn n_equation(&self) -> usize {
        3
    }

    fn n_component_equation(&self) -> usize {
        3
    }

    fn energy_enabled(&self) -> bool {
        false
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
        vec!["p_o".to_string(), "S_w".to_string(), "X_g".to_string()]
    }

    fn equation_names(&self) -> Vec<String> {
        vec!["mass_Water".to_string(), "mass_Oil".to_string(), "mass_Gas".to_string()]
    }

    /// Converts a fluid state into primary variables
    ///
    /// The oil is taken as saturated if free gas is present or if the composition of the oil is unset.
    fn primary_variables_from_fluid_state(&self, pvs: &mut [f64], fs: &FluidState) -> Result<(), StrError> {
        if pvs.len() != 3 {
            return Err("the array of primary variables must have n_equation entries");
        }
        if fs.n_phase() != 3 {
            return Err("the fluid state is incompatible with the fluid system");
        }
        pvs[0] = fs.pressure[O];
        pvs[1] = fs.saturation[W];
        pvs[2] = if fs.saturation[G] > 0.0 || fs.sum_mole_fractions(O) <= 0.0 {
            fs.saturation[G]
        } else {
            let rs = self.fluid.dissolution_factor_from_mass_fraction(fs.mass_fraction(O, G));
            let rs_sat = self.fluid.gas_dissolution_factor(fs.temperature, fs.pressure[O]);
            if rs_sat > 0.0 {
                f64::max(-1.0, f64::min(0.0, rs / rs_sat - 1.0))
            } else {
                0.0
            }
        };
        Ok(())
    }

    fn volume_variables(&self, cell: usize, pvs: &[f64], _hint: Option<&Self::Vars>) -> Result<Self::Vars, StrError> {
        if pvs.len() != 3 {
            return Err("the array of primary variables must have n_equation entries");
        }
        let (p_oil, sw, xg) = (pvs[0], pvs[1], pvs[2]);
        if !(p_oil > 0.0) {
            return Err("the oil pressure must be positive");
        }
        let sg = f64::max(0.0, xg);
        if !(sw >= 0.0 && sw <= 1.0) || !(xg >= -1.0 && sw + sg <= 1.0) {
            return Err("the black-oil saturations must lie within [0, 1]");
        }
        let soil = &self.soil.cells[cell];
        let mut fs = self.fluid.new_fluid_state();
        fs.temperature = EnergyVolumeVariables::temperature(soil, pvs, false)?;
        fs.saturation[W] = sw;
        fs.saturation[G] = sg;
        fs.saturation[O] = 1.0 - sw - sg;
        let rs_sat = self.fluid.gas_dissolution_factor(fs.temperature, p_oil);
        let rs = if xg < 0.0 { (1.0 + xg) * rs_sat } else { rs_sat };
        self.complete(&mut fs, p_oil, rs)?;
        self.new_vars(cell, fs)
    }

    fn boundary_volume_variables(&self, cell: usize, fs: &FluidState) -> Result<Self::Vars, StrError> {
        let mut pvs = vec![0.0; 3];
        self.primary_variables_from_fluid_state(&mut pvs, fs)?;
        self.volume_variables(cell, &pvs, None)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::BlackOilModel;
    use crate::base::{Config, ParamBlackOil, ParamMaterialLaw, SampleMeshes};
    use crate::fluid::{BlackOilFluidSystem, FluidState};
    use crate::fv::{FvCell, FvGrid};
    use crate::models::{Model, SoilData, VolumeVariables};
    use crate::problem::{to_dim_matrix, Problem};
    use crate::StrError;
    use russell_lab::{approx_eq, Matrix};

    struct Sample {
        capillarity: bool,
    }

    impl Problem for Sample {
        fn intrinsic_permeability(&self, _: &FvCell) -> Result<Matrix, StrError> {
            Ok(to_dim_matrix(2, 1e-13))
        }
        fn porosity(&self, _: &FvCell) -> Result<f64, StrError> {
            Ok(0.2)
        }
        fn temperature(&self) -> Result<f64, StrError> {
            Ok(350.0)
        }
        fn material_law_params(&self, _: &FvCell) -> Result<ParamMaterialLaw, StrError> {
            if self.capillarity {
                Ok(ParamMaterialLaw::Linear {
                    pc_min: 0.0,
                    pc_max: 1e4,
                    swr: 0.0,
                    snr: 0.0,
                })
            } else {
                Ok(ParamMaterialLaw::Null)
            }
        }
        fn initial(&self, _: &FvCell) -> Result<FluidState, StrError> {
            Err("unused")
        }
    }

    #[test]
    fn new_captures_errors() {
        let grid = FvGrid::new(&SampleMeshes::two_qua4()).unwrap();
        let mut config = Config::new();
        let fluid = BlackOilFluidSystem::new(&ParamBlackOil::sample()).unwrap();
        let soil = SoilData::new(&grid, &Sample { capillarity: true }, &config).unwrap();
        assert_eq!(
            BlackOilModel::new(&fluid, &soil, &config).err(),
            Some("the black-oil model requires the Null material law")
        );
        let soil = SoilData::new(&grid, &Sample { capillarity: false }, &config).unwrap();
        config.set_diffusion(true);
        assert_eq!(
            BlackOilModel::new(&fluid, &soil, &config).err(),
            Some("diffusion is not available in the black-oil model")
        );
    }

    #[test]
    fn volume_variables_work() {
        let grid = FvGrid::new(&SampleMeshes::two_qua4()).unwrap();
        let config = Config::new();
        let fluid = BlackOilFluidSystem::new(&ParamBlackOil::sample()).unwrap();
        let soil = SoilData::new(&grid, &Sample { capillarity: false }, &config).unwrap();
        let model = BlackOilModel::new(&fluid, &soil, &config).unwrap();
        assert_eq!(model.primary_variable_names(), &["p_o", "S_w", "X_g"]);

        let p = 2e7;
        let vv = model.volume_variables(0, &[p, 0.2, 0.1], None).unwrap();
        let fs = vv.fluid_state();
        approx_eq(fs.saturation[1], 0.7, 1e-15);
        assert_eq!(fs.pressure, &[p, p, p]);
        approx_eq(vv.rs, vv.rs_sat, 1e-10 * vv.rs_sat);
        approx_eq(vv.p_sat_oil, p, 1e-3);
        assert_eq!(vv.bg, fluid.gas_formation_volume_factor(350.0, p));
        assert_eq!(vv.component_density(0, 1), 0.0);
        assert_eq!(vv.component_density(2, 2), fs.density[2]);
        let x_og = fluid.saturated_oil_gas_mass_fraction(350.0, p);
        approx_eq(vv.component_density(1, 2), fs.density[1] * x_og, 1e-10);

        let mut pvs = vec![0.0; 3];
        model.primary_variables_from_fluid_state(&mut pvs, fs).unwrap();
        assert_eq!(pvs, &[p, 0.2, 0.1]);
    }

    #[test]
    fn undersaturated_oil_works() {
        let grid = FvGrid::new(&SampleMeshes::two_qua4()).unwrap();
        let config = Config::new();
        let fluid = BlackOilFluidSystem::new(&ParamBlackOil::sample()).unwrap();
        let soil = SoilData::new(&grid, &Sample { capillarity: false }, &config).unwrap();
        let model = BlackOilModel::new(&fluid, &soil, &config).unwrap();

        // a negative X_g removes the free gas and undersaturates the oil
        let p = 2e7;
        let vv = model.volume_variables(0, &[p, 0.2, -0.1], None).unwrap();
        let fs = vv.fluid_state();
        assert_eq!(fs.saturation, &[0.2, 0.8, 0.0]);
        approx_eq(vv.rs, 0.9 * vv.rs_sat, 1e-10 * vv.rs_sat);
        assert!(vv.p_sat_oil < p);
        let sum: f64 = fs.saturation.iter().sum();
        approx_eq(sum, 1.0, 1e-15);
        assert!(vv.component_density(2, 2) >= 0.0);
        assert!(vv.mobility(2) >= 0.0);

        // continuous at the bubble point
        let a = model.volume_variables(0, &[p, 0.2, -1e-12], None).unwrap();
        let b = model.volume_variables(0, &[p, 0.2, 1e-12], None).unwrap();
        approx_eq(a.component_density(1, 2), b.component_density(1, 2), 1e-6);

        // the fluid state of undersaturated oil is recovered
        let mut pvs = vec![0.0; 3];
        model.primary_variables_from_fluid_state(&mut pvs, fs).unwrap();
        approx_eq(pvs[2], -0.1, 1e-10);

        // overshoots beyond the admissible range are errors (the time step is then reduced)
        assert_eq!(
            model.volume_variables(0, &[p, -0.1, 0.0], None).err(),
            Some("the black-oil saturations must lie within [0, 1]")
        );
        assert_eq!(
            model.volume_variables(0, &[p, 0.2, -1.5], None).err(),
            Some("the black-oil saturations must lie within [0, 1]")
        );
        assert_eq!(
            model.volume_variables(0, &[p, 0.5, 0.6], None).err(),
            Some("the black-oil saturations must lie within [0, 1]")
        );
        assert_eq!(
            model.volume_variables(0, &[0.0, 0.2, 0.1], None).err(),
            Some("the oil pressure must be positive")
        );
    }
}
