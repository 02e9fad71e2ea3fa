use super::{EnergyVolumeVariables, Model, PorousVolumeVariables, SoilData};
use crate::base::Config;
use crate::fluid::{FluidState, FluidSystem};
use crate::StrError;

/// Implements the Richards model: water flow in a variably saturated soil
///
/// The gas phase is assumed to be at the constant reference pressure; thus, only the water
/// mass balance is solved. The water saturation follows from the capillary pressure:
///
/// ```text
/// Sw = Sw(pc)      with      pc = p_n,ref - pw
/// ```
///
/// Primary variable: `pw`
pub struct RichardsModel<'a> {
    fluid: &'a dyn FluidSystem,
    soil: &'a SoilData,

    /// Reference pressure of the non-wetting (gas) phase
    pub p_n_ref: f64,
}

impl<'a> RichardsModel<'a> {
    /// Allocates a new instance
    ///
    /// The fluid system must have a wetting (water) phase and a non-wetting (gas) phase.
    pub fn new(fluid: &'a dyn FluidSystem, soil: &'a SoilData, config: &Config) -> Result<Self, StrError> {
        if fluid.n_phase() != 2 {
            return Err("the Richards model requires two phases");
        }
        if fluid.n_component() != 2 {
            return Err("the Richards model requires one component per phase");
        }
        if config.enable_energy {
            return Err("energy is not available in the Richards model");
        }
        if config.enable_diffusion {
            return Err("diffusion is not available in the Richards model");
        }
        Ok(RichardsModel {
            fluid,
            soil,
            p_n_ref: 1e5,
        })
    }

    /// Completes a fluid state given the water pressure
    fn complete(&self, cell: usize, fs: &mut FluidState, pw: f64) {
        let material = &self.soil.cells[cell].material;
        let sw = material.saturation_from_pc(self.p_n_ref - pw);
        fs.saturation[0] = sw;
        fs.saturation[1] = 1.0 - sw;
        fs.pressure[0] = pw;
        fs.pressure[1] = self.p_n_ref;
        fs.set_immiscible_composition();
        self.fluid.update_all(fs);
    }
}

impl<'a> Model for RichardsModel<'a> {
    type Vars = PorousVolumeVariables;

    fn n_equation(&self) -> usize {
        1
    }

    fn n_component_equation(&self) -> usize {
        1
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
        vec![format!("p_{}", self.fluid.phase_name(0))]
    }

    fn equation_names(&self) -> Vec<String> {
        vec![format!("mass_{}", self.fluid.phase_name(0))]
    }

    fn primary_variables_from_fluid_state(&self, pvs: &mut [f64], fs: &FluidState) -> Result<(), StrError> {
        if pvs.len() != 1 {
            return Err("the array of primary variables must have n_equation entries");
        }
        pvs[0] = fs.pressure[0];
        Ok(())
    }

    fn volume_variables(&self, cell: usize, pvs: &[f64], _hint: Option<&Self::Vars>) -> Result<Self::Vars, StrError> {
        let soil = &self.soil.cells[cell];
        let mut fs = self.fluid.new_fluid_state();
        fs.temperature = EnergyVolumeVariables::temperature(soil, pvs, false)?;
        self.complete(cell, &mut fs, pvs[0]);
        PorousVolumeVariables::new(fs, self.fluid, soil, false, false)
    }

    fn boundary_volume_variables(&self, cell: usize, fs: &FluidState) -> Result<Self::Vars, StrError> {
        if fs.n_phase() != 2 {
            return Err("the fluid state is incompatible with the fluid system");
        }
        let soil = &self.soil.cells[cell];
        let mut state = self.fluid.new_fluid_state();
        state.temperature = EnergyVolumeVariables::temperature(soil, &[], false)?;
        self.complete(cell, &mut state, fs.pressure[0]);
        PorousVolumeVariables::new(state, self.fluid, soil, false, false)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::RichardsModel;
    use crate::base::{Config, ParamMaterialLaw, SampleMeshes};
    use crate::fluid::{FluidState, FluidSystem, ImmiscibleFluidSystem};
    use crate::fv::{FvCell, FvGrid};
    use crate::models::{Model, SoilData, VolumeVariables};
    use crate::problem::{to_dim_matrix, Problem};
    use crate::StrError;
    use russell_lab::{approx_eq, Matrix};

    struct Sample {}

    impl Problem for Sample {
        fn intrinsic_permeability(&self, _: &FvCell) -> Result<Matrix, StrError> {
            Ok(to_dim_matrix(2, 5e-12))
        }
        fn porosity(&self, _: &FvCell) -> Result<f64, StrError> {
            Ok(0.4)
        }
        fn temperature(&self) -> Result<f64, StrError> {
            Ok(283.15)
        }
        fn material_law_params(&self, _: &FvCell) -> Result<ParamMaterialLaw, StrError> {
            Ok(ParamMaterialLaw::VanGenuchten {
                alpha: 0.0037,
                n: 4.7,
                swr: 0.05,
                snr: 0.0,
            })
        }
        fn initial(&self, _: &FvCell) -> Result<FluidState, StrError> {
            Err("unused")
        }
    }

    #[test]
    fn new_captures_errors() {
        let grid = FvGrid::new(&SampleMeshes::two_qua4()).unwrap();
        let mut config = Config::new();
        let soil = SoilData::new(&grid, &Sample {}, &config).unwrap();
        let fluid = ImmiscibleFluidSystem::water_gas();
        config.set_energy(true);
        assert_eq!(
            RichardsModel::new(&fluid, &soil, &config).err(),
            Some("energy is not available in the Richards model")
        );
    }

    #[test]
    fn volume_variables_work() {
        let grid = FvGrid::new(&SampleMeshes::two_qua4()).unwrap();
        let config = Config::new();
        let soil = SoilData::new(&grid, &Sample {}, &config).unwrap();
        let fluid = ImmiscibleFluidSystem::water_gas();
        let model = RichardsModel::new(&fluid, &soil, &config).unwrap();
        assert_eq!(model.n_equation(), 1);
        assert_eq!(model.primary_variable_names(), &["p_w"]);

        // fully saturated
        let vv = model.volume_variables(0, &[1.5e5], None).unwrap();
        approx_eq(vv.fluid_state().saturation[0], 1.0, 1e-15);
        approx_eq(vv.fluid_state().saturation[1], 0.0, 1e-15);
        approx_eq(vv.relative_permeability(0), 1.0, 1e-15);

        // unsaturated
        let pw = 1e5 - 300.0;
        let vv = model.volume_variables(0, &[pw], None).unwrap();
        let sw = vv.fluid_state().saturation[0];
        assert!(sw < 1.0 && sw > 0.05);
        approx_eq(soil.cells[0].material.pc(sw), 300.0, 1e-8);
        assert_eq!(vv.fluid_state().pressure, &[pw, 1e5]);
        assert_eq!(vv.component_density(1, 0), 0.0);

        let bry = model.boundary_volume_variables(0, vv.fluid_state()).unwrap();
        assert_eq!(bry.fluid_state().saturation[0], sw);
        let mut pvs = vec![0.0];
        model.primary_variables_from_fluid_state(&mut pvs, vv.fluid_state()).unwrap();
        assert_eq!(pvs, &[pw]);
    }
}
