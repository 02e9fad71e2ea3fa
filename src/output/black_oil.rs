use super::{OutputModule, ScalarBuffers, VtkMultiWriter};
use crate::models::BlackOilVolumeVariables;
use crate::StrError;
use serde::{Deserialize, Serialize};

/// Selects the quantities written by the black-oil output module
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct VtkBlackOilFlags {
    /// Writes the gas dissolution factor of the oil
    pub gas_dissolution_factor: bool,

    /// Writes the gas dissolution factor of saturated oil
    pub saturated_gas_dissolution_factor: bool,

    /// Writes the formation volume factor of gas
    pub gas_formation_volume_factor: bool,

    /// Writes the formation volume factor of oil
    pub oil_formation_volume_factor: bool,

    /// Writes the saturation (bubble point) pressure of the oil
    pub oil_saturation_pressure: bool,
}

impl VtkBlackOilFlags {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        VtkBlackOilFlags {
            gas_dissolution_factor: false,
            saturated_gas_dissolution_factor: false,
            gas_formation_volume_factor: false,
            oil_formation_volume_factor: false,
            oil_saturation_pressure: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Quantity {
    Rs,
    RsSat,
    Bg,
    Bo,
    PsatOil,
}

/// Writes the quantities specific to the black-oil model
pub struct VtkBlackOilModule {
    flags: VtkBlackOilFlags,
    buffers: ScalarBuffers<Quantity>,
}

impl VtkBlackOilModule {
    /// Allocates a new instance
    pub fn new(flags: VtkBlackOilFlags) -> Self {
        VtkBlackOilModule {
            flags,
            buffers: ScalarBuffers::new(),
        }
    }
}

impl OutputModule<BlackOilVolumeVariables> for VtkBlackOilModule {
    fn alloc_buffers(&mut self, n_cell: usize) {
        let f = &self.flags;
        let b = &mut self.buffers;
        b.clear();
        if f.gas_dissolution_factor {
            b.add(Quantity::Rs, "R_s".to_string(), n_cell);
        }
        if f.saturated_gas_dissolution_factor {
            b.add(Quantity::RsSat, "R_s,sat".to_string(), n_cell);
        }
        if f.gas_formation_volume_factor {
            b.add(Quantity::Bg, "B_g".to_string(), n_cell);
        }
        if f.oil_formation_volume_factor {
            b.add(Quantity::Bo, "B_o".to_string(), n_cell);
        }
        if f.oil_saturation_pressure {
            b.add(Quantity::PsatOil, "pressure_sat,o".to_string(), n_cell);
        }
    }

    fn process_cell(&mut self, cell: usize, vv: &BlackOilVolumeVariables) -> Result<(), StrError> {
        self.buffers.set(cell, |q| match q {
            Quantity::Rs => vv.rs,
            Quantity::RsSat => vv.rs_sat,
            Quantity::Bg => vv.bg,
            Quantity::Bo => vv.bo,
            Quantity::PsatOil => vv.p_sat_oil,
        })
    }

    fn commit_buffers(&mut self, writer: &mut VtkMultiWriter) -> Result<(), StrError> {
        self.buffers.commit(writer)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{VtkBlackOilFlags, VtkBlackOilModule};
    use crate::base::{Config, ParamBlackOil};
    use crate::fluid::BlackOilFluidSystem;
    use crate::fv::FvGrid;
    use crate::models::{BlackOilModel, Model, SoilData};
    use crate::output::{OutputModule, VtkMultiWriter};
    use crate::problem::BlackOilColumnProblem;

    #[test]
    fn black_oil_works() {
        let fluid = BlackOilFluidSystem::new(&ParamBlackOil::sample()).unwrap();
        let problem = BlackOilColumnProblem::new(&fluid);
        let mesh = problem.mesh(2).unwrap();
        let grid = FvGrid::new(&mesh).unwrap();
        let config = Config::new();
        let soil = SoilData::new(&grid, &problem, &config).unwrap();
        let model = BlackOilModel::new(&fluid, &soil, &config).unwrap();
        let vars: Vec<_> = (0..2)
            .map(|c| model.volume_variables(c, &[2e7, 0.2, 0.0], None).unwrap())
            .collect();

        // nothing by default
        let mut module = VtkBlackOilModule::new(VtkBlackOilFlags::new());
        module.alloc_buffers(2);
        assert_eq!(module.buffers.len(), 0);

        let flags = VtkBlackOilFlags {
            gas_dissolution_factor: true,
            saturated_gas_dissolution_factor: true,
            gas_formation_volume_factor: true,
            oil_formation_volume_factor: true,
            oil_saturation_pressure: true,
        };
        let mut module = VtkBlackOilModule::new(flags);
        module.alloc_buffers(2);
        for (cell, vv) in vars.iter().enumerate() {
            module.process_cell(cell, vv).unwrap();
        }
        let mut writer = VtkMultiWriter::new(&mesh);
        module.commit_buffers(&mut writer).unwrap();
        assert_eq!(writer.names(), &["R_s", "R_s,sat", "B_g", "B_o", "pressure_sat,o"]);
    }
}
