use super::{OutputModule, ScalarBuffers, VtkMultiWriter};
use crate::fluid::FluidSystem;
use crate::models::VolumeVariables;
use crate::StrError;
use serde::{Deserialize, Serialize};

/// Selects the quantities written by the multi-phase output module
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct VtkMultiPhaseFlags {
    /// Writes the pressure of each phase
    pub pressure: bool,

    /// Writes the saturation of each phase
    pub saturation: bool,

    /// Writes the mass density of each phase
    pub density: bool,

    /// Writes the mobility of each phase
    pub mobility: bool,

    /// Writes the relative permeability of each phase
    pub relative_permeability: bool,

    /// Writes the viscosity of each phase
    pub viscosity: bool,

    /// Writes the average molar mass of each phase
    pub average_molar_mass: bool,

    /// Writes the capillary pressure `pα - p₀` of each non-wetting phase
    pub capillary_pressure: bool,

    /// Writes the porosity
    pub porosity: bool,

    /// Writes the first diagonal entry of the intrinsic permeability tensor
    pub intrinsic_permeability: bool,
}

impl VtkMultiPhaseFlags {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        VtkMultiPhaseFlags {
            pressure: true,
            saturation: true,
            density: true,
            mobility: false,
            relative_permeability: true,
            viscosity: false,
            average_molar_mass: false,
            capillary_pressure: false,
            porosity: true,
            intrinsic_permeability: false,
        }
    }

    /// Enables or disables all quantities
    pub fn set_all(&mut self, flag: bool) -> &mut Self {
        self.pressure = flag;
        self.saturation = flag;
        self.density = flag;
        self.mobility = flag;
        self.relative_permeability = flag;
        self.viscosity = flag;
        self.average_molar_mass = flag;
        self.capillary_pressure = flag;
        self.porosity = flag;
        self.intrinsic_permeability = flag;
        self
    }
}

#[derive(Clone, Copy, Debug)]
enum Quantity {
    Pressure(usize),
    Saturation(usize),
    Density(usize),
    Mobility(usize),
    RelativePermeability(usize),
    Viscosity(usize),
    AverageMolarMass(usize),
    CapillaryPressure(usize),
    Porosity,
    IntrinsicPermeability,
}

/// Writes the phase quantities common to all porous-media models
pub struct VtkMultiPhaseModule {
    flags: VtkMultiPhaseFlags,
    phase_names: Vec<&'static str>,
    buffers: ScalarBuffers<Quantity>,
}

impl VtkMultiPhaseModule {
    /// Allocates a new instance
    pub fn new(fluid: &dyn FluidSystem, flags: VtkMultiPhaseFlags) -> Self {
        VtkMultiPhaseModule {
            flags,
            phase_names: (0..fluid.n_phase()).map(|alpha| fluid.phase_name(alpha)).collect(),
            buffers: ScalarBuffers::new(),
        }
    }
}

impl<V: VolumeVariables> OutputModule<V> for VtkMultiPhaseModule {
    fn alloc_buffers(&mut self, n_cell: usize) {
        let f = &self.flags;
        let b = &mut self.buffers;
        b.clear();
        for (alpha, name) in self.phase_names.iter().enumerate() {
            if f.pressure {
                b.add(Quantity::Pressure(alpha), format!("p_{}", name), n_cell);
            }
            if f.saturation {
                b.add(Quantity::Saturation(alpha), format!("S_{}", name), n_cell);
            }
            if f.density {
                b.add(Quantity::Density(alpha), format!("rho_{}", name), n_cell);
            }
            if f.mobility {
                b.add(Quantity::Mobility(alpha), format!("lambda_{}", name), n_cell);
            }
            if f.relative_permeability {
                b.add(Quantity::RelativePermeability(alpha), format!("kr_{}", name), n_cell);
            }
            if f.viscosity {
                b.add(Quantity::Viscosity(alpha), format!("mu_{}", name), n_cell);
            }
            if f.average_molar_mass {
                b.add(Quantity::AverageMolarMass(alpha), format!("M_{}", name), n_cell);
            }
            if f.capillary_pressure && alpha > 0 {
                b.add(Quantity::CapillaryPressure(alpha), format!("pc_{}", name), n_cell);
            }
        }
        if f.porosity {
            b.add(Quantity::Porosity, "porosity".to_string(), n_cell);
        }
        if f.intrinsic_permeability {
            b.add(Quantity::IntrinsicPermeability, "K".to_string(), n_cell);
        }
    }

    fn process_cell(&mut self, cell: usize, vv: &V) -> Result<(), StrError> {
        let fs = vv.fluid_state();
        if fs.n_phase() != self.phase_names.len() {
            return Err("the number of phases of the volume variables is incorrect");
        }
        self.buffers.set(cell, |q| match q {
            Quantity::Pressure(alpha) => fs.pressure[alpha],
            Quantity::Saturation(alpha) => fs.saturation[alpha],
            Quantity::Density(alpha) => fs.density[alpha],
            Quantity::Mobility(alpha) => vv.mobility(alpha),
            Quantity::RelativePermeability(alpha) => vv.relative_permeability(alpha),
            Quantity::Viscosity(alpha) => fs.viscosity[alpha],
            Quantity::AverageMolarMass(alpha) => fs.average_molar_mass(alpha),
            Quantity::CapillaryPressure(alpha) => fs.pressure[alpha] - fs.pressure[0],
            Quantity::Porosity => vv.porosity(),
            Quantity::IntrinsicPermeability => vv.intrinsic_permeability().get(0, 0),
        })
    }

    fn commit_buffers(&mut self, writer: &mut VtkMultiWriter) -> Result<(), StrError> {
        self.buffers.commit(writer)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{VtkMultiPhaseFlags, VtkMultiPhaseModule};
    use crate::base::{ParamMaterialLaw, SampleMeshes};
    use crate::fluid::{FluidSystem, ImmiscibleFluidSystem};
    use crate::material::MaterialLaw;
    use crate::models::{PorousVolumeVariables, SoilCell};
    use crate::output::{OutputModule, VtkMultiWriter};
    use crate::problem::to_dim_matrix;

    fn sample_vars(fluid: &ImmiscibleFluidSystem, sn: f64) -> PorousVolumeVariables {
        let soil = SoilCell {
            porosity: 0.3,
            permeability: to_dim_matrix(2, 1e-12),
            material: MaterialLaw::new(&ParamMaterialLaw::Null).unwrap(),
            heat_capacity_solid: 0.0,
            heat_conduction: None,
            tortuosity: None,
            dispersivity: None,
            temperature: Some(293.15),
        };
        let mut fs = fluid.new_fluid_state();
        fs.temperature = 293.15;
        fs.pressure = vec![1e5, 1.1e5];
        fs.saturation = vec![1.0 - sn, sn];
        fs.set_immiscible_composition();
        fluid.update_all(&mut fs);
        PorousVolumeVariables::new(fs, fluid, &soil, false, false).unwrap()
    }

    #[test]
    fn default_flags_work() {
        let fluid = ImmiscibleFluidSystem::water_gas();
        let mesh = SampleMeshes::two_qua4();
        let mut module = VtkMultiPhaseModule::new(&fluid, VtkMultiPhaseFlags::new());
        let vars = vec![sample_vars(&fluid, 0.25), sample_vars(&fluid, 0.5)];
        OutputModule::<PorousVolumeVariables>::alloc_buffers(&mut module, 2);
        for (cell, vv) in vars.iter().enumerate() {
            module.process_cell(cell, vv).unwrap();
        }
        let mut writer = VtkMultiWriter::new(&mesh);
        OutputModule::<PorousVolumeVariables>::commit_buffers(&mut module, &mut writer).unwrap();
        assert_eq!(
            writer.names(),
            &["p_w", "S_w", "rho_w", "kr_w", "p_n", "S_n", "rho_n", "kr_n", "porosity"]
        );
    }

    #[test]
    fn all_flags_work() {
        let fluid = ImmiscibleFluidSystem::water_gas();
        let mut flags = VtkMultiPhaseFlags::new();
        flags.set_all(false);
        flags.capillary_pressure = true;
        flags.intrinsic_permeability = true;
        let mut module = VtkMultiPhaseModule::new(&fluid, flags);
        OutputModule::<PorousVolumeVariables>::alloc_buffers(&mut module, 1);
        assert_eq!(module.buffers.len(), 2);
        let vv = sample_vars(&fluid, 0.5);
        module.process_cell(0, &vv).unwrap();
        let mesh = SampleMeshes::one_tet4();
        let mut writer = VtkMultiWriter::new(&mesh);
        OutputModule::<PorousVolumeVariables>::commit_buffers(&mut module, &mut writer).unwrap();
        assert_eq!(writer.names(), &["pc_n", "K"]);
        assert_eq!(
            module.process_cell(0, &vv).err(),
            Some("the cell index is out of bounds (buffers must be allocated first)")
        );
    }
}
