use super::{OutputModule, ScalarBuffers, VtkMultiWriter};
use crate::fluid::FluidSystem;
use crate::models::VolumeVariables;
use crate::StrError;
use serde::{Deserialize, Serialize};

/// Selects the quantities written by the composition output module
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct VtkCompositionFlags {
    /// Writes the mole fraction of each component in each phase
    pub mole_fraction: bool,

    /// Writes the mass fraction of each component in each phase
    pub mass_fraction: bool,

    /// Writes the molarity of each component in each phase
    pub molarity: bool,

    /// Writes the fugacity of each component
    pub fugacity: bool,

    /// Writes the fugacity coefficient of each component in each phase
    pub fugacity_coefficient: bool,

    /// Writes the total mass fraction of each component
    pub total_mass_fraction: bool,
}

impl VtkCompositionFlags {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        VtkCompositionFlags {
            mole_fraction: true,
            mass_fraction: false,
            molarity: false,
            fugacity: false,
            fugacity_coefficient: false,
            total_mass_fraction: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Quantity {
    MoleFraction(usize, usize),
    MassFraction(usize, usize),
    Molarity(usize, usize),
    Fugacity(usize),
    FugacityCoefficient(usize, usize),
    TotalMassFraction(usize),
}

/// Writes the composition of the fluid phases
///
/// Fields are named as `x_{phase}^{component}`, e.g., `x_g^H2O` for the mole fraction of
/// water in the gas. In chemical equilibrium the fugacity is the same in all phases; thus,
/// it is written once per component (computed in the first phase).
pub struct VtkCompositionModule {
    flags: VtkCompositionFlags,
    phase_names: Vec<&'static str>,
    component_names: Vec<&'static str>,
    buffers: ScalarBuffers<Quantity>,
}

impl VtkCompositionModule {
    /// Allocates a new instance
    pub fn new(fluid: &dyn FluidSystem, flags: VtkCompositionFlags) -> Self {
        VtkCompositionModule {
            flags,
            phase_names: (0..fluid.n_phase()).map(|alpha| fluid.phase_name(alpha)).collect(),
            component_names: (0..fluid.n_component()).map(|kappa| fluid.component_name(kappa)).collect(),
            buffers: ScalarBuffers::new(),
        }
    }
}

impl<V: VolumeVariables> OutputModule<V> for VtkCompositionModule {
    fn alloc_buffers(&mut self, n_cell: usize) {
        let f = &self.flags;
        let b = &mut self.buffers;
        b.clear();
        for (alpha, ph) in self.phase_names.iter().enumerate() {
            for (kappa, comp) in self.component_names.iter().enumerate() {
                if f.mole_fraction {
                    b.add(Quantity::MoleFraction(alpha, kappa), format!("x_{}^{}", ph, comp), n_cell);
                }
                if f.mass_fraction {
                    b.add(Quantity::MassFraction(alpha, kappa), format!("X_{}^{}", ph, comp), n_cell);
                }
                if f.molarity {
                    b.add(Quantity::Molarity(alpha, kappa), format!("c_{}^{}", ph, comp), n_cell);
                }
                if f.fugacity_coefficient {
                    b.add(
                        Quantity::FugacityCoefficient(alpha, kappa),
                        format!("phi_{}^{}", ph, comp),
                        n_cell,
                    );
                }
            }
        }
        for (kappa, comp) in self.component_names.iter().enumerate() {
            if f.fugacity {
                b.add(Quantity::Fugacity(kappa), format!("f^{}", comp), n_cell);
            }
            if f.total_mass_fraction {
                b.add(Quantity::TotalMassFraction(kappa), format!("X^{}", comp), n_cell);
            }
        }
    }

    fn process_cell(&mut self, cell: usize, vv: &V) -> Result<(), StrError> {
        let fs = vv.fluid_state();
        if fs.n_phase() != self.phase_names.len() || fs.n_component() != self.component_names.len() {
            return Err("the fluid state of the volume variables is incompatible with the fluid system");
        }
        self.buffers.set(cell, |q| match q {
            Quantity::MoleFraction(alpha, kappa) => fs.mole_fraction[alpha][kappa],
            Quantity::MassFraction(alpha, kappa) => fs.mass_fraction(alpha, kappa),
            Quantity::Molarity(alpha, kappa) => fs.molarity(alpha, kappa),
            Quantity::Fugacity(kappa) => fs.fugacity(0, kappa),
            Quantity::FugacityCoefficient(alpha, kappa) => fs.fugacity_coef[alpha][kappa],
            Quantity::TotalMassFraction(kappa) => fs.total_mass_fraction(kappa),
        })
    }

    fn commit_buffers(&mut self, writer: &mut VtkMultiWriter) -> Result<(), StrError> {
        self.buffers.commit(writer)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{VtkCompositionFlags, VtkCompositionModule};
    use crate::base::{ParamMaterialLaw, SampleMeshes};
    use crate::fluid::{FluidSystem, H2oN2FluidSystem};
    use crate::material::MaterialLaw;
    use crate::models::{PorousVolumeVariables, SoilCell};
    use crate::output::{OutputModule, VtkMultiWriter};
    use crate::problem::to_dim_matrix;
    use russell_lab::approx_eq;

    const L: usize = H2oN2FluidSystem::LIQUID;
    const G: usize = H2oN2FluidSystem::GAS;
    const H2O: usize = H2oN2FluidSystem::H2O;

    #[test]
    fn composition_works() {
        let fluid = H2oN2FluidSystem::new();
        let soil = SoilCell {
            porosity: 0.3,
            permeability: to_dim_matrix(3, 1e-12),
            material: MaterialLaw::new(&ParamMaterialLaw::Null).unwrap(),
            heat_capacity_solid: 0.0,
            heat_conduction: None,
            tortuosity: None,
            dispersivity: None,
            temperature: Some(293.15),
        };
        let mut fs = fluid.new_fluid_state();
        fs.temperature = 293.15;
        fs.pressure = vec![1e5, 1e5];
        fs.saturation[G] = 1.0;
        fs.set_immiscible_composition();
        fs.set_mass_fractions(G, &[0.01, 0.99]).unwrap();
        fluid.update_all(&mut fs);
        let vv = PorousVolumeVariables::new(fs, &fluid, &soil, true, false).unwrap();

        let mut flags = VtkCompositionFlags::new();
        flags.mass_fraction = true;
        flags.total_mass_fraction = true;
        let mut module = VtkCompositionModule::new(&fluid, flags);
        OutputModule::<PorousVolumeVariables>::alloc_buffers(&mut module, 1);
        module.process_cell(0, &vv).unwrap();
        let mesh = SampleMeshes::one_tet4();
        let mut writer = VtkMultiWriter::new(&mesh);
        OutputModule::<PorousVolumeVariables>::commit_buffers(&mut module, &mut writer).unwrap();
        assert_eq!(
            writer.names(),
            &["x_l^H2O", "X_l^H2O", "x_l^N2", "X_l^N2", "x_g^H2O", "X_g^H2O", "x_g^N2", "X_g^N2", "X^H2O", "X^N2"]
        );

        // the liquid is absent; thus, the total mass fraction equals the one in the gas
        approx_eq(vv.fluid_state.mass_fraction(L, H2O), 1.0, 1e-15);
        approx_eq(vv.fluid_state.mass_fraction(G, H2O), 0.01, 1e-14);
        approx_eq(vv.fluid_state.total_mass_fraction(H2O), 0.01, 1e-14);
    }
}
