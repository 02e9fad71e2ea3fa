use super::{to_dim_matrix, BoundaryCondition, Problem};
use crate::base::{ParamMaterialLaw, SampleMeshes};
use crate::fluid::{FluidState, FluidSystem};
use crate::fv::{FvBoundaryFace, FvCell};
use crate::material::MaterialLaw;
use crate::StrError;
use gemlab::mesh::Mesh;
use russell_lab::Matrix;

/// Defines the infiltration of water into an initially dry soil with a fine-sand lens
///
/// Water enters through a segment of the top boundary. The lens has a lower permeability
/// and a higher entry pressure than the surrounding soil. The left and right boundaries
/// keep the initial (dry) state; the bottom is impermeable.
///
/// ```text
///  y ↑        inflow
///   2.0 ┌─────────▀▀▀▀▀───┐
///   1.5 │     ┌───────┐   │
///       │     │ lens  │   │
///   1.0 │     └───────┘   │
///       │                 │
///   0.0 └─────────────────┘ → x
///       0    1.0     2.0  3.0
/// ```
///
/// The fluid system must have a water phase 0 and a gas phase 1 and one component per phase.
pub struct RichardsLensProblem {
    molar_mass: Vec<f64>,
    outer: ParamMaterialLaw,
    lens: ParamMaterialLaw,

    /// Width of the domain (m)
    pub width: f64,

    /// Height of the domain (m)
    pub height: f64,

    /// Lower-left corner of the lens
    pub lens_lower_left: [f64; 2],

    /// Upper-right corner of the lens
    pub lens_upper_right: [f64; 2],

    /// Permeability of the surrounding soil (m²)
    pub k_outer: f64,

    /// Permeability of the lens (m²)
    pub k_lens: f64,

    /// Porosity
    pub porosity: f64,

    /// Temperature (K)
    pub temperature: f64,

    /// Reference pressure of the gas phase (Pa)
    pub p_n_ref: f64,

    /// Infiltration mass rate per unit area (kg/(m² s)); negative means inflow
    pub infiltration_rate: f64,
}

impl RichardsLensProblem {
    /// Allocates a new instance
    pub fn new(fluid: &dyn FluidSystem) -> Result<Self, StrError> {
        if fluid.n_phase() != 2 || fluid.n_component() != 2 {
            return Err("the Richards lens problem requires two phases and two components");
        }
        Ok(RichardsLensProblem {
            molar_mass: fluid.molar_masses(),
            outer: ParamMaterialLaw::VanGenuchten {
                alpha: 0.0037,
                n: 4.7,
                swr: 0.05,
                snr: 0.0,
            },
            lens: ParamMaterialLaw::VanGenuchten {
                alpha: 0.00045,
                n: 7.3,
                swr: 0.18,
                snr: 0.0,
            },
            width: 3.0,
            height: 2.0,
            lens_lower_left: [1.0, 1.0],
            lens_upper_right: [2.0, 1.5],
            k_outer: 5e-12,
            k_lens: 1e-12,
            porosity: 0.4,
            temperature: 283.15,
            p_n_ref: 1e5,
            infiltration_rate: -0.04,
        })
    }

    /// Generates a structured mesh over the domain
    pub fn mesh(&self, nx: usize, ny: usize) -> Result<Mesh, StrError> {
        SampleMeshes::rectangle(nx, ny, self.width, self.height, |_, _| 1)
    }

    /// Indicates whether a point is inside the lens
    pub fn is_in_lens(&self, x: &[f64]) -> bool {
        const EPS: f64 = 1e-6;
        for i in 0..2 {
            if x[i] < self.lens_lower_left[i] - EPS || x[i] > self.lens_upper_right[i] + EPS {
                return false;
            }
        }
        true
    }

    /// Returns the initial (dry) state of a control volume with the given material law
    fn dry_state(&self, param: &ParamMaterialLaw) -> Result<FluidState, StrError> {
        let law = MaterialLaw::new(param)?;
        let sw = law.absolute_saturation(0.0);
        let pc = law.pc(sw);
        let mut fs = FluidState::new(2, &self.molar_mass);
        fs.temperature = self.temperature;
        fs.pressure = vec![self.p_n_ref - pc, self.p_n_ref];
        fs.saturation = vec![sw, 1.0 - sw];
        fs.set_immiscible_composition();
        Ok(fs)
    }

    fn on_inlet(&self, x: &[f64]) -> bool {
        let on_top = x[1] > self.height - 1e-8 * self.height;
        let lambda = (self.width - x[0]) / self.width;
        on_top && lambda > 0.5 && lambda < 2.0 / 3.0
    }
}

impl Problem for RichardsLensProblem {
    fn intrinsic_permeability(&self, cell: &FvCell) -> Result<Matrix, StrError> {
        let ndim = cell.centroid.len();
        if self.is_in_lens(&cell.centroid) {
            Ok(to_dim_matrix(ndim, self.k_lens))
        } else {
            Ok(to_dim_matrix(ndim, self.k_outer))
        }
    }

    fn porosity(&self, _cell: &FvCell) -> Result<f64, StrError> {
        Ok(self.porosity)
    }

    fn temperature(&self) -> Result<f64, StrError> {
        Ok(self.temperature)
    }

    fn material_law_params(&self, cell: &FvCell) -> Result<ParamMaterialLaw, StrError> {
        if self.is_in_lens(&cell.centroid) {
            Ok(self.lens)
        } else {
            Ok(self.outer)
        }
    }

    fn initial(&self, cell: &FvCell) -> Result<FluidState, StrError> {
        let param = self.material_law_params(cell)?;
        self.dry_state(&param)
    }

    fn boundary(&self, face: &FvBoundaryFace, _t: f64) -> Result<BoundaryCondition, StrError> {
        let x = &face.centroid;
        let eps = 1e-8 * self.width;
        if x[0] < eps || x[0] > self.width - eps {
            return Ok(BoundaryCondition::Dirichlet(self.dry_state(&self.outer)?));
        }
        if self.on_inlet(x) {
            return Ok(BoundaryCondition::Neumann {
                mass_rates: vec![self.infiltration_rate, 0.0],
                energy_rate: 0.0,
            });
        }
        Ok(BoundaryCondition::NoFlow)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::RichardsLensProblem;
    use crate::base::Config;
    use crate::fluid::ImmiscibleFluidSystem;
    use crate::fv::FvGrid;
    use crate::models::SoilData;
    use crate::problem::{BoundaryCondition, Problem};
    use russell_lab::approx_eq;

    #[test]
    fn soil_data_works() {
        let fluid = ImmiscibleFluidSystem::water_gas();
        let problem = RichardsLensProblem::new(&fluid).unwrap();
        let grid = FvGrid::new(&problem.mesh(6, 8).unwrap()).unwrap();
        let soil = SoilData::new(&grid, &problem, &Config::new()).unwrap();
        // cell (2, 4) has its center at (1.25, 1.125), inside the lens
        let lens = 2 + 4 * 6;
        assert!(problem.is_in_lens(&grid.cells[lens].centroid));
        assert_eq!(soil.cells[lens].permeability.get(0, 0), 1e-12);
        assert_eq!(soil.cells[0].permeability.get(0, 0), 5e-12);
        assert_eq!(soil.cells[0].porosity, 0.4);
        assert_eq!(soil.cells[0].temperature, Some(283.15));
    }

    #[test]
    fn initial_and_boundary_work() {
        let fluid = ImmiscibleFluidSystem::water_gas();
        let problem = RichardsLensProblem::new(&fluid).unwrap();
        let grid = FvGrid::new(&problem.mesh(6, 8).unwrap()).unwrap();
        let fs = problem.initial(&grid.cells[0]).unwrap();
        approx_eq(fs.saturation[0], 0.05, 1e-15);
        assert!(fs.pressure[0] < 1e5);
        assert_eq!(fs.pressure[1], 1e5);

        let (mut n_dirichlet, mut n_neumann) = (0, 0);
        for face in &grid.boundary_faces {
            match problem.boundary(face, 0.0).unwrap() {
                BoundaryCondition::Dirichlet(_) => n_dirichlet += 1,
                BoundaryCondition::Neumann { mass_rates, .. } => {
                    assert_eq!(mass_rates, &[-0.04, 0.0]);
                    // the inlet is 1.0 < x < 1.5 on the top
                    assert!(face.centroid[0] > 1.0 && face.centroid[0] < 1.5);
                    n_neumann += 1;
                }
                BoundaryCondition::NoFlow => (),
            }
        }
        assert_eq!(n_dirichlet, 16);
        assert_eq!(n_neumann, 1);
    }
}
