use super::{to_dim_matrix, BoundaryCondition, Problem};
use crate::base::{SampleMeshes, GRAVITY};
use crate::fluid::{BlackOilFluidSystem, FluidState, FluidSystem};
use crate::fv::{FvBoundaryFace, FvCell};
use crate::StrError;
use gemlab::mesh::Mesh;
use russell_lab::Matrix;

/// Defines the injection of gas at the bottom of a vertical column of oil and connate water
///
/// The top of the column is kept at the initial state (production); the gas enters through
/// the bottom face. The oil is saturated with dissolved gas.
pub struct BlackOilColumnProblem {
    molar_mass: Vec<f64>,

    /// Height of the column (m)
    pub height: f64,

    /// Oil pressure at the top of the column (Pa)
    pub p_top: f64,

    /// Approximate oil density used to initialize the pressure profile (kg/m³)
    pub oil_density: f64,

    /// Initial (connate) water saturation
    pub sw_ini: f64,

    /// Initial gas saturation
    pub sg_ini: f64,

    /// Permeability (m²)
    pub permeability: f64,

    /// Porosity
    pub porosity: f64,

    /// Temperature (K)
    pub temperature: f64,

    /// Injected mass rate of gas per unit area (kg/(m² s)); negative means inflow
    pub injection_rate: f64,
}

impl BlackOilColumnProblem {
    /// Allocates a new instance
    pub fn new(fluid: &BlackOilFluidSystem) -> Self {
        BlackOilColumnProblem {
            molar_mass: fluid.molar_masses(),
            height: 20.0,
            p_top: 2e7,
            oil_density: 720.0,
            sw_ini: 0.2,
            sg_ini: 0.0,
            permeability: 1e-13,
            porosity: 0.2,
            temperature: 350.0,
            injection_rate: -1e-4,
        }
    }

    /// Generates the mesh of the column
    pub fn mesh(&self, ny: usize) -> Result<Mesh, StrError> {
        SampleMeshes::column(ny, self.height)
    }

    /// Returns the initial oil pressure at elevation y
    pub fn initial_pressure(&self, y: f64) -> f64 {
        self.p_top + self.oil_density * GRAVITY * (self.height - y)
    }

    fn state(&self, y: f64) -> FluidState {
        let p = self.initial_pressure(y);
        let mut fs = FluidState::new(3, &self.molar_mass);
        fs.temperature = self.temperature;
        fs.pressure = vec![p, p, p];
        fs.saturation[BlackOilFluidSystem::WATER] = self.sw_ini;
        fs.saturation[BlackOilFluidSystem::GAS] = self.sg_ini;
        fs.saturation[BlackOilFluidSystem::OIL] = 1.0 - self.sw_ini - self.sg_ini;
        fs
    }
}

impl Problem for BlackOilColumnProblem {
    fn intrinsic_permeability(&self, cell: &FvCell) -> Result<Matrix, StrError> {
        Ok(to_dim_matrix(cell.centroid.len(), self.permeability))
    }

    fn porosity(&self, _cell: &FvCell) -> Result<f64, StrError> {
        Ok(self.porosity)
    }

    fn temperature(&self) -> Result<f64, StrError> {
        Ok(self.temperature)
    }

    fn initial(&self, cell: &FvCell) -> Result<FluidState, StrError> {
        let ndim = cell.centroid.len();
        Ok(self.state(cell.centroid[ndim - 1]))
    }

    fn boundary(&self, face: &FvBoundaryFace, _t: f64) -> Result<BoundaryCondition, StrError> {
        let ndim = face.centroid.len();
        let y = face.centroid[ndim - 1];
        let eps = 1e-8 * self.height;
        if y > self.height - eps {
            return Ok(BoundaryCondition::Dirichlet(self.state(y)));
        }
        if y < eps {
            return Ok(BoundaryCondition::Neumann {
                mass_rates: vec![0.0, 0.0, self.injection_rate],
                energy_rate: 0.0,
            });
        }
        Ok(BoundaryCondition::NoFlow)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::BlackOilColumnProblem;
    use crate::base::{ParamBlackOil, GRAVITY};
    use crate::fluid::BlackOilFluidSystem;
    use crate::fv::FvGrid;
    use crate::problem::{BoundaryCondition, Problem};
    use russell_lab::approx_eq;

    #[test]
    fn initial_and_boundary_work() {
        let fluid = BlackOilFluidSystem::new(&ParamBlackOil::sample()).unwrap();
        let problem = BlackOilColumnProblem::new(&fluid);
        let grid = FvGrid::new(&problem.mesh(4).unwrap()).unwrap();
        let fs = problem.initial(&grid.cells[3]).unwrap();
        approx_eq(fs.pressure[1], 2e7 + 720.0 * GRAVITY * 2.5, 1e-6);
        assert_eq!(fs.saturation, &[0.2, 0.8, 0.0]);

        let mut kinds = Vec::new();
        for face in &grid.boundary_faces {
            match problem.boundary(face, 0.0).unwrap() {
                BoundaryCondition::Dirichlet(fs) => {
                    assert_eq!(fs.pressure, &[2e7, 2e7, 2e7]);
                    kinds.push('D');
                }
                BoundaryCondition::Neumann { mass_rates, .. } => {
                    assert_eq!(mass_rates, &[0.0, 0.0, -1e-4]);
                    kinds.push('N');
                }
                BoundaryCondition::NoFlow => kinds.push('-'),
            }
        }
        assert_eq!(kinds.iter().filter(|k| **k == 'D').count(), 1);
        assert_eq!(kinds.iter().filter(|k| **k == 'N').count(), 1);
        assert_eq!(kinds.len(), 10);
    }
}
