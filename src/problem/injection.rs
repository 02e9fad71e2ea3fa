use super::{to_dim_matrix, BoundaryCondition, Problem};
use crate::base::{ParamHeatConduction, ParamMaterialLaw, SampleMeshes, GRAVITY};
use crate::fluid::{FluidState, FluidSystem};
use crate::fv::{FvBoundaryFace, FvCell};
use crate::StrError;
use gemlab::mesh::Mesh;
use russell_lab::Matrix;

/// Defines the injection of gas under a low-permeable layer
///
/// The domain is a vertical rectangle filled with water. Gas enters through a segment of the
/// right boundary and migrates upwards until it reaches the low-permeable layer. The left
/// boundary is hydrostatic (Dirichlet); all other boundaries are impermeable.
///
/// ```text
///  y ↑
///   40 ┌────────────────────────────┐
///      │      low permeability      │
///   22 ├────────────────────────────┤
///      │                            │
///      │     high permeability      │ ← gas (5 < y < 15)
///      │                            │
///    0 └────────────────────────────┘ → x
///      0                           60
/// ```
///
/// The fluid system must have a liquid phase 0 and a gas phase 1 and one component per phase
/// (the component 1 is the injected gas).
pub struct InjectionProblem {
    molar_mass: Vec<f64>,

    /// Width of the domain (m)
    pub width: f64,

    /// Height of the domain (m)
    pub height: f64,

    /// Depth of the bottom of the reservoir, i.e., the depth of y = 0 (m)
    pub depth_bor: f64,

    /// Temperature (K)
    pub temperature: f64,

    /// Elevation of the bottom of the low-permeable layer (m)
    pub layer_bottom: f64,

    /// Permeability below the layer (m²)
    pub k_high: f64,

    /// Permeability of the layer (m²)
    pub k_low: f64,

    /// Porosity
    pub porosity: f64,

    /// Injected mass rate of gas per unit area (kg/(m² s)); negative means inflow
    pub injection_rate: f64,

    /// Density of water used to compute the hydrostatic pressure (kg/m³)
    pub water_density: f64,

    /// Use gravity to compute the hydrostatic pressure
    pub hydrostatic: bool,

    /// Gas saturation of the initial and the prescribed (left boundary) states
    pub gas_saturation: f64,
}

impl InjectionProblem {
    /// Allocates a new instance
    pub fn new(fluid: &dyn FluidSystem) -> Result<Self, StrError> {
        if fluid.n_phase() != 2 || fluid.n_component() != 2 {
            return Err("the injection problem requires two phases and two components");
        }
        if !fluid.is_liquid(0) || fluid.is_liquid(1) {
            return Err("the injection problem requires a liquid phase 0 and a gas phase 1");
        }
        Ok(InjectionProblem {
            molar_mass: fluid.molar_masses(),
            width: 60.0,
            height: 40.0,
            depth_bor: 1000.0,
            temperature: 283.15,
            layer_bottom: 22.0,
            k_high: 1e-12,
            k_low: 5e-14,
            porosity: 0.3,
            injection_rate: -1e-3,
            water_density: 1000.0,
            hydrostatic: true,
            gas_saturation: 1e-6,
        })
    }

    /// Generates a structured mesh over the domain
    ///
    /// The attribute 1 marks the cells below the layer and 2 the cells in the layer.
    pub fn mesh(&self, nx: usize, ny: usize) -> Result<Mesh, StrError> {
        let mut mesh = SampleMeshes::rectangle(nx, ny, self.width, self.height, |_, _| 1)?;
        let dy = self.height / (ny as f64);
        for cell in mesh.cells.iter_mut() {
            let yc = (((cell.id / nx) as f64) + 0.5) * dy;
            cell.attribute = if yc < self.layer_bottom { 1 } else { 2 };
        }
        Ok(mesh)
    }

    /// Returns the hydrostatic water pressure at elevation y
    pub fn hydrostatic_pressure(&self, y: f64) -> f64 {
        if self.hydrostatic {
            1e5 + self.water_density * GRAVITY * (self.depth_bor - y)
        } else {
            1e5
        }
    }

    /// Returns a fluid state (water with traces of gas) at elevation y
    fn water_state(&self, y: f64) -> FluidState {
        let p = self.hydrostatic_pressure(y);
        let mut fs = FluidState::new(2, &self.molar_mass);
        fs.temperature = self.temperature;
        fs.pressure = vec![p, p];
        fs.saturation = vec![1.0 - self.gas_saturation, self.gas_saturation];
        fs.set_immiscible_composition();
        fs
    }

    fn on_left_boundary(&self, x: &[f64]) -> bool {
        x[0] < 1e-8 * self.width
    }

    fn on_right_boundary(&self, x: &[f64]) -> bool {
        x[0] > self.width - 1e-8 * self.width
    }
}

impl Problem for InjectionProblem {
    fn intrinsic_permeability(&self, cell: &FvCell) -> Result<Matrix, StrError> {
        let ndim = cell.centroid.len();
        if cell.centroid[ndim - 1] < self.layer_bottom {
            Ok(to_dim_matrix(ndim, self.k_high))
        } else {
            Ok(to_dim_matrix(ndim, self.k_low))
        }
    }

    fn porosity(&self, _cell: &FvCell) -> Result<f64, StrError> {
        Ok(self.porosity)
    }

    fn heat_capacity_solid(&self, _cell: &FvCell) -> Result<f64, StrError> {
        Ok(790.0 * 2700.0) // granite
    }

    fn heat_conduction_params(&self, _cell: &FvCell) -> Result<ParamHeatConduction, StrError> {
        let lambda_granite: f64 = 2.8;
        let lambda_water: f64 = 0.6;
        let lambda_dry = f64::powf(lambda_granite, 1.0 - self.porosity);
        Ok(ParamHeatConduction::Somerton {
            lambda_dry,
            lambda_sat: lambda_dry * f64::powf(lambda_water, self.porosity),
        })
    }

    fn temperature(&self) -> Result<f64, StrError> {
        Ok(self.temperature)
    }

    fn material_law_params(&self, _cell: &FvCell) -> Result<ParamMaterialLaw, StrError> {
        Ok(ParamMaterialLaw::BrooksCorey {
            lambda: 2.0,
            pe: 1e4,
            swr: 0.2,
            snr: 0.05,
        })
    }

    fn initial(&self, cell: &FvCell) -> Result<FluidState, StrError> {
        let ndim = cell.centroid.len();
        Ok(self.water_state(cell.centroid[ndim - 1]))
    }

    fn boundary(&self, face: &FvBoundaryFace, _t: f64) -> Result<BoundaryCondition, StrError> {
        let x = &face.centroid;
        let y = x[x.len() - 1];
        if self.on_left_boundary(x) {
            return Ok(BoundaryCondition::Dirichlet(self.water_state(y)));
        }
        if self.on_right_boundary(x) && y > 5.0 && y < 15.0 {
            return Ok(BoundaryCondition::Neumann {
                mass_rates: vec![0.0, self.injection_rate],
                energy_rate: 0.0,
            });
        }
        Ok(BoundaryCondition::NoFlow)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::InjectionProblem;
    use crate::base::{Config, GRAVITY};
    use crate::fluid::{BlackOilFluidSystem, ImmiscibleFluidSystem};
    use crate::fv::FvGrid;
    use crate::models::SoilData;
    use crate::problem::{BoundaryCondition, Problem};
    use russell_lab::approx_eq;

    #[test]
    fn new_captures_errors() {
        let fluid = BlackOilFluidSystem::new(&crate::base::ParamBlackOil::sample()).unwrap();
        assert_eq!(
            InjectionProblem::new(&fluid).err(),
            Some("the injection problem requires two phases and two components")
        );
    }

    #[test]
    fn mesh_and_soil_work() {
        let fluid = ImmiscibleFluidSystem::water_gas();
        let problem = InjectionProblem::new(&fluid).unwrap();
        let mesh = problem.mesh(6, 4).unwrap();
        assert_eq!(mesh.cells.len(), 24);
        assert_eq!(mesh.cells[0].attribute, 1);
        assert_eq!(mesh.cells[23].attribute, 2);
        let grid = FvGrid::new(&mesh).unwrap();
        let mut config = Config::new();
        config.set_energy(true);
        let soil = SoilData::new(&grid, &problem, &config).unwrap();
        assert_eq!(soil.cells[0].permeability.get(1, 1), 1e-12);
        assert_eq!(soil.cells[23].permeability.get(0, 0), 5e-14);
        assert_eq!(soil.cells[5].porosity, 0.3);
        assert_eq!(soil.cells[5].heat_capacity_solid, 2_133_000.0);
        let law = soil.cells[5].heat_conduction.as_ref().unwrap();
        approx_eq(law.conductivity(0.0), f64::powf(2.8, 0.7), 1e-15);
    }

    #[test]
    fn initial_and_boundary_work() {
        let fluid = ImmiscibleFluidSystem::water_gas();
        let problem = InjectionProblem::new(&fluid).unwrap();
        let grid = FvGrid::new(&problem.mesh(6, 8).unwrap()).unwrap();

        // hydrostatic initial state
        let fs = problem.initial(&grid.cells[0]).unwrap();
        approx_eq(fs.pressure[0], 1e5 + 1000.0 * GRAVITY * (1000.0 - 2.5), 1e-8);
        assert_eq!(fs.saturation, &[1.0 - 1e-6, 1e-6]);
        assert_eq!(fs.temperature, 283.15);

        // the right faces with centroids at y = 7.5 and y = 12.5 receive gas
        let (mut n_dirichlet, mut n_neumann, mut n_no_flow) = (0, 0, 0);
        for face in &grid.boundary_faces {
            match problem.boundary(face, 0.0).unwrap() {
                BoundaryCondition::Dirichlet(fs) => {
                    assert_eq!(face.centroid[0], 0.0);
                    approx_eq(fs.pressure[0], problem.hydrostatic_pressure(face.centroid[1]), 1e-8);
                    n_dirichlet += 1;
                }
                BoundaryCondition::Neumann { mass_rates, energy_rate } => {
                    assert_eq!(face.centroid[0], 60.0);
                    assert!(face.centroid[1] > 5.0 && face.centroid[1] < 15.0);
                    assert_eq!(mass_rates, &[0.0, -1e-3]);
                    assert_eq!(energy_rate, 0.0);
                    n_neumann += 1;
                }
                BoundaryCondition::NoFlow => n_no_flow += 1,
            }
        }
        assert_eq!(n_dirichlet, 8);
        assert_eq!(n_neumann, 2);
        assert_eq!(n_no_flow, 18);
    }
}
