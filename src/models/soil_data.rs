use crate::base::Config;
use crate::fv::FvGrid;
use crate::material::{HeatConductionLaw, MaterialLaw};
use crate::problem::Problem;
use crate::StrError;
use russell_lab::Matrix;

/// Holds the (read-only) soil and rock data of a control volume
#[derive(Clone, Debug)]
pub struct SoilCell {
    /// Porosity
    pub porosity: f64,

    /// Intrinsic permeability tensor (m²)
    pub permeability: Matrix,

    /// Capillary pressure and relative permeability law
    pub material: MaterialLaw,

    /// Volumetric heat capacity of the solid (J/(m³ K)); only with energy
    pub heat_capacity_solid: f64,

    /// Heat conduction law; only with energy
    pub heat_conduction: Option<HeatConductionLaw>,

    /// Tortuosity; None means Millington-Quirk
    pub tortuosity: Option<f64>,

    /// Longitudinal dispersivity (m); None means no dispersion
    pub dispersivity: Option<f64>,

    /// Temperature of isothermal problems (K)
    pub temperature: Option<f64>,
}

/// Holds the soil and rock data of all control volumes and faces
///
/// The data are obtained from the problem once and are not modified during the simulation.
#[derive(Clone, Debug)]
pub struct SoilData {
    /// Holds the data of each control volume
    pub cells: Vec<SoilCell>,

    /// Holds the normal permeability `n·K·n` at each interior face
    pub face_kn: Vec<f64>,

    /// Holds the normal permeability `n·K·n` at each boundary face
    pub boundary_kn: Vec<f64>,

    /// Holds the gravity vector
    pub gravity: Vec<f64>,
}

/// Computes n·K·n
fn normal_permeability(kk: &Matrix, n: &[f64]) -> Result<f64, StrError> {
    let (nrow, ncol) = kk.dims();
    if nrow != n.len() || ncol != n.len() {
        return Err("the permeability tensor must be ndim × ndim");
    }
    let mut res = 0.0;
    for i in 0..nrow {
        for j in 0..ncol {
            res += n[i] * kk.get(i, j) * n[j];
        }
    }
    Ok(res)
}

/// Converts the result of an optional problem query; "not implemented" means not provided
fn optional(res: Result<f64, StrError>) -> Result<Option<f64>, StrError> {
    match res {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.starts_with("not implemented") => Ok(None),
        Err(e) => Err(e),
    }
}

impl SoilData {
    /// Allocates a new instance by querying the problem
    pub fn new(grid: &FvGrid, problem: &dyn Problem, config: &Config) -> Result<Self, StrError> {
        let mut cells = Vec::with_capacity(grid.n_cell());
        for cell in &grid.cells {
            let porosity = problem.porosity(cell)?;
            if porosity <= 0.0 || porosity > 1.0 {
                return Err("the porosity must be in (0, 1]");
            }
            let permeability = problem.intrinsic_permeability(cell)?;
            let material = MaterialLaw::new(&problem.material_law_params(cell)?)?;
            let (heat_capacity_solid, heat_conduction, temperature) = if config.enable_energy {
                let law = HeatConductionLaw::new(&problem.heat_conduction_params(cell)?)?;
                (problem.heat_capacity_solid(cell)?, Some(law), None)
            } else {
                (0.0, None, Some(problem.cell_temperature(cell)?))
            };
            let (tortuosity, dispersivity) = if config.enable_diffusion {
                (optional(problem.tortuosity(cell))?, optional(problem.dispersivity(cell))?)
            } else {
                (None, None)
            };
            cells.push(SoilCell {
                porosity,
                permeability,
                material,
                heat_capacity_solid,
                heat_conduction,
                tortuosity,
                dispersivity,
                temperature,
            });
        }
        let mut face_kn = Vec::with_capacity(grid.faces.len());
        for face in &grid.faces {
            let [a, b] = face.cells;
            let kk = problem.intersection_intrinsic_permeability(&cells[a].permeability, &cells[b].permeability);
            face_kn.push(normal_permeability(&kk, &face.normal)?);
        }
        let mut boundary_kn = Vec::with_capacity(grid.boundary_faces.len());
        for face in &grid.boundary_faces {
            boundary_kn.push(normal_permeability(&cells[face.cell].permeability, &face.normal)?);
        }
        Ok(SoilData {
            cells,
            face_kn,
            boundary_kn,
            gravity: problem.gravity(config, grid.ndim),
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SoilData;
    use crate::base::{Config, ParamHeatConduction, ParamMaterialLaw, SampleMeshes};
    use crate::fluid::FluidState;
    use crate::fv::{FvCell, FvGrid};
    use crate::problem::{to_dim_matrix, Problem};
    use crate::StrError;
    use russell_lab::{approx_eq, Matrix};

    struct Layered {
        porosity: f64,
    }

    struct Faulty {}

    impl Problem for Faulty {
        fn intrinsic_permeability(&self, _: &FvCell) -> Result<Matrix, StrError> {
            Ok(to_dim_matrix(2, 1e-12))
        }
        fn porosity(&self, _: &FvCell) -> Result<f64, StrError> {
            Ok(0.3)
        }
        fn temperature(&self) -> Result<f64, StrError> {
            Ok(300.0)
        }
        fn tortuosity(&self, cell: &FvCell) -> Result<f64, StrError> {
            if cell.attribute == 2 {
                Err("tortuosity table is missing")
            } else {
                Ok(0.5)
            }
        }
        fn initial(&self, _: &FvCell) -> Result<FluidState, StrError> {
            Err("unused")
        }
    }

    impl Problem for Layered {
        fn intrinsic_permeability(&self, cell: &FvCell) -> Result<Matrix, StrError> {
            if cell.attribute == 1 {
                Ok(to_dim_matrix(2, 1e-12))
            } else {
                Ok(to_dim_matrix(2, 3e-12))
            }
        }
        fn porosity(&self, _: &FvCell) -> Result<f64, StrError> {
            Ok(self.porosity)
        }
        fn heat_capacity_solid(&self, _: &FvCell) -> Result<f64, StrError> {
            Ok(2e6)
        }
        fn heat_conduction_params(&self, _: &FvCell) -> Result<ParamHeatConduction, StrError> {
            Ok(ParamHeatConduction::Constant { lambda: 2.0 })
        }
        fn temperature(&self) -> Result<f64, StrError> {
            Ok(300.0)
        }
        fn dispersivity(&self, _: &FvCell) -> Result<f64, StrError> {
            Ok(0.1)
        }
        fn material_law_params(&self, _: &FvCell) -> Result<ParamMaterialLaw, StrError> {
            Ok(ParamMaterialLaw::Linear {
                pc_min: 0.0,
                pc_max: 1e4,
                swr: 0.0,
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
        let config = Config::new();
        let problem = Layered { porosity: 0.0 };
        assert_eq!(
            SoilData::new(&grid, &problem, &config).err(),
            Some("the porosity must be in (0, 1]")
        );

        // errors other than "not implemented" are propagated
        let mut config = Config::new();
        config.set_diffusion(true);
        assert_eq!(
            SoilData::new(&grid, &Faulty {}, &config).err(),
            Some("tortuosity table is missing")
        );
        config.set_diffusion(false);
        assert!(SoilData::new(&grid, &Faulty {}, &config).is_ok());
    }

    #[test]
    fn new_works() {
        let grid = FvGrid::new(&SampleMeshes::two_qua4()).unwrap();
        let problem = Layered { porosity: 0.25 };
        let mut config = Config::new();
        let soil = SoilData::new(&grid, &problem, &config).unwrap();
        assert_eq!(soil.cells.len(), 2);
        assert_eq!(soil.cells[0].porosity, 0.25);
        assert_eq!(soil.cells[0].temperature, Some(300.0));
        assert!(soil.cells[0].heat_conduction.is_none());
        assert_eq!(soil.cells[0].dispersivity, None);
        approx_eq(soil.face_kn[0], 1.5e-12, 1e-27);
        assert_eq!(soil.boundary_kn.len(), 6);
        assert_eq!(soil.gravity, &[0.0, -9.81]);

        config.set_energy(true).set_diffusion(true);
        let soil = SoilData::new(&grid, &problem, &config).unwrap();
        assert_eq!(soil.cells[1].temperature, None);
        assert_eq!(soil.cells[1].heat_capacity_solid, 2e6);
        assert_eq!(soil.cells[1].heat_conduction.unwrap().conductivity(0.5), 2.0);
        assert_eq!(soil.cells[1].tortuosity, None);
        assert_eq!(soil.cells[1].dispersivity, Some(0.1));
    }
}
