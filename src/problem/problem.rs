use crate::base::{Config, ParamHeatConduction, ParamMaterialLaw};
use crate::fluid::FluidState;
use crate::fv::{FvBoundaryFace, FvCell};
use crate::util::harmonic_mean;
use crate::StrError;
use russell_lab::Matrix;

/// Defines the boundary condition on a boundary face
#[derive(Clone, Debug)]
pub enum BoundaryCondition {
    /// Impermeable and adiabatic face
    NoFlow,

    /// Prescribed fluid state at the face
    Dirichlet(FluidState),

    /// Prescribed fluxes through the face
    Neumann {
        /// Mass rate of each component per unit area (kg/(m² s)); negative means inflow
        mass_rates: Vec<f64>,

        /// Energy rate per unit area (W/m²); negative means inflow
        energy_rate: f64,
    },
}

/// Returns an isotropic tensor with the given value on the diagonal
pub fn to_dim_matrix(ndim: usize, value: f64) -> Matrix {
    let mut kk = Matrix::new(ndim, ndim);
    for i in 0..ndim {
        kk.set(i, i, value);
    }
    kk
}

/// Defines the initial and boundary conditions and the spatial parameters of a simulation
///
/// The accessors that a problem does not need may be left unimplemented. In this case,
/// they return an error if they are ever called.
pub trait Problem {
    /// Returns the intrinsic permeability tensor (m²)
    fn intrinsic_permeability(&self, _cell: &FvCell) -> Result<Matrix, StrError> {
        Err("not implemented: Problem::intrinsic_permeability()")
    }

    /// Returns the porosity
    fn porosity(&self, _cell: &FvCell) -> Result<f64, StrError> {
        Err("not implemented: Problem::porosity()")
    }

    /// Returns the volumetric heat capacity of the solid grains (J/(m³ K))
    fn heat_capacity_solid(&self, _cell: &FvCell) -> Result<f64, StrError> {
        Err("not implemented: Problem::heat_capacity_solid()")
    }

    /// Returns the parameters of the heat conduction law
    fn heat_conduction_params(&self, _cell: &FvCell) -> Result<ParamHeatConduction, StrError> {
        Err("not implemented: Problem::heat_conduction_params()")
    }

    /// Returns the tortuosity
    ///
    /// When not implemented, the Millington-Quirk relation is used.
    fn tortuosity(&self, _cell: &FvCell) -> Result<f64, StrError> {
        Err("not implemented: Problem::tortuosity()")
    }

    /// Returns the longitudinal dispersivity (m)
    ///
    /// When not implemented, mechanical dispersion is ignored.
    fn dispersivity(&self, _cell: &FvCell) -> Result<f64, StrError> {
        Err("not implemented: Problem::dispersivity()")
    }

    /// Returns the temperature of an isothermal problem (K)
    fn temperature(&self) -> Result<f64, StrError> {
        Err("not implemented: Problem::temperature()")
    }

    /// Returns the temperature in a control volume of an isothermal problem (K)
    fn cell_temperature(&self, _cell: &FvCell) -> Result<f64, StrError> {
        self.temperature()
    }

    /// Returns the parameters of the capillary pressure and relative permeability laws
    fn material_law_params(&self, _cell: &FvCell) -> Result<ParamMaterialLaw, StrError> {
        Ok(ParamMaterialLaw::Null)
    }

    /// Returns the gravity acceleration vector
    fn gravity(&self, config: &Config, ndim: usize) -> Vec<f64> {
        config.gravity(ndim)
    }

    /// Returns the permeability at the intersection of two control volumes
    ///
    /// Computes the entry-wise harmonic mean of both tensors.
    fn intersection_intrinsic_permeability(&self, k_i: &Matrix, k_j: &Matrix) -> Matrix {
        let (nrow, ncol) = k_i.dims();
        let mut kk = Matrix::new(nrow, ncol);
        for i in 0..nrow {
            for j in 0..ncol {
                kk.set(i, j, harmonic_mean(k_i.get(i, j), k_j.get(i, j)));
            }
        }
        kk
    }

    /// Returns the initial fluid state in a control volume
    fn initial(&self, cell: &FvCell) -> Result<FluidState, StrError>;

    /// Returns the boundary condition on a boundary face at time t
    fn boundary(&self, _face: &FvBoundaryFace, _t: f64) -> Result<BoundaryCondition, StrError> {
        Ok(BoundaryCondition::NoFlow)
    }

    /// Calculates the source terms in a control volume at time t
    ///
    /// The rates are given per unit volume in the units of the balance equations;
    /// positive values mean production of the conserved quantity.
    fn source(&self, _cell: &FvCell, _t: f64, _rates: &mut [f64]) -> Result<(), StrError> {
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{to_dim_matrix, BoundaryCondition, Problem};
    use crate::base::{Config, ParamMaterialLaw, SampleMeshes};
    use crate::fluid::FluidState;
    use crate::fv::{FvCell, FvGrid};
    use crate::StrError;

    struct Minimal {}

    impl Problem for Minimal {
        fn initial(&self, _: &FvCell) -> Result<FluidState, StrError> {
            Ok(FluidState::new(1, &[0.018]))
        }
    }

    #[test]
    fn to_dim_matrix_works() {
        let kk = to_dim_matrix(3, 2.0);
        assert_eq!(
            format!("{}", kk),
            "┌       ┐\n\
             │ 2 0 0 │\n\
             │ 0 2 0 │\n\
             │ 0 0 2 │\n\
             └       ┘"
        );
    }

    #[test]
    fn defaults_work() {
        let grid = FvGrid::new(&SampleMeshes::two_qua4()).unwrap();
        let cell = &grid.cells[0];
        let face = &grid.boundary_faces[0];
        let problem = Minimal {};
        assert_eq!(
            problem.intrinsic_permeability(cell).err(),
            Some("not implemented: Problem::intrinsic_permeability()")
        );
        assert_eq!(problem.porosity(cell).err(), Some("not implemented: Problem::porosity()"));
        assert_eq!(
            problem.heat_capacity_solid(cell).err(),
            Some("not implemented: Problem::heat_capacity_solid()")
        );
        assert_eq!(
            problem.heat_conduction_params(cell).err(),
            Some("not implemented: Problem::heat_conduction_params()")
        );
        assert_eq!(problem.tortuosity(cell).err(), Some("not implemented: Problem::tortuosity()"));
        assert_eq!(problem.dispersivity(cell).err(), Some("not implemented: Problem::dispersivity()"));
        assert_eq!(problem.temperature().err(), Some("not implemented: Problem::temperature()"));
        assert_eq!(
            problem.cell_temperature(cell).err(),
            Some("not implemented: Problem::temperature()")
        );
        assert!(matches!(problem.material_law_params(cell).unwrap(), ParamMaterialLaw::Null));
        assert!(matches!(problem.boundary(face, 0.0).unwrap(), BoundaryCondition::NoFlow));
        let mut rates = vec![1.0, 2.0];
        problem.source(cell, 0.0, &mut rates).unwrap();
        assert_eq!(rates, &[1.0, 2.0]);

        let mut config = Config::new();
        assert_eq!(problem.gravity(&config, 2), &[0.0, -9.81]);
        config.set_gravity(false);
        assert_eq!(problem.gravity(&config, 3), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn intersection_intrinsic_permeability_works() {
        let problem = Minimal {};
        let k_i = to_dim_matrix(2, 1.0);
        let mut k_j = to_dim_matrix(2, 3.0);
        k_j.set(1, 1, 0.0);
        let kk = problem.intersection_intrinsic_permeability(&k_i, &k_j);
        assert_eq!(kk.get(0, 0), 1.5);
        assert_eq!(kk.get(1, 1), 0.0);
        assert_eq!(kk.get(0, 1), 0.0);
    }
}
