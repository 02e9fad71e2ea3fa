use super::FvGrid;
use crate::base::Config;
use crate::models::{Model, SoilData, VolumeVariables};
use crate::problem::{BoundaryCondition, Problem};
use crate::util::{arithmetic_mean, harmonic_mean};
use crate::StrError;
use russell_lab::Vector;
use russell_sparse::SparseMatrix;

/// Holds the boundary data of a boundary face at the current time
enum BoundaryData<V> {
    NoFlow,
    Dirichlet(V),
    Neumann(Vec<f64>),
}

/// Assembles the discrete balance equations of all control volumes
///
/// The residual of control volume `i` is
///
/// ```text
///       Vᵢ (Sᵢ(u) - Sᵢ(u_old))
/// Rᵢ = ——————————————————————— + Σ_f F_f(u) - Vᵢ qᵢ
///               Δt
/// ```
///
/// where `S` is the storage term, `F_f` the flux through face `f` (positive when leaving
/// the control volume), and `q` the source term. The fluxes use the two-point approximation
/// with phase-potential upwinding.
pub struct Assembler<'a, M: Model> {
    grid: &'a FvGrid,
    soil: &'a SoilData,
    problem: &'a dyn Problem,
    model: &'a M,
    base_epsilon: f64,
    n_equation: usize,
    storage_old: Vec<f64>,
    boundary: Vec<BoundaryData<M::Vars>>,
    sources: Vec<f64>,

    /// Holds the volume variables at the current iterate
    pub vars: Vec<M::Vars>,

    /// Holds the volume variables at the beginning of the time step
    pub vars_old: Vec<M::Vars>,
}

impl<'a, M: Model> Assembler<'a, M> {
    /// Allocates a new instance
    pub fn new(
        grid: &'a FvGrid,
        soil: &'a SoilData,
        problem: &'a dyn Problem,
        model: &'a M,
        config: &Config,
    ) -> Result<Self, StrError> {
        if soil.cells.len() != grid.n_cell() {
            return Err("the soil data is incompatible with the grid");
        }
        let n_equation = model.n_equation();
        Ok(Assembler {
            grid,
            soil,
            problem,
            model,
            base_epsilon: config.base_epsilon,
            n_equation,
            storage_old: vec![0.0; grid.n_cell() * n_equation],
            boundary: Vec::new(),
            sources: vec![0.0; grid.n_cell() * n_equation],
            vars: Vec::new(),
            vars_old: Vec::new(),
        })
    }

    /// Computes the volume variables from scratch (no hints)
    pub fn initialize(&mut self, uu: &Vector) -> Result<(), StrError> {
        let neq = self.n_equation;
        if uu.dim() != self.grid.n_cell() * neq {
            return Err("the vector of primary variables is incompatible with the grid");
        }
        let mut vars = Vec::with_capacity(self.grid.n_cell());
        for i in 0..self.grid.n_cell() {
            let pvs = &uu.as_data()[i * neq..(i + 1) * neq];
            vars.push(self.model.volume_variables(i, pvs, None)?);
        }
        self.vars_old = vars.clone();
        self.vars = vars;
        Ok(())
    }

    /// Updates the volume variables at the current iterate
    ///
    /// The previous volume variables are used as hints.
    pub fn update_vars(&mut self, uu: &Vector) -> Result<(), StrError> {
        let neq = self.n_equation;
        for i in 0..self.grid.n_cell() {
            let pvs = &uu.as_data()[i * neq..(i + 1) * neq];
            let vv = self.model.volume_variables(i, pvs, Some(&self.vars[i]))?;
            self.vars[i] = vv;
        }
        Ok(())
    }

    /// Stores the storage terms and volume variables at the beginning of a time step
    pub fn begin_step(&mut self) {
        let neq = self.n_equation;
        for i in 0..self.grid.n_cell() {
            let (a, b) = (i * neq, (i + 1) * neq);
            Self::storage(self.model, &self.vars[i], &mut self.storage_old[a..b]);
        }
        self.vars_old.clone_from(&self.vars);
    }

    /// Restores the volume variables at the beginning of the time step (e.g., after a failed attempt)
    pub fn restore(&mut self) {
        self.vars.clone_from(&self.vars_old);
    }

    /// Evaluates the boundary conditions and source terms at time t
    pub fn update_conditions(&mut self, t: f64) -> Result<(), StrError> {
        let neq = self.n_equation;
        self.boundary.clear();
        for face in &self.grid.boundary_faces {
            let data = match self.problem.boundary(face, t)? {
                BoundaryCondition::NoFlow => BoundaryData::NoFlow,
                BoundaryCondition::Dirichlet(fs) => {
                    BoundaryData::Dirichlet(self.model.boundary_volume_variables(face.cell, &fs)?)
                }
                BoundaryCondition::Neumann {
                    mass_rates,
                    energy_rate,
                } => {
                    let mut rates = vec![0.0; neq];
                    self.model.neumann_rates(&mut rates, &mass_rates, energy_rate)?;
                    BoundaryData::Neumann(rates)
                }
            };
            self.boundary.push(data);
        }
        for (i, cell) in self.grid.cells.iter().enumerate() {
            let q = &mut self.sources[i * neq..(i + 1) * neq];
            q.fill(0.0);
            self.problem.source(cell, t, q)?;
        }
        Ok(())
    }

    /// Returns the total amount of each conserved quantity in the domain
    ///
    /// The amounts are the sum of `V S` over all control volumes.
    pub fn total_storage(&self) -> Vec<f64> {
        let neq = self.n_equation;
        let mut total = vec![0.0; neq];
        let mut local = vec![0.0; neq];
        for (i, cell) in self.grid.cells.iter().enumerate() {
            Self::storage(self.model, &self.vars[i], &mut local);
            for e in 0..neq {
                total[e] += cell.volume * local[e];
            }
        }
        total
    }

    /// Calculates the global residual vector
    pub fn residual(&self, rr: &mut Vector, dt: f64) -> Result<(), StrError> {
        if dt <= 0.0 {
            return Err("Δt must be positive");
        }
        if self.boundary.len() != self.grid.boundary_faces.len() {
            return Err("the boundary conditions must be updated first");
        }
        let neq = self.n_equation;
        let mut local = vec![0.0; neq];
        for i in 0..self.grid.n_cell() {
            self.cell_residual(i, None, dt, &mut local);
            for e in 0..neq {
                rr[i * neq + e] = local[e];
            }
        }
        Ok(())
    }

    /// Calculates the global Jacobian matrix by central finite differences
    ///
    /// Only the volume variables of the perturbed control volume are recomputed; thus, only the
    /// residuals of the control volume and its neighbours change.
    pub fn jacobian(&self, kk: &mut SparseMatrix, uu: &Vector, dt: f64) -> Result<(), StrError> {
        if dt <= 0.0 {
            return Err("Δt must be positive");
        }
        let neq = self.n_equation;
        let mut r_plus = vec![0.0; neq];
        let mut r_minus = vec![0.0; neq];
        let mut pvs = vec![0.0; neq];
        kk.reset()?;
        for i in 0..self.grid.n_cell() {
            let cell = &self.grid.cells[i];
            for k in 0..neq {
                pvs.copy_from_slice(&uu.as_data()[i * neq..(i + 1) * neq]);
                let u = pvs[k];
                let eps = self.base_epsilon * (f64::abs(u) + 1.0);
                pvs[k] = u + eps;
                let v_plus = self.model.volume_variables(i, &pvs, Some(&self.vars[i]))?;
                pvs[k] = u - eps;
                let v_minus = self.model.volume_variables(i, &pvs, Some(&self.vars[i]))?;
                let stencil = std::iter::once(i).chain(cell.neighbors.iter().copied());
                for j in stencil {
                    self.cell_residual(j, Some((i, &v_plus)), dt, &mut r_plus);
                    self.cell_residual(j, Some((i, &v_minus)), dt, &mut r_minus);
                    for e in 0..neq {
                        let value = (r_plus[e] - r_minus[e]) / (2.0 * eps);
                        kk.put(j * neq + e, i * neq + k, value)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns the volume variables of a control volume, possibly replaced by a perturbed version
    fn var<'b>(&'b self, cell: usize, perturbed: Option<(usize, &'b M::Vars)>) -> &'b M::Vars {
        match perturbed {
            Some((p, vv)) if p == cell => vv,
            _ => &self.vars[cell],
        }
    }

    /// Calculates the storage terms (amount per unit volume)
    ///
    /// ```text
    /// Sκ = φ Σα Sα ρα Xακ
    /// Sₑ = φ Σα Sα ρα uα + (1 - φ) cₛ T
    /// ```
    fn storage(model: &M, vv: &M::Vars, out: &mut [f64]) {
        let fs = vv.fluid_state();
        let phi = vv.porosity();
        let nc = model.n_component_equation();
        for kappa in 0..nc {
            out[kappa] = 0.0;
            for alpha in 0..fs.n_phase() {
                out[kappa] += phi * fs.saturation[alpha] * vv.component_density(alpha, kappa);
            }
        }
        if model.energy_enabled() {
            let mut energy = (1.0 - phi) * vv.heat_capacity_solid() * fs.temperature;
            for alpha in 0..fs.n_phase() {
                energy += phi * fs.saturation[alpha] * fs.density[alpha] * fs.internal_energy(alpha);
            }
            out[nc] = energy;
        }
    }

    /// Calculates the residual of a control volume
    fn cell_residual(&self, i: usize, perturbed: Option<(usize, &M::Vars)>, dt: f64, res: &mut [f64]) {
        let neq = self.n_equation;
        let cell = &self.grid.cells[i];
        let vi = self.var(i, perturbed);

        // storage
        Self::storage(self.model, vi, res);
        for e in 0..neq {
            res[e] = cell.volume * (res[e] - self.storage_old[i * neq + e]) / dt;
        }

        // interior faces
        let mut flux = vec![0.0; neq];
        for f in &cell.faces {
            let face = &self.grid.faces[*f];
            let [a, b] = face.cells;
            let (va, vb) = (self.var(a, perturbed), self.var(b, perturbed));
            let xa = &self.grid.cells[a].centroid;
            let xb = &self.grid.cells[b].centroid;
            let kn = self.soil.face_kn[*f];
            self.flux(va, vb, xa, xb, face.area, kn, face.distance, &mut flux);
            let sign = if a == i { 1.0 } else { -1.0 };
            for e in 0..neq {
                res[e] += sign * flux[e];
            }
        }

        // boundary faces
        for f in &cell.boundary_faces {
            let face = &self.grid.boundary_faces[*f];
            match &self.boundary[*f] {
                BoundaryData::NoFlow => (),
                BoundaryData::Dirichlet(vb) => {
                    let kn = self.soil.boundary_kn[*f];
                    self.flux(vi, vb, &cell.centroid, &face.centroid, face.area, kn, face.distance, &mut flux);
                    for e in 0..neq {
                        res[e] += flux[e];
                    }
                }
                BoundaryData::Neumann(rates) => {
                    for e in 0..neq {
                        res[e] += rates[e] * face.area;
                    }
                }
            }
        }

        // sources
        for e in 0..neq {
            res[e] -= cell.volume * self.sources[i * neq + e];
        }
    }

    /// Calculates the fluxes from `a` to `b` through a face
    ///
    /// The advective flux of phase α is
    ///
    /// ```text
    ///              kn A
    /// Qα = - λα ——————— [(pα_b - pα_a) - ρα g·(x_b - x_a)]
    ///               d
    /// ```
    ///
    /// where the mobility λα is taken from the upstream control volume.
    fn flux(
        &self,
        va: &M::Vars,
        vb: &M::Vars,
        xa: &[f64],
        xb: &[f64],
        area: f64,
        kn: f64,
        distance: f64,
        out: &mut [f64],
    ) {
        out.fill(0.0);
        let (fa, fb) = (va.fluid_state(), vb.fluid_state());
        let nc = self.model.n_component_equation();
        let energy = self.model.energy_enabled();
        let gravity = &self.soil.gravity;
        let mut g_dx = 0.0;
        for d in 0..gravity.len() {
            g_dx += gravity[d] * (xb[d] - xa[d]);
        }
        let transmissibility = kn * area / distance;
        for alpha in 0..fa.n_phase() {
            // advection
            let rho = arithmetic_mean(fa.density[alpha], fb.density[alpha]);
            let potential = (fb.pressure[alpha] - fa.pressure[alpha]) - rho * g_dx;
            let q = -transmissibility * potential;
            let up = if q > 0.0 { va } else { vb };
            let flow = up.mobility(alpha) * q;
            for kappa in 0..nc {
                out[kappa] += flow * up.component_density(alpha, kappa);
            }
            if energy {
                let fs_up = up.fluid_state();
                out[nc] += flow * fs_up.density[alpha] * fs_up.enthalpy[alpha];
            }

            // diffusion and dispersion
            if self.model.diffusion_enabled() {
                let dispersion = match (va.dispersivity(), vb.dispersivity()) {
                    (Some(da), Some(db)) => arithmetic_mean(da, db) * f64::abs(flow) / area,
                    _ => 0.0,
                };
                let density = arithmetic_mean(va.equation_density(alpha), vb.equation_density(alpha));
                for kappa in 0..nc {
                    let coef = harmonic_mean(
                        va.effective_diffusion(alpha, kappa),
                        vb.effective_diffusion(alpha, kappa),
                    ) + dispersion;
                    let dx = vb.equation_fraction(alpha, kappa) - va.equation_fraction(alpha, kappa);
                    out[kappa] -= coef * density * dx * area / distance;
                }
            }
        }

        // heat conduction
        if energy {
            let lambda = harmonic_mean(va.heat_conductivity(), vb.heat_conductivity());
            out[nc] -= lambda * area * (fb.temperature - fa.temperature) / distance;
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
