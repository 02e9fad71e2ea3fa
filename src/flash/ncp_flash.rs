use crate::fluid::{FluidState, FluidSystem};
use crate::material::MaterialLaw;
use crate::StrError;
use russell_lab::{solve_lin_sys, vec_norm, Matrix, Norm, Vector};

/// Pressure used by the initial guess (1 bar)
const GUESS_PRESSURE: f64 = 1e5;

/// Maximum change of saturations in one iteration
const MAX_DELTA_SATURATION: f64 = 0.2;

/// Maximum change of mole fractions in one iteration
const MAX_DELTA_MOLE_FRACTION: f64 = 0.15;

/// Maximum relative change of the pressure in one iteration
const MAX_DELTA_PRESSURE_REL: f64 = 0.5;

/// Computes the phase equilibrium given the total molar concentrations (NCP flash)
///
/// The unknowns are the pressure of phase 0, the saturations of the first M-1 phases,
/// and the mole fractions of all components in all phases:
///
/// ```text
/// u = { p₀, S₀ … S_{M-2}, x₀⁰ … x_{M-1}^{N-1} }
/// ```
///
/// The equations are:
///
/// ```text
/// Σα Sα ρ̂α xακ = cκ                   (N equations; total concentrations)
/// f₀κ = fακ          α = 1 … M-1      (N(M-1) equations; chemical equilibrium)
/// min(Sα, 1 - Σκ xακ) = 0             (M equations; phase presence)
/// ```
///
/// The last set of equations is the non-linear complementarity (NCP) condition: either a phase
/// is present (Sα > 0) and its mole fractions sum up to one, or the phase is absent (Sα = 0).
///
/// The temperature of the fluid state is never modified.
pub struct NcpFlash {}

/// Holds the workspace of the flash solver
struct Workspace {
    n_phase: usize,
    n_comp: usize,
    c_sum: f64,
    p_scale: f64,
    pc: Vec<f64>,
}

impl NcpFlash {
    /// Computes a simple initial guess
    ///
    /// All phases receive the overall composition `cκ / Σc`, the pressure is 1 bar,
    /// and the saturations are equal to `1/M`. The fugacity coefficients are updated.
    pub fn guess_initial<F>(fs: &mut FluidState, fluid: &F, c_total: &[f64]) -> Result<(), StrError>
    where
        F: FluidSystem + ?Sized,
    {
        let n_phase = fs.n_phase();
        let n_comp = fs.n_component();
        if c_total.len() != n_comp {
            return Err("the number of total concentrations must equal the number of components");
        }
        let c_sum: f64 = c_total.iter().sum();
        if !(c_sum > 0.0) {
            return Err("the sum of the total concentrations must be positive");
        }
        for alpha in 0..n_phase {
            for kappa in 0..n_comp {
                fs.mole_fraction[alpha][kappa] = c_total[kappa] / c_sum;
            }
            fs.pressure[alpha] = GUESS_PRESSURE;
            fs.saturation[alpha] = 1.0 / (n_phase as f64);
        }
        fluid.update_densities_and_fugacities(fs);
        Ok(())
    }

    /// Solves the flash problem starting from the values in the fluid state
    ///
    /// On success, the fluid state holds the equilibrium pressures, saturations, compositions,
    /// and all properties computed by the fluid system. Returns the number of iterations.
    ///
    /// # Input
    ///
    /// * `fs` -- the fluid state with the initial guess (temperature already set)
    /// * `fluid` -- the fluid system
    /// * `material` -- the capillary pressure law
    /// * `c_total` -- the total molar concentrations of each component (mol per m³ of pore space)
    /// * `tolerance` -- tolerance on the scaled residuals and on the Newton update
    /// * `max_iterations` -- maximum number of Newton iterations
    pub fn solve<F>(
        fs: &mut FluidState,
        fluid: &F,
        material: &MaterialLaw,
        c_total: &[f64],
        tolerance: f64,
        max_iterations: usize,
    ) -> Result<usize, StrError>
    where
        F: FluidSystem + ?Sized,
    {
        // check
        let n_phase = fs.n_phase();
        let n_comp = fs.n_component();
        if fluid.n_phase() != n_phase || fluid.n_component() != n_comp {
            return Err("the fluid state is incompatible with the fluid system");
        }
        if c_total.len() != n_comp {
            return Err("the number of total concentrations must equal the number of components");
        }
        let c_sum: f64 = c_total.iter().sum();
        if !(c_sum > 0.0) || !c_sum.is_finite() {
            return Err("the sum of the total concentrations must be positive");
        }
        material.check_n_phase(n_phase)?;

        // workspace
        let mut ws = Workspace {
            n_phase,
            n_comp,
            c_sum,
            p_scale: f64::max(f64::abs(fs.pressure[0]), GUESS_PRESSURE),
            pc: vec![0.0; n_phase],
        };
        let n_unknown = n_phase * n_comp + n_phase;
        let mut uu = Vector::new(n_unknown);
        let mut rr = Vector::new(n_unknown);
        let mut rr_pert = Vector::new(n_unknown);
        let mut jj = Matrix::new(n_unknown, n_unknown);

        // initial values
        uu[0] = fs.pressure[0];
        for alpha in 0..(n_phase - 1) {
            uu[1 + alpha] = fs.saturation[alpha];
        }
        for alpha in 0..n_phase {
            for kappa in 0..n_comp {
                uu[n_phase + alpha * n_comp + kappa] = fs.mole_fraction[alpha][kappa];
            }
        }

        // Newton-Raphson iterations
        for it in 0..max_iterations {
            // residual (scaled equations)
            NcpFlash::residual(&mut rr, &uu, fs, fluid, material, c_total, &mut ws)?;
            let norm_rr = vec_norm(&rr, Norm::Max);
            if !norm_rr.is_finite() {
                return Err("NCP flash: found NaN or Inf");
            }
            if norm_rr < tolerance {
                fluid.update_all(fs);
                return Ok(it);
            }

            // Jacobian (forward differences)
            for j in 0..n_unknown {
                let original = uu[j];
                let h = 1.5e-8 * f64::max(f64::abs(original), 1.0);
                uu[j] = original + h;
                NcpFlash::residual(&mut rr_pert, &uu, fs, fluid, material, c_total, &mut ws)?;
                uu[j] = original;
                for i in 0..n_unknown {
                    jj.set(i, j, (rr_pert[i] - rr[i]) / h);
                }
            }

            // solve J δ = R (the solution overwrites rr)
            solve_lin_sys(&mut rr, &mut jj).map_err(|_| "NCP flash: cannot solve the linear system")?;

            // update with limited steps and compute the error
            let mut error = 0.0;
            for j in 0..n_unknown {
                let mut delta = rr[j];
                if !delta.is_finite() {
                    return Err("NCP flash: found NaN or Inf");
                }
                if j == 0 {
                    let lim = MAX_DELTA_PRESSURE_REL * f64::max(f64::abs(uu[0]), GUESS_PRESSURE);
                    delta = delta.clamp(-lim, lim);
                    error = f64::max(error, f64::abs(delta) / f64::max(f64::abs(uu[0]), 1.0));
                } else if j < n_phase {
                    delta = delta.clamp(-MAX_DELTA_SATURATION, MAX_DELTA_SATURATION);
                    error = f64::max(error, f64::abs(delta));
                } else {
                    delta = delta.clamp(-MAX_DELTA_MOLE_FRACTION, MAX_DELTA_MOLE_FRACTION);
                    error = f64::max(error, f64::abs(delta));
                }
                uu[j] -= delta;
            }

            // check convergence
            if error < tolerance {
                NcpFlash::set_state(fs, &uu, fluid, material, &mut ws)?;
                fluid.update_all(fs);
                return Ok(it + 1);
            }
        }
        Err("NCP flash did not converge")
    }

    /// Sets the fluid state from the vector of unknowns and updates the properties needed by the flash
    fn set_state<F>(
        fs: &mut FluidState,
        uu: &Vector,
        fluid: &F,
        material: &MaterialLaw,
        ws: &mut Workspace,
    ) -> Result<(), StrError>
    where
        F: FluidSystem + ?Sized,
    {
        let (m, n) = (ws.n_phase, ws.n_comp);
        let mut s_last = 1.0;
        for alpha in 0..(m - 1) {
            fs.saturation[alpha] = uu[1 + alpha];
            s_last -= uu[1 + alpha];
        }
        fs.saturation[m - 1] = s_last;
        for alpha in 0..m {
            for kappa in 0..n {
                fs.mole_fraction[alpha][kappa] = uu[m + alpha * n + kappa];
            }
        }
        material.capillary_pressures(&mut ws.pc, fs)?;
        for alpha in 0..m {
            fs.pressure[alpha] = uu[0] + ws.pc[alpha];
        }
        fluid.update_densities_and_fugacities(fs);
        Ok(())
    }

    /// Calculates the residual vector of the flash equations
    fn residual<F>(
        rr: &mut Vector,
        uu: &Vector,
        fs: &mut FluidState,
        fluid: &F,
        material: &MaterialLaw,
        c_total: &[f64],
        ws: &mut Workspace,
    ) -> Result<(), StrError>
    where
        F: FluidSystem + ?Sized,
    {
        NcpFlash::set_state(fs, uu, fluid, material, ws)?;
        let (m, n) = (ws.n_phase, ws.n_comp);

        // total concentrations
        for kappa in 0..n {
            let mut c = 0.0;
            for alpha in 0..m {
                c += fs.saturation[alpha] * fs.molar_density[alpha] * fs.mole_fraction[alpha][kappa];
            }
            rr[kappa] = (c - c_total[kappa]) / ws.c_sum;
        }

        // chemical equilibrium with respect to phase 0
        for alpha in 1..m {
            for kappa in 0..n {
                let f0 = fs.fugacity(0, kappa);
                let fa = fs.fugacity(alpha, kappa);
                rr[n + (alpha - 1) * n + kappa] = (f0 - fa) / ws.p_scale;
            }
        }

        // phase presence (NCP)
        for alpha in 0..m {
            let a = fs.saturation[alpha];
            let b = 1.0 - fs.sum_mole_fractions(alpha);
            rr[m * n + alpha] = f64::min(a, b);
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::NcpFlash;
    use crate::base::ParamMaterialLaw;
    use crate::fluid::{FluidState, FluidSystem, H2oN2FluidSystem};
    use crate::material::MaterialLaw;
    use russell_lab::approx_eq;

    /// Computes the total concentrations of a fluid state
    fn total_concentrations(fs: &FluidState) -> Vec<f64> {
        (0..fs.n_component())
            .map(|kappa| {
                (0..fs.n_phase())
                    .map(|alpha| fs.saturation[alpha] * fs.molarity(alpha, kappa))
                    .sum()
            })
            .collect()
    }

    #[test]
    fn guess_initial_captures_errors() {
        let fluid = H2oN2FluidSystem::new();
        let mut fs = fluid.new_fluid_state();
        fs.temperature = 283.15;
        assert_eq!(
            NcpFlash::guess_initial(&mut fs, &fluid, &[1.0]).err(),
            Some("the number of total concentrations must equal the number of components")
        );
        assert_eq!(
            NcpFlash::guess_initial(&mut fs, &fluid, &[0.0, 0.0]).err(),
            Some("the sum of the total concentrations must be positive")
        );
    }

    #[test]
    fn guess_initial_works() {
        let fluid = H2oN2FluidSystem::new();
        let mut fs = fluid.new_fluid_state();
        fs.temperature = 283.15;
        NcpFlash::guess_initial(&mut fs, &fluid, &[3.0, 1.0]).unwrap();
        assert_eq!(fs.pressure, &[1e5, 1e5]);
        assert_eq!(fs.saturation, &[0.5, 0.5]);
        assert_eq!(fs.mole_fraction, &[[0.75, 0.25], [0.75, 0.25]]);
        assert_eq!(fs.fugacity_coef[1], &[1.0, 1.0]);
        assert_eq!(fs.temperature, 283.15);
    }

    #[test]
    fn solve_captures_errors() {
        let fluid = H2oN2FluidSystem::new();
        let material = MaterialLaw::new(&ParamMaterialLaw::Null).unwrap();
        let mut fs = fluid.new_fluid_state();
        fs.temperature = 283.15;
        assert_eq!(
            NcpFlash::solve(&mut fs, &fluid, &material, &[-1.0, 0.0], 1e-8, 10).err(),
            Some("the sum of the total concentrations must be positive")
        );
        let mut fs3 = FluidState::new(3, &[0.018, 0.028]);
        assert_eq!(
            NcpFlash::solve(&mut fs3, &fluid, &material, &[1.0, 1.0], 1e-8, 10).err(),
            Some("the fluid state is incompatible with the fluid system")
        );
    }

    #[test]
    fn solve_two_phase_works() {
        // reference state: liquid and gas in equilibrium
        let fluid = H2oN2FluidSystem::new();
        let material = MaterialLaw::new(&ParamMaterialLaw::Null).unwrap();
        let t = 283.15;
        let p = 2e5;
        let pv = H2oN2FluidSystem::vapor_pressure(t);
        let hh = H2oN2FluidSystem::henry(t);
        // x_w pv + x_n H = p with y_w = x_w pv/p and y_n = x_n H/p (Raoult/Henry)
        // y_w + y_n = 1 and x_w + x_n = 1  ⇒  x_n = (p - pv)/(H - pv)
        let x_n = (p - pv) / (hh - pv);
        let x_w = 1.0 - x_n;
        let mut reference = fluid.new_fluid_state();
        reference.temperature = t;
        reference.pressure = vec![p, p];
        reference.saturation = vec![0.6, 0.4];
        reference.mole_fraction = vec![vec![x_w, x_n], vec![x_w * pv / p, x_n * hh / p]];
        fluid.update_all(&mut reference);
        let c_total = total_concentrations(&reference);

        // flash from the initial guess
        let mut fs = fluid.new_fluid_state();
        fs.temperature = t;
        NcpFlash::guess_initial(&mut fs, &fluid, &c_total).unwrap();
        NcpFlash::solve(&mut fs, &fluid, &material, &c_total, 1e-10, 250).unwrap();
        approx_eq(fs.pressure[0], p, 1.0);
        approx_eq(fs.saturation[0], 0.6, 1e-6);
        approx_eq(fs.saturation[1], 0.4, 1e-6);
        approx_eq(fs.mole_fraction[0][1], x_n, 1e-8);
        approx_eq(fs.mole_fraction[1][0], x_w * pv / p, 1e-6);
        assert_eq!(fs.temperature, t);
        assert!(fs.viscosity[0] > 0.0);

        // flash from the previous solution (thermodynamic hint) converges quickly
        let mut hint = fs.clone();
        let n_it = NcpFlash::solve(&mut hint, &fluid, &material, &c_total, 1e-10, 250).unwrap();
        assert!(n_it <= 3);
    }

    #[test]
    fn solve_liquid_only_works() {
        // pure water with a trace of dissolved nitrogen: the gas phase must vanish
        let fluid = H2oN2FluidSystem::new();
        let param = ParamMaterialLaw::BrooksCorey {
            lambda: 2.0,
            pe: 1e4,
            swr: 0.2,
            snr: 0.05,
        };
        let material = MaterialLaw::new(&param).unwrap();
        let t = 283.15;
        let p = 3e5;
        let mut reference = fluid.new_fluid_state();
        reference.temperature = t;
        reference.pressure = vec![p, p];
        reference.saturation = vec![1.0, 0.0];
        reference.mole_fraction = vec![vec![1.0 - 1e-6, 1e-6], vec![0.0, 0.0]];
        fluid.update_all(&mut reference);
        let c_total = total_concentrations(&reference);

        // start from a perturbed state (as with a thermodynamic hint)
        let mut fs = reference.clone();
        fs.pressure = vec![0.95 * p, 0.95 * p];
        fs.saturation = vec![0.9, 0.1];
        fs.mole_fraction[1] = vec![0.5, 0.5];
        fluid.update_densities_and_fugacities(&mut fs);
        NcpFlash::solve(&mut fs, &fluid, &material, &c_total, 1e-10, 250).unwrap();
        approx_eq(fs.saturation[0], 1.0, 1e-8);
        approx_eq(fs.saturation[1], 0.0, 1e-8);
        approx_eq(fs.pressure[0], p, 1.0);
        approx_eq(fs.mole_fraction[0][1], 1e-6, 1e-10);
        assert!(fs.sum_mole_fractions(1) < 1.0);
    }
}
