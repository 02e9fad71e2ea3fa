use crate::base::Config;
use crate::StrError;
use russell_lab::{vec_copy, vec_max_scaled, vec_norm, Norm, Vector};

/// Controls the convergence of the Newton-Raphson iterations
///
/// Two criteria are tracked: the max-norm of the residual vector (`norm_rr`) and the
/// max-norm of the correction scaled by the first correction of the time step (`rel_mdu`).
/// The controller also counts the failed attempts (time step reductions) of the current step.
pub struct ControlConvergence<'a> {
    config: &'a Config,
    iteration: usize,
    norm_rr_prev: f64,
    norm_rr: f64,
    mdu0: Vector,
    norm_mdu: f64,
    rel_mdu_prev: f64,
    rel_mdu: f64,
    converged_on_norm_rr: bool,
    diverging_on_norm_rr: bool,
    converged_on_rel_mdu: bool,
    diverging_on_rel_mdu: bool,
    n_converged_total: usize,
    n_failed_total: usize,
    n_failed_per_step: usize,
}

impl<'a> ControlConvergence<'a> {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `config` -- configuration parameters with the tolerances
    /// * `neq_total` -- total number of equations
    pub fn new(config: &'a Config, neq_total: usize) -> Self {
        ControlConvergence {
            config,
            iteration: 0,
            norm_rr_prev: 0.0,
            norm_rr: 0.0,
            mdu0: Vector::new(neq_total),
            norm_mdu: 0.0,
            rel_mdu_prev: 0.0,
            rel_mdu: 0.0,
            converged_on_norm_rr: false,
            diverging_on_norm_rr: false,
            converged_on_rel_mdu: false,
            diverging_on_rel_mdu: false,
            n_converged_total: 0,
            n_failed_total: 0,
            n_failed_per_step: 0,
        }
    }

    // setters

    /// Resets the flags at the beginning of a new time step
    pub fn reset(&mut self) {
        self.reset_attempt();
        self.n_failed_per_step = 0;
    }

    /// Resets the flags before a new attempt of the same time step
    pub fn reset_attempt(&mut self) {
        self.converged_on_norm_rr = false;
        self.diverging_on_norm_rr = false;
        self.converged_on_rel_mdu = false;
        self.diverging_on_rel_mdu = false;
    }

    /// Increments the number of converged time steps
    pub fn add_converged(&mut self) {
        self.n_converged_total += 1;
    }

    /// Increments the number of failed attempts
    pub fn add_failed(&mut self) {
        self.n_failed_total += 1;
        self.n_failed_per_step += 1;
    }

    // getters

    /// Indicates whether the number of failed attempts of the current step reached the allowed maximum
    pub fn too_many_failures(&self) -> bool {
        self.n_failed_per_step >= self.config.allowed_step_n_failure
    }

    /// Returns the number of converged time steps
    pub fn n_converged_total(&self) -> usize {
        self.n_converged_total
    }

    /// Returns the total number of failed attempts
    pub fn n_failed_total(&self) -> usize {
        self.n_failed_total
    }

    /// Indicates whether the residual norm is below the tolerance
    pub fn converged_on_norm_rr(&self) -> bool {
        self.converged_on_norm_rr
    }

    /// Indicates whether the relative correction is below the tolerance
    pub fn converged_on_rel_mdu(&self) -> bool {
        self.converged_on_rel_mdu
    }

    /// Indicates convergence on any criterion
    pub fn converged(&self) -> bool {
        self.converged_on_norm_rr || self.converged_on_rel_mdu
    }

    /// Returns the max-norm of the residual vector at the last iteration
    pub fn norm_rr(&self) -> f64 {
        self.norm_rr
    }

    // analysis

    /// Analyzes the residual vector
    pub(crate) fn analyze_rr(&mut self, iteration: usize, rr: &Vector) -> Result<(), StrError> {
        self.iteration = iteration;
        self.norm_rr = vec_norm(rr, Norm::Max);
        let found_nan_or_inf = !self.norm_rr.is_finite();
        self.converged_on_norm_rr = if found_nan_or_inf {
            false
        } else {
            self.norm_rr < self.config.tol_rr_abs
        };
        self.diverging_on_norm_rr = if found_nan_or_inf || iteration == 0 {
            false
        } else {
            self.norm_rr > self.norm_rr_prev
        };
        self.norm_rr_prev = self.norm_rr;
        if found_nan_or_inf {
            Err("Found NaN or Inf in the residual vector")
        } else {
            Ok(())
        }
    }

    /// Analyzes the correction vector (minus delta U)
    pub(crate) fn analyze_mdu(&mut self, iteration: usize, mdu: &Vector) -> Result<(), StrError> {
        self.norm_mdu = vec_norm(mdu, Norm::Max);
        let found_nan_or_inf = !self.norm_mdu.is_finite();
        if found_nan_or_inf {
            self.converged_on_rel_mdu = false;
            self.diverging_on_rel_mdu = false;
            return Err("Found NaN or Inf in mdu");
        }
        if iteration == 0 {
            vec_copy(&mut self.mdu0, mdu)?;
            self.rel_mdu = 1.0;
        }

        //                 /    |mduᵢ|    \
        // rel_mdu = max_i | ———————————— |
        //                 \ 1 + |mdu0ᵢ| /
        self.converged_on_rel_mdu = if iteration == 0 {
            false
        } else {
            self.rel_mdu = vec_max_scaled(mdu, &self.mdu0);
            self.rel_mdu < self.config.tol_mdu_rel
        };
        self.diverging_on_rel_mdu = if iteration < 2 {
            false
        } else {
            self.rel_mdu > self.rel_mdu_prev
        };
        self.rel_mdu_prev = self.rel_mdu;
        Ok(())
    }

    /// Prints the header of the convergence table
    pub fn print_header(&self) {
        if self.config.verbose_timesteps || self.config.verbose_iterations {
            println!("\nPMFV === TIME STEPPING AND CONVERGENCE STATISTICS =============================");
            println!("\nLegend:");
            println!("➖ ─ unknown");
            println!("✅ ─ converged");
            println!("🔹 ─ converging");
            println!("🎈 ─ diverging");
            println!("❌ ─ failed attempt (Δt is reduced)");
            println!("\"iter\" means iteration\n");
            println!("{}", "─".repeat(79));
            println!(
                "{:8} {:>11} {:>11} {:>5} {:>9} {:>9} ➖ {:>9} ➖",
                "timestep", "t", "Δt", "iter", "‖mdu‖∞", "rel(mdu)", "‖R‖∞"
            );
            println!("{}", "─".repeat(79));
        }
    }

    /// Prints the time step information
    pub(crate) fn print_timestep(&self, timestep: usize, t: f64, dt: f64) {
        if self.config.verbose_timesteps {
            println!("{:>8} {:>11.6e} {:>11.6e}", timestep + 1, t, dt);
        }
    }

    /// Prints the iteration information
    pub(crate) fn print_iteration(&self) {
        if self.config.verbose_iterations {
            let it = self.iteration;
            let icon_rr = if self.converged_on_norm_rr {
                "✅"
            } else if self.diverging_on_norm_rr {
                "🎈"
            } else {
                "🔹"
            };
            if self.iteration == 0 {
                println!(
                    "{:>8} {:>11} {:>11} {:>5} {:>9.2e} {:>9} ➖ {:>9.2e} {}",
                    "·", "·", "·", it, self.norm_mdu, "·", self.norm_rr, icon_rr
                );
            } else {
                let icon_mdu = if self.converged_on_rel_mdu {
                    "✅"
                } else if self.diverging_on_rel_mdu {
                    "🎈"
                } else {
                    "🔹"
                };
                println!(
                    "{:>8} {:>11} {:>11} {:>5} {:>9.2e} {:>9.2e} {} {:>9.2e} {}",
                    "·", "·", "·", it, self.norm_mdu, self.rel_mdu, icon_mdu, self.norm_rr, icon_rr
                );
            }
        }
    }

    /// Prints a failed attempt
    pub(crate) fn print_failure(&self, message: &str, dt_new: f64) {
        if self.config.verbose_timesteps || self.config.verbose_iterations {
            println!("{:>8} ❌ {} ⇒ new Δt = {:.6e}", "·", message, dt_new);
        }
    }

    /// Prints the horizontal line at the end of the simulation
    pub(crate) fn print_footer(&self) {
        if self.config.verbose_timesteps || self.config.verbose_iterations {
            println!("{}", "─".repeat(79));
            println!(
                "converged time steps = {}, failed attempts = {}",
                self.n_converged_total, self.n_failed_total
            );
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
