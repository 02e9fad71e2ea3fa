use super::GRAVITY;
use crate::StrError;
use russell_sparse::Genie;
use std::fmt;

/// Holds configuration parameters for the finite volume simulation
///
/// The feature switches (gravity, energy, diffusion) select which terms are
/// included in the balance equations. The remaining fields control the time
/// loop, the Newton-Raphson iterations, and the flash solver.
pub struct Config {
    /// Enables the gravity term in the phase potentials
    pub enable_gravity: bool,

    /// Enables the energy equation (non-isothermal models)
    pub enable_energy: bool,

    /// Enables molecular diffusion (compositional models)
    pub enable_diffusion: bool,

    /// Initial time
    pub t_ini: f64,

    /// Final time
    pub t_fin: f64,

    /// Time increment as a function of time
    pub dt: fn(t: f64) -> f64,

    /// Time increment for the output of results as a function of time
    pub dt_out: fn(t: f64) -> f64,

    /// Minimum allowed time increment
    pub dt_min: f64,

    /// Maximum number of time steps
    pub n_max_time_steps: usize,

    /// Maximum number of Newton-Raphson iterations per time step
    pub n_max_iterations: usize,

    /// Absolute tolerance for the max-norm of the residual vector
    pub tol_rr_abs: f64,

    /// Tolerance for the scaled max-norm of the Newton correction
    pub tol_mdu_rel: f64,

    /// Base epsilon for the finite difference approximation of the Jacobian matrix
    ///
    /// The perturbation of the primary variable `u` is `base_epsilon · (|u| + 1)`.
    pub base_epsilon: f64,

    /// Tolerance of the flash solver
    ///
    /// A value ≤ 0 means that the tolerance is derived from `base_epsilon`; see [Config::flash_tolerance()]
    pub flash_tolerance: f64,

    /// Maximum number of iterations of the flash solver
    pub flash_max_iterations: usize,

    /// Allowed number of failed attempts (time step reductions) per time step
    pub allowed_step_n_failure: usize,

    /// Factor multiplying Δt after a failed time step
    pub dt_reduction_factor: f64,

    /// Linear solver type
    pub lin_sol_genie: Genie,

    /// Shows messages for each time step
    pub verbose_timesteps: bool,

    /// Shows messages for each Newton-Raphson iteration
    pub verbose_iterations: bool,

    /// Shows the linear solver statistics
    pub verbose_lin_sys_solve: bool,
}

impl Config {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        Config {
            enable_gravity: true,
            enable_energy: false,
            enable_diffusion: false,
            t_ini: 0.0,
            t_fin: 1.0,
            dt: |_| 1.0,
            dt_out: |_| 1.0,
            dt_min: 1e-8,
            n_max_time_steps: 10_000,
            n_max_iterations: 14,
            tol_rr_abs: 1e-10,
            tol_mdu_rel: 1e-7,
            base_epsilon: 1e-7,
            flash_tolerance: -1.0,
            flash_max_iterations: 250,
            allowed_step_n_failure: 10,
            dt_reduction_factor: 0.5,
            lin_sol_genie: Genie::Umfpack,
            verbose_timesteps: false,
            verbose_iterations: false,
            verbose_lin_sys_solve: false,
        }
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if self.t_ini < 0.0 {
            return Some(format!("t_ini = {:?} is incorrect; it must be ≥ 0.0", self.t_ini));
        }
        if self.t_fin < self.t_ini {
            return Some(format!("t_fin = {:?} is incorrect; it must be ≥ t_ini = {:?}", self.t_fin, self.t_ini));
        }
        let dt = (self.dt)(self.t_ini);
        if dt < self.dt_min {
            return Some(format!("dt(t_ini) = {:?} is incorrect; it must be ≥ dt_min = {:?}", dt, self.dt_min));
        }
        if self.dt_min <= 0.0 {
            return Some(format!("dt_min = {:?} is incorrect; it must be > 0.0", self.dt_min));
        }
        if (self.dt_out)(self.t_ini) <= 0.0 {
            return Some(format!("dt_out(t_ini) = {:?} is incorrect; it must be > 0.0", (self.dt_out)(self.t_ini)));
        }
        if self.n_max_iterations < 1 {
            return Some(format!("n_max_iterations = {:?} is incorrect; it must be ≥ 1", self.n_max_iterations));
        }
        if self.tol_rr_abs <= 0.0 {
            return Some(format!("tol_rr_abs = {:?} is incorrect; it must be > 0.0", self.tol_rr_abs));
        }
        if self.tol_mdu_rel <= 0.0 {
            return Some(format!("tol_mdu_rel = {:?} is incorrect; it must be > 0.0", self.tol_mdu_rel));
        }
        if self.base_epsilon <= 0.0 || self.base_epsilon >= 1e-2 {
            return Some(format!(
                "base_epsilon = {:?} is incorrect; it must be in (0.0, 1e-2)",
                self.base_epsilon
            ));
        }
        if self.flash_max_iterations < 1 {
            return Some(format!(
                "flash_max_iterations = {:?} is incorrect; it must be ≥ 1",
                self.flash_max_iterations
            ));
        }
        if self.dt_reduction_factor <= 0.0 || self.dt_reduction_factor >= 1.0 {
            return Some(format!(
                "dt_reduction_factor = {:?} is incorrect; it must be in (0.0, 1.0)",
                self.dt_reduction_factor
            ));
        }
        None // all good
    }

    /// Returns the tolerance of the flash solver
    ///
    /// If `flash_tolerance ≤ 0`, the tolerance is derived from the finite difference epsilon:
    ///
    /// ```text
    /// tol = base_epsilon / (100 · 18e-3)
    /// ```
    pub fn flash_tolerance(&self) -> f64 {
        if self.flash_tolerance > 0.0 {
            self.flash_tolerance
        } else {
            self.base_epsilon / (100.0 * 18e-3)
        }
    }

    /// Enables or disables gravity
    pub fn set_gravity(&mut self, flag: bool) -> &mut Self {
        self.enable_gravity = flag;
        self
    }

    /// Enables or disables the energy equation
    pub fn set_energy(&mut self, flag: bool) -> &mut Self {
        self.enable_energy = flag;
        self
    }

    /// Enables or disables molecular diffusion
    pub fn set_diffusion(&mut self, flag: bool) -> &mut Self {
        self.enable_diffusion = flag;
        self
    }

    /// Sets the initial and final times
    pub fn set_t_ini_t_fin(&mut self, t_ini: f64, t_fin: f64) -> Result<&mut Self, StrError> {
        if t_ini < 0.0 {
            return Err("t_ini must be ≥ 0.0");
        }
        if t_fin < t_ini {
            return Err("t_fin must be ≥ t_ini");
        }
        self.t_ini = t_ini;
        self.t_fin = t_fin;
        Ok(self)
    }

    /// Sets the function to calculate the time increment
    pub fn set_dt(&mut self, dt: fn(t: f64) -> f64) -> &mut Self {
        self.dt = dt;
        self
    }

    /// Sets the function to calculate the output time increment
    pub fn set_dt_out(&mut self, dt_out: fn(t: f64) -> f64) -> &mut Self {
        self.dt_out = dt_out;
        self
    }

    /// Sets the minimum allowed time increment
    pub fn set_dt_min(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 {
            return Err("dt_min must be > 0.0");
        }
        self.dt_min = value;
        Ok(self)
    }

    /// Sets the maximum number of time steps
    pub fn set_n_max_time_steps(&mut self, value: usize) -> &mut Self {
        self.n_max_time_steps = value;
        self
    }

    /// Sets the maximum number of Newton-Raphson iterations
    pub fn set_n_max_iterations(&mut self, value: usize) -> Result<&mut Self, StrError> {
        if value < 1 {
            return Err("n_max_iterations must be ≥ 1");
        }
        self.n_max_iterations = value;
        Ok(self)
    }

    /// Sets the tolerances for the convergence of the Newton-Raphson iterations
    pub fn set_tolerances(&mut self, tol_rr_abs: f64, tol_mdu_rel: f64) -> Result<&mut Self, StrError> {
        if tol_rr_abs <= 0.0 {
            return Err("tol_rr_abs must be > 0.0");
        }
        if tol_mdu_rel <= 0.0 {
            return Err("tol_mdu_rel must be > 0.0");
        }
        self.tol_rr_abs = tol_rr_abs;
        self.tol_mdu_rel = tol_mdu_rel;
        Ok(self)
    }

    /// Sets the base epsilon of the finite difference Jacobian
    pub fn set_base_epsilon(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 || value >= 1e-2 {
            return Err("base_epsilon must be in (0.0, 1e-2)");
        }
        self.base_epsilon = value;
        Ok(self)
    }

    /// Sets the tolerance and the maximum number of iterations of the flash solver
    ///
    /// **Note:** A tolerance ≤ 0 means that the tolerance is derived from `base_epsilon`.
    pub fn set_flash(&mut self, tolerance: f64, max_iterations: usize) -> Result<&mut Self, StrError> {
        if max_iterations < 1 {
            return Err("flash_max_iterations must be ≥ 1");
        }
        self.flash_tolerance = tolerance;
        self.flash_max_iterations = max_iterations;
        Ok(self)
    }

    /// Sets the time step reduction strategy
    pub fn set_step_reduction(&mut self, allowed_n_failure: usize, factor: f64) -> Result<&mut Self, StrError> {
        if factor <= 0.0 || factor >= 1.0 {
            return Err("dt_reduction_factor must be in (0.0, 1.0)");
        }
        self.allowed_step_n_failure = allowed_n_failure;
        self.dt_reduction_factor = factor;
        Ok(self)
    }

    /// Sets the linear solver type
    pub fn set_lin_sol_genie(&mut self, genie: Genie) -> &mut Self {
        self.lin_sol_genie = genie;
        self
    }

    /// Sets the verbose mode for time steps and iterations
    pub fn set_verbose(&mut self, timesteps: bool, iterations: bool, lin_sys_solve: bool) -> &mut Self {
        self.verbose_timesteps = timesteps;
        self.verbose_iterations = iterations;
        self.verbose_lin_sys_solve = lin_sys_solve;
        self
    }

    /// Returns the gravity vector
    ///
    /// Gravity acts along the last coordinate: `(0, …, -9.81)` or zero if disabled.
    pub fn gravity(&self, ndim: usize) -> Vec<f64> {
        let mut g = vec![0.0; ndim];
        if self.enable_gravity && ndim > 0 {
            g[ndim - 1] = -GRAVITY;
        }
        g
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration data\n").unwrap();
        write!(f, "==================\n").unwrap();
        write!(f, "enable_gravity = {:?}\n", self.enable_gravity).unwrap();
        write!(f, "enable_energy = {:?}\n", self.enable_energy).unwrap();
        write!(f, "enable_diffusion = {:?}\n", self.enable_diffusion).unwrap();
        write!(f, "\nTime loop\n").unwrap();
        write!(f, "=========\n").unwrap();
        write!(f, "t_ini = {:?}\n", self.t_ini).unwrap();
        write!(f, "t_fin = {:?}\n", self.t_fin).unwrap();
        write!(f, "dt(t_ini) = {:?}\n", (self.dt)(self.t_ini)).unwrap();
        write!(f, "dt_out(t_ini) = {:?}\n", (self.dt_out)(self.t_ini)).unwrap();
        write!(f, "dt_min = {:?}\n", self.dt_min).unwrap();
        write!(f, "n_max_time_steps = {:?}\n", self.n_max_time_steps).unwrap();
        write!(f, "allowed_step_n_failure = {:?}\n", self.allowed_step_n_failure).unwrap();
        write!(f, "dt_reduction_factor = {:?}\n", self.dt_reduction_factor).unwrap();
        write!(f, "\nIterations\n").unwrap();
        write!(f, "==========\n").unwrap();
        write!(f, "n_max_iterations = {:?}\n", self.n_max_iterations).unwrap();
        write!(f, "tol_rr_abs = {:?}\n", self.tol_rr_abs).unwrap();
        write!(f, "tol_mdu_rel = {:?}\n", self.tol_mdu_rel).unwrap();
        write!(f, "base_epsilon = {:?}\n", self.base_epsilon).unwrap();
        write!(f, "flash_tolerance = {:?}\n", self.flash_tolerance()).unwrap();
        write!(f, "flash_max_iterations = {:?}\n", self.flash_max_iterations).unwrap();
        write!(f, "lin_sol_genie = {:?}\n", self.lin_sol_genie).unwrap();
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::StrError;
    use russell_lab::approx_eq;

    #[test]
    fn new_works() -> Result<(), StrError> {
        let mut config = Config::new();
        assert_eq!(config.validate(), None);
        assert_eq!(config.gravity(2), &[0.0, -9.81]);
        assert_eq!(config.gravity(3), &[0.0, 0.0, -9.81]);
        approx_eq(config.flash_tolerance(), 1e-7 / 1.8, 1e-20);

        config
            .set_gravity(false)
            .set_energy(true)
            .set_diffusion(true)
            .set_dt(|_| 0.5)
            .set_dt_out(|_| 2.0)
            .set_t_ini_t_fin(1.0, 10.0)?
            .set_tolerances(1e-8, 1e-6)?
            .set_flash(1e-9, 100)?
            .set_step_reduction(3, 0.25)?;
        assert_eq!(config.validate(), None);
        assert_eq!(config.gravity(2), &[0.0, 0.0]);
        assert_eq!(config.flash_tolerance(), 1e-9);

        let text = format!("{}", config);
        assert!(text.contains("enable_energy = true"));
        assert!(text.contains("dt(t_ini) = 0.5"));
        assert!(text.contains("dt_reduction_factor = 0.25"));
        Ok(())
    }

    #[test]
    fn setters_capture_errors() {
        let mut config = Config::new();
        assert_eq!(config.set_t_ini_t_fin(-1.0, 1.0).err(), Some("t_ini must be ≥ 0.0"));
        assert_eq!(config.set_t_ini_t_fin(2.0, 1.0).err(), Some("t_fin must be ≥ t_ini"));
        assert_eq!(config.set_dt_min(0.0).err(), Some("dt_min must be > 0.0"));
        assert_eq!(config.set_n_max_iterations(0).err(), Some("n_max_iterations must be ≥ 1"));
        assert_eq!(config.set_tolerances(0.0, 1.0).err(), Some("tol_rr_abs must be > 0.0"));
        assert_eq!(config.set_tolerances(1.0, 0.0).err(), Some("tol_mdu_rel must be > 0.0"));
        assert_eq!(config.set_base_epsilon(0.1).err(), Some("base_epsilon must be in (0.0, 1e-2)"));
        assert_eq!(config.set_flash(1e-8, 0).err(), Some("flash_max_iterations must be ≥ 1"));
        assert_eq!(
            config.set_step_reduction(2, 1.0).err(),
            Some("dt_reduction_factor must be in (0.0, 1.0)")
        );
    }

    #[test]
    fn validate_captures_errors() {
        let mut config = Config::new();
        config.t_ini = -1.0;
        assert_eq!(
            config.validate(),
            Some("t_ini = -1.0 is incorrect; it must be ≥ 0.0".to_string())
        );
        config.t_ini = 0.0;
        config.dt = |_| 1e-10;
        assert_eq!(
            config.validate(),
            Some("dt(t_ini) = 1e-10 is incorrect; it must be ≥ dt_min = 1e-8".to_string())
        );
        config.dt = |_| 1.0;
        config.dt_reduction_factor = 1.5;
        assert_eq!(
            config.validate(),
            Some("dt_reduction_factor = 1.5 is incorrect; it must be in (0.0, 1.0)".to_string())
        );
    }
}
