use super::{Assembler, ControlConvergence, FileIo, FvGrid, FvState, LinearSystem};
use crate::base::Config;
use crate::models::{Model, SoilData};
use crate::output::VtkOutput;
use crate::problem::Problem;
use crate::StrError;
use russell_lab::{vec_copy, vec_update};

/// Implements the fully implicit (backward Euler) finite volume solver
pub struct SolverImplicit<'a, M: Model> {
    /// Holds configuration parameters
    pub config: &'a Config,

    /// Holds the assembler of the discrete balance equations
    pub assembler: Assembler<'a, M>,

    /// Holds variables to solve the global linear system
    pub linear_system: LinearSystem<'a>,
}

impl<'a, M: Model> SolverImplicit<'a, M> {
    /// Allocates a new instance
    pub fn new(
        grid: &'a FvGrid,
        soil: &'a SoilData,
        problem: &'a dyn Problem,
        model: &'a M,
        config: &'a Config,
    ) -> Result<Self, StrError> {
        if let Some(msg) = config.validate() {
            println!("ERROR: {}", msg);
            return Err("cannot allocate simulation because config.validate() failed");
        }
        let assembler = Assembler::new(grid, soil, problem, model, config)?;
        let linear_system = LinearSystem::new(grid, config, model.n_equation())?;
        Ok(SolverImplicit {
            config,
            assembler,
            linear_system,
        })
    }

    /// Solves the balance equations from t_ini to t_fin
    ///
    /// The state is written by `file_io` at the output times. If given, the volume variables
    /// are also post-processed by `output` at the same times.
    pub fn solve(
        &mut self,
        state: &mut FvState,
        file_io: &mut FileIo,
        mut output: Option<&mut VtkOutput<'_, M::Vars>>,
    ) -> Result<(), StrError> {
        // helper macro to save the state before returning an error
        macro_rules! run {
            ($e:expr) => {
                match $e {
                    Ok(val) => val,
                    Err(err) => {
                        match file_io.write_state(state) {
                            Ok(_) => (),
                            Err(e) => println!("ERROR-ON-ERROR: cannot write state due to: {}", e),
                        }
                        match file_io.write_self() {
                            Ok(_) => (),
                            Err(e) => println!("ERROR-ON-ERROR: cannot write summary due to: {}", e),
                        }
                        return Err(err);
                    }
                }
            };
        }

        // accessors
        let config = self.config;
        if state.uu.dim() != self.linear_system.n_equation {
            return Err("the state is incompatible with the linear system");
        }

        // volume variables at the initial state
        run!(self.assembler.initialize(&state.uu));

        // first output
        file_io.write_state(state)?;
        if let Some(out) = output.as_mut() {
            out.write(state.t, &self.assembler.vars)?;
        }
        let mut t_out = state.t + (config.dt_out)(state.t);

        // allocate convergence control
        let mut control = ControlConvergence::new(config, self.linear_system.n_equation);
        control.print_header();

        // time loop
        let mut dt_prev: Option<f64> = None;
        for timestep in 0..config.n_max_time_steps {
            // time increment
            let remaining = config.t_fin - state.t;
            if remaining < config.dt_min {
                break;
            }
            let mut dt = (config.dt)(state.t);
            if let Some(prev) = dt_prev {
                dt = f64::min(dt, 2.0 * prev);
            }
            let last_increment = dt >= remaining;
            if last_increment {
                dt = remaining;
            }

            // old state
            run!(vec_copy(&mut state.uu_old, &state.uu));
            self.assembler.begin_step();
            control.reset();

            // solve with retries
            let dt_done = run!(self.advance(state, &mut control, timestep, dt));
            control.add_converged();
            state.dt = dt_done;
            state.t = if last_increment && dt_done == dt {
                config.t_fin
            } else {
                state.t + dt_done
            };
            dt_prev = Some(dt_done);

            // perform output
            let finished = config.t_fin - state.t < config.dt_min;
            let last_timestep = timestep == config.n_max_time_steps - 1;
            if state.t >= t_out || finished || last_timestep {
                file_io.write_state(state)?;
                if let Some(out) = output.as_mut() {
                    out.write(state.t, &self.assembler.vars)?;
                }
                t_out += (config.dt_out)(state.t);
            }

            // final time step
            if finished {
                break;
            }
        }
        control.print_footer();

        // write the file_io file
        file_io.write_self()
    }

    /// Advances the state by one time step, reducing Δt after each failed attempt
    ///
    /// Returns the Δt of the successful attempt. The state is not modified if all attempts fail.
    fn advance(
        &mut self,
        state: &mut FvState,
        control: &mut ControlConvergence,
        timestep: usize,
        dt_ini: f64,
    ) -> Result<f64, StrError> {
        let config = self.config;
        let mut dt = dt_ini;
        loop {
            if dt < config.dt_min {
                return Err("Δt is smaller than the allowed minimum");
            }
            self.assembler.update_conditions(state.t + dt)?;
            control.print_timestep(timestep, state.t + dt, dt);
            let message = match self.newton(state, control, dt) {
                Ok(true) => return Ok(dt),
                Ok(false) => "Newton-Raphson did not converge",
                Err(e) => e,
            };

            // restore the state at the beginning of the time step
            control.add_failed();
            vec_copy(&mut state.uu, &state.uu_old)?;
            self.assembler.restore();
            if control.too_many_failures() {
                return Err("Newton-Raphson did not converge");
            }
            dt *= config.dt_reduction_factor;
            control.print_failure(message, dt);
        }
    }

    /// Runs the Newton-Raphson iterations of one attempt
    ///
    /// Returns true if converged.
    fn newton(&mut self, state: &mut FvState, control: &mut ControlConvergence, dt: f64) -> Result<bool, StrError> {
        let config = self.config;
        control.reset_attempt();
        for iteration in 0..config.n_max_iterations {
            // residual vector
            let lin = &mut self.linear_system;
            self.assembler.residual(&mut lin.rr, dt)?;

            // check convergence on residual
            control.analyze_rr(iteration, &lin.rr)?;
            if control.converged_on_norm_rr() {
                control.print_iteration();
                return Ok(true);
            }

            // Jacobian matrix
            self.assembler.jacobian(&mut lin.kk, &state.uu, dt)?;
            lin.solver.actual.factorize(&mut lin.kk, None)?;

            // solve linear system
            lin.solver
                .actual
                .solve(&mut lin.mdu, &lin.kk, &lin.rr, config.verbose_lin_sys_solve)?;

            // check convergence on the correction
            control.analyze_mdu(iteration, &lin.mdu)?;
            control.print_iteration();

            // update primary and secondary variables (hints are the previous iterate)
            vec_update(&mut state.uu, -1.0, &lin.mdu)?;
            self.assembler.update_vars(&state.uu)?;
            if control.converged_on_rel_mdu() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
