use pmfv::prelude::*;
use pmfv::problem::RichardsLensProblem;
use pmfv::StrError;
use russell_lab::approx_eq;

#[test]
fn test_richards_lens() -> Result<(), StrError> {
    // problem and grid
    let fluid = ImmiscibleFluidSystem::water_gas();
    let problem = RichardsLensProblem::new(&fluid)?;
    let mesh = problem.mesh(6, 4)?;
    let grid = FvGrid::new(&mesh)?;

    // configuration
    let mut config = Config::new();
    config.set_t_ini_t_fin(0.0, 50.0)?.set_dt(|_| 10.0).set_dt_out(|_| 25.0);

    // model and solver
    let soil = SoilData::new(&grid, &problem, &config)?;
    let model = RichardsModel::new(&fluid, &soil, &config)?;
    let mut solver = SolverImplicit::new(&grid, &soil, &problem, &model, &config)?;
    let mut state = FvState::new(&grid, &model, &problem, config.t_ini)?;
    solver.assembler.initialize(&state.uu)?;
    let water_ini = solver.assembler.total_storage()[0];

    // run the simulation
    let mut file_io = FileIo::new_enabled(&mesh, &model, "test_richards_lens", Some(DEFAULT_TEST_DIR))?;
    solver.solve(&mut state, &mut file_io, None)?;
    assert_eq!(state.t, 50.0);
    assert_eq!(file_io.times.first(), Some(&0.0));
    assert_eq!(file_io.times.last(), Some(&50.0));

    // the water that entered through the inlet (length 0.5 m) is still in the domain
    let water_fin = solver.assembler.total_storage()[0];
    let inflow = 0.04 * 0.5 * 50.0;
    approx_eq(water_fin - water_ini, inflow, 1e-2 * inflow);

    // the cell below the inlet is wetter than the initial state
    let inlet_cell = grid
        .cells
        .iter()
        .position(|c| c.centroid[1] > 1.5 && c.centroid[0] > 1.0 && c.centroid[0] < 1.5)
        .unwrap();
    let sw = solver.assembler.vars[inlet_cell].fluid_state.saturation[0];
    assert!(sw > 0.05);

    // read the results back
    let (summary, mesh_read) = FileIo::read_summary(DEFAULT_TEST_DIR, "test_richards_lens")?;
    assert_eq!(mesh_read.cells.len(), 24);
    let last = summary.read_state(*summary.indices.last().unwrap())?;
    assert_eq!(last.t, 50.0);
    assert_eq!(last.uu.as_data(), state.uu.as_data());
    Ok(())
}
