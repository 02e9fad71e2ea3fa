use pmfv::fv::FileIo;
use pmfv::StrError;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "pmfv_to_paraview",
    about = "Converts the saved primary variables of a pmfv run into VTU and PVD files for ParaView"
)]
struct Options {
    /// Directory with the summary, mesh, and state files
    out_dir: String,

    /// Filename stem of the run (the summary file is <fn_stem>-summary.json)
    fn_stem: String,

    /// Skips the time stations before this time
    #[structopt(long)]
    t_min: Option<f64>,

    /// Skips the time stations after this time
    #[structopt(long)]
    t_max: Option<f64>,

    /// Converts only the latest selected time station
    #[structopt(long)]
    last: bool,
}

fn main() -> Result<(), StrError> {
    let options = Options::from_args();
    let (file_io, mesh) = FileIo::read_summary(&options.out_dir, &options.fn_stem)?;
    let selected = file_io.select_indices(options.t_min, options.t_max, options.last);
    if selected.is_empty() {
        return Err("there are no time stations within the selected range");
    }

    // one VTU file per time station; the cell data are the primary variables
    println!("cells: {}", mesh.cells.len());
    println!("primary variables: {}", file_io.primary_variable_names.join(", "));
    for index in &selected {
        let state = file_io.read_state(*index)?;
        file_io.write_vtu(&mesh, &state, *index)?;
        println!("t = {:>14.6e} → {}", state.t, file_io.path_vtu(*index));
    }
    file_io.write_pvd_selected(&selected)?;
    println!("collection: {}", file_io.path_pvd());
    Ok(())
}
