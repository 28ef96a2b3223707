use aimcalc_geometry::all_passed;
use aimcalc_io::{export_single, import_table_file, load_params, save_params, solve_batch_file};
use aimcalc_model::{SceneParams, Solution, TableImport, solve};
use aimcalc_view::camera::{MAX_RADIUS, MIN_RADIUS, PITCH_LIMIT};
use aimcalc_view::{InteractionMode, Session, Viewport};
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "aimcalc")]
#[command(about = "Aiming geometry calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve one configuration and print base, target and output angles.
    Solve(ParamsArgs),
    /// Run the self-check probes; fails if any probe fails.
    Probes(ParamsArgs),
    /// Solve every row of a batch table and write the results.
    Batch(BatchArgs),
    /// Write the Inputs/Outputs tables of one configuration.
    Export(ExportArgs),
    /// Apply a key/value or batch table and write the resulting parameters.
    Import(ImportArgs),
    /// Print the projected scene primitives as JSON.
    Render(RenderArgs),
}

#[derive(Args)]
struct ParamsArgs {
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Args)]
struct BatchArgs {
    #[arg(long = "in")]
    input: PathBuf,
    #[arg(long)]
    out: PathBuf,
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Args)]
struct ExportArgs {
    #[arg(long)]
    out: PathBuf,
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Args)]
struct ImportArgs {
    #[arg(long = "in")]
    input: PathBuf,
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Args)]
struct RenderArgs {
    #[arg(long, default_value_t = 1280.0)]
    width: f64,
    #[arg(long, default_value_t = 800.0)]
    height: f64,
    #[arg(long)]
    yaw: Option<f64>,
    #[arg(long)]
    pitch: Option<f64>,
    #[arg(long)]
    radius: Option<f64>,
    #[arg(long, default_value = "free")]
    mode: String,
    #[arg(long)]
    params: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Solve(args) => solve_command(args),
        Command::Probes(args) => probes_command(args),
        Command::Batch(args) => batch_command(args),
        Command::Export(args) => export_command(args),
        Command::Import(args) => import_command(args),
        Command::Render(args) => render_command(args),
    }
}

fn read_params(path: Option<&Path>) -> Result<SceneParams> {
    match path {
        Some(path) => load_params(path).context("failed to load parameters"),
        None => Ok(SceneParams::default()),
    }
}

fn solve_command(args: ParamsArgs) -> Result<()> {
    let params = read_params(args.params.as_deref())?;
    let solution = solve(&params);
    print_solution(&params, &solution);
    Ok(())
}

fn print_solution(params: &SceneParams, solution: &Solution) {
    let (base, target, out) = (solution.base, solution.target, solution.output);
    println!("mode:    {}", params.control.as_str());
    println!("base:    ({:.3}, {:.3}, {:.3})", base.x, base.y, base.z);
    println!("target:  ({:.3}, {:.3}, {:.3})", target.x, target.y, target.z);
    if out.valid {
        println!("V:       {:.3}", out.distance);
        println!("eta:     {:.6} deg", out.eta_deg);
        println!("theta:   {:.6} deg", out.theta_deg);
        println!("elev:    {:.6} deg", out.elev_deg);
        println!("eps:     {:.6} deg", out.eps_deg);
    } else {
        println!("output:  base and target coincide");
    }
    println!(
        "Yt:      formula {:.6}, sim {:.6}, delta {:.3e}",
        solution.yt_formula, solution.yt_sim, solution.d_yt
    );
}

fn probes_command(args: ParamsArgs) -> Result<()> {
    let params = read_params(args.params.as_deref())?;
    let solution = solve(&params);
    for probe in &solution.probes {
        let status = if probe.passed { "ok  " } else { "FAIL" };
        match probe.measured {
            Some(value) => println!("{status} {} (measured {value:.6})", probe.kind.label()),
            None => println!("{status} {}", probe.kind.label()),
        }
    }
    if !all_passed(&solution.probes) {
        bail!("self-check probes failed");
    }
    Ok(())
}

fn batch_command(args: BatchArgs) -> Result<()> {
    let params = read_params(args.params.as_deref())?;
    let rows = solve_batch_file(&params, &args.input, &args.out).context("batch solve failed")?;
    println!("batch rows solved: {rows}");
    println!("results exported: {}", args.out.display());
    Ok(())
}

fn export_command(args: ExportArgs) -> Result<()> {
    let params = read_params(args.params.as_deref())?;
    export_single(&params, &args.out).context("export failed")?;
    println!("configuration exported: {}", args.out.display());
    Ok(())
}

fn import_command(args: ImportArgs) -> Result<()> {
    let mut params = read_params(args.params.as_deref())?;
    match import_table_file(&mut params, &args.input).context("import failed")? {
        TableImport::Parameters { applied } => println!("parameters applied: {applied}"),
        TableImport::Batch(rows) => println!("batch rows loaded: {}, first row previewed", rows.len()),
        _ => {}
    }
    match &args.out {
        Some(out) => {
            save_params(&params, out)?;
            println!("parameters written: {}", out.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&params)?),
    }
    Ok(())
}

fn render_command(args: RenderArgs) -> Result<()> {
    let params = read_params(args.params.as_deref())?;
    let mode: InteractionMode = args.mode.parse().context("invalid --mode")?;
    let mut session = Session::new(params, Viewport::new(args.width, args.height));
    session.viewer.set_mode(mode);
    let orbit = &mut session.viewer.orbit;
    if let Some(yaw) = args.yaw {
        orbit.yaw = yaw;
    }
    if let Some(pitch) = args.pitch {
        orbit.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
    if let Some(radius) = args.radius {
        orbit.radius = radius.clamp(MIN_RADIUS, MAX_RADIUS);
    }
    let frame = session.frame();
    info!(primitives = frame.len(), "scene projected");
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
