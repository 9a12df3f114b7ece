use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gridlayers::libnames::convert_library_names;
use gridlayers::{
    build_line_code, load_workbook, read_line_codes, write_graph, write_line_codes, Circuit,
    CktGraph, LengthUnit, Options,
};
use log::info;
use std::path::PathBuf;

/// Distribution network exports to GIS layers and line code libraries.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate sheets into one attribute table per layer
    Layers(LayersArgs),

    /// Assemble the network graph
    Graph(GraphArgs),

    /// Build line code matrices
    #[clap(name = "linecode")]
    LineCode(LineCodeArgs),

    /// Declare line codes from a list of library names
    #[clap(name = "libnames")]
    LibNames(LibNamesArgs),
}

#[derive(Args)]
struct LayersArgs {
    /// Directory holding one CSV file per sheet
    #[arg(required = true)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "GIS")]
    output: PathBuf,
}

#[derive(Args)]
struct GraphArgs {
    /// Directory holding one CSV file per sheet
    #[arg(required = true)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "graph")]
    output: PathBuf,

    /// Distance below which two point objects occupy the same spot.
    #[arg(long)]
    tol: Option<f64>,
}

#[derive(Args)]
struct LineCodeArgs {
    /// Line code readings (CSV)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "LineCodes.dss")]
    output: PathBuf,

    /// Length unit of the impedances.
    #[arg(long)]
    units: Option<LengthUnit>,

    /// Factor applied to capacitance readings.
    #[arg(long = "c-scale")]
    c_scale: Option<f64>,
}

#[derive(Args)]
struct LibNamesArgs {
    /// Plain list of library types
    #[arg(required = true)]
    input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "libLineCode.dss")]
    output: PathBuf,
}

fn main() {
    env_logger::Builder::from_default_env()
        .format_level(false)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match execute(&cli) {
        Ok(_) => {
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(2);
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let mut opt = Options::default();

    match &cli.command {
        Commands::Layers(args) => {
            let wb = load_workbook(&args.input)?;
            let ckt = Circuit::from_workbook(&wb)?;
            ckt.write(&args.output)?;
        }
        Commands::Graph(args) => {
            if let Some(tol) = args.tol {
                opt.tolerance = tol;
            }
            let wb = load_workbook(&args.input)?;
            let ckt = Circuit::from_workbook(&wb)?;
            let g = CktGraph::from_circuit(&ckt, opt.tolerance);
            write_graph(&g, &args.output)?;
        }
        Commands::LineCode(args) => {
            if let Some(units) = args.units {
                opt.units = units;
            }
            if let Some(c_scale) = args.c_scale {
                opt.capacitance_scale = c_scale;
            }
            let mut records = read_line_codes(&args.input)?;
            let mut codes = Vec::with_capacity(records.len());
            for rec in records.iter_mut() {
                rec.scale_capacitance(opt.capacitance_scale);
                codes.push(build_line_code(rec)?);
            }
            info!("built {} line codes", codes.len());
            write_line_codes(&args.output, &codes, opt.units)?;
        }
        Commands::LibNames(args) => {
            convert_library_names(&args.input, &args.output)?;
        }
    }

    Ok(())
}
