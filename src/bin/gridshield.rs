use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gridshield::*;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Query a precomputed shield grid.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML sidecar describing the grid shape
    #[arg(short, long)]
    config: PathBuf,

    /// Raw grid file, overrides `grid` in the config
    #[arg(short, long)]
    grid: Option<PathBuf>,

    /// Memory map the grid file instead of reading it
    #[arg(long)]
    mmap: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print grid metadata and build information
    Info,

    /// Print the record for one state, one value per dimension
    Query {
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,

        /// Also print the permitted actions encoded in the record
        #[arg(long)]
        actions: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let mut config = ShieldConfig::from_file(&args.config)
        .with_context(|| format!("loading {:?}", args.config))?;
    if let Some(grid) = &args.grid {
        config = config.with_grid(grid.clone());
    }

    match config.dimensions {
        1 => run::<1>(&args, &config),
        2 => run::<2>(&args, &config),
        3 => run::<3>(&args, &config),
        4 => run::<4>(&args, &config),
        n => bail!("{n} dimensional grids are not supported, use 1 to 4"),
    }
}

fn run<const GRID_DIMENSION: usize>(
    args: &Args,
    config: &ShieldConfig,
) -> anyhow::Result<()> {
    if args.mmap {
        let table = config
            .map_table::<GRID_DIMENSION>()
            .context("mapping grid")?;
        execute(&table, &args.command)
    } else {
        let table = config
            .read_table::<GRID_DIMENSION>()
            .context("reading grid")?;
        execute(&table, &args.command)
    }
}

fn execute<const GRID_DIMENSION: usize, B: AsRef<[u8]>>(
    table: &GridLookup<GRID_DIMENSION, B>,
    command: &Command,
) -> anyhow::Result<()> {
    match command {
        Command::Info => {
            println!("{}", table.metadata());
            build_info::print_report("gridshield");
        }
        Command::Query { values, actions } => {
            match table.try_lookup_slice(values)? {
                Some(record) => {
                    println!("{record}");
                    if *actions {
                        println!("actions: {}", ActionSet::from_record(record));
                    }
                }
                None => println!("out-of-range"),
            }
        }
    }
    Ok(())
}
