use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use softex::analysis::{analyze, DEFAULT_GAP};
use softex::bench::Bench;
use softex::config::BenchConfig;
use softex::Error;

#[derive(Debug, Parser)]
#[command(name = "softex", about = "Softex lane controller bench")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Runs a softmax on the behavioral bench.
    Sim {
        /// Bench configuration (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Writes a waveform trace.
        #[arg(long)]
        vcd: Option<PathBuf>,

        /// Number of chunks of the input vector.
        #[arg(short, long, default_value_t = 2)]
        passes: usize,

        /// Slot holding the softmax state.
        #[arg(short, long, default_value_t = 0)]
        slot: usize,
    },

    /// Measures the memory bandwidth of a waveform trace.
    Bandwidth {
        vcd: PathBuf,

        /// Request signal.
        #[arg(long, default_value = "req")]
        signal: String,

        /// Expected number of tiles.
        #[arg(long, default_value_t = 8)]
        tiles: usize,

        /// Low gap separating two tiles.
        #[arg(long, default_value_t = DEFAULT_GAP)]
        gap: u64,
    },
}

fn sim(config: Option<PathBuf>, vcd: Option<PathBuf>, passes: usize, slot: usize) -> Result<(), Error> {
    let mut config = BenchConfig::load(config.as_deref())?;
    if vcd.is_some() {
        config.vcd = vcd;
    }

    let mut bench = match &config.vcd {
        Some(path) => {
            log::info!("writing trace to {}", path.display());
            let writer = BufWriter::new(File::create(path)?);
            Bench::with_trace(config.clone(), Box::new(writer))?
        }
        None => Bench::new(config),
    };

    let stats = bench.softmax(passes, slot)?;
    bench.finish()?;
    println!("{stats}");
    Ok(())
}

fn bandwidth(vcd: PathBuf, signal: &str, tiles: usize, gap: u64) -> Result<(), Error> {
    let report = analyze(BufReader::new(File::open(vcd)?), signal, gap)?;
    report.check_tiles(tiles);
    println!("{report}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Sim { config, vcd, passes, slot } => sim(config, vcd, passes, slot),
        Command::Bandwidth { vcd, signal, tiles, gap } => bandwidth(vcd, &signal, tiles, gap),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
