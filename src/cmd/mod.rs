mod generate;
mod verify;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "csv-forge")]
#[command(author = "Helge Sverre <helge.sverre@gmail.com>")]
#[command(version)]
#[command(about = "Forge relationally-consistent CSV datasets and verify referential integrity", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the twelve-table dataset as CSV files
    Generate {
        /// Output directory for the CSV files
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Rows per table (default: 10000)
        #[arg(long)]
        rows: Option<usize>,

        /// Random seed for reproducibility (default: 42)
        #[arg(long)]
        seed: Option<u64>,

        /// Anchor for generated timestamps, YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS"
        /// (default: now). Pin it to make output byte-identical across runs.
        #[arg(long)]
        as_of: Option<String>,

        /// YAML config file with seed, default rows, and per-table row counts
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,
    },

    /// Verify referential integrity across written CSV files
    Verify {
        /// Directory containing the CSV files
        #[arg(short, long, default_value = "output")]
        dir: PathBuf,

        /// Output results as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            output,
            rows,
            seed,
            as_of,
            config,
            progress,
        } => generate::run(output, rows, seed, as_of, config, progress),
        Commands::Verify { dir, json } => verify::run(dir, json),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "csv-forge", &mut io::stdout());
            Ok(())
        }
    }
}
