//! srna-enrich: small-RNA enriched region detection
//!
//! Usage: srna-enrich <COMMAND> [OPTIONS]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use srna_enrich::commands::{EnrichCommand, WindowReportCommand};
use srna_enrich::config::{
    EnrichConfig, DEFAULT_MAX_TIMES_ALIGNED, DEFAULT_MERGE_DISTANCE, DEFAULT_MIN_AVG_ABUNDANCE,
    DEFAULT_MIN_UNIQUE_SRNAS, DEFAULT_WINDOW_SIZE,
};
use srna_enrich::output::{create_output, LazyOutput};
use srna_enrich::scram::ScramError;

#[derive(Parser)]
#[command(name = "srna-enrich")]
#[command(version)]
#[command(about = "Find genomic regions enriched for small-RNA alignments in SCRAM output", long_about = None)]
struct Cli {
    /// Number of threads to use (default: number of CPUs)
    #[arg(long, short = 't', global = true)]
    threads: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Window and threshold options shared by all commands
#[derive(Args, Debug)]
struct ThresholdArgs {
    /// Window size in bases
    #[arg(short, long = "window", default_value_t = DEFAULT_WINDOW_SIZE,
          value_parser = clap::value_parser!(u64).range(1..))]
    window_size: u64,

    /// Minimum number of sRNA records per window
    #[arg(long = "min-unique", default_value_t = DEFAULT_MIN_UNIQUE_SRNAS)]
    min_unique: usize,

    /// Minimum average abundance (RPMR) required of every replicate
    #[arg(long = "min-rpmr", visible_alias = "min-abundance", default_value_t = DEFAULT_MIN_AVG_ABUNDANCE)]
    min_rpmr: f64,

    /// Records aligned more times than this are ignored
    #[arg(long, default_value_t = DEFAULT_MAX_TIMES_ALIGNED,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_times_aligned: u32,

    /// Maximum gap between enriched windows to merge
    #[arg(short = 'd', long, default_value_t = DEFAULT_MERGE_DISTANCE)]
    merge_distance: u64,
}

impl ThresholdArgs {
    fn to_config(&self) -> EnrichConfig {
        EnrichConfig::new()
            .with_window_size(self.window_size)
            .with_min_unique_srnas(self.min_unique)
            .with_min_avg_abundance(self.min_rpmr)
            .with_max_times_aligned(self.max_times_aligned)
            .with_merge_distance(self.merge_distance)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find and merge enriched windows into regions
    Enrich {
        /// Input SCRAM CSV files (comma separated or repeated)
        #[arg(short, long, required = true, value_delimiter = ',')]
        input: Vec<PathBuf>,

        /// Output CSV file (use - for stdout)
        #[arg(short, long, default_value = "enriched_windows.csv")]
        output: PathBuf,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// FASTA reference for clamping regions and extracting sequences
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Output FASTA file for region sequences (requires --reference)
        #[arg(long, requires = "reference")]
        output_fasta: Option<PathBuf>,

        /// Print run statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Report statistics for every window
    Windows {
        /// Input SCRAM CSV files (comma separated or repeated)
        #[arg(short, long, required = true, value_delimiter = ',')]
        input: Vec<PathBuf>,

        /// Output CSV file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Only report windows that pass the enrichment filter
        #[arg(long)]
        enriched_only: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    // Configure thread pool if --threads specified
    if let Some(n) = cli.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
        {
            eprintln!("Error: failed to initialize thread pool: {}", e);
            process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Enrich {
            input,
            output,
            thresholds,
            reference,
            output_fasta,
            stats,
        } => run_enrich(input, output, thresholds, reference, output_fasta, stats),

        Commands::Windows {
            input,
            output,
            thresholds,
            enriched_only,
        } => run_windows(input, output, thresholds, enriched_only),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_enrich(
    input: Vec<PathBuf>,
    output: PathBuf,
    thresholds: ThresholdArgs,
    reference: Option<PathBuf>,
    output_fasta: Option<PathBuf>,
    stats: bool,
) -> Result<(), ScramError> {
    let mut cmd = EnrichCommand::new(thresholds.to_config());
    if let Some(path) = reference {
        cmd = cmd.with_reference(path);
    }

    let out = create_output(&output)?;
    // Only created once a reference has loaded and sequences are written
    let fasta_out = output_fasta.map(LazyOutput::new);

    let result = cmd.execute(&input, out, fasta_out)?;

    eprintln!("Total regions written: {}", result.regions);
    if stats {
        eprintln!("Enrich stats: {}", result);
    }

    result.into_result()?;
    Ok(())
}

fn run_windows(
    input: Vec<PathBuf>,
    output: PathBuf,
    thresholds: ThresholdArgs,
    enriched_only: bool,
) -> Result<(), ScramError> {
    let cmd = WindowReportCommand::new(thresholds.to_config()).with_enriched_only(enriched_only);
    let out = create_output(&output)?;
    cmd.run(&input, out)?;
    Ok(())
}
