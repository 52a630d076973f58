//! Permuta CLI - rename files in TARGET to match SOURCE's hierarchy.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use permuta::{MatchTable, MatcherBuilder, PermutaError, RenamePlan, DEFAULT_BLOCK_SIZE};

/// Filesystem hierarchy rename synchronizer.
///
/// Renames files in TARGET so that identical files found in SOURCE and
/// TARGET have the same relative path, sparing big transfers when a simple
/// rename suffices. By default nothing is renamed: a preview is printed to
/// standard output as a flat JSON object.
///
/// The preview can be redirected to a file, tweaked, and passed back as
/// SOURCE to replay it without re-analyzing - useful for weeding out false
/// positives, which can happen when two different files are the only ones
/// of their size.
///
/// Duplicate files on either side are skipped with a warning. Only regular,
/// non-empty files are considered; symbolic links are ignored.
#[derive(Parser)]
#[command(name = "permuta", version)]
struct Cli {
    /// Source tree, or a saved preview file to replay
    source: PathBuf,

    /// Target tree whose files get renamed
    target: PathBuf,

    /// Rename the files in TARGET (default: preview only)
    #[arg(short, long)]
    process: bool,

    /// Overwrite existing files in TARGET
    #[arg(short = 'f', long)]
    overwrite: bool,

    /// Block size for digest rolls (512-65536, power of 2)
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> permuta::Result<()> {
    validate_block_size(cli.block_size)?;

    let meta = fs::metadata(&cli.source).map_err(|err| PermutaError::RootAccess {
        path: cli.source.clone(),
        source: err,
    })?;

    let plan = if meta.is_dir() {
        analyze(&cli)?
    } else {
        replay(&cli)?
    };

    if cli.process {
        info!(":: Processing renames");
        plan.execute(&cli.target, cli.overwrite)?;
    } else {
        info!(":: Previewing renames");
        println!("{}", plan.to_json()?);
    }
    Ok(())
}

/// Scan both trees and derive the rename relation.
fn analyze(cli: &Cli) -> permuta::Result<RenamePlan> {
    let matcher = MatcherBuilder::new().block_size(cli.block_size).build();
    let mut table = MatchTable::new();

    info!(":: Analyzing '{}'", cli.source.display());
    matcher.scan_source(&cli.source, &mut table)?;
    info!(":: Analyzing '{}'", cli.target.display());
    matcher.scan_target(&cli.target, &cli.source, &mut table)?;

    Ok(RenamePlan::from_table(&table))
}

/// Load a previously saved preview and drop pairs that no longer apply.
fn replay(cli: &Cli) -> permuta::Result<RenamePlan> {
    info!(":: Replaying '{}'", cli.source.display());
    let text = fs::read_to_string(&cli.source)?;
    let mut plan = RenamePlan::from_json(&text)?;
    plan.retain_existing(&cli.target);
    Ok(plan)
}

fn validate_block_size(size: usize) -> permuta::Result<()> {
    if !size.is_power_of_two() || !(512..=65536).contains(&size) {
        return Err(PermutaError::InvalidBlockSize(size));
    }
    Ok(())
}
