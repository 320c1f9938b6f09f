//! subcell CLI - scan a knowledgebase dump and print the census report

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use subcell::io::DEFAULT_BLOCK_EXP;
use subcell::{report, CategoryTaxonomy, ChunkSource, IoStrategy, LineSegmenter};
use tracing_subscriber::EnvFilter;

/// Subcellular-compartment census of a UniProtKB flat-file dump
#[derive(Parser)]
#[command(name = "subcell", version, about)]
struct Cli {
    /// Path to the flat-file knowledgebase dump
    file: PathBuf,

    /// Log base 2 of the chunk size (12..=28)
    #[arg(short = 'b', long = "block-exp", default_value_t = DEFAULT_BLOCK_EXP)]
    block_exp: u32,

    /// How to bring input bytes into memory
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    io_strategy: StrategyArg,

    /// Verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Pick by file size
    Auto,
    /// Positional reads into a reusable buffer
    Read,
    /// Memory-mapped input
    Mmap,
}

impl From<StrategyArg> for IoStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => IoStrategy::Auto,
            StrategyArg::Read => IoStrategy::Read,
            StrategyArg::Mmap => IoStrategy::Mmap,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    // Pattern compilation is the startup precondition; fail before any I/O.
    let taxonomy = CategoryTaxonomy::compile().context("taxonomy patterns")?;

    let strategy = IoStrategy::from(cli.io_strategy);
    let source = ChunkSource::open(&cli.file, cli.block_exp, strategy)
        .with_context(|| format!("cannot open {}", cli.file.display()))?;
    let blocksize = source.blocksize();
    let strategy_name = source.strategy().name();

    let started = Instant::now();
    let census = subcell::run_census(LineSegmenter::new(source), &taxonomy);
    let elapsed = started.elapsed();

    print!(
        "{}",
        report::render(
            &census,
            &taxonomy,
            &cli.file,
            blocksize,
            strategy_name,
            elapsed,
        )
    );
    Ok(())
}
