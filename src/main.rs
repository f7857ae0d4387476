//! Royin-Harvest main entry point
//!
//! This is the command-line interface for syncing the Thai Hunspell dictionary with the
//! Royal Institute online dictionary.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use royin_harvest::config::{load_config_with_hash, Config, FetchStrategy};
use royin_harvest::lexicon::{compare, Alphabet, Collator};
use royin_harvest::output::{
    backup_dictionary, generate_audit_report, load_snapshot, save_word_list, validate_dictionary,
    write_dictionary,
};
use royin_harvest::{harvest, HarvestError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Royin-Harvest: a polite dictionary harvester
///
/// Royin-Harvest walks the Thai alphabet against the Royal Institute lookup service,
/// checkpointing after every consonant, then compares the harvest with the existing
/// Hunspell dictionary and writes an audit report before replacing it.
#[derive(Parser, Debug)]
#[command(name = "royin-harvest")]
#[command(version)]
#[command(about = "Harvest the Royal Institute dictionary into a Hunspell word list", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start a fresh harvest, ignoring the stored checkpoint
    #[arg(long)]
    fresh: bool,

    /// Always go to the network, bypassing the page cache
    #[arg(long)]
    no_cache: bool,

    /// Page fetch strategy (sequential or concurrent)
    #[arg(long, value_name = "S", value_parser = parse_strategy)]
    strategy: Option<FetchStrategy>,

    /// Harvest and write the reports, but leave the dictionary untouched
    #[arg(long)]
    dry_run: bool,

    /// Do not back up the existing dictionary before replacing it
    #[arg(long)]
    no_backup: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli);
    let config = Arc::new(config);

    match run(Arc::clone(&config), &cli).await {
        Err(e) if matches!(e.downcast_ref::<HarvestError>(), Some(HarvestError::Interrupted)) => {
            tracing::warn!("Harvest interrupted, progress has been saved. Run again to resume.");
            std::process::exit(130);
        }
        other => other,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("royin_harvest=info,warn"),
            1 => EnvFilter::new("royin_harvest=debug,info"),
            2 => EnvFilter::new("royin_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn parse_strategy(value: &str) -> Result<FetchStrategy, String> {
    match value.to_ascii_lowercase().as_str() {
        "sequential" => Ok(FetchStrategy::Sequential),
        "concurrent" => Ok(FetchStrategy::Concurrent),
        other => Err(format!(
            "unknown strategy '{}' (expected sequential or concurrent)",
            other
        )),
    }
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.no_cache {
        config.fetcher.cache_enabled = false;
    }
    if let Some(strategy) = cli.strategy {
        config.fetcher.strategy = strategy;
    }
}

/// Harvest, diff against the existing dictionary, report, then replace it
async fn run(config: Arc<Config>, cli: &Cli) -> anyhow::Result<()> {
    if cli.fresh {
        tracing::info!("Starting fresh harvest (ignoring previous checkpoint)");
    } else {
        tracing::info!("Starting harvest (will resume if an interrupted run exists)");
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::warn!("Ctrl-C received, stopping after saving progress");
    };

    let words = harvest(Arc::clone(&config), cli.fresh, shutdown).await?;
    tracing::info!("Harvest completed with {} words", words.len());

    let dictionary_path = Path::new(&config.output.dictionary_path);
    let report_dir = Path::new(&config.output.report_dir);

    let old_words = load_snapshot(dictionary_path)?;
    let diff = compare(&old_words, words.as_slice());

    let mut collator = Collator::new(&Alphabet::thai());
    let now = Local::now();
    generate_audit_report(&diff, &mut collator, now, &report_dir.join("audit_report.md"))?;
    save_word_list(
        &diff.added,
        &mut collator,
        &report_dir.join("added_words.txt"),
        "added words",
    )?;
    save_word_list(
        &diff.removed,
        &mut collator,
        &report_dir.join("ghost_words.txt"),
        "ghost words",
    )?;

    println!("\n=== Dictionary Sync Summary ===");
    println!("  Old dictionary: {} words", diff.old_count);
    println!("  New harvest:    {} words", diff.new_count);
    println!("  Added:          {}", diff.added_count());
    println!("  Ghosts:         {}", diff.removed_count());
    println!("  Net change:     {:+}", diff.net_change());

    if cli.dry_run {
        println!("\n✓ Dry run: {} left unchanged", dictionary_path.display());
        return Ok(());
    }

    if !cli.no_backup {
        backup_dictionary(dictionary_path, now)?;
    }

    let header = format!(
        "Thai Royal Institute Dictionary\nSource: {}\nSynchronized: {}",
        config.api.base_url,
        now.format("%Y-%m-%d %H:%M:%S")
    );
    write_dictionary(words.as_slice(), dictionary_path, Some(&header))?;

    let problems = validate_dictionary(dictionary_path)?;
    if problems.is_empty() {
        println!("\n✓ Dictionary written to: {}", dictionary_path.display());
    } else {
        for problem in &problems {
            tracing::error!("Dictionary validation: {}", problem);
        }
        anyhow::bail!(
            "{} failed validation ({} problems)",
            dictionary_path.display(),
            problems.len()
        );
    }

    Ok(())
}
