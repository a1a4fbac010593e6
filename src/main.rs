use clap::Parser;
use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::PathBuf;
use tracing::{info, warn};

use treeshaker::analysis::compute_unused_modules;
use treeshaker::config::Config;
use treeshaker::discovery::FileFinder;
use treeshaker::graph::DependencyGraph;
use treeshaker::patch;
use treeshaker::paths::to_unix_path;
use treeshaker::report::{ReportFormat, Reporter};
use treeshaker::scan::SourceUsageScanner;
use treeshaker::TreeShakeResults;

/// treeshaker - dead module elimination for AOT-compiled component framework builds
#[derive(Parser, Debug)]
#[command(name = "treeshaker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project root
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Dependency map JSON emitted by the build's import-analysis pass
    #[arg(short, long, value_name = "FILE")]
    graph: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compute and report only; do not rewrite any files
    #[arg(long)]
    dry_run: bool,

    /// Enable parallel source scanning
    #[arg(long)]
    parallel: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("treeshaker v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    run_shake(&config, &cli)?;

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.path)?
    };
    config.resolve_relative_to(&cli.path);
    Ok(config)
}

fn run_shake(config: &Config, cli: &Cli) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;

    let start_time = Instant::now();

    // Step 1: Load the dependency map
    info!("Loading dependency map from {:?}...", cli.graph);
    let mut graph = DependencyGraph::from_json_file(&cli.graph)?;
    info!("Dependency map has {} modules", graph.module_count());

    // Step 2: Inject real provider usage from original sources
    let finder = FileFinder::new();
    let files = finder.find_source_files(&config.src_dir)?;
    info!("Scanning {} source files for provider usage", files.len());

    let scanner = SourceUsageScanner::new(config);
    let recorded = if cli.parallel {
        scanner.scan_files(&files, &mut graph)?
    } else {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .into_diagnostic()?
                .progress_chars("#>-"),
        );
        let mut recorded = 0;
        for file in &files {
            let path = to_unix_path(&file.path.to_string_lossy());
            if scanner.is_scannable(&path) {
                let contents = file.read_contents()?;
                recorded += scanner.scan_file(&path, &contents, &mut graph)?;
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
        recorded
    };
    info!("Recorded {} source-level provider imports", recorded);

    // Step 3: Cascade and partition
    let results = compute_unused_modules(&mut graph, config);
    info!(
        "Tree shake: {} kept, {} purged",
        results.kept.len(),
        results.purged.len()
    );

    // Step 4: Report
    let reporter = Reporter::new(cli.format.clone().into(), cli.output.clone());
    reporter.report(&results)?;

    // Step 5: Patch the aggregator files
    if results.purged.is_empty() {
        info!("Nothing to patch");
    } else {
        patch_aggregator_files(config, &results, cli.dry_run)?;
    }

    let elapsed = start_time.elapsed();
    info!("Tree shake completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Rewrite the framework index, the aggregator module file and the generated
/// root factory to drop references to purged modules. Each individual lookup
/// that finds nothing is a valid no-op; only I/O failures on files we did
/// find are errors.
fn patch_aggregator_files(config: &Config, results: &TreeShakeResults, dry_run: bool) -> Result<()> {
    let purged = results.purged_paths();

    // Framework index: comment out imports/exports of every purged module.
    let index_path = config.framework_entry_point_path();
    patch_file(&index_path, dry_run, |content| {
        patch::purge_imports_exports(&index_path, content, &purged)
    })?;

    let purged_providers: Vec<_> = config
        .providers
        .iter()
        .filter(|p| results.purged.contains_key(&config.provider_module_path(p)))
        .collect();

    // Aggregator module file: drop purged provider class names from the
    // registration list.
    let module_file = config.module_file_path();
    patch_file(&module_file, dry_run, |content| {
        let mut content = content.to_string();
        for provider in &purged_providers {
            content = patch::purge_from_aggregator_list(&content, &provider.class_name);
        }
        content
    })?;

    // Generated root factory: drop provider wiring and dead component
    // factory imports.
    let factory_path = config.app_module_factory_path();
    let framework_dir = to_unix_path(&config.framework_dir.to_string_lossy());
    let mut factory_targets: Vec<String> = purged_providers
        .iter()
        .filter_map(|p| config.provider_component_factory_path(p))
        .collect();
    factory_targets.extend(config.entry_component_factory_paths());
    factory_targets.retain(|target| results.purged.contains_key(target));

    patch_file(&factory_path, dry_run, |content| {
        let mut content = content.to_string();
        for provider in &purged_providers {
            let provider_path = config.provider_module_path(provider);
            content =
                patch::purge_provider_usage(&factory_path, &content, &provider_path, &framework_dir);
        }
        for target in &factory_targets {
            content = patch::purge_factory_usage(&factory_path, &content, target);
        }
        content
    })?;

    Ok(())
}

/// Apply a text transform to a file on disk, writing back only when the
/// content actually changed. A missing file is reported and skipped: the
/// reference may already be gone, and one absent aggregator must not abort
/// the rest of the pass.
fn patch_file<F>(path: &str, dry_run: bool, transform: F) -> Result<()>
where
    F: FnOnce(&str) -> String,
{
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Skipping {path}: {e}");
            return Ok(());
        }
    };

    let updated = transform(&contents);
    if updated == contents {
        info!("No changes for {path}");
        return Ok(());
    }

    if dry_run {
        println!("{}", format!("Would patch {path}").yellow());
        return Ok(());
    }

    std::fs::write(path, updated)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write patched file: {path}"))?;
    println!("{}", format!("Patched {path}").green());
    Ok(())
}
