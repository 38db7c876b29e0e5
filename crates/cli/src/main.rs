use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use codemap_indexer::{CancellationToken, IndexOptions, IndexOutput, ProjectIndexer};
use codemap_model::{AttachMode, DuplicatePolicy};
use std::fs;
use std::io;
use std::path::PathBuf;

mod summary;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "codemap")]
#[command(about = "Structural map of a Go codebase", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a project and write the model as JSON
    Index(IndexArgs),

    /// Print per-package counts in dependency order
    Summary(SummaryArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Project root directory
    path: PathBuf,

    /// TOML options file; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Extract files on parallel workers
    #[arg(long)]
    parallel: bool,

    /// Worker count for --parallel (default: CODEMAP_INDEX_CONCURRENCY or CPU count)
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Attach methods while merging (result depends on file order)
    #[arg(long)]
    streaming: bool,

    /// Merge fields of duplicate type declarations instead of keeping the first
    #[arg(long)]
    merge_fields: bool,

    /// Skip contains/implements/imports detection
    #[arg(long)]
    no_relations: bool,

    /// Skip *_test.go files
    #[arg(long)]
    skip_tests: bool,

    /// Exclude root-relative paths matching GLOB (repeatable)
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,
}

#[derive(Args)]
struct IndexArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Write JSON here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Args)]
struct SummaryArgs {
    #[command(flatten)]
    run: RunArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Index(args) => run_index(args).await?,
        Commands::Summary(args) => run_summary(args).await?,
    }

    Ok(())
}

async fn run_index(args: IndexArgs) -> Result<()> {
    let output = run(&args.run).await?;

    let json = if args.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };

    match args.output {
        Some(path) => {
            fs::write(&path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Model written to {}", path.display());
        }
        None => print_stdout(&json)?,
    }
    Ok(())
}

async fn run_summary(args: SummaryArgs) -> Result<()> {
    let output = run(&args.run).await?;
    print_stdout(&summary::render(&output))
}

async fn run(args: &RunArgs) -> Result<IndexOutput> {
    let options = build_options(args)?;
    let indexer = ProjectIndexer::with_options(&args.path, options)
        .context("Failed to configure indexer")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, stopping after the current file");
            on_interrupt.cancel();
        }
    });

    let output = if args.parallel {
        indexer.index_parallel(cancel).await
    } else {
        indexer.index_with_cancel(&cancel)
    }
    .with_context(|| format!("Failed to index {}", args.path.display()))?;

    for diagnostic in &output.diagnostics {
        log::warn!("{diagnostic}");
    }
    Ok(output)
}

fn build_options(args: &RunArgs) -> Result<IndexOptions> {
    let mut options = match &args.config {
        Some(path) => IndexOptions::from_toml_file(path)
            .with_context(|| format!("Invalid options file {}", path.display()))?,
        None => IndexOptions::default(),
    };

    if args.workers.is_some() {
        options.workers = args.workers;
    }
    if args.streaming {
        options.attach_mode = AttachMode::Streaming;
    }
    if args.merge_fields {
        options.duplicate_policy = DuplicatePolicy::MergeFields;
    }
    if args.no_relations {
        options.detect_relations = false;
    }
    if args.skip_tests {
        options.scan.include_tests = false;
    }
    options.scan.exclude.extend(args.exclude.iter().cloned());

    options.validate()?;
    Ok(options)
}
