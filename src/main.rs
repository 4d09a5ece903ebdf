//! Bus-stop mapping CLI application.
//!
//! This binary provides a command-line interface for the stopmap library:
//! a batch run over every configured operator, plus text extraction and
//! layout inspection for checking a new report before mapping it.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use stopmap::extraction::inspect;
use stopmap::{
    BatchRunner, BoundingBox, Config, ExtractionMode, ExtractionService, OperatorConfig,
    OperatorStatus, TextBackend,
};

/// Configuration file picked up from the working directory when present.
const DEFAULT_CONFIG: &str = "stopmap.toml";

/// Bus Stop Mapper
///
/// Extracts bus-stop coordinates from operator PDF reports and writes
/// CSV files and interactive maps. Without a subcommand, runs the batch.
#[derive(Parser)]
#[command(name = "stopmap")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Default, Clone)]
struct RunArgs {
    /// TOML configuration file (defaults to ./stopmap.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory for CSV and HTML files
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Scanning mode: sections or lines
    #[arg(long, value_name = "MODE")]
    mode: Option<ExtractionMode>,

    /// PDF text backend: pdf-extract or lopdf
    #[arg(long, value_name = "BACKEND")]
    backend: Option<TextBackend>,

    /// Operator report (can be specified multiple times, replaces configured operators)
    #[arg(long = "pdf", value_name = "NAME=PATH[=COLOR]")]
    pdfs: Vec<OperatorConfig>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract stops from every operator and write CSV files and maps
    Run(RunArgs),

    /// Extract text from a PDF (for debugging and verification)
    Extract {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// PDF text backend: pdf-extract or lopdf
        #[arg(long, value_name = "BACKEND", default_value = "pdf-extract")]
        backend: TextBackend,
    },

    /// Show the first lines of a report and the patterns found on each page
    Inspect {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Number of pages to show
        #[arg(long, default_value_t = 3)]
        pages: usize,

        /// Number of lines to show per page
        #[arg(long, default_value_t = 20)]
        lines: usize,

        /// PDF text backend: pdf-extract or lopdf
        #[arg(long, value_name = "BACKEND", default_value = "pdf-extract")]
        backend: TextBackend,
    },

    /// Print the effective configuration as TOML
    Config {
        /// TOML configuration file (defaults to ./stopmap.toml when present)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// Command handler for the batch run and the debugging commands.
struct MapHandler {
    verbose: bool,
}

impl MapHandler {
    fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Loads the configuration file, or the built-in defaults.
    fn load_config(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display())),
            None if Path::new(DEFAULT_CONFIG).exists() => Config::load(Path::new(DEFAULT_CONFIG))
                .with_context(|| format!("Failed to load configuration {DEFAULT_CONFIG}")),
            None => Ok(Config::default()),
        }
    }

    /// Runs every operator and reports the outcome.
    fn run(&self, args: &RunArgs) -> Result<()> {
        let config = build_config(Self::load_config(args.config.as_deref())?, args)?;

        if self.verbose {
            println!("Output:   {}", config.output_dir.display());
            println!("Mode:     {}", config.mode);
            println!("Backend:  {}", config.text_backend);
            println!("Operators: {}", config.operators.len());
        }

        let output_dir = config.output_dir.clone();
        let summary = BatchRunner::new(config)
            .run()
            .with_context(|| "Batch run failed")?;

        println!("\nOperators:");
        for outcome in &summary.operators {
            match &outcome.status {
                OperatorStatus::Mapped { stops } => {
                    println!("  ✓ {}: {} stop(s)", outcome.operator, stops)
                }
                OperatorStatus::NoStops => {
                    println!("  ⚠ {}: no valid stops found", outcome.operator)
                }
                OperatorStatus::MissingPdf => {
                    println!("  ⚠ {}: report not found", outcome.operator)
                }
                OperatorStatus::Failed { reason } => {
                    println!("  ⚠ {}: {}", outcome.operator, reason)
                }
            }
        }

        if summary.files.is_empty() {
            println!("⚠ No stops extracted, no files written");
        } else {
            println!(
                "✓ Mapped {} stop(s) from {} operator(s) → {}",
                summary.total_stops,
                summary.mapped(),
                output_dir.display()
            );
            for file in &summary.files {
                println!("  {file}");
            }
        }

        Ok(())
    }

    /// Extracts text from a PDF.
    fn extract(&self, input: &Path, output: Option<&Path>, backend: TextBackend) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }

        let service = ExtractionService::new(
            backend.source(),
            ExtractionMode::default(),
            BoundingBox::default(),
        );
        let text = service
            .extract_text(input)
            .with_context(|| "Text extraction failed")?;

        if let Some(output_path) = output {
            std::fs::write(output_path, &text)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Extracted {} characters → {}",
                text.len(),
                output_path.display()
            );
        } else {
            println!("{}", text);
        }

        Ok(())
    }

    /// Prints the layout probe of a PDF.
    fn inspect(
        &self,
        input: &Path,
        pages: usize,
        lines: usize,
        backend: TextBackend,
    ) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }

        let service = ExtractionService::new(
            backend.source(),
            ExtractionMode::default(),
            BoundingBox::default(),
        );
        let texts = service
            .extract_pages(input)
            .with_context(|| "Text extraction failed")?;
        println!("{}: {} page(s)", input.display(), texts.len());

        for page in inspect(&texts, pages, lines) {
            println!("\n=== Page {} ({} lines) ===", page.page, page.total_lines);
            for (number, line) in &page.lines {
                println!("{number:>3}: {line}");
            }
            if page.hits.is_empty() {
                println!("⚠ No known patterns on this page");
            }
            for hit in &page.hits {
                println!(
                    "✓ {}: {} match(es), e.g. {}",
                    hit.label,
                    hit.count,
                    hit.examples.join(" | ")
                );
            }
        }

        Ok(())
    }

    /// Prints the effective configuration.
    fn show_config(&self, path: Option<&Path>) -> Result<()> {
        let config = Self::load_config(path)?;
        print!("{}", config.to_toml()?);
        Ok(())
    }
}

/// Applies command-line overrides on top of the loaded configuration.
fn build_config(mut config: Config, args: &RunArgs) -> Result<Config> {
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(backend) = args.backend {
        config.text_backend = backend;
    }
    if !args.pdfs.is_empty() {
        config.operators = args.pdfs.clone();
    }

    config
        .validate()
        .with_context(|| "Invalid configuration")?;
    Ok(config)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let handler = MapHandler::new(cli.verbose);

    match &cli.command {
        Some(Commands::Run(args)) => handler.run(args)?,
        Some(Commands::Extract {
            input,
            output,
            backend,
        }) => handler.extract(input, output.as_deref(), *backend)?,
        Some(Commands::Inspect {
            input,
            pages,
            lines,
            backend,
        }) => handler.inspect(input, *pages, *lines, *backend)?,
        Some(Commands::Config { config }) => handler.show_config(config.as_deref())?,
        // Default: batch run with top-level flags
        None => handler.run(&cli.run)?,
    }

    Ok(())
}
