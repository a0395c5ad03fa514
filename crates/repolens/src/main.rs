use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use repolens_core::config::Config;
use repolens_core::pipeline::CorpusPipeline;
use repolens_python::PythonProfile;
use repolens_report::{json, text};

#[derive(Parser)]
#[command(name = "repolens")]
#[command(about = "Compute source metrics over a corpus of Python repositories")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a corpus and report per-repository metrics
    Analyze {
        /// Path to the corpus root (one subdirectory per repository)
        path: PathBuf,
        /// Report format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
        /// Emit JSON on a single line
        #[arg(long)]
        compact: bool,
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Config file path (defaults to .repolens.toml in the corpus root)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write comment-free copies of every source file in the corpus
    Strip {
        /// Path to the corpus root
        path: PathBuf,
        /// Directory for the stripped artifacts (defaults to the configured
        /// strip.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Create a default .repolens.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            path,
            format,
            compact,
            output,
            config,
        } => cmd_analyze(&path, format, compact, output.as_deref(), config.as_deref()),
        Commands::Strip {
            path,
            output,
            config,
        } => cmd_strip(&path, output.as_deref(), config.as_deref()),
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn cmd_analyze(
    path: &Path,
    format: Format,
    compact: bool,
    output: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(path, config_path)?;
    let pipeline = build_pipeline(config)?;
    let records = pipeline.analyze_corpus(path)?;

    let report = match format {
        Format::Json => json::format_report(&records, compact),
        Format::Text => text::format_report(&records),
    };

    match output {
        Some(dest) => {
            std::fs::write(dest, &report)
                .with_context(|| format!("failed to write report to {}", dest.display()))?;
            println!("Report written to {}", dest.display());
        }
        None => print!("{report}"),
    }
    Ok(())
}

fn cmd_strip(path: &Path, output: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(path, config_path)?;
    let out_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.strip.output_dir));
    let pipeline = build_pipeline(config)?;

    let report = pipeline.strip_corpus(path, &out_dir)?;
    println!(
        "Wrote {} stripped files to {} ({} skipped).",
        report.written,
        out_dir.display(),
        report.skipped
    );
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from(".repolens.toml");
    if target.exists() && !force {
        anyhow::bail!(".repolens.toml already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Config::default_toml())?;
    println!("Created .repolens.toml with default configuration.");
    Ok(())
}

fn load_config(corpus_path: &Path, config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(p) => Config::load(p),
        None => Ok(Config::load_or_default(corpus_path)),
    }
}

fn build_pipeline(config: Config) -> Result<CorpusPipeline> {
    let profile = PythonProfile::new().context("failed to initialize Python language profile")?;
    Ok(CorpusPipeline::new(Box::new(profile), config))
}
