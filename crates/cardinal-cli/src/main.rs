#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;
use cardinal_core::{AnalysisConfig, CutSetStrategy};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "cardinal.toml";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cardinal: infer particle cardinality from content models",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Analysis config file (TOML). Defaults to ./cardinal.toml when present.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the cut-set strategy from the config file.
    #[arg(long, global = true, value_enum)]
    cut_set: Option<CutSetArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify every particle of a content model as required and/or repeated.
    Analyze(cmd::analyze::AnalyzeArgs),
    /// Show nullability and FIRST/LAST sets of a content model.
    Sets(cmd::sets::SetsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CutSetArg {
    Reachability,
    Dominators,
}

impl From<CutSetArg> for CutSetStrategy {
    fn from(arg: CutSetArg) -> Self {
        match arg {
            CutSetArg::Reachability => Self::Reachability,
            CutSetArg::Dominators => Self::Dominators,
        }
    }
}

impl Cli {
    /// Resolve the analysis config: explicit path, then ./cardinal.toml,
    /// then defaults. `--cut-set` overrides whatever was loaded.
    fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                AnalysisConfig::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => AnalysisConfig::default(),
        };
        if let Some(cut_set) = self.cut_set {
            config.cut_set = cut_set.into();
        }
        debug!(?config, "analysis config resolved");
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CARDINAL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "cardinal=debug,info"
        } else {
            "cardinal=info,warn"
        })
    });

    let format = env::var("CARDINAL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let mode = output::resolve_output_mode(cli.json);
    let config = cli.analysis_config()?;

    match &cli.command {
        Commands::Analyze(args) => cmd::analyze::run_analyze(args, &config, mode),
        Commands::Sets(args) => cmd::sets::run_sets(args, &config, mode),
    }
}
