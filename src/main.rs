#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use test_trend::core::schema::Unit;
use test_trend::{FilterOptions, filter_cmd, table_cmd};

#[derive(Parser, Debug)]
#[command(name = "test-trend")]
#[command(about = "Filter and re-baseline historical per-build test durations", long_about = None)]
struct Cli {
    /// Enable verbose logging (or set TEST_TREND_LOG)
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the filtered series as JSON for the chart
    Filter {
        #[command(flatten)]
        filter: FilterArgs,
        /// Write JSON output to this file instead of stdout
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Print the companion table for the filtered series
    Table {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output format: text, markdown, csv or json
        #[arg(long, default_value = "text")]
        format: String,
        /// Also write the table as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Series hidden in the chart legend (repeatable)
        #[arg(long)]
        hide: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Build history file (JSON array, or JSONL with one series per line)
    #[arg(long)]
    input: PathBuf,
    /// Config file (TOML, or YAML for .yaml/.yml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Keep only the most recent N builds (0 = all)
    #[arg(long)]
    last: Option<usize>,
    /// Case-insensitive pattern test names must match
    #[arg(long)]
    name_regex: Option<String>,
    /// Builds to keep, e.g. "100-110,115"
    #[arg(long)]
    include: Option<String>,
    /// Builds to drop, e.g. "104,107-108"
    #[arg(long)]
    exclude: Option<String>,
    /// Keep points from failed builds (`--show-failed=false` overrides the config file)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    show_failed: Option<bool>,
    /// Baseline build label, or a negative offset such as -1 for the previous build
    #[arg(long, allow_hyphen_values = true)]
    relative_to: Option<String>,
    /// Show relative values as percentages
    #[arg(long)]
    percent: bool,
}

impl FilterArgs {
    fn split(self) -> (PathBuf, Option<PathBuf>, FilterOptions) {
        let overrides = FilterOptions {
            num_last_builds: self.last,
            test_name_regex: self.name_regex,
            include_builds: self.include,
            exclude_builds: self.exclude,
            show_failed_builds: self.show_failed,
            relative_to_build: self.relative_to,
            unit: self.percent.then_some(Unit::Percent),
        };
        (self.input, self.config, overrides)
    }
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("TEST_TREND_LOG").unwrap_or_else(|_| {
        if verbose { "test_trend=debug".to_string() } else { "test_trend=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_span_events(FmtSpan::ACTIVE)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Filter { filter, json } => {
            let (input, config, overrides) = filter.split();
            filter_cmd::run(input, config, overrides, json).map(|_| ())
        }
        Commands::Table { filter, format, csv, hide } => {
            let (input, config, overrides) = filter.split();
            table_cmd::run(input, config, overrides, hide, format, csv).map(|_| ())
        }
    };

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(e.exit_code());
    }
}
