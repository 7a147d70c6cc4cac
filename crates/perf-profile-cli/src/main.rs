mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Build and report Dolan-Moré performance profiles", long_about = None)]
struct Cli {
    /// TOML file declaring additional profiles (overrides PERF_PROFILE_CONFIG)
    #[arg(long, global = true, env = "PERF_PROFILE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered profile names
    List,
    /// Print robustness/efficiency report for a profile
    Report {
        #[command(flatten)]
        input: ProfileInput,

        /// Emit the report as JSON instead of markdown
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write step-function curve data for plotting
    Curves {
        #[command(flatten)]
        input: ProfileInput,

        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Which results to load and which profile to build
#[derive(Args, Debug)]
struct ProfileInput {
    /// Results document shaped {"results": [...]}
    #[arg(long, short)]
    results: PathBuf,

    /// Registered profile name
    #[arg(long, short, default_value = "wall_time")]
    profile: String,

    /// Benchmark identifier (defaults to the results file stem)
    #[arg(long)]
    bench_id: Option<String>,

    /// Restrict the profile to these combo labels, e.g. "(lbfgs)"
    #[arg(long = "combo")]
    combos: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = commands::load_registry(cli.config.as_deref())?;

    match cli.command {
        Command::List => {
            for name in registry.list() {
                println!("{}", name);
            }
        }
        Command::Report { input, json } => {
            if let Some(text) = commands::report(&registry, &input.request(), json)? {
                println!("{}", text);
            }
        }
        Command::Curves { input, output } => {
            commands::curves(&registry, &input.request(), output.as_deref())?;
        }
    }

    Ok(())
}

impl ProfileInput {
    fn request(&self) -> commands::ProfileRequest<'_> {
        commands::ProfileRequest {
            results: &self.results,
            profile: &self.profile,
            bench_id: self.bench_id.clone(),
            combos: (!self.combos.is_empty()).then_some(self.combos.as_slice()),
        }
    }
}
