use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod progress;

use commands::{ConfigAction, CrawlArgs};

#[derive(Parser)]
#[command(name = "depscout")]
#[command(version, about = "Crawl the PyPI dependency graph and bulk-load it into Neo4j", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/depscout/config.toml)
    #[arg(long, global = true, env = "DEPSCOUT_CONFIG")]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Resolve seed packages recursively and export the graph
    Crawl(CrawlArgs),
    /// Bulk-load exported tables into Neo4j
    Load,
    /// Look up a single package and print what the crawler would record
    Lookup {
        /// Package name
        name: String,
    },
    /// Show or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("depscout={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(progress::LogWriter))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    let load_config = || depscout_core::Config::load(config_path);

    match cli.command {
        Commands::Crawl(args) => commands::crawl::run(&load_config()?, args).await,
        Commands::Load => commands::load::run(&load_config()?).await,
        Commands::Lookup { name } => commands::lookup::run(&load_config()?, &name).await,
        Commands::Config { action } => commands::config::run(config_path, action),
    }
}
