//! CLI for padtop — live terminal telemetry for scratchpad servers.

mod commands;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "padtop")]
#[command(about = "padtop — live terminal telemetry for scratchpad servers")]
#[command(version = padtop_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard: scrolling charts plus the system info panel
    Watch {
        /// Base URL of the scratchpad server
        #[arg(long, default_value = padtop_core::DEFAULT_BASE_URL)]
        url: String,

        /// Scrape interval in milliseconds
        #[arg(long, default_value = "1000")]
        interval_ms: u64,

        /// Points retained per chart
        #[arg(long, default_value = "20")]
        history: usize,

        /// Metric namespace whose lines are charted
        #[arg(long, default_value = padtop_core::DEFAULT_NAMESPACE)]
        namespace: String,
    },

    /// One scrape-parse cycle, printed as a table (pipe-friendly)
    Scrape {
        /// Base URL of the scratchpad server
        #[arg(long, default_value = padtop_core::DEFAULT_BASE_URL)]
        url: String,

        /// Metric namespace whose lines are kept
        #[arg(long, default_value = padtop_core::DEFAULT_NAMESPACE)]
        namespace: String,

        /// Print machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// One system-info fetch, printed as a property table
    Info {
        /// Base URL of the scratchpad server
        #[arg(long, default_value = padtop_core::DEFAULT_BASE_URL)]
        url: String,

        /// Print machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Serve synthetic /metrics and /system_info for trying the dashboard
    Demo {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "30000")]
        port: u16,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            url,
            interval_ms,
            history,
            namespace,
        } => commands::watch::run(&url, &namespace, interval_ms, history),
        Commands::Scrape {
            url,
            namespace,
            json,
        } => commands::scrape::run(&url, &namespace, json),
        Commands::Info { url, json } => commands::info::run(&url, json),
        Commands::Demo { host, port } => commands::demo::run(&host, port),
    }
}
