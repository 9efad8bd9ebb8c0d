use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod display;
mod logging;

#[derive(Parser)]
#[command(name = "vgtimer", version, about = "Vale Guardian encounter timers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timers, reading trigger identifiers from stdin
    Run(commands::timer::RunArgs),
    /// Show the resolved trigger bindings
    Bindings {
        /// Config file to read instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Configuration management
    Config {
        /// Config file to use instead of the default location
        #[arg(long, global = true)]
        config: Option<PathBuf>,
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    logging::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::timer::run(args),
        Commands::Bindings { config } => commands::bindings::run(config.as_deref()),
        Commands::Config { config, action } => commands::config::run(action, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
