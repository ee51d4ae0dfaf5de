use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxc::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxc::AppCommand {
    fn from(cmd: Commands) -> fxc::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                from,
                to,
                swap,
            } => fxc::AppCommand::Convert {
                amount,
                from,
                to,
                swap,
            },
            Commands::Rates => fxc::AppCommand::Rates,
            Commands::History { clear } => fxc::AppCommand::History { clear },
            Commands::Stats => fxc::AppCommand::Stats,
            Commands::Currencies => fxc::AppCommand::Currencies,
            Commands::Interactive => fxc::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Source currency code, e.g. USD
        from: String,
        /// Target currency code, e.g. IDR
        to: String,
        /// Swap source and target before converting
        #[arg(short, long)]
        swap: bool,
    },
    /// Refresh and display exchange rates
    Rates,
    /// Display conversion history
    History {
        /// Remove all stored conversions
        #[arg(long)]
        clear: bool,
    },
    /// Display session statistics
    Stats,
    /// List supported currencies
    Currencies,
    /// Start an interactive conversion session
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxc::cli::setup::setup(),
        Some(cmd) => fxc::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
