pub mod cli;
pub mod controller;
pub mod core;
pub mod providers;
pub mod store;

use crate::controller::Controller;
use crate::core::config::AppConfig;
use crate::core::currency::{SUPPORTED_CURRENCIES, find_currency};
use crate::core::history::PersistedHistory;
use crate::core::schedule::RefreshPolicy;
use crate::core::ConversionEngine;
use crate::providers::ExchangeRateApiProvider;
use crate::store::DiskStore;
use anyhow::{Result, ensure};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Convert {
        amount: f64,
        from: String,
        to: String,
        swap: bool,
    },
    Rates,
    History {
        clear: bool,
    },
    Stats,
    Currencies,
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxc starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    if command == AppCommand::Currencies {
        println!("{}", cli::rates::render_currencies(&SUPPORTED_CURRENCIES));
        return Ok(());
    }

    let mut controller = build_controller(&config)?;
    match command {
        AppCommand::Convert {
            amount,
            from,
            to,
            swap,
        } => cli::convert::run(&mut controller, amount, &from, &to, swap).await,
        AppCommand::Rates => {
            cli::convert::load_rates(&mut controller).await;
            match controller.rates() {
                Some(table) => println!(
                    "{}",
                    cli::rates::render_rates(
                        table,
                        controller.engine().cache().fetched_at(),
                        &SUPPORTED_CURRENCIES
                    )
                ),
                None => anyhow::bail!("Exchange rates are unavailable right now"),
            }
            Ok(())
        }
        AppCommand::History { clear } => {
            if clear {
                controller.clear_history();
                println!("History cleared.");
            } else {
                println!(
                    "{}",
                    cli::history::render(controller.history(), &SUPPORTED_CURRENCIES)
                );
            }
            Ok(())
        }
        AppCommand::Stats => {
            println!(
                "{}",
                cli::stats::render(&controller.stats(), controller.history().len())
            );
            Ok(())
        }
        AppCommand::Interactive => {
            cli::session::run(&mut controller, config.refresh_interval()).await
        }
        AppCommand::Currencies => Ok(()),
    }
}

/// Wires the provider, engine and on-disk history from config.
pub fn build_controller(config: &AppConfig) -> Result<Controller<DiskStore>> {
    ensure!(
        find_currency(&SUPPORTED_CURRENCIES, &config.base_currency).is_some(),
        "Unsupported base currency in config: {}",
        config.base_currency
    );

    let provider = ExchangeRateApiProvider::new(&config.provider.base_url, config.provider.timeout())?;
    let engine = ConversionEngine::new(
        Arc::new(provider),
        &config.base_currency,
        &SUPPORTED_CURRENCIES,
    );

    let store = DiskStore::open(&config.data_path()?)?;
    let history = PersistedHistory::load(store);

    Ok(Controller::new(
        engine,
        history,
        RefreshPolicy::new(config.refresh_interval()),
    ))
}
