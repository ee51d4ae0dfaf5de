//! Interactive conversion session.
//!
//! Input lines edit a small form (amount, source, target). Every edit schedules
//! a conversion through a debouncer so bursts of input, such as pasted lines,
//! only convert once. Swaps are throttled. A periodic tick reloads rates at
//! the configured refresh interval while online.

use super::{convert, history, rates, stats, ui};
use crate::controller::{Controller, swap};
use crate::core::history::HistoryStore;
use crate::core::schedule::{DEBOUNCE_QUIET_PERIOD, Debouncer, SWAP_THROTTLE_INTERVAL, Throttle};
use anyhow::Result;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

const HELP: &str = "\
Commands:
  <amount> [from] [to]   convert, e.g. `100 usd idr` or just `250`
  from <code>            set the source currency
  to <code>              set the target currency
  swap                   exchange source and target
  refresh                reload exchange rates now
  rates                  show cached rates
  history                show past conversions
  clear                  clear conversion history
  stats                  show session statistics
  offline | online       report connectivity changes
  resume                 reload rates if they went stale while away
  help                   show this help
  quit                   leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Convert {
        amount: f64,
        from: Option<String>,
        to: Option<String>,
    },
    SetFrom(String),
    SetTo(String),
    Swap,
    Refresh,
    Rates,
    History,
    Clear,
    Stats,
    Offline,
    Online,
    Resume,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut tokens = line.split_whitespace();
    let Some(head) = tokens.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = tokens.collect();

    let keyword = head.to_lowercase();
    let command = match keyword.as_str() {
        "quit" | "exit" | "q" => Command::Quit,
        "help" | "?" => Command::Help,
        "swap" => Command::Swap,
        "refresh" => Command::Refresh,
        "rates" => Command::Rates,
        "history" => Command::History,
        "clear" => Command::Clear,
        "stats" => Command::Stats,
        "offline" => Command::Offline,
        "online" => Command::Online,
        "resume" => Command::Resume,
        "from" | "to" => {
            let [code] = rest.as_slice() else {
                return Err(format!("Usage: {keyword} <currency>"));
            };
            let code = code.to_uppercase();
            if keyword == "from" {
                Command::SetFrom(code)
            } else {
                Command::SetTo(code)
            }
        }
        _ => {
            let amount: f64 = head
                .replace(',', "")
                .parse()
                .map_err(|_| format!("Unknown command: {head}. Type `help` for commands."))?;
            if rest.len() > 2 {
                return Err("Usage: <amount> [from] [to]".to_string());
            }
            Command::Convert {
                amount,
                from: rest.first().map(|c| c.to_uppercase()),
                to: rest.get(1).map(|c| c.to_uppercase()),
            }
        }
    };
    Ok(Some(command))
}

#[derive(Debug, Clone, PartialEq)]
struct Form {
    amount: Option<f64>,
    from: String,
    to: String,
}

impl Form {
    fn request(&self) -> Option<(f64, String, String)> {
        self.amount
            .map(|amount| (amount, self.from.clone(), self.to.clone()))
    }
}

pub async fn run<S: HistoryStore>(
    controller: &mut Controller<S>,
    refresh_interval: Duration,
) -> Result<()> {
    let mut form = Form {
        amount: None,
        from: controller.engine().base_currency().to_string(),
        to: "EUR".to_string(),
    };
    let mut debouncer = Debouncer::new(DEBOUNCE_QUIET_PERIOD);
    let mut swap_throttle = Throttle::new(SWAP_THROTTLE_INTERVAL);
    let period = refresh_interval.max(Duration::from_secs(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    println!("{}", ui::style_text("fxc interactive", ui::StyleType::Title));
    println!("{HELP}\n");
    convert::load_rates(controller).await;
    println!("Converting {} → {}", form.from, form.to);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed, leaving session");
                    break;
                };
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(message) => {
                        println!("{}", ui::style_text(&message, ui::StyleType::Error));
                        continue;
                    }
                };
                match command {
                    Command::Quit => break,
                    Command::Help => println!("{HELP}"),
                    Command::Convert { amount, from, to } => {
                        form.amount = Some(amount);
                        if let Some(from) = from {
                            form.from = from;
                        }
                        if let Some(to) = to {
                            form.to = to;
                        }
                    }
                    Command::SetFrom(code) => form.from = code,
                    Command::SetTo(code) => form.to = code,
                    Command::Swap => {
                        if swap_throttle.try_acquire() {
                            let (from, to) = swap(&form.from, &form.to);
                            let (from, to) = (from.to_string(), to.to_string());
                            form.from = from;
                            form.to = to;
                            println!("Converting {} → {}", form.from, form.to);
                        } else {
                            debug!("Swap throttled");
                            continue;
                        }
                    }
                    Command::Refresh => {
                        convert::load_rates(controller).await;
                        continue;
                    }
                    Command::Rates => {
                        match controller.rates() {
                            Some(table) => println!(
                                "{}",
                                rates::render_rates(
                                    table,
                                    controller.engine().cache().fetched_at(),
                                    controller.engine().currencies()
                                )
                            ),
                            None => println!("No exchange rates loaded yet."),
                        }
                        continue;
                    }
                    Command::History => {
                        println!(
                            "{}",
                            history::render(controller.history(), controller.engine().currencies())
                        );
                        continue;
                    }
                    Command::Clear => {
                        controller.clear_history();
                        println!("History cleared.");
                        continue;
                    }
                    Command::Stats => {
                        println!(
                            "{}",
                            stats::render(&controller.stats(), controller.history().len())
                        );
                        continue;
                    }
                    Command::Offline => {
                        if let Some(advisory) = controller.set_online(false) {
                            println!("{}", ui::style_text(advisory, ui::StyleType::Warning));
                        }
                        continue;
                    }
                    Command::Online => {
                        controller.set_online(true);
                        refresh_if_stale(controller).await;
                        continue;
                    }
                    Command::Resume => {
                        refresh_if_stale(controller).await;
                        continue;
                    }
                }
                if let Some(request) = form.request() {
                    debouncer.trigger(request);
                }
            }
            Some((amount, from, to)) = debouncer.fired(), if debouncer.is_pending() => {
                match controller.convert(amount, &from, &to).await {
                    Ok(record) => println!(
                        "{}",
                        convert::render_record(&record, controller.engine().currencies())
                    ),
                    Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
                }
            }
            _ = ticker.tick() => {
                match controller.periodic_refresh().await {
                    Ok(true) => debug!("Scheduled rate refresh done"),
                    Ok(false) => {}
                    Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Warning)),
                }
            }
        }
    }
    Ok(())
}

async fn refresh_if_stale<S: HistoryStore>(controller: &mut Controller<S>) {
    match controller.refresh_if_stale().await {
        Ok(true) => println!(
            "{}",
            ui::style_text("Exchange rates updated.", ui::StyleType::Subtle)
        ),
        Ok(false) => {}
        Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Warning)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_with_currencies() {
        assert_eq!(
            parse_command("100 usd idr"),
            Ok(Some(Command::Convert {
                amount: 100.0,
                from: Some("USD".to_string()),
                to: Some("IDR".to_string()),
            }))
        );
        assert_eq!(
            parse_command("  1,250.5  "),
            Ok(Some(Command::Convert {
                amount: 1250.5,
                from: None,
                to: None,
            }))
        );
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_command("SWAP"), Ok(Some(Command::Swap)));
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command("from eur"), Ok(Some(Command::SetFrom("EUR".to_string()))));
        assert_eq!(parse_command("to jpy"), Ok(Some(Command::SetTo("JPY".to_string()))));
        assert_eq!(parse_command(""), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("from").is_err());
        assert!(parse_command("to a b").is_err());
        assert!(parse_command("convert 100").unwrap_err().contains("Unknown command"));
        assert!(parse_command("1 usd eur gbp").is_err());
    }

    #[test]
    fn test_form_requires_amount() {
        let mut form = Form {
            amount: None,
            from: "USD".to_string(),
            to: "EUR".to_string(),
        };
        assert!(form.request().is_none());
        form.amount = Some(5.0);
        assert_eq!(
            form.request(),
            Some((5.0, "USD".to_string(), "EUR".to_string()))
        );
    }
}
