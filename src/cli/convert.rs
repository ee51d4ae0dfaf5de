use super::ui;
use crate::controller::{Controller, swap};
use crate::core::history::{ConversionRecord, HistoryStore};
use crate::core::CurrencyInfo;
use anyhow::Result;

/// Renders a conversion as `$1.00 = Rp15000.00` followed by both rate directions.
pub fn render_record(record: &ConversionRecord, currencies: &[CurrencyInfo]) -> String {
    let source = ui::format_money(currencies, &record.source_currency, record.source_amount);
    let target = ui::format_money(currencies, &record.target_currency, record.target_amount);

    let mut output = format!(
        "{} = {}\n",
        source,
        ui::style_text(&target, ui::StyleType::Result)
    );
    output.push_str(&ui::style_text(
        &format!(
            "1 {} = {} {}  |  1 {} = {} {}",
            record.source_currency,
            ui::format_rate(record.rate),
            record.target_currency,
            record.target_currency,
            ui::format_rate(1.0 / record.rate),
            record.source_currency,
        ),
        ui::StyleType::Subtle,
    ));
    output
}

/// Loads the latest table for the base currency. A failure is only an
/// advisory: conversions then fetch the pair they need on demand.
pub async fn load_rates<S: HistoryStore>(controller: &mut Controller<S>) -> bool {
    let spinner = ui::new_spinner("Loading exchange rates...");
    let result = controller.force_refresh().await;
    spinner.finish_and_clear();

    if result.is_err() {
        eprintln!(
            "{}",
            ui::style_text(
                "Could not load the latest exchange rates. Rates will be fetched per conversion.",
                ui::StyleType::Warning
            )
        );
    }
    result.is_ok()
}

pub async fn run<S: HistoryStore>(
    controller: &mut Controller<S>,
    amount: f64,
    from: &str,
    to: &str,
    swap_pair: bool,
) -> Result<()> {
    let (from, to) = if swap_pair { swap(from, to) } else { (from, to) };

    load_rates(controller).await;
    let record = controller.convert(amount, from, to).await?;
    println!(
        "{}",
        render_record(&record, controller.engine().currencies())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::SUPPORTED_CURRENCIES;

    #[test]
    fn test_render_record_shows_both_directions() {
        let record = ConversionRecord::new(1.0, "USD", 15000.0, "IDR", 15000.0);
        let output = console::strip_ansi_codes(&render_record(&record, &SUPPORTED_CURRENCIES))
            .to_string();

        assert!(output.contains("$1.00 = Rp15000.00"));
        assert!(output.contains("1 USD = 15000.0000 IDR"));
        assert!(output.contains("1 IDR = 0.000067 USD"));
    }
}
