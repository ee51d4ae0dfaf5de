use super::ui;
use crate::core::CurrencyInfo;
use crate::core::rates::RateTable;
use chrono::{DateTime, Utc};

/// Renders the cached table, limited to supported currencies.
pub fn render_rates(
    table: &RateTable,
    fetched_at: Option<DateTime<Utc>>,
    currencies: &[CurrencyInfo],
) -> String {
    let mut grid = ui::new_styled_table();
    grid.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Name"),
        ui::header_cell(&format!("Per 1 {}", table.base())),
    ]);

    for currency in currencies {
        let rate = table
            .get(currency.code)
            .map_or_else(|| "N/A".to_string(), ui::format_rate);
        grid.add_row(vec![
            comfy_table::Cell::new(currency.code),
            comfy_table::Cell::new(currency.name),
            ui::number_cell(rate),
        ]);
    }

    let updated = fetched_at.map_or_else(|| "never".to_string(), ui::format_timestamp);
    format!(
        "{}\n\n{}\n{}",
        ui::style_text(&format!("Exchange rates ({})", table.base()), ui::StyleType::Title),
        grid,
        ui::style_text(&format!("Last updated: {updated}"), ui::StyleType::Subtle)
    )
}

pub fn render_currencies(currencies: &[CurrencyInfo]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
        ui::header_cell("Example"),
    ]);
    for currency in currencies {
        table.add_row(vec![
            comfy_table::Cell::new(currency.code),
            comfy_table::Cell::new(currency.name),
            comfy_table::Cell::new(currency.symbol),
            ui::number_cell(currency.format_amount(1234.5)),
        ]);
    }
    table.to_string()
}
