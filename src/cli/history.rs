use super::ui;
use crate::core::CurrencyInfo;
use crate::core::history::HistoryLog;

pub fn render(history: &HistoryLog, currencies: &[CurrencyInfo]) -> String {
    if history.is_empty() {
        return ui::style_text("No conversions yet.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Time"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Rate"),
    ]);

    for record in history.list() {
        table.add_row(vec![
            comfy_table::Cell::new(ui::format_timestamp(record.timestamp)),
            ui::number_cell(ui::format_money(
                currencies,
                &record.source_currency,
                record.source_amount,
            )),
            ui::number_cell(ui::format_money(
                currencies,
                &record.target_currency,
                record.target_amount,
            )),
            ui::number_cell(ui::format_rate(record.rate)),
        ]);
    }

    format!(
        "{}\n\n{}\n{} of {} entries",
        ui::style_text("Conversion history", ui::StyleType::Title),
        table,
        history.len(),
        crate::core::history::HISTORY_CAPACITY
    )
}
