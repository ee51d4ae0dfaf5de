use super::ui;
use crate::core::state::Stats;

pub fn render(stats: &Stats, history_len: usize) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);

    let last_update = stats
        .last_update
        .map_or_else(|| "never".to_string(), ui::format_timestamp);
    let rows = [
        ("API calls", stats.api_call_count.to_string()),
        ("Last rate update", last_update),
        ("Errors", stats.error_count.to_string()),
        (
            "Supported currencies",
            stats.supported_currency_count.to_string(),
        ),
        ("History entries", history_len.to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![comfy_table::Cell::new(label), ui::number_cell(value)]);
    }
    table.to_string()
}
