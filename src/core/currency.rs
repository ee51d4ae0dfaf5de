//! Supported currencies and their display rules

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPlacement {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub placement: SymbolPlacement,
}

impl CurrencyInfo {
    /// Formats an amount with this currency's symbol, e.g. `$12.50` or `12.50 €`.
    pub fn format_amount(&self, amount: f64) -> String {
        match self.placement {
            SymbolPlacement::Before => format!("{}{amount:.2}", self.symbol),
            SymbolPlacement::After => format!("{amount:.2} {}", self.symbol),
        }
    }
}

impl Display for CurrencyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code, self.name)
    }
}

const fn currency(
    code: &'static str,
    name: &'static str,
    symbol: &'static str,
    placement: SymbolPlacement,
) -> CurrencyInfo {
    CurrencyInfo {
        code,
        name,
        symbol,
        placement,
    }
}

pub static SUPPORTED_CURRENCIES: [CurrencyInfo; 16] = [
    currency("USD", "US Dollar", "$", SymbolPlacement::Before),
    currency("EUR", "Euro", "€", SymbolPlacement::After),
    currency("GBP", "British Pound", "£", SymbolPlacement::Before),
    currency("JPY", "Japanese Yen", "¥", SymbolPlacement::Before),
    currency("IDR", "Indonesian Rupiah", "Rp", SymbolPlacement::Before),
    currency("SGD", "Singapore Dollar", "S$", SymbolPlacement::Before),
    currency("MYR", "Malaysian Ringgit", "RM", SymbolPlacement::Before),
    currency("AUD", "Australian Dollar", "A$", SymbolPlacement::Before),
    currency("CAD", "Canadian Dollar", "C$", SymbolPlacement::Before),
    currency("CHF", "Swiss Franc", "Fr.", SymbolPlacement::After),
    currency("CNY", "Chinese Yuan", "¥", SymbolPlacement::Before),
    currency("KRW", "South Korean Won", "₩", SymbolPlacement::Before),
    currency("INR", "Indian Rupee", "₹", SymbolPlacement::Before),
    currency("THB", "Thai Baht", "฿", SymbolPlacement::Before),
    currency("HKD", "Hong Kong Dollar", "HK$", SymbolPlacement::Before),
    currency("SEK", "Swedish Krona", "kr", SymbolPlacement::After),
];

/// Looks up a currency in a supported table. Codes are matched case-insensitively.
pub fn find_currency<'a>(table: &'a [CurrencyInfo], code: &str) -> Option<&'a CurrencyInfo> {
    table.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}
