//! Core conversion logic and abstractions

pub mod cache;
pub mod config;
pub mod currency;
pub mod engine;
pub mod error;
pub mod history;
pub mod log;
pub mod rates;
pub mod schedule;
pub mod state;

// Re-export main types for cleaner imports
pub use currency::{CurrencyInfo, SUPPORTED_CURRENCIES, SymbolPlacement};
pub use engine::{Conversion, ConversionEngine, RateSource};
pub use error::{ConvertError, FetchError};
pub use history::{ConversionRecord, HistoryLog, HistoryStore, PersistedHistory};
pub use rates::{RateFetcher, RateTable};
pub use state::Stats;
