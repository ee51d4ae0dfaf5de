//! Conversion engine: validation, cached cross-rates and ad-hoc fetches

use crate::core::cache::RateCache;
use crate::core::currency::{CurrencyInfo, find_currency};
use crate::core::error::{ConvertError, ConvertResult, FetchError, FetchResult};
use crate::core::rates::RateFetcher;
use crate::core::state::{ApplicationState, Stats};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

const OP_CONVERT: &str = "convert";
const OP_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// Same source and target currency.
    Identity,
    /// Cross-rate derived from the cached table.
    Cache,
    /// Read from a table fetched for this conversion.
    Fetched,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub converted_amount: f64,
    pub effective_rate: f64,
    pub source: RateSource,
}

pub(crate) fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub struct ConversionEngine {
    fetcher: Arc<dyn RateFetcher>,
    cache: RateCache,
    base_currency: String,
    currencies: &'static [CurrencyInfo],
    state: ApplicationState,
}

impl ConversionEngine {
    /// The cache is always keyed to `base_currency`; `force_refresh` is the only
    /// writer and always fetches that base.
    pub fn new(
        fetcher: Arc<dyn RateFetcher>,
        base_currency: &str,
        currencies: &'static [CurrencyInfo],
    ) -> Self {
        Self {
            fetcher,
            cache: RateCache::new(),
            base_currency: base_currency.to_uppercase(),
            currencies,
            state: ApplicationState::new(),
        }
    }

    #[instrument(name = "Convert", skip(self), fields(from = %from, to = %to))]
    pub async fn convert(&mut self, amount: f64, from: &str, to: &str) -> ConvertResult<Conversion> {
        let (from, to) = self.validate(amount, from, to)?;

        if from == to {
            return Ok(Conversion {
                from,
                to,
                converted_amount: amount,
                effective_rate: 1.0,
                source: RateSource::Identity,
            });
        }

        if let (Some(from_rate), Some(to_rate)) = (self.cache.get(&from), self.cache.get(&to)) {
            let rate = to_rate / from_rate;
            debug!(rate, "Using cached cross-rate");
            return self.finish(amount, from, to, rate, RateSource::Cache);
        }

        debug!("Pair not cached, fetching with {} as base", from);
        self.begin_fetch();
        let result = self.fetcher.fetch_rate(&from, &to).await;
        let rate = self.end_fetch(OP_CONVERT, result)?;
        self.finish(amount, from, to, rate, RateSource::Fetched)
    }

    /// Applies the rate. A rate or result that is not positive and finite is
    /// an overflow or underflow and counts as a failed conversion.
    fn finish(
        &mut self,
        amount: f64,
        from: String,
        to: String,
        rate: f64,
        source: RateSource,
    ) -> ConvertResult<Conversion> {
        let converted_amount = amount * rate;
        if !is_positive_finite(rate) || !is_positive_finite(converted_amount) {
            let message = format!(
                "Conversion of {amount} {from} to {to} out of range (rate {rate}, result {converted_amount})"
            );
            error!(operation = OP_CONVERT, %message, "Conversion result out of range");
            self.state.record_error(OP_CONVERT, message);
            return Err(ConvertError::Failed);
        }
        Ok(Conversion {
            from,
            to,
            converted_amount,
            effective_rate: rate,
            source,
        })
    }

    /// Replaces the cached table with a fresh one for the base currency,
    /// regardless of how old the current table is.
    #[instrument(name = "ForceRefresh", skip(self), fields(base = %self.base_currency))]
    pub async fn force_refresh(&mut self) -> ConvertResult<()> {
        self.begin_fetch();
        let result = self.fetcher.fetch_rates_for(&self.base_currency).await;
        let table = self.end_fetch(OP_REFRESH, result)?;

        info!(entries = table.len(), "Exchange rates refreshed");
        self.cache.replace(table);
        self.state.last_update = Some(Utc::now());
        Ok(())
    }

    fn validate(&self, amount: f64, from: &str, to: &str) -> ConvertResult<(String, String)> {
        if !amount.is_finite() {
            return Err(ConvertError::Validation(
                "Please enter a valid amount".to_string(),
            ));
        }
        if amount <= 0.0 {
            return Err(ConvertError::Validation(
                "Amount must be greater than zero".to_string(),
            ));
        }
        if amount > MAX_AMOUNT {
            return Err(ConvertError::Validation(
                "Amount must not exceed 1,000,000,000".to_string(),
            ));
        }

        let from = self.check_currency(from, "source")?;
        let to = self.check_currency(to, "target")?;
        Ok((from, to))
    }

    fn check_currency(&self, code: &str, role: &str) -> ConvertResult<String> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ConvertError::Validation(format!(
                "Please select a {role} currency"
            )));
        }
        find_currency(self.currencies, code)
            .map(|c| c.code.to_string())
            .ok_or_else(|| ConvertError::Validation(format!("Unsupported currency: {code}")))
    }

    fn begin_fetch(&mut self) {
        self.state.api_call_count += 1;
        self.state.fetch_in_flight = true;
    }

    fn end_fetch<T>(&mut self, operation: &str, result: FetchResult<T>) -> ConvertResult<T> {
        self.state.fetch_in_flight = false;
        result.map_err(|e| match e {
            FetchError::UnsupportedCurrency(code) => ConvertError::UnsupportedCurrency(code),
            other => {
                error!(operation, error = %other, "Rate fetch failed");
                self.state.record_error(operation, other.to_string());
                ConvertError::Failed
            }
        })
    }

    pub fn record_error(&mut self, operation: &str, message: impl Into<String>) {
        self.state.record_error(operation, message);
    }

    pub fn stats(&self) -> Stats {
        Stats {
            api_call_count: self.state.api_call_count,
            last_update: self.state.last_update,
            error_count: self.state.errors().len(),
            supported_currency_count: self.currencies.len(),
        }
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn currencies(&self) -> &'static [CurrencyInfo] {
        self.currencies
    }
}
