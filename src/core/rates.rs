//! Rate tables and the fetcher abstraction

use crate::core::error::{FetchError, FetchResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::warn;

/// Units of each currency per one unit of `base`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Builds a table, dropping entries that are not positive finite numbers.
    /// The base currency always maps to exactly 1.0.
    pub fn new(base: &str, rates: HashMap<String, f64>) -> Self {
        let base = base.to_uppercase();
        let mut rates: HashMap<String, f64> = rates
            .into_iter()
            .filter_map(|(code, rate)| {
                if rate.is_finite() && rate > 0.0 {
                    Some((code.to_uppercase(), rate))
                } else {
                    warn!(%code, rate, "Dropping invalid rate from table");
                    None
                }
            })
            .collect();
        rates.insert(base.clone(), 1.0);
        Self { base, rates }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Entries sorted by currency code.
    pub fn sorted(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<_> = self.rates.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[async_trait]
pub trait RateFetcher: Send + Sync {
    async fn fetch_rates_for(&self, base: &str) -> FetchResult<RateTable>;

    /// Fetches the table for `base` and reads a single `target` rate out of it.
    async fn fetch_rate(&self, base: &str, target: &str) -> FetchResult<f64> {
        let table = self.fetch_rates_for(base).await?;
        table
            .get(target)
            .ok_or_else(|| FetchError::UnsupportedCurrency(target.to_string()))
    }
}
