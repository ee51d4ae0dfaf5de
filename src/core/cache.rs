use crate::core::rates::RateTable;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Holds the most recently fetched rate table for a single base currency.
#[derive(Debug, Default)]
pub struct RateCache {
    entry: Option<CachedTable>,
}

#[derive(Debug)]
struct CachedTable {
    table: RateTable,
    fetched_at: DateTime<Utc>,
}

impl RateCache {
    pub fn new() -> Self {
        Self { entry: None }
    }

    pub fn get(&self, currency: &str) -> Option<f64> {
        let value = self.entry.as_ref().and_then(|e| e.table.get(currency));
        if value.is_some() {
            debug!(currency, "Cache HIT");
        } else {
            debug!(currency, "Cache MISS");
        }
        value
    }

    /// Swaps in a new table. The previous table is discarded whole.
    pub fn replace(&mut self, table: RateTable) {
        debug!(base = table.base(), entries = table.len(), "Cache REPLACE");
        self.entry = Some(CachedTable {
            table,
            fetched_at: Utc::now(),
        });
    }

    pub fn base(&self) -> Option<&str> {
        self.entry.as_ref().map(|e| e.table.base())
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|e| e.fetched_at)
    }

    pub fn table(&self) -> Option<&RateTable> {
        self.entry.as_ref().map(|e| &e.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn table(base: &str, rates: &[(&str, f64)]) -> RateTable {
        RateTable::new(
            base,
            rates.iter().map(|(k, v)| (k.to_string(), *v)).collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn test_cache_get_replace() {
        let mut cache = RateCache::new();

        // Initially, cache is empty
        assert!(cache.get("EUR").is_none());
        assert!(cache.base().is_none());
        assert!(cache.fetched_at().is_none());

        cache.replace(table("USD", &[("EUR", 0.9), ("GBP", 0.8)]));
        assert_eq!(cache.get("EUR"), Some(0.9));
        assert_eq!(cache.get("USD"), Some(1.0));
        assert_eq!(cache.base(), Some("USD"));
        assert!(cache.fetched_at().is_some());
    }

    #[test]
    fn test_replace_discards_previous_entries() {
        let mut cache = RateCache::new();
        cache.replace(table("USD", &[("EUR", 0.9), ("GBP", 0.8)]));
        cache.replace(table("USD", &[("JPY", 150.0)]));

        assert!(cache.get("EUR").is_none());
        assert!(cache.get("GBP").is_none());
        assert_eq!(cache.get("JPY"), Some(150.0));
    }
}
