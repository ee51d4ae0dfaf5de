//! Bounded conversion history and its persisted form

use crate::core::currency::{SUPPORTED_CURRENCIES, find_currency};
use crate::core::engine::{MAX_AMOUNT, is_positive_finite};
use anyhow::{Result, ensure};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, error, warn};

pub const HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRecord {
    pub source_amount: f64,
    pub source_currency: String,
    pub target_amount: f64,
    pub target_currency: String,
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl ConversionRecord {
    /// Creates a record stamped with the current time at millisecond precision,
    /// which is what the persisted form keeps.
    pub fn new(
        source_amount: f64,
        source_currency: &str,
        target_amount: f64,
        target_currency: &str,
        rate: f64,
    ) -> Self {
        Self::at(
            source_amount,
            source_currency,
            target_amount,
            target_currency,
            rate,
            Utc::now(),
        )
    }

    pub fn at(
        source_amount: f64,
        source_currency: &str,
        target_amount: f64,
        target_currency: &str,
        rate: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            source_amount,
            source_currency: source_currency.to_string(),
            target_amount,
            target_currency: target_currency.to_string(),
            rate,
            timestamp: timestamp.trunc_subsecs(3),
        }
    }

    /// Amounts and rate positive and finite, source amount within the
    /// conversion limit, both codes supported.
    pub fn is_valid(&self) -> bool {
        let supported = |code: &str| {
            find_currency(&SUPPORTED_CURRENCIES, code).is_some_and(|c| c.code == code)
        };
        is_positive_finite(self.source_amount)
            && self.source_amount <= MAX_AMOUNT
            && is_positive_finite(self.target_amount)
            && is_positive_finite(self.rate)
            && supported(&self.source_currency)
            && supported(&self.target_currency)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedRecord {
    source_amount: f64,
    source_currency: String,
    target_amount: f64,
    target_currency: String,
    rate: f64,
    timestamp: String,
}

impl From<&ConversionRecord> for PersistedRecord {
    fn from(record: &ConversionRecord) -> Self {
        Self {
            source_amount: record.source_amount,
            source_currency: record.source_currency.clone(),
            target_amount: record.target_amount,
            target_currency: record.target_currency.clone(),
            rate: record.rate,
            timestamp: record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl TryFrom<PersistedRecord> for ConversionRecord {
    type Error = chrono::ParseError;

    fn try_from(record: PersistedRecord) -> Result<Self, Self::Error> {
        let timestamp = DateTime::parse_from_rfc3339(&record.timestamp)?.with_timezone(&Utc);
        Ok(Self {
            source_amount: record.source_amount,
            source_currency: record.source_currency,
            target_amount: record.target_amount,
            target_currency: record.target_currency,
            rate: record.rate,
            timestamp,
        })
    }
}

/// Newest-first log of conversions, capped at [`HISTORY_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLog {
    records: VecDeque<ConversionRecord>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ConversionRecord) {
        self.records.push_front(record);
        self.records.truncate(HISTORY_CAPACITY);
    }

    pub fn list(&self) -> impl Iterator<Item = &ConversionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn to_persisted_form(&self) -> serde_json::Result<String> {
        let records: Vec<PersistedRecord> = self.records.iter().map(PersistedRecord::from).collect();
        serde_json::to_string(&records)
    }

    /// Rebuilds a log from its persisted form. Anything unreadable yields an
    /// empty log; unreadable or invalid individual records are skipped.
    pub fn from_persisted_form(blob: Option<&str>) -> Self {
        let Some(blob) = blob else {
            debug!("No persisted history found");
            return Self::new();
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(blob) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Discarding malformed persisted history");
                return Self::new();
            }
        };

        let records = entries
            .into_iter()
            .filter_map(|entry| {
                let persisted: PersistedRecord = match serde_json::from_value(entry) {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(error = %e, "Skipping malformed history record");
                        return None;
                    }
                };
                let record = ConversionRecord::try_from(persisted)
                    .inspect_err(|e| warn!(error = %e, "Skipping history record with bad timestamp"))
                    .ok()?;
                if !record.is_valid() {
                    warn!(?record, "Skipping invalid history record");
                    return None;
                }
                Some(record)
            })
            .take(HISTORY_CAPACITY)
            .collect();

        Self { records }
    }
}

/// A single read/write slot for the persisted history.
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, blob: &str) -> Result<()>;
}

/// History log that writes itself back to a store after every mutation.
pub struct PersistedHistory<S: HistoryStore> {
    log: HistoryLog,
    store: S,
}

impl<S: HistoryStore> PersistedHistory<S> {
    pub fn load(store: S) -> Self {
        let blob = match store.load() {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted history, starting empty");
                None
            }
        };
        let log = HistoryLog::from_persisted_form(blob.as_deref());
        debug!(records = log.len(), "Loaded conversion history");
        Self { log, store }
    }

    pub fn append(&mut self, record: ConversionRecord) -> Result<()> {
        ensure!(record.is_valid(), "Refusing to record invalid conversion: {record:?}");
        self.log.append(record);
        self.persist()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.log.clear();
        self.persist()
    }

    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    fn persist(&self) -> Result<()> {
        let blob = self
            .log
            .to_persisted_form()
            .inspect_err(|e| error!(error = %e, "Failed to encode conversion history"))?;
        self.store
            .save(&blob)
            .inspect_err(|e| error!(error = %e, "Failed to save conversion history"))
    }
}
