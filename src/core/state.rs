//! Session-wide bookkeeping that is never persisted

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEntry {
    pub message: String,
    pub at: DateTime<Utc>,
    pub operation: String,
}

#[derive(Debug, Default)]
pub struct ApplicationState {
    pub fetch_in_flight: bool,
    pub last_update: Option<DateTime<Utc>>,
    pub api_call_count: u64,
    errors: Vec<ErrorEntry>,
}

impl ApplicationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_error(&mut self, operation: &str, message: impl Into<String>) {
        self.errors.push(ErrorEntry {
            message: message.into(),
            at: Utc::now(),
            operation: operation.to_string(),
        });
    }

    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }
}

/// Counters exposed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub api_call_count: u64,
    pub last_update: Option<DateTime<Utc>>,
    pub error_count: usize,
    pub supported_currency_count: usize,
}
