//! Command interface used by the presentation layer.
//!
//! The controller is the single owner of the conversion engine and the
//! persisted history. Presentation code calls into it and renders whatever
//! comes back; it never touches rates or history directly.

use crate::core::error::ConvertResult;
use crate::core::history::{ConversionRecord, HistoryLog, HistoryStore, PersistedHistory};
use crate::core::rates::RateTable;
use crate::core::schedule::RefreshPolicy;
use crate::core::state::Stats;
use crate::core::ConversionEngine;
use chrono::Utc;
use tracing::{debug, info, warn};

pub const OFFLINE_ADVISORY: &str = "You are offline. Showing results from cached exchange rates.";

pub struct Controller<S: HistoryStore> {
    engine: ConversionEngine,
    history: PersistedHistory<S>,
    refresh_policy: RefreshPolicy,
    online: bool,
}

/// Exchanges source and target currency.
pub fn swap<'a>(from: &'a str, to: &'a str) -> (&'a str, &'a str) {
    (to, from)
}

impl<S: HistoryStore> Controller<S> {
    pub fn new(
        engine: ConversionEngine,
        history: PersistedHistory<S>,
        refresh_policy: RefreshPolicy,
    ) -> Self {
        Self {
            engine,
            history,
            refresh_policy,
            online: true,
        }
    }

    /// Converts and records the result in history. Failed conversions leave
    /// history untouched.
    pub async fn convert(&mut self, amount: f64, from: &str, to: &str) -> ConvertResult<ConversionRecord> {
        let conversion = self.engine.convert(amount, from, to).await?;
        let record = ConversionRecord::new(
            amount,
            &conversion.from,
            conversion.converted_amount,
            &conversion.to,
            conversion.effective_rate,
        );

        if let Err(e) = self.history.append(record.clone()) {
            self.engine.record_error("save_history", e.to_string());
        }
        Ok(record)
    }

    pub async fn force_refresh(&mut self) -> ConvertResult<()> {
        self.engine.force_refresh().await
    }

    /// Scheduled reload. Always refetches while online, whatever the age of
    /// the cached table; offline ticks are skipped. Returns whether a reload
    /// happened.
    pub async fn periodic_refresh(&mut self) -> ConvertResult<bool> {
        if !self.online {
            debug!("Offline, skipping scheduled refresh");
            return Ok(false);
        }
        self.engine.force_refresh().await?;
        Ok(true)
    }

    /// Reloads rates when the cached table is older than the refresh policy
    /// allows. Returns whether a reload happened.
    pub async fn refresh_if_stale(&mut self) -> ConvertResult<bool> {
        if !self.online {
            debug!("Offline, skipping stale check");
            return Ok(false);
        }
        if !self
            .refresh_policy
            .is_stale(self.engine.stats().last_update, Utc::now())
        {
            return Ok(false);
        }
        info!("Cached rates are stale, refreshing");
        self.engine.force_refresh().await?;
        Ok(true)
    }

    /// Records a connectivity change. Going offline returns an advisory for
    /// display; cache and history are kept as they are.
    pub fn set_online(&mut self, online: bool) -> Option<&'static str> {
        self.online = online;
        if online {
            info!("Connectivity restored");
            None
        } else {
            warn!("Connectivity lost, using cached rates");
            Some(OFFLINE_ADVISORY)
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn history(&self) -> &HistoryLog {
        self.history.log()
    }

    pub fn clear_history(&mut self) {
        if let Err(e) = self.history.clear() {
            self.engine.record_error("clear_history", e.to_string());
        }
    }

    pub fn stats(&self) -> Stats {
        self.engine.stats()
    }

    pub fn rates(&self) -> Option<&RateTable> {
        self.engine.cache().table()
    }

    pub fn engine(&self) -> &ConversionEngine {
        &self.engine
    }
}
