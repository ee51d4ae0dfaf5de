use crate::core::history::HistoryStore;
use anyhow::{Result, anyhow};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// In-memory history slot. Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        let slot = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        debug!(present = slot.is_some(), "Memory store LOAD");
        Ok(slot.clone())
    }

    fn save(&self, blob: &str) -> Result<()> {
        let mut slot = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        debug!(bytes = blob.len(), "Memory store SAVE");
        *slot = Some(blob.to_string());
        Ok(())
    }
}
