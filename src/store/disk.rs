use crate::core::history::HistoryStore;
use anyhow::{Context, Result};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "history";
const KEY: &str = "conversions";

/// History slot backed by a fjall keyspace on disk.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path.join("history"))
            .open()
            .with_context(|| format!("Failed to open history store at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open history partition")?;
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl HistoryStore for DiskStore {
    fn load(&self) -> Result<Option<String>> {
        let Some(value) = self.partition.get(KEY)? else {
            debug!("Disk store MISS");
            return Ok(None);
        };
        debug!(bytes = value.len(), "Disk store HIT");
        let blob = String::from_utf8(value.to_vec()).context("Persisted history is not UTF-8")?;
        Ok(Some(blob))
    }

    fn save(&self, blob: &str) -> Result<()> {
        self.partition.insert(KEY, blob.as_bytes())?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(bytes = blob.len(), "Disk store SAVE");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_disk_store_load_save() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        // Initially, slot is empty
        assert!(store.load().unwrap().is_none());

        store.save(r#"[{"a":1}]"#).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some(r#"[{"a":1}]"#));

        store.save("[]").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_disk_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = DiskStore::open(dir.path()).unwrap();
            store.save("[\"kept\"]").unwrap();
        }
        let store = DiskStore::open(dir.path()).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("[\"kept\"]"));
    }
}
