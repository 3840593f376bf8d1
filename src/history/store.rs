use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::models::{DatasetEntry, EquipmentRecord};
use crate::storage::keys::{HISTORY_LOG, rows_key};
use crate::storage::{Storage, load_json, save_json};

/// Number of uploads retained when not configured otherwise
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// The dataset currently shown: history metadata plus its rows
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDataset {
    pub entry: DatasetEntry,
    pub rows: Vec<EquipmentRecord>,
}

pub struct HistoryStore {
    storage: Storage,
    capacity: usize,
    entries: Vec<DatasetEntry>,
    active: Option<ActiveDataset>,
}

impl HistoryStore {
    /// Load the persisted log and auto-select its most recent entry
    ///
    /// A corrupt log is logged and treated as empty rather than failing startup. A log longer
    /// than `capacity` is cut down and saved back, and the dropped entries' rows are deleted.
    pub fn open(storage: Storage, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries: Vec<DatasetEntry> = match load_json(storage.durable(), HISTORY_LOG) {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Ignoring unreadable history log: {}", e);
                Vec::new()
            }
        };
        if entries.len() > capacity {
            let dropped = entries.split_off(capacity);
            match save_json(storage.durable(), HISTORY_LOG, &entries) {
                Ok(()) => {
                    info!(dropped = dropped.len(), capacity, "Truncated history to capacity");
                    remove_rows(&storage, &dropped);
                }
                Err(e) => warn!("Failed to store truncated history log: {}", e),
            }
        }

        let mut store = Self { storage, capacity, entries, active: None };
        if let Some(latest) = store.entries.first().map(|e| e.id) {
            store.select(latest);
        }

        debug!(entries = store.entries.len(), capacity, "Rehydrated history");
        store
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained entries, newest first
    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: i64) -> Option<&DatasetEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn active(&self) -> Option<&ActiveDataset> {
        self.active.as_ref()
    }

    /// Prepend an upload, evict beyond capacity, persist, and make it active
    ///
    /// Ids are kept strictly increasing: an id not newer than the current head is bumped past
    /// it. Storage is written before in-memory state changes, so a failed write leaves the
    /// history as it was; rows stored ahead of a failed log write are removed again.
    pub fn record(
        &mut self,
        mut entry: DatasetEntry,
        rows: Vec<EquipmentRecord>,
    ) -> Result<&[DatasetEntry]> {
        if let Some(newest) = self.entries.first()
            && entry.id <= newest.id
        {
            debug!(requested = entry.id, assigned = newest.id + 1, "Bumping dataset id");
            entry.id = newest.id + 1;
        }

        let mut updated = Vec::with_capacity(self.capacity + 1);
        updated.push(entry.clone());
        updated.extend(self.entries.iter().cloned());
        let evicted = if updated.len() > self.capacity {
            updated.split_off(self.capacity)
        } else {
            Vec::new()
        };

        let durable = self.storage.durable();
        save_json(durable, &rows_key(entry.id), &rows)
            .with_context(|| format!("Failed to store rows for dataset {}", entry.id))?;
        if let Err(e) = save_json(durable, HISTORY_LOG, &updated) {
            if let Err(cleanup) = durable.remove(&rows_key(entry.id)) {
                warn!("Failed to remove rows of unrecorded dataset {}: {}", entry.id, cleanup);
            }
            return Err(e).context("Failed to store history log");
        }

        remove_rows(&self.storage, &evicted);

        info!(
            id = entry.id,
            filename = %entry.filename,
            rows = rows.len(),
            evicted = evicted.len(),
            "Recorded dataset"
        );

        self.entries = updated;
        self.active = Some(ActiveDataset { entry, rows });
        Ok(&self.entries)
    }

    /// Make a retained dataset active and return it
    ///
    /// A missing or unreadable row set yields an empty row list.
    pub fn select(&mut self, id: i64) -> Option<&ActiveDataset> {
        let entry = self.entry(id)?.clone();
        let rows = self.load_rows(id);
        self.active = Some(ActiveDataset { entry, rows });
        self.active.as_ref()
    }

    fn load_rows(&self, id: i64) -> Vec<EquipmentRecord> {
        match load_json(self.storage.durable(), &rows_key(id)) {
            Ok(Some(rows)) => rows,
            Ok(None) => {
                warn!("Row set for dataset {} is missing, showing no rows", id);
                Vec::new()
            }
            Err(e) => {
                warn!("Row set for dataset {} is unreadable, showing no rows: {}", id, e);
                Vec::new()
            }
        }
    }

    /// Delete every retained dataset and the log itself
    pub fn clear(&mut self) -> Result<()> {
        let durable = self.storage.durable();
        for entry in &self.entries {
            durable
                .remove(&rows_key(entry.id))
                .with_context(|| format!("Failed to remove rows for dataset {}", entry.id))?;
        }
        durable.remove(HISTORY_LOG).context("Failed to remove history log")?;

        self.entries.clear();
        self.active = None;
        Ok(())
    }
}

/// Delete the row sets of entries that have left the log
fn remove_rows(storage: &Storage, dropped: &[DatasetEntry]) {
    for old in dropped {
        if let Err(e) = storage.durable().remove(&rows_key(old.id)) {
            warn!("Failed to remove rows of evicted dataset {}: {}", old.id, e);
        }
    }
}
