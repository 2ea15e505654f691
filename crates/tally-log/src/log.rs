use chrono::Utc;
use tally_calc::dispatch;
use tally_store::DurableStore;
use tally_types::{CalculationResult, EntryId, LogEntry, Operands, Operator};
use tracing::{debug, info, warn};

use crate::codec;
use crate::error::{IdsExhausted, PersistenceError};
use crate::ids::IdAllocator;
use crate::outcome::Outcome;

/// Store key the whole log is persisted under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "calcLog";

/// Ordered, id-keyed history of successful calculations.
///
/// Entries are kept oldest first and persisted as a single blob under one
/// key. Every mutation is applied in memory first and then written through to
/// the store; a failed write is returned as a warning on the [`Outcome`]
/// rather than undoing the mutation.
pub struct CalculationLog<S> {
    store: S,
    key: String,
    entries: Vec<LogEntry>,
    ids: IdAllocator,
}

impl<S: DurableStore> CalculationLog<S> {
    /// Create an empty log over `store` without reading it.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            entries: Vec::new(),
            ids: IdAllocator::new(),
        }
    }

    /// Create a log over `store` and load any existing history.
    pub fn open(store: S, key: impl Into<String>) -> Outcome<Self> {
        let mut log = Self::new(store, key);
        let warning = log.load().warning;
        Outcome {
            value: log,
            warning,
        }
    }

    /// Replace the in-memory sequence with what the store holds.
    ///
    /// An absent key means no history yet. A blob that cannot be decoded, or
    /// a store that cannot be read, leaves the log empty and is reported as
    /// [`PersistenceError::LoadFailed`]; the stored blob is left untouched
    /// until the next mutation overwrites it.
    pub fn load(&mut self) -> Outcome<Vec<LogEntry>> {
        self.entries.clear();

        let blob = match self.store.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!(key = %self.key, "no stored calculation history");
                return Outcome::durable(Vec::new());
            }
            Err(e) => return self.load_failed(e.to_string()),
        };

        match codec::decode(&blob) {
            Ok(entries) => {
                self.ids.observe(&entries);
                self.entries = entries;
                info!(key = %self.key, count = self.entries.len(), "calculation history loaded");
                Outcome::durable(self.entries.clone())
            }
            Err(e) => self.load_failed(e.to_string()),
        }
    }

    fn load_failed(&self, reason: String) -> Outcome<Vec<LogEntry>> {
        warn!(key = %self.key, %reason, "discarding stored calculation history");
        Outcome::degraded(
            Vec::new(),
            PersistenceError::LoadFailed {
                key: self.key.clone(),
                reason,
            },
        )
    }

    /// Record a successful calculation.
    ///
    /// Fails only when the id space is exhausted, in which case nothing is
    /// recorded.
    pub fn add(
        &mut self,
        operands: Operands,
        operator: Operator,
        result: f64,
    ) -> Result<Outcome<LogEntry>, IdsExhausted> {
        let Some(id) = self.ids.allocate() else {
            warn!(key = %self.key, "no entry ids left; calculation not recorded");
            return Err(IdsExhausted {
                key: self.key.clone(),
            });
        };
        let entry = LogEntry::new(id, Utc::now(), operands, operator, result);
        self.entries.push(entry.clone());
        debug!(id = id.get(), op = operator.token(), "log entry added");

        Ok(match self.persist() {
            Ok(()) => Outcome::durable(entry),
            Err(e) => Outcome::degraded(entry, e),
        })
    }

    /// Remove the entry with `id`. Returns `false` if there was none.
    pub fn delete(&mut self, id: EntryId) -> Outcome<bool> {
        let Some(index) = self.entries.iter().position(|e| e.id() == id) else {
            debug!(id = id.get(), "delete of unknown log entry ignored");
            return Outcome::durable(false);
        };
        self.entries.remove(index);
        debug!(id = id.get(), "log entry deleted");

        match self.persist() {
            Ok(()) => Outcome::durable(true),
            Err(e) => Outcome::degraded(true, e),
        }
    }

    /// Drop every entry and erase the stored record entirely.
    ///
    /// After a successful clear a reload sees an absent key, not an empty
    /// array. Ids are not reset.
    pub fn clear(&mut self) -> Outcome<()> {
        let dropped = self.entries.len();
        self.entries.clear();

        match self.store.remove(&self.key) {
            Ok(_) => {
                info!(key = %self.key, dropped, "calculation history cleared");
                Outcome::durable(())
            }
            Err(e) => {
                let warning = self.save_failed(e.to_string());
                Outcome::degraded((), warning)
            }
        }
    }

    /// Re-run an entry's operator over its operands without touching the log.
    pub fn replay_for_calculation(&self, entry: &LogEntry) -> CalculationResult {
        let Operands { a, b } = entry.operands();
        dispatch(entry.token(), a, b)
    }

    pub fn get(&self, id: EntryId) -> Option<&LogEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Entries in insertion order, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries in presentation order, newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        let blob = codec::encode(&self.entries).map_err(|e| self.save_failed(e.to_string()))?;
        self.store
            .set(&self.key, &blob)
            .map_err(|e| self.save_failed(e.to_string()))?;
        debug!(key = %self.key, count = self.entries.len(), bytes = blob.len(), "calculation history saved");
        Ok(())
    }

    fn save_failed(&self, reason: String) -> PersistenceError {
        warn!(key = %self.key, %reason, "calculation history not saved; keeping it in memory");
        PersistenceError::SaveFailed {
            key: self.key.clone(),
            reason,
        }
    }
}

impl<S> std::fmt::Debug for CalculationLog<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculationLog")
            .field("key", &self.key)
            .field("entries", &self.entries.len())
            .field("next_id", &self.ids.peek())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tally_store::{FileStore, InMemoryStore};
    use tally_types::CalculationError;

    fn shared_log() -> (Arc<InMemoryStore>, CalculationLog<Arc<InMemoryStore>>) {
        let store = Arc::new(InMemoryStore::new());
        let log = CalculationLog::new(Arc::clone(&store), DEFAULT_STORAGE_KEY);
        (store, log)
    }

    fn add(log: &mut CalculationLog<Arc<InMemoryStore>>, a: f64, b: f64, op: Operator, r: f64) -> LogEntry {
        let outcome = log.add(Operands::new(a, b), op, r).unwrap();
        assert!(outcome.is_durable());
        outcome.into_value()
    }

    // -----------------------------------------------------------------------
    // Add / reload
    // -----------------------------------------------------------------------

    #[test]
    fn clear_add_reload_roundtrip() {
        let (store, mut log) = shared_log();
        assert!(log.clear().is_durable());
        let added = add(&mut log, 2.0, 3.0, Operator::Add, 5.0);

        let reloaded = CalculationLog::open(store, DEFAULT_STORAGE_KEY);
        assert!(reloaded.is_durable());
        let reloaded = reloaded.into_value();
        assert_eq!(reloaded.entries(), &[added.clone()]);
        assert_eq!(reloaded.get(added.id()), Some(&added));
    }

    #[test]
    fn add_persists_every_entry() {
        let (store, mut log) = shared_log();
        add(&mut log, 1.0, 1.0, Operator::Add, 2.0);
        add(&mut log, 6.0, 3.0, Operator::Multiply, 18.0);

        let blob = store.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert_eq!(codec::decode(&blob).unwrap(), log.entries());
    }

    #[test]
    fn rapid_adds_get_unique_ids() {
        let (_store, mut log) = shared_log();
        let ids: Vec<_> = (0..100)
            .map(|i| add(&mut log, i as f64, 1.0, Operator::Add, i as f64 + 1.0).id())
            .collect();
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn ids_continue_after_reload() {
        let (store, mut log) = shared_log();
        let first = add(&mut log, 1.0, 2.0, Operator::Add, 3.0);

        let mut reopened = CalculationLog::open(store, DEFAULT_STORAGE_KEY).into_value();
        let second = reopened
            .add(Operands::new(4.0, 2.0), Operator::Divide, 2.0)
            .unwrap()
            .into_value();
        assert!(second.id() > first.id());
    }

    #[test]
    fn newest_first_order() {
        let (_store, mut log) = shared_log();
        let a = add(&mut log, 1.0, 1.0, Operator::Add, 2.0);
        let b = add(&mut log, 2.0, 2.0, Operator::Add, 4.0);
        let order: Vec<_> = log.newest_first().map(LogEntry::id).collect();
        assert_eq!(order, vec![b.id(), a.id()]);
    }

    #[test]
    fn absent_key_loads_empty_without_warning() {
        let (_store, mut log) = shared_log();
        let outcome = log.load();
        assert!(outcome.is_durable());
        assert!(outcome.value.is_empty());
    }

    // -----------------------------------------------------------------------
    // Delete / clear
    // -----------------------------------------------------------------------

    #[test]
    fn delete_twice_is_idempotent() {
        let (_store, mut log) = shared_log();
        let entry = add(&mut log, 1.0, 1.0, Operator::Add, 2.0);
        add(&mut log, 2.0, 1.0, Operator::Subtract, 1.0);
        assert_eq!(log.len(), 2);

        assert!(log.delete(entry.id()).into_value());
        assert_eq!(log.len(), 1);
        assert!(!log.delete(entry.id()).into_value());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn delete_persists_remaining_entries() {
        let (store, mut log) = shared_log();
        let gone = add(&mut log, 1.0, 1.0, Operator::Add, 2.0);
        let kept = add(&mut log, 2.0, 1.0, Operator::Subtract, 1.0);
        log.delete(gone.id()).into_value();

        let reloaded = CalculationLog::open(store, DEFAULT_STORAGE_KEY).into_value();
        assert_eq!(reloaded.entries(), &[kept]);
    }

    #[test]
    fn clear_removes_the_key() {
        let (store, mut log) = shared_log();
        add(&mut log, 1.0, 1.0, Operator::Add, 2.0);
        assert!(store.contains(DEFAULT_STORAGE_KEY).unwrap());

        assert!(log.clear().is_durable());
        assert!(log.is_empty());
        assert!(!store.contains(DEFAULT_STORAGE_KEY).unwrap());
    }

    #[test]
    fn clear_does_not_reuse_ids() {
        let (_store, mut log) = shared_log();
        let before = add(&mut log, 1.0, 1.0, Operator::Add, 2.0);
        log.clear().into_value();
        let after = add(&mut log, 1.0, 1.0, Operator::Add, 2.0);
        assert!(after.id() > before.id());
    }

    // -----------------------------------------------------------------------
    // Degraded persistence
    // -----------------------------------------------------------------------

    #[test]
    fn malformed_blob_starts_empty_with_warning() {
        for blob in ["not json", "{\"a\":1}", "[{\"id\":1}]", "42"] {
            let store = InMemoryStore::new();
            store.set(DEFAULT_STORAGE_KEY, blob).unwrap();
            let outcome = CalculationLog::open(store, DEFAULT_STORAGE_KEY);
            assert!(
                matches!(outcome.warning, Some(PersistenceError::LoadFailed { .. })),
                "{blob}"
            );
            assert!(outcome.value.is_empty());
        }
    }

    #[test]
    fn save_failure_keeps_entry_in_memory() {
        let (store, mut log) = shared_log();
        store.set_read_only(true);

        let outcome = log
            .add(Operands::new(6.0, 3.0), Operator::Multiply, 18.0)
            .unwrap();
        assert!(matches!(
            outcome.warning,
            Some(PersistenceError::SaveFailed { ref key, .. }) if key == DEFAULT_STORAGE_KEY
        ));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0], outcome.value);
        assert!(store.get(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn delete_and_clear_report_save_failures() {
        let (store, mut log) = shared_log();
        let entry = add(&mut log, 1.0, 1.0, Operator::Add, 2.0);
        store.set_read_only(true);

        let deleted = log.delete(entry.id());
        assert!(deleted.value);
        assert!(deleted.warning.as_ref().is_some_and(PersistenceError::is_save));

        let cleared = log.clear();
        assert!(cleared.warning.is_some());
        assert!(log.is_empty());
    }

    #[test]
    fn unknown_delete_does_not_write() {
        let (store, mut log) = shared_log();
        store.set_read_only(true);
        let outcome = log.delete(EntryId::new(99));
        assert!(outcome.is_durable());
        assert!(!outcome.value);
    }

    // -----------------------------------------------------------------------
    // Replay
    // -----------------------------------------------------------------------

    #[test]
    fn replay_recomputes_without_mutation() {
        let (_store, mut log) = shared_log();
        let entry = add(&mut log, 6.0, 3.0, Operator::Multiply, 18.0);
        assert_eq!(log.replay_for_calculation(&entry), Ok(18.0));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn replay_of_unknown_token_is_invalid_operator() {
        let store = InMemoryStore::new();
        store
            .set(
                DEFAULT_STORAGE_KEY,
                r#"[{"id":1,"time":"t","a":1,"b":2,"op":"7","symbol":"?","result":3}]"#,
            )
            .unwrap();
        let log = CalculationLog::open(store, DEFAULT_STORAGE_KEY).into_value();
        let entry = log.entries()[0].clone();
        assert_eq!(
            log.replay_for_calculation(&entry),
            Err(CalculationError::InvalidOperator("7".into()))
        );
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let mut log = CalculationLog::new(store, DEFAULT_STORAGE_KEY);
        let entry = log
            .add(Operands::new(10.0, 4.0), Operator::Divide, 2.5)
            .unwrap()
            .into_value();

        let store = FileStore::open(dir.path()).unwrap();
        let reloaded = CalculationLog::open(store, DEFAULT_STORAGE_KEY).into_value();
        assert_eq!(reloaded.entries(), &[entry]);
    }

    #[test]
    fn unreadable_store_starts_empty_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        std::fs::write(store.root().join(DEFAULT_STORAGE_KEY), [0xff, 0xfe, 0x00]).unwrap();

        let outcome = CalculationLog::open(store, DEFAULT_STORAGE_KEY);
        assert!(matches!(
            outcome.warning,
            Some(PersistenceError::LoadFailed { .. })
        ));
        assert!(outcome.value.is_empty());
    }

    // -----------------------------------------------------------------------
    // Id space
    // -----------------------------------------------------------------------

    fn seeded_with_id(id: u64) -> CalculationLog<InMemoryStore> {
        let store = InMemoryStore::new();
        let blob = format!(
            r#"[{{"id":{id},"time":"t","a":1,"b":2,"op":"1","symbol":"+","result":3}}]"#
        );
        store.set(DEFAULT_STORAGE_KEY, &blob).unwrap();
        let outcome = CalculationLog::open(store, DEFAULT_STORAGE_KEY);
        assert!(outcome.is_durable());
        outcome.into_value()
    }

    #[test]
    fn largest_stored_id_loads_and_blocks_further_adds() {
        let mut log = seeded_with_id(u64::MAX);
        assert_eq!(log.len(), 1);

        let err = log
            .add(Operands::new(1.0, 1.0), Operator::Add, 2.0)
            .unwrap_err();
        assert_eq!(err.key, DEFAULT_STORAGE_KEY);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn last_id_is_handed_out_once() {
        let mut log = seeded_with_id(u64::MAX - 1);
        let last = log
            .add(Operands::new(1.0, 1.0), Operator::Add, 2.0)
            .unwrap()
            .into_value();
        assert_eq!(last.id(), EntryId::new(u64::MAX));
        assert!(log.add(Operands::new(1.0, 1.0), Operator::Add, 2.0).is_err());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn ids_resume_after_highest_stored_entry() {
        let (store, mut log) = shared_log();
        add(&mut log, 1.0, 1.0, Operator::Add, 2.0);
        let newest = add(&mut log, 2.0, 2.0, Operator::Add, 4.0);
        log.delete(newest.id()).into_value();

        let mut reopened = CalculationLog::open(store, DEFAULT_STORAGE_KEY).into_value();
        let next = reopened
            .add(Operands::new(3.0, 3.0), Operator::Add, 6.0)
            .unwrap()
            .into_value();
        assert_eq!(next.id(), newest.id());
    }
}
