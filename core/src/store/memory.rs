use super::RecordStore;
use crate::{
    error::{StoreError, StoreResult},
    record::{LeaderboardEntry, NewScoreRecord, ScoreRecord, ScoreUpdate},
    types::RecordId,
};
use std::sync::{
    atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering},
    Mutex, MutexGuard,
};

/// In-process record store.
///
/// Each primitive is atomic on its own; nothing spans two calls, so
/// reconciliation through this store relies on the engine's per-key lock.
/// Faults can be switched on per primitive to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows:    Mutex<Vec<ScoreRecord>>,
    next_id: AtomicI64,
    faults:  Faults,
    inserts: AtomicUsize,
    updates: AtomicUsize,
}

#[derive(Debug, Default)]
struct Faults {
    reads:   AtomicBool,
    inserts: AtomicBool,
    updates: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, on: bool) {
        self.faults.reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_inserts(&self, on: bool) {
        self.faults.inserts.store(on, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, on: bool) {
        self.faults.updates.store(on, Ordering::SeqCst);
    }

    /// Successful inserts so far.
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Successful updates so far.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.insert_count() + self.update_count()
    }

    /// Every stored record, all days. Ignores read faults.
    pub fn snapshot(&self) -> Vec<ScoreRecord> {
        match self.rows.lock() {
            Ok(rows) => rows.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn rows(&self) -> StoreResult<MutexGuard<'_, Vec<ScoreRecord>>> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn check(flag: &AtomicBool, what: &str) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("injected {what} fault")));
        }
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn find_one(&self, player_id: &str, date_key: &str) -> StoreResult<Option<ScoreRecord>> {
        Self::check(&self.faults.reads, "read")?;
        let rows = self.rows()?;
        Ok(rows
            .iter()
            .find(|r| r.player_id == player_id && r.date_key == date_key)
            .cloned())
    }

    fn insert(&self, record: &NewScoreRecord) -> StoreResult<RecordId> {
        Self::check(&self.faults.inserts, "insert")?;
        let mut rows = self.rows()?;
        if rows
            .iter()
            .any(|r| r.player_id == record.player_id && r.date_key == record.date_key)
        {
            return Err(StoreError::Conflict {
                player_id: record.player_id.clone(),
                date_key: record.date_key.clone(),
            });
        }
        let record_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        rows.push(record.clone().into_record(record_id));
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(record_id)
    }

    fn update(&self, record_id: RecordId, fields: &ScoreUpdate) -> StoreResult<()> {
        Self::check(&self.faults.updates, "update")?;
        let mut rows = self.rows()?;
        let row = rows
            .iter_mut()
            .find(|r| r.record_id == record_id)
            .ok_or(StoreError::MissingRecord(record_id))?;
        row.display_name = fields.display_name.clone();
        row.avatar_ref = fields.avatar_ref.clone();
        row.score = fields.score;
        row.wallet_ref = fields.wallet_ref.clone();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn find_all(&self, date_key: &str, limit: usize) -> StoreResult<Vec<LeaderboardEntry>> {
        Self::check(&self.faults.reads, "read")?;
        let rows = self.rows()?;
        let mut entries: Vec<LeaderboardEntry> = rows
            .iter()
            .filter(|r| r.date_key == date_key)
            .map(LeaderboardEntry::from)
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Ok(entries)
    }
}
