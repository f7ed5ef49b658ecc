use super::RecordStore;
use crate::{
    error::{read_failure, write_failure, ScoreResult, StoreError, StoreOp, StoreResult},
    reconcile,
    record::{LeaderboardEntry, NewScoreRecord, Outcome, ScoreRecord, ScoreUpdate},
    types::RecordId,
};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::time::Duration;

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// SQLite-backed record store. One connection per instance.
pub struct ScoreStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
    busy_timeout_ms: u64,
}

impl ScoreStore {
    pub fn open(path: &str) -> StoreResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only matters for real files; :memory: reports "memory".
        let _ = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get::<_, String>(0));
        conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        })
    }

    /// Open `:memory:` as a private in-memory database, anything else as a file.
    pub fn open_configured(path: &str, busy_timeout_ms: u64) -> StoreResult<Self> {
        let store = if path == ":memory:" {
            Self::in_memory()?
        } else {
            Self::open(path)?
        };
        store.set_busy_timeout(busy_timeout_ms)
    }

    /// How long a write waits on another connection's lock before failing.
    pub fn set_busy_timeout(mut self, ms: u64) -> StoreResult<Self> {
        self.conn.busy_timeout(Duration::from_millis(ms))?;
        self.busy_timeout_ms = ms;
        Ok(self)
    }

    /// Open another connection to the same database.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    pub fn reopen(&self) -> StoreResult<Self> {
        match &self.path {
            Some(p) => Self::open(p)?.set_busy_timeout(self.busy_timeout_ms),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> StoreResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_daily_scores.sql"))?;
        Ok(())
    }

    pub fn record_count(&self, date_key: &str) -> StoreResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM daily_score WHERE date_key = ?1",
            params![date_key],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl RecordStore for ScoreStore {
    fn find_one(&self, player_id: &str, date_key: &str) -> StoreResult<Option<ScoreRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, player_id, display_name, avatar_ref, score, date_key, wallet_ref
                 FROM daily_score WHERE player_id = ?1 AND date_key = ?2",
                params![player_id, date_key],
                |row| {
                    Ok(ScoreRecord {
                        record_id:    row.get(0)?,
                        player_id:    row.get(1)?,
                        display_name: row.get(2)?,
                        avatar_ref:   row.get(3)?,
                        score:        row.get::<_, i64>(4)? as u64,
                        date_key:     row.get(5)?,
                        wallet_ref:   row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn insert(&self, record: &NewScoreRecord) -> StoreResult<RecordId> {
        self.conn.execute(
            "INSERT INTO daily_score
             (player_id, display_name, avatar_ref, score, date_key, wallet_ref)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.player_id,
                record.display_name,
                record.avatar_ref,
                record.score as i64,
                record.date_key,
                record.wallet_ref,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, record_id: RecordId, fields: &ScoreUpdate) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE daily_score
             SET score = ?1, display_name = ?2, avatar_ref = ?3, wallet_ref = ?4
             WHERE id = ?5",
            params![
                fields.score as i64,
                fields.display_name,
                fields.avatar_ref,
                fields.wallet_ref,
                record_id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::MissingRecord(record_id));
        }
        Ok(())
    }

    fn find_all(&self, date_key: &str, limit: usize) -> StoreResult<Vec<LeaderboardEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT player_id, display_name, avatar_ref, score, wallet_ref
             FROM daily_score WHERE date_key = ?1
             ORDER BY score DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![date_key, limit as i64], |row| {
            Ok(LeaderboardEntry {
                player_id:    row.get(0)?,
                display_name: row.get(1)?,
                avatar_ref:   row.get(2)?,
                score:        row.get::<_, i64>(3)? as u64,
                wallet_ref:   row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Runs the read-decide-write inside one `BEGIN IMMEDIATE` transaction.
    /// The write lock is taken before the read, so no other connection can
    /// slip a write in between. Any failure rolls the transaction back.
    fn reconcile(&self, candidate: NewScoreRecord) -> ScoreResult<Outcome> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(|e| read_failure(StoreOp::FindOne)(e.into()))?;
        let existing = self
            .find_one(&candidate.player_id, &candidate.date_key)
            .map_err(read_failure(StoreOp::FindOne))?;
        let outcome = reconcile::apply(self, reconcile::decide(existing.as_ref(), candidate))?;
        tx.commit().map_err(|e| match outcome {
            Outcome::Inserted  => write_failure(StoreOp::Insert)(e.into()),
            Outcome::Updated   => write_failure(StoreOp::Update)(e.into()),
            Outcome::Unchanged => read_failure(StoreOp::FindOne)(e.into()),
        })?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ScoreStore {
        let s = ScoreStore::in_memory().unwrap();
        s.migrate().unwrap();
        s
    }

    fn new_record(player: &str, day: &str, score: u64) -> NewScoreRecord {
        NewScoreRecord {
            player_id: player.into(),
            display_name: player.to_uppercase(),
            avatar_ref: None,
            score,
            date_key: day.into(),
            wallet_ref: None,
        }
    }

    #[test]
    fn missing_record_is_none_not_error() {
        assert_eq!(store().find_one("ghost", "2024-05-01").unwrap(), None);
    }

    #[test]
    fn unique_per_player_and_day() {
        let s = store();
        s.insert(&new_record("p1", "2024-05-01", 1)).unwrap();
        s.insert(&new_record("p1", "2024-05-02", 1)).unwrap();
        let dup = s.insert(&new_record("p1", "2024-05-01", 9));
        assert!(matches!(dup, Err(StoreError::Database(_))));
    }

    #[test]
    fn update_of_unknown_id_is_an_error() {
        let fields = ScoreUpdate {
            display_name: "x".into(),
            avatar_ref: None,
            score: 1,
            wallet_ref: None,
        };
        assert!(matches!(store().update(404, &fields), Err(StoreError::MissingRecord(404))));
    }

    #[test]
    fn migrate_is_idempotent() {
        let s = store();
        s.migrate().unwrap();
        assert_eq!(s.record_count("2024-05-01").unwrap(), 0);
    }
}
