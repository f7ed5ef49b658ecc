//! Record store: the persistence seam.
//!
//! RULE: Only store implementations touch persistence.
//! The engine and the reconciliation rule call the primitives below;
//! they never execute SQL directly.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::ScoreStore;

use crate::{
    error::{read_failure, ScoreResult, StoreOp, StoreResult},
    reconcile,
    record::{LeaderboardEntry, NewScoreRecord, Outcome, ScoreRecord, ScoreUpdate},
    types::RecordId,
};

pub trait RecordStore {
    /// The record for (player, day), or `None` when there is none yet.
    fn find_one(&self, player_id: &str, date_key: &str) -> StoreResult<Option<ScoreRecord>>;

    /// Insert a new daily record. Returns the assigned record id.
    fn insert(&self, record: &NewScoreRecord) -> StoreResult<RecordId>;

    /// Overwrite the mutable fields of one record.
    fn update(&self, record_id: RecordId, fields: &ScoreUpdate) -> StoreResult<()>;

    /// Records for a day, highest score first, at most `limit` rows.
    fn find_all(&self, date_key: &str, limit: usize) -> StoreResult<Vec<LeaderboardEntry>>;

    /// Read, decide, and write for one (player, day).
    ///
    /// The provided version is two independent store calls; callers must
    /// hold a per-key lock around it. Stores that can make the sequence
    /// atomic on their own override this.
    fn reconcile(&self, candidate: NewScoreRecord) -> ScoreResult<Outcome> {
        let existing = self
            .find_one(&candidate.player_id, &candidate.date_key)
            .map_err(read_failure(StoreOp::FindOne))?;
        reconcile::apply(self, reconcile::decide(existing.as_ref(), candidate))
    }
}
